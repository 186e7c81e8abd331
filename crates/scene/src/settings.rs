//! Tunables that feed the uniform block alongside the camera and counts.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Renderer knobs carried by a scene preset.
///
/// Missing fields in JSON take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub max_marching_steps: u32,
    pub sun: Vec3,
    pub sun_color: Rgb,
    pub show_floor: bool,
    pub mandelbulb: bool,
    pub weird_scene: bool,
    pub far_plane: f32,
    pub soft_shadow_k: f32,
    pub marching_step: f32,
    pub epsilon: f32,
    pub soft_shadow_min: f32,
    pub soft_shadow_max: f32,
    pub outline_post_process: bool,
    pub outline_width: f32,
    pub outline_color: Rgb,
    /// Sky gradient from zenith (`[0]`) down to the horizon (`[2]`).
    pub background: [Rgb; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_marching_steps: 100,
            sun: Vec3::new(4.87, 25.34, -28.97),
            sun_color: Rgb::WHITE,
            show_floor: true,
            mandelbulb: false,
            weird_scene: false,
            far_plane: 700.0,
            soft_shadow_k: 0.01,
            marching_step: 1.0,
            epsilon: 0.01,
            soft_shadow_min: 0.001,
            soft_shadow_max: 5.0,
            outline_post_process: false,
            outline_width: 0.05,
            outline_color: Rgb::WHITE,
            background: [Rgb::WHITE; 3],
        }
    }
}

/// On/off switches that can be flipped without knowing their current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    ShowFloor,
    Mandelbulb,
    WeirdScene,
    OutlinePostProcess,
}

/// A single settings edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    MaxMarchingSteps(u32),
    Sun(Vec3),
    SunColor(Rgb),
    Enabled(Flag, bool),
    Toggle(Flag),
    FarPlane(f32),
    SoftShadowK(f32),
    MarchingStep(f32),
    Epsilon(f32),
    SoftShadowRange { min: f32, max: f32 },
    OutlineWidth(f32),
    OutlineColor(Rgb),
    Background { slot: usize, color: Rgb },
}

impl RenderSettings {
    fn flag_mut(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::ShowFloor => &mut self.show_floor,
            Flag::Mandelbulb => &mut self.mandelbulb,
            Flag::WeirdScene => &mut self.weird_scene,
            Flag::OutlinePostProcess => &mut self.outline_post_process,
        }
    }

    #[must_use]
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::ShowFloor => self.show_floor,
            Flag::Mandelbulb => self.mandelbulb,
            Flag::WeirdScene => self.weird_scene,
            Flag::OutlinePostProcess => self.outline_post_process,
        }
    }

    /// Applies one edit. Returns `false` when the edit addressed nothing
    /// (a background slot past the third).
    pub fn apply(&mut self, setting: Setting) -> bool {
        match setting {
            Setting::MaxMarchingSteps(steps) => self.max_marching_steps = steps,
            Setting::Sun(sun) => self.sun = sun,
            Setting::SunColor(color) => self.sun_color = color,
            Setting::Enabled(flag, on) => *self.flag_mut(flag) = on,
            Setting::Toggle(flag) => {
                let value = self.flag_mut(flag);
                *value = !*value;
            }
            Setting::FarPlane(far) => self.far_plane = far,
            Setting::SoftShadowK(k) => self.soft_shadow_k = k,
            Setting::MarchingStep(step) => self.marching_step = step,
            Setting::Epsilon(epsilon) => self.epsilon = epsilon,
            Setting::SoftShadowRange { min, max } => {
                self.soft_shadow_min = min;
                self.soft_shadow_max = max;
            }
            Setting::OutlineWidth(width) => self.outline_width = width,
            Setting::OutlineColor(color) => self.outline_color = color,
            Setting::Background { slot, color } => match self.background.get_mut(slot) {
                Some(target) => *target = color,
                None => return false,
            },
        }
        true
    }
}
