//! Camera pose and the velocity integrator that flies it
//!
//! Velocities are expressed in camera space and rotated into world space by
//! the current orientation every tick, so "forward" always follows the view.

use glam::{Mat3, Quat, Vec3};

/// World up used by the look-at construction
const WORLD_UP: Vec3 = Vec3::Y;

/// Default flying speed in world units per second
pub const DEFAULT_SPEED: f32 = 5.0;

/// Camera pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Rotation of the target-to frame, re-derived after each move
    pub orientation: Quat,
}

impl Camera {
    pub const HOME_POSITION: Vec3 = Vec3::new(0.0, 1.0, -6.0);
    pub const HOME_TARGET: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    /// Creates a camera at `position` looking at `target`. A degenerate pair
    /// starts with the identity orientation.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            orientation: target_to(position, target).unwrap_or(Quat::IDENTITY),
        }
    }

    /// Back to the home pose.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Recomputes the orientation from position and target. Keeps the old
    /// one when the look direction is undefined.
    pub fn refresh_orientation(&mut self) {
        if let Some(orientation) = target_to(self.position, self.target) {
            self.orientation = orientation;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Self::HOME_POSITION, Self::HOME_TARGET)
    }
}

/// Rotation whose basis is `z = normalize(eye - target)`, `x = up × z`,
/// `y = z × x`. `None` when eye and target coincide or the view is parallel
/// to world up.
fn target_to(eye: Vec3, target: Vec3) -> Option<Quat> {
    let z = (eye - target).try_normalize()?;
    let x = WORLD_UP.cross(z).try_normalize()?;
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}

/// The camera axis a velocity component acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Which accumulator a velocity change targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Moves the eye
    Linear,
    /// Moves the look target
    Angular,
}

/// Sign of a velocity component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Negative,
    Stop,
    Positive,
}

impl Direction {
    const fn sign(self) -> f32 {
        match self {
            Self::Negative => -1.0,
            Self::Stop => 0.0,
            Self::Positive => 1.0,
        }
    }
}

/// Camera-space velocity accumulators driven by key presses
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    speed: f32,
    linear: Vec3,
    angular: Vec3,
}

impl CameraController {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            linear: Vec3::ZERO,
            angular: Vec3::ZERO,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Changes the speed used by later presses; held keys keep their old rate.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn linear(&self) -> Vec3 {
        self.linear
    }

    pub fn angular(&self) -> Vec3 {
        self.angular
    }

    /// Sets one component to `±speed`, or to zero on [`Direction::Stop`].
    pub fn set_velocity(&mut self, motion: Motion, axis: Axis, direction: Direction) {
        let accumulator = match motion {
            Motion::Linear => &mut self.linear,
            Motion::Angular => &mut self.angular,
        };
        accumulator[axis.index()] = direction.sign() * self.speed;
    }

    /// Advances the camera by `dt` seconds.
    pub fn update_camera(&self, camera: &mut Camera, dt: f32) {
        let linear = camera.orientation * self.linear;
        let angular = camera.orientation * self.angular;
        camera.position += linear * dt;
        camera.target += angular * dt;
        camera.refresh_orientation();
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}
