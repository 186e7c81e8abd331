//! Keyboard bindings
//!
//! Flying: A/D, Q/E, W/S move the eye along camera x, y, z; the arrow keys
//! and Z/X move the look target. Other bindings fire once per press.

use scene::{Flag, SceneRef, Setting, ShapeKind};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::camera::{Axis, Direction, Motion};
use crate::commands::Command;

/// Maps a key transition to a command. Releases only matter for the flying
/// keys; auto-repeat is ignored everywhere.
pub fn command_for_key(code: KeyCode, state: ElementState, repeat: bool) -> Option<Command> {
    if repeat {
        return None;
    }
    let pressed = state == ElementState::Pressed;
    if let Some((motion, axis, direction)) = camera_binding(code) {
        return Some(Command::SetCameraVelocity {
            motion,
            axis,
            direction: if pressed { direction } else { Direction::Stop },
        });
    }
    if !pressed {
        return None;
    }
    let command = match code {
        KeyCode::F1 => Command::AddShape(ShapeKind::Sphere),
        KeyCode::F2 => Command::AddShape(ShapeKind::Box),
        KeyCode::F3 => Command::AddShape(ShapeKind::Torus),
        KeyCode::F5 => Command::ResetScene,
        KeyCode::F6 => Command::ResetCamera,
        KeyCode::F7 => Command::NewScene,
        KeyCode::F9 => Command::ExportScene,
        KeyCode::F12 => Command::SaveImage,
        KeyCode::KeyG => Command::SetSetting(Setting::Toggle(Flag::ShowFloor)),
        KeyCode::KeyM => Command::SetSetting(Setting::Toggle(Flag::Mandelbulb)),
        KeyCode::KeyN => Command::SetSetting(Setting::Toggle(Flag::WeirdScene)),
        KeyCode::KeyO => Command::SetSetting(Setting::Toggle(Flag::OutlinePostProcess)),
        other => return preset_slot(other).map(|index| Command::LoadScene(SceneRef::Index(index))),
    };
    Some(command)
}

fn camera_binding(code: KeyCode) -> Option<(Motion, Axis, Direction)> {
    use Direction::{Negative, Positive};
    let binding = match code {
        KeyCode::KeyA => (Motion::Linear, Axis::X, Negative),
        KeyCode::KeyD => (Motion::Linear, Axis::X, Positive),
        KeyCode::KeyQ => (Motion::Linear, Axis::Y, Negative),
        KeyCode::KeyE => (Motion::Linear, Axis::Y, Positive),
        KeyCode::KeyW => (Motion::Linear, Axis::Z, Negative),
        KeyCode::KeyS => (Motion::Linear, Axis::Z, Positive),
        KeyCode::ArrowLeft => (Motion::Angular, Axis::X, Negative),
        KeyCode::ArrowRight => (Motion::Angular, Axis::X, Positive),
        KeyCode::ArrowDown => (Motion::Angular, Axis::Y, Negative),
        KeyCode::ArrowUp => (Motion::Angular, Axis::Y, Positive),
        KeyCode::KeyZ => (Motion::Angular, Axis::Z, Negative),
        KeyCode::KeyX => (Motion::Angular, Axis::Z, Positive),
        _ => return None,
    };
    Some(binding)
}

/// Digits 1..9 select presets 0..8.
fn preset_slot(code: KeyCode) -> Option<usize> {
    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    DIGITS.iter().position(|&digit| digit == code)
}
