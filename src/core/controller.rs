use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::display_context::ViewportSize;

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Back,
    Forward,
}

/// Platform-neutral input delivered to a viewport. Positions are in
/// physical pixels relative to the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { button: PointerButton, pos: Vec2 },
    PointerMove { pos: Vec2 },
    PointerUp { button: PointerButton, pos: Vec2 },
    /// DOM convention: positive `delta_y` scrolls toward the user
    Wheel { delta_y: f32, shift: bool },
    /// Primary press and release without meaningful movement
    Click { pos: Vec2 },
    ContextMenu { pos: Vec2 },
    Resize { size: ViewportSize },
}
