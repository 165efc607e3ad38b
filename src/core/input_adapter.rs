use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use super::controller::{InputEvent, PointerButton};
use super::display_context::ViewportSize;

/// Pixels per wheel line, matching what browsers report for one notch
pub const LINE_HEIGHT: f32 = 100.0;

/// Adapter that turns winit window events into viewport input events
#[derive(Debug, Clone)]
pub struct WinitController {
    cursor: Option<Vec2>,
    /// Where the primary button went down, for click detection
    press_origin: Option<Vec2>,
    shift: bool,
    click_slop: f32,
}

impl WinitController {
    pub fn new(click_slop: f32) -> Self {
        Self {
            cursor: None,
            press_origin: None,
            shift: false,
            click_slop,
        }
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput { state, button, .. } => match Self::map_button(*button) {
                Some(button) => self.on_button(button, *state == ElementState::Pressed),
                None => Vec::new(),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                self.on_wheel(delta_y)
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.set_shift(modifiers.state().shift_key());
                Vec::new()
            }
            WindowEvent::Resized(size) => vec![InputEvent::Resize {
                size: ViewportSize::new(size.width, size.height),
            }],
            _ => Vec::new(),
        }
    }

    pub fn on_cursor_moved(&mut self, pos: Vec2) -> Vec<InputEvent> {
        self.cursor = Some(pos);
        vec![InputEvent::PointerMove { pos }]
    }

    pub fn on_button(&mut self, button: PointerButton, pressed: bool) -> Vec<InputEvent> {
        let pos = self.cursor.unwrap_or(Vec2::ZERO);
        if pressed {
            if button == PointerButton::Primary {
                self.press_origin = Some(pos);
            }
            return vec![InputEvent::PointerDown { button, pos }];
        }

        let mut events = vec![InputEvent::PointerUp { button, pos }];
        match button {
            PointerButton::Primary => {
                if let Some(origin) = self.press_origin.take() {
                    if origin.distance(pos) <= self.click_slop {
                        events.push(InputEvent::Click { pos });
                    }
                }
            }
            PointerButton::Secondary => events.push(InputEvent::ContextMenu { pos }),
            _ => {}
        }
        events
    }

    pub fn on_wheel(&mut self, delta_y: f32) -> Vec<InputEvent> {
        vec![InputEvent::Wheel {
            delta_y,
            shift: self.shift,
        }]
    }

    pub fn set_shift(&mut self, held: bool) {
        self.shift = held;
    }

    fn map_button(button: MouseButton) -> Option<PointerButton> {
        match button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Right => Some(PointerButton::Secondary),
            MouseButton::Middle => Some(PointerButton::Middle),
            MouseButton::Back => Some(PointerButton::Back),
            MouseButton::Forward => Some(PointerButton::Forward),
            MouseButton::Other(_) => None,
        }
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new(crate::config::CLICK_SLOP)
    }
}
