use log::trace;

use super::ViewportHost;
use crate::core::controller::InputEvent;
use crate::core::listeners::{DragCapture, InputSurface};
use crate::render::RenderBackend;

impl<B: RenderBackend, I: InputSurface> ViewportHost<B, I> {
    /// Whether input an overlay already handled should still reach the
    /// viewport. A pan in progress keeps its pointer stream wherever the
    /// cursor goes.
    pub fn wants_input(&self, overlay_consumed: bool) -> bool {
        self.mounted && (!overlay_consumed || self.drag.is_some())
    }

    /// Routes one input event. Ignored once unmounted.
    pub fn handle_input(&mut self, event: InputEvent) {
        if !self.mounted {
            return;
        }
        match event {
            InputEvent::PointerDown { button, pos } => {
                if self.drag.is_none() && self.camera.begin_pan(button, pos) {
                    self.drag = Some(DragCapture::acquire(&mut self.input, button));
                }
            }
            InputEvent::PointerMove { pos } => {
                if self.drag.is_some() {
                    self.camera.drag_to(pos);
                }
            }
            InputEvent::PointerUp { button, .. } => {
                if self.drag.as_ref().is_some_and(|c| c.button() == button) {
                    self.camera.end_pan(button);
                    if let Some(capture) = self.drag.take() {
                        capture.release(&mut self.input);
                    }
                }
            }
            InputEvent::Wheel { delta_y, shift } => self.camera.on_wheel(delta_y, shift),
            InputEvent::Click { pos } => {
                self.click(pos);
            }
            // Suppressed so secondary-button pans don't open a menu
            InputEvent::ContextMenu { pos } => trace!("context menu suppressed at {pos}"),
            InputEvent::Resize { size } => {
                self.size = size;
                self.backend.resize(size);
            }
        }
    }
}
