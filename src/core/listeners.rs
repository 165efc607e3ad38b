//! Input listener bookkeeping. A viewport attaches its own listeners once on
//! mount; a pan drag additionally holds window-wide move/up listeners for
//! as long as the button stays down.

use log::warn;

use super::controller::PointerButton;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
    Click,
    ContextMenu,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    /// Only events inside the viewport bounds
    Viewport,
    /// Events anywhere in the window, e.g. a drag leaving the viewport
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Something listeners can be attached to
pub trait InputSurface {
    fn attach(&mut self, kind: ListenerKind, scope: ListenerScope) -> ListenerId;

    /// Returns false if `id` was not attached
    fn detach(&mut self, id: ListenerId) -> bool;

    fn active_listeners(&self) -> usize;

    fn is_listening(&self, kind: ListenerKind, scope: ListenerScope) -> bool;
}

/// In-process listener table
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    active: Vec<(ListenerId, ListenerKind, ListenerScope)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_in_scope(&self, scope: ListenerScope) -> usize {
        self.active.iter().filter(|(_, _, s)| *s == scope).count()
    }
}

impl InputSurface for ListenerRegistry {
    fn attach(&mut self, kind: ListenerKind, scope: ListenerScope) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.active.push((id, kind, scope));
        id
    }

    fn detach(&mut self, id: ListenerId) -> bool {
        let before = self.active.len();
        self.active.retain(|(active, _, _)| *active != id);
        self.active.len() != before
    }

    fn active_listeners(&self) -> usize {
        self.active.len()
    }

    fn is_listening(&self, kind: ListenerKind, scope: ListenerScope) -> bool {
        self.active.iter().any(|(_, k, s)| *k == kind && *s == scope)
    }
}

impl<S: InputSurface + ?Sized> InputSurface for &mut S {
    fn attach(&mut self, kind: ListenerKind, scope: ListenerScope) -> ListenerId {
        (**self).attach(kind, scope)
    }

    fn detach(&mut self, id: ListenerId) -> bool {
        (**self).detach(id)
    }

    fn active_listeners(&self) -> usize {
        (**self).active_listeners()
    }

    fn is_listening(&self, kind: ListenerKind, scope: ListenerScope) -> bool {
        (**self).is_listening(kind, scope)
    }
}

pub const VIEWPORT_LISTENERS: [ListenerKind; 7] = [
    ListenerKind::PointerDown,
    ListenerKind::PointerMove,
    ListenerKind::PointerUp,
    ListenerKind::Wheel,
    ListenerKind::Click,
    ListenerKind::ContextMenu,
    ListenerKind::Resize,
];

/// Listeners a mounted viewport holds for its whole lifetime
#[derive(Debug)]
pub struct ViewportListeners {
    ids: Vec<ListenerId>,
}

impl ViewportListeners {
    pub fn attach<S: InputSurface + ?Sized>(surface: &mut S) -> Self {
        let ids = VIEWPORT_LISTENERS
            .iter()
            .map(|&kind| surface.attach(kind, ListenerScope::Viewport))
            .collect();
        Self { ids }
    }

    pub fn detach<S: InputSurface + ?Sized>(self, surface: &mut S) {
        detach_all(surface, &self.ids);
    }
}

/// Window-wide move/up listeners held during a pan drag. Consumed on
/// release so it cannot be released twice.
#[derive(Debug)]
#[must_use]
pub struct DragCapture {
    button: PointerButton,
    ids: [ListenerId; 2],
}

impl DragCapture {
    pub fn acquire<S: InputSurface + ?Sized>(surface: &mut S, button: PointerButton) -> Self {
        let ids = [
            surface.attach(ListenerKind::PointerMove, ListenerScope::Global),
            surface.attach(ListenerKind::PointerUp, ListenerScope::Global),
        ];
        Self { button, ids }
    }

    pub fn button(&self) -> PointerButton {
        self.button
    }

    pub fn release<S: InputSurface + ?Sized>(self, surface: &mut S) {
        detach_all(surface, &self.ids);
    }
}

fn detach_all<S: InputSurface + ?Sized>(surface: &mut S, ids: &[ListenerId]) {
    for &id in ids {
        if !surface.detach(id) {
            warn!("listener {id:?} was already detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_detach() {
        let mut registry = ListenerRegistry::new();
        let id = registry.attach(ListenerKind::Wheel, ListenerScope::Viewport);
        assert!(registry.is_listening(ListenerKind::Wheel, ListenerScope::Viewport));
        assert!(registry.detach(id));
        assert!(!registry.detach(id), "second detach must report nothing removed");
        assert_eq!(registry.active_listeners(), 0);
    }

    #[test]
    fn test_viewport_listeners_round_trip() {
        let mut registry = ListenerRegistry::new();
        let listeners = ViewportListeners::attach(&mut registry);
        assert_eq!(registry.active_listeners(), VIEWPORT_LISTENERS.len());
        listeners.detach(&mut registry);
        assert_eq!(registry.active_listeners(), 0);
    }

    #[test]
    fn test_drag_capture_is_global_and_scoped() {
        let mut registry = ListenerRegistry::new();
        let capture = DragCapture::acquire(&mut registry, PointerButton::Secondary);
        assert_eq!(registry.count_in_scope(ListenerScope::Global), 2);
        assert!(registry.is_listening(ListenerKind::PointerUp, ListenerScope::Global));
        assert_eq!(capture.button(), PointerButton::Secondary);
        capture.release(&mut registry);
        assert_eq!(registry.count_in_scope(ListenerScope::Global), 0);
    }
}
