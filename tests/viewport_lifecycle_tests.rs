use glam::{Quat, Vec2, Vec3};
use office_viewport::config::ViewportConfig;
use office_viewport::core::controller::{InputEvent, PointerButton};
use office_viewport::core::display_context::ViewportSize;
use office_viewport::core::frame::FrameClock;
use office_viewport::core::listeners::{InputSurface, ListenerKind, ListenerRegistry, ListenerScope};
use office_viewport::layouts::{self, TemplateId};
use office_viewport::render::{HeadlessBackend, RenderBackend};
use office_viewport::scene::{build, DomainKind, DomainTag};
use office_viewport::types::{AgentRecord, IconKind, Partner};
use office_viewport::viewport::{ViewportError, ViewportHost};
use std::cell::RefCell;
use std::rc::Rc;

const SIZE: ViewportSize = ViewportSize {
    width: 1280,
    height: 720,
};

type TestHost<'a> = ViewportHost<&'a mut HeadlessBackend, &'a mut ListenerRegistry>;

fn staff() -> Vec<AgentRecord> {
    vec![
        AgentRecord::new("e1", "management", "manager"),
        AgentRecord::new("b1", "buyer", "manager"),
        AgentRecord::new("b2", "buyer", "agent"),
        AgentRecord::new("l1", "listing", "agent"),
        AgentRecord::new("o1", "operations", "agent"),
    ]
}

fn partners() -> Vec<Partner> {
    vec![
        Partner::new("Escrow", "20%", IconKind::Gavel),
        Partner::new("Movers", "10%", IconKind::LocalShipping),
    ]
}

fn mount<'a>(backend: &'a mut HeadlessBackend, registry: &'a mut ListenerRegistry, template: &str) -> TestHost<'a> {
    ViewportHost::mount(backend, registry, ViewportConfig::default(), template, staff(), partners(), SIZE).unwrap()
}

fn avatar_screen_pos(host: &TestHost<'_>, id: &str) -> Vec2 {
    let node = host.scene().find_tag(&DomainTag::Agent { id: id.into() }).unwrap();
    let slot = host.scene().node(node).unwrap().transform.translation;
    host.camera().world_to_screen(slot + Vec3::Y * 0.75, host.size()).unwrap()
}

#[cfg(test)]
mod viewport_lifecycle_tests {
    use super::*;

    #[test]
    fn test_mount_attaches_viewport_listeners_and_uploads() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        {
            let host = mount(&mut backend, &mut registry, "corporate");
            assert!(host.is_mounted());
            assert!(host.is_running());
            assert_eq!(host.input().active_listeners(), 7);
            assert!(host.input().is_listening(ListenerKind::Wheel, ListenerScope::Viewport));
            assert!(host.live_node_count() > 0);
            assert_eq!(host.backend().live_resources(), host.live_node_count());
            // e1 has no corporate slot
            assert_eq!(host.scene().pickable_count(), 4 + 2);
        }
        assert_eq!(registry.active_listeners(), 0, "drop unmounts");
        assert_eq!(backend.live_resources(), 0);
        assert!(backend.surface_disposed);
    }

    #[test]
    fn test_switch_a_b_a_does_not_leak() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        let first = host.live_node_count();
        let first_backend = host.backend().live_resources();

        host.set_template_id(TemplateId::AiTeam).unwrap();
        assert_eq!(host.template().id, TemplateId::AiTeam);
        assert_eq!(host.scene().count_tagged(office_viewport::scene::DomainKind::Kiosk), 0);
        host.set_template("corporate").unwrap();

        assert_eq!(host.live_node_count(), first);
        assert_eq!(host.backend().live_resources(), first_backend);
        assert_eq!(host.backend().double_releases, 0);
        assert_eq!(host.input().active_listeners(), 7);
    }

    #[test]
    fn test_same_template_is_a_no_op() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "assistant");
        let uploads = host.backend().uploads;
        host.set_template("assistant").unwrap();
        assert_eq!(host.backend().uploads, uploads);
    }

    #[test]
    fn test_unknown_template_on_mount_attaches_nothing() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let result = ViewportHost::mount(
            &mut backend,
            &mut registry,
            ViewportConfig::default(),
            "penthouse",
            staff(),
            partners(),
            SIZE,
        );
        assert!(matches!(&result, Err(ViewportError::UnknownTemplate(e)) if e.id == "penthouse"));
        drop(result);
        assert_eq!(registry.active_listeners(), 0);
        assert_eq!(backend.uploads, 0);
        assert!(backend.size.is_none());
    }

    #[test]
    fn test_unknown_template_switch_keeps_current_scene() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "ai-team");
        let nodes = host.scene().len();
        let live = host.live_node_count();

        let err = host.set_template("penthouse").unwrap_err();
        assert!(matches!(err, ViewportError::UnknownTemplate(_)));
        assert_eq!(host.template().id, TemplateId::AiTeam);
        assert_eq!(host.scene().len(), nodes);
        assert_eq!(host.live_node_count(), live);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_mount() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut config = ViewportConfig::default();
        config.orbit.min_distance = 80.0;
        let result = ViewportHost::mount(&mut backend, &mut registry, config, "assistant", staff(), partners(), SIZE);
        assert!(matches!(result, Err(ViewportError::InvalidConfig(_))));
        drop(result);
        assert_eq!(registry.active_listeners(), 0);
        assert_eq!(backend.uploads, 0);
    }

    #[test]
    fn test_failed_upload_leaves_nothing_behind() {
        let mut backend = HeadlessBackend::failing_after(3);
        let mut registry = ListenerRegistry::new();
        let result = ViewportHost::mount(
            &mut backend,
            &mut registry,
            ViewportConfig::default(),
            "corporate",
            staff(),
            partners(),
            SIZE,
        );
        assert!(matches!(result, Err(ViewportError::Render(_))));
        drop(result);
        assert_eq!(backend.live_resources(), 0);
        assert_eq!(backend.releases, 3);
        assert_eq!(registry.active_listeners(), 0);
    }

    #[test]
    fn test_pan_drag_holds_global_listeners_until_release() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        let before = host.camera().state();

        host.handle_input(InputEvent::PointerDown {
            button: PointerButton::Secondary,
            pos: Vec2::new(100.0, 100.0),
        });
        assert!(host.is_dragging());
        assert_eq!(host.input().active_listeners(), 9);
        assert!(host.input().is_listening(ListenerKind::PointerMove, ListenerScope::Global));

        // Leaves the viewport bounds mid-drag
        host.handle_input(InputEvent::PointerMove {
            pos: Vec2::new(-400.0, 120.0),
        });
        host.handle_input(InputEvent::PointerUp {
            button: PointerButton::Secondary,
            pos: Vec2::new(-400.0, 120.0),
        });

        assert!(!host.is_dragging());
        assert_eq!(host.input().active_listeners(), 7);
        assert_ne!(host.camera().state().azimuth, before.azimuth);
    }

    #[test]
    fn test_primary_button_does_not_pan() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        let before = host.camera().state();
        host.handle_input(InputEvent::PointerDown {
            button: PointerButton::Primary,
            pos: Vec2::ZERO,
        });
        host.handle_input(InputEvent::PointerMove {
            pos: Vec2::new(200.0, 50.0),
        });
        assert!(!host.is_dragging());
        assert_eq!(host.camera().state(), before);
    }

    #[test]
    fn test_unmount_mid_drag_removes_every_listener() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        {
            let mut host = mount(&mut backend, &mut registry, "corporate");
            host.handle_input(InputEvent::PointerDown {
                button: PointerButton::Middle,
                pos: Vec2::new(10.0, 10.0),
            });
            assert!(host.is_dragging());

            host.unmount();
            assert!(!host.is_mounted());
            assert!(!host.is_dragging());
            assert_eq!(host.input().active_listeners(), 0);
            assert_eq!(host.live_node_count(), 0);

            // Late events after teardown are ignored
            host.handle_input(InputEvent::PointerUp {
                button: PointerButton::Middle,
                pos: Vec2::ZERO,
            });
            assert_eq!(host.input().active_listeners(), 0);
        }
        assert_eq!(registry.active_listeners(), 0);
        assert_eq!(backend.live_resources(), 0);
        assert_eq!(backend.double_releases, 0);
    }

    #[test]
    fn test_double_unmount_is_harmless() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        {
            let mut host = mount(&mut backend, &mut registry, "ai-team");
            host.unmount();
            let releases = host.backend().releases;
            host.unmount();
            assert_eq!(host.backend().releases, releases);
            assert!(matches!(host.rebuild(), Err(ViewportError::NotMounted)));
            assert!(host.pick_at(SIZE.center()).is_none());
        }
        assert_eq!(backend.uploads, backend.releases);
        assert_eq!(backend.double_releases, 0);
    }

    #[test]
    fn test_click_fires_agent_callback() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = picked.clone();
        host.on_agent_picked(move |id| sink.borrow_mut().push(id.to_string()));

        let pos = avatar_screen_pos(&host, "b2");
        assert_eq!(host.pick_at(pos).map(|hit| hit.domain_id()), Some("b2".to_string()));
        assert!(picked.borrow().is_empty(), "pick_at does not notify");

        host.handle_input(InputEvent::Click { pos });
        assert_eq!(*picked.borrow(), vec!["b2".to_string()]);
        assert_eq!(host.last_pick().map(|hit| hit.domain_id()), Some("b2".to_string()));
    }

    #[test]
    fn test_click_fires_kiosk_callback() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = picked.clone();
        host.on_kiosk_picked(move |index| sink.borrow_mut().push(index));

        let slot = host.template().kiosk_slots.as_ref().unwrap()[0];
        let pos = host.camera().world_to_screen(slot + Vec3::Y, host.size()).unwrap();
        host.handle_input(InputEvent::Click { pos });
        assert_eq!(*picked.borrow(), vec![0]);
    }

    #[test]
    fn test_click_on_empty_space_notifies_nobody() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "assistant");
        let calls = Rc::new(RefCell::new(0));
        let sink = calls.clone();
        host.on_agent_picked(move |_| *sink.borrow_mut() += 1);

        host.handle_input(InputEvent::Click { pos: Vec2::new(3.0, 3.0) });
        host.handle_input(InputEvent::ContextMenu { pos: Vec2::new(3.0, 3.0) });
        assert_eq!(*calls.borrow(), 0);
        assert!(host.last_pick().is_none());
    }

    #[test]
    fn test_tick_spins_avatars_and_draws() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        let mut clock = FrameClock::fixed(1.0 / 60.0);

        for _ in 0..10 {
            host.tick(&clock.next_frame()).unwrap();
        }
        assert_eq!(host.backend().draws, 10);
        assert_eq!(host.backend().last_draw_items, host.live_node_count());

        let node = host.scene().find_tag(&DomainTag::Agent { id: "b1".into() }).unwrap();
        let rotation = host.scene().node(node).unwrap().transform.rotation;
        let expected = Quat::from_rotation_y(10.0 * 0.005);
        assert!(rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_stop_halts_ticks() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "assistant");
        let mut clock = FrameClock::fixed(0.016);
        host.tick(&clock.next_frame()).unwrap();
        host.stop();
        host.tick(&clock.next_frame()).unwrap();
        assert_eq!(host.backend().draws, 1);
        host.resume();
        host.tick(&clock.next_frame()).unwrap();
        assert_eq!(host.backend().draws, 2);
    }

    #[test]
    fn test_wheel_and_resize_events() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "assistant");

        host.handle_input(InputEvent::Wheel {
            delta_y: 100.0,
            shift: false,
        });
        assert!((host.camera().state().distance - 30.0).abs() < 1e-4);

        let size = ViewportSize::new(800, 600);
        host.handle_input(InputEvent::Resize { size });
        assert_eq!(host.size(), size);
        assert_eq!(host.backend().size, Some(size));
    }

    #[test]
    fn test_set_agents_rebuilds_without_leaking() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        host.set_agents(vec![AgentRecord::new("solo", "listing", "agent")]).unwrap();
        assert_eq!(host.scene().pickable_count(), 1 + 2);
        assert_eq!(host.backend().live_resources(), host.live_node_count());

        host.set_partners(Vec::new()).unwrap();
        assert_eq!(host.scene().pickable_count(), 1);
        assert_eq!(host.backend().double_releases, 0);
    }

    #[test]
    fn test_failed_switch_keeps_current_scene() {
        let assistant_meshes = build(&layouts::template(TemplateId::Assistant), &staff(), &partners())
            .mesh_nodes()
            .count();
        let mut backend = HeadlessBackend::failing_after(assistant_meshes + 5);
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "assistant");
        let nodes = host.scene().len();
        let live = host.live_node_count();
        let picked = host.pick_at(avatar_screen_pos(&host, "e1"));

        let result = host.set_template("corporate");
        assert!(matches!(result, Err(ViewportError::Render(_))), "{result:?}");
        assert_eq!(host.template().id, TemplateId::Assistant);
        assert_eq!(host.scene().len(), nodes);
        assert_eq!(host.live_node_count(), live);
        assert_eq!(host.backend().live_resources(), live);

        // A retry must try the switch again, not report the old attempt as done
        let retry = host.set_template("corporate");
        assert!(matches!(retry, Err(ViewportError::Render(_))), "{retry:?}");
        assert_eq!(host.template().id, TemplateId::Assistant);
        assert_eq!(host.pick_at(avatar_screen_pos(&host, "e1")), picked);
        assert!(picked.is_some());
        assert_eq!(host.backend().double_releases, 0);
    }

    #[test]
    fn test_roster_setters_after_unmount_change_nothing() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        host.unmount();

        let result = host.set_agents(vec![AgentRecord::new("late", "buyer", "agent")]);
        assert!(matches!(result, Err(ViewportError::NotMounted)));
        assert_eq!(host.agents(), staff().as_slice());

        let result = host.set_partners(Vec::new());
        assert!(matches!(result, Err(ViewportError::NotMounted)));
        assert_eq!(host.partners(), partners().as_slice());
        assert_eq!(host.backend().live_resources(), 0);
    }

    #[test]
    fn test_failed_roster_rebuild_keeps_previous_inputs() {
        let corporate_meshes = build(&layouts::template(TemplateId::Corporate), &staff(), &partners())
            .mesh_nodes()
            .count();
        let mut backend = HeadlessBackend::failing_after(corporate_meshes);
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        let pickable = host.scene().pickable_count();

        let mut grown = staff();
        grown.push(AgentRecord::new("b3", "buyer", "agent"));
        assert!(matches!(host.set_agents(grown), Err(ViewportError::Render(_))));
        assert_eq!(host.agents(), staff().as_slice());

        assert!(matches!(host.set_partners(Vec::new()), Err(ViewportError::Render(_))));
        assert_eq!(host.partners(), partners().as_slice());
        assert_eq!(host.scene().pickable_count(), pickable);
        assert_eq!(host.backend().live_resources(), host.live_node_count());
    }

    #[test]
    fn test_set_partners_rebuilds_without_leaking() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        assert_eq!(host.scene().count_tagged(DomainKind::Kiosk), 2);

        let many: Vec<Partner> = (0..5)
            .map(|i| Partner::new(format!("Partner {i}"), "15%", IconKind::Business))
            .collect();
        host.set_partners(many.clone()).unwrap();
        assert_eq!(host.scene().count_tagged(DomainKind::Kiosk), 5);
        assert_eq!(host.partners(), many.as_slice());
        assert_eq!(host.backend().live_resources(), host.live_node_count());

        host.set_partners(many[..1].to_vec()).unwrap();
        assert_eq!(host.scene().count_tagged(DomainKind::Kiosk), 1);
        let backend = host.backend();
        assert_eq!(backend.live_resources(), host.live_node_count());
        assert_eq!(backend.uploads - backend.releases, host.live_node_count());
        assert_eq!(backend.double_releases, 0);
    }

    #[test]
    fn test_overlay_input_reaches_viewport_only_during_pan() {
        let mut backend = HeadlessBackend::new();
        let mut registry = ListenerRegistry::new();
        let mut host = mount(&mut backend, &mut registry, "corporate");
        assert!(host.wants_input(false));
        assert!(!host.wants_input(true));

        host.handle_input(InputEvent::PointerDown {
            button: PointerButton::Middle,
            pos: Vec2::new(200.0, 200.0),
        });
        assert!(host.is_dragging());
        // Cursor now over the overlay, the pan still owns the pointer
        assert!(host.wants_input(true));
        host.handle_input(InputEvent::PointerUp {
            button: PointerButton::Middle,
            pos: Vec2::new(20.0, 20.0),
        });
        assert!(!host.wants_input(true));
        assert_eq!(host.input().active_listeners(), 7);

        host.unmount();
        assert!(!host.wants_input(false));
    }
}
