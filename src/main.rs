use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use log::{error, info};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use office_viewport::cli::Cli;
use office_viewport::config::ViewportConfig;
use office_viewport::core::display_context::ViewportSize;
use office_viewport::core::frame::FrameClock;
use office_viewport::core::input_adapter::WinitController;
use office_viewport::core::listeners::{InputSurface, ListenerRegistry};
use office_viewport::layouts::{self, TemplateId};
use office_viewport::loaders;
use office_viewport::render::{HeadlessBackend, RenderBackend, WgpuBackend};
use office_viewport::types::{AgentRecord, Partner};
use office_viewport::viewport::ViewportHost;

/// Fixed step for headless ticks
const HEADLESS_DELTA: f32 = 1.0 / 60.0;

/// Everything needed to mount a viewport, resolved from the command line
struct Inputs {
    template: TemplateId,
    config: ViewportConfig,
    agents: Vec<AgentRecord>,
    partners: Vec<Partner>,
    size: ViewportSize,
}

impl Inputs {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let template: TemplateId = cli.template.parse()?;
        let mut config = match &cli.config {
            Some(path) => ViewportConfig::from_json_file(path)?,
            None => ViewportConfig::default(),
        };
        if cli.no_ui {
            config.show_hud = false;
        }
        let agents = match &cli.agents {
            Some(path) => loaders::load_agents(path)?,
            None => loaders::sample_roster(template),
        };
        let partners = match &cli.partners {
            Some(path) => loaders::load_partners(path)?,
            None => layouts::partner_network(template),
        };
        Ok(Self {
            template,
            config,
            agents,
            partners,
            size: ViewportSize::new(cli.width, cli.height),
        })
    }
}

fn log_picks<B: RenderBackend, I: InputSurface>(host: &mut ViewportHost<B, I>) {
    host.on_agent_picked(|id| info!("agent selected: {id}"));
    host.on_kiosk_picked(|index| info!("kiosk selected: {index}"));
}

fn run_headless(cli: &Cli, inputs: Inputs) -> Result<()> {
    let mut host = ViewportHost::mount(
        HeadlessBackend::new(),
        ListenerRegistry::new(),
        inputs.config,
        inputs.template.as_str(),
        inputs.agents,
        inputs.partners,
        inputs.size,
    )
    .context("Failed to mount headless viewport")?;
    log_picks(&mut host);

    let mut clock = FrameClock::fixed(HEADLESS_DELTA);
    for _ in 0..cli.frames {
        host.tick(&clock.next_frame())?;
    }

    let pick = cli.pick.and_then(|(x, y)| host.click(Vec2::new(x, y)));
    let bounds = host.scene().bounds();
    let summary = serde_json::json!({
        "template": host.template().id,
        "frames": cli.frames,
        "nodes": host.scene().len(),
        "pickable": host.scene().pickable_count(),
        "agents": host.agents().len(),
        "partners": host.partners().len(),
        "bounds": bounds.map(|b| serde_json::json!({
            "min": b.min.to_array(),
            "max": b.max.to_array(),
            "extent": b.size().to_array(),
        })),
        "liveMeshes": host.live_node_count(),
        "uploads": host.backend().uploads,
        "draws": host.backend().draws,
        "listeners": host.input().active_listeners(),
        "camera": host.camera().state(),
        "pick": pick.map(|hit| serde_json::json!({
            "kind": hit.kind(),
            "id": hit.domain_id(),
            "distance": hit.distance,
        })),
    });

    host.unmount();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

struct App {
    inputs: Inputs,
    host: Option<ViewportHost<WgpuBackend, ListenerRegistry>>,
    controller: WinitController,
    clock: FrameClock,
}

impl App {
    fn new(inputs: Inputs) -> Self {
        let controller = WinitController::new(inputs.config.click_slop);
        Self {
            inputs,
            host: None,
            controller,
            clock: FrameClock::wall(),
        }
    }

    fn mount(&self, window: Arc<Window>) -> Result<ViewportHost<WgpuBackend, ListenerRegistry>> {
        let inner = window.inner_size();
        let backend = pollster::block_on(WgpuBackend::new(window, self.inputs.config.show_hud))
            .context("Failed to initialize renderer")?;
        let mut host = ViewportHost::mount(
            backend,
            ListenerRegistry::new(),
            self.inputs.config.clone(),
            self.inputs.template.as_str(),
            self.inputs.agents.clone(),
            self.inputs.partners.clone(),
            ViewportSize::new(inner.width, inner.height),
        )?;
        log_picks(&mut host);
        Ok(host)
    }

    fn switch_template(&mut self, id: TemplateId) {
        if let Some(host) = self.host.as_mut() {
            if let Err(e) = host.set_template_id(id) {
                error!("Failed to switch to {id}: {e}");
            }
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut host) = self.host.take() {
            host.unmount();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Office Viewport")
                .with_inner_size(winit::dpi::PhysicalSize::new(
                    self.inputs.size.width,
                    self.inputs.size.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.mount(window) {
            Ok(host) => self.host = Some(host),
            Err(e) => {
                error!("{e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(host) = self.host.as_mut() else {
            return;
        };

        // egui sees every event first; a pan in progress still gets its pointer stream
        let hud_consumed = host.backend_mut().handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } if !hud_consumed => match code {
                KeyCode::Escape => self.shutdown(event_loop),
                KeyCode::Digit1 => self.switch_template(TemplateId::Assistant),
                KeyCode::Digit2 => self.switch_template(TemplateId::AiTeam),
                KeyCode::Digit3 => self.switch_template(TemplateId::Corporate),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                let frame = self.clock.next_frame();
                if let Err(e) = host.tick(&frame) {
                    error!("Render error: {e}");
                }
                if let Some(id) = host.backend_mut().take_template_request() {
                    self.switch_template(id);
                }
            }
            other => {
                // Translate regardless so cursor tracking stays current
                let inputs = self.controller.translate(&other);
                if host.wants_input(hud_consumed) {
                    for input in inputs {
                        host.handle_input(input);
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = &self.host {
            host.backend().window().request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let inputs = Inputs::from_cli(&cli)?;

    if cli.dump_template {
        let template = layouts::template(inputs.template);
        println!("{}", serde_json::to_string_pretty(&template)?);
        return Ok(());
    }

    if cli.headless {
        return run_headless(&cli, inputs);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(inputs);

    if !app.inputs.config.show_hud {
        info!("HUD disabled");
    }
    println!("Office Viewport - Controls: right/middle drag to orbit, wheel to zoom, shift+wheel to tilt, 1/2/3 to switch layout, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
