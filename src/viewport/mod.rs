//! Owns everything one mounted office view needs: the active template and
//! scene, GPU resources, camera, input listeners and pick callbacks.

mod handlers;
mod resources;

use glam::{Quat, Vec2};
use log::{debug, info};

use crate::camera::OrbitCamera;
use crate::config::{ConfigError, ViewportConfig};
use crate::core::display_context::ViewportSize;
use crate::core::frame::FrameInfo;
use crate::core::listeners::{DragCapture, InputSurface, ViewportListeners};
use crate::layouts::{get_template, TemplateId, UnknownTemplateError};
use crate::math::hex_to_rgb;
use crate::picking::{self, PickResult};
use crate::render::{FrameDraw, OverlayInfo, RenderBackend, RenderError};
use crate::scene::{self, DomainTag, NodeKind, SceneGraph};
use crate::types::{AgentRecord, OfficeTemplate, Partner};

pub use resources::ResourceTable;

#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error(transparent)]
    UnknownTemplate(#[from] UnknownTemplateError),
    #[error("render backend failed: {0}")]
    Render(#[from] RenderError),
    #[error("invalid viewport config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("viewport is not mounted")]
    NotMounted,
}

type AgentCallback = Box<dyn FnMut(&str)>;
type KioskCallback = Box<dyn FnMut(usize)>;

pub struct ViewportHost<B: RenderBackend, I: InputSurface> {
    backend: B,
    input: I,
    config: ViewportConfig,
    template: OfficeTemplate,
    agents: Vec<AgentRecord>,
    partners: Vec<Partner>,
    scene: SceneGraph,
    resources: ResourceTable,
    camera: OrbitCamera,
    size: ViewportSize,
    listeners: Option<ViewportListeners>,
    drag: Option<DragCapture>,
    mounted: bool,
    running: bool,
    fps: f32,
    last_pick: Option<PickResult>,
    on_agent_picked: Option<AgentCallback>,
    on_kiosk_picked: Option<KioskCallback>,
}

impl<B: RenderBackend, I: InputSurface> ViewportHost<B, I> {
    /// Resolves the template before touching `input` or `backend`, so an
    /// unknown id leaves both untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn mount(
        mut backend: B,
        mut input: I,
        config: ViewportConfig,
        template_id: &str,
        agents: Vec<AgentRecord>,
        partners: Vec<Partner>,
        size: ViewportSize,
    ) -> Result<Self, ViewportError> {
        config.validate()?;
        let template = get_template(template_id)?;

        let listeners = ViewportListeners::attach(&mut input);
        backend.resize(size);
        let camera = OrbitCamera::new(config.orbit.clone(), config.projection);

        let mut host = Self {
            backend,
            input,
            config,
            template,
            agents,
            partners,
            scene: SceneGraph::new(),
            resources: ResourceTable::default(),
            camera,
            size,
            listeners: Some(listeners),
            drag: None,
            mounted: true,
            running: true,
            fps: 0.0,
            last_pick: None,
            on_agent_picked: None,
            on_kiosk_picked: None,
        };
        // A failed first build drops the host, which unmounts it
        host.rebuild()?;
        info!(
            "mounted {} ({} nodes, {} pickable) at {}x{}",
            host.template.id,
            host.scene.len(),
            host.scene.pickable_count(),
            size.width,
            size.height
        );
        Ok(host)
    }

    /// Builds and uploads a fresh scene from the current inputs, then frees
    /// the old one.
    pub fn rebuild(&mut self) -> Result<(), ViewportError> {
        if !self.mounted {
            return Err(ViewportError::NotMounted);
        }
        let scene = scene::build(&self.template, &self.agents, &self.partners);
        self.replace_scene(scene)
    }

    /// Uploads `scene` before releasing the current one. If the upload fails
    /// the current scene and its resources are left untouched.
    fn replace_scene(&mut self, scene: SceneGraph) -> Result<(), ViewportError> {
        let resources = ResourceTable::realize(&scene, &mut self.backend)?;
        let released = self.resources.dispose(&self.scene, &mut self.backend);
        debug!("rebuilt {}: released {released}, uploaded {}", self.template.id, resources.live());
        self.scene = scene;
        self.resources = resources;
        self.last_pick = None;
        Ok(())
    }

    /// Switches layout. Same id is a no-op. An unknown id or a failed upload
    /// keeps the current template and scene.
    pub fn set_template(&mut self, template_id: &str) -> Result<(), ViewportError> {
        if !self.mounted {
            return Err(ViewportError::NotMounted);
        }
        let template = get_template(template_id)?;
        if template.id == self.template.id {
            return Ok(());
        }
        let scene = scene::build(&template, &self.agents, &self.partners);
        self.replace_scene(scene)?;
        info!("switched template {} -> {}", self.template.id, template.id);
        self.template = template;
        Ok(())
    }

    pub fn set_template_id(&mut self, id: TemplateId) -> Result<(), ViewportError> {
        self.set_template(id.as_str())
    }

    /// Replaces the roster. Kept only if the new scene uploads.
    pub fn set_agents(&mut self, agents: Vec<AgentRecord>) -> Result<(), ViewportError> {
        if !self.mounted {
            return Err(ViewportError::NotMounted);
        }
        let scene = scene::build(&self.template, &agents, &self.partners);
        self.replace_scene(scene)?;
        self.agents = agents;
        Ok(())
    }

    pub fn set_partners(&mut self, partners: Vec<Partner>) -> Result<(), ViewportError> {
        if !self.mounted {
            return Err(ViewportError::NotMounted);
        }
        let scene = scene::build(&self.template, &self.agents, &partners);
        self.replace_scene(scene)?;
        self.partners = partners;
        Ok(())
    }

    pub fn on_agent_picked(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_agent_picked = Some(Box::new(callback));
    }

    pub fn on_kiosk_picked(&mut self, callback: impl FnMut(usize) + 'static) {
        self.on_kiosk_picked = Some(Box::new(callback));
    }

    /// Pure query; does not fire callbacks
    pub fn pick_at(&self, pointer: Vec2) -> Option<PickResult> {
        if !self.mounted {
            return None;
        }
        picking::pick(pointer, self.size, &self.camera, &self.scene)
    }

    /// Picks and notifies the matching callback
    pub fn click(&mut self, pointer: Vec2) -> Option<PickResult> {
        let hit = self.pick_at(pointer)?;
        match &hit.tag {
            DomainTag::Agent { id } => {
                info!("agent picked: {id}");
                if let Some(callback) = self.on_agent_picked.as_mut() {
                    callback(id);
                }
            }
            DomainTag::Kiosk { index } => {
                info!("kiosk picked: {index}");
                if let Some(callback) = self.on_kiosk_picked.as_mut() {
                    callback(*index);
                }
            }
        }
        self.last_pick = Some(hit.clone());
        Some(hit)
    }

    /// One render-loop step: spin avatars, then draw
    pub fn tick(&mut self, frame: &FrameInfo) -> Result<(), ViewportError> {
        if !self.mounted || !self.running {
            return Ok(());
        }
        self.spin_avatars();
        if frame.delta > 0.0 {
            let instant = 1.0 / frame.delta;
            self.fps = if self.fps == 0.0 { instant } else { self.fps * 0.9 + instant * 0.1 };
        }

        let items = self.resources.draw_items(&self.scene);
        let draw = FrameDraw {
            view_proj: self.camera.view_projection(self.size.aspect()),
            eye: self.camera.pose().eye,
            clear_color: hex_to_rgb(self.config.clear_color),
            items: &items,
            overlay: self.config.show_hud.then(|| self.overlay()),
        };
        self.backend.draw(&draw)?;
        Ok(())
    }

    fn spin_avatars(&mut self) {
        let step = Quat::from_rotation_y(self.config.avatar_spin);
        let avatars: Vec<_> = self
            .scene
            .iter()
            .filter(|(_, node)| node.kind == NodeKind::Avatar && node.tag.is_some())
            .map(|(id, _)| id)
            .collect();
        for id in avatars {
            if let Some(node) = self.scene.node_mut(id) {
                node.transform.rotation = (step * node.transform.rotation).normalize();
            }
        }
    }

    fn overlay(&self) -> OverlayInfo {
        OverlayInfo {
            template: self.template.id,
            template_name: self.template.name,
            description: self.template.description,
            accent: self.template.accent,
            camera: self.camera.state(),
            fps: self.fps,
            nodes: self.scene.len(),
            pickable: self.scene.pickable_count(),
            last_pick: self.last_pick.as_ref().map(PickResult::domain_id),
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        if self.mounted {
            self.running = true;
        }
    }

    /// Full teardown. Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.running = false;
        if let Some(capture) = self.drag.take() {
            capture.release(&mut self.input);
        }
        self.camera.cancel_pan();
        if let Some(listeners) = self.listeners.take() {
            listeners.detach(&mut self.input);
        }
        let released = self.resources.dispose(&self.scene, &mut self.backend);
        self.scene = SceneGraph::new();
        self.backend.dispose_surface();
        self.mounted = false;
        info!("unmounted {}, released {released} meshes", self.template.id);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Scene nodes currently holding GPU resources
    pub fn live_node_count(&self) -> usize {
        self.resources.live()
    }

    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    pub fn partners(&self) -> &[Partner] {
        &self.partners
    }

    pub fn template(&self) -> &OfficeTemplate {
        &self.template
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn last_pick(&self) -> Option<&PickResult> {
        self.last_pick.as_ref()
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn input(&self) -> &I {
        &self.input
    }
}

impl<B: RenderBackend, I: InputSurface> Drop for ViewportHost<B, I> {
    fn drop(&mut self) {
        self.unmount();
    }
}
