//! GPU resource seam. The viewport only ever talks to a [`RenderBackend`];
//! the windowed binary plugs in wgpu, tests and headless runs use the
//! bookkeeping backend.

pub mod headless;
pub mod hud;
pub mod mesh;
pub mod wgpu_backend;

use glam::{Mat4, Vec3};

use crate::camera::CameraState;
use crate::core::display_context::ViewportSize;
use crate::layouts::TemplateId;
use crate::scene::{Material, Mesh};

pub use headless::HeadlessBackend;
pub use wgpu_backend::WgpuBackend;

/// Opaque reference to one uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpuHandle(pub u64);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render surface has been disposed")]
    SurfaceDisposed,
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("GPU setup failed: {0}")]
    Setup(String),
    #[error("mesh upload failed: {0}")]
    Upload(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub handle: GpuHandle,
    pub model: Mat4,
    pub material: Material,
}

/// Read-only numbers for the debug overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayInfo {
    pub template: TemplateId,
    pub template_name: &'static str,
    pub description: &'static str,
    /// 0xRRGGBB
    pub accent: u32,
    pub camera: CameraState,
    pub fps: f32,
    pub nodes: usize,
    pub pickable: usize,
    pub last_pick: Option<String>,
}

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone)]
pub struct FrameDraw<'a> {
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub clear_color: [f32; 3],
    pub items: &'a [DrawItem],
    pub overlay: Option<OverlayInfo>,
}

pub trait RenderBackend {
    fn upload(&mut self, mesh: &Mesh) -> Result<GpuHandle, RenderError>;

    /// Frees one mesh. Releasing an unknown handle is logged, never fatal.
    fn release(&mut self, handle: GpuHandle);

    fn resize(&mut self, size: ViewportSize);

    fn draw(&mut self, frame: &FrameDraw<'_>) -> Result<(), RenderError>;

    /// Tears down the presentation surface. Later uploads and draws fail
    /// with [`RenderError::SurfaceDisposed`].
    fn dispose_surface(&mut self);

    fn live_resources(&self) -> usize;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn upload(&mut self, mesh: &Mesh) -> Result<GpuHandle, RenderError> {
        (**self).upload(mesh)
    }

    fn release(&mut self, handle: GpuHandle) {
        (**self).release(handle)
    }

    fn resize(&mut self, size: ViewportSize) {
        (**self).resize(size)
    }

    fn draw(&mut self, frame: &FrameDraw<'_>) -> Result<(), RenderError> {
        (**self).draw(frame)
    }

    fn dispose_surface(&mut self) {
        (**self).dispose_surface()
    }

    fn live_resources(&self) -> usize {
        (**self).live_resources()
    }
}
