use std::collections::BTreeSet;

use log::warn;

use super::{FrameDraw, GpuHandle, RenderBackend, RenderError};
use crate::core::display_context::ViewportSize;
use crate::scene::Mesh;

/// Backend that only keeps books. Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    live: BTreeSet<GpuHandle>,
    pub uploads: usize,
    pub releases: usize,
    pub double_releases: usize,
    pub draws: usize,
    pub last_draw_items: usize,
    pub size: Option<ViewportSize>,
    pub surface_disposed: bool,
    fail_after: Option<usize>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads past the first `successful` ones fail
    pub fn failing_after(successful: usize) -> Self {
        Self {
            fail_after: Some(successful),
            ..Self::default()
        }
    }

    pub fn is_live(&self, handle: GpuHandle) -> bool {
        self.live.contains(&handle)
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload(&mut self, _mesh: &Mesh) -> Result<GpuHandle, RenderError> {
        if self.surface_disposed {
            return Err(RenderError::SurfaceDisposed);
        }
        if self.fail_after.is_some_and(|limit| self.uploads >= limit) {
            return Err(RenderError::Upload(format!("simulated failure after {} uploads", self.uploads)));
        }
        let handle = GpuHandle(self.next_handle);
        self.next_handle += 1;
        self.uploads += 1;
        self.live.insert(handle);
        Ok(handle)
    }

    fn release(&mut self, handle: GpuHandle) {
        if self.live.remove(&handle) {
            self.releases += 1;
        } else {
            self.double_releases += 1;
            warn!("release of unknown handle {handle:?}");
        }
    }

    fn resize(&mut self, size: ViewportSize) {
        self.size = Some(size);
    }

    fn draw(&mut self, frame: &FrameDraw<'_>) -> Result<(), RenderError> {
        if self.surface_disposed {
            return Err(RenderError::SurfaceDisposed);
        }
        self.draws += 1;
        self.last_draw_items = frame.items.len();
        Ok(())
    }

    fn dispose_surface(&mut self) {
        self.surface_disposed = true;
    }

    fn live_resources(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, Shape};
    use glam::Vec3;

    fn cube() -> Mesh {
        Mesh {
            shape: Shape::Cuboid { size: Vec3::ONE },
            material: Material::solid(0xffffff),
        }
    }

    #[test]
    fn test_upload_release_counts() {
        let mut backend = HeadlessBackend::new();
        let a = backend.upload(&cube()).unwrap();
        let b = backend.upload(&cube()).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.live_resources(), 2);

        backend.release(a);
        backend.release(a);
        assert_eq!(backend.releases, 1);
        assert_eq!(backend.double_releases, 1);
        assert!(backend.is_live(b));
    }

    #[test]
    fn test_disposed_surface_rejects_work() {
        let mut backend = HeadlessBackend::new();
        backend.dispose_surface();
        assert!(matches!(backend.upload(&cube()), Err(RenderError::SurfaceDisposed)));
    }

    #[test]
    fn test_simulated_failure() {
        let mut backend = HeadlessBackend::failing_after(1);
        assert!(backend.upload(&cube()).is_ok());
        assert!(matches!(backend.upload(&cube()), Err(RenderError::Upload(_))));
    }
}
