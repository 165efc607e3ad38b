use log::debug;

use crate::render::{DrawItem, GpuHandle, RenderBackend, RenderError};
use crate::scene::{NodeId, SceneGraph};

/// GPU handles for a scene, indexed by node. Each slot is taken exactly once
/// on dispose, so disposing twice releases nothing the second time.
#[derive(Debug, Default)]
pub struct ResourceTable {
    handles: Vec<Option<GpuHandle>>,
}

impl ResourceTable {
    /// Uploads every mesh in `scene`. On failure everything uploaded so far
    /// is released before the error is returned.
    pub fn realize<B: RenderBackend + ?Sized>(scene: &SceneGraph, backend: &mut B) -> Result<Self, RenderError> {
        let mut table = Self {
            handles: vec![None; scene.len()],
        };
        for (id, mesh) in scene.mesh_nodes() {
            match backend.upload(mesh) {
                Ok(handle) => table.handles[id.0] = Some(handle),
                Err(e) => {
                    let released = table.dispose(scene, backend);
                    debug!("upload failed at node {}, rolled back {released} meshes", id.0);
                    return Err(e);
                }
            }
        }
        Ok(table)
    }

    /// Releases handles children-first. Returns how many were released.
    pub fn dispose<B: RenderBackend + ?Sized>(&mut self, scene: &SceneGraph, backend: &mut B) -> usize {
        let mut released = 0;
        for id in scene.post_order() {
            if let Some(handle) = self.handles.get_mut(id.0).and_then(Option::take) {
                backend.release(handle);
                released += 1;
            }
        }
        // Anything the scene no longer reaches
        for handle in self.handles.drain(..).flatten() {
            backend.release(handle);
            released += 1;
        }
        released
    }

    pub fn live(&self) -> usize {
        self.handles.iter().flatten().count()
    }

    pub fn handle(&self, id: NodeId) -> Option<GpuHandle> {
        self.handles.get(id.0).copied().flatten()
    }

    pub fn draw_items(&self, scene: &SceneGraph) -> Vec<DrawItem> {
        scene
            .mesh_nodes()
            .filter_map(|(id, mesh)| {
                self.handle(id).map(|handle| DrawItem {
                    handle,
                    model: scene.world_matrix(id),
                    material: mesh.material,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::{self, TemplateId};
    use crate::render::HeadlessBackend;
    use crate::scene;

    fn scene() -> SceneGraph {
        scene::build(&layouts::template(TemplateId::Assistant), &[], &[])
    }

    #[test]
    fn test_realize_uploads_every_mesh() {
        let scene = scene();
        let mut backend = HeadlessBackend::new();
        let table = ResourceTable::realize(&scene, &mut backend).unwrap();
        assert_eq!(table.live(), scene.mesh_nodes().count());
        assert_eq!(backend.live_resources(), table.live());
        assert_eq!(table.draw_items(&scene).len(), table.live());
    }

    #[test]
    fn test_dispose_is_exactly_once() {
        let scene = scene();
        let mut backend = HeadlessBackend::new();
        let mut table = ResourceTable::realize(&scene, &mut backend).unwrap();
        let first = table.dispose(&scene, &mut backend);
        assert_eq!(first, backend.uploads);
        assert_eq!(table.dispose(&scene, &mut backend), 0);
        assert_eq!(backend.double_releases, 0);
        assert_eq!(backend.live_resources(), 0);
    }

    #[test]
    fn test_failed_realize_rolls_back() {
        let scene = scene();
        let mut backend = HeadlessBackend::failing_after(5);
        assert!(ResourceTable::realize(&scene, &mut backend).is_err());
        assert_eq!(backend.live_resources(), 0);
        assert_eq!(backend.releases, 5);
    }
}
