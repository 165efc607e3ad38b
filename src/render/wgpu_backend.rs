use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use log::{info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::hud::Hud;
use super::mesh::{tessellate, Vertex};
use super::{DrawItem, FrameDraw, GpuHandle, RenderBackend, RenderError};
use crate::core::display_context::ViewportSize;
use crate::core::gpu_context::{GpuContext, WindowSurface};
use crate::layouts::TemplateId;
use crate::scene::Mesh;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct MeshUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

impl MeshUniform {
    fn from_item(item: &DrawItem) -> Self {
        let m = &item.material;
        Self {
            model: item.model.to_cols_array_2d(),
            color: [m.color[0], m.color[1], m.color[2], m.opacity],
            emissive: [m.emissive[0], m.emissive[1], m.emissive[2], 0.0],
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.uniform_buffer.destroy();
    }
}

/// Rasterizes the scene into a winit window. One vertex/index/uniform
/// buffer set per uploaded mesh.
pub struct WgpuBackend {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: Option<wgpu::Surface<'static>>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_layout: wgpu::BindGroupLayout,
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    meshes: HashMap<GpuHandle, GpuMesh>,
    next_handle: u64,
    hud: Option<Hud>,
}

impl WgpuBackend {
    pub async fn new(window: Arc<Window>, show_hud: bool) -> Result<Self, RenderError> {
        let (gpu, WindowSurface { surface, config }) = GpuContext::for_window(window.clone()).await?;
        let device = gpu.device();

        let depth_view = Self::create_depth_view(device, config.width, config.height);

        let camera_layout = Self::uniform_layout(device, "Camera Bind Group Layout", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let mesh_layout = Self::uniform_layout(device, "Mesh Bind Group Layout", wgpu::ShaderStages::VERTEX_FRAGMENT);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Office Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("office.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Office Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &mesh_layout],
            push_constant_ranges: &[],
        });

        let opaque_pipeline = Self::create_pipeline(device, &pipeline_layout, &shader, config.format, false);
        let translucent_pipeline = Self::create_pipeline(device, &pipeline_layout, &shader, config.format, true);

        let hud = show_hud.then(|| Hud::new(&window, device, config.format));

        info!(
            "wgpu backend ready: {}x{} {:?}{}",
            config.width,
            config.height,
            config.format,
            if show_hud { " with HUD" } else { "" }
        );

        Ok(Self {
            window,
            gpu,
            surface: Some(surface),
            surface_config: config,
            depth_view,
            camera_buffer,
            camera_bind_group,
            mesh_layout,
            opaque_pipeline,
            translucent_pipeline,
            meshes: HashMap::new(),
            next_handle: 0,
            hud,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Forwards a window event to the HUD. Returns true when it was consumed.
    pub fn handle_window_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        match self.hud.as_mut() {
            Some(hud) => hud.on_window_event(&self.window, event),
            None => false,
        }
    }

    /// Template picked in the HUD since the last call
    pub fn take_template_request(&mut self) -> Option<TemplateId> {
        self.hud.as_mut().and_then(Hud::take_template_request)
    }

    fn uniform_layout(device: &wgpu::Device, label: &str, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        translucent: bool,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(if translucent { "Translucent Pipeline" } else { "Opaque Pipeline" }),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(if translucent {
                        wgpu::BlendState::ALPHA_BLENDING
                    } else {
                        wgpu::BlendState::REPLACE
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                // Translucent glass is tested against, but never hides, what lies behind it
                depth_write_enabled: !translucent,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }
}

/// Opaque items first, then translucent ones back to front. Items whose
/// handle fails `is_live` are skipped.
fn draw_order<'a>(
    items: &'a [DrawItem],
    eye: Vec3,
    is_live: impl Fn(GpuHandle) -> bool,
) -> (Vec<&'a DrawItem>, Vec<&'a DrawItem>) {
    let (opaque, mut translucent): (Vec<&DrawItem>, Vec<&DrawItem>) = items
        .iter()
        .filter(|item| is_live(item.handle))
        .partition(|item| !item.material.is_translucent());
    let depth = |item: &DrawItem| item.model.w_axis.truncate().distance_squared(eye);
    translucent.sort_by(|a, b| depth(*b).total_cmp(&depth(*a)));
    (opaque, translucent)
}

impl RenderBackend for WgpuBackend {
    fn upload(&mut self, mesh: &Mesh) -> Result<GpuHandle, RenderError> {
        if self.surface.is_none() {
            return Err(RenderError::SurfaceDisposed);
        }
        let data = tessellate(&mesh.shape);
        if data.indices.is_empty() {
            return Err(RenderError::Upload(format!("{:?} produced no triangles", mesh.shape)));
        }
        let device = self.gpu.device();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Uniform Buffer"),
            size: std::mem::size_of::<MeshUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &self.mesh_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let handle = GpuHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: data.indices.len() as u32,
                uniform_buffer,
                bind_group,
            },
        );
        Ok(handle)
    }

    fn release(&mut self, handle: GpuHandle) {
        match self.meshes.remove(&handle) {
            Some(mesh) => mesh.destroy(),
            None => warn!("release of unknown handle {handle:?}"),
        }
    }

    fn resize(&mut self, size: ViewportSize) {
        if size.is_empty() {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        if let Some(surface) = &self.surface {
            surface.configure(self.gpu.device(), &self.surface_config);
        }
        self.depth_view = Self::create_depth_view(self.gpu.device(), size.width, size.height);
    }

    fn draw(&mut self, frame: &FrameDraw<'_>) -> Result<(), RenderError> {
        let Some(surface) = self.surface.as_ref() else {
            return Err(RenderError::SurfaceDisposed);
        };
        let output = match surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let queue = self.gpu.queue();
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform {
                view_proj: frame.view_proj.to_cols_array_2d(),
                eye: frame.eye.extend(1.0).to_array(),
            }]),
        );

        let (opaque, translucent) = draw_order(frame.items, frame.eye, |handle| self.meshes.contains_key(&handle));
        for item in opaque.iter().chain(translucent.iter()) {
            if let Some(mesh) = self.meshes.get(&item.handle) {
                queue.write_buffer(&mesh.uniform_buffer, 0, bytemuck::cast_slice(&[MeshUniform::from_item(item)]));
            }
        }

        let mut encoder = self.gpu.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Office Render Encoder"),
        });

        {
            let [r, g, b] = frame.clear_color.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Office Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for (pipeline, items) in [(&self.opaque_pipeline, &opaque), (&self.translucent_pipeline, &translucent)] {
                render_pass.set_pipeline(pipeline);
                for item in items {
                    let Some(mesh) = self.meshes.get(&item.handle) else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &mesh.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        if let (Some(hud), Some(overlay)) = (self.hud.as_mut(), frame.overlay.as_ref()) {
            hud.render(
                &self.window,
                self.gpu.device(),
                self.gpu.queue(),
                &mut encoder,
                &view,
                [self.surface_config.width, self.surface_config.height],
                overlay,
            );
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn dispose_surface(&mut self) {
        if !self.meshes.is_empty() {
            warn!("disposing surface with {} meshes still uploaded", self.meshes.len());
            for (_, mesh) in self.meshes.drain() {
                mesh.destroy();
            }
        }
        self.hud = None;
        self.surface = None;
    }

    fn live_resources(&self) -> usize {
        self.meshes.len()
    }
}
