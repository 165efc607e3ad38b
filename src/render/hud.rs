use winit::window::Window;

use super::OverlayInfo;
use crate::layouts::{self, TemplateId};

fn accent_color(hex: u32) -> egui::Color32 {
    egui::Color32::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// egui debug overlay: frame rate, camera, template switcher and last pick
pub struct Hud {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    template_request: Option<TemplateId>,
}

impl Hud {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self {
            ctx,
            state,
            renderer,
            template_request: None,
        }
    }

    /// Returns true when egui consumed the event
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn take_template_request(&mut self) -> Option<TemplateId> {
        self.template_request.take()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        overlay: &OverlayInfo,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let mut requested = None;

        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Office")
                .title_bar(true)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .default_width(240.0)
                .show(ctx, |ui| {
                    ui.heading(
                        egui::RichText::new(format!("{:.0} FPS", overlay.fps))
                            .size(28.0)
                            .color(accent_color(overlay.accent)),
                    );
                    ui.label(egui::RichText::new(overlay.template_name).size(16.0).strong());
                    ui.label(egui::RichText::new(overlay.description).color(egui::Color32::GRAY));

                    ui.add_space(5.0);
                    ui.separator();

                    ui.monospace(format!("Distance: {:.1}", overlay.camera.distance));
                    ui.monospace(format!("Azimuth:  {:.1}°", overlay.camera.azimuth.to_degrees()));
                    ui.monospace(format!("Polar:    {:.1}°", overlay.camera.polar.to_degrees()));
                    ui.monospace(format!("Nodes: {}  Pickable: {}", overlay.nodes, overlay.pickable));
                    ui.monospace(format!("Last pick: {}", overlay.last_pick.as_deref().unwrap_or("-")));

                    ui.add_space(5.0);
                    ui.separator();

                    ui.horizontal(|ui| {
                        for id in TemplateId::ALL {
                            let label = layouts::template(id).name;
                            if ui.add_enabled(id != overlay.template, egui::Button::new(label)).clicked() {
                                requested = Some(id);
                            }
                        }
                    });
                });
        });

        if requested.is_some() {
            self.template_request = requested;
        }

        self.state.handle_platform_output(window, full_output.platform_output);

        let tris = self.ctx.tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer.update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let mut render_pass = render_pass.forget_lifetime();
            self.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
