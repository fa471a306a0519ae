//! Scene rendering.
//!
//! [`SceneRenderer`] owns the camera and light uniforms, the depth target
//! and one [`mesh_pass`] that draws everything the scene holds.

pub mod mesh_pass;
pub(crate) mod pipeline_util;

use crate::camera::{Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTexture;
use crate::scene::{Lights, Scene};
use mesh_pass::{BakedGeometry, MeshPass};

/// GPU layout of [`Lights`]; each `vec3` is padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LightsUniform {
    ambient: [f32; 3],
    _pad0: f32,
    directional: [f32; 3],
    _pad1: f32,
    to_light: [f32; 3],
    _pad2: f32,
}

impl LightsUniform {
    fn from_lights(lights: &Lights) -> Self {
        Self {
            ambient: lights.ambient.to_array(),
            _pad0: 0.0,
            directional: lights.directional.to_array(),
            _pad1: 0.0,
            to_light: lights.to_light.to_array(),
            _pad2: 0.0,
        }
    }
}

/// Draws a [`Scene`] from a [`Camera`] into the surface.
pub struct SceneRenderer {
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth: DepthTexture,
    mesh_pass: MeshPass,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    /// Create pipelines and uniforms for the current surface.
    #[must_use]
    pub fn new(context: &RenderContext, clear_color: [f32; 3]) -> Self {
        let device = &context.device;
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lights Buffer"),
            size: size_of::<LightsUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                pipeline_util::uniform_buffer(0),
                pipeline_util::uniform_buffer(1),
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline = mesh_pass::create_mesh_pipeline(context, &[&layout]);
        let [r, g, b] = clear_color.map(f64::from);

        Self {
            camera_buffer,
            lights_buffer,
            bind_group,
            depth: DepthTexture::new(device, context.config.width, context.config.height),
            mesh_pass: MeshPass::new(pipeline),
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        }
    }

    /// Recreate the depth target after the surface was resized.
    pub fn resize(&mut self, context: &RenderContext) {
        self.depth = DepthTexture::new(
            &context.device,
            context.config.width,
            context.config.height,
        );
    }

    /// Draw one frame. Scene geometry is re-uploaded only when the scene
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the next frame cannot be acquired.
    pub fn render(
        &mut self,
        context: &RenderContext,
        camera: &Camera,
        scene: &mut Scene,
    ) -> Result<(), wgpu::SurfaceError> {
        if scene.is_dirty() {
            let geometry = BakedGeometry::from_scene(scene);
            log::debug!(
                "uploading {} vertices, {} indices",
                geometry.vertices.len(),
                geometry.indices.len()
            );
            self.mesh_pass.upload(&context.device, &geometry);
            context.queue.write_buffer(
                &self.lights_buffer,
                0,
                bytemuck::bytes_of(&LightsUniform::from_lights(scene.lights())),
            );
            scene.mark_rendered();
        }

        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(camera)),
        );

        let frame = context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = context.create_encoder();
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            rp.set_bind_group(0, &self.bind_group, &[]);
            self.mesh_pass.draw(&mut rp);
        }
        context.submit(encoder);
        frame.present();
        Ok(())
    }
}
