//! Indexed-mesh draw pass for loaded scene graphs.
//!
//! Every mesh instance is baked into world space on upload, so the whole
//! scene draws with one vertex buffer, one index buffer and one draw call.
//! Uploads only happen when the scene changes.

use glam::{Mat3, Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::renderer::pipeline_util;
use crate::scene::{Primitive, Scene, SceneGraph};

/// World-space vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// World-space unit normal.
    pub normal: [f32; 3],
    /// Linear RGBA surface color.
    pub color: [f32; 4],
    /// 1.0 if lights apply, 0.0 for unlit materials.
    pub lit: f32,
}

impl SceneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
        3 => Float32,
    ];

    /// Vertex buffer layout matching `shaders/mesh.wgsl`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side geometry for the whole scene.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BakedGeometry {
    /// Vertices of every instance, in world space.
    pub vertices: Vec<SceneVertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl BakedGeometry {
    /// Bake every reachable mesh instance of every graph in the scene.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let mut baked = Self::default();
        for graph in scene.graphs() {
            baked.push_graph(graph);
        }
        baked
    }

    fn push_graph(&mut self, graph: &SceneGraph) {
        for instance in graph.mesh_instances() {
            for primitive in &graph.meshes[instance.mesh].primitives {
                self.push_primitive(graph, primitive, instance.world);
            }
        }
    }

    fn push_primitive(&mut self, graph: &SceneGraph, primitive: &Primitive, world: Mat4) {
        let material = graph.materials.get(primitive.material).cloned().unwrap_or_default();
        let tint = material.diffuse_color();
        let lit = if material.is_lit() { 1.0 } else { 0.0 };
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

        let base = self.vertices.len() as u32;
        for (i, position) in primitive.positions.iter().enumerate() {
            let normal = primitive.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
            let color = primitive.colors.get(i).copied().unwrap_or([1.0; 4]);
            self.vertices.push(SceneVertex {
                position: world.transform_point3(Vec3::from_array(*position)).to_array(),
                normal: (normal_matrix * Vec3::from_array(normal))
                    .try_normalize()
                    .unwrap_or(Vec3::Y)
                    .to_array(),
                color: [
                    color[0] * tint[0],
                    color[1] * tint[1],
                    color[2] * tint[2],
                    color[3] * tint[3],
                ],
                lit,
            });
        }
        self.indices.extend(primitive.indices.iter().map(|i| base + i));
    }
}

/// Create the scene mesh pipeline.
pub(crate) fn create_mesh_pipeline(
    context: &RenderContext,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let shader = context
        .device
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        },
    );

    context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SceneVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &pipeline_util::color_target(context.format()),
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(pipeline_util::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}

/// Pipeline plus the uploaded scene buffers.
pub(crate) struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    buffers: Option<(wgpu::Buffer, wgpu::Buffer)>,
    index_count: u32,
}

impl MeshPass {
    pub fn new(pipeline: wgpu::RenderPipeline) -> Self {
        Self {
            pipeline,
            buffers: None,
            index_count: 0,
        }
    }

    /// Replace the uploaded geometry.
    pub fn upload(&mut self, device: &wgpu::Device, geometry: &BakedGeometry) {
        if geometry.indices.is_empty() {
            self.buffers = None;
            self.index_count = 0;
            return;
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Vertex Buffer"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.buffers = Some((vertex_buffer, index_buffer));
        self.index_count = geometry.indices.len() as u32;
    }

    /// Set pipeline and buffers, then draw.
    ///
    /// Caller must set bind groups before calling this.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        let Some((vertices, indices)) = &self.buffers else {
            return;
        };
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, vertices.slice(..));
        render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LightingOptions;
    use crate::scene::{Lights, Material, Mesh, SceneNode, StandardMaterial};

    fn graph(offset: Vec3, metalness: f32) -> SceneGraph {
        SceneGraph {
            nodes: vec![SceneNode {
                name: None,
                transform: Mat4::from_translation(offset),
                children: vec![],
                mesh: Some(0),
            }],
            roots: vec![0],
            meshes: vec![Mesh {
                name: None,
                primitives: vec![Primitive {
                    positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                    normals: vec![[0.0, 0.0, 1.0]; 3],
                    colors: vec![[0.5, 1.0, 1.0, 1.0]; 3],
                    indices: vec![0, 1, 2],
                    material: 0,
                }],
            }],
            materials: vec![Material::Standard(StandardMaterial {
                metalness,
                ..Default::default()
            })],
        }
    }

    #[test]
    fn baking_applies_world_transform_and_rebases_indices() {
        let mut scene = Scene::new(Lights::from_options(&LightingOptions::default()));
        scene.add(graph(Vec3::new(0.0, 0.0, -5.0), 0.0));
        scene.add(graph(Vec3::new(10.0, 0.0, 0.0), 0.0));
        let baked = BakedGeometry::from_scene(&scene);
        assert_eq!(baked.vertices.len(), 6);
        assert_eq!(baked.indices, [0, 1, 2, 3, 4, 5]);
        assert_eq!(baked.vertices[0].position, [0.0, 0.0, -5.0]);
        assert_eq!(baked.vertices[4].position, [11.0, 0.0, 0.0]);
        assert_eq!(baked.vertices[0].color, [0.5, 1.0, 1.0, 1.0]);
        assert_eq!(baked.vertices[0].lit, 1.0);
    }

    #[test]
    fn metallic_surfaces_bake_dark() {
        let mut scene = Scene::new(Lights::from_options(&LightingOptions::default()));
        scene.add(graph(Vec3::ZERO, 1.0));
        let baked = BakedGeometry::from_scene(&scene);
        assert_eq!(baked.vertices[0].color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_scene_bakes_nothing() {
        let scene = Scene::new(Lights::from_options(&LightingOptions::default()));
        assert_eq!(BakedGeometry::from_scene(&scene), BakedGeometry::default());
    }
}
