//! Render scene: lights plus the scene graphs of loaded assets.
//!
//! The renderer polls [`Scene::is_dirty`] and re-uploads geometry only when
//! the scene changed since the last [`Scene::mark_rendered`].

mod graph;
mod material;

pub use graph::{Mesh, MeshInstance, Primitive, SceneGraph, SceneNode};
use glam::Vec3;
pub use material::{Material, StandardMaterial, UnlitMaterial};

use crate::options::LightingOptions;

/// Ambient plus one directional light.
#[derive(Debug, Clone, PartialEq)]
pub struct Lights {
    /// Ambient color premultiplied by intensity.
    pub ambient: Vec3,
    /// Directional color premultiplied by intensity.
    pub directional: Vec3,
    /// Unit vector pointing from the scene toward the light.
    pub to_light: Vec3,
}

impl Lights {
    /// Lights described by the lighting options.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        Self {
            ambient: Vec3::from_array(options.ambient_color)
                * options.ambient_intensity,
            directional: Vec3::from_array(options.directional_color)
                * options.directional_intensity,
            to_light: Vec3::from_array(options.directional_position)
                .try_normalize()
                .unwrap_or(Vec3::Y),
        }
    }
}

/// The displayed scene. Starts empty; loaded assets are appended.
#[derive(Debug, Clone)]
pub struct Scene {
    lights: Lights,
    graphs: Vec<SceneGraph>,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
    /// Generation that was last consumed by the renderer.
    rendered_generation: u64,
}

impl Scene {
    /// Empty scene with the given lights.
    #[must_use]
    pub fn new(lights: Lights) -> Self {
        Self {
            lights,
            graphs: Vec::new(),
            generation: 0,
            rendered_generation: 0,
        }
    }

    /// Add a loaded asset.
    pub fn add(&mut self, graph: SceneGraph) {
        self.graphs.push(graph);
        self.generation += 1;
    }

    /// Loaded assets in insertion order.
    #[must_use]
    pub fn graphs(&self) -> &[SceneGraph] {
        &self.graphs
    }

    /// Scene lights.
    #[must_use]
    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    /// Whether the scene changed since the last `mark_rendered()`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Mark the current generation as uploaded.
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }
}
