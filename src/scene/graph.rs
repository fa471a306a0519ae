use glam::Mat4;

use super::material::Material;

/// Triangle list sharing one material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitive {
    /// Vertex positions in mesh space.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, one per position.
    pub normals: Vec<[f32; 3]>,
    /// Linear RGBA vertex colors, one per position.
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
    /// Index into [`SceneGraph::materials`].
    pub material: usize,
}

impl Primitive {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A named group of primitives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Mesh name from the asset, if any.
    pub name: Option<String>,
    /// Drawable primitives.
    pub primitives: Vec<Primitive>,
}

/// Node of the transform hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Node name from the asset, if any.
    pub name: Option<String>,
    /// Transform relative to the parent node.
    pub transform: Mat4,
    /// Indices of child nodes.
    pub children: Vec<usize>,
    /// Index into [`SceneGraph::meshes`], if the node carries a mesh.
    pub mesh: Option<usize>,
}

/// A mesh placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    /// Index into [`SceneGraph::meshes`].
    pub mesh: usize,
    /// Accumulated node transform.
    pub world: Mat4,
}

/// A decoded asset: nodes, meshes and materials.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    /// All nodes, referenced by index.
    pub nodes: Vec<SceneNode>,
    /// Nodes without a parent in the displayed scene.
    pub roots: Vec<usize>,
    /// All meshes, referenced by index.
    pub meshes: Vec<Mesh>,
    /// All materials, referenced by index.
    pub materials: Vec<Material>,
}

impl SceneGraph {
    /// Every mesh reachable from the roots with its world transform, in
    /// depth-first order.
    ///
    /// Out-of-range indices are skipped and no node is visited twice, so a
    /// malformed hierarchy cannot loop.
    #[must_use]
    pub fn mesh_instances(&self) -> Vec<MeshInstance> {
        let mut instances = Vec::new();
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(usize, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&root| (root, Mat4::IDENTITY))
            .collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            let world = parent * node.transform;
            if let Some(mesh) = node.mesh.filter(|&m| m < self.meshes.len()) {
                instances.push(MeshInstance { mesh, world });
            }
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
        instances
    }

    /// Set metalness to zero on every material used by a reachable mesh.
    /// Material kinds without metalness are left alone. Returns the number
    /// of materials changed.
    pub fn normalize_metalness(&mut self) -> usize {
        let mut used = vec![false; self.materials.len()];
        for instance in self.mesh_instances() {
            for primitive in &self.meshes[instance.mesh].primitives {
                if let Some(flag) = used.get_mut(primitive.material) {
                    *flag = true;
                }
            }
        }

        let mut changed = 0;
        for (material, _) in self
            .materials
            .iter_mut()
            .zip(used)
            .filter(|(_, used)| *used)
        {
            if let Some(metalness) = material.metalness_mut() {
                *metalness = 0.0;
                changed += 1;
            }
        }
        changed
    }

    /// Total triangles across all reachable mesh instances.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.mesh_instances()
            .iter()
            .flat_map(|i| &self.meshes[i.mesh].primitives)
            .map(Primitive::triangle_count)
            .sum()
    }
}
