//! glTF / GLB decoding into a [`SceneGraph`].
//!
//! Only what the flat renderer draws is extracted: the node hierarchy,
//! triangle primitives (positions, normals, vertex colors, indices) and
//! material factors. Textures are not decoded. Documents are validated
//! first, so dangling indices are decode errors.

use std::path::Path;

use glam::{Mat4, Vec3};
use gltf::mesh::Mode;

use crate::error::ViewerError;
use crate::scene::{
    Material, Mesh, Primitive, SceneGraph, SceneNode, StandardMaterial,
    UnlitMaterial,
};

const BASISU_EXTENSION: &str = "KHR_texture_basisu";

/// A decoded asset plus facts about it that matter to the loader.
#[derive(Debug, Clone)]
pub struct DecodedAsset {
    /// The scene graph.
    pub graph: SceneGraph,
    /// Whether the asset declares Basis Universal (KTX2) textures.
    pub basisu_textures: bool,
}

/// Decode GLB (or glTF JSON) bytes.
///
/// `base` is the directory external buffer URIs resolve against; `None`
/// allows only embedded and data-URI buffers.
pub fn decode(bytes: &[u8], base: Option<&Path>) -> Result<DecodedAsset, ViewerError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, base, blob)?;
    let basisu_textures = document.extensions_used().any(|e| e == BASISU_EXTENSION);

    let mut materials: Vec<Material> = document.materials().map(convert_material).collect();
    // Primitives without a material share one default, appended on demand.
    let mut default_material = None;

    let meshes = document
        .meshes()
        .map(|mesh| Mesh {
            name: mesh.name().map(str::to_owned),
            primitives: mesh
                .primitives()
                .filter_map(|prim| {
                    let material = match prim.material().index() {
                        Some(index) => index,
                        None => *default_material.get_or_insert_with(|| {
                            materials.push(Material::default());
                            materials.len() - 1
                        }),
                    };
                    read_primitive(&prim, &buffers, material)
                })
                .collect(),
        })
        .collect();

    let nodes = document
        .nodes()
        .map(|node| SceneNode {
            name: node.name().map(str::to_owned),
            transform: Mat4::from_cols_array_2d(&node.transform().matrix()),
            children: node.children().map(|c| c.index()).collect(),
            mesh: node.mesh().map(|m| m.index()),
        })
        .collect();

    let roots = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().map(|n| n.index()).collect(),
        None => parentless_nodes(&document),
    };

    Ok(DecodedAsset {
        graph: SceneGraph {
            nodes,
            roots,
            meshes,
            materials,
        },
        basisu_textures,
    })
}

fn parentless_nodes(document: &gltf::Document) -> Vec<usize> {
    let mut has_parent = vec![false; document.nodes().len()];
    for child in document.nodes().flat_map(|n| n.children()) {
        if let Some(flag) = has_parent.get_mut(child.index()) {
            *flag = true;
        }
    }
    has_parent
        .iter()
        .enumerate()
        .filter_map(|(i, parented)| (!parented).then_some(i))
        .collect()
}

fn convert_material(material: gltf::Material<'_>) -> Material {
    let name = material.name().map(str::to_owned);
    let pbr = material.pbr_metallic_roughness();
    if material.unlit() {
        Material::Unlit(UnlitMaterial {
            name,
            base_color: pbr.base_color_factor(),
        })
    } else {
        Material::Standard(StandardMaterial {
            name,
            base_color: pbr.base_color_factor(),
            metalness: pbr.metallic_factor(),
        })
    }
}

/// Triangle list for one primitive, or `None` if it has no positions or is
/// not drawn as triangles.
fn read_primitive(
    prim: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
    material: usize,
) -> Option<Primitive> {
    if prim.mode() != Mode::Triangles {
        log::debug!("skipping {:?} primitive", prim.mode());
        return None;
    }
    let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let count = positions.len() as u32;

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..count).collect(),
    };
    let indices = whole_triangles(&indices, count);

    let normals = match reader.read_normals() {
        Some(normals) => normals.collect::<Vec<_>>(),
        None => Vec::new(),
    };
    let normals = if normals.len() == positions.len() {
        normals
    } else {
        smooth_normals(&positions, &indices)
    };

    let colors = reader
        .read_colors(0)
        .map(|c| c.into_rgba_f32().collect::<Vec<_>>())
        .filter(|c| c.len() == positions.len())
        .unwrap_or_else(|| vec![[1.0; 4]; positions.len()]);

    Some(Primitive {
        positions,
        normals,
        colors,
        indices,
        material,
    })
}

/// Triangles whose three indices all address a vertex. A trailing partial
/// triangle is dropped.
fn whole_triangles(indices: &[u32], vertex_count: u32) -> Vec<u32> {
    indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| i < vertex_count))
        .flatten()
        .copied()
        .collect()
}

/// Area-weighted vertex normals for assets that omit them.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let (pa, pb, pc) = (
            Vec3::from_array(positions[a]),
            Vec3::from_array(positions[b]),
            Vec3::from_array(positions[c]),
        );
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal GLB container around a JSON document and binary chunk.
    fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut bin = bin.to_vec();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }
        let total = 12 + 8 + json.len() + 8 + bin.len();

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
        out
    }

    /// One triangle (positions) followed by u16 indices.
    fn triangle_bin() -> Vec<u8> {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mut bin: Vec<u8> = bytemuck::cast_slice(&positions).to_vec();
        for i in [0u16, 1, 2] {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        bin
    }

    const MAP_JSON: &str = r#"{
        "asset": {"version": "2.0"},
        "extensionsUsed": ["KHR_materials_unlit"],
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [
            {"mesh": 0, "translation": [0, 0, -5], "children": [1]},
            {"mesh": 1, "name": "prop"}
        ],
        "meshes": [
            {"primitives": [
                {"attributes": {"POSITION": 0}, "material": 0},
                {"attributes": {"POSITION": 0}, "indices": 1, "material": 1}
            ]},
            {"primitives": [{"attributes": {"POSITION": 0}}]}
        ],
        "materials": [
            {"pbrMetallicRoughness": {"baseColorFactor": [0.5, 0.5, 0.5, 1], "metallicFactor": 0.7}},
            {"extensions": {"KHR_materials_unlit": {}}}
        ],
        "buffers": [{"byteLength": 42}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 6}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [0, 0, 0], "max": [1, 1, 0]},
            {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
        ]
    }"#;

    #[test]
    fn decodes_nodes_meshes_and_materials() {
        let asset = decode(&glb(MAP_JSON, &triangle_bin()), None).unwrap();
        let graph = &asset.graph;
        assert!(!asset.basisu_textures);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.roots, [0]);
        assert_eq!(graph.meshes.len(), 2);
        // Two declared plus the shared default.
        assert_eq!(graph.materials.len(), 3);
        assert!(matches!(graph.materials[1], Material::Unlit(_)));
        assert_eq!(graph.materials[2], Material::default());
        assert_eq!(graph.meshes[1].primitives[0].material, 2);
        assert_eq!(graph.mesh_instances().len(), 2);
        assert_eq!(graph.triangle_count(), 3);
    }

    #[test]
    fn child_inherits_parent_translation() {
        let asset = decode(&glb(MAP_JSON, &triangle_bin()), None).unwrap();
        let instances = asset.graph.mesh_instances();
        let child = instances.iter().find(|i| i.mesh == 1).unwrap();
        let origin = child.world.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-6));
    }

    #[test]
    fn normalization_skips_unlit_and_zeroes_default() {
        let mut graph = decode(&glb(MAP_JSON, &triangle_bin()), None).unwrap().graph;
        assert_eq!(graph.materials[2].metalness(), Some(1.0));
        assert_eq!(graph.normalize_metalness(), 2);
        assert_eq!(graph.materials[0].metalness(), Some(0.0));
        assert_eq!(graph.materials[1].metalness(), None);
        assert_eq!(graph.materials[2].metalness(), Some(0.0));
    }

    #[test]
    fn missing_normals_are_generated() {
        let graph = decode(&glb(MAP_JSON, &triangle_bin()), None).unwrap().graph;
        let prim = &graph.meshes[0].primitives[0];
        assert_eq!(prim.normals.len(), 3);
        assert!(Vec3::from_array(prim.normals[0]).abs_diff_eq(Vec3::Z, 1e-6));
        assert_eq!(prim.colors, vec![[1.0; 4]; 3]);
    }

    #[test]
    fn basisu_extension_is_reported() {
        let json = MAP_JSON.replace(
            r#"["KHR_materials_unlit"]"#,
            r#"["KHR_materials_unlit", "KHR_texture_basisu"]"#,
        );
        let asset = decode(&glb(&json, &triangle_bin()), None).unwrap();
        assert!(asset.basisu_textures);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode(b"definitely not a map", None).unwrap_err();
        assert!(matches!(err, ViewerError::Decode(_)));
    }

    #[test]
    fn scene_without_scenes_uses_parentless_nodes() {
        let json = MAP_JSON
            .replace(r#""scene": 0,"#, "")
            .replace(r#""scenes": [{"nodes": [0]}],"#, "");
        let graph = decode(&glb(&json, &triangle_bin()), None).unwrap().graph;
        assert_eq!(graph.roots, [0]);
    }

    #[test]
    fn partial_triangles_are_dropped() {
        assert_eq!(whole_triangles(&[0, 1, 2, 3, 4], 5), [0, 1, 2]);
        assert!(whole_triangles(&[0, 1], 5).is_empty());
    }

    #[test]
    fn out_of_range_index_drops_its_whole_triangle() {
        assert_eq!(whole_triangles(&[0, 1, 9, 0, 1, 2], 3), [0, 1, 2]);
        assert_eq!(whole_triangles(&[2, 1, 0, 3, 3, 3, 1, 2, 0], 3), [2, 1, 0, 1, 2, 0]);
    }

    #[test]
    fn dangling_mesh_reference_is_a_decode_error() {
        let json = r#"{
            "asset": {"version": "2.0"},
            "scenes": [{"nodes": [0]}],
            "nodes": [{"mesh": 5}]
        }"#;
        let err = decode(&glb(json, &[]), None).unwrap_err();
        assert!(matches!(err, ViewerError::Decode(_)));
    }

    #[test]
    fn dangling_material_reference_is_a_decode_error() {
        let json = MAP_JSON.replace(r#""material": 1}"#, r#""material": 7}"#);
        let err = decode(&glb(&json, &triangle_bin()), None).unwrap_err();
        assert!(matches!(err, ViewerError::Decode(_)));
    }
}
