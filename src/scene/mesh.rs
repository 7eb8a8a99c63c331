//! Mesh geometry as seen by the exporter.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Membership of a vertex in one of its mesh's vertex groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupWeight {
    /// Index into the owning mesh's `vertex_groups`.
    pub group: usize,
    pub weight: f32,
}

/// A mesh vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    #[serde(default)]
    pub groups: Vec<GroupWeight>,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            groups: Vec::new(),
        }
    }

    pub fn with_weight(mut self, group: usize, weight: f32) -> Self {
        self.groups.push(GroupWeight { group, weight });
        self
    }
}

/// A polygon: an ordered loop of vertex indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<u32>,
    #[serde(default)]
    pub material_index: usize,
    /// One UV per loop corner, empty when the mesh has no UV layer.
    #[serde(default)]
    pub uvs: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<u32>) -> Self {
        Self {
            vertices,
            material_index: 0,
            uvs: Vec::new(),
        }
    }

    pub fn with_material(mut self, material_index: usize) -> Self {
        self.material_index = material_index;
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = uvs;
        self
    }

    /// Iterate over (vertex index, UV) pairs for corners that carry a UV.
    pub fn corners(&self) -> impl Iterator<Item = (u32, Vec2)> + '_ {
        self.vertices.iter().copied().zip(self.uvs.iter().copied())
    }
}

/// A mesh object parented to the armature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
    /// Material slots, indexed by `Polygon::material_index`.
    #[serde(default)]
    pub materials: Vec<super::Material>,
    /// Index of the active material slot.
    #[serde(default)]
    pub active_material: Option<usize>,
    /// Vertex group names; group indices are local to this mesh.
    #[serde(default)]
    pub vertex_groups: Vec<String>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a polygon and return its index.
    pub fn add_polygon(&mut self, polygon: Polygon) -> usize {
        self.polygons.push(polygon);
        self.polygons.len() - 1
    }

    /// Add a material slot and return its index. The first slot added
    /// becomes the active material.
    pub fn add_material(&mut self, material: super::Material) -> usize {
        self.materials.push(material);
        let index = self.materials.len() - 1;
        self.active_material.get_or_insert(index);
        index
    }

    /// Add a vertex group and return its index.
    pub fn add_vertex_group(&mut self, name: impl Into<String>) -> usize {
        self.vertex_groups.push(name.into());
        self.vertex_groups.len() - 1
    }

    /// The active material, if the slot exists.
    pub fn active_material(&self) -> Option<&super::Material> {
        self.active_material.and_then(|i| self.materials.get(i))
    }

    /// First UV of every vertex, taken from its incident corners in polygon
    /// order. Vertices without a UV corner map to `None`.
    pub fn first_uvs(&self) -> Vec<Option<Vec2>> {
        let mut first = vec![None; self.vertices.len()];
        for (vertex, uv) in self.polygons.iter().flat_map(Polygon::corners) {
            if let Some(slot) = first.get_mut(vertex as usize) {
                slot.get_or_insert(uv);
            }
        }
        first
    }

    /// Number of distinct UVs each vertex carries across its corners.
    pub fn uv_counts(&self) -> Vec<usize> {
        let mut seen: Vec<Vec<Vec2>> = vec![Vec::new(); self.vertices.len()];
        for (vertex, uv) in self.polygons.iter().flat_map(Polygon::corners) {
            if let Some(uvs) = seen.get_mut(vertex as usize) {
                if !uvs.contains(&uv) {
                    uvs.push(uv);
                }
            }
        }
        seen.iter().map(Vec::len).collect()
    }
}
