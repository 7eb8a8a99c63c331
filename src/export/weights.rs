//! Per-joint skinning tables.
//!
//! Vertex weights are stored per vertex in the scene; joints in the document
//! list their vertices instead. The index inverts the mapping and groups
//! vertices that share a quantized weight so each group becomes a single
//! `<VertexRef>` record.

use super::{Diagnostics, WeightPrecision};
use crate::error::ExportWarning;
use crate::scene::SceneSource;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Quantized weight string -> vertices carrying that weight.
pub type WeightBuckets = BTreeMap<String, BTreeSet<u32>>;

/// Mesh name -> weight buckets for one bone.
pub type MeshWeights = BTreeMap<String, WeightBuckets>;

/// Bone name -> mesh name -> quantized weight -> vertex indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinWeightIndex {
    bones: BTreeMap<String, MeshWeights>,
}

impl SkinWeightIndex {
    /// Build the index for every bone and mesh of a scene.
    ///
    /// Every (bone, mesh) pair gets an entry, possibly empty. Zero weights
    /// are dropped; group indices past the mesh's group list and groups that
    /// name no bone are reported and dropped.
    pub fn build<S: SceneSource + ?Sized>(
        scene: &S,
        precision: WeightPrecision,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let empty: MeshWeights = scene
            .meshes()
            .iter()
            .map(|mesh| (mesh.name.clone(), WeightBuckets::new()))
            .collect();
        let mut bones: BTreeMap<String, MeshWeights> = scene
            .bones()
            .iter()
            .map(|bone| (bone.name.clone(), empty.clone()))
            .collect();

        for mesh in scene.meshes() {
            let mut unknown_groups = HashSet::new();
            for (vertex_index, vertex) in mesh.vertices.iter().enumerate() {
                let vertex_index = vertex_index as u32;
                for entry in &vertex.groups {
                    let Some(group_name) = mesh.vertex_groups.get(entry.group) else {
                        diagnostics.warn(ExportWarning::GroupIndexOutOfRange {
                            mesh: mesh.name.clone(),
                            vertex: vertex_index,
                            group: entry.group,
                        });
                        continue;
                    };
                    if entry.weight == 0.0 {
                        continue;
                    }
                    let Some(meshes) = bones.get_mut(group_name) else {
                        if unknown_groups.insert(entry.group) {
                            diagnostics.warn(ExportWarning::UnknownBoneGroup {
                                mesh: mesh.name.clone(),
                                group: group_name.clone(),
                            });
                        }
                        continue;
                    };
                    meshes
                        .entry(mesh.name.clone())
                        .or_default()
                        .entry(precision.quantize(entry.weight))
                        .or_default()
                        .insert(vertex_index);
                }
            }
        }

        Self { bones }
    }

    /// Weight tables of one bone, keyed by mesh name.
    pub fn bone(&self, bone: &str) -> Option<&MeshWeights> {
        self.bones.get(bone)
    }

    /// Weight buckets of one (bone, mesh) pair.
    pub fn buckets(&self, bone: &str, mesh: &str) -> Option<&WeightBuckets> {
        self.bones.get(bone).and_then(|meshes| meshes.get(mesh))
    }

    /// All vertices of `mesh` influenced by `bone`, across buckets.
    pub fn vertices(&self, bone: &str, mesh: &str) -> BTreeSet<u32> {
        self.buckets(bone, mesh)
            .map(|buckets| buckets.values().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Number of bones in the index.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}
