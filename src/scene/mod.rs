//! Read-only scene model consumed by the exporter.
//!
//! Hosts either implement [`SceneSource`] over their own object model or fill
//! an owned [`Scene`] (which can also be loaded from JSON).

mod material;
mod mesh;

pub use material::{
    Image, ImageSource, Mapping, Material, TexCoords, Texture, TextureExtension, TextureKind,
    TextureSlot,
};
pub use mesh::{GroupWeight, Mesh, Polygon, Vertex};

use crate::error::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A bone of the armature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Head position in armature space.
    pub head: Vec3,
    /// Index of the parent bone, `None` for roots.
    #[serde(default)]
    pub parent: Option<usize>,
    /// Child bone indices in scene order.
    #[serde(default)]
    pub children: Vec<usize>,
}

impl Bone {
    pub fn new(name: impl Into<String>, head: Vec3) -> Self {
        Self {
            name: name.into(),
            head,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Trait for scene data sources (the seam between the exporter and the host).
pub trait SceneSource {
    /// File name of the source scene, written into the document header.
    fn scene_file(&self) -> &str;

    /// All bones of the armature. Parent and child links index this slice.
    fn bones(&self) -> &[Bone];

    /// Child meshes of the armature, in scene order.
    fn meshes(&self) -> &[Mesh];

    /// The bone the armature walk starts from: the first bone without a parent.
    fn root_bone(&self) -> Option<usize> {
        self.bones().iter().position(|bone| bone.parent.is_none())
    }

    /// Head position of a bone relative to its parent's head. Roots keep
    /// their armature-space position.
    fn relative_head(&self, bone: usize) -> Vec3 {
        let bones = self.bones();
        let head = bones[bone].head;
        match bones[bone].parent.and_then(|p| bones.get(p)) {
            Some(parent) => head - parent.head,
            None => head,
        }
    }
}

/// An owned scene: one armature and the meshes skinned to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub scene_file: String,
    #[serde(default)]
    pub bones: Vec<Bone>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(scene_file: impl Into<String>) -> Self {
        Self {
            scene_file: scene_file.into(),
            ..Self::default()
        }
    }

    /// Parse a scene from its JSON description.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a bone under `parent` (or as a root) and return its index.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        head: Vec3,
        parent: Option<usize>,
    ) -> usize {
        let index = self.bones.len();
        let mut bone = Bone::new(name, head);
        bone.parent = parent;
        self.bones.push(bone);
        if let Some(parent) = parent {
            self.bones[parent].children.push(index);
        }
        index
    }

    /// Add a mesh and return its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }
}

impl SceneSource for Scene {
    fn scene_file(&self) -> &str {
        &self.scene_file
    }

    fn bones(&self) -> &[Bone] {
        &self.bones
    }

    fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }
}
