//! # Egg Exporter
//!
//! A Rust library for writing skinned characters as Panda3D egg documents.
//!
//! ## Overview
//!
//! This library takes a scene (an armature plus the meshes skinned to it,
//! with their materials and image textures) and produces a single `.egg`
//! text document, copying the referenced images into a `textures/` folder
//! beside it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use egg_exporter::{load_scene, export_egg, ExportConfig};
//!
//! // Load a scene dumped by the authoring tool
//! let scene = load_scene("character.json")?;
//!
//! // Write the egg document (and copy its textures)
//! let report = export_egg(&scene, "out/character.egg", ExportConfig::default())?;
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! ```
//!
//! ## Host Integration
//!
//! Authoring tools that keep their own object model implement the
//! `SceneSource` trait instead of building a [`Scene`]:
//!
//! ```ignore
//! use egg_exporter::{SceneSource, Bone, Mesh, EggExporter};
//!
//! impl SceneSource for MyRig {
//!     fn scene_file(&self) -> &str { &self.file_name }
//!     fn bones(&self) -> &[Bone] { &self.bones }
//!     fn meshes(&self) -> &[Mesh] { &self.meshes }
//! }
//!
//! let report = EggExporter::new("rig.egg").export(&my_rig)?;
//! ```

pub mod error;
pub mod export;
pub mod names;
pub mod scene;

// Re-export main types for convenience
pub use error::{ExportError, ExportWarning, Result};
pub use export::{
    Diagnostics, EggExporter, ExportConfig, ExportReport, SkinWeightIndex, TextureRelocator,
    WeightPrecision,
};
pub use scene::{
    Bone, Image, Material, Mesh, Polygon, Scene, SceneSource, Texture, TextureSlot, Vertex,
};

/// Load a scene description from a JSON file.
pub fn load_scene<P: AsRef<std::path::Path>>(path: P) -> Result<Scene> {
    let json = std::fs::read_to_string(path)?;
    Scene::from_json(&json)
}

/// Export a scene to an egg document at `path`.
pub fn export_egg<S, P>(scene: &S, path: P, config: ExportConfig) -> Result<ExportReport>
where
    S: SceneSource + ?Sized,
    P: AsRef<std::path::Path>,
{
    EggExporter::with_config(path.as_ref(), config).export(scene)
}
