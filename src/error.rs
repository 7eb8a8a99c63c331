//! Error and warning types for the egg exporter.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Fatal errors. Any of these aborts the export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output document could not be created.
    #[error("Unable to open file for writing {path}: {source}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while writing the document stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON scene description.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Membership weight precision outside the supported range.
    #[error("Unsupported weight precision {0} (expected 4, 5 or 6)")]
    InvalidPrecision(u8),
}

/// Non-fatal conditions recorded during an export.
///
/// The export carries on after each of these; the affected field is written
/// with a placeholder value or the offending record is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportWarning {
    #[error("Unable to create texture folder {path}: {reason}")]
    TextureFolder { path: PathBuf, reason: String },

    #[error("Unable to copy '{from}' -> '{to}': {reason}")]
    TextureCopy {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    #[error("undefined colorspace {colorspace} for texture image {image}")]
    UnknownColorSpace { image: PathBuf, colorspace: String },

    #[error("undefined extension {extension} for texture {texture}, repeat_{axis}={repeat}")]
    UnsupportedWrap {
        texture: String,
        axis: char,
        extension: String,
        repeat: f32,
    },

    #[error("undefined texture type for texture {texture}: coords {coords}, mapping {mapping}")]
    UnsupportedMapping {
        texture: String,
        coords: String,
        mapping: String,
    },

    #[error("mesh {mesh}: vertex {vertex} references vertex group {group} out of range")]
    GroupIndexOutOfRange { mesh: String, vertex: u32, group: usize },

    #[error("mesh {mesh}: vertex group {group} does not name a bone")]
    UnknownBoneGroup { mesh: String, group: String },

    #[error("mesh {mesh}: polygon {polygon} uses material index {index} which has no material")]
    MissingMaterial {
        mesh: String,
        polygon: usize,
        index: usize,
    },

    #[error("mesh {mesh} has no active material")]
    NoActiveMaterial { mesh: String },

    #[error("mesh {mesh}: {vertices} vertices carry more than one UV, only the first is kept")]
    DiscardedUvs { mesh: String, vertices: usize },

    #[error("bone {bone} is reachable more than once from the root")]
    BoneCycle { bone: String },

    #[error("material {material} is not declared, {name} already names another material")]
    MaterialNameCollision { name: String, material: String },

    #[error("texture name {name} is shared by distinct images")]
    TextureNameCollision { name: String },
}
