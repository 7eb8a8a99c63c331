//! Egg document export.
//!
//! [`EggExporter`] assembles the document; the submodules each write one
//! kind of record.

pub mod armature;
pub mod document;
pub mod geometry;
pub mod material;
pub mod relocate;
pub mod weights;

pub use document::EggExporter;
pub use relocate::TextureRelocator;
pub use weights::SkinWeightIndex;

use crate::error::{ExportError, ExportWarning};
use std::fmt;
use std::path::PathBuf;

/// Decimal places used for joint membership weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightPrecision {
    #[default]
    Four,
    Five,
    Six,
}

impl WeightPrecision {
    pub fn places(self) -> usize {
        match self {
            WeightPrecision::Four => 4,
            WeightPrecision::Five => 5,
            WeightPrecision::Six => 6,
        }
    }

    /// Quantize a weight to its fixed-point string, e.g. `0.1234`.
    pub fn quantize(self, weight: f32) -> String {
        format!("{:.*}", self.places(), weight)
    }
}

impl TryFrom<u8> for WeightPrecision {
    type Error = ExportError;

    fn try_from(places: u8) -> Result<Self, Self::Error> {
        match places {
            4 => Ok(WeightPrecision::Four),
            5 => Ok(WeightPrecision::Five),
            6 => Ok(WeightPrecision::Six),
            other => Err(ExportError::InvalidPrecision(other)),
        }
    }
}

/// Configuration for an export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Precision of membership weights in joint vertex references.
    pub weight_precision: WeightPrecision,
    /// Reference copied textures relative to the document instead of by
    /// absolute path.
    pub use_relative_paths: bool,
    /// Declare every material a polygon references. When disabled only each
    /// mesh's active material is declared.
    pub declare_all_materials: bool,
    /// Folder, beside the document, that textures are copied into.
    pub texture_folder: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            weight_precision: WeightPrecision::Four,
            use_relative_paths: true,
            declare_all_materials: true,
            texture_folder: "textures".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn with_weight_precision(mut self, precision: WeightPrecision) -> Self {
        self.weight_precision = precision;
        self
    }

    pub fn with_relative_paths(mut self, use_relative_paths: bool) -> Self {
        self.use_relative_paths = use_relative_paths;
        self
    }

    pub fn with_all_materials(mut self, declare_all_materials: bool) -> Self {
        self.declare_all_materials = declare_all_materials;
        self
    }
}

/// Outcome of a finished export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// The written document.
    pub output: PathBuf,
    /// Texture files copied next to the document.
    pub textures_copied: usize,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Vec<ExportWarning>,
}

impl ExportReport {
    /// Returns `true` if the export finished without warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Collects warnings for one export pass and logs each as it arrives.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<ExportWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: ExportWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[ExportWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ExportWarning> {
        self.warnings
    }
}

/// Leading spaces of a nested line.
#[derive(Debug, Clone, Copy)]
pub struct Indent(pub usize);

impl Indent {
    /// One nesting level deeper.
    pub fn next(self) -> Self {
        Indent(self.0 + 2)
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:1$}", "", self.0)
    }
}
