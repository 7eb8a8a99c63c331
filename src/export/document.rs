//! Whole-document assembly and output stream handling.

use super::{armature, geometry, material};
use super::{Diagnostics, ExportConfig, ExportReport, Indent, SkinWeightIndex, TextureRelocator};
use crate::error::{ExportError, Result};
use crate::names;
use crate::scene::SceneSource;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes a scene as an egg document.
///
/// One exporter owns one output path; the copied-texture registry lives only
/// for the duration of a single [`export`](EggExporter::export) call.
#[derive(Debug, Clone)]
pub struct EggExporter {
    output: PathBuf,
    config: ExportConfig,
}

impl EggExporter {
    /// Create an exporter with default configuration.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self::with_config(output, ExportConfig::default())
    }

    /// Create an exporter with custom configuration.
    pub fn with_config(output: impl Into<PathBuf>, config: ExportConfig) -> Self {
        Self {
            output: output.into(),
            config,
        }
    }

    /// Export `scene` to the output file.
    ///
    /// The file is opened before anything else happens; if that fails the
    /// export aborts without copying any texture. The stream is closed on
    /// every return path. A failed final flush is an error rather than a
    /// warning: the document on disk would be truncated.
    pub fn export<S: SceneSource + ?Sized>(&self, scene: &S) -> Result<ExportReport> {
        let file = File::create(&self.output).map_err(|source| {
            tracing::error!("Unable to open file for writing {}", self.output.display());
            ExportError::OutputOpen {
                path: self.output.clone(),
                source,
            }
        })?;
        tracing::info!("Writing egg file {}", self.output.display());

        let mut out = BufWriter::new(file);
        let report = self.write_to(scene, &mut out)?;
        out.flush()?;

        tracing::info!(
            "Done. {} textures copied, {} warnings",
            report.textures_copied,
            report.warnings.len()
        );
        Ok(report)
    }

    /// Write the document into `out`. Textures are still copied beside the
    /// configured output path.
    pub fn write_to<S: SceneSource + ?Sized, W: Write>(
        &self,
        scene: &S,
        out: &mut W,
    ) -> Result<ExportReport> {
        let mut relocator = TextureRelocator::new(
            self.output_dir(),
            self.config.texture_folder.clone(),
            self.config.use_relative_paths,
        );
        let mut diagnostics = Diagnostics::new();

        self.write_document(scene, out, &mut relocator, &mut diagnostics)?;

        Ok(ExportReport {
            output: self.output.clone(),
            textures_copied: relocator.copy_count(),
            warnings: diagnostics.into_warnings(),
        })
    }

    fn output_dir(&self) -> PathBuf {
        let dir = match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
    }

    fn write_document<S: SceneSource + ?Sized, W: Write>(
        &self,
        scene: &S,
        out: &mut W,
        relocator: &mut TextureRelocator,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let name = names::file_base_name(&self.output);
        write_header(out, scene.scene_file(), &name)?;

        tracing::info!("Exporting textures");
        let materials =
            material::declared_materials(scene, self.config.declare_all_materials, diagnostics);
        let textured = material::textured_materials(scene, &materials);
        material::write_textures(out, &textured, relocator, diagnostics)?;

        tracing::info!("Exporting materials");
        for declared in &materials {
            material::write_material(out, declared)?;
        }

        tracing::info!("Exporting geometry & armature");
        self.write_groups(out, scene, &name, diagnostics)
    }

    fn write_groups<S: SceneSource + ?Sized, W: Write>(
        &self,
        out: &mut W,
        scene: &S,
        name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let skinned = !scene.bones().is_empty();
        let index = skinned
            .then(|| SkinWeightIndex::build(scene, self.config.weight_precision, diagnostics));
        if let Some(index) = &index {
            tracing::debug!("Skin weights indexed for {} bones", index.bone_count());
        }

        let indent = Indent(2);
        writeln!(out, "<Group> {} {{", name)?;
        if skinned {
            writeln!(out, "{}<Dart> {{ 1 }}", indent)?;
        }
        writeln!(out, "{}<Group> CharacterRoot {{", indent)?;
        for mesh in scene.meshes() {
            geometry::write_mesh(out, mesh, indent.next(), diagnostics)?;
        }
        if let Some(index) = &index {
            armature::write_armature(out, scene, index, indent.next(), diagnostics)?;
        }
        writeln!(out, "{}}}", indent)?;
        writeln!(out, "}}")?;
        Ok(())
    }
}

fn write_header<W: Write>(out: &mut W, scene_file: &str, name: &str) -> Result<()> {
    let egg_file = format!("{}.egg", name);
    let comment: Vec<&str> = [scene_file, egg_file.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    writeln!(out, "<CoordinateSystem> {{ Z-Up }}")?;
    writeln!(out)?;
    writeln!(out, "<Comment> {{")?;
    writeln!(out, "  \"{}\"", comment.join(" ").replace('"', "'"))?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}
