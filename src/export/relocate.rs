//! Copying texture images next to the exported document.

use super::Diagnostics;
use crate::error::ExportWarning;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum Folder {
    Pending,
    Ready(PathBuf),
    Failed,
}

/// Copies each source image at most once into the texture folder and hands
/// out the path the document should reference.
#[derive(Debug)]
pub struct TextureRelocator {
    out_dir: PathBuf,
    folder_name: String,
    use_relative_paths: bool,
    folder: Folder,
    /// Source path -> path written into the document.
    copied: HashMap<PathBuf, PathBuf>,
    copy_count: usize,
}

impl TextureRelocator {
    /// Create a relocator for a document written into `out_dir`.
    pub fn new(
        out_dir: impl Into<PathBuf>,
        folder_name: impl Into<String>,
        use_relative_paths: bool,
    ) -> Self {
        Self {
            out_dir: out_dir.into(),
            folder_name: folder_name.into(),
            use_relative_paths,
            folder: Folder::Pending,
            copied: HashMap::new(),
            copy_count: 0,
        }
    }

    /// Number of files actually copied so far.
    pub fn copy_count(&self) -> usize {
        self.copy_count
    }

    /// The texture folder, created on first use. `None` if it could not be
    /// created; the failure is reported once.
    pub fn texture_folder(&mut self, diagnostics: &mut Diagnostics) -> Option<&Path> {
        if let Folder::Pending = self.folder {
            let path = self.out_dir.join(&self.folder_name);
            self.folder = match fs::create_dir_all(&path) {
                Ok(()) => Folder::Ready(path),
                Err(e) => {
                    diagnostics.warn(ExportWarning::TextureFolder {
                        path,
                        reason: e.to_string(),
                    });
                    Folder::Failed
                }
            };
        }
        match &self.folder {
            Folder::Ready(path) => Some(path.as_path()),
            Folder::Pending | Folder::Failed => None,
        }
    }

    /// Copy `source` into the texture folder and return the path to write
    /// into the document.
    ///
    /// Repeated requests for the same source return the first answer without
    /// touching the filesystem. When the folder or the copy fails the source
    /// path itself is returned.
    pub fn relocate(&mut self, source: &Path, diagnostics: &mut Diagnostics) -> PathBuf {
        if let Some(done) = self.copied.get(source) {
            return done.clone();
        }

        let reference = self.copy(source, diagnostics);
        self.copied.insert(source.to_path_buf(), reference.clone());
        reference
    }

    fn copy(&mut self, source: &Path, diagnostics: &mut Diagnostics) -> PathBuf {
        let Some(file_name) = source.file_name().map(|n| n.to_owned()) else {
            return source.to_path_buf();
        };
        let Some(folder) = self.texture_folder(diagnostics) else {
            return source.to_path_buf();
        };
        let destination = folder.join(&file_name);

        let already_there = match (fs::canonicalize(source), fs::canonicalize(&destination)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !already_there {
            if let Err(e) = fs::copy(source, &destination) {
                diagnostics.warn(ExportWarning::TextureCopy {
                    from: source.to_path_buf(),
                    to: destination,
                    reason: e.to_string(),
                });
                return source.to_path_buf();
            }
            self.copy_count += 1;
            tracing::debug!("Copied {} -> {}", source.display(), destination.display());
        }

        if self.use_relative_paths {
            Path::new(&self.folder_name).join(file_name)
        } else {
            destination
        }
    }
}
