//! Handing finished parts to whatever writes them out.
//!
//! File formats are the sink's business. The pipeline only promises a
//! closed, flat-shaded mesh, a uniform scale and a destination path.

use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};
use crate::tessellation::TriangleMesh;

/// Receives finished parts.
pub trait ExportSink {
    /// Exports `mesh`, scaled uniformly by `scale`, to `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if the sink cannot store the mesh.
    fn export(&mut self, name: &str, mesh: &TriangleMesh, scale: f64, path: &Path) -> Result<()>;
}

/// One mesh held by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedMesh {
    pub name: String,
    pub path: PathBuf,
    /// The mesh after scaling.
    pub mesh: TriangleMesh,
}

/// Keeps exported meshes in memory, in export order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    exports: Vec<ExportedMesh>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All exports so far.
    #[must_use]
    pub fn exports(&self) -> &[ExportedMesh] {
        &self.exports
    }

    /// The most recent export of the named part.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExportedMesh> {
        self.exports.iter().rev().find(|e| e.name == name)
    }
}

impl ExportSink for MemorySink {
    fn export(&mut self, name: &str, mesh: &TriangleMesh, scale: f64, path: &Path) -> Result<()> {
        if !scale.is_normal() {
            return Err(ExportError::Sink {
                path: path.to_path_buf(),
                reason: format!("scale must be finite and non-zero, got {scale}"),
            }
            .into());
        }
        self.exports.push(ExportedMesh {
            name: name.to_owned(),
            path: path.to_path_buf(),
            mesh: mesh.scaled(scale),
        });
        Ok(())
    }
}
