//! Manifest file output.
//!
//! Each resource lands in `<service>-<kind>.<ext>`, so different
//! services and kinds never share a path.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cluster::ResourceKind;
use crate::convert::ResourceTriple;
use crate::error::{OutputError, Result};

use super::serializer::ManifestFormat;

/// Writer for generated manifests.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    /// Directory manifests are written to.
    out_dir: PathBuf,
    /// Encoding.
    format: ManifestFormat,
}

impl ManifestWriter {
    /// Creates a writer for a directory and format.
    pub fn new(out_dir: impl Into<PathBuf>, format: ManifestFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            format,
        }
    }

    /// Output directory.
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Encoding used by this writer.
    #[must_use]
    pub const fn format(&self) -> ManifestFormat {
        self.format
    }

    /// Path a manifest for `name` and `kind` is written to.
    #[must_use]
    pub fn path_for(&self, name: &str, kind: ResourceKind) -> PathBuf {
        self.out_dir.join(format!(
            "{name}-{}.{}",
            kind.file_suffix(),
            self.format.extension()
        ))
    }

    /// Renders and writes one resource.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write<T: Serialize>(&self, name: &str, kind: ResourceKind, resource: &T) -> Result<PathBuf> {
        let rendered = self.format.render(resource, &format!("{kind} {name}"))?;
        debug!("{kind} {name}:\n{rendered}");

        if !self.out_dir.as_os_str().is_empty() && !self.out_dir.exists() {
            std::fs::create_dir_all(&self.out_dir).map_err(|e| OutputError::FileWrite {
                path: self.out_dir.clone(),
                message: e.to_string(),
            })?;
        }

        let path = self.path_for(name, kind);
        std::fs::write(&path, rendered).map_err(|e| OutputError::FileWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;

        info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Writes every resource of a triple, in rc, svc, deployment order.
    ///
    /// # Errors
    ///
    /// Returns the first rendering or write failure.
    pub fn write_triple(&self, triple: &ResourceTriple) -> Result<Vec<PathBuf>> {
        let mut written = vec![
            self.write(&triple.name, ResourceKind::ReplicationController, &triple.replica)?,
            self.write(&triple.name, ResourceKind::Service, &triple.service)?,
        ];

        if let Some(rollout) = &triple.rollout {
            written.push(self.write(&triple.name, ResourceKind::Deployment, rollout)?);
        }

        Ok(written)
    }
}
