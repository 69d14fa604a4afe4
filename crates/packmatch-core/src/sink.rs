//! Export sinks.
//!
//! A sink is where matched panel artwork goes. Rasterization itself lives
//! in the host application; the library's stock sinks plan renders. The
//! [`ManifestExportSink`] records one entry per asset and writes a JSON
//! manifest the host can execute, the [`DryRunSink`] only computes the
//! artifact paths a run would produce.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::artwork::ArtGroup;
use crate::error::ExportError;

/// File name of the manifest written into the output directory.
pub const MANIFEST_FILE_NAME: &str = "export_manifest.json";

/// Destination for matched panel artwork.
///
/// `export` is called once per matched group, after renaming, so
/// `group.name` is already the final asset name. Per-asset errors are
/// recorded in the run report and the run continues; an error from
/// [`finish`](Self::finish) is process-level and aborts the run.
pub trait ExportSink {
    /// Materializes (or plans) one asset and returns the artifact path.
    fn export(&mut self, group: &ArtGroup, scale: f64) -> Result<PathBuf, ExportError>;

    /// Finalizes the run. Called exactly once, after the last export.
    fn finish(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}

/// One manifest row describing a planned asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    /// Final asset name (the group name after renaming).
    pub name: String,
    /// Artifact path the renderer should produce.
    pub target: PathBuf,
    /// Scale factor to render at.
    pub scale: f64,
    /// Asset width at the requested scale, in artboard units.
    pub width: f64,
    /// Asset height at the requested scale, in artboard units.
    pub height: f64,
}

/// Sink that plans renders into `export_manifest.json`.
pub struct ManifestExportSink {
    output_dir: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl ManifestExportSink {
    /// Creates the sink, creating the output directory if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            entries: Vec::new(),
        })
    }

    /// Returns the entries planned so far, in export order.
    #[must_use = "returns the planned manifest entries"]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Returns the output directory the sink writes into.
    #[must_use = "returns the sink's output directory"]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ExportSink for ManifestExportSink {
    fn export(&mut self, group: &ArtGroup, scale: f64) -> Result<PathBuf, ExportError> {
        let target = self.output_dir.join(format!("{}.png", group.name));
        debug!("planned asset '{}' -> {}", group.name, target.display());
        self.entries.push(ManifestEntry {
            name: group.name.clone(),
            target: target.clone(),
            scale,
            width: group.bounds.width() * scale,
            height: group.bounds.height() * scale,
        });
        Ok(target)
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(self.output_dir.join(MANIFEST_FILE_NAME), json)?;
        Ok(())
    }
}

/// Sink for preview runs: computes artifact paths, touches nothing on disk.
#[derive(Debug, Clone)]
pub struct DryRunSink {
    output_dir: PathBuf,
}

impl DryRunSink {
    /// Creates a dry-run sink targeting (but never creating) `output_dir`.
    #[must_use = "creates a new dry-run sink"]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ExportSink for DryRunSink {
    fn export(&mut self, group: &ArtGroup, _scale: f64) -> Result<PathBuf, ExportError> {
        Ok(self.output_dir.join(format!("{}.png", group.name)))
    }
}
