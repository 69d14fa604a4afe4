//! Document providers.
//!
//! A [`DocumentSource`] hands the pipeline one fully validated
//! [`ArtworkDocument`]. The stock provider reads the JSON exchange format;
//! host applications implement the trait over their own object model.
//! Source failures are fatal: the pipeline never runs on a document it
//! could not load whole.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::artwork::{ArtGroup, ArtworkDocument};
use crate::error::SourceError;

/// Provider of artwork documents.
pub trait DocumentSource {
    /// Loads and validates one document.
    fn load(&self) -> Result<ArtworkDocument, SourceError>;
}

/// Loads documents from JSON exchange files.
#[derive(Debug, Clone)]
pub struct JsonDocumentSource {
    path: PathBuf,
}

impl JsonDocumentSource {
    /// Creates a source reading from `path`.
    #[must_use = "creates a new JSON document source"]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path the source reads from.
    #[must_use = "returns the source path"]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for JsonDocumentSource {
    fn load(&self) -> Result<ArtworkDocument, SourceError> {
        debug!("loading artwork document from {}", self.path.display());
        let payload = fs::read_to_string(&self.path)?;
        parse_document(&payload)
    }
}

/// Parses and validates a document from JSON text.
///
/// Group depths are stamped here; the exchange format never carries them.
pub fn parse_document(json: &str) -> Result<ArtworkDocument, SourceError> {
    let mut document: ArtworkDocument = serde_json::from_str(json)?;
    validate_document(&document)?;
    document.assign_depths();
    Ok(document)
}

/// Checks the geometric invariants the pipeline assumes: every group's
/// bounding box is finite and non-inverted, every label position finite.
pub fn validate_document(document: &ArtworkDocument) -> Result<(), SourceError> {
    for group in &document.groups {
        validate_group(group, &group.name)?;
    }
    for (index, label) in document.labels.iter().enumerate() {
        if !label.position.is_finite() {
            return Err(SourceError::InvalidLabel {
                index,
                reason: format!(
                    "position ({}, {}) is not finite",
                    label.position.x, label.position.y
                ),
            });
        }
    }
    Ok(())
}

fn validate_group(group: &ArtGroup, path: &str) -> Result<(), SourceError> {
    if !group.bounds.is_well_formed() {
        return Err(SourceError::InvalidGeometry {
            path: path.to_string(),
            reason: format!(
                "bounding box ({}, {}, {}, {}) is inverted or non-finite",
                group.bounds.x_min, group.bounds.y_min, group.bounds.x_max, group.bounds.y_max
            ),
        });
    }
    for child in &group.children {
        let child_path = format!("{path}/{}", child.name);
        validate_group(child, &child_path)?;
    }
    Ok(())
}
