//! Export pipeline orchestration.
//!
//! One [`ExportPipeline::run`] call takes a document through the whole
//! plan: normalize tags, scan labels, associate, rename matched groups,
//! export through the sink, and report. The document is mutated in place
//! (tag names canonicalized, matched groups renamed); everything else the
//! run produced lives in the returned [`RunReport`].

use log::{debug, warn};

use crate::assoc::{associate, AssociationOutcome, MatchedLabel};
use crate::artwork::{ArtworkDocument, TextLabel};
use crate::config::PipelineConfig;
use crate::error::{ConfigError, Result};
use crate::ident::IdentMatcher;
use crate::normalize::{normalize_tags, NormalizedGroup};
use crate::report::{ExportRecord, GroupRecord, RunReport};
use crate::sink::ExportSink;

/// The export-planning pipeline.
///
/// Construction validates the configuration and compiles the identifier
/// matcher; a built pipeline can run any number of documents.
pub struct ExportPipeline {
    config: PipelineConfig,
    matcher: IdentMatcher,
}

impl ExportPipeline {
    /// Builds a pipeline, validating the configuration up front.
    ///
    /// A run never starts with a configuration this has not accepted.
    pub fn new(config: PipelineConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let matcher = IdentMatcher::new(config.ident_bounds)?;
        Ok(Self { config, matcher })
    }

    /// Returns the validated configuration the pipeline runs with.
    #[must_use = "returns the pipeline configuration"]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full plan over one document.
    ///
    /// Per-asset export failures are recorded and the run continues; a
    /// failure from [`ExportSink::finish`] aborts the run with an error.
    pub fn run(
        &self,
        document: &mut ArtworkDocument,
        sink: &mut dyn ExportSink,
    ) -> Result<RunReport> {
        // Documents built in code may never have passed through a loader.
        document.assign_depths();

        // Pass 1: canonicalize tagged group names.
        let tagged = normalize_tags(document, &self.config.vocabulary);
        debug!("tag normalization found {} tagged groups", tagged.len());

        // Pass 2: reduce page labels to identifier candidates.
        let candidates = scan_labels(
            &document.labels,
            &self.matcher,
            &tagged,
            self.config.max_distance_proximity,
        );
        debug!(
            "{} of {} labels entered the candidate pool",
            candidates.len(),
            document.labels.len()
        );

        // Pass 3: geometric association.
        let outcomes = associate(&tagged, &candidates, &self.config);

        // Passes 4 and 5: rename matched groups and export, document order.
        let mut records = Vec::with_capacity(tagged.len());
        for (group, outcome) in tagged.iter().zip(outcomes) {
            let (final_name, export) = match &outcome {
                AssociationOutcome::Matched { label, .. } => {
                    let final_name = format!("{label}-{}", group.tag);
                    let export = match document.group_at_mut(&group.path) {
                        Some(node) => {
                            node.name.clone_from(&final_name);
                            match sink.export(node, self.config.scale) {
                                Ok(path) => ExportRecord::Exported(path),
                                Err(err) => {
                                    warn!("export failed for '{final_name}': {err}");
                                    ExportRecord::Failed(err.to_string())
                                }
                            }
                        }
                        None => ExportRecord::Failed("group path did not resolve".to_string()),
                    };
                    (Some(final_name), Some(export))
                }
                _ => (None, None),
            };
            records.push(GroupRecord {
                display_path: group.display_path.clone(),
                tag: group.tag,
                outcome,
                final_name,
                export,
            });
        }

        // Finalize the sink. This failure is process-level.
        sink.finish()?;

        Ok(RunReport::new(records))
    }
}

/// Reduces page labels to association candidates.
///
/// A label survives the scan when its whole text is an asset identifier
/// and it sits within `max_distance` of at least one tagged group's
/// bounding box. Everything else on the page (dieline notes, dimensions,
/// stray identifiers in a far corner) never reaches the engine.
pub fn scan_labels(
    labels: &[TextLabel],
    matcher: &IdentMatcher,
    tagged: &[NormalizedGroup],
    max_distance: f64,
) -> Vec<MatchedLabel> {
    labels
        .iter()
        .filter_map(|label| {
            let id = matcher.match_label(&label.text)?;
            let near_a_group = tagged
                .iter()
                .any(|group| group.bounds.distance_to_point(label.position) <= max_distance);
            if near_a_group {
                Some(MatchedLabel::new(id, label.position))
            } else {
                debug!(
                    "label '{}' is an identifier but not near any tagged group",
                    label.text
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::ArtGroup;
    use crate::error::{ExportError, PackmatchError};
    use crate::geometry::{BoundingBox, Point};
    use crate::sink::DryRunSink;
    use crate::tags::TagVocabulary;
    use std::path::PathBuf;

    /// Sink that fails per-asset or at finish, for failure-path tests.
    struct FailingSink {
        fail_exports: bool,
        fail_finish: bool,
        exported: Vec<String>,
    }

    impl FailingSink {
        fn new(fail_exports: bool, fail_finish: bool) -> Self {
            Self {
                fail_exports,
                fail_finish,
                exported: Vec::new(),
            }
        }
    }

    impl ExportSink for FailingSink {
        fn export(&mut self, group: &ArtGroup, _scale: f64) -> std::result::Result<PathBuf, ExportError> {
            if self.fail_exports {
                return Err(ExportError::Rejected {
                    name: group.name.clone(),
                    reason: "simulated failure".to_string(),
                });
            }
            self.exported.push(group.name.clone());
            Ok(PathBuf::from(format!("{}.png", group.name)))
        }

        fn finish(&mut self) -> std::result::Result<(), ExportError> {
            if self.fail_finish {
                return Err(ExportError::Rejected {
                    name: "manifest".to_string(),
                    reason: "simulated finish failure".to_string(),
                });
            }
            Ok(())
        }
    }

    fn sample_document() -> ArtworkDocument {
        ArtworkDocument {
            groups: vec![ArtGroup::new(
                "Box A",
                BoundingBox::new(0.0, 0.0, 200.0, 200.0),
            )
            .with_child(ArtGroup::new(
                "FRONT",
                BoundingBox::new(50.0, 50.0, 150.0, 150.0),
            ))],
            labels: vec![TextLabel::new("ABCDEFG-12", Point::new(150.0, 50.0))],
        }
    }

    #[test]
    fn test_run_renames_and_reports() {
        let pipeline = ExportPipeline::new(PipelineConfig::default()).unwrap();
        let mut doc = sample_document();
        let mut sink = DryRunSink::new("preview");
        let report = pipeline.run(&mut doc, &mut sink).unwrap();

        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.matched, 1);
        let record = &report.records[0];
        assert_eq!(record.status(), "MATCHED");
        assert_eq!(record.display_path, "Box A/FRONT");
        assert_eq!(record.final_name.as_deref(), Some("ABCDEFG-12-F"));
        // The tree now carries the final asset name.
        assert_eq!(doc.groups[0].children[0].name, "ABCDEFG-12-F");
        // The untagged parent is untouched.
        assert_eq!(doc.groups[0].name, "Box A");
    }

    #[test]
    fn test_export_failure_is_recorded_not_fatal() {
        let pipeline = ExportPipeline::new(PipelineConfig::default()).unwrap();
        let mut doc = sample_document();
        let mut sink = FailingSink::new(true, false);
        let report = pipeline.run(&mut doc, &mut sink).unwrap();

        let record = &report.records[0];
        assert_eq!(record.status(), "EXPORT_FAILED");
        assert_eq!(report.summary.matched, 1);
        assert_eq!(report.summary.export_failures, 1);
        // The rename is not rolled back by a failed export.
        assert_eq!(doc.groups[0].children[0].name, "ABCDEFG-12-F");
    }

    #[test]
    fn test_finish_failure_is_fatal() {
        let pipeline = ExportPipeline::new(PipelineConfig::default()).unwrap();
        let mut doc = sample_document();
        let mut sink = FailingSink::new(false, true);
        let result = pipeline.run(&mut doc, &mut sink);
        assert!(matches!(result, Err(PackmatchError::Export(_))));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = PipelineConfig::default().with_scale(-1.0);
        assert!(matches!(
            ExportPipeline::new(config),
            Err(ConfigError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_document_without_tags_yields_empty_report() {
        let pipeline = ExportPipeline::new(PipelineConfig::default()).unwrap();
        let mut doc = ArtworkDocument {
            groups: vec![ArtGroup::new(
                "just artwork",
                BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            )],
            labels: vec![TextLabel::new("ABCDEFG-12", Point::new(5.0, 5.0))],
        };
        let mut sink = DryRunSink::new("preview");
        let report = pipeline.run(&mut doc, &mut sink).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.summary.total, 0);
    }

    #[test]
    fn test_scan_drops_non_identifiers() {
        let matcher = IdentMatcher::default();
        let mut doc = sample_document();
        let tagged = normalize_tags(&mut doc, &TagVocabulary::default());

        let labels = vec![
            TextLabel::new("ABCDEFG-12", Point::new(150.0, 50.0)),
            TextLabel::new("cut here", Point::new(150.0, 50.0)),
            TextLabel::new("ID: ABCDEFG-12", Point::new(150.0, 50.0)),
        ];
        let candidates = scan_labels(&labels, &matcher, &tagged, 50.0);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id.as_str(), "ABCDEFG-12");
    }

    #[test]
    fn test_scan_drops_labels_far_from_every_tagged_group() {
        let matcher = IdentMatcher::default();
        let mut doc = sample_document();
        let tagged = normalize_tags(&mut doc, &TagVocabulary::default());

        let labels = vec![
            // On the box corner: distance zero.
            TextLabel::new("ABCDEFG-12", Point::new(150.0, 50.0)),
            // 40 units right of the box edge: within the 50-unit cap.
            TextLabel::new("HIJKLMN-34", Point::new(190.0, 100.0)),
            // 60 units out: dropped.
            TextLabel::new("OPQRSTU-56", Point::new(210.0, 100.0)),
        ];
        let candidates = scan_labels(&labels, &matcher, &tagged, 50.0);
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ABCDEFG-12", "HIJKLMN-34"]);
    }

    #[test]
    fn test_scan_with_no_tagged_groups_drops_everything() {
        let matcher = IdentMatcher::default();
        let labels = vec![TextLabel::new("ABCDEFG-12", Point::new(0.0, 0.0))];
        let candidates = scan_labels(&labels, &matcher, &[], 50.0);
        assert!(candidates.is_empty());
    }
}
