//! Pipeline configuration.
//!
//! One [`PipelineConfig`] value carries every tunable the run needs. It is
//! validated once, up front, when the pipeline is constructed; components
//! downstream assume the invariants hold and never re-check.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ident::IdentBounds;
use crate::tags::TagVocabulary;

/// Default export scale factor.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Default maximum distance from a group's association origin to a
/// claimable label, in artboard units.
pub const DEFAULT_MAX_DISTANCE_QUADRANT: f64 = 500.0;

/// Default maximum distance from a label to the nearest tagged group's box
/// for the label to enter the candidate pool, in artboard units.
pub const DEFAULT_MAX_DISTANCE_PROXIMITY: f64 = 50.0;

/// Default tie-detection epsilon, in artboard units. Candidates whose
/// distances fall within this band of the minimum are indistinguishable.
pub const DEFAULT_TIE_EPSILON: f64 = 0.5;

/// Every tunable of an export-planning run.
///
/// Deserializes leniently: fields missing from a config file take their
/// defaults, so a file overriding a single threshold is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Export scale factor applied to asset dimensions.
    pub scale: f64,
    /// Maximum distance from a group's association origin to a claimable
    /// label. Candidates beyond this are out of range.
    pub max_distance_quadrant: f64,
    /// Maximum distance from a label to the nearest tagged group's bounding
    /// box. Labels further than this from every tagged group never become
    /// candidates.
    pub max_distance_proximity: f64,
    /// Two candidates whose distances differ by at most this much count as
    /// equally close.
    pub tie_epsilon: f64,
    /// Run-length bounds for asset identifier recognition.
    pub ident_bounds: IdentBounds,
    /// Group names recognized as panel tags.
    pub vocabulary: TagVocabulary,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            max_distance_quadrant: DEFAULT_MAX_DISTANCE_QUADRANT,
            max_distance_proximity: DEFAULT_MAX_DISTANCE_PROXIMITY,
            tie_epsilon: DEFAULT_TIE_EPSILON,
            ident_bounds: IdentBounds::default(),
            vocabulary: TagVocabulary::default(),
        }
    }
}

impl PipelineConfig {
    /// Sets the export scale factor.
    #[must_use = "returns the config with the scale applied"]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the maximum origin-to-label association distance.
    #[must_use = "returns the config with the distance applied"]
    pub fn with_max_distance_quadrant(mut self, distance: f64) -> Self {
        self.max_distance_quadrant = distance;
        self
    }

    /// Sets the maximum label-to-group pre-filter distance.
    #[must_use = "returns the config with the distance applied"]
    pub fn with_max_distance_proximity(mut self, distance: f64) -> Self {
        self.max_distance_proximity = distance;
        self
    }

    /// Sets the tie-detection epsilon.
    #[must_use = "returns the config with the epsilon applied"]
    pub fn with_tie_epsilon(mut self, epsilon: f64) -> Self {
        self.tie_epsilon = epsilon;
        self
    }

    /// Sets the identifier run-length bounds.
    #[must_use = "returns the config with the bounds applied"]
    pub fn with_ident_bounds(mut self, bounds: IdentBounds) -> Self {
        self.ident_bounds = bounds;
        self
    }

    /// Replaces the tag vocabulary.
    #[must_use = "returns the config with the vocabulary applied"]
    pub fn with_vocabulary(mut self, vocabulary: TagVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Checks every invariant the pipeline relies on.
    ///
    /// Called by [`ExportPipeline::new`](crate::pipeline::ExportPipeline::new);
    /// a run never starts with a config this rejects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        if !self.max_distance_quadrant.is_finite() || self.max_distance_quadrant <= 0.0 {
            return Err(ConfigError::InvalidDistance {
                name: "Quadrant distance",
                value: self.max_distance_quadrant,
            });
        }
        if !self.max_distance_proximity.is_finite() || self.max_distance_proximity <= 0.0 {
            return Err(ConfigError::InvalidDistance {
                name: "Proximity distance",
                value: self.max_distance_proximity,
            });
        }
        if !self.tie_epsilon.is_finite() || self.tie_epsilon < 0.0 {
            return Err(ConfigError::InvalidTieEpsilon(self.tie_epsilon));
        }
        self.ident_bounds.validate()?;
        if self.vocabulary.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::PanelTag;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scale, DEFAULT_SCALE);
        assert_eq!(config.max_distance_quadrant, DEFAULT_MAX_DISTANCE_QUADRANT);
        assert_eq!(config.max_distance_proximity, DEFAULT_MAX_DISTANCE_PROXIMITY);
        assert_eq!(config.tie_epsilon, DEFAULT_TIE_EPSILON);
    }

    #[test]
    fn test_builders_set_fields() {
        let config = PipelineConfig::default()
            .with_scale(2.0)
            .with_max_distance_quadrant(750.0)
            .with_max_distance_proximity(25.0)
            .with_tie_epsilon(0.0);
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.max_distance_quadrant, 750.0);
        assert_eq!(config.max_distance_proximity, 25.0);
        assert_eq!(config.tie_epsilon, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_scale_rejected() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = PipelineConfig::default().with_scale(scale);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidScale(_))),
                "scale {scale} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_distances_rejected() {
        let config = PipelineConfig::default().with_max_distance_quadrant(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDistance { name: "Quadrant distance", .. })
        ));

        let config = PipelineConfig::default().with_max_distance_proximity(-5.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDistance { name: "Proximity distance", .. })
        ));
    }

    #[test]
    fn test_negative_tie_epsilon_rejected_zero_allowed() {
        let config = PipelineConfig::default().with_tie_epsilon(-0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTieEpsilon(_))
        ));
        // Zero is a legal epsilon: only exact duplicates tie.
        let config = PipelineConfig::default().with_tie_epsilon(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        let config = PipelineConfig::default().with_vocabulary(TagVocabulary::empty());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyVocabulary)
        ));

        let config = PipelineConfig::default()
            .with_vocabulary(TagVocabulary::empty().with_entry("LID", PanelTag::Front));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"scale": 3.0}"#).unwrap();
        assert_eq!(config.scale, 3.0);
        assert_eq!(config.max_distance_quadrant, DEFAULT_MAX_DISTANCE_QUADRANT);
        assert_eq!(config.vocabulary, TagVocabulary::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = PipelineConfig::default().with_scale(1.5).with_tie_epsilon(2.0);
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
