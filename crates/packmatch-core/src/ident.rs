//! Asset identifier recognition.
//!
//! Production labels carry asset identifiers like `ABCDEFG-12`: a stem of
//! alphanumeric characters, optionally followed by a hyphen-separated
//! suffix run. [`IdentMatcher`] decides whether a label's text is an
//! identifier and reduces accepted text to its canonical form.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default minimum stem length, in characters.
pub const DEFAULT_STEM_MIN: usize = 7;
/// Default maximum stem length, in characters.
pub const DEFAULT_STEM_MAX: usize = 11;
/// Default minimum suffix length, in characters.
pub const DEFAULT_SUFFIX_MIN: usize = 2;
/// Default maximum suffix length, in characters.
pub const DEFAULT_SUFFIX_MAX: usize = 3;

static DEFAULT_MATCHER: LazyLock<IdentMatcher> = LazyLock::new(|| {
    IdentMatcher::new(IdentBounds::default()).expect("default identifier bounds are valid")
});

/// Run-length bounds for the two alphanumeric runs of an asset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentBounds {
    /// Minimum stem length.
    pub stem_min: usize,
    /// Maximum stem length.
    pub stem_max: usize,
    /// Minimum suffix length.
    pub suffix_min: usize,
    /// Maximum suffix length.
    pub suffix_max: usize,
}

impl Default for IdentBounds {
    fn default() -> Self {
        Self {
            stem_min: DEFAULT_STEM_MIN,
            stem_max: DEFAULT_STEM_MAX,
            suffix_min: DEFAULT_SUFFIX_MIN,
            suffix_max: DEFAULT_SUFFIX_MAX,
        }
    }
}

impl IdentBounds {
    /// Checks that both runs have non-zero, non-inverted length ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stem_min == 0 || self.stem_min > self.stem_max {
            return Err(ConfigError::InvalidIdentBounds(format!(
                "stem bounds {}..={} must satisfy 1 <= min <= max",
                self.stem_min, self.stem_max
            )));
        }
        if self.suffix_min == 0 || self.suffix_min > self.suffix_max {
            return Err(ConfigError::InvalidIdentBounds(format!(
                "suffix bounds {}..={} must satisfy 1 <= min <= max",
                self.suffix_min, self.suffix_max
            )));
        }
        Ok(())
    }
}

/// A recognized asset identifier, reduced to canonical form.
///
/// Canonical form strips whitespace around the hyphen but preserves the
/// original casing: `"ABCDEFG - 12"` and `"ABCDEFG-12"` both canonicalize
/// to `ABCDEFG-12`, while `"abcdefg-12"` stays lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Wraps an already-canonical identifier string.
    ///
    /// Normally produced by [`IdentMatcher::match_label`]; direct
    /// construction is for tests and callers that store canonical IDs.
    #[must_use = "creates a new canonical identifier"]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use = "returns the canonical identifier text"]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalId {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whole-string matcher for asset identifiers.
///
/// Accepted shape: an ASCII-alphanumeric stem, optionally followed by a
/// hyphen with optional whitespace on either side and an alphanumeric
/// suffix run. The whole label text must match; leading or trailing
/// characters of any kind disqualify it.
#[derive(Debug, Clone)]
pub struct IdentMatcher {
    bounds: IdentBounds,
    pattern: Regex,
}

impl Default for IdentMatcher {
    /// Returns the matcher for the default bounds, compiled once per process.
    fn default() -> Self {
        DEFAULT_MATCHER.clone()
    }
}

impl IdentMatcher {
    /// Builds a matcher for the given run-length bounds.
    pub fn new(bounds: IdentBounds) -> Result<Self, ConfigError> {
        bounds.validate()?;
        let pattern = Regex::new(&format!(
            r"^([A-Za-z0-9]{{{},{}}})(?:\s*-\s*([A-Za-z0-9]{{{},{}}}))?$",
            bounds.stem_min, bounds.stem_max, bounds.suffix_min, bounds.suffix_max
        ))
        .expect("validated bounds produce a valid pattern");
        Ok(Self { bounds, pattern })
    }

    /// Returns the bounds this matcher was built with.
    #[inline]
    #[must_use = "returns the matcher's run-length bounds"]
    pub const fn bounds(&self) -> IdentBounds {
        self.bounds
    }

    /// Tests label text against the identifier shape.
    ///
    /// Returns the canonical identifier on a whole-string match, `None`
    /// otherwise. Never partial-matches: `"ID: ABCDEFG-12"` is not an
    /// identifier.
    #[must_use = "returns the canonical identifier if the text matches"]
    pub fn match_label(&self, text: &str) -> Option<CanonicalId> {
        let captures = self.pattern.captures(text)?;
        let stem = captures.get(1)?.as_str();
        match captures.get(2) {
            Some(suffix) => Some(CanonicalId(format!("{stem}-{}", suffix.as_str()))),
            None => Some(CanonicalId(stem.to_string())),
        }
    }
}
