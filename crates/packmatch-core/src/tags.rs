//! Panel tags and the vocabulary that maps group names onto them.
//!
//! A panel tag names one face of a packaging die line. Artwork documents
//! arrive with a mix of canonical tag names and legacy spellings; the
//! [`TagVocabulary`] is the ordered lookup table that decides which group
//! names count as tags and what canonical tag each one means.

use serde::{Deserialize, Serialize};

/// Canonical panel tag for one face of a packaging layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelTag {
    /// Front panel
    #[serde(rename = "F")]
    Front,
    /// Back panel
    #[serde(rename = "B")]
    Back,
    /// First side panel
    #[serde(rename = "S1")]
    Side1,
    /// Second side panel
    #[serde(rename = "S2")]
    Side2,
    /// Inside surface
    #[serde(rename = "IN")]
    Inside,
}

impl PanelTag {
    /// All canonical tags, in layout order.
    pub const ALL: [Self; 5] = [
        Self::Front,
        Self::Back,
        Self::Side1,
        Self::Side2,
        Self::Inside,
    ];

    /// Returns the canonical short form used in group names and file names.
    #[inline]
    #[must_use = "returns the canonical short form of the tag"]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "F",
            Self::Back => "B",
            Self::Side1 => "S1",
            Self::Side2 => "S2",
            Self::Inside => "IN",
        }
    }
}

impl std::fmt::Display for PanelTag {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PanelTag {
    type Err = String;

    /// Parses a canonical short form. Matching is case-sensitive: tag names
    /// in artwork are exact strings, so `"f"` is not a tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(Self::Front),
            "B" => Ok(Self::Back),
            "S1" => Ok(Self::Side1),
            "S2" => Ok(Self::Side2),
            "IN" => Ok(Self::Inside),
            _ => Err(format!("unknown panel tag: '{s}'")),
        }
    }
}

/// One vocabulary entry: a group name that counts as a panel tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapping {
    /// Exact group name to recognize.
    pub name: String,
    /// Canonical tag the name maps to.
    pub tag: PanelTag,
}

/// Ordered, case-sensitive lookup table from group names to panel tags.
///
/// The default vocabulary recognizes the five canonical short forms plus the
/// legacy spellings `FRONT`, `BACK` and `INSIDE`. Lookups compare whole
/// names exactly; when two entries share a name, the earlier one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagVocabulary {
    entries: Vec<TagMapping>,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        let mut entries: Vec<TagMapping> = PanelTag::ALL
            .iter()
            .map(|&tag| TagMapping {
                name: tag.as_str().to_string(),
                tag,
            })
            .collect();
        entries.push(TagMapping {
            name: "FRONT".to_string(),
            tag: PanelTag::Front,
        });
        entries.push(TagMapping {
            name: "BACK".to_string(),
            tag: PanelTag::Back,
        });
        entries.push(TagMapping {
            name: "INSIDE".to_string(),
            tag: PanelTag::Inside,
        });
        Self { entries }
    }
}

impl TagVocabulary {
    /// Creates an empty vocabulary. Rejected by configuration validation
    /// unless entries are added.
    #[must_use = "creates a new empty vocabulary"]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry, keeping existing order. Returns `self` for chaining.
    #[must_use = "returns the vocabulary with the entry appended"]
    pub fn with_entry(mut self, name: impl Into<String>, tag: PanelTag) -> Self {
        self.entries.push(TagMapping {
            name: name.into(),
            tag,
        });
        self
    }

    /// Looks up a group name. Exact, case-sensitive comparison against the
    /// whole name; no trimming or substring matching.
    #[must_use = "returns the tag the name maps to, if any"]
    pub fn lookup(&self, name: &str) -> Option<PanelTag> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.tag)
    }

    /// Returns the entries in lookup order.
    #[must_use = "returns the vocabulary entries"]
    pub fn entries(&self) -> &[TagMapping] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use = "returns the number of vocabulary entries"]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the vocabulary has no entries.
    #[must_use = "returns whether the vocabulary is empty"]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
