//! Artwork document model.
//!
//! An [`ArtworkDocument`] is the pipeline's view of an open layout file: a
//! forest of named [`ArtGroup`]s plus the free-floating [`TextLabel`]s of
//! the page. Groups are addressed by [`GroupPath`] index paths so the two
//! mutation passes (tag normalization, match renaming) can write back into
//! the tree without holding references across passes.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point};

/// A named group in the artwork layer tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtGroup {
    /// Group name as authored. Rewritten in place when the group is
    /// normalized to a tag and again when a label match renames it.
    pub name: String,
    /// Bounding box of everything the group contains, in y-up artboard
    /// coordinates.
    pub bounds: BoundingBox,
    /// Nested child groups, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ArtGroup>,
    /// Nesting depth, 0 for a top-level group. Stamped by
    /// [`ArtworkDocument::assign_depths`] on load, never serialized.
    #[serde(skip)]
    pub depth: usize,
}

impl ArtGroup {
    /// Creates a leaf group with no children.
    #[must_use = "creates a new group"]
    pub fn new(name: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            name: name.into(),
            bounds,
            children: Vec::new(),
            depth: 0,
        }
    }

    /// Appends a child group, returning `self` for chaining.
    #[must_use = "returns the group with the child appended"]
    pub fn with_child(mut self, child: ArtGroup) -> Self {
        self.children.push(child);
        self
    }
}

/// A free-floating text object on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    /// Raw text content, exactly as authored.
    pub text: String,
    /// Anchor position in y-up artboard coordinates.
    pub position: Point,
}

impl TextLabel {
    /// Creates a new text label.
    #[must_use = "creates a new text label"]
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// Index path addressing one group inside an [`ArtworkDocument`].
///
/// The first index selects a top-level group, each following index a child
/// of the previous one. Paths stay valid across renames because renaming
/// never moves or removes nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupPath(Vec<usize>);

impl GroupPath {
    /// Creates a path from child indices, outermost first.
    #[must_use = "creates a new group path"]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Returns the child indices, outermost first.
    #[inline]
    #[must_use = "returns the indices of the path"]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Returns the nesting depth (1 for a top-level group).
    #[inline]
    #[must_use = "returns the nesting depth of the path"]
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// The pipeline's view of one open artwork document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtworkDocument {
    /// Top-level groups, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ArtGroup>,
    /// Free-floating text labels, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<TextLabel>,
}

impl ArtworkDocument {
    /// Walks the tree and stamps each group's nesting depth, top level at 0.
    ///
    /// Providers that build documents programmatically may leave `depth` at
    /// its default; the pipeline re-stamps it on entry.
    pub fn assign_depths(&mut self) {
        fn walk(group: &mut ArtGroup, depth: usize) {
            group.depth = depth;
            for child in &mut group.children {
                walk(child, depth + 1);
            }
        }
        for group in &mut self.groups {
            walk(group, 0);
        }
    }

    /// Resolves a path to a group, if every index is in range.
    ///
    /// The empty path addresses nothing: the virtual root is not a group
    /// and can never be renamed.
    #[must_use = "returns the group at the path, if any"]
    pub fn group_at(&self, path: &GroupPath) -> Option<&ArtGroup> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.groups.get(*first)?;
        for &idx in rest {
            current = current.children.get(idx)?;
        }
        Some(current)
    }

    /// Mutable variant of [`group_at`](Self::group_at).
    #[must_use = "returns the group at the path, if any"]
    pub fn group_at_mut(&mut self, path: &GroupPath) -> Option<&mut ArtGroup> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.groups.get_mut(*first)?;
        for &idx in rest {
            current = current.children.get_mut(idx)?;
        }
        Some(current)
    }
}
