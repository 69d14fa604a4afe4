//! Tag normalization pass.
//!
//! Walks the group tree depth-first and rewrites every group whose name the
//! vocabulary recognizes to its canonical tag short form. Matching freezes
//! the subtree: children of a tagged group belong to that panel's artwork
//! and are never inspected, so nested tag-like names inside a panel stay
//! untouched. One document walk, names compared exactly.

use log::debug;

use crate::artwork::{ArtGroup, ArtworkDocument, GroupPath};
use crate::geometry::{BoundingBox, Point};
use crate::tags::{PanelTag, TagVocabulary};

/// One group the normalization pass recognized as a panel tag.
///
/// Records everything later passes need: where the group lives, what it
/// was called before the rename, and the association origin derived from
/// its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGroup {
    /// Index path of the group in the document tree.
    pub path: GroupPath,
    /// Canonical tag the group's name mapped to.
    pub tag: PanelTag,
    /// Group name before normalization (`"FRONT"`, not `"F"`).
    pub original_name: String,
    /// Slash-joined path of pre-normalization names, for audit lines.
    /// Ancestors of a tagged group are by construction untagged, so their
    /// names are stable for the whole run.
    pub display_path: String,
    /// Bounding box of the group, for the label proximity pre-filter.
    pub bounds: BoundingBox,
    /// Association origin: the centroid of the group's bounding box.
    pub origin: Point,
}

/// Normalizes tagged group names in place and returns the tagged groups in
/// document order.
///
/// Top-level groups are checked first; an unrecognized group is descended
/// into, a recognized one is renamed to [`PanelTag::as_str`] and its
/// subtree skipped. The returned order is depth-first encounter order,
/// which every later pass treats as document order.
pub fn normalize_tags(
    document: &mut ArtworkDocument,
    vocabulary: &TagVocabulary,
) -> Vec<NormalizedGroup> {
    let mut tagged = Vec::new();
    let mut path = Vec::new();
    normalize_children(&mut document.groups, vocabulary, &mut path, "", &mut tagged);
    tagged
}

fn normalize_children(
    children: &mut [ArtGroup],
    vocabulary: &TagVocabulary,
    path: &mut Vec<usize>,
    parent_display: &str,
    tagged: &mut Vec<NormalizedGroup>,
) {
    for (index, child) in children.iter_mut().enumerate() {
        path.push(index);
        let display_path = if parent_display.is_empty() {
            child.name.clone()
        } else {
            format!("{parent_display}/{}", child.name)
        };

        if let Some(tag) = vocabulary.lookup(&child.name) {
            debug!(
                "normalized group '{display_path}' (depth {}) to tag {tag}",
                child.depth
            );
            let original_name = std::mem::replace(&mut child.name, tag.as_str().to_string());
            tagged.push(NormalizedGroup {
                path: GroupPath::new(path.clone()),
                tag,
                original_name,
                display_path,
                bounds: child.bounds,
                origin: child.bounds.centroid(),
            });
        } else {
            normalize_children(&mut child.children, vocabulary, path, &display_path, tagged);
        }
        path.pop();
    }
}
