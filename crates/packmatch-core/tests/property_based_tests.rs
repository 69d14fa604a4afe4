//! Property-Based Tests
//!
//! Tests using property-based testing (proptest) to verify invariants:
//! - Geometry predicates behave consistently over the whole plane
//! - Normalization is idempotent and never tags nested subtrees twice
//! - Association claims each label at most once, deterministically
//! - Pipeline reports stay internally consistent
//!
//! These tests complement unit tests by exploring the input space automatically.

use std::collections::HashMap;

use packmatch_core::{
    associate, normalize_tags, quadrant_ok, ArtGroup, ArtworkDocument, AssociationOutcome,
    BoundingBox, CanonicalId, DryRunSink, ExportPipeline, GroupPath, IdentMatcher, MatchedLabel,
    NormalizedGroup, PanelTag, PipelineConfig, Point, TagVocabulary, TextLabel,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_group() -> impl Strategy<Value = ArtGroup> {
    let name = prop::sample::select(vec![
        "F", "B", "S1", "S2", "IN", "FRONT", "BACK", "INSIDE", "Box A", "Box B", "artwork",
        "dieline", "notes",
    ]);
    let leaf = (name.clone(), 0.0f64..300.0, 0.0f64..300.0).prop_map(|(n, x, y)| {
        ArtGroup::new(n, BoundingBox::new(x, y, x + 20.0, y + 20.0))
    });
    leaf.prop_recursive(3, 24, 4, move |inner| {
        (
            name.clone(),
            0.0f64..300.0,
            0.0f64..300.0,
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(n, x, y, children)| {
                let mut group = ArtGroup::new(n, BoundingBox::new(x, y, x + 20.0, y + 20.0));
                group.children = children;
                group
            })
    })
}

fn tagged_group(index: usize, x: f64, y: f64) -> NormalizedGroup {
    NormalizedGroup {
        path: GroupPath::new(vec![index]),
        tag: PanelTag::Front,
        original_name: "FRONT".to_string(),
        display_path: format!("g{index}/FRONT"),
        bounds: BoundingBox::new(x - 5.0, y - 5.0, x + 5.0, y + 5.0),
        origin: Point::new(x, y),
    }
}

// ============================================================================
// Geometry Properties
// ============================================================================

/// Property: mutual lower-right containment means the same point
#[test]
fn proptest_quadrant_mutual_containment() {
    proptest!(|(
        ox in -500.0f64..500.0,
        oy in -500.0f64..500.0,
        cx in -500.0f64..500.0,
        cy in -500.0f64..500.0
    )| {
        let origin = Point::new(ox, oy);
        let candidate = Point::new(cx, cy);
        if quadrant_ok(origin, candidate) && quadrant_ok(candidate, origin) {
            prop_assert_eq!(origin, candidate);
        }
        // A point is always in its own quadrant.
        prop_assert!(quadrant_ok(origin, origin));
    });
}

/// Property: distance is symmetric and non-negative
#[test]
fn proptest_distance_symmetry() {
    proptest!(|(
        ax in -500.0f64..500.0,
        ay in -500.0f64..500.0,
        bx in -500.0f64..500.0,
        by in -500.0f64..500.0
    )| {
        let a = Point::new(ax, ay);
        let b = Point::new(bx, by);
        prop_assert!(a.distance(b) >= 0.0);
        prop_assert!((a.distance(b) - b.distance(a)).abs() < 1e-9);
    });
}

/// Property: box distance never exceeds distance to the centroid
#[test]
fn proptest_box_distance_bounded_by_centroid_distance() {
    proptest!(|(
        x0 in -200.0f64..200.0,
        y0 in -200.0f64..200.0,
        w in 0.0f64..100.0,
        h in 0.0f64..100.0,
        px in -400.0f64..400.0,
        py in -400.0f64..400.0
    )| {
        let bbox = BoundingBox::new(x0, y0, x0 + w, y0 + h);
        let point = Point::new(px, py);
        let d = bbox.distance_to_point(point);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= point.distance(bbox.centroid()) + 1e-9);
    });
}

// ============================================================================
// Normalization Properties
// ============================================================================

/// Property: normalizing an already-normalized tree changes nothing
#[test]
fn proptest_normalization_idempotent() {
    proptest!(|(groups in prop::collection::vec(arb_group(), 0..4))| {
        let vocabulary = TagVocabulary::default();
        let mut doc = ArtworkDocument { groups, labels: vec![] };

        let first = normalize_tags(&mut doc, &vocabulary);
        let after_first = doc.clone();
        let second = normalize_tags(&mut doc, &vocabulary);

        prop_assert_eq!(&doc, &after_first, "second pass mutated the tree");
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(a.path.indices(), b.path.indices());
            prop_assert_eq!(a.tag, b.tag);
        }
    });
}

/// Property: no tagged group is nested inside another tagged group
#[test]
fn proptest_tagged_groups_never_nest() {
    proptest!(|(groups in prop::collection::vec(arb_group(), 0..4))| {
        let mut doc = ArtworkDocument { groups, labels: vec![] };
        let tagged = normalize_tags(&mut doc, &TagVocabulary::default());

        for a in &tagged {
            for b in &tagged {
                if a.path == b.path {
                    continue;
                }
                let is_prefix = a.path.depth() < b.path.depth()
                    && b.path.indices()[..a.path.depth()] == *a.path.indices();
                prop_assert!(
                    !is_prefix,
                    "tagged group {:?} is an ancestor of tagged group {:?}",
                    a.path.indices(),
                    b.path.indices()
                );
            }
        }
    });
}

// ============================================================================
// Identifier Properties
// ============================================================================

/// Property: well-shaped identifiers always match and canonicalize cleanly
#[test]
fn proptest_identifier_shapes_accepted() {
    proptest!(|(
        stem in "[A-Za-z0-9]{7,11}",
        suffix in "[A-Za-z0-9]{2,3}",
        pad_left in "[ \t]{0,3}",
        pad_right in "[ \t]{0,3}"
    )| {
        let matcher = IdentMatcher::default();

        let text = format!("{stem}{pad_left}-{pad_right}{suffix}");
        let id = matcher.match_label(&text);
        prop_assert!(id.is_some(), "rejected {text:?}");
        let id = id.unwrap();
        prop_assert_eq!(id.as_str(), format!("{stem}-{suffix}"));

        // The bare stem is an identifier too.
        let bare = matcher.match_label(&stem);
        prop_assert!(bare.is_some());
        let bare = bare.unwrap();
        prop_assert_eq!(bare.as_str(), stem.as_str());
    });
}

// ============================================================================
// Association Properties
// ============================================================================

/// Property: one outcome per group, no label claimed twice, matches obey
/// the quadrant and range constraints, and the whole thing is deterministic
#[test]
fn proptest_association_invariants() {
    proptest!(|(
        origins in prop::collection::vec((0.0f64..400.0, 0.0f64..400.0), 1..6),
        label_points in prop::collection::vec((0.0f64..400.0, 0.0f64..400.0), 0..6)
    )| {
        let groups: Vec<NormalizedGroup> = origins
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| tagged_group(i, x, y))
            .collect();
        let labels: Vec<MatchedLabel> = label_points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                MatchedLabel::new(CanonicalId::new(format!("PROPID{i:02}")), Point::new(x, y))
            })
            .collect();
        let config = PipelineConfig::default();

        let outcomes = associate(&groups, &labels, &config);
        prop_assert_eq!(outcomes.len(), groups.len());

        let mut claimed: Vec<&str> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                AssociationOutcome::Matched { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        let total_claims = claimed.len();
        claimed.sort_unstable();
        claimed.dedup();
        prop_assert_eq!(claimed.len(), total_claims, "a label was claimed twice");

        let position_by_id: HashMap<&str, Point> = labels
            .iter()
            .map(|label| (label.id.as_str(), label.position))
            .collect();
        for (group, outcome) in groups.iter().zip(&outcomes) {
            if let AssociationOutcome::Matched { label, distance } = outcome {
                let position = position_by_id[label.as_str()];
                prop_assert!(quadrant_ok(group.origin, position));
                prop_assert!(*distance <= config.max_distance_quadrant);
                prop_assert!((group.origin.distance(position) - distance).abs() < 1e-9);
            }
        }

        let again = associate(&groups, &labels, &config);
        prop_assert_eq!(&outcomes, &again, "association is not deterministic");
    });
}

// ============================================================================
// Pipeline Properties
// ============================================================================

/// Property: reports are internally consistent for arbitrary documents
#[test]
fn proptest_report_consistency() {
    proptest!(ProptestConfig::with_cases(64), |(
        groups in prop::collection::vec(arb_group(), 0..4),
        label_points in prop::collection::vec((0.0f64..300.0, 0.0f64..300.0), 0..5)
    )| {
        let labels: Vec<TextLabel> = label_points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| TextLabel::new(format!("PROPID{i:02}"), Point::new(x, y)))
            .collect();
        let mut doc = ArtworkDocument { groups, labels };

        let pipeline = ExportPipeline::new(PipelineConfig::default()).unwrap();
        let mut sink = DryRunSink::new("preview");
        let report = pipeline.run(&mut doc, &mut sink).unwrap();

        let summary = report.summary;
        prop_assert_eq!(summary.total, report.records.len());
        prop_assert_eq!(
            summary.matched
                + summary.no_candidate_in_range
                + summary.no_candidate_in_quadrant
                + summary.ambiguous_tie
                + summary.already_assigned,
            summary.total
        );

        for record in &report.records {
            match (&record.outcome, &record.final_name) {
                (AssociationOutcome::Matched { label, .. }, Some(final_name)) => {
                    prop_assert_eq!(final_name, &format!("{}-{}", label, record.tag));
                }
                (AssociationOutcome::Matched { .. }, None) => {
                    prop_assert!(false, "matched record without a final name");
                }
                (_, Some(name)) => {
                    prop_assert!(false, "unmatched record carries final name {name:?}");
                }
                (_, None) => {}
            }
        }
    });
}
