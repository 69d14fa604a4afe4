//! Label-to-group association engine.
//!
//! Pairs tagged groups with identifier labels by geometry alone. Candidates
//! for a group are the labels in its lower-right quadrant within the
//! distance cap; groups then claim labels greedily, globally closest pair
//! first, so a label between two panels goes to the panel it sits closer
//! to regardless of document order. Each label is claimed at most once.
//!
//! The outcome vector is aligned with the input groups: one entry per
//! tagged group, in document order, whatever order claiming ran in.

use std::collections::BTreeMap;

use log::debug;

use crate::config::PipelineConfig;
use crate::geometry::{quadrant_ok, Point};
use crate::ident::CanonicalId;
use crate::normalize::NormalizedGroup;

/// A label that survived the scan: recognized identifier plus position.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedLabel {
    /// Canonical identifier parsed from the label text.
    pub id: CanonicalId,
    /// Anchor position of the source text object.
    pub position: Point,
}

impl MatchedLabel {
    /// Creates a new matched label.
    #[must_use = "creates a new matched label"]
    pub fn new(id: CanonicalId, position: Point) -> Self {
        Self { id, position }
    }
}

/// How association ended for one tagged group.
///
/// Exactly one outcome exists per tagged group per run; all five are
/// reported, not just matches.
#[derive(Debug, Clone, PartialEq)]
pub enum AssociationOutcome {
    /// The group claimed a label.
    Matched {
        /// Identifier of the claimed label.
        label: CanonicalId,
        /// Origin-to-label distance at claim time.
        distance: f64,
    },
    /// Labels exist in the quadrant, but all beyond the distance cap.
    NoCandidateInRange,
    /// No label at all in the group's lower-right quadrant.
    NoCandidateInQuadrant,
    /// Two or more nearest candidates were equally close; claiming one
    /// would be arbitrary, so none is.
    AmbiguousTie {
        /// Distance of the tied nearest candidates.
        distance: f64,
    },
    /// Every candidate was claimed by a closer group first.
    AlreadyAssigned,
}

struct Candidate {
    label_index: usize,
    distance: f64,
}

/// Associates tagged groups with scanned labels.
///
/// Returns one [`AssociationOutcome`] per group, in the same order as
/// `groups`. Labels are claimed greedily by ascending best-candidate
/// distance; between groups whose best candidates are exactly equidistant,
/// document order decides who claims first.
pub fn associate(
    groups: &[NormalizedGroup],
    labels: &[MatchedLabel],
    config: &PipelineConfig,
) -> Vec<AssociationOutcome> {
    let mut outcomes: BTreeMap<usize, AssociationOutcome> = BTreeMap::new();

    // Build each group's candidate pool, settling the two empty-pool
    // outcomes immediately. Pools are sorted by distance ascending.
    let mut pools: Vec<(usize, Vec<Candidate>)> = Vec::new();
    for (group_index, group) in groups.iter().enumerate() {
        let in_quadrant: Vec<Candidate> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| quadrant_ok(group.origin, label.position))
            .map(|(label_index, label)| Candidate {
                label_index,
                distance: group.origin.distance(label.position),
            })
            .collect();
        if in_quadrant.is_empty() {
            outcomes.insert(group_index, AssociationOutcome::NoCandidateInQuadrant);
            continue;
        }

        let mut pool: Vec<Candidate> = in_quadrant
            .into_iter()
            .filter(|c| c.distance <= config.max_distance_quadrant)
            .collect();
        if pool.is_empty() {
            outcomes.insert(group_index, AssociationOutcome::NoCandidateInRange);
            continue;
        }

        pool.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        pools.push((group_index, pool));
    }

    // Claim greedily, globally closest first. The sort is stable, so groups
    // with exactly equal best distances keep document order.
    pools.sort_by(|(_, a), (_, b)| a[0].distance.total_cmp(&b[0].distance));
    let mut claimed = vec![false; labels.len()];
    for (group_index, pool) in pools {
        let available: Vec<&Candidate> = pool
            .iter()
            .filter(|c| !claimed[c.label_index])
            .collect();
        let outcome = match available.split_first() {
            None => AssociationOutcome::AlreadyAssigned,
            Some((best, rest)) => {
                // Pool order makes any tied runners-up a prefix of `rest`.
                let tied = rest
                    .iter()
                    .take_while(|c| c.distance - best.distance <= config.tie_epsilon)
                    .count();
                if tied > 0 {
                    debug!(
                        "group {group_index}: {} candidates tied at distance {:.2}",
                        tied + 1,
                        best.distance
                    );
                    AssociationOutcome::AmbiguousTie {
                        distance: best.distance,
                    }
                } else {
                    let label = &labels[best.label_index];
                    debug!(
                        "group {group_index}: claimed label '{}' at distance {:.2}",
                        label.id, best.distance
                    );
                    claimed[best.label_index] = true;
                    AssociationOutcome::Matched {
                        label: label.id.clone(),
                        distance: best.distance,
                    }
                }
            }
        };
        outcomes.insert(group_index, outcome);
    }

    outcomes.into_values().collect()
}
