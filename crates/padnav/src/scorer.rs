#![forbid(unsafe_code)]

//! Generic spatial scoring: the fallback navigator for every context.
//!
//! # Algorithm
//!
//! 1. Drop every candidate that fails the direction gate
//!    ([`in_direction`]).
//! 2. Score the rest: `distance + angle_weight × angle_deviation`, where the
//!    deviation is the folded 0–180° difference between the bearing to the
//!    candidate and the ideal bearing of the direction.
//! 3. Stable-sort ascending; the lowest score wins and ties keep input
//!    order.
//!
//! With the default weight of 2, a far but well-aligned candidate beats a
//! near diagonal one.
//!
//! # Invariants
//!
//! - Zero qualifying candidates yields `None`, never an error.
//! - Same inputs, same ranking.

use padnav_core::geometry::{angle_deviation, distance, in_direction};
use padnav_core::{Direction, NodeId, Point};

/// Scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreParams {
    /// Direction-gate threshold.
    pub threshold: f64,
    /// Weight of the angular deviation.
    pub angle_weight: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            threshold: padnav_core::geometry::DEFAULT_DIRECTION_THRESHOLD,
            angle_weight: 2.0,
        }
    }
}

/// A candidate that passed the direction gate, with its score breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub id: NodeId,
    pub center: Point,
    pub distance: f64,
    pub angle_deviation: f64,
    pub score: f64,
}

/// Score and rank `candidates` for a move from `origin` in `dir`.
pub fn score_candidates(
    origin: Point,
    candidates: &[(NodeId, Point)],
    dir: Direction,
    params: ScoreParams,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .filter(|(_, c)| in_direction(origin, *c, dir, params.threshold))
        .map(|&(id, center)| {
            let distance = distance(origin, center);
            let angle_deviation = angle_deviation(origin, center, dir);
            ScoredCandidate {
                id,
                center,
                distance,
                angle_deviation,
                score: distance + params.angle_weight * angle_deviation,
            }
        })
        .collect();
    scored.sort_by(|a, b| a.score.total_cmp(&b.score));
    scored
}

/// Best candidate for a move from `origin` in `dir`.
pub fn best_candidate(
    origin: Point,
    candidates: &[(NodeId, Point)],
    dir: Direction,
    params: ScoreParams,
) -> Option<NodeId> {
    score_candidates(origin, candidates, dir, params)
        .first()
        .map(|c| c.id)
}

/// Direction-agnostic nearest neighbor by center distance; ties keep input
/// order.
///
/// This is the default replacement finder for focus recovery.
pub fn nearest_by_distance(origin: Point, candidates: &[(NodeId, Point)]) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for &(id, center) in candidates {
        let d = distance(origin, center);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((id, d));
        }
    }
    best.map(|(id, _)| id)
}
