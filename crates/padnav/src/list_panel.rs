#![forbid(unsafe_code)]

//! List-panel navigator: vertical movement that never leaves the panel.
//!
//! Items of a side list share one horizontal band, so the nearest candidate
//! by vertical distance alone wins and the bearing is ignored. Free-text
//! fields swallow vertical keys so single-line editing keeps working.

use padnav_core::geometry::in_direction;
use padnav_core::{Direction, FocusTarget, NodeId, RegionTags, VisualTree};

use crate::perf::GeometryCache;

/// Result of a list-panel move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMove {
    /// Move to this target.
    Moved(NodeId),
    /// Focus is on a free-text field; the key belongs to the field.
    Swallowed,
    /// No candidate further along the panel; focus is preserved.
    Blocked,
    /// Not a vertical move inside a list-panel.
    NotApplicable,
}

/// Try a vertical move inside the list-panel containing `current`.
pub fn navigate<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    current: NodeId,
    candidates: &[NodeId],
    dir: Direction,
    threshold: f64,
) -> PanelMove {
    if !dir.is_vertical() {
        return PanelMove::NotApplicable;
    }
    let Some(panel) = tree.region_root(current, RegionTags::LIST_PANEL) else {
        return PanelMove::NotApplicable;
    };
    if tree.target(current).is_some_and(FocusTarget::is_free_text) {
        return PanelMove::Swallowed;
    }
    let Some(origin) = cache.center(tree, current) else {
        return PanelMove::NotApplicable;
    };

    let mut best: Option<(NodeId, f64)> = None;
    for &id in candidates {
        if id == current || !tree.is_within(id, panel) {
            continue;
        }
        if tree.target(id).is_none_or(FocusTarget::is_free_text) {
            continue;
        }
        let Some(center) = cache.center(tree, id) else {
            continue;
        };
        if !in_direction(origin, center, dir, threshold) {
            continue;
        }
        let dy = (center.y - origin.y).abs();
        if best.is_none_or(|(_, best_dy)| dy < best_dy) {
            best = Some((id, dy));
        }
    }

    match best {
        Some((id, _)) => PanelMove::Moved(id),
        None => PanelMove::Blocked,
    }
}
