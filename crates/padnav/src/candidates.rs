#![forbid(unsafe_code)]

//! Candidate provider: which nodes may receive directional focus right now.
//!
//! # Invariants
//!
//! - A candidate carries the eligible marker, is not disabled, and is
//!   visible and attached (see [`VisualTree::is_visible`]).
//! - While an overlay is active, only candidates inside it are returned.
//!   Simultaneous overlays resolve by [`OverlayKind::PRECEDENCE`], never by
//!   opening order.
//! - Results are in document order.

use padnav_core::{FocusTarget, NodeId, OverlayKind, VisualTree};

/// `true` if `id` satisfies the focus invariant: eligible, enabled, visible,
/// and attached.
pub fn is_valid_target<T: VisualTree>(tree: &T, id: NodeId) -> bool {
    tree.target(id)
        .is_some_and(|n| n.is_eligible() && !n.is_disabled())
        && tree.is_visible(id)
}

/// The overlay that currently isolates navigation, if any.
pub fn active_overlay<T: VisualTree>(tree: &T) -> Option<(OverlayKind, NodeId)> {
    tree.active_overlays()
        .into_iter()
        .min_by_key(|(kind, _)| kind.rank())
}

/// `true` if `id` lies inside the active overlay, or no overlay is active.
pub fn in_scope<T: VisualTree>(tree: &T, id: NodeId) -> bool {
    match active_overlay(tree) {
        Some((_, root)) => tree.is_within(id, root),
        None => true,
    }
}

/// `true` if `id` is a valid target inside the current navigation scope.
pub fn is_focusable_in_scope<T: VisualTree>(tree: &T, id: NodeId) -> bool {
    is_valid_target(tree, id) && in_scope(tree, id)
}

/// Every valid target in the tree, ignoring overlays.
pub fn all_eligible<T: VisualTree>(tree: &T) -> Vec<NodeId> {
    tree.document_order()
        .into_iter()
        .filter(|&id| is_valid_target(tree, id))
        .collect()
}

/// Every valid target in the current navigation scope.
pub fn all_focusable<T: VisualTree>(tree: &T) -> Vec<NodeId> {
    match active_overlay(tree) {
        Some((_, root)) => tree
            .document_order()
            .into_iter()
            .filter(|&id| tree.is_within(id, root) && is_valid_target(tree, id))
            .collect(),
        None => all_eligible(tree),
    }
}

/// First valid target in the current navigation scope.
pub fn first_focusable<T: VisualTree>(tree: &T) -> Option<NodeId> {
    all_focusable(tree).into_iter().next()
}

/// First valid target anywhere in the tree.
pub fn first_eligible<T: VisualTree>(tree: &T) -> Option<NodeId> {
    tree.document_order()
        .into_iter()
        .find(|&id| is_valid_target(tree, id))
}
