#![forbid(unsafe_code)]

//! Context classifier: which region the focused target lives in.
//!
//! Precedence: an open overlay wins regardless of where focus is, then a
//! list-panel ancestor, then a grid-cell marker on the target itself, then
//! main content. The result only picks which specialized navigator runs
//! first; the generic scorer remains the fallback for every context.

use std::fmt;

use padnav_core::{FocusTarget, NodeId, OverlayKind, RegionTags, VisualTree};

use crate::candidates::active_overlay;

/// Navigation context of the current focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavContext {
    Main,
    Overlay(OverlayKind),
    ListPanel,
    Grid,
}

impl NavContext {
    pub const fn as_str(self) -> &'static str {
        match self {
            NavContext::Main => "main",
            NavContext::Overlay(_) => "overlay",
            NavContext::ListPanel => "list-panel",
            NavContext::Grid => "grid",
        }
    }
}

impl fmt::Display for NavContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the context of `current`.
pub fn classify<T: VisualTree>(tree: &T, current: Option<NodeId>) -> NavContext {
    if let Some((kind, _)) = active_overlay(tree) {
        return NavContext::Overlay(kind);
    }
    let Some(current) = current else {
        return NavContext::Main;
    };
    if tree.region_root(current, RegionTags::LIST_PANEL).is_some() {
        return NavContext::ListPanel;
    }
    let is_cell = tree.target(current).is_some_and(|n| {
        n.region_tags().contains(RegionTags::GRID_CELL) || n.column_index().is_some()
    });
    if is_cell {
        NavContext::Grid
    } else {
        NavContext::Main
    }
}
