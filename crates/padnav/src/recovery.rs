#![forbid(unsafe_code)]

//! Focus recovery: keep focus valid while the host tree mutates.
//!
//! A [`MutationWatch`] inspects each delivered batch for a record that can
//! invalidate the focused target. When one fires and the target really is
//! invalid, a replacement is chosen in order:
//!
//! 1. the injected nearest-neighbor function, searching from the lost
//!    target's current center (or its last known center once detached)
//!    over the other candidates in navigation scope;
//! 2. the general restoration chain (saved, previous, history, first in
//!    context), leaving the saved snapshot in place;
//! 3. the first eligible target anywhere in the tree.
//!
//! If all three come up empty, focus becomes unset. Recovery never fails.

use std::fmt;

use padnav_core::{Attribute, MutationKind, MutationRecord, NodeId, Point, VisualTree};

use crate::candidates::{all_eligible, all_focusable, first_eligible, is_valid_target};
use crate::perf::GeometryCache;
use crate::restore::{self, RestorePolicy, RestoreSource};
use crate::state::FocusState;

/// Replacement finder: given the lost target's last center and the
/// remaining candidates with their centers, pick one.
///
/// [`crate::scorer::nearest_by_distance`] is the stock implementation.
pub type NearestFn = Box<dyn Fn(Point, &[(NodeId, Point)]) -> Option<NodeId>>;

/// Why the focused target was re-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryTrigger {
    /// Gained the disabled flag.
    Disabled,
    /// A style change hid it or an ancestor.
    Hidden,
    /// Lost the eligible marker.
    LostEligibility,
    /// It or an ancestor was removed from the tree.
    Detached,
}

impl RecoveryTrigger {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecoveryTrigger::Disabled => "disabled",
            RecoveryTrigger::Hidden => "hidden",
            RecoveryTrigger::LostEligibility => "lost-eligibility",
            RecoveryTrigger::Detached => "detached",
        }
    }
}

impl fmt::Display for RecoveryTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a replacement was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPath {
    Nearest,
    Restore(RestoreSource),
    FirstEligible,
}

/// Result of handling one mutation batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// The watch is stopped; the batch was ignored.
    Inactive,
    /// No record in the batch concerns the focused target.
    NoTrigger,
    /// A trigger fired but the focused target is still valid.
    StillValid(RecoveryTrigger),
    /// Focus moved to a replacement.
    Recovered {
        lost: NodeId,
        to: NodeId,
        trigger: RecoveryTrigger,
        path: RecoveryPath,
    },
    /// Nothing is eligible; focus is unset.
    Unset {
        lost: NodeId,
        trigger: RecoveryTrigger,
    },
}

/// On/off switch for mutation-driven recovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationWatch {
    active: bool,
}

impl MutationWatch {
    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// First record in `batch` that may have invalidated `current`.
pub fn detect_trigger<T: VisualTree>(
    tree: &T,
    current: NodeId,
    batch: &[MutationRecord],
) -> Option<RecoveryTrigger> {
    let concerns = |node: NodeId| node == current || tree.is_within(current, node);
    batch.iter().find_map(|record| match &record.kind {
        MutationKind::Attribute(Attribute::Disabled) if record.target == current => {
            Some(RecoveryTrigger::Disabled)
        }
        MutationKind::Attribute(Attribute::Eligible) if record.target == current => {
            Some(RecoveryTrigger::LostEligibility)
        }
        MutationKind::Attribute(Attribute::Style) if concerns(record.target) => {
            Some(RecoveryTrigger::Hidden)
        }
        MutationKind::ChildList { removed, .. } if removed.iter().any(|&r| concerns(r)) => {
            Some(RecoveryTrigger::Detached)
        }
        _ => None,
    })
}

/// Choose a replacement for `lost`. Does not change `current`.
pub fn find_replacement<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    state: &mut FocusState,
    nearest: Option<&NearestFn>,
    lost: NodeId,
) -> Option<(NodeId, RecoveryPath)> {
    if let (Some(nearest), Some(origin)) = (nearest, search_origin(tree, cache, state, lost)) {
        let mut pool: Vec<NodeId> = all_focusable(tree)
            .into_iter()
            .filter(|&id| id != lost)
            .collect();
        if pool.is_empty() {
            pool = all_eligible(tree)
                .into_iter()
                .filter(|&id| id != lost)
                .collect();
        }
        let centers = cache.centers(tree, &pool);
        if let Some(id) = nearest(origin, &centers).filter(|&id| is_valid_target(tree, id)) {
            return Some((id, RecoveryPath::Nearest));
        }
    }

    if let Some(restored) = restore::resolve(tree, state, RestorePolicy::Recovery) {
        return Some((restored.target, RecoveryPath::Restore(restored.source)));
    }

    first_eligible(tree).map(|id| (id, RecoveryPath::FirstEligible))
}

/// Where `lost` sits now if it is still attached, else where it was last
/// focused.
fn search_origin<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    state: &FocusState,
    lost: NodeId,
) -> Option<Point> {
    if tree.is_attached(lost) {
        if let Some(center) = cache.center(tree, lost) {
            return Some(center);
        }
    }
    state.last_center()
}
