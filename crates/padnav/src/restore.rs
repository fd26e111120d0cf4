#![forbid(unsafe_code)]

//! Focus restoration: one fallback chain, three entry points.
//!
//! ```text
//!   current ─▶ explicit ─▶ previous ─▶ history (pop) ─▶ first in context
//!   ▲          ▲                       ▲
//!   │          │                       └─ overlay close
//!   │          └─ general restore (explicit target or saved snapshot)
//!   └─ full-screen return
//! ```
//!
//! Every step revalidates its handle against the live tree and the active
//! overlay scope. History entries that fail validation are discarded as
//! they are popped.

use padnav_core::{NodeId, VisualTree};

use crate::candidates::{first_focusable, is_focusable_in_scope};
use crate::state::FocusState;

/// Where restoration starts in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePolicy {
    /// Explicit target (or the saved snapshot), then previous, history,
    /// first in context.
    General { explicit: Option<NodeId> },
    /// History, then first in context.
    OverlayClose,
    /// Keep current if still valid, then the general chain.
    FullScreenReturn,
    /// The general chain without an explicit target. Reads the saved
    /// snapshot but leaves it for a later restore.
    Recovery,
}

/// Which step of the chain produced the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreSource {
    Current,
    Explicit,
    Previous,
    History,
    FirstInContext,
}

impl RestoreSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            RestoreSource::Current => "current",
            RestoreSource::Explicit => "explicit",
            RestoreSource::Previous => "previous",
            RestoreSource::History => "history",
            RestoreSource::FirstInContext => "first-in-context",
        }
    }
}

/// A successful restoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restored {
    pub target: NodeId,
    pub source: RestoreSource,
}

impl Restored {
    fn new(target: NodeId, source: RestoreSource) -> Self {
        Self { target, source }
    }
}

/// Resolve a restore target under `policy`.
///
/// Consumes the saved snapshot (general and full-screen policies) and pops history entries
/// up to and including the one returned. Does not change `current`.
pub fn resolve<T: VisualTree>(
    tree: &T,
    state: &mut FocusState,
    policy: RestorePolicy,
) -> Option<Restored> {
    let valid = |id: NodeId| is_focusable_in_scope(tree, id);

    let explicit = match policy {
        RestorePolicy::OverlayClose => return from_history(tree, state),
        RestorePolicy::FullScreenReturn => {
            if let Some(current) = state.current().filter(|&id| valid(id)) {
                return Some(Restored::new(current, RestoreSource::Current));
            }
            state.take_saved()
        }
        RestorePolicy::General { explicit } => {
            let saved = state.take_saved();
            explicit.or(saved)
        }
        RestorePolicy::Recovery => state.saved(),
    };

    if let Some(id) = explicit.filter(|&id| valid(id)) {
        return Some(Restored::new(id, RestoreSource::Explicit));
    }
    if let Some(id) = state.previous().filter(|&id| valid(id)) {
        return Some(Restored::new(id, RestoreSource::Previous));
    }
    from_history(tree, state)
}

fn from_history<T: VisualTree>(tree: &T, state: &mut FocusState) -> Option<Restored> {
    while let Some(id) = state.history_mut().pop() {
        if is_focusable_in_scope(tree, id) {
            return Some(Restored::new(id, RestoreSource::History));
        }
    }
    first_focusable(tree).map(|id| Restored::new(id, RestoreSource::FirstInContext))
}
