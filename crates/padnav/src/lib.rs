#![forbid(unsafe_code)]

//! Spatial focus navigation for D-pad, remote, and arrow-key interfaces.
//!
//! # Role in padnav
//! `padnav` is the engine. It turns a direction into a focus change by
//! looking only at where targets sit on screen, special-cases side
//! list-panels, content grids, and overlays, and keeps focus valid while the
//! host tree mutates underneath it.
//!
//! # Primary responsibilities
//! - **Candidates**: which targets may receive focus now, honoring overlay
//!   isolation.
//! - **Scoring**: `distance + 2 × angle deviation` over the direction gate.
//! - **Region navigators**: list-panel containment, grid wrap and column
//!   preference, cross-region hand-off.
//! - **Focus state**: current/previous, bounded history, restoration
//!   policies.
//! - **Recovery**: mutation-driven replacement of an invalidated target.
//! - **Performance**: per-gesture geometry cache, pre-filter, debouncing,
//!   and gesture timing.
//!
//! # How it fits in the system
//! A host implements [`padnav_core::VisualTree`] for its UI and owns a
//! [`SpatialNavigator`]. Key events go to [`SpatialNavigator::move_focus`]
//! (or the debounced [`SpatialNavigator::request_move`] /
//! [`SpatialNavigator::poll`] pair); mutation batches go to
//! [`SpatialNavigator::handle_mutations`].

pub mod candidates;
pub mod config;
pub mod context;
pub mod grid;
pub mod list_panel;
pub mod navigator;
pub mod perf;
pub mod recovery;
pub mod restore;
pub mod scorer;
pub mod state;

pub use config::{NavConfig, NavConfigError};
pub use context::NavContext;
pub use navigator::{MoveOutcome, SpatialNavigator, UnchangedReason};
pub use perf::PerfStats;
pub use recovery::{NearestFn, RecoveryOutcome, RecoveryPath, RecoveryTrigger};
pub use restore::{RestoreSource, Restored};
pub use scorer::nearest_by_distance;
pub use state::FocusHistory;

pub use padnav_core::{
    Direction, FocusTarget, MutationRecord, NodeId, OverlayKind, ParseDirectionError, Point, Rect,
    RegionTags, VisualTree,
};
