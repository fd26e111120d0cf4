#![forbid(unsafe_code)]

//! Navigation orchestrator: one entry point per directional input.
//!
//! # Gesture pipeline
//!
//! ```text
//! move_focus(dir)
//!   │
//!   ├─ candidates ── empty ─────────────▶ Unchanged(NoTargets)
//!   ├─ current invalid ─────────────────▶ first candidate
//!   ├─ classify context
//!   │    ├─ list-panel ─ horizontal ─▶ cross-region ─▶ generic
//!   │    │             └ vertical ───▶ panel navigator
//!   │    ├─ grid ─ implicit row edge ─▶ cross-region
//!   │    │       └──────────────────▶ grid navigator
//!   │    └─ main / overlay ─────────▶ generic
//!   └─ set_focus + scroll_into_view, record history
//! ```
//!
//! Region navigators are authoritative: when one reports an edge, focus
//! stays put instead of falling through to the generic scorer. The generic
//! scorer runs only where no region navigator applies.
//!
//! Every gesture runs inside a [`GestureScope`], so the geometry cache is
//! empty again when `move_focus` returns, and is timed against the frame
//! budget.

use std::fmt;

use padnav_core::{Direction, FocusTarget, MutationRecord, NodeId, Point, RegionTags, VisualTree};
use web_time::Instant;

use crate::candidates::{all_focusable, is_focusable_in_scope, is_valid_target};
use crate::config::NavConfig;
use crate::context::{NavContext, classify};
use crate::grid::{self, GridMove};
use crate::list_panel::{self, PanelMove};
use crate::perf::{Debouncer, GeometryCache, GestureScope, PerfStats, prefilter};
use crate::recovery::{self, MutationWatch, NearestFn, RecoveryOutcome, detect_trigger};
use crate::restore::{self, RestorePolicy, Restored};
use crate::scorer::{ScoreParams, best_candidate};
use crate::state::{FocusHistory, FocusState};

/// Why a directional move left focus where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    /// Nothing qualified in the requested direction.
    NoCandidate,
    /// Focus is on a free-text field that owns the key.
    Swallowed,
    /// At a grid or list-panel boundary that does not wrap.
    Edge,
    /// No focusable target exists at all.
    NoTargets,
}

impl UnchangedReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            UnchangedReason::NoCandidate => "no-candidate",
            UnchangedReason::Swallowed => "swallowed",
            UnchangedReason::Edge => "edge",
            UnchangedReason::NoTargets => "no-targets",
        }
    }
}

impl fmt::Display for UnchangedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one directional move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Focus moved. `from` is `None` when there was no valid focus before.
    Moved { from: Option<NodeId>, to: NodeId },
    Unchanged(UnchangedReason),
}

impl MoveOutcome {
    /// The newly focused target, if focus moved.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        match self {
            MoveOutcome::Moved { to, .. } => Some(*to),
            MoveOutcome::Unchanged(_) => None,
        }
    }

    #[must_use]
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Which navigator produced a move (for logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// No valid focus yet; entered at the first candidate.
    Entry,
    Generic,
    ListPanel,
    Grid,
    CrossRegion,
}

impl Route {
    const fn as_str(self) -> &'static str {
        match self {
            Route::Entry => "entry",
            Route::Generic => "generic",
            Route::ListPanel => "list-panel",
            Route::Grid => "grid",
            Route::CrossRegion => "cross-region",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    To(NodeId, Route),
    Stay(UnchangedReason),
}

/// The spatial navigation engine.
///
/// Holds focus state, configuration, the debouncer, gesture timing, and the
/// recovery wiring. The host tree is passed into each call; the navigator
/// keeps only handles.
///
/// ```ignore
/// use padnav::{NavConfig, SpatialNavigator, nearest_by_distance};
///
/// let mut nav = SpatialNavigator::new(NavConfig::default());
/// nav.initialize_navigation(nearest_by_distance);
/// nav.move_focus(&mut tree, Direction::Right);
/// nav.handle_mutations(&mut tree, &tree_records);
/// ```
pub struct SpatialNavigator {
    config: NavConfig,
    state: FocusState,
    geometry: GeometryCache,
    debouncer: Debouncer<Direction>,
    stats: PerfStats,
    watch: MutationWatch,
    nearest: Option<NearestFn>,
}

impl fmt::Debug for SpatialNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialNavigator")
            .field("current", &self.state.current())
            .field("previous", &self.state.previous())
            .field("history_len", &self.state.history().len())
            .field("watching", &self.watch.is_active())
            .field("has_nearest", &self.nearest.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for SpatialNavigator {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

impl SpatialNavigator {
    #[must_use]
    pub fn new(config: NavConfig) -> Self {
        Self {
            state: FocusState::new(config.history_capacity),
            geometry: GeometryCache::new(),
            debouncer: Debouncer::new(config.debounce()),
            stats: PerfStats::new(),
            watch: MutationWatch::default(),
            nearest: None,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Directional movement
    // -----------------------------------------------------------------------

    /// Move focus one step in `dir`. Bypasses the debouncer.
    pub fn move_focus<T: VisualTree>(&mut self, tree: &mut T, dir: Direction) -> MoveOutcome {
        let _span = tracing::debug_span!("nav.move_focus", direction = %dir).entered();
        let started = Instant::now();
        let current = self.state.current();

        let (context, step, center) = {
            let mut scope = GestureScope::new(&mut self.geometry);
            let (context, step) = decide(&self.config, &*tree, &mut scope, current, dir);
            let center = match step {
                Step::To(id, _) => scope.center(&*tree, id),
                Step::Stay(_) => None,
            };
            (context, step, center)
        };

        let outcome = match step {
            Step::To(to, route) => {
                let from = if route == Route::Entry { None } else { current };
                self.apply_focus(tree, to, center);
                tracing::debug!(
                    target: "padnav",
                    context = %context,
                    direction = %dir,
                    from = ?from,
                    to = to,
                    route = route.as_str(),
                    "nav.move"
                );
                MoveOutcome::Moved { from, to }
            }
            Step::Stay(reason) => {
                tracing::debug!(
                    target: "padnav",
                    context = %context,
                    direction = %dir,
                    from = ?current,
                    reason = reason.as_str(),
                    "nav.move"
                );
                MoveOutcome::Unchanged(reason)
            }
        };

        self.stats.record(started.elapsed(), self.config.frame_budget());
        outcome
    }

    /// Queue a debounced move. A newer request replaces a pending one and
    /// restarts the window. Returns `true` if a pending request was replaced.
    pub fn request_move(&mut self, dir: Direction, now: Instant) -> bool {
        self.debouncer.push(dir, now)
    }

    /// Run the pending request if the window has elapsed since it arrived.
    pub fn poll<T: VisualTree>(&mut self, tree: &mut T, now: Instant) -> Option<MoveOutcome> {
        let dir = self.debouncer.poll(now)?;
        Some(self.move_focus(tree, dir))
    }

    /// When the pending request becomes due.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Requests dropped because a newer one arrived inside the window.
    pub fn superseded_requests(&self) -> u64 {
        self.debouncer.superseded()
    }

    /// Focus `id` directly if it is a valid target in the current scope.
    pub fn focus<T: VisualTree>(&mut self, tree: &mut T, id: NodeId) -> bool {
        if !is_focusable_in_scope(&*tree, id) {
            tracing::debug!(target: "padnav", node = id, "nav.focus.rejected");
            return false;
        }
        let center = tree.bounding_box(id).map(|r| r.center());
        self.apply_focus(tree, id, center);
        true
    }

    fn apply_focus<T: VisualTree>(&mut self, tree: &mut T, id: NodeId, center: Option<Point>) {
        self.state.record_focus(id, center);
        tree.set_focus(id);
        tree.scroll_into_view(id);
    }

    // -----------------------------------------------------------------------
    // Restoration
    // -----------------------------------------------------------------------

    /// Snapshot the current target for a later [`restore_focus`](Self::restore_focus).
    pub fn save_focus(&mut self) {
        self.state.save();
    }

    /// Restore focus: `explicit` (or the saved snapshot), then previous,
    /// history, first in context.
    pub fn restore_focus<T: VisualTree>(
        &mut self,
        tree: &mut T,
        explicit: Option<NodeId>,
    ) -> Option<Restored> {
        self.restore(tree, RestorePolicy::General { explicit })
    }

    /// Restore after an overlay closed: history, then first in context.
    pub fn restore_after_overlay_close<T: VisualTree>(&mut self, tree: &mut T) -> Option<Restored> {
        self.restore(tree, RestorePolicy::OverlayClose)
    }

    /// Restore after returning from full-screen content: keep current if
    /// still valid, else the general chain.
    pub fn restore_after_full_screen_return<T: VisualTree>(
        &mut self,
        tree: &mut T,
    ) -> Option<Restored> {
        self.restore(tree, RestorePolicy::FullScreenReturn)
    }

    fn restore<T: VisualTree>(&mut self, tree: &mut T, policy: RestorePolicy) -> Option<Restored> {
        let restored = restore::resolve(&*tree, &mut self.state, policy);
        match restored {
            Some(r) => {
                let center = tree.bounding_box(r.target).map(|b| b.center());
                self.apply_focus(tree, r.target, center);
                tracing::info!(
                    target: "padnav",
                    node = r.target,
                    source = r.source.as_str(),
                    "nav.restore"
                );
            }
            None => tracing::debug!(target: "padnav", policy = ?policy, "nav.restore.none"),
        }
        restored
    }

    // -----------------------------------------------------------------------
    // Recovery
    // -----------------------------------------------------------------------

    /// Install the replacement finder and start watching mutations.
    pub fn initialize_navigation<F>(&mut self, nearest: F)
    where
        F: Fn(Point, &[(NodeId, Point)]) -> Option<NodeId> + 'static,
    {
        self.nearest = Some(Box::new(nearest));
        self.watch.start();
    }

    /// Stop reacting to mutation batches.
    pub fn stop_watching(&mut self) {
        self.watch.stop();
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_active()
    }

    /// Handle one batch of mutation records delivered by the host.
    pub fn handle_mutations<T: VisualTree>(
        &mut self,
        tree: &mut T,
        batch: &[MutationRecord],
    ) -> RecoveryOutcome {
        if !self.watch.is_active() {
            return RecoveryOutcome::Inactive;
        }
        let Some(lost) = self.state.current() else {
            return RecoveryOutcome::NoTrigger;
        };
        let Some(trigger) = detect_trigger(&*tree, lost, batch) else {
            return RecoveryOutcome::NoTrigger;
        };
        if is_valid_target(&*tree, lost) {
            return RecoveryOutcome::StillValid(trigger);
        }

        let found = {
            let mut scope = GestureScope::new(&mut self.geometry);
            recovery::find_replacement(
                &*tree,
                &mut scope,
                &mut self.state,
                self.nearest.as_ref(),
                lost,
            )
        };

        match found {
            Some((to, path)) => {
                let center = tree.bounding_box(to).map(|b| b.center());
                self.apply_focus(tree, to, center);
                tracing::info!(
                    target: "padnav",
                    lost = lost,
                    to = to,
                    trigger = trigger.as_str(),
                    path = ?path,
                    "nav.recover"
                );
                RecoveryOutcome::Recovered {
                    lost,
                    to,
                    trigger,
                    path,
                }
            }
            None => {
                self.state.clear_current();
                tracing::info!(
                    target: "padnav",
                    lost = lost,
                    trigger = trigger.as_str(),
                    "nav.recover.unset"
                );
                RecoveryOutcome::Unset { lost, trigger }
            }
        }
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    /// Forget current, previous, history, and the saved snapshot; drop any
    /// pending debounced request.
    pub fn reset_focus_state(&mut self) {
        self.state.reset();
        self.debouncer.cancel();
        self.geometry.clear();
    }

    pub fn current(&self) -> Option<NodeId> {
        self.state.current()
    }

    pub fn previous(&self) -> Option<NodeId> {
        self.state.previous()
    }

    pub fn history(&self) -> &FocusHistory {
        self.state.history()
    }

    /// Context of the current focus in `tree`.
    pub fn context<T: VisualTree>(&self, tree: &T) -> NavContext {
        classify(tree, self.state.current())
    }

    pub fn perf_stats(&self) -> &PerfStats {
        &self.stats
    }

    pub fn reset_perf_stats(&mut self) {
        self.stats.reset();
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

fn decide<T: VisualTree>(
    config: &NavConfig,
    tree: &T,
    cache: &mut GeometryCache,
    current: Option<NodeId>,
    dir: Direction,
) -> (NavContext, Step) {
    let candidates = all_focusable(tree);
    let Some(&first) = candidates.first() else {
        return (classify(tree, None), Step::Stay(UnchangedReason::NoTargets));
    };
    let Some(current) = current.filter(|id| candidates.contains(id)) else {
        return (classify(tree, None), Step::To(first, Route::Entry));
    };

    let context = classify(tree, Some(current));
    let params = ScoreParams {
        threshold: config.direction_threshold,
        angle_weight: config.angle_weight,
    };
    let step = match context {
        NavContext::ListPanel => {
            from_list_panel(config, tree, cache, current, &candidates, dir, params)
        }
        NavContext::Grid => from_grid(config, tree, cache, current, &candidates, dir, params),
        NavContext::Main | NavContext::Overlay(_) => {
            generic(tree, cache, current, &candidates, dir, params)
        }
    };
    (context, step)
}

fn best_among<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    current: NodeId,
    pool: &[NodeId],
    dir: Direction,
    params: ScoreParams,
) -> Option<NodeId> {
    let origin = cache.center(tree, current)?;
    let filtered = prefilter(tree, cache, current, pool, dir);
    let centers = cache.centers(tree, &filtered);
    best_candidate(origin, &centers, dir, params)
}

fn generic<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    current: NodeId,
    candidates: &[NodeId],
    dir: Direction,
    params: ScoreParams,
) -> Step {
    match best_among(tree, cache, current, candidates, dir, params) {
        Some(id) => Step::To(id, Route::Generic),
        None => Step::Stay(UnchangedReason::NoCandidate),
    }
}

fn from_list_panel<T: VisualTree>(
    config: &NavConfig,
    tree: &T,
    cache: &mut GeometryCache,
    current: NodeId,
    candidates: &[NodeId],
    dir: Direction,
    params: ScoreParams,
) -> Step {
    if dir.is_horizontal() {
        if let Some(panel) = tree.region_root(current, RegionTags::LIST_PANEL) {
            let outside: Vec<NodeId> = candidates
                .iter()
                .copied()
                .filter(|&id| !tree.is_within(id, panel))
                .collect();
            if let Some(id) = best_among(tree, cache, current, &outside, dir, params) {
                return Step::To(id, Route::CrossRegion);
            }
        }
        return generic(tree, cache, current, candidates, dir, params);
    }

    match list_panel::navigate(tree, cache, current, candidates, dir, config.direction_threshold) {
        PanelMove::Moved(id) => Step::To(id, Route::ListPanel),
        PanelMove::Swallowed => Step::Stay(UnchangedReason::Swallowed),
        PanelMove::Blocked => Step::Stay(UnchangedReason::Edge),
        PanelMove::NotApplicable => generic(tree, cache, current, candidates, dir, params),
    }
}

fn from_grid<T: VisualTree>(
    config: &NavConfig,
    tree: &T,
    cache: &mut GeometryCache,
    current: NodeId,
    candidates: &[NodeId],
    dir: Direction,
    params: ScoreParams,
) -> Step {
    let explicit = tree
        .target(current)
        .and_then(FocusTarget::column_index)
        .is_some();
    let tolerance = config.cluster_tolerance;

    if !explicit && grid::at_row_edge(tree, cache, current, candidates, dir, tolerance) {
        let panel_items: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&id| tree.region_root(id, RegionTags::LIST_PANEL).is_some())
            .collect();
        if let Some(id) = best_among(tree, cache, current, &panel_items, dir, params) {
            return Step::To(id, Route::CrossRegion);
        }
    }

    match grid::navigate(tree, cache, current, candidates, dir, tolerance) {
        GridMove::Moved(id) => Step::To(id, Route::Grid),
        GridMove::Blocked => Step::Stay(UnchangedReason::Edge),
        GridMove::NotApplicable => generic(tree, cache, current, candidates, dir, params),
    }
}
