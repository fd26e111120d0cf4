#![forbid(unsafe_code)]

//! Performance layer: per-gesture geometry cache, candidate pre-filter,
//! trailing-edge input debouncing, and gesture timing.
//!
//! # Invariants
//!
//! 1. The geometry cache never outlives a gesture: [`GestureScope`] clears
//!    it on drop, which covers early returns and unwinding alike.
//! 2. The debouncer holds at most one pending request; a newer request
//!    replaces it and restarts the window. No backlog is ever replayed.
//! 3. [`PerfStats`] counters are monotone until [`PerfStats::reset`].

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use ahash::AHashMap;
use padnav_core::{Direction, NodeId, Point, Rect, VisualTree};
use web_time::Instant;

// ---------------------------------------------------------------------------
// Geometry cache
// ---------------------------------------------------------------------------

/// Lazily populated bounding-box cache keyed by node handle.
#[derive(Debug, Default)]
pub struct GeometryCache {
    rects: AHashMap<NodeId, Rect>,
    hits: u64,
    misses: u64,
}

impl GeometryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounding box of `id`, queried from `tree` at most once per gesture.
    pub fn rect<T: VisualTree>(&mut self, tree: &T, id: NodeId) -> Option<Rect> {
        if let Some(rect) = self.rects.get(&id) {
            self.hits += 1;
            return Some(*rect);
        }
        self.misses += 1;
        let rect = tree.bounding_box(id)?;
        self.rects.insert(id, rect);
        Some(rect)
    }

    /// Center of `id`.
    pub fn center<T: VisualTree>(&mut self, tree: &T, id: NodeId) -> Option<Point> {
        self.rect(tree, id).map(|r| r.center())
    }

    /// Centers of `ids`, skipping nodes without geometry.
    pub fn centers<T: VisualTree>(&mut self, tree: &T, ids: &[NodeId]) -> Vec<(NodeId, Point)> {
        ids.iter()
            .filter_map(|&id| self.center(tree, id).map(|c| (id, c)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Lookups served from the cache since creation.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to query the tree since creation.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

/// Scope of one navigation gesture over a [`GeometryCache`].
///
/// Dereferences to the cache and clears it when dropped.
pub struct GestureScope<'a> {
    cache: &'a mut GeometryCache,
}

impl<'a> GestureScope<'a> {
    pub fn new(cache: &'a mut GeometryCache) -> Self {
        cache.clear();
        Self { cache }
    }
}

impl Deref for GestureScope<'_> {
    type Target = GeometryCache;

    fn deref(&self) -> &GeometryCache {
        &*self.cache
    }
}

impl DerefMut for GestureScope<'_> {
    fn deref_mut(&mut self) -> &mut GeometryCache {
        &mut *self.cache
    }
}

impl Drop for GestureScope<'_> {
    fn drop(&mut self) {
        self.cache.clear();
    }
}

// ---------------------------------------------------------------------------
// Pre-filter
// ---------------------------------------------------------------------------

/// Cheap edge test run before any center or angle is computed.
///
/// Rejects a candidate whose box lies entirely on the wrong side of the
/// origin box. Such a candidate can never pass the direction gate: its
/// center is behind the origin's center along the movement axis.
#[inline]
pub fn may_lie_in_direction(origin: &Rect, candidate: &Rect, dir: Direction) -> bool {
    match dir {
        Direction::Right => candidate.right() > origin.left(),
        Direction::Left => candidate.left() < origin.right(),
        Direction::Down => candidate.bottom() > origin.top(),
        Direction::Up => candidate.top() < origin.bottom(),
    }
}

/// Pre-filter `candidates` for a move from `origin` in `dir`, dropping the
/// origin itself and nodes without geometry.
pub fn prefilter<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    origin: NodeId,
    candidates: &[NodeId],
    dir: Direction,
) -> Vec<NodeId> {
    let Some(origin_rect) = cache.rect(tree, origin) else {
        return Vec::new();
    };
    candidates
        .iter()
        .copied()
        .filter(|&id| id != origin)
        .filter(|&id| {
            cache
                .rect(tree, id)
                .is_some_and(|r| may_lie_in_direction(&origin_rect, &r, dir))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Trailing-edge debouncer: the last request wins once the input has been
/// quiet for the full window.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
    superseded: u64,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            superseded: 0,
        }
    }

    /// Record `value` at `now`. Returns `true` if it replaced a pending value.
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        let replaced = self.pending.replace((value, now)).is_some();
        if replaced {
            self.superseded += 1;
        }
        replaced
    }

    /// Take the pending value if the window has elapsed since it was pushed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*at) >= self.window {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Instant at which the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.window)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Requests discarded because a newer one arrived inside the window.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Latency counters for navigation gestures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerfStats {
    operations: u64,
    total: Duration,
    min: Option<Duration>,
    max: Duration,
    last: Duration,
    over_budget: u64,
}

impl PerfStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one gesture. Logs a warning when `elapsed` exceeds `budget`.
    pub fn record(&mut self, elapsed: Duration, budget: Duration) {
        self.operations += 1;
        self.total += elapsed;
        self.min = Some(self.min.map_or(elapsed, |m| m.min(elapsed)));
        self.max = self.max.max(elapsed);
        self.last = elapsed;
        if elapsed > budget {
            self.over_budget += 1;
            tracing::warn!(
                target: "padnav",
                elapsed_us = elapsed.as_micros() as u64,
                budget_us = budget.as_micros() as u64,
                "nav.slow_gesture"
            );
        }
    }

    /// Number of gestures measured.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Mean latency, zero before the first gesture.
    pub fn average(&self) -> Duration {
        match u32::try_from(self.operations) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total / n,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.operations as f64),
        }
    }

    pub fn min(&self) -> Duration {
        self.min.unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn last(&self) -> Duration {
        self.last
    }

    /// Gestures that exceeded their budget.
    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padnav_core::memory::{MemoryNode, MemoryTree};

    fn r(x: f64, y: f64) -> Rect {
        Rect::new(x, y, 100.0, 50.0)
    }

    #[test]
    fn cache_queries_tree_once_per_node() {
        let mut tree = MemoryTree::new();
        let a = tree.add(MemoryNode::focusable(r(0.0, 0.0)));
        let mut cache = GeometryCache::new();
        assert_eq!(cache.rect(&tree, a), Some(r(0.0, 0.0)));
        assert_eq!(cache.center(&tree, a), Some(Point::new(50.0, 25.0)));
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn gesture_scope_clears_on_drop() {
        let mut tree = MemoryTree::new();
        let a = tree.add(MemoryNode::focusable(r(0.0, 0.0)));
        let mut cache = GeometryCache::new();
        {
            let mut scope = GestureScope::new(&mut cache);
            scope.rect(&tree, a);
            assert_eq!(scope.len(), 1);
        }
        assert!(cache.is_empty());

        // Positions change between gestures; a fresh scope sees the new one.
        tree.set_rect(a, r(500.0, 0.0));
        let mut scope = GestureScope::new(&mut cache);
        assert_eq!(scope.rect(&tree, a), Some(r(500.0, 0.0)));
    }

    #[test]
    fn gesture_scope_clears_on_early_return() {
        fn early(cache: &mut GeometryCache, tree: &MemoryTree, id: NodeId) -> Option<()> {
            let mut scope = GestureScope::new(cache);
            scope.rect(tree, id)?;
            None
        }
        let mut tree = MemoryTree::new();
        let a = tree.add(MemoryNode::focusable(r(0.0, 0.0)));
        let mut cache = GeometryCache::new();
        assert!(early(&mut cache, &tree, a).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn prefilter_drops_boxes_behind_origin() {
        let mut tree = MemoryTree::new();
        let origin = tree.add(MemoryNode::focusable(r(200.0, 0.0)));
        let left = tree.add(MemoryNode::focusable(r(0.0, 0.0)));
        let right = tree.add(MemoryNode::focusable(r(400.0, 0.0)));
        let mut cache = GeometryCache::new();
        let all = [origin, left, right];
        assert_eq!(
            prefilter(&tree, &mut cache, origin, &all, Direction::Right),
            vec![right]
        );
        assert_eq!(
            prefilter(&tree, &mut cache, origin, &all, Direction::Left),
            vec![left]
        );
        // Same row: nothing is entirely above or below.
        assert_eq!(
            prefilter(&tree, &mut cache, origin, &all, Direction::Down),
            vec![left, right]
        );
    }

    #[test]
    fn debouncer_delivers_last_value_after_quiet_window() {
        let window = Duration::from_millis(50);
        let mut d = Debouncer::new(window);
        let t0 = Instant::now();
        for (i, v) in [1, 2, 3, 4, 5].into_iter().enumerate() {
            d.push(v, t0 + Duration::from_millis(i as u64 * 10));
        }
        let last_push = t0 + Duration::from_millis(40);
        assert_eq!(d.deadline(), Some(last_push + window));
        assert_eq!(d.poll(last_push + Duration::from_millis(49)), None);
        assert_eq!(d.poll(last_push + window), Some(5));
        assert_eq!(d.poll(last_push + window * 2), None);
        assert_eq!(d.superseded(), 4);
    }

    #[test]
    fn debouncer_cancel_discards_pending() {
        let mut d = Debouncer::new(Duration::from_millis(50));
        let t0 = Instant::now();
        d.push('a', t0);
        assert!(d.is_pending());
        assert_eq!(d.cancel(), Some('a'));
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn perf_stats_track_min_max_avg_last() {
        let budget = Duration::from_millis(16);
        let mut stats = PerfStats::new();
        assert_eq!(stats.average(), Duration::ZERO);
        stats.record(Duration::from_millis(2), budget);
        stats.record(Duration::from_millis(6), budget);
        stats.record(Duration::from_millis(4), budget);
        assert_eq!(stats.operations(), 3);
        assert_eq!(stats.min(), Duration::from_millis(2));
        assert_eq!(stats.max(), Duration::from_millis(6));
        assert_eq!(stats.last(), Duration::from_millis(4));
        assert_eq!(stats.average(), Duration::from_millis(4));
        assert_eq!(stats.over_budget(), 0);

        stats.record(Duration::from_millis(20), budget);
        assert_eq!(stats.over_budget(), 1);
        stats.reset();
        assert_eq!(stats, PerfStats::default());
    }
}
