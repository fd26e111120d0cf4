#![forbid(unsafe_code)]

//! Focus state: the current target, the one before it, and a bounded
//! history of earlier targets.
//!
//! # Invariants
//!
//! 1. `history.len() <= capacity` after every operation; the oldest entry
//!    is evicted first.
//! 2. History never holds the same handle twice in a row.
//! 3. A change of `current` pushes the outgoing target onto history and
//!    into `previous`; re-focusing the current target changes neither.
//!
//! Entries are plain handles. Nothing here checks validity: restoration
//! revalidates every handle against the live tree before using it.
//!
//! ```text
//! focus(a) focus(b) focus(c)
//! ┌──────────────────────────────┐
//! │ current: c   previous: b     │
//! │ history: [a, b]              │
//! └──────────────────────────────┘
//! ```

use std::collections::VecDeque;

use padnav_core::{NodeId, Point};

use crate::config::DEFAULT_HISTORY_CAPACITY;

/// Bounded stack of previously focused handles (newest at back).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusHistory {
    entries: VecDeque<NodeId>,
    capacity: usize,
}

impl Default for FocusHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl FocusHistory {
    /// Create an empty history holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Push `id`, skipping a consecutive duplicate. Returns `true` if it was
    /// stored.
    pub fn push(&mut self, id: NodeId) -> bool {
        if self.entries.back() == Some(&id) {
            return false;
        }
        self.entries.push_back(id);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    /// Pop the newest entry.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.entries.pop_back()
    }

    /// Newest entry without removing it.
    pub fn peek(&self) -> Option<NodeId> {
        self.entries.back().copied()
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Everything the engine remembers about focus between gestures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusState {
    current: Option<NodeId>,
    previous: Option<NodeId>,
    history: FocusHistory,
    saved: Option<NodeId>,
    last_center: Option<Point>,
}

impl FocusState {
    #[must_use]
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: FocusHistory::new(history_capacity),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn previous(&self) -> Option<NodeId> {
        self.previous
    }

    pub fn history(&self) -> &FocusHistory {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut FocusHistory {
        &mut self.history
    }

    /// Center of the current target when it was last focused. Survives the
    /// target being removed, so recovery can search from where it was.
    pub fn last_center(&self) -> Option<Point> {
        self.last_center
    }

    /// Make `id` current. Returns `true` if current changed.
    pub fn record_focus(&mut self, id: NodeId, center: Option<Point>) -> bool {
        if center.is_some() {
            self.last_center = center;
        }
        if self.current == Some(id) {
            return false;
        }
        if let Some(outgoing) = self.current.replace(id) {
            self.previous = Some(outgoing);
            self.history.push(outgoing);
        }
        true
    }

    /// Drop the current target and its last center (nothing is focusable).
    pub fn clear_current(&mut self) {
        self.current = None;
        self.last_center = None;
    }

    /// Snapshot the current target for a later restore.
    pub fn save(&mut self) {
        self.saved = self.current;
    }

    pub fn saved(&self) -> Option<NodeId> {
        self.saved
    }

    /// Take the saved snapshot, leaving the slot empty.
    pub fn take_saved(&mut self) -> Option<NodeId> {
        self.saved.take()
    }

    /// Forget everything, keeping the history capacity.
    pub fn reset(&mut self) {
        let capacity = self.history.capacity();
        *self = Self::new(capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded() {
        let mut history = FocusHistory::new(50);
        for id in 1..=60 {
            history.push(id);
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.iter().next(), Some(11));
        assert_eq!(history.peek(), Some(60));
    }

    #[test]
    fn history_skips_consecutive_duplicates_only() {
        let mut history = FocusHistory::new(10);
        assert!(history.push(1));
        assert!(!history.push(1));
        assert!(history.push(2));
        assert!(history.push(1));
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![1, 2, 1]);
        assert_eq!(history.pop(), Some(1));
        assert_eq!(history.pop(), Some(2));
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut history = FocusHistory::new(0);
        history.push(1);
        history.push(2);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn record_focus_tracks_previous_and_history() {
        let mut state = FocusState::new(50);
        assert!(state.record_focus(1, Some(Point::new(0.0, 0.0))));
        assert!(state.record_focus(2, None));
        assert!(state.record_focus(3, Some(Point::new(5.0, 5.0))));
        assert_eq!(state.current(), Some(3));
        assert_eq!(state.previous(), Some(2));
        assert_eq!(state.history().iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(state.last_center(), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn clearing_current_forgets_its_center() {
        let mut state = FocusState::new(50);
        state.record_focus(1, Some(Point::new(40.0, 10.0)));
        state.clear_current();
        assert_eq!(state.current(), None);
        assert_eq!(state.last_center(), None);
        assert!(state.history().is_empty());
    }

    #[test]
    fn refocusing_current_is_a_no_op() {
        let mut state = FocusState::new(50);
        state.record_focus(1, None);
        assert!(!state.record_focus(1, None));
        assert!(state.history().is_empty());
        assert_eq!(state.previous(), None);
    }

    #[test]
    fn saved_slot_is_consumed_once() {
        let mut state = FocusState::new(50);
        state.record_focus(4, None);
        state.save();
        state.record_focus(5, None);
        assert_eq!(state.take_saved(), Some(4));
        assert_eq!(state.take_saved(), None);
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut state = FocusState::new(3);
        state.record_focus(1, None);
        state.record_focus(2, None);
        state.save();
        state.reset();
        assert_eq!(state, FocusState::new(3));
        assert_eq!(state.history().capacity(), 3);
    }
}
