#![forbid(unsafe_code)]

//! In-memory [`VisualTree`] for tests, benches, and demos.
//!
//! Every mutator records the [`MutationRecord`] a real host would deliver,
//! so recovery can be driven end-to-end: mutate, then hand
//! [`MemoryTree::take_records`] to the engine as one batch.
//!
//! ```ignore
//! use padnav_core::memory::{MemoryNode, MemoryTree};
//! use padnav_core::{Rect, VisualTree};
//!
//! let mut tree = MemoryTree::new();
//! let a = tree.add(MemoryNode::focusable(Rect::new(0.0, 0.0, 100.0, 50.0)));
//! tree.set_disabled(a, true);
//! assert_eq!(tree.take_records().len(), 1);
//! assert!(tree.is_attached(a));
//! ```

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::mutation::{Attribute, MutationRecord};
use crate::target::{FocusTarget, NodeId, OverlayKind, RegionTags, Visibility};
use crate::tree::VisualTree;

/// A node stored in a [`MemoryTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    id: NodeId,
    rect: Rect,
    eligible: bool,
    disabled: bool,
    tags: RegionTags,
    column: Option<u32>,
    overlay: Option<OverlayKind>,
    visibility: Visibility,
}

impl MemoryNode {
    /// An eligible, enabled node.
    pub fn focusable(rect: Rect) -> Self {
        Self {
            id: 0,
            rect,
            eligible: true,
            disabled: false,
            tags: RegionTags::empty(),
            column: None,
            overlay: None,
            visibility: Visibility::default(),
        }
    }

    /// A non-focusable container.
    pub fn container(rect: Rect) -> Self {
        Self {
            eligible: false,
            ..Self::focusable(rect)
        }
    }

    /// An overlay container of `kind`.
    pub fn overlay(kind: OverlayKind, rect: Rect) -> Self {
        Self {
            overlay: Some(kind),
            tags: RegionTags::OVERLAY,
            ..Self::container(rect)
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: RegionTags) -> Self {
        self.tags |= tags;
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self.tags |= RegionTags::GRID_CELL;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    #[must_use]
    pub fn collapsed(mut self) -> Self {
        self.visibility.collapsed = true;
        self
    }

    #[must_use]
    pub fn without_render_box(mut self) -> Self {
        self.visibility.has_render_box = false;
        self
    }

    #[must_use]
    pub fn declared_zero_size(mut self) -> Self {
        self.visibility.declared_zero_size = true;
        self
    }
}

impl FocusTarget for MemoryNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn is_eligible(&self) -> bool {
        self.eligible
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn region_tags(&self) -> RegionTags {
        self.tags
    }

    fn column_index(&self) -> Option<u32> {
        self.column
    }

    fn overlay_kind(&self) -> Option<OverlayKind> {
        self.overlay
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }
}

#[derive(Debug, Clone)]
struct Entry {
    node: MemoryNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Cleared when the node (not an ancestor) is removed.
    linked: bool,
}

/// An in-memory visual tree that records focus and scroll side effects.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    entries: HashMap<NodeId, Entry>,
    roots: Vec<NodeId>,
    next_id: NodeId,
    focused: Option<NodeId>,
    focus_calls: Vec<NodeId>,
    scrolled: Vec<NodeId>,
    records: Vec<MutationRecord>,
}

impl MemoryTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, mut node: MemoryNode, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = self.next_id;
        node.id = id;
        self.entries.insert(
            id,
            Entry {
                node,
                parent,
                children: Vec::new(),
                linked: true,
            },
        );
        id
    }

    /// Append a root-level node.
    pub fn add(&mut self, node: MemoryNode) -> NodeId {
        let id = self.alloc(node, None);
        self.roots.push(id);
        id
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not exist.
    pub fn add_child(&mut self, parent: NodeId, node: MemoryNode) -> NodeId {
        assert!(self.entries.contains_key(&parent), "unknown parent {parent}");
        let id = self.alloc(node, Some(parent));
        if let Some(entry) = self.entries.get_mut(&parent) {
            entry.children.push(id);
        }
        self.records.push(MutationRecord::added(parent, vec![id]));
        id
    }

    /// Detach `id` and its subtree. The node stays queryable but
    /// [`VisualTree::is_attached`] turns false.
    pub fn remove(&mut self, id: NodeId) {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        if !entry.linked {
            return;
        }
        entry.linked = false;
        let parent = entry.parent;
        self.records
            .push(MutationRecord::removed(parent.unwrap_or(id), vec![id]));
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.entries.get_mut(&id).map(|e| &mut e.node)
    }

    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        if let Some(node) = self.node_mut(id) {
            node.disabled = disabled;
            self.records
                .push(MutationRecord::attribute(id, Attribute::Disabled));
        }
    }

    pub fn set_eligible(&mut self, id: NodeId, eligible: bool) {
        if let Some(node) = self.node_mut(id) {
            node.eligible = eligible;
            self.records
                .push(MutationRecord::attribute(id, Attribute::Eligible));
        }
    }

    /// Toggle the collapsed style (recorded as a style change).
    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) {
        if let Some(node) = self.node_mut(id) {
            node.visibility.collapsed = collapsed;
            self.records.push(MutationRecord::attribute(id, Attribute::Style));
        }
    }

    /// Replace the region tags of `id`.
    pub fn set_tags(&mut self, id: NodeId, tags: RegionTags) {
        if let Some(node) = self.node_mut(id) {
            node.tags = tags;
            self.records.push(MutationRecord::attribute(id, Attribute::Tags));
        }
    }

    /// Move or resize `id`. Layout changes are not observed as mutations.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.rect = rect;
        }
    }

    /// Drain the pending mutation records as one batch.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    /// Node currently holding UI focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Every `set_focus` call, oldest first.
    pub fn focus_calls(&self) -> &[NodeId] {
        &self.focus_calls
    }

    /// Every `scroll_into_view` call, oldest first.
    pub fn scrolled(&self) -> &[NodeId] {
        &self.scrolled
    }

    fn walk(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(entry) = self.entries.get(&id) else {
            return;
        };
        if !entry.linked {
            return;
        }
        out.push(id);
        for &child in &entry.children {
            self.walk(child, out);
        }
    }
}

impl VisualTree for MemoryTree {
    type Target = MemoryNode;

    fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.entries.len());
        for &root in &self.roots {
            self.walk(root, &mut out);
        }
        out
    }

    fn target(&self, id: NodeId) -> Option<&MemoryNode> {
        self.entries.get(&id).map(|e| &e.node)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(&id).and_then(|e| e.parent)
    }

    fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            match self.entries.get(&n) {
                Some(entry) if entry.linked => cursor = entry.parent,
                _ => return false,
            }
        }
        true
    }

    fn set_focus(&mut self, id: NodeId) {
        self.focused = Some(id);
        self.focus_calls.push(id);
    }

    fn scroll_into_view(&mut self, id: NodeId) {
        self.scrolled.push(id);
    }
}
