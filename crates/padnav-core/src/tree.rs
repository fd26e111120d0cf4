#![forbid(unsafe_code)]

//! The host visual tree as seen by the navigation engine.
//!
//! A host implements the handful of required methods; ancestry, region
//! membership, effective visibility, and overlay discovery are derived here
//! so every host gets the same semantics.
//!
//! # Invariants
//!
//! - [`VisualTree::document_order`] lists attached nodes only.
//! - [`VisualTree::target`] may still answer for a detached node (hosts that
//!   keep the node around); [`VisualTree::is_attached`] is authoritative.
//! - [`VisualTree::parent`] links must be acyclic.

use crate::geometry::Rect;
use crate::target::{FocusTarget, NodeId, OverlayKind, RegionTags};

/// A live, mutable visual tree.
pub trait VisualTree {
    /// Node type exposing the capability interface.
    type Target: FocusTarget;

    /// Handles of all attached nodes in document order.
    fn document_order(&self) -> Vec<NodeId>;

    /// Look up a node by handle.
    fn target(&self, id: NodeId) -> Option<&Self::Target>;

    /// Parent of `id`, if any.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// `true` if `id` and all its ancestors are attached to the live tree.
    fn is_attached(&self, id: NodeId) -> bool;

    /// Move UI focus to `id`.
    fn set_focus(&mut self, id: NodeId);

    /// Scroll `id` into view.
    fn scroll_into_view(&mut self, id: NodeId);

    /// Current bounding box of `id`.
    fn bounding_box(&self, id: NodeId) -> Option<Rect> {
        self.target(id).map(FocusTarget::bounding_box)
    }

    /// Ancestors of `id`, nearest first.
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            out.push(p);
            cursor = self.parent(p);
        }
        out
    }

    /// `true` if `ancestor` is a strict ancestor of `id`.
    fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            cursor = self.parent(p);
        }
        false
    }

    /// Nearest node (`id` itself included) carrying any of `tags`.
    fn region_root(&self, id: NodeId, tags: RegionTags) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            if self
                .target(n)
                .is_some_and(|t| t.region_tags().intersects(tags))
            {
                return Some(n);
            }
            cursor = self.parent(n);
        }
        None
    }

    /// Effective visibility of `id`.
    ///
    /// Visible means attached, not collapsed (itself or any ancestor), and
    /// rendered. A zero-size box counts as visible unless the host declared
    /// the zero size explicitly, so nodes that have not been measured yet
    /// are not discarded.
    fn is_visible(&self, id: NodeId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        let Some(node) = self.target(id) else {
            return false;
        };
        let vis = node.visibility();
        if vis.collapsed || !vis.has_render_box {
            return false;
        }
        if node.bounding_box().is_empty() && vis.declared_zero_size {
            return false;
        }
        self.ancestors(id).into_iter().all(|a| {
            self.target(a)
                .is_none_or(|n| !n.visibility().collapsed)
        })
    }

    /// Open overlays in document order: attached, visible overlay containers.
    fn active_overlays(&self) -> Vec<(OverlayKind, NodeId)> {
        self.document_order()
            .into_iter()
            .filter_map(|id| {
                let kind = self.target(id)?.overlay_kind()?;
                self.is_visible(id).then_some((kind, id))
            })
            .collect()
    }
}
