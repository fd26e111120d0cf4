#![forbid(unsafe_code)]

//! Change-notification records delivered by the host.
//!
//! Hosts batch records the way DOM mutation observers do: one batch per
//! delivery, each record naming the node whose attribute or child list
//! changed. A batch is handled synchronously by the engine.

use crate::target::NodeId;

/// Watched node attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// The disabled flag was set or cleared.
    Disabled,
    /// The eligible marker was added or removed.
    Eligible,
    /// Style changed (collapsed/hidden state may differ).
    Style,
    /// Region tags changed.
    Tags,
}

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// An attribute of `target` changed.
    Attribute(Attribute),
    /// Children of `target` were removed and/or added.
    ChildList {
        removed: Vec<NodeId>,
        added: Vec<NodeId>,
    },
}

/// One change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Node whose attribute or child list changed. For child-list records
    /// of root-level nodes this is the removed node itself.
    pub target: NodeId,
    pub kind: MutationKind,
}

impl MutationRecord {
    /// Attribute change on `target`.
    pub fn attribute(target: NodeId, attribute: Attribute) -> Self {
        Self {
            target,
            kind: MutationKind::Attribute(attribute),
        }
    }

    /// Children removed from `target`.
    pub fn removed(target: NodeId, removed: Vec<NodeId>) -> Self {
        Self {
            target,
            kind: MutationKind::ChildList {
                removed,
                added: Vec::new(),
            },
        }
    }

    /// Children added to `target`.
    pub fn added(target: NodeId, added: Vec<NodeId>) -> Self {
        Self {
            target,
            kind: MutationKind::ChildList {
                removed: Vec::new(),
                added,
            },
        }
    }

    /// `true` for structural (child-list) records.
    pub fn is_structural(&self) -> bool {
        matches!(self.kind, MutationKind::ChildList { .. })
    }
}
