#![forbid(unsafe_code)]

//! Core: geometry, directions, and the visual-tree interfaces for padnav.
//!
//! # Role in padnav
//! `padnav-core` is the vocabulary layer. It owns the geometric primitives
//! the scorer works with, the four navigation directions, and the
//! capability interfaces a host UI implements so the engine can observe its
//! nodes without knowing anything about how they are rendered.
//!
//! # Primary responsibilities
//! - **Geometry**: centers, distances, bearings, and the direction gate.
//! - **Direction**: `Up`/`Down`/`Left`/`Right` with key-name parsing.
//! - **FocusTarget**: the per-node capability interface (eligible, disabled,
//!   bounding box, region tags, column index, visibility).
//! - **VisualTree**: document-order enumeration, parent links, overlays,
//!   and the focus/scroll side effects.
//! - **Mutation records**: the batches a host delivers when its tree changes.
//!
//! # How it fits in the system
//! The engine (`padnav`) is generic over [`tree::VisualTree`] and never
//! holds references into the host tree; focus is tracked by [`NodeId`]
//! handles that are revalidated before every use.

pub mod direction;
pub mod geometry;
pub mod mutation;
pub mod target;
pub mod tree;

#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;

pub use direction::{Direction, ParseDirectionError};
pub use geometry::{Point, Rect};
pub use mutation::{Attribute, MutationKind, MutationRecord};
pub use target::{FocusTarget, NodeId, OverlayKind, RegionTags, Visibility};
pub use tree::VisualTree;
