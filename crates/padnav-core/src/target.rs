#![forbid(unsafe_code)]

//! The capability interface every host UI node implements.

use bitflags::bitflags;

use crate::geometry::Rect;

/// Opaque handle of a node in the host's visual tree.
///
/// The engine stores handles, never references, and revalidates a handle
/// against the live tree before acting on it.
pub type NodeId = u64;

bitflags! {
    /// Region markers carried by a node.
    ///
    /// A node is considered inside a region when it or any ancestor carries
    /// the marker (see [`VisualTree::region_root`](crate::VisualTree::region_root)).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegionTags: u8 {
        /// Side list with vertical-containment navigation.
        const LIST_PANEL = 0b0000_0001;
        /// Container of grid cells.
        const GRID       = 0b0000_0010;
        /// A navigable grid cell.
        const GRID_CELL  = 0b0000_0100;
        /// A free-text input; swallows vertical keys inside a list-panel.
        const FREE_TEXT  = 0b0000_1000;
        /// Overlay container (see [`OverlayKind`]).
        const OVERLAY    = 0b0001_0000;
    }
}

/// Kinds of overlay a host can open.
///
/// Overlays are mutually exclusive for navigation. When several are open at
/// once, the one earliest in [`OverlayKind::PRECEDENCE`] wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Dialog,
    Settings,
    Search,
    Menu,
    Player,
}

impl OverlayKind {
    /// Fixed resolution order for simultaneously open overlays.
    pub const PRECEDENCE: [OverlayKind; 5] = [
        OverlayKind::Dialog,
        OverlayKind::Settings,
        OverlayKind::Search,
        OverlayKind::Menu,
        OverlayKind::Player,
    ];

    /// Position in [`Self::PRECEDENCE`]; lower wins.
    pub fn rank(self) -> usize {
        Self::PRECEDENCE
            .iter()
            .position(|&k| k == self)
            .unwrap_or(Self::PRECEDENCE.len())
    }
}

/// Render-state flags of a single node (ancestors are not folded in).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    /// Hidden by style (`display: none`, `Visibility::Collapsed`, ...).
    pub collapsed: bool,
    /// The node produced a render box.
    pub has_render_box: bool,
    /// The host declared an explicit zero size. A zero-size bounding box
    /// without this flag is treated as "not measured yet" and stays visible.
    pub declared_zero_size: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            collapsed: false,
            has_render_box: true,
            declared_zero_size: false,
        }
    }
}

/// Capability interface of a host UI node.
pub trait FocusTarget {
    /// Handle of this node.
    fn id(&self) -> NodeId;

    /// Carries the "eligible for directional focus" marker.
    fn is_eligible(&self) -> bool;

    /// Carries the "disabled" flag.
    fn is_disabled(&self) -> bool;

    /// Current bounding rectangle in layout space.
    fn bounding_box(&self) -> Rect;

    /// Region markers carried by this node itself.
    fn region_tags(&self) -> RegionTags;

    /// Explicit grid column index, if the host assigns one.
    fn column_index(&self) -> Option<u32> {
        None
    }

    /// Overlay kind when this node is an overlay container.
    fn overlay_kind(&self) -> Option<OverlayKind> {
        None
    }

    /// Render-state flags of this node.
    fn visibility(&self) -> Visibility {
        Visibility::default()
    }

    /// Convenience: this node is a free-text input.
    fn is_free_text(&self) -> bool {
        self.region_tags().contains(RegionTags::FREE_TEXT)
    }
}
