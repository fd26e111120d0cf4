#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use padnav::candidates::is_valid_target;
use padnav::{Direction, NodeId, OverlayKind, Rect, RegionTags, SpatialNavigator, nearest_by_distance};
use padnav_core::memory::{MemoryNode, MemoryTree};

#[derive(Debug, Arbitrary)]
enum Op {
    Move(u8),
    AddRoot { x: u8, y: u8, tags: u8 },
    AddChild { parent: u8, x: u8, y: u8, tags: u8 },
    AddOverlay { kind: u8 },
    Remove(u8),
    Disable(u8, bool),
    Collapse(u8, bool),
    Resize { node: u8, w: u8, h: u8 },
    Flush,
    SaveFocus,
    Restore(u8),
    OverlayClosed,
}

fn pick(ids: &[NodeId], n: u8) -> Option<NodeId> {
    (!ids.is_empty()).then(|| ids[n as usize % ids.len()])
}

fn direction(n: u8) -> Direction {
    Direction::ALL[n as usize % 4]
}

fn node(x: u8, y: u8, tags: u8) -> MemoryNode {
    let rect = Rect::new(f64::from(x) * 10.0, f64::from(y) * 10.0, 80.0, 60.0);
    let mut node = MemoryNode::focusable(rect)
        .with_tags(RegionTags::from_bits_truncate(tags) - RegionTags::OVERLAY);
    if tags & 0x80 != 0 {
        node = node.with_column(u32::from(tags % 5));
    }
    node
}

fuzz_target!(|ops: Vec<Op>| {
    let mut tree = MemoryTree::new();
    let mut ids: Vec<NodeId> = Vec::new();
    let mut nav = SpatialNavigator::default();
    nav.initialize_navigation(nearest_by_distance);

    for op in ops.into_iter().take(256) {
        match op {
            Op::Move(d) => {
                nav.move_focus(&mut tree, direction(d));
            }
            Op::AddRoot { x, y, tags } => ids.push(tree.add(node(x, y, tags))),
            Op::AddChild { parent, x, y, tags } => {
                if let Some(parent) = pick(&ids, parent) {
                    ids.push(tree.add_child(parent, node(x, y, tags)));
                }
            }
            Op::AddOverlay { kind } => {
                let kind = OverlayKind::PRECEDENCE[kind as usize % OverlayKind::PRECEDENCE.len()];
                ids.push(tree.add(MemoryNode::overlay(kind, Rect::new(0.0, 0.0, 400.0, 300.0))));
            }
            Op::Remove(n) => {
                if let Some(id) = pick(&ids, n) {
                    tree.remove(id);
                }
            }
            Op::Disable(n, on) => {
                if let Some(id) = pick(&ids, n) {
                    tree.set_disabled(id, on);
                }
            }
            Op::Collapse(n, on) => {
                if let Some(id) = pick(&ids, n) {
                    tree.set_collapsed(id, on);
                }
            }
            Op::Resize { node, w, h } => {
                if let Some(id) = pick(&ids, node) {
                    tree.set_rect(id, Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
                }
            }
            Op::Flush => {
                let batch = tree.take_records();
                nav.handle_mutations(&mut tree, &batch);
                // After a handled batch focus is valid or unset.
                if let Some(current) = nav.current() {
                    assert!(is_valid_target(&tree, current), "stale focus {current}");
                }
            }
            Op::SaveFocus => nav.save_focus(),
            Op::Restore(n) => {
                nav.restore_focus(&mut tree, pick(&ids, n));
            }
            Op::OverlayClosed => {
                nav.restore_after_overlay_close(&mut tree);
            }
        }
        assert!(nav.history().len() <= nav.config().history_capacity);
    }
});
