#![forbid(unsafe_code)]

//! Integration tests for directional navigation across a TV-style screen.
//!
//! These tests drive [`SpatialNavigator`] against a [`MemoryTree`] laid out
//! the way a streaming UI is: a side list-panel with a search field, a
//! content grid, and overlays opened on top.
//!
//! # Invariants tested
//!
//! 1. Focus only ever lands on a valid target in the current scope.
//! 2. Implicit grid rows wrap horizontally; explicit columns never wrap.
//! 3. The list-panel contains vertical movement and skips free-text fields.
//! 4. Horizontal moves cross between the panel and the grid.
//! 5. Overlays isolate navigation, by precedence rather than opening order.
//! 6. Debounced input performs one move, in the last requested direction.
//! 7. Same layout, same path.

use std::time::Duration;

use padnav::{
    Direction, MoveOutcome, NavConfig, NodeId, OverlayKind, Rect, RegionTags, RestoreSource,
    SpatialNavigator, UnchangedReason,
};
use padnav_core::memory::{MemoryNode, MemoryTree};
use web_time::Instant;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// ```text
///   [search      ]   [c00] [c01] [c02]
///   [item 0      ]
///   [item 1      ]   [c10] [c11] [c12]
///   [item 2      ]
/// ```
struct Screen {
    tree: MemoryTree,
    field: NodeId,
    items: Vec<NodeId>,
    cells: Vec<Vec<NodeId>>,
}

fn screen() -> Screen {
    let mut tree = MemoryTree::new();
    let panel = tree.add(
        MemoryNode::container(Rect::new(0.0, 0.0, 300.0, 720.0)).with_tags(RegionTags::LIST_PANEL),
    );
    let field = tree.add_child(
        panel,
        MemoryNode::focusable(Rect::new(0.0, 0.0, 300.0, 60.0)).with_tags(RegionTags::FREE_TEXT),
    );
    let items = (0..3)
        .map(|i| {
            tree.add_child(
                panel,
                MemoryNode::focusable(Rect::new(0.0, 100.0 + i as f64 * 100.0, 300.0, 80.0)),
            )
        })
        .collect();
    let grid = tree.add(
        MemoryNode::container(Rect::new(400.0, 100.0, 540.0, 240.0)).with_tags(RegionTags::GRID),
    );
    let cells = (0..2)
        .map(|r| {
            (0..3)
                .map(|c| {
                    tree.add_child(
                        grid,
                        MemoryNode::focusable(Rect::new(
                            400.0 + c as f64 * 180.0,
                            100.0 + r as f64 * 140.0,
                            160.0,
                            100.0,
                        ))
                        .with_tags(RegionTags::GRID_CELL),
                    )
                })
                .collect()
        })
        .collect();
    tree.take_records();
    Screen {
        tree,
        field,
        items,
        cells,
    }
}

fn moved_to(outcome: MoveOutcome) -> NodeId {
    match outcome {
        MoveOutcome::Moved { to, .. } => to,
        other => panic!("expected a move, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

#[test]
fn implicit_row_wraps_through_every_cell() {
    let mut tree = MemoryTree::new();
    let row: Vec<NodeId> = (0..4)
        .map(|c| {
            tree.add(
                MemoryNode::focusable(Rect::new(c as f64 * 150.0, 0.0, 120.0, 80.0))
                    .with_tags(RegionTags::GRID_CELL),
            )
        })
        .collect();
    let mut nav = SpatialNavigator::default();
    assert!(nav.focus(&mut tree, row[0]));

    let mut path = Vec::new();
    for _ in 0..4 {
        path.push(moved_to(nav.move_focus(&mut tree, Direction::Right)));
    }
    assert_eq!(path, vec![row[1], row[2], row[3], row[0]]);

    assert_eq!(moved_to(nav.move_focus(&mut tree, Direction::Left)), row[3]);
}

#[test]
fn grid_vertical_moves_keep_column_and_stop_at_last_row() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.cells[0][1]);
    assert_eq!(
        moved_to(nav.move_focus(&mut s.tree, Direction::Down)),
        s.cells[1][1]
    );
    assert_eq!(
        nav.move_focus(&mut s.tree, Direction::Down),
        MoveOutcome::Unchanged(UnchangedReason::Edge)
    );
    assert_eq!(nav.current(), Some(s.cells[1][1]));
}

#[test]
fn explicit_last_column_does_not_move_right() {
    let mut tree = MemoryTree::new();
    let mut last = 0;
    let mut first = 0;
    for col in 0..4u32 {
        for row in 0..2 {
            let id = tree.add(
                MemoryNode::focusable(Rect::new(
                    col as f64 * 200.0,
                    row as f64 * 200.0 + col as f64 * 25.0,
                    180.0,
                    180.0,
                ))
                .with_column(col),
            );
            if col == 3 && row == 0 {
                last = id;
            }
            if col == 0 && row == 0 {
                first = id;
            }
        }
    }
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut tree, last);
    assert_eq!(
        nav.move_focus(&mut tree, Direction::Right),
        MoveOutcome::Unchanged(UnchangedReason::Edge)
    );
    assert_eq!(nav.current(), Some(last));
    assert_ne!(nav.current(), Some(first));
}

// ---------------------------------------------------------------------------
// List-panel and cross-region
// ---------------------------------------------------------------------------

#[test]
fn panel_contains_vertical_movement() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.items[0]);

    assert_eq!(
        moved_to(nav.move_focus(&mut s.tree, Direction::Down)),
        s.items[1]
    );
    assert_eq!(
        moved_to(nav.move_focus(&mut s.tree, Direction::Down)),
        s.items[2]
    );
    assert_eq!(
        nav.move_focus(&mut s.tree, Direction::Down),
        MoveOutcome::Unchanged(UnchangedReason::Edge)
    );

    // Back up to the top item; the search field above is skipped.
    nav.move_focus(&mut s.tree, Direction::Up);
    nav.move_focus(&mut s.tree, Direction::Up);
    assert_eq!(nav.current(), Some(s.items[0]));
    assert_eq!(
        nav.move_focus(&mut s.tree, Direction::Up),
        MoveOutcome::Unchanged(UnchangedReason::Edge)
    );
}

#[test]
fn search_field_swallows_vertical_keys() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.field);
    assert_eq!(
        nav.move_focus(&mut s.tree, Direction::Down),
        MoveOutcome::Unchanged(UnchangedReason::Swallowed)
    );
    assert_eq!(s.tree.focused(), Some(s.field));
}

#[test]
fn horizontal_moves_cross_between_panel_and_grid() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.items[0]);

    assert_eq!(
        moved_to(nav.move_focus(&mut s.tree, Direction::Right)),
        s.cells[0][0]
    );
    // First cell of the row faces the panel: leave the grid instead of wrapping.
    assert_eq!(
        moved_to(nav.move_focus(&mut s.tree, Direction::Left)),
        s.items[0]
    );
}

#[test]
fn grid_row_still_wraps_away_from_the_panel() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.cells[1][2]);
    assert_eq!(
        moved_to(nav.move_focus(&mut s.tree, Direction::Right)),
        s.cells[1][0]
    );
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

#[test]
fn overlay_isolates_and_restores_on_close() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.cells[0][0]);

    let dialog = s.tree.add(MemoryNode::overlay(
        OverlayKind::Dialog,
        Rect::new(300.0, 200.0, 600.0, 300.0),
    ));
    let ok = s
        .tree
        .add_child(dialog, MemoryNode::focusable(Rect::new(350.0, 400.0, 200.0, 60.0)));
    let cancel = s
        .tree
        .add_child(dialog, MemoryNode::focusable(Rect::new(650.0, 400.0, 200.0, 60.0)));

    // Focus sits outside the dialog: the first move enters it.
    assert_eq!(
        nav.move_focus(&mut s.tree, Direction::Right),
        MoveOutcome::Moved { from: None, to: ok }
    );
    assert_eq!(moved_to(nav.move_focus(&mut s.tree, Direction::Right)), cancel);
    assert_eq!(
        nav.move_focus(&mut s.tree, Direction::Up),
        MoveOutcome::Unchanged(UnchangedReason::NoCandidate)
    );

    s.tree.remove(dialog);
    let restored = nav
        .restore_after_overlay_close(&mut s.tree)
        .expect("content is still focusable");
    assert_eq!(restored.target, s.cells[0][0]);
    assert_eq!(restored.source, RestoreSource::History);
    assert_eq!(s.tree.focused(), Some(s.cells[0][0]));
}

#[test]
fn overlay_precedence_beats_opening_order() {
    let mut s = screen();
    let dialog = s.tree.add(MemoryNode::overlay(
        OverlayKind::Dialog,
        Rect::new(0.0, 0.0, 400.0, 200.0),
    ));
    let confirm = s
        .tree
        .add_child(dialog, MemoryNode::focusable(Rect::new(0.0, 0.0, 100.0, 50.0)));
    // Opened later, but a menu ranks below a dialog.
    let menu = s.tree.add(MemoryNode::overlay(
        OverlayKind::Menu,
        Rect::new(500.0, 0.0, 400.0, 200.0),
    ));
    s.tree
        .add_child(menu, MemoryNode::focusable(Rect::new(500.0, 0.0, 100.0, 50.0)));

    let mut nav = SpatialNavigator::default();
    assert_eq!(
        nav.move_focus(&mut s.tree, Direction::Down),
        MoveOutcome::Moved {
            from: None,
            to: confirm
        }
    );
    assert_eq!(
        nav.move_focus(&mut s.tree, Direction::Right),
        MoveOutcome::Unchanged(UnchangedReason::NoCandidate)
    );
}

// ---------------------------------------------------------------------------
// Restoration
// ---------------------------------------------------------------------------

#[test]
fn saved_focus_is_restored_after_screen_change() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.cells[1][2]);
    nav.save_focus();
    nav.focus(&mut s.tree, s.items[1]);
    nav.focus(&mut s.tree, s.items[2]);

    let restored = nav.restore_focus(&mut s.tree, None).expect("restorable");
    assert_eq!(restored.target, s.cells[1][2]);
    assert_eq!(restored.source, RestoreSource::Explicit);
}

#[test]
fn full_screen_return_keeps_valid_current() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.cells[0][2]);
    let restored = nav
        .restore_after_full_screen_return(&mut s.tree)
        .expect("restorable");
    assert_eq!(restored.source, RestoreSource::Current);
    assert_eq!(restored.target, s.cells[0][2]);
}

// ---------------------------------------------------------------------------
// Debounce, history, determinism
// ---------------------------------------------------------------------------

#[test]
fn debounced_burst_performs_one_move_in_last_direction() {
    let mut s = screen();
    let mut nav = SpatialNavigator::default();
    nav.focus(&mut s.tree, s.cells[0][1]);

    let t0 = Instant::now();
    let burst = [
        Direction::Right,
        Direction::Right,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];
    for (i, dir) in burst.into_iter().enumerate() {
        nav.request_move(dir, t0 + Duration::from_millis(i as u64 * 10));
    }
    let last = t0 + Duration::from_millis(40);
    assert_eq!(nav.pending_deadline(), Some(last + Duration::from_millis(50)));

    assert_eq!(nav.poll(&mut s.tree, last + Duration::from_millis(49)), None);
    assert_eq!(nav.perf_stats().operations(), 0);

    let outcome = nav
        .poll(&mut s.tree, last + Duration::from_millis(50))
        .expect("window elapsed");
    assert_eq!(moved_to(outcome), s.cells[1][1]);
    assert_eq!(nav.perf_stats().operations(), 1);
    assert_eq!(nav.superseded_requests(), 4);
    assert_eq!(nav.poll(&mut s.tree, last + Duration::from_secs(1)), None);
}

#[test]
fn history_stays_bounded_over_long_sessions() {
    let mut tree = MemoryTree::new();
    let row: Vec<NodeId> = (0..7)
        .map(|c| {
            tree.add(
                MemoryNode::focusable(Rect::new(c as f64 * 150.0, 0.0, 120.0, 80.0))
                    .with_tags(RegionTags::GRID_CELL),
            )
        })
        .collect();
    let config = NavConfig {
        history_capacity: 50,
        ..NavConfig::default()
    };
    let mut nav = SpatialNavigator::new(config);
    nav.focus(&mut tree, row[0]);
    for _ in 0..60 {
        nav.move_focus(&mut tree, Direction::Right);
    }
    assert_eq!(nav.history().len(), 50);
    let entries: Vec<NodeId> = nav.history().iter().collect();
    assert!(entries.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn same_layout_same_path() {
    let path = |dirs: &[Direction]| {
        let mut s = screen();
        let mut nav = SpatialNavigator::default();
        dirs.iter()
            .map(|&d| nav.move_focus(&mut s.tree, d))
            .collect::<Vec<_>>()
    };
    let dirs = [
        Direction::Down,
        Direction::Right,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Left,
        Direction::Left,
        Direction::Down,
    ];
    assert_eq!(path(&dirs[..]), path(&dirs[..]));
}

#[test]
fn every_move_lands_on_a_valid_target() {
    let mut s = screen();
    s.tree.set_disabled(s.items[1], true);
    let mut nav = SpatialNavigator::default();
    for dir in Direction::ALL.iter().cycle().take(40) {
        if let MoveOutcome::Moved { to, .. } = nav.move_focus(&mut s.tree, *dir) {
            assert_ne!(to, s.items[1]);
            assert_eq!(s.tree.focused(), Some(to));
        }
    }
}
