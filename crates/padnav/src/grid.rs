#![forbid(unsafe_code)]

//! Grid navigator: row/column movement over content grids.
//!
//! Two modes, chosen structurally by the focused cell:
//!
//! - **Explicit columns** (the cell carries a column index): horizontal moves
//!   jump to the adjacent column index and pick the cell nearest in
//!   vertical center; vertical moves step through the column's cells in
//!   vertical order. Nothing wraps.
//! - **Implicit clustering** (grid-cell marker only): cells are clustered
//!   into rows whose vertical centers lie within the tolerance of the row's
//!   first cell. Horizontal moves step within the row and wrap at both
//!   edges; vertical moves go to the adjacent row (no wrap) and pick the
//!   cell nearest in horizontal center.
//!
//! Peers are the candidates sharing the focused cell's nearest `GRID`
//! container, so two grids on one screen never mix.

use padnav_core::{Direction, FocusTarget, NodeId, Point, RegionTags, VisualTree};

use crate::perf::GeometryCache;

/// Result of a grid move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMove {
    Moved(NodeId),
    /// At a non-wrapping edge; focus is preserved.
    Blocked,
    /// The focused node is not a grid cell.
    NotApplicable,
}

/// One row (or column) of clustered cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Members ordered along the cluster.
    pub members: Vec<(NodeId, Point)>,
    /// Mean center on the clustering axis.
    pub mean: f64,
}

impl Cluster {
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.members.iter().position(|(m, _)| *m == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn cluster_by(
    cells: &[(NodeId, Point)],
    tolerance: f64,
    key: fn(Point) -> f64,
    along: fn(Point) -> f64,
) -> Vec<Cluster> {
    let mut sorted: Vec<(NodeId, Point)> = cells.to_vec();
    sorted.sort_by(|a, b| key(a.1).total_cmp(&key(b.1)));

    let mut clusters: Vec<(f64, Vec<(NodeId, Point)>)> = Vec::new();
    for cell in sorted {
        match clusters.last_mut() {
            Some((anchor, members)) if (key(cell.1) - *anchor).abs() <= tolerance => {
                members.push(cell);
            }
            _ => clusters.push((key(cell.1), vec![cell])),
        }
    }

    let mut out: Vec<Cluster> = clusters
        .into_iter()
        .map(|(_, mut members)| {
            let mean = members.iter().map(|(_, p)| key(*p)).sum::<f64>() / members.len() as f64;
            members.sort_by(|a, b| along(a.1).total_cmp(&along(b.1)));
            Cluster { members, mean }
        })
        .collect();
    out.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    out
}

/// Cluster cells into rows: top to bottom, members left to right.
pub fn cluster_rows(cells: &[(NodeId, Point)], tolerance: f64) -> Vec<Cluster> {
    cluster_by(cells, tolerance, |p| p.y, |p| p.x)
}

/// Cluster cells into columns: left to right, members top to bottom.
pub fn cluster_columns(cells: &[(NodeId, Point)], tolerance: f64) -> Vec<Cluster> {
    cluster_by(cells, tolerance, |p| p.x, |p| p.y)
}

fn is_cell<T: FocusTarget>(node: &T) -> bool {
    node.region_tags().contains(RegionTags::GRID_CELL) || node.column_index().is_some()
}

/// Grid cells among `candidates` that share `current`'s grid container,
/// with their centers. `current` is always included.
pub fn peers<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    current: NodeId,
    candidates: &[NodeId],
) -> Vec<(NodeId, Point)> {
    let container = tree.region_root(current, RegionTags::GRID);
    let mut ids: Vec<NodeId> = candidates
        .iter()
        .copied()
        .filter(|&id| {
            tree.target(id).is_some_and(is_cell)
                && tree.region_root(id, RegionTags::GRID) == container
        })
        .collect();
    if !ids.contains(&current) {
        ids.push(current);
    }
    cache.centers(tree, &ids)
}

/// Try a grid move from `current`.
pub fn navigate<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    current: NodeId,
    candidates: &[NodeId],
    dir: Direction,
    tolerance: f64,
) -> GridMove {
    let Some(node) = tree.target(current) else {
        return GridMove::NotApplicable;
    };
    if !is_cell(node) {
        return GridMove::NotApplicable;
    }
    let column = node.column_index();
    let cells = peers(tree, cache, current, candidates);
    let Some(origin) = cells.iter().find(|(id, _)| *id == current).map(|(_, p)| *p) else {
        return GridMove::NotApplicable;
    };

    match column {
        Some(col) => navigate_explicit(tree, &cells, current, origin, col, dir),
        None => navigate_implicit(&cells, current, dir, tolerance),
    }
}

fn navigate_explicit<T: VisualTree>(
    tree: &T,
    cells: &[(NodeId, Point)],
    current: NodeId,
    origin: Point,
    col: u32,
    dir: Direction,
) -> GridMove {
    let in_column = |c: u32| -> Vec<(NodeId, Point)> {
        cells
            .iter()
            .copied()
            .filter(|(id, _)| tree.target(*id).and_then(|n| n.column_index()) == Some(c))
            .collect()
    };

    if dir.is_horizontal() {
        let target_col = match dir {
            Direction::Right => col.checked_add(1),
            _ => col.checked_sub(1),
        };
        let Some(target_col) = target_col else {
            return GridMove::Blocked;
        };
        let mut best: Option<(NodeId, f64)> = None;
        for (id, p) in in_column(target_col) {
            let dy = (p.y - origin.y).abs();
            if best.is_none_or(|(_, best_dy)| dy < best_dy) {
                best = Some((id, dy));
            }
        }
        return best.map_or(GridMove::Blocked, |(id, _)| GridMove::Moved(id));
    }

    let mut column_cells = in_column(col);
    column_cells.sort_by(|a, b| a.1.y.total_cmp(&b.1.y));
    let Some(index) = column_cells.iter().position(|(id, _)| *id == current) else {
        return GridMove::NotApplicable;
    };
    let next = if dir.is_forward() {
        index.checked_add(1)
    } else {
        index.checked_sub(1)
    };
    match next.and_then(|i| column_cells.get(i)) {
        Some((id, _)) => GridMove::Moved(*id),
        None => GridMove::Blocked,
    }
}

fn navigate_implicit(
    cells: &[(NodeId, Point)],
    current: NodeId,
    dir: Direction,
    tolerance: f64,
) -> GridMove {
    let rows = cluster_rows(cells, tolerance);
    let Some((row_index, pos)) = rows
        .iter()
        .enumerate()
        .find_map(|(r, row)| row.position(current).map(|i| (r, i)))
    else {
        return GridMove::NotApplicable;
    };
    let row = &rows[row_index];

    if dir.is_horizontal() {
        let len = row.len();
        if len < 2 {
            return GridMove::Blocked;
        }
        let next = if dir.is_forward() {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        return GridMove::Moved(row.members[next].0);
    }

    let target_row = if dir.is_forward() {
        row_index.checked_add(1)
    } else {
        row_index.checked_sub(1)
    };
    let Some(target) = target_row.and_then(|r| rows.get(r)) else {
        return GridMove::Blocked;
    };
    let origin_x = row.members[pos].1.x;
    let mut best: Option<(NodeId, f64)> = None;
    for &(id, p) in &target.members {
        let dx = (p.x - origin_x).abs();
        if best.is_none_or(|(_, best_dx)| dx < best_dx) {
            best = Some((id, dx));
        }
    }
    best.map_or(GridMove::Blocked, |(id, _)| GridMove::Moved(id))
}

/// `true` if `current` is the first (moving left) or last (moving right)
/// member of its implicit row, i.e. a horizontal move would wrap.
pub fn at_row_edge<T: VisualTree>(
    tree: &T,
    cache: &mut GeometryCache,
    current: NodeId,
    candidates: &[NodeId],
    dir: Direction,
    tolerance: f64,
) -> bool {
    if !dir.is_horizontal() {
        return false;
    }
    let cells = peers(tree, cache, current, candidates);
    let rows = cluster_rows(&cells, tolerance);
    rows.iter().any(|row| match row.position(current) {
        Some(pos) if dir.is_forward() => pos + 1 == row.len(),
        Some(pos) => pos == 0,
        None => false,
    })
}
