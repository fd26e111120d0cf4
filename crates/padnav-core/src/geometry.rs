#![forbid(unsafe_code)]

//! Geometric primitives and the pure math the scorer is built on.
//!
//! Coordinates are host layout units (pixels, points, or cells), origin at
//! top-left, `y` growing downward. Every function here is side-effect free
//! and total over finite inputs; zero-size rectangles are legal.

use crate::direction::Direction;

/// Minimum signed displacement (layout units) along the movement axis for a
/// candidate to count as lying in a direction.
pub const DEFAULT_DIRECTION_THRESHOLD: f64 = 20.0;

/// A point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(self, other: Point) -> f64 {
        distance(self, other)
    }

    /// Bearing from `self` to `other` in degrees (see [`angle`]).
    #[inline]
    pub fn angle_to(self, other: Point) -> f64 {
        angle(self, other)
    }
}

/// An axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

/// Center of `rect`.
#[inline]
pub fn center(rect: &Rect) -> Point {
    rect.center()
}

/// Euclidean distance `√(dx² + dy²)`.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Bearing from `a` to `b`: `atan2(dy, dx)` in degrees, range `(-180, 180]`.
///
/// With `y` growing downward, right is 0°, down is 90°, left is 180°, and
/// up is −90°.
#[inline]
pub fn angle(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Fold a raw angular difference into `[0, 180]`.
///
/// Takes the absolute value, reduces it mod 360, and reflects anything above
/// 180 as `360 - value`, so 190° and −170° both fold to 170°.
#[inline]
pub fn normalize_angle(diff: f64) -> f64 {
    let folded = diff.abs() % 360.0;
    if folded > 180.0 {
        360.0 - folded
    } else {
        folded
    }
}

/// Deviation (0..=180 degrees) between the bearing `origin → target` and the
/// ideal bearing of `dir`.
#[inline]
pub fn angle_deviation(origin: Point, target: Point, dir: Direction) -> f64 {
    normalize_angle(angle(origin, target) - dir.angle())
}

/// Signed displacement of `target` from `origin` along the axis of `dir`,
/// positive when `target` lies in `dir`.
#[inline]
pub fn axis_displacement(origin: Point, target: Point, dir: Direction) -> f64 {
    match dir {
        Direction::Right => target.x - origin.x,
        Direction::Left => origin.x - target.x,
        Direction::Down => target.y - origin.y,
        Direction::Up => origin.y - target.y,
    }
}

/// The direction gate: `true` only if the signed displacement along the axis
/// of `dir` exceeds `threshold`.
///
/// The orthogonal axis is ignored, so a point below-and-right of `origin`
/// passes for both `Down` and `Right`.
#[inline]
pub fn in_direction(origin: Point, target: Point, dir: Direction, threshold: f64) -> bool {
    axis_displacement(origin, target, dir) > threshold
}
