//! Segment vs axis-aligned rectangle intersection.
//!
//! The sensor casts rays as finite segments and asks which sides of a
//! rectangle they cross. Callers that want a single hit use
//! [`RectHits::first`], which picks sides in a fixed priority order (top,
//! bottom, left, right) rather than by distance: a ray passing through a
//! rectangle reports the top edge even when the bottom edge is nearer.

use serde::Serialize;

/// Determinant threshold below which two segments are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle addressed by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle addressed by its center, the convention walls and things use.
    pub fn centered(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Per-side crossing points of one segment against one rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectHits {
    pub top: Option<Point>,
    pub bottom: Option<Point>,
    pub left: Option<Point>,
    pub right: Option<Point>,
}

impl RectHits {
    /// First crossed side in the fixed priority order top, bottom, left,
    /// right. Not nearest-point selection.
    pub fn first(&self) -> Option<(Side, Point)> {
        if let Some(p) = self.top {
            return Some((Side::Top, p));
        }
        if let Some(p) = self.bottom {
            return Some((Side::Bottom, p));
        }
        if let Some(p) = self.left {
            return Some((Side::Left, p));
        }
        if let Some(p) = self.right {
            return Some((Side::Right, p));
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

/// Crossing point of segments `a1->a2` and `b1->b2`, if any.
///
/// Parametric two-segment intersection: solve for the scalar parameters of
/// both segments and accept only when both land in `[0, 1]`. A near-zero
/// determinant (parallel segments, or a degenerate zero-length segment)
/// yields `None` rather than dividing by zero.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let den = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if den.abs() < PARALLEL_EPSILON {
        return None;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / den;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / den;
    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(Point {
        x: a1.x + ua * (a2.x - a1.x),
        y: a1.y + ua * (a2.y - a1.y),
    })
}

/// Crossing points of the segment `a->b` against each side of `rect`.
pub fn segment_rect_hits(a: Point, b: Point, rect: &Rect) -> RectHits {
    let tl = Point::new(rect.x, rect.y);
    let tr = Point::new(rect.x + rect.w, rect.y);
    let bl = Point::new(rect.x, rect.y + rect.h);
    let br = Point::new(rect.x + rect.w, rect.y + rect.h);

    RectHits {
        top: segments_intersect(a, b, tl, tr),
        bottom: segments_intersect(a, b, bl, br),
        left: segments_intersect(a, b, tl, bl),
        right: segments_intersect(a, b, tr, br),
    }
}
