//! Axis-aligned geometry for collision and line-of-sight
//!
//! Everything in the arena is a box aligned to the screen axes, so the
//! only primitives needed are box overlap and segment crossing tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of `size` whose top-left corner is `pos`
    pub fn at(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Square bounding box of a circle
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Inclusive point containment
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// The four edges as segments: top, bottom, left, right
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = Vec2::new(self.x, self.y);
        let tr = Vec2::new(self.right(), self.y);
        let bl = Vec2::new(self.x, self.bottom());
        let br = Vec2::new(self.right(), self.bottom());
        [(tl, tr), (bl, br), (tl, bl), (tr, br)]
    }
}

/// Parametric segment-segment intersection test
///
/// Parallel segments (zero denominator) never intersect, including
/// collinear overlapping ones.
pub fn segment_intersects(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let den = (q2.y - q1.y) * (p2.x - p1.x) - (q2.x - q1.x) * (p2.y - p1.y);
    if den == 0.0 {
        return false;
    }

    let ua = ((q2.x - q1.x) * (p1.y - q1.y) - (q2.y - q1.y) * (p1.x - q1.x)) / den;
    let ub = ((p2.x - p1.x) * (p1.y - q1.y) - (p2.y - p1.y) * (p1.x - q1.x)) / den;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// True if the segment crosses any edge of `rect` or either endpoint lies inside it
pub fn segment_intersects_rect(p1: Vec2, p2: Vec2, rect: &Rect) -> bool {
    rect.edges()
        .iter()
        .any(|&(a, b)| segment_intersects(p1, p2, a, b))
        || rect.contains(p1)
        || rect.contains(p2)
}

/// True if the segment between two points is not blocked by any wall
pub fn has_line_of_sight(from: Vec2, to: Vec2, walls: &[Rect]) -> bool {
    !walls.iter().any(|w| segment_intersects_rect(from, to, w))
}

/// True if `rect` overlaps any wall
pub fn overlaps_any(rect: &Rect, walls: &[Rect]) -> bool {
    walls.iter().any(|w| rect.overlaps(w))
}
