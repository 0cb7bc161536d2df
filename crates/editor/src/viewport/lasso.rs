//! Freeform selection lasso: an implicitly closed polygon of viewport
//! points built incrementally during a pointer drag.

use glam::Vec2;

/// Maximum number of lasso points, including the closing duplicate slot
pub const MAX_LASSO_POINTS: usize = 256;

/// New points closer than this (squared pixels) to the previous one are
/// dropped, so fast pointer-move bursts don't flood the polygon.
pub const POINT_DIST_THRESHOLD_SQ: f32 = 12.0 * 12.0;

/// Axis-aligned 2D box in viewport space
#[derive(Clone, Copy, Debug)]
pub struct Box2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Box2 {
    pub fn empty() -> Self {
        Self {
            min: Vec2::splat(f32::MAX),
            max: Vec2::splat(f32::MIN),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn expand(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.expand(p);
        }
        b
    }

    pub fn intersects(&self, other: &Box2) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// The lasso polygon. Lives for a single gesture: `begin` at pointer-down,
/// `add_point` on pointer-move, `end` at pointer-up.
pub struct Lasso {
    /// Point storage; slot `point_count` holds a duplicate of the first
    /// point so the rendered polyline is closed.
    points: Vec<Vec2>,
    point_count: usize,
    pub bbox: Box2,
    pub is_drawing: bool,
}

impl Lasso {
    pub fn new() -> Self {
        Self {
            points: vec![Vec2::ZERO; MAX_LASSO_POINTS],
            point_count: 0,
            bbox: Box2::empty(),
            is_drawing: false,
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    fn point(&self, index: usize) -> Vec2 {
        self.points[index]
    }

    /// The closed polyline for the external renderer (last point
    /// duplicates the first).
    pub fn polyline(&self) -> &[Vec2] {
        if self.point_count == 0 {
            &[]
        } else {
            &self.points[..self.point_count + 1]
        }
    }

    pub fn begin(&mut self) {
        self.clear();
        self.is_drawing = true;
    }

    pub fn end(&mut self) {
        self.clear();
        self.is_drawing = false;
    }

    fn clear(&mut self) {
        self.point_count = 0;
        self.bbox = Box2::empty();
    }

    /// Append a point, keeping one slot free for the closing duplicate and
    /// skipping points too close to the previous one. Returns whether the
    /// point was actually added (callers use this to request a redraw).
    pub fn add_point(&mut self, p: Vec2) -> bool {
        if self.point_count >= MAX_LASSO_POINTS - 1 {
            return false;
        }
        if self.point_count > 0 {
            let prev = self.point(self.point_count - 1);
            if prev.distance_squared(p) < POINT_DIST_THRESHOLD_SQ {
                return false;
            }
        }

        self.points[self.point_count] = p;
        self.point_count += 1;
        // seal the polygon
        self.points[self.point_count] = self.points[0];
        self.bbox.expand(p);
        true
    }

    /// Test-only: append a point bypassing the spacing threshold
    #[cfg(test)]
    pub(crate) fn push_point_unchecked(&mut self, p: Vec2) {
        self.points[self.point_count] = p;
        self.point_count += 1;
        self.points[self.point_count] = self.points[0];
        self.bbox.expand(p);
    }

    /// Winding-number containment test. Counts edges crossing the
    /// horizontal line through `test_pt`, incrementing or decrementing by
    /// crossing direction; the point is inside iff the count is nonzero.
    /// Not an even-odd parity test: self-touching and multiply-wound
    /// polygons keep their interior.
    pub fn contains(&self, test_pt: Vec2) -> bool {
        let mut cross_count = 0i32;

        for i in 0..self.point_count {
            let a = self.point(i);
            let b = self.point((i + 1) % self.point_count);

            // signed distances of the edge endpoints from the split line
            let da = a.y - test_pt.y;
            let db = b.y - test_pt.y;

            // strict: an endpoint exactly on the line does not toggle
            if da * db >= 0.0 {
                continue;
            }

            let downwards = da < db;

            // orientation of (test→a, test→b) picks out edges on one side
            let cross = vec2_cross(a - test_pt, b - test_pt);
            if downwards {
                if cross < 0.0 {
                    cross_count += 1;
                }
            } else if cross > 0.0 {
                cross_count -= 1;
            }
        }

        cross_count != 0
    }
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new()
    }
}

fn vec2_cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}
