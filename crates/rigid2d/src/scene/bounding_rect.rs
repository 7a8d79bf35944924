//! Axis-aligned bounding rectangle
//!
//! The leaf primitive shared by shapes, the quadtree and culling callers.
//! Y grows upward, so `max.y` is the top edge.

use bitflags::bitflags;

use crate::foundation::math::{Mat3, Point2, Vec2};

bitflags! {
    /// Which sides of another rectangle a rectangle pokes through
    ///
    /// An empty set means the two rectangles do not touch at all.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollideStatus: u8 {
        /// Extends past the other's left edge
        const LEFT = 1 << 0;
        /// Extends past the other's right edge
        const RIGHT = 1 << 1;
        /// Extends past the other's top edge
        const TOP = 1 << 2;
        /// Extends past the other's bottom edge
        const BOTTOM = 1 << 3;
        /// Overlaps without exceeding any side
        const INSIDE = 1 << 4;
    }
}

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    /// Minimum corner (bottom-left)
    pub min: Vec2,
    /// Maximum corner (top-right)
    pub max: Vec2,
}

impl BoundingRect {
    /// Create a rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle centered at a point with the given full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Fit a rectangle to a point set, `None` for an empty set
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Self::new(*first, *first);
        for point in rest {
            rect.combine_point(*point);
        }
        Some(rect)
    }

    /// Union of a list of rectangles, refit from all of their corners
    pub fn combine_rects(rects: &[BoundingRect]) -> Option<Self> {
        let corners: Vec<Vec2> = rects.iter().flat_map(BoundingRect::corners).collect();
        Self::from_points(&corners)
    }

    /// Full width and height
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Corners in counter-clockwise order starting at `min`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Axis-aligned box around the transformed corners
    ///
    /// This is not a tight fit of a rotated rectangle: rotating by 45° and back
    /// grows the box.
    pub fn transform(&self, matrix: &Mat3) -> Self {
        let corners = self
            .corners()
            .map(|corner| matrix.transform_point(&Point2::from(corner)).coords);
        let mut rect = Self::new(corners[0], corners[0]);
        for corner in &corners[1..] {
            rect.combine_point(*corner);
        }
        rect
    }

    /// Grow to include a point
    pub fn combine_point(&mut self, point: Vec2) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Grow to include another rectangle
    pub fn combine_rect(&mut self, other: &BoundingRect) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Copy grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        let margin = Vec2::new(margin, margin);
        Self::new(self.min - margin, self.max + margin)
    }

    /// Inclusive point test
    pub fn is_point_inside(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if this rectangle overlaps another (touching counts)
    pub fn is_intersecting(&self, other: &BoundingRect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Check if this rectangle fully encloses another
    pub fn contains(&self, other: &BoundingRect) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Sides of `other` that this rectangle exceeds
    pub fn collide_status(&self, other: &BoundingRect) -> CollideStatus {
        let mut status = CollideStatus::empty();
        if !self.is_intersecting(other) {
            return status;
        }

        if self.min.x < other.min.x {
            status |= CollideStatus::LEFT;
        }
        if self.max.x > other.max.x {
            status |= CollideStatus::RIGHT;
        }
        if self.min.y < other.min.y {
            status |= CollideStatus::BOTTOM;
        }
        if self.max.y > other.max.y {
            status |= CollideStatus::TOP;
        }

        if status.is_empty() {
            CollideStatus::INSIDE
        } else {
            status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants, Transform2D};
    use approx::assert_relative_eq;

    fn rect(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> BoundingRect {
        BoundingRect::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    #[test]
    fn test_from_points_is_tightest_fit() {
        let points = [
            Vec2::new(1.0, -2.0),
            Vec2::new(-3.0, 4.0),
            Vec2::new(0.5, 0.5),
            Vec2::new(2.0, 1.0),
        ];
        let fitted = BoundingRect::from_points(&points).unwrap();

        for point in &points {
            assert!(fitted.is_point_inside(*point));
        }
        // Every side is touched by some point, so no tighter box exists
        assert!(points.iter().any(|p| p.x == fitted.min.x));
        assert!(points.iter().any(|p| p.x == fitted.max.x));
        assert!(points.iter().any(|p| p.y == fitted.min.y));
        assert!(points.iter().any(|p| p.y == fitted.max.y));
        assert_eq!(fitted, rect(-3.0, -2.0, 2.0, 4.0));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(BoundingRect::from_points(&[]).is_none());
    }

    #[test]
    fn test_size_and_center() {
        let r = rect(-1.0, 2.0, 3.0, 8.0);
        assert_relative_eq!(r.size(), Vec2::new(4.0, 6.0));
        assert_relative_eq!(r.center(), Vec2::new(1.0, 5.0));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let cases = [
            (rect(0.0, 0.0, 2.0, 2.0), rect(1.0, 1.0, 3.0, 3.0)),
            (rect(0.0, 0.0, 2.0, 2.0), rect(2.0, 0.0, 4.0, 2.0)),
            (rect(0.0, 0.0, 2.0, 2.0), rect(2.1, 0.0, 4.0, 2.0)),
            (rect(-5.0, -5.0, 5.0, 5.0), rect(-1.0, -1.0, 1.0, 1.0)),
            (rect(0.0, 0.0, 1.0, 1.0), rect(0.0, 3.0, 1.0, 4.0)),
        ];
        for (a, b) in cases {
            assert_eq!(a.is_intersecting(&b), b.is_intersecting(&a));
        }
        assert!(cases[0].0.is_intersecting(&cases[0].1));
        assert!(cases[1].0.is_intersecting(&cases[1].1));
        assert!(!cases[2].0.is_intersecting(&cases[2].1));
        assert!(!cases[4].0.is_intersecting(&cases[4].1));
    }

    #[test]
    fn test_contains() {
        let outer = rect(-5.0, -5.0, 5.0, 5.0);
        assert!(outer.contains(&rect(-1.0, -1.0, 1.0, 1.0)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&rect(4.0, 4.0, 6.0, 6.0)));
        assert!(!rect(-1.0, -1.0, 1.0, 1.0).contains(&outer));
    }

    #[test]
    fn test_combine() {
        let mut r = rect(0.0, 0.0, 1.0, 1.0);
        r.combine_point(Vec2::new(-2.0, 0.5));
        assert_eq!(r, rect(-2.0, 0.0, 1.0, 1.0));
        r.combine_rect(&rect(0.0, -1.0, 3.0, 0.0));
        assert_eq!(r, rect(-2.0, -1.0, 3.0, 1.0));

        let union = BoundingRect::combine_rects(&[rect(0.0, 0.0, 1.0, 1.0), rect(5.0, -2.0, 6.0, -1.0)]);
        assert_eq!(union, Some(rect(0.0, -2.0, 6.0, 1.0)));
        assert!(BoundingRect::combine_rects(&[]).is_none());
    }

    #[test]
    fn test_transform_fits_rotated_corners() {
        let r = rect(-1.0, -1.0, 1.0, 1.0);
        let rotated = r.transform(&Transform2D::from_position_rotation(Vec2::new(10.0, 0.0), constants::PI / 4.0).to_matrix());
        let half_diagonal = 2.0_f32.sqrt();
        assert_relative_eq!(rotated.min, Vec2::new(10.0 - half_diagonal, -half_diagonal), epsilon = 1e-5);
        assert_relative_eq!(rotated.max, Vec2::new(10.0 + half_diagonal, half_diagonal), epsilon = 1e-5);
    }

    #[test]
    fn test_collide_status_sides() {
        let other = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect(-1.0, 2.0, 2.0, 4.0).collide_status(&other), CollideStatus::LEFT);
        assert_eq!(rect(8.0, 2.0, 11.0, 4.0).collide_status(&other), CollideStatus::RIGHT);
        assert_eq!(rect(2.0, 8.0, 4.0, 12.0).collide_status(&other), CollideStatus::TOP);
        assert_eq!(rect(2.0, -3.0, 4.0, 1.0).collide_status(&other), CollideStatus::BOTTOM);
        assert_eq!(
            rect(-1.0, -1.0, 2.0, 2.0).collide_status(&other),
            CollideStatus::LEFT | CollideStatus::BOTTOM
        );
        assert_eq!(rect(2.0, 2.0, 4.0, 4.0).collide_status(&other), CollideStatus::INSIDE);
        assert!(rect(20.0, 20.0, 21.0, 21.0).collide_status(&other).is_empty());
    }
}
