//! Narrow-phase collision tests
//!
//! Every test returns a fresh [`CollisionInfo`] by value, or `None` when the
//! shapes do not touch. Dispatch over the closed [`ShapeKind`] set covers all
//! four shape pairs.
//!
//! Contact convention: `normal` points from the first shape toward the second,
//! `start` lies on the second shape's surface and `end = start + normal * depth`
//! on the first shape's surface.

use crate::foundation::math::Vec2;

use super::shape::{RectangleGeometry, RigidShape, ShapeKind};

/// Penetration record for a single contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Penetration depth, never negative
    pub depth: f32,
    /// Unit collision direction
    pub normal: Vec2,
    /// Contact point on one surface
    pub start: Vec2,
    /// `start + normal * depth`
    pub end: Vec2,
}

impl CollisionInfo {
    /// Build an info record; `end` is derived from the other three values
    pub fn new(depth: f32, normal: Vec2, start: Vec2) -> Self {
        Self {
            depth,
            normal,
            start,
            end: start + normal * depth,
        }
    }

    /// Same contact seen from the other shape: flipped normal, swapped points
    pub fn reversed(self) -> Self {
        Self {
            depth: self.depth,
            normal: -self.normal,
            start: self.end,
            end: self.start,
        }
    }
}

/// Test two shapes for overlap
pub fn test_shapes(a: &RigidShape, b: &RigidShape) -> Option<CollisionInfo> {
    match (a.kind(), b.kind()) {
        (ShapeKind::Rectangle(rect_a), ShapeKind::Rectangle(rect_b)) => rectangle_rectangle(rect_a, rect_b),
        (ShapeKind::Circle { radius: radius_a }, ShapeKind::Circle { radius: radius_b }) => {
            circle_circle(a.center(), *radius_a, b.center(), *radius_b)
        }
        (ShapeKind::Rectangle(rect), ShapeKind::Circle { radius }) => rectangle_circle(rect, b.center(), *radius),
        (ShapeKind::Circle { radius }, ShapeKind::Rectangle(rect)) => {
            rectangle_circle(rect, a.center(), *radius).map(CollisionInfo::reversed)
        }
    }
}

/// Separating-axis test run from both rectangles
///
/// Both directions must find a penetrating axis; the shallower one wins.
pub fn rectangle_rectangle(a: &RectangleGeometry, b: &RectangleGeometry) -> Option<CollisionInfo> {
    let from_a = a.find_axis_least_penetration(b)?;
    let from_b = b.find_axis_least_penetration(a)?;

    if from_a.depth < from_b.depth {
        Some(CollisionInfo::new(
            from_a.depth,
            from_a.normal,
            from_a.start - from_a.normal * from_a.depth,
        ))
    } else {
        Some(CollisionInfo::new(from_b.depth, -from_b.normal, from_b.start))
    }
}

/// Distance test between two circles
pub fn circle_circle(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> Option<CollisionInfo> {
    let from_a_to_b = center_b - center_a;
    let radius_sum = radius_a + radius_b;
    let distance = from_a_to_b.magnitude();
    if distance > radius_sum {
        return None;
    }

    if distance != 0.0 {
        let normal = from_a_to_b / distance;
        return Some(CollisionInfo::new(
            radius_sum - distance,
            normal,
            center_b - normal * radius_b,
        ));
    }

    // Coincident centers: push straight down from the top of the larger circle
    let (center, radius) = if radius_a > radius_b {
        (center_a, radius_a)
    } else {
        (center_b, radius_b)
    };
    Some(CollisionInfo::new(
        radius_sum,
        Vec2::new(0.0, -1.0),
        center + Vec2::new(0.0, radius),
    ))
}

/// Rectangle against circle, normal pointing from the rectangle to the circle
pub fn rectangle_circle(rect: &RectangleGeometry, center: Vec2, radius: f32) -> Option<CollisionInfo> {
    let vertices = rect.vertices();
    let normals = rect.face_normals();

    // Signed distance of the center to each face; stop at the first face it is outside of
    let mut inside = true;
    let mut best_distance = f32::MIN;
    let mut nearest_edge = 0;
    for i in 0..4 {
        let projection = (center - vertices[i]).dot(&normals[i]);
        if projection > 0.0 {
            best_distance = projection;
            nearest_edge = i;
            inside = false;
            break;
        }
        if projection > best_distance {
            best_distance = projection;
            nearest_edge = i;
        }
    }

    let face_normal = normals[nearest_edge];
    if inside {
        return Some(CollisionInfo::new(
            radius - best_distance,
            face_normal,
            center - face_normal * radius,
        ));
    }

    let edge_start = vertices[nearest_edge];
    let edge_end = vertices[(nearest_edge + 1) % 4];
    let edge = edge_end - edge_start;

    // Voronoi region of the edge's first vertex
    if (center - edge_start).dot(&edge) < 0.0 {
        return vertex_contact(edge_start, center, radius);
    }

    // Voronoi region of the edge's second vertex
    if (center - edge_end).dot(&-edge) < 0.0 {
        return vertex_contact(edge_end, center, radius);
    }

    // Face region
    if best_distance < radius {
        Some(CollisionInfo::new(
            radius - best_distance,
            face_normal,
            center - face_normal * radius,
        ))
    } else {
        None
    }
}

fn vertex_contact(vertex: Vec2, center: Vec2, radius: f32) -> Option<CollisionInfo> {
    let offset = center - vertex;
    let distance = offset.magnitude();
    if distance > radius {
        return None;
    }
    // Center exactly on the corner has no direction to push along
    let normal = offset.try_normalize(f32::EPSILON)?;
    Some(CollisionInfo::new(radius - distance, normal, center - normal * radius))
}
