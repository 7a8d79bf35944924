//! Rigid body shapes
//!
//! A [`RigidShape`] carries the kinematic and dynamic state of one body
//! together with its geometry. Geometry is a closed set ([`ShapeKind`]) so
//! collision dispatch is a plain `match` over shape pairs.
//!
//! Rectangles keep world-space vertices and face normals. Both are derived
//! from center, size and angle and are rebuilt on every move or rotation.

use crate::foundation::math::{Vec2, Vec2Ext};
use crate::scene::BoundingRect;

use super::collision::CollisionInfo;

/// Vertex of another shape found by a support query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportPoint {
    /// Vertex position in world space
    pub point: Vec2,
    /// Projection of the vertex along the query direction
    pub distance: f32,
}

/// World-space rectangle geometry
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleGeometry {
    width: f32,
    height: f32,
    vertices: [Vec2; 4],
    face_normals: [Vec2; 4],
}

impl RectangleGeometry {
    fn new(center: Vec2, width: f32, height: f32, angle: f32) -> Self {
        let mut geometry = Self {
            width,
            height,
            vertices: [Vec2::zeros(); 4],
            face_normals: [Vec2::zeros(); 4],
        };
        geometry.rebuild(center, angle);
        geometry
    }

    /// Full width before rotation
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Full height before rotation
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Corners, counter-clockwise from the bottom-left corner of the unrotated box
    pub fn vertices(&self) -> &[Vec2; 4] {
        &self.vertices
    }

    /// Outward unit normals; normal `i` belongs to edge `vertices[i] -> vertices[i + 1]`
    pub fn face_normals(&self) -> &[Vec2; 4] {
        &self.face_normals
    }

    fn rebuild(&mut self, center: Vec2, angle: f32) {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        let local = [
            Vec2::new(-half_w, -half_h),
            Vec2::new(half_w, -half_h),
            Vec2::new(half_w, half_h),
            Vec2::new(-half_w, half_h),
        ];
        for (vertex, offset) in self.vertices.iter_mut().zip(local) {
            *vertex = (center + offset).rotate_about(&center, angle);
        }
        self.rebuild_normals();
    }

    fn translate(&mut self, delta: Vec2) {
        for vertex in &mut self.vertices {
            *vertex += delta;
        }
        self.rebuild_normals();
    }

    fn rebuild_normals(&mut self) {
        // The edge after the next one, reversed, is perpendicular and points outward
        for i in 0..4 {
            let edge = self.vertices[(i + 1) % 4] - self.vertices[(i + 2) % 4];
            self.face_normals[i] = edge.normalize();
        }
    }

    /// Deepest vertex of this rectangle along `dir`, measured from `point_on_edge`
    ///
    /// Only vertices with a positive projection count; `None` means no vertex
    /// crosses the edge, so the edge normal is a separating axis.
    pub fn find_support_point(&self, dir: &Vec2, point_on_edge: &Vec2) -> Option<SupportPoint> {
        let mut best: Option<SupportPoint> = None;
        for vertex in &self.vertices {
            let projection = (vertex - point_on_edge).dot(dir);
            if projection > 0.0 && best.map_or(true, |b| projection > b.distance) {
                best = Some(SupportPoint {
                    point: *vertex,
                    distance: projection,
                });
            }
        }
        best
    }

    /// Face of this rectangle along which `other` penetrates the least
    ///
    /// All four face normals are tested. If `other` has no support along any
    /// one of them the rectangles are separated and `None` is returned.
    /// The returned info starts on the face and ends at the support vertex's
    /// projection, with the normal pointing out of this rectangle.
    pub fn find_axis_least_penetration(&self, other: &RectangleGeometry) -> Option<CollisionInfo> {
        let mut best: Option<(Vec2, SupportPoint)> = None;
        for (normal, vertex) in self.face_normals.iter().zip(&self.vertices) {
            let support = other.find_support_point(&-normal, vertex)?;
            if best.map_or(true, |(_, b)| support.distance < b.distance) {
                best = Some((*normal, support));
            }
        }

        let (normal, support) = best?;
        Some(CollisionInfo::new(
            support.distance,
            normal,
            support.point + normal * support.distance,
        ))
    }
}

/// Geometry of a rigid shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Oriented rectangle
    Rectangle(RectangleGeometry),
    /// Circle of the given radius
    Circle {
        /// Circle radius
        radius: f32,
    },
}

/// Kinematic and dynamic state of a single rigid body
#[derive(Debug, Clone)]
pub struct RigidShape {
    center: Vec2,
    angle: f32,

    /// Linear velocity in units per second
    pub velocity: Vec2,

    acceleration: Vec2,

    /// Angular velocity in radians per second
    pub angular_velocity: f32,

    /// Angular acceleration in radians per second squared
    pub angular_acceleration: f32,

    inverse_mass: f32,
    inverse_inertia: f32,

    /// Friction coefficient; the pair uses the smaller of the two
    pub friction: f32,

    /// Restitution coefficient; the pair uses the smaller of the two
    pub restitution: f32,

    bounding_radius: f32,
    kind: ShapeKind,
}

impl RigidShape {
    /// Create a rectangle body
    pub fn rectangle(center: Vec2, width: f32, height: f32, mass: f32, friction: f32, restitution: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "rectangle needs a positive size");
        let kind = ShapeKind::Rectangle(RectangleGeometry::new(center, width, height, 0.0));
        let bounding_radius = (width * width + height * height).sqrt() * 0.5;
        Self::with_kind(center, kind, bounding_radius, mass, friction, restitution)
    }

    /// Create a circle body
    pub fn circle(center: Vec2, radius: f32, mass: f32, friction: f32, restitution: f32) -> Self {
        debug_assert!(radius > 0.0, "circle needs a positive radius");
        Self::with_kind(center, ShapeKind::Circle { radius }, radius, mass, friction, restitution)
    }

    fn with_kind(
        center: Vec2,
        kind: ShapeKind,
        bounding_radius: f32,
        mass: f32,
        friction: f32,
        restitution: f32,
    ) -> Self {
        let mut shape = Self {
            center,
            angle: 0.0,
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            inverse_mass: 0.0,
            inverse_inertia: 0.0,
            friction,
            restitution,
            bounding_radius,
            kind,
        };
        shape.set_mass(mass);
        shape
    }

    /// Center of mass in world space
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Rotation in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Shape geometry
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Rectangle geometry, if this is a rectangle
    pub fn as_rectangle(&self) -> Option<&RectangleGeometry> {
        match &self.kind {
            ShapeKind::Rectangle(rect) => Some(rect),
            ShapeKind::Circle { .. } => None,
        }
    }

    /// Radius of the circle enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    /// `1 / mass`, zero for static bodies
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Mass, zero for static bodies
    pub fn mass(&self) -> f32 {
        if self.inverse_mass == 0.0 {
            0.0
        } else {
            1.0 / self.inverse_mass
        }
    }

    /// `1 / inertia`, zero for static bodies
    pub fn inverse_inertia(&self) -> f32 {
        self.inverse_inertia
    }

    /// Whether the body has infinite mass
    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Current acceleration
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Set linear acceleration; static bodies stay frozen
    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        if !self.is_static() {
            self.acceleration = acceleration;
        }
    }

    /// Set mass; zero makes the body static and clears its acceleration
    pub fn set_mass(&mut self, mass: f32) {
        if mass == 0.0 {
            self.inverse_mass = 0.0;
            self.acceleration = Vec2::zeros();
        } else {
            self.inverse_mass = 1.0 / mass;
        }
        self.update_inertia();
    }

    /// Recompute inverse inertia from mass and geometry
    ///
    /// Rectangle: `m (w² + h²) / 12`. Circle: the solid disc `m r² / 2`.
    pub fn update_inertia(&mut self) {
        if self.inverse_mass == 0.0 {
            self.inverse_inertia = 0.0;
            return;
        }

        let mass = 1.0 / self.inverse_mass;
        let inertia = match &self.kind {
            ShapeKind::Rectangle(rect) => mass * (rect.width * rect.width + rect.height * rect.height) / 12.0,
            ShapeKind::Circle { radius } => mass * radius * radius * 0.5,
        };
        self.inverse_inertia = if inertia > 0.0 { 1.0 / inertia } else { 0.0 };
    }

    /// Semi-implicit Euler step
    pub fn update(&mut self, delta_time: f32) {
        self.velocity += self.acceleration * delta_time;
        self.angular_velocity += self.angular_acceleration * delta_time;
        self.move_by(self.velocity * delta_time);
        self.rotate(self.angular_velocity * delta_time);
    }

    /// Translate the body
    pub fn move_by(&mut self, delta: Vec2) {
        if delta == Vec2::zeros() {
            return;
        }
        self.center += delta;
        if let ShapeKind::Rectangle(rect) = &mut self.kind {
            rect.translate(delta);
        }
    }

    /// Teleport the body's center to `center`
    pub fn set_center(&mut self, center: Vec2) {
        self.move_by(center - self.center);
    }

    /// Rotate the body about its center
    pub fn rotate(&mut self, angle: f32) {
        if angle == 0.0 {
            return;
        }
        self.angle += angle;
        if let ShapeKind::Rectangle(rect) = &mut self.kind {
            rect.rebuild(self.center, self.angle);
        }
    }

    /// World-space axis-aligned bounds
    pub fn bounds(&self) -> BoundingRect {
        match &self.kind {
            ShapeKind::Rectangle(rect) => {
                let [first, rest @ ..] = rect.vertices;
                let mut bounds = BoundingRect::new(first, first);
                for vertex in rest {
                    bounds.combine_point(vertex);
                }
                bounds
            }
            ShapeKind::Circle { radius } => {
                BoundingRect::from_center_size(self.center, Vec2::new(radius * 2.0, radius * 2.0))
            }
        }
    }

    /// Cheap bounding-circle pre-test used before the exact shape test
    pub fn bounding_radius_overlaps(&self, other: &RigidShape) -> bool {
        let radius_sum = self.bounding_radius + other.bounding_radius;
        (other.center - self.center).magnitude_squared() <= radius_sum * radius_sum
    }
}
