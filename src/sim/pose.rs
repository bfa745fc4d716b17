//! Rigid poses and bounding-volume helpers
//!
//! Everything the renderer needs to place a body is a `Pose`. Simulation
//! code uses it for local/world conversion between scene nodes.

use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Translation + orientation of a body in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Child pose expressed in this pose's frame, composed into world space
    pub fn compose(&self, child: &Pose) -> Pose {
        Pose {
            translation: self.to_world(child.translation),
            rotation: self.rotation * child.rotation,
        }
    }

    /// World point into this pose's local frame
    #[inline]
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.translation)
    }

    /// Local point into world space
    #[inline]
    pub fn to_world(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    /// Local direction into world space
    #[inline]
    pub fn direction_to_world(&self, dir: Vec3) -> Vec3 {
        self.rotation * dir
    }

    /// Point in `from`'s local frame expressed in `to`'s local frame
    pub fn local_to_local(from: &Pose, to: &Pose, point: Vec3) -> Vec3 {
        to.to_local(from.to_world(point))
    }
}

/// Quaternion to XYZ Euler angles (record wire format)
pub fn quat_to_euler(rotation: Quat) -> [f32; 3] {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    [x, y, z]
}

/// XYZ Euler angles to quaternion
pub fn euler_to_quat(angles: [f32; 3]) -> Quat {
    Quat::from_euler(EulerRot::XYZ, angles[0], angles[1], angles[2])
}

/// Axis-aligned box in a body's local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Sphere overlap test (closest point on the box)
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }
}

/// Does a circle overlap an axis-aligned rectangle?
///
/// The plane around the rectangle splits into nine regions: the four
/// corners test distance to the corner, the four edge strips test distance
/// to the edge, and the rectangle itself always overlaps.
pub fn rect_intersects_circle(min: Vec2, max: Vec2, center: Vec2, radius: f32) -> bool {
    if center.x < min.x {
        if center.y < min.y {
            center.distance(Vec2::new(min.x, min.y)) < radius
        } else if center.y > max.y {
            center.distance(Vec2::new(min.x, max.y)) < radius
        } else {
            min.x - center.x < radius
        }
    } else if center.x > max.x {
        if center.y < min.y {
            center.distance(Vec2::new(max.x, min.y)) < radius
        } else if center.y > max.y {
            center.distance(Vec2::new(max.x, max.y)) < radius
        } else {
            center.x - max.x < radius
        }
    } else if center.y < min.y {
        min.y - center.y < radius
    } else if center.y > max.y {
        center.y - max.y < radius
    } else {
        true
    }
}
