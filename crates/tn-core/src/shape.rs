//! Collision query shapes used for obstruction traces.

use glam::Vec3;

/// The volume swept along a trace line.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryShape {
    /// Zero-volume line trace.
    Point,
    Sphere { radius: f32 },
    /// Upright capsule whose base rests on the traced points.
    Capsule { radius: f32, half_height: f32 },
}

impl QueryShape {
    /// Offset from a floor contact point to the shape's center.  Traces run
    /// between offset points so a standing capsule does not scrape the floor.
    pub fn center_offset(&self) -> Vec3 {
        match *self {
            QueryShape::Point => Vec3::ZERO,
            QueryShape::Sphere { radius } => Vec3::Z * radius,
            QueryShape::Capsule { half_height, .. } => Vec3::Z * half_height,
        }
    }
}

impl Default for QueryShape {
    fn default() -> Self {
        QueryShape::Capsule { radius: 34.0, half_height: 88.0 }
    }
}
