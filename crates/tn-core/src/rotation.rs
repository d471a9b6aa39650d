//! Euler rotations in degrees.
//!
//! The world is Z-up.  `yaw` turns about Z (0° faces +X, 90° faces +Y),
//! `pitch` tilts about Y (positive looks up) and `roll` banks about X.
//! Angles are kept in `(-180, 180]` after [`Rotator::normalized`].

use std::ops::Add;

use glam::Vec3;

/// Wrap an angle in degrees to `(-180, 180]`.
#[inline]
pub fn normalize_axis(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// A pitch/yaw/roll rotation in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotator {
    pub pitch: f32,
    pub yaw:   f32,
    pub roll:  f32,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator { pitch: 0.0, yaw: 0.0, roll: 0.0 };

    #[inline]
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Pure heading rotation.
    #[inline]
    pub fn from_yaw(yaw: f32) -> Self {
        Self { pitch: 0.0, yaw, roll: 0.0 }
    }

    /// Rotation that faces along `dir`.  Returns `None` for a (near) zero
    /// vector, which has no defined heading.
    pub fn from_direction(dir: Vec3) -> Option<Self> {
        if dir.length_squared() <= f32::EPSILON {
            return None;
        }
        let horizontal = (dir.x * dir.x + dir.y * dir.y).sqrt();
        Some(Self {
            pitch: dir.z.atan2(horizontal).to_degrees(),
            yaw:   dir.y.atan2(dir.x).to_degrees(),
            roll:  0.0,
        })
    }

    /// Unit forward vector for this rotation (roll does not affect it).
    pub fn forward(self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec3::new(cp * cy, cp * sy, sp)
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            pitch: normalize_axis(self.pitch),
            yaw:   normalize_axis(self.yaw),
            roll:  normalize_axis(self.roll),
        }
    }

    /// Shortest per-axis difference from `self` to `target`.
    pub fn delta_to(self, target: Rotator) -> Rotator {
        Rotator {
            pitch: normalize_axis(target.pitch - self.pitch),
            yaw:   normalize_axis(target.yaw - self.yaw),
            roll:  normalize_axis(target.roll - self.roll),
        }
    }

    /// Largest absolute per-axis angle.
    pub fn max_abs_axis(self) -> f32 {
        self.pitch.abs().max(self.yaw.abs()).max(self.roll.abs())
    }

    /// Angular divergence between two rotations (largest axis difference).
    #[inline]
    pub fn divergence(self, other: Rotator) -> f32 {
        self.delta_to(other).max_abs_axis()
    }

    /// Move towards `target`, turning no axis by more than `max_step` degrees.
    pub fn step_towards(self, target: Rotator, max_step: f32) -> Rotator {
        let max_step = max_step.max(0.0);
        let d = self.delta_to(target);
        Rotator {
            pitch: self.pitch + d.pitch.clamp(-max_step, max_step),
            yaw:   self.yaw + d.yaw.clamp(-max_step, max_step),
            roll:  self.roll + d.roll.clamp(-max_step, max_step),
        }
        .normalized()
    }

    /// Replace every locked axis of `self` with the value from `current`.
    pub fn with_locks(self, current: Rotator, locks: AxisLocks) -> Rotator {
        Rotator {
            pitch: if locks.pitch { current.pitch } else { self.pitch },
            yaw:   if locks.yaw   { current.yaw }   else { self.yaw },
            roll:  if locks.roll  { current.roll }  else { self.roll },
        }
    }

    pub fn is_zero(self, tolerance: f32) -> bool {
        self.max_abs_axis() <= tolerance
    }
}

impl Add for Rotator {
    type Output = Rotator;
    fn add(self, rhs: Rotator) -> Rotator {
        Rotator {
            pitch: self.pitch + rhs.pitch,
            yaw:   self.yaw + rhs.yaw,
            roll:  self.roll + rhs.roll,
        }
        .normalized()
    }
}

/// Which rotation axes an agent holds fixed while moving.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisLocks {
    pub roll:  bool,
    pub pitch: bool,
    pub yaw:   bool,
}
