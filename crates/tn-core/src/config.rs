//! Construction-time configuration.
//!
//! Typically loaded from a JSON/TOML document by the application crate (with
//! the `serde` feature) and passed to `Grid::new` and `MovementExecutor::new`.
//! Every field has a documented default, and [`MovementConfig::sanitized`] /
//! [`GridConfig::sanitized`] clamp inconsistent values instead of failing:
//! these numbers drive real-time motion, which must never see NaN speeds or
//! negative durations.

use log::warn;

use crate::{AxisLocks, ModeSet, NavError, NavResult, QueryShape, TraversalProfile};

/// Highest configuration document version this build understands.
pub const CONFIG_VERSION: u32 = 1;

const MIN_TILE_SIZE:      f32 = 1.0;
const MIN_SPEED:          f32 = 1.0;
const MIN_ROTATION_SPEED: f32 = 1.0;

/// Replace a non-finite or too-small value with `min`, logging the clamp.
fn clamp_min(field: &str, value: f32, min: f32) -> f32 {
    if value.is_finite() && value >= min {
        value
    } else {
        warn!("config: {field} = {value} is invalid, clamped to {min}");
        min
    }
}

// ── GridConfig ────────────────────────────────────────────────────────────────

/// Layout and capacity settings for a `Grid`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Edge length of one tile in world units.  Default: 200.
    pub tile_size: f32,
    /// Whether transient tiles may be generated on un-authored geometry.
    /// Default: false.
    pub enable_transient_tiles: bool,
    /// Upper bound on live transient tiles.  Default: 10 000.
    pub max_transient_tiles: usize,
    /// Proximity auto-linking radius, in tile sizes.  1.5 covers diagonal
    /// neighbours on a square layout.  Default: 1.5.
    pub neighbour_reach: f32,
    /// How far above a point the tile lookup trace starts.  Default: 100.
    pub upward_trace: f32,
    /// How far below a point the tile lookup trace ends.  Default: 100.
    pub downward_trace: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_size:              200.0,
            enable_transient_tiles: false,
            max_transient_tiles:    10_000,
            neighbour_reach:        1.5,
            upward_trace:           100.0,
            downward_trace:         100.0,
        }
    }
}

impl GridConfig {
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.tile_size       = clamp_min("tile_size", self.tile_size, MIN_TILE_SIZE);
        self.neighbour_reach = clamp_min("neighbour_reach", self.neighbour_reach, 1.0);
        self.upward_trace    = clamp_min("upward_trace", self.upward_trace, 0.0);
        self.downward_trace  = clamp_min("downward_trace", self.downward_trace, 0.0);
        self
    }

    /// Auto-link radius in world units.
    #[inline]
    pub fn reach(&self) -> f32 {
        self.tile_size * self.neighbour_reach
    }
}

// ── MovementConfig ────────────────────────────────────────────────────────────

/// Per-agent movement settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Reachability budget, in tile entry cost.  Default: 4.
    pub movement_range: f32,
    /// Walking speed, units per second.  Default: 450.
    pub max_walk_speed: f32,
    /// Climbing speed, units per second.  Default: 200.
    pub max_climb_speed: f32,
    /// Turn rate cap, degrees per second.  Default: 720.
    pub max_rotation_speed: f32,
    /// Modes this agent can use.  Default: walking, climbing, in-place turn.
    pub available_modes: ModeSet,
    /// Steepest walkable floor, degrees.  Default: 45.
    pub max_walk_angle: f32,
    /// Hold roll at its current value.  Default: true.
    pub lock_roll: bool,
    /// Hold pitch at its current value.  Default: true.
    pub lock_pitch: bool,
    /// Hold yaw at its current value.  Default: false.
    pub lock_yaw: bool,
    /// Let an attached displacement source drive speed and rotation while
    /// following a path.  Default: true.
    pub use_root_motion: bool,
    /// Apply displacement even while not following a path.  Default: false.
    pub always_use_root_motion: bool,
    /// Straighten paths by skipping intermediate tiles.  Default: true.
    pub string_pull: bool,
    /// Facing error (degrees) tolerated before turning in place.  Default: 2.
    pub facing_tolerance: f32,
    /// Shape swept by obstruction traces.  Default: capsule r=34, hh=88.
    pub collision_shape: QueryShape,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            movement_range:         4.0,
            max_walk_speed:         450.0,
            max_climb_speed:        200.0,
            max_rotation_speed:     720.0,
            available_modes:        ModeSet::standard(),
            max_walk_angle:         45.0,
            lock_roll:              true,
            lock_pitch:             true,
            lock_yaw:               false,
            use_root_motion:        true,
            always_use_root_motion: false,
            string_pull:            true,
            facing_tolerance:       2.0,
            collision_shape:        QueryShape::default(),
        }
    }
}

impl MovementConfig {
    /// Clamp every numeric field to a safe minimum.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.movement_range     = clamp_min("movement_range", self.movement_range, 0.0);
        self.max_walk_speed     = clamp_min("max_walk_speed", self.max_walk_speed, MIN_SPEED);
        self.max_climb_speed    = clamp_min("max_climb_speed", self.max_climb_speed, MIN_SPEED);
        self.max_rotation_speed =
            clamp_min("max_rotation_speed", self.max_rotation_speed, MIN_ROTATION_SPEED);
        self.max_walk_angle     = clamp_min("max_walk_angle", self.max_walk_angle, 0.0).min(90.0);
        self.facing_tolerance   = clamp_min("facing_tolerance", self.facing_tolerance, 0.01);
        self.collision_shape = match self.collision_shape {
            QueryShape::Point => QueryShape::Point,
            QueryShape::Sphere { radius } => QueryShape::Sphere {
                radius: clamp_min("collision_shape.radius", radius, 0.0),
            },
            QueryShape::Capsule { radius, half_height } => QueryShape::Capsule {
                radius:      clamp_min("collision_shape.radius", radius, 0.0),
                half_height: clamp_min("collision_shape.half_height", half_height, 0.0),
            },
        };
        self
    }

    #[inline]
    pub fn locks(&self) -> AxisLocks {
        AxisLocks { roll: self.lock_roll, pitch: self.lock_pitch, yaw: self.lock_yaw }
    }

    #[inline]
    pub fn profile(&self) -> TraversalProfile {
        TraversalProfile::new(self.available_modes, self.max_walk_angle)
    }
}

// ── NavConfig ─────────────────────────────────────────────────────────────────

/// Top-level, versioned configuration document.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    pub version:  u32,
    pub grid:     GridConfig,
    pub movement: MovementConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            version:  CONFIG_VERSION,
            grid:     GridConfig::default(),
            movement: MovementConfig::default(),
        }
    }
}

impl NavConfig {
    /// Reject documents written by a newer build, then sanitize both halves.
    pub fn validated(self) -> NavResult<Self> {
        if self.version > CONFIG_VERSION {
            return Err(NavError::UnsupportedVersion {
                found:     self.version,
                supported: CONFIG_VERSION,
            });
        }
        Ok(Self {
            version:  self.version,
            grid:     self.grid.sanitized(),
            movement: self.movement.sanitized(),
        })
    }
}
