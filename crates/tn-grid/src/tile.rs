//! Tile nodes and the per-kind rules for traversal.
//!
//! # Kinds
//!
//! | Kind     | Contact points      | Traversable when          | Legal stop |
//! |----------|---------------------|---------------------------|------------|
//! | `Floor`  | its location        | Walking, slope ≤ max angle | if traversable |
//! | `Ladder` | bottom and top      | either climbing mode       | never      |
//!
//! Neighbour relations are directed and need not be symmetric.

use std::fmt;

use tn_core::{ActorId, ModeSet, MovementMode, Rotator, TileId, TraversalProfile, Vec3};

// ── CellCoord ─────────────────────────────────────────────────────────────────

/// Spatial cell identity of a floor tile on the grid layout.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellCoord {
    /// Cell containing `p` for the given tile size.  X/Y cells are centred
    /// on tile multiples; Z layers start at multiples.
    pub fn containing(p: Vec3, tile_size: f32) -> Self {
        Self {
            x: (p.x / tile_size).round() as i32,
            y: (p.y / tile_size).round() as i32,
            z: (p.z / tile_size).floor() as i32,
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ── TileKind ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    Floor {
        /// Surface normal; its angle to world up is the tile's slope.
        normal: Vec3,
    },
    Ladder {
        bottom: Vec3,
        top:    Vec3,
        /// Facing a climber must hold while on the ladder.
        facing: Rotator,
    },
}

// ── TileSpec ──────────────────────────────────────────────────────────────────

/// Description of a tile to insert into a `Grid`.
#[derive(Clone, Debug, PartialEq)]
pub struct TileSpec {
    pub location: Vec3,
    pub kind:     TileKind,
    pub cost:     f32,
    pub owner:    Option<ActorId>,
}

impl TileSpec {
    /// Flat floor tile with unit entry cost.
    pub fn floor(location: Vec3) -> Self {
        Self {
            location,
            kind:  TileKind::Floor { normal: Vec3::Z },
            cost:  1.0,
            owner: None,
        }
    }

    /// Ladder between two path points.  The agent stands at the midpoint.
    pub fn ladder(bottom: Vec3, top: Vec3, facing: Rotator) -> Self {
        Self {
            location: (bottom + top) * 0.5,
            kind:     TileKind::Ladder { bottom, top, facing },
            cost:     1.0,
            owner:    None,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    /// Set the surface normal.  Ignored for ladders.
    #[must_use]
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        if let TileKind::Floor { .. } = self.kind {
            let normal = normal.normalize_or_zero();
            let normal = if normal == Vec3::ZERO { Vec3::Z } else { normal };
            self.kind = TileKind::Floor { normal };
        }
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }
}

// ── Tile ──────────────────────────────────────────────────────────────────────

/// A node of the movement graph, owned by its `Grid`.
#[derive(Clone, Debug)]
pub struct Tile {
    pub id:        TileId,
    /// Where an agent stands when occupying the tile.
    pub location:  Vec3,
    pub kind:      TileKind,
    /// Cost charged for entering this tile.
    pub cost:      f32,
    pub owner:     Option<ActorId>,
    pub transient: bool,
    pub(crate) cell:       CellCoord,
    pub(crate) neighbours: Vec<TileId>,
}

impl Tile {
    /// Linked neighbours in link order.  Obstruction is not considered; use
    /// `TileGraph::neighbours` for that.
    #[inline]
    pub fn neighbours(&self) -> &[TileId] {
        &self.neighbours
    }

    #[inline]
    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    #[inline]
    pub fn is_ladder(&self) -> bool {
        matches!(self.kind, TileKind::Ladder { .. })
    }

    /// Points through which the tile is entered and left.
    pub fn contact_points(&self) -> impl Iterator<Item = Vec3> {
        let (a, b) = match self.kind {
            TileKind::Floor { .. } => (self.location, None),
            TileKind::Ladder { bottom, top, .. } => (bottom, Some(top)),
        };
        std::iter::once(a).chain(b)
    }

    /// The contact point closest to `toward`.  Ladders prefer the bottom on a
    /// tie.
    pub fn access_point(&self, toward: Vec3) -> Vec3 {
        match self.kind {
            TileKind::Floor { .. } => self.location,
            TileKind::Ladder { bottom, top, .. } => {
                if top.distance(toward) < bottom.distance(toward) { top } else { bottom }
            }
        }
    }

    /// Curve points this tile contributes when entered from `from`: the
    /// location for a floor, entry then exit point for a ladder.  Ties enter
    /// at the bottom, as [`Tile::access_point`] does.
    pub fn path_points(&self, from: Vec3) -> (Vec3, Option<Vec3>) {
        match self.kind {
            TileKind::Floor { .. } => (self.location, None),
            TileKind::Ladder { bottom, top, .. } => {
                if top.distance(from) < bottom.distance(from) {
                    (top, Some(bottom))
                } else {
                    (bottom, Some(top))
                }
            }
        }
    }

    /// Slope in degrees between the surface normal and world up.  Ladders
    /// report 90.
    pub fn slope_angle(&self) -> f32 {
        match self.kind {
            TileKind::Floor { normal } => normal.angle_between(Vec3::Z).to_degrees(),
            TileKind::Ladder { .. } => 90.0,
        }
    }

    /// Modes that can be used on this tile, before intersecting with an
    /// agent's capabilities.
    pub fn legal_modes(&self) -> ModeSet {
        match self.kind {
            TileKind::Floor { .. } => ModeSet::single(MovementMode::Walking),
            TileKind::Ladder { .. } => {
                ModeSet::of(&[MovementMode::ClimbingUp, MovementMode::ClimbingDown])
            }
        }
    }

    /// Whether at least one of the agent's modes can use this tile.
    pub fn traversable(&self, profile: &TraversalProfile) -> bool {
        match self.kind {
            TileKind::Floor { .. } => {
                profile.modes.contains(MovementMode::Walking)
                    && self.slope_angle() <= profile.max_walk_angle
            }
            TileKind::Ladder { .. } => profile.modes.can_climb(),
        }
    }

    /// Whether an agent may end its move here.
    pub fn can_stop_here(&self, profile: &TraversalProfile) -> bool {
        match self.kind {
            TileKind::Floor { .. } => self.traversable(profile),
            TileKind::Ladder { .. } => false,
        }
    }

    /// Facing an agent must hold while on the tile, if any.
    pub fn rotation_hint(&self) -> Option<Rotator> {
        match self.kind {
            TileKind::Floor { .. } => None,
            TileKind::Ladder { facing, .. } => Some(facing),
        }
    }

    /// Whether a straight line may pass over this tile when straightening a
    /// path.  Ladders must be climbed point to point.
    #[inline]
    pub fn allows_shortcut(&self) -> bool {
        matches!(self.kind, TileKind::Floor { .. })
    }
}
