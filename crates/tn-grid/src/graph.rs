//! Read-only graph view used by planning.
//!
//! A [`TileGraph`] pairs a [`Grid`] with the collision service and query
//! shape of one agent.  It is the only thing the planner, simplifier and
//! curve builder see, and it borrows the grid immutably, so a search cannot
//! interleave with grid edits.

use log::warn;

use tn_core::{QueryShape, TileId, TraversalProfile, Vec3};

use crate::{CollisionService, Grid, Tile, TraceResult};

#[derive(Clone, Copy)]
pub struct TileGraph<'a> {
    grid:      &'a Grid,
    collision: &'a dyn CollisionService,
    shape:     QueryShape,
}

impl<'a> TileGraph<'a> {
    pub fn new(grid: &'a Grid, collision: &'a dyn CollisionService, shape: QueryShape) -> Self {
        Self { grid, collision, shape }
    }

    #[inline]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    #[inline]
    pub fn collision(&self) -> &'a dyn CollisionService {
        self.collision
    }

    #[inline]
    pub fn shape(&self) -> QueryShape {
        self.shape
    }

    #[inline]
    pub fn tile(&self, id: TileId) -> Option<&'a Tile> {
        self.grid.tile(id)
    }

    /// Whether the query shape is blocked between two floor-level points.
    ///
    /// Fails closed: an inconclusive trace counts as obstructed.
    pub fn obstructed(&self, from: Vec3, to: Vec3) -> bool {
        let offset = self.shape.center_offset();
        match self.collision.trace(from + offset, to + offset, &self.shape) {
            TraceResult::Clear => false,
            TraceResult::Hit { .. } => true,
            TraceResult::Inconclusive => {
                warn!("inconclusive trace {from} -> {to}, treating as obstructed");
                true
            }
        }
    }

    /// Whether `tile` is blocked when approached from `from`; the trace ends
    /// at the tile's contact point closest to `from`.
    pub fn tile_obstructed(&self, from: Vec3, tile: &Tile) -> bool {
        self.obstructed(from, tile.access_point(from))
    }

    /// Linked neighbours of `id` that are not obstructed, in link order.
    ///
    /// Each trace starts at whichever contact point of `id` is closer to the
    /// neighbour.  Unknown ids have no neighbours.
    pub fn neighbours(&self, id: TileId) -> Vec<TileId> {
        let Some(tile) = self.grid.tile(id) else {
            return Vec::new();
        };
        tile.neighbours()
            .iter()
            .filter_map(|&n| self.grid.tile(n))
            .filter(|n| !self.tile_obstructed(tile.access_point(n.location), n))
            .map(|n| n.id)
            .collect()
    }

    pub fn traversable(&self, id: TileId, profile: &TraversalProfile) -> bool {
        self.grid.tile(id).is_some_and(|t| t.traversable(profile))
    }

    pub fn can_stop_here(&self, id: TileId, profile: &TraversalProfile) -> bool {
        self.grid.tile(id).is_some_and(|t| t.can_stop_here(profile))
    }

    /// See [`Grid::tile_at`].
    pub fn tile_at(&self, p: Vec3) -> Option<TileId> {
        self.grid.tile_at(p, self.collision)
    }
}
