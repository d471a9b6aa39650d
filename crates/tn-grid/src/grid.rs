//! The owning tile collection.
//!
//! # Storage
//!
//! Tiles live in a slot `Vec<Option<Tile>>` indexed by `TileId`.  Removed
//! slots become `None` and are recycled through `free_slots`, so ids held by
//! other tiles or agents stay valid until their own tile is removed.
//!
//! # Cells
//!
//! Floor tiles are keyed by [`CellCoord`]: at most one floor tile (persistent
//! or transient) per cell.  Ladders sit between cells and are not keyed.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds every tile contact point.  It backs
//! proximity auto-linking, nearest-tile lookups and the trace fallback of
//! [`Grid::tile_at`].

use log::debug;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::{FxHashMap, FxHashSet};

use tn_core::{GridConfig, QueryShape, TileId, Vec3};

use crate::{
    CellCoord, CollisionService, GridError, GridResult, Tile, TileKind, TileSpec, TraceResult,
};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: one contact point of one tile.
#[derive(Clone, Debug, PartialEq)]
struct ContactEntry {
    point: [f32; 3],
    id:    TileId,
}

impl RTreeObject for ContactEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for ContactEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

#[inline]
fn arr(p: Vec3) -> [f32; 3] {
    [p.x, p.y, p.z]
}

// ── Grid ──────────────────────────────────────────────────────────────────────

pub struct Grid {
    config: GridConfig,
    slots: Vec<Option<Tile>>,
    free_slots: Vec<TileId>,
    /// Floor tile per cell.
    cells: FxHashMap<CellCoord, TileId>,
    /// Cells where transient tiles may not be placed.
    disallowed: FxHashSet<CellCoord>,
    pub(crate) transient: Vec<TileId>,
    index: RTree<ContactEntry>,
    live: usize,
}

impl Grid {
    /// An empty grid.  `config` is sanitized first.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config:     config.sanitized(),
            slots:      Vec::new(),
            free_slots: Vec::new(),
            cells:      FxHashMap::default(),
            disallowed: FxHashSet::default(),
            transient:  Vec::new(),
            index:      RTree::new(),
            live:       0,
        }
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.config.tile_size
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Number of live tiles, persistent and transient.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn persistent_count(&self) -> usize {
        self.live - self.transient.len()
    }

    pub fn transient_count(&self) -> usize {
        self.transient.len()
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn contains(&self, id: TileId) -> bool {
        self.tile(id).is_some()
    }

    /// Live tiles in slot order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    fn tile_mut(&mut self, id: TileId) -> GridResult<&mut Tile> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(GridError::TileNotFound(id))
    }

    /// Change a tile's entry cost.
    pub fn set_cost(&mut self, id: TileId, cost: f32) -> GridResult<()> {
        self.tile_mut(id)?.cost = cost;
        Ok(())
    }

    // ── Cells ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn cell_of(&self, p: Vec3) -> CellCoord {
        CellCoord::containing(p, self.config.tile_size)
    }

    /// Floor tile occupying `cell`, if any.
    pub fn tile_in_cell(&self, cell: CellCoord) -> Option<TileId> {
        self.cells.get(&cell).copied()
    }

    /// Forbid transient tiles in `cell`.
    pub fn mark_disallowed(&mut self, cell: CellCoord) {
        self.disallowed.insert(cell);
    }

    pub fn is_disallowed(&self, cell: CellCoord) -> bool {
        self.disallowed.contains(&cell)
    }

    /// Snap `p` onto the grid layout: X and Y move to the nearest tile
    /// multiple, Z is kept.
    pub fn adjust_to_tile_location(&self, p: Vec3) -> Vec3 {
        let s = self.config.tile_size;
        Vec3::new((p.x / s).round() * s, (p.y / s).round() * s, p.z)
    }

    // ── Editing ───────────────────────────────────────────────────────────

    /// Insert a persistent tile.  A transient tile in the same cell is
    /// evicted; a persistent one makes this fail.
    pub fn add_tile(&mut self, spec: TileSpec) -> GridResult<TileId> {
        if let TileKind::Floor { .. } = spec.kind {
            let cell = self.cell_of(spec.location);
            if let Some(occupant) = self.tile_in_cell(cell) {
                let occupant_is_transient = self.tile(occupant).is_some_and(|t| t.transient);
                if !occupant_is_transient {
                    return Err(GridError::CellOccupied { cell, occupant });
                }
                debug!("grid: evicting transient {occupant} from {cell}");
                self.remove_tile(occupant)?;
            }
        }
        Ok(self.insert(spec, false))
    }

    /// Insert without cell checks.  Callers guarantee the cell is free.
    pub(crate) fn insert(&mut self, spec: TileSpec, transient: bool) -> TileId {
        let id = match self.free_slots.pop() {
            Some(id) => id,
            None => {
                self.slots.push(None);
                TileId((self.slots.len() - 1) as u32)
            }
        };
        let cell = self.cell_of(spec.location);
        let tile = Tile {
            id,
            location: spec.location,
            kind: spec.kind,
            cost: spec.cost,
            owner: spec.owner,
            transient,
            cell,
            neighbours: Vec::new(),
        };
        for p in tile.contact_points() {
            self.index.insert(ContactEntry { point: arr(p), id });
        }
        if !tile.is_ladder() {
            self.cells.insert(cell, id);
        }
        if transient {
            self.transient.push(id);
        }
        self.slots[id.index()] = Some(tile);
        self.live += 1;
        id
    }

    /// Remove a tile and unlink it from every neighbour list.
    pub fn remove_tile(&mut self, id: TileId) -> GridResult<Tile> {
        let tile = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(GridError::TileNotFound(id))?;

        for p in tile.contact_points() {
            self.index.remove(&ContactEntry { point: arr(p), id });
        }
        if self.cells.get(&tile.cell) == Some(&id) {
            self.cells.remove(&tile.cell);
        }
        if tile.transient {
            self.transient.retain(|&t| t != id);
        }
        // Links are directed, so any live tile may point here.
        for other in self.slots.iter_mut().flatten() {
            other.neighbours.retain(|&n| n != id);
        }
        self.free_slots.push(id);
        self.live -= 1;
        Ok(tile)
    }

    /// Remove every tile.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_slots.clear();
        self.cells.clear();
        self.transient.clear();
        self.index = RTree::new();
        self.live = 0;
    }

    // ── Linking ───────────────────────────────────────────────────────────

    /// Add a **directed** link `from → to`.  Linking twice is a no-op.
    pub fn connect(&mut self, from: TileId, to: TileId) -> GridResult<()> {
        if !self.contains(to) {
            return Err(GridError::TileNotFound(to));
        }
        let tile = self.tile_mut(from)?;
        if from != to && !tile.neighbours.contains(&to) {
            tile.neighbours.push(to);
        }
        Ok(())
    }

    /// Link in both directions.
    pub fn connect_both(&mut self, a: TileId, b: TileId) -> GridResult<()> {
        self.connect(a, b)?;
        self.connect(b, a)
    }

    /// Remove the directed link `from → to`, if present.
    pub fn disconnect(&mut self, from: TileId, to: TileId) -> GridResult<()> {
        self.tile_mut(from)?.neighbours.retain(|&n| n != to);
        Ok(())
    }

    /// Link `id` both ways with every tile that has a contact point within
    /// `neighbour_reach` tile sizes of one of its own.  Returns how many
    /// tiles were found in reach.
    pub fn link_tile(&mut self, id: TileId) -> GridResult<usize> {
        let points: Vec<Vec3> = self
            .tile(id)
            .ok_or(GridError::TileNotFound(id))?
            .contact_points()
            .collect();
        let reach2 = self.config.reach() * self.config.reach();

        let mut found: Vec<TileId> = Vec::new();
        for p in points {
            for entry in self.index.locate_within_distance(arr(p), reach2) {
                if entry.id != id && !found.contains(&entry.id) {
                    found.push(entry.id);
                }
            }
        }
        found.sort_unstable();
        for &other in &found {
            self.connect_both(id, other)?;
        }
        Ok(found.len())
    }

    /// Proximity-link every live tile (see [`Grid::link_tile`]).
    pub fn link_all(&mut self) {
        let ids: Vec<TileId> = self.tiles().map(|t| t.id).collect();
        for id in ids {
            // Ids were just collected from live slots.
            if let Err(err) = self.link_tile(id) {
                debug!("grid: linking {id:?} failed: {err}");
            }
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Tile whose nearest contact point is closest to `p`, if within
    /// `max_distance`.
    pub fn nearest_tile(&self, p: Vec3, max_distance: f32) -> Option<TileId> {
        self.index
            .nearest_neighbor(&arr(p))
            .filter(|e| e.distance_2(&arr(p)) <= max_distance * max_distance)
            .map(|e| e.id)
    }

    /// Every tile with a contact point within `radius` of `p`, sorted by id.
    pub fn tiles_within(&self, p: Vec3, radius: f32) -> Vec<TileId> {
        let mut ids: Vec<TileId> = self
            .index
            .locate_within_distance(arr(p), radius * radius)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Tile under the world location `p`.
    ///
    /// Traces vertically through `p` (from `upward_trace` above to
    /// `downward_trace` below); if the collision service reports a hit tile
    /// that tile wins, otherwise the nearest tile within half a tile size is
    /// used.  Returns `None` when neither finds one.
    pub fn tile_at(&self, p: Vec3, collision: &dyn CollisionService) -> Option<TileId> {
        let start = p + Vec3::Z * self.config.upward_trace;
        let end = p - Vec3::Z * self.config.downward_trace;
        if let TraceResult::Hit { tile: Some(id) } = collision.trace(start, end, &QueryShape::Point) {
            if self.contains(id) {
                return Some(id);
            }
        }
        self.nearest_tile(p, self.config.tile_size * 0.5)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}
