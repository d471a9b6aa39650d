//! Transient ("virtual") tiles on un-authored geometry.
//!
//! Transient tiles are recomputed at the start of each planning request:
//! [`Grid::generate_transient_tiles`] discards the previous batch before
//! placing a new one.  Placement stops silently once `max_transient_tiles`
//! is reached.

use log::debug;

use tn_core::{ActorId, TileId, Vec3};

use crate::{Grid, TileSpec};

/// A placement proposed by a provisioner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileCandidate {
    pub location: Vec3,
    /// World object the candidate rests on.
    pub owner: Option<ActorId>,
    /// Set when the surface is tagged as refusing transient tiles.
    pub disallowed: bool,
}

impl TileCandidate {
    pub fn at(location: Vec3) -> Self {
        Self { location, owner: None, disallowed: false }
    }
}

/// Supplies candidate transient tile placements around an agent.
pub trait TransientTileProvisioner {
    /// Candidates within `radius` of `center`, in preference order.
    fn candidates(&self, center: Vec3, radius: f32) -> Vec<TileCandidate>;
}

impl Grid {
    /// Replace all transient tiles with fresh ones from `provisioner` and
    /// proximity-link them.  Returns the number placed.  Does nothing when
    /// transient tiles are disabled.
    pub fn generate_transient_tiles<P: TransientTileProvisioner + ?Sized>(
        &mut self,
        provisioner: &P,
        center: Vec3,
        radius: f32,
    ) -> usize {
        self.clear_transient_tiles();
        if !self.config().enable_transient_tiles {
            return 0;
        }

        let mut placed = Vec::new();
        for candidate in provisioner.candidates(center, radius) {
            if self.transient_count() >= self.config().max_transient_tiles {
                debug!(
                    "grid: transient tile capacity {} reached, provisioning stopped",
                    self.config().max_transient_tiles
                );
                break;
            }
            if let Some(id) = self.place_transient(candidate) {
                placed.push(id);
            }
        }
        for &id in &placed {
            if let Err(err) = self.link_tile(id) {
                debug!("grid: linking transient {id:?} failed: {err}");
            }
        }
        debug!("grid: placed {} transient tiles around {center}", placed.len());
        placed.len()
    }

    /// Place one transient tile under `location` (e.g. an agent standing off
    /// the authored grid) unless a tile is already there.  Returns the tile
    /// under `location` afterwards.
    pub fn generate_transient_tile(&mut self, location: Vec3) -> Option<TileId> {
        let snapped = self.adjust_to_tile_location(location);
        if let Some(existing) = self.tile_in_cell(self.cell_of(snapped)) {
            return Some(existing);
        }
        if !self.config().enable_transient_tiles
            || self.transient_count() >= self.config().max_transient_tiles
        {
            return None;
        }
        let id = self.place_transient(TileCandidate::at(location))?;
        if let Err(err) = self.link_tile(id) {
            debug!("grid: linking transient {id:?} failed: {err}");
        }
        Some(id)
    }

    /// Remove every transient tile.
    pub fn clear_transient_tiles(&mut self) {
        let ids = self.transient.clone();
        for id in ids {
            if let Err(err) = self.remove_tile(id) {
                debug!("grid: removing transient {id:?} failed: {err}");
            }
        }
    }

    fn place_transient(&mut self, candidate: TileCandidate) -> Option<TileId> {
        if candidate.disallowed {
            return None;
        }
        let location = self.adjust_to_tile_location(candidate.location);
        let cell = self.cell_of(location);
        if self.is_disallowed(cell) || self.tile_in_cell(cell).is_some() {
            return None;
        }
        let mut spec = TileSpec::floor(location);
        spec.owner = candidate.owner;
        Some(self.insert(spec, true))
    }
}
