//! Hand-authored demo level.
//!
//! ```text
//!            ledge (z = 300)
//!   y=2  . . . .       [L]=[P]=[P] ~ ~ ~   (~ transient)
//!   y=1  . | . .
//!   y=0  . | . . [ladder]
//!        x=0 1 2 3   4     5   6  7 8 9
//! ```
//!
//! A wall between columns 1 and 2 closes rows 0 and 1, so the route from
//! the start at (0, 0) detours through row 2 before reaching the ladder.

use anyhow::Result;

use tn_core::{GridConfig, Rotator, TileId, Vec3};
use tn_grid::{Grid, TileCandidate, TileSpec, TransientTileProvisioner, WallSet};

pub struct Level {
    pub grid:         Grid,
    pub walls:        WallSet,
    pub start:        TileId,
    pub goal:         TileId,
    pub ledge_height: f32,
    /// Where transient tiles are grown from.
    pub ledge_anchor: Vec3,
}

pub fn build_level(config: GridConfig) -> Result<Level> {
    let s = config.tile_size;
    let height = 300.0;
    let mut grid = Grid::new(config);

    let mut start = TileId::INVALID;
    for y in 0..3 {
        for x in 0..4 {
            let id = grid.add_tile(TileSpec::floor(Vec3::new(x as f32 * s, y as f32 * s, 0.0)))?;
            if (x, y) == (0, 0) {
                start = id;
            }
        }
    }

    grid.add_tile(TileSpec::ladder(
        Vec3::new(4.0 * s, 0.0, 0.0),
        Vec3::new(4.0 * s, 0.0, height),
        Rotator::from_yaw(0.0),
    ))?;
    grid.add_tile(TileSpec::floor(Vec3::new(5.0 * s, 0.0, height)))?;
    let goal = grid.add_tile(TileSpec::floor(Vec3::new(6.0 * s, 0.0, height)).with_cost(2.0))?;
    grid.link_all();

    let walls = WallSet::new().with_wall(
        Vec3::new(1.5 * s, -0.5 * s, 0.0),
        Vec3::new(1.5 * s, 1.5 * s, 0.0),
    );

    Ok(Level {
        grid,
        walls,
        start,
        goal,
        ledge_height: height,
        ledge_anchor: Vec3::new(6.0 * s, 0.0, height),
    })
}

/// Offers tiles along the ledge beyond the authored platform.  The last
/// one sits on a surface that refuses transient tiles.
pub struct Ledge {
    pub tile_size: f32,
    pub height:    f32,
}

impl TransientTileProvisioner for Ledge {
    fn candidates(&self, center: Vec3, radius: f32) -> Vec<TileCandidate> {
        (7..=9)
            .map(|x| Vec3::new(x as f32 * self.tile_size, 0.0, self.height))
            .filter(|p| p.distance(center) <= radius)
            .map(|p| TileCandidate {
                disallowed: p.x >= 9.0 * self.tile_size,
                ..TileCandidate::at(p)
            })
            .collect()
    }
}
