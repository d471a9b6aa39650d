//! Unit tests for tn-grid.
//!
//! All tests use hand-built grids; no geometry backend is needed.

#[cfg(test)]
mod helpers {
    use tn_core::{GridConfig, TileId, Vec3};

    use crate::{Grid, TileSpec};

    pub const SIZE: f32 = 100.0;

    pub fn config() -> GridConfig {
        GridConfig { tile_size: SIZE, ..GridConfig::default() }
    }

    /// 3×3 floor grid centred on the origin, proximity-linked (diagonals
    /// included).  `ids[row][col]`, row 0 is south (y = -100), col 0 is west.
    pub fn grid_3x3() -> (Grid, [[TileId; 3]; 3]) {
        let mut grid = Grid::new(config());
        let mut ids = [[TileId::INVALID; 3]; 3];
        for (row, y) in (-1..=1).enumerate() {
            for (col, x) in (-1..=1).enumerate() {
                let p = Vec3::new(x as f32 * SIZE, y as f32 * SIZE, 0.0);
                ids[row][col] = grid.add_tile(TileSpec::floor(p)).unwrap();
            }
        }
        grid.link_all();
        (grid, ids)
    }
}

// ── Storage & editing ─────────────────────────────────────────────────────────

#[cfg(test)]
mod storage {
    use tn_core::Vec3;

    use crate::{Grid, GridError, TileSpec};

    use super::helpers::config;

    #[test]
    fn empty_grid() {
        let grid = Grid::new(config());
        assert!(grid.is_empty());
        assert_eq!(grid.len(), 0);
        assert!(grid.tile(tn_core::TileId(0)).is_none());
    }

    #[test]
    fn one_floor_tile_per_cell() {
        let mut grid = Grid::new(config());
        let a = grid.add_tile(TileSpec::floor(Vec3::ZERO)).unwrap();
        // 20 units away rounds into the same cell.
        let err = grid.add_tile(TileSpec::floor(Vec3::new(20.0, 0.0, 0.0))).unwrap_err();
        assert!(matches!(err, GridError::CellOccupied { occupant, .. } if occupant == a));
        // A ladder is not keyed by cell.
        assert!(grid.add_tile(TileSpec::ladder(Vec3::ZERO, Vec3::Z * 300.0, Default::default())).is_ok());
    }

    #[test]
    fn removed_slot_is_reused_and_unlinked() {
        let mut grid = Grid::new(config());
        let a = grid.add_tile(TileSpec::floor(Vec3::ZERO)).unwrap();
        let b = grid.add_tile(TileSpec::floor(Vec3::new(100.0, 0.0, 0.0))).unwrap();
        grid.connect_both(a, b).unwrap();

        let removed = grid.remove_tile(b).unwrap();
        assert_eq!(removed.id, b);
        assert!(grid.tile(a).unwrap().neighbours().is_empty());
        assert!(grid.tile_in_cell(removed.cell()).is_none());

        let c = grid.add_tile(TileSpec::floor(Vec3::new(0.0, 100.0, 0.0))).unwrap();
        assert_eq!(c, b, "freed slot should be recycled");
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn unknown_ids_error() {
        let mut grid = Grid::new(config());
        let a = grid.add_tile(TileSpec::floor(Vec3::ZERO)).unwrap();
        let ghost = tn_core::TileId(99);
        assert!(matches!(grid.connect(a, ghost), Err(GridError::TileNotFound(_))));
        assert!(matches!(grid.remove_tile(ghost), Err(GridError::TileNotFound(_))));
        assert!(matches!(grid.set_cost(ghost, 2.0), Err(GridError::TileNotFound(_))));
    }

    #[test]
    fn directed_links_are_not_symmetric() {
        let mut grid = Grid::new(config());
        let a = grid.add_tile(TileSpec::floor(Vec3::ZERO)).unwrap();
        let b = grid.add_tile(TileSpec::floor(Vec3::new(100.0, 0.0, 0.0))).unwrap();
        grid.connect(a, b).unwrap();
        grid.connect(a, b).unwrap();
        assert_eq!(grid.tile(a).unwrap().neighbours(), &[b]);
        assert!(grid.tile(b).unwrap().neighbours().is_empty());
        grid.disconnect(a, b).unwrap();
        assert!(grid.tile(a).unwrap().neighbours().is_empty());
    }

    #[test]
    fn adjust_snaps_xy_only() {
        let grid = Grid::new(config());
        let p = grid.adjust_to_tile_location(Vec3::new(140.0, -160.0, 37.0));
        assert_eq!(p, Vec3::new(100.0, -200.0, 37.0));
    }
}

// ── Linking ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod linking {
    use super::helpers::grid_3x3;

    #[test]
    fn center_links_all_eight() {
        let (grid, ids) = grid_3x3();
        assert_eq!(grid.tile(ids[1][1]).unwrap().neighbours().len(), 8);
    }

    #[test]
    fn corner_links_three() {
        let (grid, ids) = grid_3x3();
        assert_eq!(grid.tile(ids[0][0]).unwrap().neighbours().len(), 3);
        assert_eq!(grid.tile(ids[0][1]).unwrap().neighbours().len(), 5);
    }
}

// ── TileGraph queries ─────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use tn_core::{QueryShape, Vec3};

    use crate::{CollisionService, OpenSpace, TileGraph, TraceResult, WallSet};

    use super::helpers::grid_3x3;

    /// Collision backend that can never make up its mind.
    struct Fog;

    impl CollisionService for Fog {
        fn trace(&self, _: Vec3, _: Vec3, _: &QueryShape) -> TraceResult {
            TraceResult::Inconclusive
        }
    }

    #[test]
    fn open_space_neighbours_follow_link_order() {
        let (grid, ids) = grid_3x3();
        let graph = TileGraph::new(&grid, &OpenSpace, QueryShape::Point);
        let n = graph.neighbours(ids[1][1]);
        assert_eq!(n.as_slice(), grid.tile(ids[1][1]).unwrap().neighbours());
    }

    #[test]
    fn wall_hides_north_neighbour() {
        let (grid, ids) = grid_3x3();
        // Short wall between the centre and the tile directly north.
        let walls = WallSet::new().with_wall(Vec3::new(-30.0, 50.0, 0.0), Vec3::new(30.0, 50.0, 0.0));
        let graph = TileGraph::new(&grid, &walls, QueryShape::Point);

        let n = graph.neighbours(ids[1][1]);
        assert_eq!(n.len(), 7);
        assert!(!n.contains(&ids[2][1]));
        // Diagonals pass beside the wall.
        assert!(n.contains(&ids[2][0]) && n.contains(&ids[2][2]));
    }

    #[test]
    fn inconclusive_trace_fails_closed() {
        let (grid, ids) = grid_3x3();
        let graph = TileGraph::new(&grid, &Fog, QueryShape::Point);
        assert!(graph.obstructed(Vec3::ZERO, Vec3::X));
        assert!(graph.neighbours(ids[1][1]).is_empty());
    }

    #[test]
    fn unknown_tile_has_no_neighbours() {
        let (grid, _) = grid_3x3();
        let graph = TileGraph::new(&grid, &OpenSpace, QueryShape::Point);
        assert!(graph.neighbours(tn_core::TileId(1_000)).is_empty());
    }
}

// ── Tile kinds ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod kinds {
    use tn_core::{ModeSet, MovementMode, Rotator, TraversalProfile, Vec3};

    use crate::TileSpec;
    use crate::{Grid, TileKind};

    use super::helpers::config;

    fn profile(modes: &[MovementMode]) -> TraversalProfile {
        TraversalProfile::new(ModeSet::of(modes), 45.0)
    }

    #[test]
    fn ladder_needs_climbing_and_is_never_a_stop() {
        let mut grid = Grid::new(config());
        let l = grid
            .add_tile(TileSpec::ladder(Vec3::ZERO, Vec3::Z * 300.0, Rotator::from_yaw(90.0)))
            .unwrap();
        let ladder = grid.tile(l).unwrap();

        assert!(!ladder.traversable(&profile(&[MovementMode::Walking])));
        assert!(ladder.traversable(&profile(&[MovementMode::ClimbingDown])));
        assert!(!ladder.can_stop_here(&TraversalProfile::default()));
        assert_eq!(ladder.rotation_hint(), Some(Rotator::from_yaw(90.0)));
        assert!(!ladder.allows_shortcut());
    }

    #[test]
    fn ladder_access_point_is_the_closer_end() {
        let mut grid = Grid::new(config());
        let l = grid
            .add_tile(TileSpec::ladder(Vec3::ZERO, Vec3::Z * 300.0, Rotator::ZERO))
            .unwrap();
        let ladder = grid.tile(l).unwrap();
        assert_eq!(ladder.access_point(Vec3::new(100.0, 0.0, 290.0)), Vec3::Z * 300.0);
        assert_eq!(ladder.access_point(Vec3::new(-100.0, 0.0, 10.0)), Vec3::ZERO);
        // Entered from above: top first, then bottom.
        let (entry, exit) = ladder.path_points(Vec3::new(100.0, 0.0, 300.0));
        assert_eq!((entry, exit), (Vec3::Z * 300.0, Some(Vec3::ZERO)));
        assert_eq!(ladder.location, Vec3::Z * 150.0);
    }

    #[test]
    fn ladder_tie_enters_at_the_bottom() {
        let mut grid = Grid::new(config());
        let l = grid
            .add_tile(TileSpec::ladder(Vec3::ZERO, Vec3::Z * 300.0, Rotator::ZERO))
            .unwrap();
        let ladder = grid.tile(l).unwrap();
        let midway = Vec3::new(100.0, 0.0, 150.0);
        assert_eq!(ladder.access_point(midway), Vec3::ZERO);
        assert_eq!(ladder.path_points(midway), (Vec3::ZERO, Some(Vec3::Z * 300.0)));
    }

    #[test]
    fn steep_floor_is_not_walkable() {
        let mut grid = Grid::new(config());
        let steep = Vec3::new(1.0, 0.0, 1.0); // 45°
        let id = grid.add_tile(TileSpec::floor(Vec3::ZERO).with_normal(steep)).unwrap();
        let tile = grid.tile(id).unwrap();
        assert!((tile.slope_angle() - 45.0).abs() < 1e-3);
        assert!(tile.traversable(&TraversalProfile::new(ModeSet::standard(), 50.0)));
        assert!(!tile.traversable(&TraversalProfile::new(ModeSet::standard(), 30.0)));
        assert!(matches!(tile.kind, TileKind::Floor { .. }));
    }

    #[test]
    fn floor_needs_walking() {
        let mut grid = Grid::new(config());
        let id = grid.add_tile(TileSpec::floor(Vec3::ZERO)).unwrap();
        let tile = grid.tile(id).unwrap();
        assert!(!tile.traversable(&profile(&[MovementMode::ClimbingUp])));
        assert!(tile.can_stop_here(&profile(&[MovementMode::Walking])));
        assert_eq!(tile.legal_modes(), ModeSet::single(MovementMode::Walking));
    }
}

// ── Tile lookup ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod lookup {
    use tn_core::{QueryShape, TileId, Vec3};

    use crate::{CollisionService, OpenSpace, TraceResult};

    use super::helpers::grid_3x3;

    /// Reports every trace as hitting one fixed tile.
    struct Floorplate(TileId);

    impl CollisionService for Floorplate {
        fn trace(&self, _: Vec3, _: Vec3, _: &QueryShape) -> TraceResult {
            TraceResult::Hit { tile: Some(self.0) }
        }
    }

    #[test]
    fn falls_back_to_nearest_within_half_a_tile() {
        let (grid, ids) = grid_3x3();
        assert_eq!(grid.tile_at(Vec3::new(90.0, 10.0, 0.0), &OpenSpace), Some(ids[1][2]));
        assert_eq!(grid.tile_at(Vec3::new(900.0, 0.0, 0.0), &OpenSpace), None);
    }

    #[test]
    fn trace_hit_tile_wins() {
        let (grid, ids) = grid_3x3();
        let plate = Floorplate(ids[0][0]);
        assert_eq!(grid.tile_at(Vec3::ZERO, &plate), Some(ids[0][0]));
        // A hit on a tile the grid does not know falls back to proximity.
        let stale = Floorplate(TileId(500));
        assert_eq!(grid.tile_at(Vec3::ZERO, &stale), Some(ids[1][1]));
    }

    #[test]
    fn tiles_within_radius() {
        let (grid, ids) = grid_3x3();
        let near = grid.tiles_within(Vec3::ZERO, 101.0);
        assert_eq!(near.len(), 5);
        assert!(near.contains(&ids[1][1]));
    }
}

// ── Transient tiles ───────────────────────────────────────────────────────────

#[cfg(test)]
mod transient {
    use tn_core::{GridConfig, Vec3};

    use crate::{Grid, TileCandidate, TileSpec, TransientTileProvisioner};

    /// Offers a row of candidates along +X, one per tile.
    struct Row(usize);

    impl TransientTileProvisioner for Row {
        fn candidates(&self, center: Vec3, _radius: f32) -> Vec<TileCandidate> {
            (0..self.0)
                .map(|i| TileCandidate::at(center + Vec3::X * (i as f32 * 100.0)))
                .collect()
        }
    }

    fn enabled(max: usize) -> Grid {
        Grid::new(GridConfig {
            tile_size:              100.0,
            enable_transient_tiles: true,
            max_transient_tiles:    max,
            ..GridConfig::default()
        })
    }

    #[test]
    fn disabled_places_nothing() {
        let mut grid = Grid::new(GridConfig { tile_size: 100.0, ..GridConfig::default() });
        assert_eq!(grid.generate_transient_tiles(&Row(3), Vec3::ZERO, 500.0), 0);
        assert!(grid.generate_transient_tile(Vec3::ZERO).is_none());
    }

    #[test]
    fn capacity_stops_silently() {
        let mut grid = enabled(2);
        assert_eq!(grid.generate_transient_tiles(&Row(5), Vec3::ZERO, 500.0), 2);
        assert_eq!(grid.transient_count(), 2);
        // Linked to each other.
        let first = grid.tile_in_cell(grid.cell_of(Vec3::ZERO)).unwrap();
        assert_eq!(grid.tile(first).unwrap().neighbours().len(), 1);
    }

    #[test]
    fn skips_disallowed_and_occupied_cells() {
        let mut grid = enabled(10);
        grid.add_tile(TileSpec::floor(Vec3::new(100.0, 0.0, 0.0))).unwrap();
        let banned = grid.cell_of(Vec3::new(200.0, 0.0, 0.0));
        grid.mark_disallowed(banned);

        let placed = grid.generate_transient_tiles(&Row(4), Vec3::ZERO, 500.0);
        assert_eq!(placed, 2); // x = 0 and x = 300
        assert!(grid.tile_in_cell(banned).is_none());
        assert_eq!(grid.persistent_count(), 1);
    }

    #[test]
    fn disallowed_candidate_is_skipped() {
        struct Tagged;
        impl TransientTileProvisioner for Tagged {
            fn candidates(&self, _: Vec3, _: f32) -> Vec<TileCandidate> {
                vec![TileCandidate { location: Vec3::ZERO, owner: None, disallowed: true }]
            }
        }
        let mut grid = enabled(10);
        assert_eq!(grid.generate_transient_tiles(&Tagged, Vec3::ZERO, 100.0), 0);
    }

    #[test]
    fn regeneration_replaces_previous_batch() {
        let mut grid = enabled(10);
        grid.generate_transient_tiles(&Row(3), Vec3::ZERO, 500.0);
        grid.generate_transient_tiles(&Row(2), Vec3::new(0.0, 1_000.0, 0.0), 500.0);
        assert_eq!(grid.transient_count(), 2);
        assert!(grid.tile_in_cell(grid.cell_of(Vec3::ZERO)).is_none());
        grid.clear_transient_tiles();
        assert!(grid.is_empty());
    }

    #[test]
    fn persistent_tile_evicts_transient() {
        let mut grid = enabled(10);
        let t = grid.generate_transient_tile(Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert!(grid.tile(t).unwrap().transient);
        let p = grid.add_tile(TileSpec::floor(Vec3::ZERO)).unwrap();
        assert_eq!(grid.transient_count(), 0);
        assert_eq!(grid.tile_in_cell(grid.cell_of(Vec3::ZERO)), Some(p));
    }

    #[test]
    fn single_tile_reuses_existing() {
        let mut grid = enabled(10);
        let a = grid.add_tile(TileSpec::floor(Vec3::ZERO)).unwrap();
        assert_eq!(grid.generate_transient_tile(Vec3::new(5.0, 5.0, 0.0)), Some(a));
        assert_eq!(grid.transient_count(), 0);
    }
}
