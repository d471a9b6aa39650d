//! Per-agent movement state.

use tn_core::{MovementMode, Rotator, TileId};

/// Movement state of a single agent.
///
/// `distance` is measured along the active path curve and is zero whenever
/// no path is being followed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementState {
    pub mode:         MovementMode,
    /// Distance travelled along the current curve.
    pub distance:     f32,
    pub facing:       Rotator,
    /// Tile the agent stands on; `None` while between tiles or off-grid.
    pub current_tile: Option<TileId>,
}

impl MovementState {
    /// A stationary state with the given facing, optionally on a tile.
    #[inline]
    pub fn stationary(facing: Rotator, tile: Option<TileId>) -> Self {
        Self {
            mode:         MovementMode::Stationary,
            distance:     0.0,
            facing,
            current_tile: tile,
        }
    }

    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.mode == MovementMode::Stationary
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::stationary(Rotator::ZERO, None)
    }
}
