//! Grid-editing error type.

use thiserror::Error;

use tn_core::TileId;

use crate::CellCoord;

/// Errors produced by `tn-grid`.  Only editing operations fail; queries
/// return `Option`/`bool`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("tile {0} not found in grid")]
    TileNotFound(TileId),

    #[error("cell {cell} already holds {occupant}")]
    CellOccupied { cell: CellCoord, occupant: TileId },
}

pub type GridResult<T> = Result<T, GridError>;
