//! `tn-grid`: tile storage, adjacency and obstruction queries.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`tile`]      | `Tile`, `TileKind`, `TileSpec`, `CellCoord`                |
//! | [`grid`]      | `Grid` (slot storage + cells + R-tree)                     |
//! | [`graph`]     | `TileGraph`: read-only view with obstruction checks       |
//! | [`collision`] | `CollisionService` trait, `OpenSpace`, `WallSet`           |
//! | [`transient`] | `TransientTileProvisioner`, transient tile generation      |
//! | [`error`]     | `GridError`, `GridResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod collision;
pub mod error;
pub mod graph;
pub mod grid;
pub mod tile;
pub mod transient;

#[cfg(test)]
mod tests;

pub use collision::{CollisionService, OpenSpace, TraceResult, WallSet};
pub use error::{GridError, GridResult};
pub use graph::TileGraph;
pub use grid::Grid;
pub use tile::{CellCoord, Tile, TileKind, TileSpec};
pub use transient::{TileCandidate, TransientTileProvisioner};
