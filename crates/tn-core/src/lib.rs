//! `tn-core`: foundational types for the `tilenav` movement framework.
//!
//! This crate is a dependency of every other `tn-*` crate.  It has no `tn-*`
//! dependencies and minimal external ones (`glam`, `log`, `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `TileId`, `AgentId`, `ActorId`, `ObserverId`          |
//! | [`mode`]        | `MovementMode`, `ModeSet`, `TraversalProfile`         |
//! | [`rotation`]    | `Rotator`, `AxisLocks`                                |
//! | [`shape`]       | `QueryShape`                                          |
//! | [`config`]      | `NavConfig`, `GridConfig`, `MovementConfig`           |
//! | [`error`]       | `NavError`, `NavResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod mode;
pub mod rotation;
pub mod shape;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CONFIG_VERSION, GridConfig, MovementConfig, NavConfig};
pub use error::{NavError, NavResult};
pub use glam::Vec3;
pub use ids::{ActorId, AgentId, ObserverId, TileId};
pub use mode::{ModeSet, MovementMode, TraversalProfile};
pub use rotation::{AxisLocks, Rotator, normalize_axis};
pub use shape::QueryShape;
