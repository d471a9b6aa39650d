//! `tn-path`: search and path shaping over a tile graph.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`planner`]  | `Planner` trait, `DijkstraPlanner`, `Reachable`, `Path`    |
//! | [`simplify`] | `string_pull`                                              |
//! | [`curve`]    | `PathCurve`, `PathSegment`, `build_curve`                  |
//! | [`plan`]     | `PathPlan`, the bundle handed to the movement executor     |
//!
//! # Feature flags
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `reachable_batch` runs queries on Rayon's thread pool   |

pub mod curve;
pub mod plan;
pub mod planner;
pub mod simplify;


pub use curve::{PathCurve, PathSegment, build_curve};
pub use plan::PathPlan;
pub use planner::{DijkstraPlanner, Path, Planner, Reachable, reachable_batch};
pub use simplify::string_pull;
