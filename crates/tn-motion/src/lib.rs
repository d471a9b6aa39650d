//! `tn-motion`: executes planned paths frame by frame.
//!
//! # Crate layout
//!
//! | Module           | Contents                                               |
//! |------------------|--------------------------------------------------------|
//! | [`entity`]       | `Positionable` trait and the plain `Body` transform    |
//! | [`displacement`] | `DisplacementSource`, `FrameDisplacement`              |
//! | [`observer`]     | `MovementObserver`, `EventLog`, `MovementEvent`        |
//! | [`state`]        | `MovementState`                                        |
//! | [`executor`]     | `MovementExecutor`                                     |
//!
//! # Typical loop
//!
//! ```rust,ignore
//! let graph = executor.graph(&grid, &collision);
//! if executor.move_to(&graph, &body, target) {
//!     while executor.is_moving() {
//!         executor.tick(&mut body, 1.0 / 60.0);
//!     }
//! }
//! ```

pub mod displacement;
pub mod entity;
pub mod executor;
pub mod observer;
pub mod state;


pub use displacement::{DisplacementSource, FrameDisplacement, ScriptedDisplacement};
pub use entity::{Body, Positionable};
pub use executor::MovementExecutor;
pub use observer::{EventLog, MovementEvent, MovementObserver, NoopObserver};
pub use state::MovementState;
