//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `NavError` via `From` impls, or keep them separate.  Planning never
//! errors: unreachable targets are reported as `None`/`false`.

use thiserror::Error;

use crate::TileId;

/// The base error type shared by `tn-*` crates.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("tile {0} not found")]
    TileNotFound(TileId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported configuration version {found} (expected at most {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Shorthand result type for all `tn-*` crates.
pub type NavResult<T> = Result<T, NavError>;
