//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a
//! lower-layer failure has to cross the boundary.

use thiserror::Error;

use crate::{PedId, TilePoint};

/// The base error type for `sq-core` and a common ancestor for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("ped {0} not found")]
    PedNotFound(PedId),

    #[error("tile {0} is outside the map")]
    OutOfBounds(TilePoint),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `sq-core`.
pub type CoreResult<T> = Result<T, CoreError>;
