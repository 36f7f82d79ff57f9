//! Spatial-subsystem error type.

use thiserror::Error;

use sq_core::{MapSize, TilePoint};

/// Errors produced by `sq-spatial`.
///
/// An unreachable destination is not an error: routers return `None`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("tile {0} is outside the map")]
    OutOfBounds(TilePoint),

    #[error("tile data length {got} does not match map size {size:?}")]
    SizeMismatch { size: MapSize, got: usize },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
