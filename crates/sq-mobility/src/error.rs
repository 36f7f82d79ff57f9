use sq_core::TilePoint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("position {0} is outside the map")]
    OutOfBounds(TilePoint),

    #[error("position {0} is not walkable")]
    NotWalkable(TilePoint),

    #[error("negative speed {0}")]
    NegativeSpeed(i32),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
