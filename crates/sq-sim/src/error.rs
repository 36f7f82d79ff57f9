use sq_action::ActionError;
use sq_core::{CoreError, PedId, VehicleId, WeaponId};
use sq_mobility::MobilityError;
use sq_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("no vehicle with id {0}")]
    UnknownVehicle(VehicleId),

    #[error("{ped} does not carry {weapon}")]
    WeaponNotCarried { ped: PedId, weapon: WeaponId },

    #[error("map error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("placement error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("action error: {0}")]
    Action(#[from] ActionError),
}

pub type SimResult<T> = Result<T, SimError>;
