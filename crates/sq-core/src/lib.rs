//! `sq-core` — foundational types for the squad simulation core.
//!
//! This crate is a dependency of every other `sq-*` crate.  It has no
//! `sq-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`ids`]    | `PedId`, `VehicleId`, `WeaponId`, `ActionId`                 |
//! | [`geo`]    | `TilePoint`, `WorldPoint`, `MapSize`                         |
//! | [`dir`]    | `Dir8` lateral directions, `Angle` (0–255 per full turn)     |
//! | [`time`]   | `Tick`, `SimClock` (millisecond frames), `SimConfig`         |
//! | [`rng`]    | `PedRng`, seeded per ped from the mission seed               |
//! | [`error`]  | `CoreError`, `CoreResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod dir;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use dir::{Angle, Dir8};
pub use error::{CoreError, CoreResult};
pub use geo::{MapSize, TilePoint, WorldPoint};
pub use ids::{ActionId, PedId, VehicleId, WeaponId};
pub use rng::PedRng;
pub use time::{SimClock, SimConfig, Tick};
