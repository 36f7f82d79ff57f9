//! `sq-agent` — the things that live in a mission.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`ped`]     | `Ped`, `PedKind`, `Side`, `PedState`                        |
//! | [`weapon`]  | `WeaponClass` table, `WeaponInstance`, `WeaponStore`        |
//! | [`vehicle`] | `Vehicle`, `VehicleStore`                                   |
//! | [`store`]   | `PedStore` — dense `Vec<Ped>` indexed by `PedId`            |
//! | [`builder`] | `PedBuilder` (fluent construction)                          |
//!
//! Every store is indexed by its typed id: `store.peds[id.index()]`.  Peds
//! are never removed; dead peds stay in place with `PedState::Dead`.

pub mod builder;
pub mod ped;
pub mod store;
pub mod vehicle;
pub mod weapon;


pub use builder::PedBuilder;
pub use ped::{Ped, PedKind, PedState, Side};
pub use store::PedStore;
pub use vehicle::{Vehicle, VehicleStore};
pub use weapon::{WeaponClass, WeaponInstance, WeaponPlacement, WeaponStats, WeaponStore};
