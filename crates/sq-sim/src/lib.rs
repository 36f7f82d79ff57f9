//! `sq-sim` — the mission world and its frame loop.
//!
//! # One frame
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Snapshot  — WorldView of every ped, R-tree indexed.
//!   ② Behaviour — each live ped's components pick chains and targets.
//!   ③ Events    — last frame's BehaviourEvents, ascending PedId.
//!   ④ Actions   — each live ped plays its chain and weapon slot through
//!                 a PedHost (movement, boarding, pick-ups, firing).
//!   ⑤ Vehicles  — riders follow their vehicle.
//!   ⑥ Shots     — volleys land; hits queue reactions, deaths drop weapons.
//!   ⑦ Announce  — drawn/holstered weapons and persuadotrons broadcast.
//! ```
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`mission`]  | `Mission<R>`: map, peds, vehicles, weapons, behaviours   |
//! | [`combat`]   | `Shot`, hit chance, damage and vehicle wrecks            |
//! | [`sim`]      | `Sim<R>`, `TickReport`, `Death`                          |
//! | [`builder`]  | `MissionBuilder<R>`                                      |
//! | [`observer`] | `SimObserver` hooks and `NoopObserver`                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sq_agent::{PedBuilder, PedKind};
//! use sq_core::{MapSize, SimConfig, TilePoint};
//! use sq_sim::{MissionBuilder, NoopObserver};
//! use sq_spatial::{TileGrid, TileKind};
//!
//! let mut grid = TileGrid::new(MapSize::new(16, 16, 1));
//! grid.fill((0, 0, 0), (15, 15, 0), TileKind::Floor)?;
//! let mut sim = MissionBuilder::new(SimConfig::default(), grid)
//!     .ped(PedBuilder::new(PedKind::Agent).at(TilePoint::tile(2, 2, 0)))
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod combat;
pub mod error;
mod host;
pub mod mission;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::MissionBuilder;
pub use combat::{hit_chance, Shot};
pub use error::{SimError, SimResult};
pub use mission::Mission;
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Death, Sim, TickReport};
