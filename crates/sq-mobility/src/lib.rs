//! `sq-mobility` — continuous ped and vehicle movement on the tile grid.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`state`]   | `MovementState`, `DirMoveState`, `DirLimit`, `MoveOutcome`        |
//! | [`blocker`] | `PathBlocker`, `BlockerMode` — pause or abandon near an obstacle  |
//! | [`mover`]   | `Mover<R>` — path planning, path following, free walking          |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                              |
//!
//! # Movement model
//!
//! Positions are [`TilePoint`][sq_core::TilePoint]s; all arithmetic happens
//! in flattened [`WorldPoint`][sq_core::WorldPoint] space.  Each frame the
//! mover receives `elapsed` milliseconds and may travel at most
//! `speed × elapsed / 1000` world units along the lateral plane, whichever
//! mode is active:
//!
//! * **path following** — consumes smoothed waypoints produced by a
//!   [`Router`][sq_spatial::Router]; several may be consumed in one frame if
//!   they fit in the budget.
//! * **free walking** — walks along an [`Angle`][sq_core::Angle], checking
//!   every tile crossing against the connectivity masks and bouncing off
//!   walls when allowed.

pub mod blocker;
pub mod error;
pub mod mover;
pub mod state;


pub use blocker::{BlockerMode, PathBlocker};
pub use error::{MobilityError, MobilityResult};
pub use mover::Mover;
pub use state::{DirLimit, DirMoveState, MoveOutcome, MovementState};
