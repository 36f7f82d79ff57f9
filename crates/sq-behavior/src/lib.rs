//! `sq-behavior` — the reactive AI layer that decides which action chain a
//! ped runs.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                         |
//! |----------------|------------------------------------------------------------------|
//! | [`event`]      | `BehaviourEvent` (weapon out/cleared, action ended, hit, …)      |
//! | [`world`]      | `WorldView` — per-tick ped snapshot with an R-tree index         |
//! | [`context`]    | `BehaviourContext<'a>` — what a component may read               |
//! | [`component`]  | `BehaviourComponent` trait                                       |
//! | [`components`] | the six standard strategies                                      |
//! | [`behaviour`]  | `Behaviour` (ordered components), `ComponentSet` factories       |
//! | [`error`]      | `BehaviorError`, `BehaviorResult<T>`                             |
//!
//! # Design notes
//!
//! The mission runs behaviours sequentially, one ped at a time.  Each call
//! gets exclusive access to its own [`sq_agent::Ped`] and shared access to
//! a [`WorldView`] built at the start of the tick, so a component never
//! sees another ped half-updated.  Components steer their ped only through
//! its action chains; the action engine and mover do the rest during the
//! animate phase.
//!
//! Components react to events where possible and otherwise re-scan on a
//! scout timer instead of every tick.

pub mod behaviour;
pub mod component;
pub mod components;
pub mod context;
pub mod error;
pub mod event;
pub mod world;


pub use behaviour::{Behaviour, ComponentSet};
pub use component::BehaviourComponent;
pub use components::{
    HostileComponent, PanicComponent, PersuadableComponent, PersuadedComponent, PoliceComponent,
    PoliceState, RegenerationComponent,
};
pub use context::BehaviourContext;
pub use error::{BehaviorError, BehaviorResult};
pub use event::BehaviourEvent;
pub use world::{PedSnapshot, WorldView};
