//! `sq-action` — what a ped is doing, frame by frame.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                           |
//! |------------|--------------------------------------------------------------------|
//! | [`action`] | `Action`, `ActionKind`, `ActionStatus`, `HitKind`, `FireTarget`    |
//! | [`chain`]  | `ActionChains` — per-ped arena holding the current/default/alt chains and the weapon slot |
//! | [`engine`] | `execute`, `execute_weapon`, the `ActionHost` trait               |
//! | [`error`]  | `ActionError`, `ActionResult<T>`                                   |
//!
//! # Chains
//!
//! Every ped owns three doubly linked chains inside one arena:
//!
//! * **current** — transient orders and priority reactions (being hit);
//! * **default** — the ped's scripted routine, looped with a `Reset` action;
//! * **alt** — a reactive override installed by behaviour components.
//!
//! One of them is the *source*: its cursor is the action that executes.
//! When the current chain runs dry, execution falls back to the chain that
//! was the source before it took over.  Independently of the chains, one
//! weapon-use action may run in the weapon slot.
//!
//! Actions move between chains only by unlinking and relinking; ids stay
//! valid until the action is destroyed.

pub mod action;
pub mod chain;
pub mod engine;
pub mod error;


pub use action::{Action, ActionKind, ActionStatus, FireTarget, HitKind};
pub use chain::{ActionChains, ChainIter, ChainKind};
pub use engine::{execute, execute_weapon, ActionEnded, ActionHost};
pub use error::{ActionError, ActionResult};
