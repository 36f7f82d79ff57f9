//! Simulation observer trait for progress reporting.

use sq_core::Tick;

use crate::{Death, TickReport};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// frame loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — casualty counter
///
/// ```rust,ignore
/// struct Casualties(usize);
///
/// impl SimObserver for Casualties {
///     fn on_ped_died(&mut self, _tick: Tick, _death: &Death) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each frame, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per ped killed during the frame, in the order the shots
    /// were resolved.
    fn on_ped_died(&mut self, _tick: Tick, _death: &Death) {}

    /// Called at the end of each frame.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called once after the final frame completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
