//! The `Sim` struct and its frame loop.

use log::info;

use sq_core::{PedId, SimClock};
use sq_spatial::{FloodRouter, Router};

use crate::{Mission, SimObserver};

// ── Reports ───────────────────────────────────────────────────────────────────

/// A ped killed during a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Death {
    pub ped:    PedId,
    /// `None` for environmental damage.
    pub killer: Option<PedId>,
}

/// What one frame did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Peds whose position changed.
    pub moved:  usize,
    /// Peds alive at the end of the frame.
    pub alive:  usize,
    pub deaths: Vec<Death>,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<R>` pairs a [`Mission`] with a clock and advances both by one
/// `config.frame_ms` frame at a time; see [`Mission::step`] for the phases
/// inside a frame.
///
/// Create via [`MissionBuilder`][crate::MissionBuilder].
pub struct Sim<R: Router = FloodRouter> {
    /// Frame counter and simulated milliseconds.
    pub clock:   SimClock,
    pub mission: Mission<R>,
}

impl<R: Router> Sim<R> {
    pub fn new(mission: Mission<R>) -> Self {
        Self { clock: SimClock::new(), mission }
    }

    /// Run from the current frame to `config.end_tick()`.
    ///
    /// Calls observer hooks at every frame boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        let end = self.mission.config.end_tick();
        info!("mission start: {} peds, {} frames", self.mission.peds.len(), end.0);
        while self.clock.current_tick < end {
            self.frame(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        info!("mission end at {}: {} peds alive", self.clock, self.mission.peds.alive_count());
    }

    /// Run exactly `n` frames from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.frame(observer);
        }
    }

    fn frame<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        let elapsed = self.mission.config.frame_ms;

        observer.on_tick_start(now);
        let report = self.mission.step(elapsed);
        for death in &report.deaths {
            observer.on_ped_died(now, death);
        }
        observer.on_tick_end(now, &report);

        self.clock.advance(elapsed);
    }
}
