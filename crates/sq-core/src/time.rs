//! Simulation time model.
//!
//! # Design
//!
//! The simulation is frame-stepped: every tick carries one `elapsed` value in
//! milliseconds, processed synchronously for the whole mission.  `SimClock`
//! counts ticks and the total simulated milliseconds so components can
//! express timers as absolute deadlines.
//!
//! Integer milliseconds keep all timer arithmetic exact; only movement
//! converts to floating point, and only inside a single frame.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute frame counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Counts frames and simulated milliseconds.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current frame, advanced by [`SimClock::advance`].
    pub current_tick: Tick,
    /// Simulated milliseconds since mission start.
    pub elapsed_ms: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `elapsed_ms` milliseconds.
    #[inline]
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.elapsed_ms += elapsed_ms as u64;
    }

    /// Break elapsed time into (minutes, seconds, millis) for log lines.
    pub fn elapsed_msm(&self) -> (u64, u32, u32) {
        let minutes = self.elapsed_ms / 60_000;
        let seconds = ((self.elapsed_ms % 60_000) / 1_000) as u32;
        let millis = (self.elapsed_ms % 1_000) as u32;
        (minutes, seconds, millis)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, s, ms) = self.elapsed_msm();
        write!(f, "{} ({:02}:{:02}.{:03})", self.current_tick, m, s, ms)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Applications build one in code (or deserialize it with the `serde`
/// feature) and hand it to the mission builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Milliseconds simulated per frame.
    pub frame_ms: u32,

    /// Frames to simulate in a full run.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Radius (tiles) within which behaviours notice threats and targets.
    pub scout_radius_tiles: i32,

    /// How often reactive components re-scan their surroundings.
    pub scout_interval_ms: u32,

    /// Police grace period between warning an armed ped and engaging.
    pub police_warn_ms: u32,

    /// Police cooldown after a target disappears before returning to patrol.
    pub police_disengage_ms: u32,

    /// Interval between two health regeneration steps.
    pub regen_interval_ms: u32,

    /// Normal walking speed in world units per second.
    pub walk_speed: i32,

    /// Speed used when fleeing or chasing.
    pub run_speed: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_ms:            50,
            total_ticks:         1_200,
            seed:                0,
            scout_radius_tiles:  7,
            scout_interval_ms:   500,
            police_warn_ms:      3_000,
            police_disengage_ms: 2_000,
            regen_interval_ms:   1_000,
            walk_speed:          256,
            run_speed:           512,
        }
    }
}

impl SimConfig {
    /// The tick at which a full run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Reject values that would stall the simulation or its timers.
    pub fn validate(&self) -> CoreResult<()> {
        if self.frame_ms == 0 {
            return Err(CoreError::Config("frame_ms must be positive".into()));
        }
        if self.scout_interval_ms == 0 {
            return Err(CoreError::Config("scout_interval_ms must be positive".into()));
        }
        if self.scout_radius_tiles < 0 {
            return Err(CoreError::Config("scout_radius_tiles must not be negative".into()));
        }
        if self.walk_speed <= 0 || self.run_speed <= 0 {
            return Err(CoreError::Config("speeds must be positive".into()));
        }
        Ok(())
    }
}
