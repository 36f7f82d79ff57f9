//! Per-ped (and per-vehicle) movement state.

use std::collections::VecDeque;

use sq_core::{Angle, TilePoint, WorldPoint};

use crate::PathBlocker;

/// Result of one movement frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Position changed this frame.
    pub moved:    bool,
    /// The path emptied, the distance limit was reached, or the target was hit.
    pub finished: bool,
    /// Movement stopped on an impassable crossing or an active blocker.
    pub blocked:  bool,
}

/// How far a free walk goes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DirLimit {
    /// Keep walking until blocked or cancelled.
    Unbounded,
    /// Stop after this many world units.
    MaxDistance(f64),
    /// Walk toward a world point and stop on arrival.
    Target(WorldPoint),
}

/// Free-direction walking parameters and progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirMoveState {
    /// The heading the walker wants; bounces deviate from it temporarily.
    pub desired:   Angle,
    pub limit:     DirLimit,
    /// Try rotated headings when the desired one is blocked.
    pub bounce:    bool,
    /// Refuse tiles flagged unsafe (roads) even when walkable.
    pub safe_walk: bool,
    /// World units walked since the walk started.
    pub travelled: f64,
}

impl DirMoveState {
    pub fn new(desired: Angle, limit: DirLimit) -> Self {
        Self { desired, limit, bounce: false, safe_walk: false, travelled: 0.0 }
    }

    pub fn with_bounce(mut self, bounce: bool) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_safe_walk(mut self, safe_walk: bool) -> Self {
        self.safe_walk = safe_walk;
        self
    }
}

/// The movement state for a single ped or vehicle.
///
/// At most one mode is active: a non-empty `path` means path following,
/// `dir_move = Some(..)` means free walking.  Starting one clears the other.
#[derive(Clone, Debug, Default)]
pub struct MovementState {
    /// Remaining waypoints with sub-tile offsets; the back is the destination.
    pub path:         VecDeque<TilePoint>,
    /// World units per second; `0` when stationary.
    pub speed:        i32,
    pub destination:  Option<TilePoint>,
    /// Direction of the last step taken.
    pub heading:      Angle,
    pub blocker:      Option<PathBlocker>,
    pub dir_move:     Option<DirMoveState>,
    pub last_outcome: MoveOutcome,
}

impl MovementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a path or a free walk is in progress.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.speed > 0 && (!self.path.is_empty() || self.dir_move.is_some())
    }

    #[inline]
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Install a smoothed path.  Any free walk is abandoned.
    pub fn set_path(&mut self, path: impl IntoIterator<Item = TilePoint>, speed: i32) {
        self.path = path.into_iter().collect();
        self.destination = self.path.back().copied();
        self.dir_move = None;
        self.speed = if self.path.is_empty() { 0 } else { speed };
    }

    /// Start walking freely.  Any path is abandoned.
    pub fn start_dir_walk(&mut self, walk: DirMoveState, speed: i32) {
        self.path.clear();
        self.destination = None;
        self.heading = walk.desired;
        self.dir_move = Some(walk);
        self.speed = speed;
    }

    /// Stop immediately and forget both path and free walk.
    pub fn clear_destination(&mut self) {
        self.path.clear();
        self.destination = None;
        self.dir_move = None;
        self.speed = 0;
    }
}
