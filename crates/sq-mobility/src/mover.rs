//! The mover: plans routes and advances positions frame by frame.

use log::{debug, warn};
use sq_core::{Angle, Dir8, TilePoint, WorldPoint};
use sq_spatial::{ConnectivityMap, Router, Surface};

use crate::{BlockerMode, DirLimit, MobilityError, MobilityResult, MoveOutcome, MovementState};

/// An intermediate waypoint closer than this on both lateral axes counts as
/// reached.
pub const ARRIVE_EPSILON: i32 = 16;

/// Longest single free-walk sub-step in world units.  Kept well below a tile
/// so no sub-step can jump over a tile.
pub const SUB_STEP: f64 = 64.0;

/// Bounce rotations in 256ths of a turn, tried in order after the desired
/// heading, each first on the side the heading already leans to.
const BOUNCE_ROTATIONS: [i32; 3] = [32, 64, 96];

/// Plans and executes movement for peds and vehicles.
///
/// # Type parameter
///
/// `R` is the routing algorithm, e.g. [`sq_spatial::FloodRouter`].  Swap it
/// at compile time for a different search with no runtime overhead.
pub struct Mover<R: Router> {
    pub router: R,
}

impl<R: Router> Mover<R> {
    pub fn new(router: R) -> Self {
        Self { router }
    }

    /// Validate a spawn position: in bounds and walkable.  Returns the
    /// position with `oz` placed on the tile surface.
    pub fn place(&self, map: &ConnectivityMap, pos: TilePoint) -> MobilityResult<TilePoint> {
        if map.index_of(&pos).is_none() {
            return Err(MobilityError::OutOfBounds(pos));
        }
        if !map.is_walkable(&pos) {
            return Err(MobilityError::NotWalkable(pos));
        }
        Ok(on_surface(map, pos))
    }

    /// Route from `pos` to `destination` and install the smoothed path.
    ///
    /// Returns `false`, with the state stopped, when no route exists.  A
    /// destination on the current tile installs a one-waypoint path.
    pub fn init_movement_to_destination(
        &self,
        map:         &ConnectivityMap,
        state:       &mut MovementState,
        pos:         &TilePoint,
        destination: TilePoint,
        speed:       i32,
    ) -> bool {
        let destination = destination.clamped(map.size());
        if speed <= 0 {
            state.clear_destination();
            return false;
        }
        if pos.tile_eq(&destination) {
            state.set_path([destination], speed);
            return true;
        }
        if !map.is_walkable(pos) {
            warn!("movement requested from non-walkable tile {pos}");
            state.clear_destination();
            return false;
        }
        match self.router.find_path_smoothed(map, *pos, destination) {
            Some(path) => {
                // The first waypoint is the tile we stand on.
                state.set_path(path.into_iter().skip(1), speed);
                true
            }
            None => {
                debug!("no route from {pos} to {destination}");
                state.clear_destination();
                false
            }
        }
    }

    /// One frame of either movement mode.  Returns `true` when the position
    /// changed.
    pub fn animate(
        &self,
        map:        &ConnectivityMap,
        state:      &mut MovementState,
        pos:        &mut TilePoint,
        elapsed_ms: u32,
    ) -> bool {
        if state.dir_move.is_some() {
            self.move_to_dir(map, state, pos, elapsed_ms).moved
        } else {
            self.follow_path(state, pos, elapsed_ms)
        }
    }

    /// Advance along the installed path by at most `speed × elapsed`.
    ///
    /// Intermediate waypoints within [`ARRIVE_EPSILON`] are dropped; the
    /// final one is reached exactly.  The state stops when the path empties.
    pub fn follow_path(
        &self,
        state:      &mut MovementState,
        pos:        &mut TilePoint,
        elapsed_ms: u32,
    ) -> bool {
        if state.path.is_empty() {
            state.speed = 0;
            state.last_outcome = MoveOutcome { finished: true, ..MoveOutcome::default() };
            return false;
        }
        if let Some(blocker) = state.blocker.filter(|b| b.applies_to(pos)) {
            if blocker.mode == BlockerMode::Clear {
                debug!("path abandoned near blocker at {}", blocker.tile);
                state.clear_destination();
            }
            state.last_outcome = MoveOutcome { blocked: true, ..MoveOutcome::default() };
            return false;
        }

        let start = pos.to_world();
        let mut cur = start;
        let mut budget = state.speed.max(0) as f64 * elapsed_ms as f64 / 1000.0;

        while let Some(&wp) = state.path.front() {
            let target = wp.to_world();
            let (dx, dy, dz) = (target.x - cur.x, target.y - cur.y, target.z - cur.z);
            let dist = ((dx as f64).powi(2) + (dy as f64).powi(2)).sqrt();

            if dx != 0 || dy != 0 {
                state.heading = Angle::toward(cur, target);
            }
            if dist <= budget {
                budget -= dist;
                cur = target;
                state.path.pop_front();
                continue;
            }
            if state.path.len() > 1 && dx.abs() < ARRIVE_EPSILON && dy.abs() < ARRIVE_EPSILON {
                state.path.pop_front();
                continue;
            }
            // Truncation keeps the step inside the budget.
            let frac = budget / dist;
            cur = WorldPoint::new(
                cur.x + (dx as f64 * frac) as i32,
                cur.y + (dy as f64 * frac) as i32,
                cur.z + (dz as f64 * frac) as i32,
            );
            break;
        }

        *pos = cur.to_tile();
        let finished = state.path.is_empty();
        if finished {
            state.speed = 0;
            state.destination = None;
        }
        let moved = cur != start;
        state.last_outcome = MoveOutcome { moved, finished, blocked: false };
        moved
    }

    /// One frame of free-direction walking.
    ///
    /// The frame budget is split into sub-steps of at most [`SUB_STEP`].  A
    /// sub-step that crosses into another tile must be allowed by the
    /// current tile's masks; the level change is taken from the mask, so
    /// stairs raise or lower `tz` automatically.  With bouncing enabled a
    /// blocked sub-step tries headings rotated by 45°, 90° and 135°,
    /// nearer side first; when every rotation fails the heading is restored
    /// and the walk stops as blocked.
    pub fn move_to_dir(
        &self,
        map:        &ConnectivityMap,
        state:      &mut MovementState,
        pos:        &mut TilePoint,
        elapsed_ms: u32,
    ) -> MoveOutcome {
        let Some(mut walk) = state.dir_move else {
            return MoveOutcome::default();
        };
        if let DirLimit::Target(target) = walk.limit {
            walk.desired = Angle::toward(pos.to_world(), target);
        }

        let mut cur = *pos;
        let mut outcome = MoveOutcome::default();
        let mut budget = state.speed.max(0) as f64 * elapsed_ms as f64 / 1000.0;

        while budget > 0.0 {
            let left = match walk.limit {
                DirLimit::Unbounded => f64::INFINITY,
                DirLimit::MaxDistance(max) => max - walk.travelled,
                DirLimit::Target(target) => cur.to_world().distance_xy(target),
            };
            if left < 1.0 {
                outcome.finished = true;
                break;
            }
            let step = budget.min(SUB_STEP).min(left);

            let stepped = try_step(map, &cur, walk.desired, step, walk.safe_walk)
                .map(|next| (walk.desired, next))
                .or_else(|| {
                    if walk.bounce {
                        bounce(map, &cur, walk.desired, step, walk.safe_walk)
                    } else {
                        None
                    }
                });
            match stepped {
                Some((heading, next)) => {
                    state.heading = heading;
                    cur = next;
                    walk.travelled += step;
                    budget -= step;
                }
                None => {
                    state.heading = walk.desired;
                    outcome.blocked = true;
                    break;
                }
            }
        }
        if !outcome.finished && !outcome.blocked {
            let done = match walk.limit {
                DirLimit::Unbounded => false,
                DirLimit::MaxDistance(max) => walk.travelled >= max - 1.0,
                DirLimit::Target(target) => cur.to_world().distance_xy(target) < 1.0,
            };
            outcome.finished = done;
        }

        outcome.moved = cur != *pos;
        *pos = cur;
        if outcome.finished || outcome.blocked {
            state.dir_move = None;
            state.speed = 0;
        } else {
            state.dir_move = Some(walk);
        }
        state.last_outcome = outcome;
        outcome
    }
}

// ── Free-walk helpers ─────────────────────────────────────────────────────────

/// `pos` with `oz` on the surface of its tile.
fn on_surface(map: &ConnectivityMap, mut pos: TilePoint) -> TilePoint {
    pos.oz = match map.surface(&pos) {
        Surface::Slope(slope) => slope.height_at(pos.ox, pos.oy),
        Surface::Flat => 0,
    };
    pos
}

/// One sub-step of `dist` units along `heading`, if every rule allows it.
fn try_step(
    map:       &ConnectivityMap,
    from:      &TilePoint,
    heading:   Angle,
    dist:      f64,
    safe_walk: bool,
) -> Option<TilePoint> {
    let (c, s) = heading.unit_vector();
    let w = from.to_world();
    let lateral = WorldPoint::new(
        w.x + (c * dist) as i32,
        w.y + (s * dist) as i32,
        w.z,
    )
    .to_tile();

    let (tdx, tdy) = (lateral.tx - from.tx, lateral.ty - from.ty);
    if tdx == 0 && tdy == 0 {
        let p = TilePoint::new(from.tx, from.ty, from.tz, lateral.ox, lateral.oy, 0);
        return Some(on_surface(map, p));
    }
    let dir = Dir8::from_delta(tdx, tdy)?;
    let dz = map.step_dz(from, dir)?;
    let next = TilePoint::new(lateral.tx, lateral.ty, from.tz + dz, lateral.ox, lateral.oy, 0);
    if safe_walk && !map.is_safe(&next) {
        return None;
    }
    Some(on_surface(map, next))
}

/// First rotated heading that can take the sub-step.
fn bounce(
    map:       &ConnectivityMap,
    from:      &TilePoint,
    desired:   Angle,
    dist:      f64,
    safe_walk: bool,
) -> Option<(Angle, TilePoint)> {
    let lean = if desired.0 % 32 >= 16 { 1 } else { -1 };
    BOUNCE_ROTATIONS
        .iter()
        .flat_map(|&r| [r * lean, -r * lean])
        .map(|delta| desired.wrapping_add(delta))
        .find_map(|heading| {
            try_step(map, from, heading, dist, safe_walk).map(|next| (heading, next))
        })
}
