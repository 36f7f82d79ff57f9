//! What each action kind does to the world, for one ped.

use log::debug;

use sq_action::{Action, ActionHost, ActionKind, ActionStatus, FireTarget};
use sq_agent::{Ped, PedState, VehicleStore, WeaponPlacement, WeaponStore};
use sq_behavior::WorldView;
use sq_core::{Angle, PedId, SimConfig, TilePoint, VehicleId, WeaponId, WorldPoint};
use sq_mobility::{DirLimit, DirMoveState, Mover};
use sq_spatial::{ConnectivityMap, Router};

use crate::combat::{Shot, hit_chance};

/// Where a per-kind frame leaves the action.
enum Step {
    Continue,
    WaitForAnim,
    WaitForTime,
    Succeed,
    Fail,
}

/// Plays actions for one ped against the rest of the mission.
///
/// The ped's own chains are taken out while the host exists, so the host
/// can hold the ped mutably.  Requests that need the chains (opening fire)
/// are left in `fire_request` for the caller.
pub(crate) struct PedHost<'m, R: Router> {
    pub ped:          &'m mut Ped,
    pub map:          &'m ConnectivityMap,
    pub mover:        &'m Mover<R>,
    pub config:       &'m SimConfig,
    pub world:        &'m WorldView,
    pub weapons:      &'m mut WeaponStore,
    pub vehicles:     &'m mut VehicleStore,
    pub shots:        &'m mut Vec<Shot>,
    pub fire_request: Option<FireTarget>,
}

impl<R: Router> PedHost<'_, R> {
    fn speed(&self, run: bool) -> i32 {
        if run { self.config.run_speed } else { self.config.walk_speed }
    }

    fn face(&mut self, to: WorldPoint) {
        let from = self.ped.position.to_world();
        if from.x != to.x || from.y != to.y {
            self.ped.direction = Angle::toward(from, to);
        }
    }

    /// Within `tiles` laterally and at most one level apart.
    fn near(&self, to: TilePoint, tiles: i32) -> bool {
        (self.ped.position.tz - to.tz).abs() <= 1
            && self.ped.position.tile_distance(&TilePoint { tz: self.ped.position.tz, ..to }) <= tiles
    }

    fn live_target(&self, id: PedId) -> Option<(TilePoint, WorldPoint)> {
        self.world
            .ped(id)
            .filter(|s| s.alive && !s.in_vehicle)
            .map(|s| (s.position, s.world))
    }

    fn walk_to(&mut self, dest: TilePoint, run: bool) -> bool {
        let speed = self.speed(run);
        let pos = self.ped.position;
        self.mover.init_movement_to_destination(self.map, &mut self.ped.movement, &pos, dest, speed)
    }

    fn advance(&mut self, elapsed_ms: u32) {
        self.mover.follow_path(&mut self.ped.movement, &mut self.ped.position, elapsed_ms);
        self.ped.direction = self.ped.movement.heading;
    }

    /// Keep a path toward `dest`'s tile and advance along it.  Re-routes
    /// only when the goal tile changed.
    fn chase(&mut self, dest: TilePoint, run: bool, elapsed_ms: u32) -> bool {
        let on_course = self.ped.movement.destination.is_some_and(|d| d.tile_eq(&dest));
        if !on_course && !self.walk_to(dest, run) {
            return false;
        }
        self.advance(elapsed_ms);
        true
    }

    fn start_dir_walk(
        &mut self,
        heading:      Angle,
        max_distance: Option<f64>,
        target:       Option<WorldPoint>,
        bounce:       bool,
        safe_walk:    bool,
        run:          bool,
    ) {
        let limit = match (target, max_distance) {
            (Some(t), _) => DirLimit::Target(t),
            (None, Some(d)) => DirLimit::MaxDistance(d),
            (None, None) => DirLimit::Unbounded,
        };
        let walk = DirMoveState::new(heading, limit).with_bounce(bounce).with_safe_walk(safe_walk);
        let speed = self.speed(run);
        self.ped.movement.start_dir_walk(walk, speed);
    }

    fn weapon_range(&self) -> Option<i32> {
        let weapon = self.ped.selected.and_then(|w| self.weapons.get(w))?;
        weapon.has_ammo().then(|| weapon.class.stats().range_tiles)
    }

    /// Where a shot at `target` lands.  Riders can be shot through their
    /// vehicle.
    fn fire_point(&self, target: FireTarget) -> Option<(TilePoint, WorldPoint)> {
        match target {
            FireTarget::Ped(id) => self.world.ped(id).filter(|s| s.alive).map(|s| (s.position, s.world)),
            FireTarget::Point(p) => Some((p.to_tile(), p)),
        }
    }

    // ── Per-kind start ────────────────────────────────────────────────────

    fn start_fire(&mut self, target: FireTarget) -> bool {
        let Some(weapon) = self.ped.selected else {
            return false;
        };
        let Some((tile, point)) = self.fire_point(target) else {
            return false;
        };
        let Some(inst) = self.weapons.get_mut(weapon) else {
            return false;
        };
        if !inst.consume_round() {
            return false;
        }
        let class = inst.class;
        let distance = self.ped.position.tile_distance(&tile);
        let hit = self.ped.rng.gen_bool(hit_chance(distance, class.stats().range_tiles));
        self.face(point);
        self.shots.push(Shot { shooter: self.ped.id, target, class, hit });
        true
    }

    fn carries(&self, weapon: WeaponId) -> bool {
        self.ped.weapons.contains(&weapon)
    }

    fn ground_here(&self, weapon: WeaponId) -> bool {
        self.weapons.get(weapon).is_some_and(|w| match w.placement {
            WeaponPlacement::Ground(t) => t.tile_eq(&self.ped.position),
            WeaponPlacement::Carried(_) => false,
        })
    }

    fn may_drive(&self, vehicle: VehicleId) -> bool {
        self.ped.vehicle == Some(vehicle)
            && self
                .vehicles
                .get(vehicle)
                .is_some_and(|v| !v.is_destroyed() && v.driver() == Some(self.ped.id))
    }

    // ── Per-kind frame ────────────────────────────────────────────────────

    fn step_walk(&mut self, dest: TilePoint, run: bool, elapsed_ms: u32) -> Step {
        if !self.ped.movement.has_path() {
            if self.ped.position.tile_eq(&dest) {
                return Step::Succeed;
            }
            // Path lost to an interruption: route again.
            if !self.walk_to(dest, run) {
                return Step::Fail;
            }
        }
        self.advance(elapsed_ms);
        if !self.ped.movement.has_path() && self.ped.position.tile_eq(&dest) {
            Step::Succeed
        } else {
            Step::Continue
        }
    }

    fn step_follow(&mut self, target: PedId, distance_tiles: i32, elapsed_ms: u32) -> Step {
        let Some((tile, _)) = self.live_target(target) else {
            return Step::Fail;
        };
        if self.near(tile, distance_tiles) {
            self.ped.movement.clear_destination();
            return Step::Continue;
        }
        if self.chase(tile, false, elapsed_ms) { Step::Continue } else { Step::Fail }
    }

    fn step_follow_to_shoot(&mut self, target: PedId, elapsed_ms: u32) -> Step {
        let (Some((tile, point)), Some(range)) = (self.live_target(target), self.weapon_range()) else {
            return Step::Fail;
        };
        if self.near(tile, range) {
            self.ped.movement.clear_destination();
            self.face(point);
            return Step::Succeed;
        }
        if self.chase(tile, true, elapsed_ms) { Step::Continue } else { Step::Fail }
    }

    fn step_shoot(&mut self, target: FireTarget) -> Step {
        let Some(range) = self.weapon_range() else {
            return Step::Fail;
        };
        let Some((tile, point)) = self.fire_point(target) else {
            // A ped target that is gone has been dealt with.
            return if matches!(target, FireTarget::Ped(_)) { Step::Succeed } else { Step::Fail };
        };
        if !self.near(tile, range) {
            return Step::Fail;
        }
        self.face(point);
        self.fire_request = Some(target);
        Step::Continue
    }

    fn step_enter_vehicle(&mut self, vehicle: VehicleId, elapsed_ms: u32) -> Step {
        let Some(v) = self.vehicles.get(vehicle).filter(|v| v.has_room()) else {
            return Step::Fail;
        };
        let at = v.position;
        if !self.near(at, 1) {
            return if self.chase(at, false, elapsed_ms) { Step::Continue } else { Step::Fail };
        }
        let Some(v) = self.vehicles.get_mut(vehicle) else {
            return Step::Fail;
        };
        if !v.add_passenger(self.ped.id) {
            return Step::Fail;
        }
        debug!("{} boards {}", self.ped.id, vehicle);
        self.ped.movement.clear_destination();
        self.ped.vehicle = Some(vehicle);
        self.ped.position = at;
        Step::Succeed
    }

    fn step_drive(&mut self, vehicle: VehicleId, dest: TilePoint, elapsed_ms: u32) -> Step {
        if !self.may_drive(vehicle) {
            return Step::Fail;
        }
        let Some(v) = self.vehicles.get_mut(vehicle) else {
            return Step::Fail;
        };
        self.mover.follow_path(&mut v.movement, &mut v.position, elapsed_ms);
        self.ped.position = v.position;
        self.ped.direction = v.movement.heading;
        if v.movement.has_path() {
            Step::Continue
        } else if v.position.tile_eq(&dest) {
            Step::Succeed
        } else {
            Step::Fail
        }
    }

    fn pick_up(&mut self, weapon: WeaponId) -> Step {
        if !self.ground_here(weapon) {
            return Step::Fail;
        }
        if let Some(w) = self.weapons.get_mut(weapon) {
            w.placement = WeaponPlacement::Carried(self.ped.id);
            self.ped.weapons.push(weapon);
        }
        Step::Succeed
    }

    fn drop_weapon(&mut self, weapon: WeaponId) -> Step {
        if !self.carries(weapon) {
            return Step::Fail;
        }
        self.ped.weapons.retain(|&w| w != weapon);
        if self.ped.selected == Some(weapon) {
            self.ped.selected = None;
        }
        if let Some(w) = self.weapons.get_mut(weapon) {
            w.placement = WeaponPlacement::Ground(self.ped.position);
        }
        Step::Succeed
    }
}

/// Count `elapsed` into a timer field and report whether it ran out.
fn count(timer: &mut u32, elapsed_ms: u32, duration_ms: u32) -> bool {
    *timer = timer.saturating_add(elapsed_ms);
    *timer >= duration_ms
}

impl<R: Router> ActionHost for PedHost<'_, R> {
    fn in_vehicle(&self) -> bool {
        self.ped.in_vehicle()
    }

    fn do_start(&mut self, action: &mut Action) -> bool {
        match action.kind {
            ActionKind::Walk { dest, run } => self.walk_to(dest, run),
            ActionKind::WalkToDirection { heading, max_distance, target, bounce, safe_walk, run } => {
                self.start_dir_walk(heading, max_distance, target, bounce, safe_walk, run);
                true
            }
            ActionKind::Follow { target, .. } | ActionKind::WaitBeforeShooting { target, .. } => {
                self.live_target(target).is_some()
            }
            ActionKind::FollowToShoot { target } => {
                self.live_target(target).is_some() && self.weapon_range().is_some()
            }
            ActionKind::Shoot { .. } => self.weapon_range().is_some(),
            ActionKind::Fire { target, .. } => self.start_fire(target),
            ActionKind::PickUp { weapon } => self.ground_here(weapon),
            ActionKind::Drop { weapon } => self.carries(weapon),
            ActionKind::EnterVehicle { vehicle } => {
                !self.ped.in_vehicle() && self.vehicles.get(vehicle).is_some_and(|v| v.has_room())
            }
            ActionKind::Drive { vehicle, dest } => {
                if !self.may_drive(vehicle) {
                    return false;
                }
                let speed = self.config.run_speed;
                let Some(v) = self.vehicles.get_mut(vehicle) else {
                    return false;
                };
                let pos = v.position;
                self.mover.init_movement_to_destination(self.map, &mut v.movement, &pos, dest, speed)
            }
            ActionKind::Hit { .. } => {
                self.ped.movement.clear_destination();
                true
            }
            ActionKind::Wait { .. } | ActionKind::Reset { .. } | ActionKind::ReplaceCurrent { .. } => true,
        }
    }

    fn do_execute(&mut self, action: &mut Action, elapsed_ms: u32) {
        let step = match &mut action.kind {
            ActionKind::Walk { dest, run } => self.step_walk(*dest, *run, elapsed_ms),
            ActionKind::WalkToDirection { heading, max_distance, target, bounce, safe_walk, run } => {
                if self.ped.movement.dir_move.is_none() {
                    self.start_dir_walk(*heading, *max_distance, *target, *bounce, *safe_walk, *run);
                }
                let outcome =
                    self.mover.move_to_dir(self.map, &mut self.ped.movement, &mut self.ped.position, elapsed_ms);
                self.ped.direction = self.ped.movement.heading;
                if outcome.finished {
                    Step::Succeed
                } else if outcome.blocked {
                    Step::Fail
                } else {
                    Step::Continue
                }
            }
            ActionKind::Follow { target, distance_tiles } => {
                self.step_follow(*target, *distance_tiles, elapsed_ms)
            }
            ActionKind::FollowToShoot { target } => self.step_follow_to_shoot(*target, elapsed_ms),
            ActionKind::Wait { duration_ms, elapsed_ms: timer } => {
                if count(timer, elapsed_ms, *duration_ms) { Step::Succeed } else { Step::WaitForTime }
            }
            ActionKind::WaitBeforeShooting { target, duration_ms, elapsed_ms: timer } => {
                match self.live_target(*target) {
                    None => Step::Fail,
                    Some((_, point)) => {
                        self.face(point);
                        if count(timer, elapsed_ms, *duration_ms) { Step::Succeed } else { Step::WaitForTime }
                    }
                }
            }
            ActionKind::Shoot { target } => self.step_shoot(*target),
            ActionKind::Fire { elapsed_ms: timer, .. } => {
                let interval = self
                    .ped
                    .selected
                    .and_then(|w| self.weapons.get(w))
                    .map_or(0, |w| w.class.stats().shot_interval_ms);
                if count(timer, elapsed_ms, interval) { Step::Succeed } else { Step::WaitForAnim }
            }
            ActionKind::PickUp { weapon } => self.pick_up(*weapon),
            ActionKind::Drop { weapon } => self.drop_weapon(*weapon),
            ActionKind::EnterVehicle { vehicle } => self.step_enter_vehicle(*vehicle, elapsed_ms),
            ActionKind::Drive { vehicle, dest } => self.step_drive(*vehicle, *dest, elapsed_ms),
            ActionKind::Hit { kind, elapsed_ms: timer } => {
                if count(timer, elapsed_ms, kind.duration_ms()) { Step::Succeed } else { Step::WaitForAnim }
            }
            ActionKind::Reset { .. } | ActionKind::ReplaceCurrent { .. } => Step::Succeed,
        };
        match step {
            Step::Continue => {}
            Step::WaitForAnim => action.set_status(ActionStatus::WaitForAnim),
            Step::WaitForTime => action.set_status(ActionStatus::WaitForTime),
            Step::Succeed => action.succeed(),
            Step::Fail => action.fail(),
        }
    }

    fn enter_state(&mut self, action: &Action) {
        let state = match action.kind {
            ActionKind::Walk { run: true, .. }
            | ActionKind::WalkToDirection { run: true, .. }
            | ActionKind::FollowToShoot { .. } => PedState::Running,
            ActionKind::Walk { .. }
            | ActionKind::WalkToDirection { .. }
            | ActionKind::Follow { .. }
            | ActionKind::EnterVehicle { .. } => PedState::Walking,
            ActionKind::Fire { .. } => PedState::Firing,
            ActionKind::Hit { .. } => PedState::Hit,
            ActionKind::PickUp { .. } => PedState::PickingUp,
            ActionKind::Drop { .. } => PedState::Dropping,
            ActionKind::Drive { .. } => PedState::InVehicle,
            _ => return,
        };
        self.ped.state = state;
    }

    fn leave_state(&mut self, _action: &Action) {
        if self.ped.is_alive() {
            self.ped.state = if self.ped.in_vehicle() { PedState::InVehicle } else { PedState::Standing };
        }
    }
}
