//! Shots fired during a frame and how they land.

use log::{debug, info};

use sq_action::{Action, ActionKind, FireTarget, HitKind};
use sq_agent::{PedState, WeaponClass, WeaponPlacement};
use sq_behavior::BehaviourEvent;
use sq_core::{PedId, TilePoint, VehicleId};
use sq_spatial::Router;

use crate::{Death, Mission};

/// Hit probability beyond half range.  Closer shots always land.
pub const LONG_RANGE_ACCURACY: f64 = 0.75;

/// One volley, rolled at fire time and resolved after every ped has acted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shot {
    pub shooter: PedId,
    pub target:  FireTarget,
    pub class:   WeaponClass,
    /// Whether an aimed shot connects.  Area shots ignore it.
    pub hit:     bool,
}

/// Chance that a shot at `distance` tiles lands for a weapon reaching
/// `range` tiles.
pub fn hit_chance(distance: i32, range: i32) -> f64 {
    if distance * 2 <= range { 1.0 } else { LONG_RANGE_ACCURACY }
}

impl<R: Router> Mission<R> {
    /// Apply every shot queued this frame, in firing order.
    pub(crate) fn resolve_shots(&mut self) -> Vec<Death> {
        let mut deaths = Vec::new();
        for shot in std::mem::take(&mut self.shots) {
            let stats = shot.class.stats();
            match shot.target {
                FireTarget::Ped(target) => {
                    if !shot.hit {
                        debug!("{} misses {}", shot.shooter, target);
                        continue;
                    }
                    match self.peds.get(target).and_then(|p| p.vehicle) {
                        Some(vehicle) => self.damage_vehicle(vehicle, stats.damage),
                        None => {
                            self.damage_ped(target, Some(shot.shooter), stats.hit_kind, stats.damage, &mut deaths)
                        }
                    }
                }
                FireTarget::Point(point) => {
                    let tile = point.to_tile();
                    let victims: Vec<PedId> = self
                        .peds
                        .alive()
                        .filter(|p| p.id != shot.shooter && !p.in_vehicle() && p.position.tile_eq(&tile))
                        .map(|p| p.id)
                        .collect();
                    for victim in victims {
                        self.damage_ped(victim, Some(shot.shooter), stats.hit_kind, stats.damage, &mut deaths);
                    }
                    let wrecks: Vec<VehicleId> = self
                        .vehicles
                        .vehicles
                        .iter()
                        .filter(|v| !v.is_destroyed() && v.position.tile_eq(&tile))
                        .map(|v| v.id)
                        .collect();
                    for vehicle in wrecks {
                        self.damage_vehicle(vehicle, stats.damage);
                    }
                }
            }
        }
        deaths
    }

    /// Hurt one ped.  A survivor plays a hit reaction and hears about it; a
    /// casualty drops what it carried where it fell.
    pub(crate) fn damage_ped(
        &mut self,
        target: PedId,
        by:     Option<PedId>,
        kind:   HitKind,
        damage: i32,
        deaths: &mut Vec<Death>,
    ) {
        let Some(ped) = self.peds.get_mut(target) else {
            return;
        };
        if !ped.is_alive() {
            return;
        }
        if ped.take_damage(damage) {
            info!("{target} killed by {}", by.map_or_else(|| "the environment".to_owned(), |p| p.to_string()));
            let at = ped.position;
            let dropped = std::mem::take(&mut ped.weapons);
            ped.selected = None;
            let vehicle = ped.vehicle.take();
            for weapon in dropped {
                if let Some(w) = self.weapons.get_mut(weapon) {
                    w.placement = WeaponPlacement::Ground(at);
                }
            }
            if let Some(v) = vehicle.and_then(|v| self.vehicles.get_mut(v)) {
                v.remove_passenger(target);
            }
            deaths.push(Death { ped: target, killer: by });
            return;
        }
        ped.actions.insert_priority(Action::new(ActionKind::Hit { kind, elapsed_ms: 0 }));
        self.queue_event(target, BehaviourEvent::Hit { by, kind, damage });
    }

    /// Hurt a vehicle; a wreck throws out everyone aboard.
    pub(crate) fn damage_vehicle(&mut self, id: VehicleId, damage: i32) {
        let Some(vehicle) = self.vehicles.get_mut(id) else {
            return;
        };
        if !vehicle.take_damage(damage) {
            return;
        }
        info!("{id} destroyed");
        let at = vehicle.position;
        let riders = std::mem::take(&mut vehicle.passengers);
        for rider in riders {
            self.eject(rider, id, at);
        }
    }

    fn eject(&mut self, rider: PedId, vehicle: VehicleId, at: TilePoint) {
        let Some(ped) = self.peds.get_mut(rider) else {
            return;
        };
        ped.vehicle = None;
        ped.position = at;
        ped.movement.clear_destination();
        if ped.is_alive() {
            ped.state = PedState::Standing;
        }
        self.queue_event(rider, BehaviourEvent::EjectedFromVehicle { vehicle });
    }
}
