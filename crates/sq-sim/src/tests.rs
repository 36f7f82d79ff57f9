//! Integration-style tests for sq-sim: whole missions on small maps.

use sq_action::{Action, ActionKind, ChainKind, FireTarget};
use sq_agent::{PedBuilder, PedKind, WeaponClass};
use sq_behavior::BehaviourEvent;
use sq_core::{MapSize, PedId, SimConfig, Tick, TilePoint, VehicleId};
use sq_spatial::{TileGrid, TileKind};

use crate::{Death, MissionBuilder, NoopObserver, Sim, SimObserver, TickReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config() -> SimConfig {
    SimConfig { total_ticks: 10, seed: 11, ..SimConfig::default() }
}

fn open_floor(w: i32, h: i32) -> TileGrid {
    let mut g = TileGrid::new(MapSize::new(w, h, 1));
    g.fill((0, 0, 0), (w - 1, h - 1, 0), TileKind::Floor).unwrap();
    g
}

/// Open floor split by a solid column at `x = wall`.
fn walled(w: i32, h: i32, wall: i32) -> TileGrid {
    let mut g = open_floor(w, h);
    g.fill((wall, 0, 0), (wall, h - 1, 0), TileKind::Solid).unwrap();
    g
}

fn at(kind: PedKind, x: i32, y: i32) -> PedBuilder {
    PedBuilder::new(kind).at(TilePoint::tile(x, y, 0))
}

fn tile(x: i32, y: i32) -> TilePoint {
    TilePoint::tile(x, y, 0)
}

fn step(sim: &mut Sim, frames: u64) {
    sim.run_ticks(frames, &mut NoopObserver);
}

#[derive(Default)]
struct Recorder {
    starts: u64,
    ends:   u64,
    deaths: Vec<Death>,
    last:   Option<TickReport>,
    done:   Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }

    fn on_ped_died(&mut self, _tick: Tick, death: &Death) {
        self.deaths.push(*death);
    }

    fn on_tick_end(&mut self, _tick: Tick, report: &TickReport) {
        self.ends += 1;
        self.last = Some(report.clone());
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.done = Some(final_tick);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use crate::SimError;

    #[test]
    fn ids_follow_insertion_order() {
        let sim = MissionBuilder::new(config(), open_floor(6, 6))
            .ped(at(PedKind::Agent, 1, 1))
            .ped(at(PedKind::Guard, 4, 4))
            .vehicle(tile(2, 2), 4, 10)
            .ground_weapon(WeaponClass::Uzi, tile(3, 3))
            .build()
            .unwrap();
        let m = &sim.mission;
        assert_eq!(m.peds.len(), 2);
        assert_eq!(m.ped(PedId(1)).unwrap().kind, PedKind::Guard);
        assert_eq!(m.behaviours.len(), 2);
        assert_eq!(m.behaviour(PedId(1)).unwrap().names(), vec!["persuadable", "hostile"]);
        assert_eq!(m.vehicles.len(), 1);
        assert_eq!(m.weapons.on_ground().count(), 1);
    }

    #[test]
    fn patrol_loops_its_waypoints() {
        let sim = MissionBuilder::new(config(), open_floor(6, 6))
            .patrol(at(PedKind::Guard, 1, 1), vec![tile(4, 1), tile(4, 4)])
            .build()
            .unwrap();
        let names: Vec<_> =
            sim.mission.peds.get(PedId(0)).unwrap().actions.iter(ChainKind::Default).map(|(_, a)| a.kind.name()).collect();
        assert_eq!(names, vec!["walk", "walk", "reset"]);
    }

    #[test]
    fn spawn_on_solid_tile_is_rejected() {
        let err = MissionBuilder::new(config(), walled(6, 3, 2)).ped(at(PedKind::Agent, 2, 1)).build();
        assert!(matches!(err, Err(SimError::Mobility(_))));
    }

    #[test]
    fn bad_config_is_rejected() {
        let cfg = SimConfig { frame_ms: 0, ..config() };
        let err = MissionBuilder::new(cfg, open_floor(2, 2)).build();
        assert!(matches!(err, Err(SimError::Core(sq_core::CoreError::Config(_)))));
    }
}

// ── Orders and movement ───────────────────────────────────────────────────────

#[cfg(test)]
mod orders {
    use super::*;
    use crate::SimError;

    #[test]
    fn walk_order_arrives() {
        let mut sim = MissionBuilder::new(config(), open_floor(8, 8)).ped(at(PedKind::Agent, 1, 1)).build().unwrap();
        let id = PedId(0);
        sim.mission.order(id, Action::new(ActionKind::Walk { dest: tile(5, 1), run: false }), false).unwrap();

        // Four tiles at 256 units/s take 80 frames of 50 ms.
        step(&mut sim, 100);
        let ped = sim.mission.ped(id).unwrap();
        assert_eq!(ped.position, tile(5, 1));
        assert!(ped.actions.iter(ChainKind::Current).next().is_none());
    }

    #[test]
    fn unreachable_walk_fails_and_reports() {
        let mut sim =
            MissionBuilder::new(config(), walled(8, 3, 4)).ped(at(PedKind::Agent, 1, 1)).build().unwrap();
        let id = PedId(0);
        let walk = Action::new(ActionKind::Walk { dest: tile(6, 1), run: false }).notify();
        sim.mission.order(id, walk, false).unwrap();

        step(&mut sim, 1);
        assert_eq!(sim.mission.ped(id).unwrap().position, tile(1, 1));
        assert!(sim.mission.pending_events(id).iter().any(|e| matches!(
            e,
            BehaviourEvent::ActionEnded { kind: ActionKind::Walk { .. }, succeeded: false }
        )));
    }

    #[test]
    fn destroyed_wall_opens_a_route() {
        let mut sim =
            MissionBuilder::new(config(), walled(8, 3, 4)).ped(at(PedKind::Agent, 1, 1)).build().unwrap();
        let id = PedId(0);
        assert!(!sim.mission.init_movement_to_destination(id, tile(6, 1), 256).unwrap());

        sim.mission.destroy_tile(tile(4, 1), TileKind::Floor).unwrap();
        assert!(sim.mission.init_movement_to_destination(id, tile(6, 1), 256).unwrap());
        assert!(sim.mission.ped(id).unwrap().movement.has_path());
    }

    #[test]
    fn cancelled_order_leaves_the_chain() {
        let mut sim = MissionBuilder::new(config(), open_floor(8, 8)).ped(at(PedKind::Agent, 1, 1)).build().unwrap();
        let id = PedId(0);
        let first = sim.mission.order(id, Action::new(ActionKind::Walk { dest: tile(5, 1), run: false }), false).unwrap();
        sim.mission.order(id, Action::new(ActionKind::Walk { dest: tile(5, 5), run: false }), true).unwrap();

        let removed = sim.mission.cancel_action(id, first).unwrap();
        assert_eq!(removed.kind, ActionKind::Walk { dest: tile(5, 1), run: false });
        assert_eq!(sim.mission.ped(id).unwrap().actions.chain_len(ChainKind::Current), 1);
        assert!(matches!(sim.mission.cancel_action(id, first), Err(SimError::Action(_))));
    }

    #[test]
    fn weapon_selection_is_checked() {
        let mut sim = MissionBuilder::new(config(), open_floor(4, 4))
            .ped(at(PedKind::Agent, 1, 1).weapon(WeaponClass::Pistol))
            .ped(at(PedKind::Agent, 2, 2).weapon(WeaponClass::Uzi))
            .build()
            .unwrap();
        let own = sim.mission.ped(PedId(0)).unwrap().weapons[0];
        let other = sim.mission.ped(PedId(1)).unwrap().weapons[0];

        sim.mission.select_weapon(PedId(0), Some(own)).unwrap();
        assert_eq!(sim.mission.ped(PedId(0)).unwrap().selected, Some(own));
        assert!(matches!(
            sim.mission.select_weapon(PedId(0), Some(other)),
            Err(SimError::WeaponNotCarried { .. })
        ));
        assert!(matches!(
            sim.mission.select_weapon(PedId(9), None),
            Err(SimError::Core(sq_core::CoreError::PedNotFound(PedId(9))))
        ));
    }
}

// ── Combat ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod combat {
    use super::*;
    use crate::hit_chance;

    #[test]
    fn close_shots_always_land() {
        assert_eq!(hit_chance(2, 5), 1.0);
        assert_eq!(hit_chance(3, 6), 1.0);
        assert!(hit_chance(3, 5) < 1.0);
    }

    #[test]
    fn shot_kills_and_reports_death() {
        let mut sim = MissionBuilder::new(config(), open_floor(8, 4))
            .ped(at(PedKind::Agent, 1, 1).weapon(WeaponClass::Pistol).drawn())
            .ped(at(PedKind::Civilian, 3, 1).health(1))
            .build()
            .unwrap();
        let (agent, civ) = (PedId(0), PedId(1));
        sim.mission.order(agent, Action::new(ActionKind::Shoot { target: FireTarget::Ped(civ) }), false).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(1, &mut rec);
        assert_eq!(rec.deaths, vec![Death { ped: civ, killer: Some(agent) }]);
        assert_eq!(rec.last.as_ref().unwrap().alive, 1);
        assert!(!sim.mission.ped(civ).unwrap().is_alive());

        let weapon = sim.mission.ped(agent).unwrap().weapons[0];
        let ammo = sim.mission.weapons.get(weapon).unwrap().ammo;
        assert_eq!(ammo, WeaponClass::Pistol.stats().max_ammo - 1);

        // The target is gone, so the order is done.
        step(&mut sim, 1);
        assert!(sim.mission.ped(agent).unwrap().actions.iter(ChainKind::Current).next().is_none());
    }

    #[test]
    fn survivor_plays_hit_and_hears_about_it() {
        let mut sim = MissionBuilder::new(config(), open_floor(8, 4))
            .ped(at(PedKind::Agent, 1, 1).weapon(WeaponClass::Pistol).drawn())
            .ped(at(PedKind::Civilian, 3, 1))
            .build()
            .unwrap();
        let (agent, civ) = (PedId(0), PedId(1));
        sim.mission.order(agent, Action::new(ActionKind::Shoot { target: FireTarget::Ped(civ) }), false).unwrap();

        step(&mut sim, 1);
        let ped = sim.mission.ped(civ).unwrap();
        assert_eq!(ped.health, ped.max_health - 1);
        assert_eq!(ped.actions.active_action().map(|a| a.kind.name()), Some("hit"));
        assert!(sim.mission.pending_events(civ).contains(&BehaviourEvent::Hit {
            by:     Some(agent),
            kind:   WeaponClass::Pistol.stats().hit_kind,
            damage: 1,
        }));
    }

    #[test]
    fn the_dead_drop_their_weapons() {
        let mut sim = MissionBuilder::new(config(), open_floor(8, 4))
            .ped(at(PedKind::Agent, 1, 1).weapon(WeaponClass::Pistol).drawn())
            .ped_with(at(PedKind::Guard, 3, 1).health(1).weapon(WeaponClass::Uzi), sq_behavior::ComponentSet::Civilian)
            .build()
            .unwrap();
        sim.mission
            .order(PedId(0), Action::new(ActionKind::Shoot { target: FireTarget::Ped(PedId(1)) }), false)
            .unwrap();
        step(&mut sim, 1);

        let dropped: Vec<_> = sim.mission.weapons.on_ground().map(|(w, t)| (w.class, t)).collect();
        assert_eq!(dropped, vec![(WeaponClass::Uzi, tile(3, 1))]);
        assert!(sim.mission.ped(PedId(1)).unwrap().weapons.is_empty());
    }

    #[test]
    fn guards_open_fire_on_agents() {
        let mut sim = MissionBuilder::new(config(), open_floor(8, 4))
            .ped(at(PedKind::Guard, 2, 2).weapon(WeaponClass::Pistol))
            .ped(at(PedKind::Agent, 5, 2))
            .build()
            .unwrap();
        let (guard, agent) = (PedId(0), PedId(1));
        let pistol = sim.mission.ped(guard).unwrap().weapons[0];
        let full = WeaponClass::Pistol.stats().max_ammo;

        step(&mut sim, 40);
        assert_eq!(sim.mission.ped(guard).unwrap().selected, Some(pistol));
        assert!(sim.mission.weapons.get(pistol).unwrap().ammo < full);

        // Thirteen rounds at 600 ms each are long gone by now.
        step(&mut sim, 160);
        let a = sim.mission.ped(agent).unwrap();
        assert!(a.health < a.max_health);
        let g = sim.mission.ped(guard).unwrap();
        assert_eq!(sim.mission.weapons.get(pistol).unwrap().ammo, 0);
        assert_eq!(g.selected, None, "out of ammo, holstered");
        assert_eq!(g.actions.source(), ChainKind::Default);
    }
}

// ── Behaviour wiring ──────────────────────────────────────────────────────────

#[cfg(test)]
mod reactions {
    use super::*;
    use sq_agent::Side;

    #[test]
    fn drawn_weapon_makes_civilians_run() {
        let mut sim = MissionBuilder::new(config(), open_floor(14, 5))
            .ped(at(PedKind::Agent, 2, 2).weapon(WeaponClass::Pistol))
            .ped(at(PedKind::Civilian, 4, 2))
            .build()
            .unwrap();
        let (agent, civ) = (PedId(0), PedId(1));
        let pistol = sim.mission.ped(agent).unwrap().weapons[0];
        sim.mission.select_weapon(agent, Some(pistol)).unwrap();

        step(&mut sim, 1);
        assert!(sim.mission.pending_events(civ).contains(&BehaviourEvent::WeaponOut { by: agent }));
        assert!(sim.mission.pending_events(agent).is_empty(), "no echo to the one who drew");

        let start = sim.mission.ped(civ).unwrap().position.to_world();
        step(&mut sim, 20);
        let now = sim.mission.ped(civ).unwrap().position.to_world();
        assert!(now.x > start.x, "civilian ran away from the gun");
    }

    #[test]
    fn flight_starts_once_the_hit_reaction_ends() {
        let mut sim = MissionBuilder::new(config(), open_floor(14, 5))
            .ped(at(PedKind::Agent, 2, 2).weapon(WeaponClass::Pistol))
            .ped(at(PedKind::Civilian, 4, 2))
            .build()
            .unwrap();
        let (agent, civ) = (PedId(0), PedId(1));
        let pistol = sim.mission.ped(agent).unwrap().weapons[0];
        sim.mission.select_weapon(agent, Some(pistol)).unwrap();
        step(&mut sim, 1);

        let mut deaths = Vec::new();
        sim.mission.damage_ped(civ, Some(agent), sq_action::HitKind::Bullet, 1, &mut deaths);
        assert!(deaths.is_empty());
        let start = sim.mission.ped(civ).unwrap().position.to_world();

        // Events land, the hit starts, and panic asks for the alt chain
        // while the hit is still playing.
        step(&mut sim, 2);
        let ped = sim.mission.ped(civ).unwrap();
        assert_eq!(ped.actions.active_action().map(|a| a.kind.name()), Some("hit"));
        assert_eq!(ped.actions.pending_source(), Some(ChainKind::Alt));

        // 200 ms of hit, then the flight takes over well before the next scout.
        step(&mut sim, 6);
        let ped = sim.mission.ped(civ).unwrap();
        assert_eq!(ped.actions.source(), ChainKind::Alt);
        assert_eq!(ped.actions.pending_source(), None);
        assert!(ped.position.to_world().x > start.x, "civilian ran once the hit was over");
    }

    #[test]
    fn holstering_is_announced() {
        let mut sim = MissionBuilder::new(config(), open_floor(6, 6))
            .ped(at(PedKind::Agent, 1, 1).weapon(WeaponClass::Pistol).drawn())
            .ped(at(PedKind::Civilian, 4, 4))
            .build()
            .unwrap();
        step(&mut sim, 2);
        sim.mission.select_weapon(PedId(0), None).unwrap();
        step(&mut sim, 1);
        assert!(sim.mission.pending_events(PedId(1)).contains(&BehaviourEvent::WeaponCleared { by: PedId(0) }));
    }

    #[test]
    fn persuadotron_brings_civilians_over() {
        let mut sim = MissionBuilder::new(config(), open_floor(8, 5))
            .ped(at(PedKind::Agent, 2, 2).weapon(WeaponClass::Persuadotron).drawn())
            .ped(at(PedKind::Civilian, 3, 2))
            .build()
            .unwrap();
        let (agent, civ) = (PedId(0), PedId(1));

        // Announce, deliver, persuade.
        step(&mut sim, 3);
        let ped = sim.mission.ped(civ).unwrap();
        assert_eq!(ped.side, Side::Player);
        assert_eq!(ped.persuaded_by, Some(agent));
        assert!(sim.mission.behaviour(civ).unwrap().names().contains(&"persuaded"));
    }

    #[test]
    fn immediate_event_delivery() {
        let mut sim = MissionBuilder::new(config(), open_floor(8, 5))
            .ped(at(PedKind::Agent, 2, 2).weapon(WeaponClass::Persuadotron).drawn())
            .ped(at(PedKind::Civilian, 3, 2))
            .build()
            .unwrap();
        sim.mission.handle_behaviour_event(PedId(1), BehaviourEvent::PersuadotronActivated { by: PedId(0) }).unwrap();
        step(&mut sim, 1);
        assert_eq!(sim.mission.ped(PedId(1)).unwrap().side, Side::Player);
    }
}

// ── Vehicles ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod vehicles {
    use super::*;

    #[test]
    fn board_drive_and_get_thrown_out() {
        let mut sim = MissionBuilder::new(config(), open_floor(10, 4))
            .ped(at(PedKind::Agent, 1, 1))
            .vehicle(tile(2, 1), 2, 10)
            .build()
            .unwrap();
        let (id, car) = (PedId(0), VehicleId(0));
        sim.mission.order(id, Action::new(ActionKind::EnterVehicle { vehicle: car }), false).unwrap();
        sim.mission.order(id, Action::new(ActionKind::Drive { vehicle: car, dest: tile(7, 1) }), true).unwrap();

        step(&mut sim, 1);
        assert_eq!(sim.mission.ped(id).unwrap().vehicle, Some(car));
        assert_eq!(sim.mission.vehicles.get(car).unwrap().driver(), Some(id));

        // Five tiles at run speed take 50 frames.
        step(&mut sim, 70);
        let v = sim.mission.vehicles.get(car).unwrap().position;
        assert_eq!(v, tile(7, 1));
        assert_eq!(sim.mission.ped(id).unwrap().position, v);

        sim.mission.damage_vehicle(car, 100);
        let ped = sim.mission.ped(id).unwrap();
        assert_eq!(ped.vehicle, None);
        assert!(sim.mission.vehicles.get(car).unwrap().passengers.is_empty());
        assert!(sim.mission.pending_events(id).contains(&BehaviourEvent::EjectedFromVehicle { vehicle: car }));
    }

    #[test]
    fn walking_orders_fail_inside_a_vehicle() {
        let mut sim = MissionBuilder::new(config(), open_floor(10, 4))
            .ped(at(PedKind::Agent, 1, 1))
            .vehicle(tile(1, 2), 2, 10)
            .build()
            .unwrap();
        let id = PedId(0);
        sim.mission.order(id, Action::new(ActionKind::EnterVehicle { vehicle: VehicleId(0) }), false).unwrap();
        step(&mut sim, 1);

        let walk = Action::new(ActionKind::Walk { dest: tile(5, 1), run: false }).notify();
        sim.mission.order(id, walk, false).unwrap();
        step(&mut sim, 1);
        assert!(sim.mission.pending_events(id).iter().any(|e| matches!(
            e,
            BehaviourEvent::ActionEnded { kind: ActionKind::Walk { .. }, succeeded: false }
        )));
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod frame_loop {
    use super::*;

    #[test]
    fn run_stops_at_total_ticks() {
        let mut sim = MissionBuilder::new(config(), open_floor(4, 4)).ped(at(PedKind::Agent, 1, 1)).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec);
        assert_eq!((rec.starts, rec.ends), (10, 10));
        assert_eq!(rec.done, Some(Tick(10)));
        assert_eq!(sim.clock.current_tick, Tick(10));
        assert_eq!(sim.clock.elapsed_ms, 500);

        // Already at the end: nothing more happens.
        sim.run(&mut rec);
        assert_eq!(rec.starts, 10);
    }

    #[test]
    fn same_seed_same_mission() {
        let build = || {
            MissionBuilder::new(SimConfig { total_ticks: 300, ..config() }, open_floor(10, 6))
                .ped(at(PedKind::Guard, 2, 2).weapon(WeaponClass::Uzi))
                .ped(at(PedKind::Agent, 6, 3))
                .ped(at(PedKind::Civilian, 4, 4))
                .build()
                .unwrap()
        };
        let (mut a, mut b) = (build(), build());
        a.run(&mut NoopObserver);
        b.run(&mut NoopObserver);
        for i in 0..3 {
            let (pa, pb) = (a.mission.ped(PedId(i)).unwrap(), b.mission.ped(PedId(i)).unwrap());
            assert_eq!((pa.position, pa.health), (pb.position, pb.health));
        }
    }
}
