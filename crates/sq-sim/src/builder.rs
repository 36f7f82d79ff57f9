//! Fluent builder for constructing a mission and its [`Sim`].

use log::info;

use sq_action::{Action, ActionKind, ChainKind};
use sq_agent::{PedBuilder, WeaponClass, WeaponPlacement};
use sq_behavior::{Behaviour, ComponentSet};
use sq_core::{SimConfig, TilePoint};
use sq_mobility::Mover;
use sq_spatial::{ConnectivityMap, FloodRouter, Router, TileGrid};

use crate::{Mission, Sim, SimResult};

struct PedSpec {
    builder:    PedBuilder,
    components: Option<ComponentSet>,
    patrol:     Vec<TilePoint>,
}

struct VehicleSpec {
    at:       TilePoint,
    capacity: usize,
    health:   i32,
}

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: frame length, run length, seed, behaviour timings
/// - [`TileGrid`]: the map; its connectivity is computed at build time
///
/// # Optional inputs
///
/// | Method                    | Default                               |
/// |---------------------------|---------------------------------------|
/// | `.with_router(r)`         | [`FloodRouter`]                       |
/// | `.ped_with(b, set)`       | `.ped(b)` uses the kind's standard set |
/// | `.patrol(b, waypoints)`   | No scripted routine                   |
///
/// Peds get ids in the order they are added.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = MissionBuilder::new(config, grid)
///     .ped(PedBuilder::new(PedKind::Agent).at(TilePoint::tile(1, 1, 0)))
///     .patrol(PedBuilder::new(PedKind::Guard), vec![a, b])
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct MissionBuilder<R: Router = FloodRouter> {
    config:   SimConfig,
    grid:     TileGrid,
    router:   R,
    peds:     Vec<PedSpec>,
    vehicles: Vec<VehicleSpec>,
    ground:   Vec<(WeaponClass, TilePoint)>,
}

impl MissionBuilder<FloodRouter> {
    pub fn new(config: SimConfig, grid: TileGrid) -> Self {
        Self {
            config,
            grid,
            router:   FloodRouter,
            peds:     Vec::new(),
            vehicles: Vec::new(),
            ground:   Vec::new(),
        }
    }
}

impl<R: Router> MissionBuilder<R> {
    /// Swap the routing algorithm.
    pub fn with_router<R2: Router>(self, router: R2) -> MissionBuilder<R2> {
        MissionBuilder {
            config:   self.config,
            grid:     self.grid,
            router,
            peds:     self.peds,
            vehicles: self.vehicles,
            ground:   self.ground,
        }
    }

    /// Add a ped with its kind's standard behaviour.
    pub fn ped(mut self, builder: PedBuilder) -> Self {
        self.peds.push(PedSpec { builder, components: None, patrol: Vec::new() });
        self
    }

    /// Add a ped with an explicit behaviour set.
    pub fn ped_with(mut self, builder: PedBuilder, components: ComponentSet) -> Self {
        self.peds.push(PedSpec { builder, components: Some(components), patrol: Vec::new() });
        self
    }

    /// Add a ped that walks `waypoints` in a loop as its default routine.
    pub fn patrol(mut self, builder: PedBuilder, waypoints: Vec<TilePoint>) -> Self {
        self.peds.push(PedSpec { builder, components: None, patrol: waypoints });
        self
    }

    pub fn vehicle(mut self, at: TilePoint, capacity: usize, health: i32) -> Self {
        self.vehicles.push(VehicleSpec { at, capacity, health });
        self
    }

    /// Leave a loaded weapon lying on a tile.
    pub fn ground_weapon(mut self, class: WeaponClass, at: TilePoint) -> Self {
        self.ground.push((class, at));
        self
    }

    /// Validate inputs, compute connectivity, place everything, and return
    /// a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;

        let map = ConnectivityMap::build(&self.grid);
        let seed = self.config.seed;
        let mut mission = Mission::new(self.config, self.grid, map, Mover::new(self.router));

        for spec in self.peds {
            let id = spec.builder.spawn(&mut mission.peds, &mut mission.weapons, seed);
            let Some(ped) = mission.peds.get_mut(id) else {
                continue;
            };
            ped.position = mission.mover.place(&mission.map, ped.position)?;
            for dest in &spec.patrol {
                ped.actions.add_to_default(Action::new(ActionKind::Walk { dest: *dest, run: false }).scripted());
            }
            if !spec.patrol.is_empty() {
                ped.actions.add_to_default(Action::new(ActionKind::Reset { chain: ChainKind::Default }).scripted());
            }
            let set = spec.components.unwrap_or_else(|| ComponentSet::for_kind(ped.kind));
            mission.behaviours.push(Behaviour::from_set(set));
        }

        for spec in self.vehicles {
            let at = mission.mover.place(&mission.map, spec.at)?;
            mission.vehicles.spawn(at, spec.capacity, spec.health);
        }
        for (class, at) in self.ground {
            let at = mission.mover.place(&mission.map, at)?;
            mission.weapons.spawn(class, WeaponPlacement::Ground(at));
        }

        info!(
            "mission built: {} peds, {} vehicles, {} weapons",
            mission.peds.len(),
            mission.vehicles.len(),
            mission.weapons.len()
        );
        Ok(Sim::new(mission))
    }
}
