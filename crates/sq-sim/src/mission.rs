//! The mission world and one frame of it.

use log::{debug, trace};
use rustc_hash::FxHashMap;

use sq_action::{execute, execute_weapon, Action, ActionKind, ActionEnded};
use sq_agent::{Ped, PedStore, VehicleStore, WeaponClass, WeaponStore};
use sq_behavior::{Behaviour, BehaviourContext, BehaviourEvent, WorldView};
use sq_core::{ActionId, CoreError, PedId, SimConfig, TilePoint, WeaponId};
use sq_mobility::Mover;
use sq_spatial::{ConnectivityMap, FloodRouter, Router, TileGrid, TileKind};

use crate::combat::Shot;
use crate::host::PedHost;
use crate::{SimError, SimResult, TickReport};

fn missing(id: PedId) -> SimError {
    SimError::Core(CoreError::PedNotFound(id))
}

/// What a ped was holding out at the end of the previous frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct WeaponFlags {
    armed:        bool,
    persuadotron: bool,
}

impl WeaponFlags {
    fn of(ped: &Ped, weapons: &WeaponStore) -> Self {
        if !ped.is_alive() {
            return Self::default();
        }
        Self {
            armed:        ped.is_armed(weapons),
            persuadotron: ped.selected_class(weapons) == Some(WeaponClass::Persuadotron),
        }
    }
}

/// Everything in play: the map, its peds, vehicles and weapons, and each
/// ped's behaviour.
///
/// Peds, behaviours and weapon flags are parallel `Vec`s indexed by
/// `PedId`.  Create via [`MissionBuilder`][crate::MissionBuilder].
pub struct Mission<R: Router = FloodRouter> {
    pub config:     SimConfig,
    /// Tile kinds; edit through [`Mission::destroy_tile`] so the
    /// connectivity map follows.
    pub grid:       TileGrid,
    pub map:        ConnectivityMap,
    pub mover:      Mover<R>,
    pub peds:       PedStore,
    pub weapons:    WeaponStore,
    pub vehicles:   VehicleStore,
    pub behaviours: Vec<Behaviour>,

    /// Events waiting for delivery, keyed by recipient.  Drained once per
    /// frame, after the behaviour phase, in ascending `PedId` order.
    pub(crate) inbox: FxHashMap<PedId, Vec<BehaviourEvent>>,

    /// Shots fired this frame, resolved after every ped has acted.
    pub(crate) shots: Vec<Shot>,

    flags: Vec<WeaponFlags>,
}

impl<R: Router> Mission<R> {
    pub(crate) fn new(config: SimConfig, grid: TileGrid, map: ConnectivityMap, mover: Mover<R>) -> Self {
        Self {
            config,
            grid,
            map,
            mover,
            peds: PedStore::new(),
            weapons: WeaponStore::new(),
            vehicles: VehicleStore::new(),
            behaviours: Vec::new(),
            inbox: FxHashMap::default(),
            shots: Vec::new(),
            flags: Vec::new(),
        }
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn ped(&self, id: PedId) -> SimResult<&Ped> {
        self.peds.get(id).ok_or_else(|| missing(id))
    }

    fn ped_mut(&mut self, id: PedId) -> SimResult<&mut Ped> {
        self.peds.get_mut(id).ok_or_else(|| missing(id))
    }

    pub fn behaviour(&self, id: PedId) -> Option<&Behaviour> {
        self.behaviours.get(id.index())
    }

    /// Events queued for `id` and not yet delivered.
    pub fn pending_events(&self, id: PedId) -> &[BehaviourEvent] {
        self.inbox.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    // ── Orders ────────────────────────────────────────────────────────────

    /// Route `id` to `dest` outside any action.  Returns `false` when no
    /// route exists.
    pub fn init_movement_to_destination(&mut self, id: PedId, dest: TilePoint, speed: i32) -> SimResult<bool> {
        let Self { peds, map, mover, .. } = self;
        let ped = peds.get_mut(id).ok_or_else(|| missing(id))?;
        let pos = ped.position;
        Ok(mover.init_movement_to_destination(map, &mut ped.movement, &pos, dest, speed))
    }

    /// Give `id` an order on its current chain.  With `append = false` the
    /// order replaces whatever the ped was told before.
    pub fn order(&mut self, id: PedId, action: Action, append: bool) -> SimResult<ActionId> {
        let ped = self.ped_mut(id)?;
        debug!("{id} ordered to {}", action.kind.name());
        Ok(ped.actions.add_to_current(action, append))
    }

    /// Take an action out of its chain, joining its neighbours.
    pub fn cancel_action(&mut self, id: PedId, action: ActionId) -> SimResult<Action> {
        Ok(self.ped_mut(id)?.actions.remove_and_join_chain(action)?)
    }

    /// Draw a carried weapon, or holster with `None`.
    pub fn select_weapon(&mut self, id: PedId, weapon: Option<WeaponId>) -> SimResult<()> {
        let ped = self.ped_mut(id)?;
        if let Some(w) = weapon {
            if !ped.weapons.contains(&w) {
                return Err(SimError::WeaponNotCarried { ped: id, weapon: w });
            }
        }
        if weapon.is_none() {
            ped.actions.clear_use_weapon();
        }
        ped.selected = weapon;
        Ok(())
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Queue `event` for delivery to `id` on the next frame.
    pub fn queue_event(&mut self, id: PedId, event: BehaviourEvent) {
        self.inbox.entry(id).or_default().push(event);
    }

    /// Queue `event` for every live ped except `from`.
    pub fn broadcast(&mut self, from: PedId, event: BehaviourEvent) {
        let recipients: Vec<PedId> = self.peds.alive().map(|p| p.id).filter(|&p| p != from).collect();
        for id in recipients {
            self.queue_event(id, event.clone());
        }
    }

    /// Deliver `event` to `id` right away, against the current state.
    pub fn handle_behaviour_event(&mut self, id: PedId, event: BehaviourEvent) -> SimResult<()> {
        let world = WorldView::build(&self.peds, &self.weapons);
        let Self { peds, weapons, config, behaviours, .. } = self;
        let ped = peds.get_mut(id).ok_or_else(|| missing(id))?;
        if let Some(behaviour) = behaviours.get_mut(id.index()) {
            let mut ctx = BehaviourContext::new(&world, weapons, config, 0);
            behaviour.handle_behaviour_event(ped, &event, &mut ctx);
        }
        Ok(())
    }

    // ── Terrain ───────────────────────────────────────────────────────────

    /// Replace a tile, e.g. with rubble, and refresh connectivity around it.
    /// Paths already planned through it are not re-routed.
    pub fn destroy_tile(&mut self, tile: TilePoint, rubble: TileKind) -> SimResult<()> {
        self.grid.set(tile.tx, tile.ty, tile.tz, rubble)?;
        self.map.rebuild_around(&self.grid, tile);
        debug!("tile {tile} is now {rubble:?}");
        Ok(())
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    /// Run one frame of `id`'s actions outside the normal frame loop.
    /// Returns `true` if the ped moved.
    pub fn animate_ped(&mut self, id: PedId, elapsed_ms: u32) -> SimResult<bool> {
        self.ped(id)?;
        let world = WorldView::build(&self.peds, &self.weapons);
        Ok(self.animate_with(id, elapsed_ms, &world))
    }

    /// One frame for the whole mission.
    ///
    /// 1. Snapshot the world.
    /// 2. Behaviours decide, ped by ped.
    /// 3. Last frame's events are delivered.
    /// 4. Every live ped plays its actions.
    /// 5. Riders follow their vehicles.
    /// 6. Shots land.
    /// 7. Drawn and holstered weapons are announced.
    pub fn step(&mut self, elapsed_ms: u32) -> TickReport {
        let world = WorldView::build(&self.peds, &self.weapons);
        self.run_behaviours(&world, elapsed_ms);
        self.deliver_events(&world);

        let mut moved = 0;
        for i in 0..self.peds.len() {
            if self.animate_with(PedId(i as u32), elapsed_ms, &world) {
                moved += 1;
            }
        }
        self.sync_passengers();
        let deaths = self.resolve_shots();
        self.announce_weapons();

        TickReport { moved, alive: self.peds.alive_count(), deaths }
    }

    fn run_behaviours(&mut self, world: &WorldView, elapsed_ms: u32) {
        let Self { peds, weapons, config, behaviours, .. } = self;
        for (i, behaviour) in behaviours.iter_mut().enumerate() {
            let Some(ped) = peds.get_mut(PedId(i as u32)) else {
                continue;
            };
            let mut ctx = BehaviourContext::new(world, weapons, config, elapsed_ms);
            behaviour.execute(ped, &mut ctx);
        }
    }

    fn deliver_events(&mut self, world: &WorldView) {
        if self.inbox.is_empty() {
            return;
        }
        let mut pending: Vec<_> = std::mem::take(&mut self.inbox).into_iter().collect();
        pending.sort_unstable_by_key(|(id, _)| *id);

        let Self { peds, weapons, config, behaviours, .. } = self;
        for (id, events) in pending {
            let (Some(ped), Some(behaviour)) = (peds.get_mut(id), behaviours.get_mut(id.index())) else {
                continue;
            };
            let mut ctx = BehaviourContext::new(world, weapons, config, 0);
            for event in &events {
                trace!("{id} <- {event:?}");
                behaviour.handle_behaviour_event(ped, event, &mut ctx);
            }
        }
    }

    /// Play one frame of `id`'s chains and weapon slot.
    fn animate_with(&mut self, id: PedId, elapsed_ms: u32, world: &WorldView) -> bool {
        let Some(ped) = self.peds.get_mut(id) else {
            return false;
        };
        if !ped.is_alive() {
            return false;
        }
        let before = ped.position;
        let mut chains = std::mem::take(&mut ped.actions);
        let mut host = PedHost {
            ped,
            map: &self.map,
            mover: &self.mover,
            config: &self.config,
            world,
            weapons: &mut self.weapons,
            vehicles: &mut self.vehicles,
            shots: &mut self.shots,
            fire_request: None,
        };

        let mut ended: Vec<ActionEnded> = execute(&mut chains, &mut host, elapsed_ms).into_iter().collect();
        if let Some(target) = host.fire_request.take() {
            if chains.use_weapon().is_none() {
                let fire = Action::new(ActionKind::Fire { target, elapsed_ms: 0 });
                if let Err(e) = chains.set_use_weapon(fire) {
                    debug!("{id} holds fire: {e}");
                }
            }
        }
        ended.extend(execute_weapon(&mut chains, &mut host, elapsed_ms));

        host.ped.actions = chains;
        let moved = host.ped.position != before;
        for report in ended {
            self.queue_event(id, BehaviourEvent::ActionEnded { kind: report.kind, succeeded: report.succeeded });
        }
        moved
    }

    fn sync_passengers(&mut self) {
        for vehicle in &self.vehicles.vehicles {
            for &rider in &vehicle.passengers {
                if let Some(ped) = self.peds.get_mut(rider) {
                    ped.position = vehicle.position;
                }
            }
        }
    }

    /// Broadcast weapon and persuadotron changes since the last frame.
    fn announce_weapons(&mut self) {
        self.flags.resize(self.peds.len(), WeaponFlags::default());
        let mut raised = Vec::new();
        for (i, prev) in self.flags.iter_mut().enumerate() {
            let id = PedId(i as u32);
            let Some(ped) = self.peds.get(id) else {
                continue;
            };
            let now = WeaponFlags::of(ped, &self.weapons);
            if now.armed != prev.armed {
                raised.push(if now.armed {
                    BehaviourEvent::WeaponOut { by: id }
                } else {
                    BehaviourEvent::WeaponCleared { by: id }
                });
            }
            if now.persuadotron != prev.persuadotron {
                raised.push(if now.persuadotron {
                    BehaviourEvent::PersuadotronActivated { by: id }
                } else {
                    BehaviourEvent::PersuadotronDeactivated { by: id }
                });
            }
            *prev = now;
        }
        for event in raised {
            let from = match event {
                BehaviourEvent::WeaponOut { by }
                | BehaviourEvent::WeaponCleared { by }
                | BehaviourEvent::PersuadotronActivated { by }
                | BehaviourEvent::PersuadotronDeactivated { by } => by,
                _ => continue,
            };
            self.broadcast(from, event);
        }
    }
}
