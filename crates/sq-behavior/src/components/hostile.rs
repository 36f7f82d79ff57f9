use log::debug;

use sq_action::ActionKind;
use sq_agent::Ped;
use sq_core::PedId;

use super::{ScoutTimer, disengage, engage, ensure_alt};
use crate::world::tiles;
use crate::{BehaviourComponent, BehaviourContext, BehaviourEvent};

/// Generic engage cycle for armed non-player peds.  Every scout interval
/// it looks for the nearest hostile within the scout radius and attacks
/// it; the target is dropped once dead, hidden in a vehicle, or more than
/// twice the scout radius away.  A hit from a hostile is answered at once.
#[derive(Clone, Debug)]
pub struct HostileComponent {
    target: Option<PedId>,
    scout:  ScoutTimer,
}

impl HostileComponent {
    pub fn new() -> Self {
        Self { target: None, scout: ScoutTimer::new() }
    }

    pub fn target(&self) -> Option<PedId> {
        self.target
    }

    fn attack(&mut self, ped: &mut Ped, target: PedId, ctx: &BehaviourContext<'_>) {
        if engage(ped, target, ctx.weapons) {
            debug!("{} attacks {}", ped.id, target);
            self.target = Some(target);
        }
    }

    fn drop_target(&mut self, ped: &mut Ped) {
        if self.target.take().is_some() {
            disengage(ped);
        }
        self.scout.trigger();
    }
}

impl Default for HostileComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviourComponent for HostileComponent {
    fn name(&self) -> &'static str {
        "hostile"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn execute(&mut self, ped: &mut Ped, ctx: &mut BehaviourContext<'_>) {
        let radius = ctx.config.scout_radius_tiles;
        if let Some(target) = self.target {
            let me = ped.position.to_world();
            let keep = ctx.world.ped(target).is_some_and(|t| {
                t.is_target_for(ped.side) && t.world.distance_xy(me) <= 2.0 * tiles(radius)
            });
            if keep {
                ensure_alt(ped);
                return;
            }
            self.drop_target(ped);
        }

        if !self.scout.tick(ctx.elapsed_ms, ctx.config.scout_interval_ms) {
            return;
        }
        if let Some(enemy) = ctx.world.nearest_hostile(ped.id, radius).map(|s| s.id) {
            self.attack(ped, enemy, ctx);
        }
    }

    fn handle_event(&mut self, ped: &mut Ped, event: &BehaviourEvent, ctx: &mut BehaviourContext<'_>) {
        match *event {
            BehaviourEvent::Hit { by: Some(by), .. } if self.target.is_none() => {
                if ctx.world.ped(by).is_some_and(|s| s.is_target_for(ped.side)) {
                    self.attack(ped, by, ctx);
                }
            }
            BehaviourEvent::ActionEnded {
                kind: ActionKind::Shoot { .. } | ActionKind::FollowToShoot { .. },
                succeeded: false,
            } => self.drop_target(ped),
            BehaviourEvent::EjectedFromVehicle { .. } => {
                self.target = None;
                self.scout.trigger();
            }
            _ => {}
        }
    }
}
