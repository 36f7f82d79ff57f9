use log::debug;

use sq_action::{Action, ActionKind, ChainKind};
use sq_agent::Ped;
use sq_core::{Angle, PedId};

use super::{ScoutTimer, disengage};
use crate::world::tiles;
use crate::{BehaviourComponent, BehaviourContext, BehaviourEvent};

/// Civilian reaction to weapons.  Woken by `WeaponOut` or by being hit,
/// it re-scans every scout interval: while an armed ped is within the scout
/// radius the ped runs directly away from it, and once clear it calms
/// down.  With no armed ped left anywhere it goes back to sleep.
#[derive(Clone, Debug)]
pub struct PanicComponent {
    enabled:  bool,
    fleeing:  Option<PedId>,
    scout:    ScoutTimer,
}

impl PanicComponent {
    pub fn new() -> Self {
        Self { enabled: false, fleeing: None, scout: ScoutTimer::new() }
    }

    /// `true` while the ped is running from someone.
    pub fn is_fleeing(&self) -> bool {
        self.fleeing.is_some()
    }

    fn flee(&mut self, ped: &mut Ped, from: PedId, heading: Angle, distance: f64) {
        ped.actions.destroy_chain(ChainKind::Alt);
        ped.actions.add_to_alt(
            Action::new(ActionKind::WalkToDirection {
                heading,
                max_distance: Some(distance),
                target:       None,
                bounce:       true,
                safe_walk:    true,
                run:          true,
            })
            .notify(),
        );
        ped.actions.change_source_of_actions(ChainKind::Alt);
        if self.fleeing != Some(from) {
            debug!("{} flees from {}", ped.id, from);
        }
        self.fleeing = Some(from);
    }
}

impl Default for PanicComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviourComponent for PanicComponent {
    fn name(&self) -> &'static str {
        "panic"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execute(&mut self, ped: &mut Ped, ctx: &mut BehaviourContext<'_>) {
        if !self.scout.tick(ctx.elapsed_ms, ctx.config.scout_interval_ms) {
            return;
        }
        let radius = ctx.config.scout_radius_tiles;
        match ctx.world.nearest_armed(ped.id, radius) {
            Some(threat) => {
                let heading = Angle::toward(threat.world, ped.position.to_world());
                self.flee(ped, threat.id, heading, tiles(radius));
            }
            None => {
                if self.fleeing.take().is_some() {
                    debug!("{} calms down", ped.id);
                    disengage(ped);
                }
                if ctx.world.armed_count() == 0 {
                    self.enabled = false;
                }
            }
        }
    }

    fn handle_event(&mut self, _ped: &mut Ped, event: &BehaviourEvent, _ctx: &mut BehaviourContext<'_>) {
        match event {
            BehaviourEvent::WeaponOut { .. } | BehaviourEvent::Hit { .. } => {
                self.enabled = true;
                self.scout.trigger();
            }
            BehaviourEvent::ActionEnded { kind: ActionKind::WalkToDirection { .. }, .. }
                if self.fleeing.is_some() =>
            {
                self.scout.trigger();
            }
            _ => {}
        }
    }
}
