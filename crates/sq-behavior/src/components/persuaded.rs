use log::debug;

use sq_action::{Action, ActionKind, ChainKind};
use sq_agent::Ped;
use sq_core::PedId;

use super::{ScoutTimer, disengage, engage, ensure_alt};
use crate::{BehaviourComponent, BehaviourContext, BehaviourEvent};

/// Tiles a persuaded ped keeps from its leader.
const FOLLOW_DISTANCE: i32 = 1;

/// Follows the persuader as a looping default routine.  While the leader
/// holds out a real weapon, the ped joins in against the nearest hostile.
#[derive(Clone, Debug)]
pub struct PersuadedComponent {
    following: Option<PedId>,
    target:    Option<PedId>,
    scout:     ScoutTimer,
}

impl PersuadedComponent {
    pub fn new() -> Self {
        Self { following: None, target: None, scout: ScoutTimer::new() }
    }

    fn follow(&mut self, ped: &mut Ped, leader: PedId) {
        ped.actions.destroy_chain(ChainKind::Default);
        ped.actions.add_to_default(
            Action::new(ActionKind::Follow { target: leader, distance_tiles: FOLLOW_DISTANCE }).scripted(),
        );
        ped.actions.add_to_default(Action::new(ActionKind::Reset { chain: ChainKind::Default }).scripted());
        ped.actions.change_source_of_actions(ChainKind::Default);
        self.following = Some(leader);
    }
}

impl Default for PersuadedComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviourComponent for PersuadedComponent {
    fn name(&self) -> &'static str {
        "persuaded"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn execute(&mut self, ped: &mut Ped, ctx: &mut BehaviourContext<'_>) {
        let Some(leader) = ped.persuaded_by.and_then(|id| ctx.world.ped(id)) else {
            return;
        };
        if !leader.alive {
            if self.following.take().is_some() {
                self.target = None;
                disengage(ped);
                ped.actions.destroy_chain(ChainKind::Default);
            }
            return;
        }
        if self.following != Some(leader.id) {
            self.follow(ped, leader.id);
        }

        if !leader.armed {
            if self.target.take().is_some() {
                debug!("{} stands down with {}", ped.id, leader.id);
                disengage(ped);
            }
            return;
        }

        if let Some(target) = self.target {
            let gone = ctx.world.ped(target).is_none_or(|t| !t.is_target_for(ped.side));
            if !gone {
                ensure_alt(ped);
                return;
            }
            self.target = None;
            disengage(ped);
            self.scout.trigger();
        }

        if !self.scout.tick(ctx.elapsed_ms, ctx.config.scout_interval_ms) {
            return;
        }
        if let Some(enemy) = ctx.world.nearest_hostile(ped.id, ctx.config.scout_radius_tiles) {
            if engage(ped, enemy.id, ctx.weapons) {
                debug!("{} joins {} against {}", ped.id, leader.id, enemy.id);
                self.target = Some(enemy.id);
            }
        }
    }

    fn handle_event(&mut self, ped: &mut Ped, event: &BehaviourEvent, _ctx: &mut BehaviourContext<'_>) {
        match *event {
            BehaviourEvent::WeaponOut { by } if Some(by) == ped.persuaded_by => self.scout.trigger(),
            BehaviourEvent::ActionEnded {
                kind: ActionKind::Shoot { .. } | ActionKind::FollowToShoot { .. },
                succeeded: false,
            } if self.target.is_some() => {
                self.target = None;
                disengage(ped);
                self.scout.trigger();
            }
            BehaviourEvent::EjectedFromVehicle { .. } => {
                self.following = None;
                self.target = None;
            }
            _ => {}
        }
    }
}
