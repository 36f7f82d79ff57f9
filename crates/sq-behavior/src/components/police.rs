use log::debug;

use sq_action::ActionKind;
use sq_agent::Ped;
use sq_core::PedId;

use super::{ScoutTimer, approach, disengage, engage, ensure_alt};
use crate::world::tiles;
use crate::{BehaviourComponent, BehaviourContext, BehaviourEvent};

/// Where an officer is in the warn / engage / cool-down cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PoliceState {
    /// Patrolling; scanning for armed hostiles.
    Idle,
    /// Closing in on an armed suspect without firing.
    Warning { suspect: PedId, elapsed_ms: u32 },
    /// Shooting at the suspect.
    Engaged { suspect: PedId },
    /// The suspect put its weapon away; keep watching for a while.
    PendingDisengage { suspect: PedId, elapsed_ms: u32 },
}

/// Police reaction to armed hostiles.
///
/// An armed hostile within the scout radius is first warned for
/// `police_warn_ms` (the officer draws and approaches), then engaged.  When
/// the suspect holsters, the officer waits `police_disengage_ms` before
/// standing down, re-engaging at once if the weapon comes out again.  Being
/// shot skips the warning.
#[derive(Clone, Debug)]
pub struct PoliceComponent {
    state: PoliceState,
    scout: ScoutTimer,
}

impl PoliceComponent {
    pub fn new() -> Self {
        Self { state: PoliceState::Idle, scout: ScoutTimer::new() }
    }

    pub fn state(&self) -> PoliceState {
        self.state
    }

    fn warn(&mut self, ped: &mut Ped, suspect: PedId, ctx: &BehaviourContext<'_>) {
        let Some(weapon) = ped.best_armed_weapon(ctx.weapons) else {
            return;
        };
        debug!("{} warns {}", ped.id, suspect);
        ped.selected = Some(weapon);
        approach(ped, suspect);
        self.state = PoliceState::Warning { suspect, elapsed_ms: 0 };
    }

    fn engage(&mut self, ped: &mut Ped, suspect: PedId, ctx: &BehaviourContext<'_>) {
        if engage(ped, suspect, ctx.weapons) {
            debug!("{} engages {}", ped.id, suspect);
            self.state = PoliceState::Engaged { suspect };
        } else {
            self.stand_down(ped);
        }
    }

    fn stand_down(&mut self, ped: &mut Ped) {
        if self.state != PoliceState::Idle {
            debug!("{} stands down", ped.id);
            disengage(ped);
        }
        self.state = PoliceState::Idle;
        self.scout.trigger();
    }
}

impl Default for PoliceComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviourComponent for PoliceComponent {
    fn name(&self) -> &'static str {
        "police"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn execute(&mut self, ped: &mut Ped, ctx: &mut BehaviourContext<'_>) {
        let cfg = ctx.config;
        match self.state {
            PoliceState::Idle => {
                if !self.scout.tick(ctx.elapsed_ms, cfg.scout_interval_ms) {
                    return;
                }
                let side = ped.side;
                let suspect = ctx
                    .world
                    .ped(ped.id)
                    .and_then(|me| {
                        ctx.world.nearest_where(me.world, tiles(cfg.scout_radius_tiles), |s| {
                            s.armed && s.is_target_for(side)
                        })
                    })
                    .map(|s| s.id);
                if let Some(suspect) = suspect {
                    self.warn(ped, suspect, ctx);
                }
            }
            PoliceState::Warning { suspect, elapsed_ms } => {
                let Some(s) = ctx.world.ped(suspect).filter(|s| s.is_target_for(ped.side)) else {
                    return self.stand_down(ped);
                };
                if !s.armed {
                    self.state = PoliceState::PendingDisengage { suspect, elapsed_ms: 0 };
                    return;
                }
                let elapsed_ms = elapsed_ms + ctx.elapsed_ms;
                if elapsed_ms >= cfg.police_warn_ms {
                    self.engage(ped, suspect, ctx);
                } else {
                    ensure_alt(ped);
                    self.state = PoliceState::Warning { suspect, elapsed_ms };
                }
            }
            PoliceState::Engaged { suspect } => {
                let Some(s) = ctx.world.ped(suspect).filter(|s| s.is_target_for(ped.side)) else {
                    return self.stand_down(ped);
                };
                if !s.armed {
                    self.state = PoliceState::PendingDisengage { suspect, elapsed_ms: 0 };
                } else {
                    ensure_alt(ped);
                }
            }
            PoliceState::PendingDisengage { suspect, elapsed_ms } => {
                let Some(s) = ctx.world.ped(suspect).filter(|s| s.is_target_for(ped.side)) else {
                    return self.stand_down(ped);
                };
                if s.armed {
                    self.engage(ped, suspect, ctx);
                    return;
                }
                let elapsed_ms = elapsed_ms + ctx.elapsed_ms;
                if elapsed_ms >= cfg.police_disengage_ms {
                    self.stand_down(ped);
                } else {
                    self.state = PoliceState::PendingDisengage { suspect, elapsed_ms };
                }
            }
        }
    }

    fn handle_event(&mut self, ped: &mut Ped, event: &BehaviourEvent, ctx: &mut BehaviourContext<'_>) {
        match *event {
            BehaviourEvent::WeaponOut { by } if self.state == PoliceState::Idle => {
                let in_range = ctx.world.ped(by).zip(ctx.world.ped(ped.id)).is_some_and(|(s, me)| {
                    s.is_target_for(ped.side)
                        && s.world.distance_xy(me.world) <= tiles(ctx.config.scout_radius_tiles)
                });
                if in_range {
                    self.warn(ped, by, ctx);
                }
            }
            BehaviourEvent::WeaponOut { by } => {
                if let PoliceState::PendingDisengage { suspect, .. } = self.state {
                    if suspect == by {
                        self.engage(ped, by, ctx);
                    }
                }
            }
            BehaviourEvent::WeaponCleared { by } => match self.state {
                PoliceState::Warning { suspect, .. } | PoliceState::Engaged { suspect } if suspect == by => {
                    self.state = PoliceState::PendingDisengage { suspect, elapsed_ms: 0 };
                }
                _ => {}
            },
            BehaviourEvent::Hit { by: Some(by), .. } => {
                let hostile = ctx.world.ped(by).is_some_and(|s| s.is_target_for(ped.side));
                let engaged = matches!(self.state, PoliceState::Engaged { .. });
                if hostile && !engaged {
                    self.engage(ped, by, ctx);
                }
            }
            BehaviourEvent::ActionEnded { kind: ActionKind::Shoot { .. }, succeeded: false } => {
                if let PoliceState::Engaged { suspect } = self.state {
                    self.engage(ped, suspect, ctx);
                }
            }
            _ => {}
        }
    }
}
