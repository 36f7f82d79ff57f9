//! The standard behaviour components, plus the chain edits they share.
//!
//! | Component                  | Strategy                                                  |
//! |----------------------------|-----------------------------------------------------------|
//! | [`RegenerationComponent`]  | heal by the heart implant level every regen interval      |
//! | [`PersuadableComponent`]   | switch sides when a live persuadotron comes close         |
//! | [`PersuadedComponent`]     | follow the persuader; fight alongside it when it is armed |
//! | [`PanicComponent`]         | run away from armed peds, calm down once clear            |
//! | [`PoliceComponent`]        | warn, engage, and cool down around armed hostiles         |
//! | [`HostileComponent`]       | engage the nearest hostile in scout range                 |

mod hostile;
mod panic;
mod persuadable;
mod persuaded;
mod police;
mod regeneration;

pub use hostile::HostileComponent;
pub use panic::PanicComponent;
pub use persuadable::PersuadableComponent;
pub use persuaded::PersuadedComponent;
pub use police::{PoliceComponent, PoliceState};
pub use regeneration::RegenerationComponent;

use sq_action::{Action, ActionKind, ChainKind, FireTarget};
use sq_agent::{Ped, WeaponStore};
use sq_core::PedId;

// ── Scout timer ───────────────────────────────────────────────────────────────

/// Periodic re-scan gate.  Fires on the first check and then once per
/// interval; `trigger` forces the next check to fire.
#[derive(Clone, Debug)]
pub(crate) struct ScoutTimer {
    elapsed_ms: u32,
    due:        bool,
}

impl ScoutTimer {
    pub(crate) fn new() -> Self {
        Self { elapsed_ms: 0, due: true }
    }

    pub(crate) fn tick(&mut self, elapsed_ms: u32, interval_ms: u32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.due || self.elapsed_ms >= interval_ms {
            self.elapsed_ms = 0;
            self.due = false;
            return true;
        }
        false
    }

    pub(crate) fn trigger(&mut self) {
        self.due = true;
    }
}

// ── Shared chain edits ────────────────────────────────────────────────────────

/// Draw the best loaded weapon and make the alt chain chase and shoot
/// `target`.  Returns `false` if the ped has nothing to shoot with.
pub(crate) fn engage(ped: &mut Ped, target: PedId, weapons: &WeaponStore) -> bool {
    let Some(weapon) = ped.best_armed_weapon(weapons) else {
        return false;
    };
    ped.selected = Some(weapon);
    ped.actions.destroy_chain(ChainKind::Alt);
    ped.actions.add_to_alt(Action::new(ActionKind::FollowToShoot { target }).notify());
    ped.actions.add_to_alt(Action::new(ActionKind::Shoot { target: FireTarget::Ped(target) }).notify());
    ped.actions.change_source_of_actions(ChainKind::Alt);
    true
}

/// Make the alt chain close in on `target` without shooting.
pub(crate) fn approach(ped: &mut Ped, target: PedId) {
    ped.actions.destroy_chain(ChainKind::Alt);
    ped.actions.add_to_alt(Action::new(ActionKind::FollowToShoot { target }));
    ped.actions.change_source_of_actions(ChainKind::Alt);
}

/// Drop any reactive orders, holster, and go back to the default routine.
pub(crate) fn disengage(ped: &mut Ped) {
    ped.actions.clear_use_weapon();
    ped.actions.destroy_chain(ChainKind::Alt);
    ped.actions.change_source_of_actions(ChainKind::Default);
    ped.movement.clear_destination();
    ped.selected = None;
}

/// Retry switching to the alt chain if an atomic action refused earlier.
pub(crate) fn ensure_alt(ped: &mut Ped) {
    if ped.actions.source() == ChainKind::Default && ped.actions.cursor(ChainKind::Alt).is_some() {
        ped.actions.change_source_of_actions(ChainKind::Alt);
    }
}
