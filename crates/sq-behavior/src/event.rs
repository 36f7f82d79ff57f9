//! Discrete events delivered to a ped's [`Behaviour`][crate::Behaviour].

use sq_action::{ActionKind, HitKind};
use sq_core::{PedId, VehicleId};

/// Something happened that a behaviour component may want to react to.
///
/// Events are queued by the mission during a tick and delivered in the
/// order they were raised.  `WeaponOut`, `WeaponCleared` and the
/// persuadotron events are broadcast to every live ped; the rest go to a
/// single ped.
#[derive(Clone, Debug, PartialEq)]
pub enum BehaviourEvent {
    /// `by` drew a weapon that counts as a threat.
    WeaponOut { by: PedId },

    /// `by` holstered or emptied its weapon.
    WeaponCleared { by: PedId },

    /// An action flagged with `notify_behaviour` finished.
    ActionEnded { kind: ActionKind, succeeded: bool },

    /// The ped was hit.  `by` is `None` for environmental damage.
    Hit { by: Option<PedId>, kind: HitKind, damage: i32 },

    PersuadotronActivated { by: PedId },
    PersuadotronDeactivated { by: PedId },

    /// The vehicle the ped was riding in was destroyed.
    EjectedFromVehicle { vehicle: VehicleId },
}

impl BehaviourEvent {
    /// Whether the mission delivers this event to every live ped.
    pub fn is_broadcast(&self) -> bool {
        matches!(
            self,
            BehaviourEvent::WeaponOut { .. }
                | BehaviourEvent::WeaponCleared { .. }
                | BehaviourEvent::PersuadotronActivated { .. }
                | BehaviourEvent::PersuadotronDeactivated { .. }
        )
    }
}
