//! A single ped and its classification.

use sq_action::ActionChains;
use sq_core::{Angle, PedId, PedRng, TilePoint, VehicleId, WeaponId};
use sq_mobility::MovementState;

use crate::{WeaponClass, WeaponStore};

/// What sort of ped this is; picks the default side and behaviour set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PedKind {
    Agent,
    Civilian,
    Police,
    Guard,
    Criminal,
}

impl PedKind {
    pub fn default_side(self) -> Side {
        match self {
            PedKind::Agent => Side::Player,
            PedKind::Civilian => Side::Civilians,
            PedKind::Police => Side::Police,
            PedKind::Guard => Side::Guards,
            PedKind::Criminal => Side::Criminals,
        }
    }

    pub fn default_health(self) -> i32 {
        match self {
            PedKind::Agent => 16,
            PedKind::Guard | PedKind::Police => 10,
            PedKind::Criminal => 8,
            PedKind::Civilian => 4,
        }
    }
}

/// Allegiance.  Persuasion moves a ped to its persuader's side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Police,
    Guards,
    Criminals,
    Civilians,
}

impl Side {
    /// Symmetric hostility table.  Civilians are nobody's enemy.
    pub fn is_hostile_to(self, other: Side) -> bool {
        use Side::*;
        match (self, other) {
            (a, b) if a == b => false,
            (Civilians, _) | (_, Civilians) => false,
            (Player, _) | (_, Player) => true,
            (Police, Criminals) | (Criminals, Police) => true,
            _ => false,
        }
    }
}

/// Display state, driven by the running action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum PedState {
    #[default]
    Standing,
    Walking,
    Running,
    Firing,
    Hit,
    PickingUp,
    Dropping,
    InVehicle,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Ped {
    pub id:           PedId,
    pub kind:         PedKind,
    pub side:         Side,
    pub position:     TilePoint,
    pub direction:    Angle,
    pub health:       i32,
    pub max_health:   i32,
    /// Heart implant level; non-zero enables regeneration.
    pub heart_level:  u8,
    pub state:        PedState,
    pub weapons:      Vec<WeaponId>,
    pub selected:     Option<WeaponId>,
    pub vehicle:      Option<VehicleId>,
    pub movement:     MovementState,
    pub actions:      ActionChains,
    pub persuaded_by: Option<PedId>,
    pub rng:          PedRng,
}

impl Ped {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0 && self.state != PedState::Dead
    }

    #[inline]
    pub fn in_vehicle(&self) -> bool {
        self.vehicle.is_some()
    }

    /// Class of the weapon in hand.
    pub fn selected_class(&self, weapons: &WeaponStore) -> Option<WeaponClass> {
        self.selected.and_then(|w| weapons.get(w)).map(|w| w.class)
    }

    /// Holding out a weapon that counts as a threat.
    pub fn is_armed(&self, weapons: &WeaponStore) -> bool {
        self.selected_class(weapons).is_some_and(WeaponClass::is_armed)
    }

    /// First carried weapon that is armed and loaded.
    pub fn best_armed_weapon(&self, weapons: &WeaponStore) -> Option<WeaponId> {
        self.weapons.iter().copied().find(|&w| {
            weapons
                .get(w)
                .is_some_and(|inst| inst.class.is_armed() && inst.has_ammo())
        })
    }

    /// Subtract damage.  Returns `true` if this killed the ped.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount.max(0)).max(0);
        if self.health == 0 {
            self.state = PedState::Dead;
            self.movement.clear_destination();
            self.actions.destroy_all();
            return true;
        }
        false
    }

    pub fn heal(&mut self, amount: i32) {
        if self.is_alive() {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    pub fn is_hostile_to(&self, other: &Ped) -> bool {
        self.side.is_hostile_to(other.side)
    }
}
