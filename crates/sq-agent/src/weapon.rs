//! Weapon classes and weapon instances.
//!
//! Class data is a compiled-in table; loading weapon definitions from game
//! data is not part of this crate.

use sq_action::HitKind;
use sq_core::{PedId, TilePoint, WeaponId};

/// Static characteristics of a weapon class.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WeaponStats {
    /// Reach in tiles (Chebyshev).
    pub range_tiles:      i32,
    pub damage:           i32,
    /// Minimum time between two shots.
    pub shot_interval_ms: u32,
    /// Magazine size; `0` means the weapon needs no ammunition.
    pub max_ammo:         u32,
    pub hit_kind:         HitKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WeaponClass {
    Pistol,
    Uzi,
    Minigun,
    Laser,
    Flamer,
    Shotgun,
    Persuadotron,
}

impl WeaponClass {
    pub const ALL: [WeaponClass; 7] = [
        WeaponClass::Pistol,
        WeaponClass::Uzi,
        WeaponClass::Minigun,
        WeaponClass::Laser,
        WeaponClass::Flamer,
        WeaponClass::Shotgun,
        WeaponClass::Persuadotron,
    ];

    pub fn stats(self) -> WeaponStats {
        let (range_tiles, damage, shot_interval_ms, max_ammo, hit_kind) = match self {
            WeaponClass::Pistol => (5, 1, 600, 13, HitKind::Bullet),
            WeaponClass::Uzi => (6, 2, 150, 50, HitKind::Bullet),
            WeaponClass::Minigun => (7, 3, 100, 2000, HitKind::Bullet),
            WeaponClass::Laser => (10, 20, 1500, 5, HitKind::Laser),
            WeaponClass::Flamer => (3, 4, 100, 1000, HitKind::Burn),
            WeaponClass::Shotgun => (4, 6, 900, 12, HitKind::Bullet),
            WeaponClass::Persuadotron => (2, 0, 500, 0, HitKind::Bullet),
        };
        WeaponStats { range_tiles, damage, shot_interval_ms, max_ammo, hit_kind }
    }

    /// Whether carrying this weapon out makes a ped a threat.  The
    /// persuadotron does not count.
    #[inline]
    pub fn is_armed(self) -> bool {
        self != WeaponClass::Persuadotron
    }
}

/// Where a weapon currently is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WeaponPlacement {
    Carried(PedId),
    Ground(TilePoint),
}

/// One concrete weapon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaponInstance {
    pub id:        WeaponId,
    pub class:     WeaponClass,
    pub ammo:      u32,
    pub placement: WeaponPlacement,
}

impl WeaponInstance {
    /// `true` while the weapon can still fire.
    #[inline]
    pub fn has_ammo(&self) -> bool {
        self.class.stats().max_ammo == 0 || self.ammo > 0
    }

    /// Spend one round.  Returns `false`, spending nothing, when empty.
    pub fn consume_round(&mut self) -> bool {
        if self.class.stats().max_ammo == 0 {
            return true;
        }
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn owner(&self) -> Option<PedId> {
        match self.placement {
            WeaponPlacement::Carried(p) => Some(p),
            WeaponPlacement::Ground(_) => None,
        }
    }
}

/// All weapons of a mission, carried or lying around.
#[derive(Clone, Debug, Default)]
pub struct WeaponStore {
    pub weapons: Vec<WeaponInstance>,
}

impl WeaponStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fully loaded weapon.
    pub fn spawn(&mut self, class: WeaponClass, placement: WeaponPlacement) -> WeaponId {
        let id = WeaponId(self.weapons.len() as u32);
        self.weapons.push(WeaponInstance {
            id,
            class,
            ammo: class.stats().max_ammo,
            placement,
        });
        id
    }

    pub fn get(&self, id: WeaponId) -> Option<&WeaponInstance> {
        self.weapons.get(id.index())
    }

    pub fn get_mut(&mut self, id: WeaponId) -> Option<&mut WeaponInstance> {
        self.weapons.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Weapons lying on the ground, with their tile.
    pub fn on_ground(&self) -> impl Iterator<Item = (&WeaponInstance, TilePoint)> + '_ {
        self.weapons.iter().filter_map(|w| match w.placement {
            WeaponPlacement::Ground(t) => Some((w, t)),
            WeaponPlacement::Carried(_) => None,
        })
    }
}
