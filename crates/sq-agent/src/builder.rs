//! Fluent ped construction.

use sq_action::ActionChains;
use sq_core::{Angle, PedRng, TilePoint};
use sq_mobility::MovementState;

use crate::{Ped, PedKind, PedState, PedStore, Side, WeaponClass, WeaponPlacement, WeaponStore};

/// Fluent builder for one [`Ped`].
///
/// ```ignore
/// let id = PedBuilder::new(PedKind::Agent)
///     .at(TilePoint::tile(2, 3, 0))
///     .weapon(WeaponClass::Uzi)
///     .heart_level(2)
///     .spawn(&mut peds, &mut weapons, seed);
/// ```
#[derive(Clone, Debug)]
pub struct PedBuilder {
    kind:        PedKind,
    side:        Option<Side>,
    position:    TilePoint,
    health:      Option<i32>,
    heart_level: u8,
    weapons:     Vec<WeaponClass>,
    draw_first:  bool,
}

impl PedBuilder {
    pub fn new(kind: PedKind) -> Self {
        Self {
            kind,
            side: None,
            position: TilePoint::default(),
            health: None,
            heart_level: 0,
            weapons: Vec::new(),
            draw_first: false,
        }
    }

    pub fn at(mut self, position: TilePoint) -> Self {
        self.position = position;
        self
    }

    /// Override the kind's default side.
    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn health(mut self, health: i32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn heart_level(mut self, level: u8) -> Self {
        self.heart_level = level;
        self
    }

    /// Give the ped a loaded weapon of `class`.
    pub fn weapon(mut self, class: WeaponClass) -> Self {
        self.weapons.push(class);
        self
    }

    /// Start with the first weapon already drawn.
    pub fn drawn(mut self) -> Self {
        self.draw_first = true;
        self
    }

    /// Create the ped and its weapons.  The ped's RNG is derived from
    /// `seed` and its id, so spawn order fixes every random stream.
    pub fn spawn(self, peds: &mut PedStore, weapons: &mut WeaponStore, seed: u64) -> sq_core::PedId {
        let id = peds.next_id();
        let owned: Vec<_> = self
            .weapons
            .iter()
            .map(|&class| weapons.spawn(class, WeaponPlacement::Carried(id)))
            .collect();
        let health = self.health.unwrap_or_else(|| self.kind.default_health());
        let selected = if self.draw_first { owned.first().copied() } else { None };

        peds.push(Ped {
            id,
            kind: self.kind,
            side: self.side.unwrap_or_else(|| self.kind.default_side()),
            position: self.position,
            direction: Angle::default(),
            health,
            max_health: health,
            heart_level: self.heart_level,
            state: PedState::Standing,
            weapons: owned,
            selected,
            vehicle: None,
            movement: MovementState::new(),
            actions: ActionChains::new(),
            persuaded_by: None,
            rng: PedRng::new(seed, id),
        })
    }
}
