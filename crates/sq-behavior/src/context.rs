//! State passed to every behaviour callback.

use sq_agent::WeaponStore;
use sq_core::SimConfig;

use crate::{ComponentSet, WorldView};

/// Everything a component may read while deciding what its ped does next.
///
/// The world and weapon views are shared and immutable for the whole tick;
/// components only ever mutate the [`Ped`][sq_agent::Ped] they are handed.
/// The one outward effect a component can request is a wholesale swap of
/// its ped's component list, applied by [`Behaviour`][crate::Behaviour]
/// once the current callback round is over.
pub struct BehaviourContext<'a> {
    pub world:      &'a WorldView,
    pub weapons:    &'a WeaponStore,
    pub config:     &'a SimConfig,
    /// Milliseconds since the previous tick.
    pub elapsed_ms: u32,
    swap:           Option<ComponentSet>,
}

impl<'a> BehaviourContext<'a> {
    #[inline]
    pub fn new(
        world:      &'a WorldView,
        weapons:    &'a WeaponStore,
        config:     &'a SimConfig,
        elapsed_ms: u32,
    ) -> Self {
        Self { world, weapons, config, elapsed_ms, swap: None }
    }

    /// Ask for the ped's components to be replaced by `set`.
    pub fn request_swap(&mut self, set: ComponentSet) {
        self.swap = Some(set);
    }

    #[inline]
    pub(crate) fn swap_pending(&self) -> bool {
        self.swap.is_some()
    }

    pub(crate) fn take_swap(&mut self) -> Option<ComponentSet> {
        self.swap.take()
    }
}
