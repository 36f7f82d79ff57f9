//! Dense ped storage.

use sq_core::PedId;

use crate::Ped;

/// All peds of a mission.  `PedId` is the index; peds are never removed.
#[derive(Clone, Debug, Default)]
pub struct PedStore {
    pub peds: Vec<Ped>,
}

impl PedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next pushed ped will get.
    #[inline]
    pub fn next_id(&self) -> PedId {
        PedId(self.peds.len() as u32)
    }

    pub(crate) fn push(&mut self, ped: Ped) -> PedId {
        let id = self.next_id();
        debug_assert_eq!(ped.id, id);
        self.peds.push(ped);
        id
    }

    #[inline]
    pub fn get(&self, id: PedId) -> Option<&Ped> {
        self.peds.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: PedId) -> Option<&mut Ped> {
        self.peds.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.peds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peds.is_empty()
    }

    /// Iterator over all `PedId`s in ascending index order.
    pub fn ids(&self) -> impl Iterator<Item = PedId> + '_ {
        (0..self.peds.len() as u32).map(PedId)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Ped> + '_ {
        self.peds.iter().filter(|p| p.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }
}
