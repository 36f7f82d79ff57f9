//! Vehicles: movable containers for peds.

use sq_core::{PedId, TilePoint, VehicleId};
use sq_mobility::MovementState;

#[derive(Clone, Debug)]
pub struct Vehicle {
    pub id:         VehicleId,
    pub position:   TilePoint,
    pub health:     i32,
    pub max_health: i32,
    pub capacity:   usize,
    /// Occupants in boarding order; the first one drives.
    pub passengers: Vec<PedId>,
    pub movement:   MovementState,
}

impl Vehicle {
    pub fn new(id: VehicleId, position: TilePoint, capacity: usize, health: i32) -> Self {
        Self {
            id,
            position,
            health,
            max_health: health,
            capacity,
            passengers: Vec::new(),
            movement: MovementState::new(),
        }
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    #[inline]
    pub fn has_room(&self) -> bool {
        !self.is_destroyed() && self.passengers.len() < self.capacity
    }

    pub fn driver(&self) -> Option<PedId> {
        self.passengers.first().copied()
    }

    /// Board `ped`.  Returns `false` if full, destroyed, or already aboard.
    pub fn add_passenger(&mut self, ped: PedId) -> bool {
        if !self.has_room() || self.passengers.contains(&ped) {
            return false;
        }
        self.passengers.push(ped);
        true
    }

    pub fn remove_passenger(&mut self, ped: PedId) -> bool {
        let before = self.passengers.len();
        self.passengers.retain(|&p| p != ped);
        self.passengers.len() != before
    }

    /// Returns `true` if this destroyed the vehicle.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.health = (self.health - amount.max(0)).max(0);
        if self.is_destroyed() {
            self.movement.clear_destination();
            return true;
        }
        false
    }
}

#[derive(Clone, Debug, Default)]
pub struct VehicleStore {
    pub vehicles: Vec<Vehicle>,
}

impl VehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, position: TilePoint, capacity: usize, health: i32) -> VehicleId {
        let id = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(Vehicle::new(id, position, capacity, health));
        id
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        (0..self.vehicles.len() as u32).map(VehicleId)
    }
}
