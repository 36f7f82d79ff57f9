//! Read-only snapshot of every ped, rebuilt once per tick.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sq_agent::{PedKind, PedStore, Side, WeaponClass, WeaponStore};
use sq_core::{PedId, TilePoint, WorldPoint, geo::TILE_XY};

/// What other peds may know about a ped during one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct PedSnapshot {
    pub id:            PedId,
    pub kind:          PedKind,
    pub side:          Side,
    pub position:      TilePoint,
    pub world:         WorldPoint,
    pub alive:         bool,
    /// Holding out a weapon that counts as a threat.
    pub armed:         bool,
    /// Holding out a persuadotron.
    pub persuadotron:  bool,
    pub in_vehicle:    bool,
    pub persuaded_by:  Option<PedId>,
}

impl PedSnapshot {
    /// Alive, on foot, and on an opposing side to `side`.
    #[inline]
    pub fn is_target_for(&self, side: Side) -> bool {
        self.alive && !self.in_vehicle && side.is_hostile_to(self.side)
    }
}

// ── Spatial index entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct PedEntry {
    point: [f64; 2],
    id:    PedId,
}

impl RTreeObject for PedEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PedEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[inline]
fn key(p: WorldPoint) -> [f64; 2] {
    [p.x as f64, p.y as f64]
}

// ── WorldView ─────────────────────────────────────────────────────────────────

/// Per-tick view of the mission shared by every behaviour callback.
///
/// `peds[id.index()]` holds every ped, dead ones included.  Only live peds
/// are in the spatial index, keyed by lateral world position.
pub struct WorldView {
    peds:        Vec<PedSnapshot>,
    index:       RTree<PedEntry>,
    armed_count: usize,
}

impl WorldView {
    pub fn build(peds: &PedStore, weapons: &WeaponStore) -> Self {
        let snapshots: Vec<PedSnapshot> = peds
            .peds
            .iter()
            .map(|p| {
                let class = p.selected_class(weapons);
                PedSnapshot {
                    id:           p.id,
                    kind:         p.kind,
                    side:         p.side,
                    position:     p.position,
                    world:        p.position.to_world(),
                    alive:        p.is_alive(),
                    armed:        p.is_alive() && class.is_some_and(WeaponClass::is_armed),
                    persuadotron: p.is_alive() && class == Some(WeaponClass::Persuadotron),
                    in_vehicle:   p.in_vehicle(),
                    persuaded_by: p.persuaded_by,
                }
            })
            .collect();

        let entries: Vec<PedEntry> = snapshots
            .iter()
            .filter(|s| s.alive)
            .map(|s| PedEntry { point: key(s.world), id: s.id })
            .collect();
        let armed_count = snapshots.iter().filter(|s| s.armed).count();

        Self { peds: snapshots, index: RTree::bulk_load(entries), armed_count }
    }

    #[inline]
    pub fn ped(&self, id: PedId) -> Option<&PedSnapshot> {
        self.peds.get(id.index())
    }

    pub fn peds(&self) -> &[PedSnapshot] {
        &self.peds
    }

    /// Live peds holding out a threatening weapon anywhere in the mission.
    #[inline]
    pub fn armed_count(&self) -> usize {
        self.armed_count
    }

    /// Live peds within `radius` world units of `centre` (lateral distance),
    /// in no particular order.
    pub fn within(&self, centre: WorldPoint, radius: f64) -> impl Iterator<Item = &PedSnapshot> + '_ {
        self.index
            .locate_within_distance(key(centre), radius * radius)
            .map(|e| &self.peds[e.id.index()])
    }

    /// Nearest live ped within `radius` world units that satisfies `pred`.
    pub fn nearest_where(
        &self,
        centre:   WorldPoint,
        radius:   f64,
        mut pred: impl FnMut(&PedSnapshot) -> bool,
    ) -> Option<&PedSnapshot> {
        let max_d2 = radius * radius;
        self.index
            .nearest_neighbor_iter_with_distance_2(&key(centre))
            .take_while(|(_, d2)| *d2 <= max_d2)
            .map(|(e, _)| &self.peds[e.id.index()])
            .find(|s| pred(s))
    }

    /// Nearest ped `me` may attack within `radius_tiles`.
    pub fn nearest_hostile(&self, me: PedId, radius_tiles: i32) -> Option<&PedSnapshot> {
        let me = self.ped(me)?;
        let side = me.side;
        let id = me.id;
        self.nearest_where(me.world, tiles(radius_tiles), |s| s.id != id && s.is_target_for(side))
    }

    /// Nearest armed ped other than `me` within `radius_tiles`, whatever its
    /// side.
    pub fn nearest_armed(&self, me: PedId, radius_tiles: i32) -> Option<&PedSnapshot> {
        let me = self.ped(me)?;
        let id = me.id;
        self.nearest_where(me.world, tiles(radius_tiles), |s| s.id != id && s.armed)
    }
}

/// Tile radius to world units.
#[inline]
pub fn tiles(radius_tiles: i32) -> f64 {
    (radius_tiles.max(0) * TILE_XY) as f64
}
