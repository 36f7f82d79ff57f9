//! Per-tile directional connectivity.
//!
//! # Data layout
//!
//! One [`ConnectivityNode`] per tile, stored densely in the order of
//! [`MapSize::index_of`].  Each node holds three 8-bit masks, one bit per
//! lateral [`Dir8`]:
//!
//! ```text
//! up    — neighbour one level higher is reachable in that direction
//! level — neighbour on the same level is reachable
//! down  — neighbour one level lower is reachable
//! ```
//!
//! Masks are symmetric: if A has a bit toward B, B has the mirrored bit
//! toward A.  The router relies on this when it floods backwards from the
//! destination.
//!
//! Nodes are derived purely from [`TileSource`] data, so a full
//! [`build`](ConnectivityMap::build) and a local
//! [`rebuild_around`](ConnectivityMap::rebuild_around) produce identical
//! bits for the same tiles.

use sq_core::{Dir8, MapSize, TilePoint};

use crate::{Surface, TileSource};

// ── NodeStatus ────────────────────────────────────────────────────────────────

/// Flag set carried by every node; the router's scratch copy adds the flood
/// markers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct NodeStatus(u8);

impl NodeStatus {
    pub const WALKABLE:     NodeStatus = NodeStatus(0x01);
    pub const NON_WALKABLE: NodeStatus = NodeStatus(0x02);
    /// Visited by the flood rooted at the start tile.
    pub const BASE_POINT:   NodeStatus = NodeStatus(0x04);
    /// Visited by the flood rooted at the destination tile.
    pub const TARGET_POINT: NodeStatus = NodeStatus(0x08);
    /// Where the two floods touched.
    pub const LINK:         NodeStatus = NodeStatus(0x10);
    /// The true destination; never pruned.
    pub const CONSTANT:     NodeStatus = NodeStatus(0x20);

    #[inline]
    pub fn contains(self, other: NodeStatus) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: NodeStatus) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: NodeStatus) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for NodeStatus {
    type Output = NodeStatus;
    fn bitor(self, rhs: NodeStatus) -> NodeStatus {
        NodeStatus(self.0 | rhs.0)
    }
}

// ── ConnectivityNode ──────────────────────────────────────────────────────────

/// Connectivity record of a single tile.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct ConnectivityNode {
    pub up:      u8,
    pub level:   u8,
    pub down:    u8,
    pub status:  NodeStatus,
    pub surface: Surface,
    /// Safe for peds walking freely (see [`TileKind::is_safe`](crate::TileKind::is_safe)).
    pub safe:    bool,
}

impl ConnectivityNode {
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.status.contains(NodeStatus::WALKABLE)
    }

    /// Mask for a level change of `dz` (-1, 0, +1).
    #[inline]
    pub fn mask(&self, dz: i32) -> u8 {
        match dz {
            1 => self.up,
            0 => self.level,
            -1 => self.down,
            _ => 0,
        }
    }

    /// `true` when any mask has a bit toward `dir`.
    #[inline]
    pub fn any_toward(&self, dir: Dir8) -> bool {
        (self.up | self.level | self.down) & dir.bit() != 0
    }
}

// ── ConnectivityMap ───────────────────────────────────────────────────────────

/// Connectivity of every tile of a map.
#[derive(Clone, Debug)]
pub struct ConnectivityMap {
    size:  MapSize,
    nodes: Vec<ConnectivityNode>,
}

impl ConnectivityMap {
    /// Derive the map from raw tiles.  A degenerate map yields no nodes, so
    /// every query answers "not walkable".
    pub fn build<T: TileSource + ?Sized>(tiles: &T) -> Self {
        let size = tiles.size();
        let nodes = (0..size.tile_count())
            .map(|i| {
                let (x, y, z) = size.coords_of(i);
                compute_node(tiles, x, y, z)
            })
            .collect();
        Self { size, nodes }
    }

    /// Re-derive the nodes whose masks can depend on `tile` after its
    /// geometry changed (a wall destroyed, a fence added…).
    ///
    /// A tile influences its own walkability, the headroom of the tile below,
    /// and the masks of every tile within one step of either.
    pub fn rebuild_around<T: TileSource + ?Sized>(&mut self, tiles: &T, tile: TilePoint) {
        let size = self.size;
        for z in (tile.tz - 2)..=(tile.tz + 1) {
            for y in (tile.ty - 2)..=(tile.ty + 2) {
                for x in (tile.tx - 2)..=(tile.tx + 2) {
                    if let Some(idx) = size.index_of(x, y, z) {
                        self.nodes[idx] = compute_node(tiles, x, y, z);
                    }
                }
            }
        }
    }

    #[inline]
    pub fn size(&self) -> MapSize {
        self.size
    }

    #[inline]
    pub fn index_of(&self, tile: &TilePoint) -> Option<usize> {
        self.size.index_of(tile.tx, tile.ty, tile.tz)
    }

    /// Tile (centred) for a node index.
    #[inline]
    pub fn tile_at(&self, index: usize) -> TilePoint {
        let (x, y, z) = self.size.coords_of(index);
        TilePoint::tile(x, y, z)
    }

    #[inline]
    pub fn node(&self, index: usize) -> &ConnectivityNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[ConnectivityNode] {
        &self.nodes
    }

    pub fn node_at(&self, tile: &TilePoint) -> Option<&ConnectivityNode> {
        self.index_of(tile).map(|i| &self.nodes[i])
    }

    /// `false` for out-of-bounds tiles.
    pub fn is_walkable(&self, tile: &TilePoint) -> bool {
        self.node_at(tile).is_some_and(ConnectivityNode::is_walkable)
    }

    /// `false` for out-of-bounds and non-walkable tiles.
    pub fn is_safe(&self, tile: &TilePoint) -> bool {
        self.node_at(tile).is_some_and(|n| n.is_walkable() && n.safe)
    }

    pub fn surface(&self, tile: &TilePoint) -> Surface {
        self.node_at(tile).map(|n| n.surface).unwrap_or_default()
    }

    /// `(up, level, down)` masks; all zero out of bounds.
    pub fn neighbor_mask(&self, tile: &TilePoint) -> (u8, u8, u8) {
        self.node_at(tile)
            .map(|n| (n.up, n.level, n.down))
            .unwrap_or((0, 0, 0))
    }

    /// `true` when stepping from `tile` in `dir` with level change `dz` is
    /// allowed.
    pub fn allows(&self, tile: &TilePoint, dir: Dir8, dz: i32) -> bool {
        self.node_at(tile).is_some_and(|n| n.mask(dz) & dir.bit() != 0)
    }

    /// Level change (`-1`, `0`, `+1`) used when leaving `tile` toward `dir`,
    /// if any.  Level moves win over climbs when both exist.
    pub fn step_dz(&self, tile: &TilePoint, dir: Dir8) -> Option<i32> {
        let node = self.node_at(tile)?;
        [0, 1, -1].into_iter().find(|&dz| node.mask(dz) & dir.bit() != 0)
    }

    /// Every reachable neighbour of node `index` as `(dir, dz, neighbour)`,
    /// in mask-bit order, level moves first.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (Dir8, i32, usize)> + '_ {
        let node = self.nodes[index];
        let (x, y, z) = self.size.coords_of(index);
        let size = self.size;
        [0, 1, -1].into_iter().flat_map(move |dz| {
            let mask = node.mask(dz);
            Dir8::ALL.into_iter().filter_map(move |dir| {
                if mask & dir.bit() == 0 {
                    return None;
                }
                let (dx, dy) = dir.delta();
                size.index_of(x + dx, y + dy, z + dz).map(|n| (dir, dz, n))
            })
        })
    }
}

// ── Node derivation ───────────────────────────────────────────────────────────

/// A tile can be stood on: walkable kind, no static obstacle, and no solid
/// block directly above.
fn walkable<T: TileSource + ?Sized>(tiles: &T, x: i32, y: i32, z: i32) -> bool {
    tiles.size().contains(x, y, z)
        && tiles.kind(x, y, z).is_walkable_kind()
        && !tiles.is_obstructed(x, y, z)
        && tiles.kind(x, y, z + 1) != crate::TileKind::Solid
}

fn compute_node<T: TileSource + ?Sized>(tiles: &T, x: i32, y: i32, z: i32) -> ConnectivityNode {
    let kind = tiles.kind(x, y, z);
    let mut node = ConnectivityNode {
        surface: kind.surface(),
        safe: kind.is_safe(),
        ..ConnectivityNode::default()
    };
    if !walkable(tiles, x, y, z) {
        node.status = NodeStatus::NON_WALKABLE;
        return node;
    }
    node.status = NodeStatus::WALKABLE;
    let here = kind.surface();

    for dir in Dir8::ALL {
        let (dx, dy) = dir.delta();
        let (nx, ny) = (x + dx, y + dy);

        if walkable(tiles, nx, ny, z)
            && level_step_ok(tiles, x, y, z, dir, here, tiles.kind(nx, ny, z).surface())
        {
            node.level |= dir.bit();
        }
        if walkable(tiles, nx, ny, z + 1) && up_step_ok(dir, here, tiles.kind(nx, ny, z + 1).surface()) {
            node.up |= dir.bit();
        }
        if walkable(tiles, nx, ny, z - 1) && down_step_ok(dir, here, tiles.kind(nx, ny, z - 1).surface()) {
            node.down |= dir.bit();
        }
    }
    node
}

fn level_step_ok<T: TileSource + ?Sized>(
    tiles: &T,
    x: i32,
    y: i32,
    z: i32,
    dir: Dir8,
    from: Surface,
    to: Surface,
) -> bool {
    match (from, to) {
        (Surface::Flat, Surface::Flat) => match dir.components() {
            None => true,
            // No corner cutting: both sides of a diagonal must be open.
            Some((a, b)) => {
                let (ax, ay) = a.delta();
                let (bx, by) = b.delta();
                walkable(tiles, x + ax, y + ay, z) && walkable(tiles, x + bx, y + by, z)
            }
        },
        (Surface::Slope(s), Surface::Flat) => dir == s.rise().opposite(),
        (Surface::Flat, Surface::Slope(s)) => dir == s.rise(),
        (Surface::Slope(a), Surface::Slope(b)) => a == b && !dir.is_diagonal() && !a.is_along(dir),
    }
}

fn up_step_ok(dir: Dir8, from: Surface, to: Surface) -> bool {
    match from {
        Surface::Slope(s) => dir == s.rise() && (to == Surface::Flat || to == from),
        Surface::Flat => false,
    }
}

fn down_step_ok(dir: Dir8, from: Surface, to: Surface) -> bool {
    match to {
        Surface::Slope(s) => dir == s.rise().opposite() && (from == Surface::Flat || from == to),
        Surface::Flat => false,
    }
}
