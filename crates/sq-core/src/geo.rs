//! Tile and world coordinates.
//!
//! A tile is 256 × 256 world units laterally and 128 units tall.  A
//! [`TilePoint`] names a tile plus a sub-tile offset; a [`WorldPoint`] is the
//! flattened absolute coordinate.  Conversion between the two is exact in
//! both directions for every non-negative coordinate.

use std::fmt;

use crate::Dir8;

/// Lateral size of a tile in world units.
pub const TILE_XY: i32 = 256;
/// Vertical size of a tile in world units.
pub const TILE_Z: i32 = 128;
/// Offset of the tile centre on the lateral axes.
pub const TILE_CENTRE: i32 = 128;

/// Map dimensions in tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapSize {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl MapSize {
    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Total tile count.  Zero for any degenerate dimension.
    pub fn tile_count(self) -> usize {
        if self.x <= 0 || self.y <= 0 || self.z <= 0 {
            0
        } else {
            self.x as usize * self.y as usize * self.z as usize
        }
    }

    #[inline]
    pub fn contains(self, tx: i32, ty: i32, tz: i32) -> bool {
        tx >= 0 && ty >= 0 && tz >= 0 && tx < self.x && ty < self.y && tz < self.z
    }

    /// Flat index of a tile, `None` when out of bounds.
    #[inline]
    pub fn index_of(self, tx: i32, ty: i32, tz: i32) -> Option<usize> {
        if !self.contains(tx, ty, tz) {
            return None;
        }
        Some(((tz as usize * self.y as usize) + ty as usize) * self.x as usize + tx as usize)
    }

    /// Inverse of [`index_of`](Self::index_of).
    #[inline]
    pub fn coords_of(self, index: usize) -> (i32, i32, i32) {
        let x = self.x as usize;
        let y = self.y as usize;
        ((index % x) as i32, ((index / x) % y) as i32, (index / (x * y)) as i32)
    }
}

// ── TilePoint ─────────────────────────────────────────────────────────────────

/// Integer tile coordinates plus sub-tile offsets.
///
/// `ox`, `oy` ∈ [0, 256), `oz` ∈ [0, 128).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePoint {
    pub tx: i32,
    pub ty: i32,
    pub tz: i32,
    pub ox: i32,
    pub oy: i32,
    pub oz: i32,
}

impl TilePoint {
    #[inline]
    pub fn new(tx: i32, ty: i32, tz: i32, ox: i32, oy: i32, oz: i32) -> Self {
        Self { tx, ty, tz, ox, oy, oz }
    }

    /// Tile at its lateral centre, floor level.
    #[inline]
    pub fn tile(tx: i32, ty: i32, tz: i32) -> Self {
        Self::new(tx, ty, tz, TILE_CENTRE, TILE_CENTRE, 0)
    }

    /// Same tile, offsets reset to the lateral centre.
    #[inline]
    pub fn centred(self) -> Self {
        Self::tile(self.tx, self.ty, self.tz)
    }

    /// `true` when both points name the same tile, offsets ignored.
    #[inline]
    pub fn tile_eq(&self, other: &TilePoint) -> bool {
        self.tx == other.tx && self.ty == other.ty && self.tz == other.tz
    }

    /// The neighbouring tile in `dir` shifted by `dz` levels (offsets centred).
    #[inline]
    pub fn step(self, dir: Dir8, dz: i32) -> TilePoint {
        let (dx, dy) = dir.delta();
        TilePoint::tile(self.tx + dx, self.ty + dy, self.tz + dz)
    }

    /// Chebyshev distance in tiles on the lateral plane.
    #[inline]
    pub fn tile_distance(&self, other: &TilePoint) -> i32 {
        (self.tx - other.tx).abs().max((self.ty - other.ty).abs())
    }

    #[inline]
    pub fn to_world(self) -> WorldPoint {
        WorldPoint {
            x: self.tx * TILE_XY + self.ox,
            y: self.ty * TILE_XY + self.oy,
            z: self.tz * TILE_Z + self.oz,
        }
    }

    /// Clamp tile coordinates into `size`, keeping offsets.
    pub fn clamped(self, size: MapSize) -> TilePoint {
        TilePoint {
            tx: self.tx.clamp(0, (size.x - 1).max(0)),
            ty: self.ty.clamp(0, (size.y - 1).max(0)),
            tz: self.tz.clamp(0, (size.z - 1).max(0)),
            ..self
        }
    }
}

impl fmt::Display for TilePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})+[{}, {}, {}]",
            self.tx, self.ty, self.tz, self.ox, self.oy, self.oz
        )
    }
}

// ── WorldPoint ────────────────────────────────────────────────────────────────

/// Absolute coordinate in world units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPoint {
    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_tile(self) -> TilePoint {
        TilePoint {
            tx: self.x.div_euclid(TILE_XY),
            ty: self.y.div_euclid(TILE_XY),
            tz: self.z.div_euclid(TILE_Z),
            ox: self.x.rem_euclid(TILE_XY),
            oy: self.y.rem_euclid(TILE_XY),
            oz: self.z.rem_euclid(TILE_Z),
        }
    }

    /// Lateral Euclidean distance in world units.
    #[inline]
    pub fn distance_xy(self, other: WorldPoint) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Full 3-D Euclidean distance in world units.
    #[inline]
    pub fn distance(self, other: WorldPoint) -> f64 {
        let dz = (other.z - self.z) as f64;
        let xy = self.distance_xy(other);
        (xy * xy + dz * dz).sqrt()
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}
