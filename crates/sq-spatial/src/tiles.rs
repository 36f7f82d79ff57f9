//! Raw tile data consumed by the connectivity builder.
//!
//! Tile graphics and map-file decoding live outside this crate; what
//! arrives here is already a grid of [`TileKind`]s.  [`TileSource`] is the
//! read-only seam: the mission can hand over its own storage, and tests use
//! the in-memory [`TileGrid`].

use sq_core::{Dir8, MapSize, TilePoint};

use crate::{SpatialError, SpatialResult};

/// Orientation of a stair/ramp tile, named after the direction it rises
/// toward.  Entering from the opposite side keeps the level; leaving toward
/// the rising side climbs one level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slope {
    RisingE,
    RisingW,
    RisingS,
    RisingN,
}

impl Slope {
    /// Lateral direction of the climb.
    #[inline]
    pub fn rise(self) -> Dir8 {
        match self {
            Slope::RisingE => Dir8::E,
            Slope::RisingW => Dir8::W,
            Slope::RisingS => Dir8::S,
            Slope::RisingN => Dir8::N,
        }
    }

    /// `true` when `dir` runs along the climb axis, either way.
    #[inline]
    pub fn is_along(self, dir: Dir8) -> bool {
        dir == self.rise() || dir == self.rise().opposite()
    }

    /// Surface height (0–127) at a sub-tile offset.
    pub fn height_at(self, ox: i32, oy: i32) -> i32 {
        let h = match self {
            Slope::RisingE => ox,
            Slope::RisingW => 255 - ox,
            Slope::RisingS => oy,
            Slope::RisingN => 255 - oy,
        };
        (h / 2).clamp(0, 127)
    }
}

/// Walking surface of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Surface {
    #[default]
    Flat,
    Slope(Slope),
}

impl Surface {
    #[inline]
    pub fn slope(self) -> Option<Slope> {
        match self {
            Surface::Flat => None,
            Surface::Slope(s) => Some(s),
        }
    }

    #[inline]
    pub fn is_slope(self) -> bool {
        matches!(self, Surface::Slope(_))
    }
}

/// Tile type as decoded from the map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    /// Open air.
    #[default]
    Empty,
    /// Pavement, interior floors.
    Floor,
    /// Walkable, but avoided by peds wandering on their own.
    Road,
    Stairs(Slope),
    /// Walls, building blocks; also blocks headroom of the tile below.
    Solid,
    /// Fences and railings: occupies a tile without blocking headroom.
    Fence,
}

impl TileKind {
    /// Member of the walkable set.
    #[inline]
    pub fn is_walkable_kind(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Road | TileKind::Stairs(_))
    }

    #[inline]
    pub fn surface(self) -> Surface {
        match self {
            TileKind::Stairs(s) => Surface::Slope(s),
            _ => Surface::Flat,
        }
    }

    /// Whether a ped may step here of its own accord.
    #[inline]
    pub fn is_safe(self) -> bool {
        !matches!(self, TileKind::Road)
    }
}

/// Read-only access to decoded map tiles.
pub trait TileSource {
    fn size(&self) -> MapSize;

    /// Tile type; out-of-bounds coordinates read as [`TileKind::Empty`].
    fn kind(&self, tx: i32, ty: i32, tz: i32) -> TileKind;

    /// `true` when an impassable static object stands on the tile.
    fn is_obstructed(&self, _tx: i32, _ty: i32, _tz: i32) -> bool {
        false
    }
}

// ── TileGrid ──────────────────────────────────────────────────────────────────

/// Dense in-memory tile grid, indexed like [`MapSize::index_of`].
#[derive(Clone, Debug)]
pub struct TileGrid {
    size:      MapSize,
    tiles:     Vec<TileKind>,
    obstacles: Vec<bool>,
}

impl TileGrid {
    /// A grid of `size` filled with [`TileKind::Empty`].
    pub fn new(size: MapSize) -> Self {
        let n = size.tile_count();
        Self { size, tiles: vec![TileKind::Empty; n], obstacles: vec![false; n] }
    }

    /// Wrap pre-decoded tile data.
    pub fn from_tiles(size: MapSize, tiles: Vec<TileKind>) -> SpatialResult<Self> {
        if tiles.len() != size.tile_count() {
            return Err(SpatialError::SizeMismatch { size, got: tiles.len() });
        }
        let n = tiles.len();
        Ok(Self { size, tiles, obstacles: vec![false; n] })
    }

    pub fn set(&mut self, tx: i32, ty: i32, tz: i32, kind: TileKind) -> SpatialResult<()> {
        let idx = self
            .size
            .index_of(tx, ty, tz)
            .ok_or(SpatialError::OutOfBounds(TilePoint::tile(tx, ty, tz)))?;
        self.tiles[idx] = kind;
        Ok(())
    }

    /// Fill an axis-aligned box (inclusive corners) with `kind`.
    pub fn fill(
        &mut self,
        from: (i32, i32, i32),
        to:   (i32, i32, i32),
        kind: TileKind,
    ) -> SpatialResult<()> {
        for z in from.2.min(to.2)..=from.2.max(to.2) {
            for y in from.1.min(to.1)..=from.1.max(to.1) {
                for x in from.0.min(to.0)..=from.0.max(to.0) {
                    self.set(x, y, z, kind)?;
                }
            }
        }
        Ok(())
    }

    pub fn set_obstacle(&mut self, tx: i32, ty: i32, tz: i32, blocked: bool) -> SpatialResult<()> {
        let idx = self
            .size
            .index_of(tx, ty, tz)
            .ok_or(SpatialError::OutOfBounds(TilePoint::tile(tx, ty, tz)))?;
        self.obstacles[idx] = blocked;
        Ok(())
    }
}

impl TileSource for TileGrid {
    fn size(&self) -> MapSize {
        self.size
    }

    fn kind(&self, tx: i32, ty: i32, tz: i32) -> TileKind {
        self.size
            .index_of(tx, ty, tz)
            .map(|i| self.tiles[i])
            .unwrap_or(TileKind::Empty)
    }

    fn is_obstructed(&self, tx: i32, ty: i32, tz: i32) -> bool {
        self.size
            .index_of(tx, ty, tz)
            .map(|i| self.obstacles[i])
            .unwrap_or(false)
    }
}
