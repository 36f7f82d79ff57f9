//! Path blockers: vehicles, gates and similar obstacles that a walking ped
//! must wait for or give up on.

use sq_core::TilePoint;

/// What the mover does when it comes within range of a blocker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockerMode {
    /// Hold position, keeping the path, until the blocker is removed.
    Wait,
    /// Drop the remaining path and stop.
    Clear,
}

/// A caller-installed obstacle checked before every path-following frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathBlocker {
    pub tile:         TilePoint,
    /// Chebyshev tile distance at which the blocker takes effect.
    pub radius_tiles: i32,
    pub mode:         BlockerMode,
}

impl PathBlocker {
    pub fn new(tile: TilePoint, radius_tiles: i32, mode: BlockerMode) -> Self {
        Self { tile, radius_tiles, mode }
    }

    /// `true` when `pos` is close enough for the blocker to apply.  Blockers
    /// only act on their own level.
    #[inline]
    pub fn applies_to(&self, pos: &TilePoint) -> bool {
        pos.tz == self.tile.tz && pos.tile_distance(&self.tile) <= self.radius_tiles
    }
}
