//! Lateral directions and headings.
//!
//! Headings are measured in 256ths of a full turn, counter-clockwise from
//! the +x axis in map space: `0` = +x (east), `64` = +y (south), `128` = -x,
//! `192` = -y.  The eight tile neighbours sit at multiples of 32.

use std::f64::consts::TAU;

use crate::WorldPoint;

/// One of the eight lateral neighbour directions.
///
/// The discriminant is the bit index used by connectivity masks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Dir8 {
    E  = 0,
    SE = 1,
    S  = 2,
    SW = 3,
    W  = 4,
    NW = 5,
    N  = 6,
    NE = 7,
}

impl Dir8 {
    /// All directions in mask-bit order.
    pub const ALL: [Dir8; 8] = [
        Dir8::E, Dir8::SE, Dir8::S, Dir8::SW, Dir8::W, Dir8::NW, Dir8::N, Dir8::NE,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Dir8 {
        Self::ALL[i % 8]
    }

    /// Single-bit mask for this direction.
    #[inline]
    pub fn bit(self) -> u8 {
        1u8 << (self as u8)
    }

    /// `(dx, dy)` tile step.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir8::E  => (1, 0),
            Dir8::SE => (1, 1),
            Dir8::S  => (0, 1),
            Dir8::SW => (-1, 1),
            Dir8::W  => (-1, 0),
            Dir8::NW => (-1, -1),
            Dir8::N  => (0, -1),
            Dir8::NE => (1, -1),
        }
    }

    /// Direction for a unit step; `None` for `(0, 0)` or steps longer than one.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Dir8> {
        Self::ALL.iter().copied().find(|d| d.delta() == (dx, dy))
    }

    #[inline]
    pub fn opposite(self) -> Dir8 {
        self.rotate(4)
    }

    /// Rotate by `steps` eighths of a turn (positive = clockwise on screen,
    /// towards +y).
    #[inline]
    pub fn rotate(self, steps: i32) -> Dir8 {
        Self::from_index((self as i32 + steps).rem_euclid(8) as usize)
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        (self as u8) % 2 == 1
    }

    /// The two orthogonal components of a diagonal, `None` for orthogonals.
    pub fn components(self) -> Option<(Dir8, Dir8)> {
        if self.is_diagonal() {
            Some((self.rotate(-1), self.rotate(1)))
        } else {
            None
        }
    }

    #[inline]
    pub fn angle(self) -> Angle {
        Angle((self as u8) * 32)
    }
}

/// Heading in 256ths of a turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Angle(pub u8);

impl Angle {
    /// Heading from `from` towards `to` on the lateral plane.  Zero when the
    /// points coincide.
    pub fn toward(from: WorldPoint, to: WorldPoint) -> Angle {
        let dx = (to.x - from.x) as f64;
        let dy = (to.y - from.y) as f64;
        if dx == 0.0 && dy == 0.0 {
            return Angle(0);
        }
        let turns = dy.atan2(dx).rem_euclid(TAU) / TAU;
        Angle(((turns * 256.0).round() as i32).rem_euclid(256) as u8)
    }

    /// Nearest of the eight lateral directions.
    #[inline]
    pub fn dir8(self) -> Dir8 {
        Dir8::from_index(((self.0 as usize + 16) / 32) % 8)
    }

    #[inline]
    pub fn wrapping_add(self, delta: i32) -> Angle {
        Angle((self.0 as i32 + delta).rem_euclid(256) as u8)
    }

    #[inline]
    pub fn opposite(self) -> Angle {
        self.wrapping_add(128)
    }

    /// `(cos, sin)` of the heading.
    pub fn unit_vector(self) -> (f64, f64) {
        let rad = self.0 as f64 / 256.0 * TAU;
        (rad.cos(), rad.sin())
    }
}
