//! Slope-aware waypoint offsets.
//!
//! Raw routes name tiles only.  Walking centre-to-centre is fine on flat
//! ground, but across a stair it would cut a diagonal through the ramp.
//! [`smooth_path`] pins the offsets around every slope crossing to the tile
//! edge on the slope's axis so the mover rides the surface.  It never adds,
//! removes or reorders tiles.

use sq_core::{Dir8, TilePoint};
use sq_core::geo::TILE_CENTRE;

use crate::{ConnectivityMap, Surface};

/// Offset of the tile edge reached by moving in `dir` along one axis:
/// `255` on the positive side, `0` on the negative side.
#[inline]
fn exit_edge(component: i32) -> i32 {
    if component > 0 { 255 } else { 0 }
}

/// Lateral direction from `a` to `b` (adjacent tiles).
fn step_dir(a: &TilePoint, b: &TilePoint) -> Option<Dir8> {
    Dir8::from_delta((b.tx - a.tx).signum(), (b.ty - a.ty).signum())
}

/// `(ox, oy)` pinned to the edge reached by moving in `dir` along the axis
/// of `dir` (which must be orthogonal), centred on the other axis.
fn edge_offsets(dir: Dir8, toward_exit: bool) -> (i32, i32) {
    let (dx, dy) = dir.delta();
    let (dx, dy) = if toward_exit { (dx, dy) } else { (-dx, -dy) };
    if dx != 0 {
        (exit_edge(dx), TILE_CENTRE)
    } else {
        (TILE_CENTRE, exit_edge(dy))
    }
}

/// Attach sub-tile offsets to a raw tile route.
///
/// * slope tiles sit on their centre line, pinned to the exit edge when the
///   route continues along the climb axis, with `oz` on the ramp surface;
/// * a flat tile before a slope is pinned to the edge facing it;
/// * a flat tile after a slope is pinned to the edge it was entered by;
/// * every other tile is centred;
/// * the final waypoint carries `destination`'s offsets unchanged.
pub fn smooth_path(
    map:         &ConnectivityMap,
    raw:         &[TilePoint],
    destination: TilePoint,
) -> Vec<TilePoint> {
    let n = raw.len();
    let mut out = Vec::with_capacity(n);

    for (i, tile) in raw.iter().enumerate() {
        let mut wp = tile.centred();
        if i + 1 == n {
            wp.ox = destination.ox;
            wp.oy = destination.oy;
            wp.oz = destination.oz;
            out.push(wp);
            break;
        }

        let here = map.surface(tile);
        let next = &raw[i + 1];
        let d_out = step_dir(tile, next);
        let d_in = if i > 0 { step_dir(&raw[i - 1], tile) } else { None };

        match here {
            Surface::Slope(slope) => {
                if let Some(d) = d_out.filter(|d| slope.is_along(*d)) {
                    (wp.ox, wp.oy) = edge_offsets(d, true);
                }
                wp.oz = slope.height_at(wp.ox, wp.oy);
            }
            Surface::Flat => {
                let next_slope = map.surface(next).slope();
                let prev_slope = if i > 0 { map.surface(&raw[i - 1]).slope() } else { None };

                if let (Some(s), Some(d)) = (next_slope, d_out) {
                    if s.is_along(d) {
                        (wp.ox, wp.oy) = edge_offsets(d, true);
                    }
                } else if let (Some(s), Some(d)) = (prev_slope, d_in) {
                    if s.is_along(d) {
                        (wp.ox, wp.oy) = edge_offsets(d, false);
                    }
                }
            }
        }
        out.push(wp);
    }
    out
}
