//! Unit tests for sq-spatial.
//!
//! All tests use hand-built grids so they run without any map files.

#[cfg(test)]
mod helpers {
    use sq_core::{MapSize, TilePoint};

    use crate::{ConnectivityMap, TileGrid, TileKind};

    /// A 1-tile-wide floor corridor `len` tiles long along +x.
    pub fn corridor(len: i32) -> TileGrid {
        let mut g = TileGrid::new(MapSize::new(len, 1, 1));
        g.fill((0, 0, 0), (len - 1, 0, 0), TileKind::Floor).unwrap();
        g
    }

    /// Open `w × h` floor on a single level.
    pub fn open_floor(w: i32, h: i32) -> TileGrid {
        let mut g = TileGrid::new(MapSize::new(w, h, 1));
        g.fill((0, 0, 0), (w - 1, h - 1, 0), TileKind::Floor).unwrap();
        g
    }

    /// Two-level strip: floor at x=0..1 on z=0, a stair rising east at
    /// (2,0,0), solid ground under the upper floor at x=3..4 on z=1.
    pub fn one_stair() -> TileGrid {
        let mut g = TileGrid::new(MapSize::new(5, 1, 2));
        g.fill((0, 0, 0), (1, 0, 0), TileKind::Floor).unwrap();
        g.set(2, 0, 0, TileKind::Stairs(crate::Slope::RisingE)).unwrap();
        g.fill((3, 0, 0), (4, 0, 0), TileKind::Solid).unwrap();
        g.fill((3, 0, 1), (4, 0, 1), TileKind::Floor).unwrap();
        g
    }

    pub fn tiles(path: &[TilePoint]) -> Vec<(i32, i32, i32)> {
        path.iter().map(|t| (t.tx, t.ty, t.tz)).collect()
    }

    /// Every consecutive pair must be joined by a mask bit of the departing
    /// tile matching direction and level change.
    pub fn assert_valid(map: &ConnectivityMap, path: &[TilePoint]) {
        for pair in path.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let dir = sq_core::Dir8::from_delta(b.tx - a.tx, b.ty - a.ty)
                .unwrap_or_else(|| panic!("{a} -> {b} is not a lateral step"));
            let dz = b.tz - a.tz;
            assert!(map.allows(a, dir, dz), "{a} -> {b} not allowed by masks");
        }
    }
}

// ── Connectivity map ───────────────────────────────────────────────────────────

#[cfg(test)]
mod connectivity {
    use sq_core::{Dir8, MapSize, TilePoint};

    use super::helpers::*;
    use crate::{ConnectivityMap, Slope, Surface, TileGrid, TileKind};

    #[test]
    fn degenerate_map_is_all_non_walkable() {
        let map = ConnectivityMap::build(&TileGrid::new(MapSize::new(0, 3, 3)));
        assert!(map.nodes().is_empty());
        assert!(!map.is_walkable(&TilePoint::tile(0, 0, 0)));
        assert_eq!(map.neighbor_mask(&TilePoint::tile(0, 0, 0)), (0, 0, 0));
    }

    #[test]
    fn corridor_masks_are_level_only() {
        let map = ConnectivityMap::build(&corridor(4));
        let (up, level, down) = map.neighbor_mask(&TilePoint::tile(1, 0, 0));
        assert_eq!(up, 0);
        assert_eq!(down, 0);
        assert_eq!(level, Dir8::E.bit() | Dir8::W.bit());
        let (_, end, _) = map.neighbor_mask(&TilePoint::tile(0, 0, 0));
        assert_eq!(end, Dir8::E.bit());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let grid = one_stair();
        let a = ConnectivityMap::build(&grid);
        let b = ConnectivityMap::build(&grid);
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn stair_masks() {
        let map = ConnectivityMap::build(&one_stair());
        let stair = TilePoint::tile(2, 0, 0);
        assert_eq!(map.surface(&stair), Surface::Slope(Slope::RisingE));
        let (up, level, down) = map.neighbor_mask(&stair);
        assert_eq!(up, Dir8::E.bit());
        assert_eq!(level, Dir8::W.bit());
        assert_eq!(down, 0);

        let (_, _, down_top) = map.neighbor_mask(&TilePoint::tile(3, 0, 1));
        assert_eq!(down_top, Dir8::W.bit());
        // The flat tile below the top landing is solid ground.
        assert!(!map.is_walkable(&TilePoint::tile(3, 0, 0)));
    }

    #[test]
    fn masks_are_symmetric() {
        let mut grid = open_floor(4, 4);
        grid.set(1, 1, 0, TileKind::Solid).unwrap();
        let map = ConnectivityMap::build(&grid);
        for idx in 0..map.nodes().len() {
            for (dir, dz, n) in map.neighbors(idx) {
                let back: Vec<_> = map.neighbors(n).filter(|&(_, _, m)| m == idx).collect();
                assert_eq!(back.len(), 1, "no return edge for {:?}", (dir, dz));
                assert_eq!(back[0].0, dir.opposite());
                assert_eq!(back[0].1, -dz);
            }
        }
    }

    #[test]
    fn diagonals_do_not_cut_corners() {
        let mut grid = open_floor(2, 2);
        grid.set(1, 0, 0, TileKind::Solid).unwrap();
        let map = ConnectivityMap::build(&grid);
        assert!(!map.allows(&TilePoint::tile(0, 0, 0), Dir8::SE, 0));
        assert!(map.allows(&TilePoint::tile(0, 0, 0), Dir8::S, 0));
    }

    #[test]
    fn solid_above_removes_headroom() {
        let mut grid = TileGrid::new(MapSize::new(1, 1, 2));
        grid.set(0, 0, 0, TileKind::Floor).unwrap();
        grid.set(0, 0, 1, TileKind::Solid).unwrap();
        let map = ConnectivityMap::build(&grid);
        assert!(!map.is_walkable(&TilePoint::tile(0, 0, 0)));
    }

    #[test]
    fn obstacles_and_roads() {
        let mut grid = corridor(3);
        grid.set(2, 0, 0, TileKind::Road).unwrap();
        grid.set_obstacle(1, 0, 0, true).unwrap();
        let map = ConnectivityMap::build(&grid);
        assert!(!map.is_walkable(&TilePoint::tile(1, 0, 0)));
        assert!(map.is_walkable(&TilePoint::tile(2, 0, 0)));
        assert!(!map.is_safe(&TilePoint::tile(2, 0, 0)));
        assert!(map.is_safe(&TilePoint::tile(0, 0, 0)));
    }

    #[test]
    fn local_rebuild_matches_full_build() {
        let mut grid = open_floor(6, 6);
        grid.fill((3, 0, 0), (3, 5, 0), TileKind::Solid).unwrap();
        let mut map = ConnectivityMap::build(&grid);

        // Knock a hole in the wall.
        grid.set(3, 2, 0, TileKind::Floor).unwrap();
        map.rebuild_around(&grid, TilePoint::tile(3, 2, 0));

        let fresh = ConnectivityMap::build(&grid);
        assert_eq!(map.nodes(), fresh.nodes());
        assert!(map.allows(&TilePoint::tile(2, 2, 0), Dir8::E, 0));
    }

    #[test]
    fn step_dz_prefers_level() {
        let map = ConnectivityMap::build(&one_stair());
        assert_eq!(map.step_dz(&TilePoint::tile(2, 0, 0), Dir8::E), Some(1));
        assert_eq!(map.step_dz(&TilePoint::tile(1, 0, 0), Dir8::E), Some(0));
        assert_eq!(map.step_dz(&TilePoint::tile(2, 0, 0), Dir8::N), None);
    }
}

// ── Flood router ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use sq_core::TilePoint;

    use super::helpers::*;
    use crate::{ConnectivityMap, FloodRouter, PathRequest, Router, TileKind};

    #[test]
    fn straight_corridor() {
        let map = ConnectivityMap::build(&corridor(6));
        let path = FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(5, 0, 0))
            .expect("corridor is open");
        assert_eq!(
            tiles(&path),
            vec![(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 0), (4, 0, 0), (5, 0, 0)]
        );
    }

    #[test]
    fn blocked_corridor() {
        let mut grid = corridor(6);
        grid.set(3, 0, 0, TileKind::Solid).unwrap();
        let map = ConnectivityMap::build(&grid);
        assert!(FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(5, 0, 0))
            .is_none());
    }

    #[test]
    fn one_tile_stair() {
        let map = ConnectivityMap::build(&one_stair());
        let path = FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(4, 0, 1))
            .expect("stair connects both levels");
        assert_eq!(
            tiles(&path),
            vec![(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 1), (4, 0, 1)]
        );
        assert_valid(&map, &path);
        assert!(map.allows(&path[2], sq_core::Dir8::E, 1), "crossing uses the up mask");
    }

    #[test]
    fn stair_route_downhill() {
        let map = ConnectivityMap::build(&one_stair());
        let path = FloodRouter
            .find_path(&map, TilePoint::tile(4, 0, 1), TilePoint::tile(0, 0, 0))
            .unwrap();
        assert_eq!(
            tiles(&path),
            vec![(4, 0, 1), (3, 0, 1), (2, 0, 0), (1, 0, 0), (0, 0, 0)]
        );
        assert_valid(&map, &path);
    }

    #[test]
    fn same_tile_is_no_path() {
        let map = ConnectivityMap::build(&corridor(3));
        let here = TilePoint::tile(1, 0, 0);
        assert!(FloodRouter.find_path(&map, here, here).is_none());
    }

    #[test]
    fn non_walkable_endpoints_fail() {
        let mut grid = corridor(4);
        grid.set(0, 0, 0, TileKind::Empty).unwrap();
        let map = ConnectivityMap::build(&grid);
        assert!(FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(3, 0, 0))
            .is_none());
        assert!(FloodRouter
            .find_path(&map, TilePoint::tile(3, 0, 0), TilePoint::tile(0, 0, 0))
            .is_none());
    }

    #[test]
    fn goal_is_clipped_into_bounds() {
        let map = ConnectivityMap::build(&corridor(4));
        let path = FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(40, 3, 0))
            .unwrap();
        assert_eq!(tiles(&path).last(), Some(&(3, 0, 0)));
    }

    #[test]
    fn adjacent_tiles() {
        let map = ConnectivityMap::build(&corridor(2));
        let path = FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(1, 0, 0))
            .unwrap();
        assert_eq!(tiles(&path), vec![(0, 0, 0), (1, 0, 0)]);
    }

    #[test]
    fn routes_around_a_wall() {
        let mut grid = open_floor(5, 5);
        grid.fill((2, 0, 0), (2, 3, 0), TileKind::Solid).unwrap();
        let map = ConnectivityMap::build(&grid);
        let path = FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(4, 0, 0))
            .unwrap();
        assert_valid(&map, &path);
        assert!(tiles(&path).contains(&(2, 4, 0)), "must squeeze through the gap");
        assert_eq!(tiles(&path).first(), Some(&(0, 0, 0)));
        assert_eq!(tiles(&path).last(), Some(&(4, 0, 0)));
    }

    #[test]
    fn open_floor_route_is_short() {
        let map = ConnectivityMap::build(&open_floor(3, 3));
        let path = FloodRouter
            .find_path(&map, TilePoint::tile(0, 1, 0), TilePoint::tile(2, 1, 0))
            .unwrap();
        assert_eq!(path.len(), 3);
        assert_valid(&map, &path);
    }

    #[test]
    fn open_floor_routes_stay_straight() {
        let map = ConnectivityMap::build(&open_floor(8, 8));
        let across = FloodRouter
            .find_path(&map, TilePoint::tile(1, 1, 0), TilePoint::tile(5, 1, 0))
            .unwrap();
        assert_eq!(tiles(&across), vec![(1, 1, 0), (2, 1, 0), (3, 1, 0), (4, 1, 0), (5, 1, 0)]);

        let down = FloodRouter
            .find_path(&map, TilePoint::tile(6, 1, 0), TilePoint::tile(6, 6, 0))
            .unwrap();
        assert_eq!(
            tiles(&down),
            vec![(6, 1, 0), (6, 2, 0), (6, 3, 0), (6, 4, 0), (6, 5, 0), (6, 6, 0)]
        );

        let diagonal = FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(4, 4, 0))
            .unwrap();
        assert_eq!(tiles(&diagonal), (0..=4).map(|i| (i, i, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn batch_matches_single_calls() {
        let map = ConnectivityMap::build(&open_floor(6, 6));
        let requests = vec![
            PathRequest { start: TilePoint::tile(0, 0, 0), goal: TilePoint::tile(5, 5, 0) },
            PathRequest { start: TilePoint::tile(2, 2, 0), goal: TilePoint::tile(2, 2, 0) },
            PathRequest { start: TilePoint::tile(5, 0, 0), goal: TilePoint::tile(0, 4, 0) },
        ];
        let batch = FloodRouter.find_paths(&map, &requests);
        assert_eq!(batch.len(), 3);
        for (req, got) in requests.iter().zip(&batch) {
            assert_eq!(got, &FloodRouter.find_path(&map, req.start, req.goal));
        }
        assert!(batch[1].is_none());
    }
}

// ── Random maps: termination, validity, no-path correctness ───────────────────

#[cfg(test)]
mod random_maps {
    use std::collections::VecDeque;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use sq_core::{MapSize, TilePoint};

    use super::helpers::assert_valid;
    use crate::{ConnectivityMap, FloodRouter, Router, TileGrid, TileKind};

    fn random_grid(rng: &mut SmallRng, w: i32, h: i32) -> TileGrid {
        let mut g = TileGrid::new(MapSize::new(w, h, 1));
        for y in 0..h {
            for x in 0..w {
                let kind = if rng.gen_bool(0.3) { TileKind::Solid } else { TileKind::Floor };
                g.set(x, y, 0, kind).unwrap();
            }
        }
        g
    }

    /// Plain BFS over the masks, used as ground truth for reachability.
    fn reachable(map: &ConnectivityMap, from: usize, to: usize) -> bool {
        let mut seen = vec![false; map.nodes().len()];
        let mut queue = VecDeque::from([from]);
        seen[from] = true;
        while let Some(cur) = queue.pop_front() {
            if cur == to {
                return true;
            }
            for (_, _, n) in map.neighbors(cur) {
                if !seen[n] {
                    seen[n] = true;
                    queue.push_back(n);
                }
            }
        }
        false
    }

    #[test]
    fn flood_agrees_with_reference_bfs() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..40 {
            let grid = random_grid(&mut rng, 9, 7);
            let map = ConnectivityMap::build(&grid);
            for _ in 0..10 {
                let a = TilePoint::tile(rng.gen_range(0..9), rng.gen_range(0..7), 0);
                let b = TilePoint::tile(rng.gen_range(0..9), rng.gen_range(0..7), 0);
                let got = FloodRouter.find_path(&map, a, b);

                let (ia, ib) = (map.index_of(&a).unwrap(), map.index_of(&b).unwrap());
                let expect = map.is_walkable(&a)
                    && map.is_walkable(&b)
                    && ia != ib
                    && reachable(&map, ia, ib);
                assert_eq!(got.is_some(), expect, "{a} -> {b}");

                if let Some(path) = got {
                    assert!(path.first().unwrap().tile_eq(&a));
                    assert!(path.last().unwrap().tile_eq(&b));
                    assert!(path.len() <= map.nodes().len());
                    assert_valid(&map, &path);
                }
            }
        }
    }
}

// ── Path smoothing ────────────────────────────────────────────────────────────

#[cfg(test)]
mod smoothing {
    use sq_core::TilePoint;

    use super::helpers::*;
    use crate::{smooth_path, ConnectivityMap, FloodRouter, Router};

    #[test]
    fn flat_route_is_centred_with_exact_destination() {
        let map = ConnectivityMap::build(&corridor(4));
        let dest = TilePoint::new(3, 0, 0, 17, 200, 0);
        let path = FloodRouter
            .find_path_smoothed(&map, TilePoint::tile(0, 0, 0), dest)
            .unwrap();
        assert_eq!(path.len(), 4);
        for wp in &path[..3] {
            assert_eq!((wp.ox, wp.oy, wp.oz), (128, 128, 0));
        }
        assert_eq!(path[3], dest);
    }

    #[test]
    fn stair_crossing_snaps_to_slope_edges() {
        let map = ConnectivityMap::build(&one_stair());
        let raw = FloodRouter
            .find_path(&map, TilePoint::tile(0, 0, 0), TilePoint::tile(4, 0, 1))
            .unwrap();
        let smooth = smooth_path(&map, &raw, TilePoint::tile(4, 0, 1));

        assert_eq!(tiles(&smooth), tiles(&raw), "smoothing never changes tiles");
        // Flat tile before the ramp: pinned to the edge facing it.
        assert_eq!((smooth[1].ox, smooth[1].oy), (255, 128));
        // On the ramp: top edge, surface height.
        assert_eq!((smooth[2].ox, smooth[2].oy, smooth[2].oz), (255, 128, 127));
        // First tile after the ramp: entry edge.
        assert_eq!((smooth[3].ox, smooth[3].oy), (0, 128));
        // Continuous in world space across the crossing.
        let top = smooth[2].to_world();
        let landing = smooth[3].to_world();
        assert_eq!(landing.x - top.x, 1);
        assert_eq!(landing.z - top.z, 1);
    }

    #[test]
    fn empty_route_smooths_to_nothing() {
        let map = ConnectivityMap::build(&corridor(2));
        assert!(smooth_path(&map, &[], TilePoint::tile(0, 0, 0)).is_empty());
    }
}
