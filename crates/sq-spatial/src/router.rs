//! Routing trait and the default bidirectional flood router.
//!
//! # Pluggability
//!
//! Movement code calls routing through the [`Router`] trait so a mission can
//! swap in a different search without touching the mover.  [`FloodRouter`]
//! is the default.
//!
//! # Algorithm
//!
//! Two breadth-first floods grow in alternating rounds, one rooted at the
//! start ("base") and one at the destination ("target"), over a scratch copy
//! of the node statuses owned by the call.  The first round that touches a
//! tile claimed by the other flood ends the search; of the touching pairs it
//! found, the one nearest the straight start-goal line becomes the link.  The
//! floods are then pruned back to the tiles that lead to the link at
//! consistent depths, and the route is read off greedily from both ends,
//! preferring straight continuations and slope-aligned stair tiles.

use sq_core::{Dir8, TilePoint};

use crate::connectivity::{ConnectivityMap, NodeStatus};
use crate::smooth::smooth_path;

// ── PathRequest ───────────────────────────────────────────────────────────────

/// One routing query for batch calls.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathRequest {
    pub start: TilePoint,
    pub goal:  TilePoint,
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable tile router.
///
/// Implementations must be `Send + Sync` and keep no per-call state in
/// `self`, so a single router can serve every ped (and every thread with the
/// `parallel` feature).
pub trait Router: Send + Sync {
    /// Tile route from `start` to `goal`, both ends included, offsets
    /// centred.
    ///
    /// Returns `None` when either end is not walkable, when both ends are the
    /// same tile (callers handle "already there" themselves), or when the
    /// destination is unreachable.  `goal` is clipped into the map first.
    fn find_path(
        &self,
        map:   &ConnectivityMap,
        start: TilePoint,
        goal:  TilePoint,
    ) -> Option<Vec<TilePoint>>;

    /// Route plus slope-aware offsets; the last waypoint carries `goal`'s
    /// offsets exactly.
    fn find_path_smoothed(
        &self,
        map:   &ConnectivityMap,
        start: TilePoint,
        goal:  TilePoint,
    ) -> Option<Vec<TilePoint>> {
        let goal = goal.clamped(map.size());
        self.find_path(map, start, goal)
            .map(|tiles| smooth_path(map, &tiles, goal))
    }
}

// ── FloodRouter ───────────────────────────────────────────────────────────────

/// Bidirectional breadth-first flood over the connectivity masks.
#[derive(Copy, Clone, Debug, Default)]
pub struct FloodRouter;

impl Router for FloodRouter {
    fn find_path(
        &self,
        map:   &ConnectivityMap,
        start: TilePoint,
        goal:  TilePoint,
    ) -> Option<Vec<TilePoint>> {
        flood(map, start, goal)
    }
}

impl FloodRouter {
    /// Answer many requests at once.  Results are in request order.
    pub fn find_paths(
        &self,
        map:      &ConnectivityMap,
        requests: &[PathRequest],
    ) -> Vec<Option<Vec<TilePoint>>> {
        #[cfg(not(feature = "parallel"))]
        {
            requests
                .iter()
                .map(|r| self.find_path(map, r.start, r.goal))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            requests
                .par_iter()
                .map(|r| self.find_path(map, r.start, r.goal))
                .collect()
        }
    }
}

// ── Flood internals ───────────────────────────────────────────────────────────

/// Per-call working copy of node statuses and depths.  Owned by exactly one
/// `flood` call and dropped with it.
struct Scratch {
    status: Vec<NodeStatus>,
    depth:  Vec<u16>,
}

impl Scratch {
    fn from_map(map: &ConnectivityMap) -> Self {
        Self {
            status: map.nodes().iter().map(|n| n.status).collect(),
            depth:  vec![0; map.nodes().len()],
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Side {
    Base,
    Target,
}

impl Side {
    fn flag(self) -> NodeStatus {
        match self {
            Side::Base => NodeStatus::BASE_POINT,
            Side::Target => NodeStatus::TARGET_POINT,
        }
    }

    fn other(self) -> Side {
        match self {
            Side::Base => Side::Target,
            Side::Target => Side::Base,
        }
    }
}

/// Where the floods met: a base tile and the adjacent target tile.
struct Link {
    base:   usize,
    target: usize,
}

fn flood(map: &ConnectivityMap, start: TilePoint, goal: TilePoint) -> Option<Vec<TilePoint>> {
    let size = map.size();
    if size.tile_count() == 0 {
        return None;
    }
    let goal = goal.clamped(size);
    let s = map.index_of(&start)?;
    let g = map.index_of(&goal)?;
    if !map.node(s).is_walkable() || !map.node(g).is_walkable() {
        return None;
    }
    if s == g {
        return None;
    }

    let mut scratch = Scratch::from_map(map);
    scratch.status[s].insert(NodeStatus::BASE_POINT);
    scratch.status[g].insert(NodeStatus::TARGET_POINT | NodeStatus::CONSTANT);

    // levels[d] = tiles first reached at depth d.
    let mut base_levels:   Vec<Vec<usize>> = vec![vec![s]];
    let mut target_levels: Vec<Vec<usize>> = vec![vec![g]];

    let link = loop {
        let (next, touched) = expand(map, &mut scratch, base_levels.last()?, Side::Base);
        base_levels.push(next);
        if let Some(link) = pick_link(map, &scratch, &touched, Side::Base, s, g) {
            break link;
        }

        let (next, touched) = expand(map, &mut scratch, target_levels.last()?, Side::Target);
        target_levels.push(next);
        if let Some(link) = pick_link(map, &scratch, &touched, Side::Target, s, g) {
            break link;
        }

        // An exhausted flood has covered its whole component without meeting
        // the other one.
        let base_done = base_levels.last().is_some_and(Vec::is_empty);
        let target_done = target_levels.last().is_some_and(Vec::is_empty);
        if base_done || target_done {
            log::debug!("no route from {start} to {goal}");
            return None;
        }
    };

    scratch.status[link.base].insert(NodeStatus::LINK);
    scratch.status[link.target].insert(NodeStatus::LINK);

    prune(map, &mut scratch, &base_levels, link.base, Side::Base);
    prune(map, &mut scratch, &target_levels, link.target, Side::Target);

    reconstruct(map, &scratch, s, g, &link)
}

/// Expand one flood round.  Returns the new frontier and every
/// `(own tile, other tile)` pair where this round touched the other flood.
fn expand(
    map:      &ConnectivityMap,
    scratch:  &mut Scratch,
    frontier: &[usize],
    side:     Side,
) -> (Vec<usize>, Vec<(usize, usize)>) {
    let own = side.flag();
    let other = side.other().flag();
    let mut next = Vec::new();
    let mut touched = Vec::new();

    for &tile in frontier {
        let depth = scratch.depth[tile];
        for (_, _, n) in map.neighbors(tile) {
            let st = scratch.status[n];
            if st.contains(other) {
                touched.push((tile, n));
                continue;
            }
            if st.contains(own) || !st.contains(NodeStatus::WALKABLE) {
                continue;
            }
            scratch.status[n].insert(own);
            scratch.depth[n] = depth + 1;
            next.push(n);
        }
    }
    (next, touched)
}

/// Choose the link among the pairs one round touched: shortest total route
/// first, then the pair lying closest to the straight line from start to
/// goal.
fn pick_link(
    map:     &ConnectivityMap,
    scratch: &Scratch,
    touched: &[(usize, usize)],
    side:    Side,
    start:   usize,
    goal:    usize,
) -> Option<Link> {
    let (s, g) = (map.tile_at(start), map.tile_at(goal));
    let off_line = |i: usize| {
        let p = map.tile_at(i);
        ((g.tx - s.tx) * (p.ty - s.ty) - (g.ty - s.ty) * (p.tx - s.tx)).abs()
    };
    touched
        .iter()
        .map(|&(own, other)| match side {
            Side::Base => Link { base: own, target: other },
            Side::Target => Link { base: other, target: own },
        })
        .min_by_key(|l| {
            let hops = scratch.depth[l.base] as i32 + scratch.depth[l.target] as i32;
            (hops, off_line(l.base) + off_line(l.target))
        })
}

/// Drop flood tiles that do not lead to `link` one depth at a time.
///
/// Walking back from the link's depth, a tile survives only if it connects
/// to a surviving tile one level deeper.  Everything else (dead ends, and
/// the tiles the final round added past the link) loses its flood flag.
/// Mask symmetry lets both floods test the connection from the shallower
/// tile.
fn prune(
    map:     &ConnectivityMap,
    scratch: &mut Scratch,
    levels:  &[Vec<usize>],
    link:    usize,
    side:    Side,
) {
    let flag = side.flag();
    let link_depth = scratch.depth[link] as usize;
    let mut keep = vec![false; scratch.status.len()];
    keep[link] = true;

    for depth in (0..link_depth).rev() {
        for &u in &levels[depth] {
            let leads_on = map
                .neighbors(u)
                .any(|(_, _, v)| keep[v] && scratch.depth[v] as usize == depth + 1);
            if leads_on {
                keep[u] = true;
            }
        }
    }

    for level in levels {
        for &tile in level {
            if !keep[tile] && !scratch.status[tile].contains(NodeStatus::CONSTANT) {
                scratch.status[tile].remove(flag);
            }
        }
    }
}

/// Tie-break score for stepping onto `next` in `dir` (higher is better).
/// `aim` is the direction straight at the tile this leg is heading for.
fn step_score(
    map:      &ConnectivityMap,
    prev_dir: Option<Dir8>,
    aim:      Option<Dir8>,
    from:     usize,
    next:     usize,
    dir:      Dir8,
) -> i32 {
    let mut score = 0;
    match prev_dir {
        Some(p) if p == dir => score += 4,
        Some(p) if p.rotate(1) == dir || p.rotate(-1) == dir => score += 1,
        _ => {}
    }
    if aim == Some(dir) {
        score += 2;
    }
    let from_surface = map.node(from).surface;
    let next_surface = map.node(next).surface;
    if let Some(slope) = next_surface.slope() {
        if slope.is_along(dir) {
            score += 2;
        }
    }
    if from_surface == next_surface {
        score += 1;
    }
    score
}

/// Best neighbour of `cur` flagged `flag` at depth `want`, on the way to
/// `toward`.
fn best_step(
    map:      &ConnectivityMap,
    scratch:  &Scratch,
    cur:      usize,
    toward:   usize,
    flag:     NodeStatus,
    want:     u16,
    prev_dir: Option<Dir8>,
) -> Option<(Dir8, usize)> {
    let (c, t) = (map.tile_at(cur), map.tile_at(toward));
    let aim = Dir8::from_delta((t.tx - c.tx).signum(), (t.ty - c.ty).signum());
    let mut best: Option<(i32, Dir8, usize)> = None;
    for (dir, _, n) in map.neighbors(cur) {
        if !scratch.status[n].contains(flag) || scratch.depth[n] != want {
            continue;
        }
        let score = step_score(map, prev_dir, aim, cur, n, dir);
        if best.is_none_or(|(b, _, _)| score > b) {
            best = Some((score, dir, n));
        }
    }
    best.map(|(_, d, n)| (d, n))
}

fn reconstruct(
    map:     &ConnectivityMap,
    scratch: &Scratch,
    start:   usize,
    goal:    usize,
    link:    &Link,
) -> Option<Vec<TilePoint>> {
    let mut path = vec![map.tile_at(start)];
    let mut cur = start;
    let mut prev_dir = None;

    // Base side: depth rises by one per step until the link tile.
    while cur != link.base {
        let want = scratch.depth[cur] + 1;
        let Some((dir, next)) = best_step(map, scratch, cur, link.base, NodeStatus::BASE_POINT, want, prev_dir)
        else {
            log::error!("flood reconstruction lost the base chain at {}", map.tile_at(cur));
            return None;
        };
        path.push(map.tile_at(next));
        prev_dir = Some(dir);
        cur = next;
    }

    // Cross the link.
    prev_dir = map
        .neighbors(cur)
        .find(|&(_, _, n)| n == link.target)
        .map(|(d, _, _)| d);
    cur = link.target;
    path.push(map.tile_at(cur));

    // Target side: depth falls by one per step down to the destination.
    while cur != goal {
        let Some(want) = scratch.depth[cur].checked_sub(1) else {
            log::error!("flood reconstruction ran past the target root at {}", map.tile_at(cur));
            return None;
        };
        let Some((dir, next)) =
            best_step(map, scratch, cur, goal, NodeStatus::TARGET_POINT, want, prev_dir)
        else {
            log::error!("flood reconstruction lost the target chain at {}", map.tile_at(cur));
            return None;
        };
        path.push(map.tile_at(next));
        prev_dir = Some(dir);
        cur = next;
    }

    Some(path)
}
