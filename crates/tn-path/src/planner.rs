//! Planner trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `tn-motion` calls search through the [`Planner`] trait, so applications
//! can swap in A*, hierarchical or cached planners without touching the
//! executor.  The default [`DijkstraPlanner`] is a uniform-cost search.
//!
//! # Costs
//!
//! Entering a tile costs that tile's declared `cost`.  Negative costs are
//! treated as zero and non-finite costs make the tile impassable, so the
//! search never sees a negative edge.
//!
//! # Determinism
//!
//! Ties on cost are broken by discovery order (a monotonically increasing
//! sequence number), never by position or hash order.  Results depend only
//! on the graph, the budget and the traversal profile.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use tn_core::{TileId, TraversalProfile};
use tn_grid::{Tile, TileGraph};

// ── Path ──────────────────────────────────────────────────────────────────────

/// An ordered tile sequence from start to target with cumulative cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Tiles in travel order; `tiles[0]` is the start.
    pub tiles: Vec<TileId>,
    /// Cumulative entry cost at each tile; `costs[0] == 0`.
    pub costs: Vec<f32>,
}

impl Path {
    /// A path that starts and ends on `tile`.
    pub fn trivial(tile: TileId) -> Self {
        Self { tiles: vec![tile], costs: vec![0.0] }
    }

    pub fn total_cost(&self) -> f32 {
        self.costs.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// `true` if start and target are the same tile.
    pub fn is_trivial(&self) -> bool {
        self.tiles.len() <= 1
    }

    pub fn start(&self) -> Option<TileId> {
        self.tiles.first().copied()
    }

    pub fn target(&self) -> Option<TileId> {
        self.tiles.last().copied()
    }
}

// ── Reachable ─────────────────────────────────────────────────────────────────

/// Result of a budgeted reachability query.
#[derive(Debug, Clone, Default)]
pub struct Reachable {
    start:     Option<TileId>,
    costs:     FxHashMap<TileId, f32>,
    prev:      FxHashMap<TileId, TileId>,
    /// Every tile settled within budget, in settle order.
    settled:   Vec<TileId>,
    /// `settled` minus tiles where the agent may not stop.
    stoppable: Vec<TileId>,
}

impl Reachable {
    fn empty() -> Self {
        Self::default()
    }

    /// Tiles the agent can end its move on, in settle order.
    pub fn tiles(&self) -> &[TileId] {
        &self.stoppable
    }

    /// All tiles within budget, including transit-only tiles such as ladders.
    pub fn settled(&self) -> &[TileId] {
        &self.settled
    }

    /// Least cumulative cost to `tile`, if it was settled.
    pub fn cost(&self, tile: TileId) -> Option<f32> {
        self.costs.get(&tile).copied()
    }

    /// Whether the agent can end its move on `tile`.
    pub fn contains(&self, tile: TileId) -> bool {
        self.stoppable.contains(&tile)
    }

    pub fn len(&self) -> usize {
        self.stoppable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stoppable.is_empty()
    }

    /// Rebuild the least-cost path to a settled tile without searching again.
    pub fn path_to(&self, tile: TileId) -> Option<Path> {
        self.costs.get(&tile)?;
        let start = self.start?;
        let mut tiles = vec![tile];
        let mut cur = tile;
        while cur != start {
            cur = *self.prev.get(&cur)?;
            tiles.push(cur);
        }
        tiles.reverse();
        let costs = tiles.iter().map(|t| self.costs[t]).collect();
        Some(Path { tiles, costs })
    }
}

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable search over a [`TileGraph`].
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one planner can serve parallel
/// reachability queries (feature `parallel`).
pub trait Planner: Send + Sync {
    /// Every tile whose least cumulative entry cost from `start` is within
    /// `budget`.
    fn reachable(
        &self,
        graph:   &TileGraph<'_>,
        start:   TileId,
        budget:  f32,
        profile: &TraversalProfile,
    ) -> Reachable;

    /// Least-cost path from `start` to `target`, unbounded by any budget.
    ///
    /// Returns `None` if no traversable route exists, if `target` is not a
    /// legal place to stop, or if `profile` has no modes.  `start == target`
    /// yields a trivial path.
    fn find_path(
        &self,
        graph:   &TileGraph<'_>,
        start:   TileId,
        target:  TileId,
        profile: &TraversalProfile,
    ) -> Option<Path>;
}

// ── DijkstraPlanner ───────────────────────────────────────────────────────────

/// Uniform-cost search with discovery-order tie breaking.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraPlanner;

impl Planner for DijkstraPlanner {
    fn reachable(
        &self,
        graph:   &TileGraph<'_>,
        start:   TileId,
        budget:  f32,
        profile: &TraversalProfile,
    ) -> Reachable {
        if profile.modes.is_empty() || graph.tile(start).is_none() {
            return Reachable::empty();
        }
        let mut search = Search::new(graph, profile, start);
        search.run(budget.max(0.0), None);

        let stoppable = search
            .settled
            .iter()
            .copied()
            .filter(|&t| graph.can_stop_here(t, profile))
            .collect();
        trace!(
            "reachable from {start}: {} settled, budget {budget}",
            search.settled.len()
        );
        Reachable {
            start: Some(start),
            costs: search.dist,
            prev: search.prev,
            settled: search.settled,
            stoppable,
        }
    }

    fn find_path(
        &self,
        graph:   &TileGraph<'_>,
        start:   TileId,
        target:  TileId,
        profile: &TraversalProfile,
    ) -> Option<Path> {
        if profile.modes.is_empty() {
            debug!("find_path {start} -> {target}: no available movement modes");
            return None;
        }
        graph.tile(start)?;
        if !graph.can_stop_here(target, profile) {
            debug!("find_path {start} -> {target}: target is not a legal stop");
            return None;
        }
        if start == target {
            return Some(Path::trivial(start));
        }

        let mut search = Search::new(graph, profile, start);
        if search.run(f32::INFINITY, Some(target)) {
            search.reconstruct(target)
        } else {
            debug!("find_path {start} -> {target}: no route");
            None
        }
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Min-heap entry.  Lower cost first, then earlier discovery.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f32,
    seq:  u64,
    tile: TileId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Cost of entering `tile`, or `None` if it cannot be entered.
#[inline]
fn entry_cost(tile: &Tile) -> Option<f32> {
    tile.cost.is_finite().then(|| tile.cost.max(0.0))
}

struct Search<'g, 'a> {
    graph:   &'g TileGraph<'a>,
    profile: &'g TraversalProfile,
    start:   TileId,
    dist:    FxHashMap<TileId, f32>,
    prev:    FxHashMap<TileId, TileId>,
    done:    FxHashSet<TileId>,
    settled: Vec<TileId>,
    heap:    BinaryHeap<Frontier>,
    seq:     u64,
}

impl<'g, 'a> Search<'g, 'a> {
    fn new(graph: &'g TileGraph<'a>, profile: &'g TraversalProfile, start: TileId) -> Self {
        let mut dist = FxHashMap::default();
        dist.insert(start, 0.0);
        let mut heap = BinaryHeap::new();
        heap.push(Frontier { cost: 0.0, seq: 0, tile: start });
        Self {
            graph,
            profile,
            start,
            dist,
            prev: FxHashMap::default(),
            done: FxHashSet::default(),
            settled: Vec::new(),
            heap,
            seq: 1,
        }
    }

    /// Expand until the frontier is empty or `goal` is settled.  Returns
    /// whether `goal` was settled.
    fn run(&mut self, budget: f32, goal: Option<TileId>) -> bool {
        while let Some(Frontier { cost, tile, .. }) = self.heap.pop() {
            // Skip stale heap entries.
            if self.done.contains(&tile) || cost > self.dist.get(&tile).copied().unwrap_or(f32::INFINITY) {
                continue;
            }
            self.done.insert(tile);
            self.settled.push(tile);
            if goal == Some(tile) {
                return true;
            }

            for neighbour in self.graph.neighbours(tile) {
                if self.done.contains(&neighbour) {
                    continue;
                }
                let Some(next) = self.graph.tile(neighbour) else { continue };
                if !next.traversable(self.profile) {
                    continue;
                }
                let Some(step) = entry_cost(next) else { continue };
                let new_cost = cost + step;
                if new_cost > budget {
                    continue;
                }
                let known = self.dist.get(&neighbour).copied().unwrap_or(f32::INFINITY);
                if new_cost < known {
                    trace!("relax {tile} -> {neighbour}: {known} -> {new_cost}");
                    self.dist.insert(neighbour, new_cost);
                    self.prev.insert(neighbour, tile);
                    self.heap.push(Frontier { cost: new_cost, seq: self.seq, tile: neighbour });
                    self.seq += 1;
                }
            }
        }
        false
    }

    fn reconstruct(&self, target: TileId) -> Option<Path> {
        let mut tiles = vec![target];
        let mut cur = target;
        while cur != self.start {
            cur = *self.prev.get(&cur)?;
            tiles.push(cur);
        }
        tiles.reverse();
        let costs = tiles.iter().map(|t| self.dist[t]).collect();
        Some(Path { tiles, costs })
    }
}

// ── Batch queries ─────────────────────────────────────────────────────────────

/// Answer several `(start, budget)` reachability queries against one graph
/// snapshot.  Results are in request order.  With the `parallel` feature the
/// queries run on Rayon's thread pool.
pub fn reachable_batch<P: Planner>(
    planner:  &P,
    graph:    &TileGraph<'_>,
    requests: &[(TileId, f32)],
    profile:  &TraversalProfile,
) -> Vec<Reachable> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        requests
            .par_iter()
            .map(|&(start, budget)| planner.reachable(graph, start, budget, profile))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        requests
            .iter()
            .map(|&(start, budget)| planner.reachable(graph, start, budget, profile))
            .collect()
    }
}
