//! Collision tracing interface.
//!
//! The grid never owns geometry.  Obstruction checks and tile lookups go
//! through a [`CollisionService`] supplied by the embedding application.
//! Two small implementations are provided for geometry-free worlds and for
//! worlds whose only obstacles are vertical walls.

use tn_core::{QueryShape, TileId, Vec3};

/// Outcome of one trace.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TraceResult {
    /// Nothing between the two points.
    Clear,
    /// Something blocks the trace; `tile` is set when the blocking surface
    /// carries a tile.
    Hit { tile: Option<TileId> },
    /// The service could not decide (e.g. geometry not streamed in).
    Inconclusive,
}

/// Pluggable collision backend.
///
/// Implementations must be `Send + Sync` so one graph snapshot can be shared
/// by parallel reachability queries.
pub trait CollisionService: Send + Sync {
    /// Sweep `shape` from `from` to `to`.
    fn trace(&self, from: Vec3, to: Vec3, shape: &QueryShape) -> TraceResult;
}

// ── OpenSpace ─────────────────────────────────────────────────────────────────

/// A world with no geometry: every trace is clear.
#[derive(Copy, Clone, Debug, Default)]
pub struct OpenSpace;

impl CollisionService for OpenSpace {
    fn trace(&self, _from: Vec3, _to: Vec3, _shape: &QueryShape) -> TraceResult {
        TraceResult::Clear
    }
}

// ── WallSet ───────────────────────────────────────────────────────────────────

/// Infinitely tall walls given as XY line segments.  A trace is blocked when
/// its XY projection touches any wall; the query shape is ignored.
#[derive(Clone, Debug, Default)]
pub struct WallSet {
    walls: Vec<(Vec3, Vec3)>,
}

impl WallSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_wall(&mut self, a: Vec3, b: Vec3) {
        self.walls.push((a, b));
    }

    #[must_use]
    pub fn with_wall(mut self, a: Vec3, b: Vec3) -> Self {
        self.add_wall(a, b);
        self
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

impl CollisionService for WallSet {
    fn trace(&self, from: Vec3, to: Vec3, _shape: &QueryShape) -> TraceResult {
        if self.walls.iter().any(|&(a, b)| segments_touch_xy(from, to, a, b)) {
            TraceResult::Hit { tile: None }
        } else {
            TraceResult::Clear
        }
    }
}

#[inline]
fn cross_xy(o: Vec3, a: Vec3, b: Vec3) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment_xy(p: Vec3, a: Vec3, b: Vec3) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Segment intersection in the XY plane, counting touching endpoints and
/// collinear overlap as contact.
fn segments_touch_xy(p1: Vec3, p2: Vec3, q1: Vec3, q2: Vec3) -> bool {
    let d1 = cross_xy(q1, q2, p1);
    let d2 = cross_xy(q1, q2, p2);
    let d3 = cross_xy(p1, p2, q1);
    let d4 = cross_xy(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment_xy(p1, q1, q2))
        || (d2 == 0.0 && on_segment_xy(p2, q1, q2))
        || (d3 == 0.0 && on_segment_xy(q1, p1, p2))
        || (d4 == 0.0 && on_segment_xy(q2, p1, p2))
}
