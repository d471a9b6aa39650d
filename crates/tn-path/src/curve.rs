//! Path curve and movement segments.
//!
//! A [`PathCurve`] is a polyline through the contact points of the
//! waypoints, parameterized by arc length.  [`PathSegment`]s partition
//! `[0, length)` and carry the movement modes legal on each stretch.
//!
//! | Edge                                 | Segment modes                         |
//! |--------------------------------------|---------------------------------------|
//! | between the two ends of one ladder   | `ClimbingUp` or `ClimbingDown`, hint  |
//! | anything else                        | `Walking` (+ `InPlaceTurn`)           |
//!
//! Both sets are intersected with the agent's available modes, so a
//! segment may end up empty; the executor treats that as unwalkable.

use log::trace;

use tn_core::{ModeSet, MovementMode, Rotator, TileId, TraversalProfile, Vec3};
use tn_grid::TileGraph;

// ── PathCurve ─────────────────────────────────────────────────────────────────

/// Arc-length parameterized polyline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathCurve {
    points:    Vec<Vec3>,
    /// Cumulative distance at each point; `distances[0] == 0`.
    distances: Vec<f32>,
}

impl PathCurve {
    /// Build from control points.  Consecutive duplicates are dropped.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut curve = Self::default();
        for p in points {
            curve.push(p);
        }
        curve
    }

    /// Append a point; returns `false` if it duplicated the last point.
    fn push(&mut self, p: Vec3) -> bool {
        match self.points.last() {
            None => {
                self.points.push(p);
                self.distances.push(0.0);
                true
            }
            Some(&last) if last == p => false,
            Some(&last) => {
                let d = self.length() + last.distance(p);
                self.points.push(p);
                self.distances.push(d);
                true
            }
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Cumulative distance at each control point.
    #[inline]
    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// Total arc length.
    #[inline]
    pub fn length(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// `true` if the curve has no extent to travel.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    pub fn start(&self) -> Option<Vec3> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    /// Index of the edge containing `distance` (clamped to the curve).
    fn edge_at(&self, distance: f32) -> usize {
        let edges = self.points.len().saturating_sub(1);
        if edges == 0 {
            return 0;
        }
        // First point strictly beyond `distance`, minus one.
        let i = self.distances.partition_point(|&d| d <= distance);
        i.saturating_sub(1).min(edges - 1)
    }

    /// Position at `distance` along the curve, clamped to its ends.
    pub fn location_at(&self, distance: f32) -> Vec3 {
        match self.points.len() {
            0 => Vec3::ZERO,
            1 => self.points[0],
            _ => {
                let d = distance.clamp(0.0, self.length());
                let i = self.edge_at(d);
                let span = self.distances[i + 1] - self.distances[i];
                let t = if span > 0.0 { (d - self.distances[i]) / span } else { 0.0 };
                self.points[i].lerp(self.points[i + 1], t)
            }
        }
    }

    /// Unit tangent at `distance`; zero for a degenerate curve.
    pub fn direction_at(&self, distance: f32) -> Vec3 {
        if self.is_degenerate() {
            return Vec3::ZERO;
        }
        let i = self.edge_at(distance.clamp(0.0, self.length()));
        (self.points[i + 1] - self.points[i]).normalize_or_zero()
    }
}

// ── PathSegment ───────────────────────────────────────────────────────────────

/// A stretch of the curve sharing one set of legal movement modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    /// Arc-length start, inclusive.
    pub start:         f32,
    /// Arc-length end, exclusive.
    pub end:           f32,
    pub modes:         ModeSet,
    /// Facing required while on the segment (ladders).
    pub rotation_hint: Option<Rotator>,
}

impl PathSegment {
    #[inline]
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    #[inline]
    pub fn contains(&self, distance: f32) -> bool {
        distance >= self.start && distance < self.end
    }

    /// The locomotion mode to use, preferring climbing over walking.
    pub fn preferred_mode(&self) -> Option<MovementMode> {
        [MovementMode::ClimbingUp, MovementMode::ClimbingDown, MovementMode::Walking]
            .into_iter()
            .find(|&m| self.modes.contains(m))
    }

    fn same_kind(&self, other: &PathSegment) -> bool {
        self.modes == other.modes && self.rotation_hint == other.rotation_hint
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Build the curve and its segment list for `waypoints`.
///
/// Returns `None` if a waypoint is not in the grid.  A single waypoint (or
/// several at the same spot) gives a degenerate curve and no segments.
pub fn build_curve(
    graph:     &TileGraph<'_>,
    waypoints: &[TileId],
    profile:   &TraversalProfile,
) -> Option<(PathCurve, Vec<PathSegment>)> {
    let walk_modes = ModeSet::of(&[MovementMode::Walking, MovementMode::InPlaceTurn])
        .intersection(profile.modes);

    let mut curve = PathCurve::default();
    // One tag per pushed edge, parallel to curve edges.
    let mut tags: Vec<(ModeSet, Option<Rotator>)> = Vec::new();

    let mut iter = waypoints.iter();
    if let Some(&first) = iter.next() {
        curve.push(graph.tile(first)?.location);
    }
    for &id in iter {
        let tile = graph.tile(id)?;
        let from = curve.end().unwrap_or(tile.location);
        let (entry, exit) = tile.path_points(from);
        if curve.push(entry) {
            tags.push((walk_modes, None));
        }
        if let Some(exit) = exit {
            let climb = if exit.z > entry.z {
                MovementMode::ClimbingUp
            } else {
                MovementMode::ClimbingDown
            };
            if curve.push(exit) {
                tags.push((ModeSet::single(climb).intersection(profile.modes), tile.rotation_hint()));
            }
        }
    }

    let mut segments: Vec<PathSegment> = Vec::new();
    let distances = curve.distances();
    for (i, &(modes, rotation_hint)) in tags.iter().enumerate() {
        let seg = PathSegment {
            start: distances[i],
            end: distances[i + 1],
            modes,
            rotation_hint,
        };
        match segments.last_mut() {
            Some(prev) if prev.same_kind(&seg) => prev.end = seg.end,
            _ => segments.push(seg),
        }
    }
    trace!(
        "curve: {} points, length {:.1}, {} segments",
        curve.points().len(),
        curve.length(),
        segments.len()
    );
    Some((curve, segments))
}
