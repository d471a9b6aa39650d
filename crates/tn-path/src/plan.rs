//! A complete movement plan: search result, waypoints, curve and segments.

use log::debug;

use tn_core::{TileId, TraversalProfile, Vec3};
use tn_grid::TileGraph;

use crate::{Path, PathCurve, PathSegment, Planner, build_curve, string_pull};

/// Everything the executor needs to follow a route.
#[derive(Debug, Clone)]
pub struct PathPlan {
    /// Raw least-cost tile sequence.
    pub path:      Path,
    /// `path.tiles` after string pulling.
    pub waypoints: Vec<TileId>,
    pub curve:     PathCurve,
    pub segments:  Vec<PathSegment>,
}

impl PathPlan {
    /// Search from `start` to `target` and build the curve.
    ///
    /// Returns `None` when the planner finds no path.
    pub fn build<P: Planner + ?Sized>(
        planner:     &P,
        graph:       &TileGraph<'_>,
        start:       TileId,
        target:      TileId,
        profile:     &TraversalProfile,
        string_pull: bool,
    ) -> Option<Self> {
        let path = planner.find_path(graph, start, target, profile)?;
        Self::from_path(graph, path, profile, string_pull)
    }

    /// Build the curve for an existing path.
    pub fn from_path(
        graph:    &TileGraph<'_>,
        path:     Path,
        profile:  &TraversalProfile,
        pull:     bool,
    ) -> Option<Self> {
        let waypoints = string_pull(graph, &path.tiles, profile, pull);
        let (curve, segments) = build_curve(graph, &waypoints, profile)?;
        debug!(
            "plan {:?} -> {:?}: {} tiles, {} waypoints, length {:.1}, cost {}",
            path.start(),
            path.target(),
            path.len(),
            waypoints.len(),
            curve.length(),
            path.total_cost()
        );
        Some(Self { path, waypoints, curve, segments })
    }

    pub fn target(&self) -> Option<TileId> {
        self.path.target()
    }

    pub fn cost(&self) -> f32 {
        self.path.total_cost()
    }

    pub fn length(&self) -> f32 {
        self.curve.length()
    }

    pub fn end_location(&self) -> Option<Vec3> {
        self.curve.end()
    }

    /// Index of the segment containing `distance`, if any.
    pub fn segment_index_at(&self, distance: f32) -> Option<usize> {
        self.segments.iter().position(|s| s.contains(distance))
    }
}
