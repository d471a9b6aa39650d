//! Per-frame movement executor.
//!
//! # Lifecycle
//!
//! ```text
//! move_to ──► following ──tick──► … ──tick──► curve consumed ──► Stationary + finished
//!                 │
//!                 └── stop_movement_immediately ──► Stationary, no notifications
//! ```
//!
//! The executor never owns the grid.  Every planning call takes the
//! [`TileGraph`] it should search, and every tick takes the entity it moves.

use log::{debug, warn};

use tn_core::{
    AgentId, MovementConfig, MovementMode, ObserverId, Rotator, TileId, TraversalProfile, Vec3,
};
use tn_grid::{CollisionService, Grid, TileGraph};
use tn_path::{DijkstraPlanner, Path, PathPlan, PathSegment, Planner, Reachable};

use crate::observer::Observers;
use crate::{DisplacementSource, FrameDisplacement, MovementObserver, MovementState, Positionable};

/// Plan being followed and the index of the segment the agent is on.
///
/// Kept as one value so clearing it can never leave a curve without its
/// segment cursor or the reverse.
struct ActivePath {
    plan:    PathPlan,
    segment: usize,
}

impl ActivePath {
    fn segment(&self) -> Option<PathSegment> {
        self.plan.segments.get(self.segment).copied()
    }
}

/// Drives one agent along planned paths.
///
/// # Type parameter
///
/// `P` is the search used for reachability and path requests; it defaults
/// to [`DijkstraPlanner`].
pub struct MovementExecutor<P: Planner = DijkstraPlanner> {
    agent:        AgentId,
    planner:      P,
    config:       MovementConfig,
    state:        MovementState,
    /// Result of the last successful `create_path`, not yet followed.
    planned:      Option<PathPlan>,
    active:       Option<ActivePath>,
    /// Facing requested by `turn_to` while stationary.
    turn_target:  Option<Rotator>,
    displacement: Option<Box<dyn DisplacementSource>>,
    /// What the displacement source yielded this tick.
    frame:        FrameDisplacement,
    observers:    Observers,
}

impl MovementExecutor<DijkstraPlanner> {
    pub fn new(agent: AgentId, config: MovementConfig) -> Self {
        Self::with_planner(agent, DijkstraPlanner, config)
    }
}

impl<P: Planner> MovementExecutor<P> {
    pub fn with_planner(agent: AgentId, planner: P, config: MovementConfig) -> Self {
        Self {
            agent,
            planner,
            config: config.sanitized(),
            state: MovementState::default(),
            planned: None,
            active: None,
            turn_target: None,
            displacement: None,
            frame: FrameDisplacement::ZERO,
            observers: Observers::default(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[inline]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> &MovementState {
        &self.state
    }

    #[inline]
    pub fn mode(&self) -> MovementMode {
        self.state.mode
    }

    #[inline]
    pub fn current_tile(&self) -> Option<TileId> {
        self.state.current_tile
    }

    pub fn profile(&self) -> TraversalProfile {
        self.config.profile()
    }

    /// `true` while a path is being followed or a turn is in progress.
    pub fn is_moving(&self) -> bool {
        self.active.is_some() || self.turn_target.is_some()
    }

    /// The plan being followed, if any.
    pub fn active_plan(&self) -> Option<&PathPlan> {
        self.active.as_ref().map(|a| &a.plan)
    }

    /// The plan produced by the last `create_path`, if it is not yet being
    /// followed.
    pub fn planned_path(&self) -> Option<&PathPlan> {
        self.planned.as_ref()
    }

    /// Segment the agent is currently on.
    pub fn current_segment(&self) -> Option<PathSegment> {
        self.active.as_ref().and_then(ActivePath::segment)
    }

    /// Displacement drained during the most recent tick.  Reading it does
    /// not consume anything.
    #[inline]
    pub fn frame_displacement(&self) -> FrameDisplacement {
        self.frame
    }

    /// Graph view of `grid` using this agent's collision shape.
    pub fn graph<'a>(&self, grid: &'a Grid, collision: &'a dyn CollisionService) -> TileGraph<'a> {
        TileGraph::new(grid, collision, self.config.collision_shape)
    }

    // ── Collaborators ─────────────────────────────────────────────────────

    pub fn set_displacement_source(&mut self, source: Box<dyn DisplacementSource>) {
        self.displacement = Some(source);
    }

    pub fn clear_displacement_source(&mut self) -> Option<Box<dyn DisplacementSource>> {
        self.displacement.take()
    }

    pub fn add_observer(&mut self, observer: Box<dyn MovementObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// Tile the agent is standing on: the cached tile, or a lookup under
    /// the entity's location.  The cache is dropped whenever the entity is
    /// moved off the path, so it never disagrees with the location.
    pub fn locate<B: Positionable + ?Sized>(&self, graph: &TileGraph<'_>, body: &B) -> Option<TileId> {
        self.state
            .current_tile
            .filter(|&t| graph.tile(t).is_some())
            .or_else(|| graph.tile_at(body.location()))
    }

    /// Tiles the agent can end a move on within `movement_range`.
    pub fn tiles_in_range<B: Positionable + ?Sized>(
        &self,
        graph: &TileGraph<'_>,
        body:  &B,
    ) -> Reachable {
        match self.locate(graph, body) {
            Some(start) => {
                self.planner
                    .reachable(graph, start, self.config.movement_range, &self.profile())
            }
            None => Reachable::default(),
        }
    }

    /// Plan a path to `target` without starting to move.
    ///
    /// Returns `false` if the agent is off-grid or no path exists.  A target
    /// equal to the current tile succeeds with a zero-length curve.
    pub fn create_path<B: Positionable + ?Sized>(
        &mut self,
        graph:  &TileGraph<'_>,
        body:   &B,
        target: TileId,
    ) -> bool {
        self.planned = self.plan(graph, body, target);
        self.planned.is_some()
    }

    /// Plan a path to `target` and start following it.
    pub fn move_to<B: Positionable + ?Sized>(
        &mut self,
        graph:  &TileGraph<'_>,
        body:   &B,
        target: TileId,
    ) -> bool {
        let Some(plan) = self.plan(graph, body, target) else {
            return false;
        };
        self.follow(plan, body);
        true
    }

    /// Start following the plan from the last `create_path`.
    pub fn follow_planned<B: Positionable + ?Sized>(&mut self, body: &B) -> bool {
        match self.planned.take() {
            Some(plan) => {
                self.follow(plan, body);
                true
            }
            None => false,
        }
    }

    /// Whether `move_to(target)` would succeed.  Ignores `movement_range`.
    pub fn can_move_to<B: Positionable + ?Sized>(
        &self,
        graph:  &TileGraph<'_>,
        body:   &B,
        target: TileId,
    ) -> bool {
        self.plan(graph, body, target).is_some()
    }

    fn plan<B: Positionable + ?Sized>(
        &self,
        graph:  &TileGraph<'_>,
        body:   &B,
        target: TileId,
    ) -> Option<PathPlan> {
        let profile = self.profile();
        if profile.modes.is_empty() {
            debug!("agent {}: no available movement modes", self.agent);
            return None;
        }
        let start = self.locate(graph, body)?;
        let plan = if start == target {
            PathPlan::from_path(graph, Path::trivial(start), &profile, false)
        } else {
            PathPlan::build(&self.planner, graph, start, target, &profile, self.config.string_pull)
        }?;
        // A ladder is traversable with either climbing mode, but each
        // segment is climbed in one direction only.
        if let Some(seg) = plan.segments.iter().find(|s| self.locomotion_for(s).is_none()) {
            debug!(
                "agent {}: no usable mode for segment [{:.1}, {:.1}) ({:?})",
                self.agent, seg.start, seg.end, seg.modes
            );
            return None;
        }
        Some(plan)
    }

    fn follow<B: Positionable + ?Sized>(&mut self, plan: PathPlan, body: &B) {
        self.turn_target = None;
        self.state.distance = 0.0;
        self.state.facing = body.rotation();
        self.state.current_tile = None;
        self.active = Some(ActivePath { plan, segment: 0 });
    }

    // ── Direct control ────────────────────────────────────────────────────

    /// Turn to face `facing`.
    ///
    /// With `InPlaceTurn` available the turn happens over the following
    /// ticks at the capped rotation rate; otherwise it is applied at once.
    /// Ignored (returns `false`) while following a path.
    pub fn turn_to<B: Positionable + ?Sized>(&mut self, body: &mut B, facing: Rotator) -> bool {
        if self.active.is_some() {
            return false;
        }
        let current = body.rotation();
        let target = facing.with_locks(current, self.config.locks()).normalized();
        if self.config.available_modes.contains(MovementMode::InPlaceTurn) {
            self.turn_target = Some(target);
        } else {
            body.set_rotation(target);
            self.state.facing = target;
        }
        true
    }

    /// Move the entity onto the tile beneath it.  Returns that tile.
    pub fn snap_to_grid<B: Positionable + ?Sized>(
        &mut self,
        graph: &TileGraph<'_>,
        body:  &mut B,
    ) -> Option<TileId> {
        let id = graph.tile_at(body.location())?;
        let tile = graph.tile(id)?;
        body.set_location(tile.access_point(body.location()));
        self.state.current_tile = Some(id);
        Some(id)
    }

    /// Jump `distance` further along the active path.  Reaching the end
    /// finishes the path as a tick would.  Returns the distance travelled.
    pub fn advance_along_path<B: Positionable + ?Sized>(&mut self, body: &mut B, distance: f32) -> f32 {
        let Some(mut active) = self.active.take() else {
            return 0.0;
        };
        let length = active.plan.length();
        let before = self.state.distance;
        let target = (before + distance.max(0.0)).min(length);
        self.state.distance = target;
        while active.segment().is_some_and(|s| target >= s.end) {
            active.segment += 1;
        }
        body.set_location(active.plan.curve.location_at(target));

        let Some(seg) = active.segment() else {
            self.finish(active, body);
            return target - before;
        };
        let mode = self.state.mode;
        if mode != MovementMode::Stationary && !seg.modes.contains(mode) {
            match self.locomotion_for(&seg) {
                Some(next) => self.set_mode(next),
                None => {
                    self.halt(body);
                    return target - before;
                }
            }
        }
        self.active = Some(active);
        target - before
    }

    /// Distance left on the path being followed; zero when not following.
    pub fn remaining_distance(&self) -> f32 {
        self.active
            .as_ref()
            .map_or(0.0, |a| (a.plan.length() - self.state.distance).max(0.0))
    }

    /// Where the agent will be after moving `distance` further along the
    /// active path.
    pub fn forward_location(&self, distance: f32) -> Option<Vec3> {
        let active = self.active.as_ref()?;
        Some(active.plan.curve.location_at(self.state.distance + distance.max(0.0)))
    }

    /// Abandon the current path and any pending turn.  No notifications are
    /// raised for the abandoned path.
    pub fn stop_movement_immediately(&mut self) {
        if self.active.is_some() {
            debug!("agent {}: movement stopped at {:.1}", self.agent, self.state.distance);
        }
        self.active = None;
        self.planned = None;
        self.turn_target = None;
        self.state.mode = MovementMode::Stationary;
        self.state.distance = 0.0;
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance by `dt` seconds.
    pub fn tick<B: Positionable + ?Sized>(&mut self, body: &mut B, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.frame = match self.displacement.as_mut() {
            Some(source) => source.consume_frame_displacement(),
            None => FrameDisplacement::ZERO,
        };
        self.state.facing = body.rotation();

        match self.active.take() {
            Some(active) => self.tick_path(active, body, dt),
            None => self.tick_idle(body, dt),
        }
    }

    fn tick_idle<B: Positionable + ?Sized>(&mut self, body: &mut B, dt: f32) {
        if let Some(target) = self.turn_target {
            let facing = self.state.facing;
            if facing.divergence(target) > self.config.facing_tolerance {
                self.set_mode(MovementMode::InPlaceTurn);
                let turned = facing.step_towards(target, self.config.max_rotation_speed * dt);
                self.apply_facing(body, turned);
            }
            if self.state.facing.divergence(target) <= self.config.facing_tolerance {
                self.apply_facing(body, target);
                self.turn_target = None;
                self.set_mode(MovementMode::Stationary);
            }
            return;
        }

        if self.config.always_use_root_motion && !self.frame.is_zero() {
            body.set_location(body.location() + self.frame.translation);
            if self.frame.translation != Vec3::ZERO {
                self.state.current_tile = None;
            }
            let facing = (self.state.facing + self.frame.rotation)
                .with_locks(self.state.facing, self.config.locks());
            self.apply_facing(body, facing);
        }
    }

    fn tick_path<B: Positionable + ?Sized>(&mut self, mut active: ActivePath, body: &mut B, dt: f32) {
        let tolerance = self.config.facing_tolerance;
        let max_turn = self.config.max_rotation_speed * dt;
        let root_speed = self.root_motion_speed(dt);
        let root_rotation = self.root_rotation();
        let mut time_left = dt;
        let mut desired: Rotator;

        loop {
            let Some(seg) = active.segment() else {
                // Zero-length curve.
                self.finish(active, body);
                return;
            };
            desired = self.desired_facing(&active, &seg);

            if self.state.facing.divergence(desired) > tolerance
                && seg.modes.contains(MovementMode::InPlaceTurn)
            {
                self.set_mode(MovementMode::InPlaceTurn);
                // Only the part of the tick not yet spent walking.
                let step = self.config.max_rotation_speed * time_left;
                let turned = self.state.facing.step_towards(desired, step) + root_rotation;
                body.set_location(active.plan.curve.location_at(self.state.distance));
                self.apply_facing(body, turned.with_locks(self.state.facing, self.config.locks()));
                self.active = Some(active);
                return;
            }

            let Some(mode) = self.locomotion_for(&seg) else {
                warn!(
                    "agent {}: segment [{:.1}, {:.1}) has no usable locomotion mode ({:?})",
                    self.agent, seg.start, seg.end, seg.modes
                );
                body.set_location(active.plan.curve.location_at(self.state.distance));
                self.halt(body);
                return;
            };
            self.set_mode(mode);

            let speed = root_speed.unwrap_or_else(|| self.speed_for(mode));
            let to_end = seg.end - self.state.distance;
            let step = speed * time_left;
            if step < to_end {
                self.state.distance += step;
                break;
            }

            // Segment boundary: carry the leftover time into the next one.
            // The next pass picks that segment's mode even with no time left.
            self.state.distance = seg.end;
            time_left = (time_left - to_end / speed).max(0.0);
            active.segment += 1;
            if active.segment >= active.plan.segments.len() {
                let facing = self.state.facing.step_towards(desired, max_turn);
                self.apply_facing(body, facing);
                self.finish(active, body);
                return;
            }
        }

        body.set_location(active.plan.curve.location_at(self.state.distance));
        let facing = (self.state.facing.step_towards(desired, max_turn) + root_rotation)
            .with_locks(self.state.facing, self.config.locks());
        self.apply_facing(body, facing);
        self.active = Some(active);
    }

    /// Facing wanted on `seg`: its hint, else the direction of travel.
    fn desired_facing(&self, active: &ActivePath, seg: &PathSegment) -> Rotator {
        let current = self.state.facing;
        let wanted = seg.rotation_hint.or_else(|| {
            Rotator::from_direction(active.plan.curve.direction_at(self.state.distance))
        });
        match wanted {
            Some(r) => r.with_locks(current, self.config.locks()).normalized(),
            None => current,
        }
    }

    /// Locomotion mode for `seg`, limited to the agent's capabilities.
    fn locomotion_for(&self, seg: &PathSegment) -> Option<MovementMode> {
        seg.preferred_mode()
            .filter(|&m| self.config.available_modes.contains(m))
    }

    fn speed_for(&self, mode: MovementMode) -> f32 {
        if mode.is_climbing() { self.config.max_climb_speed } else { self.config.max_walk_speed }
    }

    /// Speed implied by this tick's displacement, when root motion drives
    /// the agent.
    fn root_motion_speed(&self, dt: f32) -> Option<f32> {
        if !(self.config.use_root_motion || self.config.always_use_root_motion) || dt <= 0.0 {
            return None;
        }
        let speed = self.frame.translation.length() / dt;
        (speed > f32::EPSILON).then_some(speed)
    }

    /// Rotation from this tick's displacement, when root motion drives the
    /// agent.
    fn root_rotation(&self) -> Rotator {
        if self.config.use_root_motion || self.config.always_use_root_motion {
            self.frame.rotation
        } else {
            Rotator::ZERO
        }
    }

    fn apply_facing<B: Positionable + ?Sized>(&mut self, body: &mut B, facing: Rotator) {
        let facing = facing.normalized();
        body.set_rotation(facing);
        self.state.facing = facing;
    }

    fn set_mode(&mut self, new: MovementMode) {
        let old = self.state.mode;
        if old != new {
            self.state.mode = new;
            self.observers.mode_changed(old, new);
        }
    }

    fn finish<B: Positionable + ?Sized>(&mut self, active: ActivePath, body: &mut B) {
        if let Some(end) = active.plan.end_location() {
            body.set_location(end);
        }
        self.state.distance = 0.0;
        self.state.current_tile = active.plan.target();
        debug!(
            "agent {}: movement finished at {:?}",
            self.agent, self.state.current_tile
        );
        self.set_mode(MovementMode::Stationary);
        self.observers.finished();
    }

    /// End the path where the entity stands, short of its target.  Raises
    /// the same notifications as reaching the end.
    fn halt<B: Positionable + ?Sized>(&mut self, body: &B) {
        self.state.distance = 0.0;
        self.state.current_tile = None;
        debug!("agent {}: movement halted at {}", self.agent, body.location());
        self.set_mode(MovementMode::Stationary);
        self.observers.finished();
    }
}
