//! Movement modes and compact mode sets.
//!
//! A [`ModeSet`] is used both as an agent's capability set and as the set of
//! modes that are legal on one stretch of a path.  It is a one-byte bitset,
//! so intersections are a single AND and iteration order is the declaration
//! order of [`MovementMode`].

use std::fmt;

/// The locomotion an agent is using (or not).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementMode {
    /// Not following a path and not turning (default state).
    #[default]
    Stationary,
    /// Moving over floor tiles.
    Walking,
    /// Ascending a ladder.
    ClimbingUp,
    /// Descending a ladder.
    ClimbingDown,
    /// Rotating on the spot without advancing.
    InPlaceTurn,
}

impl MovementMode {
    pub const ALL: [MovementMode; 5] = [
        MovementMode::Stationary,
        MovementMode::Walking,
        MovementMode::ClimbingUp,
        MovementMode::ClimbingDown,
        MovementMode::InPlaceTurn,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// `true` for modes that advance the agent along its path.
    #[inline]
    pub fn is_locomotion(self) -> bool {
        matches!(
            self,
            MovementMode::Walking | MovementMode::ClimbingUp | MovementMode::ClimbingDown
        )
    }

    /// `true` for either climbing direction.
    #[inline]
    pub fn is_climbing(self) -> bool {
        matches!(self, MovementMode::ClimbingUp | MovementMode::ClimbingDown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementMode::Stationary   => "stationary",
            MovementMode::Walking      => "walking",
            MovementMode::ClimbingUp   => "climbing_up",
            MovementMode::ClimbingDown => "climbing_down",
            MovementMode::InPlaceTurn  => "in_place_turn",
        }
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ModeSet ───────────────────────────────────────────────────────────────────

/// A set of [`MovementMode`]s.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeSet(u8);

impl ModeSet {
    pub const EMPTY: ModeSet = ModeSet(0);

    /// Walking, both climbing directions and turning in place.
    pub const fn standard() -> Self {
        ModeSet(
            MovementMode::Walking.bit()
                | MovementMode::ClimbingUp.bit()
                | MovementMode::ClimbingDown.bit()
                | MovementMode::InPlaceTurn.bit(),
        )
    }

    pub const fn single(mode: MovementMode) -> Self {
        ModeSet(mode.bit())
    }

    pub fn of(modes: &[MovementMode]) -> Self {
        modes.iter().fold(ModeSet::EMPTY, |set, &m| set.with(m))
    }

    #[inline]
    pub fn contains(self, mode: MovementMode) -> bool {
        self.0 & mode.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, mode: MovementMode) {
        self.0 |= mode.bit();
    }

    #[inline]
    pub fn remove(&mut self, mode: MovementMode) {
        self.0 &= !mode.bit();
    }

    #[inline]
    #[must_use]
    pub fn with(mut self, mode: MovementMode) -> Self {
        self.insert(mode);
        self
    }

    #[inline]
    #[must_use]
    pub fn intersection(self, other: ModeSet) -> ModeSet {
        ModeSet(self.0 & other.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// `true` if at least one climbing direction is present.
    #[inline]
    pub fn can_climb(self) -> bool {
        self.contains(MovementMode::ClimbingUp) || self.contains(MovementMode::ClimbingDown)
    }

    pub fn iter(self) -> impl Iterator<Item = MovementMode> {
        MovementMode::ALL.into_iter().filter(move |&m| self.contains(m))
    }
}

impl FromIterator<MovementMode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = MovementMode>>(iter: I) -> Self {
        iter.into_iter().fold(ModeSet::EMPTY, |set, m| set.with(m))
    }
}

impl From<MovementMode> for ModeSet {
    fn from(mode: MovementMode) -> Self {
        ModeSet::single(mode)
    }
}

impl fmt::Debug for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ── TraversalProfile ──────────────────────────────────────────────────────────

/// What an agent can traverse: its available modes and the steepest floor
/// slope (degrees) it may walk on.  Every traversability and search query
/// takes one of these.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversalProfile {
    pub modes:          ModeSet,
    pub max_walk_angle: f32,
}

impl TraversalProfile {
    #[inline]
    pub fn new(modes: ModeSet, max_walk_angle: f32) -> Self {
        Self { modes, max_walk_angle }
    }
}

impl Default for TraversalProfile {
    fn default() -> Self {
        Self { modes: ModeSet::standard(), max_walk_angle: 45.0 }
    }
}
