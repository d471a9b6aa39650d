//! Externally driven displacement (e.g. animation root motion).
//!
//! A [`DisplacementSource`] is drained at most once per executor tick.  The
//! executor caches the drained value, so reading it again within the same
//! tick never applies it twice.

use std::collections::VecDeque;

use tn_core::{Rotator, Vec3};

/// One frame's worth of translation and rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameDisplacement {
    pub translation: Vec3,
    pub rotation:    Rotator,
}

impl FrameDisplacement {
    pub const ZERO: FrameDisplacement =
        FrameDisplacement { translation: Vec3::ZERO, rotation: Rotator::ZERO };

    pub fn new(translation: Vec3, rotation: Rotator) -> Self {
        Self { translation, rotation }
    }

    pub fn is_zero(&self) -> bool {
        self.translation.length_squared() <= f32::EPSILON && self.rotation.is_zero(f32::EPSILON)
    }
}

pub trait DisplacementSource {
    /// Drain the current frame's contribution.  Returns
    /// [`FrameDisplacement::ZERO`] when nothing is available.
    fn consume_frame_displacement(&mut self) -> FrameDisplacement;
}

/// Plays back a fixed queue of frames, then yields zero.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDisplacement {
    frames: VecDeque<FrameDisplacement>,
}

impl ScriptedDisplacement {
    pub fn new(frames: impl IntoIterator<Item = FrameDisplacement>) -> Self {
        Self { frames: frames.into_iter().collect() }
    }

    /// `count` copies of the same frame.
    pub fn repeat(frame: FrameDisplacement, count: usize) -> Self {
        Self { frames: std::iter::repeat_n(frame, count).collect() }
    }

    pub fn push(&mut self, frame: FrameDisplacement) {
        self.frames.push_back(frame);
    }

    /// Frames not yet consumed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DisplacementSource for ScriptedDisplacement {
    fn consume_frame_displacement(&mut self) -> FrameDisplacement {
        self.frames.pop_front().unwrap_or(FrameDisplacement::ZERO)
    }
}
