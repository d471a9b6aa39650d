//! The positionable entity an executor moves.

use tn_core::{Rotator, Vec3};

/// Transform access supplied by the embedding application.
///
/// The executor only ever reads and writes location and rotation; whatever
/// owns the entity (a scene node, an ECS component, a test double) decides
/// how those map onto its own representation.
pub trait Positionable {
    fn location(&self) -> Vec3;
    fn set_location(&mut self, location: Vec3);
    fn rotation(&self) -> Rotator;
    fn set_rotation(&mut self, rotation: Rotator);
}

/// Plain transform, for headless use and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub location: Vec3,
    pub rotation: Rotator,
}

impl Body {
    pub fn new(location: Vec3, rotation: Rotator) -> Self {
        Self { location, rotation }
    }

    pub fn at(location: Vec3) -> Self {
        Self { location, rotation: Rotator::ZERO }
    }
}

impl Positionable for Body {
    #[inline]
    fn location(&self) -> Vec3 {
        self.location
    }

    #[inline]
    fn set_location(&mut self, location: Vec3) {
        self.location = location;
    }

    #[inline]
    fn rotation(&self) -> Rotator {
        self.rotation
    }

    #[inline]
    fn set_rotation(&mut self, rotation: Rotator) {
        self.rotation = rotation;
    }
}
