use glam::Vec2;
use crate::math_utils::nose_direction;
use super::{CollisionGroup, CollisionMask};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Static
}

#[derive(Clone, Debug)]
pub struct RigidBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radians, zero means the nose points to -y.
    pub angle: f32,
    pub angular_velocity: f32,
    /// Force accumulated for the next step. Cleared by the stepper.
    pub force: Vec2,
    pub collide_world_bounds: bool,
    kind: BodyKind,
    mass: f32,
    radius: f32,
    group: CollisionGroup,
    mask: CollisionMask,
    impact_mask: CollisionMask
}

impl RigidBody {
    pub fn dynamic(position: Vec2, radius: f32) -> Self {
        Self::with_kind(BodyKind::Dynamic, position, radius)
    }

    pub fn fixed(position: Vec2, radius: f32) -> Self {
        Self::with_kind(BodyKind::Static, position, radius)
    }

    fn with_kind(kind: BodyKind, position: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            collide_world_bounds: false,
            kind,
            mass: 1.0,
            radius: radius.max(0.0),
            group: CollisionGroup::DEFAULT,
            mask: CollisionMask::ALL,
            impact_mask: CollisionMask::NONE
        }
    }

    pub fn kind(&self) -> BodyKind { self.kind }

    pub fn is_static(&self) -> bool { self.kind == BodyKind::Static }

    pub fn mass(&self) -> f32 { self.mass }

    /// Non-positive or non-finite masses are ignored.
    pub fn set_mass(&mut self, mass: f32) {
        if mass > 0.0 && mass.is_finite() {
            self.mass = mass;
        }
    }

    pub fn inverse_mass(&self) -> f32 {
        match self.kind {
            BodyKind::Static => 0.0,
            BodyKind::Dynamic => 1.0 / self.mass
        }
    }

    pub fn radius(&self) -> f32 { self.radius }

    pub fn set_circle(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn collision_group(&self) -> CollisionGroup { self.group }

    pub fn collision_mask(&self) -> CollisionMask { self.mask }

    pub fn impact_mask(&self) -> CollisionMask { self.impact_mask }

    pub fn set_collision_group(&mut self, group: CollisionGroup) {
        self.group = group;
    }

    /// Replaces the set of groups this body physically collides with.
    pub fn collides(&mut self, groups: impl Into<CollisionMask>) {
        self.mask = groups.into();
    }

    /// Collides with `groups` and also reports an impact event whenever this
    /// body touches one of them.
    pub fn collides_with_impacts(&mut self, groups: impl Into<CollisionMask>) {
        let mask = groups.into();
        self.mask = mask;
        self.impact_mask = mask;
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Pushes the body along its nose.
    pub fn thrust(&mut self, amount: f32) {
        self.force += nose_direction(self.angle) * amount;
    }

    pub(crate) fn integrate(&mut self, dt: f32) {
        if self.kind == BodyKind::Dynamic {
            self.velocity += self.force * (self.inverse_mass() * dt);
            self.position += self.velocity * dt;
            self.angle += self.angular_velocity * dt;
        }
        self.force = Vec2::ZERO;
    }
}
