//! Rigid-body world for circle-shaped bodies.
//!
//! Bodies are integrated with semi-implicit Euler, forces live for exactly one
//! step, and contacts are found through a uniform grid and resolved with a
//! single positional correction plus a velocity impulse per pair.

mod body;
mod groups;

pub use body::{BodyKind, RigidBody};
pub use groups::{groups_pair, CollisionGroup, CollisionMask};

use std::collections::VecDeque;
use flat_spatial::grid::GridHandle;
use glam::Vec2;
use thiserror::Error;
use crate::math_utils::collision_queries::{
    BoundsContainmentQuery,
    CircleContact,
    CircleIntersectionQuery
};

const SPATIAL_CELL_SIZE: i32 = 64;
const MAX_COLLISION_GROUPS: u32 = 32;

#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("all {0} collision groups are already in use")]
    TooManyCollisionGroups(u32)
}

/// Generational handle of a body inside a [`PhysicsWorld`]. Handles of
/// removed bodies never resolve again, even when their slot is reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    index: u32,
    generation: u32
}

/// `body` touched `other`, and `body` asked to be told about `other`'s group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImpactEvent {
    pub body: BodyHandle,
    pub other: BodyHandle,
    /// Velocity of `body` right before the contact was resolved.
    pub approach_velocity: Vec2
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2
}

impl WorldBounds {
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height)
        }
    }

    pub fn width(&self) -> f32 { self.max.x - self.min.x }

    pub fn height(&self) -> f32 { self.max.y - self.min.y }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
            point.y >= self.min.y && point.y <= self.max.y
    }
}

struct BodySlot {
    generation: u32,
    body: Option<RigidBody>,
    spatial_handle: Option<GridHandle>
}

pub struct PhysicsWorld {
    slots: Vec<BodySlot>,
    free_list: VecDeque<usize>,
    alive_count: usize,
    next_group_bit: u32,
    bounds: Option<WorldBounds>,
    restitution: f32,
    spatial_map: flat_spatial::DenseGrid<BodyHandle>,
    bump_allocator: bumpalo::Bump
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: VecDeque::new(),
            alive_count: 0,
            // bit 0 belongs to CollisionGroup::DEFAULT
            next_group_bit: 1,
            bounds: None,
            restitution: 0.0,
            spatial_map: flat_spatial::DenseGrid::new(SPATIAL_CELL_SIZE),
            bump_allocator: bumpalo::Bump::new()
        }
    }

    pub fn set_bounds(&mut self, bounds: WorldBounds) {
        self.bounds = Some(bounds);
    }

    pub fn bounds(&self) -> Option<WorldBounds> { self.bounds }

    /// Fraction of normal velocity kept after a contact. Clamped to `[0, 1]`.
    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = restitution.clamp(0.0, 1.0);
    }

    pub fn create_collision_group(&mut self) -> Result<CollisionGroup, PhysicsError> {
        if self.next_group_bit >= MAX_COLLISION_GROUPS {
            return Err(PhysicsError::TooManyCollisionGroups(MAX_COLLISION_GROUPS));
        }
        let group = CollisionGroup::from_bit(self.next_group_bit);
        self.next_group_bit += 1;
        Ok(group)
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let index = self.free_list
            .pop_back()
            .unwrap_or(self.slots.len());
        if index == self.slots.len() {
            self.slots.push(BodySlot { generation: 0, body: None, spatial_handle: None });
        }
        let handle = BodyHandle { index: index as u32, generation: self.slots[index].generation };
        let spatial_handle = self.spatial_map.insert([body.position.x, body.position.y], handle);
        let slot = &mut self.slots[index];
        slot.body = Some(body);
        slot.spatial_handle = Some(spatial_handle);
        self.alive_count += 1;
        handle
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let body = slot.body.take()?;
        if let Some(spatial_handle) = slot.spatial_handle.take() {
            self.spatial_map.remove(spatial_handle);
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push_back(handle.index as usize);
        self.alive_count -= 1;
        Some(body)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.body(handle).is_some()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_ref())
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_mut())
    }

    pub fn len(&self) -> usize { self.alive_count }

    pub fn is_empty(&self) -> bool { self.alive_count == 0 }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.body.as_ref().map(|body| (
                    BodyHandle { index: index as u32, generation: slot.generation },
                    body
                ))
            })
    }

    /// Alive bodies tagged with `group`.
    pub fn bodies_in_group(&self, group: CollisionGroup) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.bodies().filter(move |(_, body)| body.collision_group() == group)
    }

    /// Advances the world by `dt` seconds and returns the impacts registered
    /// through [`RigidBody::collides_with_impacts`].
    pub fn step(&mut self, dt: f32) -> Vec<ImpactEvent> {
        let max_radius = self.integrate_bodies(dt);
        self.update_space_partitioning();

        let mut impacts = Vec::new();
        let bump_allocator = std::mem::take(&mut self.bump_allocator);
        self.bump_allocator = {
            {
                let mut contacts = bumpalo::collections::Vec::new_in(&bump_allocator);
                for (index, slot) in self.slots.iter().enumerate() {
                    let body = match &slot.body {
                        Some(body) if !body.is_static() => body,
                        _ => continue
                    };
                    let handle = BodyHandle { index: index as u32, generation: slot.generation };
                    for (other_h, _) in self.spatial_map.query_around(
                        [body.position.x, body.position.y],
                        body.radius() + max_radius
                    ) {
                        let other_handle = match self.spatial_map.get(other_h) {
                            Some((_, &other_handle)) => other_handle,
                            None => continue
                        };
                        if other_handle == handle {
                            continue;
                        }
                        let other = match self.body(other_handle) {
                            Some(other) => other,
                            None => continue
                        };
                        // dynamic pairs show up from both sides, keep one of them
                        if !other.is_static() && other_handle.index < handle.index {
                            continue;
                        }
                        if !groups_pair(
                            body.collision_group(), body.collision_mask(),
                            other.collision_group(), other.collision_mask()
                        ) {
                            continue;
                        }
                        if let Some(contact) = body.position.circle_contact(
                            body.radius(),
                            other.position,
                            other.radius()
                        ) {
                            contacts.push((handle, other_handle, contact));
                        }
                    }
                }
                for (handle, other_handle, contact) in contacts.drain(..) {
                    self.collect_impacts(handle, other_handle, &mut impacts);
                    self.resolve_contact(handle, other_handle, contact);
                }
            }
            bump_allocator
        };
        self.bump_allocator.reset();
        impacts
    }

    fn integrate_bodies(&mut self, dt: f32) -> f32 {
        let bounds = self.bounds;
        let restitution = self.restitution;
        let mut max_radius = 0.0f32;
        for body in self.slots.iter_mut().filter_map(|slot| slot.body.as_mut()) {
            body.integrate(dt);
            if let (true, Some(bounds)) = (body.collide_world_bounds, bounds) {
                let (position, hit) = body.position.contain_circle(body.radius(), bounds.min, bounds.max);
                body.position = position;
                if hit.x {
                    body.velocity.x = -body.velocity.x * restitution;
                }
                if hit.y {
                    body.velocity.y = -body.velocity.y * restitution;
                }
            }
            max_radius = max_radius.max(body.radius());
        }
        max_radius
    }

    fn update_space_partitioning(&mut self) {
        for slot in self.slots.iter() {
            if let (Some(body), Some(spatial_handle)) = (&slot.body, slot.spatial_handle) {
                self.spatial_map.set_position(spatial_handle, [body.position.x, body.position.y]);
            }
        }
        self.spatial_map.maintain();
    }

    fn resolve_contact(&mut self, handle: BodyHandle, other_handle: BodyHandle, contact: CircleContact) {
        let (inv_a, vel_a) = match self.body(handle) {
            Some(body) => (body.inverse_mass(), body.velocity),
            None => return
        };
        let (inv_b, vel_b) = match self.body(other_handle) {
            Some(body) => (body.inverse_mass(), body.velocity),
            None => return
        };
        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            return;
        }

        let correction = contact.normal * (contact.depth / inv_sum);
        let closing_speed = (vel_b - vel_a).dot(contact.normal);
        let impulse = if closing_speed < 0.0 {
            contact.normal * (-(1.0 + self.restitution) * closing_speed / inv_sum)
        } else {
            Vec2::ZERO
        };

        if let Some(body) = self.body_mut(handle) {
            body.position -= correction * inv_a;
            body.velocity -= impulse * inv_a;
        }
        if let Some(other) = self.body_mut(other_handle) {
            other.position += correction * inv_b;
            other.velocity += impulse * inv_b;
        }
    }

    fn collect_impacts(&self, handle: BodyHandle, other_handle: BodyHandle, impacts: &mut Vec<ImpactEvent>) {
        if let (Some(body), Some(other)) = (self.body(handle), self.body(other_handle)) {
            if body.impact_mask().contains(other.collision_group()) {
                impacts.push(ImpactEvent {
                    body: handle,
                    other: other_handle,
                    approach_velocity: body.velocity
                });
            }
            if other.impact_mask().contains(body.collision_group()) {
                impacts.push(ImpactEvent {
                    body: other_handle,
                    other: handle,
                    approach_velocity: other.velocity
                });
            }
        }
    }
}
