//! In-memory host simulation.
//!
//! [`SimWorld`] is a minimal [`TransformHost`]: solid bodies with a transform
//! and a linear velocity, plus visual-only tether bodies linked to an owner.
//! Its [`integrate`](SimWorld::integrate) step stands in for the host's own
//! physics and skips every externally driven body.

use std::collections::HashMap;

use kinetic_math::{Transform3D, Vec3};
use tracing::{debug, trace};

use crate::entity::{Entity, EntityAllocator};
use crate::error::WorldError;
use crate::host::TransformHost;

/// Whether a body takes part in physics or is purely visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated by the host unless externally driven.
    Solid,
    /// Never integrated; only ever written by tasks.
    Visual,
}

/// One entity's state in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// World transform.
    pub transform: Transform3D,
    /// Linear velocity in units per second.
    pub velocity: Vec3,
    /// Host physics is suspended while this is set.
    pub externally_driven: bool,
    /// Solid or visual-only.
    pub kind: BodyKind,
}

impl Body {
    fn solid(transform: Transform3D) -> Self {
        Self {
            transform,
            velocity: Vec3::ZERO,
            externally_driven: false,
            kind: BodyKind::Solid,
        }
    }

    fn visual(transform: Transform3D) -> Self {
        Self {
            kind: BodyKind::Visual,
            ..Self::solid(transform)
        }
    }
}

/// The simulation state owned by the embedding application.
#[derive(Debug, Default)]
pub struct SimWorld {
    /// Entity ID allocator.
    allocator: EntityAllocator,
    /// All live bodies.
    bodies: HashMap<Entity, Body>,
    /// Maps each tether owner to its tether visual.
    tethers: HashMap<Entity, Entity>,
}

impl SimWorld {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a solid body at `transform`.
    pub fn spawn_body(&mut self, transform: Transform3D) -> Entity {
        let entity = self.allocator.allocate();
        self.bodies.insert(entity, Body::solid(transform));
        debug!(%entity, position = %transform.position, "spawned body");
        entity
    }

    /// Returns the body for `entity`, if it exists.
    #[must_use]
    pub fn body(&self, entity: Entity) -> Option<&Body> {
        self.bodies.get(&entity)
    }

    /// Set the linear velocity of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] if the entity does not exist.
    pub fn set_velocity(&mut self, entity: Entity, velocity: Vec3) -> Result<(), WorldError> {
        self.body_mut(entity)?.velocity = velocity;
        Ok(())
    }

    /// Returns the number of live bodies, tethers included.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advance host physics by `dt` seconds.
    ///
    /// Solid bodies that are not externally driven accelerate under `gravity`
    /// and move by their velocity. Everything else is left untouched.
    pub fn integrate(&mut self, dt: f32, gravity: Vec3) {
        for (entity, body) in &mut self.bodies {
            if body.kind == BodyKind::Visual || body.externally_driven {
                continue;
            }
            body.velocity += gravity * dt;
            body.transform.position += body.velocity * dt;
            trace!(%entity, position = %body.transform.position, "integrated");
        }
    }

    fn body_mut(&mut self, entity: Entity) -> Result<&mut Body, WorldError> {
        if !entity.is_valid() {
            return Err(WorldError::InvalidEntity);
        }
        self.bodies
            .get_mut(&entity)
            .ok_or(WorldError::UnknownEntity(entity))
    }
}

impl TransformHost for SimWorld {
    fn transform(&self, entity: Entity) -> Option<Transform3D> {
        self.bodies.get(&entity).map(|b| b.transform)
    }

    fn set_transform(&mut self, entity: Entity, transform: Transform3D) -> Result<(), WorldError> {
        self.body_mut(entity)?.transform = transform;
        Ok(())
    }

    fn is_externally_driven(&self, entity: Entity) -> bool {
        self.bodies
            .get(&entity)
            .is_some_and(|b| b.externally_driven)
    }

    fn set_externally_driven(&mut self, entity: Entity, driven: bool) -> Result<(), WorldError> {
        let body = self.body_mut(entity)?;
        body.externally_driven = driven;
        if driven {
            // A driven body must not carry momentum into its release.
            body.velocity = Vec3::ZERO;
        }
        Ok(())
    }

    fn spawn_tether(&mut self, owner: Entity, transform: Transform3D) -> Result<Entity, WorldError> {
        self.body_mut(owner)?;
        if let Some(previous) = self.tethers.remove(&owner) {
            self.bodies.remove(&previous);
        }
        let tether = self.allocator.allocate();
        self.bodies.insert(tether, Body::visual(transform));
        self.tethers.insert(owner, tether);
        debug!(%owner, %tether, "spawned tether");
        Ok(tether)
    }

    fn tether_of(&self, owner: Entity) -> Option<Entity> {
        self.tethers.get(&owner).copied()
    }

    fn despawn(&mut self, entity: Entity) -> bool {
        if self.bodies.remove(&entity).is_none() {
            return false;
        }
        if let Some(tether) = self.tethers.remove(&entity) {
            self.bodies.remove(&tether);
        }
        self.tethers.retain(|_, t| *t != entity);
        debug!(%entity, "despawned");
        true
    }
}
