//! The host simulation as seen by the scheduler.
//!
//! Tasks never own world state. They read and force-write transforms through
//! [`TransformHost`], which the embedding simulation implements. The trait is
//! object safe so task registries can be built over `dyn TransformHost`.

use kinetic_math::Transform3D;

use crate::entity::Entity;
use crate::error::WorldError;

/// Transform primitives a host simulation exposes to tasks.
///
/// While an entity is *externally driven* the host must skip its own physics
/// integration for it, leaving the written transform untouched. Only one
/// task may drive a given entity at a time; the host does not enforce this.
pub trait TransformHost {
    /// Returns the world transform of `entity`, if it exists.
    fn transform(&self, entity: Entity) -> Option<Transform3D>;

    /// Overwrite the world transform of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] if the entity does not exist.
    fn set_transform(&mut self, entity: Entity, transform: Transform3D) -> Result<(), WorldError>;

    /// Returns `true` if the host's own physics is suspended for `entity`.
    fn is_externally_driven(&self, entity: Entity) -> bool;

    /// Suspend (`true`) or restore (`false`) host physics for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] if the entity does not exist.
    fn set_externally_driven(&mut self, entity: Entity, driven: bool) -> Result<(), WorldError>;

    /// Spawn a visual-only tether owned by `owner`, replacing any tether the
    /// owner already has.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] if `owner` does not exist.
    fn spawn_tether(&mut self, owner: Entity, transform: Transform3D) -> Result<Entity, WorldError>;

    /// Returns the tether owned by `owner`, if one is attached.
    fn tether_of(&self, owner: Entity) -> Option<Entity>;

    /// Remove `entity` from the host. Returns `false` if it did not exist.
    fn despawn(&mut self, entity: Entity) -> bool;

    /// Returns the world position of `entity`, if it exists.
    fn position(&self, entity: Entity) -> Option<kinetic_math::Vec3> {
        self.transform(entity).map(|t| t.position)
    }
}
