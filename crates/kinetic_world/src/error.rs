//! World-layer error types.

use crate::entity::Entity;

/// Errors that can occur when reading or writing host state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The entity does not exist in the host.
    #[error("unknown entity: {0}")]
    UnknownEntity(Entity),

    /// The reserved invalid entity was used.
    #[error("the invalid entity cannot be addressed")]
    InvalidEntity,
}
