//! Entity handles.
//!
//! The host owns every entity; tasks receive handles as task arguments and
//! pass them back to the host untouched. Raw id `0` never names a live entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to an entity owned by a [`TransformHost`](crate::TransformHost).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Handle that no host ever hands out.
    pub const INVALID: Entity = Entity(0);

    /// Wrap a host-side id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-side id this handle wraps.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// `false` only for [`Entity::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh entity handles for a host. Handles are never recycled, so
/// a stale handle held by a queued task can only miss, never alias.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    issued: u64,
}

impl EntityAllocator {
    /// Create an allocator that has issued nothing; the first handle is `#1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused handle.
    pub fn allocate(&mut self) -> Entity {
        self.issued += 1;
        Entity(self.issued)
    }

    /// How many handles have been issued.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_handle() {
        assert!(!Entity::INVALID.is_valid());
        assert!(Entity::from_raw(7).is_valid());
        assert_eq!(Entity::from_raw(7).to_string(), "#7");
    }

    #[test]
    fn test_allocator_never_issues_invalid_or_repeats() {
        let mut allocator = EntityAllocator::new();
        let first = allocator.allocate();
        let second = allocator.allocate();
        assert!(first.is_valid());
        assert_ne!(first, second);
        assert_eq!(second.raw(), 2);
        assert_eq!(allocator.issued(), 2);
    }

    #[test]
    fn test_serializes_as_bare_id() {
        let json = serde_json::to_string(&Entity::from_raw(12)).unwrap();
        assert_eq!(json, "12");
    }
}
