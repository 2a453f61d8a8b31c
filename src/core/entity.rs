//! Instance identification.
//!
//! Every drawn defense card and every spawned risk gets a unique `InstanceId`.
//! Two draws of the same catalog template are still distinct instances.
//!
//! ## Allocation
//!
//! IDs come from a monotonic counter owned by the session. The counter is
//! never reset on restart, so an ID held by a presentation layer from a
//! discarded game can never alias a card in the new one.
//!
//! ```
//! use insurance_defense::core::IdAllocator;
//!
//! let mut ids = IdAllocator::new();
//! let a = ids.next_id();
//! let b = ids.next_id();
//! assert_ne!(a, b);
//! assert!(b > a);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card or risk instance within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl InstanceId {
    /// Create an instance ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for `InstanceId`s.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next ID.
    pub fn next_id(&mut self) -> InstanceId {
        // Default-constructed allocators start at 0; skip it so 0 never appears.
        if self.next == 0 {
            self.next = 1;
        }
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next.saturating_sub(1)
    }
}
