//! Arena identity.
//!
//! Every environment belongs to an [`Arena`]; every heap value records the
//! [`ArenaId`] it was allocated in. Values never alias across arenas:
//! moving one into another arena is a deep copy (see
//! [`Value::copy_into`](crate::Value::copy_into)).

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of an arena, unique for the life of the process.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ArenaId(u32);

impl ArenaId {
    fn fresh() -> Self {
        ArenaId(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaId({})", self.0)
    }
}

/// Allocation region shared by a root environment and its children.
#[derive(Debug)]
pub struct Arena {
    id: ArenaId,
    allocations: Cell<usize>,
}

impl Arena {
    pub fn new() -> Self {
        let arena = Arena {
            id: ArenaId::fresh(),
            allocations: Cell::new(0),
        };
        tracing::trace!(arena = arena.id.raw(), "new arena");
        arena
    }

    #[inline]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Heap values allocated in this arena so far.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    #[inline]
    pub(crate) fn record_allocation(&self) -> ArenaId {
        self.allocations.set(self.allocations.get() + 1);
        self.id
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
