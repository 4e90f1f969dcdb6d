//! Process identifiers.

use std::sync::atomic::{AtomicU32, Ordering};

/// Unique, monotonically assigned process identifier.
pub type Pid = u32;

/// Hands out strictly increasing [`Pid`]s starting at 1.
///
/// The loader owns one allocator for the lifetime of a simulation run; PIDs are never
/// reused, matching the source design's "unique positive integer" invariant.
#[derive(Debug, Default)]
pub struct PidAllocator {
    next: AtomicU32,
}

impl PidAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// Returns the next PID and advances the counter.
    pub fn alloc(&self) -> Pid {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
