//! Error kinds shared by every component (PMEM, PT, VMA, SCHED, DISP).
//!
//! Every component returns `Result<T>` instead of the original C sources' sentinel
//! integers; the propagation policy (DISP surfaces a failed instruction but still
//! advances `pc`; SCHED itself never fails) is unchanged from the source design.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Something a component refused to do, along with enough context to explain why.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Physical memory and the active swap device are both exhausted: there was no free
    /// frame to satisfy an allocation and no victim could be evicted to free one up.
    #[error("out of frames: physical memory and swap are both exhausted")]
    OutOfFrames,
    /// A proposed virtual memory range collides with an existing VMA.
    #[error("proposed range overlaps an existing VMA")]
    OverlapVma,
    /// A region id is out of bounds or refers to a cleared symbol-table slot.
    #[error("invalid region id {0}")]
    InvalidRegion(u32),
    /// A page fault occurred on a page that was never mapped.
    #[error("invalid page access: page {0} is unmapped")]
    InvalidPage(u32),
    /// A physical address fell outside the backing store's range.
    #[error("address {0} is out of bounds (size {1})")]
    BadAddress(u32, u32),
    /// `pg_getpage` needed a victim but `fifo_pgn` was empty: nothing resident to evict.
    #[error("no victim page available for eviction")]
    NoVictim,
    /// A `SYSCALL` instruction carried an id outside the syscall table.
    #[error("unknown syscall id {0}")]
    UnknownSyscall(u32),
    /// An instruction's register argument named an index outside `regs`.
    #[error("invalid register index {0}")]
    InvalidRegister(u32),
}
