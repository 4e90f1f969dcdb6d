//! Sizing constants shared by the paging and scheduling subsystems.
//!
//! These mirror the `PAGING_*`/`MAX_PRIO`/CFS tunables a config header would define in
//! the source project; here they're plain `const`s since nothing needs them to be
//! build-time configurable.

/// Bytes per physical frame / virtual page.
pub const PAGING_PAGESZ: u32 = 256;

/// Number of entries in a process's page directory (`pgd`), i.e. the largest virtual
/// page number a process can address.
pub const PAGING_MAX_PGN: usize = 256;

/// Number of named region slots in a process's symbol table (`symrgtbl`).
pub const PAGING_MAX_SYMTBL_SZ: usize = 30;

/// Number of general-purpose registers per PCB.
pub const NREG: usize = 10;

/// Default number of Multi-Level Queue priority levels. Callers may size an MLQ
/// instance differently (S2 in the test suite uses 4).
pub const DEFAULT_MAX_PRIO: usize = 140;

/// CFS: the weight of a `nice == 0` task, i.e. the baseline unit all other weights and
/// vruntime deltas are scaled against.
pub const WEIGHT_NORM: u32 = 1024;

/// CFS: total time a full sweep across all runnable tasks should take, before dividing
/// by weight share to get one task's slice.
pub const SCHED_LATENCY_NSEC: u64 = 6_000_000;

/// CFS: no task is ever given a slice below this, regardless of how many tasks are
/// runnable, to bound context-switch overhead.
pub const MIN_GRANULARITY_NSEC: u64 = 750_000;

/// CFS: nice values are clamped to this range before computing weight.
pub const NICE_MIN: i32 = -20;
pub const NICE_MAX: i32 = 19;
