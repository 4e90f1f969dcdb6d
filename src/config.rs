//! Data shapes for the simulator configuration file.
//!
//! Parsing the on-disk text format and spawning worker threads is the external CLI
//! driver's job (see the crate's top-level docs); this module only defines the shape
//! so a driver has something strongly typed to parse into.

use serde::{Deserialize, Serialize};

/// Which scheduler policy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedPolicyKind {
    RoundRobin,
    MultiLevelQueue,
    CompletelyFair,
}

/// One entry of the process table: when to start it, where its code lives, and at what
/// priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Tick at which the loader should admit this process to the scheduler.
    pub start_time: u64,
    /// Path to the instruction-stream text file (resolved by the loader, not this crate).
    pub path: String,
    /// Static priority / nice value, interpreted according to the active
    /// [`SchedPolicyKind`].
    pub priority: i32,
}

/// The whole simulator configuration, as consumed by the external CLI driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Size of physical memory, in bytes.
    pub ram_size: u32,
    /// Number of swap devices.
    pub swap_count: u32,
    /// Size of each swap device, in bytes, indexed the same as `swap_count`.
    pub swap_size: Vec<u32>,
    /// Number of logical CPUs to spawn worker threads for.
    pub num_cpus: u32,
    /// Length of a scheduling quantum, in nanoseconds.
    pub timeslice: u64,
    /// Number of processes declared below.
    pub num_processes: u32,
    /// The process table.
    pub processes: Vec<ProcessSpec>,
    /// The scheduler policy this run uses.
    pub policy: SchedPolicyKind,
}
