/*
 * Copyright 2024 Luc Lenôtre
 *
 * This file is part of Maestro.
 *
 * Maestro is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * Maestro is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * Maestro. If not, see <https://www.gnu.org/licenses/>.
 */

//! The CPU scheduler and paged virtual-memory manager at the core of a teaching-grade
//! OS simulator: physical memory, per-process page tables with FIFO swap eviction,
//! growable virtual memory areas with a best-fit free-region allocator, three
//! interchangeable scheduling policies, and the dispatcher that ties them together.
//!
//! An external driver is expected to parse a [`config::SimConfig`], build each
//! process's [`instr::Program`] from its own loader, register them with a
//! [`sched::Scheduler`], and run one worker thread per logical CPU, each looping:
//!
//! ```text
//! loop {
//!     let Some(mut pcb) = sched.lock().unwrap().pick() else { break };
//!     let outcome = dispatcher::tick(&mut pcb, &mut ram, &mut sched.lock().unwrap());
//!     match outcome {
//!         Ok(dispatcher::TickOutcome::Finished) => {}
//!         _ => sched.lock().unwrap().yield_pcb(pcb, elapsed_ns),
//!     }
//! }
//! ```
//!
//! That driver loop, the instruction-stream loader, and the backing devices'
//! provisioning are outside this crate's scope; see [`memory::BackingStore`] for the
//! interface a physical-memory or swap device must expose.

pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod instr;
pub mod killall;
pub mod memory;
pub mod mm;
pub mod pcb;
pub mod pid;
pub mod sched;
pub mod syscall;

pub use error::{Error, Result};
