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

//! Three interchangeable scheduling policies behind one `{add, pick, yield, empty}`
//! capability set. A driver holds exactly one [`Scheduler`] instance, wrapped in its
//! own `Mutex` (the `sched.outer` lock of the crate's lock hierarchy); `Scheduler::Cfs`
//! additionally nests its tree behind its own inner lock (see [`cfs::Cfs`]).

pub mod cfs;
pub mod mlq;
pub mod rr;

use crate::constants::DEFAULT_MAX_PRIO;
use crate::pcb::Pcb;
use cfs::Cfs;
use mlq::Mlq;
use rr::Rr;

/// Policy-agnostic handle a driver picks once at startup.
pub enum Scheduler {
    RoundRobin(Rr),
    MultiLevelQueue(Mlq),
    CompletelyFair(Cfs),
}

impl Scheduler {
    pub fn round_robin() -> Self {
        Scheduler::RoundRobin(Rr::new())
    }

    pub fn multi_level_queue(max_prio: usize) -> Self {
        Scheduler::MultiLevelQueue(Mlq::new(max_prio))
    }

    pub fn completely_fair() -> Self {
        Scheduler::CompletelyFair(Cfs::new())
    }

    /// Registers a newly created process.
    pub fn add(&mut self, pcb: Box<Pcb>) {
        log::trace!("admitting pid {} ({})", pcb.pid, pcb.name);
        match self {
            Scheduler::RoundRobin(rr) => rr.add(pcb),
            Scheduler::MultiLevelQueue(mlq) => mlq.add(pcb),
            Scheduler::CompletelyFair(cfs) => cfs.add(pcb),
        }
    }

    /// Removes and returns the next process to dispatch.
    pub fn pick(&mut self) -> Option<Box<Pcb>> {
        match self {
            Scheduler::RoundRobin(rr) => rr.pick(),
            Scheduler::MultiLevelQueue(mlq) => mlq.pick(),
            Scheduler::CompletelyFair(cfs) => cfs.pick(),
        }
    }

    /// Reinserts a process that has just run for `elapsed_ns`. RR and MLQ ignore the
    /// elapsed time; CFS uses it to advance `vruntime`.
    ///
    /// Named `yield_pcb` rather than `yield` since the latter is a reserved keyword.
    pub fn yield_pcb(&mut self, pcb: Box<Pcb>, elapsed_ns: u64) {
        match self {
            Scheduler::RoundRobin(rr) => rr.yield_pcb(pcb),
            Scheduler::MultiLevelQueue(mlq) => mlq.yield_pcb(pcb),
            Scheduler::CompletelyFair(cfs) => cfs.yield_pcb(pcb, elapsed_ns),
        }
    }

    pub fn empty(&self) -> bool {
        match self {
            Scheduler::RoundRobin(rr) => rr.empty(),
            Scheduler::MultiLevelQueue(mlq) => mlq.empty(),
            Scheduler::CompletelyFair(cfs) => cfs.empty(),
        }
    }

    /// `SYS_KILLALL`'s post-hoc filter: removes every queued PCB named `name` across
    /// whichever policy is active, returning them so the caller can release their
    /// memory. A PCB already dispatched to another CPU is untouched (it isn't in any
    /// of these queues while it's running).
    pub fn kill_matching(&mut self, name: &str) -> Vec<Box<Pcb>> {
        match self {
            Scheduler::RoundRobin(rr) => rr.kill_matching(name),
            Scheduler::MultiLevelQueue(mlq) => mlq.kill_matching(name),
            Scheduler::CompletelyFair(cfs) => cfs.kill_matching(name),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::MultiLevelQueue(Mlq::new(DEFAULT_MAX_PRIO))
    }
}
