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

//! Completely Fair Scheduler: a tree keyed by `(vruntime, pid)` with leftmost
//! extraction, backed here by a [`BTreeMap`] rather than an explicit red-black tree.
//! `BTreeMap` already gives O(log n) insert/leftmost-remove with the right key
//! ordering, so there is nothing a hand-rolled tree would add.
//!
//! Guards its own tree behind `inner`, a second lock nested under whatever outer lock
//! [`crate::sched::Scheduler`] is held with (mirrors the source's separate
//! `cfs_lock`/`rq_lock` alongside the RR/MLQ `queue_lock`).

use crate::constants::{
    MIN_GRANULARITY_NSEC, NICE_MAX, NICE_MIN, SCHED_LATENCY_NSEC, WEIGHT_NORM,
};
use crate::pcb::Pcb;
use crate::pid::Pid;
use std::collections::BTreeMap;
use std::sync::Mutex;

struct CfsInner {
    tree: BTreeMap<(u64, Pid), Box<Pcb>>,
    total_weight: u64,
}

/// Nice `[-20, 19]` maps to weight `WEIGHT_NORM << ((-nice) / 10)`.
pub fn compute_weight(nice: i32) -> u32 {
    let nice = nice.clamp(NICE_MIN, NICE_MAX);
    WEIGHT_NORM << ((-nice) / 10).max(0)
}

#[derive(Default)]
pub struct Cfs {
    inner: Mutex<Option<CfsInner>>,
}

impl Cfs {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Some(CfsInner {
                tree: BTreeMap::new(),
                total_weight: 0,
            })),
        }
    }

    /// Registers a newly created process with `vruntime = 0` and a weight derived
    /// from its `priority` field, treated as a nice value.
    pub fn add(&mut self, mut pcb: Box<Pcb>) {
        let weight = compute_weight(pcb.priority);
        pcb.cfs.weight = weight;
        pcb.cfs.vruntime = 0;
        let mut guard = self.inner.lock().unwrap();
        let inner = guard.as_mut().unwrap();
        inner.total_weight += weight as u64;
        inner.tree.insert((0, pcb.pid), pcb);
    }

    /// Removes and returns the leftmost `(vruntime, pid)` entry.
    pub fn pick(&mut self) -> Option<Box<Pcb>> {
        let mut guard = self.inner.lock().unwrap();
        let inner = guard.as_mut().unwrap();
        let key = *inner.tree.keys().next()?;
        let pcb = inner.tree.remove(&key).unwrap();
        inner.total_weight -= pcb.cfs.weight as u64;
        Some(pcb)
    }

    /// `vruntime += elapsed_ns * WEIGHT_NORM / max(weight, WEIGHT_NORM)`, then
    /// reinserts keyed on the updated `(vruntime, pid)`.
    pub fn yield_pcb(&mut self, mut pcb: Box<Pcb>, elapsed_ns: u64) {
        let divisor = pcb.cfs.weight.max(WEIGHT_NORM) as u64;
        pcb.cfs.vruntime += elapsed_ns * WEIGHT_NORM as u64 / divisor;
        let mut guard = self.inner.lock().unwrap();
        let inner = guard.as_mut().unwrap();
        inner.total_weight += pcb.cfs.weight as u64;
        inner.tree.insert((pcb.cfs.vruntime, pcb.pid), pcb);
    }

    pub fn empty(&self) -> bool {
        self.inner.lock().unwrap().as_ref().unwrap().tree.is_empty()
    }

    /// Removes every PCB named `name` from the tree, returning them.
    pub fn kill_matching(&mut self, name: &str) -> Vec<Box<Pcb>> {
        let mut guard = self.inner.lock().unwrap();
        let inner = guard.as_mut().unwrap();
        let matching_keys: Vec<(u64, Pid)> = inner
            .tree
            .iter()
            .filter(|(_, pcb)| pcb.name == name)
            .map(|(k, _)| *k)
            .collect();
        let mut killed = Vec::with_capacity(matching_keys.len());
        for key in matching_keys {
            let pcb = inner.tree.remove(&key).unwrap();
            inner.total_weight -= pcb.cfs.weight as u64;
            killed.push(pcb);
        }
        killed
    }

    /// `max(MIN_GRANULARITY_NSEC, SCHED_LATENCY_NSEC * weight / total_weight)`. Called
    /// with the picked process's own weight still excluded from `total_weight` (it was
    /// removed from the tree by [`Cfs::pick`]), matching the source's
    /// `total / (total_weight + external)` framing where `external` is the picked
    /// task's own contribution added back in by the caller if desired.
    pub fn timeslice(&self, weight: u32, external_weight: u64) -> u64 {
        let total = self.inner.lock().unwrap().as_ref().unwrap().total_weight + external_weight;
        if total == 0 {
            return MIN_GRANULARITY_NSEC;
        }
        let slice = SCHED_LATENCY_NSEC * weight as u64 / total;
        slice.max(MIN_GRANULARITY_NSEC)
    }
}

impl std::fmt::Debug for Cfs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cfs").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instr::Program;
    use crate::memory::PhysMem;
    use crate::mm::Mm;
    use std::sync::{Arc, Mutex as StdMutex};

    fn pcb(pid: u32, nice: i32) -> Box<Pcb> {
        let swap = Arc::new(StdMutex::new(PhysMem::new(256)));
        Box::new(Pcb::new(pid, format!("p{pid}"), nice, Program::default(), Mm::new(swap)))
    }

    #[test]
    fn weight_formula_matches_nice_zero_baseline() {
        assert_eq!(compute_weight(0), WEIGHT_NORM);
    }

    /// Two equal-weight processes, picked and re-yielded with identical elapsed
    /// time, alternate strictly and finish with equal vruntime.
    #[test]
    fn equal_weight_processes_alternate_and_finish_even() {
        let mut cfs = Cfs::new();
        cfs.add(pcb(1, 0));
        cfs.add(pcb(2, 0));

        let mut order = Vec::new();
        for _ in 0..6 {
            let picked = cfs.pick().unwrap();
            order.push(picked.pid);
            cfs.yield_pcb(picked, 1_000_000);
        }
        assert_eq!(order, vec![1, 2, 1, 2, 1, 2]);

        // Both ended the sweep with identical vruntime: pick the last two and compare.
        let last = cfs.pick().unwrap();
        let prev = cfs.pick().unwrap();
        assert_eq!(last.cfs.vruntime, prev.cfs.vruntime);
    }

    #[test]
    fn tie_break_orders_by_pid_ascending() {
        let mut cfs = Cfs::new();
        cfs.add(pcb(5, 0));
        cfs.add(pcb(2, 0));
        cfs.add(pcb(9, 0));
        assert_eq!(cfs.pick().unwrap().pid, 2);
    }
}
