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

//! Multi-level queue with aging slots: `max_prio` FIFO queues, a per-level slot
//! counter that refills to `max_prio - p`, and a rotating cursor.

use crate::constants::DEFAULT_MAX_PRIO;
use crate::pcb::Pcb;
use std::collections::VecDeque;

#[derive(Debug)]
pub struct Mlq {
    queues: Vec<VecDeque<Box<Pcb>>>,
    slot: Vec<i32>,
    curr_prio: usize,
    max_prio: usize,
}

impl Mlq {
    pub fn new(max_prio: usize) -> Self {
        assert!(max_prio > 0, "MLQ needs at least one priority level");
        Self {
            queues: (0..max_prio).map(|_| VecDeque::new()).collect(),
            slot: (0..max_prio).map(|p| (max_prio - p) as i32).collect(),
            curr_prio: 0,
            max_prio,
        }
    }

    fn level_of(&self, pcb: &Pcb) -> usize {
        (pcb.priority.max(0) as usize).min(self.max_prio - 1)
    }

    pub fn add(&mut self, pcb: Box<Pcb>) {
        let level = self.level_of(&pcb);
        self.queues[level].push_back(pcb);
    }

    pub fn yield_pcb(&mut self, pcb: Box<Pcb>) {
        self.add(pcb);
    }

    /// Scans levels starting at `curr_prio` with wraparound; at the first non-empty
    /// level, consumes a slot and dequeues its head. Refills and advances the cursor
    /// past that level once its slot budget or its queue runs dry.
    pub fn pick(&mut self) -> Option<Box<Pcb>> {
        if self.empty() {
            return None;
        }
        for step in 0..self.max_prio {
            let p = (self.curr_prio + step) % self.max_prio;
            if self.queues[p].is_empty() {
                continue;
            }
            self.slot[p] -= 1;
            let pcb = self.queues[p].pop_front();
            if self.slot[p] <= 0 || self.queues[p].is_empty() {
                self.slot[p] = (self.max_prio - p) as i32;
                self.curr_prio = (p + 1) % self.max_prio;
                log::trace!("mlq level {p} exhausted its slot budget, advancing to level {}", self.curr_prio);
            } else {
                self.curr_prio = p;
            }
            return pcb;
        }
        None
    }

    pub fn empty(&self) -> bool {
        self.queues.iter().all(|q| q.is_empty())
    }

    /// Removes every PCB named `name` from every level, returning them.
    pub fn kill_matching(&mut self, name: &str) -> Vec<Box<Pcb>> {
        let mut killed = Vec::new();
        for queue in &mut self.queues {
            let drained = std::mem::take(queue);
            let mut kept = VecDeque::with_capacity(drained.len());
            for pcb in drained {
                if pcb.name == name {
                    killed.push(pcb);
                } else {
                    kept.push_back(pcb);
                }
            }
            *queue = kept;
        }
        killed
    }
}

impl Default for Mlq {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PRIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instr::Program;
    use crate::memory::PhysMem;
    use crate::mm::Mm;
    use std::sync::{Arc, Mutex};

    fn pcb(pid: u32, priority: i32) -> Box<Pcb> {
        let swap = Arc::new(Mutex::new(PhysMem::new(256)));
        Box::new(Pcb::new(
            pid,
            format!("p{pid}"),
            priority,
            Program::default(),
            Mm::new(swap),
        ))
    }

    /// Each level is kept saturated (many more waiting processes than its slot
    /// budget could drain in one sweep), so the dequeue never empties a level
    /// mid-scan and only the slot counter drives rotation. First ten picks are
    /// `A A A A B B B C C D`.
    #[test]
    fn saturated_levels_rotate_by_slot_budget() {
        let mut mlq = Mlq::new(4);
        for level in 0..4u32 {
            for _ in 0..20 {
                mlq.add(pcb(level + 1, level as i32));
            }
        }

        let order: Vec<u32> = (0..10).map(|_| mlq.pick().unwrap().pid).collect();
        assert_eq!(order, vec![1, 1, 1, 1, 2, 2, 2, 3, 3, 4]);
    }

    #[test]
    fn empty_iff_every_level_empty() {
        let mut mlq = Mlq::new(2);
        assert!(mlq.empty());
        mlq.add(pcb(1, 1));
        assert!(!mlq.empty());
        let p = mlq.pick().unwrap();
        assert!(mlq.empty());
        drop(p);
    }
}
