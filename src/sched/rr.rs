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

//! Round-robin: two FIFO queues, `ready` and `run`.

use crate::pcb::Pcb;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct Rr {
    ready: VecDeque<Box<Pcb>>,
    run: VecDeque<Box<Pcb>>,
}

impl Rr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pcb: Box<Pcb>) {
        self.ready.push_back(pcb);
    }

    /// Dequeues from `ready`; if `ready` is empty and `run` isn't, the whole of `run`
    /// becomes the new `ready` first (a round boundary) before dequeueing.
    pub fn pick(&mut self) -> Option<Box<Pcb>> {
        if self.ready.is_empty() && !self.run.is_empty() {
            std::mem::swap(&mut self.ready, &mut self.run);
        }
        self.ready.pop_front()
    }

    pub fn yield_pcb(&mut self, pcb: Box<Pcb>) {
        self.run.push_back(pcb);
    }

    pub fn empty(&self) -> bool {
        self.ready.is_empty() && self.run.is_empty()
    }

    /// Removes every PCB named `name` from both queues, returning them.
    pub fn kill_matching(&mut self, name: &str) -> Vec<Box<Pcb>> {
        let mut killed = Vec::new();
        self.ready = partition_out(std::mem::take(&mut self.ready), name, &mut killed);
        self.run = partition_out(std::mem::take(&mut self.run), name, &mut killed);
        killed
    }
}

fn partition_out(
    queue: VecDeque<Box<Pcb>>,
    name: &str,
    killed: &mut Vec<Box<Pcb>>,
) -> VecDeque<Box<Pcb>> {
    let mut kept = VecDeque::with_capacity(queue.len());
    for pcb in queue {
        if pcb.name == name {
            killed.push(pcb);
        } else {
            kept.push_back(pcb);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instr::Program;
    use crate::mm::Mm;
    use crate::memory::PhysMem;
    use std::sync::{Arc, Mutex};

    fn pcb(pid: u32) -> Box<Pcb> {
        let swap = Arc::new(Mutex::new(PhysMem::new(256)));
        Box::new(Pcb::new(pid, format!("p{pid}"), 0, Program::default(), Mm::new(swap)))
    }

    #[test]
    fn round_boundary_moves_run_back_to_ready() {
        let mut rr = Rr::new();
        rr.add(pcb(1));
        rr.add(pcb(2));

        let a = rr.pick().unwrap();
        assert_eq!(a.pid, 1);
        rr.yield_pcb(a);

        let b = rr.pick().unwrap();
        assert_eq!(b.pid, 2);
        rr.yield_pcb(b);

        let a2 = rr.pick().unwrap();
        assert_eq!(a2.pid, 1);
    }

    #[test]
    fn empty_after_all_picked_with_no_reyield() {
        let mut rr = Rr::new();
        rr.add(pcb(1));
        rr.pick().unwrap();
        assert!(rr.empty());
    }
}
