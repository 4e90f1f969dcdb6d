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

//! `SYS_KILLALL`: not a cancellation mechanism, a post-hoc filter over the
//! scheduler's queues. A PCB currently executing on another CPU is never touched.

use crate::error::Result;
use crate::memory::FrameStore;
use crate::mm::Mm;
use crate::pcb::Pcb;
use crate::sched::Scheduler;

/// Reads the NUL-terminated name string out of region `name_rgid` in the caller's
/// address space, then removes and releases every queued PCB with that name.
/// Returns the number of processes killed.
///
/// The name is read with a straightforwardly advancing index rather than the
/// source's loop that resets its index every iteration.
pub fn sys_killall(
    mm: &mut Mm,
    ram: &mut dyn FrameStore,
    name_rgid: u32,
    sched: &mut Scheduler,
) -> Result<usize> {
    let name = read_name(mm, ram, name_rgid)?;
    let killed = sched.kill_matching(&name);
    log::info!("killall {name}: {} process(es) matched", killed.len());
    for pcb in &killed {
        free_pcb_memph(pcb, ram);
    }
    Ok(killed.len())
}

fn read_name(mm: &mut Mm, ram: &mut dyn FrameStore, rgid: u32) -> Result<String> {
    let region = mm.get_symrg_byid(rgid)?;
    let mut swap = mm.swap.lock().unwrap();
    let mut bytes = Vec::new();
    for addr in region.rg_start..region.rg_end {
        let byte = crate::memory::pg_getval(&mut mm.pgd, &mut mm.fifo_pgn, ram, &mut *swap, addr)?;
        if byte == 0 {
            break;
        }
        bytes.push(byte);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Returns a killed process's frames to their owning stores: resident pages go back
/// to physical memory, swapped-out pages go back to that process's own swap device.
///
/// The source's `free_pcb_memph` inverts the presence check and frees the wrong set;
/// this returns resident frames to `ram` and swapped frames to `swap`, never both.
fn free_pcb_memph(pcb: &Pcb, ram: &mut dyn FrameStore) {
    let mm = pcb.mm.lock().unwrap();
    let mut swap = mm.swap.lock().unwrap();
    for pte in &mm.pgd {
        if pte.present() && !pte.swapped() {
            ram.put_freefp(pte.fpn());
        } else if pte.swapped() {
            swap.put_freefp(pte.swap_offset());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instr::Program;
    use crate::memory::PhysMem;
    use std::sync::{Arc, Mutex};

    fn pcb_named(pid: u32, name: &str) -> Box<Pcb> {
        let swap = Arc::new(Mutex::new(PhysMem::new(4096)));
        Box::new(Pcb::new(pid, name, 0, Program::default(), Mm::new(swap)))
    }

    /// Queues contain "ls", "sh", "ls"; killing "ls" leaves only "sh" behind.
    #[test]
    fn kill_matching_leaves_non_matching_processes() {
        let mut sched = Scheduler::round_robin();
        sched.add(pcb_named(1, "ls"));
        sched.add(pcb_named(2, "sh"));
        sched.add(pcb_named(3, "ls"));

        let killed = sched.kill_matching("ls");
        assert_eq!(killed.len(), 2);

        let remaining = sched.pick().unwrap();
        assert_eq!(remaining.name, "sh");
        assert!(sched.empty());
    }
}
