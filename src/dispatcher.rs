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

//! Executes one instruction per quantum tick against a PCB, calling into VMA/PT/PMEM
//! for memory ops and into the syscall table for `SYSCALL`.

use crate::error::Result;
use crate::instr::Opcode;
use crate::killall::sys_killall;
use crate::memory::{pg_getval, pg_setval, FrameStore};
use crate::pcb::Pcb;
use crate::sched::Scheduler;
use crate::syscall::{self, dispatch_sysmem};

/// What a tick accomplished. `Finished` means the PCB has run its last instruction
/// and should not be re-queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ok,
    Finished,
}

/// Runs the instruction at `pcb.pc`, advancing `pc` first. A failing instruction is
/// surfaced as `Err` but `pc` has already moved past it, same as every successful one.
pub fn tick(pcb: &mut Pcb, ram: &mut dyn FrameStore, sched: &mut Scheduler) -> Result<TickOutcome> {
    if pcb.finished() {
        log::info!("pid {} ({}) has finished", pcb.pid, pcb.name);
        return Ok(TickOutcome::Finished);
    }

    let instr = pcb.code[pcb.pc];
    pcb.pc += 1;

    let mut mm = pcb.mm.lock().unwrap();
    match instr.opcode {
        Opcode::Calc => {}
        Opcode::Alloc => {
            let start = mm.alloc(ram, 0, instr.arg0, instr.arg1)?;
            pcb.regs.set(instr.arg1 as usize, start)?;
        }
        Opcode::Free => {
            mm.free(instr.arg0)?;
        }
        Opcode::Read => {
            let region = mm.get_symrg_byid(instr.arg0)?;
            let addr = region.rg_start + instr.arg1;
            let mut swap = mm.swap.lock().unwrap();
            let value = pg_getval(&mut mm.pgd, &mut mm.fifo_pgn, ram, &mut *swap, addr)?;
            drop(swap);
            pcb.regs.set(instr.arg2 as usize, value as u32)?;
        }
        Opcode::Write => {
            let region = mm.get_symrg_byid(instr.arg1)?;
            let addr = region.rg_start + instr.arg2;
            let mut swap = mm.swap.lock().unwrap();
            pg_setval(
                &mut mm.pgd,
                &mut mm.fifo_pgn,
                ram,
                &mut *swap,
                addr,
                instr.arg0 as u8,
            )?;
        }
        Opcode::Syscall => {
            let (id, a1, a2, a3) = (instr.arg0, instr.arg1, instr.arg2, instr.arg3);
            if id == syscall::SYS_KILLALL {
                sys_killall(&mut mm, ram, a3, sched)?;
            } else if id == syscall::SYSMEM_IO_READ {
                let value = dispatch_sysmem(&mut mm, ram, id, a1, a2, a3)?;
                pcb.regs.set(a3 as usize, value)?;
            } else {
                dispatch_sysmem(&mut mm, ram, id, a1, a2, a3)?;
            }
        }
    }

    Ok(TickOutcome::Ok)
}
