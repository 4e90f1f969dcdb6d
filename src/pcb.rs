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

//! The process control block: the unit of scheduling, and the owner of a process's
//! memory-management state.

use crate::constants::NREG;
use crate::error::{Error, Result};
use crate::instr::Program;
use crate::mm::Mm;
use crate::pid::Pid;
use std::sync::Mutex;

/// A process's general-purpose registers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Registers(pub [u32; NREG]);

impl Registers {
    pub fn get(&self, idx: usize) -> Result<u32> {
        self.0
            .get(idx)
            .copied()
            .ok_or(Error::InvalidRegister(idx as u32))
    }

    pub fn set(&mut self, idx: usize, value: u32) -> Result<()> {
        let slot = self
            .0
            .get_mut(idx)
            .ok_or(Error::InvalidRegister(idx as u32))?;
        *slot = value;
        Ok(())
    }
}

/// Scheduler-policy-specific decoration carried alongside every PCB.
///
/// Exactly one variant is populated, matching whichever [`crate::sched::Scheduler`]
/// variant owns this process; the others are left at their default.
#[derive(Debug, Clone, Copy, Default)]
pub struct CfsEntity {
    pub vruntime: u64,
    pub weight: u32,
}

/// Exclusively owned by whichever queue or worker thread currently holds it.
/// Ownership transfers on every queue move (`add`/`pick`/`yield`).
pub struct Pcb {
    pub pid: Pid,
    pub name: String,
    pub priority: i32,
    pub pc: usize,
    pub regs: Registers,
    pub code: Program,
    pub mm: Mutex<Mm>,
    pub cfs: CfsEntity,
}

impl Pcb {
    pub fn new(pid: Pid, name: impl Into<String>, priority: i32, code: Program, mm: Mm) -> Self {
        Self {
            pid,
            name: name.into(),
            priority,
            pc: 0,
            regs: Registers::default(),
            code,
            mm: Mutex::new(mm),
            cfs: CfsEntity::default(),
        }
    }

    /// `true` once every instruction in `code` has been dispatched.
    pub fn finished(&self) -> bool {
        self.pc >= self.code.len()
    }
}

impl std::fmt::Debug for Pcb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pcb")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("pc", &self.pc)
            .finish_non_exhaustive()
    }
}
