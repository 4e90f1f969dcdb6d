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

//! The memory-management syscall table reachable from a `SYSCALL` instruction.
//! `SYS_KILLALL` is handled separately in [`crate::killall`] since it needs the
//! scheduler, not just a process's own `Mm`.

use crate::constants::PAGING_PAGESZ;
use crate::error::{Error, Result};
use crate::memory::FrameStore;
use crate::mm::Mm;

pub const SYSMEM_MAP_OP: u32 = 0;
pub const SYSMEM_INC_OP: u32 = 1;
pub const SYSMEM_SWP_OP: u32 = 2;
pub const SYSMEM_IO_READ: u32 = 3;
pub const SYSMEM_IO_WRITE: u32 = 4;
pub const SYS_KILLALL: u32 = 5;

/// Dispatches one of the `SYSMEM_*` ids. Returns the value an `IO_READ` produced (0
/// for every other id that doesn't read memory).
pub fn dispatch_sysmem(
    mm: &mut Mm,
    ram: &mut dyn FrameStore,
    id: u32,
    a1: u32,
    a2: u32,
    _a3: u32,
) -> Result<u32> {
    match id {
        SYSMEM_MAP_OP => Ok(0),
        SYSMEM_INC_OP => {
            mm.inc_vma_limit(ram, a1, a2)?;
            Ok(0)
        }
        SYSMEM_SWP_OP => {
            copy_frame(ram, a1, a2)?;
            Ok(0)
        }
        SYSMEM_IO_READ => ram.read(a1).map(|b| b as u32),
        SYSMEM_IO_WRITE => {
            ram.write(a1, a2 as u8)?;
            Ok(0)
        }
        other => Err(Error::UnknownSyscall(other)),
    }
}

/// Byte-copies one frame's worth of data from `src_fpn` to `dst_fpn` within the same
/// backing store.
fn copy_frame(store: &mut dyn FrameStore, src_fpn: u32, dst_fpn: u32) -> Result<()> {
    for cell in 0..PAGING_PAGESZ {
        let byte = store.read(src_fpn * PAGING_PAGESZ + cell)?;
        store.write(dst_fpn * PAGING_PAGESZ + cell, byte)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::PhysMem;
    use std::sync::{Arc, Mutex};

    fn fresh(sz: u32) -> (Mm, PhysMem) {
        (Mm::new(Arc::new(Mutex::new(PhysMem::new(sz)))), PhysMem::new(sz))
    }

    #[test]
    fn io_write_then_read_round_trips() {
        let (mut mm, mut ram) = fresh(4 * PAGING_PAGESZ);
        dispatch_sysmem(&mut mm, &mut ram, SYSMEM_IO_WRITE, 10, 0x42, 0).unwrap();
        let v = dispatch_sysmem(&mut mm, &mut ram, SYSMEM_IO_READ, 10, 0, 0).unwrap();
        assert_eq!(v, 0x42);
    }

    #[test]
    fn unknown_id_errors() {
        let (mut mm, mut ram) = fresh(PAGING_PAGESZ);
        let err = dispatch_sysmem(&mut mm, &mut ram, 99, 0, 0, 0).unwrap_err();
        assert_eq!(err, Error::UnknownSyscall(99));
    }
}
