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

//! Per-process memory management state: page directory, VMA list, symbol region
//! table, and the FIFO resident-page list, all behind the process's `mm.vm_lock`.

pub mod vma;

use crate::constants::{PAGING_MAX_PGN, PAGING_MAX_SYMTBL_SZ, PAGING_PAGESZ};
use crate::error::{Error, Result};
use crate::memory::{pg_getpage, vm_map_ram, FrameStore, Pte};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use vma::{Region, Vma};

/// Memory-management state owned 1:1 by a PCB.
///
/// `swap` is the process's active swap device, bound once at construction (mirrors
/// `caller->active_mswp` in the source: the device never changes over a process's
/// lifetime in this design).
pub struct Mm {
    pub pgd: Vec<Pte>,
    pub vma_list: Vec<Vma>,
    pub symrgtbl: Vec<Option<Region>>,
    pub fifo_pgn: VecDeque<u32>,
    pub swap: Arc<Mutex<dyn FrameStore>>,
}

impl Mm {
    pub fn new(swap: Arc<Mutex<dyn FrameStore>>) -> Self {
        Self {
            pgd: vec![Pte::UNMAPPED; PAGING_MAX_PGN],
            vma_list: vec![Vma::new(0, 0)],
            symrgtbl: vec![None; PAGING_MAX_SYMTBL_SZ],
            fifo_pgn: VecDeque::new(),
            swap,
        }
    }

    pub fn get_vma_by_num(&self, vmaid: u32) -> Option<&Vma> {
        self.vma_list.iter().find(|v| v.vm_id == vmaid)
    }

    fn get_vma_mut(&mut self, vmaid: u32) -> Option<&mut Vma> {
        self.vma_list.iter_mut().find(|v| v.vm_id == vmaid)
    }

    pub fn get_symrg_byid(&self, rgid: u32) -> Result<Region> {
        self.symrgtbl
            .get(rgid as usize)
            .and_then(|slot| *slot)
            .ok_or(Error::InvalidRegion(rgid))
    }

    /// Grows `vmaid`'s mapped range by (at least) `inc_sz` bytes and maps fresh frames
    /// for the new pages. Grounds `inc_vma_limit`.
    pub fn inc_vma_limit(
        &mut self,
        ram: &mut dyn FrameStore,
        vmaid: u32,
        inc_sz: u32,
    ) -> Result<()> {
        let inc_amt = align_up(inc_sz, PAGING_PAGESZ);
        let incnumpage = inc_amt / PAGING_PAGESZ;
        log::debug!("growing vma {vmaid} by {inc_amt} bytes ({incnumpage} pages) to satisfy a {inc_sz}-byte request");

        let (old_end, new_start, new_end, pg_start) = {
            let vma = self.get_vma_mut(vmaid).ok_or(Error::InvalidRegion(vmaid))?;
            let new_start = vma.sbrk;
            let new_end = new_start + inc_amt;
            (vma.vm_end, new_start, new_end, new_start / PAGING_PAGESZ)
        };

        if self
            .vma_list
            .iter()
            .any(|v| v.vm_id != vmaid && v.overlaps(new_start, new_end))
        {
            return Err(Error::OverlapVma);
        }

        {
            let mut swap = self.swap.lock().unwrap();
            vm_map_ram(
                &mut self.pgd,
                &mut self.fifo_pgn,
                ram,
                &mut *swap,
                pg_start,
                incnumpage,
            )?;
        }

        let vma = self.get_vma_mut(vmaid).ok_or(Error::InvalidRegion(vmaid))?;
        vma.vm_end = new_end;
        vma.sbrk = new_end;
        if old_end < new_end {
            vma.enlist_free_region(Region::new(old_end, new_end));
        }
        Ok(())
    }

    /// Finds or creates `size` bytes of free space in `vmaid`, growing the VMA via
    /// [`Mm::inc_vma_limit`] at most once if the free list has no sufficient region.
    /// Grounds `get_free_vmrg_area`.
    pub fn get_free_vmrg_area(
        &mut self,
        ram: &mut dyn FrameStore,
        vmaid: u32,
        size: u32,
    ) -> Result<Region> {
        {
            let vma = self.get_vma_mut(vmaid).ok_or(Error::InvalidRegion(vmaid))?;
            if let Some(idx) = vma.best_fit(size) {
                return Ok(vma.carve(idx, size));
            }
        }

        let tail_free = self
            .get_vma_by_num(vmaid)
            .ok_or(Error::InvalidRegion(vmaid))?
            .tail_free_size();
        let needed = size.saturating_sub(tail_free);
        self.inc_vma_limit(ram, vmaid, needed)?;

        let vma = self.get_vma_mut(vmaid).ok_or(Error::InvalidRegion(vmaid))?;
        let idx = vma.best_fit(size).ok_or(Error::OutOfFrames)?;
        Ok(vma.carve(idx, size))
    }

    /// `ALLOC(size, rgid)`: reserves a region, records it in the symbol table, and
    /// pages in every virtual page the region covers. Returns the region's start
    /// address. Grounds `__alloc`.
    pub fn alloc(
        &mut self,
        ram: &mut dyn FrameStore,
        vmaid: u32,
        size: u32,
        rgid: u32,
    ) -> Result<u32> {
        if rgid as usize >= self.symrgtbl.len() {
            return Err(Error::InvalidRegion(rgid));
        }
        let region = self.get_free_vmrg_area(ram, vmaid, size)?;
        self.symrgtbl[rgid as usize] = Some(region);

        let mut swap = self.swap.lock().unwrap();
        let first_pgn = region.rg_start / PAGING_PAGESZ;
        let last_pgn = (region.rg_end - 1) / PAGING_PAGESZ;
        for pgn in first_pgn..=last_pgn {
            pg_getpage(&mut self.pgd, &mut self.fifo_pgn, ram, &mut *swap, pgn)?;
        }
        Ok(region.rg_start)
    }

    /// `FREE(rgid)`: releases a named region back to VMA 0's free list.
    /// Grounds `__free`.
    pub fn free(&mut self, rgid: u32) -> Result<()> {
        let region = self.get_symrg_byid(rgid)?;
        self.symrgtbl[rgid as usize] = None;
        let vma = self.get_vma_mut(0).ok_or(Error::InvalidRegion(0))?;
        vma.enlist_free_region(region);
        Ok(())
    }
}

fn align_up(size: u32, align: u32) -> u32 {
    (size + align - 1) / align * align
}
