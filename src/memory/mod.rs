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

//! Physical memory, page table entries, and the paged-page-table logic that ties
//! them together.
//!
//! Three pieces, leaves-first:
//! - [`pmem`]: the flat byte store frames are carved out of.
//! - [`pte`]: the 32-bit page table entry bitfield.
//! - [`page_table`]: `pg_getpage`/`pg_getval`/`pg_setval`, which make a page resident
//!   on demand and translate addresses through it.

pub mod page_table;
pub mod pmem;
pub mod pte;

pub use page_table::{pg_getpage, pg_getval, pg_setval, vm_map_ram};
pub use pmem::{BackingStore, Fpn, FrameStore, PhysMem, SwapDevice};
pub use pte::Pte;
