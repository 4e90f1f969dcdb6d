//! Property-based tests for the invariants the core claims to hold, independent of
//! any one literal scenario.

use ossim_core::instr::Instruction;
use ossim_core::memory::{PhysMem, Pte};
use ossim_core::mm::vma::{Region, Vma};
use ossim_core::mm::Mm;
use ossim_core::pcb::Pcb;
use ossim_core::sched::Scheduler;
use proptest::collection::vec as pvec;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn pcb(pid: u32, priority: i32) -> Box<Pcb> {
    let swap = Arc::new(Mutex::new(PhysMem::new(4096)));
    Box::new(Pcb::new(
        pid,
        format!("p{pid}"),
        priority,
        Arc::new(Vec::<Instruction>::new()),
        Mm::new(swap),
    ))
}

fn is_canonical(list: &[Region]) -> bool {
    list.windows(2).all(|w| w[0].rg_end < w[1].rg_start) && list.iter().all(|r| r.rg_start < r.rg_end)
}

proptest! {
    /// After any sequence of free-region insertions, the list is sorted,
    /// non-overlapping, and no two adjacent entries touch.
    #[test]
    fn free_list_stays_canonical(
        regions in pvec((0u32..2000, 1u32..50), 1..30)
    ) {
        let mut vma = Vma::new(0, 0);
        for (start, len) in regions {
            let region = Region::new(start, start + len);
            vma.enlist_free_region(region);
            prop_assert!(is_canonical(&vma.free_rg_list));
        }
    }

    /// In RR with a single queue and no additions after the initial batch, repeated
    /// full rounds reproduce the add order every time.
    #[test]
    fn round_robin_preserves_add_order(pids in pvec(1u32..1000, 1..20)) {
        let pids: Vec<u32> = {
            let mut seen = std::collections::HashSet::new();
            pids.into_iter().filter(|p| seen.insert(*p)).collect()
        };
        prop_assume!(!pids.is_empty());

        let mut sched = Scheduler::round_robin();
        for &pid in &pids {
            sched.add(pcb(pid, 0));
        }

        for _ in 0..3 {
            let mut round = Vec::new();
            for _ in 0..pids.len() {
                let picked = sched.pick().unwrap();
                round.push(picked.pid);
                sched.yield_pcb(picked, 0);
            }
            prop_assert_eq!(&round, &pids);
        }
    }

    /// A sequence of allocations followed by frees in the same order restores the
    /// free list to what it was before the allocations (after merges).
    #[test]
    fn alloc_free_round_trip_restores_free_list(
        sizes in pvec(8u32..200, 1..12)
    ) {
        let swap = Arc::new(Mutex::new(PhysMem::new(1 << 20)));
        let mut mm = Mm::new(swap);
        let mut ram = PhysMem::new(1 << 20);

        let mut rgids = Vec::new();
        for (i, &size) in sizes.iter().enumerate() {
            mm.alloc(&mut ram, 0, size, i as u32).unwrap();
            rgids.push(i as u32);
        }
        let vm_end = mm.get_vma_by_num(0).unwrap().vm_end;

        for rgid in rgids.into_iter().rev() {
            mm.free(rgid).unwrap();
        }

        let after = mm.get_vma_by_num(0).unwrap().free_rg_list.clone();
        // Every byte the VMA ever grew into is free again, coalesced into the single
        // run spanning everything it grew to.
        prop_assert!(is_canonical(&after));
        prop_assert_eq!(&after, &vec![Region::new(0, vm_end)]);
    }

    /// Outside a swap critical section, a PTE built by either constructor never
    /// reports both present and swapped.
    #[test]
    fn pte_never_both_present_and_swapped(fpn in 0u32..4096, swp_type in 0u32..20, swp_off in 0u32..(1 << 20)) {
        prop_assert!(Pte::resident(fpn).is_consistent());
        prop_assert!(Pte::swapped_out(swp_type, swp_off).is_consistent());
        prop_assert!(Pte::UNMAPPED.is_consistent());
    }

    /// Every frame physical memory started with is accounted for by exactly one of
    /// {still free, resident in some page, lent to swap} after a sequence of
    /// allocations big enough to force eviction.
    #[test]
    fn frame_conservation_under_eviction(num_pages in 1usize..12) {
        let pagesz = ossim_core::constants::PAGING_PAGESZ;
        let ram_frames = 3u32;
        let swap = Arc::new(Mutex::new(PhysMem::new(32 * pagesz)));
        let mut mm = Mm::new(swap.clone());
        let mut ram = PhysMem::new(ram_frames * pagesz);

        for i in 0..num_pages {
            mm.alloc(&mut ram, 0, pagesz, i as u32).unwrap();
        }

        let resident = mm.pgd.iter().filter(|p| p.present() && !p.swapped()).count();
        let lent_to_swap = mm.pgd.iter().filter(|p| p.swapped()).count();
        let free_in_ram = ram.free_frames() as u32;

        prop_assert_eq!(resident as u32 + free_in_ram, ram_frames);
        prop_assert_eq!(lent_to_swap, num_pages.saturating_sub(ram_frames as usize));
    }

    /// A symbol-table region and a free region never share a byte, for any
    /// interleaving of allocations and frees.
    #[test]
    fn symbol_regions_never_overlap_free_regions(
        ops in pvec((any::<bool>(), 8u32..200, 0u32..12), 1..20)
    ) {
        let swap = Arc::new(Mutex::new(PhysMem::new(1 << 20)));
        let mut mm = Mm::new(swap);
        let mut ram = PhysMem::new(1 << 20);
        let mut live: Vec<u32> = Vec::new();

        for (do_alloc, size, rgid) in ops {
            if do_alloc && !live.contains(&rgid) {
                if mm.alloc(&mut ram, 0, size, rgid).is_ok() {
                    live.push(rgid);
                }
            } else if let Some(pos) = live.iter().position(|&r| r == rgid) {
                mm.free(rgid).unwrap();
                live.swap_remove(pos);
            }

            let vma = mm.get_vma_by_num(0).unwrap();
            for &rgid in &live {
                let rg = mm.get_symrg_byid(rgid).unwrap();
                for free in &vma.free_rg_list {
                    let disjoint = rg.rg_end <= free.rg_start || free.rg_end <= rg.rg_start;
                    prop_assert!(disjoint, "region {:?} overlaps free region {:?}", rg, free);
                }
            }
        }
    }

    /// Two CFS processes with weights in ratio `w1:w2` converge their cumulative
    /// dispatched-tick ratio to that same weight ratio as the number of rounds grows,
    /// with the gap shrinking roughly as `O(1/N)`.
    #[test]
    fn cfs_dispatch_ratio_converges_to_weight_ratio(nice_hi in -20i32..0, rounds in 200u32..400) {
        let mut sched = Scheduler::completely_fair();
        sched.add(pcb(1, nice_hi));
        sched.add(pcb(2, 0));

        let weight_hi = ossim_core::sched::cfs::compute_weight(nice_hi) as f64;
        let weight_lo = ossim_core::sched::cfs::compute_weight(0) as f64;

        let mut ticks = [0u64; 2];
        for _ in 0..rounds {
            let picked = sched.pick().unwrap();
            let idx = if picked.pid == 1 { 0 } else { 1 };
            ticks[idx] += 1;
            sched.yield_pcb(picked, 1_000_000);
        }

        let observed_ratio = ticks[0] as f64 / ticks[1] as f64;
        let expected_ratio = weight_hi / weight_lo;
        // Bound loosens as rounds shrinks: integer tick counts only approximate the
        // continuous weight ratio, and the approximation error is O(1/rounds).
        let tolerance = 4.0 / rounds as f64 + 0.05;
        prop_assert!(
            (observed_ratio - expected_ratio).abs() < expected_ratio * tolerance + tolerance,
            "observed {observed_ratio} vs expected {expected_ratio} (rounds={rounds})"
        );
    }

    /// Over many dispatch cycles with every MLQ level saturated, level `p`'s share of
    /// total dispatches converges to `(max_prio - p) / sum(max_prio - q)`.
    #[test]
    fn mlq_dispatch_share_converges_to_level_slot_weight(max_prio in 2usize..6, cycles in 50u32..150) {
        let mut sched = Scheduler::multi_level_queue(max_prio);
        for level in 0..max_prio {
            for _ in 0..(cycles as usize * max_prio + 10) {
                sched.add(pcb((level * 10_000) as u32 + 1, level as i32));
            }
        }

        let total_dispatches: u32 = (0..max_prio).map(|p| (max_prio - p) as u32).sum();
        let total_picks = total_dispatches * cycles;
        let mut counts = vec![0u32; max_prio];
        for _ in 0..total_picks {
            let picked = sched.pick().unwrap();
            let level = (picked.priority.max(0) as usize).min(max_prio - 1);
            counts[level] += 1;
            sched.yield_pcb(picked, 0);
        }

        for p in 0..max_prio {
            let expected_share = (max_prio - p) as f64 / total_dispatches as f64;
            let observed_share = counts[p] as f64 / total_picks as f64;
            prop_assert!(
                (observed_share - expected_share).abs() < 0.02,
                "level {p}: observed {observed_share} vs expected {expected_share}"
            );
        }
    }
}
