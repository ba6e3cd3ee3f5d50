//! Reservation sequences: larx/stcx pairs and their CR0 report.

use pwrsim_core::common::constants::{DSISR_CI_PARADOX, MSR_DR, VEC_ALIGN, VEC_DSI};
use pwrsim_core::common::reg::crbits;
use pwrsim_core::isa::asm;
use pwrsim_core::mem::PageFlags;

use crate::common::harness::{TestBed, DATA_BASE};

#[test]
fn fetch_increment_store_succeeds() {
    let mut bed = TestBed::new(&[
        asm::ldarx(3, 10, 11),
        asm::addi(3, 3, 1),
        asm::stdcx(3, 10, 11),
        asm::b_rel(0),
    ]);
    bed.set_gpr(10, DATA_BASE);
    bed.set_gpr(11, 0);
    bed.write_mem_u64(DATA_BASE, 5);
    bed.run();
    assert_eq!(bed.cr_field(0), crbits::EQ, "conditional store succeeded");
    assert_eq!(bed.read_mem_u64(DATA_BASE), 6);
    assert!(!bed.sim.core.dcache.has_reservation(), "stcx consumes it");
}

#[test]
fn conditional_store_without_reservation_fails() {
    let mut bed = TestBed::new(&[asm::stdcx(3, 10, 11), asm::b_rel(0)]);
    bed.set_gpr(3, 99);
    bed.set_gpr(10, DATA_BASE);
    bed.set_gpr(11, 0);
    bed.run();
    assert_eq!(bed.cr_field(0) & crbits::EQ, 0);
    assert_eq!(bed.read_mem_u64(DATA_BASE), 0, "memory untouched");
}

/// The reservation covers a granule, not a single doubleword.
#[test]
fn reservation_granule_spans_nearby_addresses() {
    let mut bed = TestBed::new(&[
        asm::lwarx(3, 10, 11),
        asm::stwcx(4, 10, 12),
        asm::b_rel(0),
    ]);
    bed.set_gpr(4, 7);
    bed.set_gpr(10, DATA_BASE);
    bed.set_gpr(11, 0);
    bed.set_gpr(12, 32);
    bed.run();
    assert_eq!(bed.cr_field(0), crbits::EQ);
    assert_eq!(bed.read_mem_u64(DATA_BASE + 32) as u32, 7);
}

#[test]
fn misaligned_larx_is_an_alignment_fault() {
    let mut bed = TestBed::new(&[asm::ldarx(3, 10, 11), asm::b_rel(0)]).trap_vectors();
    bed.set_gpr(10, DATA_BASE + 4);
    bed.set_gpr(11, 0);
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_ALIGN);
    assert_eq!(bed.dar(), DATA_BASE + 4);
}

/// Reserving through a cache-inhibited mapping is a cache paradox and
/// reports as a data-storage fault.
#[test]
fn larx_on_cache_inhibited_page_is_a_paradox() {
    let mut bed = TestBed::new(&[asm::ldarx(3, 10, 11), asm::b_rel(0)]).trap_vectors();
    bed.sim.core.mmu.map(
        0x8000,
        PageFlags {
            paddr: DATA_BASE,
            writable: true,
            ci: true,
            rc_pending: false,
            malformed: false,
        },
    );
    bed.sim.core.cpu.ctrl.msr |= MSR_DR;
    bed.set_gpr(10, 0x8000);
    bed.set_gpr(11, 0);
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_DSI);
    assert_eq!(u64::from(bed.dsisr()), DSISR_CI_PARADOX);
}
