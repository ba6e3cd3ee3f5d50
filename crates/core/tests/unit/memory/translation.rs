//! Relocated data accesses through the page map.

use pwrsim_core::common::constants::{
    DSISR_NOT_MAPPED, DSISR_PROTECTION, DSISR_REF_CHANGE, DSISR_STORE, MSR_DR, VEC_DSEG, VEC_DSI,
};
use pwrsim_core::isa::asm;
use pwrsim_core::mem::PageFlags;

use crate::common::harness::{TestBed, DATA_BASE};

fn page(paddr: u64) -> PageFlags {
    PageFlags {
        paddr,
        writable: true,
        ci: false,
        rc_pending: false,
        malformed: false,
    }
}

fn relocated(program: &[u32]) -> TestBed {
    let mut bed = TestBed::new(program).trap_vectors();
    bed.sim.core.cpu.ctrl.msr |= MSR_DR;
    bed
}

#[test]
fn mapped_page_translates() {
    let mut bed = relocated(&[asm::ld(3, 10, 0), asm::std(3, 10, 8), asm::b_rel(0)]);
    bed.sim.core.mmu.map(0x7000, page(DATA_BASE));
    bed.set_gpr(10, 0x7000);
    bed.write_mem_u64(DATA_BASE, 42);
    bed.run();
    assert_eq!(bed.gpr(3), 42);
    assert_eq!(bed.read_mem_u64(DATA_BASE + 8), 42);
    assert_eq!(bed.trap_mark(), 0);
}

#[test]
fn unmapped_page_is_a_dsi() {
    let mut bed = relocated(&[asm::ld(3, 10, 0), asm::b_rel(0)]);
    bed.set_gpr(10, 0x7000);
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_DSI);
    assert_eq!(bed.dar(), 0x7000);
    assert_eq!(u64::from(bed.dsisr()), DSISR_NOT_MAPPED);
}

#[test]
fn store_to_readonly_page_reports_protection() {
    let mut bed = relocated(&[asm::std(3, 10, 0), asm::b_rel(0)]);
    bed.sim.core.mmu.map(
        0x7000,
        PageFlags {
            writable: false,
            ..page(DATA_BASE)
        },
    );
    bed.set_gpr(10, 0x7000);
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_DSI);
    assert_eq!(u64::from(bed.dsisr()), DSISR_PROTECTION | DSISR_STORE);
    assert_eq!(bed.read_mem_u64(DATA_BASE), 0);
}

#[test]
fn address_past_segment_limit_is_a_segment_fault() {
    let mut bed = relocated(&[asm::ld(3, 10, 0), asm::b_rel(0)]);
    bed.set_gpr(10, 1 << 41);
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_DSEG);
    assert_eq!(bed.dar(), 1 << 41);
}

/// A reference/change update faults once; returning with `rfid` retries
/// the access, which then succeeds.
#[test]
fn ref_change_faults_once_then_retries() {
    let mut bed = TestBed::new(&[asm::ld(3, 10, 0), asm::b_rel(0)])
        .with_handler(VEC_DSI, &[asm::addi(30, 30, 1), asm::rfid()]);
    bed.sim.core.cpu.ctrl.msr |= MSR_DR;
    bed.sim.core.mmu.map(
        0x7000,
        PageFlags {
            rc_pending: true,
            ..page(DATA_BASE)
        },
    );
    bed.set_gpr(10, 0x7000);
    bed.write_mem_u64(DATA_BASE, 9);
    bed.run();
    assert_eq!(bed.gpr(3), 9);
    assert_eq!(bed.gpr(30), 1, "exactly one fault");
    assert_eq!(u64::from(bed.dsisr()), DSISR_REF_CHANGE);
}
