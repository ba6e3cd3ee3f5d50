//! SPR routing: RAM-backed registers, control-record registers, the
//! read-only set, and unimplemented numbers.

use pwrsim_core::common::constants::{PVR_VALUE, VEC_PROGRAM};
use pwrsim_core::isa::asm;
use pwrsim_core::isa::sprs::{
    SPR_CFAR, SPR_CTR, SPR_DEC, SPR_LR, SPR_PVR, SPR_SPRG0, SPR_SPRG1, SPR_TB, SPR_XER,
};
use rstest::rstest;

use crate::common::harness::{TestBed, PROG_BASE};

#[rstest]
#[case::lr(SPR_LR)]
#[case::ctr(SPR_CTR)]
#[case::sprg0(SPR_SPRG0)]
#[case::sprg1(SPR_SPRG1)]
fn ram_backed_spr_round_trips(#[case] spr: u32) {
    let mut bed = TestBed::new(&[
        asm::mtspr(spr, 3),
        asm::mfspr(4, spr),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 0x1234_5678_9abc);
    bed.run();
    assert_eq!(bed.gpr(4), 0x1234_5678_9abc);
}

#[test]
fn xer_moves_preserve_the_flag_bits() {
    let so_ov_ca = 0x8000_0000u64 | 0x4000_0000 | 0x2000_0000;
    let mut bed = TestBed::new(&[
        asm::mtspr(SPR_XER, 3),
        asm::mfspr(4, SPR_XER),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, so_ov_ca);
    bed.run();
    assert_eq!(bed.gpr(4), so_ov_ca);
    assert!(bed.xer().so);
    assert!(bed.xer().ov);
    assert!(bed.xer().ca);
}

#[test]
fn pvr_reads_the_version_constant() {
    let mut bed = TestBed::new(&[asm::mfspr(3, SPR_PVR), asm::b_rel(0)]);
    bed.run();
    assert_eq!(bed.gpr(3), PVR_VALUE);
}

#[test]
fn writing_a_read_only_spr_is_illegal() {
    let mut bed = TestBed::new(&[asm::mtspr(SPR_PVR, 3), asm::b_rel(0)]).trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_PROGRAM);
}

#[test]
fn timebase_increments_between_reads() {
    let mut bed = TestBed::new(&[
        asm::mfspr(3, SPR_TB),
        asm::addi(2, 2, 1),
        asm::addi(2, 2, 1),
        asm::mfspr(4, SPR_TB),
        asm::b_rel(0),
    ]);
    bed.run();
    assert!(bed.gpr(4) > bed.gpr(3));
}

#[test]
fn unimplemented_spr_number_is_illegal() {
    let mut bed = TestBed::new(&[asm::mfspr(3, 999), asm::b_rel(0)]).trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_PROGRAM);
}

#[test]
fn cfar_holds_the_last_taken_branch_address() {
    let mut bed = TestBed::new(&[
        asm::b_rel(8),
        asm::addi(4, 0, 99),
        asm::mfspr(3, SPR_CFAR),
        asm::b_rel(0),
    ]);
    bed.run();
    assert_eq!(bed.gpr(3), PROG_BASE);
    assert_eq!(bed.gpr(4), 0);
}

#[test]
fn decrementer_is_readable_and_counting() {
    let mut bed = TestBed::new(&[asm::mfspr(3, SPR_DEC), asm::b_rel(0)]);
    bed.sim.core.cpu.ctrl.dec = 1000;
    bed.run();
    let read = bed.gpr(3);
    assert!(read < 1000 && read > 900, "read {read} expected just below 1000");
}
