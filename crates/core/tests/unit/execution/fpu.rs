//! Floating-point unit results and the enabled-exception trap.

use pwrsim_core::common::constants::{MSR_FE0, SRR1_PROG_FP, VEC_PROGRAM};
use pwrsim_core::isa::asm;

use crate::common::harness::{TestBed, DATA_BASE, PROG_BASE};

#[test]
fn arithmetic_results() {
    let mut bed = TestBed::new(&[
        asm::fadd(4, 1, 2),
        asm::fsub(5, 1, 2),
        asm::fmul(6, 1, 2),
        asm::fdiv(7, 1, 2),
        asm::fmadd(8, 1, 2, 3),
        asm::fmr(9, 3),
        asm::b_rel(0),
    ]);
    bed.set_fpr(1, 6.0);
    bed.set_fpr(2, 1.5);
    bed.set_fpr(3, 0.25);
    bed.run();
    assert_eq!(bed.fpr(4), 7.5);
    assert_eq!(bed.fpr(5), 4.5);
    assert_eq!(bed.fpr(6), 9.0);
    assert_eq!(bed.fpr(7), 4.0);
    assert_eq!(bed.fpr(8), 6.0 * 1.5 + 0.25);
    assert_eq!(bed.fpr(9), 0.25);
}

#[test]
fn load_store_round_trip() {
    let mut bed = TestBed::new(&[
        asm::stfd(1, 10, 0),
        asm::lfd(2, 10, 0),
        asm::b_rel(0),
    ]);
    bed.set_fpr(1, -2.5);
    bed.set_gpr(10, DATA_BASE);
    bed.run();
    assert_eq!(bed.fpr(2), -2.5);
    assert_eq!(bed.read_mem_u64(DATA_BASE), (-2.5f64).to_bits());
}

#[test]
fn integer_work_overlaps_fp_latency() {
    let mut bed = TestBed::new(&[
        asm::fmul(4, 1, 2),
        asm::addi(5, 0, 3),
        asm::addi(6, 5, 4),
        asm::b_rel(0),
    ]);
    bed.set_fpr(1, 2.0);
    bed.set_fpr(2, 8.0);
    bed.run();
    assert_eq!(bed.fpr(4), 16.0);
    assert_eq!(bed.gpr(6), 7);
}

#[test]
fn divide_by_zero_untrapped_gives_infinity() {
    let mut bed = TestBed::new(&[asm::fdiv(4, 1, 2), asm::b_rel(0)]);
    bed.set_fpr(1, 1.0);
    bed.set_fpr(2, 0.0);
    bed.run();
    assert!(bed.fpr(4).is_infinite());
    assert_eq!(bed.sim.core.stats.interrupts, 0);
}

#[test]
fn divide_by_zero_traps_when_enabled() {
    let mut bed = TestBed::new(&[
        asm::addi(3, 0, 1),
        asm::fdiv(4, 1, 2),
        asm::addi(3, 0, 99),
        asm::b_rel(0),
    ])
    .trap_vectors();
    bed.sim.core.cpu.ctrl.msr |= MSR_FE0;
    bed.set_fpr(1, 1.0);
    bed.set_fpr(2, 0.0);
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_PROGRAM);
    assert_eq!(bed.srr0(), PROG_BASE + 4);
    assert_ne!(bed.srr1() & SRR1_PROG_FP, 0);
    assert_eq!(bed.gpr(3), 1, "nothing younger than the fault committed");
}
