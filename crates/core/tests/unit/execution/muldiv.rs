//! Multiply/divide unit results and latency behavior.

use pwrsim_core::common::reg::crbits;
use pwrsim_core::isa::asm;

use crate::common::harness::TestBed;

#[test]
fn multiply_lows_and_highs() {
    let mut bed = TestBed::new(&[
        asm::mulld(5, 3, 4),
        asm::mulhdu(6, 3, 4),
        asm::mulhd(7, 3, 9),
        asm::mullw(8, 9, 4),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 1 << 60);
    bed.set_gpr(4, 16);
    bed.set_gpr(9, (-2i64) as u64);
    bed.run();
    assert_eq!(bed.gpr(5), 0, "low 64 bits of 2^64");
    assert_eq!(bed.gpr(6), 1, "high 64 bits of 2^64");
    assert_eq!(bed.gpr(7) as i64, -1, "signed high of 2^60 * -2");
    assert_eq!(bed.gpr(8) as i64, -32);
}

#[test]
fn divides_signed_and_unsigned() {
    let mut bed = TestBed::new(&[
        asm::divd(5, 3, 4),
        asm::divdu(6, 3, 4),
        asm::divw(7, 9, 4),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, (-100i64) as u64);
    bed.set_gpr(4, 7);
    bed.set_gpr(9, (-100i32 as u32) as u64);
    bed.run();
    assert_eq!(bed.gpr(5) as i64, -14);
    assert_eq!(bed.gpr(6), ((-100i64) as u64) / 7);
    assert_eq!(bed.gpr(7) as u32 as i32, -14);
}

#[test]
fn divide_by_zero_yields_zero() {
    let mut bed = TestBed::new(&[
        asm::divd(5, 3, 4),
        asm::divwu(6, 3, 4),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 42);
    bed.set_gpr(4, 0);
    bed.run();
    assert_eq!(bed.gpr(5), 0);
    assert_eq!(bed.gpr(6), 0);
}

#[test]
fn record_form_multiply_sets_cr0() {
    let mut bed = TestBed::new(&[
        asm::with_rc(asm::mulld(5, 3, 4)),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 6);
    bed.set_gpr(4, (-7i64) as u64);
    bed.run();
    assert_eq!(bed.gpr(5) as i64, -42);
    assert_eq!(bed.cr_field(0), crbits::LT);
}

/// Independent work behind a divide keeps flowing and still commits in
/// order.
#[test]
fn independent_work_overlaps_a_divide() {
    let mut bed = TestBed::new(&[
        asm::divd(5, 3, 4),
        asm::addi(6, 0, 11),
        asm::addi(7, 6, 1),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 99);
    bed.set_gpr(4, 9);
    bed.run();
    assert_eq!(bed.gpr(5), 11);
    assert_eq!(bed.gpr(6), 11);
    assert_eq!(bed.gpr(7), 12);
}

#[test]
fn back_to_back_multiplies_stall_cleanly() {
    let mut bed = TestBed::new(&[
        asm::mulld(5, 3, 4),
        asm::mulld(6, 5, 4),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 3);
    bed.set_gpr(4, 5);
    bed.run();
    assert_eq!(bed.gpr(5), 15);
    assert_eq!(bed.gpr(6), 75);
}
