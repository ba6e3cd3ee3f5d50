//! Load/store widths, extension, and byte-reversed forms.

use pretty_assertions::assert_eq;
use pwrsim_core::isa::asm;

use crate::common::harness::{TestBed, DATA_BASE};

#[test]
fn load_widths_and_extension() {
    let mut bed = TestBed::new(&[
        asm::lbz(3, 10, 0),
        asm::lhz(4, 10, 0),
        asm::lha(5, 10, 0),
        asm::lwz(6, 10, 0),
        asm::lwa(7, 10, 0),
        asm::ld(8, 10, 0),
        asm::b_rel(0),
    ]);
    bed.set_gpr(10, DATA_BASE);
    bed.write_mem_u64(DATA_BASE, 0x8899_aabb_ccdd_eeff);
    bed.run();
    assert_eq!(bed.gpr(3), 0xff);
    assert_eq!(bed.gpr(4), 0xeeff);
    assert_eq!(bed.gpr(5), 0xffff_ffff_ffff_eeff);
    assert_eq!(bed.gpr(6), 0xccdd_eeff);
    assert_eq!(bed.gpr(7), 0xffff_ffff_ccdd_eeff);
    assert_eq!(bed.gpr(8), 0x8899_aabb_ccdd_eeff);
}

#[test]
fn store_widths() {
    let mut bed = TestBed::new(&[
        asm::std(3, 10, 0),
        asm::stw(4, 10, 8),
        asm::sth(4, 10, 12),
        asm::stb(4, 10, 14),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 0x0102_0304_0506_0708);
    bed.set_gpr(4, 0xdead_beef);
    bed.set_gpr(10, DATA_BASE);
    bed.run();
    assert_eq!(bed.read_mem_u64(DATA_BASE), 0x0102_0304_0506_0708);
    assert_eq!(
        bed.read_mem_u64(DATA_BASE + 8),
        0x00ef_beef_dead_beef,
        "word, then halfword, then byte laid down in order"
    );
}

#[test]
fn byte_reversed_loads() {
    let mut bed = TestBed::new(&[
        asm::lwbrx(3, 10, 11),
        asm::ldbrx(4, 10, 11),
        asm::b_rel(0),
    ]);
    bed.set_gpr(10, DATA_BASE);
    bed.set_gpr(11, 0);
    bed.write_mem_u64(DATA_BASE, 0x1122_3344_5566_7788);
    bed.run();
    assert_eq!(bed.gpr(3), 0x8877_6655);
    assert_eq!(bed.gpr(4), 0x8877_6655_4433_2211);
}

#[test]
fn negative_displacement() {
    let mut bed = TestBed::new(&[asm::ld(3, 10, -8), asm::b_rel(0)]);
    bed.set_gpr(10, DATA_BASE + 8);
    bed.write_mem_u64(DATA_BASE, 321);
    bed.run();
    assert_eq!(bed.gpr(3), 321);
}

#[test]
fn indexed_ea_is_base_plus_offset_register() {
    let mut bed = TestBed::new(&[asm::lwbrx(3, 10, 11), asm::b_rel(0)]);
    bed.set_gpr(10, DATA_BASE);
    bed.set_gpr(11, 16);
    bed.write_mem_u64(DATA_BASE + 16, 0x0a0b_0c0d);
    bed.run();
    assert_eq!(bed.gpr(3), 0x0d0c_0b0a);
}
