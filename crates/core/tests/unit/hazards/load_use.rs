//! Load-use ordering through the load/store pipe.

use pwrsim_core::isa::asm;

use crate::common::harness::{TestBed, DATA_BASE};

#[test]
fn store_then_load_same_address() {
    let mut bed = TestBed::new(&[
        asm::std(3, 10, 0),
        asm::ld(4, 10, 0),
        asm::add(5, 4, 4),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 0x1122_3344_5566_7788);
    bed.set_gpr(10, DATA_BASE);
    bed.run();
    assert_eq!(bed.gpr(4), 0x1122_3344_5566_7788);
    assert_eq!(bed.gpr(5), 0x2244_6688_aacc_ef10);
}

#[test]
fn narrow_reads_of_a_wide_store() {
    let mut bed = TestBed::new(&[
        asm::stw(3, 10, 0),
        asm::lhz(4, 10, 0),
        asm::lha(5, 10, 0),
        asm::lbz(6, 10, 1),
        asm::b_rel(0),
    ]);
    bed.set_gpr(3, 0xabcd_8765);
    bed.set_gpr(10, DATA_BASE);
    bed.run();
    assert_eq!(bed.gpr(4), 0x8765);
    assert_eq!(bed.gpr(5), 0xffff_ffff_ffff_8765);
    assert_eq!(bed.gpr(6), 0x87);
}

#[test]
fn loads_in_flight_back_to_back() {
    let mut bed = TestBed::new(&[
        asm::ld(3, 10, 0),
        asm::ld(4, 10, 8),
        asm::ld(5, 10, 16),
        asm::add(6, 3, 4),
        asm::add(6, 6, 5),
        asm::b_rel(0),
    ]);
    bed.set_gpr(10, DATA_BASE);
    bed.write_mem_u64(DATA_BASE, 1);
    bed.write_mem_u64(DATA_BASE + 8, 2);
    bed.write_mem_u64(DATA_BASE + 16, 3);
    bed.run();
    assert_eq!(bed.gpr(6), 6);
}
