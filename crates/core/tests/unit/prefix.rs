//! Prefixed (8-byte) instructions: wide immediates, fetch-block
//! straddle, and malformed pairs.

use pwrsim_core::common::constants::{SRR1_PREFIX_CROSS, VEC_ALIGN, VEC_PROGRAM};
use pwrsim_core::isa::asm;

use crate::common::harness::{TestBed, DATA_BASE, PROG_BASE};

fn flatten(program: &[&[u32]]) -> Vec<u32> {
    program.iter().flat_map(|p| p.iter().copied()).collect()
}

#[test]
fn paddi_carries_a_34_bit_immediate() {
    let program = flatten(&[
        &asm::paddi(3, 0, 0xabcd_1234),
        &asm::paddi(4, 0, -5),
        &[asm::b_rel(0)],
    ]);
    let mut bed = TestBed::new(&program);
    bed.run();
    assert_eq!(bed.gpr(3), 0xabcd_1234);
    assert_eq!(bed.gpr(4) as i64, -5);
}

#[test]
fn paddi_adds_to_a_base_register() {
    let program = flatten(&[&asm::paddi(3, 10, 0x2_0000), &[asm::b_rel(0)]]);
    let mut bed = TestBed::new(&program);
    bed.set_gpr(10, 0x100);
    bed.run();
    assert_eq!(bed.gpr(3), 0x2_0100);
}

#[test]
fn prefixed_load_and_store_reach_wide_displacements() {
    let program = flatten(&[
        &asm::pstd(3, 0, DATA_BASE as i64),
        &asm::plwz(4, 0, DATA_BASE as i64),
        &[asm::b_rel(0)],
    ]);
    let mut bed = TestBed::new(&program);
    bed.set_gpr(3, 0xcafe_babe);
    bed.run();
    assert_eq!(bed.read_mem_u64(DATA_BASE), 0xcafe_babe);
    assert_eq!(bed.gpr(4), 0xcafe_babe);
}

#[test]
fn sequential_flow_resumes_after_an_8_byte_instruction() {
    let program = flatten(&[
        &asm::paddi(3, 0, 7),
        &[asm::addi(4, 3, 1), asm::b_rel(0)],
    ]);
    let mut bed = TestBed::new(&program);
    bed.run();
    assert_eq!(bed.gpr(4), 8);
    assert_eq!(bed.sim.core.stats.instructions, 3, "pair retires once");
}

#[test]
fn prefix_at_the_end_of_a_fetch_block_faults() {
    // Fifteen filler words put the prefix at block offset 60.
    let mut program: Vec<u32> = (0..15).map(|_| asm::addi(9, 9, 1)).collect();
    program.extend(asm::paddi(3, 0, 7));
    program.push(asm::b_rel(0));
    let mut bed = TestBed::new(&program).trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_ALIGN);
    assert_eq!(bed.srr0(), PROG_BASE + 60);
    assert_eq!(bed.dar(), PROG_BASE + 60);
    assert_ne!(bed.srr1() & SRR1_PREFIX_CROSS, 0);
    assert_eq!(bed.gpr(9), 15, "everything older still committed");
}

#[test]
fn prefix_followed_by_a_prefix_is_illegal() {
    let program = [asm::mls_prefix(0), asm::mls_prefix(0), asm::b_rel(0)];
    let mut bed = TestBed::new(&program).trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_PROGRAM);
    assert_eq!(bed.srr0(), PROG_BASE);
}

#[test]
fn unprefixable_suffix_is_illegal() {
    let program = [asm::mls_prefix(0), asm::b_rel(8), asm::b_rel(0)];
    let mut bed = TestBed::new(&program).trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_PROGRAM);
    assert_eq!(bed.srr0(), PROG_BASE);
}
