//! Synchronous faults: precise reporting through SRR0/SRR1, DAR/DSISR,
//! and suppression of younger work.

use pwrsim_core::common::constants::{
    DSISR_STORE, MSR_DR, MSR_EE, MSR_FP, MSR_IR, MSR_PR, SRR1_PROG_ILLEGAL, SRR1_PROG_PRIV,
    VEC_DSI, VEC_FP_UNAVAIL, VEC_ISI, VEC_PROGRAM, VEC_SYSCALL,
};
use pwrsim_core::isa::asm;
use pwrsim_core::isa::sprs::{SPR_LR, SPR_SRR0, SPR_XER};

use crate::common::harness::{TestBed, PROG_BASE};

#[test]
fn undecodable_word_is_illegal() {
    let mut bed = TestBed::new(&[0x0000_0000, asm::addi(4, 0, 99)]).trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_PROGRAM);
    assert_eq!(bed.srr0(), PROG_BASE);
    assert_ne!(bed.srr1() & SRR1_PROG_ILLEGAL, 0);
    assert_eq!(bed.gpr(4), 0, "younger work squashed");
}

#[test]
fn interrupt_entry_clears_the_masked_msr_bits() {
    let mut bed = TestBed::new(&[0x0000_0000]).trap_vectors();
    bed.sim.core.cpu.ctrl.msr |= MSR_EE | MSR_IR | MSR_DR;
    bed.run();
    let cleared = MSR_EE | MSR_PR | MSR_IR | MSR_DR;
    assert_eq!(bed.msr() & cleared, 0);
    assert_ne!(bed.srr1() & MSR_EE, 0, "saved state keeps the old bits");
}

#[test]
fn system_call_saves_the_next_address() {
    let mut bed = TestBed::new(&[
        asm::addi(3, 0, 1),
        asm::sc(),
        asm::addi(3, 0, 99),
        asm::b_rel(0),
    ])
    .trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_SYSCALL);
    assert_eq!(bed.srr0(), PROG_BASE + 8, "return lands past the sc");
    assert_eq!(bed.gpr(3), 1);
}

#[test]
fn privileged_spr_access_in_problem_state() {
    let mut bed = TestBed::new(&[asm::mfspr(3, SPR_SRR0), asm::b_rel(0)]).trap_vectors();
    bed.sim.core.cpu.ctrl.msr |= MSR_PR;
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_PROGRAM);
    assert_ne!(bed.srr1() & SRR1_PROG_PRIV, 0);
    assert_eq!(bed.msr() & MSR_PR, 0, "handler runs privileged");
}

#[test]
fn problem_state_may_use_the_unprivileged_sprs() {
    let mut bed = TestBed::new(&[
        asm::mtspr(SPR_LR, 3),
        asm::mfspr(4, SPR_LR),
        asm::mfspr(5, SPR_XER),
        asm::b_rel(0),
    ])
    .trap_vectors();
    bed.sim.core.cpu.ctrl.msr |= MSR_PR;
    bed.set_gpr(3, 0x1234);
    bed.run();
    assert_eq!(bed.trap_mark(), 0);
    assert_eq!(bed.gpr(4), 0x1234);
}

#[test]
fn privileged_instruction_in_problem_state() {
    let mut bed = TestBed::new(&[asm::rfid(), asm::b_rel(0)]).trap_vectors();
    bed.sim.core.cpu.ctrl.msr |= MSR_PR;
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_PROGRAM);
    assert_ne!(bed.srr1() & SRR1_PROG_PRIV, 0);
}

#[test]
fn fp_unavailable_when_msr_fp_clear() {
    let mut bed = TestBed::new(&[asm::fadd(1, 2, 3), asm::b_rel(0)]).trap_vectors();
    bed.sim.core.cpu.ctrl.msr &= !MSR_FP;
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_FP_UNAVAIL);
    assert_eq!(bed.srr0(), PROG_BASE);
}

#[test]
fn fp_load_also_needs_msr_fp() {
    let mut bed = TestBed::new(&[asm::lfd(1, 10, 0), asm::b_rel(0)]).trap_vectors();
    bed.sim.core.cpu.ctrl.msr &= !MSR_FP;
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_FP_UNAVAIL);
}

#[test]
fn fetch_outside_memory_is_an_isi() {
    let mut bed = TestBed::new(&[asm::b_abs(0x10_0000)]).trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_ISI);
    assert_eq!(bed.srr0(), 0x10_0000, "the unfetchable address itself");
}

#[test]
fn store_fault_reports_the_store_bit() {
    let mut bed = TestBed::new(&[asm::std(3, 10, 0), asm::b_rel(0)]).trap_vectors();
    bed.set_gpr(10, 0x20_0000);
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_DSI);
    assert_eq!(bed.dar(), 0x20_0000);
    assert_eq!(u64::from(bed.dsisr()), DSISR_STORE);
}

/// Two faulting instructions in a row: only the older one is reported.
#[test]
fn oldest_fault_wins() {
    let mut bed = TestBed::new(&[asm::sc(), 0x0000_0000]).trap_vectors();
    bed.run();
    assert_eq!(bed.trap_mark(), VEC_SYSCALL);
    assert_eq!(bed.srr0(), PROG_BASE + 4);
}
