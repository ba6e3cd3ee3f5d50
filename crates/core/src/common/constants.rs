//! Architectural constants: MSR bits, interrupt vectors, SRR1 cause bits,
//! and fetch geometry.

/// MSR: 64-bit mode.
pub const MSR_SF: u64 = 1 << 63;
/// MSR: external interrupts enabled.
pub const MSR_EE: u64 = 1 << 15;
/// MSR: problem state (user mode) when set.
pub const MSR_PR: u64 = 1 << 14;
/// MSR: floating-point unit available.
pub const MSR_FP: u64 = 1 << 13;
/// MSR: floating-point exception mode 0 (enabled exceptions trap).
pub const MSR_FE0: u64 = 1 << 11;
/// MSR: instruction address translation enabled.
pub const MSR_IR: u64 = 1 << 5;
/// MSR: data address translation enabled.
pub const MSR_DR: u64 = 1 << 4;
/// MSR: little-endian mode.
pub const MSR_LE: u64 = 1 << 0;

/// MSR value at reset: 64-bit, supervisor, translation off, FP on.
pub const MSR_RESET: u64 = MSR_SF | MSR_FP | MSR_LE;

/// MSR bits cleared on interrupt entry.
pub const MSR_INTR_CLEAR: u64 = MSR_EE | MSR_PR | MSR_IR | MSR_DR | MSR_FE0;

/// Interrupt vector: data storage (translation/protection fault on a
/// load or store).
pub const VEC_DSI: u64 = 0x300;
/// Interrupt vector: data segment fault.
pub const VEC_DSEG: u64 = 0x380;
/// Interrupt vector: instruction storage (fetch fault).
pub const VEC_ISI: u64 = 0x400;
/// Interrupt vector: external interrupt.
pub const VEC_EXTERNAL: u64 = 0x500;
/// Interrupt vector: alignment.
pub const VEC_ALIGN: u64 = 0x600;
/// Interrupt vector: program (illegal instruction, privilege violation,
/// trap, enabled FP exception).
pub const VEC_PROGRAM: u64 = 0x700;
/// Interrupt vector: floating-point unavailable.
pub const VEC_FP_UNAVAIL: u64 = 0x800;
/// Interrupt vector: decrementer.
pub const VEC_DEC: u64 = 0x900;
/// Interrupt vector: system call.
pub const VEC_SYSCALL: u64 = 0xC00;
/// Interrupt vector: performance monitor.
pub const VEC_PMU: u64 = 0xF00;

/// SRR1 cause bit: illegal instruction (program interrupt).
pub const SRR1_PROG_ILLEGAL: u64 = 0x0008_0000;
/// SRR1 cause bit: privilege violation (program interrupt).
pub const SRR1_PROG_PRIV: u64 = 0x0004_0000;
/// SRR1 cause bit: trap instruction (program interrupt).
pub const SRR1_PROG_TRAP: u64 = 0x0002_0000;
/// SRR1 cause bit: enabled floating-point exception (program interrupt).
pub const SRR1_PROG_FP: u64 = 0x0010_0000;
/// SRR1 cause bit: prefixed instruction crossed a fetch-block boundary
/// (alignment interrupt).
pub const SRR1_PREFIX_CROSS: u64 = 0x0020_0000;

/// DSISR bit: the faulting access was a store.
pub const DSISR_STORE: u64 = 0x0200_0000;
/// DSISR bit: no translation found for the address.
pub const DSISR_NOT_MAPPED: u64 = 0x4000_0000;
/// DSISR bit: protection violation.
pub const DSISR_PROTECTION: u64 = 0x0800_0000;
/// DSISR bit: bad page-table entry.
pub const DSISR_BAD_PTE: u64 = 0x0001_0000;
/// DSISR bit: reference/change update required.
pub const DSISR_REF_CHANGE: u64 = 0x0040_0000;
/// DSISR bit: cache paradox (atomic access to cache-inhibited storage).
pub const DSISR_CI_PARADOX: u64 = 0x0400_0000;

/// Bytes per instruction word.
pub const INSN_BYTES: u64 = 4;

/// Fetch block size in bytes. A prefixed (two-word) instruction must not
/// straddle a block boundary.
pub const FETCH_BLOCK_BYTES: u64 = 64;

/// Processor version register value reported by `mfspr PVR`.
pub const PVR_VALUE: u64 = 0x00A5_0001;
