//! Interrupt and error definitions.
//!
//! This module defines the fault taxonomy for the core. It provides:
//! 1. **Interrupt Representation:** every synchronous fault and asynchronous
//!    interrupt converges on [`Interrupt`], consumed uniformly by Writeback.
//! 2. **Collaborator Errors:** MMU translation and data-cache error classes.
//! 3. **Simulator Errors:** host-facing failures reported through [`SimError`].

use std::fmt;

use super::constants::{
    DSISR_STORE, SRR1_PREFIX_CROSS, SRR1_PROG_FP, SRR1_PROG_ILLEGAL, SRR1_PROG_PRIV,
    SRR1_PROG_TRAP, VEC_ALIGN, VEC_DEC, VEC_DSEG, VEC_DSI, VEC_EXTERNAL, VEC_FP_UNAVAIL, VEC_ISI,
    VEC_PMU, VEC_PROGRAM, VEC_SYSCALL,
};

/// Cause of a program interrupt (vector 0x700).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramCause {
    /// Undecodable or reserved instruction encoding.
    Illegal,
    /// Privileged operation attempted in problem state.
    Privileged,
    /// Trap instruction condition met.
    Trap,
    /// Enabled floating-point exception.
    FpException,
}

/// An interrupt request carried through the pipeline.
///
/// Detected anywhere (Decode1 through Loadstore1, or sampled asynchronously
/// in Execute1), converted to architectural effect only at commit so that
/// exception precision is preserved.
#[derive(Clone, Debug, PartialEq)]
pub enum Interrupt {
    /// Instruction fetch fault. The faulting address is the instruction's own.
    InstructionStorage,
    /// Data storage fault on a load or store.
    DataStorage {
        /// Faulting effective address, written to DAR.
        addr: u64,
        /// Cause bits, written to DSISR.
        dsisr: u64,
    },
    /// Data segment fault on a load or store.
    DataSegment {
        /// Faulting effective address, written to DAR.
        addr: u64,
    },
    /// Misaligned access, or a prefixed instruction straddling a fetch block.
    Alignment {
        /// Faulting effective address, written to DAR.
        addr: u64,
        /// The fault is a prefix straddle, not a data access.
        prefix_cross: bool,
    },
    /// Program interrupt (illegal/privileged/trap/FP exception).
    Program(ProgramCause),
    /// Floating-point unit unavailable (MSR.FP clear).
    FpUnavailable,
    /// External interrupt request (asynchronous).
    External,
    /// Decrementer underflow (asynchronous).
    Decrementer,
    /// Performance monitor interrupt (asynchronous).
    PerformanceMonitor,
    /// System call instruction.
    SystemCall,
}

impl Interrupt {
    /// Vector address Fetch is redirected to when this interrupt is taken.
    pub fn vector(&self) -> u64 {
        match self {
            Self::InstructionStorage => VEC_ISI,
            Self::DataStorage { .. } => VEC_DSI,
            Self::DataSegment { .. } => VEC_DSEG,
            Self::Alignment { .. } => VEC_ALIGN,
            Self::Program(_) => VEC_PROGRAM,
            Self::FpUnavailable => VEC_FP_UNAVAIL,
            Self::External => VEC_EXTERNAL,
            Self::Decrementer => VEC_DEC,
            Self::PerformanceMonitor => VEC_PMU,
            Self::SystemCall => VEC_SYSCALL,
        }
    }

    /// Cause bits ORed into SRR1 on entry.
    pub fn srr1_bits(&self) -> u64 {
        match self {
            Self::Program(ProgramCause::Illegal) => SRR1_PROG_ILLEGAL,
            Self::Program(ProgramCause::Privileged) => SRR1_PROG_PRIV,
            Self::Program(ProgramCause::Trap) => SRR1_PROG_TRAP,
            Self::Program(ProgramCause::FpException) => SRR1_PROG_FP,
            Self::Alignment {
                prefix_cross: true, ..
            } => SRR1_PREFIX_CROSS,
            _ => 0,
        }
    }

    /// Faulting data address, if this interrupt reports one through DAR.
    pub fn dar(&self) -> Option<u64> {
        match self {
            Self::DataStorage { addr, .. }
            | Self::DataSegment { addr }
            | Self::Alignment { addr, .. } => Some(*addr),
            _ => None,
        }
    }

    /// DSISR value, if this interrupt reports one.
    pub fn dsisr(&self) -> Option<u64> {
        match self {
            Self::DataStorage { dsisr, .. } => Some(*dsisr),
            _ => None,
        }
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstructionStorage => write!(f, "instruction storage"),
            Self::DataStorage { addr, dsisr } => {
                write!(f, "data storage at {addr:#x} (dsisr {dsisr:#x})")
            }
            Self::DataSegment { addr } => write!(f, "data segment at {addr:#x}"),
            Self::Alignment { addr, .. } => write!(f, "alignment at {addr:#x}"),
            Self::Program(cause) => write!(f, "program ({cause:?})"),
            Self::FpUnavailable => write!(f, "fp unavailable"),
            Self::External => write!(f, "external"),
            Self::Decrementer => write!(f, "decrementer"),
            Self::PerformanceMonitor => write!(f, "performance monitor"),
            Self::SystemCall => write!(f, "system call"),
        }
    }
}

/// Translation error classes reported by the MMU collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MmuError {
    /// No translation exists for the address.
    Invalid,
    /// Page-table entry is malformed.
    BadPageTable,
    /// Address is outside any mapped segment.
    Segment,
    /// Access permission denied.
    Permission,
    /// Reference/change bit update required and not performed.
    RefChange,
}

impl MmuError {
    /// DSISR cause bits for this error class.
    pub fn dsisr_bits(&self, is_store: bool) -> u64 {
        use super::constants::{DSISR_BAD_PTE, DSISR_NOT_MAPPED, DSISR_PROTECTION, DSISR_REF_CHANGE};
        let cause = match self {
            Self::Invalid | Self::Segment => DSISR_NOT_MAPPED,
            Self::BadPageTable => DSISR_BAD_PTE,
            Self::Permission => DSISR_PROTECTION,
            Self::RefChange => DSISR_REF_CHANGE,
        };
        if is_store { cause | DSISR_STORE } else { cause }
    }
}

/// Error classes reported by the data-cache collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DcacheError {
    /// Physical access fault (address outside backing storage).
    AccessFault,
    /// Cache paradox: atomic-reserve access to cache-inhibited storage.
    Paradox,
}

/// Host-facing simulator errors.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A program or data image does not fit in backing memory.
    #[error("image of {len} bytes at {base:#x} exceeds memory of {mem_size} bytes")]
    ImageOutOfRange {
        /// Load base address.
        base: u64,
        /// Image length in bytes.
        len: usize,
        /// Backing memory size.
        mem_size: usize,
    },
    /// The cycle budget expired before the core halted.
    #[error("cycle limit of {limit} reached without halting")]
    CycleLimit {
        /// The configured limit.
        limit: u64,
    },
    /// Malformed configuration input.
    #[error("bad configuration: {0}")]
    Config(#[from] serde_json::Error),
}
