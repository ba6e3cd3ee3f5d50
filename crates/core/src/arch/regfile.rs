//! The unified register file.
//!
//! General-purpose and floating-point registers share one 64-entry array so
//! that hazard tracking and writeback can treat every destination as a single
//! [`RegIdx`] namespace. Entries 0..32 are the GPRs, 32..64 the FPRs.

use crate::common::{RegIdx, REG_FILE_SIZE};

/// Sixty-four 64-bit registers addressed by [`RegIdx`].
#[derive(Debug, Clone)]
pub struct RegFile {
    regs: [u64; REG_FILE_SIZE],
}

impl Default for RegFile {
    fn default() -> Self {
        Self {
            regs: [0; REG_FILE_SIZE],
        }
    }
}

impl RegFile {
    pub fn read(&self, idx: RegIdx) -> u64 {
        self.regs[idx.index()]
    }

    pub fn write(&mut self, idx: RegIdx, value: u64) {
        self.regs[idx.index()] = value;
    }

    /// Reads GPR `n` (0..32).
    pub fn read_gpr(&self, n: u32) -> u64 {
        self.read(RegIdx::gpr(n))
    }

    /// Writes GPR `n` (0..32).
    pub fn write_gpr(&mut self, n: u32, value: u64) {
        self.write(RegIdx::gpr(n), value);
    }

    /// Reads FPR `n` (0..32) as its raw bit pattern.
    pub fn read_fpr(&self, n: u32) -> u64 {
        self.read(RegIdx::fpr(n))
    }

    /// Writes FPR `n` (0..32) from a raw bit pattern.
    pub fn write_fpr(&mut self, n: u32, value: u64) {
        self.write(RegIdx::fpr(n), value);
    }
}
