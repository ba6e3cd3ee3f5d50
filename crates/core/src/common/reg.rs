//! Register indexing and condition-register field helpers.
//!
//! The general-purpose and floating-point banks share one 64-entry physical
//! file; a [`RegIdx`] is the 6-bit extended index into it, with the top bit
//! selecting the floating-point bank.

/// Number of entries in the shared GPR/FPR physical file.
pub const REG_FILE_SIZE: usize = 64;

/// 6-bit extended register index. Top bit set selects the FP bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegIdx(u8);

impl RegIdx {
    /// Index for general-purpose register `n` (0..32).
    pub fn gpr(n: u32) -> Self {
        debug_assert!(n < 32);
        Self(n as u8)
    }

    /// Index for floating-point register `n` (0..32).
    pub fn fpr(n: u32) -> Self {
        debug_assert!(n < 32);
        Self(n as u8 | 0x20)
    }

    /// Raw index into the physical file.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// True if this index addresses the floating-point bank.
    pub fn is_fpr(self) -> bool {
        self.0 & 0x20 != 0
    }

    /// Architectural register number within its bank (0..32).
    pub fn arch_num(self) -> u32 {
        u32::from(self.0 & 0x1f)
    }
}

impl std::fmt::Display for RegIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_fpr() {
            write!(f, "f{}", self.arch_num())
        } else {
            write!(f, "r{}", self.arch_num())
        }
    }
}

/// Reads CR field `crf` (0 = most significant nibble) from the 32-bit CR.
pub fn cr_field_get(cr: u32, crf: u8) -> u8 {
    debug_assert!(crf < 8);
    ((cr >> (28 - 4 * u32::from(crf))) & 0xf) as u8
}

/// Returns `cr` with field `crf` replaced by the low nibble of `val`.
pub fn cr_field_set(cr: u32, crf: u8, val: u8) -> u32 {
    debug_assert!(crf < 8);
    let shift = 28 - 4 * u32::from(crf);
    (cr & !(0xf << shift)) | (u32::from(val & 0xf) << shift)
}

/// Reads CR bit `bi` using big-bit-endian numbering (bit 0 is the MSB).
pub fn cr_bit(cr: u32, bi: u8) -> bool {
    debug_assert!(bi < 32);
    (cr >> (31 - u32::from(bi))) & 1 != 0
}

/// Expands an 8-bit nibble-granularity field mask to a 32-bit mask
/// (mask bit 0 covers CR field 0, the most significant nibble).
pub fn cr_mask_expand(mask: u8) -> u32 {
    let mut out = 0u32;
    for field in 0..8 {
        if mask & (0x80 >> field) != 0 {
            out |= 0xf << (28 - 4 * field);
        }
    }
    out
}

/// CR field comparison result bits: LT, GT, EQ (SO is ORed in separately).
pub mod crbits {
    /// Less-than bit within a CR field nibble.
    pub const LT: u8 = 0x8;
    /// Greater-than bit within a CR field nibble.
    pub const GT: u8 = 0x4;
    /// Equal bit within a CR field nibble.
    pub const EQ: u8 = 0x2;
    /// Summary-overflow copy within a CR field nibble.
    pub const SO: u8 = 0x1;
}

/// Builds a CR field nibble from a signed/unsigned comparison of `a` and `b`,
/// ORing in the summary-overflow copy.
pub fn cr_compare(lt: bool, gt: bool, so: bool) -> u8 {
    let mut field = 0;
    if lt {
        field |= crbits::LT;
    } else if gt {
        field |= crbits::GT;
    } else {
        field |= crbits::EQ;
    }
    if so {
        field |= crbits::SO;
    }
    field
}
