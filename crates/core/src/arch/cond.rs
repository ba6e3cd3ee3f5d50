//! Condition register and XER flag state.

use crate::common::reg::{cr_bit, cr_field_get, cr_field_set, cr_mask_expand};

/// The 32-bit condition register, eight 4-bit fields with field 0 in the
/// most-significant nibble.
#[derive(Debug, Clone, Copy, Default)]
pub struct CondReg {
    value: u32,
}

impl CondReg {
    pub fn raw(&self) -> u32 {
        self.value
    }

    pub fn set_raw(&mut self, value: u32) {
        self.value = value;
    }

    /// Reads field `bf` (0..8) as its 4-bit value.
    pub fn field(&self, bf: u32) -> u8 {
        cr_field_get(self.value, bf as u8)
    }

    pub fn set_field(&mut self, bf: u32, nibble: u8) {
        self.value = cr_field_set(self.value, bf as u8, nibble);
    }

    /// Reads the single bit named by a `BI` operand (bit 0 = MSB).
    pub fn bit(&self, bi: u32) -> bool {
        cr_bit(self.value, bi as u8)
    }

    /// Merges `value` into the fields selected by the 8-bit `fxm` mask.
    pub fn merge(&mut self, fxm: u32, value: u32) {
        let mask = cr_mask_expand(fxm as u8);
        self.value = (self.value & !mask) | (value & mask);
    }
}

/// XER carry/overflow state, kept unpacked for the ALU's benefit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xer {
    pub so: bool,
    pub ov: bool,
    pub ca: bool,
    pub ov32: bool,
    pub ca32: bool,
}

const XER_SO: u64 = 0x8000_0000;
const XER_OV: u64 = 0x4000_0000;
const XER_CA: u64 = 0x2000_0000;
const XER_OV32: u64 = 0x0008_0000;
const XER_CA32: u64 = 0x0004_0000;

impl Xer {
    /// Packs the flags into the architected SPR layout.
    pub fn to_spr(self) -> u64 {
        let mut v = 0;
        if self.so {
            v |= XER_SO;
        }
        if self.ov {
            v |= XER_OV;
        }
        if self.ca {
            v |= XER_CA;
        }
        if self.ov32 {
            v |= XER_OV32;
        }
        if self.ca32 {
            v |= XER_CA32;
        }
        v
    }

    pub fn from_spr(value: u64) -> Self {
        Self {
            so: value & XER_SO != 0,
            ov: value & XER_OV != 0,
            ca: value & XER_CA != 0,
            ov32: value & XER_OV32 != 0,
            ca32: value & XER_CA32 != 0,
        }
    }

    /// Records an overflow event: OV/OV32 track the event, SO is sticky.
    pub fn set_overflow(&mut self, ov: bool, ov32: bool) {
        self.ov = ov;
        self.ov32 = ov32;
        self.so |= ov;
    }
}
