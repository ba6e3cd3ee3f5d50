//! Bit-field extraction from 32-bit instruction words.
//!
//! Field names follow the usual conventions for this encoding family:
//! `major` in bits 26..32, register fields RT/RA/RB descending from bit 21,
//! a 10-bit extended opcode in bits 1..11, and the record bit at bit 0.

/// Major opcode, bits 26..32.
pub fn major(word: u32) -> u32 {
    word >> 26
}

/// RT/RS/BO field, bits 21..26.
pub fn rt(word: u32) -> u32 {
    (word >> 21) & 0x1f
}

/// RA/BI field, bits 16..21.
pub fn ra(word: u32) -> u32 {
    (word >> 16) & 0x1f
}

/// RB field, bits 11..16.
pub fn rb(word: u32) -> u32 {
    (word >> 11) & 0x1f
}

/// FRC field (A-form), bits 6..11.
pub fn frc(word: u32) -> u32 {
    (word >> 6) & 0x1f
}

/// 10-bit extended opcode, bits 1..11.
pub fn xo10(word: u32) -> u32 {
    (word >> 1) & 0x3ff
}

/// 5-bit extended opcode (A-form), bits 1..6.
pub fn xo5(word: u32) -> u32 {
    (word >> 1) & 0x1f
}

/// Record bit.
pub fn rc(word: u32) -> bool {
    word & 1 != 0
}

/// Sign-extended 16-bit D-form immediate.
pub fn d16(word: u32) -> i64 {
    i64::from(word as u16 as i16)
}

/// Sign-extended DS-form immediate (low two bits are the sub-opcode).
pub fn ds14(word: u32) -> i64 {
    i64::from((word & 0xfffc) as u16 as i16)
}

/// DS-form sub-opcode, bits 0..2.
pub fn ds_sub(word: u32) -> u32 {
    word & 3
}

/// Sign-extended DQ-form immediate (low four bits reserved).
pub fn dq12(word: u32) -> i64 {
    i64::from((word & 0xfff0) as u16 as i16)
}

/// Sign-extended 26-bit branch displacement (I-form), low two bits zero.
pub fn li26(word: u32) -> i64 {
    let raw = word & 0x03ff_fffc;
    ((raw << 6) as i32 >> 6) as i64
}

/// Sign-extended 16-bit branch displacement (B-form), low two bits zero.
pub fn bd16(word: u32) -> i64 {
    i64::from((word & 0xfffc) as u16 as i16)
}

/// Absolute-address bit for branches.
pub fn aa(word: u32) -> bool {
    word & 2 != 0
}

/// Link bit for branches.
pub fn lk(word: u32) -> bool {
    word & 1 != 0
}

/// BO field of a conditional branch (same bits as RT).
pub fn bo(word: u32) -> u32 {
    rt(word)
}

/// BI field of a conditional branch (same bits as RA).
pub fn bi(word: u32) -> u32 {
    ra(word)
}

/// BF/CRF destination field for compares, bits 23..26.
pub fn crfd(word: u32) -> u32 {
    (word >> 23) & 0x7
}

/// Width bit for compares: 0 selects 32-bit comparison.
pub fn cmp_l(word: u32) -> bool {
    (word >> 21) & 1 != 0
}

/// SPR number, bits 11..21.
pub fn spr(word: u32) -> u32 {
    (word >> 11) & 0x3ff
}

/// FXM field-mask for `mtcrf`, bits 12..20.
pub fn fxm(word: u32) -> u32 {
    (word >> 12) & 0xff
}

/// Prefix word: 18-bit immediate extension, bits 0..18.
pub fn prefix_imm18(word: u32) -> u32 {
    word & 0x3_ffff
}

/// Prefix word: subtype, bits 24..26 (0 = modify-load-store immediate form).
pub fn prefix_subtype(word: u32) -> u32 {
    (word >> 24) & 0x3
}

/// Combines a prefix immediate extension with a suffix D-form immediate
/// into a sign-extended 34-bit value.
pub fn prefixed_imm(prefix: u32, suffix: u32) -> i64 {
    let raw = (u64::from(prefix_imm18(prefix)) << 16) | u64::from(suffix & 0xffff);
    ((raw << 30) as i64) >> 30
}

/// Prefixed-immediate combination for DS-form suffixes, whose low two bits
/// carry the sub-opcode rather than immediate bits.
pub fn prefixed_imm_ds(prefix: u32, suffix: u32) -> i64 {
    let raw = (u64::from(prefix_imm18(prefix)) << 16) | u64::from(suffix & 0xfffc);
    ((raw << 30) as i64) >> 30
}
