//! Instruction word encoders.
//!
//! Test programs are assembled directly from these helpers; there is no
//! external toolchain. Register arguments are architectural numbers within
//! the relevant bank.

fn dform(major: u32, rt: u32, ra: u32, imm: i32) -> u32 {
    major << 26 | rt << 21 | ra << 16 | (imm as u32 & 0xffff)
}

fn xform(rt: u32, ra: u32, rb: u32, xo: u32) -> u32 {
    31 << 26 | rt << 21 | ra << 16 | rb << 11 | xo << 1
}

fn aform(frt: u32, fra: u32, frb: u32, frc: u32, xo: u32) -> u32 {
    63 << 26 | frt << 21 | fra << 16 | frb << 11 | frc << 6 | xo << 1
}

/// Sets the record bit of any X-form encoding.
pub fn with_rc(word: u32) -> u32 {
    word | 1
}

// --- D-form arithmetic/logical ---

/// `addi rt, ra, si` (RA of 0 reads as zero).
pub fn addi(rt: u32, ra: u32, si: i32) -> u32 {
    dform(14, rt, ra, si)
}

/// `addis rt, ra, si`.
pub fn addis(rt: u32, ra: u32, si: i32) -> u32 {
    dform(15, rt, ra, si)
}

/// `ori ra, rs, ui`.
pub fn ori(ra: u32, rs: u32, ui: i32) -> u32 {
    dform(24, rs, ra, ui)
}

/// `andi. ra, rs, ui` (always sets CR0).
pub fn andi_rc(ra: u32, rs: u32, ui: i32) -> u32 {
    dform(28, rs, ra, ui)
}

/// `cmpi bf, l, ra, si`.
pub fn cmpi(bf: u32, l: bool, ra: u32, si: i32) -> u32 {
    dform(11, bf << 2 | u32::from(l), ra, si)
}

// --- X-form arithmetic ---

/// `add rt, ra, rb`.
pub fn add(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 266)
}

/// `addc rt, ra, rb` (sets CA).
pub fn addc(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 10)
}

/// `adde rt, ra, rb` (carry-in from CA, sets CA).
pub fn adde(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 138)
}

/// `subf rt, ra, rb` (rb - ra).
pub fn subf(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 40)
}

/// `neg rt, ra`.
pub fn neg(rt: u32, ra: u32) -> u32 {
    xform(rt, ra, 0, 104)
}

/// `cmp bf, l, ra, rb`.
pub fn cmp(bf: u32, l: bool, ra: u32, rb: u32) -> u32 {
    xform(bf << 2 | u32::from(l), ra, rb, 0)
}

/// `cmpl bf, l, ra, rb`.
pub fn cmpl(bf: u32, l: bool, ra: u32, rb: u32) -> u32 {
    xform(bf << 2 | u32::from(l), ra, rb, 32)
}

/// `and ra, rs, rb`.
pub fn and(ra: u32, rs: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 28)
}

/// `or ra, rs, rb`.
pub fn or(ra: u32, rs: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 444)
}

/// `xor ra, rs, rb`.
pub fn xor(ra: u32, rs: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 316)
}

/// `nand ra, rs, rb`.
pub fn nand(ra: u32, rs: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 476)
}

/// `sld ra, rs, rb`.
pub fn sld(ra: u32, rs: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 27)
}

/// `srd ra, rs, rb`.
pub fn srd(ra: u32, rs: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 539)
}

/// `srad ra, rs, rb`.
pub fn srad(ra: u32, rs: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 794)
}

/// `extsw ra, rs`.
pub fn extsw(ra: u32, rs: u32) -> u32 {
    xform(rs, ra, 0, 986)
}

// --- Multiply/divide ---

/// `mulld rt, ra, rb`.
pub fn mulld(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 233)
}

/// `mullw rt, ra, rb`.
pub fn mullw(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 235)
}

/// `mulhd rt, ra, rb`.
pub fn mulhd(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 73)
}

/// `mulhdu rt, ra, rb`.
pub fn mulhdu(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 9)
}

/// `divd rt, ra, rb`.
pub fn divd(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 489)
}

/// `divdu rt, ra, rb`.
pub fn divdu(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 457)
}

/// `divw rt, ra, rb`.
pub fn divw(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 491)
}

/// `divwu rt, ra, rb`.
pub fn divwu(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 459)
}

// --- SPR/CR moves ---

/// `mfspr rt, spr`.
pub fn mfspr(rt: u32, spr: u32) -> u32 {
    31 << 26 | rt << 21 | (spr & 0x3ff) << 11 | 339 << 1
}

/// `mtspr spr, rs`.
pub fn mtspr(spr: u32, rs: u32) -> u32 {
    31 << 26 | rs << 21 | (spr & 0x3ff) << 11 | 467 << 1
}

/// `mfcr rt`.
pub fn mfcr(rt: u32) -> u32 {
    xform(rt, 0, 0, 19)
}

/// `mtcrf fxm, rs`.
pub fn mtcrf(fxm: u32, rs: u32) -> u32 {
    31 << 26 | rs << 21 | (fxm & 0xff) << 12 | 144 << 1
}

// --- Loads ---

/// `lwz rt, d(ra)`.
pub fn lwz(rt: u32, ra: u32, d: i32) -> u32 {
    dform(32, rt, ra, d)
}

/// `lwzu rt, d(ra)` (cracked update form).
pub fn lwzu(rt: u32, ra: u32, d: i32) -> u32 {
    dform(33, rt, ra, d)
}

/// `lbz rt, d(ra)`.
pub fn lbz(rt: u32, ra: u32, d: i32) -> u32 {
    dform(34, rt, ra, d)
}

/// `lhz rt, d(ra)`.
pub fn lhz(rt: u32, ra: u32, d: i32) -> u32 {
    dform(40, rt, ra, d)
}

/// `lha rt, d(ra)`.
pub fn lha(rt: u32, ra: u32, d: i32) -> u32 {
    dform(42, rt, ra, d)
}

/// `ld rt, ds(ra)`.
pub fn ld(rt: u32, ra: u32, ds: i32) -> u32 {
    dform(58, rt, ra, ds & !3)
}

/// `ldu rt, ds(ra)` (cracked update form).
pub fn ldu(rt: u32, ra: u32, ds: i32) -> u32 {
    dform(58, rt, ra, ds & !3) | 1
}

/// `lwa rt, ds(ra)`.
pub fn lwa(rt: u32, ra: u32, ds: i32) -> u32 {
    dform(58, rt, ra, ds & !3) | 2
}

/// `lq rt, dq(ra)` (cracked quadword pair).
pub fn lq(rt: u32, ra: u32, dq: i32) -> u32 {
    dform(56, rt, ra, dq & !0xf)
}

/// `lfd frt, d(ra)`.
pub fn lfd(frt: u32, ra: u32, d: i32) -> u32 {
    dform(50, frt, ra, d)
}

/// `lwarx rt, ra, rb` (load word reserve).
pub fn lwarx(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 20)
}

/// `ldarx rt, ra, rb` (load doubleword reserve).
pub fn ldarx(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 84)
}

/// `lwbrx rt, ra, rb` (byte-reversed word load).
pub fn lwbrx(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 534)
}

/// `ldbrx rt, ra, rb` (byte-reversed doubleword load).
pub fn ldbrx(rt: u32, ra: u32, rb: u32) -> u32 {
    xform(rt, ra, rb, 532)
}

// --- Stores ---

/// `stw rs, d(ra)`.
pub fn stw(rs: u32, ra: u32, d: i32) -> u32 {
    dform(36, rs, ra, d)
}

/// `stwu rs, d(ra)` (cracked update form).
pub fn stwu(rs: u32, ra: u32, d: i32) -> u32 {
    dform(37, rs, ra, d)
}

/// `stb rs, d(ra)`.
pub fn stb(rs: u32, ra: u32, d: i32) -> u32 {
    dform(38, rs, ra, d)
}

/// `sth rs, d(ra)`.
pub fn sth(rs: u32, ra: u32, d: i32) -> u32 {
    dform(44, rs, ra, d)
}

/// `std rs, ds(ra)`.
pub fn std(rs: u32, ra: u32, ds: i32) -> u32 {
    dform(62, rs, ra, ds & !3)
}

/// `stdu rs, ds(ra)` (cracked update form).
pub fn stdu(rs: u32, ra: u32, ds: i32) -> u32 {
    dform(62, rs, ra, ds & !3) | 1
}

/// `stq rs, dq(ra)` (cracked quadword pair).
pub fn stq(rs: u32, ra: u32, dq: i32) -> u32 {
    dform(62, rs, ra, dq & !0xf) | 2
}

/// `stfd frs, d(ra)`.
pub fn stfd(frs: u32, ra: u32, d: i32) -> u32 {
    dform(54, frs, ra, d)
}

/// `stwcx. rs, ra, rb` (conditional store, sets CR0).
pub fn stwcx(rs: u32, ra: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 150) | 1
}

/// `stdcx. rs, ra, rb` (conditional store, sets CR0).
pub fn stdcx(rs: u32, ra: u32, rb: u32) -> u32 {
    xform(rs, ra, rb, 214) | 1
}

// --- Branches and system ---

/// `b` with a PC-relative displacement in bytes.
pub fn b_rel(off: i32) -> u32 {
    18 << 26 | (off as u32 & 0x03ff_fffc)
}

/// `bl` with a PC-relative displacement in bytes.
pub fn bl_rel(off: i32) -> u32 {
    b_rel(off) | 1
}

/// `ba` to an absolute address.
pub fn b_abs(addr: u32) -> u32 {
    18 << 26 | (addr & 0x03ff_fffc) | 2
}

/// `bc bo, bi, bd` with a PC-relative displacement in bytes.
pub fn bc(bo: u32, bi: u32, bd: i32) -> u32 {
    16 << 26 | bo << 21 | bi << 16 | (bd as u32 & 0xfffc)
}

/// `bclr bo, bi` (branch to LR).
pub fn bclr(bo: u32, bi: u32) -> u32 {
    19 << 26 | bo << 21 | bi << 16 | 16 << 1
}

/// `blr`.
pub fn blr() -> u32 {
    bclr(20, 0)
}

/// `bcctr bo, bi` (branch to CTR).
pub fn bcctr(bo: u32, bi: u32) -> u32 {
    19 << 26 | bo << 21 | bi << 16 | 528 << 1
}

/// `rfid`.
pub fn rfid() -> u32 {
    19 << 26 | 18 << 1
}

/// `isync`.
pub fn isync() -> u32 {
    19 << 26 | 150 << 1
}

/// `sync`.
pub fn sync() -> u32 {
    31 << 26 | 598 << 1
}

/// `sc`.
pub fn sc() -> u32 {
    17 << 26 | 2
}

// --- Floating point ---

/// `fadd frt, fra, frb`.
pub fn fadd(frt: u32, fra: u32, frb: u32) -> u32 {
    aform(frt, fra, frb, 0, 21)
}

/// `fsub frt, fra, frb`.
pub fn fsub(frt: u32, fra: u32, frb: u32) -> u32 {
    aform(frt, fra, frb, 0, 20)
}

/// `fmul frt, fra, frc`.
pub fn fmul(frt: u32, fra: u32, frc: u32) -> u32 {
    aform(frt, fra, 0, frc, 25)
}

/// `fdiv frt, fra, frb`.
pub fn fdiv(frt: u32, fra: u32, frb: u32) -> u32 {
    aform(frt, fra, frb, 0, 18)
}

/// `fmadd frt, fra, frc, frb` (frt = fra * frc + frb).
pub fn fmadd(frt: u32, fra: u32, frc: u32, frb: u32) -> u32 {
    aform(frt, fra, frb, frc, 29)
}

/// `fmr frt, frb`.
pub fn fmr(frt: u32, frb: u32) -> u32 {
    63 << 26 | frt << 21 | frb << 11 | 72 << 1
}

// --- Prefixed forms ---

/// Modify-load-store prefix word carrying the high 18 bits of a 34-bit
/// immediate.
pub fn mls_prefix(imm34: i64) -> u32 {
    1 << 26 | ((imm34 >> 16) as u32 & 0x3_ffff)
}

/// `paddi rt, ra, si34`: prefixed add immediate.
pub fn paddi(rt: u32, ra: u32, si: i64) -> [u32; 2] {
    [mls_prefix(si), addi(rt, ra, si as i32 & 0xffff)]
}

/// `plwz rt, d34(ra)`: prefixed word load.
pub fn plwz(rt: u32, ra: u32, d: i64) -> [u32; 2] {
    [mls_prefix(d), lwz(rt, ra, d as i32 & 0xffff)]
}

/// `pstd rs, d34(ra)`: prefixed doubleword store.
pub fn pstd(rs: u32, ra: u32, d: i64) -> [u32; 2] {
    [mls_prefix(d), std(rs, ra, d as i32 & 0xfffc)]
}
