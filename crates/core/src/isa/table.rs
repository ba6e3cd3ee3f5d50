//! Table-driven instruction decode.
//!
//! Decode1 looks the fetched word up here and receives a fixed-shape
//! [`InsnControl`] record: which functional unit handles the instruction,
//! the operation selector, operand sources, memory flags, carry handling,
//! record-form behaviour, privilege, and serialization marks. Downstream
//! stages never re-derive control bits from the raw encoding.

use super::fields;

/// Functional unit an instruction dispatches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// Combinational ALU path in Execute1 (includes SPR/CR moves).
    Alu,
    /// Branch resolution in Execute1.
    Branch,
    /// Loadstore1.
    Ldst,
    /// Multi-cycle multiply/divide unit.
    MulDiv,
    /// Floating-point unit.
    Fpu,
}

/// Operation selector within a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Integer add (subtract and negate via `invert_a` + carry-in one).
    Add,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NAND.
    Nand,
    /// Shift left doubleword.
    Sld,
    /// Shift right doubleword (logical).
    Srd,
    /// Shift right doubleword (arithmetic).
    Srad,
    /// Sign-extend word.
    Extsw,
    /// Signed compare into a CR field.
    Cmp,
    /// Unsigned compare into a CR field.
    Cmpl,
    /// Multiply, low 64 bits.
    Mull,
    /// Multiply, high 64 bits, signed.
    Mulh,
    /// Multiply, high 64 bits, unsigned.
    Mulhu,
    /// Divide, signed.
    Div,
    /// Divide, unsigned.
    Divu,
    /// Move from SPR.
    Mfspr,
    /// Move to SPR.
    Mtspr,
    /// Move from CR.
    Mfcr,
    /// Move to CR fields.
    Mtcrf,
    /// Memory load.
    Load,
    /// Memory store.
    Store,
    /// Unconditional branch.
    Branch,
    /// Conditional branch.
    BranchCond,
    /// Conditional branch to the link register.
    BranchLr,
    /// Conditional branch to the count register.
    BranchCtr,
    /// Return from interrupt.
    Rfid,
    /// Instruction-stream serializer.
    Isync,
    /// Storage serializer.
    Sync,
    /// System call.
    SysCall,
    /// Floating add.
    FAdd,
    /// Floating subtract.
    FSub,
    /// Floating multiply.
    FMul,
    /// Floating divide.
    FDiv,
    /// Floating fused multiply-add.
    FMadd,
    /// Floating register move.
    FMr,
}

/// Destination register selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dest {
    /// No register result.
    None,
    /// RT field, general-purpose bank.
    Rt,
    /// RT field, floating-point bank.
    Frt,
    /// RA field, general-purpose bank (logical/shift forms).
    Ra,
}

/// First operand source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SrcA {
    /// Operand unused.
    None,
    /// RA field, general-purpose bank.
    Ra,
    /// RA field, or the constant zero when RA is 0 (D-form base).
    RaOrZero,
    /// RS (the RT field) as a source, general-purpose bank.
    Rs,
    /// FRA field, floating-point bank.
    Fra,
}

/// Second operand source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SrcB {
    /// Operand unused (treated as zero by the ALU).
    None,
    /// RB field, general-purpose bank.
    Rb,
    /// FRB field, floating-point bank.
    Frb,
    /// Sign-extended D-form immediate (widened by a prefix).
    ImmD,
    /// Sign-extended DS-form immediate.
    ImmDs,
    /// Sign-extended DQ-form immediate.
    ImmDq,
    /// D-form immediate shifted left 16.
    ImmDShifted,
}

/// Third operand source (store data, CR/SPR move source, FRC).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SrcC {
    /// Operand unused.
    None,
    /// RS (the RT field) as store data or move source, general-purpose bank.
    Rs,
    /// FRS (the RT field) as store data, floating-point bank.
    Frs,
    /// FRC field, floating-point bank.
    Frc,
}

/// Carry-in selection for the adder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarryIn {
    /// Carry-in of zero.
    Zero,
    /// Carry-in of one (subtract/negate forms).
    One,
    /// Carry-in from XER.CA (extended forms).
    Xer,
}

/// Record-form (CR0 update) behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RcForm {
    /// Never sets CR0.
    None,
    /// Sets CR0 when the record bit of the word is set.
    Bit,
    /// Always sets CR0 (`andi.`, store-conditional).
    Always,
}

/// Memory operation flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemFlags {
    /// Access length in bytes; 16 marks a cracked quadword pair.
    pub len: u8,
    /// Sign-extend the loaded value.
    pub sign_ext: bool,
    /// Byte-reverse the transferred value.
    pub byte_rev: bool,
    /// Update form: RA receives the effective address (cracked).
    pub update: bool,
    /// Establish an atomic reservation (load-reserve).
    pub reserve: bool,
    /// Conditional store against the reservation.
    pub cond: bool,
}

const NO_MEM: MemFlags = MemFlags {
    len: 0,
    sign_ext: false,
    byte_rev: false,
    update: false,
    reserve: false,
    cond: false,
};

/// The fixed-shape control record produced by decode.
#[derive(Clone, Copy, Debug)]
pub struct InsnControl {
    /// Functional unit target.
    pub unit: Unit,
    /// Operation selector.
    pub op: Op,
    /// Destination register selector.
    pub dest: Dest,
    /// First operand source.
    pub src_a: SrcA,
    /// Second operand source.
    pub src_b: SrcB,
    /// Third operand source.
    pub src_c: SrcC,
    /// Operate on 32-bit truncated values.
    pub is_32bit: bool,
    /// Signed operation.
    pub is_signed: bool,
    /// One's-complement operand A before the adder (subtract forms).
    pub invert_a: bool,
    /// Carry-in selection.
    pub carry: CarryIn,
    /// Update XER.CA from the adder carry-out.
    pub set_ca: bool,
    /// Update XER.OV from the unit's overflow report.
    pub set_ov: bool,
    /// Record-form behaviour.
    pub rc: RcForm,
    /// Memory flags (loads/stores only).
    pub mem: MemFlags,
    /// Requires privileged state.
    pub privileged: bool,
    /// Stop mark: drain the pipeline before dispatching younger work.
    pub stop_mark: bool,
    /// May carry an immediate-widening prefix.
    pub prefixable: bool,
}

const BASE: InsnControl = InsnControl {
    unit: Unit::Alu,
    op: Op::Add,
    dest: Dest::None,
    src_a: SrcA::None,
    src_b: SrcB::None,
    src_c: SrcC::None,
    is_32bit: false,
    is_signed: false,
    invert_a: false,
    carry: CarryIn::Zero,
    set_ca: false,
    set_ov: false,
    rc: RcForm::None,
    mem: NO_MEM,
    privileged: false,
    stop_mark: false,
    prefixable: false,
};

const LOAD: InsnControl = InsnControl {
    unit: Unit::Ldst,
    op: Op::Load,
    dest: Dest::Rt,
    src_a: SrcA::RaOrZero,
    src_b: SrcB::ImmD,
    ..BASE
};

const STORE: InsnControl = InsnControl {
    unit: Unit::Ldst,
    op: Op::Store,
    src_a: SrcA::RaOrZero,
    src_b: SrcB::ImmD,
    src_c: SrcC::Rs,
    ..BASE
};

const XARITH: InsnControl = InsnControl {
    dest: Dest::Rt,
    src_a: SrcA::Ra,
    src_b: SrcB::Rb,
    rc: RcForm::Bit,
    ..BASE
};

const XLOGIC: InsnControl = InsnControl {
    dest: Dest::Ra,
    src_a: SrcA::Rs,
    src_b: SrcB::Rb,
    rc: RcForm::Bit,
    ..BASE
};

const MULDIV: InsnControl = InsnControl {
    unit: Unit::MulDiv,
    dest: Dest::Rt,
    src_a: SrcA::Ra,
    src_b: SrcB::Rb,
    rc: RcForm::Bit,
    ..BASE
};

const FPA: InsnControl = InsnControl {
    unit: Unit::Fpu,
    dest: Dest::Frt,
    src_a: SrcA::Fra,
    src_b: SrcB::Frb,
    rc: RcForm::None,
    ..BASE
};

const MEM4: MemFlags = MemFlags { len: 4, ..NO_MEM };
const MEM8: MemFlags = MemFlags { len: 8, ..NO_MEM };

/// Decode table rows: (major opcode, lookup key, control record).
///
/// The key is the 10-bit extended opcode for majors 19, 31, and 63 X-forms,
/// the 5-bit extended opcode for major 63 A-forms, the DS sub-opcode for
/// majors 58 and 62, and zero elsewhere.
static TABLE: &[(u32, u32, InsnControl)] = &[
    // D-form arithmetic/logical
    (14, 0, InsnControl { dest: Dest::Rt, src_a: SrcA::RaOrZero, src_b: SrcB::ImmD, prefixable: true, ..BASE }),
    (15, 0, InsnControl { dest: Dest::Rt, src_a: SrcA::RaOrZero, src_b: SrcB::ImmDShifted, ..BASE }),
    (24, 0, InsnControl { op: Op::Or, dest: Dest::Ra, src_a: SrcA::Rs, src_b: SrcB::ImmD, ..BASE }),
    (28, 0, InsnControl { op: Op::And, dest: Dest::Ra, src_a: SrcA::Rs, src_b: SrcB::ImmD, rc: RcForm::Always, ..BASE }),
    (11, 0, InsnControl { op: Op::Cmp, src_a: SrcA::Ra, src_b: SrcB::ImmD, is_signed: true, ..BASE }),
    // Branches
    (18, 0, InsnControl { unit: Unit::Branch, op: Op::Branch, ..BASE }),
    (16, 0, InsnControl { unit: Unit::Branch, op: Op::BranchCond, ..BASE }),
    (19, 16, InsnControl { unit: Unit::Branch, op: Op::BranchLr, ..BASE }),
    (19, 528, InsnControl { unit: Unit::Branch, op: Op::BranchCtr, ..BASE }),
    (19, 18, InsnControl { unit: Unit::Branch, op: Op::Rfid, privileged: true, stop_mark: true, ..BASE }),
    (19, 150, InsnControl { op: Op::Isync, stop_mark: true, ..BASE }),
    (17, 0, InsnControl { op: Op::SysCall, ..BASE }),
    // Loads
    (32, 0, InsnControl { mem: MEM4, prefixable: true, ..LOAD }),
    (33, 0, InsnControl { mem: MemFlags { len: 4, update: true, ..NO_MEM }, ..LOAD }),
    (34, 0, InsnControl { mem: MemFlags { len: 1, ..NO_MEM }, prefixable: true, ..LOAD }),
    (40, 0, InsnControl { mem: MemFlags { len: 2, ..NO_MEM }, prefixable: true, ..LOAD }),
    (42, 0, InsnControl { mem: MemFlags { len: 2, sign_ext: true, ..NO_MEM }, ..LOAD }),
    (58, 0, InsnControl { mem: MEM8, src_b: SrcB::ImmDs, prefixable: true, ..LOAD }),
    (58, 1, InsnControl { mem: MemFlags { len: 8, update: true, ..NO_MEM }, src_b: SrcB::ImmDs, ..LOAD }),
    (58, 2, InsnControl { mem: MemFlags { len: 4, sign_ext: true, ..NO_MEM }, src_b: SrcB::ImmDs, ..LOAD }),
    (56, 0, InsnControl { mem: MemFlags { len: 16, ..NO_MEM }, src_b: SrcB::ImmDq, ..LOAD }),
    (50, 0, InsnControl { mem: MEM8, dest: Dest::Frt, ..LOAD }),
    // Stores
    (36, 0, InsnControl { mem: MEM4, prefixable: true, ..STORE }),
    (37, 0, InsnControl { mem: MemFlags { len: 4, update: true, ..NO_MEM }, ..STORE }),
    (38, 0, InsnControl { mem: MemFlags { len: 1, ..NO_MEM }, prefixable: true, ..STORE }),
    (44, 0, InsnControl { mem: MemFlags { len: 2, ..NO_MEM }, prefixable: true, ..STORE }),
    (62, 0, InsnControl { mem: MEM8, src_b: SrcB::ImmDs, prefixable: true, ..STORE }),
    (62, 1, InsnControl { mem: MemFlags { len: 8, update: true, ..NO_MEM }, src_b: SrcB::ImmDs, ..STORE }),
    (62, 2, InsnControl { mem: MemFlags { len: 16, ..NO_MEM }, src_b: SrcB::ImmDq, ..STORE }),
    (54, 0, InsnControl { mem: MEM8, src_c: SrcC::Frs, ..STORE }),
    // X-form integer arithmetic
    (31, 266, InsnControl { op: Op::Add, ..XARITH }),
    (31, 10, InsnControl { op: Op::Add, set_ca: true, ..XARITH }),
    (31, 138, InsnControl { op: Op::Add, carry: CarryIn::Xer, set_ca: true, ..XARITH }),
    (31, 40, InsnControl { op: Op::Add, invert_a: true, carry: CarryIn::One, ..XARITH }),
    (31, 104, InsnControl { op: Op::Add, invert_a: true, carry: CarryIn::One, src_b: SrcB::None, ..XARITH }),
    (31, 0, InsnControl { op: Op::Cmp, src_a: SrcA::Ra, src_b: SrcB::Rb, is_signed: true, ..BASE }),
    (31, 32, InsnControl { op: Op::Cmpl, src_a: SrcA::Ra, src_b: SrcB::Rb, ..BASE }),
    // X-form logical/shift
    (31, 28, InsnControl { op: Op::And, ..XLOGIC }),
    (31, 444, InsnControl { op: Op::Or, ..XLOGIC }),
    (31, 316, InsnControl { op: Op::Xor, ..XLOGIC }),
    (31, 476, InsnControl { op: Op::Nand, ..XLOGIC }),
    (31, 27, InsnControl { op: Op::Sld, ..XLOGIC }),
    (31, 539, InsnControl { op: Op::Srd, ..XLOGIC }),
    (31, 794, InsnControl { op: Op::Srad, set_ca: true, ..XLOGIC }),
    (31, 986, InsnControl { op: Op::Extsw, src_b: SrcB::None, ..XLOGIC }),
    // Multiply/divide
    (31, 233, InsnControl { op: Op::Mull, is_signed: true, ..MULDIV }),
    (31, 235, InsnControl { op: Op::Mull, is_signed: true, is_32bit: true, ..MULDIV }),
    (31, 73, InsnControl { op: Op::Mulh, is_signed: true, ..MULDIV }),
    (31, 9, InsnControl { op: Op::Mulhu, ..MULDIV }),
    (31, 489, InsnControl { op: Op::Div, is_signed: true, set_ov: true, ..MULDIV }),
    (31, 457, InsnControl { op: Op::Divu, set_ov: true, ..MULDIV }),
    (31, 491, InsnControl { op: Op::Div, is_signed: true, is_32bit: true, set_ov: true, ..MULDIV }),
    (31, 459, InsnControl { op: Op::Divu, is_32bit: true, set_ov: true, ..MULDIV }),
    // SPR and CR moves
    (31, 339, InsnControl { op: Op::Mfspr, dest: Dest::Rt, ..BASE }),
    (31, 467, InsnControl { op: Op::Mtspr, src_c: SrcC::Rs, ..BASE }),
    (31, 19, InsnControl { op: Op::Mfcr, dest: Dest::Rt, ..BASE }),
    (31, 144, InsnControl { op: Op::Mtcrf, src_c: SrcC::Rs, ..BASE }),
    // X-form memory
    (31, 20, InsnControl { mem: MemFlags { len: 4, reserve: true, ..NO_MEM }, src_b: SrcB::Rb, ..LOAD }),
    (31, 84, InsnControl { mem: MemFlags { len: 8, reserve: true, ..NO_MEM }, src_b: SrcB::Rb, ..LOAD }),
    (31, 150, InsnControl { mem: MemFlags { len: 4, cond: true, ..NO_MEM }, src_b: SrcB::Rb, rc: RcForm::Always, ..STORE }),
    (31, 214, InsnControl { mem: MemFlags { len: 8, cond: true, ..NO_MEM }, src_b: SrcB::Rb, rc: RcForm::Always, ..STORE }),
    (31, 534, InsnControl { mem: MemFlags { len: 4, byte_rev: true, ..NO_MEM }, src_b: SrcB::Rb, ..LOAD }),
    (31, 532, InsnControl { mem: MemFlags { len: 8, byte_rev: true, ..NO_MEM }, src_b: SrcB::Rb, ..LOAD }),
    (31, 598, InsnControl { op: Op::Sync, stop_mark: true, ..BASE }),
    // Floating point
    (63, 21, InsnControl { op: Op::FAdd, ..FPA }),
    (63, 20, InsnControl { op: Op::FSub, ..FPA }),
    (63, 25, InsnControl { op: Op::FMul, src_b: SrcB::None, src_c: SrcC::Frc, ..FPA }),
    (63, 18, InsnControl { op: Op::FDiv, ..FPA }),
    (63, 29, InsnControl { op: Op::FMadd, src_c: SrcC::Frc, ..FPA }),
    (63, 72, InsnControl { op: Op::FMr, src_a: SrcA::None, ..FPA }),
];

/// A-form extended opcodes under major 63 (looked up before X-forms).
const FP_AFORM_XO: [u32; 5] = [18, 20, 21, 25, 29];

fn lookup(major: u32, key: u32) -> Option<&'static InsnControl> {
    TABLE
        .iter()
        .find(|(m, k, _)| *m == major && *k == key)
        .map(|(_, _, ctrl)| ctrl)
}

/// Decodes a 32-bit word into its control record. `None` means the encoding
/// is illegal.
pub fn decode(word: u32) -> Option<&'static InsnControl> {
    let major = fields::major(word);
    match major {
        19 | 31 => lookup(major, fields::xo10(word)),
        58 | 62 => lookup(major, fields::ds_sub(word)),
        63 => {
            let xo5 = fields::xo5(word);
            if FP_AFORM_XO.contains(&xo5) {
                lookup(63, xo5)
            } else {
                lookup(63, fields::xo10(word))
            }
        }
        _ => lookup(major, 0),
    }
}

/// Major opcode of the instruction prefix word.
pub const PREFIX_MAJOR: u32 = 1;

/// Control record for faulted or illegal words: the packet flows through
/// the pipeline as a no-op carrying its interrupt.
pub static NOOP: InsnControl = BASE;
