//! Packets carried in the inter-stage latches.
//!
//! Each stage communicates only through these records. Operand values are
//! read (or bypassed) at dispatch, so the execute-side packets are
//! self-contained and the functional units never touch the register files.

use crate::arch::Xer;
use crate::common::{Interrupt, RegIdx};
use crate::isa::{CarryIn, InsnControl, Op, SprSelect};
use crate::pipeline::tags::InsnTag;

/// Fetch1 output: one instruction word and its prediction.
#[derive(Debug, Clone)]
pub struct FetchPacket {
    pub pc: u64,
    pub word: u32,
    /// Predicted next fetch address, when the fetch path supplied one.
    pub pred_nia: Option<u64>,
    /// Fetch-side fault (instruction storage).
    pub fault: Option<Interrupt>,
}

/// Decode1 output: the word paired with its control record and any prefix.
#[derive(Debug, Clone)]
pub struct DecodePacket {
    pub pc: u64,
    pub word: u32,
    /// Prefix word, for prefixed (8-byte) instructions.
    pub prefix: Option<u32>,
    pub ctrl: &'static InsnControl,
    pub pred_nia: Option<u64>,
    pub fault: Option<Interrupt>,
}

impl DecodePacket {
    /// Instruction length in bytes: 8 when prefixed, else 4.
    pub fn len(&self) -> u64 {
        if self.prefix.is_some() {
            8
        } else {
            4
        }
    }
}

/// Integer ALU request with operands resolved.
#[derive(Debug, Clone, Copy)]
pub struct AluReq {
    pub op: Op,
    pub a: u64,
    pub b: u64,
    pub dest: Option<RegIdx>,
    pub is_32bit: bool,
    pub invert_a: bool,
    pub carry: CarryIn,
    pub set_ca: bool,
    pub rc: bool,
    /// XER snapshot at dispatch, for carry-in and CR0.SO.
    pub xer: Xer,
}

/// Compare request targeting one CR field.
#[derive(Debug, Clone, Copy)]
pub struct CmpReq {
    pub a: u64,
    pub b: u64,
    pub is_64: bool,
    pub signed: bool,
    pub bf: u32,
    pub so: bool,
}

/// Branch request. Condition and count values are read at dispatch; the
/// taken/not-taken decision is made in Execute1.
#[derive(Debug, Clone, Copy)]
pub struct BranchReq {
    pub op: Op,
    /// Resolved target for immediate forms; the LR or CTR value for the
    /// indirect forms.
    pub target: u64,
    pub bo: u32,
    pub bi: u32,
    /// The CR bit named by BI, as read at dispatch.
    pub cond_bit: bool,
    /// CTR value at dispatch, for the decrement-and-test BO forms.
    pub ctr: u64,
    pub lk: bool,
}

/// What a memory access does with its data.
#[derive(Debug, Clone, Copy)]
pub enum LsKind {
    Load {
        dest: RegIdx,
        sign_ext: bool,
        byte_rev: bool,
    },
    Store {
        value: u64,
        byte_rev: bool,
    },
}

/// A single memory access of up to eight bytes.
#[derive(Debug, Clone, Copy)]
pub struct LsReq {
    pub kind: LsKind,
    pub ea: u64,
    pub len: u8,
    /// Establish a reservation (load-reserve forms).
    pub reserve: bool,
    /// Conditional store; CR0 reports success.
    pub cond: bool,
    /// XER.SO at dispatch, copied into CR0 by conditional stores.
    pub so: bool,
}

/// Multiply/divide request for the multi-cycle unit.
#[derive(Debug, Clone, Copy)]
pub struct MulDivReq {
    pub op: Op,
    pub a: u64,
    pub b: u64,
    pub dest: RegIdx,
    pub is_32bit: bool,
    pub signed: bool,
    pub set_ov: bool,
    pub rc: bool,
    pub xer: Xer,
}

/// Floating-point request; operands are raw f64 bit patterns.
#[derive(Debug, Clone, Copy)]
pub struct FpuReq {
    pub op: Op,
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub dest: RegIdx,
}

/// Dispatched operation, tagged by target unit.
#[derive(Debug, Clone, Copy)]
pub enum UnitOp {
    /// No effect (faulted packets, `sync`).
    NoOp,
    /// `isync`: commit redirects to the next instruction.
    Isync,
    Alu(AluReq),
    Cmp(CmpReq),
    Branch(BranchReq),
    Ldst(LsReq),
    MulDiv(MulDivReq),
    Fpu(FpuReq),
    /// SPR read resolved in Execute1; dispatch stalls until no SPR write
    /// is in flight, so the read is always architecturally current.
    SprFrom { sel: SprSelect, dest: RegIdx },
    SprTo { sel: SprSelect, value: u64 },
    /// Register move whose value was read (or bypassed) at dispatch
    /// (`mfcr`, `mfspr` of XER).
    Move { dest: RegIdx, value: u64 },
    CrTo { fxm: u32, value: u32 },
    /// Return from interrupt; SRR0/SRR1 read at dispatch.
    Rfid { srr0: u64, srr1: u64 },
    SysCall,
}

/// Decode2 output: a dispatched instruction (or cracked half).
#[derive(Debug, Clone)]
pub struct ExecPacket {
    pub tag: InsnTag,
    /// Dispatch sequence number; commit consumes these in order.
    pub seq: u64,
    pub pc: u64,
    pub insn_len: u64,
    pub pred_nia: Option<u64>,
    /// First half of a cracked pair (or the whole of an uncracked one).
    pub first: bool,
    /// Last half; retires the tag at commit.
    pub last: bool,
    pub fault: Option<Interrupt>,
    pub op: UnitOp,
}

/// Execute1 output headed for Loadstore1.
#[derive(Debug, Clone)]
pub struct LsPacket {
    pub tag: InsnTag,
    pub seq: u64,
    pub pc: u64,
    pub insn_len: u64,
    pub last: bool,
    pub req: LsReq,
}

/// Commit classification, counted by the performance monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitClass {
    Other,
    Load,
    Store,
    Branch,
}

/// A completed instruction (or half) waiting to commit.
#[derive(Debug, Clone)]
pub struct WbPacket {
    pub tag: InsnTag,
    pub seq: u64,
    pub pc: u64,
    pub insn_len: u64,
    pub last: bool,
    pub reg: Option<(RegIdx, u64)>,
    /// CR update: (field mask, value).
    pub cr: Option<(u32, u32)>,
    pub xer: Option<Xer>,
    pub spr: Option<(SprSelect, u64)>,
    /// Second SPR write, for branches that both decrement CTR and set LR.
    pub spr2: Option<(SprSelect, u64)>,
    /// New MSR (`rfid`).
    pub msr: Option<u64>,
    /// Architected next address when it differs from the predicted path.
    pub redirect: Option<u64>,
    /// CFAR update for taken branches.
    pub cfar: Option<u64>,
    pub intr: Option<Interrupt>,
    /// Committed self-branch: stop the simulation.
    pub halt: bool,
    pub class: CommitClass,
}

impl WbPacket {
    /// An effect-free completion for `pkt`.
    pub fn empty(pkt: &ExecPacket) -> Self {
        Self {
            tag: pkt.tag,
            seq: pkt.seq,
            pc: pkt.pc,
            insn_len: pkt.insn_len,
            last: pkt.last,
            reg: None,
            cr: None,
            xer: None,
            spr: None,
            spr2: None,
            msr: None,
            redirect: None,
            cfar: None,
            intr: None,
            halt: false,
            class: CommitClass::Other,
        }
    }

    /// An effect-free completion for a memory packet.
    pub fn empty_ls(pkt: &LsPacket) -> Self {
        Self {
            tag: pkt.tag,
            seq: pkt.seq,
            pc: pkt.pc,
            insn_len: pkt.insn_len,
            last: pkt.last,
            reg: None,
            cr: None,
            xer: None,
            spr: None,
            spr2: None,
            msr: None,
            redirect: None,
            cfar: None,
            intr: None,
            halt: false,
            class: CommitClass::Other,
        }
    }
}
