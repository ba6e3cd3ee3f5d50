//! Decode2: hazard resolution, operand collection, and dispatch.
//!
//! All operand values are read here, either from the architectural files
//! or from a bypass lane fed by a completion latch. If an operand has an
//! in-flight producer and no lane carries its value yet, the instruction
//! holds. Update-form and quadword memory instructions are cracked into
//! two halves sharing one tag; the second half is queued and dispatched
//! the following cycle.

use tracing::trace;

use crate::arch::Xer;
use crate::common::constants::{MSR_FP, MSR_PR};
use crate::common::{Interrupt, ProgramCause, RegIdx};
use crate::core::Core;
use crate::isa::sprs::{self, ram_slot, SprSelect};
use crate::isa::{fields, CarryIn, Dest, Op, RcForm, SrcA, SrcB, SrcC, Unit};
use crate::mem::{DataCache, InsnCache, Mmu};
use crate::pipeline::bypass::BypassLanes;
use crate::pipeline::packets::{
    AluReq, BranchReq, CmpReq, DecodePacket, ExecPacket, FpuReq, LsKind, LsReq, MulDivReq, UnitOp,
};
use crate::pipeline::tags::InsnTag;

/// Outcome of a dispatch attempt. `None` from the builder means hold.
enum Dispatched {
    One(ExecPacket),
    Pair(ExecPacket, ExecPacket),
}

impl<I: InsnCache, D: DataCache, M: Mmu> Core<I, D, M> {
    pub(crate) fn stage_decode2(&mut self) {
        if self.pl.d2_out.is_some() {
            return;
        }
        // The queued half of a cracked pair dispatches first.
        if let Some(second) = self.pl.crack_second.take() {
            self.pl.d2_out = Some(second);
            return;
        }
        let Some(d) = self.pl.d1_out.clone() else {
            return;
        };
        let lanes = self.pl.lanes();
        match self.try_dispatch(&d, &lanes) {
            None => {}
            Some(Dispatched::One(pkt)) => {
                self.pl.d1_out = None;
                self.pl.d2_out = Some(pkt);
            }
            Some(Dispatched::Pair(first, second)) => {
                self.pl.d1_out = None;
                self.pl.d2_out = Some(first);
                self.pl.crack_second = Some(second);
            }
        }
    }

    fn read_reg(&self, lanes: &BypassLanes, idx: RegIdx) -> Option<u64> {
        match self.pl.producers.reg(idx) {
            None => Some(self.cpu.regs.read(idx)),
            Some(tag) => lanes.reg(tag, idx),
        }
    }

    /// Reads the CR fields covered by `fxm`, merging a bypass lane over the
    /// architectural value when the producer's result is available.
    fn read_cr(&self, lanes: &BypassLanes, fxm: u32) -> Option<u32> {
        match self.pl.producers.cr() {
            None => Some(self.cpu.cr.raw()),
            Some(tag) => {
                let (mask, value) = lanes.cr(tag, fxm)?;
                let bits = crate::common::reg::cr_mask_expand(mask as u8);
                Some((self.cpu.cr.raw() & !bits) | (value & bits))
            }
        }
    }

    fn read_xer(&self, lanes: &BypassLanes) -> Option<Xer> {
        match self.pl.producers.xer() {
            None => Some(self.cpu.xer),
            Some(tag) => lanes.xer(tag),
        }
    }

    fn fault_packet(&mut self, d: &DecodePacket, intr: Interrupt) -> Option<Dispatched> {
        let tag = self.pl.tags.allocate()?;
        let seq = self.pl.dispatch_seq;
        self.pl.dispatch_seq += 1;
        Some(Dispatched::One(ExecPacket {
            tag,
            seq,
            pc: d.pc,
            insn_len: d.len(),
            pred_nia: d.pred_nia,
            first: true,
            last: true,
            fault: Some(intr),
            op: UnitOp::NoOp,
        }))
    }

    #[allow(clippy::too_many_lines)]
    fn try_dispatch(&mut self, d: &DecodePacket, lanes: &BypassLanes) -> Option<Dispatched> {
        let ctrl = d.ctrl;
        let word = d.word;

        if let Some(fault) = d.fault.clone() {
            return self.fault_packet(d, fault);
        }
        if ctrl.stop_mark && !self.pl.drained() {
            return None;
        }

        // Privilege and availability checks come before operand hazards.
        let user = self.cpu.ctrl.msr & MSR_PR != 0;
        let touches_fp = ctrl.unit == Unit::Fpu
            || ctrl.dest == Dest::Frt
            || matches!(ctrl.src_c, SrcC::Frs);
        if ctrl.privileged && user {
            return self.fault_packet(d, Interrupt::Program(ProgramCause::Privileged));
        }
        if touches_fp && self.cpu.ctrl.msr & MSR_FP == 0 {
            return self.fault_packet(d, Interrupt::FpUnavailable);
        }
        let spr_sel = if matches!(ctrl.op, Op::Mfspr | Op::Mtspr) {
            let spr = fields::spr(word);
            match sprs::route(spr) {
                None => return self.fault_packet(d, Interrupt::Program(ProgramCause::Illegal)),
                Some(_) if sprs::is_privileged(spr) && user => {
                    return self.fault_packet(d, Interrupt::Program(ProgramCause::Privileged));
                }
                Some(_) if ctrl.op == Op::Mtspr && sprs::is_read_only(spr) => {
                    return self.fault_packet(d, Interrupt::Program(ProgramCause::Illegal));
                }
                sel => sel,
            }
        } else {
            None
        };

        // SPR readers wait for any in-flight SPR writer to retire; there is
        // no bypass lane for the SPR bank.
        let reads_spr = matches!(spr_sel, Some(sel) if sel != SprSelect::Xer)
            || matches!(ctrl.op, Op::BranchLr | Op::BranchCtr | Op::Rfid)
            || (ctrl.op == Op::BranchCond && fields::bo(word) & 0x4 == 0);
        if reads_spr && self.pl.producers.spr().is_some() {
            return None;
        }

        let rt_f = fields::rt(word);
        let ra_f = fields::ra(word);
        let rb_f = fields::rb(word);

        let a = match ctrl.src_a {
            SrcA::None => 0,
            SrcA::Ra => self.read_reg(lanes, RegIdx::gpr(ra_f))?,
            SrcA::RaOrZero => {
                if ra_f == 0 {
                    0
                } else {
                    self.read_reg(lanes, RegIdx::gpr(ra_f))?
                }
            }
            SrcA::Rs => self.read_reg(lanes, RegIdx::gpr(rt_f))?,
            SrcA::Fra => self.read_reg(lanes, RegIdx::fpr(ra_f))?,
        };
        let b = match ctrl.src_b {
            SrcB::None => 0,
            SrcB::Rb => self.read_reg(lanes, RegIdx::gpr(rb_f))?,
            SrcB::Frb => self.read_reg(lanes, RegIdx::fpr(rb_f))?,
            SrcB::ImmD => match d.prefix {
                Some(p) => fields::prefixed_imm(p, word) as u64,
                None => fields::d16(word) as u64,
            },
            SrcB::ImmDs => match d.prefix {
                Some(p) => fields::prefixed_imm_ds(p, word) as u64,
                None => fields::ds14(word) as u64,
            },
            SrcB::ImmDq => fields::dq12(word) as u64,
            SrcB::ImmDShifted => (fields::d16(word) << 16) as u64,
        };
        let c = match ctrl.src_c {
            SrcC::None => 0,
            SrcC::Rs => self.read_reg(lanes, RegIdx::gpr(rt_f))?,
            SrcC::Frs => self.read_reg(lanes, RegIdx::fpr(rt_f))?,
            SrcC::Frc => self.read_reg(lanes, RegIdx::fpr(fields::frc(word)))?,
        };

        let rc_active = match ctrl.rc {
            RcForm::None => false,
            RcForm::Bit => fields::rc(word),
            RcForm::Always => true,
        };
        let needs_xer = ctrl.carry == CarryIn::Xer
            || ctrl.set_ca
            || ctrl.set_ov
            || rc_active
            || matches!(ctrl.op, Op::Cmp | Op::Cmpl)
            || spr_sel == Some(SprSelect::Xer);
        let xer = if needs_xer {
            self.read_xer(lanes)?
        } else {
            self.cpu.xer
        };

        // Conditional branches read one CR field; mfcr reads all of them.
        let bo = fields::bo(word);
        let cond_bit = if matches!(ctrl.op, Op::BranchCond | Op::BranchLr | Op::BranchCtr)
            && bo & 0x10 == 0
        {
            let bi = fields::bi(word);
            let fxm = 0x80 >> (bi / 4);
            let cr = self.read_cr(lanes, fxm)?;
            crate::common::reg::cr_bit(cr, bi as u8)
        } else {
            false
        };
        let full_cr = if ctrl.op == Op::Mfcr {
            Some(self.read_cr(lanes, 0xff)?)
        } else {
            None
        };

        // Second store operand of a quadword store pair.
        let c2 = if ctrl.unit == Unit::Ldst && ctrl.mem.len == 16 && ctrl.op == Op::Store {
            Some(self.read_reg(lanes, RegIdx::gpr((rt_f + 1) & 31))?)
        } else {
            None
        };

        // All hazards clear; claim a tag.
        let tag = self.pl.tags.allocate()?;
        let dest = match ctrl.dest {
            Dest::None => None,
            Dest::Rt => Some(RegIdx::gpr(rt_f)),
            Dest::Frt => Some(RegIdx::fpr(rt_f)),
            Dest::Ra => Some(RegIdx::gpr(ra_f)),
        };

        if ctrl.unit == Unit::Ldst {
            return Some(self.dispatch_mem(d, tag, a, b, c, c2, xer, dest, rc_active));
        }

        let op = match ctrl.op {
            Op::Cmp | Op::Cmpl => UnitOp::Cmp(CmpReq {
                a,
                b,
                is_64: fields::cmp_l(word),
                signed: ctrl.op == Op::Cmp,
                bf: fields::crfd(word),
                so: xer.so,
            }),
            Op::Mfspr => match spr_sel {
                Some(SprSelect::Xer) => UnitOp::Move {
                    dest: dest.unwrap_or(RegIdx::gpr(rt_f)),
                    value: xer.to_spr(),
                },
                Some(sel) => UnitOp::SprFrom {
                    sel,
                    dest: dest.unwrap_or(RegIdx::gpr(rt_f)),
                },
                None => unreachable!("mfspr routing validated above"),
            },
            Op::Mtspr => {
                let sel = spr_sel.unwrap_or(SprSelect::Xer);
                UnitOp::SprTo { sel, value: c }
            }
            Op::Mfcr => UnitOp::Move {
                dest: dest.unwrap_or(RegIdx::gpr(rt_f)),
                value: u64::from(full_cr.unwrap_or(0)),
            },
            Op::Mtcrf => UnitOp::CrTo {
                fxm: fields::fxm(word),
                value: c as u32,
            },
            Op::SysCall => UnitOp::SysCall,
            Op::Isync => UnitOp::Isync,
            Op::Sync => UnitOp::NoOp,
            Op::Rfid => UnitOp::Rfid {
                srr0: self.cpu.spr_ram[ram_slot::SRR0],
                srr1: self.cpu.spr_ram[ram_slot::SRR1],
            },
            Op::Branch | Op::BranchCond | Op::BranchLr | Op::BranchCtr => {
                let target = match ctrl.op {
                    Op::Branch => {
                        let disp = fields::li26(word) as u64;
                        if fields::aa(word) {
                            disp
                        } else {
                            d.pc.wrapping_add(disp)
                        }
                    }
                    Op::BranchCond => {
                        let disp = fields::bd16(word) as u64;
                        if fields::aa(word) {
                            disp
                        } else {
                            d.pc.wrapping_add(disp)
                        }
                    }
                    Op::BranchLr => self.cpu.spr_ram[ram_slot::LR] & !3,
                    _ => self.cpu.spr_ram[ram_slot::CTR] & !3,
                };
                UnitOp::Branch(BranchReq {
                    op: ctrl.op,
                    target,
                    bo,
                    bi: fields::bi(word),
                    cond_bit,
                    ctr: self.cpu.spr_ram[ram_slot::CTR],
                    lk: fields::lk(word),
                })
            }
            Op::Mull | Op::Mulh | Op::Mulhu | Op::Div | Op::Divu => UnitOp::MulDiv(MulDivReq {
                op: ctrl.op,
                a,
                b,
                dest: dest.unwrap_or(RegIdx::gpr(rt_f)),
                is_32bit: ctrl.is_32bit,
                signed: ctrl.is_signed,
                set_ov: ctrl.set_ov,
                rc: rc_active,
                xer,
            }),
            Op::FAdd | Op::FSub | Op::FMul | Op::FDiv | Op::FMadd | Op::FMr => {
                UnitOp::Fpu(FpuReq {
                    op: ctrl.op,
                    a,
                    b,
                    c,
                    dest: dest.unwrap_or(RegIdx::fpr(rt_f)),
                })
            }
            _ => UnitOp::Alu(AluReq {
                op: ctrl.op,
                a,
                b,
                dest,
                is_32bit: ctrl.is_32bit,
                invert_a: ctrl.invert_a,
                carry: ctrl.carry,
                set_ca: ctrl.set_ca,
                rc: rc_active,
                xer,
            }),
        };

        // Producer bookkeeping.
        if let Some(idx) = dest {
            self.pl.producers.set_reg(idx, tag);
        }
        if rc_active || matches!(ctrl.op, Op::Cmp | Op::Cmpl | Op::Mtcrf) {
            self.pl.producers.set_cr(tag);
        }
        if ctrl.set_ca || ctrl.set_ov {
            self.pl.producers.set_xer(tag);
        }
        match op {
            UnitOp::SprTo { sel, .. } => {
                if sel == SprSelect::Xer {
                    self.pl.producers.set_xer(tag);
                } else {
                    self.pl.producers.set_spr(tag);
                }
            }
            UnitOp::Branch(ref req) => {
                let decrements =
                    matches!(ctrl.op, Op::BranchCond | Op::BranchLr) && req.bo & 0x4 == 0;
                if req.lk || decrements {
                    self.pl.producers.set_spr(tag);
                }
            }
            _ => {}
        }

        let seq = self.pl.dispatch_seq;
        self.pl.dispatch_seq += 1;
        trace!(pc = d.pc, seq, "dispatch");
        Some(Dispatched::One(ExecPacket {
            tag,
            seq,
            pc: d.pc,
            insn_len: d.len(),
            pred_nia: d.pred_nia,
            first: true,
            last: true,
            fault: None,
            op,
        }))
    }

    /// Builds the packet (or cracked pair) for a memory instruction.
    #[allow(clippy::too_many_arguments)]
    fn dispatch_mem(
        &mut self,
        d: &DecodePacket,
        tag: InsnTag,
        a: u64,
        b: u64,
        c: u64,
        c2: Option<u64>,
        xer: Xer,
        dest: Option<RegIdx>,
        rc_active: bool,
    ) -> Dispatched {
        let ctrl = d.ctrl;
        let word = d.word;
        let ea = a.wrapping_add(b);
        let mem = ctrl.mem;
        let is_store = ctrl.op == Op::Store;

        let base = |seq: u64, first: bool, last: bool, op: UnitOp| ExecPacket {
            tag,
            seq,
            pc: d.pc,
            insn_len: d.len(),
            pred_nia: if last { d.pred_nia } else { None },
            first,
            last,
            fault: None,
            op,
        };

        // Alignment rules: atomics are naturally aligned, quadword pairs
        // are quadword aligned.
        let misaligned = ((mem.reserve || mem.cond) && ea % u64::from(mem.len) != 0)
            || (mem.len == 16 && ea % 16 != 0);
        if misaligned {
            let seq = self.pl.dispatch_seq;
            self.pl.dispatch_seq += 1;
            return Dispatched::One(ExecPacket {
                fault: Some(Interrupt::Alignment {
                    addr: ea,
                    prefix_cross: false,
                }),
                op: UnitOp::NoOp,
                ..base(seq, true, true, UnitOp::NoOp)
            });
        }

        let kind = |value: u64, dst: Option<RegIdx>| {
            if is_store {
                LsKind::Store {
                    value,
                    byte_rev: mem.byte_rev,
                }
            } else {
                LsKind::Load {
                    dest: dst.unwrap_or(RegIdx::gpr(fields::rt(word))),
                    sign_ext: mem.sign_ext,
                    byte_rev: mem.byte_rev,
                }
            }
        };

        let req = |ea: u64, len: u8, value: u64, dst: Option<RegIdx>| {
            UnitOp::Ldst(LsReq {
                kind: kind(value, dst),
                ea,
                len,
                reserve: mem.reserve,
                cond: mem.cond,
                so: xer.so,
            })
        };

        // Producers for the data side.
        if let (false, Some(idx)) = (is_store, dest) {
            self.pl.producers.set_reg(idx, tag);
        }
        if rc_active {
            self.pl.producers.set_cr(tag);
        }

        if mem.len == 16 {
            // Quadword pair: two 8-byte halves, one tag.
            let rt_f = fields::rt(word);
            let dest2 = RegIdx::gpr((rt_f + 1) & 31);
            if !is_store {
                self.pl.producers.set_reg(dest2, tag);
            }
            let seq = self.pl.dispatch_seq;
            self.pl.dispatch_seq += 2;
            let first = base(seq, true, false, req(ea, 8, c, dest));
            let second = base(
                seq + 1,
                false,
                true,
                req(ea.wrapping_add(8), 8, c2.unwrap_or(0), Some(dest2)),
            );
            return Dispatched::Pair(first, second);
        }

        if mem.update {
            // Update form: the access, then an ALU half writing RA = EA.
            let ra_idx = RegIdx::gpr(fields::ra(word));
            self.pl.producers.set_reg(ra_idx, tag);
            let seq = self.pl.dispatch_seq;
            self.pl.dispatch_seq += 2;
            let first = base(seq, true, false, req(ea, mem.len, c, dest));
            let second = base(
                seq + 1,
                false,
                true,
                UnitOp::Alu(AluReq {
                    op: Op::Add,
                    a: ea,
                    b: 0,
                    dest: Some(ra_idx),
                    is_32bit: false,
                    invert_a: false,
                    carry: CarryIn::Zero,
                    set_ca: false,
                    rc: false,
                    xer,
                }),
            );
            return Dispatched::Pair(first, second);
        }

        let seq = self.pl.dispatch_seq;
        self.pl.dispatch_seq += 1;
        Dispatched::One(base(seq, true, true, req(ea, mem.len, c, dest)))
    }
}
