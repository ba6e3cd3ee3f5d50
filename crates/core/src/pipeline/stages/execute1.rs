//! Execute1: single-cycle integer execution, branch resolution, and issue
//! into the load/store and multi-cycle units.
//!
//! Asynchronous interrupts are sampled here, on instruction boundaries
//! only: an arriving packet that begins an instruction is converted into a
//! no-op carrying the interrupt, so the marked instruction never executes
//! and SRR0 points at it.

use tracing::trace;

use crate::arch::Xer;
use crate::common::constants::MSR_FE0;
use crate::common::reg::cr_compare;
use crate::common::{Interrupt, ProgramCause};
use crate::core::Core;
use crate::isa::sprs::ram_slot;
use crate::isa::{CarryIn, Op, SprSelect};
use crate::mem::{DataCache, InsnCache, Mmu};
use crate::pipeline::packets::{
    AluReq, BranchReq, CmpReq, CommitClass, ExecPacket, FpuReq, LsKind, LsPacket, MulDivReq,
    UnitOp, WbPacket,
};

/// CR0 value for `value`, as a (mask, cr-word) pair for field 0.
fn cr0(value: u64, so: bool) -> (u32, u32) {
    let v = value as i64;
    let nibble = cr_compare(v < 0, v > 0, so);
    (0x80, u32::from(nibble) << 28)
}

/// Adder with carry reporting. `a` is pre-inverted by the caller for the
/// subtract forms.
fn add_with_carry(a: u64, b: u64, carry_in: u64) -> (u64, bool, bool) {
    let wide = u128::from(a) + u128::from(b) + u128::from(carry_in);
    let ca = wide >> 64 != 0;
    let narrow = u64::from(a as u32) + u64::from(b as u32) + carry_in;
    let ca32 = narrow >> 32 != 0;
    (wide as u64, ca, ca32)
}

fn alu(req: &AluReq) -> (u64, Option<Xer>) {
    match req.op {
        Op::Add => {
            let a = if req.invert_a { !req.a } else { req.a };
            let cin = match req.carry {
                CarryIn::Zero => 0,
                CarryIn::One => 1,
                CarryIn::Xer => u64::from(req.xer.ca),
            };
            let (value, ca, ca32) = add_with_carry(a, req.b, cin);
            let xer = req.set_ca.then(|| Xer {
                ca,
                ca32,
                ..req.xer
            });
            (value, xer)
        }
        Op::And => (req.a & req.b, None),
        Op::Or => (req.a | req.b, None),
        Op::Xor => (req.a ^ req.b, None),
        Op::Nand => (!(req.a & req.b), None),
        Op::Sld => {
            let sh = req.b & 0x7f;
            (if sh > 63 { 0 } else { req.a << sh }, None)
        }
        Op::Srd => {
            let sh = req.b & 0x7f;
            (if sh > 63 { 0 } else { req.a >> sh }, None)
        }
        Op::Srad => {
            let sh = req.b & 0x7f;
            let a = req.a as i64;
            let (value, carry) = if sh > 63 {
                ((a >> 63) as u64, a < 0)
            } else {
                let shifted_out = sh != 0 && req.a & ((1u64 << sh) - 1) != 0;
                (((a >> sh) as u64), a < 0 && shifted_out)
            };
            let xer = Xer {
                ca: carry,
                ca32: carry,
                ..req.xer
            };
            (value, Some(xer))
        }
        Op::Extsw => (i64::from(req.a as i32) as u64, None),
        _ => (req.a, None),
    }
}

fn compare(req: &CmpReq) -> (u32, u32) {
    let (lt, gt) = if req.is_64 {
        if req.signed {
            ((req.a as i64) < req.b as i64, (req.a as i64) > req.b as i64)
        } else {
            (req.a < req.b, req.a > req.b)
        }
    } else if req.signed {
        ((req.a as i32) < req.b as i32, (req.a as i32) > req.b as i32)
    } else {
        ((req.a as u32) < req.b as u32, (req.a as u32) > req.b as u32)
    };
    let nibble = cr_compare(lt, gt, req.so);
    let shift = 28 - 4 * req.bf;
    (0x80 >> req.bf, u32::from(nibble) << shift)
}

/// Multiply/divide with overflow reporting.
fn muldiv(req: &MulDivReq) -> (u64, bool) {
    match req.op {
        Op::Mull => {
            if req.is_32bit {
                let v = i64::from(req.a as i32).wrapping_mul(i64::from(req.b as i32));
                (v as u64, false)
            } else {
                ((req.a as i64).wrapping_mul(req.b as i64) as u64, false)
            }
        }
        Op::Mulh => {
            let wide = i128::from(req.a as i64) * i128::from(req.b as i64);
            ((wide >> 64) as u64, false)
        }
        Op::Mulhu => {
            let wide = u128::from(req.a) * u128::from(req.b);
            ((wide >> 64) as u64, false)
        }
        Op::Div => {
            if req.is_32bit {
                let (a, b) = (req.a as i32, req.b as i32);
                if b == 0 || (a == i32::MIN && b == -1) {
                    (0, true)
                } else {
                    (i64::from(a / b) as u64, false)
                }
            } else {
                let (a, b) = (req.a as i64, req.b as i64);
                if b == 0 || (a == i64::MIN && b == -1) {
                    (0, true)
                } else {
                    ((a / b) as u64, false)
                }
            }
        }
        Op::Divu => {
            if req.is_32bit {
                let (a, b) = (req.a as u32, req.b as u32);
                if b == 0 {
                    (0, true)
                } else {
                    (u64::from(a / b), false)
                }
            } else if req.b == 0 {
                (0, true)
            } else {
                (req.a / req.b, false)
            }
        }
        _ => (0, false),
    }
}

fn fp_compute(req: &FpuReq) -> (u64, bool) {
    let a = f64::from_bits(req.a);
    let b = f64::from_bits(req.b);
    let c = f64::from_bits(req.c);
    let (value, invalid) = match req.op {
        Op::FAdd => (a + b, false),
        Op::FSub => (a - b, false),
        Op::FMul => (a * c, false),
        Op::FDiv => (a / b, b == 0.0),
        Op::FMadd => (a.mul_add(c, b), false),
        _ => (b, false),
    };
    let exception = invalid || (value.is_nan() && !a.is_nan() && !b.is_nan() && !c.is_nan());
    (value.to_bits(), exception)
}

impl<I: InsnCache, D: DataCache, M: Mmu> Core<I, D, M> {
    #[allow(clippy::too_many_lines)]
    pub(crate) fn stage_execute1(&mut self) {
        let Some(pkt) = self.pl.d2_out.clone() else {
            return;
        };

        // Asynchronous interrupt sampling, on instruction boundaries only.
        if pkt.first && pkt.fault.is_none() {
            if let Some(intr) = self.pending_async() {
                if self.pl.ex_wb.is_none() {
                    self.pl.d2_out = None;
                    // The other half of a pair is abandoned with it.
                    self.pl.crack_second = None;
                    let mut wb = WbPacket::empty(&pkt);
                    wb.intr = Some(intr);
                    self.pl.ex_wb = Some(wb);
                }
                return;
            }
        }
        match &pkt.op {
            UnitOp::Ldst(req) => {
                if self.pl.ex_ls.is_some() {
                    return;
                }
                // Stores wait for the FP unit to drain: it is the only
                // faultable long-latency producer ahead of them in
                // program order.
                if matches!(req.kind, LsKind::Store { .. }) && self.fpu.busy() {
                    return;
                }
                self.pl.ex_ls = Some(LsPacket {
                    tag: pkt.tag,
                    seq: pkt.seq,
                    pc: pkt.pc,
                    insn_len: pkt.insn_len,
                    last: pkt.last,
                    req: *req,
                });
                self.pl.d2_out = None;
            }
            UnitOp::MulDiv(req) => {
                if self.muldiv.busy() {
                    return;
                }
                let (value, ov) = muldiv(req);
                let mut wb = WbPacket::empty(&pkt);
                wb.reg = Some((req.dest, value));
                let mut xer = req.xer;
                if req.set_ov {
                    xer.set_overflow(ov, ov);
                    wb.xer = Some(xer);
                }
                if req.rc {
                    let (mask, cr) = cr0(value, xer.so);
                    wb.cr = Some((mask, cr));
                }
                self.finish_direct(&pkt, &mut wb);
                let is_div = matches!(req.op, Op::Div | Op::Divu);
                let issued = self.muldiv.issue(wb, is_div);
                debug_assert!(issued);
                self.pl.d2_out = None;
            }
            UnitOp::Fpu(req) => {
                if self.fpu.busy() {
                    return;
                }
                let (bits, exception) = fp_compute(req);
                let mut wb = WbPacket::empty(&pkt);
                if exception && self.cpu.ctrl.msr & MSR_FE0 != 0 {
                    wb.intr = Some(Interrupt::Program(ProgramCause::FpException));
                } else {
                    wb.reg = Some((req.dest, bits));
                }
                self.finish_direct(&pkt, &mut wb);
                let issued = self.fpu.issue(wb, req.op);
                debug_assert!(issued);
                self.pl.d2_out = None;
            }
            _ => {
                if self.pl.ex_wb.is_some() {
                    return;
                }
                let wb = self.execute_direct(&pkt);
                self.pl.ex_wb = Some(wb);
                self.pl.d2_out = None;
            }
        }
    }

    /// Mispredict fix-up shared by every non-branch path: if fetch followed
    /// a hint that disagrees with sequential flow, commit must redirect.
    fn finish_direct(&self, pkt: &ExecPacket, wb: &mut WbPacket) {
        if wb.redirect.is_none() && wb.intr.is_none() {
            if let Some(pred) = pkt.pred_nia {
                let actual = pkt.pc.wrapping_add(pkt.insn_len);
                if pred != actual {
                    wb.redirect = Some(actual);
                }
            }
        }
    }

    fn execute_direct(&self, pkt: &ExecPacket) -> WbPacket {
        let mut wb = WbPacket::empty(pkt);
        if let Some(fault) = pkt.fault.clone() {
            wb.intr = Some(fault);
            return wb;
        }
        match &pkt.op {
            UnitOp::NoOp => {}
            UnitOp::Isync => {
                // Serialization refetches the stream past the isync.
                wb.redirect = Some(pkt.pc.wrapping_add(pkt.insn_len));
            }
            UnitOp::Alu(req) => {
                let (value, xer) = alu(req);
                if let Some(dest) = req.dest {
                    wb.reg = Some((dest, value));
                }
                wb.xer = xer;
                if req.rc {
                    let so = xer.map_or(req.xer.so, |x| x.so);
                    wb.cr = Some(cr0(value, so));
                }
            }
            UnitOp::Cmp(req) => {
                wb.cr = Some(compare(req));
            }
            UnitOp::Branch(req) => {
                // Branches judge the prediction themselves.
                self.resolve_branch(pkt, req, &mut wb);
                return wb;
            }
            UnitOp::SprFrom { sel, dest } => {
                wb.reg = Some((*dest, self.read_spr(*sel)));
            }
            UnitOp::SprTo { sel, value } => {
                if *sel == SprSelect::Xer {
                    wb.xer = Some(Xer::from_spr(*value));
                } else {
                    wb.spr = Some((*sel, *value));
                }
            }
            UnitOp::Move { dest, value } => {
                wb.reg = Some((*dest, *value));
            }
            UnitOp::CrTo { fxm, value } => {
                wb.cr = Some((*fxm, *value));
            }
            UnitOp::Rfid { srr0, srr1 } => {
                wb.msr = Some(*srr1);
                wb.redirect = Some(srr0 & !3);
            }
            UnitOp::SysCall => {
                wb.intr = Some(Interrupt::SystemCall);
            }
            UnitOp::Ldst(_) | UnitOp::MulDiv(_) | UnitOp::Fpu(_) => {
                unreachable!("issued to their units, not executed directly")
            }
        }
        self.finish_direct(pkt, &mut wb);
        wb
    }

    fn resolve_branch(&self, pkt: &ExecPacket, req: &BranchReq, wb: &mut WbPacket) {
        let decrements = matches!(req.op, Op::BranchCond | Op::BranchLr) && req.bo & 0x4 == 0;
        let new_ctr = req.ctr.wrapping_sub(1);
        let ctr_ok = !decrements || ((new_ctr != 0) != (req.bo & 0x2 != 0));
        let cond_ok = req.op == Op::Branch || req.bo & 0x10 != 0 || {
            let wanted = req.bo & 0x8 != 0;
            req.cond_bit == wanted
        };
        let taken = ctr_ok && cond_ok;

        let fallthrough = pkt.pc.wrapping_add(pkt.insn_len);
        let actual = if taken { req.target } else { fallthrough };
        match pkt.pred_nia {
            Some(pred) if pred == actual => {}
            Some(_) => wb.redirect = Some(actual),
            None if taken => wb.redirect = Some(actual),
            None => {}
        }
        if taken {
            wb.cfar = Some(pkt.pc);
            if req.target == pkt.pc {
                trace!(pc = pkt.pc, "self-branch halt");
                wb.halt = true;
            }
        }
        if decrements {
            wb.spr = Some((SprSelect::Ram(ram_slot::CTR), new_ctr));
        }
        if req.lk {
            let lr = (SprSelect::Ram(ram_slot::LR), fallthrough);
            if wb.spr.is_none() {
                wb.spr = Some(lr);
            } else {
                wb.spr2 = Some(lr);
            }
        }
        wb.class = CommitClass::Branch;
    }
}
