//! Writeback: the commit point.
//!
//! At most one completion commits per cycle: the one carrying the oldest
//! in-flight tag and the next dispatch sequence number. Everything
//! architectural happens here, in order: register and flag writes, SPR
//! writes, interrupt entry, and redirect-driven flushes. Because the
//! stages tick commit-first, a flush raised here discards all younger
//! work before it can touch architectural state.

use tracing::{debug, trace};

use crate::common::constants::MSR_INTR_CLEAR;
use crate::common::Interrupt;
use crate::core::Core;
use crate::isa::sprs::ram_slot;
use crate::mem::{DataCache, InsnCache, Mmu};
use crate::pipeline::packets::{CommitClass, WbPacket};
use crate::units::PmuEvents;

impl<I: InsnCache, D: DataCache, M: Mmu> Core<I, D, M> {
    pub(crate) fn stage_writeback(&mut self, ev: &mut PmuEvents) {
        if self.halted {
            return;
        }
        let Some(slot) = self.pl.commit_slot() else {
            return;
        };
        let Some(wb) = slot.take() else {
            return;
        };
        self.pl.commit_seq += 1;

        if let Some(intr) = wb.intr.clone() {
            self.enter_interrupt(&wb, intr);
            return;
        }

        trace!(pc = wb.pc, seq = wb.seq, "commit");
        if let Some((idx, value)) = wb.reg {
            self.cpu.regs.write(idx, value);
        }
        if let Some((mask, value)) = wb.cr {
            self.cpu.cr.merge(mask, value);
        }
        if let Some(xer) = wb.xer {
            self.cpu.xer = xer;
        }
        if let Some((sel, value)) = wb.spr {
            self.write_spr(sel, value);
        }
        if let Some((sel, value)) = wb.spr2 {
            self.write_spr(sel, value);
        }
        if let Some(msr) = wb.msr {
            self.cpu.ctrl.msr = msr;
        }
        if let Some(cfar) = wb.cfar {
            self.cpu.ctrl.cfar = cfar;
        }

        // Producers clear only when the whole instruction retires; the
        // second half of a cracked pair still owes its writes.
        if wb.last {
            self.pl.producers.clear_for(wb.tag);
            self.pl.tags.retire(wb.tag);
            ev.instructions += 1;
            self.stats.instructions += 1;
        }
        match wb.class {
            CommitClass::Load => ev.loads += 1,
            CommitClass::Store => ev.stores += 1,
            CommitClass::Branch => ev.branches += 1,
            CommitClass::Other => {}
        }

        if wb.halt {
            debug!(pc = wb.pc, "halted");
            self.halted = true;
            return;
        }
        if let Some(nia) = wb.redirect {
            trace!(from = wb.pc, to = nia, "redirect");
            self.stats.redirects += 1;
            self.flush_to(nia);
        }
    }

    /// Architectural interrupt entry for the instruction at the head of
    /// commit order.
    fn enter_interrupt(&mut self, wb: &WbPacket, intr: Interrupt) {
        debug!(pc = wb.pc, %intr, "interrupt");
        // System call saves the return address past the instruction;
        // everything else restarts (or reports) the marked one.
        let srr0 = if matches!(intr, Interrupt::SystemCall) {
            wb.pc.wrapping_add(wb.insn_len)
        } else {
            wb.pc
        };
        self.cpu.spr_ram[ram_slot::SRR0] = srr0;
        self.cpu.spr_ram[ram_slot::SRR1] = self.cpu.ctrl.msr | intr.srr1_bits();
        if let Some(dar) = intr.dar() {
            self.cpu.ctrl.dar = dar;
        }
        if let Some(dsisr) = intr.dsisr() {
            self.cpu.ctrl.dsisr = dsisr as u32;
        }
        self.cpu.ctrl.msr &= !MSR_INTR_CLEAR;
        match intr {
            Interrupt::Decrementer => self.dec_pending = false,
            Interrupt::PerformanceMonitor => self.pmu_pending = false,
            _ => {}
        }
        self.stats.interrupts += 1;
        self.flush_to(intr.vector());
    }

    /// Discards every in-flight packet and restarts fetch at `nia`.
    pub(crate) fn flush_to(&mut self, nia: u64) {
        self.pl.flush(nia);
        self.dcache.cancel();
        self.muldiv.cancel();
        self.fpu.cancel();
    }
}
