//! The core: architectural state, the pipeline, and its collaborators.
//!
//! [`Core::tick`] advances everything one cycle. Stages run in reverse
//! order so that a flush raised at commit takes effect before younger
//! stages do this cycle's work, which is what keeps interrupts precise.

use tracing::debug;

use crate::arch::{CondReg, CtrlRegs, RegFile, Xer};
use crate::common::constants::{MSR_EE, PVR_VALUE};
use crate::common::Interrupt;
use crate::isa::sprs::SPR_RAM_SIZE;
use crate::isa::SprSelect;
use crate::mem::{DataCache, InsnCache, Mmu};
use crate::pipeline::Pipeline;
use crate::stats::Stats;
use crate::units::{FpUnit, MulDivUnit, Pmu, PmuEvents};

/// Architectural register state.
#[derive(Debug, Default)]
pub struct Cpu {
    pub regs: RegFile,
    pub cr: CondReg,
    pub xer: Xer,
    /// The RAM-backed SPR bank (LR, CTR, SRR0/1, SPRG0/1).
    pub spr_ram: [u64; SPR_RAM_SIZE],
    pub ctrl: CtrlRegs,
}

/// One core: CPU state plus pipeline plus memory-side collaborators.
#[derive(Debug)]
pub struct Core<I, D, M> {
    pub cpu: Cpu,
    pub pl: Pipeline,
    pub icache: I,
    pub dcache: D,
    pub mmu: M,
    pub muldiv: MulDivUnit,
    pub fpu: FpUnit,
    pub pmu: Pmu,
    /// External interrupt request line (level-sensitive).
    pub ext_irq: bool,
    /// Decode1 may steer fetch for unconditional direct branches.
    pub(crate) decode_redirect: bool,
    pub(crate) dec_pending: bool,
    pub(crate) pmu_pending: bool,
    /// Set when a committed branch targets its own address.
    pub halted: bool,
    pub stats: Stats,
}

impl<I: InsnCache, D: DataCache, M: Mmu> Core<I, D, M> {
    pub fn new(
        icache: I,
        dcache: D,
        mmu: M,
        muldiv: MulDivUnit,
        fpu: FpUnit,
        reset_nia: u64,
        decode_redirect: bool,
    ) -> Self {
        Self {
            cpu: Cpu::default(),
            pl: Pipeline::new(reset_nia),
            icache,
            dcache,
            mmu,
            muldiv,
            fpu,
            pmu: Pmu::default(),
            ext_irq: false,
            decode_redirect,
            dec_pending: false,
            pmu_pending: false,
            halted: false,
            stats: Stats::default(),
        }
    }

    /// Advances the core by one cycle.
    pub fn tick(&mut self) {
        let mut ev = PmuEvents::default();
        self.stage_writeback(&mut ev);
        self.collect_completions();
        self.stage_loadstore1();
        self.stage_execute1();
        self.stage_decode2();
        self.stage_decode1();
        self.stage_fetch1();
        self.muldiv.tick();
        self.fpu.tick();
        if self.cpu.ctrl.tick_timers() {
            debug!("decrementer underflow");
            self.dec_pending = true;
        }
        if self.pmu.tick(&ev) {
            self.pmu_pending = true;
        }
        self.stats.cycles += 1;
    }

    /// Moves finished multi-cycle results into their completion latches.
    fn collect_completions(&mut self) {
        if self.pl.md_wb.is_none() {
            if let Some(wb) = self.muldiv.take_done() {
                self.pl.md_wb = Some(wb);
            }
        }
        if self.pl.fp_wb.is_none() {
            if let Some(wb) = self.fpu.take_done() {
                self.pl.fp_wb = Some(wb);
            }
        }
    }

    /// Highest-priority deliverable asynchronous interrupt, if any.
    pub(crate) fn pending_async(&self) -> Option<Interrupt> {
        if self.cpu.ctrl.msr & MSR_EE == 0 {
            return None;
        }
        if self.ext_irq {
            Some(Interrupt::External)
        } else if self.dec_pending {
            Some(Interrupt::Decrementer)
        } else if self.pmu_pending {
            Some(Interrupt::PerformanceMonitor)
        } else {
            None
        }
    }

    /// Reads an SPR at execute time. Dispatch has already stalled out any
    /// in-flight SPR writer.
    pub(crate) fn read_spr(&self, sel: SprSelect) -> u64 {
        match sel {
            SprSelect::Ram(slot) => self.cpu.spr_ram[slot],
            SprSelect::Xer => self.cpu.xer.to_spr(),
            SprSelect::Tb => self.cpu.ctrl.tb,
            SprSelect::Dec => self.cpu.ctrl.dec,
            SprSelect::Dar => self.cpu.ctrl.dar,
            SprSelect::Dsisr => u64::from(self.cpu.ctrl.dsisr),
            SprSelect::Cfar => self.cpu.ctrl.cfar,
            SprSelect::Pvr => PVR_VALUE,
            SprSelect::Pmu(spr) => self.pmu.read(spr),
        }
    }

    /// Applies a committed SPR write.
    pub(crate) fn write_spr(&mut self, sel: SprSelect, value: u64) {
        match sel {
            SprSelect::Ram(slot) => self.cpu.spr_ram[slot] = value,
            SprSelect::Xer => self.cpu.xer = Xer::from_spr(value),
            SprSelect::Dec => {
                self.cpu.ctrl.dec = value;
                // Reloading the decrementer withdraws its request.
                self.dec_pending = false;
            }
            SprSelect::Dar => self.cpu.ctrl.dar = value,
            SprSelect::Dsisr => self.cpu.ctrl.dsisr = value as u32,
            SprSelect::Cfar => self.cpu.ctrl.cfar = value,
            // Read-only targets are rejected at decode.
            SprSelect::Tb | SprSelect::Pvr => {}
            SprSelect::Pmu(spr) => self.pmu.write(spr, value),
        }
    }
}
