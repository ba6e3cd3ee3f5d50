//! The performance monitor.
//!
//! Four counters fed by commit-side events, a freeze bit, and an optional
//! interrupt when a counter's sign bit sets.

/// MMCR0 freeze-counters bit.
pub const MMCR0_FC: u64 = 1 << 31;
/// MMCR0 performance-monitor interrupt enable.
pub const MMCR0_PMIE: u64 = 1 << 26;

/// Events observed during one cycle's commit.
#[derive(Debug, Default, Clone, Copy)]
pub struct PmuEvents {
    pub instructions: u32,
    pub loads: u32,
    pub stores: u32,
    pub branches: u32,
}

/// PMC1 counts instructions, PMC2 loads, PMC3 stores, PMC4 branches.
#[derive(Debug, Default)]
pub struct Pmu {
    pmc: [u32; 4],
    mmcr0: u64,
}

impl Pmu {
    /// Accumulates one cycle's events. Returns true while an enabled
    /// counter has its sign bit set (level-sensitive interrupt request).
    pub fn tick(&mut self, ev: &PmuEvents) -> bool {
        if self.mmcr0 & MMCR0_FC == 0 {
            self.pmc[0] = self.pmc[0].wrapping_add(ev.instructions);
            self.pmc[1] = self.pmc[1].wrapping_add(ev.loads);
            self.pmc[2] = self.pmc[2].wrapping_add(ev.stores);
            self.pmc[3] = self.pmc[3].wrapping_add(ev.branches);
        }
        self.mmcr0 & MMCR0_PMIE != 0 && self.pmc.iter().any(|c| c & 0x8000_0000 != 0)
    }

    /// Reads a PMU SPR by architected number.
    pub fn read(&self, spr: u32) -> u64 {
        match spr {
            771..=774 => u64::from(self.pmc[(spr - 771) as usize]),
            779 => self.mmcr0,
            _ => 0,
        }
    }

    pub fn write(&mut self, spr: u32, value: u64) {
        match spr {
            771..=774 => self.pmc[(spr - 771) as usize] = value as u32,
            779 => self.mmcr0 = value,
            _ => {}
        }
    }
}
