//! Machine-state and timing registers.

use crate::common::constants::MSR_RESET;

/// MSR, timebase, decrementer, and the fault-reporting registers. These are
/// read and written only at commit or by the interrupt machinery, so they
/// live outside the pipeline latches.
#[derive(Debug, Clone)]
pub struct CtrlRegs {
    pub msr: u64,
    pub tb: u64,
    pub dec: u64,
    pub dar: u64,
    pub dsisr: u32,
    pub cfar: u64,
}

impl Default for CtrlRegs {
    fn default() -> Self {
        Self {
            msr: MSR_RESET,
            tb: 0,
            dec: 0,
            dar: 0,
            dsisr: 0,
            cfar: 0,
        }
    }
}

impl CtrlRegs {
    /// Advances the timebase and decrementer by one tick. Returns true on
    /// the cycle the decrementer sign bit goes from 0 to 1, which is the
    /// decrementer interrupt request edge.
    pub fn tick_timers(&mut self) -> bool {
        self.tb = self.tb.wrapping_add(1);
        let before = self.dec;
        self.dec = self.dec.wrapping_sub(1);
        before & (1 << 63) == 0 && self.dec & (1 << 63) != 0
    }
}
