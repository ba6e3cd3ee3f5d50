//! Run statistics collected at commit.

use serde::Serialize;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Stats {
    /// Cycles simulated.
    pub cycles: u64,
    /// Instructions retired (cracked pairs count once).
    pub instructions: u64,
    /// Commit-side redirects (mispredicts, serializers, `rfid`).
    pub redirects: u64,
    /// Interrupts taken.
    pub interrupts: u64,
}

impl Stats {
    /// Instructions per cycle over the whole run.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions as f64 / self.cycles as f64
        }
    }
}
