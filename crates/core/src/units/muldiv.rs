//! The multiply/divide unit.
//!
//! Results are computed at issue and held for the configured latency, so
//! the unit itself is a countdown with a valid/busy handshake. One request
//! in flight at a time; Execute1 stalls while the unit is busy.

use crate::pipeline::packets::WbPacket;

#[derive(Debug)]
pub struct MulDivUnit {
    mul_latency: u32,
    div_latency: u32,
    pending: Option<(u32, WbPacket)>,
}

impl MulDivUnit {
    pub fn new(mul_latency: u32, div_latency: u32) -> Self {
        Self {
            mul_latency,
            div_latency,
            pending: None,
        }
    }

    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Accepts a completed result to surface after the operation's latency.
    /// Returns false (and drops nothing) when the unit is busy.
    pub fn issue(&mut self, result: WbPacket, is_div: bool) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let latency = if is_div {
            self.div_latency
        } else {
            self.mul_latency
        };
        self.pending = Some((latency, result));
        true
    }

    pub fn tick(&mut self) {
        if let Some((left, _)) = &mut self.pending {
            *left = left.saturating_sub(1);
        }
    }

    /// Takes the finished result, if its latency has elapsed.
    pub fn take_done(&mut self) -> Option<WbPacket> {
        match &self.pending {
            Some((0, _)) => self.pending.take().map(|(_, wb)| wb),
            _ => None,
        }
    }

    /// Drops any in-flight work (pipeline flush).
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
