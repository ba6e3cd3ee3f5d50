//! The floating-point unit: a per-operation latency countdown, same
//! handshake as the multiply/divide unit. Arithmetic is done at issue
//! time; only the timing lives here.

use serde::Deserialize;

use crate::isa::Op;
use crate::pipeline::packets::WbPacket;

/// Completion latencies per operation class, in cycles.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FpLatencies {
    pub add: u32,
    pub mul: u32,
    pub div: u32,
    pub madd: u32,
    pub mov: u32,
}

impl Default for FpLatencies {
    fn default() -> Self {
        Self {
            add: 6,
            mul: 7,
            div: 33,
            madd: 7,
            mov: 2,
        }
    }
}

#[derive(Debug)]
pub struct FpUnit {
    latencies: FpLatencies,
    pending: Option<(u32, WbPacket)>,
}

impl FpUnit {
    pub fn new(latencies: FpLatencies) -> Self {
        Self {
            latencies,
            pending: None,
        }
    }

    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn issue(&mut self, result: WbPacket, op: Op) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let latency = match op {
            Op::FAdd | Op::FSub => self.latencies.add,
            Op::FMul => self.latencies.mul,
            Op::FDiv => self.latencies.div,
            Op::FMadd => self.latencies.madd,
            _ => self.latencies.mov,
        };
        self.pending = Some((latency, result));
        true
    }

    pub fn tick(&mut self) {
        if let Some((left, _)) = &mut self.pending {
            *left = left.saturating_sub(1);
        }
    }

    pub fn take_done(&mut self) -> Option<WbPacket> {
        match &self.pending {
            Some((0, _)) => self.pending.take().map(|(_, wb)| wb),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
