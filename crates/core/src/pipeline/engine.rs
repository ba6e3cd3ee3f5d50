//! Pipeline state: the inter-stage latches and dispatch bookkeeping.
//!
//! Latches are `Option` slots between adjacent stages. A stage consumes its
//! input latch only when it can produce into a free output latch; an
//! occupied output is a structural stall that backs up naturally toward
//! Fetch. The stages themselves live in [`super::stages`] and are ticked in
//! reverse order so that a commit-side flush always precedes younger work
//! in the same cycle.

use crate::pipeline::bypass::{BypassLanes, Producers};
use crate::pipeline::packets::{DecodePacket, ExecPacket, FetchPacket, LsPacket, WbPacket};
use crate::pipeline::tags::TagFile;

/// Loadstore1 progress for the access it currently owns.
#[derive(Debug, Clone)]
pub enum LsPhase {
    /// Waiting out the translation latency.
    Translate { paddr: u64, ci: bool, left: u32 },
    /// Data-cache access in flight.
    Access { paddr: u64, ci: bool, started: bool },
    /// Finished; waiting for the completion latch to free.
    Emit(WbPacket),
}

#[derive(Debug)]
pub struct Pipeline {
    /// Next instruction address presented to the fetch path.
    pub nia: u64,
    /// Fetch1 -> Decode1.
    pub fetch_out: Option<FetchPacket>,
    /// Decode1 -> Decode2.
    pub d1_out: Option<DecodePacket>,
    /// Decode2 -> Execute1.
    pub d2_out: Option<ExecPacket>,
    /// Second half of a cracked pair, queued behind `d2_out`.
    pub crack_second: Option<ExecPacket>,
    /// Execute1 -> Loadstore1.
    pub ex_ls: Option<LsPacket>,
    /// Execute1 -> Writeback (single-cycle results).
    pub ex_wb: Option<WbPacket>,
    /// Multiply/divide completion -> Writeback.
    pub md_wb: Option<WbPacket>,
    /// Loadstore1 -> Writeback.
    pub ls_wb: Option<WbPacket>,
    /// Floating-point completion -> Writeback.
    pub fp_wb: Option<WbPacket>,
    /// Prefix word held in Decode1, waiting for its suffix.
    pub pending_prefix: Option<(u64, u32)>,
    /// The memory access Loadstore1 currently owns.
    pub ls_cur: Option<(LsPacket, LsPhase)>,
    pub tags: TagFile,
    pub producers: Producers,
    /// Next dispatch sequence number.
    pub dispatch_seq: u64,
    /// Sequence number Writeback commits next.
    pub commit_seq: u64,
}

impl Pipeline {
    pub fn new(reset_nia: u64) -> Self {
        Self {
            nia: reset_nia,
            fetch_out: None,
            d1_out: None,
            d2_out: None,
            crack_second: None,
            ex_ls: None,
            ex_wb: None,
            md_wb: None,
            ls_wb: None,
            fp_wb: None,
            pending_prefix: None,
            ls_cur: None,
            tags: TagFile::default(),
            producers: Producers::default(),
            dispatch_seq: 0,
            commit_seq: 0,
        }
    }

    /// True when no instruction is in flight past dispatch.
    pub fn drained(&self) -> bool {
        self.tags.is_empty()
    }

    /// Discards all uncommitted work and restarts fetch at `nia`.
    ///
    /// Called by Writeback after it commits a redirecting or interrupting
    /// instruction; every packet still in a latch is younger than the one
    /// just committed, so all of them go.
    pub fn flush(&mut self, nia: u64) {
        self.nia = nia;
        self.fetch_out = None;
        self.d1_out = None;
        self.d2_out = None;
        self.crack_second = None;
        self.ex_ls = None;
        self.ex_wb = None;
        self.md_wb = None;
        self.ls_wb = None;
        self.fp_wb = None;
        self.pending_prefix = None;
        self.ls_cur = None;
        self.tags.flush();
        self.producers.flush();
        self.dispatch_seq = self.commit_seq;
    }

    /// Collects the results visible in the completion latches into bypass
    /// lanes for dispatch to read.
    pub fn lanes(&self) -> BypassLanes {
        let mut lanes = BypassLanes::default();
        for slot in [&self.ex_wb, &self.md_wb, &self.ls_wb, &self.fp_wb] {
            if let Some(wb) = slot {
                if let Some((idx, value)) = wb.reg {
                    lanes.push_reg(wb.tag, idx, value);
                }
                if let Some((mask, value)) = wb.cr {
                    lanes.push_cr(wb.tag, mask, value);
                }
                if let Some(xer) = wb.xer {
                    lanes.push_xer(wb.tag, xer);
                }
            }
        }
        lanes
    }

    /// The completion latch holding the packet due to commit, if ready.
    pub fn commit_slot(&mut self) -> Option<&mut Option<WbPacket>> {
        let head = self.tags.head()?;
        let seq = self.commit_seq;
        let ready = |slot: &Option<WbPacket>| {
            slot.as_ref()
                .is_some_and(|wb| wb.tag == head && wb.seq == seq)
        };
        if ready(&self.ex_wb) {
            Some(&mut self.ex_wb)
        } else if ready(&self.md_wb) {
            Some(&mut self.md_wb)
        } else if ready(&self.ls_wb) {
            Some(&mut self.ls_wb)
        } else if ready(&self.fp_wb) {
            Some(&mut self.fp_wb)
        } else {
            None
        }
    }
}
