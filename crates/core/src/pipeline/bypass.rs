//! Producer tracking and the bypass network.
//!
//! Dispatch records which in-flight tag will produce each register or flag
//! resource. When a later instruction reads a resource with an outstanding
//! producer, its value must come from a bypass lane fed by the completion
//! latches; if no lane carries the producer's result yet, dispatch stalls.
//! SPRs deliberately have no bypass lane, so SPR readers stall until the
//! producing instruction retires.

use crate::arch::Xer;
use crate::common::{RegIdx, REG_FILE_SIZE};
use crate::pipeline::tags::InsnTag;

/// One outstanding producer per register and per flag resource.
#[derive(Debug)]
pub struct Producers {
    regs: [Option<InsnTag>; REG_FILE_SIZE],
    cr: Option<InsnTag>,
    xer: Option<InsnTag>,
    spr: Option<InsnTag>,
}

impl Default for Producers {
    fn default() -> Self {
        Self {
            regs: [None; REG_FILE_SIZE],
            cr: None,
            xer: None,
            spr: None,
        }
    }
}

impl Producers {
    pub fn reg(&self, idx: RegIdx) -> Option<InsnTag> {
        self.regs[idx.index()]
    }

    pub fn cr(&self) -> Option<InsnTag> {
        self.cr
    }

    pub fn xer(&self) -> Option<InsnTag> {
        self.xer
    }

    pub fn spr(&self) -> Option<InsnTag> {
        self.spr
    }

    pub fn set_reg(&mut self, idx: RegIdx, tag: InsnTag) {
        self.regs[idx.index()] = Some(tag);
    }

    pub fn set_cr(&mut self, tag: InsnTag) {
        self.cr = Some(tag);
    }

    pub fn set_xer(&mut self, tag: InsnTag) {
        self.xer = Some(tag);
    }

    pub fn set_spr(&mut self, tag: InsnTag) {
        self.spr = Some(tag);
    }

    /// Clears every entry still naming `tag`. Called at commit; entries a
    /// younger dispatch has since overwritten are left alone.
    pub fn clear_for(&mut self, tag: InsnTag) {
        for slot in &mut self.regs {
            if *slot == Some(tag) {
                *slot = None;
            }
        }
        if self.cr == Some(tag) {
            self.cr = None;
        }
        if self.xer == Some(tag) {
            self.xer = None;
        }
        if self.spr == Some(tag) {
            self.spr = None;
        }
    }

    pub fn flush(&mut self) {
        *self = Self::default();
    }
}

/// Results visible in the completion latches this cycle, keyed by tag.
#[derive(Debug, Default)]
pub struct BypassLanes {
    regs: Vec<(InsnTag, RegIdx, u64)>,
    cr: Vec<(InsnTag, u32, u32)>,
    xer: Vec<(InsnTag, Xer)>,
}

impl BypassLanes {
    pub fn push_reg(&mut self, tag: InsnTag, idx: RegIdx, value: u64) {
        self.regs.push((tag, idx, value));
    }

    pub fn push_cr(&mut self, tag: InsnTag, mask: u32, value: u32) {
        self.cr.push((tag, mask, value));
    }

    pub fn push_xer(&mut self, tag: InsnTag, xer: Xer) {
        self.xer.push((tag, xer));
    }

    pub fn reg(&self, tag: InsnTag, idx: RegIdx) -> Option<u64> {
        self.regs
            .iter()
            .find(|(t, i, _)| *t == tag && *i == idx)
            .map(|(_, _, v)| *v)
    }

    /// Looks up a CR lane for `tag` whose written fields cover `fxm`.
    /// A lane that writes only part of the needed fields cannot satisfy
    /// the read and the consumer must keep waiting.
    pub fn cr(&self, tag: InsnTag, fxm: u32) -> Option<(u32, u32)> {
        self.cr
            .iter()
            .find(|(t, mask, _)| *t == tag && mask & fxm == fxm)
            .map(|(_, mask, v)| (*mask, *v))
    }

    pub fn xer(&self, tag: InsnTag) -> Option<Xer> {
        self.xer.iter().find(|(t, _)| *t == tag).map(|(_, x)| *x)
    }
}
