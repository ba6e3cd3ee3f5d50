//! Loadstore1: translation, the data-cache access, and load formatting.
//!
//! One access is owned at a time and walks through three phases:
//! translation wait, cache access, then emission into the completion
//! latch. Translation and cache errors become precise data-side
//! interrupts carried on the completion packet.

use tracing::trace;

use crate::common::constants::{DSISR_CI_PARADOX, DSISR_STORE, MSR_DR};
use crate::common::{DcacheError, Interrupt, MmuError};
use crate::core::Core;
use crate::mem::{DataCache, InsnCache, MemAccess, Mmu};
use crate::pipeline::engine::LsPhase;
use crate::pipeline::packets::{CommitClass, LsKind, LsPacket, WbPacket};

/// Sign- or zero-extends and optionally byte-reverses a loaded value.
fn format_load(raw: u64, len: u8, sign_ext: bool, byte_rev: bool) -> u64 {
    let value = if byte_rev {
        raw.swap_bytes() >> (64 - 8 * u32::from(len))
    } else {
        raw
    };
    if sign_ext {
        let shift = 64 - 8 * u32::from(len);
        ((value << shift) as i64 >> shift) as u64
    } else {
        value
    }
}

fn translate_fault(err: MmuError, ea: u64, is_store: bool) -> Interrupt {
    match err {
        MmuError::Segment => Interrupt::DataSegment { addr: ea },
        other => Interrupt::DataStorage {
            addr: ea,
            dsisr: other.dsisr_bits(is_store),
        },
    }
}

fn access_fault(err: DcacheError, ea: u64, is_store: bool) -> Interrupt {
    let dsisr = match err {
        DcacheError::AccessFault => {
            if is_store {
                DSISR_STORE
            } else {
                0
            }
        }
        DcacheError::Paradox => DSISR_CI_PARADOX,
    };
    Interrupt::DataStorage { addr: ea, dsisr }
}

impl<I: InsnCache, D: DataCache, M: Mmu> Core<I, D, M> {
    pub(crate) fn stage_loadstore1(&mut self) {
        self.advance_current();
        if self.pl.ls_cur.is_none() {
            if let Some(pkt) = self.pl.ex_ls.take() {
                // A store changes memory before its packet commits, so it
                // may only start once every older instruction has retired.
                // Loads are restartable and go speculatively.
                let is_store = matches!(pkt.req.kind, LsKind::Store { .. });
                let oldest = self.pl.tags.head() == Some(pkt.tag)
                    && pkt.seq == self.pl.commit_seq;
                if !is_store || oldest {
                    self.accept(pkt);
                } else {
                    self.pl.ex_ls = Some(pkt);
                }
            }
        }
    }

    fn accept(&mut self, pkt: LsPacket) {
        let is_store = matches!(pkt.req.kind, LsKind::Store { .. });
        let relocate = self.cpu.ctrl.msr & MSR_DR != 0;
        let phase = match self.mmu.translate(pkt.req.ea, is_store, relocate) {
            Ok(tr) => {
                trace!(ea = pkt.req.ea, paddr = tr.paddr, "translate");
                if tr.cycles == 0 {
                    LsPhase::Access {
                        paddr: tr.paddr,
                        ci: tr.ci,
                        started: false,
                    }
                } else {
                    LsPhase::Translate {
                        paddr: tr.paddr,
                        ci: tr.ci,
                        left: tr.cycles,
                    }
                }
            }
            Err(err) => {
                trace!(ea = pkt.req.ea, ?err, "translate fault");
                let mut wb = WbPacket::empty_ls(&pkt);
                wb.intr = Some(translate_fault(err, pkt.req.ea, is_store));
                LsPhase::Emit(wb)
            }
        };
        self.pl.ls_cur = Some((pkt, phase));
    }

    fn advance_current(&mut self) {
        let Some((pkt, phase)) = self.pl.ls_cur.take() else {
            return;
        };
        let next = match phase {
            LsPhase::Translate { paddr, ci, left } => {
                if left > 1 {
                    Some(LsPhase::Translate {
                        paddr,
                        ci,
                        left: left - 1,
                    })
                } else {
                    Some(LsPhase::Access {
                        paddr,
                        ci,
                        started: false,
                    })
                }
            }
            LsPhase::Access {
                paddr,
                ci,
                started: false,
            } => {
                let store = match pkt.req.kind {
                    LsKind::Store { value, byte_rev } => Some(if byte_rev {
                        value.swap_bytes() >> (64 - 8 * u32::from(pkt.req.len))
                    } else {
                        value
                    }),
                    LsKind::Load { .. } => None,
                };
                self.dcache.start(MemAccess {
                    paddr,
                    len: pkt.req.len,
                    store,
                    reserve: pkt.req.reserve,
                    cond: pkt.req.cond,
                    ci,
                });
                Some(LsPhase::Access {
                    paddr,
                    ci,
                    started: true,
                })
            }
            LsPhase::Access {
                paddr,
                ci,
                started: true,
            } => match self.dcache.poll() {
                None => Some(LsPhase::Access {
                    paddr,
                    ci,
                    started: true,
                }),
                Some(result) => Some(LsPhase::Emit(self.complete(&pkt, result))),
            },
            LsPhase::Emit(wb) => {
                if self.pl.ls_wb.is_none() {
                    self.pl.ls_wb = Some(wb);
                    None
                } else {
                    Some(LsPhase::Emit(wb))
                }
            }
        };
        if let Some(phase) = next {
            self.pl.ls_cur = Some((pkt, phase));
        }
    }

    fn complete(
        &self,
        pkt: &LsPacket,
        result: Result<crate::mem::DcacheOutcome, DcacheError>,
    ) -> WbPacket {
        let mut wb = WbPacket::empty_ls(pkt);
        let is_store = matches!(pkt.req.kind, LsKind::Store { .. });
        match result {
            Err(err) => {
                wb.intr = Some(access_fault(err, pkt.req.ea, is_store));
            }
            Ok(outcome) => match pkt.req.kind {
                LsKind::Load {
                    dest,
                    sign_ext,
                    byte_rev,
                } => {
                    let value = format_load(outcome.data, pkt.req.len, sign_ext, byte_rev);
                    wb.reg = Some((dest, value));
                    wb.class = CommitClass::Load;
                }
                LsKind::Store { .. } => {
                    wb.class = CommitClass::Store;
                    if pkt.req.cond {
                        // CR0: EQ on success, plus the SO copy.
                        let mut nibble = if outcome.cond_ok { 0x2u32 } else { 0 };
                        if pkt.req.so {
                            nibble |= 0x1;
                        }
                        wb.cr = Some((0x80, nibble << 28));
                    }
                }
            },
        }
        wb
    }
}
