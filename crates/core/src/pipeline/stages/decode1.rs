//! Decode1: table lookup and prefix pairing.
//!
//! A prefix word is held here until its suffix arrives; the pair leaves as
//! one packet carrying the prefix alongside the suffix word. Undecodable
//! words and malformed prefixes leave as no-op packets carrying a program
//! interrupt, so fault reporting stays precise.
//!
//! When enabled, unconditional direct branches steer fetch from here, the
//! second of the two redirect sources into Fetch1. The authoritative one at
//! Writeback ticks earlier in the cycle and wins any conflict.

use tracing::trace;

use crate::common::constants::{FETCH_BLOCK_BYTES, INSN_BYTES};
use crate::common::{Interrupt, ProgramCause};
use crate::core::Core;
use crate::isa::table::{self, PREFIX_MAJOR};
use crate::isa::{fields, InsnControl, Op};
use crate::mem::{DataCache, InsnCache, Mmu};
use crate::pipeline::packets::{DecodePacket, FetchPacket};

fn illegal(pkt: &FetchPacket, prefix: Option<u32>, pc: u64) -> DecodePacket {
    DecodePacket {
        pc,
        word: pkt.word,
        prefix,
        ctrl: &table::NOOP,
        pred_nia: pkt.pred_nia,
        fault: Some(Interrupt::Program(ProgramCause::Illegal)),
    }
}

fn decoded(pkt: &FetchPacket, prefix: Option<u32>, pc: u64, ctrl: &'static InsnControl) -> DecodePacket {
    DecodePacket {
        pc,
        word: pkt.word,
        prefix,
        ctrl,
        pred_nia: pkt.pred_nia,
        fault: None,
    }
}

impl<I: InsnCache, D: DataCache, M: Mmu> Core<I, D, M> {
    pub(crate) fn stage_decode1(&mut self) {
        if self.pl.d1_out.is_some() {
            return;
        }
        let Some(pkt) = self.pl.fetch_out.take() else {
            return;
        };

        if let Some(fault) = pkt.fault {
            self.pl.pending_prefix = None;
            self.pl.d1_out = Some(DecodePacket {
                pc: pkt.pc,
                word: pkt.word,
                prefix: None,
                ctrl: &table::NOOP,
                pred_nia: None,
                fault: Some(fault),
            });
            return;
        }

        let major = fields::major(pkt.word);

        // A held prefix makes this word the suffix.
        if let Some((prefix_pc, prefix_word)) = self.pl.pending_prefix.take() {
            let out = if major == PREFIX_MAJOR {
                // Prefix followed by another prefix.
                illegal(&pkt, Some(prefix_word), prefix_pc)
            } else {
                match table::decode(pkt.word) {
                    Some(ctrl) if ctrl.prefixable => {
                        trace!(pc = prefix_pc, word = pkt.word, "decode prefixed");
                        decoded(&pkt, Some(prefix_word), prefix_pc, ctrl)
                    }
                    _ => illegal(&pkt, Some(prefix_word), prefix_pc),
                }
            };
            self.pl.d1_out = Some(out);
            return;
        }

        if major == PREFIX_MAJOR {
            if pkt.pc % FETCH_BLOCK_BYTES == FETCH_BLOCK_BYTES - INSN_BYTES {
                // The suffix would sit in the next fetch block.
                self.pl.d1_out = Some(DecodePacket {
                    pc: pkt.pc,
                    word: pkt.word,
                    prefix: None,
                    ctrl: &table::NOOP,
                    pred_nia: pkt.pred_nia,
                    fault: Some(Interrupt::Alignment {
                        addr: pkt.pc,
                        prefix_cross: true,
                    }),
                });
            } else if fields::prefix_subtype(pkt.word) != 0 {
                self.pl.d1_out = Some(illegal(&pkt, None, pkt.pc));
            } else {
                self.pl.pending_prefix = Some((pkt.pc, pkt.word));
            }
            return;
        }

        let out = match table::decode(pkt.word) {
            Some(ctrl) => {
                trace!(pc = pkt.pc, word = pkt.word, "decode");
                let mut out = decoded(&pkt, None, pkt.pc, ctrl);
                if self.decode_redirect && ctrl.op == Op::Branch {
                    // Unconditional direct branch: the target is known from
                    // the word alone, so fetch is steered here. Writeback's
                    // flush runs earlier in the cycle and stays
                    // authoritative. No younger packet is in a latch yet,
                    // so steering the NIA is the whole squash.
                    let disp = fields::li26(pkt.word) as u64;
                    let target = if fields::aa(pkt.word) {
                        disp
                    } else {
                        pkt.pc.wrapping_add(disp)
                    };
                    trace!(pc = pkt.pc, target, "decode redirect");
                    out.pred_nia = Some(target);
                    self.pl.nia = target;
                }
                out
            }
            None => illegal(&pkt, None, pkt.pc),
        };
        self.pl.d1_out = Some(out);
    }
}
