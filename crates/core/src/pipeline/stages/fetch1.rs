//! Fetch1: polls the fetch path at the current NIA and follows any
//! next-fetch hint it returns. Fetch faults become packets so the fault is
//! reported precisely, at commit, and only if the fetch path turns out to
//! be the architected one.

use tracing::trace;

use crate::common::constants::INSN_BYTES;
use crate::common::Interrupt;
use crate::core::Core;
use crate::mem::{DataCache, InsnCache, Mmu};
use crate::pipeline::packets::FetchPacket;

impl<I: InsnCache, D: DataCache, M: Mmu> Core<I, D, M> {
    pub(crate) fn stage_fetch1(&mut self) {
        if self.halted || self.pl.fetch_out.is_some() {
            return;
        }
        let pc = self.pl.nia;
        let Some(resp) = self.icache.poll(pc) else {
            return;
        };
        if resp.failed {
            trace!(pc, "fetch fault");
            self.pl.fetch_out = Some(FetchPacket {
                pc,
                word: 0,
                pred_nia: None,
                fault: Some(Interrupt::InstructionStorage),
            });
            self.pl.nia = pc.wrapping_add(INSN_BYTES);
            return;
        }
        trace!(pc, word = resp.word, "fetch");
        self.pl.nia = resp.pred_nia.unwrap_or(pc.wrapping_add(INSN_BYTES));
        self.pl.fetch_out = Some(FetchPacket {
            pc,
            word: resp.word,
            pred_nia: resp.pred_nia,
            fault: None,
        });
    }
}
