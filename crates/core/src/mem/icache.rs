//! A fixed-latency instruction fetch path over the shared backing store.

use std::collections::HashMap;

use super::traits::{FetchResponse, InsnCache};
use super::SharedMem;

/// Fetches complete a configurable number of cycles after they are first
/// polled. Next-fetch hints can be attached per address to exercise the
/// pipeline's predicted-path handling.
#[derive(Debug)]
pub struct SimpleICache {
    mem: SharedMem,
    latency: u32,
    pending: Option<(u64, u32)>,
    predictions: HashMap<u64, u64>,
}

impl SimpleICache {
    pub fn new(mem: SharedMem, latency: u32) -> Self {
        Self {
            mem,
            latency,
            pending: None,
            predictions: HashMap::new(),
        }
    }

    /// Attaches a next-fetch hint: fetching `addr` predicts `target` next.
    pub fn set_prediction(&mut self, addr: u64, target: u64) {
        self.predictions.insert(addr, target);
    }

    fn read_word(&self, addr: u64) -> Option<u32> {
        let mem = self.mem.borrow();
        let start = usize::try_from(addr).ok()?;
        let bytes = mem.get(start..start.checked_add(4)?)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl InsnCache for SimpleICache {
    fn poll(&mut self, addr: u64) -> Option<FetchResponse> {
        match self.pending {
            Some((a, 0)) if a == addr => {
                self.pending = None;
                let resp = match self.read_word(addr) {
                    Some(word) => FetchResponse {
                        word,
                        pred_nia: self.predictions.get(&addr).copied(),
                        failed: false,
                    },
                    None => FetchResponse {
                        word: 0,
                        pred_nia: None,
                        failed: true,
                    },
                };
                Some(resp)
            }
            Some((a, ref mut left)) if a == addr => {
                *left -= 1;
                None
            }
            _ => {
                self.pending = Some((addr, self.latency));
                if self.latency == 0 {
                    self.poll(addr)
                } else {
                    None
                }
            }
        }
    }
}
