//! A fixed-latency data cache over the shared backing store, with
//! reservation tracking for the atomic sequences.

use super::traits::{DataCache, DcacheOutcome, MemAccess};
use super::SharedMem;
use crate::common::DcacheError;

/// Reservation granule size in bytes.
const GRANULE: u64 = 64;

#[derive(Debug)]
pub struct SimpleDcache {
    mem: SharedMem,
    latency: u32,
    pending: Option<(MemAccess, u32)>,
    reservation: Option<u64>,
}

impl SimpleDcache {
    pub fn new(mem: SharedMem, latency: u32) -> Self {
        Self {
            mem,
            latency,
            pending: None,
            reservation: None,
        }
    }

    pub fn has_reservation(&self) -> bool {
        self.reservation.is_some()
    }

    fn perform(&mut self, access: MemAccess) -> Result<DcacheOutcome, DcacheError> {
        if access.ci && access.reserve {
            // Reservation on a cache-inhibited mapping is unsupported.
            return Err(DcacheError::Paradox);
        }
        let len = usize::from(access.len);
        let start = usize::try_from(access.paddr).map_err(|_| DcacheError::AccessFault)?;
        let end = start.checked_add(len).ok_or(DcacheError::AccessFault)?;
        if end > self.mem.borrow().len() {
            return Err(DcacheError::AccessFault);
        }

        if access.cond {
            let granule = access.paddr & !(GRANULE - 1);
            let ok = self.reservation == Some(granule);
            self.reservation = None;
            if !ok {
                return Ok(DcacheOutcome {
                    data: 0,
                    cond_ok: false,
                });
            }
        }
        if access.reserve {
            self.reservation = Some(access.paddr & !(GRANULE - 1));
        }

        match access.store {
            Some(value) => {
                let bytes = value.to_le_bytes();
                self.mem.borrow_mut()[start..end].copy_from_slice(&bytes[..len]);
                Ok(DcacheOutcome {
                    data: 0,
                    cond_ok: true,
                })
            }
            None => {
                let mut bytes = [0u8; 8];
                bytes[..len].copy_from_slice(&self.mem.borrow()[start..end]);
                Ok(DcacheOutcome {
                    data: u64::from_le_bytes(bytes),
                    cond_ok: true,
                })
            }
        }
    }
}

impl DataCache for SimpleDcache {
    fn start(&mut self, access: MemAccess) {
        self.pending = Some((access, self.latency));
    }

    fn poll(&mut self) -> Option<Result<DcacheOutcome, DcacheError>> {
        match self.pending {
            Some((access, 0)) => {
                self.pending = None;
                Some(self.perform(access))
            }
            Some((_, ref mut left)) => {
                *left -= 1;
                None
            }
            None => None,
        }
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}
