//! The pipeline's view of the memory system.

use crate::common::{DcacheError, MmuError};

/// Completed instruction fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchResponse {
    pub word: u32,
    /// Next-fetch hint attached to this address, if any.
    pub pred_nia: Option<u64>,
    /// The fetch could not be satisfied (instruction storage fault).
    pub failed: bool,
}

/// Instruction-side fetch path.
///
/// `poll` is called once per cycle with the current fetch address. A new
/// address restarts the access; the same address counts down the fetch
/// latency until a response is ready.
pub trait InsnCache {
    fn poll(&mut self, addr: u64) -> Option<FetchResponse>;
}

/// One physical data access of up to eight bytes.
#[derive(Debug, Clone, Copy)]
pub struct MemAccess {
    pub paddr: u64,
    pub len: u8,
    /// Store data (little-endian in the low bytes); `None` for loads.
    pub store: Option<u64>,
    /// Establish a reservation at this address.
    pub reserve: bool,
    /// Conditional store against the current reservation.
    pub cond: bool,
    /// Cache-inhibited access.
    pub ci: bool,
}

/// Result of a completed data access.
#[derive(Debug, Clone, Copy)]
pub struct DcacheOutcome {
    /// Loaded value, zero-extended; zero for stores.
    pub data: u64,
    /// Conditional-store success.
    pub cond_ok: bool,
}

/// Data-side cache. One access in flight at a time; `start` begins an
/// access, `poll` counts its latency down, `cancel` abandons it on a flush.
pub trait DataCache {
    fn start(&mut self, access: MemAccess);
    fn poll(&mut self) -> Option<Result<DcacheOutcome, DcacheError>>;
    fn cancel(&mut self);
}

/// Completed address translation.
#[derive(Debug, Clone, Copy)]
pub struct Translation {
    pub paddr: u64,
    /// Cache-inhibited mapping.
    pub ci: bool,
    /// Cycles Loadstore1 must wait before using the translation.
    pub cycles: u32,
}

/// Data-side address translation. With relocation off the address maps
/// one to one.
pub trait Mmu {
    fn translate(&mut self, vaddr: u64, is_store: bool, relocate: bool)
        -> Result<Translation, MmuError>;
}
