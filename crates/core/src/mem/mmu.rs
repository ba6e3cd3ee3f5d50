//! A flat page-map MMU.
//!
//! With relocation off, addresses map one to one at zero cost. With
//! relocation on, a 4 KiB page map drives the translation and each miss
//! class maps to one of the architected data-storage fault causes.

use std::collections::HashMap;

use super::traits::{Mmu, Translation};
use crate::common::MmuError;

pub const PAGE_SHIFT: u64 = 12;

/// Per-page mapping attributes.
#[derive(Debug, Clone, Copy)]
pub struct PageFlags {
    pub paddr: u64,
    pub writable: bool,
    /// Cache-inhibited mapping.
    pub ci: bool,
    /// Reference/change update required; the first access faults.
    pub rc_pending: bool,
    /// Mapping present but malformed (bad page-table entry).
    pub malformed: bool,
}

#[derive(Debug, Default)]
pub struct FlatMmu {
    pages: HashMap<u64, PageFlags>,
    latency: u32,
    /// Highest mapped segment; virtual addresses above fault as segment
    /// misses rather than page misses.
    segment_limit: u64,
}

impl FlatMmu {
    pub fn new(latency: u32, segment_limit: u64) -> Self {
        Self {
            pages: HashMap::new(),
            latency,
            segment_limit,
        }
    }

    pub fn map(&mut self, vaddr: u64, flags: PageFlags) {
        self.pages.insert(vaddr >> PAGE_SHIFT, flags);
    }
}

impl Mmu for FlatMmu {
    fn translate(
        &mut self,
        vaddr: u64,
        is_store: bool,
        relocate: bool,
    ) -> Result<Translation, MmuError> {
        if !relocate {
            return Ok(Translation {
                paddr: vaddr,
                ci: false,
                cycles: 0,
            });
        }
        if vaddr >= self.segment_limit {
            return Err(MmuError::Segment);
        }
        let entry = self.pages.get_mut(&(vaddr >> PAGE_SHIFT)).ok_or(MmuError::Invalid)?;
        if entry.malformed {
            return Err(MmuError::BadPageTable);
        }
        if is_store && !entry.writable {
            return Err(MmuError::Permission);
        }
        if entry.rc_pending {
            entry.rc_pending = false;
            return Err(MmuError::RefChange);
        }
        Ok(Translation {
            paddr: entry.paddr | (vaddr & ((1 << PAGE_SHIFT) - 1)),
            ci: entry.ci,
            cycles: self.latency,
        })
    }
}
