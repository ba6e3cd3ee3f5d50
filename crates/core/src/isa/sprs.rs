//! Special-purpose register numbers and storage routing.
//!
//! Routing is a pure function of the SPR number: a small set of
//! frequently-written SPRs live in a dedicated RAM bank, the XER extension
//! bits live with the condition register, the remaining machine-state SPRs
//! live in the control record, and the performance-monitor SPRs belong to
//! the PMU collaborator.

/// XER (carry/overflow extension record).
pub const SPR_XER: u32 = 1;
/// Link register.
pub const SPR_LR: u32 = 8;
/// Count register.
pub const SPR_CTR: u32 = 9;
/// Data storage interrupt status register.
pub const SPR_DSISR: u32 = 18;
/// Data address register (faulting effective address).
pub const SPR_DAR: u32 = 19;
/// Decrementer.
pub const SPR_DEC: u32 = 22;
/// Saved address on interrupt entry.
pub const SPR_SRR0: u32 = 26;
/// Saved machine state on interrupt entry.
pub const SPR_SRR1: u32 = 27;
/// Come-from address register (updated by taken branches).
pub const SPR_CFAR: u32 = 28;
/// Software-use scratch register 0.
pub const SPR_SPRG0: u32 = 272;
/// Software-use scratch register 1.
pub const SPR_SPRG1: u32 = 273;
/// Timebase (read-only).
pub const SPR_TB: u32 = 268;
/// Processor version register (read-only).
pub const SPR_PVR: u32 = 287;
/// Performance monitor counters 1..4.
pub const SPR_PMC1: u32 = 771;
/// Performance monitor counter 2.
pub const SPR_PMC2: u32 = 772;
/// Performance monitor counter 3.
pub const SPR_PMC3: u32 = 773;
/// Performance monitor counter 4.
pub const SPR_PMC4: u32 = 774;
/// Performance monitor control register 0.
pub const SPR_MMCR0: u32 = 779;

/// Number of slots in the dedicated SPR RAM bank.
pub const SPR_RAM_SIZE: usize = 6;

/// Slot assignments within the SPR RAM bank.
pub mod ram_slot {
    /// Link register slot.
    pub const LR: usize = 0;
    /// Count register slot.
    pub const CTR: usize = 1;
    /// SRR0 slot.
    pub const SRR0: usize = 2;
    /// SRR1 slot.
    pub const SRR1: usize = 3;
    /// SPRG0 slot.
    pub const SPRG0: usize = 4;
    /// SPRG1 slot.
    pub const SPRG1: usize = 5;
}

/// Resolved storage location for an SPR access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SprSelect {
    /// Slot in the dedicated SPR RAM bank.
    Ram(usize),
    /// XER extension record (stored with the condition register).
    Xer,
    /// Timebase in the control record (read-only).
    Tb,
    /// Decrementer in the control record.
    Dec,
    /// DAR in the control record.
    Dar,
    /// DSISR in the control record.
    Dsisr,
    /// CFAR in the control record.
    Cfar,
    /// Processor version (read-only constant).
    Pvr,
    /// A performance-monitor SPR, handled by the PMU collaborator.
    Pmu(u32),
}

/// Maps an SPR number to its storage location. `None` means the number is
/// unimplemented and the access raises an illegal-instruction fault.
pub fn route(spr: u32) -> Option<SprSelect> {
    match spr {
        SPR_XER => Some(SprSelect::Xer),
        SPR_LR => Some(SprSelect::Ram(ram_slot::LR)),
        SPR_CTR => Some(SprSelect::Ram(ram_slot::CTR)),
        SPR_SRR0 => Some(SprSelect::Ram(ram_slot::SRR0)),
        SPR_SRR1 => Some(SprSelect::Ram(ram_slot::SRR1)),
        SPR_SPRG0 => Some(SprSelect::Ram(ram_slot::SPRG0)),
        SPR_SPRG1 => Some(SprSelect::Ram(ram_slot::SPRG1)),
        SPR_DSISR => Some(SprSelect::Dsisr),
        SPR_DAR => Some(SprSelect::Dar),
        SPR_DEC => Some(SprSelect::Dec),
        SPR_CFAR => Some(SprSelect::Cfar),
        SPR_TB => Some(SprSelect::Tb),
        SPR_PVR => Some(SprSelect::Pvr),
        SPR_PMC1..=SPR_PMC4 | SPR_MMCR0 => Some(SprSelect::Pmu(spr)),
        _ => None,
    }
}

/// Whether an SPR may only be accessed in privileged state.
pub fn is_privileged(spr: u32) -> bool {
    !matches!(spr, SPR_XER | SPR_LR | SPR_CTR | SPR_TB)
}

/// Whether an SPR rejects `mtspr` (read-only).
pub fn is_read_only(spr: u32) -> bool {
    matches!(spr, SPR_TB | SPR_PVR)
}
