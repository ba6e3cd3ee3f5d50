//! Multi-cycle functional units and the performance monitor.

mod fpu;
mod muldiv;
mod pmu;

pub use fpu::{FpLatencies, FpUnit};
pub use muldiv::MulDivUnit;
pub use pmu::{Pmu, PmuEvents, MMCR0_FC, MMCR0_PMIE};
