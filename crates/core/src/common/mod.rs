//! Common types shared across the core: constants, register indexing,
//! and the interrupt/error taxonomy.

pub mod constants;
pub mod error;
pub mod reg;

pub use error::{DcacheError, Interrupt, MmuError, ProgramCause, SimError};
pub use reg::{RegIdx, REG_FILE_SIZE};
