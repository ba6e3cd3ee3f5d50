//! Architectural state: register files, condition/carry flags, and the
//! control registers that live outside the pipeline proper.

mod cond;
mod ctrl;
mod regfile;

pub use cond::{CondReg, Xer};
pub use ctrl::CtrlRegs;
pub use regfile::RegFile;
