//! Cycle-level model of a pipelined, in-order, single-issue 64-bit core.
//!
//! The model is organised around a six-stage pipeline:
//! 1. **Fetch1** polls the fetch path and follows next-fetch hints.
//! 2. **Decode1** pairs instruction prefixes and performs the table lookup.
//! 3. **Decode2** resolves hazards, reads operands through the bypass
//!    network, and dispatches (cracking update-form and quadword
//!    instructions into tagged pairs).
//! 4. **Execute1** resolves branches and single-cycle integer work, and
//!    issues to the load/store and multi-cycle units.
//! 5. **Loadstore1** translates, accesses the data cache, and formats
//!    loads.
//! 6. **Writeback** commits in dispatch order and is the only stage that
//!    touches architectural state.
//!
//! Stages tick in reverse order each cycle, so commit-side flushes
//! (mispredicts, serializers, interrupts) always precede younger work and
//! interrupts stay precise.
//!
//! # Example
//!
//! ```
//! use pwrsim_core::{isa::asm, Simulator};
//!
//! let mut sim = Simulator::with_defaults(64 * 1024);
//! sim.load_program(0, &[
//!     asm::addi(3, 0, 20),
//!     asm::addi(4, 0, 22),
//!     asm::add(3, 3, 4),
//!     asm::b_rel(0), // spin: halts the core
//! ]).unwrap();
//! sim.run(1_000).unwrap();
//! assert_eq!(sim.core.cpu.regs.read_gpr(3), 42);
//! ```

pub mod arch;
pub mod common;
pub mod config;
pub mod core;
pub mod isa;
pub mod mem;
pub mod pipeline;
pub mod sim;
pub mod stats;
pub mod units;

pub use crate::core::{Core, Cpu};
pub use common::SimError;
pub use config::Config;
pub use sim::Simulator;
pub use stats::Stats;
