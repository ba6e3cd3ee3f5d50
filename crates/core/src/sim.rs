//! The host-facing simulator: wires a core to the simple memory-side
//! collaborators and drives it to completion.

use tracing::info;

use crate::common::constants::INSN_BYTES;
use crate::common::SimError;
use crate::config::Config;
use crate::core::Core;
use crate::mem::{shared_mem, FlatMmu, SharedMem, SimpleDcache, SimpleICache};
use crate::units::{FpUnit, MulDivUnit};

/// A single simulated core with flat backing memory.
#[derive(Debug)]
pub struct Simulator {
    pub core: Core<SimpleICache, SimpleDcache, FlatMmu>,
    mem: SharedMem,
}

impl Simulator {
    pub fn new(config: &Config) -> Self {
        let mem = shared_mem(config.mem_size);
        let core = Core::new(
            SimpleICache::new(mem.clone(), config.icache_latency),
            SimpleDcache::new(mem.clone(), config.dcache_latency),
            FlatMmu::new(config.mmu_latency, config.segment_limit),
            MulDivUnit::new(config.mul_latency, config.div_latency),
            FpUnit::new(config.fp_latencies),
            config.reset_nia,
            config.decode_redirect,
        );
        Self { core, mem }
    }

    /// A simulator with default timing and `mem_size` bytes of memory.
    pub fn with_defaults(mem_size: usize) -> Self {
        Self::new(&Config {
            mem_size,
            ..Config::default()
        })
    }

    /// Writes raw bytes into backing memory.
    pub fn load_image(&mut self, base: u64, bytes: &[u8]) -> Result<(), SimError> {
        let mut mem = self.mem.borrow_mut();
        let start = usize::try_from(base).unwrap_or(usize::MAX);
        let end = start.checked_add(bytes.len());
        match end {
            Some(end) if end <= mem.len() => {
                mem[start..end].copy_from_slice(bytes);
                Ok(())
            }
            _ => Err(SimError::ImageOutOfRange {
                base,
                len: bytes.len(),
                mem_size: mem.len(),
            }),
        }
    }

    /// Writes a program of instruction words at `base`.
    pub fn load_program(&mut self, base: u64, words: &[u32]) -> Result<(), SimError> {
        for (i, word) in words.iter().enumerate() {
            self.load_image(base + i as u64 * INSN_BYTES, &word.to_le_bytes())?;
        }
        Ok(())
    }

    /// Advances one cycle.
    pub fn step(&mut self) {
        self.core.tick();
    }

    /// Runs until the core halts, or fails after `max_cycles`.
    pub fn run(&mut self, max_cycles: u64) -> Result<u64, SimError> {
        let start = self.core.stats.cycles;
        while self.core.stats.cycles - start < max_cycles {
            if self.core.halted {
                let cycles = self.core.stats.cycles - start;
                info!(
                    cycles,
                    instructions = self.core.stats.instructions,
                    ipc = self.core.stats.ipc(),
                    "halted"
                );
                return Ok(cycles);
            }
            self.core.tick();
        }
        Err(SimError::CycleLimit { limit: max_cycles })
    }

    /// Shared handle to backing memory, for inspection.
    pub fn mem(&self) -> SharedMem {
        self.mem.clone()
    }
}
