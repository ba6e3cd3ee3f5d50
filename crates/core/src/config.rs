//! Simulator configuration.
//!
//! Deserialized from JSON; every field has a default so configurations
//! only name what they change.

use serde::Deserialize;

use crate::common::SimError;
use crate::units::FpLatencies;

/// Timing and sizing knobs for a simulated core.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backing memory size in bytes.
    pub mem_size: usize,
    /// Address fetch starts from at reset.
    pub reset_nia: u64,
    /// Instruction fetch latency in cycles.
    pub icache_latency: u32,
    /// Data access latency in cycles.
    pub dcache_latency: u32,
    /// Translation latency in cycles (relocated accesses only).
    pub mmu_latency: u32,
    /// Highest translatable virtual address.
    pub segment_limit: u64,
    /// Multiply completion latency in cycles.
    pub mul_latency: u32,
    /// Divide completion latency in cycles.
    pub div_latency: u32,
    /// Steer fetch from Decode1 for unconditional direct branches. Commit
    /// keeps the authoritative redirect either way.
    pub decode_redirect: bool,
    /// Floating-point completion latencies.
    pub fp_latencies: FpLatencies,
}

mod defaults {
    /// 64 KiB of backing memory.
    pub const MEM_SIZE: usize = 64 * 1024;
    /// Fetch starts at address zero.
    pub const RESET_NIA: u64 = 0;
    /// One-cycle fetch.
    pub const ICACHE_LATENCY: u32 = 1;
    /// Two-cycle data access.
    pub const DCACHE_LATENCY: u32 = 2;
    /// Three-cycle relocated translation.
    pub const MMU_LATENCY: u32 = 3;
    /// One mapped terabyte of virtual space.
    pub const SEGMENT_LIMIT: u64 = 1 << 40;
    /// Multiply completes in 4 cycles.
    pub const MUL_LATENCY: u32 = 4;
    /// Divide completes in 16 cycles.
    pub const DIV_LATENCY: u32 = 16;
    /// Decode-time branch steering on.
    pub const DECODE_REDIRECT: bool = true;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mem_size: defaults::MEM_SIZE,
            reset_nia: defaults::RESET_NIA,
            icache_latency: defaults::ICACHE_LATENCY,
            dcache_latency: defaults::DCACHE_LATENCY,
            mmu_latency: defaults::MMU_LATENCY,
            segment_limit: defaults::SEGMENT_LIMIT,
            mul_latency: defaults::MUL_LATENCY,
            div_latency: defaults::DIV_LATENCY,
            decode_redirect: defaults::DECODE_REDIRECT,
            fp_latencies: FpLatencies::default(),
        }
    }
}

impl Config {
    /// Parses a configuration from JSON, rejecting unknown fields.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }
}
