//! The `TestBed` harness: a simulator wired for program-level tests.
//!
//! Programs load at [`PROG_BASE`], clear of the interrupt vectors, and
//! end in a spin-to-self branch that halts the core. Fault tests install
//! a stub at every vector that records the vector number in r31 and
//! spins, so a test can assert which interrupt was taken.

use pwrsim_core::arch::Xer;
use pwrsim_core::isa::asm;
use pwrsim_core::isa::sprs::ram_slot;
use pwrsim_core::{Config, Simulator};

/// Cycle budget per test program. A wedged pipeline shows up as a
/// `CycleLimit` panic rather than a hung test.
pub const RUN_LIMIT: u64 = 50_000;

/// Where test programs load and start.
pub const PROG_BASE: u64 = 0x1000;

/// Scratch area used by the memory tests. Quadword aligned.
pub const DATA_BASE: u64 = 0x2000;

/// Register the vector stubs write their vector number into.
pub const TRAP_MARK: u32 = 31;

const VECTORS: [u64; 11] = [
    0x100, 0x300, 0x380, 0x400, 0x500, 0x600, 0x700, 0x800, 0x900, 0xC00, 0xF00,
];

pub struct TestBed {
    pub sim: Simulator,
}

impl TestBed {
    /// A simulator with default timing, running `program` from [`PROG_BASE`].
    pub fn new(program: &[u32]) -> Self {
        Self::with_config(Config::default(), program)
    }

    pub fn with_config(mut config: Config, program: &[u32]) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        config.reset_nia = PROG_BASE;
        let mut sim = Simulator::new(&config);
        sim.load_program(PROG_BASE, program)
            .expect("program fits in memory");
        TestBed { sim }
    }

    /// Installs a marker stub at every interrupt vector.
    pub fn trap_vectors(mut self) -> Self {
        for v in VECTORS {
            let stub = [asm::addi(TRAP_MARK, 0, v as i32), asm::b_rel(0)];
            self.sim.load_program(v, &stub).expect("vector stub fits");
        }
        self
    }

    /// Replaces one vector with a custom handler.
    pub fn with_handler(mut self, vector: u64, handler: &[u32]) -> Self {
        self.sim
            .load_program(vector, handler)
            .expect("handler fits");
        self
    }

    /// Runs to the halt spin, returning the cycle count.
    pub fn run(&mut self) -> u64 {
        self.sim.run(RUN_LIMIT).expect("program should reach a halt spin")
    }

    /// Vector number recorded by the stub that ran, or 0 if none did.
    pub fn trap_mark(&self) -> u64 {
        self.gpr(TRAP_MARK)
    }

    pub fn gpr(&self, n: u32) -> u64 {
        self.sim.core.cpu.regs.read_gpr(n)
    }

    pub fn set_gpr(&mut self, n: u32, value: u64) {
        self.sim.core.cpu.regs.write_gpr(n, value);
    }

    pub fn fpr(&self, n: u32) -> f64 {
        f64::from_bits(self.sim.core.cpu.regs.read_fpr(n))
    }

    pub fn set_fpr(&mut self, n: u32, value: f64) {
        self.sim.core.cpu.regs.write_fpr(n, value.to_bits());
    }

    pub fn cr_field(&self, bf: u32) -> u8 {
        self.sim.core.cpu.cr.field(bf)
    }

    pub fn cr_raw(&self) -> u32 {
        self.sim.core.cpu.cr.raw()
    }

    pub fn xer(&self) -> Xer {
        self.sim.core.cpu.xer
    }

    pub fn msr(&self) -> u64 {
        self.sim.core.cpu.ctrl.msr
    }

    pub fn srr0(&self) -> u64 {
        self.sim.core.cpu.spr_ram[ram_slot::SRR0]
    }

    pub fn srr1(&self) -> u64 {
        self.sim.core.cpu.spr_ram[ram_slot::SRR1]
    }

    pub fn lr(&self) -> u64 {
        self.sim.core.cpu.spr_ram[ram_slot::LR]
    }

    pub fn ctr(&self) -> u64 {
        self.sim.core.cpu.spr_ram[ram_slot::CTR]
    }

    pub fn dar(&self) -> u64 {
        self.sim.core.cpu.ctrl.dar
    }

    pub fn dsisr(&self) -> u32 {
        self.sim.core.cpu.ctrl.dsisr
    }

    pub fn write_mem_u64(&mut self, addr: u64, value: u64) {
        self.sim
            .load_image(addr, &value.to_le_bytes())
            .expect("address in range");
    }

    pub fn read_mem_u64(&self, addr: u64) -> u64 {
        let mem = self.sim.mem();
        let mem = mem.borrow();
        let start = addr as usize;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&mem[start..start + 8]);
        u64::from_le_bytes(bytes)
    }

    pub fn read_mem_byte(&self, addr: u64) -> u8 {
        self.sim.mem().borrow()[addr as usize]
    }
}
