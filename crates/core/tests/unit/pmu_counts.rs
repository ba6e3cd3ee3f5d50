//! Commit-side event counting in the performance monitor.

use pwrsim_core::isa::asm;
use pwrsim_core::isa::sprs::{SPR_MMCR0, SPR_PMC1, SPR_PMC2, SPR_PMC3, SPR_PMC4};
use pwrsim_core::units::MMCR0_FC;

use crate::common::harness::{TestBed, DATA_BASE};

#[test]
fn counters_track_each_event_class() {
    // Two ALU ops, one load, one store, and the halting branch.
    let program = [
        asm::addi(3, 0, 1),
        asm::addi(4, 0, DATA_BASE as i32),
        asm::ld(5, 4, 0),
        asm::std(3, 4, 8),
        asm::b_rel(0),
    ];
    let mut bed = TestBed::new(&program);
    bed.run();
    let pmu = &bed.sim.core.pmu;
    assert_eq!(pmu.read(SPR_PMC1), bed.sim.core.stats.instructions);
    assert_eq!(pmu.read(SPR_PMC1), 5);
    assert_eq!(pmu.read(SPR_PMC2), 1, "loads");
    assert_eq!(pmu.read(SPR_PMC3), 1, "stores");
    assert_eq!(pmu.read(SPR_PMC4), 1, "the halting branch");
}

#[test]
fn freeze_holds_the_counters_at_zero() {
    let program = [asm::addi(3, 0, 1), asm::addi(4, 3, 1), asm::b_rel(0)];
    let mut bed = TestBed::new(&program);
    bed.sim.core.pmu.write(SPR_MMCR0, MMCR0_FC);
    bed.run();
    assert_eq!(bed.gpr(4), 2);
    for spr in SPR_PMC1..=SPR_PMC4 {
        assert_eq!(bed.sim.core.pmu.read(spr), 0);
    }
}

#[test]
fn freezing_mid_program_stops_the_instruction_count() {
    // The freeze takes hold the cycle the mtspr commits, so the mtspr
    // itself and everything after it go uncounted.
    let program = [
        asm::addi(6, 0, 1),
        asm::addi(7, 6, 1),
        asm::mtspr(SPR_MMCR0, 3),
        asm::addi(5, 0, 2),
        asm::b_rel(0),
    ];
    let mut bed = TestBed::new(&program);
    bed.set_gpr(3, MMCR0_FC);
    bed.run();
    assert_eq!(bed.gpr(5), 2, "execution runs on past the freeze");
    assert_eq!(bed.sim.core.pmu.read(SPR_PMC1), 2);
}
