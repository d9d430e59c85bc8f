//! Performance metrics aggregation

use crate::instruction::DecodedInstruction;
use crate::instruction::Mnemonic;
use crate::instruction::NOP;
use crate::trace::TraceEntry;

/// Aggregate performance counters for one trace
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub total_cycles: usize,
    pub retired_slot0: usize,
    pub retired_slot1: usize,
    pub retired: usize,
    /// Cycles per retired instruction; positive infinity when nothing
    /// retired
    pub cpi: f64,
    /// Retired instructions per cycle; 0 for an empty trace
    pub ipc: f64,
    /// Cycles with a taken branch in either lane
    pub branches_taken: usize,
    /// Potential RAW hazards found by the one-cycle-lookback heuristic.
    ///
    /// Known limitation: compares slot-0 decode operands of a cycle
    /// against the previous cycle's slot-0 execute destination only,
    /// ignoring the second issue slot and anything older than one cycle,
    /// so it undercounts in dual-issue traces. Downstream consumers
    /// depend on the exact count; do not widen it.
    pub potential_raw: usize,
    /// Fetch-stall cycles
    pub stall_cycles: usize,
    /// Cycles with any active forwarding in either slot
    pub forwarding_cycles: usize,
    /// Average population count of the busy-register bitmask
    pub avg_busy_registers: f64,
}

/// Reduces the trace to its aggregate counters
pub fn aggregate(entries: &[TraceEntry]) -> Metrics {
    let total_cycles = entries.len();

    let retired_slot0 =
        entries.iter().filter(|e| retires(e.lanes[0].exec)).count();
    let retired_slot1 =
        entries.iter().filter(|e| retires(e.lanes[1].exec)).count();
    let retired = retired_slot0 + retired_slot1;

    let cpi = if retired == 0 {
        f64::INFINITY
    } else {
        total_cycles as f64 / retired as f64
    };
    let ipc = if total_cycles == 0 {
        0.0
    } else {
        retired as f64 / total_cycles as f64
    };

    let branches_taken = entries
        .iter()
        .filter(|e| e.lanes[0].branch_taken || e.lanes[1].branch_taken)
        .count();

    let stall_cycles =
        entries.iter().filter(|e| e.scoreboard.stall_if).count();

    let forwarding_cycles = entries
        .iter()
        .filter(|e| {
            e.forwarding.rs1_slot0
                || e.forwarding.rs2_slot0
                || e.forwarding.rs1_slot1.is_forwarding()
                || e.forwarding.rs2_slot1.is_forwarding()
        })
        .count();

    let avg_busy_registers = if total_cycles == 0 {
        0.0
    } else {
        entries
            .iter()
            .map(|e| e.scoreboard.busy_vec.count_ones() as f64)
            .sum::<f64>()
            / total_cycles as f64
    };

    Metrics {
        total_cycles,
        retired_slot0,
        retired_slot1,
        retired,
        cpi,
        ipc,
        branches_taken,
        potential_raw: potential_raw_hazards(entries),
        stall_cycles,
        forwarding_cycles,
        avg_busy_registers,
    }
}

/// An execute-stage slot retires iff its word is neither 0 nor NOP
fn retires(word: u32) -> bool {
    word != 0 && word != NOP
}

/// One-cycle-lookback RAW heuristic over slot 0 (see [`Metrics`])
fn potential_raw_hazards(entries: &[TraceEntry]) -> usize {
    let mut count = 0;
    for window in entries.windows(2) {
        let prev = DecodedInstruction::decode(window[0].lanes[0].exec);
        if prev.mnemonic == Mnemonic::NOP {
            continue;
        }
        let rd_prev = prev.fields.rd;
        if rd_prev == 0 {
            continue;
        }
        let dec = DecodedInstruction::decode(window[1].lanes[0].decode);
        if dec.mnemonic == Mnemonic::NOP {
            continue;
        }
        if dec.fields.rs1 == rd_prev || dec.fields.rs2 == rd_prev {
            count += 1;
        }
    }
    count
}
