//! Cycle-by-cycle trace records

pub mod parser;

/// One row of the trace, scoped to a single clock cycle.
/// Cycle numbers are trusted for ordering, not for content.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TraceEntry {
    /// Cycle number as reported by the simulator
    pub cycle: u32,
    /// Fetch-stage program counter
    pub pc_f: u32,
    /// Issue lanes: slot 0 and slot 1
    pub lanes: [LaneEntry; 2],
    /// Forwarding network signals
    pub forwarding: Forwarding,
    /// Cross-lane scoreboard signals
    pub scoreboard: Scoreboard,
}

/// Per-lane snapshot of the pipeline stages
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LaneEntry {
    /// Instruction word at the fetch stage
    pub fetch: u32,
    /// Instruction word at the decode stage
    pub decode: u32,
    /// Issue flag
    pub issue: bool,
    /// Instruction word at the execute stage
    pub exec: u32,
    /// Execute result
    pub result: u32,
    pub branch_taken: bool,
    pub branch_target: u32,
    pub jump_taken: bool,
    pub jump_target: u32,
    pub mem_read: bool,
    pub mem_write: bool,
    pub mem_addr: u32,
    /// Scoreboard-reported load-use hazard for this lane
    pub load_use: bool,
}

/// Forwarding signals.
/// The network is asymmetric: slot 0 reports plain enable bits (its only
/// source is slot-0 execute), slot 1 reports a source selector per operand.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Forwarding {
    pub rs1_slot0: bool,
    pub rs2_slot0: bool,
    pub rs1_slot1: ForwardSource,
    pub rs2_slot1: ForwardSource,
}

/// Source selector for a slot-1 operand
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ForwardSource {
    #[default]
    RegisterFile,
    Execute1,
    Execute0,
}

impl ForwardSource {
    /// Decodes the trace's source code (0 register file, 1 slot-1 execute,
    /// 2 slot-0 execute). Unrecognized codes fall back to the register file.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ForwardSource::Execute1,
            2 => ForwardSource::Execute0,
            _ => ForwardSource::RegisterFile,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ForwardSource::RegisterFile => "REG",
            ForwardSource::Execute1 => "EX1",
            ForwardSource::Execute0 => "EX0",
        }
    }

    /// True when the operand comes from a bypass path rather than the
    /// register file
    pub fn is_forwarding(&self) -> bool {
        !matches!(self, ForwardSource::RegisterFile)
    }
}

/// Cross-lane scoreboard signals, rendered as-is from the trace
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Scoreboard {
    /// RAW hazard flag for slot 1
    pub raw1: bool,
    /// WAW hazard flag for slot 1
    pub waw1: bool,
    /// Instruction-fetch stall flag
    pub stall_if: bool,
    /// Busy-register bitmask
    pub busy_vec: u32,
    /// Load-pending bitmask
    pub load_pending_vec: u32,
}
