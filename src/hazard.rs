//! Hazard and forwarding reconstruction
//!
//! Classifies each cycle's hazard-relevant signals into timeline tags and
//! cross-checks the trace's self-reported forwarding against what the
//! decoded instruction stream requires. The check correlates two adjacent
//! cycles and two issue slots: a value produced by slot-1 execute in one
//! cycle may be consumed in either slot of the next, and only the slot-1
//! consumer sits on the slot-1 bypass path.
//!
//! The reconstructor never alters the trace's own reported resolution;
//! disagreement surfaces as diagnostic tags.

use std::fmt;

use crate::instruction::DecodedInstruction;
use crate::instruction::Mnemonic;
use crate::trace::ForwardSource;
use crate::trace::TraceEntry;

/// One timeline annotation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tag {
    /// Taken branch with its reported target
    BranchTaken { lane: usize, target: u32 },
    /// Taken jump with its reported target
    JumpTaken { lane: usize, target: u32 },
    /// Memory access with address and mode
    MemAccess { lane: usize, read: bool, write: bool, addr: u32 },
    /// Slot-0 forwarding enable for an operand (always sourced from
    /// slot-0 execute)
    ForwardSlot0 { operand: u8 },
    /// Slot-1 forwarding source for an operand
    ForwardSlot1 { operand: u8, source: ForwardSource },
    /// A slot-1 operand is confirmed forwarded from slot-1 execute
    Slot1ForwardOk,
    /// Scoreboard-reported RAW hazard for slot 1
    ScoreboardRaw1,
    /// Scoreboard-reported WAW hazard for slot 1
    ScoreboardWaw1,
    /// Scoreboard-reported load-use hazard for a lane
    LoadUse { lane: usize },
    /// Instruction-fetch stall
    FetchStall,
    /// The previous cycle's slot-1 result is consumed by slot 0 only,
    /// off the slot-1 bypass path
    ConsumerNotInSlot1,
    /// Slot 1 consumes the previous slot-1 result without the expected
    /// slot-1 execute forwarding source
    ExpectedForwardingMissing,
    /// Busy-register bitmask, when nonzero
    BusyMask(u32),
    /// Load-pending bitmask, when nonzero
    LoadPendingMask(u32),
    /// A system instruction reached a lane's execute stage
    Halt { lane: usize },
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Tag::BranchTaken { lane, target } => {
                write!(f, "BR{}->0x{:08x}", lane, target)
            }
            Tag::JumpTaken { lane, target } => {
                write!(f, "J{}->0x{:08x}", lane, target)
            }
            Tag::MemAccess { lane, read, write, addr } => {
                let mode = match (read, write) {
                    (true, true) => "RW",
                    (true, false) => "R",
                    (false, true) => "W",
                    (false, false) => "",
                };
                write!(f, "MEM{}({})@0x{:08x}", lane, mode, addr)
            }
            Tag::ForwardSlot0 { operand } => {
                write!(f, "F0_RS{}=EX0", operand)
            }
            Tag::ForwardSlot1 { operand, source } => {
                write!(f, "F1_RS{}={}", operand, source.label())
            }
            Tag::Slot1ForwardOk => write!(f, "EX1->ID1_OK"),
            Tag::ScoreboardRaw1 => write!(f, "RAW1(scoreboard)"),
            Tag::ScoreboardWaw1 => write!(f, "WAW1(scoreboard)"),
            Tag::LoadUse { lane } => write!(f, "LDUSE{}", lane),
            Tag::FetchStall => write!(f, "STALL(load-use0)"),
            Tag::ConsumerNotInSlot1 => {
                write!(f, "WARNING:CONSUMER_NOT_IN_SLOT1")
            }
            Tag::ExpectedForwardingMissing => {
                write!(f, "EXPECTED_EX1_FWD_NOT_FOUND")
            }
            Tag::BusyMask(mask) => write!(f, "busy=0x{:08x}", mask),
            Tag::LoadPendingMask(mask) => write!(f, "ldpend=0x{:08x}", mask),
            Tag::Halt { lane } => write!(f, "HALT{}", lane),
        }
    }
}

/// Pending slot-1 execute write, carried across exactly one cycle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PendingWrite {
    pub rd: Option<u32>,
}

/// Annotates every cycle of the trace, in order.
/// The one-cycle lookback is an explicit fold over [`PendingWrite`].
pub fn annotate(entries: &[TraceEntry]) -> Vec<Vec<Tag>> {
    let mut pending = PendingWrite::default();
    entries
        .iter()
        .map(|entry| {
            let (tags, next) = classify(entry, pending);
            pending = next;
            tags
        })
        .collect()
}

/// Classifies one cycle given the previous cycle's pending slot-1 write.
/// Pure per transition; returns the tags and the next accumulator.
pub fn classify(
    entry: &TraceEntry,
    pending: PendingWrite,
) -> (Vec<Tag>, PendingWrite) {
    let mut tags = Vec::new();

    let dec0 = DecodedInstruction::decode(entry.lanes[0].decode);
    let dec1 = DecodedInstruction::decode(entry.lanes[1].decode);
    let exec0 = DecodedInstruction::decode(entry.lanes[0].exec);
    let exec1 = DecodedInstruction::decode(entry.lanes[1].exec);

    // Control-flow events
    for (lane, l) in entry.lanes.iter().enumerate() {
        if l.branch_taken {
            tags.push(Tag::BranchTaken { lane, target: l.branch_target });
        }
    }
    for (lane, l) in entry.lanes.iter().enumerate() {
        if l.jump_taken {
            tags.push(Tag::JumpTaken { lane, target: l.jump_target });
        }
    }

    // Memory-access events
    for (lane, l) in entry.lanes.iter().enumerate() {
        if l.mem_read || l.mem_write {
            tags.push(Tag::MemAccess {
                lane,
                read: l.mem_read,
                write: l.mem_write,
                addr: l.mem_addr,
            });
        }
    }

    // Forwarding events; the slot-1 sources render unconditionally
    let fwd = &entry.forwarding;
    if fwd.rs1_slot0 {
        tags.push(Tag::ForwardSlot0 { operand: 1 });
    }
    if fwd.rs2_slot0 {
        tags.push(Tag::ForwardSlot0 { operand: 2 });
    }
    tags.push(Tag::ForwardSlot1 { operand: 1, source: fwd.rs1_slot1 });
    tags.push(Tag::ForwardSlot1 { operand: 2, source: fwd.rs2_slot1 });
    if fwd.rs1_slot1 == ForwardSource::Execute1
        || fwd.rs2_slot1 == ForwardSource::Execute1
    {
        tags.push(Tag::Slot1ForwardOk);
    }

    // Scoreboard-reported hazards (trusted signals). RAW1 is only
    // meaningful when slot-1's decode-stage instruction reads a source.
    let use1 = dec1.operand_use();
    if entry.scoreboard.raw1 && (use1.reads_rs1 || use1.reads_rs2) {
        tags.push(Tag::ScoreboardRaw1);
    }
    if entry.scoreboard.waw1 {
        tags.push(Tag::ScoreboardWaw1);
    }
    if entry.lanes[0].load_use {
        tags.push(Tag::LoadUse { lane: 0 });
    }
    if entry.lanes[1].load_use {
        tags.push(Tag::LoadUse { lane: 1 });
    }
    if entry.scoreboard.stall_if {
        tags.push(Tag::FetchStall);
    }

    // Cross-cycle producer/consumer check against the previous cycle's
    // slot-1 execute write. x0 never participates (excluded when the
    // pending write was recorded).
    if let Some(rd) = pending.rd {
        let use0 = dec0.operand_use();
        let uses0 = (use0.reads_rs1 && dec0.fields.rs1 == rd)
            || (use0.reads_rs2 && dec0.fields.rs2 == rd);
        let rs1_uses1 = use1.reads_rs1 && dec1.fields.rs1 == rd;
        let rs2_uses1 = use1.reads_rs2 && dec1.fields.rs2 == rd;

        if uses0 && !(rs1_uses1 || rs2_uses1) {
            tags.push(Tag::ConsumerNotInSlot1);
        }

        if (rs1_uses1 && fwd.rs1_slot1 != ForwardSource::Execute1)
            || (rs2_uses1 && fwd.rs2_slot1 != ForwardSource::Execute1)
        {
            tags.push(Tag::ExpectedForwardingMissing);
        }
    }

    // Scoreboard state
    if entry.scoreboard.busy_vec != 0 {
        tags.push(Tag::BusyMask(entry.scoreboard.busy_vec));
    }
    if entry.scoreboard.load_pending_vec != 0 {
        tags.push(Tag::LoadPendingMask(entry.scoreboard.load_pending_vec));
    }

    // Halt markers when a SYSTEM instruction reaches execute
    if exec0.mnemonic == Mnemonic::SYSTEM {
        tags.push(Tag::Halt { lane: 0 });
    }
    if exec1.mnemonic == Mnemonic::SYSTEM {
        tags.push(Tag::Halt { lane: 1 });
    }

    // Next cycle's producer view: slot-1 execute writing a nonzero rd
    let exec1_use = exec1.operand_use();
    let next = PendingWrite {
        rd: (exec1_use.writes_rd && exec1.fields.rd != 0)
            .then_some(exec1.fields.rd),
    };

    (tags, next)
}
