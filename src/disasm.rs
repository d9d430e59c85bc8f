//! Disassembler
//!
//! Formats decoded instructions into the textual operand form used by the
//! program listing and the timeline.

use crate::instruction::DecodedInstruction;
use crate::instruction::Mnemonic;

/// Disassembles a raw instruction word
pub fn disassemble(raw_inst: u32) -> String {
    format_decoded(&DecodedInstruction::decode(raw_inst))
}

/// Formats an already-decoded instruction
pub fn format_decoded(inst: &DecodedInstruction) -> String {
    use Mnemonic::*;

    let m = inst.mnemonic;
    let f = &inst.fields;
    let imm = inst.imm.unwrap_or(0);

    match m {
        ADD | SUB | SLL | SLT | SLTU | XOR | SRL | SRA | OR | AND => {
            format!("{} x{}, x{}, x{}", m, f.rd, f.rs1, f.rs2)
        }
        ADDI | SLTI | SLTIU | XORI | ORI | ANDI | SLLI | SRLI | SRAI => {
            format!("{} x{}, x{}, {}", m, f.rd, f.rs1, imm)
        }
        LB | LH | LW | LBU | LHU => {
            format!("{} x{}, {}(x{})", m, f.rd, imm, f.rs1)
        }
        SB | SH | SW => format!("{} x{}, {}(x{})", m, f.rs2, imm, f.rs1),
        BEQ | BNE | BLT | BGE | BLTU | BGEU => {
            format!("{} x{}, x{}, {}", m, f.rs1, f.rs2, imm)
        }
        JAL => format!("jal x{}, {}", f.rd, imm),
        JALR => format!("jalr x{}, {}(x{})", f.rd, imm, f.rs1),
        LUI | AUIPC => format!("{} x{}, {}", m, f.rd, imm),
        // nop, system, placeholders: bare mnemonic
        _ => m.to_string(),
    }
}
