//! Decoding helper functions

use super::Fields;
use super::Mnemonic;
use super::Opcode;
use super::OperandUse;

/// Sign-extends the low `bits` bits of `value` using two's-complement
/// arithmetic.
pub fn sign_extend(value: u32, bits: u32) -> i64 {
    let sign_bit = 1u64 << (bits - 1);
    let value = value as u64;
    (value & (sign_bit - 1)) as i64 - (value & sign_bit) as i64
}

/// Returns the opcode class of a raw instruction
pub fn raw_to_opcode(raw_inst: u32) -> Opcode {
    let opcode = raw_inst & 0x7f_u32;
    match opcode {
        0x37 => Opcode::Lui,
        0x17 => Opcode::AuiPc,
        0x6f => Opcode::Jal,
        0x67 => Opcode::Jalr,
        0x63 => Opcode::Branch,
        0x03 => Opcode::Load,
        0x23 => Opcode::Store,
        0x33 => Opcode::Op,
        0x13 => Opcode::OpImm,
        0x73 => Opcode::System,
        _ => Opcode::Unknown,
    }
}

/// Extracts all register subfields from a raw instruction
pub fn extract_fields(raw_inst: u32) -> Fields {
    Fields {
        opcode: get_opcode(raw_inst),
        rd: get_rd(raw_inst),
        rs1: get_rs1(raw_inst),
        rs2: get_rs2(raw_inst),
        funct3: get_funct3(raw_inst),
        funct7: get_funct7(raw_inst),
    }
}

/// Determines an instruction's mnemonic, e.g., JAL, XOR, or SRA.
/// Encodings with no table entry inside a known opcode class fall back
/// to that class's placeholder mnemonic.
pub fn get_mnemonic(raw_inst: u32, opcode: Opcode) -> Mnemonic {
    use Mnemonic::*;

    let funct3 = get_funct3(raw_inst);
    let funct7 = get_funct7(raw_inst);
    let funct7_bit = (raw_inst & 0x40000000) >> 30;

    match opcode {
        Opcode::Lui => LUI,
        Opcode::AuiPc => AUIPC,
        Opcode::Jal => JAL,
        Opcode::Jalr => JALR,
        Opcode::System => SYSTEM,
        Opcode::Branch => match funct3 {
            0b000 => BEQ,
            0b001 => BNE,
            0b100 => BLT,
            0b101 => BGE,
            0b110 => BLTU,
            0b111 => BGEU,
            _ => BRANCH,
        },
        Opcode::Load => match funct3 {
            0b000 => LB,
            0b001 => LH,
            0b010 => LW,
            0b100 => LBU,
            0b101 => LHU,
            _ => LOAD,
        },
        Opcode::Store => match funct3 {
            0b000 => SB,
            0b001 => SH,
            0b010 => SW,
            _ => STORE,
        },
        Opcode::OpImm => match (funct3, funct7_bit) {
            (0b000, _) => ADDI,
            (0b010, _) => SLTI,
            (0b011, _) => SLTIU,
            (0b100, _) => XORI,
            (0b110, _) => ORI,
            (0b111, _) => ANDI,
            (0b001, _) => SLLI,
            (0b101, 0b0) => SRLI,
            (0b101, 0b1) => SRAI,
            _ => IOP,
        },
        Opcode::Op => match (funct7, funct3) {
            (0x00, 0b000) => ADD,
            (0x20, 0b000) => SUB,
            (0x00, 0b001) => SLL,
            (0x00, 0b010) => SLT,
            (0x00, 0b011) => SLTU,
            (0x00, 0b100) => XOR,
            (0x00, 0b101) => SRL,
            (0x20, 0b101) => SRA,
            (0x00, 0b110) => OR,
            (0x00, 0b111) => AND,
            _ => ROP,
        },
        Opcode::Unknown => UNKNOWN,
    }
}

/// Extracts the immediate an instruction carries, if its format has one.
///
/// Shift-immediates keep the raw `word >> 20` value (shamt plus funct7
/// bits), and lui/auipc keep the raw upper 20 bits unsigned.
pub fn get_imm(raw_inst: u32, opcode: Opcode) -> Option<i64> {
    match opcode {
        Opcode::Lui | Opcode::AuiPc => {
            Some((raw_inst & 0xFFFFF000) as i64)
        }
        Opcode::Jal => Some(sign_extend(
            ((raw_inst >> 31) << 20)
                | (((raw_inst >> 12) & 0xFF) << 12)
                | (((raw_inst >> 20) & 1) << 11)
                | (((raw_inst >> 21) & 0x3FF) << 1),
            21,
        )),
        Opcode::Jalr | Opcode::Load => {
            Some(sign_extend(raw_inst >> 20, 12))
        }
        Opcode::Branch => Some(sign_extend(
            ((raw_inst >> 31) << 12)
                | (((raw_inst >> 7) & 1) << 11)
                | (((raw_inst >> 25) & 0x3F) << 5)
                | (((raw_inst >> 8) & 0xF) << 1),
            13,
        )),
        Opcode::Store => Some(sign_extend(
            ((raw_inst >> 25) << 5) | ((raw_inst >> 7) & 0x1F),
            12,
        )),
        Opcode::OpImm => match get_funct3(raw_inst) {
            // Shift-immediates: unsigned shift amount, raw upper bits
            0b001 | 0b101 => Some((raw_inst >> 20) as i64),
            _ => Some(sign_extend(raw_inst >> 20, 12)),
        },
        Opcode::Op | Opcode::System | Opcode::Unknown => None,
    }
}

/// Total mapping from mnemonic to its operand capability record
pub fn operand_use(mnemonic: Mnemonic) -> OperandUse {
    use Mnemonic::*;

    OperandUse {
        reads_rs1: matches!(
            mnemonic,
            ADD | SUB
                | SLL
                | SLT
                | SLTU
                | XOR
                | SRL
                | SRA
                | OR
                | AND
                | ADDI
                | SLTI
                | SLTIU
                | XORI
                | ORI
                | ANDI
                | SLLI
                | SRLI
                | SRAI
                | LB
                | LH
                | LW
                | LBU
                | LHU
                | SB
                | SH
                | SW
                | BEQ
                | BNE
                | BLT
                | BGE
                | BLTU
                | BGEU
                | JALR
        ),
        reads_rs2: matches!(
            mnemonic,
            ADD | SUB
                | SLL
                | SLT
                | SLTU
                | XOR
                | SRL
                | SRA
                | OR
                | AND
                | SB
                | SH
                | SW
                | BEQ
                | BNE
                | BLT
                | BGE
                | BLTU
                | BGEU
        ),
        writes_rd: matches!(
            mnemonic,
            ADD | SUB
                | SLL
                | SLT
                | SLTU
                | XOR
                | SRL
                | SRA
                | OR
                | AND
                | ADDI
                | SLTI
                | SLTIU
                | XORI
                | ORI
                | ANDI
                | SLLI
                | SRLI
                | SRAI
                | LB
                | LH
                | LW
                | LBU
                | LHU
                | JAL
                | JALR
                | LUI
                | AUIPC
        ),
    }
}

/// Extracts opcode bits from a raw instruction
fn get_opcode(raw_inst: u32) -> u32 {
    raw_inst & 0x7f
}

/// Extracts funct3 from a raw instruction
fn get_funct3(raw_inst: u32) -> u32 {
    (raw_inst >> 12) & 0x7
}

/// Extracts the rs1 field from a raw instruction
fn get_rs1(raw_inst: u32) -> u32 {
    (raw_inst >> 15) & 0x1f
}

/// Extracts the rs2 field from a raw instruction
fn get_rs2(raw_inst: u32) -> u32 {
    (raw_inst >> 20) & 0x1f
}

/// Extracts the rd field from a raw instruction
fn get_rd(raw_inst: u32) -> u32 {
    (raw_inst >> 7) & 0x1f
}

/// Extracts the funct7 field from a raw instruction
fn get_funct7(raw_inst: u32) -> u32 {
    (raw_inst >> 25) & 0x7f
}
