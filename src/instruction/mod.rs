//! Decoded instruction representation

use std::fmt;

pub mod decode_helper;

/// NOP: ADDI x0, x0, 0
pub const NOP: u32 = 0x13;

/// Decoded view of a raw instruction word
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedInstruction {
    /// Raw representation
    pub raw_inst: u32,
    /// Opcode class
    pub opcode: Opcode,
    /// Mnemonic
    pub mnemonic: Mnemonic,
    /// Subfields
    pub fields: Fields,
    /// Sign- or zero-extended immediate, when the format carries one
    pub imm: Option<i64>,
}

impl DecodedInstruction {
    /// Decodes a raw instruction word.
    ///
    /// Total: every 32-bit input yields a value. Unrecognized encodings
    /// decode to a placeholder mnemonic instead of failing.
    pub fn decode(raw_inst: u32) -> Self {
        let opcode = decode_helper::raw_to_opcode(raw_inst);
        let fields = decode_helper::extract_fields(raw_inst);

        // The all-zero word and the canonical NOP must short-circuit
        // before opcode dispatch.
        if raw_inst == 0 || raw_inst == NOP {
            return Self {
                raw_inst,
                opcode,
                mnemonic: Mnemonic::NOP,
                fields,
                imm: None,
            };
        }

        let mnemonic = decode_helper::get_mnemonic(raw_inst, opcode);
        let imm = decode_helper::get_imm(raw_inst, opcode);

        Self { raw_inst, opcode, mnemonic, fields, imm }
    }

    /// Which operand registers this instruction reads and writes
    pub fn operand_use(&self) -> OperandUse {
        decode_helper::operand_use(self.mnemonic)
    }
}

impl Default for DecodedInstruction {
    fn default() -> Self {
        Self::decode(NOP)
    }
}

/// rv32i opcode class
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Opcode {
    Lui,
    AuiPc,
    Jal,
    Jalr,
    Branch,
    Load,
    Store,
    Op,
    OpImm,
    System,
    Unknown,
}

/// Register subfields, extracted unconditionally from every word.
/// Formats that don't use a field leave harmless garbage in it;
/// the mnemonic decides which fields are meaningful.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fields {
    pub opcode: u32,
    pub rd: u32,
    pub rs1: u32,
    pub rs2: u32,
    pub funct3: u32,
    pub funct7: u32,
}

/// rv32i mnemonic.
///
/// The placeholder members (ROP, IOP, LOAD, STORE, BRANCH, UNKNOWN) stand
/// for encodings inside a known opcode class that match no table entry.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Mnemonic {
    LUI,
    AUIPC,
    JAL,
    JALR,
    BEQ,
    BNE,
    BLT,
    BGE,
    BLTU,
    BGEU,
    LB,
    LH,
    LW,
    LBU,
    LHU,
    SB,
    SH,
    SW,
    ADDI,
    SLTI,
    SLTIU,
    XORI,
    ORI,
    ANDI,
    SLLI,
    SRLI,
    SRAI,
    ADD,
    SUB,
    SLL,
    SLT,
    SLTU,
    XOR,
    SRL,
    SRA,
    OR,
    AND,
    SYSTEM,
    #[default]
    NOP,
    ROP,
    IOP,
    LOAD,
    STORE,
    BRANCH,
    UNKNOWN,
}

impl Mnemonic {
    pub fn as_str(&self) -> &'static str {
        use Mnemonic::*;
        match self {
            LUI => "lui",
            AUIPC => "auipc",
            JAL => "jal",
            JALR => "jalr",
            BEQ => "beq",
            BNE => "bne",
            BLT => "blt",
            BGE => "bge",
            BLTU => "bltu",
            BGEU => "bgeu",
            LB => "lb",
            LH => "lh",
            LW => "lw",
            LBU => "lbu",
            LHU => "lhu",
            SB => "sb",
            SH => "sh",
            SW => "sw",
            ADDI => "addi",
            SLTI => "slti",
            SLTIU => "sltiu",
            XORI => "xori",
            ORI => "ori",
            ANDI => "andi",
            SLLI => "slli",
            SRLI => "srli",
            SRAI => "srai",
            ADD => "add",
            SUB => "sub",
            SLL => "sll",
            SLT => "slt",
            SLTU => "sltu",
            XOR => "xor",
            SRL => "srl",
            SRA => "sra",
            OR => "or",
            AND => "and",
            SYSTEM => "system",
            NOP => "nop",
            ROP => "r-op",
            IOP => "i-op",
            LOAD => "load",
            STORE => "store",
            BRANCH => "branch",
            UNKNOWN => "unknown",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operand capability record.
/// Placeholder mnemonics never produce or consume registers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OperandUse {
    pub reads_rs1: bool,
    pub reads_rs2: bool,
    pub writes_rd: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nop_precedence() {
        let zero = DecodedInstruction::decode(0);
        let canonical = DecodedInstruction::decode(NOP);

        assert_eq!(zero.mnemonic, Mnemonic::NOP);
        assert_eq!(canonical.mnemonic, Mnemonic::NOP);
        assert_eq!(zero.imm, None);
        assert_eq!(canonical.imm, None);
    }

    #[test]
    fn test_decode_addi_negative_imm() {
        // addi x5, x6, -1
        let inst = DecodedInstruction::decode(0xFFF30293);

        assert_eq!(inst.opcode, Opcode::OpImm);
        assert_eq!(inst.mnemonic, Mnemonic::ADDI);
        assert_eq!(inst.fields.rd, 5);
        assert_eq!(inst.fields.rs1, 6);
        assert_eq!(inst.imm, Some(-1));
    }

    #[test]
    fn test_decode_beq_imm() {
        // beq x5, x6, 8
        let inst = DecodedInstruction::decode(0x00628463);

        assert_eq!(inst.mnemonic, Mnemonic::BEQ);
        assert_eq!(inst.fields.rs1, 5);
        assert_eq!(inst.fields.rs2, 6);
        assert_eq!(inst.imm, Some(8));
    }

    #[test]
    fn test_decode_r_type() {
        // sub x3, x1, x2
        let inst = DecodedInstruction::decode(0x402081B3);

        assert_eq!(inst.opcode, Opcode::Op);
        assert_eq!(inst.mnemonic, Mnemonic::SUB);
        assert_eq!(inst.fields.rd, 3);
        assert_eq!(inst.fields.rs1, 1);
        assert_eq!(inst.fields.rs2, 2);
        assert_eq!(inst.imm, None);
    }

    #[test]
    fn test_decode_shift_imm() {
        // srai x1, x2, 3: funct7 = 0x20, shamt = 3
        let srai = DecodedInstruction::decode(0x40315093);
        assert_eq!(srai.mnemonic, Mnemonic::SRAI);
        // Raw word >> 20, funct7 bits included
        assert_eq!(srai.imm, Some(0x403));

        // srli x1, x2, 3
        let srli = DecodedInstruction::decode(0x00315093);
        assert_eq!(srli.mnemonic, Mnemonic::SRLI);
        assert_eq!(srli.imm, Some(3));

        // slli x1, x2, 3
        let slli = DecodedInstruction::decode(0x00311093);
        assert_eq!(slli.mnemonic, Mnemonic::SLLI);
        assert_eq!(slli.imm, Some(3));
    }

    #[test]
    fn test_decode_upper_imm_unsigned() {
        // lui x1, 0xFFFFF: the immediate renders as the raw upper bits
        let inst = DecodedInstruction::decode(0xFFFFF0B7);

        assert_eq!(inst.mnemonic, Mnemonic::LUI);
        assert_eq!(inst.imm, Some(0xFFFFF000));
    }

    #[test]
    fn test_decode_store_imm() {
        // sw x6, 8(x5): imm[11:5] = 0, imm[4:0] = 8
        let inst = DecodedInstruction::decode(0x0062A423);

        assert_eq!(inst.mnemonic, Mnemonic::SW);
        assert_eq!(inst.fields.rs1, 5);
        assert_eq!(inst.fields.rs2, 6);
        assert_eq!(inst.imm, Some(8));
    }

    #[test]
    fn test_decode_jal_negative_imm() {
        // jal x0, -16
        let inst = DecodedInstruction::decode(0xFF1FF06F);

        assert_eq!(inst.mnemonic, Mnemonic::JAL);
        assert_eq!(inst.fields.rd, 0);
        assert_eq!(inst.imm, Some(-16));
    }

    #[test]
    fn test_decode_placeholders() {
        // R-type opcode with a (funct7, funct3) pair outside the table
        let rop = DecodedInstruction::decode(0x02208033);
        assert_eq!(rop.mnemonic, Mnemonic::ROP);

        // Load opcode with funct3 = 3 (no rv32i encoding)
        let load = DecodedInstruction::decode(0x00303083);
        assert_eq!(load.mnemonic, Mnemonic::LOAD);

        // Unrecognized opcode entirely
        let unknown = DecodedInstruction::decode(0x0000007B);
        assert_eq!(unknown.opcode, Opcode::Unknown);
        assert_eq!(unknown.mnemonic, Mnemonic::UNKNOWN);
    }

    #[test]
    fn test_reencode_round_trip() {
        // For representative instructions, reassembling the decoded
        // fields must reproduce the original word bit-for-bit.

        // addi x5, x6, -1 (I-type)
        let word: u32 = 0xFFF30293;
        let inst = DecodedInstruction::decode(word);
        let imm12 = (inst.imm.unwrap() as u32) & 0xFFF;
        let reencoded = (imm12 << 20)
            | (inst.fields.rs1 << 15)
            | (inst.fields.funct3 << 12)
            | (inst.fields.rd << 7)
            | inst.fields.opcode;
        assert_eq!(reencoded, word);

        // beq x5, x6, 8 (B-type)
        let word: u32 = 0x00628463;
        let inst = DecodedInstruction::decode(word);
        let imm = inst.imm.unwrap() as u32;
        let reencoded = (((imm >> 12) & 1) << 31)
            | (((imm >> 5) & 0x3F) << 25)
            | (inst.fields.rs2 << 20)
            | (inst.fields.rs1 << 15)
            | (inst.fields.funct3 << 12)
            | (((imm >> 1) & 0xF) << 8)
            | (((imm >> 11) & 1) << 7)
            | inst.fields.opcode;
        assert_eq!(reencoded, word);

        // sw x6, 8(x5) (S-type)
        let word: u32 = 0x0062A423;
        let inst = DecodedInstruction::decode(word);
        let imm = inst.imm.unwrap() as u32;
        let reencoded = (((imm >> 5) & 0x7F) << 25)
            | (inst.fields.rs2 << 20)
            | (inst.fields.rs1 << 15)
            | (inst.fields.funct3 << 12)
            | ((imm & 0x1F) << 7)
            | inst.fields.opcode;
        assert_eq!(reencoded, word);

        // jal x0, -16 (J-type)
        let word: u32 = 0xFF1FF06F;
        let inst = DecodedInstruction::decode(word);
        let imm = inst.imm.unwrap() as u32;
        let reencoded = (((imm >> 20) & 1) << 31)
            | (((imm >> 1) & 0x3FF) << 21)
            | (((imm >> 11) & 1) << 20)
            | (((imm >> 12) & 0xFF) << 12)
            | (inst.fields.rd << 7)
            | inst.fields.opcode;
        assert_eq!(reencoded, word);

        // lui x1, 0xFFFFF (U-type)
        let word: u32 = 0xFFFFF0B7;
        let inst = DecodedInstruction::decode(word);
        let reencoded =
            (inst.imm.unwrap() as u32) | (inst.fields.rd << 7) | inst.fields.opcode;
        assert_eq!(reencoded, word);
    }

    #[test]
    fn test_operand_use() {
        let add = DecodedInstruction::decode(0x002081B3);
        assert_eq!(
            add.operand_use(),
            OperandUse { reads_rs1: true, reads_rs2: true, writes_rd: true }
        );

        // jal writes rd but reads nothing
        let jal = DecodedInstruction::decode(0xFF1FF06F);
        assert_eq!(
            jal.operand_use(),
            OperandUse { reads_rs1: false, reads_rs2: false, writes_rd: true }
        );

        // stores read both sources, write nothing
        let sw = DecodedInstruction::decode(0x0062A423);
        assert_eq!(
            sw.operand_use(),
            OperandUse { reads_rs1: true, reads_rs2: true, writes_rd: false }
        );

        // nop and placeholders never participate
        let nop = DecodedInstruction::decode(0);
        assert_eq!(nop.operand_use(), OperandUse::default());
        let rop = DecodedInstruction::decode(0x02208033);
        assert_eq!(rop.operand_use(), OperandUse::default());
    }
}
