use crate::memory::{Memory, TypeAddr};
use crate::registers::ProgramCounter;

/// A fetched 16-bit word split into every operand field an opcode family
/// might read. All fields are computed up front; the executor picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub raw: u16,
    pub nnn: TypeAddr,
    pub n: u8,
    pub x: u8,
    pub y: u8,
    pub kk: u8,
}

impl Instruction {
    pub fn new(raw: u16) -> Self {
        Instruction {
            raw,
            nnn: nth_m_digits(raw, 2, 3),
            n: nth_m_digits(raw, 4, 1) as u8,
            x: nth_m_digits(raw, 2, 1) as u8,
            y: nth_m_digits(raw, 3, 1) as u8,
            kk: nth_m_digits(raw, 3, 2) as u8,
        }
    }

    pub fn family(&self) -> u8 {
        nth_m_digits(self.raw, 1, 1) as u8
    }
}

// n is starting digit (1-based, from the left), m is length
fn nth_m_digits(code: u16, n: u8, m: u8) -> u16 {
    // 0110 1100 1111 0001
    // -------------------
    //      1111 1111 1111  n = 2, m = 3
    //           1111 1111  n = 3, m = 2
    let shift_places = (4 - m - (n - 1)) * 4;
    let mask = (1u32 << (m * 4)) - 1;
    (code >> shift_places) & mask as u16
}

/// Reads the word at the program counter and moves the counter past it.
pub fn fetch(mem: &Memory, pc: &mut ProgramCounter) -> Instruction {
    let ins = mem.word(pc.addr());
    pc.increment();
    Instruction::new(ins)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),
    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 6XNN
    SetRegister(u8, u8),
    // 7XNN
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8),

    // 9XY0
    SkipNotEqualRegister(u8, u8),
    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // XOR an N row sprite from I onto the screen at (VX, VY), VF = collision
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    Unimplemented(u16),
}

type Family = fn(&Instruction) -> OpCodes;

// indexed by the top nibble of the raw word
const FAMILIES: [Family; 16] = [
    system,
    |i| OpCodes::Jump(i.nnn),
    |i| OpCodes::PushSubroutine(i.nnn),
    |i| OpCodes::SkipEqualConstant(i.x, i.kk),
    |i| OpCodes::SkipNotEqualConstant(i.x, i.kk),
    |i| OpCodes::SkipEqualRegister(i.x, i.y),
    |i| OpCodes::SetRegister(i.x, i.kk),
    |i| OpCodes::AddToRegister(i.x, i.kk),
    alu,
    |i| OpCodes::SkipNotEqualRegister(i.x, i.y),
    |i| OpCodes::SetIndexRegister(i.nnn),
    |i| OpCodes::JumpWithOffset(i.nnn),
    |i| OpCodes::Random(i.x, i.kk),
    |i| OpCodes::Display(i.x, i.y, i.n),
    keys,
    misc,
];

// 8XY_ indexed by the low nibble
const ALU: [Option<fn(u8, u8) -> OpCodes>; 16] = [
    Some(OpCodes::CopyRegister),
    Some(OpCodes::Or),
    Some(OpCodes::And),
    Some(OpCodes::XOr),
    Some(OpCodes::Add),
    Some(OpCodes::SubtractForward),
    Some(|x, _| OpCodes::RightShift(x)),
    Some(OpCodes::SubtractBackward),
    None,
    None,
    None,
    None,
    None,
    None,
    Some(|x, _| OpCodes::LeftShift(x)),
    None,
];

// 0NNN: only the low byte selects, the middle nibble is ignored
fn system(i: &Instruction) -> OpCodes {
    match i.kk {
        0xE0 => OpCodes::ClearScreen,
        0xEE => OpCodes::PopSubroutine,
        _ => OpCodes::Unimplemented(i.raw),
    }
}

fn alu(i: &Instruction) -> OpCodes {
    match ALU[i.n as usize] {
        Some(op) => op(i.x, i.y),
        None => OpCodes::Unimplemented(i.raw),
    }
}

fn keys(i: &Instruction) -> OpCodes {
    match i.kk {
        0x9E => OpCodes::SkipIfPressed(i.x),
        0xA1 => OpCodes::SkipIfNotPressed(i.x),
        _ => OpCodes::Unimplemented(i.raw),
    }
}

fn misc(i: &Instruction) -> OpCodes {
    match i.kk {
        0x07 => OpCodes::CopyDelayToRegister(i.x),
        0x0A => OpCodes::GetKey(i.x),
        0x15 => OpCodes::CopyRegisterToDelay(i.x),
        0x18 => OpCodes::CopyRegisterToSound(i.x),
        0x1E => OpCodes::AddToIndex(i.x),
        0x29 => OpCodes::PointChar(i.x),
        0x33 => OpCodes::ToDecimal(i.x),
        0x55 => OpCodes::StoreRegisterToMemory(i.x),
        0x65 => OpCodes::LoadRegisterFromMemory(i.x),
        _ => OpCodes::Unimplemented(i.raw),
    }
}

impl OpCodes {
    pub fn decode(ins: &Instruction) -> Self {
        FAMILIES[ins.family() as usize](ins)
    }

    #[cfg(test)]
    pub fn decode_raw(raw: u16) -> Self {
        Self::decode(&Instruction::new(raw))
    }
}
