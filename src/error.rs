use thiserror::Error;

use crate::memory::TypeAddr;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("call stack overflow at {pc:#05X}")]
    StackOverflow { pc: TypeAddr },
    #[error("return with empty call stack at {pc:#05X}")]
    StackUnderflow { pc: TypeAddr },
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },
}
