use std::io;

/// Everything that can stop the machine. Malformed programs are fatal: the
/// interpreter reports the first violation and does not continue past it.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("ROM is empty")]
    EmptyRom,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("Stack underflow: attempted to return from a subroutine with empty call stack")]
    StackUnderflow,

    #[error("Unknown opcode: {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("Flag register used as an operand of a flag-writing opcode: {opcode:#06X}")]
    FlagOperand { opcode: u16 },

    #[error("Sprite of height {height} at row {y} runs off the bottom of the display")]
    SpriteOutOfBounds { y: usize, height: usize },

    #[error("Interpreter thread panicked")]
    InterpreterPanicked,

    #[error("SDL: {0}")]
    Sdl(String),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
