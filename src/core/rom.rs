use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::consts;
use crate::core::error::{Chip8Error, Result};

/// A program image: raw big-endian opcodes, no header.
#[derive(Debug)]
pub struct Rom {
    pub buffer: Vec<u8>,
}

impl Rom {
    pub fn new(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Rom::from_bytes(buffer)
    }

    pub fn from_bytes(buffer: Vec<u8>) -> Result<Self> {
        if buffer.is_empty() {
            return Err(Chip8Error::EmptyRom);
        }
        if buffer.len() > consts::MAX_ROM_BYTES {
            return Err(Chip8Error::RomTooLarge {
                size: buffer.len(),
                max_size: consts::MAX_ROM_BYTES,
            });
        }
        Ok(Rom { buffer })
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}
