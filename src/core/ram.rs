use crate::consts;
use crate::core::error::{Chip8Error, Result};
use crate::core::rom::Rom;

/// 4KiB of addressable memory. The built-in glyphs sit at the bottom and the
/// program image is loaded at `PROG_OFFSET`.
#[derive(Debug)]
pub struct Ram {
    pub buffer: [u8; consts::RAM_BYTES],
}

impl Default for Ram {
    fn default() -> Self {
        let mut buffer = [0; consts::RAM_BYTES];
        buffer[consts::FONT_OFFSET..consts::FONT_OFFSET + consts::FONT_SET_SIZE]
            .copy_from_slice(&consts::FONT_SET);
        Ram { buffer }
    }
}

impl Ram {
    pub fn load_program(&mut self, rom: &Rom) -> Result<()> {
        let end = consts::PROG_OFFSET + rom.len();
        if end > consts::RAM_BYTES {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: consts::MAX_ROM_BYTES,
            });
        }
        self.buffer[consts::PROG_OFFSET..end].copy_from_slice(&rom.buffer);
        Ok(())
    }

    /// Big-endian opcode at `address`.
    pub fn opcode(&self, address: usize) -> Result<u16> {
        let bytes = self.slice(address, consts::OP_CODE_BYTES)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        let end = Ram::checked_end(address, len)?;
        Ok(&self.buffer[address..end])
    }

    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        let end = Ram::checked_end(address, len)?;
        Ok(&mut self.buffer[address..end])
    }

    fn checked_end(address: usize, len: usize) -> Result<usize> {
        let end = address + len;
        if end > consts::RAM_BYTES {
            // report the first byte that falls outside memory
            return Err(Chip8Error::MemoryOutOfBounds {
                address: address.max(consts::RAM_BYTES),
            });
        }
        Ok(end)
    }
}

/// Memory offset of the built-in glyph for hex digit `index`.
pub fn sprite_offset(index: u8) -> u16 {
    (consts::FONT_OFFSET + consts::FONT_GLYPH_BYTES * (index & 0xF) as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_loaded() {
        let ram = Ram::default();
        // First char in font: 0
        assert_eq!(ram.buffer[0..5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // Last char in font: F
        assert_eq!(ram.buffer[75..80], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert!(ram.buffer[consts::PROG_OFFSET..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_load_program() -> Result<()> {
        let mut ram = Ram::default();
        ram.load_program(&Rom::from_bytes(vec![0x00, 0xE0, 0x12, 0x00])?)?;
        assert_eq!(ram.opcode(0x200)?, 0x00E0);
        assert_eq!(ram.opcode(0x202)?, 0x1200);
        Ok(())
    }

    #[test]
    fn test_sprite_offset() {
        assert_eq!(sprite_offset(0), 0);
        assert_eq!(sprite_offset(0xA), 50);
        assert_eq!(sprite_offset(0xF), 75);
        assert_eq!(sprite_offset(0x1F), 75);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ram = Ram::default();
        assert!(ram.slice(4094, 2).is_ok());
        assert!(matches!(
            ram.slice(4095, 2),
            Err(Chip8Error::MemoryOutOfBounds { address: 4096 })
        ));
        assert!(matches!(
            ram.slice_mut(5000, 1),
            Err(Chip8Error::MemoryOutOfBounds { address: 5000 })
        ));
        assert!(ram.opcode(4095).is_err());
    }
}
