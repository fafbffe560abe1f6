use std::sync::{Arc, Mutex, MutexGuard};

use crate::consts;
use crate::core::error::{Chip8Error, Result};

/// One `u64` per row, column 0 in the most significant bit.
pub type Frame = [u64; consts::CHIP8_HEIGHT];

#[derive(Debug, Default)]
pub struct Display {
    rows: Frame,
}

impl Display {
    /// XOR `sprite` into the bitmap at (`x`, `y`), one byte per row. Rows that
    /// run past column 63 wrap to column 0 of the same row. Returns whether
    /// any lit pixel was turned off.
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> Result<bool> {
        let y = y as usize;
        if y + sprite.len() > consts::CHIP8_HEIGHT {
            return Err(Chip8Error::SpriteOutOfBounds {
                y,
                height: sprite.len(),
            });
        }

        let mut collision = false;
        for (row, &byte) in self.rows[y..].iter_mut().zip(sprite) {
            let bits = sprite_row(byte, x);
            collision |= *row & bits != 0;
            *row ^= bits;
        }
        Ok(collision)
    }

    pub fn clear(&mut self) {
        self.rows = [0; consts::CHIP8_HEIGHT];
    }

    pub fn present(&self) -> Frame {
        self.rows
    }
}

/// Sprite byte positioned at column `x`, wrapped around the 64-bit row.
fn sprite_row(byte: u8, x: u8) -> u64 {
    ((byte as u64) << (64 - 8)).rotate_right(x as u32)
}

pub fn pixel(frame: &Frame, x: usize, y: usize) -> bool {
    frame[y] & (1 << (consts::CHIP8_WIDTH - 1 - x)) != 0
}

/// The bitmap shared between the instruction loop and the render loop. Every
/// access holds the lock for its whole duration.
#[derive(Debug, Clone, Default)]
pub struct SharedDisplay(Arc<Mutex<Display>>);

impl SharedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned bitmap is still a valid bitmap.
    fn lock(&self) -> MutexGuard<'_, Display> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn draw(&self, x: u8, y: u8, sprite: &[u8]) -> Result<bool> {
        self.lock().draw(x, y, sprite)
    }

    pub fn clear(&self) {
        self.lock().clear()
    }

    pub fn present(&self) -> Frame {
        self.lock().present()
    }
}
