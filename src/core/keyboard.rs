use std::sync::atomic::{AtomicU16, Ordering};

use crate::consts;

/// State of the 16-key hex keypad, one bit per key. Written by the event
/// loop and read by the interpreter, so both masks are atomics.
#[derive(Debug, Default)]
pub struct Keyboard {
    held: AtomicU16,
    pressed: AtomicU16,
}

fn mask(key: u8) -> Option<u16> {
    if (key as usize) < consts::KEYBOARD_SIZE {
        Some(1 << key)
    } else {
        None
    }
}

impl Keyboard {
    pub fn key_down(&self, key: u8) {
        if let Some(bit) = mask(key) {
            self.held.fetch_or(bit, Ordering::AcqRel);
            self.pressed.fetch_or(bit, Ordering::AcqRel);
        }
    }

    /// Releases the key. The pressed state survives until `clear_pressed`.
    pub fn key_up(&self, key: u8) {
        if let Some(bit) = mask(key) {
            self.held.fetch_and(!bit, Ordering::AcqRel);
        }
    }

    pub fn is_down(&self, key: u8) -> bool {
        mask(key).map_or(false, |bit| self.held.load(Ordering::Acquire) & bit != 0)
    }

    pub fn was_pressed(&self, key: u8) -> bool {
        mask(key).map_or(false, |bit| self.pressed.load(Ordering::Acquire) & bit != 0)
    }

    pub fn clear_pressed(&self) {
        self.pressed.store(0, Ordering::Release);
    }

    /// Lowest-numbered key pressed since the last `clear_pressed`.
    pub fn first_pressed(&self) -> Option<u8> {
        (0..consts::KEYBOARD_SIZE as u8).find(|&key| self.was_pressed(key))
    }
}
