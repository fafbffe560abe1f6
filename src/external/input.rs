use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::core::error::{Chip8Error, Result};
use crate::core::keyboard::Keyboard;

/// Host-level requests pulled out of the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Up,
    Down,
    Select,
}

pub struct KeyboardDriver {
    events: sdl2::EventPump,
}

impl KeyboardDriver {
    pub fn new(context: &sdl2::Sdl) -> Result<Self> {
        Ok(KeyboardDriver {
            events: context.event_pump().map_err(Chip8Error::Sdl)?,
        })
    }

    /// Drains pending events. Keypad keys go to `keyboard` when one is
    /// attached; everything else comes back as commands.
    pub fn poll(&mut self, keyboard: Option<&Keyboard>) -> Vec<Command> {
        let mut commands = Vec::new();
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. } => commands.push(Command::Quit),
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => commands.push(Command::Quit),
                Event::KeyDown {
                    scancode: Some(scancode),
                    repeat: false,
                    ..
                } => {
                    if let (Some(keyboard), Some(key)) = (keyboard, keymap(scancode)) {
                        keyboard.key_down(key);
                    }
                }
                Event::KeyUp {
                    scancode: Some(scancode),
                    ..
                } => {
                    if let (Some(keyboard), Some(key)) = (keyboard, keymap(scancode)) {
                        keyboard.key_up(key);
                    }
                    match scancode {
                        Scancode::Up => commands.push(Command::Up),
                        Scancode::Down => commands.push(Command::Down),
                        Scancode::Return => commands.push(Command::Select),
                        _ => {}
                    }
                }
                _ => continue,
            }
        }
        commands
    }
}

/// Hex keypad on the left of a QWERTY keyboard, by physical position.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(scancode: Scancode) -> Option<u8> {
    match scancode {
        Scancode::Num1 => Some(0x1),
        Scancode::Num2 => Some(0x2),
        Scancode::Num3 => Some(0x3),
        Scancode::Num4 => Some(0xC),
        Scancode::Q => Some(0x4),
        Scancode::W => Some(0x5),
        Scancode::E => Some(0x6),
        Scancode::R => Some(0xD),
        Scancode::A => Some(0x7),
        Scancode::S => Some(0x8),
        Scancode::D => Some(0x9),
        Scancode::F => Some(0xE),
        Scancode::Z => Some(0xA),
        Scancode::X => Some(0x0),
        Scancode::C => Some(0xB),
        Scancode::V => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_keypad() {
        let scancodes = [
            Scancode::X,
            Scancode::Num1,
            Scancode::Num2,
            Scancode::Num3,
            Scancode::Q,
            Scancode::W,
            Scancode::E,
            Scancode::A,
            Scancode::S,
            Scancode::D,
            Scancode::Z,
            Scancode::C,
            Scancode::Num4,
            Scancode::R,
            Scancode::F,
            Scancode::V,
        ];
        for (key, scancode) in scancodes.iter().enumerate() {
            assert_eq!(keymap(*scancode), Some(key as u8));
        }
    }

    #[test]
    fn test_keymap_ignores_other_keys() {
        assert_eq!(keymap(Scancode::Return), None);
        assert_eq!(keymap(Scancode::Num5), None);
        assert_eq!(keymap(Scancode::Escape), None);
    }
}
