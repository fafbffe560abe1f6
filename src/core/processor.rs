use crate::consts;
use crate::core::display::SharedDisplay;
use crate::core::error::{Chip8Error, Result};
use crate::core::keyboard::Keyboard;
use crate::core::ram::{self, Ram};
use crate::core::sound::SoundTimer;
use crate::core::timer::Timer;
use crate::utils;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub struct Processor {
    pub stack: Vec<u16>,
    pub registers: [u8; consts::REG_COUNT],
    pub idx_register: u16,
    pub pc: u16,
    pub delay_timer: Timer,
    pub sound_timer: SoundTimer,
    pub ram: Ram,
    pub display: SharedDisplay,
    pub keyboard: Arc<Keyboard>,
    rng: StdRng,
}

impl Processor {
    pub fn new(
        ram_: Ram,
        display_: SharedDisplay,
        keyboard_: Arc<Keyboard>,
        sound_timer_: SoundTimer,
    ) -> Self {
        Processor {
            stack: Vec::new(),
            registers: [0; consts::REG_COUNT],
            idx_register: 0,
            pc: consts::PROG_OFFSET as u16,
            delay_timer: Timer::new(),
            sound_timer: sound_timer_,
            ram: ram_,
            display: display_,
            keyboard: keyboard_,
            rng: StdRng::from_entropy(),
        }
    }

    /// Executes until the program does something illegal. There is no halt
    /// instruction, so this only ever returns an error.
    pub fn run(&mut self) -> Result<()> {
        info!("Starting interpreter at {:#06X}", self.pc);
        loop {
            self.step()?;
        }
    }

    /// Like `run`, but executes at most `ips` instructions per second, in
    /// batches of one 60Hz frame. Below 60 instructions per second each
    /// instruction gets its own interval instead.
    pub fn run_paced(&mut self, ips: u32) -> Result<()> {
        if ips == 0 {
            return self.run();
        }
        info!("Starting interpreter at {:#06X}, {} instructions/s", self.pc, ips);
        let (batch, interval) = pacing(ips);
        let mut deadline = Instant::now();
        loop {
            for _ in 0..batch {
                self.step()?;
            }
            deadline += interval;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                // fell behind, don't try to catch up
                deadline = now;
            }
        }
    }

    pub fn step(&mut self) -> Result<()> {
        let opcode = self.ram.opcode(self.pc as usize)?;
        self.pc = self.pc.wrapping_add(consts::OP_CODE_BYTES as u16);
        self.execute(opcode)
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(consts::OP_CODE_BYTES as u16);
    }

    fn execute(&mut self, opcode: u16) -> Result<()> {
        let (family, x, y, n) = utils::nibble_split(opcode);
        let (x, y) = (x as usize, y as usize);
        let nn = (opcode & 0x00FF) as u8;
        let nnn = opcode & 0x0FFF;

        match family {
            0x0 => self.execute_system(opcode)?,

            // Jumps and subroutines
            0x1 => self.pc = nnn,
            0x2 => {
                self.stack.push(self.pc);
                self.pc = nnn;
            }
            0xB => self.pc = nnn + self.registers[0] as u16,

            // Conditional skips
            0x3 => {
                if self.registers[x] == nn {
                    self.skip();
                }
            }
            0x4 => {
                if self.registers[x] != nn {
                    self.skip();
                }
            }
            0x5 if n == 0 => {
                if self.registers[x] == self.registers[y] {
                    self.skip();
                }
            }
            0x9 if n == 0 => {
                if self.registers[x] != self.registers[y] {
                    self.skip();
                }
            }

            // Immediates, no carry
            0x6 => self.registers[x] = nn,
            0x7 => self.registers[x] = self.registers[x].wrapping_add(nn),
            0xA => self.idx_register = nnn,

            0x8 => self.execute_alu(opcode)?,

            0xC => {
                let rand_val: u8 = self.rng.gen();
                self.registers[x] = rand_val & nn;
            }

            0xD => {
                let sprite = self.ram.slice(self.idx_register as usize, n as usize)?;
                let collision = self
                    .display
                    .draw(self.registers[x], self.registers[y], sprite)?;
                self.registers[consts::FLAG_REGISTER] = collision as u8;
            }

            0xE => self.execute_key(opcode)?,
            0xF => self.execute_misc(opcode)?,

            _ => return Err(Chip8Error::UnknownOpcode { opcode }),
        }
        Ok(())
    }

    fn execute_system(&mut self, opcode: u16) -> Result<()> {
        match opcode {
            0x00E0 => self.display.clear(),
            0x00EE => self.pc = self.stack.pop().ok_or(Chip8Error::StackUnderflow)?,
            // Machine code routines of the original hardware; programs still
            // carry the odd one, skip it
            _ => warn!("Ignoring machine code routine {:#06X}", opcode),
        }
        Ok(())
    }

    fn execute_alu(&mut self, opcode: u16) -> Result<()> {
        let (_, x, y, n) = utils::nibble_split(opcode);
        let (x, y) = (x as usize, y as usize);
        let vx = self.registers[x];
        let vy = self.registers[y];

        // The flag is 1 on carry and 0 on borrow
        let (result, flag) = match n {
            0x0 => (vy, None),
            0x1 => (vx | vy, None),
            0x2 => (vx & vy, None),
            0x3 => (vx ^ vy, None),
            0x4 => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry as u8))
            }
            0x5 => {
                let (difference, borrow) = vx.overflowing_sub(vy);
                (difference, Some(!borrow as u8))
            }
            0x6 if x == y => (vx >> 1, Some(vx & 0b0000_0001)),
            0x7 => {
                let (difference, borrow) = vy.overflowing_sub(vx);
                (difference, Some(!borrow as u8))
            }
            0xE => (vx << 1, Some(vx >> 7)),
            _ => return Err(Chip8Error::UnknownOpcode { opcode }),
        };

        if let Some(flag) = flag {
            if x == consts::FLAG_REGISTER || y == consts::FLAG_REGISTER {
                return Err(Chip8Error::FlagOperand { opcode });
            }
            self.registers[consts::FLAG_REGISTER] = flag;
        }
        self.registers[x] = result;
        Ok(())
    }

    fn execute_key(&mut self, opcode: u16) -> Result<()> {
        let (_, x, _, _) = utils::nibble_split(opcode);
        let key = self.registers[x as usize];
        let skip = match opcode & 0x00FF {
            0x9E => self.keyboard.is_down(key),
            0xA1 => !self.keyboard.is_down(key),
            _ => return Err(Chip8Error::UnknownOpcode { opcode }),
        };
        if skip {
            self.skip();
        }
        Ok(())
    }

    fn execute_misc(&mut self, opcode: u16) -> Result<()> {
        let (_, x, _, _) = utils::nibble_split(opcode);
        let x = x as usize;
        let vx = self.registers[x];
        let idx = self.idx_register as usize;

        match opcode & 0x00FF {
            // Timers
            0x07 => self.registers[x] = self.delay_timer.get(),
            0x15 => self.delay_timer.set(vx),
            0x18 => self.sound_timer.set(vx),

            // Wait for a key press by re-running this instruction until one arrives
            0x0A => match self.keyboard.first_pressed() {
                Some(key) => {
                    self.registers[x] = key;
                    self.keyboard.clear_pressed();
                }
                None => self.pc = self.pc.wrapping_sub(consts::OP_CODE_BYTES as u16),
            },

            // Index register
            0x1E => self.idx_register = self.idx_register.wrapping_add(vx as u16),
            0x29 => self.idx_register = ram::sprite_offset(vx),

            // Memory
            0x33 => self.ram.slice_mut(idx, 3)?.copy_from_slice(&utils::bcd(vx)),
            0x55 => self
                .ram
                .slice_mut(idx, x + 1)?
                .copy_from_slice(&self.registers[..=x]),
            0x65 => self.registers[..=x].copy_from_slice(self.ram.slice(idx, x + 1)?),

            _ => return Err(Chip8Error::UnknownOpcode { opcode }),
        }
        Ok(())
    }
}

/// Instructions per batch and the time one batch is given, for a nonzero `ips`.
fn pacing(ips: u32) -> (u32, Duration) {
    if ips >= consts::TIMER_HZ {
        (ips / consts::TIMER_HZ, Duration::from_secs(1) / consts::TIMER_HZ)
    } else {
        (1, Duration::from_secs(1) / ips)
    }
}
