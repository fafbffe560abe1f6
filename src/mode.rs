use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info};

use crate::consts;
use crate::core::display::{Frame, SharedDisplay};
use crate::core::error::{Chip8Error, Result};
use crate::core::keyboard::Keyboard;
use crate::core::processor::Processor;
use crate::core::ram::Ram;
use crate::core::rom::Rom;
use crate::external::audio::AudioDriver;
use crate::external::input::Command;
use crate::Args;

/// What the window is currently doing: browsing for a program or running one.
pub enum Mode {
    Selecting(Selector),
    Running(Session),
}

impl Mode {
    pub fn start(context: &sdl2::Sdl, args: &Args) -> Result<Mode> {
        if args.path.is_dir() {
            Ok(Mode::Selecting(Selector::new(&args.path)?))
        } else {
            Ok(Mode::Running(Session::start(context, &args.path, args)?))
        }
    }

    /// Moves to `Running` once the selector has settled on a program.
    pub fn transition(self, context: &sdl2::Sdl, args: &Args) -> Result<Mode> {
        match self {
            Mode::Selecting(selector) => match selector.chosen().map(Path::to_path_buf) {
                Some(rom) => {
                    info!("Selected {}", rom.display());
                    Ok(Mode::Running(Session::start(context, &rom, args)?))
                }
                None => Ok(Mode::Selecting(selector)),
            },
            running => Ok(running),
        }
    }

    /// Keypad state to feed input into, only while a program runs.
    pub fn keyboard(&self) -> Option<&Keyboard> {
        match self {
            Mode::Selecting(_) => None,
            Mode::Running(session) => Some(&session.keyboard),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Mode::Selecting(selector) => selector.title(),
            Mode::Running(session) => format!("CHIP-8 - {}", session.name),
        }
    }
}

/// Directory browser. The first entry is always the parent directory.
pub struct Selector {
    dir: PathBuf,
    entries: Vec<PathBuf>,
    selected: usize,
    chosen: Option<PathBuf>,
}

impl Selector {
    pub fn new(dir: &Path) -> Result<Self> {
        let mut selector = Selector {
            dir: dir.canonicalize()?,
            entries: Vec::new(),
            selected: 0,
            chosen: None,
        };
        selector.scan()?;
        Ok(selector)
    }

    fn scan(&mut self) -> Result<()> {
        let mut children = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_rom = path.is_file()
                && path.extension().map_or(false, |ext| ext == consts::ROM_EXTENSION);
            if path.is_dir() || is_rom {
                children.push(path);
            }
        }
        children.sort();
        debug!("{} entries in {}", children.len(), self.dir.display());

        self.entries = self.dir.parent().map(Path::to_path_buf).into_iter().collect();
        self.entries.extend(children);
        self.selected = 0;
        Ok(())
    }

    pub fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Up => self.up(),
            Command::Down => self.down(),
            Command::Select => self.activate()?,
            Command::Quit => {}
        }
        Ok(())
    }

    pub fn up(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.entries.len() - 1);
    }

    pub fn down(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.entries.len();
    }

    /// Descends into the selected directory, or picks the selected program.
    pub fn activate(&mut self) -> Result<()> {
        let entry = match self.entries.get(self.selected) {
            Some(entry) => entry.clone(),
            None => return Ok(()),
        };
        if entry.is_dir() {
            self.dir = entry;
            self.scan()?;
        } else {
            self.chosen = Some(entry);
        }
        Ok(())
    }

    pub fn selected(&self) -> Option<&Path> {
        self.entries.get(self.selected).map(PathBuf::as_path)
    }

    pub fn chosen(&self) -> Option<&Path> {
        self.chosen.as_deref()
    }

    pub fn title(&self) -> String {
        match self.selected() {
            Some(_) if self.selected == 0 && self.dir.parent().is_some() => {
                format!("CHIP-8 - {} [..]", self.dir.display())
            }
            Some(path) => format!("CHIP-8 - {}", path.display()),
            None => format!("CHIP-8 - {} [empty]", self.dir.display()),
        }
    }
}

/// A running program: the interpreter thread, the state it shares with the
/// render loop, and the audio device it plays through.
pub struct Session {
    name: String,
    display: SharedDisplay,
    pub keyboard: Arc<Keyboard>,
    interpreter: Option<JoinHandle<Result<()>>>,
    _audio: AudioDriver,
}

impl Session {
    pub fn start(context: &sdl2::Sdl, path: &Path, args: &Args) -> Result<Session> {
        let rom = Rom::new(path)?;
        let mut ram = Ram::default();
        ram.load_program(&rom)?;
        info!("Loaded ROM [path: {}, size: {}]", path.display(), rom.len());

        let (audio, sound_timer) = AudioDriver::open(context, args.sample_rate)?;
        let display = SharedDisplay::new();
        let keyboard = Arc::new(Keyboard::default());
        let mut processor =
            Processor::new(ram, display.clone(), Arc::clone(&keyboard), sound_timer);

        let ips = args.ips;
        let interpreter = thread::spawn(move || {
            if ips == 0 {
                processor.run()
            } else {
                processor.run_paced(ips)
            }
        });

        Ok(Session {
            name: path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            display,
            keyboard,
            interpreter: Some(interpreter),
            _audio: audio,
        })
    }

    pub fn present(&self) -> Frame {
        self.display.present()
    }

    /// Surfaces the interpreter's error once its thread has stopped.
    pub fn check(&mut self) -> Result<()> {
        match self.interpreter.take() {
            Some(handle) if handle.is_finished() => match handle.join() {
                Ok(result) => result,
                Err(_) => Err(Chip8Error::InterpreterPanicked),
            },
            handle => {
                self.interpreter = handle;
                Ok(())
            }
        }
    }
}
