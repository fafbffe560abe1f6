pub mod consts;
mod core;
mod external;
mod mode;
mod utils;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::core::error::{Chip8Error, Result};
use crate::external::input::{Command, KeyboardDriver};
use crate::external::output::DisplayDriver;
use crate::mode::Mode;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
pub struct Args {
    /// Program image to run, or a directory to browse for one
    #[arg(default_value = ".")]
    pub path: PathBuf,

    #[arg(long, default_value_t = consts::SCALE_FACTOR, help = "Window pixels per CHIP-8 pixel")]
    pub scale: u32,

    #[arg(long, default_value_t = 0, help = "Instructions per second, 0 runs unthrottled")]
    pub ips: u32,

    #[arg(long, default_value_t = consts::SAMPLE_RATE, help = "Requested audio sample rate")]
    pub sample_rate: i32,
}

fn run(args: &Args) -> Result<()> {
    let context = sdl2::init().map_err(Chip8Error::Sdl)?;
    let mut output = DisplayDriver::new(&context, args.scale)?;
    let mut input = KeyboardDriver::new(&context)?;
    let mut mode = Mode::start(&context, args)?;

    loop {
        // Presses from the previous frame have had a whole frame to be seen
        if let Some(keyboard) = mode.keyboard() {
            keyboard.clear_pressed();
        }
        for command in input.poll(mode.keyboard()) {
            match (command, &mut mode) {
                (Command::Quit, _) => {
                    info!("Quit requested");
                    return Ok(());
                }
                (command, Mode::Selecting(selector)) => selector.handle(command)?,
                _ => {}
            }
        }

        mode = mode.transition(&context, args)?;
        output.set_title(&mode.title())?;

        match &mut mode {
            Mode::Selecting(_) => output.blank(),
            Mode::Running(session) => {
                session.check()?;
                output.draw(&session.present())?;
            }
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
