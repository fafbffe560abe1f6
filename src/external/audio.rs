use log::info;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use crate::core::error::{Chip8Error, Result};
use crate::core::sound::{SoundTimer, ToneGenerator};

impl AudioCallback for ToneGenerator {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        self.fill(out);
    }
}

/// Keeps the playback device open; the device closes when this is dropped.
pub struct AudioDriver {
    _device: AudioDevice<ToneGenerator>,
}

impl AudioDriver {
    /// Opens a mono f32 playback device and returns it together with the
    /// sound timer feeding it. The timer uses whatever rate SDL grants.
    pub fn open(context: &sdl2::Sdl, sample_rate: i32) -> Result<(Self, SoundTimer)> {
        let audio_subsystem = context.audio().map_err(Chip8Error::Sdl)?;
        let desired = AudioSpecDesired {
            freq: Some(sample_rate),
            channels: Some(1),
            samples: None,
        };

        let mut sound_timer = None;
        let device = audio_subsystem
            .open_playback(None, &desired, |spec| {
                let timer = SoundTimer::new(spec.freq as u32);
                let generator = timer.generator();
                sound_timer = Some(timer);
                generator
            })
            .map_err(Chip8Error::Sdl)?;
        let sound_timer = sound_timer
            .ok_or_else(|| Chip8Error::Sdl(String::from("audio device was never configured")))?;

        let spec = device.spec();
        info!(
            "Opened audio device [rate: {}, channels: {}, buffer: {}]",
            sound_timer.sample_rate(),
            spec.channels,
            spec.samples
        );
        // Runs for the lifetime of the device, silent while the timer is empty
        device.resume();

        Ok((AudioDriver { _device: device }, sound_timer))
    }
}
