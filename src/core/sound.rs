use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::consts;

/// Interpreter-side half of the buzzer. `set` converts 60Hz ticks into a
/// sample budget at the device's real rate; the `ToneGenerator` running on
/// the audio thread spends it.
#[derive(Debug)]
pub struct SoundTimer {
    sample_rate: u32,
    remaining: Arc<AtomicU32>,
}

impl SoundTimer {
    pub fn new(sample_rate: u32) -> Self {
        SoundTimer {
            sample_rate,
            remaining: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn set(&self, value: u8) {
        let samples = value as u32 * self.sample_rate / consts::TIMER_HZ;
        self.remaining.store(samples, Ordering::Release);
    }

    #[cfg(test)]
    pub fn remaining_samples(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// A generator drawing from this timer's budget.
    pub fn generator(&self) -> ToneGenerator {
        ToneGenerator::new(self.sample_rate, Arc::clone(&self.remaining))
    }
}

/// Produces a ~100Hz sawtooth while the shared budget lasts, silence after.
pub struct ToneGenerator {
    waveform: Vec<f32>,
    cursor: usize,
    remaining: Arc<AtomicU32>,
}

impl ToneGenerator {
    fn new(sample_rate: u32, remaining: Arc<AtomicU32>) -> Self {
        let len = (sample_rate / consts::TONE_HZ).max(2) as usize;
        let waveform = (0..len)
            .map(|sample| 2.0 * sample as f32 / (len - 1) as f32 - 1.0)
            .collect();
        ToneGenerator {
            waveform,
            cursor: 0,
            remaining,
        }
    }

    pub fn fill(&mut self, out: &mut [f32]) {
        let wanted = out.len().min(u32::MAX as usize) as u32;
        let claimed = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| {
                if left == 0 {
                    None
                } else {
                    Some(left - left.min(wanted))
                }
            })
            .map_or(0, |left| left.min(wanted) as usize);

        let (sounding, silent) = out.split_at_mut(claimed);
        for sample in sounding {
            *sample = self.waveform[self.cursor];
            self.cursor = (self.cursor + 1) % self.waveform.len();
        }
        silent.fill(0.0);
    }
}
