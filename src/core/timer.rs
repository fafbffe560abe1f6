use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::consts;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Source of the current time, so timers can be driven by hand in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// An 8-bit countdown decaying at 60Hz. Nothing ticks in the background: the
/// value is worked out from the elapsed time whenever it is read.
pub struct Timer {
    clock: Arc<dyn Clock>,
    last_update: Instant,
    last_value: u8,
}

impl Timer {
    pub fn new() -> Self {
        Timer::with_clock(Arc::new(MonotonicClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let last_update = clock.now();
        Timer {
            clock,
            last_update,
            last_value: 0,
        }
    }

    pub fn set(&mut self, value: u8) {
        self.last_update = self.clock.now();
        self.last_value = value;
    }

    pub fn get(&mut self) -> u8 {
        let elapsed = self
            .clock
            .now()
            .saturating_duration_since(self.last_update)
            .as_nanos();
        let ticks = elapsed * consts::TIMER_HZ as u128 / NANOS_PER_SECOND;

        self.last_value = self.last_value.saturating_sub(ticks.min(u8::MAX as u128) as u8);

        // Only consume whole ticks, the remainder counts towards the next read.
        let consumed = ticks * NANOS_PER_SECOND / consts::TIMER_HZ as u128;
        self.last_update += Duration::from_nanos(consumed as u64);

        self.last_value
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}

#[cfg(test)]
pub struct ManualClock {
    now: std::sync::Mutex<Instant>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(ManualClock {
            now: std::sync::Mutex::new(Instant::now()),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_timer() -> (Timer, Arc<ManualClock>) {
        let clock = ManualClock::new();
        (Timer::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_starts_at_zero() {
        let (mut timer, clock) = build_timer();
        assert_eq!(timer.get(), 0);
        clock.advance(Duration::from_secs(3));
        assert_eq!(timer.get(), 0);
    }

    #[test]
    fn test_read_immediately_after_set() {
        let (mut timer, _clock) = build_timer();
        timer.set(200);
        assert_eq!(timer.get(), 200);
        assert_eq!(timer.get(), 200);
    }

    #[test]
    fn test_one_second_drains_sixty() {
        let (mut timer, clock) = build_timer();
        timer.set(60);
        clock.advance(Duration::from_secs(1));
        assert_eq!(timer.get(), 0);

        timer.set(100);
        clock.advance(Duration::from_secs(1));
        assert_eq!(timer.get(), 40);
    }

    #[test]
    fn test_clamps_at_zero() {
        let (mut timer, clock) = build_timer();
        timer.set(5);
        clock.advance(Duration::from_secs(3600));
        assert_eq!(timer.get(), 0);
    }

    #[test]
    fn test_partial_ticks_carry_over() {
        let (mut timer, clock) = build_timer();
        timer.set(10);
        clock.advance(Duration::from_millis(25));
        assert_eq!(timer.get(), 9);
        // 35ms since set is two whole ticks, even though only 10ms passed since the last read
        clock.advance(Duration::from_millis(10));
        assert_eq!(timer.get(), 8);
    }

    #[test]
    fn test_chained_reads_match_single_read() {
        let (mut chained, chained_clock) = build_timer();
        let (mut single, single_clock) = build_timer();
        chained.set(255);
        single.set(255);
        for _ in 0..100 {
            chained_clock.advance(Duration::from_millis(7));
            chained.get();
        }
        single_clock.advance(Duration::from_millis(700));
        assert_eq!(chained.get(), single.get());
        assert_eq!(single.get(), 255 - 42);
    }
}
