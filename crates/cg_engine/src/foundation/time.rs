//! Time sources for animation sampling
//!
//! Animation evaluation never reads a clock itself. A driver reads one of
//! these once per frame and passes the elapsed seconds down explicitly.

use std::time::{Duration, Instant};

/// Anything that can report the seconds elapsed since animation start
pub trait Clock {
    /// Seconds elapsed since the clock started
    fn elapsed_secs(&self) -> f32;
}

/// Simple stopwatch over the monotonic system clock
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Reset the stopwatch to zero
    pub fn reset(&mut self) {
        self.start_time = None;
        self.elapsed = Duration::ZERO;
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let running = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + running
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

impl Clock for Stopwatch {
    fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}

/// Clock advanced by hand, for deterministic playback and tests
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    seconds: f32,
}

impl ManualClock {
    /// Create a clock reading `seconds`
    pub fn at(seconds: f32) -> Self {
        Self { seconds }
    }

    /// Move the clock forward by `delta` seconds
    pub fn advance(&mut self, delta: f32) {
        self.seconds += delta;
    }

    /// Jump to an absolute time
    pub fn set(&mut self, seconds: f32) {
        self.seconds = seconds;
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&self) -> f32 {
        self.seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let mut clock = ManualClock::default();
        clock.advance(0.5);
        clock.advance(1.25);
        assert_eq!(clock.elapsed_secs(), 1.75);
        clock.set(10.0);
        assert_eq!(clock.elapsed_secs(), 10.0);
    }

    #[test]
    fn test_stopwatch_stopped_does_not_advance() {
        let mut stopwatch = Stopwatch::start_new();
        assert!(stopwatch.is_running());
        stopwatch.stop();
        let frozen = stopwatch.elapsed();
        assert_eq!(stopwatch.elapsed(), frozen);
        stopwatch.reset();
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
        assert!(!stopwatch.is_running());
    }
}
