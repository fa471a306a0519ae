//! Frame delta timing for the motion model.

use web_time::{Duration, Instant};

/// Longest frame delta handed to the motion model.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Per-frame elapsed time source.
pub struct FrameClock {
    /// Last frame timestamp
    last_frame: Instant,
}

impl FrameClock {
    /// Clock starting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Seconds since the previous tick, clamped to `[0, 0.25]`.
    pub fn tick(&mut self) -> f32 {
        self.advance_to(Instant::now())
    }

    fn advance_to(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_frame);
        if now > self.last_frame {
            self.last_frame = now;
        }
        elapsed.min(MAX_FRAME_DELTA).as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_time_since_last_tick() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame;
        let dt = clock.advance_to(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        let dt = clock.advance_to(start + Duration::from_millis(48));
        assert!((dt - 0.032).abs() < 1e-6);
    }

    #[test]
    fn delta_is_never_negative() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame;
        let _ = clock.advance_to(start + Duration::from_millis(100));
        assert_eq!(clock.advance_to(start), 0.0);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame;
        let dt = clock.advance_to(start + Duration::from_secs(5));
        assert_eq!(dt, 0.25);
    }
}
