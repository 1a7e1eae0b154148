//! Frame timing and the pause switch.

use std::time::Instant;

/// Measures the time between redraws and remembers whether the orbits are
/// paused.
///
/// Pausing only freezes orbit angles; frames keep being timed so resuming
/// does not jump by the paused duration.
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    last_timestamp: Option<Instant>,
    paused: bool,
}

impl AnimationClock {
    pub fn new(paused: bool) -> Self {
        Self {
            last_timestamp: None,
            paused,
        }
    }

    /// Seconds since the previous tick. The first tick returns zero.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = self
            .last_timestamp
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last_timestamp = Some(now);
        dt
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            tracing::info!(paused, "Animation {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Flip the pause state, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    /// Label for the control that flips the pause state.
    pub fn action_label(&self) -> &'static str {
        if self.paused { "Start" } else { "Stop" }
    }

    pub fn last_timestamp(&self) -> Option<Instant> {
        self.last_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = AnimationClock::default();
        assert_eq!(clock.tick(Instant::now()), 0.0);
        assert!(clock.last_timestamp().is_some());
    }

    #[test]
    fn test_tick_measures_seconds() {
        let mut clock = AnimationClock::default();
        let start = Instant::now();
        clock.tick(start);
        let dt = clock.tick(start + Duration::from_millis(250));
        assert!((dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_time_going_backwards_is_zero() {
        let mut clock = AnimationClock::default();
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick(start);
        assert_eq!(clock.tick(start - Duration::from_millis(10)), 0.0);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut clock = AnimationClock::new(false);
        clock.set_paused(true);
        clock.set_paused(true);
        assert!(clock.is_paused());
        assert_eq!(clock.action_label(), "Start");

        assert!(!clock.toggle());
        assert_eq!(clock.action_label(), "Stop");
        assert!(clock.toggle());
        assert!(!clock.toggle());
    }

    #[test]
    fn test_starts_paused_when_asked() {
        let clock = AnimationClock::new(true);
        assert!(clock.is_paused());
    }
}
