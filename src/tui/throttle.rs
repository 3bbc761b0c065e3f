//! Rate limiting for repeated input
//!
//! Held-down keys repeat faster than the list can re-render; a [`Throttle`]
//! lets the first event of a burst through and drops the rest of the window.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// Returns true (and starts a new window) if `now` is outside the current window
    pub fn try_fire(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn test_first_event_fires() {
        let mut throttle = Throttle::new(WINDOW);
        assert!(throttle.try_fire(Instant::now()));
    }

    #[test]
    fn test_burst_within_window_is_dropped() {
        let mut throttle = Throttle::new(WINDOW);
        let start = Instant::now();
        assert!(throttle.try_fire(start));
        assert!(!throttle.try_fire(start + Duration::from_millis(10)));
        assert!(!throttle.try_fire(start + Duration::from_millis(99)));
        assert!(throttle.try_fire(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_dropped_events_do_not_extend_window() {
        let mut throttle = Throttle::new(WINDOW);
        let start = Instant::now();
        assert!(throttle.try_fire(start));
        assert!(!throttle.try_fire(start + Duration::from_millis(60)));
        // Window measured from the last fired event, not the last attempt
        assert!(throttle.try_fire(start + Duration::from_millis(120)));
    }

    #[test]
    fn test_zero_interval_never_throttles() {
        let mut throttle = Throttle::new(Duration::ZERO);
        let now = Instant::now();
        assert!(throttle.try_fire(now));
        assert!(throttle.try_fire(now));
    }
}
