//! Repeating interval timer driven by elapsed time

/// Fires every `interval` seconds until stopped. Stopping is permanent for
/// this timer; a new level builds a new one.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: f32,
    elapsed: f32,
    active: bool,
}

impl IntervalTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            elapsed: 0.0,
            active: true,
        }
    }

    /// Advance by `dt` seconds and return how many times the timer fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.active {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_interval() {
        let mut timer = IntervalTimer::new(0.5);
        assert_eq!(timer.advance(0.25), 0);
        assert_eq!(timer.advance(0.25), 1);
        assert_eq!(timer.advance(1.0), 2);
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut timer = IntervalTimer::new(0.5);
        timer.stop();
        assert!(!timer.is_active());
        assert_eq!(timer.advance(10.0), 0);
    }
}
