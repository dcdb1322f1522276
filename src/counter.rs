// Number counters that ease up to their target once scrolled into view.

use crate::config::CounterConfig;

/// Ease-out cubic; `progress` is clamped to [0, 1].
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.max(0.0).min(1.0);
    1.0 - (1.0 - p).powi(3)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CounterAnimation {
    pub target: f64,
    pub duration_ms: f64,
    pub start_ms: f64,
}

impl CounterAnimation {
    pub fn new(target: f64, start_ms: f64, config: &CounterConfig) -> CounterAnimation {
        CounterAnimation {
            target,
            duration_ms: config.duration_ms,
            start_ms,
        }
    }

    pub fn progress(&self, now_ms: f64) -> f64 {
        ((now_ms - self.start_ms) / self.duration_ms).max(0.0).min(1.0)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Value to display at `now_ms`: floored while running, exactly the target when done.
    pub fn value_at(&self, now_ms: f64) -> f64 {
        let progress = self.progress(now_ms);
        if progress >= 1.0 {
            self.target
        } else {
            (self.target * ease_out_cubic(progress)).floor()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
        assert_eq!(ease_out_cubic(4.0), 1.0);
        assert_eq!(ease_out_cubic(-1.0), 0.0);
    }

    #[test]
    fn counter_floors_while_running() {
        let counter = CounterAnimation::new(500.0, 1000.0, &CounterConfig::default());
        assert_eq!(counter.value_at(1000.0), 0.0);
        assert_eq!(counter.value_at(2000.0), 437.0);
        assert!(!counter.is_finished(2999.0));
    }

    #[test]
    fn counter_lands_exactly_on_target() {
        let counter = CounterAnimation::new(99.5, 0.0, &CounterConfig::default());
        assert_eq!(counter.value_at(2000.0), 99.5);
        assert_eq!(counter.value_at(10_000.0), 99.5);
        assert!(counter.is_finished(2000.0));
    }

    #[test]
    fn time_before_start_shows_zero() {
        let counter = CounterAnimation::new(10.0, 500.0, &CounterConfig::default());
        assert_eq!(counter.value_at(0.0), 0.0);
    }
}
