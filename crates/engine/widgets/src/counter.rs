//! Count-up animation for statistic counters

/// Total run time of a count-up, in milliseconds
pub const COUNTER_DURATION_MS: f64 = 2000.0;
/// Nominal frame time the increment is computed for
pub const COUNTER_STEP_MS: f64 = 16.0;

/// Counts from zero to `target`, one increment per animation frame
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: f64,
    current: f64,
    increment: f64,
    done: bool,
}

impl CounterAnimation {
    pub fn new(target: f64) -> Self {
        let target = if target.is_finite() { target } else { 0.0 };
        Self {
            target,
            current: 0.0,
            increment: target / (COUNTER_DURATION_MS / COUNTER_STEP_MS),
            done: false,
        }
    }

    /// Parse a `data-target` attribute; `None` if it is not a number
    pub fn from_attribute(value: &str) -> Option<Self> {
        value.trim().parse::<f64>().ok().map(Self::new)
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance one frame and return the text to display
    pub fn step(&mut self) -> String {
        if !self.done {
            self.current += self.increment;
            if self.current < self.target && self.increment > 0.0 {
                return format!("{}", self.current.floor());
            }
            self.done = true;
        }
        format_final(self.target)
    }
}

/// Integer targets print without decimals, others with one
pub fn format_final(target: f64) -> String {
    if target.fract() == 0.0 {
        format!("{target:.0}")
    } else {
        format!("{target:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_up_in_about_two_seconds() {
        let mut counter = CounterAnimation::new(150.0);
        let mut frames = 0;
        let mut last = String::new();
        while !counter.is_done() {
            last = counter.step();
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(last, "150");
        assert!((124..=127).contains(&frames));
    }

    #[test]
    fn test_intermediate_values_are_whole() {
        let mut counter = CounterAnimation::new(4.9);
        let first = counter.step();
        assert_eq!(first, "0");
        while !counter.is_done() {
            counter.step();
        }
        assert_eq!(counter.step(), "4.9");
    }

    #[test]
    fn test_format_final() {
        assert_eq!(format_final(98.0), "98");
        assert_eq!(format_final(4.26), "4.3");
        assert_eq!(format_final(0.0), "0");
    }

    #[test]
    fn test_from_attribute() {
        assert_eq!(CounterAnimation::from_attribute(" 12 ").unwrap().target(), 12.0);
        assert!(CounterAnimation::from_attribute("lots").is_none());
        assert_eq!(CounterAnimation::new(0.0).step(), "0");
    }
}
