use serde::{Deserialize, Serialize};

/// Normalized numeric span with `start <= end`.
///
/// Construction swaps reversed bounds so downstream code never has to check
/// ordering again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoubleRange {
    start: f64,
    end: f64,
}

impl DoubleRange {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        if start > end {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    #[must_use]
    pub fn start(self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn delta(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn median(self) -> f64 {
        self.start + self.delta() * 0.5
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }
}

/// Computed axis range: bounds plus tick interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub interval: f64,
}

impl AxisRange {
    #[must_use]
    pub fn new(min: f64, max: f64, interval: f64) -> Self {
        let range = DoubleRange::new(min, max);
        Self {
            min: range.start(),
            max: range.end(),
            interval,
        }
    }

    #[must_use]
    pub fn delta(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn as_double_range(self) -> DoubleRange {
        DoubleRange::new(self.min, self.max)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 5.0,
            interval: 1.0,
        }
    }
}
