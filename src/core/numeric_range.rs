use serde::{Deserialize, Serialize};

use crate::core::axis::{AxisConfig, RangePadding};
use crate::core::double_range::AxisRange;
use crate::core::types::{Orientation, Size};
use crate::error::{ChartError, ChartResult};

/// Labels per 100 px multiplier for horizontal axes (labels are wider than tall).
pub const HORIZONTAL_LABEL_DENSITY: f64 = 0.533;
/// Labels per 100 px multiplier for vertical axes.
pub const VERTICAL_LABEL_DENSITY: f64 = 1.0;
/// Interval multipliers tried per power of ten, coarsest first.
pub const NICE_INTERVAL_LADDER: [f64; 5] = [10.0, 5.0, 2.5, 2.0, 1.0];

/// Tuning knobs for range padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTuning {
    /// Fraction of an interval under which a padded boundary snaps one more interval.
    pub snap_threshold: f64,
    /// Relative padding added away from zero by `RangePadding::Normal`.
    pub normal_padding_ratio: f64,
}

impl Default for RangeTuning {
    fn default() -> Self {
        Self {
            snap_threshold: 0.365,
            normal_padding_ratio: 0.05,
        }
    }
}

impl RangeTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.snap_threshold.is_finite() || !(0.0..1.0).contains(&self.snap_threshold) {
            return Err(ChartError::InvalidData(
                "range snap threshold must be finite and in [0, 1)".to_owned(),
            ));
        }
        if !self.normal_padding_ratio.is_finite() || self.normal_padding_ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "normal padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Number of intervals an axis of `size` should show.
///
/// `desired_intervals` wins when configured; otherwise the count follows the
/// axis pixel length and `maximum_labels` (labels per 100 px).
#[must_use]
pub fn desired_interval_count(config: &AxisConfig, size: Size) -> f64 {
    if let Some(desired) = config.desired_intervals {
        if desired.is_finite() && desired > 0.0 {
            return desired;
        }
    }
    let density = match config.orientation {
        Orientation::Horizontal => HORIZONTAL_LABEL_DENSITY,
        Orientation::Vertical => VERTICAL_LABEL_DENSITY,
    };
    let length = config.length_in(size);
    if !length.is_finite() || length <= 0.0 {
        return 1.0;
    }
    (length * density * config.maximum_labels / 100.0).max(1.0)
}

/// Rounds `delta / desired_count` up to a value from [`NICE_INTERVAL_LADDER`].
///
/// The returned interval never yields more than `desired_count` steps across
/// `delta`. Degenerate input returns `1.0`.
#[must_use]
pub fn nice_interval(delta: f64, desired_count: f64) -> f64 {
    if !delta.is_finite() || delta <= 0.0 {
        return 1.0;
    }
    let desired = if desired_count.is_finite() && desired_count >= 1.0 {
        desired_count
    } else {
        1.0
    };

    let raw = delta / desired;
    let magnitude = 10_f64.powf(raw.log10().floor());
    // The ladder's largest step (10 × magnitude) always covers `raw`, so the
    // walk below starts from an admissible candidate.
    let mut interval = magnitude * NICE_INTERVAL_LADDER[0];
    for multiplier in NICE_INTERVAL_LADDER {
        let candidate = magnitude * multiplier;
        if delta / candidate > desired {
            break;
        }
        interval = candidate;
    }
    interval
}

/// Interval for `delta` honouring the axis `desired_intervals` override.
///
/// An explicit desired count divides the span exactly instead of snapping.
#[must_use]
pub fn numeric_interval(config: &AxisConfig, delta: f64, size: Size) -> f64 {
    let desired = desired_interval_count(config, size);
    if config.desired_intervals.is_some() {
        let interval = delta / desired;
        if interval.is_finite() && interval > 0.0 {
            return interval;
        }
        return 1.0;
    }
    nice_interval(delta, desired)
}

/// Replaces `Auto` with the concrete padding for the axis role.
///
/// The value axis (vertical, or horizontal on transposed charts) pads with
/// `Normal` (`Round` for 100 % stacking); category/x axes do not pad.
#[must_use]
pub fn resolve_range_padding(config: &AxisConfig, transposed: bool, is_stack100: bool) -> RangePadding {
    if config.range_padding != RangePadding::Auto {
        return config.range_padding;
    }
    let is_value_axis = match config.orientation {
        Orientation::Horizontal => transposed,
        Orientation::Vertical => !transposed,
    };
    if !is_value_axis {
        RangePadding::None
    } else if is_stack100 {
        RangePadding::Round
    } else {
        RangePadding::Normal
    }
}

/// Applies a concrete padding policy to `start..end` with the given interval.
///
/// `repick_interval` recomputes the interval for a new span; it is used by
/// `Normal` padding once the range has been anchored at zero or lies wholly
/// below it.
pub fn apply_range_padding<F>(
    padding: RangePadding,
    start: f64,
    end: f64,
    interval: f64,
    tuning: RangeTuning,
    repick_interval: F,
) -> AxisRange
where
    F: Fn(f64) -> f64,
{
    let interval = if interval.is_finite() && interval > 0.0 {
        interval
    } else {
        1.0
    };
    match padding {
        RangePadding::Auto | RangePadding::None => AxisRange::new(start, end, interval),
        RangePadding::Round => {
            let (min, max) = snap_outward(start, end, interval);
            AxisRange::new(min, max, interval)
        }
        RangePadding::Additional => {
            let (min, max) = snap_outward(start, end, interval);
            AxisRange::new(min - interval, max + interval, interval)
        }
        RangePadding::Normal => normal_padding(start, end, interval, tuning, repick_interval),
    }
}

fn snap_outward(start: f64, end: f64, interval: f64) -> (f64, f64) {
    (
        (start / interval).floor() * interval,
        (end / interval).ceil() * interval,
    )
}

fn normal_padding<F>(start: f64, end: f64, interval: f64, tuning: RangeTuning, repick_interval: F) -> AxisRange
where
    F: Fn(f64) -> f64,
{
    let ratio = tuning.normal_padding_ratio;
    let threshold = tuning.snap_threshold * interval;

    let mut anchor = start;
    let mut minimum;
    if start < 0.0 {
        anchor = 0.0;
        minimum = start + start * ratio;
        let remaining = interval + minimum % interval;
        if threshold >= remaining {
            minimum -= interval;
        }
        minimum = (minimum / interval).floor() * interval;
    } else {
        minimum = if start < (5.0 / 6.0) * end {
            0.0
        } else {
            start - (end - start) * 0.5
        };
        minimum = (minimum / interval).floor() * interval;
    }

    let mut maximum = if end > 0.0 {
        end + (end - anchor) * ratio
    } else {
        end - (end - anchor) * ratio
    };
    let remaining = interval - maximum % interval;
    if threshold >= remaining {
        maximum += interval;
    }
    maximum = (maximum / interval).ceil() * interval;

    // A zero-anchored or all-negative range spans a different delta than the
    // one the interval was picked for.
    let mut interval = interval;
    if minimum == 0.0 || (minimum < 0.0 && maximum < 0.0) {
        let repicked = repick_interval(maximum - minimum);
        if repicked.is_finite() && repicked > 0.0 {
            interval = repicked;
            maximum = (maximum / interval).ceil() * interval;
        }
    }
    AxisRange::new(minimum, maximum, interval)
}

#[cfg(test)]
mod tests {
    use super::{nice_interval, normal_padding, RangeTuning};

    #[test]
    fn nice_interval_prefers_finest_admissible_step() {
        assert_eq!(nice_interval(6.0, 5.0), 2.0);
        assert_eq!(nice_interval(10.0, 5.0), 2.0);
        assert_eq!(nice_interval(6.0, 9.0), 1.0);
        assert_eq!(nice_interval(100.0, 3.0), 50.0);
    }

    #[test]
    fn nice_interval_uses_two_and_a_half_rung() {
        // 10 / 4 = 2.5 exactly, 2.0 would need 5 steps.
        assert_eq!(nice_interval(10.0, 4.0), 2.5);
    }

    #[test]
    fn degenerate_delta_falls_back_to_unit_interval() {
        assert_eq!(nice_interval(0.0, 5.0), 1.0);
        assert_eq!(nice_interval(f64::NAN, 5.0), 1.0);
        assert_eq!(nice_interval(-3.0, 5.0), 1.0);
    }

    #[test]
    fn normal_padding_anchors_positive_ranges_at_zero() {
        let range = normal_padding(2.0, 8.0, 2.0, RangeTuning::default(), |delta| {
            nice_interval(delta, 5.0)
        });
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 10.0);
        assert_eq!(range.interval, 2.0);
    }

    #[test]
    fn normal_padding_snaps_extra_interval_when_close_to_boundary() {
        // 9.2 pads to 9.66, only 0.34 short of 10.0, so a full interval is added.
        let range = normal_padding(0.0, 9.2, 2.0, RangeTuning::default(), |_| 2.0);
        assert_eq!(range.max, 12.0);
    }

    #[test]
    fn normal_padding_repicks_interval_for_all_negative_ranges() {
        let range = normal_padding(-50.0, -30.0, 10.0, RangeTuning::default(), |delta| delta / 2.0);
        assert_eq!(range.min, -60.0);
        assert_eq!(range.max, -20.0);
        assert_eq!(range.interval, 20.0);

        // Mixed-sign ranges keep the interval they were snapped with.
        let mixed = normal_padding(-7.0, 8.0, 2.0, RangeTuning::default(), |_| 5.0);
        assert_eq!(mixed.interval, 2.0);
    }

    #[test]
    fn normal_padding_extends_negative_start() {
        let range = normal_padding(-7.0, 8.0, 2.0, RangeTuning::default(), |_| 2.0);
        assert_eq!(range.min, -10.0);
        assert_eq!(range.max, 10.0);
    }
}
