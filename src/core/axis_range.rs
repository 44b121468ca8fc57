//! Per-axis range pipeline: collect → actual range → padding → zoom → labels.
//!
//! Every pass starts from a fresh [`RangeAccumulator`]; nothing carries over
//! between passes, so repeated layout with identical input is idempotent.

use tracing::debug;

use crate::core::axis::{Axis, DateTimeIntervalType, LabelPlacement, RangePadding, ValueType};
use crate::core::axis_labels::{generate_labels, AxisLabelCallback};
use crate::core::datetime_range::{datetime_interval, pad_datetime_range};
use crate::core::double_range::{AxisRange, DoubleRange};
use crate::core::numeric_range::{
    apply_range_padding, desired_interval_count, nice_interval, numeric_interval,
    resolve_range_padding, RangeTuning,
};
use crate::core::primitives::log_base;
use crate::core::series::{min_points_delta, prepare_points, Series, SeriesKind};
use crate::core::stacking::StackedValues;
use crate::core::types::Size;

/// Default span used when an axis has no data.
pub const DEFAULT_RANGE: (f64, f64) = (0.0, 5.0);

/// Which data dimension a series contributes to an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    X,
    Y,
}

/// Running range collected from the series bound to one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeAccumulator {
    pub min: f64,
    pub max: f64,
    /// Number of column/bar series widening the value axis.
    pub column_count: usize,
    pub is_stacking: bool,
    pub is_stack100: bool,
    /// Largest half point-delta applied to x extents of rect series.
    pub padding_interval: f64,
}

impl Default for RangeAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            column_count: 0,
            is_stacking: false,
            is_stack100: false,
            padding_interval: 0.0,
        }
    }

    pub fn merge(&mut self, value: f64) {
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    pub fn merge_extent(&mut self, min: f64, max: f64) {
        self.merge(min);
        self.merge(max);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Merges the contribution of one series bound to `axis` in `role`.
    ///
    /// Hidden series are skipped. Stacking series contribute their stacked
    /// values on the value axis.
    pub fn collect_series(
        &mut self,
        axis: &Axis,
        role: AxisRole,
        series: &Series,
        stacked: Option<&StackedValues>,
    ) {
        if !series.visible {
            return;
        }
        match role {
            AxisRole::X => self.collect_x(axis, series),
            AxisRole::Y => self.collect_y(series, stacked),
        }
    }

    fn collect_x(&mut self, axis: &Axis, series: &Series) {
        let mut local = Self::new();
        for point in &series.points {
            if let Some(x) = point.x {
                local.merge(x);
            }
        }
        if local.is_empty() {
            return;
        }

        let pads_rects = series.kind.is_rect()
            && matches!(axis.value_type(), ValueType::Double | ValueType::DateTime)
            && axis.config.range_padding == RangePadding::Auto;
        if pads_rects {
            let padding = min_points_delta([series]) * 0.5;
            local.min -= padding;
            local.max += padding;
            self.padding_interval = self.padding_interval.max(padding);
        }
        self.merge_extent(local.min, local.max);
    }

    fn collect_y(&mut self, series: &Series, stacked: Option<&StackedValues>) {
        let kind = series.kind;
        if kind.widens_value_axis() {
            self.column_count += 1;
        }
        self.is_stacking |= kind.is_stacking();
        self.is_stack100 |= kind.is_stacking_100();

        if let Some(stacked) = stacked.filter(|_| kind.is_stacking()) {
            if let Some((min, max)) = stacked.extent() {
                self.merge_extent(min, max);
            }
            return;
        }

        let error_bar = series.style.error_bar;
        for point in prepare_points(series) {
            if !point.visible {
                continue;
            }
            if kind == SeriesKind::ErrorBar && error_bar.has_vertical() {
                let (minus, plus) = error_bar.offsets(error_bar.vertical, point.y);
                self.merge_extent(point.y - minus, point.y + plus);
            } else {
                self.merge_extent(point.low, point.high);
            }
        }
    }
}

/// Runs the range pipeline for one axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisRangeEngine {
    tuning: RangeTuning,
}

impl AxisRangeEngine {
    #[must_use]
    pub fn new(tuning: RangeTuning) -> Self {
        Self { tuning }
    }

    #[must_use]
    pub fn tuning(&self) -> RangeTuning {
        self.tuning
    }

    /// Computes actual and visible ranges and the label set of `axis`.
    ///
    /// `transposed` decides which axis is the value axis for `Auto` padding.
    pub fn compute(
        &self,
        axis: &mut Axis,
        accumulator: &RangeAccumulator,
        transposed: bool,
        callback: Option<&dyn AxisLabelCallback>,
    ) {
        axis.is_stack100 = accumulator.is_stack100;
        axis.actual_interval_type = DateTimeIntervalType::Auto;

        let (min, max) = raw_range(axis, accumulator);
        axis.double_range = DoubleRange::new(min, max);

        let actual = match axis.value_type() {
            ValueType::Double => self.double_range(axis, accumulator, transposed),
            ValueType::Logarithmic => logarithmic_range(axis),
            ValueType::Category => category_range(axis),
            ValueType::DateTime => self.datetime_range(axis, transposed),
        };
        axis.actual_range = actual;
        axis.visible_range = zoomed_range(axis);
        axis.labels = generate_labels(axis, callback);

        debug!(
            axis = axis.name(),
            min = axis.actual_range.min,
            max = axis.actual_range.max,
            interval = axis.actual_range.interval,
            visible_min = axis.visible_range.min,
            visible_max = axis.visible_range.max,
            labels = axis.labels.len(),
            "axis range computed"
        );
    }

    fn double_range(&self, axis: &Axis, accumulator: &RangeAccumulator, transposed: bool) -> AxisRange {
        let config = &axis.config;
        let size = axis_size(axis);
        let start = axis.double_range.start();
        let end = axis.double_range.end();
        let interval = config
            .interval
            .unwrap_or_else(|| numeric_interval(config, end - start, size));

        let user_bounded = config.minimum.is_some() && config.maximum.is_some();
        if user_bounded || accumulator.is_empty() {
            return AxisRange::new(start, end, interval);
        }

        let padding = resolve_range_padding(config, transposed, accumulator.is_stack100);
        let padded = apply_range_padding(padding, start, end, interval, self.tuning, |delta| {
            numeric_interval(config, delta, size)
        });
        let interval = config.interval.unwrap_or(padded.interval);
        let mut min = config.minimum.unwrap_or(padded.min);
        let mut max = config.maximum.unwrap_or(padded.max);

        if !config.start_from_zero && accumulator.column_count > 0 {
            if config.maximum.is_none() {
                max += interval;
            }
            if config.minimum.is_none() && !accumulator.is_stacking {
                let widened = min - interval;
                min = if min >= 0.0 && widened < 0.0 { 0.0 } else { widened };
            }
        }
        AxisRange::new(min, max, interval)
    }

    fn datetime_range(&self, axis: &mut Axis, transposed: bool) -> AxisRange {
        let config = &axis.config;
        let start = axis.double_range.start();
        let end = axis.double_range.end();
        let (computed, unit) = datetime_interval(config, start, end, axis_size(axis));
        let unit = match (config.interval, config.interval_type) {
            (Some(_), DateTimeIntervalType::Auto) => DateTimeIntervalType::Days,
            (Some(_), unit) => unit,
            (None, _) => unit,
        };
        let interval = config.interval.unwrap_or(computed);
        axis.actual_interval_type = unit;

        if config.minimum.is_some() && config.maximum.is_some() {
            return AxisRange::new(start, end, interval);
        }
        let padding = resolve_range_padding(config, transposed, false);
        let padded = pad_datetime_range(padding, start, end, interval, unit);
        AxisRange::new(
            config.minimum.unwrap_or(padded.min),
            config.maximum.unwrap_or(padded.max),
            interval,
        )
    }
}

/// Data extents overridden by user bounds; degenerate spans widen to `+1`.
fn raw_range(axis: &Axis, accumulator: &RangeAccumulator) -> (f64, f64) {
    let config = &axis.config;
    let (data_min, data_max) = if accumulator.is_empty() {
        default_extent(axis)
    } else {
        (accumulator.min, accumulator.max)
    };
    let mut min = config.minimum.filter(|v| v.is_finite()).unwrap_or(data_min);
    let mut max = config.maximum.filter(|v| v.is_finite()).unwrap_or(data_max);
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }
    if min == max {
        max = min + 1.0;
    }
    (min, max)
}

fn default_extent(axis: &Axis) -> (f64, f64) {
    if axis.value_type() == ValueType::Category && !axis.categories.is_empty() {
        return (0.0, (axis.categories.len() - 1) as f64);
    }
    if axis.value_type() == ValueType::Logarithmic {
        // 10^0 .. 10^5 in the default base keeps the default span in exponent space.
        return (1.0, axis.log_base().powf(DEFAULT_RANGE.1));
    }
    DEFAULT_RANGE
}

fn axis_size(axis: &Axis) -> Size {
    Size::new(axis.rect.width, axis.rect.height)
}

fn desired_count(axis: &Axis) -> f64 {
    desired_interval_count(&axis.config, axis_size(axis))
}

fn logarithmic_range(axis: &Axis) -> AxisRange {
    let config = &axis.config;
    let base = axis.log_base();
    let start = axis.double_range.start();
    let end = axis.double_range.end();
    let min = if start > 0.0 {
        log_base(start, base).floor()
    } else {
        0.0
    };
    let mut max = if end > 0.0 {
        log_base(end, base).ceil()
    } else {
        min + 1.0
    };
    if max <= min {
        max = min + 1.0;
    }
    let interval = config
        .interval
        .unwrap_or_else(|| log_interval(max - min, desired_count(axis)));
    AxisRange::new(min, max, interval)
}

fn log_interval(delta: f64, desired: f64) -> f64 {
    nice_interval(delta, desired).floor().max(1.0)
}

fn category_range(axis: &Axis) -> AxisRange {
    let config = &axis.config;
    let mut min = axis.double_range.start();
    let mut max = axis.double_range.end();
    let interval = config
        .interval
        .unwrap_or_else(|| category_interval(max - min, desired_count(axis)));
    if config.label_placement == LabelPlacement::BetweenTicks {
        min -= 0.5;
        max += 0.5;
    }
    AxisRange::new(min, max, interval)
}

fn category_interval(delta: f64, desired: f64) -> f64 {
    nice_interval(delta, desired).ceil().max(1.0)
}

/// Applies zoom factor/position inside the actual range.
fn zoomed_range(axis: &mut Axis) -> AxisRange {
    let config = &axis.config;
    let actual = axis.actual_range;
    if config.zoom_factor >= 1.0 && config.zoom_position <= 0.0 {
        return actual;
    }
    let delta = actual.delta();
    let mut start = actual.min + config.zoom_position * delta;
    let mut end = start + config.zoom_factor * delta;
    if end > actual.max {
        start -= end - actual.max;
        end = actual.max;
    }
    if start < actual.min {
        start = actual.min;
    }

    if !config.enable_auto_interval_on_zooming || config.interval.is_some() {
        return AxisRange::new(start, end, actual.interval);
    }
    let span = end - start;
    let interval = match axis.value_type() {
        ValueType::Double => numeric_interval(config, span, axis_size(axis)),
        ValueType::Logarithmic => log_interval(span, desired_count(axis)),
        ValueType::Category => category_interval(span, desired_count(axis)),
        ValueType::DateTime => {
            let (interval, unit) = datetime_interval(config, start, end, axis_size(axis));
            axis.actual_interval_type = unit;
            interval
        }
    };
    AxisRange::new(start, end, interval)
}

#[cfg(test)]
mod tests {
    use super::{AxisRangeEngine, RangeAccumulator};
    use crate::core::axis::{Axis, AxisConfig, ValueType};
    use crate::core::types::PlotRect;

    fn vertical(config: AxisConfig) -> Axis {
        Axis::new(config, PlotRect::new(0.0, 0.0, 0.0, 500.0))
    }

    #[test]
    fn empty_axis_uses_default_span() {
        let mut axis = vertical(AxisConfig::vertical("y").with_desired_intervals(5.0));
        AxisRangeEngine::default().compute(&mut axis, &RangeAccumulator::new(), false, None);
        assert_eq!(axis.actual_range.min, 0.0);
        assert_eq!(axis.actual_range.max, 5.0);
    }

    #[test]
    fn equal_bounds_widen_by_one() {
        let mut axis = vertical(
            AxisConfig::vertical("y").with_range(Some(3.0), Some(3.0)),
        );
        AxisRangeEngine::default().compute(&mut axis, &RangeAccumulator::new(), false, None);
        assert_eq!(axis.actual_range.min, 3.0);
        assert_eq!(axis.actual_range.max, 4.0);
    }

    #[test]
    fn zoom_stays_inside_actual_range() {
        let mut axis = vertical(
            AxisConfig::vertical("y")
                .with_range(Some(0.0), Some(100.0))
                .with_zoom(0.5, 0.8),
        );
        AxisRangeEngine::default().compute(&mut axis, &RangeAccumulator::new(), false, None);
        assert_eq!(axis.visible_range.max, 100.0);
        assert_eq!(axis.visible_range.min, 50.0);
    }

    #[test]
    fn log_axis_works_in_exponent_space() {
        let mut accumulator = RangeAccumulator::new();
        accumulator.merge_extent(3.0, 2_000.0);
        let mut axis = vertical(
            AxisConfig::vertical("y").with_value_type(ValueType::Logarithmic),
        );
        AxisRangeEngine::default().compute(&mut axis, &accumulator, false, None);
        assert_eq!(axis.actual_range.min, 0.0);
        assert_eq!(axis.actual_range.max, 4.0);
        assert!(axis.actual_range.interval >= 1.0);
        assert_eq!(axis.labels.first().map(|label| label.text()), Some("1".to_owned()));
    }

    #[test]
    fn category_axis_pads_half_a_slot() {
        let mut accumulator = RangeAccumulator::new();
        accumulator.merge_extent(0.0, 2.0);
        let mut axis = Axis::new(
            AxisConfig::horizontal("x").with_value_type(ValueType::Category),
            PlotRect::new(0.0, 0.0, 600.0, 0.0),
        );
        axis.categories = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        AxisRangeEngine::default().compute(&mut axis, &accumulator, false, None);
        assert_eq!(axis.actual_range.min, -0.5);
        assert_eq!(axis.actual_range.max, 2.5);
        let texts: Vec<String> = axis.labels.iter().map(|label| label.text()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
