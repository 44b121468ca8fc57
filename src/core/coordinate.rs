//! Value ↔ pixel mapping for finalized axes.
//!
//! All functions are pure and allocation-free. Pixels are relative to the
//! plot area origin with y growing downward; `to_absolute` shifts them into
//! chart space.

use crate::core::axis::{Axis, ValueType};
use crate::core::primitives::log_base;
use crate::core::types::{PixelPoint, PlotRect};

/// Converts a raw value into the axis' range space.
///
/// Logarithmic axes work in exponent space; non-positive values clamp to the
/// visible minimum exponent.
#[must_use]
pub fn to_axis_space(value: f64, axis: &Axis) -> f64 {
    if axis.value_type() != ValueType::Logarithmic {
        return value;
    }
    if value > 0.0 {
        log_base(value, axis.log_base())
    } else {
        axis.visible_range.min
    }
}

/// Normalized position of a range-space value, flipped for inversed axes.
#[must_use]
pub fn range_coefficient(axis_value: f64, axis: &Axis) -> f64 {
    let range = axis.visible_range;
    let delta = range.delta();
    let coefficient = if delta == 0.0 {
        0.0
    } else {
        (axis_value - range.min) / delta
    };
    if axis.is_inversed() {
        1.0 - coefficient
    } else {
        coefficient
    }
}

#[must_use]
pub fn value_to_coefficient(value: f64, axis: &Axis) -> f64 {
    range_coefficient(to_axis_space(value, axis), axis)
}

/// Inverse of [`value_to_coefficient`].
#[must_use]
pub fn coefficient_to_value(coefficient: f64, axis: &Axis) -> f64 {
    let coefficient = if axis.is_inversed() {
        1.0 - coefficient
    } else {
        coefficient
    };
    let range = axis.visible_range;
    let axis_value = range.min + coefficient * range.delta();
    if axis.value_type() == ValueType::Logarithmic {
        axis.log_base().powf(axis_value)
    } else {
        axis_value
    }
}

/// Maps a data pair to a pixel inside the plot area.
///
/// On transposed charts the x axis runs vertically and the y axis
/// horizontally, so their roles in the pixel pair swap.
#[must_use]
pub fn to_pixel(x: f64, y: f64, x_axis: &Axis, y_axis: &Axis, transposed: bool) -> PixelPoint {
    let x_coefficient = value_to_coefficient(x, x_axis);
    let y_coefficient = value_to_coefficient(y, y_axis);
    if transposed {
        PixelPoint::new(
            y_coefficient * y_axis.length(),
            (1.0 - x_coefficient) * x_axis.length(),
        )
    } else {
        PixelPoint::new(
            x_coefficient * x_axis.length(),
            (1.0 - y_coefficient) * y_axis.length(),
        )
    }
}

/// Maps a plot-relative pixel back to its `(x, y)` data pair.
#[must_use]
pub fn pixel_to_value(point: PixelPoint, x_axis: &Axis, y_axis: &Axis, transposed: bool) -> (f64, f64) {
    let (x_coefficient, y_coefficient) = if transposed {
        (
            1.0 - safe_ratio(point.y, x_axis.length()),
            safe_ratio(point.x, y_axis.length()),
        )
    } else {
        (
            safe_ratio(point.x, x_axis.length()),
            1.0 - safe_ratio(point.y, y_axis.length()),
        )
    };
    (
        coefficient_to_value(x_coefficient, x_axis),
        coefficient_to_value(y_coefficient, y_axis),
    )
}

fn safe_ratio(value: f64, length: f64) -> f64 {
    if length == 0.0 { 0.0 } else { value / length }
}

/// Shifts a plot-relative pixel into chart coordinates.
#[must_use]
pub fn to_absolute(point: PixelPoint, plot_rect: PlotRect) -> PixelPoint {
    PixelPoint::new(point.x + plot_rect.x, point.y + plot_rect.y)
}

#[cfg(test)]
mod tests {
    use super::{coefficient_to_value, to_pixel, value_to_coefficient};
    use crate::core::axis::{Axis, AxisConfig, ValueType};
    use crate::core::double_range::AxisRange;
    use crate::core::types::PlotRect;

    fn axis(config: AxisConfig, min: f64, max: f64, rect: PlotRect) -> Axis {
        let mut axis = Axis::new(config, rect);
        axis.visible_range = AxisRange::new(min, max, 1.0);
        axis.actual_range = axis.visible_range;
        axis
    }

    #[test]
    fn log_axis_clamps_non_positive_values_to_minimum() {
        let axis = axis(
            AxisConfig::vertical("y").with_value_type(ValueType::Logarithmic),
            1.0,
            3.0,
            PlotRect::new(0.0, 0.0, 10.0, 200.0),
        );
        assert_eq!(value_to_coefficient(-5.0, &axis), 0.0);
        assert!((value_to_coefficient(100.0, &axis) - 0.5).abs() <= 1e-12);
        assert!((coefficient_to_value(0.5, &axis) - 100.0).abs() <= 1e-9);
    }

    #[test]
    fn inversed_axis_flips_the_coefficient() {
        let axis = axis(
            AxisConfig::horizontal("x").with_inversed(true),
            0.0,
            10.0,
            PlotRect::new(0.0, 0.0, 100.0, 10.0),
        );
        assert!((value_to_coefficient(2.0, &axis) - 0.8).abs() <= 1e-12);
        assert!((coefficient_to_value(0.8, &axis) - 2.0).abs() <= 1e-12);
    }

    #[test]
    fn transposed_chart_swaps_pixel_roles() {
        let x_axis = axis(
            AxisConfig::vertical("x"),
            0.0,
            10.0,
            PlotRect::new(0.0, 0.0, 10.0, 200.0),
        );
        let y_axis = axis(
            AxisConfig::horizontal("y"),
            0.0,
            100.0,
            PlotRect::new(0.0, 0.0, 400.0, 10.0),
        );
        let pixel = to_pixel(5.0, 25.0, &x_axis, &y_axis, true);
        assert!((pixel.x - 100.0).abs() <= 1e-9);
        assert!((pixel.y - 100.0).abs() <= 1e-9);
    }
}
