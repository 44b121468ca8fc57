//! Axis label generation, formatting and text fitting.

use std::fmt::Write as _;

use tracing::{trace, warn};

use crate::core::axis::{Axis, AxisLabel, LabelIntersectAction, ValueType};
use crate::core::coordinate::range_coefficient;
use crate::core::datetime_range::{default_datetime_pattern, increase_datetime};
use crate::core::label_text::{split_line_breaks, trim_text, wrap_text, TextMetrics};
use crate::core::primitives::{fractional_digits, unix_seconds_to_datetime};
use crate::core::types::Orientation;
use crate::error::ChartResult;

/// Hard cap on generated labels per axis.
pub const MAX_AXIS_LABELS: usize = 1_000;

/// Outcome of a label callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelDecision {
    Keep,
    Replace(String),
    Suppress,
}

/// User hook invoked once per generated label.
///
/// Errors never abort label generation; the default text is used instead.
pub trait AxisLabelCallback {
    fn on_label(&self, axis_name: &str, value: f64, text: &str) -> ChartResult<LabelDecision>;
}

impl<F> AxisLabelCallback for F
where
    F: Fn(&str, f64, &str) -> ChartResult<LabelDecision>,
{
    fn on_label(&self, axis_name: &str, value: f64, text: &str) -> ChartResult<LabelDecision> {
        self(axis_name, value, text)
    }
}

/// Builds the label set for `axis.visible_range`.
#[must_use]
pub fn generate_labels(axis: &Axis, callback: Option<&dyn AxisLabelCallback>) -> Vec<AxisLabel> {
    let range = axis.visible_range;
    let interval = range.interval;
    if !interval.is_finite() || interval <= 0.0 || !range.min.is_finite() || !range.max.is_finite()
    {
        return Vec::new();
    }
    let tolerance = interval * 1e-9;
    let metrics = TextMetrics::new(axis.config.label_font_size_px);

    let mut labels = Vec::new();
    let mut value = label_start(axis);
    let mut step = 0_usize;
    while value <= range.max + tolerance && step < MAX_AXIS_LABELS {
        if value >= range.min - tolerance {
            let default_text = format_label(axis, value);
            if let Some(text) = apply_callback(axis, value, default_text, callback) {
                labels.push(fit_label(axis, value, text, metrics));
            }
        }
        step += 1;
        let next = next_label_value(axis, value, step);
        if !(next > value) {
            trace!(axis = axis.name(), value, "label walk stopped advancing");
            break;
        }
        value = next;
    }

    if axis.config.label_intersect_action == LabelIntersectAction::Hide {
        hide_overlapping(axis, &mut labels);
    }
    labels
}

fn label_start(axis: &Axis) -> f64 {
    let range = axis.visible_range;
    match axis.value_type() {
        // -0.5 with between-ticks placement would otherwise print -0.
        ValueType::Category => range.min.ceil() + 0.0,
        ValueType::DateTime => range.min,
        ValueType::Double | ValueType::Logarithmic => {
            if is_zoomed(axis) {
                range.min - range.min % range.interval
            } else {
                range.min
            }
        }
    }
}

fn is_zoomed(axis: &Axis) -> bool {
    axis.config.zoom_factor < 1.0 || axis.config.zoom_position > 0.0
}

fn next_label_value(axis: &Axis, value: f64, step: usize) -> f64 {
    let range = axis.visible_range;
    match axis.value_type() {
        ValueType::DateTime => increase_datetime(value, range.interval, axis.actual_interval_type),
        _ => label_start(axis) + step as f64 * range.interval,
    }
}

fn apply_callback(
    axis: &Axis,
    value: f64,
    text: String,
    callback: Option<&dyn AxisLabelCallback>,
) -> Option<String> {
    let Some(callback) = callback else {
        return Some(text);
    };
    match callback.on_label(axis.name(), value, &text) {
        Ok(LabelDecision::Keep) => Some(text),
        Ok(LabelDecision::Replace(replacement)) => Some(replacement),
        Ok(LabelDecision::Suppress) => None,
        Err(err) => {
            warn!(axis = axis.name(), value, error = %err, "axis label callback failed; using default text");
            Some(text)
        }
    }
}

/// Default display text for `value` on `axis`.
#[must_use]
pub fn format_label(axis: &Axis, value: f64) -> String {
    match axis.value_type() {
        ValueType::Category => {
            let index = value.round();
            if index >= 0.0 {
                if let Some(name) = axis.categories.get(index as usize) {
                    return name.clone();
                }
            }
            format_numeric(axis, value)
        }
        ValueType::DateTime => format_datetime(axis, value),
        ValueType::Logarithmic => format_numeric(axis, axis.log_base().powf(value)),
        ValueType::Double => format_numeric(axis, value),
    }
}

fn format_numeric(axis: &Axis, value: f64) -> String {
    let digits = if axis.value_type() == ValueType::Logarithmic {
        fractional_digits(value)
    } else {
        fractional_digits(axis.visible_range.interval).max(fractional_digits(label_start(axis)))
    };
    match axis.config.label_format.as_deref() {
        None if axis.is_stack100 => format!("{}%", fixed(value, digits)),
        format => format_number(value, format, digits),
    }
}

/// Formats a number with an optional `n<d>`, `p<d>` or `{value}` format;
/// `digits` applies when the format does not fix its own precision.
#[must_use]
pub fn format_number(value: f64, format: Option<&str>, digits: usize) -> String {
    let default_text = fixed(value, digits);
    let Some(format) = format else {
        return default_text;
    };
    if let Some(digits) = format_digits(format, 'n') {
        fixed(value, digits)
    } else if let Some(digits) = format_digits(format, 'p') {
        format!("{}%", fixed(value * 100.0, digits))
    } else if format.contains("{value}") {
        format.replace("{value}", &default_text)
    } else {
        default_text
    }
}

/// Parses `n2`/`p0`-style format codes.
fn format_digits(format: &str, prefix: char) -> Option<usize> {
    let rest = format.strip_prefix(prefix)?;
    if rest.is_empty() {
        return Some(0);
    }
    rest.parse::<usize>().ok().map(|digits| digits.min(10))
}

fn fixed(value: f64, digits: usize) -> String {
    let text = format!("{value:.digits$}");
    // Avoid "-0" / "-0.00" for values that round to zero.
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_owned()
    } else {
        text
    }
}

fn format_datetime(axis: &Axis, value: f64) -> String {
    let Some(time) = unix_seconds_to_datetime(value) else {
        return fixed(value, 0);
    };
    let default_pattern = default_datetime_pattern(axis.actual_interval_type);
    let (pattern, template) = match axis.config.label_format.as_deref() {
        Some(format) if format.contains("{value}") => (default_pattern, Some(format)),
        Some(format) if format.contains('%') => (format, None),
        _ => (default_pattern, None),
    };

    let mut text = String::new();
    if write!(text, "{}", time.format(pattern)).is_err() {
        warn!(axis = axis.name(), pattern, "invalid datetime label pattern; using default");
        text.clear();
        if write!(text, "{}", time.format(default_pattern)).is_err() {
            return fixed(value, 0);
        }
    }
    match template {
        Some(template) => template.replace("{value}", &text),
        None => text,
    }
}

fn fit_label(axis: &Axis, value: f64, text: String, metrics: TextMetrics) -> AxisLabel {
    let mut lines = split_line_breaks(&text);
    if let Some(max_width) = axis.config.label_max_width {
        match axis.config.label_intersect_action {
            LabelIntersectAction::Trim => {
                lines = lines
                    .iter()
                    .map(|line| trim_text(line, max_width, metrics))
                    .collect();
            }
            LabelIntersectAction::Wrap => {
                lines = lines
                    .iter()
                    .flat_map(|line| wrap_text(line, max_width, metrics))
                    .collect();
            }
            LabelIntersectAction::None | LabelIntersectAction::Hide => {}
        }
    }
    let size = metrics.measure_lines(&lines);
    AxisLabel {
        value,
        original_text: text,
        lines,
        size,
    }
}

/// Drops labels overlapping the previously kept label along the axis.
fn hide_overlapping(axis: &Axis, labels: &mut Vec<AxisLabel>) {
    let length = axis.length();
    let mut spans: Vec<(f64, f64)> = labels
        .iter()
        .map(|label| {
            let center = range_coefficient(label.value, axis) * length;
            let half = match axis.orientation() {
                Orientation::Horizontal => label.size.width * 0.5,
                Orientation::Vertical => label.size.height * 0.5,
            };
            (center - half, center + half)
        })
        .collect();
    if axis.is_inversed() {
        labels.reverse();
        spans.reverse();
    }

    let mut last_end = f64::NEG_INFINITY;
    let mut keep = Vec::with_capacity(labels.len());
    for (start, end) in &spans {
        let fits = *start >= last_end;
        if fits {
            last_end = *end;
        }
        keep.push(fits);
    }
    let mut flags = keep.into_iter();
    labels.retain(|_| flags.next().unwrap_or(false));
    if axis.is_inversed() {
        labels.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::{fixed, format_digits};

    #[test]
    fn fixed_never_prints_negative_zero() {
        assert_eq!(fixed(-0.0001, 2), "0.00");
        assert_eq!(fixed(-1.5, 1), "-1.5");
    }

    #[test]
    fn format_codes_parse_digit_counts() {
        assert_eq!(format_digits("n2", 'n'), Some(2));
        assert_eq!(format_digits("p", 'p'), Some(0));
        assert_eq!(format_digits("{value}K", 'n'), None);
        assert_eq!(format_digits("nope", 'n'), None);
    }
}
