use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::axis::{Axis, CrossValue, ValueType};
use crate::core::coordinate::range_coefficient;
use crate::core::primitives::{datetime_to_unix_seconds, log_base};
use crate::core::types::{Orientation, PlotRect};

/// Resolved crossing of one axis over another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCrossing {
    /// Crossing value in the target axis' range space.
    pub value: f64,
    /// Perpendicular shift from the native axis rect, in pixels.
    pub offset: f64,
    /// Axis rect moved onto the crossing line.
    pub updated_rect: PlotRect,
    /// Room left for labels between the crossing line and the plot edge.
    pub label_available_size: f64,
}

/// Finds the axis `axis` crosses: the named `cross_axis`, or the first axis of
/// the orthogonal orientation.
#[must_use]
pub fn resolve_cross_target<'a>(axis: &Axis, axes: &'a [Axis]) -> Option<&'a Axis> {
    match axis.config.cross_axis.as_deref() {
        Some(name) => axes.iter().find(|candidate| candidate.name() == name),
        None => {
            let wanted = axis.orientation().orthogonal();
            axes.iter().find(|candidate| candidate.orientation() == wanted)
        }
    }
}

/// Converts a crossing value into the target axis' range space.
///
/// Categories resolve through the target's category list, logarithmic axes
/// convert to exponents and datetime text parses as RFC 3339.
#[must_use]
pub fn cross_value_in_axis_space(value: &CrossValue, target: &Axis) -> Option<f64> {
    let raw = match value {
        CrossValue::Number(number) => *number,
        CrossValue::Text(text) => match target.value_type() {
            ValueType::Category => match target.categories.iter().position(|name| name == text) {
                Some(index) => index as f64,
                None => text.trim().parse::<f64>().ok()?,
            },
            ValueType::DateTime => match DateTime::parse_from_rfc3339(text.trim()) {
                Ok(time) => datetime_to_unix_seconds(time.with_timezone(&Utc)),
                Err(_) => text.trim().parse::<f64>().ok()?,
            },
            ValueType::Double | ValueType::Logarithmic => text.trim().parse::<f64>().ok()?,
        },
    };
    if !raw.is_finite() {
        return None;
    }
    if target.value_type() == ValueType::Logarithmic {
        if raw <= 0.0 {
            return Some(target.visible_range.min);
        }
        return Some(log_base(raw, target.log_base()));
    }
    Some(raw)
}

/// Positions `axis` on its `crosses_at` value.
///
/// Returns `None` when the axis does not cross, the target is missing or the
/// value cannot be resolved, and when the value lies outside the target's
/// visible range while `allow_cross_overlap` is set. Otherwise out-of-range
/// values clamp to the nearest edge.
#[must_use]
pub fn compute_axis_crossing(
    axis: &Axis,
    axes: &[Axis],
    plot_rect: PlotRect,
    label_size: f64,
) -> Option<AxisCrossing> {
    let crosses_at = axis.config.crosses_at.as_ref()?;
    let Some(target) = resolve_cross_target(axis, axes) else {
        warn!(
            axis = axis.name(),
            cross_axis = axis.config.cross_axis.as_deref().unwrap_or("<orthogonal>"),
            "cross axis not found; keeping default position"
        );
        return None;
    };
    let Some(mut value) = cross_value_in_axis_space(crosses_at, target) else {
        warn!(axis = axis.name(), target = target.name(), "crossing value could not be resolved");
        return None;
    };

    let range = target.visible_range;
    let inside = value > range.min && value < range.max;
    if !inside {
        if axis.config.allow_cross_overlap {
            debug!(axis = axis.name(), value, "crossing value outside target range; skipped");
            return None;
        }
        value = value.clamp(range.min, range.max);
    }

    let coefficient = range_coefficient(value, target);
    let mut updated_rect = axis.rect;
    let (offset, distance) = match axis.orientation() {
        Orientation::Horizontal => {
            let y = target.rect.y + target.rect.height - coefficient * target.rect.height;
            updated_rect.y = y;
            let distance = if axis.config.opposed_position {
                y - plot_rect.y
            } else {
                plot_rect.bottom() - y
            };
            (y - axis.rect.y, distance)
        }
        Orientation::Vertical => {
            let x = target.rect.x + coefficient * target.rect.width;
            updated_rect.x = x;
            let distance = if axis.config.opposed_position {
                plot_rect.right() - x
            } else {
                x - plot_rect.x
            };
            (x - axis.rect.x, distance)
        }
    };

    Some(AxisCrossing {
        value,
        offset,
        updated_rect,
        label_available_size: label_size.min(distance).max(0.0),
    })
}
