use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::double_range::DoubleRange;
use crate::core::series::Series;

/// Slot of a rect series among the series sharing its axis pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideBySideSlot {
    pub position: usize,
    pub rect_count: usize,
}

impl SideBySideSlot {
    /// Slot for a series drawn alone.
    #[must_use]
    pub const fn single() -> Self {
        Self {
            position: 0,
            rect_count: 1,
        }
    }
}

/// Assigns side-by-side slots to the visible rect series of one axis pair.
///
/// Stacking series share a slot per stacking group; other series share a
/// slot per group name, and take their own slot when ungrouped. Slots are
/// numbered in input order.
#[must_use]
pub fn find_rect_positions(series: &[&Series]) -> IndexMap<String, SideBySideSlot> {
    let mut slot_keys: IndexMap<String, usize> = IndexMap::new();
    let mut assigned = Vec::new();
    for series in series
        .iter()
        .filter(|series| series.visible && series.kind.is_rect())
    {
        let key = if series.kind.is_stacking() {
            format!(
                "stacking:{}",
                series.style.stacking_group.as_deref().unwrap_or_default()
            )
        } else if let Some(group) = series.style.group_name.as_deref() {
            format!("group:{group}")
        } else {
            format!("series:{}", series.id)
        };
        let next = slot_keys.len();
        let position = *slot_keys.entry(key).or_insert(next);
        assigned.push((series.id.clone(), position));
    }

    let rect_count = slot_keys.len().max(1);
    assigned
        .into_iter()
        .map(|(id, position)| {
            (
                id,
                SideBySideSlot {
                    position,
                    rect_count,
                },
            )
        })
        .collect()
}

/// Offset range of a slot around each x value, in axis units.
///
/// Slot `p` of `n` spans `[p/n - 0.5, (p+1)/n - 0.5]` of a category scaled by
/// `min_delta * column_width`, then shrinks by `column_spacing` of the slot
/// width (half on each side).
#[must_use]
pub fn side_by_side_range(
    slot: SideBySideSlot,
    min_delta: f64,
    column_width: f64,
    column_spacing: f64,
) -> DoubleRange {
    let count = slot.rect_count.max(1) as f64;
    let position = slot.position as f64;
    let scale = min_delta * column_width.clamp(0.0, 1.0);
    let start = (position / count - 0.5) * scale;
    let end = start + scale / count;
    let shrink = column_spacing.clamp(0.0, 1.0) * (end - start) * 0.5;
    DoubleRange::new(start + shrink, end - shrink)
}

#[cfg(test)]
mod tests {
    use super::{find_rect_positions, side_by_side_range, SideBySideSlot};
    use crate::core::series::{Series, SeriesKind, SeriesPoint};

    fn column(id: &str) -> Series {
        Series::new(id, SeriesKind::Column, vec![SeriesPoint::xy(0.0, 1.0)])
    }

    #[test]
    fn stacking_group_members_share_a_slot() {
        let a = Series::new("a", SeriesKind::StackingColumn, Vec::new());
        let b = Series::new("b", SeriesKind::StackingColumn, Vec::new());
        let c = column("c");
        let slots = find_rect_positions(&[&a, &b, &c]);
        assert_eq!(slots["a"].position, slots["b"].position);
        assert_eq!(slots["c"].position, 1);
        assert_eq!(slots["c"].rect_count, 2);
    }

    #[test]
    fn hidden_and_line_series_take_no_slot() {
        let a = column("a").with_visible(false);
        let b = Series::new("b", SeriesKind::Line, Vec::new());
        let c = column("c");
        let slots = find_rect_positions(&[&a, &b, &c]);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots["c"], SideBySideSlot::single());
    }

    #[test]
    fn spacing_shrinks_both_sides() {
        let range = side_by_side_range(SideBySideSlot::single(), 1.0, 1.0, 0.5);
        assert!((range.start() + 0.25).abs() <= 1e-12);
        assert!((range.end() - 0.25).abs() <= 1e-12);
    }
}
