use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::series::{prepare_points, Series};

/// Stacked start/end values of one series, indexed like its points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StackedValues {
    pub start_values: Vec<f64>,
    pub end_values: Vec<f64>,
}

impl StackedValues {
    /// Lowest and highest stacked value, ignoring non-finite entries.
    #[must_use]
    pub fn extent(&self) -> Option<(f64, f64)> {
        let mut values = self
            .start_values
            .iter()
            .chain(self.end_values.iter())
            .copied()
            .filter(|value| value.is_finite());
        let first = values.next()?;
        Some(values.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        }))
    }
}

#[derive(Default)]
struct GroupAccumulator {
    positive: IndexMap<OrderedFloat<f64>, f64>,
    negative: IndexMap<OrderedFloat<f64>, f64>,
}

/// Accumulates stacked values for every visible stacking series.
///
/// Series sharing a stacking group (absent group = one shared default group)
/// stack in input order. Positive and negative contributions accumulate
/// separately per x value; 100 % variants first normalize each value by the
/// per-x absolute sum of their group. Empty points contribute zero. Callers
/// pass the series of one x/y axis pair.
#[must_use]
pub fn compute_stacked_values(series: &[&Series]) -> IndexMap<String, StackedValues> {
    let stacking: Vec<&Series> = series
        .iter()
        .copied()
        .filter(|series| series.visible && series.kind.is_stacking())
        .collect();

    let mut totals: IndexMap<String, IndexMap<OrderedFloat<f64>, f64>> = IndexMap::new();
    for series in stacking.iter().filter(|series| series.kind.is_stacking_100()) {
        let per_x = totals.entry(group_key(series)).or_default();
        for point in prepare_points(series) {
            if point.visible && point.x.is_finite() {
                *per_x.entry(OrderedFloat(point.x)).or_insert(0.0) += point.y.abs();
            }
        }
    }

    let mut groups: IndexMap<String, GroupAccumulator> = IndexMap::new();
    let mut result = IndexMap::with_capacity(stacking.len());
    for series in stacking {
        let key = group_key(series);
        let accumulator = groups.entry(key.clone()).or_default();
        let prepared = prepare_points(series);
        let mut stacked = StackedValues {
            start_values: Vec::with_capacity(prepared.len()),
            end_values: Vec::with_capacity(prepared.len()),
        };
        for point in prepared {
            if !point.x.is_finite() {
                stacked.start_values.push(f64::NAN);
                stacked.end_values.push(f64::NAN);
                continue;
            }
            let x = OrderedFloat(point.x);
            let mut value = if point.visible { point.y } else { 0.0 };
            if series.kind.is_stacking_100() {
                let total = totals
                    .get(&key)
                    .and_then(|per_x| per_x.get(&x))
                    .copied()
                    .unwrap_or(0.0);
                value = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            }
            let side = if value >= 0.0 {
                &mut accumulator.positive
            } else {
                &mut accumulator.negative
            };
            let start = side.get(&x).copied().unwrap_or(0.0);
            let mut end = start + value;
            if series.kind.is_stacking_100() {
                end = end.clamp(-100.0, 100.0);
            }
            side.insert(x, end);
            stacked.start_values.push(start);
            stacked.end_values.push(end);
        }
        trace!(series = %series.id, group = %key, points = stacked.end_values.len(), "stacked series");
        result.insert(series.id.clone(), stacked);
    }
    result
}

fn group_key(series: &Series) -> String {
    series.style.stacking_group.clone().unwrap_or_default()
}
