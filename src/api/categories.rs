use indexmap::IndexSet;
use tracing::trace;

use crate::core::{Axis, Series, ValueType};

use super::ChartEngineConfig;

/// Assigns category indices to the points bound to category x axes and fills
/// each category axis' label list.
///
/// Distinct names share one index in first-seen order across all bound
/// series. Indexed axes use the point position instead and take the first
/// name seen at each position. Points without a name keep their x, or fall
/// back to their position when x is missing.
pub(crate) fn resolve_categories(config: &ChartEngineConfig, axes: &mut [Axis], series: &mut [Series]) {
    for axis in axes
        .iter_mut()
        .filter(|axis| axis.value_type() == ValueType::Category)
    {
        let indexed = axis.config.is_indexed;
        let mut names: IndexSet<String> = IndexSet::new();
        let mut by_position: Vec<Option<String>> = Vec::new();

        for series in series.iter_mut() {
            if config.x_axis_name(series) != axis.name() {
                continue;
            }
            for (position, point) in series.points.iter_mut().enumerate() {
                let index = match (&point.category, indexed) {
                    (Some(name), false) => names.insert_full(name.clone()).0,
                    (Some(name), true) => {
                        if by_position.len() <= position {
                            by_position.resize(position + 1, None);
                        }
                        by_position[position].get_or_insert_with(|| name.clone());
                        position
                    }
                    (None, _) => position,
                };
                if point.x.is_none() || point.category.is_some() {
                    point.x = Some(index as f64);
                }
            }
        }

        axis.categories = if indexed {
            by_position
                .into_iter()
                .enumerate()
                .map(|(position, name)| name.unwrap_or_else(|| position.to_string()))
                .collect()
        } else {
            names.into_iter().collect()
        };
        trace!(axis = axis.name(), categories = axis.categories.len(), "categories resolved");
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_categories;
    use crate::api::ChartEngineConfig;
    use crate::core::{Axis, AxisConfig, PlotRect, Series, SeriesKind, SeriesPoint, ValueType, Viewport};

    fn setup(indexed: bool) -> (ChartEngineConfig, Vec<Axis>, Vec<Series>) {
        let x = AxisConfig::horizontal("primaryXAxis")
            .with_value_type(ValueType::Category)
            .with_indexed(indexed);
        let config = ChartEngineConfig::new(Viewport::new(400, 300)).with_axis(x.clone());
        let axes = vec![
            Axis::new(x, PlotRect::default()),
            Axis::new(AxisConfig::vertical("primaryYAxis"), PlotRect::default()),
        ];
        let series = vec![
            Series::new(
                "a",
                SeriesKind::Column,
                vec![SeriesPoint::category("Jan", 1.0), SeriesPoint::category("Feb", 2.0)],
            ),
            Series::new(
                "b",
                SeriesKind::Column,
                vec![SeriesPoint::category("Feb", 3.0), SeriesPoint::category("Mar", 4.0)],
            ),
        ];
        (config, axes, series)
    }

    #[test]
    fn equal_names_share_an_index() {
        let (config, mut axes, mut series) = setup(false);
        resolve_categories(&config, &mut axes, &mut series);
        assert_eq!(axes[0].categories, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(series[1].points[0].x, Some(1.0));
        assert_eq!(series[1].points[1].x, Some(2.0));
    }

    #[test]
    fn indexed_axis_uses_positions() {
        let (config, mut axes, mut series) = setup(true);
        resolve_categories(&config, &mut axes, &mut series);
        assert_eq!(axes[0].categories, vec!["Jan", "Feb"]);
        assert_eq!(series[1].points[0].x, Some(0.0));
    }
}
