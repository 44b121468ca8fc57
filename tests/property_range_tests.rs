use chart_geometry::core::numeric_range::nice_interval;
use chart_geometry::core::{Axis, AxisConfig, AxisRangeEngine, PlotRect, RangeAccumulator};
use proptest::prelude::*;

proptest! {
    #[test]
    fn nice_interval_never_exceeds_desired_count(
        delta in 1e-3f64..1e6,
        desired in 1u32..40
    ) {
        let desired = f64::from(desired);
        let interval = nice_interval(delta, desired);
        prop_assert!(interval.is_finite() && interval > 0.0);
        prop_assert!((delta / interval).ceil() <= desired);
    }

    #[test]
    fn computed_range_is_ordered_and_covers_data(
        start in -1_000_000.0f64..1_000_000.0,
        span in 1e-3f64..1_000_000.0,
        height in 50.0f64..2_000.0,
        horizontal in any::<bool>()
    ) {
        let end = start + span;
        let (config, rect) = if horizontal {
            (AxisConfig::horizontal("a"), PlotRect::new(0.0, 0.0, height, 0.0))
        } else {
            (AxisConfig::vertical("a"), PlotRect::new(0.0, 0.0, 0.0, height))
        };
        let mut axis = Axis::new(config, rect);
        let mut accumulator = RangeAccumulator::new();
        accumulator.merge_extent(start, end);
        AxisRangeEngine::default().compute(&mut axis, &accumulator, false, None);

        let range = axis.actual_range;
        let tolerance = 1e-9 * start.abs().max(end.abs()).max(1.0);
        prop_assert!(range.min < range.max);
        prop_assert!(range.interval > 0.0);
        prop_assert!(range.min <= start + tolerance);
        prop_assert!(range.max >= end - tolerance);
        prop_assert!(axis.visible_range.min >= range.min);
        prop_assert!(axis.visible_range.max <= range.max);
        prop_assert!(axis.labels.len() <= 1_000);
    }
}
