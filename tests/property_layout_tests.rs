use chart_geometry::core::side_by_side::{find_rect_positions, side_by_side_range};
use chart_geometry::core::stacking::compute_stacked_values;
use chart_geometry::core::{Series, SeriesKind, SeriesPoint, SideBySideSlot};
use proptest::prelude::*;

proptest! {
    #[test]
    fn side_by_side_slots_tile_the_category(
        count in 1usize..12,
        min_delta in 0.1f64..100.0,
        column_width in 0.1f64..=1.0
    ) {
        let scale = min_delta * column_width;
        let ranges: Vec<_> = (0..count)
            .map(|position| {
                side_by_side_range(
                    SideBySideSlot { position, rect_count: count },
                    min_delta,
                    column_width,
                    0.0,
                )
            })
            .collect();

        let tolerance = 1e-9 * scale.max(1.0);
        prop_assert!((ranges[0].start() + scale / 2.0).abs() <= tolerance);
        prop_assert!((ranges[count - 1].end() - scale / 2.0).abs() <= tolerance);
        for pair in ranges.windows(2) {
            prop_assert!((pair[0].end() - pair[1].start()).abs() <= tolerance);
        }
        for range in &ranges {
            prop_assert!((range.delta() - scale / count as f64).abs() <= tolerance);
        }
    }

    #[test]
    fn column_spacing_shrinks_each_slot_symmetrically(
        position in 0usize..6,
        spacing in 0.0f64..=1.0
    ) {
        let slot = SideBySideSlot { position, rect_count: 6 };
        let full = side_by_side_range(slot, 1.0, 0.9, 0.0);
        let spaced = side_by_side_range(slot, 1.0, 0.9, spacing);
        prop_assert!((spaced.median() - full.median()).abs() <= 1e-12);
        prop_assert!((spaced.delta() - full.delta() * (1.0 - spacing)).abs() <= 1e-12);
    }

    #[test]
    fn every_visible_rect_series_gets_a_slot(kinds in prop::collection::vec(0u8..4, 1..10)) {
        let series: Vec<Series> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let kind = match kind {
                    0 => SeriesKind::Column,
                    1 => SeriesKind::Bar,
                    2 => SeriesKind::StackingColumn,
                    _ => SeriesKind::Line,
                };
                Series::new(format!("s{i}"), kind, Vec::new())
            })
            .collect();
        let refs: Vec<&Series> = series.iter().collect();
        let slots = find_rect_positions(&refs);

        let rect_series = series.iter().filter(|series| series.kind.is_rect()).count();
        prop_assert_eq!(slots.len(), rect_series);
        for slot in slots.values() {
            prop_assert!(slot.position < slot.rect_count);
        }
    }

    #[test]
    fn stacks_grow_from_the_previous_total(
        columns in prop::collection::vec(prop::collection::vec(-50i32..50, 4), 1..6)
    ) {
        let series: Vec<Series> = columns
            .iter()
            .enumerate()
            .map(|(i, values)| {
                let points = values
                    .iter()
                    .enumerate()
                    .map(|(x, y)| SeriesPoint::xy(x as f64, f64::from(*y)))
                    .collect();
                Series::new(format!("s{i}"), SeriesKind::StackingColumn, points)
            })
            .collect();
        let refs: Vec<&Series> = series.iter().collect();
        let stacked = compute_stacked_values(&refs);

        for x in 0..4 {
            let mut positive = 0.0;
            let mut negative = 0.0;
            for (i, values) in columns.iter().enumerate() {
                let value = f64::from(values[x]);
                let entry = &stacked[format!("s{i}").as_str()];
                let expected_start = if value >= 0.0 { positive } else { negative };
                prop_assert_eq!(entry.start_values[x], expected_start);
                prop_assert_eq!(entry.end_values[x], expected_start + value);
                if value >= 0.0 {
                    positive += value;
                } else {
                    negative += value;
                }
            }
        }
    }
}
