use crate::core::line_series::{line_points, polyline_path, spline_path, step_path};
use crate::core::series::{PreparedPoint, Series, SeriesKind};
use crate::core::series_builder::{
    styled, symbol_point, symbol_region, visible_runs, BuildContext, PointGeometry, SeriesGeometry,
};
use crate::core::types::PixelPoint;
use crate::render::{PathGeometry, PathVerb, RenderOptions};

/// Builds area, spline area, step area, range area and stacking area geometry.
///
/// Each visible run becomes one closed path `"{id}_area_{run}"`. Baseline
/// areas start and end on the value origin; band areas (range and stacking)
/// walk the upper edge forward and the lower edge backward.
#[must_use]
pub fn build_area(series: &Series, ctx: &BuildContext<'_>) -> SeriesGeometry {
    let points = area_points(series, ctx);
    let band = matches!(
        series.kind,
        SeriesKind::RangeArea | SeriesKind::StackingArea | SeriesKind::StackingArea100
    );
    let origin = ctx.value_origin();
    let mut geometry = SeriesGeometry::empty(series.id.clone());

    for (run_index, run) in visible_runs(&points, series.style.empty_point_mode)
        .iter()
        .enumerate()
    {
        let path = if band {
            band_path(run, ctx)
        } else {
            baseline_path(series, run, origin, ctx)
        };
        if path.is_empty() {
            continue;
        }
        geometry.render_options.push(styled(
            series,
            RenderOptions::path(format!("{}_area_{run_index}", series.id), path),
            true,
        ));
    }

    let marker = series.style.marker;
    let size = (marker.width, marker.height);
    geometry.points = points
        .iter()
        .map(|point| {
            let interior = point.color.unwrap_or(series.style.fill);
            if !point.visible {
                return PointGeometry::hidden(point.index, interior);
            }
            let mut geometry = symbol_point(point.index, ctx.pixel(point.x, point.high), size, interior);
            if band {
                let bottom = ctx.pixel(point.x, point.low);
                geometry.symbol_locations.push(bottom);
                geometry.regions.push(symbol_region(bottom, size));
            }
            geometry
        })
        .collect();
    geometry
}

/// Stacking areas carry the stacked start in `low` and the end in `high`.
fn area_points(series: &Series, ctx: &BuildContext<'_>) -> Vec<PreparedPoint> {
    let mut points = line_points(series, ctx);
    if series.kind.is_stacking() {
        for point in &mut points {
            if let Some((start, end)) = ctx.stacked_at(point.index) {
                point.low = start;
                point.high = end;
            }
        }
    }
    points
}

fn baseline_path(
    series: &Series,
    run: &[PreparedPoint],
    origin: f64,
    ctx: &BuildContext<'_>,
) -> PathGeometry {
    let (Some(first), Some(last)) = (run.first(), run.last()) else {
        return PathGeometry::new();
    };
    let edge = match series.kind {
        SeriesKind::StepArea => step_path(run, series.style.step_position, ctx),
        SeriesKind::SplineArea => spline_path(run, ctx),
        _ => polyline_path(run, ctx),
    };

    let mut path = PathGeometry::new();
    path.move_to(ctx.pixel(first.x, origin));
    path.line_to(ctx.pixel(first.x, first.y));
    // The edge's own leading move duplicates the first data vertex.
    path.extend(PathGeometry::from_commands(
        edge.commands
            .into_iter()
            .skip_while(|command| command.verb == PathVerb::Move)
            .collect(),
    ));
    path.line_to(ctx.pixel(last.x, origin));
    path.close();
    path
}

fn band_path(run: &[PreparedPoint], ctx: &BuildContext<'_>) -> PathGeometry {
    let upper: Vec<PixelPoint> = run.iter().map(|p| ctx.pixel(p.x, p.high)).collect();
    let lower: Vec<PixelPoint> = run.iter().rev().map(|p| ctx.pixel(p.x, p.low)).collect();
    let mut path = PathGeometry::new();
    for (i, point) in upper.into_iter().chain(lower).enumerate() {
        if i == 0 {
            path.move_to(point);
        } else {
            path.line_to(point);
        }
    }
    if !path.is_empty() {
        path.close();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::build_area;
    use crate::core::axis::{Axis, AxisConfig};
    use crate::core::double_range::AxisRange;
    use crate::core::series::{Series, SeriesKind, SeriesPoint};
    use crate::core::series_builder::BuildContext;
    use crate::core::stacking::StackedValues;
    use crate::core::types::{PixelPoint, PlotRect};

    fn axes() -> (Axis, Axis) {
        let rect = PlotRect::new(0.0, 0.0, 100.0, 100.0);
        let mut x = Axis::new(AxisConfig::horizontal("x"), rect);
        x.visible_range = AxisRange::new(0.0, 10.0, 1.0);
        let mut y = Axis::new(AxisConfig::vertical("y"), rect);
        y.visible_range = AxisRange::new(0.0, 10.0, 1.0);
        (x, y)
    }

    fn first_svg(series: &Series, ctx: &BuildContext<'_>) -> String {
        let geometry = build_area(series, ctx);
        geometry.render_options[0].as_path().expect("path").to_svg()
    }

    #[test]
    fn area_closes_on_the_baseline() {
        let (x, y) = axes();
        let ctx = BuildContext::new(&x, &y, false);
        let series = Series::new(
            "a",
            SeriesKind::Area,
            vec![SeriesPoint::xy(0.0, 5.0), SeriesPoint::xy(10.0, 5.0)],
        );
        assert_eq!(first_svg(&series, &ctx), "M 0 100 L 0 50 L 100 50 L 100 100 Z");
    }

    #[test]
    fn range_area_walks_high_then_low() {
        let (x, y) = axes();
        let ctx = BuildContext::new(&x, &y, false);
        let series = Series::new(
            "r",
            SeriesKind::RangeArea,
            vec![SeriesPoint::range(0.0, 8.0, 2.0), SeriesPoint::range(10.0, 6.0, 4.0)],
        );
        assert_eq!(first_svg(&series, &ctx), "M 0 20 L 100 40 L 100 60 L 0 80 Z");
        let geometry = build_area(&series, &ctx);
        assert_eq!(geometry.points[0].symbol_locations.len(), 2);
        assert_eq!(geometry.points[0].regions.len(), 2);
        assert!(geometry.points[0].regions[1].contains(PixelPoint::new(0.0, 80.0)));
    }

    #[test]
    fn area_points_carry_hit_regions_around_the_value() {
        let (x, y) = axes();
        let ctx = BuildContext::new(&x, &y, false);
        let series = Series::new(
            "a",
            SeriesKind::Area,
            vec![SeriesPoint::xy(0.0, 5.0), SeriesPoint::xy(10.0, 8.0)],
        );
        let geometry = build_area(&series, &ctx);
        let edge = &geometry.points[1];
        assert_eq!(edge.regions.len(), 1);
        assert!(edge.regions[0].contains(PixelPoint::new(100.0, 20.0)));
        assert!(!edge.regions[0].contains(PixelPoint::new(100.0, 60.0)));
    }

    #[test]
    fn stacking_area_uses_stacked_edges() {
        let (x, y) = axes();
        let stacked = StackedValues {
            start_values: vec![2.0, 2.0],
            end_values: vec![5.0, 5.0],
        };
        let ctx = BuildContext::new(&x, &y, false).with_stacked(&stacked);
        let series = Series::new(
            "s",
            SeriesKind::StackingArea,
            vec![SeriesPoint::xy(0.0, 3.0), SeriesPoint::xy(10.0, 3.0)],
        );
        assert_eq!(first_svg(&series, &ctx), "M 0 50 L 100 50 L 100 80 L 0 80 Z");
    }
}
