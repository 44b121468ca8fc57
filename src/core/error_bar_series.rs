use crate::core::series::{prepare_points, Series};
use crate::core::series_builder::{styled, symbol_point, BuildContext, PointGeometry, SeriesGeometry};
use crate::core::types::PixelPoint;
use crate::render::{PathGeometry, RenderOptions};

/// Builds error bars: one open path per visible point, id
/// `"{id}_point_{index}"`, holding the vertical and/or horizontal bar plus a
/// cap of `cap_length_px` at each extended end.
#[must_use]
pub fn build_error_bars(series: &Series, ctx: &BuildContext<'_>) -> SeriesGeometry {
    let settings = series.style.error_bar;
    let half_cap = settings.cap_length_px.max(0.0) * 0.5;
    let mut geometry = SeriesGeometry::empty(series.id.clone());

    for point in prepare_points(series) {
        let interior = point.color.unwrap_or(series.style.fill);
        if !point.visible {
            geometry.points.push(PointGeometry::hidden(point.index, interior));
            continue;
        }
        let mut path = PathGeometry::new();
        if settings.has_vertical() {
            let (minus, plus) = settings.offsets(settings.vertical, point.y);
            let low = ctx.pixel(point.x, point.y - minus);
            let high = ctx.pixel(point.x, point.y + plus);
            bar_with_caps(&mut path, low, high, (minus > 0.0, plus > 0.0), half_cap);
        }
        if settings.has_horizontal() {
            let (minus, plus) = settings.offsets(settings.horizontal, point.x);
            let left = ctx.pixel(point.x - minus, point.y);
            let right = ctx.pixel(point.x + plus, point.y);
            bar_with_caps(&mut path, left, right, (minus > 0.0, plus > 0.0), half_cap);
        }
        if !path.is_empty() {
            geometry.render_options.push(styled(
                series,
                RenderOptions::path(format!("{}_point_{}", series.id, point.index), path),
                false,
            ));
        }
        let center = ctx.pixel(point.x, point.y);
        geometry.points.push(symbol_point(
            point.index,
            center,
            (settings.cap_length_px, settings.cap_length_px),
            interior,
        ));
    }
    geometry
}

/// Appends the bar `from → to` and perpendicular caps at the ends flagged in `caps`.
fn bar_with_caps(
    path: &mut PathGeometry,
    from: PixelPoint,
    to: PixelPoint,
    caps: (bool, bool),
    half_cap: f64,
) {
    path.move_to(from).line_to(to);
    if half_cap == 0.0 {
        return;
    }
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy);
    let (nx, ny) = if length == 0.0 {
        (1.0, 0.0)
    } else {
        (-dy / length, dx / length)
    };
    for (enabled, end) in [(caps.0, from), (caps.1, to)] {
        if enabled {
            path.move_to(PixelPoint::new(end.x - nx * half_cap, end.y - ny * half_cap))
                .line_to(PixelPoint::new(end.x + nx * half_cap, end.y + ny * half_cap));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::build_error_bars;
    use crate::core::axis::{Axis, AxisConfig};
    use crate::core::double_range::AxisRange;
    use crate::core::series::{ErrorAmount, ErrorBarDirection, ErrorBarMode, Series, SeriesKind, SeriesPoint};
    use crate::core::series_builder::BuildContext;
    use crate::core::types::PlotRect;

    fn ctx_axes() -> (Axis, Axis) {
        let rect = PlotRect::new(0.0, 0.0, 100.0, 100.0);
        let mut x = Axis::new(AxisConfig::horizontal("x"), rect);
        x.visible_range = AxisRange::new(0.0, 10.0, 1.0);
        let mut y = Axis::new(AxisConfig::vertical("y"), rect);
        y.visible_range = AxisRange::new(0.0, 10.0, 1.0);
        (x, y)
    }

    #[test]
    fn vertical_bar_with_caps() {
        let (x, y) = ctx_axes();
        let ctx = BuildContext::new(&x, &y, false);
        let series = Series::new("e", SeriesKind::ErrorBar, vec![SeriesPoint::xy(5.0, 5.0)]);
        let geometry = build_error_bars(&series, &ctx);
        let path = geometry.render_options[0].as_path().expect("path");
        assert_eq!(path.to_svg(), "M 50 60 L 50 40 M 45 60 L 55 60 M 45 40 L 55 40");
    }

    #[test]
    fn plus_only_percentage_in_both_modes() {
        let (x, y) = ctx_axes();
        let ctx = BuildContext::new(&x, &y, false);
        let mut series = Series::new("e", SeriesKind::ErrorBar, vec![SeriesPoint::xy(5.0, 4.0)]);
        series.style.error_bar.mode = ErrorBarMode::Both;
        series.style.error_bar.direction = ErrorBarDirection::Plus;
        series.style.error_bar.vertical = ErrorAmount::Percentage(50.0);
        series.style.error_bar.cap_length_px = 0.0;
        let geometry = build_error_bars(&series, &ctx);
        let path = geometry.render_options[0].as_path().expect("path");
        assert_eq!(path.to_svg(), "M 50 60 L 50 40 M 50 60 L 60 60");
    }
}
