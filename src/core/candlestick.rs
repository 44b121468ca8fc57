#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use smallvec::smallvec;

use crate::core::series::{prepare_points, PreparedPoint, Series};
use crate::core::series_builder::{BuildContext, PointGeometry, SeriesGeometry};
use crate::core::types::PlotRect;
use crate::render::{Color, PathGeometry, RenderOptions};

/// Builds candle geometry: a wick from high to low and an open/close body per
/// point, ids `"{id}_wick_{index}"` and `"{id}_body_{index}"`.
///
/// Bullish candles (`close >= open`) use the bull color and are hollow unless
/// `enable_solid_candles` is set; bearish candles are filled with the bear
/// color.
#[must_use]
pub fn build_candles(series: &Series, ctx: &BuildContext<'_>) -> SeriesGeometry {
    let points = prepare_points(series);
    let slot = ctx.slot_range(series);
    let slot = (slot.start(), slot.end());

    // For large series, optional parallel projection keeps output order and
    // behavior identical to the sequential path.
    #[cfg(feature = "parallel-projection")]
    let projected: Vec<(Vec<RenderOptions>, PointGeometry)> = points
        .par_iter()
        .map(|point| project_candle(series, ctx, *point, slot))
        .collect();

    #[cfg(not(feature = "parallel-projection"))]
    let projected: Vec<(Vec<RenderOptions>, PointGeometry)> = points
        .iter()
        .map(|point| project_candle(series, ctx, *point, slot))
        .collect();

    collect(series, projected)
}

/// Builds hilo geometry: one vertical stroke from high to low per point.
#[must_use]
pub fn build_hilo(series: &Series, ctx: &BuildContext<'_>) -> SeriesGeometry {
    let points = prepare_points(series);
    let slot = ctx.slot_range(series);
    let middle = (slot.start() + slot.end()) * 0.5;
    let stroke = series.style.stroke.unwrap_or(series.style.fill);

    let projected = points
        .iter()
        .map(|point| {
            let color = point.color.unwrap_or(stroke);
            if !point.visible {
                return (Vec::new(), PointGeometry::hidden(point.index, color));
            }
            let high = ctx.pixel(point.x + middle, point.high);
            let low = ctx.pixel(point.x + middle, point.low);
            let mut path = PathGeometry::new();
            path.move_to(high).line_to(low);
            let options = RenderOptions::path(format!("{}_point_{}", series.id, point.index), path)
                .with_stroke(color, series.style.stroke_width)
                .with_opacity(series.style.opacity);
            let geometry = PointGeometry {
                index: point.index,
                visible: true,
                symbol_locations: smallvec![high, low],
                regions: smallvec![PlotRect::from_corners(high, low)],
                interior: color,
            };
            (vec![options], geometry)
        })
        .collect();
    collect(series, projected)
}

fn collect(series: &Series, projected: Vec<(Vec<RenderOptions>, PointGeometry)>) -> SeriesGeometry {
    let mut geometry = SeriesGeometry::empty(series.id.clone());
    for (options, point) in projected {
        geometry.render_options.extend(options);
        geometry.points.push(point);
    }
    geometry
}

fn project_candle(
    series: &Series,
    ctx: &BuildContext<'_>,
    point: PreparedPoint,
    slot: (f64, f64),
) -> (Vec<RenderOptions>, PointGeometry) {
    let style = &series.style;
    let is_bullish = point.close >= point.open;
    let color = point
        .color
        .unwrap_or(if is_bullish { style.bull_color } else { style.bear_color });
    if !point.visible {
        return (Vec::new(), PointGeometry::hidden(point.index, color));
    }

    let middle = point.x + (slot.0 + slot.1) * 0.5;
    let wick_top = ctx.pixel(middle, point.high);
    let wick_bottom = ctx.pixel(middle, point.low);
    let body = PlotRect::from_corners(
        ctx.pixel(point.x + slot.0, point.open.max(point.close)),
        ctx.pixel(point.x + slot.1, point.open.min(point.close)),
    );

    let mut wick = PathGeometry::new();
    wick.move_to(wick_top).line_to(wick_bottom);
    let wick = RenderOptions::path(format!("{}_wick_{}", series.id, point.index), wick)
        .with_stroke(color, style.stroke_width)
        .with_opacity(style.opacity);

    let hollow = is_bullish && !style.enable_solid_candles;
    let body_fill = if hollow { Color::TRANSPARENT } else { color };
    let body_options = RenderOptions::rect(format!("{}_body_{}", series.id, point.index), body)
        .with_fill(body_fill)
        .with_stroke(color, style.stroke_width)
        .with_opacity(style.opacity);

    let geometry = PointGeometry {
        index: point.index,
        visible: true,
        symbol_locations: smallvec![wick_top, wick_bottom],
        regions: smallvec![body],
        interior: color,
    };
    (vec![wick, body_options], geometry)
}

#[cfg(test)]
mod tests {
    use super::{build_candles, build_hilo};
    use crate::core::axis::{Axis, AxisConfig};
    use crate::core::double_range::AxisRange;
    use crate::core::series::{Series, SeriesKind, SeriesPoint};
    use crate::core::series_builder::BuildContext;
    use crate::core::types::PlotRect;
    use crate::render::{Color, RenderShape};

    fn axes() -> (Axis, Axis) {
        let rect = PlotRect::new(0.0, 0.0, 100.0, 100.0);
        let mut x = Axis::new(AxisConfig::horizontal("x"), rect);
        x.visible_range = AxisRange::new(-1.0, 2.0, 1.0);
        let mut y = Axis::new(AxisConfig::vertical("y"), rect);
        y.visible_range = AxisRange::new(0.0, 20.0, 5.0);
        (x, y)
    }

    #[test]
    fn bullish_candle_is_hollow_by_default() {
        let (x, y) = axes();
        let ctx = BuildContext::new(&x, &y, false);
        let series = Series::new(
            "k",
            SeriesKind::Candle,
            vec![
                SeriesPoint::ohlc(0.0, 10.0, 15.0, 8.0, 12.0),
                SeriesPoint::ohlc(1.0, 12.0, 13.0, 5.0, 6.0),
            ],
        );
        let geometry = build_candles(&series, &ctx);
        assert_eq!(geometry.render_options.len(), 4);
        let bull_body = &geometry.render_options[1];
        assert_eq!(bull_body.fill, Color::TRANSPARENT);
        assert_eq!(bull_body.stroke, series.style.bull_color);
        let bear_body = &geometry.render_options[3];
        assert_eq!(bear_body.fill, series.style.bear_color);
        let RenderShape::Rect(rect) = bear_body.shape else {
            panic!("expected rect");
        };
        assert!((rect.height - 30.0).abs() < 1e-9);
    }

    #[test]
    fn solid_candles_fill_bullish_bodies() {
        let (x, y) = axes();
        let ctx = BuildContext::new(&x, &y, false);
        let mut series = Series::new(
            "k",
            SeriesKind::Candle,
            vec![SeriesPoint::ohlc(0.0, 10.0, 15.0, 8.0, 12.0)],
        );
        series.style.enable_solid_candles = true;
        let geometry = build_candles(&series, &ctx);
        assert_eq!(geometry.render_options[1].fill, series.style.bull_color);
    }

    #[test]
    fn hilo_draws_high_to_low() {
        let (x, y) = axes();
        let ctx = BuildContext::new(&x, &y, false);
        let series = Series::new("h", SeriesKind::Hilo, vec![SeriesPoint::range(0.0, 20.0, 10.0)]);
        let geometry = build_hilo(&series, &ctx);
        let path = geometry.render_options[0].as_path().expect("path");
        assert_eq!(path.to_svg(), "M 33.3333 0 L 33.3333 50");
    }
}
