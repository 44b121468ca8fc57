#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use smallvec::smallvec;

use crate::core::line_series::line_points;
use crate::core::series::{CornerRadius, PreparedPoint, Series, SeriesKind};
use crate::core::series_builder::{styled, BuildContext, PointGeometry, SeriesGeometry};
use crate::core::types::{PixelPoint, PlotRect};
use crate::render::{PathGeometry, RenderOptions};

/// Builds column, bar, histogram, range column and stacking column/bar
/// geometry: one rect (or rounded path) per visible point, id
/// `"{id}_point_{index}"`.
///
/// The rect spans the side-by-side slot along x. Along the value axis it runs
/// from the value to the origin, the stacked start, or the range low.
#[must_use]
pub fn build_columns(series: &Series, ctx: &BuildContext<'_>) -> SeriesGeometry {
    let points = line_points(series, ctx);
    let slot = ctx.slot_range(series);
    let origin = ctx.value_origin();

    // Large series may opt into parallel projection; output order is kept.
    #[cfg(feature = "parallel-projection")]
    let projected: Vec<(Option<RenderOptions>, PointGeometry)> = points
        .par_iter()
        .map(|point| project_column(series, ctx, *point, (slot.start(), slot.end()), origin))
        .collect();

    #[cfg(not(feature = "parallel-projection"))]
    let projected: Vec<(Option<RenderOptions>, PointGeometry)> = points
        .iter()
        .map(|point| project_column(series, ctx, *point, (slot.start(), slot.end()), origin))
        .collect();

    let mut geometry = SeriesGeometry::empty(series.id.clone());
    for (options, point) in projected {
        geometry.render_options.extend(options);
        geometry.points.push(point);
    }
    geometry
}

fn project_column(
    series: &Series,
    ctx: &BuildContext<'_>,
    point: PreparedPoint,
    slot: (f64, f64),
    origin: f64,
) -> (Option<RenderOptions>, PointGeometry) {
    let interior = point.color.unwrap_or(series.style.fill);
    if !point.visible {
        return (None, PointGeometry::hidden(point.index, interior));
    }

    let (top, bottom) = match series.kind {
        SeriesKind::RangeColumn => (point.high, point.low),
        _ if series.kind.is_stacking() => match ctx.stacked_at(point.index) {
            Some((start, end)) => (end, start),
            None => return (None, PointGeometry::hidden(point.index, interior)),
        },
        _ => (point.y, origin),
    };

    let (left, right) = (point.x + slot.0, point.x + slot.1);
    let top_left = ctx.pixel(left, top);
    let bottom_right = ctx.pixel(right, bottom);
    let rect = PlotRect::from_corners(top_left, bottom_right);
    let id = format!("{}_point_{}", series.id, point.index);

    let radius = series.style.corner_radius;
    let options = if radius.is_zero() {
        RenderOptions::rect(id, rect)
    } else {
        let flipped = (top < bottom) != ctx.y_axis.is_inversed();
        let corners = pixel_corners(radius, flipped, ctx.transposed);
        RenderOptions::path(id, rounded_rect_path(rect, corners))
    };
    let options = styled(series, options, true).with_fill(interior);

    let middle = point.x + (slot.0 + slot.1) * 0.5;
    let symbol_locations = if series.kind == SeriesKind::RangeColumn {
        smallvec![ctx.pixel(middle, top), ctx.pixel(middle, bottom)]
    } else {
        smallvec![ctx.pixel(middle, top)]
    };
    let geometry = PointGeometry {
        index: point.index,
        visible: true,
        symbol_locations,
        regions: smallvec![rect],
        interior,
    };
    (Some(options), geometry)
}

/// Maps value-named radii (`top` = value end of a positive column) onto the
/// pixel corners `[top_left, top_right, bottom_right, bottom_left]`.
fn pixel_corners(radius: CornerRadius, flipped: bool, transposed: bool) -> [f64; 4] {
    let radius = if flipped {
        CornerRadius {
            top_left: radius.bottom_left,
            top_right: radius.bottom_right,
            bottom_left: radius.top_left,
            bottom_right: radius.top_right,
        }
    } else {
        radius
    };
    if transposed {
        // Quarter turn clockwise: the value end faces right.
        [
            radius.bottom_left,
            radius.top_left,
            radius.top_right,
            radius.bottom_right,
        ]
    } else {
        [
            radius.top_left,
            radius.top_right,
            radius.bottom_right,
            radius.bottom_left,
        ]
    }
}

/// Rect outline with quadratic corners; radii clamp to half the smaller side.
#[must_use]
pub fn rounded_rect_path(rect: PlotRect, corners: [f64; 4]) -> PathGeometry {
    let limit = (rect.width.min(rect.height) * 0.5).max(0.0);
    let [tl, tr, br, bl] = corners.map(|radius| radius.max(0.0).min(limit));
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

    let mut path = PathGeometry::new();
    path.move_to(PixelPoint::new(x + tl, y))
        .line_to(PixelPoint::new(right - tr, y))
        .quad_to(PixelPoint::new(right, y), PixelPoint::new(right, y + tr))
        .line_to(PixelPoint::new(right, bottom - br))
        .quad_to(PixelPoint::new(right, bottom), PixelPoint::new(right - br, bottom))
        .line_to(PixelPoint::new(x + bl, bottom))
        .quad_to(PixelPoint::new(x, bottom), PixelPoint::new(x, bottom - bl))
        .line_to(PixelPoint::new(x, y + tl))
        .quad_to(PixelPoint::new(x, y), PixelPoint::new(x + tl, y))
        .close();
    path
}

#[cfg(test)]
mod tests {
    use super::{build_columns, pixel_corners, rounded_rect_path};
    use crate::core::axis::{Axis, AxisConfig};
    use crate::core::double_range::AxisRange;
    use crate::core::series::{CornerRadius, Series, SeriesKind, SeriesPoint};
    use crate::core::series_builder::BuildContext;
    use crate::core::types::PlotRect;
    use crate::render::{PathVerb, RenderShape};

    fn axes() -> (Axis, Axis) {
        let rect = PlotRect::new(0.0, 0.0, 100.0, 100.0);
        let mut x = Axis::new(AxisConfig::horizontal("x"), rect);
        x.visible_range = AxisRange::new(-0.5, 0.5, 1.0);
        let mut y = Axis::new(AxisConfig::vertical("y"), rect);
        y.visible_range = AxisRange::new(0.0, 10.0, 1.0);
        (x, y)
    }

    #[test]
    fn column_spans_slot_and_origin() {
        let (x, y) = axes();
        let ctx = BuildContext::new(&x, &y, false);
        let series = Series::new("c", SeriesKind::Column, vec![SeriesPoint::xy(0.0, 5.0)])
            .with_column_width(1.0);
        let geometry = build_columns(&series, &ctx);
        let RenderShape::Rect(rect) = geometry.render_options[0].shape else {
            panic!("expected rect");
        };
        assert_eq!(rect, PlotRect::new(0.0, 50.0, 100.0, 50.0));
        assert_eq!(geometry.render_options[0].id, "c_point_0");
    }

    #[test]
    fn radii_clamp_to_half_the_short_side() {
        let path = rounded_rect_path(PlotRect::new(0.0, 0.0, 10.0, 40.0), [50.0; 4]);
        assert_eq!(path.commands[0].points[0].x, 5.0);
        let quads = path
            .commands
            .iter()
            .filter(|command| command.verb == PathVerb::Quad)
            .count();
        assert_eq!(quads, 4);
    }

    #[test]
    fn negative_values_swap_top_and_bottom() {
        let radius = CornerRadius {
            top_left: 1.0,
            top_right: 2.0,
            bottom_left: 3.0,
            bottom_right: 4.0,
        };
        assert_eq!(pixel_corners(radius, false, false), [1.0, 2.0, 4.0, 3.0]);
        assert_eq!(pixel_corners(radius, true, false), [3.0, 4.0, 2.0, 1.0]);
        assert_eq!(pixel_corners(radius, false, true), [3.0, 1.0, 2.0, 4.0]);
    }
}
