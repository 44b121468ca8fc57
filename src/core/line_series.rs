use crate::core::series::{prepare_points, PreparedPoint, Series, SeriesKind, StepPosition};
use crate::core::series_builder::{
    styled, symbol_point, visible_runs, BuildContext, PointGeometry, SeriesGeometry,
};
use crate::core::spline::{natural_spline_coefficients, spline_control_points};
use crate::render::{PathGeometry, RenderOptions};

/// Builds line, step line, spline and stacking line geometry.
///
/// Every visible run becomes one open path `"{id}_line_{run}"`. Stacking
/// lines follow the stacked end values.
#[must_use]
pub fn build_line(series: &Series, ctx: &BuildContext<'_>) -> SeriesGeometry {
    let points = line_points(series, ctx);
    let mut geometry = SeriesGeometry::empty(series.id.clone());

    for (run_index, run) in visible_runs(&points, series.style.empty_point_mode)
        .iter()
        .enumerate()
    {
        let path = match series.kind {
            SeriesKind::StepLine => step_path(run, series.style.step_position, ctx),
            SeriesKind::Spline => spline_path(run, ctx),
            _ => polyline_path(run, ctx),
        };
        if path.is_empty() {
            continue;
        }
        geometry.render_options.push(styled(
            series,
            RenderOptions::path(format!("{}_line_{run_index}", series.id), path),
            false,
        ));
    }

    geometry.points = point_geometry(series, &points, ctx);
    geometry
}

/// Prepared points with stacked end values swapped in for stacking kinds.
pub(crate) fn line_points(series: &Series, ctx: &BuildContext<'_>) -> Vec<PreparedPoint> {
    let mut points = prepare_points(series);
    if series.kind.is_stacking() {
        for point in &mut points {
            match ctx.stacked_at(point.index) {
                Some((_, end)) if point.visible => point.y = end,
                Some(_) => {}
                None => point.visible = false,
            }
        }
    }
    points
}

pub(crate) fn point_geometry(
    series: &Series,
    points: &[PreparedPoint],
    ctx: &BuildContext<'_>,
) -> Vec<PointGeometry> {
    let marker = series.style.marker;
    points
        .iter()
        .map(|point| {
            let interior = point.color.unwrap_or(series.style.fill);
            if point.visible {
                symbol_point(
                    point.index,
                    ctx.pixel(point.x, point.y),
                    (marker.width, marker.height),
                    interior,
                )
            } else {
                PointGeometry::hidden(point.index, interior)
            }
        })
        .collect()
}

pub(crate) fn polyline_path(run: &[PreparedPoint], ctx: &BuildContext<'_>) -> PathGeometry {
    let mut path = PathGeometry::new();
    for (i, point) in run.iter().enumerate() {
        let pixel = ctx.pixel(point.x, point.y);
        if i == 0 {
            path.move_to(pixel);
        } else {
            path.line_to(pixel);
        }
    }
    path
}

/// Step vertices: `Left` rises at the previous x, `Right` at the current x,
/// `Center` halfway between.
pub(crate) fn step_path(
    run: &[PreparedPoint],
    position: StepPosition,
    ctx: &BuildContext<'_>,
) -> PathGeometry {
    let mut path = PathGeometry::new();
    let Some(first) = run.first() else {
        return path;
    };
    path.move_to(ctx.pixel(first.x, first.y));
    for pair in run.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        match position {
            StepPosition::Left => {
                path.line_to(ctx.pixel(previous.x, current.y));
            }
            StepPosition::Right => {
                path.line_to(ctx.pixel(current.x, previous.y));
            }
            StepPosition::Center => {
                let middle = (previous.x + current.x) * 0.5;
                path.line_to(ctx.pixel(middle, previous.y));
                path.line_to(ctx.pixel(middle, current.y));
            }
        }
        path.line_to(ctx.pixel(current.x, current.y));
    }
    path
}

/// Natural cubic spline through the run, control points computed in value
/// space and then mapped.
pub(crate) fn spline_path(run: &[PreparedPoint], ctx: &BuildContext<'_>) -> PathGeometry {
    if run.len() < 3 {
        return polyline_path(run, ctx);
    }
    let xs: Vec<f64> = run.iter().map(|point| point.x).collect();
    let ys: Vec<f64> = run.iter().map(|point| point.y).collect();
    let coefficients = natural_spline_coefficients(&xs, &ys);

    let mut path = PathGeometry::new();
    path.move_to(ctx.pixel(xs[0], ys[0]));
    for i in 1..run.len() {
        let ((c1x, c1y), (c2x, c2y)) = spline_control_points(
            (xs[i - 1], ys[i - 1]),
            (xs[i], ys[i]),
            coefficients[i - 1],
            coefficients[i],
        );
        path.cubic_to(
            ctx.pixel(c1x, c1y),
            ctx.pixel(c2x, c2y),
            ctx.pixel(xs[i], ys[i]),
        );
    }
    path
}
