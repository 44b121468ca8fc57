use crate::core::series::{prepare_points, Series};
use crate::core::series_builder::{symbol_point, BuildContext, PointGeometry, SeriesGeometry};
use crate::extensions::markers::marker_path;
use crate::render::RenderOptions;

/// Builds one filled marker symbol per visible point, id `"{id}_point_{index}"`.
///
/// The symbol shape and size come from the series marker settings whether or
/// not extra markers are enabled.
#[must_use]
pub fn build_scatter(series: &Series, ctx: &BuildContext<'_>) -> SeriesGeometry {
    let marker = series.style.marker;
    let mut geometry = SeriesGeometry::empty(series.id.clone());
    for point in prepare_points(series) {
        let interior = point.color.unwrap_or(series.style.fill);
        if !point.visible {
            geometry.points.push(PointGeometry::hidden(point.index, interior));
            continue;
        }
        let center = ctx.pixel(point.x, point.y);
        let path = marker_path(marker.shape, center, marker.width, marker.height);
        let options = RenderOptions::path(format!("{}_point_{}", series.id, point.index), path)
            .with_fill(interior)
            .with_stroke(series.style.stroke.unwrap_or(interior), series.style.stroke_width)
            .with_opacity(series.style.opacity);
        geometry.render_options.push(options);
        geometry.points.push(symbol_point(
            point.index,
            center,
            (marker.width, marker.height),
            interior,
        ));
    }
    geometry
}
