use crate::core::series::{MarkerShape, Series, SeriesKind};
use crate::core::series_builder::SeriesGeometry;
use crate::core::types::PixelPoint;
use crate::render::{PathGeometry, RenderOptions};

/// Cubic Bézier handle ratio approximating a quarter ellipse.
const ELLIPSE_KAPPA: f64 = 0.552_284_749_8;

/// Symbol outline of `shape` centered on `center`, sized `width × height`.
///
/// Every shape except `Cross` is closed.
#[must_use]
pub fn marker_path(shape: MarkerShape, center: PixelPoint, width: f64, height: f64) -> PathGeometry {
    let (rx, ry) = (width.max(0.0) * 0.5, height.max(0.0) * 0.5);
    let (cx, cy) = (center.x, center.y);
    let (left, right, top, bottom) = (cx - rx, cx + rx, cy - ry, cy + ry);
    let point = PixelPoint::new;

    let mut path = PathGeometry::new();
    match shape {
        MarkerShape::Circle => {
            let (kx, ky) = (rx * ELLIPSE_KAPPA, ry * ELLIPSE_KAPPA);
            path.move_to(point(right, cy))
                .cubic_to(point(right, cy + ky), point(cx + kx, bottom), point(cx, bottom))
                .cubic_to(point(cx - kx, bottom), point(left, cy + ky), point(left, cy))
                .cubic_to(point(left, cy - ky), point(cx - kx, top), point(cx, top))
                .cubic_to(point(cx + kx, top), point(right, cy - ky), point(right, cy))
                .close();
        }
        MarkerShape::Rectangle => {
            path.move_to(point(left, top))
                .line_to(point(right, top))
                .line_to(point(right, bottom))
                .line_to(point(left, bottom))
                .close();
        }
        MarkerShape::Triangle => {
            path.move_to(point(cx, top))
                .line_to(point(right, bottom))
                .line_to(point(left, bottom))
                .close();
        }
        MarkerShape::InvertedTriangle => {
            path.move_to(point(left, top))
                .line_to(point(right, top))
                .line_to(point(cx, bottom))
                .close();
        }
        MarkerShape::Diamond => {
            path.move_to(point(cx, top))
                .line_to(point(right, cy))
                .line_to(point(cx, bottom))
                .line_to(point(left, cy))
                .close();
        }
        MarkerShape::Cross => {
            path.move_to(point(left, cy))
                .line_to(point(right, cy))
                .move_to(point(cx, top))
                .line_to(point(cx, bottom));
        }
    }
    path
}

/// Marker symbols at every symbol location of the visible points.
///
/// Ids are `"{series}_marker_{index}_{location}"`. Scatter series already
/// draw their points as symbols and get no extra markers.
#[must_use]
pub fn build_markers(series: &Series, geometry: &SeriesGeometry) -> Vec<RenderOptions> {
    let marker = series.style.marker;
    if !marker.visible || !series.visible || series.kind == SeriesKind::Scatter {
        return Vec::new();
    }
    let stroke = series.style.stroke.unwrap_or(series.style.fill);
    geometry
        .points
        .iter()
        .filter(|point| point.visible)
        .flat_map(|point| {
            point
                .symbol_locations
                .iter()
                .enumerate()
                .map(move |(location, center)| {
                    RenderOptions::path(
                        format!("{}_marker_{}_{location}", series.id, point.index),
                        marker_path(marker.shape, *center, marker.width, marker.height),
                    )
                    .with_fill(point.interior)
                    .with_stroke(stroke, series.style.stroke_width)
                    .with_opacity(series.style.opacity)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{build_markers, marker_path};
    use crate::core::series::{MarkerSettings, MarkerShape, Series, SeriesKind};
    use crate::core::series_builder::{symbol_point, SeriesGeometry};
    use crate::core::types::PixelPoint;
    use crate::render::{Color, PathVerb};

    #[test]
    fn closed_shapes_and_open_cross() {
        let center = PixelPoint::new(10.0, 10.0);
        for shape in [
            MarkerShape::Circle,
            MarkerShape::Rectangle,
            MarkerShape::Triangle,
            MarkerShape::InvertedTriangle,
            MarkerShape::Diamond,
        ] {
            assert!(marker_path(shape, center, 6.0, 6.0).is_closed(), "{shape:?}");
        }
        let cross = marker_path(MarkerShape::Cross, center, 6.0, 6.0);
        assert!(!cross.is_closed());
        assert_eq!(cross.subpath_count(), 2);
    }

    #[test]
    fn diamond_touches_the_box_edges() {
        let path = marker_path(MarkerShape::Diamond, PixelPoint::new(0.0, 0.0), 4.0, 2.0);
        assert_eq!(path.to_svg(), "M 0 -1 L 2 0 L 0 1 L -2 0 Z");
        assert!(path.commands.iter().all(|c| c.verb != PathVerb::Cubic));
    }

    #[test]
    fn markers_follow_visible_points() {
        let series = Series::new("s", SeriesKind::Line, Vec::new()).with_marker(MarkerSettings {
            visible: true,
            ..MarkerSettings::default()
        });
        let mut geometry = SeriesGeometry::empty("s");
        geometry
            .points
            .push(symbol_point(0, PixelPoint::new(1.0, 1.0), (5.0, 5.0), Color::BLACK));
        let markers = build_markers(&series, &geometry);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, "s_marker_0_0");

        let hidden = Series::new("s", SeriesKind::Line, Vec::new());
        assert!(build_markers(&hidden, &geometry).is_empty());
    }
}
