use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::axis_labels::format_number;
use crate::core::primitives::fractional_digits;
use crate::core::series::{prepare_points, DataLabelPosition, Series};
use crate::core::series_builder::SeriesGeometry;
use crate::core::types::PixelPoint;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, TextHAlign, TextPrimitive};

/// Largest number of fraction digits a default data label shows.
const MAX_DEFAULT_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataLabelConfig {
    pub char_width_px: f64,
    pub label_height_px: f64,
    pub horizontal_padding_px: f64,
    pub lane_gap_px: f64,
    pub min_horizontal_gap_px: f64,
    pub vertical_offset_px: f64,
    pub font_size_px: f64,
    pub color: Color,
}

impl Default for DataLabelConfig {
    fn default() -> Self {
        Self {
            char_width_px: 7.0,
            label_height_px: 14.0,
            horizontal_padding_px: 6.0,
            lane_gap_px: 4.0,
            min_horizontal_gap_px: 2.0,
            vertical_offset_px: 6.0,
            font_size_px: 12.0,
            color: Color::BLACK,
        }
    }
}

impl DataLabelConfig {
    pub fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.char_width_px, "char_width_px"),
            (self.label_height_px, "label_height_px"),
            (self.horizontal_padding_px, "horizontal_padding_px"),
            (self.lane_gap_px, "lane_gap_px"),
            (self.min_horizontal_gap_px, "min_horizontal_gap_px"),
            (self.vertical_offset_px, "vertical_offset_px"),
            (self.font_size_px, "font_size_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "data label config `{name}` must be finite and > 0"
                )));
            }
        }
        self.color.validate()?;
        Ok(self)
    }
}

/// A data label after collision resolution, in plot-relative pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedDataLabel {
    pub series_id: String,
    pub index: usize,
    pub text: String,
    pub position: DataLabelPosition,
    pub lane: usize,
    /// Label center.
    pub x: f64,
    pub y: f64,
    pub left_px: f64,
    pub top_px: f64,
    pub width_px: f64,
    pub height_px: f64,
}

impl PlacedDataLabel {
    /// Text primitive in chart coordinates; `origin` is the plot rect corner.
    #[must_use]
    pub fn to_text(&self, origin: PixelPoint, config: DataLabelConfig) -> TextPrimitive {
        TextPrimitive::new(
            self.text.clone(),
            origin.x + self.x,
            origin.y + self.top_px + self.height_px,
            config.font_size_px,
            config.color,
            TextHAlign::Center,
        )
    }
}

/// Places the value labels of one series without overlaps.
///
/// Labels sit above, below or on their anchor (the first symbol location of
/// each visible point). Labels that would collide horizontally with an
/// earlier label on the same side move to the next lane, one label height
/// further out. Placement order is stable by x, then point index.
pub fn place_data_labels(
    series: &Series,
    geometry: &SeriesGeometry,
    plot_width: f64,
    config: DataLabelConfig,
) -> ChartResult<Vec<PlacedDataLabel>> {
    let config = config.validate()?;
    let settings = &series.style.data_label;
    if !settings.visible || !series.visible {
        return Ok(Vec::new());
    }

    let values = prepare_points(series);
    let mut prepared = Vec::new();
    for point in geometry.points.iter().filter(|point| point.visible) {
        let (Some(anchor), Some(value)) = (
            point.symbol_locations.first().copied(),
            values.get(point.index).map(|prepared| prepared.y),
        ) else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        let digits = fractional_digits(value).min(MAX_DEFAULT_DIGITS);
        let text = format_number(value, settings.format.as_deref(), digits);
        let width = label_width(&text, config);
        let half = width * 0.5;
        let x = clamp_x(anchor.x, half, plot_width);
        prepared.push(PreparedLabel {
            index: point.index,
            text,
            anchor_y: anchor.y,
            x,
            left: x - half,
            right: x + half,
            width,
        });
    }

    prepared.sort_by(|a, b| {
        OrderedFloat(a.x)
            .cmp(&OrderedFloat(b.x))
            .then_with(|| a.index.cmp(&b.index))
    });

    let lane_step = config.label_height_px + config.lane_gap_px;
    let mut lane_last_right = Vec::<f64>::new();
    let mut placed = Vec::with_capacity(prepared.len());
    for item in prepared {
        let lane = allocate_lane(
            &mut lane_last_right,
            item.left,
            item.right,
            config.min_horizontal_gap_px,
        );
        let lane_offset = lane as f64 * lane_step;
        let half_height = config.label_height_px * 0.5;
        let y = match settings.position {
            DataLabelPosition::Above => {
                item.anchor_y - config.vertical_offset_px - half_height - lane_offset
            }
            DataLabelPosition::Below => {
                item.anchor_y + config.vertical_offset_px + half_height + lane_offset
            }
            DataLabelPosition::Center => item.anchor_y + lane_offset,
        };
        placed.push(PlacedDataLabel {
            series_id: series.id.clone(),
            index: item.index,
            text: item.text,
            position: settings.position,
            lane,
            x: item.x,
            y,
            left_px: item.left,
            top_px: y - half_height,
            width_px: item.width,
            height_px: config.label_height_px,
        });
    }
    trace!(series = %series.id, labels = placed.len(), "data labels placed");
    Ok(placed)
}

#[derive(Debug)]
struct PreparedLabel {
    index: usize,
    text: String,
    anchor_y: f64,
    x: f64,
    left: f64,
    right: f64,
    width: f64,
}

fn label_width(text: &str, config: DataLabelConfig) -> f64 {
    text.chars().count() as f64 * config.char_width_px + 2.0 * config.horizontal_padding_px
}

fn clamp_x(x: f64, span_half: f64, plot_width: f64) -> f64 {
    if plot_width <= 2.0 * span_half {
        plot_width * 0.5
    } else {
        x.clamp(span_half, plot_width - span_half)
    }
}

fn allocate_lane(last_right: &mut Vec<f64>, left: f64, right: f64, min_gap: f64) -> usize {
    for (lane, lane_last_right) in last_right.iter_mut().enumerate() {
        if left >= *lane_last_right + min_gap {
            *lane_last_right = right;
            return lane;
        }
    }
    last_right.push(right);
    last_right.len() - 1
}

#[cfg(test)]
mod tests {
    use super::{allocate_lane, place_data_labels, DataLabelConfig};
    use crate::core::series::{DataLabelSettings, Series, SeriesKind, SeriesPoint};
    use crate::core::series_builder::{symbol_point, SeriesGeometry};
    use crate::core::types::PixelPoint;
    use crate::render::Color;

    fn geometry(xs: &[f64]) -> SeriesGeometry {
        let mut geometry = SeriesGeometry::empty("s");
        for (index, x) in xs.iter().enumerate() {
            geometry.points.push(symbol_point(
                index,
                PixelPoint::new(*x, 100.0),
                (5.0, 5.0),
                Color::BLACK,
            ));
        }
        geometry
    }

    #[test]
    fn lanes_reuse_free_space() {
        let mut lanes = Vec::new();
        assert_eq!(allocate_lane(&mut lanes, 0.0, 10.0, 2.0), 0);
        assert_eq!(allocate_lane(&mut lanes, 5.0, 15.0, 2.0), 1);
        assert_eq!(allocate_lane(&mut lanes, 12.0, 20.0, 2.0), 0);
    }

    #[test]
    fn overlapping_labels_stack_upwards() {
        let series = Series::new(
            "s",
            SeriesKind::Line,
            vec![SeriesPoint::xy(0.0, 1.5), SeriesPoint::xy(1.0, 2.0)],
        )
        .with_data_label(DataLabelSettings {
            visible: true,
            ..DataLabelSettings::default()
        });
        let placed = place_data_labels(&series, &geometry(&[50.0, 52.0]), 400.0, DataLabelConfig::default())
            .expect("placement");
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].text, "1.5");
        assert_eq!(placed[1].text, "2");
        assert_eq!(placed[0].lane, 0);
        assert_eq!(placed[1].lane, 1);
        assert!(placed[1].y < placed[0].y);
    }

    #[test]
    fn hidden_settings_place_nothing() {
        let series = Series::new("s", SeriesKind::Line, vec![SeriesPoint::xy(0.0, 1.0)]);
        let placed = place_data_labels(&series, &geometry(&[10.0]), 100.0, DataLabelConfig::default())
            .expect("placement");
        assert!(placed.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let series = Series::new("s", SeriesKind::Line, Vec::new());
        let config = DataLabelConfig {
            font_size_px: 0.0,
            ..DataLabelConfig::default()
        };
        assert!(place_data_labels(&series, &SeriesGeometry::empty("s"), 100.0, config).is_err());
    }
}
