//! One full layout pass: series data in, `ChartFrame` out.
//!
//! Every pass recomputes axes from scratch; nothing carries over from the
//! previous frame except what the caller keeps.

use indexmap::IndexMap;
use tracing::debug;

use crate::core::coordinate::range_coefficient;
use crate::core::cross_axis::compute_axis_crossing;
use crate::core::series::min_points_delta;
use crate::core::side_by_side::find_rect_positions;
use crate::core::stacking::compute_stacked_values;
use crate::core::{
    build_series, Axis, AxisConfig, AxisCrossing, AxisLabelCallback, AxisRangeEngine, AxisRole,
    BuildContext, Orientation, PixelPoint, PlotRect, RangeAccumulator, Series, SeriesGeometry,
    SideBySideSlot, StackedValues,
};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{build_markers, place_data_labels};
use crate::render::{AxisFrame, ChartFrame, Color, LinePrimitive, TextHAlign, TextPrimitive};

use super::categories::resolve_categories;
use super::ChartEngineConfig;

const AXIS_LINE_WIDTH: f64 = 1.0;
const AXIS_COLOR: Color = Color::rgb(0.4, 0.4, 0.4);
const LABEL_COLOR: Color = Color::rgb(0.2, 0.2, 0.2);
const LABEL_PADDING_PX: f64 = 4.0;
/// Keeps labels sitting exactly on a range edge.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Everything a layout pass produces.
#[derive(Debug, Clone)]
pub(crate) struct LayoutPass {
    pub frame: ChartFrame,
    pub axes: Vec<Axis>,
    pub geometries: Vec<SeriesGeometry>,
    pub transposed: bool,
}

pub(crate) fn run_layout(
    config: &ChartEngineConfig,
    callback: Option<&dyn AxisLabelCallback>,
) -> ChartResult<LayoutPass> {
    config.validate()?;
    let plot_rect = config.plot_rect()?;
    let transposed = config.swaps_axes();

    let mut axes: Vec<Axis> = config
        .axes
        .iter()
        .map(|axis_config| {
            let mut axis_config = axis_config.clone();
            if transposed {
                axis_config.orientation = axis_config.orientation.orthogonal();
            }
            let rect = native_axis_rect(&axis_config, plot_rect);
            Axis::new(axis_config, rect)
        })
        .collect();

    let mut series = config.series.clone();
    resolve_categories(config, &mut axes, &mut series);

    let pairs = group_by_axis_pair(config, &series);
    let mut stacked: IndexMap<String, StackedValues> = IndexMap::new();
    let mut slots: IndexMap<String, (SideBySideSlot, f64)> = IndexMap::new();
    for members in pairs.values() {
        let group: Vec<&Series> = members.iter().map(|&index| &series[index]).collect();
        stacked.extend(compute_stacked_values(&group));
        let delta = min_points_delta(group.iter().copied().filter(|series| series.kind.is_rect()));
        for (id, slot) in find_rect_positions(&group) {
            slots.insert(id, (slot, delta));
        }
    }

    let range_engine = AxisRangeEngine::new(config.range_tuning);
    for axis_index in 0..axes.len() {
        let mut accumulator = RangeAccumulator::new();
        let axis = &axes[axis_index];
        for series in &series {
            if config.x_axis_name(series) == axis.name() {
                accumulator.collect_series(axis, AxisRole::X, series, None);
            }
            if config.y_axis_name(series) == axis.name() {
                accumulator.collect_series(axis, AxisRole::Y, series, stacked.get(&series.id));
            }
        }
        range_engine.compute(&mut axes[axis_index], &accumulator, transposed, callback);
    }

    let crossings: Vec<Option<AxisCrossing>> = axes
        .iter()
        .map(|axis| compute_axis_crossing(axis, &axes, plot_rect, label_room(axis)))
        .collect();

    let mut frame = ChartFrame::new(config.viewport, plot_rect);
    frame.axes = axes
        .iter()
        .zip(crossings)
        .map(|(axis, crossing)| axis_frame(axis, crossing))
        .collect();

    let origin = PixelPoint::new(plot_rect.x, plot_rect.y);
    let mut geometries = Vec::with_capacity(series.len());
    for series in &series {
        let x_axis = find_axis(&axes, config.x_axis_name(series))?;
        let y_axis = find_axis(&axes, config.y_axis_name(series))?;
        let mut ctx = BuildContext::new(x_axis, y_axis, transposed);
        if let Some((slot, delta)) = slots.get(&series.id) {
            ctx = ctx.with_slot(*slot, *delta);
        }
        if let Some(values) = stacked.get(&series.id) {
            ctx = ctx.with_stacked(values);
        }
        let geometry = build_series(series, &ctx)?;

        frame.series.extend(geometry.render_options.iter().cloned());
        frame.markers.extend(build_markers(series, &geometry));
        let labels = place_data_labels(series, &geometry, plot_rect.width, config.data_labels)?;
        frame.data_labels.extend(
            labels
                .iter()
                .map(|label| label.to_text(origin, config.data_labels)),
        );
        geometries.push(geometry);
    }

    debug!(
        axes = axes.len(),
        series = geometries.len(),
        render_options = frame.series.len(),
        markers = frame.markers.len(),
        data_labels = frame.data_labels.len(),
        transposed,
        "layout pass complete"
    );
    Ok(LayoutPass {
        frame,
        axes,
        geometries,
        transposed,
    })
}

fn group_by_axis_pair(config: &ChartEngineConfig, series: &[Series]) -> IndexMap<(String, String), Vec<usize>> {
    let mut pairs: IndexMap<(String, String), Vec<usize>> = IndexMap::new();
    for (index, series) in series.iter().enumerate() {
        let key = (
            config.x_axis_name(series).to_owned(),
            config.y_axis_name(series).to_owned(),
        );
        pairs.entry(key).or_default().push(index);
    }
    pairs
}

pub(crate) fn find_axis<'a>(axes: &'a [Axis], name: &str) -> ChartResult<&'a Axis> {
    axes.iter()
        .find(|axis| axis.name() == name)
        .ok_or_else(|| ChartError::UnknownAxis(name.to_owned()))
}

/// Axis line rect at the plot edge: zero height for horizontal axes, zero
/// width for vertical ones.
fn native_axis_rect(config: &AxisConfig, plot: PlotRect) -> PlotRect {
    match (config.orientation, config.opposed_position) {
        (Orientation::Horizontal, false) => PlotRect::new(plot.x, plot.bottom(), plot.width, 0.0),
        (Orientation::Horizontal, true) => PlotRect::new(plot.x, plot.y, plot.width, 0.0),
        (Orientation::Vertical, false) => PlotRect::new(plot.x, plot.y, 0.0, plot.height),
        (Orientation::Vertical, true) => PlotRect::new(plot.right(), plot.y, 0.0, plot.height),
    }
}

/// Room the labels of `axis` need perpendicular to it.
fn label_room(axis: &Axis) -> f64 {
    let extent = axis
        .labels
        .iter()
        .map(|label| match axis.orientation() {
            Orientation::Horizontal => label.size.height,
            Orientation::Vertical => label.size.width,
        })
        .fold(0.0, f64::max);
    extent + LABEL_PADDING_PX
}

fn axis_frame(axis: &Axis, crossing: Option<AxisCrossing>) -> AxisFrame {
    let rect = crossing.map_or(axis.rect, |crossing| crossing.updated_rect);
    let orientation = axis.orientation();
    let opposed = axis.config.opposed_position;
    let font = axis.config.label_font_size_px;

    let line = match orientation {
        Orientation::Horizontal => LinePrimitive::new(
            PixelPoint::new(rect.x, rect.y),
            PixelPoint::new(rect.right(), rect.y),
            AXIS_LINE_WIDTH,
            AXIS_COLOR,
        ),
        Orientation::Vertical => LinePrimitive::new(
            PixelPoint::new(rect.x, rect.y),
            PixelPoint::new(rect.x, rect.bottom()),
            AXIS_LINE_WIDTH,
            AXIS_COLOR,
        ),
    };

    let labels = axis
        .labels
        .iter()
        .filter_map(|label| {
            let text = label.text();
            let coefficient = range_coefficient(label.value, axis);
            if text.is_empty() || !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&coefficient) {
                return None;
            }
            let primitive = match (orientation, opposed) {
                (Orientation::Horizontal, false) => TextPrimitive::new(
                    text,
                    rect.x + coefficient * rect.width,
                    rect.y + LABEL_PADDING_PX + font,
                    font,
                    LABEL_COLOR,
                    TextHAlign::Center,
                ),
                (Orientation::Horizontal, true) => TextPrimitive::new(
                    text,
                    rect.x + coefficient * rect.width,
                    rect.y - LABEL_PADDING_PX,
                    font,
                    LABEL_COLOR,
                    TextHAlign::Center,
                ),
                (Orientation::Vertical, false) => TextPrimitive::new(
                    text,
                    rect.x - LABEL_PADDING_PX,
                    rect.bottom() - coefficient * rect.height + font / 3.0,
                    font,
                    LABEL_COLOR,
                    TextHAlign::Right,
                ),
                (Orientation::Vertical, true) => TextPrimitive::new(
                    text,
                    rect.x + LABEL_PADDING_PX,
                    rect.bottom() - coefficient * rect.height + font / 3.0,
                    font,
                    LABEL_COLOR,
                    TextHAlign::Left,
                ),
            };
            Some(primitive)
        })
        .collect();

    AxisFrame {
        name: axis.name().to_owned(),
        orientation,
        rect,
        visible_range: axis.visible_range,
        line,
        labels,
        crossing,
    }
}

#[cfg(test)]
mod tests {
    use super::{native_axis_rect, run_layout};
    use crate::api::ChartEngineConfig;
    use crate::core::{AxisConfig, PlotRect, Series, SeriesKind, SeriesPoint, Viewport};
    use crate::render::TextHAlign;

    #[test]
    fn axis_rects_sit_on_plot_edges() {
        let plot = PlotRect::new(10.0, 20.0, 300.0, 200.0);
        assert_eq!(
            native_axis_rect(&AxisConfig::horizontal("x"), plot),
            PlotRect::new(10.0, 220.0, 300.0, 0.0)
        );
        assert_eq!(
            native_axis_rect(&AxisConfig::vertical("y").with_opposed_position(true), plot),
            PlotRect::new(310.0, 20.0, 0.0, 200.0)
        );
    }

    fn two_points(kind: SeriesKind) -> Series {
        Series::new("b", kind, vec![SeriesPoint::xy(0.0, 5.0), SeriesPoint::xy(1.0, 8.0)])
    }

    #[test]
    fn bar_series_and_transposed_flag_cancel_out() {
        let bar = ChartEngineConfig::new(Viewport::new(400, 300)).with_series(two_points(SeriesKind::Bar));
        assert!(bar.swaps_axes());
        assert!(!bar.clone().with_transposed(true).swaps_axes());

        let pass = run_layout(&bar.with_transposed(true), None).expect("layout");
        assert!(!pass.transposed);
        assert_eq!(pass.frame.axes[0].orientation, crate::core::Orientation::Horizontal);
    }

    #[test]
    fn transposed_pass_swaps_axis_orientation() {
        let config = ChartEngineConfig::new(Viewport::new(400, 300))
            .with_transposed(true)
            .with_series(two_points(SeriesKind::Column));
        let pass = run_layout(&config, None).expect("layout");
        assert!(pass.transposed);
        assert_eq!(pass.frame.axes[0].orientation, crate::core::Orientation::Vertical);
        assert!(
            pass.frame.axes[0]
                .labels
                .iter()
                .all(|label| label.h_align == TextHAlign::Right)
        );
        assert_eq!(pass.geometries.len(), 1);
    }
}
