//! Series geometry dispatch and the shared pieces of every builder.
//!
//! Builders are pure: they read a series plus a [`BuildContext`] and return a
//! [`SeriesGeometry`]. Nothing is written back into the series.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::area_series::build_area;
use crate::core::axis::{Axis, ValueType};
use crate::core::candlestick::{build_candles, build_hilo};
use crate::core::column_series::build_columns;
use crate::core::coordinate::to_pixel;
use crate::core::double_range::DoubleRange;
use crate::core::error_bar_series::build_error_bars;
use crate::core::line_series::build_line;
use crate::core::scatter_series::build_scatter;
use crate::core::series::{EmptyPointMode, PreparedPoint, Series, SeriesKind};
use crate::core::side_by_side::{side_by_side_range, SideBySideSlot};
use crate::core::stacking::StackedValues;
use crate::core::types::{PixelPoint, PlotRect};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DashPattern, RenderOptions};

/// Per-point output consumed by markers, data labels and hit testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    pub index: usize,
    pub visible: bool,
    /// Plot-relative anchor(s); two for range kinds (high, low).
    pub symbol_locations: SmallVec<[PixelPoint; 2]>,
    /// Hit-test regions in plot-relative pixels.
    pub regions: SmallVec<[PlotRect; 1]>,
    pub interior: Color,
}

impl PointGeometry {
    #[must_use]
    pub fn hidden(index: usize, interior: Color) -> Self {
        Self {
            index,
            visible: false,
            symbol_locations: SmallVec::new(),
            regions: SmallVec::new(),
            interior,
        }
    }
}

/// Geometry of one series for one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGeometry {
    pub series_id: String,
    pub render_options: Vec<RenderOptions>,
    pub points: Vec<PointGeometry>,
}

impl SeriesGeometry {
    #[must_use]
    pub fn empty(series_id: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            render_options: Vec::new(),
            points: Vec::new(),
        }
    }
}

/// Everything a builder needs besides the series itself.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub x_axis: &'a Axis,
    pub y_axis: &'a Axis,
    pub transposed: bool,
    pub slot: SideBySideSlot,
    /// Smallest positive x gap among the series sharing the axis pair.
    pub min_points_delta: f64,
    pub stacked: Option<&'a StackedValues>,
}

impl<'a> BuildContext<'a> {
    #[must_use]
    pub fn new(x_axis: &'a Axis, y_axis: &'a Axis, transposed: bool) -> Self {
        Self {
            x_axis,
            y_axis,
            transposed,
            slot: SideBySideSlot::single(),
            min_points_delta: 1.0,
            stacked: None,
        }
    }

    #[must_use]
    pub fn with_slot(mut self, slot: SideBySideSlot, min_points_delta: f64) -> Self {
        self.slot = slot;
        self.min_points_delta = min_points_delta;
        self
    }

    #[must_use]
    pub fn with_stacked(mut self, stacked: &'a StackedValues) -> Self {
        self.stacked = Some(stacked);
        self
    }

    /// Plot-relative pixel of a data pair.
    #[must_use]
    pub fn pixel(&self, x: f64, y: f64) -> PixelPoint {
        to_pixel(x, y, self.x_axis, self.y_axis, self.transposed)
    }

    /// Offset range of this series' side-by-side slot, in x units.
    #[must_use]
    pub fn slot_range(&self, series: &Series) -> DoubleRange {
        side_by_side_range(
            self.slot,
            self.min_points_delta,
            series.column_width_ratio(),
            series.style.column_spacing,
        )
    }

    /// Stacked `(start, end)` for the point at `index`, when stacked values exist.
    #[must_use]
    pub fn stacked_at(&self, index: usize) -> Option<(f64, f64)> {
        let stacked = self.stacked?;
        let start = *stacked.start_values.get(index)?;
        let end = *stacked.end_values.get(index)?;
        (start.is_finite() && end.is_finite()).then_some((start, end))
    }

    /// Baseline value for areas and columns: zero clamped into the visible
    /// range, or the lowest visible value on logarithmic axes.
    #[must_use]
    pub fn value_origin(&self) -> f64 {
        let range = self.y_axis.visible_range;
        if self.y_axis.value_type() == ValueType::Logarithmic {
            return self.y_axis.log_base().powf(range.min);
        }
        0.0_f64.clamp(range.min, range.max)
    }
}

/// Builds geometry for `series`, dispatching on its kind.
pub fn build_series(series: &Series, ctx: &BuildContext<'_>) -> ChartResult<SeriesGeometry> {
    series.style.validate()?;
    if !series.visible {
        return Ok(SeriesGeometry::empty(series.id.clone()));
    }
    if series.kind.is_stacking() && ctx.stacked.is_none() {
        return Err(ChartError::InvalidData(format!(
            "stacking series `{}` needs stacked values",
            series.id
        )));
    }

    let geometry = match series.kind {
        SeriesKind::Line
        | SeriesKind::Spline
        | SeriesKind::StepLine
        | SeriesKind::StackingLine
        | SeriesKind::StackingLine100 => build_line(series, ctx),
        SeriesKind::Area
        | SeriesKind::SplineArea
        | SeriesKind::StepArea
        | SeriesKind::RangeArea
        | SeriesKind::StackingArea
        | SeriesKind::StackingArea100 => build_area(series, ctx),
        SeriesKind::Column
        | SeriesKind::Bar
        | SeriesKind::Histogram
        | SeriesKind::RangeColumn
        | SeriesKind::StackingColumn
        | SeriesKind::StackingColumn100
        | SeriesKind::StackingBar
        | SeriesKind::StackingBar100 => build_columns(series, ctx),
        SeriesKind::Candle => build_candles(series, ctx),
        SeriesKind::Hilo => build_hilo(series, ctx),
        SeriesKind::Scatter => build_scatter(series, ctx),
        SeriesKind::ErrorBar => build_error_bars(series, ctx),
    };
    trace!(
        series = %series.id,
        kind = ?series.kind,
        options = geometry.render_options.len(),
        points = geometry.points.len(),
        "series geometry built"
    );
    Ok(geometry)
}

/// Splits points into drawable runs.
///
/// `Gap` ends a run at every hidden point; `Drop` skips hidden points and keeps
/// the run going. `Zero`/`Average` points were already substituted.
#[must_use]
pub fn visible_runs(points: &[PreparedPoint], mode: EmptyPointMode) -> Vec<Vec<PreparedPoint>> {
    let mut runs = Vec::new();
    let mut current: Vec<PreparedPoint> = Vec::new();
    for point in points {
        if point.visible {
            current.push(*point);
        } else if mode != EmptyPointMode::Drop && !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Stroke/fill styling shared by every option of a series.
#[must_use]
pub fn styled(series: &Series, options: RenderOptions, filled: bool) -> RenderOptions {
    let style = &series.style;
    let stroke = style.stroke.unwrap_or(style.fill);
    let options = options
        .with_stroke(stroke, style.stroke_width)
        .with_opacity(style.opacity)
        .with_dash(style.dash_array.as_deref().map(DashPattern::parse).unwrap_or_default());
    if filled {
        options.with_fill(style.fill)
    } else {
        options
    }
}

/// Point geometry with a single symbol and a square hit region around it.
#[must_use]
pub fn symbol_point(index: usize, location: PixelPoint, size: (f64, f64), interior: Color) -> PointGeometry {
    let mut symbol_locations = SmallVec::new();
    symbol_locations.push(location);
    let mut regions = SmallVec::new();
    regions.push(symbol_region(location, size));
    PointGeometry {
        index,
        visible: true,
        symbol_locations,
        regions,
        interior,
    }
}

/// Hit region of `size` centred on a symbol.
#[must_use]
pub fn symbol_region(location: PixelPoint, size: (f64, f64)) -> PlotRect {
    let (width, height) = size;
    PlotRect::new(location.x - width * 0.5, location.y - height * 0.5, width, height)
}
