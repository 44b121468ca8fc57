use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Series chart type. Dispatch happens by `match`, never by name matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Line,
    Spline,
    StepLine,
    Area,
    SplineArea,
    StepArea,
    RangeArea,
    StackingLine,
    StackingLine100,
    StackingArea,
    StackingArea100,
    Column,
    Bar,
    Histogram,
    RangeColumn,
    StackingColumn,
    StackingColumn100,
    StackingBar,
    StackingBar100,
    Candle,
    Hilo,
    Scatter,
    ErrorBar,
}

/// Shape of the values each point of a series kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Xy,
    Range,
    Ohlc,
}

impl SeriesKind {
    #[must_use]
    pub fn value_shape(self) -> ValueShape {
        match self {
            Self::RangeArea | Self::RangeColumn | Self::Hilo => ValueShape::Range,
            Self::Candle => ValueShape::Ohlc,
            _ => ValueShape::Xy,
        }
    }

    /// Series drawn as rectangles that share category slots side by side.
    #[must_use]
    pub fn is_rect(self) -> bool {
        matches!(
            self,
            Self::Column
                | Self::Bar
                | Self::Histogram
                | Self::RangeColumn
                | Self::StackingColumn
                | Self::StackingColumn100
                | Self::StackingBar
                | Self::StackingBar100
                | Self::Candle
                | Self::Hilo
        )
    }

    /// Bar kinds swap the axes: categories run vertically.
    #[must_use]
    pub fn is_bar_family(self) -> bool {
        matches!(self, Self::Bar | Self::StackingBar | Self::StackingBar100)
    }

    /// Kinds whose value axis should leave room below the shortest bar.
    #[must_use]
    pub fn widens_value_axis(self) -> bool {
        matches!(
            self,
            Self::Column
                | Self::Bar
                | Self::StackingColumn
                | Self::StackingColumn100
                | Self::StackingBar
                | Self::StackingBar100
        )
    }

    #[must_use]
    pub fn is_stacking(self) -> bool {
        matches!(
            self,
            Self::StackingLine
                | Self::StackingLine100
                | Self::StackingArea
                | Self::StackingArea100
                | Self::StackingColumn
                | Self::StackingColumn100
                | Self::StackingBar
                | Self::StackingBar100
        )
    }

    #[must_use]
    pub fn is_stacking_100(self) -> bool {
        matches!(
            self,
            Self::StackingLine100
                | Self::StackingArea100
                | Self::StackingColumn100
                | Self::StackingBar100
        )
    }

    /// Default column width ratio when the series does not set one.
    #[must_use]
    pub fn default_column_width(self) -> f64 {
        match self {
            Self::Histogram => 1.0,
            _ => 0.7,
        }
    }
}

/// Values carried by one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointValue {
    Xy {
        y: Option<f64>,
    },
    Range {
        high: Option<f64>,
        low: Option<f64>,
    },
    Ohlc {
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
    },
}

impl PointValue {
    #[must_use]
    pub fn shape(self) -> ValueShape {
        match self {
            Self::Xy { .. } => ValueShape::Xy,
            Self::Range { .. } => ValueShape::Range,
            Self::Ohlc { .. } => ValueShape::Ohlc,
        }
    }
}

/// One data point as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(default)]
    pub x: Option<f64>,
    /// Category name; resolved to an index on category axes.
    #[serde(default)]
    pub category: Option<String>,
    pub value: PointValue,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

impl SeriesPoint {
    #[must_use]
    pub fn xy(x: f64, y: f64) -> Self {
        Self::with_value(Some(x), PointValue::Xy { y: Some(y) })
    }

    /// Point with a missing y value (an empty point).
    #[must_use]
    pub fn empty(x: f64) -> Self {
        Self::with_value(Some(x), PointValue::Xy { y: None })
    }

    #[must_use]
    pub fn range(x: f64, high: f64, low: f64) -> Self {
        Self::with_value(
            Some(x),
            PointValue::Range {
                high: Some(high),
                low: Some(low),
            },
        )
    }

    #[must_use]
    pub fn ohlc(x: f64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self::with_value(
            Some(x),
            PointValue::Ohlc {
                open: Some(open),
                high: Some(high),
                low: Some(low),
                close: Some(close),
            },
        )
    }

    /// Category point; `x` is assigned when the category axis is resolved.
    #[must_use]
    pub fn category(name: impl Into<String>, y: f64) -> Self {
        let mut point = Self::with_value(None, PointValue::Xy { y: Some(y) });
        point.category = Some(name.into());
        point
    }

    #[must_use]
    pub fn with_value(x: Option<f64>, value: PointValue) -> Self {
        Self {
            x,
            category: None,
            value,
            color: None,
            visible: true,
        }
    }

    /// Builds an XY point from strongly-typed temporal/decimal input.
    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> ChartResult<Self> {
        Ok(Self::xy(
            datetime_to_unix_seconds(time),
            decimal_to_f64(value, "value")?,
        ))
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Treatment of points with missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmptyPointMode {
    /// Break the path at the point.
    #[default]
    Gap,
    /// Use zero as the value.
    Zero,
    /// Use the mean of the neighbouring values.
    Average,
    /// Skip the point and keep the path going.
    Drop,
}

/// Where the riser of a step line sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepPosition {
    #[default]
    Left,
    Right,
    Center,
}

/// Corner radii of column rectangles, named for a positive column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadius {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
}

impl CornerRadius {
    #[must_use]
    pub const fn uniform(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_left: radius,
            bottom_right: radius,
        }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.top_left == 0.0
            && self.top_right == 0.0
            && self.bottom_left == 0.0
            && self.bottom_right == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerShape {
    #[default]
    Circle,
    Rectangle,
    Triangle,
    InvertedTriangle,
    Diamond,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerSettings {
    pub visible: bool,
    pub shape: MarkerShape,
    pub width: f64,
    pub height: f64,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            visible: false,
            shape: MarkerShape::Circle,
            width: 5.0,
            height: 5.0,
        }
    }
}

/// Where a data label sits relative to its point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataLabelPosition {
    #[default]
    Above,
    Below,
    Center,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataLabelSettings {
    pub visible: bool,
    #[serde(default)]
    pub position: DataLabelPosition,
    /// `n<d>`, `p<d>` or `{value}` format of the label text.
    #[serde(default)]
    pub format: Option<String>,
}

/// Orientation of error bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorBarMode {
    #[default]
    Vertical,
    Horizontal,
    Both,
}

/// Which side(s) of the value an error bar extends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorBarDirection {
    #[default]
    Both,
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ErrorAmount {
    Fixed(f64),
    /// Percentage of the point value.
    Percentage(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBarSettings {
    pub mode: ErrorBarMode,
    pub direction: ErrorBarDirection,
    pub vertical: ErrorAmount,
    pub horizontal: ErrorAmount,
    pub cap_length_px: f64,
}

impl Default for ErrorBarSettings {
    fn default() -> Self {
        Self {
            mode: ErrorBarMode::Vertical,
            direction: ErrorBarDirection::Both,
            vertical: ErrorAmount::Fixed(1.0),
            horizontal: ErrorAmount::Fixed(1.0),
            cap_length_px: 10.0,
        }
    }
}

impl ErrorBarSettings {
    /// Minus/plus offsets of `value` for the given amount and direction.
    #[must_use]
    pub fn offsets(self, amount: ErrorAmount, value: f64) -> (f64, f64) {
        let magnitude = match amount {
            ErrorAmount::Fixed(fixed) => fixed.abs(),
            ErrorAmount::Percentage(percent) => (value * percent / 100.0).abs(),
        };
        match self.direction {
            ErrorBarDirection::Both => (magnitude, magnitude),
            ErrorBarDirection::Plus => (0.0, magnitude),
            ErrorBarDirection::Minus => (magnitude, 0.0),
        }
    }

    #[must_use]
    pub fn has_vertical(self) -> bool {
        matches!(self.mode, ErrorBarMode::Vertical | ErrorBarMode::Both)
    }

    #[must_use]
    pub fn has_horizontal(self) -> bool {
        matches!(self.mode, ErrorBarMode::Horizontal | ErrorBarMode::Both)
    }
}

/// Visual and layout options of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub fill: Color,
    #[serde(default)]
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    #[serde(default)]
    pub dash_array: Option<String>,
    pub opacity: f64,
    /// Fraction of the category slot used by columns; `None` uses the kind default.
    #[serde(default)]
    pub column_width: Option<f64>,
    #[serde(default)]
    pub column_spacing: f64,
    #[serde(default)]
    pub corner_radius: CornerRadius,
    #[serde(default)]
    pub step_position: StepPosition,
    #[serde(default)]
    pub empty_point_mode: EmptyPointMode,
    #[serde(default)]
    pub stacking_group: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    pub bull_color: Color,
    pub bear_color: Color,
    #[serde(default)]
    pub enable_solid_candles: bool,
    #[serde(default)]
    pub marker: MarkerSettings,
    #[serde(default)]
    pub error_bar: ErrorBarSettings,
    #[serde(default)]
    pub data_label: DataLabelSettings,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            fill: Color::rgb(0.0, 0.44, 0.8),
            stroke: None,
            stroke_width: 1.0,
            dash_array: None,
            opacity: 1.0,
            column_width: None,
            column_spacing: 0.0,
            corner_radius: CornerRadius::default(),
            step_position: StepPosition::Left,
            empty_point_mode: EmptyPointMode::Gap,
            stacking_group: None,
            group_name: None,
            bull_color: Color::rgb(0.16, 0.66, 0.36),
            bear_color: Color::rgb(0.86, 0.22, 0.2),
            enable_solid_candles: false,
            marker: MarkerSettings::default(),
            error_bar: ErrorBarSettings::default(),
            data_label: DataLabelSettings::default(),
        }
    }
}

impl SeriesStyle {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "series stroke width must be finite and >= 0".to_owned(),
            ));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(ChartError::InvalidData(
                "series opacity must be finite and in [0, 1]".to_owned(),
            ));
        }
        if let Some(width) = self.column_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(ChartError::InvalidData(
                    "column width must be finite and > 0".to_owned(),
                ));
            }
        }
        if !self.column_spacing.is_finite() || !(0.0..=1.0).contains(&self.column_spacing) {
            return Err(ChartError::InvalidData(
                "column spacing must be finite and in [0, 1]".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// A data series bound to an x/y axis pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub kind: SeriesKind,
    pub points: Vec<SeriesPoint>,
    /// Horizontal-role axis name; `None` binds to the primary x axis.
    #[serde(default)]
    pub x_axis: Option<String>,
    /// Value axis name; `None` binds to the primary y axis.
    #[serde(default)]
    pub y_axis: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub style: SeriesStyle,
}

impl Series {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: SeriesKind, points: Vec<SeriesPoint>) -> Self {
        Self {
            id: id.into(),
            kind,
            points,
            x_axis: None,
            y_axis: None,
            visible: true,
            style: SeriesStyle::default(),
        }
    }

    #[must_use]
    pub fn with_axes(mut self, x_axis: impl Into<String>, y_axis: impl Into<String>) -> Self {
        self.x_axis = Some(x_axis.into());
        self.y_axis = Some(y_axis.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_empty_point_mode(mut self, mode: EmptyPointMode) -> Self {
        self.style.empty_point_mode = mode;
        self
    }

    #[must_use]
    pub fn with_stacking_group(mut self, group: impl Into<String>) -> Self {
        self.style.stacking_group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_column_width(mut self, width: f64) -> Self {
        self.style.column_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_column_spacing(mut self, spacing: f64) -> Self {
        self.style.column_spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_corner_radius(mut self, radius: CornerRadius) -> Self {
        self.style.corner_radius = radius;
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: MarkerSettings) -> Self {
        self.style.marker = marker;
        self
    }

    #[must_use]
    pub fn with_data_label(mut self, data_label: DataLabelSettings) -> Self {
        self.style.data_label = data_label;
        self
    }

    /// Effective column width ratio, capped at a full slot.
    #[must_use]
    pub fn column_width_ratio(&self) -> f64 {
        self.style
            .column_width
            .filter(|width| width.is_finite() && *width > 0.0)
            .unwrap_or_else(|| self.kind.default_column_width())
            .min(1.0)
    }
}

/// A point after empty-point resolution, ready for geometry.
///
/// XY values are mirrored into every field so builders can read `y` or the
/// `high`/`low` envelope without matching on the value shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedPoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub close: f64,
    pub visible: bool,
    pub color: Option<Color>,
}

impl PreparedPoint {
    fn hidden(index: usize, x: f64, color: Option<Color>) -> Self {
        Self {
            index,
            x,
            y: f64::NAN,
            high: f64::NAN,
            low: f64::NAN,
            open: f64::NAN,
            close: f64::NAN,
            visible: false,
            color,
        }
    }
}

/// Resolves raw points into `PreparedPoint`s honouring the empty-point mode.
///
/// Points whose x is missing, whose value shape does not match the series
/// kind, or whose required values are missing are empty points. `Zero` and
/// `Average` substitute values; `Gap` and `Drop` leave them hidden.
#[must_use]
pub fn prepare_points(series: &Series) -> Vec<PreparedPoint> {
    let shape = series.kind.value_shape();
    let fields: Vec<Option<[f64; 4]>> = series
        .points
        .iter()
        .map(|point| raw_fields(point, shape))
        .collect();

    let mode = series.style.empty_point_mode;
    let mut prepared = Vec::with_capacity(series.points.len());
    for (index, point) in series.points.iter().enumerate() {
        let x = point.x.filter(|x| x.is_finite());
        let Some(x) = x else {
            prepared.push(PreparedPoint::hidden(index, f64::NAN, point.color));
            continue;
        };
        let values = match fields[index] {
            Some(values) => Some(values),
            None => match mode {
                EmptyPointMode::Zero => Some([0.0; 4]),
                EmptyPointMode::Average => Some(average_fields(&fields, index)),
                EmptyPointMode::Gap | EmptyPointMode::Drop => None,
            },
        };
        match values {
            Some([open, high, low, close]) => prepared.push(PreparedPoint {
                index,
                x,
                y: close,
                high,
                low,
                open,
                close,
                visible: true,
                color: point.color,
            }),
            None => prepared.push(PreparedPoint::hidden(index, x, point.color)),
        }
    }
    prepared
}

/// `[open, high, low, close]`, with XY values mirrored into all four.
fn raw_fields(point: &SeriesPoint, shape: ValueShape) -> Option<[f64; 4]> {
    if !point.visible || point.value.shape() != shape {
        return None;
    }
    let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
    match point.value {
        PointValue::Xy { y } => {
            let y = finite(y)?;
            Some([y, y, y, y])
        }
        PointValue::Range { high, low } => {
            let high = finite(high)?;
            let low = finite(low)?;
            Some([low, high.max(low), high.min(low), high])
        }
        PointValue::Ohlc {
            open,
            high,
            low,
            close,
        } => Some([finite(open)?, finite(high)?, finite(low)?, finite(close)?]),
    }
}

fn average_fields(fields: &[Option<[f64; 4]>], index: usize) -> [f64; 4] {
    let previous = index
        .checked_sub(1)
        .and_then(|i| fields[i])
        .unwrap_or([0.0; 4]);
    let next = fields.get(index + 1).copied().flatten().unwrap_or([0.0; 4]);
    let mut averaged = [0.0; 4];
    for (slot, (a, b)) in averaged.iter_mut().zip(previous.iter().zip(next.iter())) {
        *slot = (a + b) * 0.5;
    }
    averaged
}

/// Smallest positive gap between x values of the given series.
///
/// Falls back to `1.0` when no gap exists (single points, empty series).
#[must_use]
pub fn min_points_delta<'a, I>(series: I) -> f64
where
    I: IntoIterator<Item = &'a Series>,
{
    let mut min_delta = f64::MAX;
    for series in series {
        if !series.visible {
            continue;
        }
        let mut xs: Vec<f64> = series
            .points
            .iter()
            .filter_map(|point| point.x)
            .filter(|x| x.is_finite())
            .collect();
        xs.sort_by(f64::total_cmp);
        for pair in xs.windows(2) {
            let delta = pair[1] - pair[0];
            if delta > 0.0 {
                min_delta = min_delta.min(delta);
            }
        }
    }
    if min_delta == f64::MAX { 1.0 } else { min_delta }
}
