use serde::{Deserialize, Serialize};

use crate::core::double_range::{AxisRange, DoubleRange};
use crate::core::types::{Orientation, PlotRect, Size};
use crate::error::{ChartError, ChartResult};

/// Kind of values an axis maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueType {
    #[default]
    Double,
    /// Unix seconds, labelled with calendar-aware intervals.
    DateTime,
    /// Zero-based category indices, labelled with category names.
    Category,
    /// Values mapped through `log_base`; ranges are kept in exponent space.
    Logarithmic,
}

/// Padding policy applied to the collected data range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangePadding {
    /// Resolved per axis role: `Normal` on value axes, `None` elsewhere.
    #[default]
    Auto,
    None,
    Normal,
    Additional,
    Round,
}

/// Where category labels sit relative to tick marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelPlacement {
    #[default]
    BetweenTicks,
    OnTicks,
}

/// How labels wider than `label_max_width` are fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelIntersectAction {
    #[default]
    None,
    Trim,
    Wrap,
    Hide,
}

/// Calendar unit used by datetime axis intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateTimeIntervalType {
    #[default]
    Auto,
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
}

/// Value at which an axis crosses its cross axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CrossValue {
    /// Raw value in the cross axis domain (unix seconds for datetime axes).
    Number(f64),
    /// Category name or RFC 3339 timestamp, resolved against the cross axis.
    Text(String),
}

/// User configuration for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub name: String,
    pub orientation: Orientation,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub interval: Option<f64>,
    #[serde(default)]
    pub range_padding: RangePadding,
    #[serde(default = "default_true")]
    pub start_from_zero: bool,
    #[serde(default = "default_log_base")]
    pub log_base: f64,
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    #[serde(default)]
    pub zoom_position: f64,
    #[serde(default = "default_true")]
    pub enable_auto_interval_on_zooming: bool,
    #[serde(default)]
    pub is_inversed: bool,
    #[serde(default)]
    pub opposed_position: bool,
    #[serde(default = "default_maximum_labels")]
    pub maximum_labels: f64,
    #[serde(default)]
    pub desired_intervals: Option<f64>,
    #[serde(default)]
    pub label_format: Option<String>,
    #[serde(default)]
    pub label_placement: LabelPlacement,
    #[serde(default)]
    pub label_intersect_action: LabelIntersectAction,
    #[serde(default)]
    pub label_max_width: Option<f64>,
    #[serde(default = "default_label_font_size")]
    pub label_font_size_px: f64,
    #[serde(default)]
    pub interval_type: DateTimeIntervalType,
    #[serde(default)]
    pub crosses_at: Option<CrossValue>,
    #[serde(default)]
    pub cross_axis: Option<String>,
    #[serde(default)]
    pub allow_cross_overlap: bool,
    /// Category points take their point index instead of one index per
    /// distinct category name.
    #[serde(default)]
    pub is_indexed: bool,
}

fn default_true() -> bool {
    true
}

fn default_log_base() -> f64 {
    10.0
}

fn default_zoom_factor() -> f64 {
    1.0
}

fn default_maximum_labels() -> f64 {
    3.0
}

fn default_label_font_size() -> f64 {
    12.0
}

impl AxisConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            orientation,
            value_type: ValueType::Double,
            minimum: None,
            maximum: None,
            interval: None,
            range_padding: RangePadding::Auto,
            start_from_zero: true,
            log_base: default_log_base(),
            zoom_factor: default_zoom_factor(),
            zoom_position: 0.0,
            enable_auto_interval_on_zooming: true,
            is_inversed: false,
            opposed_position: false,
            maximum_labels: default_maximum_labels(),
            desired_intervals: None,
            label_format: None,
            label_placement: LabelPlacement::BetweenTicks,
            label_intersect_action: LabelIntersectAction::None,
            label_max_width: None,
            label_font_size_px: default_label_font_size(),
            interval_type: DateTimeIntervalType::Auto,
            crosses_at: None,
            cross_axis: None,
            allow_cross_overlap: false,
            is_indexed: false,
        }
    }

    #[must_use]
    pub fn horizontal(name: impl Into<String>) -> Self {
        Self::new(name, Orientation::Horizontal)
    }

    #[must_use]
    pub fn vertical(name: impl Into<String>) -> Self {
        Self::new(name, Orientation::Vertical)
    }

    #[must_use]
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    #[must_use]
    pub fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = Some(interval);
        self
    }

    #[must_use]
    pub fn with_range_padding(mut self, padding: RangePadding) -> Self {
        self.range_padding = padding;
        self
    }

    #[must_use]
    pub fn with_start_from_zero(mut self, start_from_zero: bool) -> Self {
        self.start_from_zero = start_from_zero;
        self
    }

    #[must_use]
    pub fn with_log_base(mut self, log_base: f64) -> Self {
        self.log_base = log_base;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, factor: f64, position: f64) -> Self {
        self.zoom_factor = factor;
        self.zoom_position = position;
        self
    }

    #[must_use]
    pub fn with_inversed(mut self, is_inversed: bool) -> Self {
        self.is_inversed = is_inversed;
        self
    }

    #[must_use]
    pub fn with_opposed_position(mut self, opposed: bool) -> Self {
        self.opposed_position = opposed;
        self
    }

    #[must_use]
    pub fn with_desired_intervals(mut self, count: f64) -> Self {
        self.desired_intervals = Some(count);
        self
    }

    #[must_use]
    pub fn with_label_format(mut self, format: impl Into<String>) -> Self {
        self.label_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_label_placement(mut self, placement: LabelPlacement) -> Self {
        self.label_placement = placement;
        self
    }

    #[must_use]
    pub fn with_label_fit(mut self, action: LabelIntersectAction, max_width: f64) -> Self {
        self.label_intersect_action = action;
        self.label_max_width = Some(max_width);
        self
    }

    #[must_use]
    pub fn with_interval_type(mut self, interval_type: DateTimeIntervalType) -> Self {
        self.interval_type = interval_type;
        self
    }

    #[must_use]
    pub fn with_crossing(mut self, crosses_at: CrossValue, cross_axis: Option<String>) -> Self {
        self.crosses_at = Some(crosses_at);
        self.cross_axis = cross_axis;
        self
    }

    #[must_use]
    pub fn with_allow_cross_overlap(mut self, allow: bool) -> Self {
        self.allow_cross_overlap = allow;
        self
    }

    #[must_use]
    pub fn with_indexed(mut self, is_indexed: bool) -> Self {
        self.is_indexed = is_indexed;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.name.is_empty() {
            return Err(ChartError::InvalidData("axis name must not be empty".to_owned()));
        }
        if !self.log_base.is_finite() || self.log_base <= 1.0 {
            return Err(ChartError::InvalidData(format!(
                "axis `{}` log base must be finite and > 1",
                self.name
            )));
        }
        if !self.zoom_factor.is_finite() || self.zoom_factor <= 0.0 || self.zoom_factor > 1.0 {
            return Err(ChartError::InvalidData(format!(
                "axis `{}` zoom factor must be in (0, 1]",
                self.name
            )));
        }
        if !self.zoom_position.is_finite() || !(0.0..=1.0).contains(&self.zoom_position) {
            return Err(ChartError::InvalidData(format!(
                "axis `{}` zoom position must be in [0, 1]",
                self.name
            )));
        }
        if !self.maximum_labels.is_finite() || self.maximum_labels <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "axis `{}` maximum labels must be finite and > 0",
                self.name
            )));
        }
        if let Some(interval) = self.interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "axis `{}` interval must be finite and > 0",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Pixel length along the axis direction.
    #[must_use]
    pub fn length_in(&self, size: Size) -> f64 {
        match self.orientation {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }
}

/// One generated axis label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabel {
    /// Raw axis value (exponent for logarithmic axes, index for categories).
    pub value: f64,
    /// Display text before fitting.
    pub original_text: String,
    /// Display lines after trimming/wrapping.
    pub lines: Vec<String>,
    /// Estimated pixel size of `lines`.
    pub size: Size,
}

impl AxisLabel {
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// Fully computed axis for one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub config: AxisConfig,
    pub rect: PlotRect,
    pub double_range: DoubleRange,
    pub actual_range: AxisRange,
    pub visible_range: AxisRange,
    pub actual_interval_type: DateTimeIntervalType,
    pub is_stack100: bool,
    pub categories: Vec<String>,
    pub labels: Vec<AxisLabel>,
}

impl Axis {
    /// Creates an axis with the default `0..5` range, before any range pass.
    #[must_use]
    pub fn new(config: AxisConfig, rect: PlotRect) -> Self {
        Self {
            config,
            rect,
            double_range: DoubleRange::new(0.0, 5.0),
            actual_range: AxisRange::default(),
            visible_range: AxisRange::default(),
            actual_interval_type: DateTimeIntervalType::Auto,
            is_stack100: false,
            categories: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.config.value_type
    }

    #[must_use]
    pub fn is_inversed(&self) -> bool {
        self.config.is_inversed
    }

    #[must_use]
    pub fn log_base(&self) -> f64 {
        self.config.log_base
    }

    /// Pixel length along the axis direction.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self.config.orientation {
            Orientation::Horizontal => self.rect.width,
            Orientation::Vertical => self.rect.height,
        }
    }
}
