use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::animation::InterpolationTuning;
use crate::core::{AxisConfig, PlotRect, RangeTuning, Series, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::extensions::DataLabelConfig;

/// Space reserved around the plot area for axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartMargins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for ChartMargins {
    fn default() -> Self {
        Self {
            left: 56.0,
            top: 16.0,
            right: 16.0,
            bottom: 40.0,
        }
    }
}

impl ChartMargins {
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.left, "left"),
            (self.top, "top"),
            (self.right, "right"),
            (self.bottom, "bottom"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "chart margin `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format. Every field except the viewport
/// has a default, so `{"viewport": {"width": 640, "height": 480}}` is a valid
/// (empty) chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub margins: ChartMargins,
    #[serde(default = "default_axes")]
    pub axes: Vec<AxisConfig>,
    #[serde(default = "default_primary_x_axis")]
    pub primary_x_axis: String,
    #[serde(default = "default_primary_y_axis")]
    pub primary_y_axis: String,
    /// Swaps the roles of horizontal and vertical axes.
    #[serde(default)]
    pub transposed: bool,
    #[serde(default)]
    pub range_tuning: RangeTuning,
    #[serde(default)]
    pub interpolation_tuning: InterpolationTuning,
    #[serde(default)]
    pub data_labels: DataLabelConfig,
    #[serde(default)]
    pub series: Vec<Series>,
}

fn default_primary_x_axis() -> String {
    "primaryXAxis".to_owned()
}

fn default_primary_y_axis() -> String {
    "primaryYAxis".to_owned()
}

fn default_axes() -> Vec<AxisConfig> {
    vec![
        AxisConfig::horizontal(default_primary_x_axis()),
        AxisConfig::vertical(default_primary_y_axis()),
    ]
}

impl ChartEngineConfig {
    /// Creates a config with one primary x and one primary y axis and no series.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: ChartMargins::default(),
            axes: default_axes(),
            primary_x_axis: default_primary_x_axis(),
            primary_y_axis: default_primary_y_axis(),
            transposed: false,
            range_tuning: RangeTuning::default(),
            interpolation_tuning: InterpolationTuning::default(),
            data_labels: DataLabelConfig::default(),
            series: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: ChartMargins) -> Self {
        self.margins = margins;
        self
    }

    /// Replaces the axis with the same name, or appends a new one.
    #[must_use]
    pub fn with_axis(mut self, axis: AxisConfig) -> Self {
        match self.axes.iter_mut().find(|existing| existing.name == axis.name) {
            Some(existing) => *existing = axis,
            None => self.axes.push(axis),
        }
        self
    }

    #[must_use]
    pub fn with_transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    /// Whether layout maps x values vertically.
    ///
    /// Bar series already run their categories vertically, so `transposed`
    /// on a bar chart turns it back into a column layout.
    #[must_use]
    pub fn swaps_axes(&self) -> bool {
        self.transposed ^ self.series.iter().any(|series| series.kind.is_bar_family())
    }

    #[must_use]
    pub fn with_range_tuning(mut self, tuning: RangeTuning) -> Self {
        self.range_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_interpolation_tuning(mut self, tuning: InterpolationTuning) -> Self {
        self.interpolation_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_data_labels(mut self, config: DataLabelConfig) -> Self {
        self.data_labels = config;
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Name of the x-role axis a series binds to.
    #[must_use]
    pub fn x_axis_name<'a>(&'a self, series: &'a Series) -> &'a str {
        series.x_axis.as_deref().unwrap_or(&self.primary_x_axis)
    }

    /// Name of the value axis a series binds to.
    #[must_use]
    pub fn y_axis_name<'a>(&'a self, series: &'a Series) -> &'a str {
        series.y_axis.as_deref().unwrap_or(&self.primary_y_axis)
    }

    /// Viewport minus margins.
    pub fn plot_rect(&self) -> ChartResult<PlotRect> {
        let margins = self.margins.validate()?;
        let viewport = self.viewport.rect();
        let rect = PlotRect::new(
            margins.left,
            margins.top,
            viewport.width - margins.left - margins.right,
            viewport.height - margins.top - margins.bottom,
        );
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "margins leave no plot area inside {}x{} viewport",
                self.viewport.width, self.viewport.height
            )));
        }
        Ok(rect)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.plot_rect()?;
        self.range_tuning.validate()?;
        self.interpolation_tuning.validate()?;
        self.data_labels.validate()?;

        let mut names = IndexSet::with_capacity(self.axes.len());
        for axis in &self.axes {
            axis.validate()?;
            if !names.insert(axis.name.as_str()) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate axis name `{}`",
                    axis.name
                )));
            }
        }
        for primary in [&self.primary_x_axis, &self.primary_y_axis] {
            if !names.contains(primary.as_str()) {
                return Err(ChartError::UnknownAxis(primary.clone()));
            }
        }

        let mut ids = IndexSet::with_capacity(self.series.len());
        for series in &self.series {
            if series.id.is_empty() {
                return Err(ChartError::InvalidData("series id must not be empty".to_owned()));
            }
            if !ids.insert(series.id.as_str()) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate series id `{}`",
                    series.id
                )));
            }
            series.style.validate()?;
            for name in [self.x_axis_name(series), self.y_axis_name(series)] {
                if !names.contains(name) {
                    return Err(ChartError::UnknownAxis(name.to_owned()));
                }
            }
            if self.x_axis_name(series) == self.y_axis_name(series) {
                return Err(ChartError::InvalidData(format!(
                    "series `{}` binds the same axis for x and y",
                    series.id
                )));
            }
        }
        Ok(())
    }
}
