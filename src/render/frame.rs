use serde::{Deserialize, Serialize};

use crate::core::cross_axis::AxisCrossing;
use crate::core::double_range::AxisRange;
use crate::core::types::{Orientation, PlotRect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RenderOptions, TextPrimitive};

/// Renderable state of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisFrame {
    pub name: String,
    pub orientation: Orientation,
    /// Final draw rect: the crossed rect when the axis crosses another axis.
    pub rect: PlotRect,
    pub visible_range: AxisRange,
    pub line: LinePrimitive,
    pub labels: Vec<TextPrimitive>,
    pub crossing: Option<AxisCrossing>,
}

/// Backend-agnostic scene for one chart layout pass.
///
/// Axis lines, axis labels and data labels are in chart coordinates. Series
/// and marker geometry is plot-relative; backends translate it by
/// `plot_rect`'s origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub viewport: Viewport,
    pub plot_rect: PlotRect,
    pub axes: Vec<AxisFrame>,
    pub series: Vec<RenderOptions>,
    pub markers: Vec<RenderOptions>,
    pub data_labels: Vec<TextPrimitive>,
}

impl ChartFrame {
    #[must_use]
    pub fn new(viewport: Viewport, plot_rect: PlotRect) -> Self {
        Self {
            viewport,
            plot_rect,
            axes: Vec::new(),
            series: Vec::new(),
            markers: Vec::new(),
            data_labels: Vec::new(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for axis in &self.axes {
            axis.line.validate()?;
            for label in &axis.labels {
                label.validate()?;
            }
        }
        for options in self.series.iter().chain(self.markers.iter()) {
            options.validate()?;
        }
        for label in &self.data_labels {
            label.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
            && self.series.is_empty()
            && self.markers.is_empty()
            && self.data_labels.is_empty()
    }

    /// Render option by id.
    #[must_use]
    pub fn series_options(&self, id: &str) -> Option<&RenderOptions> {
        self.series.iter().find(|options| options.id == id)
    }
}
