use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::animation::PathTransition;
use crate::core::coordinate::{pixel_to_value, to_pixel};
use crate::core::{Axis, AxisLabelCallback, PixelPoint, PointGeometry, Series, SeriesPoint, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{ChartFrame, Renderer};

use super::layout::{find_axis, run_layout};
use super::{ChartEngineConfig, PointGeometryCache};

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns the configuration and series, runs layout passes and
/// hands finished frames to the renderer. Between passes it keeps the last
/// frame, the computed axes, the per-point geometry side table and the path
/// transitions from the previous frame to the current one.
pub struct ChartEngine<R: Renderer> {
    renderer: R,
    config: ChartEngineConfig,
    label_callback: Option<Box<dyn AxisLabelCallback>>,
    axes: Vec<Axis>,
    transposed: bool,
    geometry_cache: PointGeometryCache,
    last_frame: Option<ChartFrame>,
    transitions: IndexMap<String, PathTransition>,
    pending_removals: IndexMap<String, RemovalHint>,
}

/// Where a removed point sat in the previous frame's paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RemovalHint {
    run: usize,
    offset: usize,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            config,
            label_callback: None,
            axes: Vec::new(),
            transposed: false,
            geometry_cache: PointGeometryCache::new(),
            last_frame: None,
            transitions: IndexMap::new(),
            pending_removals: IndexMap::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    /// Replaces the whole configuration; the next pass animates from the
    /// last frame.
    pub fn set_config(&mut self, config: ChartEngineConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let mut next = self.config.clone();
        next.viewport = viewport;
        self.set_config(next)
    }

    pub fn set_label_callback(&mut self, callback: impl AxisLabelCallback + 'static) {
        self.label_callback = Some(Box::new(callback));
    }

    pub fn clear_label_callback(&mut self) {
        self.label_callback = None;
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.config.series
    }

    pub fn set_series(&mut self, series: Vec<Series>) -> ChartResult<()> {
        let mut next = self.config.clone();
        next.series = series;
        self.set_config(next)
    }

    pub fn add_series(&mut self, series: Series) -> ChartResult<()> {
        let mut next = self.config.clone();
        next.series.push(series);
        self.set_config(next)
    }

    pub fn set_series_visible(&mut self, series_id: &str, visible: bool) -> ChartResult<()> {
        self.series_mut(series_id)?.visible = visible;
        Ok(())
    }

    pub fn append_point(&mut self, series_id: &str, point: SeriesPoint) -> ChartResult<()> {
        self.series_mut(series_id)?.points.push(point);
        Ok(())
    }

    /// Removes a point; the next pass shrinks the removed vertex into its
    /// neighbours instead of sliding every later vertex.
    ///
    /// The hint only reaches the path run that drew the point in the last
    /// frame. Points that were not drawn get no hint.
    pub fn remove_point(&mut self, series_id: &str, index: usize) -> ChartResult<SeriesPoint> {
        let series = self.series_mut(series_id)?;
        if index >= series.points.len() {
            return Err(ChartError::InvalidData(format!(
                "series `{series_id}` has no point {index}"
            )));
        }
        let mode = series.style.empty_point_mode;
        let removed = series.points.remove(index);
        match self.geometry_cache.run_position(series_id, index, mode) {
            Some((run, offset)) => {
                self.pending_removals
                    .insert(series_id.to_owned(), RemovalHint { run, offset });
            }
            None => {
                self.pending_removals.shift_remove(series_id);
            }
        }
        Ok(removed)
    }

    fn series_mut(&mut self, series_id: &str) -> ChartResult<&mut Series> {
        self.config
            .series
            .iter_mut()
            .find(|series| series.id == series_id)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown series `{series_id}`")))
    }

    /// Runs one layout pass and keeps its results.
    ///
    /// Path render options whose id also existed in the previous frame get a
    /// `PathTransition` from the old path to the new one.
    pub fn layout(&mut self) -> ChartResult<&ChartFrame> {
        let pass = run_layout(&self.config, self.label_callback.as_deref())?;

        let mut transitions = IndexMap::new();
        if let Some(previous) = &self.last_frame {
            for options in &pass.frame.series {
                let (Some(end), Some(start)) = (
                    options.as_path(),
                    previous.series_options(&options.id).and_then(|old| old.as_path()),
                ) else {
                    continue;
                };
                if start == end {
                    continue;
                }
                let mut transition = PathTransition::new(start.clone(), end.clone())
                    .with_tuning(self.config.interpolation_tuning);
                if let Some(index) = self.removal_for(&options.id) {
                    transition = transition.with_removed_point_index(index);
                }
                transitions.insert(options.id.clone(), transition);
            }
        }
        self.pending_removals.clear();

        self.geometry_cache.clear();
        for geometry in &pass.geometries {
            self.geometry_cache.insert(geometry);
        }
        debug!(transitions = transitions.len(), "engine layout stored");
        self.transitions = transitions;
        self.axes = pass.axes;
        self.transposed = pass.transposed;
        Ok(self.last_frame.insert(pass.frame))
    }

    /// Pending removal hint for a path option `{series}_line_{run}` or
    /// `{series}_area_{run}`.
    fn removal_for(&self, option_id: &str) -> Option<usize> {
        self.pending_removals.iter().find_map(|(series_id, hint)| {
            let rest = option_id.strip_prefix(series_id.as_str())?.strip_prefix('_')?;
            let run = rest
                .strip_prefix("line_")
                .or_else(|| rest.strip_prefix("area_"))?
                .parse::<usize>()
                .ok()?;
            (run == hint.run).then_some(hint.offset)
        })
    }

    pub fn render(&mut self) -> ChartResult<()> {
        self.layout()?;
        let Some(frame) = self.last_frame.as_ref() else {
            return Ok(());
        };
        trace!(series = frame.series.len(), "rendering frame");
        self.renderer.render(frame)
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&ChartFrame> {
        self.last_frame.as_ref()
    }

    /// Axes of the last layout pass; empty before the first pass.
    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    #[must_use]
    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.name() == name)
    }

    #[must_use]
    pub fn geometry_cache(&self) -> &PointGeometryCache {
        &self.geometry_cache
    }

    #[must_use]
    pub fn transitions(&self) -> &IndexMap<String, PathTransition> {
        &self.transitions
    }

    /// Plot-relative pixel of a data pair on the named axes.
    pub fn data_to_pixel(&self, x_axis: &str, y_axis: &str, x: f64, y: f64) -> ChartResult<PixelPoint> {
        let (x_axis, y_axis) = self.laid_out_axes(x_axis, y_axis)?;
        Ok(to_pixel(x, y, x_axis, y_axis, self.transposed))
    }

    /// Data pair under a plot-relative pixel on the named axes.
    pub fn pixel_to_data(&self, x_axis: &str, y_axis: &str, pixel: PixelPoint) -> ChartResult<(f64, f64)> {
        let (x_axis, y_axis) = self.laid_out_axes(x_axis, y_axis)?;
        Ok(pixel_to_value(pixel, x_axis, y_axis, self.transposed))
    }

    /// Point under a plot-relative pixel, topmost series first.
    #[must_use]
    pub fn hit_test(&self, pixel: PixelPoint) -> Option<(&str, &PointGeometry)> {
        self.geometry_cache.hit_test(pixel)
    }

    fn laid_out_axes(&self, x_axis: &str, y_axis: &str) -> ChartResult<(&Axis, &Axis)> {
        if self.axes.is_empty() {
            return Err(ChartError::InvalidData(
                "no layout pass has run yet".to_owned(),
            ));
        }
        Ok((find_axis(&self.axes, x_axis)?, find_axis(&self.axes, y_axis)?))
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
