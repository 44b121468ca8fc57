use crate::error::ChartResult;
use crate::render::{ChartFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_series_count: usize,
    pub last_label_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &ChartFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_series_count = frame.series.len();
        self.last_label_count = frame.axes.iter().map(|axis| axis.labels.len()).sum();
        self.frames_rendered += 1;
        Ok(())
    }
}
