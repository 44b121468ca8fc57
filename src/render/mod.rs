mod frame;
mod null_renderer;
pub mod path;
mod primitives;

pub use frame::{AxisFrame, ChartFrame};
pub use null_renderer::NullRenderer;
pub use path::{PathCommand, PathGeometry, PathVerb};
pub use primitives::{
    Color, DashPattern, LinePrimitive, RenderOptions, RenderShape, TextHAlign, TextPrimitive,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `ChartFrame` so
/// drawing code remains isolated from axis and series logic.
pub trait Renderer {
    fn render(&mut self, frame: &ChartFrame) -> ChartResult<()>;
}
