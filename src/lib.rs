//! chart-geometry: axis ranges, coordinate mapping, series geometry and path
//! interpolation for charting frontends.
//!
//! The crate computes everything a chart needs up to, but not including,
//! drawing: nice axis ranges and labels, value to pixel mapping, per-series
//! path and rectangle geometry, markers, data labels and animated path
//! morphing. Drawing is delegated to a [`render::Renderer`].

pub mod animation;
pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
