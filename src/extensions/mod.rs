//! Decorations layered on top of series geometry.
//!
//! Extensions only read `SeriesGeometry`; they never feed back into range
//! or geometry computation.

pub mod data_labels;
pub mod markers;

pub use data_labels::{place_data_labels, DataLabelConfig, PlacedDataLabel};
pub use markers::{build_markers, marker_path};
