//! Path morphing between geometry snapshots.
//!
//! The host owns the clock; everything here is a pure function of the two
//! snapshots and the elapsed time it passes in.

pub mod path_interpolation;
pub mod transition;

pub use path_interpolation::{interpolate, interpolate_geometry, interpolate_with, InterpolationTuning};
pub use transition::{AnimationTiming, Easing, PathTransition};
