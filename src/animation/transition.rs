use serde::{Deserialize, Serialize};

use crate::animation::path_interpolation::{interpolate_geometry, InterpolationTuning};
use crate::error::{ChartError, ChartResult};
use crate::render::PathGeometry;

/// Progress curve applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Maps normalized time in `[0, 1]` to progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
        }
    }
}

/// Delay and duration of a transition, in host-supplied milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationTiming {
    pub delay_ms: f64,
    pub duration_ms: f64,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms: 1_000.0,
        }
    }
}

impl AnimationTiming {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.delay_ms.is_finite() || self.delay_ms < 0.0 {
            return Err(ChartError::InvalidData(
                "animation delay must be finite and >= 0".to_owned(),
            ));
        }
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(ChartError::InvalidData(
                "animation duration must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Normalized time at `elapsed_ms`; a zero duration jumps straight to 1
    /// once the delay has passed.
    #[must_use]
    pub fn progress_at(self, elapsed_ms: f64) -> f64 {
        if elapsed_ms.is_nan() {
            return 0.0;
        }
        let running = elapsed_ms - self.delay_ms;
        if running < 0.0 {
            0.0
        } else if self.duration_ms <= 0.0 {
            1.0
        } else {
            (running / self.duration_ms).min(1.0)
        }
    }
}

/// Explicit state of one path morph; sampling never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTransition {
    pub start: PathGeometry,
    pub end: PathGeometry,
    #[serde(default)]
    pub removed_point_index: Option<usize>,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub timing: AnimationTiming,
    #[serde(default)]
    pub tuning: InterpolationTuning,
}

impl PathTransition {
    #[must_use]
    pub fn new(start: PathGeometry, end: PathGeometry) -> Self {
        Self {
            start,
            end,
            removed_point_index: None,
            easing: Easing::Linear,
            timing: AnimationTiming::default(),
            tuning: InterpolationTuning::default(),
        }
    }

    /// Parses both snapshots from SVG path data.
    pub fn from_svg(start: &str, end: &str) -> ChartResult<Self> {
        Ok(Self::new(PathGeometry::parse(start)?, PathGeometry::parse(end)?))
    }

    #[must_use]
    pub fn with_removed_point_index(mut self, index: usize) -> Self {
        self.removed_point_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: AnimationTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: InterpolationTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Geometry at normalized time `t`, eased.
    #[must_use]
    pub fn sample(&self, t: f64) -> PathGeometry {
        interpolate_geometry(
            &self.start,
            &self.end,
            self.easing.apply(t),
            self.removed_point_index,
            self.tuning,
        )
    }

    /// Geometry `elapsed_ms` after the transition was started.
    #[must_use]
    pub fn sample_at(&self, elapsed_ms: f64) -> PathGeometry {
        self.sample(self.timing.progress_at(elapsed_ms))
    }

    #[must_use]
    pub fn is_complete(&self, elapsed_ms: f64) -> bool {
        self.timing.progress_at(elapsed_ms) >= 1.0
    }
}
