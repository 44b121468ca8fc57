use serde::{Deserialize, Serialize};

use crate::core::types::{PixelPoint, PlotRect};
use crate::error::{ChartError, ChartResult};
use crate::render::path::PathGeometry;

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// `#rrggbb` notation; alpha is carried separately as opacity.
    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }
}

/// Dash pattern in pixels, alternating dash and gap lengths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashPattern(pub Vec<f64>);

impl DashPattern {
    /// Parses `"5,3"` / `"5 3"` style dash arrays; unparsable entries are skipped.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self(
            input
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .filter_map(|token| token.parse::<f64>().ok())
                .filter(|value| value.is_finite() && *value >= 0.0)
                .collect(),
        )
    }

    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.0.iter().all(|value| *value == 0.0)
    }
}

/// Geometry payload of a render option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderShape {
    Path(PathGeometry),
    Rect(PlotRect),
}

/// One drawable element produced by the geometry layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub id: String,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    #[serde(default)]
    pub dash: DashPattern,
    pub opacity: f64,
    pub shape: RenderShape,
}

impl RenderOptions {
    #[must_use]
    pub fn path(id: impl Into<String>, path: PathGeometry) -> Self {
        Self::with_shape(id, RenderShape::Path(path))
    }

    #[must_use]
    pub fn rect(id: impl Into<String>, rect: PlotRect) -> Self {
        Self::with_shape(id, RenderShape::Rect(rect))
    }

    fn with_shape(id: impl Into<String>, shape: RenderShape) -> Self {
        Self {
            id: id.into(),
            fill: Color::TRANSPARENT,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            dash: DashPattern::default(),
            opacity: 1.0,
            shape,
        }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Color, width: f64) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    #[must_use]
    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = dash;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&PathGeometry> {
        match &self.shape {
            RenderShape::Path(path) => Some(path),
            RenderShape::Rect(_) => None,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "render option `{}` stroke width must be finite and >= 0",
                self.id
            )));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(ChartError::InvalidData(format!(
                "render option `{}` opacity must be in [0, 1]",
                self.id
            )));
        }
        match &self.shape {
            RenderShape::Rect(rect) if !rect.is_finite() => {
                return Err(ChartError::InvalidData(format!(
                    "render option `{}` rect must be finite",
                    self.id
                )));
            }
            RenderShape::Path(path) if !path.is_finite() => {
                return Err(ChartError::InvalidData(format!(
                    "render option `{}` path must be finite",
                    self.id
                )));
            }
            _ => {}
        }
        self.fill.validate()?;
        self.stroke.validate()
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub from: PixelPoint,
    pub to: PixelPoint,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(from: PixelPoint, to: PixelPoint, stroke_width: f64, color: Color) -> Self {
        Self {
            from,
            to,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.from.x.is_finite()
            || !self.from.y.is_finite()
            || !self.to.x.is_finite()
            || !self.to.y.is_finite()
        {
            return Err(ChartError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
