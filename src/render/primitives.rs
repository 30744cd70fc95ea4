use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
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

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` and `rgba(...)` strings.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if let Some(body) = trimmed
            .strip_prefix("rgba(")
            .or_else(|| trimmed.strip_prefix("rgb("))
        {
            return Self::parse_functional(body.strip_suffix(')')?);
        }
        None
    }

    /// Parses a color string, degrading to opaque white on malformed input.
    ///
    /// Configuration colors must never abort a render pass.
    #[must_use]
    pub fn parse_lossy(input: &str) -> Self {
        Self::parse(input).unwrap_or(Self::WHITE)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let channel = |byte: u8| f64::from(byte) / 255.0;
        match hex.len() {
            3 => {
                let mut values = [0.0; 3];
                for (slot, ch) in values.iter_mut().zip(hex.chars()) {
                    let nibble = ch.to_digit(16)? as u8;
                    *slot = channel(nibble << 4 | nibble);
                }
                Some(Self::rgb(values[0], values[1], values[2]))
            }
            6 | 8 => {
                let mut values = [1.0; 4];
                for (index, slot) in values.iter_mut().enumerate().take(hex.len() / 2) {
                    let byte = u8::from_str_radix(hex.get(index * 2..index * 2 + 2)?, 16).ok()?;
                    *slot = channel(byte);
                }
                Some(Self::rgba(values[0], values[1], values[2], values[3]))
            }
            _ => None,
        }
    }

    fn parse_functional(body: &str) -> Option<Self> {
        let mut parts = body.split(',').map(str::trim);
        let red = parts.next()?.parse::<f64>().ok()? / 255.0;
        let green = parts.next()?.parse::<f64>().ok()? / 255.0;
        let blue = parts.next()?.parse::<f64>().ok()? / 255.0;
        let alpha = match parts.next() {
            Some(raw) => raw.parse::<f64>().ok()?,
            None => 1.0,
        };
        if parts.next().is_some() {
            return None;
        }
        let color = Self::rgba(red, green, blue, alpha);
        color.validate().ok()?;
        Some(color)
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
}

/// Compositing slot: `zlevel` selects the canvas layer, `z` orders within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub zlevel: i32,
    pub z: i32,
}

impl Placement {
    #[must_use]
    pub const fn new(zlevel: i32, z: i32) -> Self {
        Self { zlevel, z }
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub dash: Option<SmallVec<[f64; 4]>>,
    pub placement: Placement,
}

impl LinePrimitive {
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            dash: None,
            placement: Placement::default(),
        }
    }

    #[must_use]
    pub fn with_dash(mut self, pattern: &[f64]) -> Self {
        self.dash = Some(SmallVec::from_slice(pattern));
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
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
        if let Some(dash) = &self.dash {
            if dash.iter().any(|gap| !gap.is_finite() || *gap < 0.0) {
                return Err(ChartError::InvalidData(
                    "line dash pattern must be finite and >= 0".to_owned(),
                ));
            }
        }
        self.color.validate()
    }
}

/// Draw command for one axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub placement: Placement,
}

impl RectPrimitive {
    #[must_use]
    pub fn filled(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
            placement: Placement::default(),
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Color, stroke_width: f64) -> Self {
        self.stroke = Some(stroke);
        self.stroke_width = stroke_width;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(ChartError::InvalidData(
                "rect geometry must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect dimensions must be >= 0".to_owned(),
            ));
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
            if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
                return Err(ChartError::InvalidData(
                    "rect stroke width must be finite and > 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub placement: Placement,
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
            placement: Placement::default(),
        }
    }

    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text anchor must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "text font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one sample matrix stretched over a pixel rectangle.
///
/// Samples are raw data values; mapping them through a color ramp and into
/// raster pixels is the backend's job. `ramp` names the requested color map
/// and is passed through uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub cols: usize,
    pub rows: usize,
    pub samples: Vec<f64>,
    pub value_range: (f64, f64),
    pub ramp: String,
    pub placement: Placement,
}

impl ImagePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(ChartError::InvalidData(
                "image geometry must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "image dimensions must be >= 0".to_owned(),
            ));
        }
        if self.samples.len() != self.cols * self.rows {
            return Err(ChartError::InvalidData(format!(
                "image sample count {} does not match {}x{} matrix",
                self.samples.len(),
                self.cols,
                self.rows
            )));
        }
        if !self.value_range.0.is_finite() || !self.value_range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "image value range must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, LinePrimitive};

    #[test]
    fn color_parses_short_and_long_hex() {
        let white = Color::parse("#fff").expect("short hex");
        assert!((white.red - 1.0).abs() <= 1e-12);
        assert!((white.alpha - 1.0).abs() <= 1e-12);

        let gray = Color::parse("#333333").expect("long hex");
        assert!((gray.red - 0.2).abs() <= 1e-2);

        let translucent = Color::parse("#00000080").expect("hex with alpha");
        assert!((translucent.alpha - 128.0 / 255.0).abs() <= 1e-12);
    }

    #[test]
    fn color_parses_functional_rgba() {
        let color = Color::parse("rgba(50, 50, 50, 0.9)").expect("rgba");
        assert!((color.red - 50.0 / 255.0).abs() <= 1e-12);
        assert!((color.alpha - 0.9).abs() <= 1e-12);
    }

    #[test]
    fn malformed_color_degrades_to_white() {
        assert_eq!(Color::parse_lossy("not-a-color"), Color::WHITE);
        assert_eq!(Color::parse_lossy("#12"), Color::WHITE);
        assert_eq!(Color::parse_lossy("rgba(1,2)"), Color::WHITE);
    }

    #[test]
    fn line_validation_rejects_non_finite_endpoints() {
        let line = LinePrimitive::new(0.0, f64::NAN, 1.0, 1.0, 1.0, Color::WHITE);
        assert!(line.validate().is_err());
    }
}
