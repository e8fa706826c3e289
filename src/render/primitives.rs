use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::error::{PlotError, PlotResult};

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
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GRAY: Self = Self::rgb(0.827, 0.827, 0.827);

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

    /// Builds an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#rrggbb` or `#aarrggbb`.
    pub fn from_hex(hex: &str) -> PlotResult<Self> {
        let digits = hex.trim_start_matches('#');
        let parse = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|part| u8::from_str_radix(part, 16).ok())
                .map(|value| f64::from(value) / 255.0)
                .ok_or_else(|| PlotError::InvalidData(format!("invalid hex color `{hex}`")))
        };
        match digits.len() {
            6 => Ok(Self::rgb(parse(0..2)?, parse(2..4)?, parse(4..6)?)),
            8 => Ok(Self::rgba(parse(2..4)?, parse(4..6)?, parse(6..8)?, parse(0..2)?)),
            _ => Err(PlotError::InvalidData(format!(
                "invalid hex color `{hex}`"
            ))),
        }
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        self.alpha > 0.0
    }

    /// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn interpolate(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        Self::rgba(
            self.red + (other.red - self.red) * t,
            self.green + (other.green - self.green) * t,
            self.blue + (other.blue - self.blue) * t,
            self.alpha + (other.alpha - self.alpha) * t,
        )
    }

    pub fn validate(self) -> PlotResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PlotError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Predefined dash patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDashDot,
    LongDash,
    /// Nothing is drawn.
    None,
}

impl LineStyle {
    /// Styles cycled through when the default color palette wraps.
    pub const PREDEFINED: [Self; 6] = [
        Self::Solid,
        Self::Dash,
        Self::Dot,
        Self::DashDot,
        Self::DashDashDot,
        Self::LongDash,
    ];

    /// Dash/gap lengths in units of the stroke thickness.
    #[must_use]
    pub fn dash_array(self) -> Option<SmallVec<[f64; 6]>> {
        match self {
            Self::Solid | Self::None => None,
            Self::Dash => Some(smallvec![4.0, 4.0]),
            Self::Dot => Some(smallvec![1.0, 1.0]),
            Self::DashDot => Some(smallvec![4.0, 1.0, 1.0, 1.0]),
            Self::DashDashDot => Some(smallvec![4.0, 1.0, 4.0, 1.0, 1.0, 1.0]),
            Self::LongDash => Some(smallvec![10.0, 4.0]),
        }
    }
}

/// Stroke parameters for lines and outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub thickness: f64,
    /// Dash/gap lengths in pixels; `None` draws a solid stroke.
    pub dash_pattern: Option<SmallVec<[f64; 6]>>,
}

impl StrokeStyle {
    #[must_use]
    pub fn solid(color: Color, thickness: f64) -> Self {
        Self {
            color,
            thickness,
            dash_pattern: None,
        }
    }

    /// Builds a stroke whose dash pattern is scaled by `thickness`.
    #[must_use]
    pub fn styled(color: Color, thickness: f64, style: LineStyle) -> Self {
        Self {
            color,
            thickness,
            dash_pattern: style
                .dash_array()
                .map(|dashes| dashes.iter().map(|dash| dash * thickness).collect()),
        }
    }

    /// A stroke that draws nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::solid(Color::TRANSPARENT, 0.0)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.color.is_visible() && self.thickness > 0.0
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.thickness.is_finite() || self.thickness < 0.0 {
            return Err(PlotError::InvalidData(
                "stroke thickness must be finite and >= 0".to_owned(),
            ));
        }
        if let Some(dashes) = &self.dash_pattern {
            if dashes.iter().any(|dash| !dash.is_finite() || *dash < 0.0) {
                return Err(PlotError::InvalidData(
                    "dash pattern entries must be finite and >= 0".to_owned(),
                ));
            }
        }
        self.color.validate()
    }
}

/// Marker shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerType {
    #[default]
    None,
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    Plus,
    Star,
}

impl MarkerType {
    /// Shapes cycled by the default style assignment.
    pub const PREDEFINED: [Self; 5] = [
        Self::Circle,
        Self::Square,
        Self::Diamond,
        Self::Triangle,
        Self::Cross,
    ];
}

/// Marker appearance for one batch of points.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub marker_type: MarkerType,
    /// Half-extent of the marker in pixels.
    pub size: f64,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_thickness: f64,
}

impl MarkerStyle {
    #[must_use]
    pub fn new(marker_type: MarkerType, size: f64, fill: Color) -> Self {
        Self {
            marker_type,
            size,
            fill,
            stroke: Color::TRANSPARENT,
            stroke_thickness: 1.0,
        }
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(PlotError::InvalidData(
                "marker size must be finite and >= 0".to_owned(),
            ));
        }
        self.fill.validate()?;
        self.stroke.validate()
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextHAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextVAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Font and placement parameters for a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    /// Clockwise rotation in degrees around the anchor.
    pub rotation: f64,
}

impl TextStyle {
    #[must_use]
    pub fn new(font_size: f64, color: Color) -> Self {
        Self {
            font_size,
            color,
            h_align: TextHAlign::Left,
            v_align: TextVAlign::Top,
            rotation: 0.0,
        }
    }

    #[must_use]
    pub fn aligned(mut self, h_align: TextHAlign, v_align: TextVAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    #[must_use]
    pub fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(PlotError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        if !self.rotation.is_finite() {
            return Err(PlotError::InvalidData(
                "text rotation must be finite".to_owned(),
            ));
        }
        self.color.validate()
    }
}
