use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_days, decimal_to_f64};
use crate::error::PlotResult;

/// Size of the render surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Full surface as a rectangle anchored at the origin.
    #[must_use]
    pub fn rect(self) -> PlotRect {
        PlotRect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// A point in data space.
///
/// A point is "defined" when both coordinates are finite. Undefined points
/// break line continuity and never contribute to extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub const UNDEFINED: Self = Self {
        x: f64::NAN,
        y: f64::NAN,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_defined(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Builds a point from a UTC timestamp (x, in date-axis days) and a decimal value.
    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> PlotResult<Self> {
        Ok(Self {
            x: datetime_to_days(time),
            y: decimal_to_f64(value, "value")?,
        })
    }
}

/// A point in screen space (pixels, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const UNDEFINED: Self = Self {
        x: f64::NAN,
        y: f64::NAN,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_defined(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_to_squared(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.distance_to_squared(other).sqrt()
    }

    #[must_use]
    pub fn offset(self, vector: ScreenVector) -> Self {
        Self::new(self.x + vector.x, self.y + vector.y)
    }

    #[must_use]
    pub fn vector_to(self, other: Self) -> ScreenVector {
        ScreenVector::new(other.x - self.x, other.y - self.y)
    }
}

/// A displacement in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenVector {
    pub x: f64,
    pub y: f64,
}

impl ScreenVector {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds the rectangle spanned by two corners in any order.
    #[must_use]
    pub fn from_points(a: ScreenPoint, b: ScreenPoint) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center(self) -> ScreenPoint {
        ScreenPoint::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    #[must_use]
    pub fn top_left(self) -> ScreenPoint {
        ScreenPoint::new(self.left, self.top)
    }

    #[must_use]
    pub fn bottom_right(self) -> ScreenPoint {
        ScreenPoint::new(self.right(), self.bottom())
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    #[must_use]
    pub fn contains(self, point: ScreenPoint) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Shrinks the rectangle by `thickness`, never producing negative sizes.
    #[must_use]
    pub fn deflate(self, thickness: Thickness) -> Self {
        Self::new(
            self.left + thickness.left,
            self.top + thickness.top,
            (self.width - thickness.left - thickness.right).max(0.0),
            (self.height - thickness.top - thickness.bottom).max(0.0),
        )
    }

    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }
}

/// Per-side distances, used for padding and plot margins.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}
