use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::axis::Axis;
use crate::core::types::{PlotRect, ScreenPoint, ScreenVector};
use crate::error::PlotResult;
use crate::render::clipping::clip_polyline;
use crate::render::{
    Color, LineStyle, RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign,
};
use crate::series::{AxisBinding, SeriesAxes};

/// Whether an annotation is drawn before or after the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnnotationLayer {
    BelowSeries,
    #[default]
    AboveSeries,
}

/// Decoration bound to a pair of axes by key.
pub trait Annotation: fmt::Debug {
    fn layer(&self) -> AnnotationLayer {
        AnnotationLayer::AboveSeries
    }

    fn axis_binding(&self) -> AxisBinding;

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()>;
}

/// Data interval `[low, high]` visible on `axis`, narrowed by optional
/// NaN-means-open bounds.
fn visible_interval(axis: &Axis, lower: f64, upper: f64) -> (f64, f64) {
    let mut low = axis.actual_minimum();
    let mut high = axis.actual_maximum();
    if lower.is_finite() {
        low = low.max(lower);
    }
    if upper.is_finite() {
        high = high.min(upper);
    }
    (low, high)
}

/// Geometry of a [`LineAnnotation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LineAnnotationType {
    /// `y = value` across the x-axis.
    Horizontal(f64),
    /// `x = value` across the y-axis.
    Vertical(f64),
    /// `y = slope * x + intercept`.
    LinearEquation { slope: f64, intercept: f64 },
}

/// Straight line in data space, clipped to the plot area.
#[derive(Debug, Clone, PartialEq)]
pub struct LineAnnotation {
    pub line_type: LineAnnotationType,
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    /// Open bounds (NaN) extend to the axis range.
    pub minimum_x: f64,
    pub maximum_x: f64,
    pub minimum_y: f64,
    pub maximum_y: f64,
    pub color: Color,
    pub thickness: f64,
    pub line_style: LineStyle,
    pub text: Option<String>,
    pub font_size: f64,
    pub layer: AnnotationLayer,
}

impl LineAnnotation {
    #[must_use]
    pub fn new(line_type: LineAnnotationType) -> Self {
        Self {
            line_type,
            x_axis_key: None,
            y_axis_key: None,
            minimum_x: f64::NAN,
            maximum_x: f64::NAN,
            minimum_y: f64::NAN,
            maximum_y: f64::NAN,
            color: Color::rgb(0.0, 0.0, 1.0),
            thickness: 1.0,
            line_style: LineStyle::Dash,
            text: None,
            font_size: 12.0,
            layer: AnnotationLayer::AboveSeries,
        }
    }

    #[must_use]
    pub fn horizontal(y: f64) -> Self {
        Self::new(LineAnnotationType::Horizontal(y))
    }

    #[must_use]
    pub fn vertical(x: f64) -> Self {
        Self::new(LineAnnotationType::Vertical(x))
    }

    #[must_use]
    pub fn linear_equation(slope: f64, intercept: f64) -> Self {
        Self::new(LineAnnotationType::LinearEquation { slope, intercept })
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, color: Color, thickness: f64, line_style: LineStyle) -> Self {
        self.color = color;
        self.thickness = thickness;
        self.line_style = line_style;
        self
    }

    #[must_use]
    pub fn with_layer(mut self, layer: AnnotationLayer) -> Self {
        self.layer = layer;
        self
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: impl Into<String>, y_axis_key: impl Into<String>) -> Self {
        self.x_axis_key = Some(x_axis_key.into());
        self.y_axis_key = Some(y_axis_key.into());
        self
    }

    /// Screen polyline for the line over the visible part of both axes.
    fn screen_points(&self, axes: &SeriesAxes<'_>) -> PlotResult<Vec<ScreenPoint>> {
        let (x_axis, y_axis) = axes.xy()?;
        let (x_low, x_high) = visible_interval(x_axis, self.minimum_x, self.maximum_x);
        let (y_low, y_high) = visible_interval(y_axis, self.minimum_y, self.maximum_y);

        let data: Vec<(f64, f64)> = match self.line_type {
            LineAnnotationType::Horizontal(y) => vec![(x_low, y), (x_high, y)],
            LineAnnotationType::Vertical(x) => vec![(x, y_low), (x, y_high)],
            LineAnnotationType::LinearEquation { slope, intercept } => {
                // Straight only when both axes are linear; sample otherwise.
                let samples = if x_axis.is_logarithmic() || y_axis.is_logarithmic() {
                    200
                } else {
                    1
                };
                (0..=samples)
                    .map(|step| {
                        let x = x_low + (x_high - x_low) * step as f64 / samples as f64;
                        (x, slope * x + intercept)
                    })
                    .collect()
            }
        };
        Ok(data
            .into_iter()
            .filter_map(|(x, y)| axes.transform(x, y))
            .collect())
    }
}

impl Annotation for LineAnnotation {
    fn layer(&self) -> AnnotationLayer {
        self.layer
    }

    fn axis_binding(&self) -> AxisBinding {
        AxisBinding::xy(self.x_axis_key.as_deref(), self.y_axis_key.as_deref())
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        let points = self.screen_points(axes)?;
        let stroke = StrokeStyle::styled(self.color, self.thickness, self.line_style);
        let pieces = clip_polyline(&points, axes.plot_area);
        for piece in &pieces {
            ctx.draw_line(piece, &stroke);
        }

        if let (Some(text), Some(end)) = (&self.text, pieces.last().and_then(|piece| piece.last())) {
            let style = TextStyle::new(self.font_size, self.color)
                .aligned(TextHAlign::Right, TextVAlign::Bottom);
            ctx.draw_text(*end, text, &style);
        }
        Ok(())
    }
}

/// Filled data-space rectangle; NaN edges extend to the axis range.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleAnnotation {
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    pub minimum_x: f64,
    pub maximum_x: f64,
    pub minimum_y: f64,
    pub maximum_y: f64,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_thickness: f64,
    pub text: Option<String>,
    pub font_size: f64,
    pub text_color: Color,
    pub layer: AnnotationLayer,
}

impl Default for RectangleAnnotation {
    fn default() -> Self {
        Self::new()
    }
}

impl RectangleAnnotation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            x_axis_key: None,
            y_axis_key: None,
            minimum_x: f64::NAN,
            maximum_x: f64::NAN,
            minimum_y: f64::NAN,
            maximum_y: f64::NAN,
            fill: Color::rgba(0.68, 0.85, 0.90, 0.5),
            stroke: Color::TRANSPARENT,
            stroke_thickness: 0.0,
            text: None,
            font_size: 12.0,
            text_color: Color::BLACK,
            layer: AnnotationLayer::BelowSeries,
        }
    }

    #[must_use]
    pub fn with_x_range(mut self, minimum_x: f64, maximum_x: f64) -> Self {
        self.minimum_x = minimum_x;
        self.maximum_x = maximum_x;
        self
    }

    #[must_use]
    pub fn with_y_range(mut self, minimum_y: f64, maximum_y: f64) -> Self {
        self.minimum_y = minimum_y;
        self.maximum_y = maximum_y;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_layer(mut self, layer: AnnotationLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Screen rectangle clipped to the plot area, if any part is visible.
    #[must_use]
    pub fn screen_rect(&self, axes: &SeriesAxes<'_>) -> Option<PlotRect> {
        let (x_axis, y_axis) = axes.xy().ok()?;
        let (x_low, x_high) = visible_interval(x_axis, self.minimum_x, self.maximum_x);
        let (y_low, y_high) = visible_interval(y_axis, self.minimum_y, self.maximum_y);
        if x_low > x_high || y_low > y_high {
            return None;
        }
        let corner = axes.transform(x_low, y_low)?;
        let opposite = axes.transform(x_high, y_high)?;
        PlotRect::from_points(corner, opposite).intersect(axes.plot_area)
    }
}

impl Annotation for RectangleAnnotation {
    fn layer(&self) -> AnnotationLayer {
        self.layer
    }

    fn axis_binding(&self) -> AxisBinding {
        AxisBinding::xy(self.x_axis_key.as_deref(), self.y_axis_key.as_deref())
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        axes.xy()?;
        let Some(rect) = self.screen_rect(axes) else {
            return Ok(());
        };
        ctx.draw_rectangle(rect, self.fill, &StrokeStyle::solid(self.stroke, self.stroke_thickness));
        if let Some(text) = &self.text {
            let style = TextStyle::new(self.font_size, self.text_color)
                .aligned(TextHAlign::Center, TextVAlign::Middle);
            ctx.draw_text(rect.center(), text, &style);
        }
        Ok(())
    }
}

/// Text anchored at a data point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Screen offset from the anchor.
    pub offset: ScreenVector,
    pub style: TextStyle,
    pub layer: AnnotationLayer,
}

impl TextAnnotation {
    #[must_use]
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x_axis_key: None,
            y_axis_key: None,
            x,
            y,
            text: text.into(),
            offset: ScreenVector::default(),
            style: TextStyle::new(12.0, Color::BLACK).aligned(TextHAlign::Center, TextVAlign::Bottom),
            layer: AnnotationLayer::AboveSeries,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: ScreenVector) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

impl Annotation for TextAnnotation {
    fn layer(&self) -> AnnotationLayer {
        self.layer
    }

    fn axis_binding(&self) -> AxisBinding {
        AxisBinding::xy(self.x_axis_key.as_deref(), self.y_axis_key.as_deref())
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        axes.xy()?;
        if let Some(anchor) = axes.transform(self.x, self.y) {
            if axes.plot_area.contains(anchor) {
                ctx.draw_text(anchor.offset(self.offset), &self.text, &self.style);
            }
        }
        Ok(())
    }
}
