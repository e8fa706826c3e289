use serde::{Deserialize, Serialize};

use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::PlotResult;
use crate::model::DefaultStyles;
use crate::render::{Color, RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign};

use super::{AxisBinding, DataExtents, Series, SeriesAxes, TrackerHitResult, ValueDomain};

/// One pie slice; negative and NaN values are drawn as empty slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fill: Option<Color>,
    pub is_exploded: bool,
}

impl PieSlice {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            fill: None,
            is_exploded: false,
        }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn exploded(mut self) -> Self {
        self.is_exploded = true;
        self
    }

    fn weight(&self) -> f64 {
        if self.value.is_finite() && self.value > 0.0 {
            self.value
        } else {
            0.0
        }
    }
}

/// Angular span of one slice in screen degrees, clockwise from the x-axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SliceSpan {
    start: f64,
    sweep: f64,
}

/// Pie or donut chart laid out in the plot area; it binds no axes.
#[derive(Debug, Clone)]
pub struct PieSeries {
    pub title: Option<String>,
    pub is_visible: bool,
    /// Angle of the first slice edge in degrees, clockwise on screen.
    pub start_angle: f64,
    pub angle_span: f64,
    /// Diameter relative to the smaller side of the plot area.
    pub diameter: f64,
    /// Hole diameter relative to the smaller side; zero draws a full pie.
    pub inner_diameter: f64,
    /// Radial offset of exploded slices relative to the radius.
    pub explode_distance: f64,
    pub stroke: Color,
    pub stroke_thickness: f64,
    /// Arc resolution in degrees.
    pub angle_increment: f64,
    pub are_inside_labels_visible: bool,
    /// Label position relative to the ring, 0 at the inner edge and 1 at the
    /// outer edge.
    pub inside_label_position: f64,
    pub font_size: f64,
    pub text_color: Color,
    slices: Vec<PieSlice>,
    actual_fills: Vec<Color>,
    total: f64,
}

impl Default for PieSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl PieSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            is_visible: true,
            start_angle: 0.0,
            angle_span: 360.0,
            diameter: 1.0,
            inner_diameter: 0.0,
            explode_distance: 0.1,
            stroke: Color::WHITE,
            stroke_thickness: 1.0,
            angle_increment: 1.0,
            are_inside_labels_visible: true,
            inside_label_position: 0.5,
            font_size: 12.0,
            text_color: Color::BLACK,
            slices: Vec::new(),
            actual_fills: Vec::new(),
            total: 0.0,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_slices(mut self, slices: impl IntoIterator<Item = PieSlice>) -> Self {
        self.slices = slices.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_inner_diameter(mut self, inner_diameter: f64) -> Self {
        self.inner_diameter = inner_diameter;
        self
    }

    #[must_use]
    pub fn with_angles(mut self, start_angle: f64, angle_span: f64) -> Self {
        self.start_angle = start_angle;
        self.angle_span = angle_span;
        self
    }

    #[must_use]
    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    /// Fill assigned to slice `index` by the last default-style pass.
    #[must_use]
    pub fn slice_fill(&self, index: usize) -> Option<Color> {
        self.actual_fills.get(index).copied()
    }

    fn spans(&self) -> Vec<SliceSpan> {
        let mut angle = self.start_angle;
        self.slices
            .iter()
            .map(|slice| {
                let sweep = if self.total > 0.0 {
                    slice.weight() / self.total * self.angle_span
                } else {
                    0.0
                };
                let span = SliceSpan {
                    start: angle,
                    sweep,
                };
                angle += sweep;
                span
            })
            .collect()
    }

    fn radii(&self, area: PlotRect) -> (f64, f64) {
        let side = area.width.min(area.height);
        let outer = side * 0.5 * self.diameter / (1.0 + self.explode_distance);
        let inner = side * 0.5 * self.inner_diameter.clamp(0.0, self.diameter)
            / (1.0 + self.explode_distance);
        (outer, inner)
    }

    fn slice_center(&self, slice: &PieSlice, span: SliceSpan, center: ScreenPoint, outer: f64) -> ScreenPoint {
        if !slice.is_exploded {
            return center;
        }
        let mid = (span.start + span.sweep * 0.5).to_radians();
        let offset = outer * self.explode_distance;
        ScreenPoint::new(center.x + offset * mid.cos(), center.y + offset * mid.sin())
    }

    fn arc_points(&self, center: ScreenPoint, radius: f64, span: SliceSpan, reverse: bool) -> Vec<ScreenPoint> {
        let increment = if self.angle_increment > 0.0 { self.angle_increment } else { 1.0 };
        let steps = ((span.sweep.abs() / increment).ceil() as usize).max(1);
        let point_at = |step: usize| {
            let angle = (span.start + span.sweep * step as f64 / steps as f64).to_radians();
            ScreenPoint::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        };
        if reverse {
            (0..=steps).rev().map(point_at).collect()
        } else {
            (0..=steps).map(point_at).collect()
        }
    }

    fn slice_polygon(&self, center: ScreenPoint, outer: f64, inner: f64, span: SliceSpan) -> Vec<ScreenPoint> {
        let mut points = self.arc_points(center, outer, span, false);
        if inner > 0.0 {
            points.extend(self.arc_points(center, inner, span, true));
        } else {
            points.push(center);
        }
        points
    }
}

/// Angle of `point` around `center` in screen degrees, in `[0, 360)`.
fn screen_angle(center: ScreenPoint, point: ScreenPoint) -> f64 {
    (point.y - center.y)
        .atan2(point.x - center.x)
        .to_degrees()
        .rem_euclid(360.0)
}

/// Whether `angle` lies within `span`, accounting for wrap-around.
fn span_contains(span: SliceSpan, angle: f64) -> bool {
    if span.sweep <= 0.0 {
        return false;
    }
    let relative = (angle - span.start).rem_euclid(360.0);
    relative <= span.sweep
}

impl Series for PieSeries {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn axis_binding(&self) -> AxisBinding {
        AxisBinding::default()
    }

    fn set_default_values(&mut self, styles: &mut DefaultStyles) {
        self.actual_fills = self
            .slices
            .iter()
            .map(|slice| slice.fill.unwrap_or_else(|| styles.next_color()))
            .collect();
    }

    fn update_max_min(&mut self, _domain: ValueDomain) {
        self.total = self.slices.iter().map(PieSlice::weight).sum();
    }

    fn extents(&self) -> DataExtents {
        DataExtents::default()
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        if self.total <= 0.0 || !axes.plot_area.is_valid() {
            return Ok(());
        }
        let center = axes.plot_area.center();
        let (outer, inner) = self.radii(axes.plot_area);
        let stroke = StrokeStyle::solid(self.stroke, self.stroke_thickness);
        let label_style = TextStyle::new(self.font_size, self.text_color)
            .aligned(TextHAlign::Center, TextVAlign::Middle);

        for (index, (slice, span)) in self.slices.iter().zip(self.spans()).enumerate() {
            if span.sweep <= 0.0 {
                continue;
            }
            let slice_center = self.slice_center(slice, span, center, outer);
            let fill = self
                .actual_fills
                .get(index)
                .copied()
                .or(slice.fill)
                .unwrap_or(Color::GRAY);
            ctx.draw_polygon(&self.slice_polygon(slice_center, outer, inner, span), fill, &stroke);

            if self.are_inside_labels_visible && !slice.label.is_empty() {
                let mid = (span.start + span.sweep * 0.5).to_radians();
                let radius = inner + (outer - inner) * self.inside_label_position;
                let anchor = ScreenPoint::new(
                    slice_center.x + radius * mid.cos(),
                    slice_center.y + radius * mid.sin(),
                );
                ctx.draw_text(anchor, &slice.label, &label_style);
            }
        }
        Ok(())
    }

    fn get_nearest_point(
        &self,
        point: ScreenPoint,
        _interpolate: bool,
        axes: &SeriesAxes<'_>,
    ) -> Option<TrackerHitResult> {
        if self.total <= 0.0 {
            return None;
        }
        let center = axes.plot_area.center();
        let (outer, inner) = self.radii(axes.plot_area);

        for (index, (slice, span)) in self.slices.iter().zip(self.spans()).enumerate() {
            let slice_center = self.slice_center(slice, span, center, outer);
            let distance = slice_center.distance_to(point);
            if distance < inner || distance > outer {
                continue;
            }
            if !span_contains(span, screen_angle(slice_center, point)) {
                continue;
            }
            let share = slice.weight() / self.total;
            let mut lines = Vec::with_capacity(3);
            if let Some(title) = &self.title {
                lines.push(title.clone());
            }
            lines.push(format!("{}: {}", slice.label, slice.value));
            lines.push(format!("{:.1}%", share * 100.0));
            return Some(TrackerHitResult {
                series_index: 0,
                series_title: self.title.clone(),
                data_point: DataPoint::new(index as f64, slice.value),
                position: point,
                index: index as f64,
                value: Some(slice.value),
                text: lines.join("\n"),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_wrap_past_full_turn() {
        let span = SliceSpan {
            start: 300.0,
            sweep: 90.0,
        };
        assert!(span_contains(span, 10.0));
        assert!(span_contains(span, 350.0));
        assert!(!span_contains(span, 40.0));
    }

    #[test]
    fn empty_slices_take_no_angle() {
        let mut series = PieSeries::new().with_slices([
            PieSlice::new("a", 1.0),
            PieSlice::new("b", f64::NAN),
            PieSlice::new("c", 3.0),
        ]);
        series.update_max_min(ValueDomain::default());
        let spans = series.spans();
        assert_eq!(spans[1].sweep, 0.0);
        assert!((spans[0].sweep - 90.0).abs() < 1e-9);
        assert!((spans[2].start - 90.0).abs() < 1e-9);
    }
}
