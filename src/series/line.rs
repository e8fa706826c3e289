use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::axis::Axis;
use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::PlotResult;
use crate::model::DefaultStyles;
use crate::render::clipping::{clip_polyline, clip_segment};
use crate::render::{Color, LineStyle, MarkerStyle, MarkerType, RenderContext, StrokeStyle};

use super::{
    AxisBinding, DataExtents, ItemsSource, Series, SeriesAxes, TrackerHitResult, legend_mid_line,
    ValueDomain, tracker_text,
};

/// Polyline through `DataPoint`s with optional markers.
///
/// Undefined points (NaN/infinite, or invalid on the bound axes) split the
/// line into separate pieces; a broken-line stroke can bridge the gaps.
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub title: Option<String>,
    pub is_visible: bool,
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    /// Line color; `None` takes the next default color.
    pub color: Option<Color>,
    pub stroke_thickness: f64,
    /// Dash style; `None` takes the default style for the assigned color.
    pub line_style: Option<LineStyle>,
    /// Stroke drawn across gaps left by undefined points.
    pub broken_line: Option<StrokeStyle>,
    pub marker_type: MarkerType,
    pub marker_size: f64,
    /// Marker fill; `None` uses the line color.
    pub marker_fill: Option<Color>,
    points: Vec<DataPoint>,
    items_source: Option<ItemsSource<DataPoint>>,
    extents: DataExtents,
    is_x_monotonic: bool,
    actual_color: Color,
    actual_line_style: LineStyle,
}

impl Default for LineSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            is_visible: true,
            x_axis_key: None,
            y_axis_key: None,
            color: None,
            stroke_thickness: 2.0,
            line_style: None,
            broken_line: None,
            marker_type: MarkerType::None,
            marker_size: 3.0,
            marker_fill: None,
            points: Vec::new(),
            items_source: None,
            extents: DataExtents::default(),
            is_x_monotonic: true,
            actual_color: Color::BLACK,
            actual_line_style: LineStyle::Solid,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = DataPoint>) -> Self {
        self.points = points.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: impl Into<String>, y_axis_key: impl Into<String>) -> Self {
        self.x_axis_key = Some(x_axis_key.into());
        self.y_axis_key = Some(y_axis_key.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = Some(line_style);
        self
    }

    #[must_use]
    pub fn with_broken_line(mut self, stroke: StrokeStyle) -> Self {
        self.broken_line = Some(stroke);
        self
    }

    #[must_use]
    pub fn with_markers(mut self, marker_type: MarkerType, marker_size: f64) -> Self {
        self.marker_type = marker_type;
        self.marker_size = marker_size;
        self
    }

    #[must_use]
    pub fn with_items_source(mut self, source: ItemsSource<DataPoint>) -> Self {
        self.items_source = Some(source);
        self
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push(point);
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut Vec<DataPoint> {
        &mut self.points
    }

    #[must_use]
    pub fn actual_color(&self) -> Color {
        self.actual_color
    }

    #[must_use]
    pub fn actual_line_style(&self) -> LineStyle {
        self.actual_line_style
    }

    fn stroke(&self) -> StrokeStyle {
        StrokeStyle::styled(self.actual_color, self.stroke_thickness, self.actual_line_style)
    }

    fn marker_style(&self) -> MarkerStyle {
        MarkerStyle::new(
            self.marker_type,
            self.marker_size,
            self.marker_fill.unwrap_or(self.actual_color),
        )
    }

    /// Index window that can intersect the visible x-range.
    ///
    /// Only narrows the range when x never decreases; otherwise every point
    /// is considered.
    fn visible_window(&self, x_axis: &Axis) -> (usize, usize) {
        if !self.is_x_monotonic || x_axis.is_polar() {
            return (0, self.points.len());
        }
        let minimum = x_axis.actual_minimum().min(x_axis.actual_maximum());
        let maximum = x_axis.actual_minimum().max(x_axis.actual_maximum());
        let start = self
            .points
            .partition_point(|point| point.x < minimum)
            .saturating_sub(1);
        let end = (self.points.partition_point(|point| point.x <= maximum) + 1).min(self.points.len());
        (start, end.max(start))
    }

    fn screen_point(&self, index: usize, axes: &SeriesAxes<'_>) -> Option<ScreenPoint> {
        let point = self.points.get(index)?;
        if !point.is_defined() {
            return None;
        }
        axes.transform(point.x, point.y)
    }
}

impl Series for LineSeries {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn axis_binding(&self) -> AxisBinding {
        AxisBinding::xy(self.x_axis_key.as_deref(), self.y_axis_key.as_deref())
    }

    fn set_default_values(&mut self, styles: &mut DefaultStyles) {
        match self.color {
            Some(color) => {
                self.actual_color = color;
                self.actual_line_style = self.line_style.unwrap_or_default();
            }
            None => {
                let (color, line_style) = styles.next_color_and_line_style();
                self.actual_color = color;
                self.actual_line_style = self.line_style.unwrap_or(line_style);
            }
        }
    }

    fn update_data(&mut self) {
        if let Some(source) = &self.items_source {
            self.points = source.load();
        }
    }

    fn update_max_min(&mut self, domain: ValueDomain) {
        let mut extents = DataExtents::new(domain);
        for point in &self.points {
            extents.include_point(*point);
        }
        self.extents = extents;
        self.is_x_monotonic = self.points.windows(2).all(|pair| pair[0].x <= pair[1].x);
    }

    fn extents(&self) -> DataExtents {
        self.extents
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        let (x_axis, _) = axes.xy()?;
        let (start, end) = self.visible_window(x_axis);
        let clip = axes.plot_area;
        let stroke = self.stroke();

        let mut runs: Vec<Vec<ScreenPoint>> = Vec::new();
        let mut current: Vec<ScreenPoint> = Vec::new();
        let mut gaps: Vec<(ScreenPoint, ScreenPoint)> = Vec::new();
        let mut last_defined: Option<ScreenPoint> = None;
        let mut in_gap = false;

        for index in start..end {
            match self.screen_point(index, axes) {
                Some(point) => {
                    if in_gap {
                        if let Some(previous) = last_defined {
                            gaps.push((previous, point));
                        }
                        in_gap = false;
                    }
                    current.push(point);
                    last_defined = Some(point);
                }
                None => {
                    if !current.is_empty() {
                        runs.push(std::mem::take(&mut current));
                    }
                    in_gap = last_defined.is_some();
                }
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        if stroke.is_visible() && self.actual_line_style != LineStyle::None {
            for run in &runs {
                for piece in clip_polyline(run, clip) {
                    ctx.draw_line(&piece, &stroke);
                }
            }
        }

        if let Some(broken) = &self.broken_line {
            let segments: Vec<_> = gaps
                .iter()
                .filter_map(|(from, to)| clip_segment(*from, *to, clip))
                .collect();
            if !segments.is_empty() {
                ctx.draw_line_segments(&segments, broken);
            }
        }

        if self.marker_type != MarkerType::None {
            let markers: Vec<ScreenPoint> = runs
                .iter()
                .flatten()
                .copied()
                .filter(|point| clip.contains(*point))
                .collect();
            ctx.draw_markers(&markers, &self.marker_style());
        }

        trace!(
            title = self.title.as_deref().unwrap_or(""),
            runs = runs.len(),
            gaps = gaps.len(),
            "line series rendered"
        );
        Ok(())
    }

    fn render_legend(&self, ctx: &mut dyn RenderContext, symbol_area: PlotRect) {
        let line = legend_mid_line(symbol_area);
        ctx.draw_line(&line, &self.stroke());
        if self.marker_type != MarkerType::None {
            let center = symbol_area.center();
            ctx.draw_markers(&[center], &self.marker_style());
        }
    }

    fn get_nearest_point(
        &self,
        point: ScreenPoint,
        interpolate: bool,
        axes: &SeriesAxes<'_>,
    ) -> Option<TrackerHitResult> {
        let (x_axis, y_axis) = axes.xy().ok()?;
        let (start, end) = self.visible_window(x_axis);

        let candidates = (start..end).filter_map(|index| {
            let data = self.points[index];
            (data.is_defined() && axes.contains(data.x, data.y))
                .then(|| self.screen_point(index, axes).map(|screen| (index, data, screen)))
                .flatten()
        });

        let nearest_vertex = candidates
            .map(|(index, data, screen)| (data, screen, index as f64))
            .min_by_key(|(_, screen, _)| OrderedFloat(screen.distance_to_squared(point)));

        let (data_point, position, index) = if interpolate {
            let defined: Vec<(usize, ScreenPoint)> = (start..end)
                .filter_map(|index| self.screen_point(index, axes).map(|screen| (index, screen)))
                .collect();
            let nearest_segment = defined
                .windows(2)
                .filter(|pair| pair[1].0 == pair[0].0 + 1)
                .map(|pair| {
                    let (projected, t) = project_onto_segment(point, pair[0].1, pair[1].1);
                    (pair[0].0, projected, t)
                })
                .filter(|(_, projected, _)| axes.plot_area.contains(*projected))
                .min_by_key(|(_, projected, _)| OrderedFloat(projected.distance_to_squared(point)))
                .map(|(index, projected, t)| {
                    let data = x_axis.inverse_transform_point(projected, y_axis);
                    (data, projected, index as f64 + t)
                });
            // Isolated vertices have no segment but remain hit candidates.
            [nearest_vertex, nearest_segment]
                .into_iter()
                .flatten()
                .min_by_key(|(_, screen, _)| OrderedFloat(screen.distance_to_squared(point)))?
        } else {
            nearest_vertex?
        };

        Some(TrackerHitResult {
            series_index: 0,
            series_title: self.title.clone(),
            data_point,
            position,
            index,
            value: None,
            text: tracker_text(self.title.as_deref(), x_axis, y_axis, data_point, &[]),
        })
    }
}

/// Closest point to `point` on segment `a`-`b` and its parameter in `[0, 1]`.
fn project_onto_segment(point: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> (ScreenPoint, f64) {
    let direction = a.vector_to(b);
    let length_squared = direction.length_squared();
    if length_squared <= f64::EPSILON {
        return (a, 0.0);
    }
    let offset = a.vector_to(point);
    let t = ((offset.x * direction.x + offset.y * direction.y) / length_squared).clamp(0.0, 1.0);
    (
        ScreenPoint::new(a.x + direction.x * t, a.y + direction.y * t),
        t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_clamps_to_segment_ends() {
        let a = ScreenPoint::new(0.0, 0.0);
        let b = ScreenPoint::new(10.0, 0.0);
        assert_eq!(project_onto_segment(ScreenPoint::new(4.0, 3.0), a, b), (ScreenPoint::new(4.0, 0.0), 0.4));
        assert_eq!(project_onto_segment(ScreenPoint::new(-4.0, 3.0), a, b), (a, 0.0));
        assert_eq!(project_onto_segment(ScreenPoint::new(14.0, 3.0), a, b), (b, 1.0));
    }
}
