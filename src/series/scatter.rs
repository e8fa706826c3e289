use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::axis::PaletteIndex;
use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::PlotResult;
use crate::model::DefaultStyles;
use crate::render::{Color, MarkerStyle, MarkerType, RenderContext};

use super::{
    AxisBinding, ColorAxisUsage, DataExtents, ItemsSource, Series, SeriesAxes, TrackerHitResult,
    ValueDomain, tracker_text,
};

/// One scatter point; NaN `size` uses the series marker size and NaN `value`
/// means "no color value".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub value: f64,
}

impl ScatterPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            size: f64::NAN,
            value: f64::NAN,
        }
    }

    #[must_use]
    pub const fn with_value(x: f64, y: f64, size: f64, value: f64) -> Self {
        Self { x, y, size, value }
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Markers at arbitrary positions, optionally colored through a color axis.
#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub title: Option<String>,
    pub is_visible: bool,
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    pub color_axis_key: Option<String>,
    /// `None` takes the next default marker type.
    pub marker_type: Option<MarkerType>,
    pub marker_size: f64,
    /// `None` takes the next default color.
    pub marker_fill: Option<Color>,
    pub marker_stroke: Color,
    pub marker_stroke_thickness: f64,
    points: Vec<ScatterPoint>,
    items_source: Option<ItemsSource<ScatterPoint>>,
    extents: DataExtents,
    actual_marker_type: MarkerType,
    actual_fill: Color,
}

impl Default for ScatterSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            is_visible: true,
            x_axis_key: None,
            y_axis_key: None,
            color_axis_key: None,
            marker_type: None,
            marker_size: 5.0,
            marker_fill: None,
            marker_stroke: Color::TRANSPARENT,
            marker_stroke_thickness: 1.0,
            points: Vec::new(),
            items_source: None,
            extents: DataExtents::default(),
            actual_marker_type: MarkerType::Square,
            actual_fill: Color::BLACK,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = ScatterPoint>) -> Self {
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
    pub fn with_color_axis_key(mut self, key: impl Into<String>) -> Self {
        self.color_axis_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker_type: MarkerType, marker_size: f64) -> Self {
        self.marker_type = Some(marker_type);
        self.marker_size = marker_size;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.marker_fill = Some(fill);
        self
    }

    #[must_use]
    pub fn with_items_source(mut self, source: ItemsSource<ScatterPoint>) -> Self {
        self.items_source = Some(source);
        self
    }

    pub fn push(&mut self, point: ScatterPoint) {
        self.points.push(point);
    }

    #[must_use]
    pub fn points(&self) -> &[ScatterPoint] {
        &self.points
    }

    #[must_use]
    pub fn actual_marker_type(&self) -> MarkerType {
        self.actual_marker_type
    }

    fn point_size(&self, point: &ScatterPoint) -> f64 {
        if point.size.is_finite() && point.size >= 0.0 {
            point.size
        } else {
            self.marker_size
        }
    }

    /// Visible points with their screen position and color-map slot.
    ///
    /// With a color axis, points whose value has no color are skipped.
    fn visible_points<'s>(
        &'s self,
        axes: &'s SeriesAxes<'_>,
    ) -> impl Iterator<Item = (usize, &'s ScatterPoint, ScreenPoint, Option<PaletteIndex>)> + 's {
        self.points.iter().enumerate().filter_map(move |(index, point)| {
            if !point.is_defined() || !axes.contains(point.x, point.y) {
                return None;
            }
            let palette_index = match axes.color {
                Some(color_axis) => {
                    if point.value.is_nan() {
                        return None;
                    }
                    let palette_index = color_axis.palette_index(point.value)?;
                    color_axis.color_for_index(palette_index)?;
                    Some(palette_index)
                }
                None => None,
            };
            let screen = axes.transform(point.x, point.y)?;
            Some((index, point, screen, palette_index))
        })
    }
}

impl Series for ScatterSeries {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn axis_binding(&self) -> AxisBinding {
        AxisBinding::xy(self.x_axis_key.as_deref(), self.y_axis_key.as_deref())
            .with_color(self.color_axis_key.as_deref(), ColorAxisUsage::Optional)
    }

    fn set_default_values(&mut self, styles: &mut DefaultStyles) {
        self.actual_fill = match self.marker_fill {
            Some(fill) => fill,
            None => styles.next_color(),
        };
        self.actual_marker_type = match self.marker_type {
            Some(marker_type) => marker_type,
            None => styles.next_marker_type(),
        };
    }

    fn update_data(&mut self) {
        if let Some(source) = &self.items_source {
            self.points = source.load();
        }
    }

    fn update_max_min(&mut self, domain: ValueDomain) {
        let mut extents = DataExtents::new(domain);
        for point in self.points.iter().filter(|point| point.is_defined()) {
            if !domain.contains_point(point.x, point.y) {
                continue;
            }
            extents.include_x(point.x);
            extents.include_y(point.y);
            extents.include_value(point.value);
        }
        self.extents = extents;
    }

    fn extents(&self) -> DataExtents {
        self.extents
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        axes.xy()?;

        // Batches keyed by color slot and marker size, in first-seen order.
        let mut batches: IndexMap<(Option<PaletteIndex>, u64), Vec<ScreenPoint>> = IndexMap::new();
        for (_, point, screen, palette_index) in self.visible_points(axes) {
            batches
                .entry((palette_index, self.point_size(point).to_bits()))
                .or_default()
                .push(screen);
        }

        for ((palette_index, size_bits), points) in batches {
            let fill = match (palette_index, axes.color) {
                (Some(index), Some(color_axis)) => {
                    color_axis.color_for_index(index).unwrap_or(self.actual_fill)
                }
                _ => self.actual_fill,
            };
            let mut style = MarkerStyle::new(self.actual_marker_type, f64::from_bits(size_bits), fill);
            style.stroke = self.marker_stroke;
            style.stroke_thickness = self.marker_stroke_thickness;
            ctx.draw_markers(&points, &style);
        }
        Ok(())
    }

    fn render_legend(&self, ctx: &mut dyn RenderContext, symbol_area: PlotRect) {
        let mut style = MarkerStyle::new(
            self.actual_marker_type,
            self.marker_size.min(symbol_area.height * 0.5),
            self.actual_fill,
        );
        style.stroke = self.marker_stroke;
        ctx.draw_markers(&[symbol_area.center()], &style);
    }

    fn get_nearest_point(
        &self,
        point: ScreenPoint,
        _interpolate: bool,
        axes: &SeriesAxes<'_>,
    ) -> Option<TrackerHitResult> {
        let (x_axis, y_axis) = axes.xy().ok()?;
        let (index, nearest, screen, _) = self
            .visible_points(axes)
            .min_by_key(|(_, _, screen, _)| OrderedFloat(screen.distance_to_squared(point)))?;

        let data_point = DataPoint::new(nearest.x, nearest.y);
        let value = nearest.value.is_finite().then_some(nearest.value);
        let extra: Vec<(&str, String)> = match (value, axes.color) {
            (Some(value), Some(color_axis)) => vec![(
                color_axis.title.as_deref().unwrap_or("Value"),
                color_axis.format_value(value),
            )],
            _ => Vec::new(),
        };
        Some(TrackerHitResult {
            series_index: 0,
            series_title: self.title.clone(),
            data_point,
            position: screen,
            index: index as f64,
            value,
            text: tracker_text(self.title.as_deref(), x_axis, y_axis, data_point, &extra),
        })
    }
}
