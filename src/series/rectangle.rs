use serde::{Deserialize, Serialize};

use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::PlotResult;
use crate::render::{Color, RenderContext, StrokeStyle};

use super::{
    AxisBinding, ColorAxisUsage, DataExtents, ItemsSource, Series, SeriesAxes, TrackerHitResult,
    ValueDomain, tracker_text,
};

/// Axis-aligned rectangle carrying a color value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleItem {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub value: f64,
}

impl RectangleItem {
    #[must_use]
    pub const fn new(x1: f64, x2: f64, y1: f64, y2: f64, value: f64) -> Self {
        Self {
            x1,
            x2,
            y1,
            y2,
            value,
        }
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        [self.x1, self.x2, self.y1, self.y2]
            .iter()
            .all(|value| value.is_finite())
    }

    /// Containment independent of corner order.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x1.min(self.x2)
            && x <= self.x1.max(self.x2)
            && y >= self.y1.min(self.y2)
            && y <= self.y1.max(self.y2)
    }
}

/// Rectangles filled through a color axis; items with a NaN value are skipped.
#[derive(Debug, Clone)]
pub struct RectangleSeries {
    pub title: Option<String>,
    pub is_visible: bool,
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    pub color_axis_key: Option<String>,
    pub stroke_color: Color,
    pub stroke_thickness: f64,
    items: Vec<RectangleItem>,
    items_source: Option<ItemsSource<RectangleItem>>,
    extents: DataExtents,
}

impl Default for RectangleSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl RectangleSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            is_visible: true,
            x_axis_key: None,
            y_axis_key: None,
            color_axis_key: None,
            stroke_color: Color::TRANSPARENT,
            stroke_thickness: 0.0,
            items: Vec::new(),
            items_source: None,
            extents: DataExtents::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = RectangleItem>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_color_axis_key(mut self, key: impl Into<String>) -> Self {
        self.color_axis_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_items_source(mut self, source: ItemsSource<RectangleItem>) -> Self {
        self.items_source = Some(source);
        self
    }

    #[must_use]
    pub fn items(&self) -> &[RectangleItem] {
        &self.items
    }
}

impl Series for RectangleSeries {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn axis_binding(&self) -> AxisBinding {
        AxisBinding::xy(self.x_axis_key.as_deref(), self.y_axis_key.as_deref())
            .with_color(self.color_axis_key.as_deref(), ColorAxisUsage::Required)
    }

    fn update_data(&mut self) {
        if let Some(source) = &self.items_source {
            self.items = source.load();
        }
    }

    fn update_max_min(&mut self, domain: ValueDomain) {
        let mut extents = DataExtents::new(domain);
        for item in self.items.iter().filter(|item| item.is_defined()) {
            if !domain.contains_point(item.x1, item.y1) || !domain.contains_point(item.x2, item.y2) {
                continue;
            }
            extents.include_x(item.x1);
            extents.include_x(item.x2);
            extents.include_y(item.y1);
            extents.include_y(item.y2);
            extents.include_value(item.value);
        }
        self.extents = extents;
    }

    fn extents(&self) -> DataExtents {
        self.extents
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        axes.xy()?;
        let color_axis = axes.color_axis()?;
        let stroke = StrokeStyle::solid(self.stroke_color, self.stroke_thickness);
        for item in self.items.iter().filter(|item| item.is_defined() && !item.value.is_nan()) {
            let Some(fill) = color_axis.color_for_value(item.value) else {
                continue;
            };
            let (Some(corner), Some(opposite)) =
                (axes.transform(item.x1, item.y1), axes.transform(item.x2, item.y2))
            else {
                continue;
            };
            if let Some(visible) = PlotRect::from_points(corner, opposite).intersect(axes.plot_area) {
                ctx.draw_rectangle(visible, fill, &stroke);
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
        let (x_axis, y_axis) = axes.xy().ok()?;
        let color_axis = axes.color?;
        let data = x_axis.inverse_transform_point(point, y_axis);
        if !axes.contains(data.x, data.y) {
            return None;
        }
        // Later items are drawn on top, so search from the end.
        let (index, item) = self.items.iter().enumerate().rev().find(|(_, item)| {
            item.is_defined()
                && !item.value.is_nan()
                && color_axis.color_for_value(item.value).is_some()
                && item.contains(data.x, data.y)
        })?;

        let data_point = DataPoint::new((item.x1 + item.x2) * 0.5, (item.y1 + item.y2) * 0.5);
        let extra = [(
            color_axis.title.as_deref().unwrap_or("Value"),
            color_axis.format_value(item.value),
        )];
        Some(TrackerHitResult {
            series_index: 0,
            series_title: self.title.clone(),
            data_point,
            position: point,
            index: index as f64,
            value: Some(item.value),
            text: tracker_text(self.title.as_deref(), x_axis, y_axis, data_point, &extra),
        })
    }
}
