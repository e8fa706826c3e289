use crate::core::axis::Axis;
use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::PlotResult;
use crate::model::DefaultStyles;
use crate::render::{Color, RenderContext, StrokeStyle};

use super::{
    AxisBinding, DataExtents, ItemsSource, Series, SeriesAxes, TrackerHitResult, ValueDomain,
    tracker_text,
};

/// One bar; `category_index` defaults to the item's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarItem {
    pub value: f64,
    pub category_index: Option<usize>,
    pub color: Option<Color>,
}

impl BarItem {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            category_index: None,
            color: None,
        }
    }

    #[must_use]
    pub const fn at(category_index: usize, value: f64) -> Self {
        Self {
            value,
            category_index: Some(category_index),
            color: None,
        }
    }
}

/// Bars over a category axis, growing from `base_value`.
///
/// Bar series sharing one category axis are placed side by side within each
/// category.
#[derive(Debug, Clone)]
pub struct BarSeries {
    pub title: Option<String>,
    pub is_visible: bool,
    /// Key of the category axis.
    pub x_axis_key: Option<String>,
    /// Key of the value axis.
    pub y_axis_key: Option<String>,
    pub base_value: f64,
    /// Width of the bar group in category units; NaN derives it from the
    /// category axis gap width.
    pub bar_width: f64,
    pub fill_color: Option<Color>,
    /// Fill for bars below `base_value`; `None` uses the regular fill.
    pub negative_fill_color: Option<Color>,
    pub stroke_color: Color,
    pub stroke_thickness: f64,
    items: Vec<BarItem>,
    items_source: Option<ItemsSource<BarItem>>,
    extents: DataExtents,
    actual_fill: Color,
    slot: usize,
    slot_count: usize,
}

impl Default for BarSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl BarSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            is_visible: true,
            x_axis_key: None,
            y_axis_key: None,
            base_value: 0.0,
            bar_width: f64::NAN,
            fill_color: None,
            negative_fill_color: None,
            stroke_color: Color::TRANSPARENT,
            stroke_thickness: 0.0,
            items: Vec::new(),
            items_source: None,
            extents: DataExtents::default(),
            actual_fill: Color::BLACK,
            slot: 0,
            slot_count: 1,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = BarItem>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Bars for `values` at categories `0..values.len()`.
    #[must_use]
    pub fn with_values(self, values: impl IntoIterator<Item = f64>) -> Self {
        self.with_items(values.into_iter().map(BarItem::new))
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: impl Into<String>, y_axis_key: impl Into<String>) -> Self {
        self.x_axis_key = Some(x_axis_key.into());
        self.y_axis_key = Some(y_axis_key.into());
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill_color = Some(fill);
        self
    }

    #[must_use]
    pub fn with_base_value(mut self, base_value: f64) -> Self {
        self.base_value = base_value;
        self
    }

    #[must_use]
    pub fn with_items_source(mut self, source: ItemsSource<BarItem>) -> Self {
        self.items_source = Some(source);
        self
    }

    #[must_use]
    pub fn items(&self) -> &[BarItem] {
        &self.items
    }

    fn category_of(index: usize, item: &BarItem) -> usize {
        item.category_index.unwrap_or(index)
    }

    /// Category-unit interval `[left, right]` occupied by the bar of `category`.
    fn bar_span(&self, category: usize, x_axis: &Axis) -> (f64, f64) {
        let group_width = if self.bar_width.is_finite() && self.bar_width > 0.0 {
            self.bar_width
        } else {
            x_axis.category_bar_width()
        };
        let width = group_width / self.slot_count.max(1) as f64;
        let left = category as f64 - group_width * 0.5 + width * self.slot as f64;
        (left, left + width)
    }

    fn bar_rect(&self, index: usize, item: &BarItem, axes: &SeriesAxes<'_>) -> Option<PlotRect> {
        if !item.value.is_finite() {
            return None;
        }
        let (x_axis, y_axis) = axes.xy().ok()?;
        let (left, right) = self.bar_span(Self::category_of(index, item), x_axis);
        let corner = x_axis.transform_point(left, self.base_value, y_axis);
        let opposite = x_axis.transform_point(right, item.value, y_axis);
        (corner.is_defined() && opposite.is_defined())
            .then(|| PlotRect::from_points(corner, opposite))
    }

    fn fill_for(&self, item: &BarItem) -> Color {
        if let Some(color) = item.color {
            return color;
        }
        match self.negative_fill_color {
            Some(negative) if item.value < self.base_value => negative,
            _ => self.actual_fill,
        }
    }
}

impl Series for BarSeries {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn axis_binding(&self) -> AxisBinding {
        AxisBinding {
            prefers_category_x_axis: true,
            ..AxisBinding::xy(self.x_axis_key.as_deref(), self.y_axis_key.as_deref())
        }
    }

    fn set_default_values(&mut self, styles: &mut DefaultStyles) {
        self.actual_fill = match self.fill_color {
            Some(fill) => fill,
            None => styles.next_color(),
        };
    }

    fn update_data(&mut self) {
        if let Some(source) = &self.items_source {
            self.items = source.load();
        }
    }

    fn update_max_min(&mut self, domain: ValueDomain) {
        let mut extents = DataExtents::new(domain);
        for (index, item) in self.items.iter().enumerate() {
            if !item.value.is_finite() {
                continue;
            }
            extents.include_x(Self::category_of(index, item) as f64);
            extents.include_y(item.value);
            extents.include_y(self.base_value);
        }
        self.extents = extents;
    }

    fn extents(&self) -> DataExtents {
        self.extents
    }

    fn set_category_slot(&mut self, slot: usize, count: usize) {
        self.slot = slot;
        self.slot_count = count.max(1);
    }

    fn uses_category_slot(&self) -> bool {
        true
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        axes.xy()?;
        let stroke = StrokeStyle::solid(self.stroke_color, self.stroke_thickness);
        for (index, item) in self.items.iter().enumerate() {
            let Some(rect) = self.bar_rect(index, item, axes) else {
                continue;
            };
            if let Some(visible) = rect.intersect(axes.plot_area) {
                ctx.draw_rectangle(visible, self.fill_for(item), &stroke);
            }
        }
        Ok(())
    }

    fn render_legend(&self, ctx: &mut dyn RenderContext, symbol_area: PlotRect) {
        let inset = PlotRect::new(
            symbol_area.left,
            symbol_area.top + symbol_area.height * 0.2,
            symbol_area.width,
            symbol_area.height * 0.6,
        );
        ctx.draw_rectangle(
            inset,
            self.actual_fill,
            &StrokeStyle::solid(self.stroke_color, self.stroke_thickness),
        );
    }

    fn get_nearest_point(
        &self,
        point: ScreenPoint,
        _interpolate: bool,
        axes: &SeriesAxes<'_>,
    ) -> Option<TrackerHitResult> {
        let (x_axis, y_axis) = axes.xy().ok()?;
        let (index, item, rect) = self.items.iter().enumerate().find_map(|(index, item)| {
            let rect = self.bar_rect(index, item, axes)?;
            rect.contains(point).then_some((index, item, rect))
        })?;

        let category = Self::category_of(index, item) as f64;
        let data_point = DataPoint::new(category, item.value);
        let position = x_axis.transform_point(category, item.value, y_axis);
        let position = if position.is_defined() { position } else { rect.center() };
        Some(TrackerHitResult {
            series_index: 0,
            series_title: self.title.clone(),
            data_point,
            position,
            index: index as f64,
            value: Some(item.value),
            text: tracker_text(self.title.as_deref(), x_axis, y_axis, data_point, &[]),
        })
    }
}
