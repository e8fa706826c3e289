use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::PlotResult;
use crate::model::DefaultStyles;
use crate::render::{Color, MarkerStyle, MarkerType, RenderContext, StrokeStyle};

use super::{
    AxisBinding, DataExtents, ItemsSource, Series, SeriesAxes, TrackerHitResult, ValueDomain,
    tracker_text,
};

/// Five-number summary at one x position, with optional mean and outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotItem {
    pub x: f64,
    pub lower_whisker: f64,
    pub box_bottom: f64,
    pub median: f64,
    pub box_top: f64,
    pub upper_whisker: f64,
    /// NaN hides the mean marker.
    pub mean: f64,
    pub outliers: Vec<f64>,
}

impl BoxPlotItem {
    #[must_use]
    pub fn new(
        x: f64,
        lower_whisker: f64,
        box_bottom: f64,
        median: f64,
        box_top: f64,
        upper_whisker: f64,
    ) -> Self {
        Self {
            x,
            lower_whisker,
            box_bottom,
            median,
            box_top,
            upper_whisker,
            mean: f64::NAN,
            outliers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mean(mut self, mean: f64) -> Self {
        self.mean = mean;
        self
    }

    #[must_use]
    pub fn with_outliers(mut self, outliers: impl IntoIterator<Item = f64>) -> Self {
        self.outliers = outliers.into_iter().collect();
        self
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        [
            self.x,
            self.lower_whisker,
            self.box_bottom,
            self.median,
            self.box_top,
            self.upper_whisker,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

/// Box-and-whisker plot.
#[derive(Debug, Clone)]
pub struct BoxPlotSeries {
    pub title: Option<String>,
    pub is_visible: bool,
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    /// Box width in x-axis units.
    pub box_width: f64,
    /// Whisker cap width relative to the box width.
    pub whisker_width: f64,
    pub fill: Option<Color>,
    pub stroke: Color,
    pub stroke_thickness: f64,
    pub outlier_type: MarkerType,
    pub outlier_size: f64,
    pub mean_type: MarkerType,
    pub mean_size: f64,
    pub show_box: bool,
    /// Draws the median as a dot instead of a line across the box.
    pub show_median_as_dot: bool,
    items: Vec<BoxPlotItem>,
    items_source: Option<ItemsSource<BoxPlotItem>>,
    extents: DataExtents,
    actual_fill: Color,
}

impl Default for BoxPlotSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxPlotSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            is_visible: true,
            x_axis_key: None,
            y_axis_key: None,
            box_width: 0.3,
            whisker_width: 0.5,
            fill: None,
            stroke: Color::BLACK,
            stroke_thickness: 1.0,
            outlier_type: MarkerType::Circle,
            outlier_size: 2.0,
            mean_type: MarkerType::Diamond,
            mean_size: 3.0,
            show_box: true,
            show_median_as_dot: false,
            items: Vec::new(),
            items_source: None,
            extents: DataExtents::default(),
            actual_fill: Color::WHITE,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = BoxPlotItem>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_box_width(mut self, box_width: f64) -> Self {
        self.box_width = box_width;
        self
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: impl Into<String>, y_axis_key: impl Into<String>) -> Self {
        self.x_axis_key = Some(x_axis_key.into());
        self.y_axis_key = Some(y_axis_key.into());
        self
    }

    #[must_use]
    pub fn with_items_source(mut self, source: ItemsSource<BoxPlotItem>) -> Self {
        self.items_source = Some(source);
        self
    }

    #[must_use]
    pub fn items(&self) -> &[BoxPlotItem] {
        &self.items
    }

    fn render_item(
        &self,
        ctx: &mut dyn RenderContext,
        axes: &SeriesAxes<'_>,
        item: &BoxPlotItem,
        stroke: &StrokeStyle,
    ) -> Option<()> {
        let half_box = self.box_width * 0.5;
        let half_whisker = half_box * self.whisker_width;
        let at = |x: f64, y: f64| axes.transform(x, y);

        let segments = [
            (at(item.x, item.lower_whisker)?, at(item.x, item.box_bottom)?),
            (at(item.x, item.box_top)?, at(item.x, item.upper_whisker)?),
            (
                at(item.x - half_whisker, item.lower_whisker)?,
                at(item.x + half_whisker, item.lower_whisker)?,
            ),
            (
                at(item.x - half_whisker, item.upper_whisker)?,
                at(item.x + half_whisker, item.upper_whisker)?,
            ),
        ];
        ctx.draw_line_segments(&segments, stroke);

        if self.show_box {
            let corners = [
                at(item.x - half_box, item.box_bottom)?,
                at(item.x + half_box, item.box_bottom)?,
                at(item.x + half_box, item.box_top)?,
                at(item.x - half_box, item.box_top)?,
            ];
            ctx.draw_polygon(&corners, self.actual_fill, stroke);
        }

        if self.show_median_as_dot {
            let median = at(item.x, item.median)?;
            ctx.draw_markers(&[median], &MarkerStyle::new(MarkerType::Circle, self.mean_size, self.stroke));
        } else {
            let median = [at(item.x - half_box, item.median)?, at(item.x + half_box, item.median)?];
            ctx.draw_line(&median, &StrokeStyle::solid(self.stroke, self.stroke_thickness * 2.0));
        }

        if item.mean.is_finite() && self.mean_type != MarkerType::None {
            if let Some(mean) = at(item.x, item.mean) {
                ctx.draw_markers(&[mean], &MarkerStyle::new(self.mean_type, self.mean_size, self.stroke));
            }
        }

        if self.outlier_type != MarkerType::None {
            let outliers: Vec<ScreenPoint> = item
                .outliers
                .iter()
                .filter_map(|value| at(item.x, *value))
                .filter(|point| axes.plot_area.contains(*point))
                .collect();
            let mut style = MarkerStyle::new(self.outlier_type, self.outlier_size, Color::TRANSPARENT);
            style.stroke = self.stroke;
            style.stroke_thickness = self.stroke_thickness;
            ctx.draw_markers(&outliers, &style);
        }
        Some(())
    }
}

impl Series for BoxPlotSeries {
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
        self.actual_fill = match self.fill {
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
        for item in self.items.iter().filter(|item| item.is_defined()) {
            extents.include_x(item.x - self.box_width * 0.5);
            extents.include_x(item.x + self.box_width * 0.5);
            extents.include_y(item.lower_whisker);
            extents.include_y(item.upper_whisker);
            for outlier in &item.outliers {
                extents.include_y(*outlier);
            }
        }
        self.extents = extents;
    }

    fn extents(&self) -> DataExtents {
        self.extents
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        axes.xy()?;
        let stroke = StrokeStyle::solid(self.stroke, self.stroke_thickness);
        for item in self.items.iter().filter(|item| item.is_defined()) {
            // Items with a coordinate invalid on these axes are skipped whole.
            let _ = self.render_item(ctx, axes, item, &stroke);
        }
        Ok(())
    }

    fn render_legend(&self, ctx: &mut dyn RenderContext, symbol_area: PlotRect) {
        let center = symbol_area.center();
        let half_height = symbol_area.height * 0.4;
        let half_width = symbol_area.width * 0.25;
        let stroke = StrokeStyle::solid(self.stroke, self.stroke_thickness);
        ctx.draw_line(
            &[
                ScreenPoint::new(center.x, center.y - half_height),
                ScreenPoint::new(center.x, center.y + half_height),
            ],
            &stroke,
        );
        ctx.draw_rectangle(
            PlotRect::new(center.x - half_width, center.y - half_height * 0.5, half_width * 2.0, half_height),
            self.actual_fill,
            &stroke,
        );
    }

    fn get_nearest_point(
        &self,
        point: ScreenPoint,
        _interpolate: bool,
        axes: &SeriesAxes<'_>,
    ) -> Option<TrackerHitResult> {
        let (x_axis, y_axis) = axes.xy().ok()?;
        let half_box = self.box_width * 0.5;

        let mut best: Option<(OrderedFloat<f64>, usize, &'static str, f64, ScreenPoint)> = None;
        for (index, item) in self.items.iter().enumerate().filter(|(_, item)| item.is_defined()) {
            let mut features: SmallVec<[(&'static str, f64); 8]> = SmallVec::new();
            features.extend([
                ("Upper whisker", item.upper_whisker),
                ("Third quartile", item.box_top),
                ("Median", item.median),
                ("First quartile", item.box_bottom),
                ("Lower whisker", item.lower_whisker),
            ]);
            if item.mean.is_finite() {
                features.push(("Mean", item.mean));
            }
            features.extend(item.outliers.iter().map(|value| ("Outlier", *value)));

            for (name, value) in features {
                if !axes.contains(item.x, value) {
                    continue;
                }
                let Some(screen) = axes.transform(item.x, value) else {
                    continue;
                };
                let distance = OrderedFloat(screen.distance_to_squared(point));
                if best.as_ref().is_none_or(|current| distance < current.0) {
                    best = Some((distance, index, name, value, screen));
                }
            }

            // A pointer inside the box selects the median.
            if let (Some(corner), Some(opposite)) = (
                axes.transform(item.x - half_box, item.box_bottom),
                axes.transform(item.x + half_box, item.box_top),
            ) {
                if PlotRect::from_points(corner, opposite).contains(point) {
                    if let Some(median) = axes.transform(item.x, item.median) {
                        best = Some((OrderedFloat(0.0), index, "Median", item.median, median));
                    }
                }
            }
        }

        let (_, index, feature, value, position) = best?;
        let item = &self.items[index];
        let data_point = DataPoint::new(item.x, value);
        let extra = [
            ("Feature", feature.to_owned()),
            ("Upper whisker", y_axis.format_value(item.upper_whisker)),
            ("Third quartile", y_axis.format_value(item.box_top)),
            ("Median", y_axis.format_value(item.median)),
            ("First quartile", y_axis.format_value(item.box_bottom)),
            ("Lower whisker", y_axis.format_value(item.lower_whisker)),
        ];
        Some(TrackerHitResult {
            series_index: 0,
            series_title: self.title.clone(),
            data_point,
            position,
            index: index as f64,
            value: Some(value),
            text: tracker_text(self.title.as_deref(), x_axis, y_axis, data_point, &extra),
        })
    }
}
