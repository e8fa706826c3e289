use serde::{Deserialize, Serialize};

use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::{PlotError, PlotResult};
use crate::model::DefaultStyles;
use crate::render::{Color, RenderContext, StrokeStyle};

use super::{
    AxisBinding, DataExtents, ItemsSource, Series, SeriesAxes, TrackerHitResult, ValueDomain,
    tracker_text,
};

/// One histogram bin; its height is `area / width` and may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramItem {
    pub range_start: f64,
    pub range_end: f64,
    pub area: f64,
    pub count: usize,
}

impl HistogramItem {
    #[must_use]
    pub const fn new(range_start: f64, range_end: f64, area: f64, count: usize) -> Self {
        Self {
            range_start,
            range_end,
            area,
            count,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.range_end - self.range_start
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.area / self.width()
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.range_start.is_finite()
            && self.range_end.is_finite()
            && self.width() != 0.0
            && self.height().is_finite()
    }

    /// Whether `(x, y)` falls inside the bin, for bins above or below zero.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (left, right) = ordered(self.range_start, self.range_end);
        let (bottom, top) = ordered(0.0, self.height());
        x >= left && x <= right && y >= bottom && y <= top
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// What to do with samples outside every bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BinningOutlierMode {
    /// Fail with an error.
    #[default]
    RejectOutliers,
    /// Drop them entirely.
    IgnoreOutliers,
    /// Count them towards the total used for bin areas.
    CountOutliers,
}

/// Which end of a bin interval is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BinningIntervalType {
    #[default]
    InclusiveLowerBound,
    InclusiveUpperBound,
}

/// Whether the open outer edge of the outermost bin still accepts samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BinningExtremeValueMode {
    #[default]
    IncludeExtremeValues,
    ExcludeExtremeValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BinningOptions {
    pub outlier_mode: BinningOutlierMode,
    pub interval_type: BinningIntervalType,
    pub extreme_value_mode: BinningExtremeValueMode,
}

/// Bins `samples` between consecutive `breaks`.
///
/// Each bin's area is its share of the counted samples, so the histogram
/// integrates to one. NaN samples are skipped.
pub fn collect_histogram(
    samples: &[f64],
    breaks: &[f64],
    options: BinningOptions,
) -> PlotResult<Vec<HistogramItem>> {
    if breaks.len() < 2 {
        return Err(PlotError::InvalidArgument(
            "histogram needs at least two bin breaks".to_owned(),
        ));
    }
    if breaks.iter().any(|value| !value.is_finite())
        || breaks.windows(2).any(|pair| pair[1] <= pair[0])
    {
        return Err(PlotError::InvalidArgument(
            "bin breaks must be finite and strictly increasing".to_owned(),
        ));
    }

    let bin_count = breaks.len() - 1;
    let mut counts = vec![0_usize; bin_count];
    let mut total = 0_usize;
    let include_extremes = options.extreme_value_mode == BinningExtremeValueMode::IncludeExtremeValues;

    for &sample in samples.iter().filter(|sample| !sample.is_nan()) {
        let bin = match options.interval_type {
            BinningIntervalType::InclusiveLowerBound => {
                let upper = breaks.partition_point(|edge| *edge <= sample);
                if (1..=bin_count).contains(&upper) {
                    Some(upper - 1)
                } else if include_extremes && sample == breaks[bin_count] {
                    Some(bin_count - 1)
                } else {
                    None
                }
            }
            BinningIntervalType::InclusiveUpperBound => {
                let upper = breaks.partition_point(|edge| *edge < sample);
                if (1..=bin_count).contains(&upper) {
                    Some(upper - 1)
                } else if include_extremes && sample == breaks[0] {
                    Some(0)
                } else {
                    None
                }
            }
        };

        match (bin, options.outlier_mode) {
            (Some(bin), _) => {
                counts[bin] += 1;
                total += 1;
            }
            (None, BinningOutlierMode::RejectOutliers) => {
                return Err(PlotError::InvalidData(format!(
                    "sample {sample} lies outside the histogram bins"
                )));
            }
            (None, BinningOutlierMode::IgnoreOutliers) => {}
            (None, BinningOutlierMode::CountOutliers) => total += 1,
        }
    }

    Ok(breaks
        .windows(2)
        .zip(counts)
        .map(|(edges, count)| {
            let area = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            HistogramItem::new(edges[0], edges[1], area, count)
        })
        .collect())
}

/// Adjacent bins drawn from zero to `area / width`.
#[derive(Debug, Clone)]
pub struct HistogramSeries {
    pub title: Option<String>,
    pub is_visible: bool,
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    pub fill_color: Option<Color>,
    pub stroke_color: Color,
    pub stroke_thickness: f64,
    items: Vec<HistogramItem>,
    items_source: Option<ItemsSource<HistogramItem>>,
    extents: DataExtents,
    actual_fill: Color,
}

impl Default for HistogramSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            is_visible: true,
            x_axis_key: None,
            y_axis_key: None,
            fill_color: None,
            stroke_color: Color::BLACK,
            stroke_thickness: 1.0,
            items: Vec::new(),
            items_source: None,
            extents: DataExtents::default(),
            actual_fill: Color::BLACK,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = HistogramItem>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill_color = Some(fill);
        self
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: impl Into<String>, y_axis_key: impl Into<String>) -> Self {
        self.x_axis_key = Some(x_axis_key.into());
        self.y_axis_key = Some(y_axis_key.into());
        self
    }

    #[must_use]
    pub fn with_items_source(mut self, source: ItemsSource<HistogramItem>) -> Self {
        self.items_source = Some(source);
        self
    }

    #[must_use]
    pub fn items(&self) -> &[HistogramItem] {
        &self.items
    }

    fn bin_rect(item: &HistogramItem, axes: &SeriesAxes<'_>) -> Option<PlotRect> {
        if !item.is_defined() {
            return None;
        }
        let corner = axes.transform(item.range_start, 0.0)?;
        let opposite = axes.transform(item.range_end, item.height())?;
        Some(PlotRect::from_points(corner, opposite))
    }
}

impl Series for HistogramSeries {
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
        for item in self.items.iter().filter(|item| item.is_defined()) {
            extents.include_x(item.range_start);
            extents.include_x(item.range_end);
            extents.include_y(0.0);
            extents.include_y(item.height());
        }
        self.extents = extents;
    }

    fn extents(&self) -> DataExtents {
        self.extents
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        axes.xy()?;
        let stroke = StrokeStyle::solid(self.stroke_color, self.stroke_thickness);
        for item in &self.items {
            let Some(rect) = Self::bin_rect(item, axes) else {
                continue;
            };
            if let Some(visible) = rect.intersect(axes.plot_area) {
                ctx.draw_rectangle(visible, self.actual_fill, &stroke);
            }
        }
        Ok(())
    }

    fn render_legend(&self, ctx: &mut dyn RenderContext, symbol_area: PlotRect) {
        ctx.draw_rectangle(
            symbol_area,
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
        let data = x_axis.inverse_transform_point(point, y_axis);
        let (index, item) = self
            .items
            .iter()
            .enumerate()
            .find(|(_, item)| item.is_defined() && item.contains(data.x, data.y))?;

        let center = (item.range_start + item.range_end) * 0.5;
        let data_point = DataPoint::new(center, item.height());
        let position = axes.transform(center, item.height()).unwrap_or(point);
        let extra = [
            (
                "Range",
                format!(
                    "{} - {}",
                    x_axis.format_value(item.range_start),
                    x_axis.format_value(item.range_end)
                ),
            ),
            ("Count", item.count.to_string()),
        ];
        Some(TrackerHitResult {
            series_index: 0,
            series_title: self.title.clone(),
            data_point,
            position,
            index: index as f64,
            value: Some(item.area),
            text: tracker_text(self.title.as_deref(), x_axis, y_axis, data_point, &extra),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_bound_intervals_move_edge_samples_down() {
        let options = BinningOptions {
            interval_type: BinningIntervalType::InclusiveUpperBound,
            ..BinningOptions::default()
        };
        let bins = collect_histogram(&[0.0, 1.0, 1.5, 2.0], &[0.0, 1.0, 2.0], options).expect("bins");
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn excluded_extremes_become_outliers() {
        let options = BinningOptions {
            outlier_mode: BinningOutlierMode::CountOutliers,
            extreme_value_mode: BinningExtremeValueMode::ExcludeExtremeValues,
            ..BinningOptions::default()
        };
        let bins = collect_histogram(&[0.5, 2.0], &[0.0, 1.0, 2.0], options).expect("bins");
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 0);
        assert!((bins[0].area - 0.5).abs() < 1e-12);
    }
}
