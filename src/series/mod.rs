//! Data series: extents, rendering through a [`RenderContext`] and
//! nearest-point queries that use the same axis transforms as rendering.

mod bar;
mod box_plot;
mod heat_map;
mod histogram;
mod item_source;
mod line;
mod pie;
mod rectangle;
mod scatter;

pub use bar::{BarItem, BarSeries};
pub use box_plot::{BoxPlotItem, BoxPlotSeries};
pub use heat_map::{HeatMapCoordinateDefinition, HeatMapSeries};
pub use histogram::{
    BinningExtremeValueMode, BinningIntervalType, BinningOptions, BinningOutlierMode,
    HistogramItem, HistogramSeries, collect_histogram,
};
pub use item_source::ItemsSource;
pub use line::LineSeries;
pub use pie::{PieSeries, PieSlice};
pub use rectangle::{RectangleItem, RectangleSeries};
pub use scatter::{ScatterPoint, ScatterSeries};

use std::fmt;

use crate::core::axis::Axis;
use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::{PlotError, PlotResult};
use crate::model::DefaultStyles;
use crate::render::RenderContext;

/// How a series uses a color axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorAxisUsage {
    #[default]
    None,
    /// Used when one resolves; the series falls back to its own colors.
    Optional,
    /// The series cannot render without a color axis.
    Required,
}

/// Axis keys a series binds to, plus what it needs resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisBinding {
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    pub color_axis_key: Option<String>,
    pub requires_xy: bool,
    pub color: ColorAxisUsage,
    /// A default x-axis created for this series should be a category axis.
    pub prefers_category_x_axis: bool,
}

impl AxisBinding {
    #[must_use]
    pub fn xy(x_axis_key: Option<&str>, y_axis_key: Option<&str>) -> Self {
        Self {
            x_axis_key: x_axis_key.map(str::to_owned),
            y_axis_key: y_axis_key.map(str::to_owned),
            requires_xy: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, color_axis_key: Option<&str>, usage: ColorAxisUsage) -> Self {
        self.color_axis_key = color_axis_key.map(str::to_owned);
        self.color = usage;
        self
    }
}

/// Axes resolved for one series, passed at render and hit-test time.
#[derive(Debug, Clone, Copy)]
pub struct SeriesAxes<'a> {
    pub x: Option<&'a Axis>,
    pub y: Option<&'a Axis>,
    pub color: Option<&'a Axis>,
    pub plot_area: PlotRect,
}

impl<'a> SeriesAxes<'a> {
    #[must_use]
    pub fn new(x: Option<&'a Axis>, y: Option<&'a Axis>, plot_area: PlotRect) -> Self {
        Self {
            x,
            y,
            color: None,
            plot_area,
        }
    }

    #[must_use]
    pub fn with_color_axis(mut self, color: Option<&'a Axis>) -> Self {
        self.color = color;
        self
    }

    pub fn xy(&self) -> PlotResult<(&'a Axis, &'a Axis)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_transform_ready() && y.is_transform_ready() => Ok((x, y)),
            (Some(x), Some(_)) if !x.is_transform_ready() => Err(PlotError::UnresolvedAxis {
                role: "x",
                key: x.key.clone(),
            }),
            (Some(_), Some(y)) => Err(PlotError::UnresolvedAxis {
                role: "y",
                key: y.key.clone(),
            }),
            (None, _) => Err(PlotError::UnresolvedAxis {
                role: "x",
                key: None,
            }),
            (_, None) => Err(PlotError::UnresolvedAxis {
                role: "y",
                key: None,
            }),
        }
    }

    pub fn color_axis(&self) -> PlotResult<&'a Axis> {
        self.color.ok_or(PlotError::UnresolvedAxis {
            role: "color",
            key: None,
        })
    }

    /// Screen position of `(x, y)`, or `None` when the point is undefined on
    /// these axes.
    #[must_use]
    pub fn transform(&self, x: f64, y: f64) -> Option<ScreenPoint> {
        let (x_axis, y_axis) = self.xy().ok()?;
        if !x_axis.is_valid_value(x) || !y_axis.is_valid_value(y) {
            return None;
        }
        let point = x_axis.transform_point(x, y, y_axis);
        point.is_defined().then_some(point)
    }

    /// Whether `(x, y)` lies within both actual ranges.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.xy().is_ok_and(|(x_axis, y_axis)| {
            x_axis.is_value_in_range(x) && y_axis.is_value_in_range(y)
        })
    }
}

/// Values an axis can place on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisDomain {
    #[default]
    Finite,
    /// Logarithmic axes only show strictly positive values.
    Positive,
}

impl AxisDomain {
    #[must_use]
    pub fn of(axis: Option<&Axis>) -> Self {
        match axis {
            Some(axis) if axis.is_logarithmic() => Self::Positive,
            _ => Self::Finite,
        }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        match self {
            Self::Finite => value.is_finite(),
            Self::Positive => value.is_finite() && value > 0.0,
        }
    }
}

/// Domains of the axes a series is bound to, used while collecting extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueDomain {
    pub x: AxisDomain,
    pub y: AxisDomain,
    pub value: AxisDomain,
}

impl ValueDomain {
    #[must_use]
    pub fn of_axes(axes: &SeriesAxes<'_>) -> Self {
        Self {
            x: AxisDomain::of(axes.x),
            y: AxisDomain::of(axes.y),
            value: AxisDomain::of(axes.color),
        }
    }

    /// Whether a point is shown at all; points outside either domain are
    /// treated as undefined.
    #[must_use]
    pub fn contains_point(self, x: f64, y: f64) -> bool {
        self.x.contains(x) && self.y.contains(y)
    }
}

/// Data extents reported by a series for axis range aggregation.
///
/// Values outside the [`ValueDomain`] the extents were created with are
/// ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DataExtents {
    pub x: Option<(f64, f64)>,
    pub y: Option<(f64, f64)>,
    pub value: Option<(f64, f64)>,
    domain: ValueDomain,
}

impl DataExtents {
    #[must_use]
    pub fn new(domain: ValueDomain) -> Self {
        Self {
            domain,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn domain(&self) -> ValueDomain {
        self.domain
    }

    pub fn include_x(&mut self, value: f64) {
        if self.domain.x.contains(value) {
            include(&mut self.x, value);
        }
    }

    pub fn include_y(&mut self, value: f64) {
        if self.domain.y.contains(value) {
            include(&mut self.y, value);
        }
    }

    pub fn include_value(&mut self, value: f64) {
        if self.domain.value.contains(value) {
            include(&mut self.value, value);
        }
    }

    /// Includes a point only when both coordinates are in the domain.
    pub fn include_point(&mut self, point: DataPoint) {
        if self.domain.contains_point(point.x, point.y) {
            include(&mut self.x, point.x);
            include(&mut self.y, point.y);
        }
    }
}

fn include(extent: &mut Option<(f64, f64)>, value: f64) {
    *extent = Some(match *extent {
        Some((min, max)) => (min.min(value), max.max(value)),
        None => (value, value),
    });
}

/// Result of a nearest-point query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerHitResult {
    /// Position of the series in the plot model.
    pub series_index: usize,
    pub series_title: Option<String>,
    pub data_point: DataPoint,
    pub position: ScreenPoint,
    /// Item index; fractional when interpolated between two items.
    pub index: f64,
    /// Color/heat value or bar value where the series has one.
    pub value: Option<f64>,
    pub text: String,
}

impl TrackerHitResult {
    #[must_use]
    pub fn distance_to(&self, point: ScreenPoint) -> f64 {
        self.position.distance_to(point)
    }
}

/// Common contract for everything drawn inside the plot area.
pub trait Series: fmt::Debug {
    fn title(&self) -> Option<&str>;

    fn is_visible(&self) -> bool {
        true
    }

    fn axis_binding(&self) -> AxisBinding;

    /// Assigns automatic colors and styles for unset appearance fields.
    fn set_default_values(&mut self, _styles: &mut DefaultStyles) {}

    /// Refreshes data from an attached items source.
    fn update_data(&mut self) {}

    /// Recomputes data extents; undefined points and points outside
    /// `domain` are skipped.
    fn update_max_min(&mut self, domain: ValueDomain);

    fn extents(&self) -> DataExtents;

    /// Category slot among bar-like series sharing one category axis.
    fn set_category_slot(&mut self, _slot: usize, _count: usize) {}

    /// Whether this series takes a slot on its category axis.
    fn uses_category_slot(&self) -> bool {
        false
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()>;

    /// Draws the legend symbol into `symbol_area`.
    fn render_legend(&self, _ctx: &mut dyn RenderContext, _symbol_area: PlotRect) {}

    /// Nearest rendered item to `point`, or `None` without defined items or
    /// resolved axes.
    fn get_nearest_point(
        &self,
        point: ScreenPoint,
        interpolate: bool,
        axes: &SeriesAxes<'_>,
    ) -> Option<TrackerHitResult>;
}

/// Tracker text listing the series title and formatted coordinates.
pub(crate) fn tracker_text(
    title: Option<&str>,
    x_axis: &Axis,
    y_axis: &Axis,
    point: DataPoint,
    extra: &[(&str, String)],
) -> String {
    let mut lines = Vec::with_capacity(3 + extra.len());
    if let Some(title) = title {
        lines.push(title.to_owned());
    }
    lines.push(format!(
        "{}: {}",
        x_axis.title.as_deref().unwrap_or("X"),
        x_axis.format_value(point.x)
    ));
    lines.push(format!(
        "{}: {}",
        y_axis.title.as_deref().unwrap_or("Y"),
        y_axis.format_value(point.y)
    ));
    lines.extend(extra.iter().map(|(name, value)| format!("{name}: {value}")));
    lines.join("\n")
}

/// Center line of a legend symbol area.
pub(crate) fn legend_mid_line(area: PlotRect) -> [ScreenPoint; 2] {
    let y = area.top + area.height * 0.5;
    [
        ScreenPoint::new(area.left, y),
        ScreenPoint::new(area.right(), y),
    ]
}
