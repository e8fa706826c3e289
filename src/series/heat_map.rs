use serde::{Deserialize, Serialize};

use crate::core::numeric::min_max_2d;
use crate::core::types::{DataPoint, PlotRect, ScreenPoint};
use crate::error::{PlotError, PlotResult};
use crate::render::{RenderContext, StrokeStyle};

use super::{
    AxisBinding, ColorAxisUsage, DataExtents, Series, SeriesAxes, TrackerHitResult, ValueDomain,
    tracker_text,
};

/// Whether `x0..x1`/`y0..y1` locate the centers of the outer cells or the
/// outer edges of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeatMapCoordinateDefinition {
    #[default]
    Center,
    Edge,
}

/// Regular grid of values colored through a color axis.
///
/// `data[i][j]` is the cell at column `i` (along x) and row `j` (along y).
#[derive(Debug, Clone)]
pub struct HeatMapSeries {
    pub title: Option<String>,
    pub is_visible: bool,
    pub x_axis_key: Option<String>,
    pub y_axis_key: Option<String>,
    pub color_axis_key: Option<String>,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub coordinate_definition: HeatMapCoordinateDefinition,
    data: Vec<Vec<f64>>,
    extents: DataExtents,
}

impl HeatMapSeries {
    /// Creates a heat map; every row of `data` must have the same length.
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64, data: Vec<Vec<f64>>) -> PlotResult<Self> {
        if [x0, x1, y0, y1].iter().any(|value| !value.is_finite()) {
            return Err(PlotError::InvalidData(
                "heat map bounds must be finite".to_owned(),
            ));
        }
        let row_length = data.first().map_or(0, Vec::len);
        if data.iter().any(|column| column.len() != row_length) {
            return Err(PlotError::InvalidData(
                "heat map columns must all have the same length".to_owned(),
            ));
        }
        Ok(Self {
            title: None,
            is_visible: true,
            x_axis_key: None,
            y_axis_key: None,
            color_axis_key: None,
            x0,
            x1,
            y0,
            y1,
            coordinate_definition: HeatMapCoordinateDefinition::Center,
            data,
            extents: DataExtents::default(),
        })
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_coordinate_definition(mut self, definition: HeatMapCoordinateDefinition) -> Self {
        self.coordinate_definition = definition;
        self
    }

    #[must_use]
    pub fn with_color_axis_key(mut self, key: impl Into<String>) -> Self {
        self.color_axis_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    fn columns(&self) -> usize {
        self.data.len()
    }

    fn rows(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Outer edges `(low, high)` and cell size along one dimension.
    fn cell_layout(&self, start: f64, end: f64, count: usize) -> (f64, f64, f64) {
        match self.coordinate_definition {
            HeatMapCoordinateDefinition::Edge => {
                let size = (end - start) / count.max(1) as f64;
                (start, end, size)
            }
            HeatMapCoordinateDefinition::Center => {
                let size = if count > 1 {
                    (end - start) / (count - 1) as f64
                } else {
                    1.0
                };
                (start - size * 0.5, end + size * 0.5, size)
            }
        }
    }

    fn x_layout(&self) -> (f64, f64, f64) {
        self.cell_layout(self.x0, self.x1, self.columns())
    }

    fn y_layout(&self) -> (f64, f64, f64) {
        self.cell_layout(self.y0, self.y1, self.rows())
    }

    /// Bilinear interpolation between cell centers; NaN if any neighbour is NaN.
    fn interpolate_at(&self, x: f64, y: f64) -> f64 {
        let (x_low, _, dx) = self.x_layout();
        let (y_low, _, dy) = self.y_layout();
        let fx = ((x - x_low) / dx - 0.5).clamp(0.0, (self.columns() - 1) as f64);
        let fy = ((y - y_low) / dy - 0.5).clamp(0.0, (self.rows() - 1) as f64);
        let i0 = fx.floor() as usize;
        let j0 = fy.floor() as usize;
        let i1 = (i0 + 1).min(self.columns() - 1);
        let j1 = (j0 + 1).min(self.rows() - 1);
        let tx = fx - i0 as f64;
        let ty = fy - j0 as f64;

        let lower = self.data[i0][j0] * (1.0 - tx) + self.data[i1][j0] * tx;
        let upper = self.data[i0][j1] * (1.0 - tx) + self.data[i1][j1] * tx;
        lower * (1.0 - ty) + upper * ty
    }
}

impl Series for HeatMapSeries {
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

    fn update_max_min(&mut self, domain: ValueDomain) {
        let mut extents = DataExtents::new(domain);
        if self.columns() > 0 && self.rows() > 0 {
            let (x_low, x_high, _) = self.x_layout();
            let (y_low, y_high, _) = self.y_layout();
            extents.include_x(x_low);
            extents.include_x(x_high);
            extents.include_y(y_low);
            extents.include_y(y_high);
            if let Some((minimum, maximum)) = min_max_2d(&self.data) {
                extents.include_value(minimum);
                extents.include_value(maximum);
            }
        }
        self.extents = extents;
    }

    fn extents(&self) -> DataExtents {
        self.extents
    }

    fn render(&self, ctx: &mut dyn RenderContext, axes: &SeriesAxes<'_>) -> PlotResult<()> {
        axes.xy()?;
        let color_axis = axes.color_axis()?;
        let (x_low, _, dx) = self.x_layout();
        let (y_low, _, dy) = self.y_layout();
        let stroke = StrokeStyle::none();

        for (i, column) in self.data.iter().enumerate() {
            let left = x_low + dx * i as f64;
            for (j, value) in column.iter().enumerate() {
                if value.is_nan() {
                    continue;
                }
                let Some(fill) = color_axis.color_for_value(*value) else {
                    continue;
                };
                let bottom = y_low + dy * j as f64;
                let (Some(corner), Some(opposite)) = (
                    axes.transform(left, bottom),
                    axes.transform(left + dx, bottom + dy),
                ) else {
                    continue;
                };
                if let Some(visible) = PlotRect::from_points(corner, opposite).intersect(axes.plot_area) {
                    ctx.draw_rectangle(visible, fill, &stroke);
                }
            }
        }
        Ok(())
    }

    fn get_nearest_point(
        &self,
        point: ScreenPoint,
        interpolate: bool,
        axes: &SeriesAxes<'_>,
    ) -> Option<TrackerHitResult> {
        let (x_axis, y_axis) = axes.xy().ok()?;
        let color_axis = axes.color?;
        if self.columns() == 0 || self.rows() == 0 {
            return None;
        }
        let data = x_axis.inverse_transform_point(point, y_axis);
        let (x_low, x_high, dx) = self.x_layout();
        let (y_low, y_high, dy) = self.y_layout();
        let inside = |value: f64, low: f64, high: f64| value >= low.min(high) && value <= low.max(high);
        if !inside(data.x, x_low, x_high) || !inside(data.y, y_low, y_high) {
            return None;
        }

        let i = (((data.x - x_low) / dx).floor().max(0.0) as usize).min(self.columns() - 1);
        let j = (((data.y - y_low) / dy).floor().max(0.0) as usize).min(self.rows() - 1);
        let (value, data_point, position) = if interpolate {
            (self.interpolate_at(data.x, data.y), data, point)
        } else {
            let center = DataPoint::new(x_low + dx * (i as f64 + 0.5), y_low + dy * (j as f64 + 0.5));
            let position = axes.transform(center.x, center.y).unwrap_or(point);
            (self.data[i][j], center, position)
        };
        if value.is_nan() {
            return None;
        }

        let extra = [(
            color_axis.title.as_deref().unwrap_or("Value"),
            color_axis.format_value(value),
        )];
        Some(TrackerHitResult {
            series_index: 0,
            series_title: self.title.clone(),
            data_point,
            position,
            index: (i * self.rows() + j) as f64,
            value: Some(value),
            text: tracker_text(self.title.as_deref(), x_axis, y_axis, data_point, &extra),
        })
    }
}
