//! Axis model: range resolution, coordinate transforms and tick generation.
//!
//! One [`Axis`] type carries the state shared by every axis (requested and
//! actual ranges, padding, absolute bounds, screen transform) and composes a
//! kind-specific strategy ([`AxisKind`]) for tick generation and formatting,
//! plus an optional [`ColorMap`] that turns it into a color axis.
//!
//! An update pass runs, in order: [`Axis::reset_data_max_min`],
//! [`Axis::include`] for every series extent, [`Axis::update_actual_max_min`],
//! [`Axis::update_transform`] and [`Axis::update_intervals`]. After that the
//! axis is ready for [`Axis::transform`], [`Axis::inverse_transform`] and
//! [`Axis::tick_values`].

mod category;
mod color;
mod date_time;
mod format;
mod kind;
mod logarithmic;
mod polar;

pub use category::MAX_CATEGORIES;
pub use color::{ColorMap, ColorRange, PaletteIndex};
pub use date_time::{DateTimeIntervalType, DateTimeOptions};
pub use format::{LabelFormat, LabelFormatter};
pub use kind::{AngleOptions, AxisKind, CategoryOptions, LogarithmicOptions};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::numeric::approx_equal;
use crate::core::ticks::{
    DEFAULT_MAX_TICKS, TickValues, calculate_actual_interval, calculate_minor_interval,
    create_tick_values, filter_to_range,
};
use crate::core::types::{DataPoint, PlotRect, ScreenPoint, ScreenVector};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, Palette};

/// Where an axis is placed relative to the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisPosition {
    /// Not drawn; typical for color axes that only map values.
    None,
    #[default]
    Left,
    Right,
    Top,
    Bottom,
    /// Angular axis of a polar plot.
    Angle,
    /// Radial axis of a polar plot.
    Magnitude,
}

impl AxisPosition {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    #[must_use]
    pub fn is_polar(self) -> bool {
        matches!(self, Self::Angle | Self::Magnitude)
    }
}

/// How tick marks are drawn relative to the axis line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickStyle {
    None,
    Inside,
    #[default]
    Outside,
    Crossing,
}

/// Colors and strokes used when rendering an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    pub axis_line: Color,
    pub axis_line_thickness: f64,
    pub ticks: Color,
    pub text: Color,
    pub major_gridline: Color,
    pub minor_gridline: Color,
    pub gridline_thickness: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            axis_line: Color::BLACK,
            axis_line_thickness: 1.0,
            ticks: Color::BLACK,
            text: Color::BLACK,
            major_gridline: Color::rgba(0.0, 0.0, 0.0, 0.25),
            minor_gridline: Color::rgba(0.0, 0.0, 0.0, 0.10),
            gridline_thickness: 1.0,
        }
    }
}

/// Values recomputed on every update pass.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisState {
    data_minimum: f64,
    data_maximum: f64,
    view_minimum: f64,
    view_maximum: f64,
    actual_minimum: f64,
    actual_maximum: f64,
    range_reversed: bool,
    offset: f64,
    scale: f64,
    screen_start: f64,
    screen_end: f64,
    screen_length: f64,
    mid_point: ScreenPoint,
    actual_major_step: f64,
    actual_minor_step: f64,
    actual_interval_type: DateTimeIntervalType,
    actual_minor_interval_type: DateTimeIntervalType,
    transform_ready: bool,
    tier_offset: f64,
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            data_minimum: f64::NAN,
            data_maximum: f64::NAN,
            view_minimum: f64::NAN,
            view_maximum: f64::NAN,
            actual_minimum: f64::NAN,
            actual_maximum: f64::NAN,
            range_reversed: false,
            offset: 0.0,
            scale: 1.0,
            screen_start: 0.0,
            screen_end: 0.0,
            screen_length: 0.0,
            mid_point: ScreenPoint::default(),
            actual_major_step: f64::NAN,
            actual_minor_step: f64::NAN,
            actual_interval_type: DateTimeIntervalType::Auto,
            actual_minor_interval_type: DateTimeIntervalType::Auto,
            transform_ready: false,
            tier_offset: 0.0,
        }
    }
}

/// One plotted dimension (or color mapping) of a plot.
#[derive(Debug, Clone)]
pub struct Axis {
    /// Identifier used by series and annotations to bind to this axis.
    pub key: Option<String>,
    pub position: AxisPosition,
    /// Stacking order among axes sharing a position; tier 0 is closest to the plot.
    pub position_tier: usize,
    pub title: Option<String>,
    pub unit: Option<String>,
    /// Requested minimum; NaN selects the data-driven minimum.
    pub minimum: f64,
    /// Requested maximum; NaN selects the data-driven maximum.
    pub maximum: f64,
    pub absolute_minimum: f64,
    pub absolute_maximum: f64,
    pub minimum_range: f64,
    pub maximum_range: f64,
    /// Fraction of the data range added below the data minimum.
    pub minimum_padding: f64,
    /// Fraction of the data range added above the data maximum.
    pub maximum_padding: f64,
    /// Explicit major step; `<= 0` or NaN selects an automatic step.
    pub major_step: f64,
    /// Explicit minor step; `<= 0` or NaN selects an automatic step.
    pub minor_step: f64,
    pub minimum_major_step: f64,
    pub minimum_minor_step: f64,
    /// Target screen distance between major ticks, in pixels.
    pub interval_length: f64,
    /// Fraction of the plot area where the axis range starts.
    pub start_position: f64,
    /// Fraction of the plot area where the axis range ends.
    pub end_position: f64,
    pub position_at_zero_crossing: bool,
    pub is_axis_visible: bool,
    pub is_pan_enabled: bool,
    pub is_zoom_enabled: bool,
    pub label_format: LabelFormat,
    pub label_formatter: Option<LabelFormatter>,
    pub use_super_exponential_format: bool,
    pub major_gridlines: bool,
    pub minor_gridlines: bool,
    pub tick_style: TickStyle,
    pub major_tick_size: f64,
    pub minor_tick_size: f64,
    pub font_size: f64,
    pub style: AxisStyle,
    /// Shift of the polar midpoint as fractions of the plot area (magnitude axes).
    pub mid_shift: ScreenVector,
    pub kind: AxisKind,
    pub color_map: Option<ColorMap>,
    state: AxisState,
}

impl Axis {
    #[must_use]
    pub fn new(kind: AxisKind, position: AxisPosition) -> Self {
        Self {
            key: None,
            position,
            position_tier: 0,
            title: None,
            unit: None,
            minimum: f64::NAN,
            maximum: f64::NAN,
            absolute_minimum: f64::NEG_INFINITY,
            absolute_maximum: f64::INFINITY,
            minimum_range: 0.0,
            maximum_range: f64::INFINITY,
            minimum_padding: 0.01,
            maximum_padding: 0.01,
            major_step: f64::NAN,
            minor_step: f64::NAN,
            minimum_major_step: 0.0,
            minimum_minor_step: 0.0,
            interval_length: 60.0,
            start_position: 0.0,
            end_position: 1.0,
            position_at_zero_crossing: false,
            is_axis_visible: true,
            is_pan_enabled: true,
            is_zoom_enabled: true,
            label_format: LabelFormat::Auto,
            label_formatter: None,
            use_super_exponential_format: false,
            major_gridlines: false,
            minor_gridlines: false,
            tick_style: TickStyle::Outside,
            major_tick_size: 7.0,
            minor_tick_size: 4.0,
            font_size: 12.0,
            style: AxisStyle::default(),
            mid_shift: ScreenVector::default(),
            kind,
            color_map: None,
            state: AxisState::default(),
        }
    }

    #[must_use]
    pub fn linear(position: AxisPosition) -> Self {
        Self::new(AxisKind::Linear, position)
    }

    #[must_use]
    pub fn logarithmic(position: AxisPosition, base: f64) -> Self {
        Self::new(
            AxisKind::Logarithmic(LogarithmicOptions {
                base,
                power_padding: false,
            }),
            position,
        )
    }

    /// Category axis; categories sit at integer values `0..labels.len()`.
    #[must_use]
    pub fn category<S: Into<String>>(
        position: AxisPosition,
        labels: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut axis = Self::new(
            AxisKind::Category(CategoryOptions::new(
                labels.into_iter().map(Into::into).collect(),
            )),
            position,
        );
        axis.minimum_padding = 0.0;
        axis.maximum_padding = 0.0;
        axis
    }

    /// Date/time axis; values are days since 1899-12-30 UTC.
    #[must_use]
    pub fn date_time(position: AxisPosition) -> Self {
        Self::new(AxisKind::DateTime(DateTimeOptions::default()), position)
    }

    /// Duration axis; values are seconds.
    #[must_use]
    pub fn time_span(position: AxisPosition) -> Self {
        Self::new(AxisKind::TimeSpan, position)
    }

    /// Angular axis of a polar plot, mapping the range onto 0..360 degrees.
    #[must_use]
    pub fn angle() -> Self {
        let mut axis = Self::new(AxisKind::Angle(AngleOptions::default()), AxisPosition::Angle);
        axis.minimum_padding = 0.0;
        axis.maximum_padding = 0.0;
        axis
    }

    /// Linear radial axis of a polar plot, starting at zero.
    #[must_use]
    pub fn magnitude() -> Self {
        let mut axis = Self::linear(AxisPosition::Magnitude);
        axis.minimum = 0.0;
        axis.minimum_padding = 0.0;
        axis.maximum_padding = 0.05;
        axis
    }

    /// Linear color axis interpolating over `palette`.
    #[must_use]
    pub fn linear_color(palette: Palette) -> Self {
        let mut axis = Self::linear(AxisPosition::None);
        axis.minimum_padding = 0.0;
        axis.maximum_padding = 0.0;
        axis.color_map = Some(ColorMap::new(palette));
        axis
    }

    /// Logarithmic color axis interpolating over `palette` in log space.
    #[must_use]
    pub fn logarithmic_color(palette: Palette, base: f64) -> Self {
        let mut axis = Self::logarithmic(AxisPosition::None, base);
        axis.minimum_padding = 0.0;
        axis.maximum_padding = 0.0;
        axis.color_map = Some(ColorMap::new(palette));
        axis
    }

    /// Color axis driven by explicit value ranges (see [`Axis::add_range`]).
    #[must_use]
    pub fn range_color() -> Self {
        Self::linear_color(Palette::default())
    }

    /// Color axis assigning `palette[i]` to category `i`.
    #[must_use]
    pub fn category_color<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        palette: Palette,
    ) -> Self {
        let mut axis = Self::category(AxisPosition::None, labels);
        axis.color_map = Some(ColorMap::new(palette));
        axis
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: AxisPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_position_tier(mut self, tier: usize) -> Self {
        self.position_tier = tier;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    #[must_use]
    pub fn with_absolute_range(mut self, absolute_minimum: f64, absolute_maximum: f64) -> Self {
        self.absolute_minimum = absolute_minimum;
        self.absolute_maximum = absolute_maximum;
        self
    }

    #[must_use]
    pub fn with_range_limits(mut self, minimum_range: f64, maximum_range: f64) -> Self {
        self.minimum_range = minimum_range;
        self.maximum_range = maximum_range;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, minimum_padding: f64, maximum_padding: f64) -> Self {
        self.minimum_padding = minimum_padding;
        self.maximum_padding = maximum_padding;
        self
    }

    #[must_use]
    pub fn with_steps(mut self, major_step: f64, minor_step: f64) -> Self {
        self.major_step = major_step;
        self.minor_step = minor_step;
        self
    }

    #[must_use]
    pub fn with_minimum_steps(mut self, minimum_major_step: f64, minimum_minor_step: f64) -> Self {
        self.minimum_major_step = minimum_major_step;
        self.minimum_minor_step = minimum_minor_step;
        self
    }

    #[must_use]
    pub fn with_interval_length(mut self, interval_length: f64) -> Self {
        self.interval_length = interval_length;
        self
    }

    #[must_use]
    pub fn with_start_end(mut self, start_position: f64, end_position: f64) -> Self {
        self.start_position = start_position;
        self.end_position = end_position;
        self
    }

    #[must_use]
    pub fn with_zero_crossing(mut self, enabled: bool) -> Self {
        self.position_at_zero_crossing = enabled;
        self
    }

    #[must_use]
    pub fn with_label_format(mut self, format: LabelFormat) -> Self {
        self.label_format = format;
        self
    }

    #[must_use]
    pub fn with_label_formatter(
        mut self,
        formatter: impl Fn(f64) -> String + Send + Sync + 'static,
    ) -> Self {
        self.label_formatter = Some(LabelFormatter::new(formatter));
        self
    }

    #[must_use]
    pub fn with_super_exponential_format(mut self, enabled: bool) -> Self {
        self.use_super_exponential_format = enabled;
        self
    }

    #[must_use]
    pub fn with_gridlines(mut self, major: bool, minor: bool) -> Self {
        self.major_gridlines = major;
        self.minor_gridlines = minor;
        self
    }

    #[must_use]
    pub fn with_tick_style(mut self, tick_style: TickStyle) -> Self {
        self.tick_style = tick_style;
        self
    }

    #[must_use]
    pub fn with_mid_shift(mut self, horizontal: f64, vertical: f64) -> Self {
        self.mid_shift = ScreenVector::new(horizontal, vertical);
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.is_axis_visible = visible;
        self
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.position.is_horizontal()
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.position.is_vertical()
    }

    #[must_use]
    pub fn is_polar(&self) -> bool {
        self.position.is_polar()
    }

    #[must_use]
    pub fn is_color_axis(&self) -> bool {
        self.color_map.is_some()
    }

    #[must_use]
    pub fn is_logarithmic(&self) -> bool {
        matches!(self.kind, AxisKind::Logarithmic(_))
    }

    /// True when values grow towards the start of the screen range.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        (self.start_position > self.end_position) != self.state.range_reversed
    }

    #[must_use]
    pub fn actual_minimum(&self) -> f64 {
        self.state.actual_minimum
    }

    #[must_use]
    pub fn actual_maximum(&self) -> f64 {
        self.state.actual_maximum
    }

    #[must_use]
    pub fn data_minimum(&self) -> f64 {
        self.state.data_minimum
    }

    #[must_use]
    pub fn data_maximum(&self) -> f64 {
        self.state.data_maximum
    }

    /// Range set by pan/zoom, if any.
    #[must_use]
    pub fn view_range(&self) -> Option<(f64, f64)> {
        if self.state.view_minimum.is_nan() || self.state.view_maximum.is_nan() {
            None
        } else {
            Some((self.state.view_minimum, self.state.view_maximum))
        }
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    #[must_use]
    pub fn actual_major_step(&self) -> f64 {
        self.state.actual_major_step
    }

    #[must_use]
    pub fn actual_minor_step(&self) -> f64 {
        self.state.actual_minor_step
    }

    /// Screen coordinates where the axis range starts and ends.
    #[must_use]
    pub fn screen_range(&self) -> (f64, f64) {
        (self.state.screen_start, self.state.screen_end)
    }

    /// Whether `update_transform` has run since the last range change.
    #[must_use]
    pub fn is_transform_ready(&self) -> bool {
        self.state.transform_ready
    }

    /// Distance from the plot-area edge to this axis line, set by layout.
    #[must_use]
    pub fn tier_offset(&self) -> f64 {
        self.state.tier_offset
    }

    pub(crate) fn set_tier_offset(&mut self, offset: f64) {
        self.state.tier_offset = offset;
    }

    /// Maps a data value into the space where the axis is linear.
    #[must_use]
    pub fn pre_transform(&self, value: f64) -> f64 {
        match self.kind {
            AxisKind::Logarithmic(_) => value.max(f64::MIN_POSITIVE).ln(),
            _ => value,
        }
    }

    /// Inverse of [`Axis::pre_transform`].
    #[must_use]
    pub fn post_inverse_transform(&self, value: f64) -> f64 {
        match self.kind {
            AxisKind::Logarithmic(_) => value.exp(),
            _ => value,
        }
    }

    /// Whether `value` can be placed on this axis at all.
    #[must_use]
    pub fn is_valid_value(&self, value: f64) -> bool {
        value.is_finite() && (!self.is_logarithmic() || value > 0.0)
    }

    /// Whether `value` lies within the actual range (inclusive).
    #[must_use]
    pub fn is_value_in_range(&self, value: f64) -> bool {
        let tolerance = (self.state.actual_maximum - self.state.actual_minimum).abs() * 1e-12;
        value >= self.state.actual_minimum - tolerance
            && value <= self.state.actual_maximum + tolerance
    }

    /// Maps a data value to a screen coordinate (degrees for angle axes,
    /// radius for magnitude axes).
    #[must_use]
    pub fn transform(&self, value: f64) -> f64 {
        (self.pre_transform(value) + self.state.offset) * self.state.scale
    }

    /// Exact algebraic inverse of [`Axis::transform`].
    #[must_use]
    pub fn inverse_transform(&self, screen: f64) -> f64 {
        self.post_inverse_transform(screen / self.state.scale - self.state.offset)
    }

    /// Maps a data point to screen space using `self` as the x-axis and
    /// `other` as the y-axis (or angle axis when `self` is a magnitude axis).
    #[must_use]
    pub fn transform_point(&self, x: f64, y: f64, other: &Axis) -> ScreenPoint {
        if self.position == AxisPosition::Magnitude {
            return self.transform_polar(x, y, other);
        }
        if self.is_vertical() {
            ScreenPoint::new(other.transform(y), self.transform(x))
        } else {
            ScreenPoint::new(self.transform(x), other.transform(y))
        }
    }

    /// Inverse of [`Axis::transform_point`].
    #[must_use]
    pub fn inverse_transform_point(&self, point: ScreenPoint, other: &Axis) -> DataPoint {
        if self.position == AxisPosition::Magnitude {
            return self.inverse_transform_polar(point, other);
        }
        if self.is_vertical() {
            DataPoint::new(self.inverse_transform(point.y), other.inverse_transform(point.x))
        } else {
            DataPoint::new(self.inverse_transform(point.x), other.inverse_transform(point.y))
        }
    }

    /// Clears data extents before series re-aggregate them.
    pub fn reset_data_max_min(&mut self) {
        self.state.data_minimum = f64::NAN;
        self.state.data_maximum = f64::NAN;
    }

    /// Extends the data extent by `value`; invalid values are ignored.
    pub fn include(&mut self, value: f64) {
        if !self.is_valid_value(value) {
            return;
        }
        self.state.data_minimum = if self.state.data_minimum.is_nan() {
            value
        } else {
            self.state.data_minimum.min(value)
        };
        self.state.data_maximum = if self.state.data_maximum.is_nan() {
            value
        } else {
            self.state.data_maximum.max(value)
        };
    }

    pub fn include_range(&mut self, first: f64, second: f64) {
        self.include(first);
        self.include(second);
    }

    /// Checks that the configured bounds can be satisfied.
    pub fn validate(&self) -> PlotResult<()> {
        if self.absolute_minimum.is_nan() || self.absolute_maximum.is_nan() {
            return Err(PlotError::InvalidConfiguration(
                "absolute bounds must not be NaN".to_owned(),
            ));
        }
        if self.absolute_maximum <= self.absolute_minimum {
            return Err(PlotError::InvalidConfiguration(format!(
                "absolute maximum ({}) must be larger than absolute minimum ({})",
                self.absolute_maximum, self.absolute_minimum
            )));
        }
        if !(self.minimum_range >= 0.0) || self.maximum_range.is_nan() {
            return Err(PlotError::InvalidConfiguration(
                "minimum range must be >= 0 and maximum range must not be NaN".to_owned(),
            ));
        }
        if self.absolute_maximum - self.absolute_minimum < self.minimum_range {
            return Err(PlotError::InvalidConfiguration(
                "minimum range is wider than the absolute bounds".to_owned(),
            ));
        }
        if self.maximum_range < self.minimum_range {
            return Err(PlotError::InvalidConfiguration(
                "maximum range must be >= minimum range".to_owned(),
            ));
        }
        if !self.start_position.is_finite()
            || !self.end_position.is_finite()
            || self.start_position == self.end_position
        {
            return Err(PlotError::InvalidConfiguration(
                "start and end positions must be finite and distinct".to_owned(),
            ));
        }
        for (name, padding) in [
            ("minimum", self.minimum_padding),
            ("maximum", self.maximum_padding),
        ] {
            if !padding.is_finite() || padding < 0.0 {
                return Err(PlotError::InvalidConfiguration(format!(
                    "{name} padding must be finite and >= 0"
                )));
            }
        }
        match &self.kind {
            AxisKind::Logarithmic(options) if !(options.base > 1.0) || !options.base.is_finite() => {
                Err(PlotError::InvalidConfiguration(format!(
                    "logarithmic base must be finite and > 1, got {}",
                    options.base
                )))
            }
            AxisKind::Angle(options)
                if !options.start_angle.is_finite()
                    || !options.end_angle.is_finite()
                    || options.start_angle == options.end_angle =>
            {
                Err(PlotError::InvalidConfiguration(
                    "angle axis start and end angles must be finite and distinct".to_owned(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Resolves `actual_minimum`/`actual_maximum` from the view range, the
    /// requested range, or the padded data extent, then applies absolute
    /// bounds and range limits.
    pub fn update_actual_max_min(&mut self) -> PlotResult<()> {
        self.validate()?;

        let (mut minimum, mut maximum, reversed) = if let Some(view) = self.view_range() {
            (view.0, view.1, self.state.range_reversed)
        } else {
            let requested_reversed =
                self.minimum.is_finite() && self.maximum.is_finite() && self.minimum > self.maximum;
            let (auto_minimum, auto_maximum) = self.calculate_auto_range();
            let minimum = if self.minimum.is_finite() {
                self.minimum
            } else {
                auto_minimum
            };
            let maximum = if self.maximum.is_finite() {
                self.maximum
            } else {
                auto_maximum
            };
            if requested_reversed {
                (maximum, minimum, true)
            } else {
                (minimum, maximum, false)
            }
        };

        self.coerce_range(&mut minimum, &mut maximum);

        self.state.actual_minimum = minimum;
        self.state.actual_maximum = maximum;
        self.state.range_reversed = reversed;
        self.state.transform_ready = false;
        Ok(())
    }

    /// Computes screen endpoints and the `offset`/`scale` pair for `plot_area`.
    pub fn update_transform(&mut self, plot_area: PlotRect) -> PlotResult<()> {
        if !plot_area.is_valid() {
            return Err(PlotError::InvalidData(format!(
                "plot area must have positive size, got {}x{}",
                plot_area.width, plot_area.height
            )));
        }
        if !self.state.actual_minimum.is_finite() || !self.state.actual_maximum.is_finite() {
            self.update_actual_max_min()?;
        }

        let (start, end, length) = match self.position {
            AxisPosition::Angle => {
                let (start, end) = self.angle_bounds();
                (start, end, (end - start).abs())
            }
            AxisPosition::Magnitude => {
                let radius = plot_area.width.min(plot_area.height) * 0.5;
                self.state.mid_point = ScreenPoint::new(
                    plot_area.center().x + self.mid_shift.x * plot_area.width,
                    plot_area.center().y + self.mid_shift.y * plot_area.height,
                );
                (
                    radius * self.start_position,
                    radius * self.end_position,
                    radius * (self.end_position - self.start_position).abs(),
                )
            }
            AxisPosition::Left | AxisPosition::Right => (
                plot_area.bottom() - self.start_position * plot_area.height,
                plot_area.bottom() - self.end_position * plot_area.height,
                plot_area.height * (self.end_position - self.start_position).abs(),
            ),
            AxisPosition::Top | AxisPosition::Bottom | AxisPosition::None => (
                plot_area.left + self.start_position * plot_area.width,
                plot_area.left + self.end_position * plot_area.width,
                plot_area.width * (self.end_position - self.start_position).abs(),
            ),
        };

        let (start, end) = if self.state.range_reversed && self.position != AxisPosition::Angle {
            (end, start)
        } else {
            (start, end)
        };
        self.state.screen_start = start;
        self.state.screen_end = end;
        self.state.screen_length = length;
        self.refresh_transform();
        Ok(())
    }

    /// Computes `actual_major_step`/`actual_minor_step` for the current
    /// screen length, honoring explicit steps and minimum-step floors.
    pub fn update_intervals(&mut self) {
        let length = self.available_length();
        let range = self.state.actual_maximum - self.state.actual_minimum;

        let (major, minor) = match &self.kind {
            AxisKind::Logarithmic(options) => self.logarithmic_intervals(*options, length),
            AxisKind::Category(_) => self.category_intervals(length),
            AxisKind::DateTime(options) => {
                let options = *options;
                self.date_time_intervals(options, length)
            }
            AxisKind::TimeSpan => self.time_span_intervals(length),
            AxisKind::Linear | AxisKind::Angle(_) => {
                let major = if is_explicit_step(self.major_step) {
                    self.major_step
                } else {
                    calculate_actual_interval(length, self.interval_length, range)
                };
                let major = major.max(self.minimum_major_step);
                let minor = if is_explicit_step(self.minor_step) {
                    self.minor_step
                } else {
                    calculate_minor_interval(major)
                };
                (major, minor.max(self.minimum_minor_step))
            }
        };

        self.state.actual_major_step = major;
        self.state.actual_minor_step = minor;
        trace!(
            key = self.key.as_deref().unwrap_or(""),
            major_step = major,
            minor_step = minor,
            "axis intervals updated"
        );
    }

    /// Generates tick positions for the current actual range.
    ///
    /// The result is computed fresh on every call.
    pub fn tick_values(&self) -> PlotResult<TickValues> {
        let minimum = self.state.actual_minimum;
        let maximum = self.state.actual_maximum;
        if !minimum.is_finite() || !maximum.is_finite() {
            return Ok(TickValues::default());
        }

        match &self.kind {
            AxisKind::Logarithmic(options) => self.logarithmic_tick_values(*options),
            AxisKind::Category(options) => Ok(self.category_tick_values(options)),
            AxisKind::DateTime(_) => self.date_time_tick_values(),
            AxisKind::Linear | AxisKind::TimeSpan | AxisKind::Angle(_) => {
                let mut ticks = self.linear_tick_values(minimum, maximum)?;
                if let AxisKind::Angle(options) = &self.kind {
                    if options.is_full_circle() {
                        drop_wrapped_tick(&mut ticks.major_ticks, minimum, maximum);
                        drop_wrapped_tick(&mut ticks.major_labels, minimum, maximum);
                    }
                }
                Ok(ticks)
            }
        }
    }

    pub(crate) fn linear_tick_values(&self, minimum: f64, maximum: f64) -> PlotResult<TickValues> {
        let major_step = self.state.actual_major_step;
        if !is_explicit_step(major_step) {
            return Ok(TickValues::default());
        }
        let major = filter_to_range(
            create_tick_values(minimum, maximum, major_step, DEFAULT_MAX_TICKS)?,
            minimum,
            maximum,
        );
        let minor_step = self.state.actual_minor_step;
        let minor = if is_explicit_step(minor_step) {
            filter_to_range(
                create_tick_values(minimum, maximum, minor_step, DEFAULT_MAX_TICKS)?,
                minimum,
                maximum,
            )
            .into_iter()
            .filter(|value| !major.iter().any(|major| near_on_step(*major, *value, minor_step)))
            .collect()
        } else {
            Vec::new()
        };
        Ok(TickValues {
            major_labels: major.clone(),
            major_ticks: major,
            minor_ticks: minor,
        })
    }

    /// Screen coordinate of the axis line along the perpendicular direction.
    ///
    /// With `position_at_zero_crossing` the line passes through data value 0
    /// of `perpendicular` (clamped to the plot area), otherwise it sits on the
    /// plot-area edge for this axis position, moved outwards by the tier offset.
    #[must_use]
    pub fn axis_line_position(&self, perpendicular: Option<&Axis>, plot_area: PlotRect) -> f64 {
        let offset = self.state.tier_offset;
        let edge = match self.position {
            AxisPosition::Left => plot_area.left - offset,
            AxisPosition::Right => plot_area.right() + offset,
            AxisPosition::Top => plot_area.top - offset,
            AxisPosition::Bottom | AxisPosition::None => plot_area.bottom() + offset,
            AxisPosition::Angle | AxisPosition::Magnitude => return self.state.mid_point.y,
        };
        if !self.position_at_zero_crossing {
            return edge;
        }
        let Some(perpendicular) = perpendicular else {
            return edge;
        };
        let zero = perpendicular.transform(0.0);
        if !zero.is_finite() {
            return edge;
        }
        if self.is_horizontal() {
            zero.clamp(plot_area.top, plot_area.bottom())
        } else {
            zero.clamp(plot_area.left, plot_area.right())
        }
    }

    /// Formats a value for display on this axis.
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        if let Some(formatter) = &self.label_formatter {
            return formatter.format(value);
        }
        match &self.kind {
            AxisKind::Category(options) => self.category_label(options, value),
            AxisKind::DateTime(_) => self.format_date_time(value),
            AxisKind::TimeSpan => self.format_time_span(value),
            _ => format::format_number(
                value,
                &self.label_format,
                self.use_super_exponential_format,
                self.state.actual_major_step,
            ),
        }
    }

    /// Pans by the screen displacement between `previous` and `current`.
    ///
    /// Returns `false` when panning is disabled or the axis is not ready.
    pub fn pan(&mut self, previous: ScreenPoint, current: ScreenPoint) -> bool {
        let delta = if self.is_vertical() {
            current.y - previous.y
        } else {
            current.x - previous.x
        };
        self.pan_by(delta)
    }

    /// Pans by `delta` screen units along the axis direction.
    pub fn pan_by(&mut self, delta: f64) -> bool {
        if !self.is_pan_enabled || !self.state.transform_ready || !delta.is_finite() {
            return false;
        }
        let shift = delta / self.state.scale;
        let pre_minimum = self.pre_transform(self.state.actual_minimum);
        let pre_maximum = self.pre_transform(self.state.actual_maximum);
        let span = pre_maximum - pre_minimum;

        let mut new_pre_minimum = pre_minimum - shift;
        let mut new_pre_maximum = pre_maximum - shift;
        if self.absolute_minimum.is_finite()
            && self.post_inverse_transform(new_pre_minimum) < self.absolute_minimum
        {
            new_pre_minimum = self.pre_transform(self.absolute_minimum);
            new_pre_maximum = new_pre_minimum + span;
        }
        if self.absolute_maximum.is_finite()
            && self.post_inverse_transform(new_pre_maximum) > self.absolute_maximum
        {
            new_pre_maximum = self.pre_transform(self.absolute_maximum);
            new_pre_minimum = new_pre_maximum - span;
        }

        let minimum = self.post_inverse_transform(new_pre_minimum);
        let maximum = self.post_inverse_transform(new_pre_maximum);
        self.apply_view(minimum, maximum);
        true
    }

    /// Zooms to `[new_minimum, new_maximum]`, respecting absolute bounds and
    /// range limits.
    pub fn zoom(&mut self, new_minimum: f64, new_maximum: f64) -> bool {
        if !self.is_zoom_enabled || !new_minimum.is_finite() || !new_maximum.is_finite() {
            return false;
        }
        let (mut minimum, mut maximum) = if new_minimum <= new_maximum {
            (new_minimum, new_maximum)
        } else {
            (new_maximum, new_minimum)
        };
        self.coerce_range(&mut minimum, &mut maximum);
        self.apply_view(minimum, maximum);
        true
    }

    /// Zooms by `factor` (> 1 zooms in) keeping data value `center` fixed.
    pub fn zoom_at(&mut self, factor: f64, center: f64) -> bool {
        if !self.is_zoom_enabled || !factor.is_finite() || factor <= 0.0 || !center.is_finite() {
            return false;
        }
        let pre_center = self.pre_transform(center);
        let pre_minimum = self.pre_transform(self.state.actual_minimum);
        let pre_maximum = self.pre_transform(self.state.actual_maximum);
        let minimum = self.post_inverse_transform(pre_center + (pre_minimum - pre_center) / factor);
        let maximum = self.post_inverse_transform(pre_center + (pre_maximum - pre_center) / factor);
        self.zoom(minimum, maximum)
    }

    /// Zooms by `factor` around the center of the actual range.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        let pre_center = (self.pre_transform(self.state.actual_minimum)
            + self.pre_transform(self.state.actual_maximum))
            * 0.5;
        let center = self.post_inverse_transform(pre_center);
        self.zoom_at(factor, center)
    }

    /// Discards the pan/zoom view range.
    pub fn reset(&mut self) {
        self.state.view_minimum = f64::NAN;
        self.state.view_maximum = f64::NAN;
    }

    fn apply_view(&mut self, minimum: f64, maximum: f64) {
        self.state.view_minimum = minimum;
        self.state.view_maximum = maximum;
        self.state.actual_minimum = minimum;
        self.state.actual_maximum = maximum;
        if self.state.transform_ready {
            self.refresh_transform();
        }
    }

    fn refresh_transform(&mut self) {
        let start = self.state.screen_start;
        let end = self.state.screen_end;
        let pre_minimum = self.pre_transform(self.state.actual_minimum);
        let mut pre_maximum = self.pre_transform(self.state.actual_maximum);
        if !(pre_maximum - pre_minimum).is_normal() || pre_maximum <= pre_minimum {
            pre_maximum = pre_minimum + 1.0;
        }

        let scale = (end - start) / (pre_maximum - pre_minimum);
        if scale.is_finite() && scale != 0.0 {
            self.state.scale = scale;
            self.state.offset = start / scale - pre_minimum;
            self.state.transform_ready = true;
        } else {
            self.state.scale = 1.0;
            self.state.offset = 0.0;
            self.state.transform_ready = false;
        }
        trace!(
            key = self.key.as_deref().unwrap_or(""),
            actual_minimum = self.state.actual_minimum,
            actual_maximum = self.state.actual_maximum,
            offset = self.state.offset,
            scale = self.state.scale,
            "axis transform updated"
        );
    }

    fn available_length(&self) -> f64 {
        match self.position {
            AxisPosition::Angle => {
                // Arc length on a nominal 100 px radius.
                let (start, end) = self.angle_bounds();
                (end - start).abs().to_radians() * 100.0
            }
            _ => self.state.screen_length,
        }
    }

    fn calculate_auto_range(&self) -> (f64, f64) {
        if let AxisKind::Category(_) = self.kind {
            return self.category_auto_range();
        }

        let data_minimum = self.state.data_minimum;
        let data_maximum = self.state.data_maximum;
        if data_minimum.is_nan() || data_maximum.is_nan() {
            return (f64::NAN, f64::NAN);
        }

        let mut minimum = data_minimum;
        let mut maximum = data_maximum;
        if data_maximum - data_minimum < f64::EPSILON * data_maximum.abs().max(1.0) {
            let lower = if data_minimum > 0.0 { data_minimum } else { 1.0 };
            let upper = if data_maximum > 0.0 { data_maximum } else { 1.0 };
            minimum -= lower * 0.5;
            maximum += upper * 0.5;
            if self.is_logarithmic() && minimum <= 0.0 {
                minimum = data_minimum * 0.5;
            }
        }

        let pre_minimum = self.pre_transform(minimum);
        let pre_maximum = self.pre_transform(maximum);
        let span = pre_maximum - pre_minimum;
        let mut padded_minimum = self.post_inverse_transform(pre_minimum - self.minimum_padding * span);
        let mut padded_maximum = self.post_inverse_transform(pre_maximum + self.maximum_padding * span);

        if let AxisKind::Logarithmic(options) = self.kind {
            if options.power_padding {
                (padded_minimum, padded_maximum) =
                    logarithmic::snap_to_powers(options.base, padded_minimum, padded_maximum);
            }
        }
        (padded_minimum, padded_maximum)
    }

    fn coerce_range(&self, minimum: &mut f64, maximum: &mut f64) {
        let logarithmic = self.is_logarithmic();
        if !minimum.is_finite() {
            *minimum = if logarithmic { 1.0 } else { 0.0 };
        }
        if !maximum.is_finite() {
            *maximum = if logarithmic { minimum.max(1.0) * 100.0 } else { 100.0 };
        }
        if logarithmic {
            if *minimum <= 0.0 {
                *minimum = if *maximum > 1.0 { 1.0 } else { *maximum / 100.0 };
            }
            if !(*minimum > 0.0) {
                *minimum = 1.0;
            }
            if *maximum <= *minimum {
                *maximum = *minimum * 100.0;
            }
        } else if *maximum <= *minimum {
            let center = *minimum;
            let half = if center.abs() > 0.0 { center.abs() * 0.5 } else { 0.5 };
            *minimum = center - half;
            *maximum = center + half;
        }

        if *minimum < self.absolute_minimum {
            *minimum = self.absolute_minimum;
        }
        if *maximum > self.absolute_maximum {
            *maximum = self.absolute_maximum;
        }
        if *maximum <= *minimum {
            if minimum.is_finite() && self.absolute_maximum > *minimum {
                *maximum = self.absolute_maximum.min(*minimum + 1.0);
            } else {
                *minimum = self.absolute_minimum.max(*maximum - 1.0);
            }
        }

        let range = *maximum - *minimum;
        if range < self.minimum_range {
            let center = (*maximum + *minimum) * 0.5;
            *minimum = center - self.minimum_range * 0.5;
            *maximum = center + self.minimum_range * 0.5;
            if *minimum < self.absolute_minimum {
                *maximum += self.absolute_minimum - *minimum;
                *minimum = self.absolute_minimum;
            }
            if *maximum > self.absolute_maximum {
                *minimum -= *maximum - self.absolute_maximum;
                *maximum = self.absolute_maximum;
            }
        } else if range > self.maximum_range {
            let center = (*maximum + *minimum) * 0.5;
            *minimum = center - self.maximum_range * 0.5;
            *maximum = center + self.maximum_range * 0.5;
            if *minimum < self.absolute_minimum {
                *maximum += self.absolute_minimum - *minimum;
                *minimum = self.absolute_minimum;
            }
            if *maximum > self.absolute_maximum {
                *minimum -= *maximum - self.absolute_maximum;
                *maximum = self.absolute_maximum;
            }
        }
    }
}

pub(crate) fn is_explicit_step(step: f64) -> bool {
    step.is_finite() && step > 0.0
}

fn near_on_step(lhs: f64, rhs: f64, step: f64) -> bool {
    (lhs - rhs).abs() <= step * 1e-6 || approx_equal(lhs, rhs)
}

/// Drops the last tick when it lands on the same angle as the first one.
fn drop_wrapped_tick(values: &mut Vec<f64>, minimum: f64, maximum: f64) {
    if values.len() < 2 {
        return;
    }
    let first = values[0];
    let last = values[values.len() - 1];
    let span = maximum - minimum;
    if approx_equal(last - first, span) {
        values.pop();
    }
}
