use crate::error::{PlotError, PlotResult};
use crate::render::{Color, Palette};

use super::{Axis, AxisKind};

/// A value interval mapped to a fixed color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    pub lower: f64,
    pub upper: f64,
    pub color: Color,
}

/// Value-to-color mapping carried by a color axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    pub palette: Palette,
    /// Color for values below the axis range (or below every range).
    pub low_color: Option<Color>,
    /// Color for values above the axis range (or above every range).
    pub high_color: Option<Color>,
    /// Color for NaN/infinite values; `None` leaves them undrawn.
    pub invalid_number_color: Option<Color>,
    ranges: Vec<ColorRange>,
}

impl ColorMap {
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            low_color: None,
            high_color: None,
            invalid_number_color: None,
            ranges: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_low_color(mut self, color: Color) -> Self {
        self.low_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_high_color(mut self, color: Color) -> Self {
        self.high_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_invalid_number_color(mut self, color: Color) -> Self {
        self.invalid_number_color = Some(color);
        self
    }

    #[must_use]
    pub fn ranges(&self) -> &[ColorRange] {
        &self.ranges
    }

    fn add_range(&mut self, lower: f64, upper: f64, color: Color) -> PlotResult<()> {
        if !lower.is_finite() || !upper.is_finite() || upper <= lower {
            return Err(PlotError::InvalidArgument(format!(
                "color range must be finite with lower < upper, got [{lower}, {upper})"
            )));
        }
        self.ranges.push(ColorRange { lower, upper, color });
        Ok(())
    }
}

/// Where a value landed in a color map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteIndex {
    Low,
    High,
    Range(usize),
    Palette(usize),
    Invalid,
}

impl Axis {
    /// Adds a `[lower, upper)` color band to this color axis.
    ///
    /// Bands take precedence over the palette.
    pub fn add_range(&mut self, lower: f64, upper: f64, color: Color) -> PlotResult<()> {
        match self.color_map.as_mut() {
            Some(map) => map.add_range(lower, upper, color),
            None => Err(PlotError::InvalidConfiguration(
                "color ranges require a color axis".to_owned(),
            )),
        }
    }

    /// Locates `value` in the color map; `None` for axes without one.
    #[must_use]
    pub fn palette_index(&self, value: f64) -> Option<PaletteIndex> {
        let map = self.color_map.as_ref()?;
        if !value.is_finite() {
            return Some(PaletteIndex::Invalid);
        }

        if !map.ranges.is_empty() {
            if let Some(index) = map
                .ranges
                .iter()
                .position(|range| value >= range.lower && value < range.upper)
            {
                return Some(PaletteIndex::Range(index));
            }
            let lowest = map.ranges.iter().map(|r| r.lower).fold(f64::INFINITY, f64::min);
            let highest = map.ranges.iter().map(|r| r.upper).fold(f64::NEG_INFINITY, f64::max);
            if value < lowest && map.low_color.is_some() {
                return Some(PaletteIndex::Low);
            }
            if value >= highest && map.high_color.is_some() {
                return Some(PaletteIndex::High);
            }
            if map.palette.is_empty() {
                return Some(PaletteIndex::Invalid);
            }
        }

        let count = map.palette.len();
        if count == 0 {
            return Some(PaletteIndex::Invalid);
        }

        let minimum = self.actual_minimum();
        let maximum = self.actual_maximum();

        if let AxisKind::Category(_) = self.kind {
            let index = value.round();
            if index < 0.0 {
                return Some(below_or_first(map, count, self.is_reversed()));
            }
            if index >= count as f64 {
                return Some(above_or_last(map, count, self.is_reversed()));
            }
            return Some(PaletteIndex::Palette(index as usize));
        }

        if value < minimum {
            return Some(below_or_first(map, count, self.is_reversed()));
        }
        if value > maximum {
            return Some(above_or_last(map, count, self.is_reversed()));
        }

        let span = self.pre_transform(maximum) - self.pre_transform(minimum);
        let fraction = if span > 0.0 {
            (self.pre_transform(value) - self.pre_transform(minimum)) / span
        } else {
            0.0
        };
        let index = ((fraction * count as f64).floor().max(0.0) as usize).min(count - 1);
        Some(PaletteIndex::Palette(if self.is_reversed() {
            count - 1 - index
        } else {
            index
        }))
    }

    /// Color resolved for a palette index.
    #[must_use]
    pub fn color_for_index(&self, index: PaletteIndex) -> Option<Color> {
        let map = self.color_map.as_ref()?;
        match index {
            PaletteIndex::Low => map.low_color,
            PaletteIndex::High => map.high_color,
            PaletteIndex::Range(index) => map.ranges.get(index).map(|range| range.color),
            PaletteIndex::Palette(index) => map.palette.get(index),
            PaletteIndex::Invalid => map.invalid_number_color,
        }
    }

    /// Color for `value`; `None` when the axis has no color map or the value
    /// maps to nothing drawable.
    #[must_use]
    pub fn color_for_value(&self, value: f64) -> Option<Color> {
        self.palette_index(value)
            .and_then(|index| self.color_for_index(index))
    }
}

fn below_or_first(map: &ColorMap, count: usize, reversed: bool) -> PaletteIndex {
    if map.low_color.is_some() {
        PaletteIndex::Low
    } else if reversed {
        PaletteIndex::Palette(count - 1)
    } else {
        PaletteIndex::Palette(0)
    }
}

fn above_or_last(map: &ColorMap, count: usize, reversed: bool) -> PaletteIndex {
    if map.high_color.is_some() {
        PaletteIndex::High
    } else if reversed {
        PaletteIndex::Palette(0)
    } else {
        PaletteIndex::Palette(count - 1)
    }
}
