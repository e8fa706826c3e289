pub mod axis;
pub mod numeric;
pub mod primitives;
pub mod ticks;
pub mod types;

pub use axis::{
    AngleOptions, Axis, AxisKind, AxisPosition, AxisStyle, CategoryOptions, ColorMap, ColorRange,
    DateTimeIntervalType, DateTimeOptions, LabelFormat, LabelFormatter, LogarithmicOptions,
    PaletteIndex, TickStyle,
};
pub use ticks::{TickValues, create_tick_values};
pub use types::{DataPoint, PlotRect, ScreenPoint, ScreenVector, Thickness, Viewport};
