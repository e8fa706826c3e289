//! Plot aggregate: axis registry and key resolution, default styles, the
//! update pass, layout and hit testing.

mod axis_registry;
mod axis_rendering;
mod default_styles;
mod layout;
mod legend;
mod plot_model;

pub use axis_registry::{AxisId, AxisRegistry, AxisRole};
pub use default_styles::DefaultStyles;
pub use legend::{LegendOptions, LegendPosition};
pub use plot_model::{PlotModel, ResolvedAxes};
