pub mod clipping;
mod context;
mod frame;
mod null_renderer;
mod palette;
mod primitives;

pub use context::RenderContext;
pub use frame::{DrawCommand, RenderFrame};
pub use null_renderer::NullRenderer;
pub use palette::{Palette, default_series_colors};
pub use primitives::{
    Color, LineStyle, MarkerStyle, MarkerType, StrokeStyle, TextHAlign, TextStyle, TextVAlign,
};

use crate::error::PlotResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully recorded `RenderFrame` so drawing code remains
/// isolated from plot model and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()>;
}
