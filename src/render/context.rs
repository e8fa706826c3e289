use crate::core::types::{PlotRect, ScreenPoint, ScreenVector};
use crate::render::{Color, MarkerStyle, StrokeStyle, TextStyle};

/// Drawing surface used by series, axes and annotations.
///
/// Implementations only draw; they never need to know about axes or data.
pub trait RenderContext {
    /// Draws an open polyline.
    fn draw_line(&mut self, points: &[ScreenPoint], stroke: &StrokeStyle);

    /// Draws disconnected line segments.
    fn draw_line_segments(&mut self, segments: &[(ScreenPoint, ScreenPoint)], stroke: &StrokeStyle) {
        for (start, end) in segments {
            self.draw_line(&[*start, *end], stroke);
        }
    }

    /// Draws a closed polygon.
    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: &StrokeStyle);

    fn draw_rectangle(&mut self, rect: PlotRect, fill: Color, stroke: &StrokeStyle);

    /// Draws one marker centered on each point.
    fn draw_markers(&mut self, points: &[ScreenPoint], style: &MarkerStyle);

    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle);

    /// Size of `text` when drawn with `style`, before rotation.
    ///
    /// The default is a monospace approximation; backends with real font
    /// metrics should override it.
    fn measure_text(&self, text: &str, style: &TextStyle) -> ScreenVector {
        let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        ScreenVector::new(
            longest as f64 * style.font_size * 0.6,
            lines as f64 * style.font_size * 1.2,
        )
    }

    /// Restricts subsequent drawing to `rect`.
    fn set_clip(&mut self, rect: PlotRect);

    fn reset_clip(&mut self);
}
