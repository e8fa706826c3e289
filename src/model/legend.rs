use serde::{Deserialize, Serialize};

use crate::core::types::{PlotRect, ScreenPoint};
use crate::render::{Color, RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign};
use crate::series::Series;

/// Corner of the plot area the legend box is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendPosition {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendOptions {
    pub is_visible: bool,
    pub position: LegendPosition,
    pub font_size: f64,
    pub symbol_width: f64,
    pub padding: f64,
    /// Distance between the legend box and the plot-area edges.
    pub margin: f64,
    pub background: Color,
    pub border: Color,
    pub text_color: Color,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            is_visible: true,
            position: LegendPosition::TopRight,
            font_size: 12.0,
            symbol_width: 16.0,
            padding: 6.0,
            margin: 8.0,
            background: Color::rgba(1.0, 1.0, 1.0, 0.8),
            border: Color::GRAY,
            text_color: Color::BLACK,
        }
    }
}

/// Draws one row per visible titled series.
pub(crate) fn render_legend(
    ctx: &mut dyn RenderContext,
    series: &[Box<dyn Series>],
    options: &LegendOptions,
    plot_area: PlotRect,
) {
    if !options.is_visible {
        return;
    }
    let entries: Vec<(&dyn Series, &str)> = series
        .iter()
        .filter(|series| series.is_visible())
        .filter_map(|series| series.title().map(|title| (series.as_ref(), title)))
        .collect();
    if entries.is_empty() {
        return;
    }

    let style = TextStyle::new(options.font_size, options.text_color)
        .aligned(TextHAlign::Left, TextVAlign::Middle);
    let text_width = entries
        .iter()
        .map(|(_, title)| ctx.measure_text(title, &style).x)
        .fold(0.0, f64::max);
    let row_height = options.font_size * 1.4;
    let width = options.padding * 3.0 + options.symbol_width + text_width;
    let height = options.padding * 2.0 + row_height * entries.len() as f64;

    let left = match options.position {
        LegendPosition::TopRight | LegendPosition::BottomRight => {
            plot_area.right() - options.margin - width
        }
        LegendPosition::TopLeft | LegendPosition::BottomLeft => plot_area.left + options.margin,
    };
    let top = match options.position {
        LegendPosition::TopRight | LegendPosition::TopLeft => plot_area.top + options.margin,
        LegendPosition::BottomRight | LegendPosition::BottomLeft => {
            plot_area.bottom() - options.margin - height
        }
    };

    ctx.draw_rectangle(
        PlotRect::new(left, top, width, height),
        options.background,
        &StrokeStyle::solid(options.border, 1.0),
    );
    for (row, (series, title)) in entries.into_iter().enumerate() {
        let row_top = top + options.padding + row_height * row as f64;
        let symbol_area = PlotRect::new(left + options.padding, row_top, options.symbol_width, row_height);
        series.render_legend(ctx, symbol_area);
        let anchor = ScreenPoint::new(symbol_area.right() + options.padding, row_top + row_height * 0.5);
        ctx.draw_text(anchor, title, &style);
    }
}
