use crate::render::{Color, LineStyle, MarkerType, default_series_colors};

/// Automatic appearance assignment for series without explicit styles.
///
/// Colors are handed out in series registration order. Once the palette
/// wraps, line series move on to the next dash pattern so every series stays
/// distinguishable. The model resets this state at the start of each update
/// pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultStyles {
    colors: Vec<Color>,
    color_index: usize,
    marker_index: usize,
}

impl Default for DefaultStyles {
    fn default() -> Self {
        Self::new(default_series_colors())
    }
}

impl DefaultStyles {
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Self {
        Self {
            colors,
            color_index: 0,
            marker_index: 0,
        }
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn set_colors(&mut self, colors: Vec<Color>) {
        self.colors = colors;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.color_index = 0;
        self.marker_index = 0;
    }

    pub fn next_color(&mut self) -> Color {
        self.next_color_and_line_style().0
    }

    /// Next palette color, plus the dash pattern for the current palette cycle.
    pub fn next_color_and_line_style(&mut self) -> (Color, LineStyle) {
        if self.colors.is_empty() {
            return (Color::BLACK, LineStyle::Solid);
        }
        let index = self.color_index;
        self.color_index += 1;
        let color = self.colors[index % self.colors.len()];
        let cycle = index / self.colors.len();
        let style = LineStyle::PREDEFINED[cycle % LineStyle::PREDEFINED.len()];
        (color, style)
    }

    pub fn next_marker_type(&mut self) -> MarkerType {
        let marker = MarkerType::PREDEFINED[self.marker_index % MarkerType::PREDEFINED.len()];
        self.marker_index += 1;
        marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_style_advances_when_palette_wraps() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let blue = Color::rgb(0.0, 0.0, 1.0);
        let mut styles = DefaultStyles::new(vec![red, blue]);
        assert_eq!(styles.next_color_and_line_style(), (red, LineStyle::Solid));
        assert_eq!(styles.next_color_and_line_style(), (blue, LineStyle::Solid));
        assert_eq!(styles.next_color_and_line_style(), (red, LineStyle::Dash));
        styles.reset();
        assert_eq!(styles.next_color(), red);
    }

    #[test]
    fn empty_palette_falls_back_to_black() {
        let mut styles = DefaultStyles::new(Vec::new());
        assert_eq!(styles.next_color(), Color::BLACK);
    }
}
