use crate::render::Color;

/// Ordered list of colors used by color axes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Samples `count` colors evenly along the piecewise-linear gradient
    /// through `stops`.
    #[must_use]
    pub fn interpolate(count: usize, stops: &[Color]) -> Self {
        let colors = match (count, stops) {
            (0, _) | (_, []) => Vec::new(),
            (_, [single]) => vec![*single; count],
            (1, [first, ..]) => vec![*first],
            _ => (0..count)
                .map(|index| {
                    let t = index as f64 / (count - 1) as f64;
                    sample_gradient(stops, t)
                })
                .collect(),
        };
        Self { colors }
    }

    #[must_use]
    pub fn gray(count: usize) -> Self {
        Self::interpolate(count, &[Color::BLACK, Color::WHITE])
    }

    #[must_use]
    pub fn hot(count: usize) -> Self {
        Self::interpolate(
            count,
            &[
                Color::BLACK,
                Color::rgb(0.5, 0.0, 0.0),
                Color::rgb(1.0, 0.0, 0.0),
                Color::rgb(1.0, 0.5, 0.0),
                Color::rgb(1.0, 1.0, 0.0),
                Color::WHITE,
            ],
        )
    }

    #[must_use]
    pub fn jet(count: usize) -> Self {
        Self::interpolate(
            count,
            &[
                Color::rgb(0.0, 0.0, 0.5),
                Color::rgb(0.0, 0.0, 1.0),
                Color::rgb(0.0, 1.0, 1.0),
                Color::rgb(1.0, 1.0, 0.0),
                Color::rgb(1.0, 0.0, 0.0),
                Color::rgb(0.5, 0.0, 0.0),
            ],
        )
    }

    #[must_use]
    pub fn blue_white_red(count: usize) -> Self {
        Self::interpolate(
            count,
            &[Color::rgb(0.0, 0.0, 1.0), Color::WHITE, Color::rgb(1.0, 0.0, 0.0)],
        )
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.colors.reverse();
        self
    }
}

fn sample_gradient(stops: &[Color], t: f64) -> Color {
    let segments = (stops.len() - 1) as f64;
    let position = (t * segments).clamp(0.0, segments);
    let index = (position.floor() as usize).min(stops.len() - 2);
    stops[index].interpolate(stops[index + 1], position - index as f64)
}

/// Series colors assigned in registration order when none is configured.
#[must_use]
pub fn default_series_colors() -> Vec<Color> {
    [
        (0x4E, 0x9A, 0x06),
        (0xC8, 0x8D, 0x00),
        (0xCC, 0x00, 0x00),
        (0x20, 0x4A, 0x87),
        (0x5C, 0x35, 0x66),
        (0xA4, 0x00, 0x00),
        (0x8F, 0x59, 0x02),
        (0x34, 0x65, 0xA4),
        (0x75, 0x50, 0x7B),
        (0x73, 0xD2, 0x16),
        (0xF5, 0x79, 0x00),
        (0xEF, 0x29, 0x29),
    ]
    .into_iter()
    .map(|(red, green, blue)| Color::from_rgb8(red, green, blue))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolated_palette_hits_both_ends() {
        let palette = Palette::gray(3);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.get(0), Some(Color::BLACK));
        assert_eq!(palette.get(1), Some(Color::rgb(0.5, 0.5, 0.5)));
        assert_eq!(palette.get(2), Some(Color::WHITE));
    }

    #[test]
    fn degenerate_palette_requests_are_handled() {
        assert!(Palette::interpolate(0, &[Color::BLACK]).is_empty());
        assert!(Palette::interpolate(4, &[]).is_empty());
        assert_eq!(Palette::interpolate(2, &[Color::WHITE]).len(), 2);
    }
}
