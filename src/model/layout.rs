use std::collections::BTreeMap;

use tracing::trace;

use crate::core::axis::{Axis, AxisPosition, TickStyle};
use crate::core::types::{PlotRect, Thickness};
use crate::error::{PlotError, PlotResult};
use crate::render::{RenderContext, TextStyle};

use super::axis_registry::{AxisId, AxisRegistry};

/// Width of the color bar drawn by positioned color axes.
pub(crate) const COLOR_BAR_WIDTH: f64 = 16.0;
/// Gap between ticks, labels and titles.
pub(crate) const LABEL_GAP: f64 = 4.0;

/// Result of arranging axes around the plot area.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PlotLayout {
    pub plot_area: PlotRect,
    /// Screen band occupied by each drawn cartesian axis, outside the plot area.
    pub axis_bands: Vec<(AxisId, PlotRect)>,
}

/// Whether the axis occupies space beside the plot area.
pub(crate) fn takes_margin(axis: &Axis) -> bool {
    axis.is_axis_visible && (axis.is_horizontal() || axis.is_vertical())
}

pub(crate) fn label_style(axis: &Axis) -> TextStyle {
    TextStyle::new(axis.font_size, axis.style.text)
}

/// Tick lengths `(inside, outside)` of the plot area for major ticks.
pub(crate) fn tick_lengths(axis: &Axis, size: f64) -> (f64, f64) {
    match axis.tick_style {
        TickStyle::None => (0.0, 0.0),
        TickStyle::Inside => (size, 0.0),
        TickStyle::Outside => (0.0, size),
        TickStyle::Crossing => (size, size),
    }
}

/// Title text including the unit, if any.
pub(crate) fn axis_title_text(axis: &Axis) -> Option<String> {
    match (&axis.title, &axis.unit) {
        (Some(title), Some(unit)) => Some(format!("{title} [{unit}]")),
        (Some(title), None) => Some(title.clone()),
        (None, Some(unit)) => Some(format!("[{unit}]")),
        (None, None) => None,
    }
}

/// Largest label extent perpendicular to the axis.
pub(crate) fn label_extent(axis: &Axis, ctx: &dyn RenderContext) -> PlotResult<f64> {
    let style = label_style(axis);
    Ok(axis
        .tick_values()?
        .major_labels
        .iter()
        .map(|value| {
            let size = ctx.measure_text(&axis.format_value(*value), &style);
            if axis.is_vertical() { size.x } else { size.y }
        })
        .fold(0.0, f64::max))
}

/// Space the axis needs outside the plot area.
fn axis_size(axis: &Axis, ctx: &dyn RenderContext) -> PlotResult<f64> {
    let (_, outside) = tick_lengths(axis, axis.major_tick_size);
    let mut size = outside + LABEL_GAP + label_extent(axis, ctx)?;
    if let Some(title) = axis_title_text(axis) {
        let measured = ctx.measure_text(&title, &label_style(axis));
        size += LABEL_GAP + measured.y;
    }
    if axis.is_color_axis() {
        size += COLOR_BAR_WIDTH;
    }
    Ok(size)
}

fn update_axes(axes: &mut AxisRegistry, plot_area: PlotRect) -> PlotResult<()> {
    for (_, axis) in axes.iter_mut() {
        axis.update_transform(plot_area)?;
        axis.update_intervals();
    }
    Ok(())
}

/// Sizes the margins from axis labels, stacks tiers outward and computes the
/// final transforms for the resulting plot area.
///
/// `margins` sides that are finite are used as given; NaN sides are sized
/// automatically.
pub(crate) fn arrange(
    axes: &mut AxisRegistry,
    bounds: PlotRect,
    margins: Thickness,
    ctx: &dyn RenderContext,
) -> PlotResult<PlotLayout> {
    if !bounds.is_valid() {
        return Err(PlotError::InvalidData(format!(
            "plot bounds must have positive size, got {}x{}",
            bounds.width, bounds.height
        )));
    }

    // Provisional pass so that labels can be measured.
    update_axes(axes, bounds)?;

    let mut tier_sizes: BTreeMap<(u8, usize), f64> = BTreeMap::new();
    let mut sizes = Vec::new();
    for (id, axis) in axes.iter() {
        if !takes_margin(axis) {
            continue;
        }
        let size = axis_size(axis, ctx)?;
        let slot = tier_sizes
            .entry((side_index(axis.position), axis.position_tier))
            .or_insert(0.0);
        *slot = slot.max(size);
        sizes.push((id, size));
    }

    let side_total = |side: u8| -> f64 {
        tier_sizes
            .iter()
            .filter(|((s, _), _)| *s == side)
            .map(|(_, size)| *size)
            .sum()
    };
    let pick = |explicit: f64, side: u8| if explicit.is_finite() { explicit } else { side_total(side) };
    let actual_margins = Thickness::new(
        pick(margins.left, side_index(AxisPosition::Left)),
        pick(margins.top, side_index(AxisPosition::Top)),
        pick(margins.right, side_index(AxisPosition::Right)),
        pick(margins.bottom, side_index(AxisPosition::Bottom)),
    );

    let mut plot_area = bounds.deflate(actual_margins);
    if !plot_area.is_valid() {
        trace!(?actual_margins, "margins leave no plot area, ignoring them");
        plot_area = bounds;
    }

    let mut axis_bands = Vec::with_capacity(sizes.len());
    for (id, size) in sizes {
        let Some(axis) = axes.get_mut(id) else {
            continue;
        };
        let side = side_index(axis.position);
        let offset: f64 = tier_sizes
            .range((side, 0)..(side, axis.position_tier))
            .map(|(_, size)| *size)
            .sum();
        axis.set_tier_offset(offset);
        axis_bands.push((id, axis_band(axis.position, plot_area, offset, size)));
    }

    update_axes(axes, plot_area)?;
    trace!(
        left = plot_area.left,
        top = plot_area.top,
        width = plot_area.width,
        height = plot_area.height,
        "plot area arranged"
    );
    Ok(PlotLayout {
        plot_area,
        axis_bands,
    })
}

fn side_index(position: AxisPosition) -> u8 {
    match position {
        AxisPosition::Left => 0,
        AxisPosition::Top => 1,
        AxisPosition::Right => 2,
        AxisPosition::Bottom => 3,
        AxisPosition::None | AxisPosition::Angle | AxisPosition::Magnitude => 4,
    }
}

fn axis_band(position: AxisPosition, plot_area: PlotRect, offset: f64, size: f64) -> PlotRect {
    match position {
        AxisPosition::Left => PlotRect::new(plot_area.left - offset - size, plot_area.top, size, plot_area.height),
        AxisPosition::Right => PlotRect::new(plot_area.right() + offset, plot_area.top, size, plot_area.height),
        AxisPosition::Top => PlotRect::new(plot_area.left, plot_area.top - offset - size, plot_area.width, size),
        _ => PlotRect::new(plot_area.left, plot_area.bottom() + offset, plot_area.width, size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderFrame;
    use crate::core::types::Viewport;

    #[test]
    fn tiers_stack_outwards() {
        let mut axes = AxisRegistry::default();
        let inner = axes
            .add(Axis::linear(AxisPosition::Left).with_key("inner"))
            .expect("inner");
        let outer = axes
            .add(Axis::linear(AxisPosition::Left).with_key("outer").with_position_tier(1))
            .expect("outer");
        axes.add(Axis::linear(AxisPosition::Bottom)).expect("bottom");
        let frame = RenderFrame::new(Viewport::new(400, 300));
        let layout = arrange(
            &mut axes,
            PlotRect::new(0.0, 0.0, 400.0, 300.0),
            Thickness::new(f64::NAN, 10.0, 10.0, f64::NAN),
            &frame,
        )
        .expect("layout");

        let inner_axis = axes.get(inner).expect("inner axis");
        let outer_axis = axes.get(outer).expect("outer axis");
        assert_eq!(inner_axis.tier_offset(), 0.0);
        assert!(outer_axis.tier_offset() > 0.0);
        assert!(layout.plot_area.left > outer_axis.tier_offset());
        assert_eq!(layout.plot_area.top, 10.0);
        assert_eq!(layout.axis_bands.len(), 3);
    }
}
