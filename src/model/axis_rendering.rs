use crate::core::axis::{Axis, AxisKind, AxisPosition};
use crate::core::types::{PlotRect, ScreenPoint};
use crate::error::PlotResult;
use crate::render::{Color, RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign};

use super::layout::{
    COLOR_BAR_WIDTH, LABEL_GAP, axis_title_text, label_extent, label_style, tick_lengths,
};

/// Screen distance below which a tick counts as inside the axis range.
const EDGE_TOLERANCE: f64 = 0.5;
/// Angular resolution of polar rings, in degrees.
const RING_STEP_DEGREES: f64 = 2.0;

/// Unit direction pointing away from the plot area.
fn outward(position: AxisPosition) -> f64 {
    match position {
        AxisPosition::Left | AxisPosition::Top => -1.0,
        _ => 1.0,
    }
}

/// Point at `along` on the axis direction and `across` perpendicular to it.
fn axis_point(axis: &Axis, along: f64, across: f64) -> ScreenPoint {
    if axis.is_vertical() {
        ScreenPoint::new(across, along)
    } else {
        ScreenPoint::new(along, across)
    }
}

fn along_range(axis: &Axis, plot_area: PlotRect) -> (f64, f64) {
    if axis.is_vertical() {
        (plot_area.top, plot_area.bottom())
    } else {
        (plot_area.left, plot_area.right())
    }
}

fn within(value: f64, (low, high): (f64, f64)) -> bool {
    value >= low - EDGE_TOLERANCE && value <= high + EDGE_TOLERANCE
}

/// Major and minor gridlines across the plot area.
pub(crate) fn render_gridlines(
    ctx: &mut dyn RenderContext,
    axis: &Axis,
    plot_area: PlotRect,
) -> PlotResult<()> {
    if axis.is_color_axis() || !(axis.is_horizontal() || axis.is_vertical()) {
        return Ok(());
    }
    if !axis.major_gridlines && !axis.minor_gridlines {
        return Ok(());
    }
    let ticks = axis.tick_values()?;
    let along = along_range(axis, plot_area);
    let across = if axis.is_vertical() {
        (plot_area.left, plot_area.right())
    } else {
        (plot_area.top, plot_area.bottom())
    };

    let mut draw = |values: &[f64], color: Color| {
        let stroke = StrokeStyle::solid(color, axis.style.gridline_thickness);
        let segments: Vec<(ScreenPoint, ScreenPoint)> = values
            .iter()
            .map(|value| axis.transform(*value))
            .filter(|screen| within(*screen, along))
            .map(|screen| (axis_point(axis, screen, across.0), axis_point(axis, screen, across.1)))
            .collect();
        ctx.draw_line_segments(&segments, &stroke);
    };
    if axis.minor_gridlines {
        draw(&ticks.minor_ticks, axis.style.minor_gridline);
    }
    if axis.major_gridlines {
        draw(&ticks.major_ticks, axis.style.major_gridline);
    }
    Ok(())
}

/// Axis line, ticks, labels, title and (for color axes) the color bar.
pub(crate) fn render_axis(
    ctx: &mut dyn RenderContext,
    axis: &Axis,
    perpendicular: Option<&Axis>,
    plot_area: PlotRect,
) -> PlotResult<()> {
    if !axis.is_axis_visible || !(axis.is_horizontal() || axis.is_vertical()) {
        return Ok(());
    }
    let ticks = axis.tick_values()?;
    let direction = outward(axis.position);
    let line = axis.axis_line_position(perpendicular, plot_area);
    let along = along_range(axis, plot_area);

    let base = if axis.is_color_axis() {
        render_color_bar(ctx, axis, line, direction);
        line + direction * COLOR_BAR_WIDTH
    } else {
        if axis.style.axis_line_thickness > 0.0 {
            ctx.draw_line(
                &[axis_point(axis, along.0, line), axis_point(axis, along.1, line)],
                &StrokeStyle::solid(axis.style.axis_line, axis.style.axis_line_thickness),
            );
        }
        line
    };

    let tick_stroke = StrokeStyle::solid(axis.style.ticks, axis.style.axis_line_thickness.max(1.0));
    for (values, size) in [
        (&ticks.minor_ticks, axis.minor_tick_size),
        (&ticks.major_ticks, axis.major_tick_size),
    ] {
        let (inside, outside) = tick_lengths(axis, size);
        if inside + outside <= 0.0 {
            continue;
        }
        let segments: Vec<(ScreenPoint, ScreenPoint)> = values
            .iter()
            .map(|value| axis.transform(*value))
            .filter(|screen| within(*screen, along))
            .map(|screen| {
                (
                    axis_point(axis, screen, base - direction * inside),
                    axis_point(axis, screen, base + direction * outside),
                )
            })
            .collect();
        ctx.draw_line_segments(&segments, &tick_stroke);
    }

    let (_, outside) = tick_lengths(axis, axis.major_tick_size);
    let label_offset = base + direction * (outside + LABEL_GAP);
    let (h_align, v_align) = match axis.position {
        AxisPosition::Left => (TextHAlign::Right, TextVAlign::Middle),
        AxisPosition::Right => (TextHAlign::Left, TextVAlign::Middle),
        AxisPosition::Top => (TextHAlign::Center, TextVAlign::Bottom),
        _ => (TextHAlign::Center, TextVAlign::Top),
    };
    let style = label_style(axis).aligned(h_align, v_align);
    for value in &ticks.major_labels {
        let screen = axis.transform(*value);
        if !within(screen, along) {
            continue;
        }
        ctx.draw_text(axis_point(axis, screen, label_offset), &axis.format_value(*value), &style);
    }

    if let Some(title) = axis_title_text(axis) {
        let extent = label_extent(axis, &*ctx)?;
        let title_position = label_offset + direction * (extent + LABEL_GAP);
        let middle = (along.0 + along.1) * 0.5;
        let mut title_style = label_style(axis).aligned(TextHAlign::Center, v_align);
        if axis.is_vertical() {
            title_style = title_style
                .aligned(TextHAlign::Center, if direction < 0.0 { TextVAlign::Bottom } else { TextVAlign::Top })
                .rotated(-90.0);
        }
        ctx.draw_text(axis_point(axis, middle, title_position), &title, &title_style);
    }
    Ok(())
}

/// Fills the band between the axis line and the tick base with the mapped
/// colors.
fn render_color_bar(ctx: &mut dyn RenderContext, axis: &Axis, line: f64, direction: f64) {
    let Some(map) = &axis.color_map else {
        return;
    };
    let outer = line + direction * COLOR_BAR_WIDTH;
    let (start, end) = axis.screen_range();
    let none = StrokeStyle::none();
    let mut band = |from: f64, to: f64, color: Color| {
        let rect = PlotRect::from_points(axis_point(axis, from, line), axis_point(axis, to, outer));
        ctx.draw_rectangle(rect, color, &none);
    };

    if !map.ranges().is_empty() {
        for range in map.ranges() {
            let lower = range.lower.max(axis.actual_minimum());
            let upper = range.upper.min(axis.actual_maximum());
            if lower < upper {
                band(axis.transform(lower), axis.transform(upper), range.color);
            }
        }
        return;
    }

    let count = if matches!(axis.kind, AxisKind::Category(_)) {
        axis.category_count()
    } else {
        map.palette.len()
    };
    if count == 0 {
        return;
    }
    for index in 0..count {
        let from = start + (end - start) * index as f64 / count as f64;
        let to = start + (end - start) * (index + 1) as f64 / count as f64;
        let value = axis.inverse_transform((from + to) * 0.5);
        if let Some(color) = axis.color_for_value(value) {
            band(from, to, color);
        }
    }
}

fn ring_points(magnitude: &Axis, angle: &Axis, radius_value: f64) -> Vec<ScreenPoint> {
    let first = angle.actual_minimum();
    let last = angle.actual_maximum();
    let span_degrees = (angle.transform(last) - angle.transform(first)).abs();
    let steps = ((span_degrees / RING_STEP_DEGREES).ceil() as usize).max(1);
    (0..=steps)
        .map(|step| {
            let value = first + (last - first) * step as f64 / steps as f64;
            magnitude.transform_polar(radius_value, value, angle)
        })
        .collect()
}

/// Rings of a magnitude axis and spokes of its angle axis, with labels.
pub(crate) fn render_polar_axes(
    ctx: &mut dyn RenderContext,
    magnitude: &Axis,
    angle: &Axis,
) -> PlotResult<()> {
    let magnitude_ticks = magnitude.tick_values()?;
    let angle_ticks = angle.tick_values()?;
    let maximum = magnitude.actual_maximum();
    let minimum = magnitude.actual_minimum();

    if magnitude.is_axis_visible {
        let grid = StrokeStyle::solid(magnitude.style.major_gridline, magnitude.style.gridline_thickness);
        if magnitude.major_gridlines {
            for value in magnitude_ticks.major_ticks.iter().filter(|value| **value > minimum) {
                ctx.draw_line(&ring_points(magnitude, angle, *value), &grid);
            }
        }
        let outline = StrokeStyle::solid(magnitude.style.axis_line, magnitude.style.axis_line_thickness);
        ctx.draw_line(&ring_points(magnitude, angle, maximum), &outline);

        let style = label_style(magnitude).aligned(TextHAlign::Center, TextVAlign::Top);
        let label_angle = angle.actual_minimum();
        for value in &magnitude_ticks.major_labels {
            let position = magnitude.transform_polar(*value, label_angle, angle);
            ctx.draw_text(position, &magnitude.format_value(*value), &style);
        }
    }

    if angle.is_axis_visible {
        let grid = StrokeStyle::solid(angle.style.major_gridline, angle.style.gridline_thickness);
        let center = magnitude.transform_polar(minimum, angle.actual_minimum(), angle);
        let style = label_style(angle).aligned(TextHAlign::Center, TextVAlign::Middle);
        let mid = magnitude.mid_point();
        for value in &angle_ticks.major_ticks {
            let rim = magnitude.transform_polar(maximum, *value, angle);
            if angle.major_gridlines {
                ctx.draw_line(&[center, rim], &grid);
            }
            let radial = mid.vector_to(rim);
            let length = radial.length();
            if length > 0.0 {
                let push = (length + LABEL_GAP + angle.font_size) / length;
                let anchor = ScreenPoint::new(mid.x + radial.x * push, mid.y + radial.y * push);
                ctx.draw_text(anchor, &angle.format_value(*value), &style);
            }
        }
    }
    Ok(())
}
