use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use xyplot::PlotError;
use xyplot::core::axis::MAX_CATEGORIES;
use xyplot::core::primitives::datetime_to_days;
use xyplot::core::{Axis, AxisPosition, DataPoint, LabelFormat, PlotRect, ScreenPoint};
use xyplot::render::{Color, Palette};

fn prepared(mut axis: Axis, area: PlotRect) -> Axis {
    axis.update_actual_max_min().expect("actual range");
    axis.update_transform(area).expect("transform");
    axis.update_intervals();
    axis
}

#[test]
fn linear_vertical_axis_spans_plot_height() {
    let area = PlotRect::new(0.0, 0.0, 200.0, 100.0);
    let axis = prepared(Axis::linear(AxisPosition::Left).with_range(0.0, 10.0), area);

    let bottom = axis.transform(0.0);
    let top = axis.transform(10.0);
    assert_abs_diff_eq!((bottom - top).abs(), 100.0, epsilon = 1e-9);
    // Data grows upwards on vertical axes.
    assert_abs_diff_eq!(bottom, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(top, 0.0, epsilon = 1e-9);
}

#[test]
fn start_and_end_positions_select_sub_range() {
    let area = PlotRect::new(0.0, 0.0, 200.0, 100.0);
    let axis = prepared(
        Axis::linear(AxisPosition::Bottom)
            .with_range(0.0, 10.0)
            .with_start_end(0.5, 1.0),
        area,
    );
    assert_abs_diff_eq!(axis.transform(0.0), 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(axis.transform(10.0), 200.0, epsilon = 1e-9);
}

#[test]
fn logarithmic_axis_ticks_on_powers() {
    let area = PlotRect::new(0.0, 0.0, 400.0, 400.0);
    let axis = prepared(
        Axis::logarithmic(AxisPosition::Left, 10.0).with_range(1.0, 1000.0),
        area,
    );
    let ticks = axis.tick_values().expect("ticks");
    assert_eq!(ticks.major_ticks, vec![1.0, 10.0, 100.0, 1000.0]);
    assert!(ticks.minor_ticks.contains(&2.0));
    assert!(ticks.minor_ticks.contains(&500.0));
}

#[test]
fn logarithmic_axis_accepts_fractional_base() {
    let area = PlotRect::new(0.0, 0.0, 400.0, 400.0);
    let axis = prepared(
        Axis::logarithmic(AxisPosition::Bottom, 5.5).with_range(1.0, 5.5_f64.powi(3)),
        area,
    );
    let ticks = axis.tick_values().expect("ticks");
    assert_eq!(ticks.major_ticks.len(), 4);
    assert_relative_eq!(ticks.major_ticks[1], 5.5, max_relative = 1e-12);
    assert_relative_eq!(ticks.major_ticks[3], 166.375, max_relative = 1e-12);
}

#[test]
fn logarithmic_base_must_exceed_one() {
    let mut axis = Axis::logarithmic(AxisPosition::Left, 1.0);
    let result = axis.update_actual_max_min();
    assert!(matches!(result, Err(PlotError::InvalidConfiguration(_))));
}

#[test]
fn inconsistent_absolute_bounds_are_rejected() {
    let mut axis = Axis::linear(AxisPosition::Left).with_absolute_range(10.0, 0.0);
    assert!(matches!(
        axis.update_actual_max_min(),
        Err(PlotError::InvalidConfiguration(_))
    ));

    let mut axis = Axis::linear(AxisPosition::Left)
        .with_absolute_range(0.0, 10.0)
        .with_range_limits(20.0, f64::INFINITY);
    assert!(axis.validate().is_err());
}

#[test]
fn data_extents_receive_padding() {
    let area = PlotRect::new(0.0, 0.0, 400.0, 300.0);
    let mut axis = Axis::linear(AxisPosition::Bottom).with_padding(0.1, 0.1);
    axis.include_range(0.0, 10.0);
    let axis = prepared(axis, area);
    assert_abs_diff_eq!(axis.actual_minimum(), -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(axis.actual_maximum(), 11.0, epsilon = 1e-12);
}

#[test]
fn update_pass_is_idempotent() {
    let area = PlotRect::new(10.0, 20.0, 640.0, 480.0);
    let mut axis = Axis::linear(AxisPosition::Left);
    axis.include_range(-3.5, 42.0);
    let first = prepared(axis, area);
    let second = prepared(first.clone(), area);

    assert_eq!(first.actual_minimum(), second.actual_minimum());
    assert_eq!(first.actual_maximum(), second.actual_maximum());
    assert_eq!(first.offset(), second.offset());
    assert_eq!(first.scale(), second.scale());
}

#[test]
fn absolute_bounds_clamp_requested_range() {
    let area = PlotRect::new(0.0, 0.0, 400.0, 300.0);
    let axis = prepared(
        Axis::linear(AxisPosition::Bottom)
            .with_range(-50.0, 150.0)
            .with_absolute_range(0.0, 100.0),
        area,
    );
    assert_eq!(axis.actual_minimum(), 0.0);
    assert_eq!(axis.actual_maximum(), 100.0);
}

#[test]
fn pan_and_zoom_move_the_view_until_reset() {
    let area = PlotRect::new(0.0, 0.0, 100.0, 100.0);
    let mut axis = prepared(Axis::linear(AxisPosition::Bottom).with_range(0.0, 100.0), area);

    assert!(axis.pan(ScreenPoint::new(50.0, 0.0), ScreenPoint::new(40.0, 0.0)));
    assert_abs_diff_eq!(axis.actual_minimum(), 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(axis.actual_maximum(), 110.0, epsilon = 1e-9);

    assert!(axis.zoom_at(2.0, 60.0));
    assert_abs_diff_eq!(axis.actual_minimum(), 35.0, epsilon = 1e-9);
    assert_abs_diff_eq!(axis.actual_maximum(), 85.0, epsilon = 1e-9);

    // The view survives an update pass.
    axis.update_actual_max_min().expect("range");
    assert_abs_diff_eq!(axis.actual_minimum(), 35.0, epsilon = 1e-9);

    axis.reset();
    axis.update_actual_max_min().expect("range");
    assert_eq!(axis.actual_minimum(), 0.0);
    assert_eq!(axis.actual_maximum(), 100.0);
}

#[test]
fn disabled_pan_leaves_range_untouched() {
    let area = PlotRect::new(0.0, 0.0, 100.0, 100.0);
    let mut axis = Axis::linear(AxisPosition::Bottom).with_range(0.0, 100.0);
    axis.is_pan_enabled = false;
    let mut axis = prepared(axis, area);
    assert!(!axis.pan_by(25.0));
    assert_eq!(axis.actual_minimum(), 0.0);
}

#[test]
fn category_axis_centers_labels_on_integers() {
    let area = PlotRect::new(0.0, 0.0, 300.0, 100.0);
    let axis = prepared(Axis::category(AxisPosition::Bottom, ["A", "B", "C"]), area);

    assert_eq!(axis.actual_minimum(), -0.5);
    assert_eq!(axis.actual_maximum(), 2.5);
    assert_abs_diff_eq!(axis.transform(1.0), 150.0, epsilon = 1e-9);

    let ticks = axis.tick_values().expect("ticks");
    assert_eq!(ticks.major_labels, vec![0.0, 1.0, 2.0]);
    assert_eq!(ticks.major_ticks, vec![-0.5, 0.5, 1.5, 2.5]);
    assert_eq!(axis.format_value(2.0), "C");
}

#[test]
fn category_count_from_huge_data_is_capped() {
    let mut axis = Axis::category(AxisPosition::Bottom, ["a", "b"]);
    axis.include(1e20);
    axis.update_actual_max_min().expect("actual range");
    assert_eq!(axis.category_count(), MAX_CATEGORIES);

    let mut small = Axis::category(AxisPosition::Bottom, ["a", "b"]);
    small.include(4.0);
    assert_eq!(small.category_count(), 5);
}

#[test]
fn date_time_axis_formats_days_as_dates() {
    let start = datetime_to_days(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date"));
    let end = datetime_to_days(Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).single().expect("date"));
    let area = PlotRect::new(0.0, 0.0, 700.0, 100.0);
    let axis = prepared(Axis::date_time(AxisPosition::Bottom).with_range(start, end), area);

    let ticks = axis.tick_values().expect("ticks");
    assert!(!ticks.major_labels.is_empty());
    assert_eq!(axis.format_value(start), "2024-01-01");

    let custom = Axis::date_time(AxisPosition::Bottom)
        .with_label_format(LabelFormat::Pattern("%d/%m".to_owned()));
    assert_eq!(custom.format_value(start), "01/01");

    let noon = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().expect("date");
    let point = DataPoint::from_decimal_time(noon, Decimal::new(1234, 2)).expect("point");
    assert_abs_diff_eq!(point.x, start + 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(point.y, 12.34, epsilon = 1e-12);
}

#[test]
fn time_span_axis_formats_seconds() {
    let area = PlotRect::new(0.0, 0.0, 600.0, 100.0);
    let axis = prepared(Axis::time_span(AxisPosition::Bottom).with_range(0.0, 7200.0), area);
    let label = axis.format_value(3660.0);
    assert!(label.starts_with("1:01"), "unexpected label {label}");
}

#[test]
fn color_axis_maps_values_through_palette() {
    let palette = Palette::new(vec![
        Color::rgb(1.0, 0.0, 0.0),
        Color::rgb(0.0, 1.0, 0.0),
        Color::rgb(0.0, 0.0, 1.0),
    ]);
    let mut axis = Axis::linear_color(palette).with_range(0.0, 3.0);
    axis.update_actual_max_min().expect("range");

    assert_eq!(axis.color_for_value(0.5), Some(Color::rgb(1.0, 0.0, 0.0)));
    assert_eq!(axis.color_for_value(1.5), Some(Color::rgb(0.0, 1.0, 0.0)));
    assert_eq!(axis.color_for_value(3.0), Some(Color::rgb(0.0, 0.0, 1.0)));
    // Out-of-range values clamp to the ends without low/high colors.
    assert_eq!(axis.color_for_value(-10.0), Some(Color::rgb(1.0, 0.0, 0.0)));
    assert!(axis.is_color_axis());
}

#[test]
fn range_color_axis_uses_half_open_bands() {
    let mut axis = Axis::range_color();
    axis.add_range(0.0, 10.0, Color::WHITE).expect("first band");
    axis.add_range(10.0, 20.0, Color::BLACK).expect("second band");
    axis.update_actual_max_min().expect("range");

    assert_eq!(axis.color_for_value(9.999), Some(Color::WHITE));
    assert_eq!(axis.color_for_value(10.0), Some(Color::BLACK));
    assert!(axis.add_range(5.0, 5.0, Color::GRAY).is_err());
    assert!(Axis::linear(AxisPosition::Left).add_range(0.0, 1.0, Color::GRAY).is_err());
}

#[test]
fn polar_axes_place_points_around_mid_point() {
    let area = PlotRect::new(0.0, 0.0, 200.0, 200.0);
    let magnitude = prepared(Axis::magnitude().with_range(0.0, 10.0), area);
    let angle = prepared(Axis::angle().with_range(0.0, 360.0), area);

    let center = magnitude.mid_point();
    assert_eq!(center, ScreenPoint::new(100.0, 100.0));

    let rim = magnitude.transform_polar(10.0, 0.0, &angle);
    assert_abs_diff_eq!(rim.distance_to(center), 100.0, epsilon = 1e-9);

    let data = magnitude.inverse_transform_point(rim, &angle);
    assert_abs_diff_eq!(data.x, 10.0, epsilon = 1e-9);
}

proptest! {
    #[test]
    fn linear_transform_round_trips(
        minimum in -1e6f64..1e6,
        span in 1e-3f64..1e6,
        fraction in 0.0f64..=1.0
    ) {
        let area = PlotRect::new(0.0, 0.0, 800.0, 600.0);
        let axis = prepared(
            Axis::linear(AxisPosition::Bottom).with_range(minimum, minimum + span),
            area,
        );
        let value = minimum + span * fraction;
        let back = axis.inverse_transform(axis.transform(value));
        prop_assert!((back - value).abs() <= 1e-9 * value.abs().max(span));
    }

    #[test]
    fn logarithmic_transform_round_trips(
        low_exponent in -6i32..3,
        decades in 1i32..6,
        fraction in 0.0f64..=1.0
    ) {
        let area = PlotRect::new(0.0, 0.0, 800.0, 600.0);
        let minimum = 10f64.powi(low_exponent);
        let maximum = 10f64.powi(low_exponent + decades);
        let axis = prepared(
            Axis::logarithmic(AxisPosition::Left, 10.0).with_range(minimum, maximum),
            area,
        );
        let value = minimum * (maximum / minimum).powf(fraction);
        let back = axis.inverse_transform(axis.transform(value));
        prop_assert!((back - value).abs() <= 1e-9 * value);
    }
}
