use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use xyplot::PlotError;
use xyplot::core::ticks::{DEFAULT_MAX_TICKS, calculate_actual_interval, create_tick_values};
use xyplot::core::{Axis, AxisPosition, PlotRect};

#[test]
fn ticks_from_zero_to_ten_by_two() {
    let ticks = create_tick_values(0.0, 10.0, 2.0, DEFAULT_MAX_TICKS).expect("ticks");
    assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
}

#[test]
fn non_positive_step_is_rejected() {
    for step in [0.0, -1.0, f64::NAN] {
        let result = create_tick_values(0.0, 10.0, step, DEFAULT_MAX_TICKS);
        assert!(matches!(result, Err(PlotError::InvalidArgument(_))), "step {step}");
    }
}

#[test]
fn decimal_steps_produce_clean_values() {
    let ticks = create_tick_values(0.0, 1.0, 0.1, DEFAULT_MAX_TICKS).expect("ticks");
    assert_eq!(ticks.len(), 11);
    assert_eq!(ticks[3], 0.3);
    assert_eq!(ticks[7], 0.7);
}

#[test]
fn descending_range_walks_downwards() {
    let ticks = create_tick_values(10.0, 0.0, 5.0, DEFAULT_MAX_TICKS).expect("ticks");
    assert_eq!(ticks, vec![10.0, 5.0, 0.0]);
}

#[test]
fn tick_generation_is_capped() {
    let ticks = create_tick_values(0.0, 1e9, 1.0, 50).expect("ticks");
    assert_eq!(ticks.len(), 50);
}

#[test]
fn nice_interval_fits_available_space() {
    let interval = calculate_actual_interval(600.0, 60.0, 100.0);
    assert_abs_diff_eq!(interval, 10.0);
    assert!(100.0 / interval <= 600.0 / 60.0);
}

fn tick_set(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

#[test]
fn reversed_axis_produces_same_tick_set() {
    let area = PlotRect::new(0.0, 0.0, 400.0, 300.0);
    let mut forward = Axis::linear(AxisPosition::Bottom)
        .with_range(0.0, 10.0)
        .with_steps(1.0, f64::NAN);
    let mut reversed = Axis::linear(AxisPosition::Bottom)
        .with_range(10.0, 0.0)
        .with_steps(1.0, f64::NAN);
    for axis in [&mut forward, &mut reversed] {
        axis.update_actual_max_min().expect("range");
        axis.update_transform(area).expect("transform");
        axis.update_intervals();
    }

    let expected = create_tick_values(0.0, 10.0, 1.0, DEFAULT_MAX_TICKS).expect("ticks");
    let forward_ticks = forward.tick_values().expect("forward ticks").major_ticks;
    let reversed_ticks = reversed.tick_values().expect("reversed ticks").major_ticks;
    assert_eq!(tick_set(forward_ticks), expected);
    assert_eq!(tick_set(reversed_ticks), expected);

    // Only the traversal direction on screen differs.
    assert!(forward.transform(0.0) < forward.transform(10.0));
    assert!(reversed.transform(0.0) > reversed.transform(10.0));
    assert!(reversed.is_reversed());
}

proptest! {
    #[test]
    fn tick_count_is_bounded_and_non_empty(
        from in -1_000.0f64..1_000.0,
        span in 0.0f64..1_000.0,
        step in 0.01f64..100.0,
        max_ticks in 1usize..200
    ) {
        let to = from + span;
        let ticks = create_tick_values(from, to, step, max_ticks).expect("ticks");
        prop_assert!(!ticks.is_empty());
        prop_assert!(ticks.len() <= max_ticks);
    }

    #[test]
    fn ticks_increase_by_step(
        from in -1_000.0f64..1_000.0,
        span in 0.0f64..1_000.0,
        step in 0.01f64..100.0
    ) {
        let ticks = create_tick_values(from, from + span, step, DEFAULT_MAX_TICKS).expect("ticks");
        for pair in ticks.windows(2) {
            let delta = pair[1] - pair[0];
            prop_assert!(delta > 0.0);
            prop_assert!((delta - step).abs() <= step * 1e-6 + 1e-9);
        }
    }

    #[test]
    fn ticks_are_deterministic(
        from in -1e6f64..1e6,
        span in 0.0f64..1e6,
        step in 0.5f64..1e5
    ) {
        let first = create_tick_values(from, from + span, step, DEFAULT_MAX_TICKS).expect("first");
        let second = create_tick_values(from, from + span, step, DEFAULT_MAX_TICKS).expect("second");
        prop_assert_eq!(first, second);
    }
}
