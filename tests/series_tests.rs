use approx::assert_abs_diff_eq;
use xyplot::PlotError;
use xyplot::core::{Axis, AxisPosition, DataPoint, PlotRect, ScreenPoint, Viewport};
use xyplot::render::{Color, MarkerType, Palette, RenderFrame, StrokeStyle};
use xyplot::series::{
    AxisDomain, BarItem, BarSeries, BinningOptions, BinningOutlierMode, BoxPlotItem, BoxPlotSeries,
    HeatMapSeries, HistogramItem, HistogramSeries, ItemsSource, LineSeries, PieSeries, PieSlice, RectangleItem,
    RectangleSeries, ScatterPoint, ScatterSeries, Series, SeriesAxes, ValueDomain,
    collect_histogram,
};

const AREA: PlotRect = PlotRect::new(0.0, 0.0, 100.0, 100.0);

fn prepared(mut axis: Axis) -> Axis {
    axis.update_actual_max_min().expect("actual range");
    axis.update_transform(AREA).expect("transform");
    axis.update_intervals();
    axis
}

fn cartesian(x: (f64, f64), y: (f64, f64)) -> (Axis, Axis) {
    (
        prepared(Axis::linear(AxisPosition::Bottom).with_range(x.0, x.1)),
        prepared(Axis::linear(AxisPosition::Left).with_range(y.0, y.1)),
    )
}

fn frame() -> RenderFrame {
    RenderFrame::new(Viewport::new(100, 100))
}

fn points(values: &[(f64, f64)]) -> Vec<DataPoint> {
    values.iter().map(|&(x, y)| DataPoint::new(x, y)).collect()
}

#[test]
fn line_breaks_at_undefined_points() {
    let (x, y) = cartesian((0.0, 2.0), (0.0, 2.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);

    let mut series = LineSeries::new()
        .with_points(points(&[(0.0, 0.0), (1.0, f64::NAN), (2.0, 2.0)]))
        .with_markers(MarkerType::Square, 2.0);
    series.update_max_min(ValueDomain::default());
    let mut frame = frame();
    series.render(&mut frame, &axes).expect("render");
    // Both runs hold a single point, so nothing spans the gap.
    assert_eq!(frame.lines().count(), 0);
    let markers: Vec<ScreenPoint> = frame
        .markers()
        .flat_map(|(points, _)| points.iter().copied())
        .collect();
    assert_eq!(
        markers,
        vec![ScreenPoint::new(0.0, 100.0), ScreenPoint::new(100.0, 0.0)]
    );

    let mut broken = series.with_broken_line(StrokeStyle::solid(Color::GRAY, 1.0));
    broken.update_max_min(ValueDomain::default());
    let mut frame = self::frame();
    broken.render(&mut frame, &axes).expect("render");
    let lines: Vec<_> = frame.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].1.color, Color::GRAY);
    assert_eq!(
        lines[0].0,
        &[ScreenPoint::new(0.0, 100.0), ScreenPoint::new(100.0, 0.0)]
    );
}

#[test]
fn line_draws_one_polyline_per_defined_run() {
    let (x, y) = cartesian((0.0, 4.0), (0.0, 4.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);

    let mut series = LineSeries::new().with_points(points(&[
        (0.0, 0.0),
        (1.0, 1.0),
        (2.0, f64::NAN),
        (3.0, 3.0),
        (4.0, 4.0),
    ]));
    series.update_max_min(ValueDomain::default());
    let mut plain = frame();
    series.render(&mut plain, &axes).expect("render");
    let lines: Vec<_> = plain.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].0.len(), 2);

    let mut broken = series
        .clone()
        .with_broken_line(StrokeStyle::solid(Color::GRAY, 1.0))
        .with_markers(MarkerType::Circle, 3.0);
    broken.update_max_min(ValueDomain::default());
    let mut frame = frame();
    broken.render(&mut frame, &axes).expect("render");
    assert_eq!(frame.lines().count(), 3);
    let markers: usize = frame.markers().map(|(points, _)| points.len()).sum();
    assert_eq!(markers, 4);
}

#[test]
fn line_extents_skip_undefined_points() {
    let mut series = LineSeries::new().with_points(points(&[
        (0.0, 5.0),
        (f64::NAN, 100.0),
        (3.0, f64::INFINITY),
        (2.0, -1.0),
    ]));
    series.update_max_min(ValueDomain::default());
    let extents = series.extents();
    assert_eq!(extents.x, Some((0.0, 2.0)));
    assert_eq!(extents.y, Some((-1.0, 5.0)));
}

#[test]
fn line_nearest_point_can_interpolate() {
    let (x, y) = cartesian((0.0, 10.0), (0.0, 10.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let mut series = LineSeries::new().with_points(points(&[(0.0, 0.0), (10.0, 10.0)]));
    series.update_max_min(ValueDomain::default());

    let query = ScreenPoint::new(50.0, 40.0);
    let snapped = series.get_nearest_point(query, false, &axes).expect("hit");
    assert_eq!(snapped.index, 0.0);

    let hit = series.get_nearest_point(query, true, &axes).expect("interpolated hit");
    assert_abs_diff_eq!(hit.index, 0.55, epsilon = 1e-9);
    assert_abs_diff_eq!(hit.data_point.x, 5.5, epsilon = 1e-9);
    assert_abs_diff_eq!(hit.data_point.y, 5.5, epsilon = 1e-9);
}

#[test]
fn interpolated_hit_falls_back_to_isolated_points() {
    let (x, y) = cartesian((0.0, 4.0), (0.0, 4.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let mut series = LineSeries::new().with_points(points(&[
        (0.0, 0.0),
        (1.0, f64::NAN),
        (2.0, 2.0),
        (3.0, f64::NAN),
        (4.0, 4.0),
    ]));
    series.update_max_min(ValueDomain::default());

    let query = x.transform_point(2.0, 2.0, &y);
    let snapped = series.get_nearest_point(query, false, &axes).expect("hit");
    let interpolated = series.get_nearest_point(query, true, &axes).expect("interpolated hit");
    assert_eq!(interpolated.data_point, DataPoint::new(2.0, 2.0));
    assert_eq!(interpolated.index, 2.0);
    assert_eq!(interpolated.data_point, snapped.data_point);
}

#[test]
fn line_extents_drop_points_outside_the_axis_domain() {
    let mut series = LineSeries::new().with_points(points(&[(-50.0, -1.0), (2.0, 5.0), (3.0, 100.0)]));
    series.update_max_min(ValueDomain {
        y: AxisDomain::Positive,
        ..ValueDomain::default()
    });
    let extents = series.extents();
    assert_eq!(extents.x, Some((2.0, 3.0)));
    assert_eq!(extents.y, Some((5.0, 100.0)));

    let mut scatter = ScatterSeries::new().with_points([
        ScatterPoint::new(-1.0, 1.0),
        ScatterPoint::new(4.0, 2.0),
    ]);
    scatter.update_max_min(ValueDomain {
        x: AxisDomain::Positive,
        ..ValueDomain::default()
    });
    assert_eq!(scatter.extents().x, Some((4.0, 4.0)));
    assert_eq!(scatter.extents().y, Some((2.0, 2.0)));
}

#[test]
fn line_without_resolved_axes_reports_no_hit() {
    let (x, _) = cartesian((0.0, 1.0), (0.0, 1.0));
    let axes = SeriesAxes::new(Some(&x), None, AREA);
    let series = LineSeries::new().with_points(points(&[(0.0, 0.0), (1.0, 1.0)]));
    assert!(series.get_nearest_point(ScreenPoint::new(0.0, 0.0), false, &axes).is_none());
    assert!(matches!(
        series.render(&mut frame(), &axes),
        Err(PlotError::UnresolvedAxis { role: "y", .. })
    ));
}

#[test]
fn items_source_is_reloaded_on_update() {
    let mut series = LineSeries::new().with_items_source(ItemsSource::from_items(
        vec![(0.0, 1.0), (1.0, 2.0), (2.0, 4.0)],
        |&(x, y): &(f64, f64)| DataPoint::new(x, y * 10.0),
    ));
    series.update_data();
    series.update_max_min(ValueDomain::default());
    assert_eq!(series.points().len(), 3);
    assert_eq!(series.extents().y, Some((10.0, 40.0)));
}

#[test]
fn scatter_nearest_point_picks_closest_marker() {
    let (x, y) = cartesian((0.0, 10.0), (0.0, 10.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let mut series = ScatterSeries::new().with_points([
        ScatterPoint::new(0.0, 0.0),
        ScatterPoint::new(10.0, 10.0),
        ScatterPoint::new(5.0, 5.0),
    ]);
    series.update_max_min(ValueDomain::default());

    let query = x.transform_point(9.0, 9.0, &y);
    let hit = series.get_nearest_point(query, false, &axes).expect("hit");
    assert_eq!(hit.data_point, DataPoint::new(10.0, 10.0));
    assert_eq!(hit.index, 1.0);
}

#[test]
fn scatter_colors_points_through_color_axis() {
    let (x, y) = cartesian((0.0, 10.0), (0.0, 10.0));
    let palette = Palette::new(vec![Color::rgb(1.0, 0.0, 0.0), Color::rgb(0.0, 0.0, 1.0)]);
    let mut color = Axis::linear_color(palette).with_range(0.0, 1.0);
    color.update_actual_max_min().expect("color range");
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA).with_color_axis(Some(&color));

    let mut series = ScatterSeries::new().with_points([
        ScatterPoint::with_value(1.0, 1.0, f64::NAN, 0.1),
        ScatterPoint::with_value(2.0, 2.0, f64::NAN, 0.9),
        ScatterPoint::with_value(3.0, 3.0, f64::NAN, 0.2),
        ScatterPoint::with_value(4.0, 4.0, f64::NAN, f64::NAN),
    ]);
    series.update_max_min(ValueDomain::default());
    assert_eq!(series.extents().value, Some((0.1, 0.9)));

    let mut frame = frame();
    series.render(&mut frame, &axes).expect("render");
    let batches: Vec<_> = frame.markers().map(|(points, style)| (points.len(), style.fill)).collect();
    assert_eq!(
        batches,
        vec![(2, Color::rgb(1.0, 0.0, 0.0)), (1, Color::rgb(0.0, 0.0, 1.0))]
    );
}

#[test]
fn bars_are_drawn_per_category_and_hit_by_containment() {
    let x = prepared(Axis::category(AxisPosition::Bottom, ["a", "b", "c"]));
    let y = prepared(Axis::linear(AxisPosition::Left).with_range(0.0, 4.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let mut series = BarSeries::new().with_values([1.0, 2.0, 3.0]);
    series.update_max_min(ValueDomain::default());
    assert_eq!(series.extents().x, Some((0.0, 2.0)));
    assert_eq!(series.extents().y, Some((0.0, 3.0)));

    let mut frame = frame();
    series.render(&mut frame, &axes).expect("render");
    assert_eq!(frame.rectangles().count(), 3);

    let query = x.transform_point(1.0, 1.0, &y);
    let hit = series.get_nearest_point(query, false, &axes).expect("hit");
    assert_eq!(hit.index, 1.0);
    assert_eq!(hit.value, Some(2.0));
    assert!(series.get_nearest_point(x.transform_point(1.0, 3.5, &y), false, &axes).is_none());
}

#[test]
fn bar_series_sharing_an_axis_sit_side_by_side() {
    let x = prepared(Axis::category(AxisPosition::Bottom, ["a"]));
    let y = prepared(Axis::linear(AxisPosition::Left).with_range(0.0, 4.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);

    let mut first = BarSeries::new().with_items([BarItem::at(0, 2.0)]);
    let mut second = BarSeries::new().with_items([BarItem::at(0, 3.0)]);
    first.set_category_slot(0, 2);
    second.set_category_slot(1, 2);

    let mut frame = frame();
    first.render(&mut frame, &axes).expect("first");
    second.render(&mut frame, &axes).expect("second");
    let rects: Vec<PlotRect> = frame.rectangles().map(|(rect, _)| rect).collect();
    assert_eq!(rects.len(), 2);
    assert!(rects[0].right() <= rects[1].left + 1e-9);
}

#[test]
fn histogram_areas_are_shares_of_counted_samples() {
    let bins = collect_histogram(&[0.5, 1.5, 1.6, 2.0, f64::NAN], &[0.0, 1.0, 2.0], BinningOptions::default())
        .expect("bins");
    assert_eq!(bins.iter().map(|bin| bin.count).collect::<Vec<_>>(), vec![1, 3]);
    assert_abs_diff_eq!(bins[0].area, 0.25);
    assert_abs_diff_eq!(bins[1].height(), 0.75);

    let rejected = collect_histogram(&[5.0], &[0.0, 1.0], BinningOptions::default());
    assert!(matches!(rejected, Err(PlotError::InvalidData(_))));

    let counted = collect_histogram(
        &[0.5, 5.0],
        &[0.0, 1.0],
        BinningOptions {
            outlier_mode: BinningOutlierMode::CountOutliers,
            ..BinningOptions::default()
        },
    )
    .expect("bins");
    assert_abs_diff_eq!(counted[0].area, 0.5);

    assert!(collect_histogram(&[0.5], &[1.0, 0.0], BinningOptions::default()).is_err());
}

#[test]
fn histogram_series_draws_each_bin() {
    let (x, y) = cartesian((0.0, 2.0), (0.0, 1.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let bins = collect_histogram(&[0.5, 1.5, 1.6], &[0.0, 1.0, 2.0], BinningOptions::default()).expect("bins");
    let mut series = HistogramSeries::new().with_items(bins).with_fill(Color::GRAY);
    series.update_max_min(ValueDomain::default());

    let mut frame = frame();
    series.render(&mut frame, &axes).expect("render");
    assert_eq!(frame.rectangles().count(), 2);

    let hit = series
        .get_nearest_point(x.transform_point(1.5, 0.2, &y), false, &axes)
        .expect("hit");
    assert_eq!(hit.index, 1.0);
}

#[test]
fn histogram_bins_below_zero_are_hit_symmetrically() {
    let (x, y) = cartesian((0.0, 2.0), (-1.0, 1.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let mut series = HistogramSeries::new().with_items(vec![
        HistogramItem::new(0.0, 1.0, -0.5, 1),
        HistogramItem::new(1.0, 2.0, 0.5, 1),
    ]);
    series.update_max_min(ValueDomain::default());
    assert_eq!(series.extents().y, Some((-0.5, 0.5)));

    let below = series
        .get_nearest_point(x.transform_point(0.5, -0.25, &y), false, &axes)
        .expect("hit below zero");
    assert_eq!(below.index, 0.0);
    assert_eq!(below.value, Some(-0.5));

    let above = series
        .get_nearest_point(x.transform_point(1.5, 0.25, &y), false, &axes)
        .expect("hit above zero");
    assert_eq!(above.index, 1.0);

    // Above zero over the negative bin is outside both bars.
    assert!(series.get_nearest_point(x.transform_point(0.5, 0.25, &y), false, &axes).is_none());
}

#[test]
fn heat_map_needs_consistent_columns_and_a_color_axis() {
    assert!(HeatMapSeries::new(0.0, 1.0, 0.0, 1.0, vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    assert!(HeatMapSeries::new(0.0, f64::NAN, 0.0, 1.0, vec![vec![1.0]]).is_err());

    let (x, y) = cartesian((-0.5, 1.5), (-0.5, 1.5));
    let mut series = HeatMapSeries::new(0.0, 1.0, 0.0, 1.0, vec![vec![0.0, 1.0], vec![2.0, 3.0]])
        .expect("heat map");
    series.update_max_min(ValueDomain::default());
    assert_eq!(series.extents().x, Some((-0.5, 1.5)));
    assert_eq!(series.extents().value, Some((0.0, 3.0)));

    let without_color = SeriesAxes::new(Some(&x), Some(&y), AREA);
    assert!(matches!(
        series.render(&mut frame(), &without_color),
        Err(PlotError::UnresolvedAxis { role: "color", .. })
    ));

    let mut color = Axis::linear_color(Palette::gray(4)).with_range(0.0, 3.0);
    color.update_actual_max_min().expect("color range");
    let axes = without_color.with_color_axis(Some(&color));
    let mut frame = frame();
    series.render(&mut frame, &axes).expect("render");
    assert_eq!(frame.rectangles().count(), 4);

    let hit = series
        .get_nearest_point(x.transform_point(1.0, 0.0, &y), false, &axes)
        .expect("hit");
    assert_eq!(hit.value, Some(2.0));
    assert_eq!(hit.data_point, DataPoint::new(1.0, 0.0));
}

#[test]
fn rectangles_take_colors_from_value() {
    let (x, y) = cartesian((0.0, 10.0), (0.0, 10.0));
    let mut color = Axis::range_color();
    color.add_range(0.0, 5.0, Color::WHITE).expect("low band");
    color.add_range(5.0, 10.0, Color::BLACK).expect("high band");
    color.update_actual_max_min().expect("color range");
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA).with_color_axis(Some(&color));

    let mut series = RectangleSeries::new().with_items([
        RectangleItem::new(0.0, 4.0, 0.0, 4.0, 1.0),
        RectangleItem::new(2.0, 6.0, 2.0, 6.0, 7.0),
        RectangleItem::new(7.0, 9.0, 7.0, 9.0, 50.0),
    ]);
    series.update_max_min(ValueDomain::default());
    let mut frame = frame();
    series.render(&mut frame, &axes).expect("render");
    let fills: Vec<Color> = frame.rectangles().map(|(_, fill)| fill).collect();
    assert_eq!(fills, vec![Color::WHITE, Color::BLACK]);

    // The overlap belongs to the rectangle drawn last.
    let hit = series
        .get_nearest_point(x.transform_point(3.0, 3.0, &y), false, &axes)
        .expect("hit");
    assert_eq!(hit.index, 1.0);
}

#[test]
fn pie_slices_are_hit_by_angle() {
    let axes = SeriesAxes::new(None, None, AREA);
    let mut series = PieSeries::new().with_slices([PieSlice::new("a", 1.0), PieSlice::new("b", 3.0)]);
    series.update_max_min(ValueDomain::default());

    let mut frame = frame();
    series.render(&mut frame, &axes).expect("render");
    assert_eq!(frame.polygons().count(), 2);
    let labels: Vec<&str> = frame.texts().map(|(_, text)| text).collect();
    assert_eq!(labels, vec!["a", "b"]);

    let diagonal = 20.0 * std::f64::consts::FRAC_1_SQRT_2;
    let first = series
        .get_nearest_point(ScreenPoint::new(50.0 + diagonal, 50.0 + diagonal), false, &axes)
        .expect("first slice");
    assert_eq!(first.index, 0.0);
    assert!(first.text.contains("25.0%"));

    let second = series
        .get_nearest_point(ScreenPoint::new(30.0, 50.0), false, &axes)
        .expect("second slice");
    assert_eq!(second.value, Some(3.0));
    assert!(series.get_nearest_point(ScreenPoint::new(99.0, 99.0), false, &axes).is_none());
}

#[test]
fn box_plot_hit_reports_nearest_feature() {
    let (x, y) = cartesian((0.0, 2.0), (0.0, 15.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let mut series = BoxPlotSeries::new().with_items([BoxPlotItem::new(1.0, 0.0, 2.0, 5.0, 7.0, 10.0)
        .with_mean(4.0)
        .with_outliers([12.0])]);
    series.update_max_min(ValueDomain::default());
    assert_eq!(series.extents().y, Some((0.0, 12.0)));

    let outlier = x.transform_point(1.0, 12.0, &y);
    let hit = series
        .get_nearest_point(ScreenPoint::new(outlier.x + 1.0, outlier.y + 1.0), false, &axes)
        .expect("outlier hit");
    assert_eq!(hit.value, Some(12.0));
    assert!(hit.text.contains("Outlier"));

    // Inside the box the median is reported.
    let inside = x.transform_point(1.05, 6.5, &y);
    let hit = series.get_nearest_point(inside, false, &axes).expect("box hit");
    assert_eq!(hit.value, Some(5.0));

    let mut frame = frame();
    series.render(&mut frame, &axes).expect("render");
    assert_eq!(frame.polygons().count(), 1);
    assert_eq!(frame.markers().count(), 2);
}
