use approx::assert_abs_diff_eq;
use xyplot::core::{Axis, AxisPosition, PlotRect, ScreenPoint, Viewport};
use xyplot::extensions::{
    Annotation, AnnotationLayer, LineAnnotation, RectangleAnnotation, TextAnnotation,
};
use xyplot::render::{Color, RenderFrame};
use xyplot::series::SeriesAxes;

const AREA: PlotRect = PlotRect::new(0.0, 0.0, 100.0, 100.0);

fn prepared(mut axis: Axis) -> Axis {
    axis.update_actual_max_min().expect("actual range");
    axis.update_transform(AREA).expect("transform");
    axis.update_intervals();
    axis
}

fn linear_axes() -> (Axis, Axis) {
    (
        prepared(Axis::linear(AxisPosition::Bottom).with_range(0.0, 10.0)),
        prepared(Axis::linear(AxisPosition::Left).with_range(0.0, 10.0)),
    )
}

fn render(annotation: &dyn Annotation, axes: &SeriesAxes<'_>) -> RenderFrame {
    let mut frame = RenderFrame::new(Viewport::new(100, 100));
    annotation.render(&mut frame, axes).expect("render");
    frame
}

#[test]
fn horizontal_line_spans_the_x_range() {
    let (x, y) = linear_axes();
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let frame = render(&LineAnnotation::horizontal(5.0).with_text("limit"), &axes);

    let lines: Vec<_> = frame.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0].0,
        &[ScreenPoint::new(0.0, 50.0), ScreenPoint::new(100.0, 50.0)]
    );
    // Dashed by default.
    assert!(lines[0].1.dash_pattern.is_some());

    let texts: Vec<_> = frame.texts().collect();
    assert_eq!(texts, vec![(ScreenPoint::new(100.0, 50.0), "limit")]);
}

#[test]
fn line_outside_the_view_draws_nothing() {
    let (x, y) = linear_axes();
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let frame = render(&LineAnnotation::vertical(20.0), &axes);
    assert_eq!(frame.lines().count(), 0);
}

#[test]
fn linear_equation_is_clipped_to_plot_area() {
    let (x, y) = linear_axes();
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let frame = render(&LineAnnotation::linear_equation(2.0, 0.0), &axes);

    let lines: Vec<_> = frame.lines().collect();
    assert_eq!(lines.len(), 1);
    let end = lines[0].0.last().copied().expect("end point");
    // y = 2x leaves the view at x = 5.
    assert_abs_diff_eq!(end.x, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(end.y, 0.0, epsilon = 1e-9);
}

#[test]
fn linear_equation_is_sampled_on_logarithmic_axes() {
    let x = prepared(Axis::linear(AxisPosition::Bottom).with_range(0.0, 10.0));
    let y = prepared(Axis::logarithmic(AxisPosition::Left, 10.0).with_range(1.0, 100.0));
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let frame = render(&LineAnnotation::linear_equation(5.0, 1.0), &axes);

    let points: usize = frame.lines().map(|(points, _)| points.len()).sum();
    assert!(points > 2, "expected a sampled curve, got {points} points");
}

#[test]
fn rectangle_with_open_edges_extends_to_axis_range() {
    let (x, y) = linear_axes();
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);
    let band = RectangleAnnotation::new()
        .with_y_range(2.0, 4.0)
        .with_fill(Color::LIGHT_GRAY)
        .with_text("band");
    assert_eq!(band.layer(), AnnotationLayer::BelowSeries);

    let rect = band.screen_rect(&axes).expect("visible");
    assert_abs_diff_eq!(rect.left, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rect.width, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rect.top, 60.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rect.height, 20.0, epsilon = 1e-9);

    let frame = render(&band, &axes);
    assert_eq!(frame.rectangles().count(), 1);
    assert_eq!(frame.texts().map(|(_, text)| text).collect::<Vec<_>>(), vec!["band"]);

    let hidden = RectangleAnnotation::new().with_x_range(20.0, 30.0);
    assert!(hidden.screen_rect(&axes).is_none());
}

#[test]
fn text_outside_plot_area_is_skipped() {
    let (x, y) = linear_axes();
    let axes = SeriesAxes::new(Some(&x), Some(&y), AREA);

    let inside = render(&TextAnnotation::new(5.0, 5.0, "peak"), &axes);
    assert_eq!(
        inside.texts().collect::<Vec<_>>(),
        vec![(ScreenPoint::new(50.0, 50.0), "peak")]
    );

    let outside = render(&TextAnnotation::new(50.0, 5.0, "far"), &axes);
    assert_eq!(outside.texts().count(), 0);
}

#[test]
fn annotations_need_resolved_axes() {
    let (x, _) = linear_axes();
    let axes = SeriesAxes::new(Some(&x), None, AREA);
    let mut frame = RenderFrame::new(Viewport::new(100, 100));
    assert!(LineAnnotation::horizontal(1.0).render(&mut frame, &axes).is_err());
    assert!(RectangleAnnotation::new().render(&mut frame, &axes).is_err());
}
