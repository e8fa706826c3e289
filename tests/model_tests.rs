use xyplot::core::{Axis, AxisKind, AxisPosition, DataPoint, ScreenPoint, Viewport};
use xyplot::extensions::RectangleAnnotation;
use xyplot::model::AxisRole;
use xyplot::render::{Color, DrawCommand, Palette, RenderFrame};
use xyplot::series::{BarSeries, HeatMapSeries, LineSeries};
use xyplot::{PlotError, PlotModel};

const RED: Color = Color::rgb(1.0, 0.0, 0.0);
const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

fn line(points: &[(f64, f64)]) -> LineSeries {
    LineSeries::new().with_points(points.iter().map(|&(x, y)| DataPoint::new(x, y)))
}

fn render(model: &mut PlotModel) -> RenderFrame {
    let viewport = Viewport::new(640, 480);
    let mut frame = RenderFrame::new(viewport);
    model.render(&mut frame, viewport).expect("render");
    frame
}

#[test]
fn missing_axes_are_created_for_series() {
    let mut model = PlotModel::new();
    model.add_series(line(&[(0.0, 1.0), (10.0, 5.0)]));
    model.update(false).expect("update");

    assert_eq!(model.axes().len(), 2);
    let x = model
        .axes()
        .first_of_role(AxisRole::X)
        .and_then(|id| model.axis(id))
        .expect("default x axis");
    assert_eq!(x.position, AxisPosition::Bottom);
    assert!(x.actual_minimum() <= 0.0 && x.actual_maximum() >= 10.0);
}

#[test]
fn bar_series_get_a_default_category_axis() {
    let mut model = PlotModel::new();
    model.add_series(BarSeries::new().with_values([1.0, 2.0, 3.0]));
    model.update(false).expect("update");

    let id = model.axes().first_of_role(AxisRole::X).expect("x axis");
    let x = model.axis(id).expect("axis");
    assert!(matches!(x.kind, AxisKind::Category(_)));
    assert_eq!(x.actual_minimum(), -0.5);
    assert_eq!(x.actual_maximum(), 2.5);
}

#[test]
fn user_axis_replaces_default_axis() {
    let mut model = PlotModel::new();
    model.add_series(line(&[(0.0, 0.0), (1.0, 1.0)]));
    model.update(false).expect("update");
    let default_x = model.axes().first_of_role(AxisRole::X).expect("default x");
    assert!(model.axes().is_default(default_x));

    let user_x = model
        .add_axis(Axis::linear(AxisPosition::Top).with_range(-5.0, 5.0))
        .expect("user axis");
    assert!(model.axis(default_x).is_none());
    assert_eq!(model.axes().first_of_role(AxisRole::X), Some(user_x));

    model.update(false).expect("update");
    let x = model.axis(user_x).expect("axis");
    assert_eq!((x.actual_minimum(), x.actual_maximum()), (-5.0, 5.0));
}

#[test]
fn invalid_axis_configuration_is_rejected_on_add() {
    let mut model = PlotModel::new();
    let result = model.add_axis(Axis::linear(AxisPosition::Left).with_absolute_range(5.0, 1.0));
    assert!(matches!(result, Err(PlotError::InvalidConfiguration(_))));
    assert!(model.axes().is_empty());
}

#[test]
fn series_bind_to_keyed_axes() {
    let mut model = PlotModel::new();
    model.add_axis(Axis::linear(AxisPosition::Bottom)).expect("x");
    model.add_axis(Axis::linear(AxisPosition::Left)).expect("left");
    model
        .add_axis(Axis::linear(AxisPosition::Right).with_key("right"))
        .expect("right");
    model.add_series(line(&[(0.0, 100.0), (1.0, 200.0)]).with_axis_keys("missing", "right"));
    model.add_series(line(&[(0.0, 1.0), (1.0, 2.0)]));
    render(&mut model);

    let bound = model.series_axes(0).expect("resolved");
    assert_eq!(bound.x.map(|axis| axis.position), Some(AxisPosition::Bottom));
    assert_eq!(bound.y.map(|axis| axis.position), Some(AxisPosition::Right));

    let right = model.axis_by_key("right").expect("right axis");
    assert!(right.actual_minimum() <= 100.0 && right.actual_maximum() >= 200.0);
    let left = model
        .axes()
        .iter()
        .find(|(_, axis)| axis.position == AxisPosition::Left)
        .map(|(_, axis)| axis)
        .expect("left axis");
    assert!(left.actual_maximum() < 100.0);
}

#[test]
fn points_outside_a_logarithmic_axis_do_not_widen_any_axis() {
    let mut model = PlotModel::new();
    let x_id = model.add_axis(Axis::linear(AxisPosition::Bottom)).expect("x");
    let y_id = model
        .add_axis(Axis::logarithmic(AxisPosition::Left, 10.0))
        .expect("log y");
    model.add_series(line(&[(-50.0, -1.0), (2.0, 5.0), (3.0, 100.0)]));
    render(&mut model);

    let y = model.axis(y_id).expect("y axis");
    assert!(y.actual_minimum() > 0.0 && y.actual_minimum() <= 5.0);
    assert!(y.actual_maximum() >= 100.0);
    let x = model.axis(x_id).expect("x axis");
    assert!(x.actual_minimum() > 1.0, "x range starts at {}", x.actual_minimum());
    assert!(x.actual_maximum() >= 3.0);
}

#[test]
fn series_without_required_color_axis_fails_render() {
    let mut model = PlotModel::new();
    model.add_series(
        HeatMapSeries::new(0.0, 1.0, 0.0, 1.0, vec![vec![0.0, 1.0], vec![2.0, 3.0]]).expect("heat map"),
    );
    let viewport = Viewport::new(320, 240);
    let mut frame = RenderFrame::new(viewport);
    let result = model.render(&mut frame, viewport);
    assert!(matches!(
        result,
        Err(PlotError::UnresolvedAxis { role: "color", .. })
    ));

    model
        .add_axis(Axis::linear_color(Palette::hot(16)).with_position(AxisPosition::Right))
        .expect("color axis");
    let frame = render(&mut model);
    assert!(frame.rectangles().count() >= 4);
}

#[test]
fn invalid_viewport_is_rejected() {
    let mut model = PlotModel::new();
    let viewport = Viewport::new(0, 100);
    let mut frame = RenderFrame::new(viewport);
    assert!(matches!(
        model.render(&mut frame, viewport),
        Err(PlotError::InvalidViewport { .. })
    ));
}

#[test]
fn default_colors_cycle_through_series() {
    let mut model = PlotModel::new();
    model.set_default_colors(vec![RED, BLUE]);
    model.add_series(line(&[(0.0, 0.0), (1.0, 1.0)]));
    model.add_series(line(&[(0.0, 1.0), (1.0, 0.0)]));
    model.add_series(line(&[(0.0, 0.5), (1.0, 0.5)]));
    let frame = render(&mut model);

    let strokes: Vec<_> = frame
        .lines()
        .filter(|(_, stroke)| stroke.color == RED || stroke.color == BLUE)
        .map(|(_, stroke)| (stroke.color, stroke.dash_pattern.is_some()))
        .collect();
    assert_eq!(strokes, vec![(RED, false), (BLUE, false), (RED, true)]);

    // Rendering again hands out the same colors.
    let again = render(&mut model);
    assert_eq!(frame.commands, again.commands);
}

#[test]
fn below_series_annotations_are_drawn_first() {
    let mut model = PlotModel::new();
    model.set_default_colors(vec![RED]);
    model.add_series(line(&[(0.0, 0.0), (1.0, 1.0)]));
    model.add_annotation(RectangleAnnotation::new().with_x_range(0.2, 0.4).with_fill(BLUE));
    let frame = render(&mut model);

    let band = frame
        .commands
        .iter()
        .position(|command| matches!(command, DrawCommand::Rectangle { fill, .. } if *fill == BLUE))
        .expect("annotation drawn");
    let series = frame
        .commands
        .iter()
        .position(|command| matches!(command, DrawCommand::Line { stroke, .. } if stroke.color == RED))
        .expect("series drawn");
    assert!(band < series);
    assert_eq!(model.annotation_count(), 1);
}

#[test]
fn title_and_legend_are_drawn() {
    let mut model = PlotModel::new().with_title("Temperatures");
    model.add_series(line(&[(0.0, 0.0), (1.0, 1.0)]).with_title("inside"));
    let frame = render(&mut model);
    let texts: Vec<&str> = frame.texts().map(|(_, text)| text).collect();
    assert!(texts.contains(&"Temperatures"));
    assert!(texts.contains(&"inside"));
    frame.validate().expect("valid frame");
}

#[test]
fn nearest_hit_reports_series_position() {
    let mut model = PlotModel::new();
    model.add_series(line(&[(0.0, 0.0), (10.0, 0.0)]));
    model.add_series(line(&[(0.0, 10.0), (10.0, 10.0)]));
    render(&mut model);

    let area = model.plot_area();
    let near_top = ScreenPoint::new(area.left + 1.0, area.top + 1.0);
    let hit = model.get_nearest_hit(near_top, false).expect("hit");
    assert_eq!(hit.series_index, 1);
    assert_eq!(hit.data_point, DataPoint::new(0.0, 10.0));
}

#[test]
fn pan_and_zoom_move_every_cartesian_axis() {
    let mut model = PlotModel::new();
    model.add_axis(Axis::linear(AxisPosition::Bottom).with_range(0.0, 100.0)).expect("x");
    model.add_axis(Axis::linear(AxisPosition::Left).with_range(0.0, 100.0)).expect("y");
    model.add_series(line(&[(0.0, 0.0), (100.0, 100.0)]));
    render(&mut model);

    let center = model.plot_area().center();
    let x_id = model.axes().first_of_role(AxisRole::X).expect("x");
    let before = model.axis(x_id).expect("x").actual_maximum() - model.axis(x_id).expect("x").actual_minimum();

    assert!(model.zoom_all_at(2.0, center));
    let x = model.axis(x_id).expect("x");
    let after = x.actual_maximum() - x.actual_minimum();
    assert!((after - before * 0.5).abs() < 1e-9);

    render(&mut model);
    assert!(model.pan_all(center, ScreenPoint::new(center.x - 10.0, center.y)));
    assert!(model.axis(x_id).expect("x").actual_minimum() > 25.0);

    model.reset_all_axes();
    render(&mut model);
    assert_eq!(model.axis(x_id).expect("x").actual_minimum(), 0.0);
}
