use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::core::axis::{Axis, AxisPosition};
use crate::core::types::{PlotRect, ScreenPoint, Thickness, Viewport};
use crate::error::{PlotError, PlotResult};
use crate::extensions::{Annotation, AnnotationLayer};
use crate::render::{Color, RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign};
use crate::series::{
    AxisBinding, ColorAxisUsage, Series, SeriesAxes, TrackerHitResult, ValueDomain,
};

use super::axis_registry::{AxisId, AxisRegistry, AxisRole};
use super::axis_rendering::{render_axis, render_gridlines, render_polar_axes};
use super::default_styles::DefaultStyles;
use super::layout::{self, PlotLayout};
use super::legend::{LegendOptions, render_legend};

/// Axis ids resolved for one series or annotation binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedAxes {
    pub x: Option<AxisId>,
    pub y: Option<AxisId>,
    pub color: Option<AxisId>,
}

/// Aggregate of axes, series and annotations for one plot.
///
/// [`PlotModel::update`] aggregates series extents into axis ranges and
/// [`PlotModel::render`] lays out and draws everything; hit testing uses the
/// transforms of the last render.
#[derive(Debug)]
pub struct PlotModel {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub title_font_size: f64,
    pub subtitle_font_size: f64,
    pub text_color: Color,
    /// Space between the viewport edge and everything drawn.
    pub padding: Thickness,
    /// Space between the plot bounds and the plot area; NaN sides are sized
    /// from axis labels and titles.
    pub plot_margins: Thickness,
    pub background: Color,
    pub plot_area_background: Color,
    pub plot_area_border: Color,
    pub plot_area_border_thickness: f64,
    pub legend: LegendOptions,
    axes: AxisRegistry,
    series: Vec<Box<dyn Series>>,
    annotations: Vec<Box<dyn Annotation>>,
    styles: DefaultStyles,
    layout: PlotLayout,
}

impl Default for PlotModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            subtitle: None,
            title_font_size: 18.0,
            subtitle_font_size: 14.0,
            text_color: Color::BLACK,
            padding: Thickness::uniform(8.0),
            plot_margins: Thickness::uniform(f64::NAN),
            background: Color::TRANSPARENT,
            plot_area_background: Color::TRANSPARENT,
            plot_area_border: Color::BLACK,
            plot_area_border_thickness: 1.0,
            legend: LegendOptions::default(),
            axes: AxisRegistry::default(),
            series: Vec::new(),
            annotations: Vec::new(),
            styles: DefaultStyles::default(),
            layout: PlotLayout::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the palette used for series without explicit colors.
    pub fn set_default_colors(&mut self, colors: Vec<Color>) {
        self.styles.set_colors(colors);
    }

    pub fn add_axis(&mut self, axis: Axis) -> PlotResult<AxisId> {
        axis.validate()?;
        self.axes.add(axis)
    }

    pub fn remove_axis(&mut self, id: AxisId) -> Option<Axis> {
        self.axes.remove(id)
    }

    /// Adds a series and returns its index, used in hit results.
    pub fn add_series(&mut self, series: impl Series + 'static) -> usize {
        self.series.push(Box::new(series));
        self.series.len() - 1
    }

    pub fn add_annotation(&mut self, annotation: impl Annotation + 'static) {
        self.annotations.push(Box::new(annotation));
    }

    #[must_use]
    pub fn axes(&self) -> &AxisRegistry {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut AxisRegistry {
        &mut self.axes
    }

    #[must_use]
    pub fn axis(&self, id: AxisId) -> Option<&Axis> {
        self.axes.get(id)
    }

    pub fn axis_mut(&mut self, id: AxisId) -> Option<&mut Axis> {
        self.axes.get_mut(id)
    }

    #[must_use]
    pub fn axis_by_key(&self, key: &str) -> Option<&Axis> {
        self.axes.find_by_key(key).and_then(|id| self.axes.get(id))
    }

    #[must_use]
    pub fn series(&self, index: usize) -> Option<&dyn Series> {
        self.series.get(index).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Plot area of the last render.
    #[must_use]
    pub fn plot_area(&self) -> PlotRect {
        self.layout.plot_area
    }

    /// Resolves the axes named by `binding`.
    ///
    /// Required axes that cannot be resolved yield
    /// [`PlotError::UnresolvedAxis`].
    pub fn resolve_binding(&self, binding: &AxisBinding) -> PlotResult<ResolvedAxes> {
        let (x, y) = if binding.requires_xy {
            (
                Some(self.axes.require(binding.x_axis_key.as_deref(), AxisRole::X)?),
                Some(self.axes.require(binding.y_axis_key.as_deref(), AxisRole::Y)?),
            )
        } else {
            (None, None)
        };
        let color_key = binding.color_axis_key.as_deref();
        let color = match binding.color {
            ColorAxisUsage::None => None,
            ColorAxisUsage::Optional => self.axes.resolve(color_key, AxisRole::Color),
            ColorAxisUsage::Required => Some(self.axes.require(color_key, AxisRole::Color)?),
        };
        Ok(ResolvedAxes { x, y, color })
    }

    fn axes_view(&self, resolved: ResolvedAxes) -> SeriesAxes<'_> {
        SeriesAxes::new(
            resolved.x.and_then(|id| self.axes.get(id)),
            resolved.y.and_then(|id| self.axes.get(id)),
            self.layout.plot_area,
        )
        .with_color_axis(resolved.color.and_then(|id| self.axes.get(id)))
    }

    /// Resolved axes of series `index`, as passed to it at render time.
    pub fn series_axes(&self, index: usize) -> PlotResult<SeriesAxes<'_>> {
        let series = self.series.get(index).ok_or_else(|| {
            PlotError::InvalidArgument(format!("series index {index} out of range"))
        })?;
        let resolved = self.resolve_binding(&series.axis_binding())?;
        Ok(self.axes_view(resolved))
    }

    /// Creates default axes for roles that series or annotations need but no
    /// axis provides.
    fn ensure_default_axes(&mut self) {
        let bindings: Vec<AxisBinding> = self
            .series
            .iter()
            .filter(|series| series.is_visible())
            .map(|series| series.axis_binding())
            .chain(self.annotations.iter().map(|annotation| annotation.axis_binding()))
            .filter(|binding| binding.requires_xy)
            .collect();
        if bindings.is_empty() {
            return;
        }

        if self.axes.first_of_role(AxisRole::X).is_none() {
            let prefers_category = bindings.iter().any(|binding| binding.prefers_category_x_axis);
            let axis = if prefers_category {
                Axis::category(AxisPosition::Bottom, Vec::<String>::new())
            } else {
                Axis::linear(AxisPosition::Bottom)
            };
            debug!(category = prefers_category, "creating default x axis");
            self.axes.add_default(axis);
        }
        if self.axes.first_of_role(AxisRole::Y).is_none() {
            debug!("creating default y axis");
            self.axes
                .add_default(Axis::linear(AxisPosition::Left));
        }
    }

    /// Gives every slot-taking series on a shared category axis its position
    /// within the category.
    fn assign_category_slots(&mut self) {
        let mut groups: indexmap::IndexMap<AxisId, Vec<usize>> = indexmap::IndexMap::new();
        for (index, series) in self.series.iter().enumerate() {
            if !series.is_visible() || !series.uses_category_slot() {
                continue;
            }
            if let Ok(ResolvedAxes { x: Some(x), .. }) = self.resolve_binding(&series.axis_binding()) {
                groups.entry(x).or_default().push(index);
            }
        }
        for members in groups.values() {
            for (slot, index) in members.iter().enumerate() {
                self.series[*index].set_category_slot(slot, members.len());
            }
        }
    }

    /// Assigns default styles, optionally refreshes series data, and resolves
    /// every axis range from the series extents.
    pub fn update(&mut self, update_data: bool) -> PlotResult<()> {
        debug!(
            series = self.series.len(),
            axes = self.axes.len(),
            update_data,
            "updating plot model"
        );
        self.styles.reset();
        for series in &mut self.series {
            series.set_default_values(&mut self.styles);
            if update_data {
                series.update_data();
            }
        }

        self.ensure_default_axes();
        self.assign_category_slots();

        for (_, axis) in self.axes.iter_mut() {
            axis.reset_data_max_min();
        }
        let mut extents = Vec::with_capacity(self.series.len());
        for index in 0..self.series.len() {
            let resolved = self.resolve_binding(&self.series[index].axis_binding());
            let domain = match &resolved {
                Ok(resolved) => ValueDomain::of_axes(&self.axes_view(*resolved)),
                Err(_) => ValueDomain::default(),
            };
            let series = &mut self.series[index];
            series.update_max_min(domain);
            if !series.is_visible() {
                continue;
            }
            match resolved {
                Ok(resolved) => extents.push((resolved, series.extents())),
                Err(err) => debug!(series = index, error = %err, "series left out of axis ranges"),
            }
        }
        for (resolved, extents) in extents {
            for (id, extent) in [
                (resolved.x, extents.x),
                (resolved.y, extents.y),
                (resolved.color, extents.value),
            ] {
                if let (Some(id), Some((minimum, maximum))) = (id, extent) {
                    if let Some(axis) = self.axes.get_mut(id) {
                        axis.include_range(minimum, maximum);
                    }
                }
            }
        }

        for (_, axis) in self.axes.iter_mut() {
            axis.update_actual_max_min()?;
        }
        Ok(())
    }

    fn title_height(&self, ctx: &dyn RenderContext) -> f64 {
        let mut height = 0.0;
        if let Some(title) = &self.title {
            height += ctx
                .measure_text(title, &TextStyle::new(self.title_font_size, self.text_color))
                .y;
        }
        if let Some(subtitle) = &self.subtitle {
            height += ctx
                .measure_text(subtitle, &TextStyle::new(self.subtitle_font_size, self.text_color))
                .y;
        }
        if height > 0.0 { height + 4.0 } else { 0.0 }
    }

    /// Updates, lays out and draws the whole plot into `ctx`.
    ///
    /// A series or annotation whose axes cannot be resolved fails the render
    /// with [`PlotError::UnresolvedAxis`].
    pub fn render(&mut self, ctx: &mut dyn RenderContext, viewport: Viewport) -> PlotResult<()> {
        if !viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.update(false)?;

        let bounds = viewport.rect().deflate(self.padding);
        let title_height = self.title_height(&*ctx);
        let plot_bounds = PlotRect::new(
            bounds.left,
            bounds.top + title_height,
            bounds.width,
            (bounds.height - title_height).max(0.0),
        );
        self.layout = layout::arrange(&mut self.axes, plot_bounds, self.plot_margins, &*ctx)?;
        let plot_area = self.layout.plot_area;

        let series_axes = self
            .series
            .iter()
            .map(|series| {
                if series.is_visible() {
                    self.resolve_binding(&series.axis_binding()).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect::<PlotResult<Vec<_>>>()?;
        let annotation_axes = self
            .annotations
            .iter()
            .map(|annotation| self.resolve_binding(&annotation.axis_binding()))
            .collect::<PlotResult<Vec<_>>>()?;

        let none = StrokeStyle::none();
        ctx.draw_rectangle(viewport.rect(), self.background, &none);
        ctx.draw_rectangle(plot_area, self.plot_area_background, &none);
        for (_, axis) in self.axes.iter() {
            render_gridlines(ctx, axis, plot_area)?;
        }

        self.render_annotations(ctx, &annotation_axes, AnnotationLayer::BelowSeries)?;
        ctx.set_clip(plot_area);
        for (series, resolved) in self.series.iter().zip(&series_axes) {
            if let Some(resolved) = resolved {
                series.render(ctx, &self.axes_view(*resolved))?;
            }
        }
        ctx.reset_clip();
        self.render_annotations(ctx, &annotation_axes, AnnotationLayer::AboveSeries)?;

        self.render_axes(ctx, plot_area)?;
        ctx.draw_rectangle(
            plot_area,
            Color::TRANSPARENT,
            &StrokeStyle::solid(self.plot_area_border, self.plot_area_border_thickness),
        );
        render_legend(ctx, &self.series, &self.legend, plot_area);
        self.render_title(ctx, bounds);
        trace!(series = self.series.len(), "plot rendered");
        Ok(())
    }

    fn render_annotations(
        &self,
        ctx: &mut dyn RenderContext,
        resolved: &[ResolvedAxes],
        layer: AnnotationLayer,
    ) -> PlotResult<()> {
        ctx.set_clip(self.layout.plot_area);
        for (annotation, axes) in self.annotations.iter().zip(resolved) {
            if annotation.layer() == layer {
                annotation.render(ctx, &self.axes_view(*axes))?;
            }
        }
        ctx.reset_clip();
        Ok(())
    }

    fn render_axes(&self, ctx: &mut dyn RenderContext, plot_area: PlotRect) -> PlotResult<()> {
        let first_x = self.axes.first_of_role(AxisRole::X).and_then(|id| self.axes.get(id));
        let first_y = self.axes.first_of_role(AxisRole::Y).and_then(|id| self.axes.get(id));
        for (_, axis) in self.axes.iter() {
            let perpendicular = if axis.is_horizontal() { first_y } else { first_x };
            render_axis(ctx, axis, perpendicular, plot_area)?;
        }

        let magnitude = self
            .axes
            .iter()
            .find(|(_, axis)| axis.position == AxisPosition::Magnitude);
        let angle = self
            .axes
            .iter()
            .find(|(_, axis)| axis.position == AxisPosition::Angle);
        if let (Some((_, magnitude)), Some((_, angle))) = (magnitude, angle) {
            render_polar_axes(ctx, magnitude, angle)?;
        }
        Ok(())
    }

    fn render_title(&self, ctx: &mut dyn RenderContext, bounds: PlotRect) {
        let center_x = bounds.left + bounds.width * 0.5;
        let mut top = bounds.top;
        if let Some(title) = &self.title {
            let style = TextStyle::new(self.title_font_size, self.text_color)
                .aligned(TextHAlign::Center, TextVAlign::Top);
            ctx.draw_text(ScreenPoint::new(center_x, top), title, &style);
            top += ctx.measure_text(title, &style).y;
        }
        if let Some(subtitle) = &self.subtitle {
            let style = TextStyle::new(self.subtitle_font_size, self.text_color)
                .aligned(TextHAlign::Center, TextVAlign::Top);
            ctx.draw_text(ScreenPoint::new(center_x, top), subtitle, &style);
        }
    }

    /// Nearest item over all visible series, using the last render's
    /// transforms. `series_index` of the result is the series' position.
    #[must_use]
    pub fn get_nearest_hit(&self, point: ScreenPoint, interpolate: bool) -> Option<TrackerHitResult> {
        self.series
            .iter()
            .enumerate()
            .filter(|(_, series)| series.is_visible())
            .filter_map(|(index, series)| {
                let resolved = self.resolve_binding(&series.axis_binding()).ok()?;
                let mut hit = series.get_nearest_point(point, interpolate, &self.axes_view(resolved))?;
                hit.series_index = index;
                Some(hit)
            })
            .min_by_key(|hit| OrderedFloat(hit.distance_to(point)))
    }

    /// Axes addressed by a pointer position: the default x/y axes inside the
    /// plot area, or the single axis whose band contains the point.
    #[must_use]
    pub fn axes_at_point(&self, point: ScreenPoint) -> (Option<AxisId>, Option<AxisId>) {
        if self.layout.plot_area.contains(point) {
            return (
                self.axes.first_of_role(AxisRole::X),
                self.axes.first_of_role(AxisRole::Y),
            );
        }
        for (id, band) in &self.layout.axis_bands {
            if !band.contains(point) {
                continue;
            }
            return match self.axes.get(*id) {
                Some(axis) if axis.is_vertical() => (None, Some(*id)),
                Some(_) => (Some(*id), None),
                None => (None, None),
            };
        }
        (None, None)
    }

    /// Pans the given axes by the pointer displacement.
    pub fn pan_axes(&mut self, ids: &[AxisId], previous: ScreenPoint, current: ScreenPoint) -> bool {
        let mut changed = false;
        for id in ids {
            if let Some(axis) = self.axes.get_mut(*id) {
                changed |= axis.pan(previous, current);
            }
        }
        changed
    }

    /// Pans every cartesian axis by the pointer displacement.
    pub fn pan_all(&mut self, previous: ScreenPoint, current: ScreenPoint) -> bool {
        let mut changed = false;
        for (_, axis) in self.axes.iter_mut() {
            if is_navigable(axis) {
                changed |= axis.pan(previous, current);
            }
        }
        changed
    }

    /// Zooms the given axes by `factor` around the pointer position.
    pub fn zoom_axes_at(&mut self, ids: &[AxisId], factor: f64, point: ScreenPoint) -> bool {
        let mut changed = false;
        for id in ids {
            if let Some(axis) = self.axes.get_mut(*id) {
                changed |= zoom_axis_at(axis, factor, point);
            }
        }
        changed
    }

    /// Zooms every cartesian axis by `factor` around the pointer position.
    pub fn zoom_all_at(&mut self, factor: f64, point: ScreenPoint) -> bool {
        let mut changed = false;
        for (_, axis) in self.axes.iter_mut() {
            if is_navigable(axis) {
                changed |= zoom_axis_at(axis, factor, point);
            }
        }
        changed
    }

    /// Drops every pan/zoom view range.
    pub fn reset_all_axes(&mut self) {
        for (_, axis) in self.axes.iter_mut() {
            axis.reset();
        }
    }
}

fn is_navigable(axis: &Axis) -> bool {
    !axis.is_color_axis() && (axis.is_horizontal() || axis.is_vertical())
}

fn zoom_axis_at(axis: &mut Axis, factor: f64, point: ScreenPoint) -> bool {
    if !axis.is_transform_ready() {
        return false;
    }
    let screen = if axis.is_vertical() { point.y } else { point.x };
    let center = axis.inverse_transform(screen);
    axis.zoom_at(factor, center)
}
