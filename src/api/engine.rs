use tracing::{debug, trace};

use crate::core::{ScreenPoint, Viewport};
use crate::error::{PlotError, PlotResult};
use crate::extensions::{PlotContext, PlotEvent, PlotPlugin};
use crate::interaction::{
    HoverDelay, HoverTransition, InteractionMode, InteractionState, TrackerMode, TrackerState,
};
use crate::model::{AxisId, PlotModel};
use crate::render::{RenderFrame, Renderer};

use super::PlotEngineConfig;

/// Axes a pan gesture moves, captured when the gesture starts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PanTarget {
    /// Every cartesian axis (gesture started inside the plot area).
    All,
    Axes(Vec<AxisId>),
}

/// Main orchestration facade consumed by host applications.
///
/// `PlotEngine` owns the plot model, interaction state and renderer; hosts
/// feed it pointer input and timestamps and call [`PlotEngine::render`].
pub struct PlotEngine<R: Renderer> {
    renderer: R,
    model: PlotModel,
    config: PlotEngineConfig,
    interaction: InteractionState,
    hover: HoverDelay,
    pan_target: Option<PanTarget>,
    plugins: Vec<Box<dyn PlotPlugin>>,
}

impl<R: Renderer> PlotEngine<R> {
    pub fn new(renderer: R, model: PlotModel, config: PlotEngineConfig) -> PlotResult<Self> {
        config.validate()?;
        let mut interaction = InteractionState::default();
        interaction.set_tracker_mode(config.tracker_mode);
        Ok(Self {
            renderer,
            model,
            config,
            interaction,
            hover: HoverDelay::new(config.tracker_show_delay_ms, config.tracker_hide_delay_ms),
            pan_target: None,
            plugins: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> PlotEngineConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> PlotResult<()> {
        if !viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.config.viewport = viewport;
        Ok(())
    }

    #[must_use]
    pub fn model(&self) -> &PlotModel {
        &self.model
    }

    /// Mutable model access; changes show up on the next render.
    pub fn model_mut(&mut self) -> &mut PlotModel {
        &mut self.model
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    #[must_use]
    pub fn tracker(&self) -> &TrackerState {
        self.interaction.tracker()
    }

    pub fn set_tracker_mode(&mut self, mode: TrackerMode) {
        self.config.tracker_mode = mode;
        self.interaction.set_tracker_mode(mode);
        if mode == TrackerMode::Hidden {
            self.hover.reset();
        }
    }

    /// Records a full frame for the current model without presenting it.
    pub fn build_render_frame(&mut self) -> PlotResult<RenderFrame> {
        let viewport = self.config.viewport;
        let mut frame = RenderFrame::new(viewport);
        self.model.render(&mut frame, viewport)?;
        Ok(frame)
    }

    pub fn render(&mut self) -> PlotResult<()> {
        let frame = self.build_render_frame()?;
        debug!(
            width = self.config.viewport.width,
            height = self.config.viewport.height,
            commands = frame.commands.len(),
            "rendering plot frame"
        );
        self.renderer.render(&frame)?;
        self.emit_plugin_event(PlotEvent::Rendered);
        Ok(())
    }

    /// Moves the pointer at time `now_ms`.
    ///
    /// While panning this pans the captured axes; otherwise it refreshes the
    /// tracker hit and arms the show or hide delay.
    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: u64) {
        let point = ScreenPoint::new(x, y);
        self.interaction.on_pointer_move(point);
        self.emit_plugin_event(PlotEvent::PointerMoved { x, y });

        if self.interaction.mode() == InteractionMode::Panning {
            self.pan_move(x, y);
            return;
        }
        if self.interaction.tracker_mode() == TrackerMode::Hidden {
            return;
        }

        let interpolate = self.interaction.tracker_mode().interpolates();
        let hit = self
            .model
            .get_nearest_hit(point, interpolate)
            .filter(|hit| hit.distance_to(point) <= self.config.hit_tolerance_px);
        match hit {
            Some(hit) => {
                trace!(series = hit.series_index, index = hit.index, "tracker hit");
                self.interaction.set_tracker_hit(Some(hit));
                self.hover.arm_show(now_ms);
            }
            None => self.hover.arm_hide(now_ms),
        }
        self.poll_hover(now_ms);
    }

    pub fn pointer_leave(&mut self, now_ms: u64) {
        self.interaction.on_pointer_leave();
        self.hover.arm_hide(now_ms);
        self.emit_plugin_event(PlotEvent::PointerLeft);
        self.poll_hover(now_ms);
    }

    /// Fires due tooltip timers. Returns `true` when tracker visibility
    /// changed.
    pub fn poll_hover(&mut self, now_ms: u64) -> bool {
        let was_visible = self.interaction.tracker().visible;
        match self.hover.poll(now_ms) {
            Some(HoverTransition::Show) => self.interaction.show_tracker(),
            Some(HoverTransition::Hide) => self.interaction.hide_tracker(),
            None => {}
        }
        let tracker = self.interaction.tracker();
        if tracker.visible == was_visible {
            return false;
        }
        let event = match (tracker.visible, &tracker.hit) {
            (true, Some(hit)) => PlotEvent::TrackerShown {
                series_index: hit.series_index,
            },
            _ => PlotEvent::TrackerHidden,
        };
        self.emit_plugin_event(event);
        true
    }

    /// Starts a pan gesture at the pointer position.
    ///
    /// Inside the plot area every cartesian axis pans; on an axis band only
    /// that axis pans.
    pub fn pan_start(&mut self, x: f64, y: f64) {
        if !self.config.pan_enabled {
            return;
        }
        let point = ScreenPoint::new(x, y);
        let target = if self.model.plot_area().contains(point) {
            PanTarget::All
        } else {
            let (x_axis, y_axis) = self.model.axes_at_point(point);
            PanTarget::Axes(x_axis.into_iter().chain(y_axis).collect())
        };
        debug!(?target, "pan started");
        self.pan_target = Some(target);
        self.hover.reset();
        self.interaction.on_pan_start(point);
        self.emit_plugin_event(PlotEvent::PanStarted);
    }

    /// Pans by the displacement since the previous pan position. Returns
    /// `true` when an axis moved.
    pub fn pan_move(&mut self, x: f64, y: f64) -> bool {
        let Some((previous, current)) = self.interaction.on_pan_move(ScreenPoint::new(x, y)) else {
            return false;
        };
        let changed = match &self.pan_target {
            Some(PanTarget::All) => self.model.pan_all(previous, current),
            Some(PanTarget::Axes(ids)) => self.model.pan_axes(ids, previous, current),
            None => false,
        };
        if changed {
            self.emit_plugin_event(PlotEvent::AxesChanged);
        }
        changed
    }

    pub fn pan_end(&mut self) {
        if self.interaction.mode() != InteractionMode::Panning {
            return;
        }
        self.interaction.on_pan_end();
        self.pan_target = None;
        self.emit_plugin_event(PlotEvent::PanEnded);
    }

    /// Zooms around the pointer by `steps` wheel notches; positive steps
    /// zoom in. Returns `true` when an axis range changed.
    pub fn wheel_zoom(&mut self, x: f64, y: f64, steps: f64) -> bool {
        if !self.config.zoom_enabled || !steps.is_finite() || steps == 0.0 {
            return false;
        }
        let point = ScreenPoint::new(x, y);
        let factor = self.config.zoom_step.powf(steps);
        let changed = if self.model.plot_area().contains(point) {
            self.model.zoom_all_at(factor, point)
        } else {
            let (x_axis, y_axis) = self.model.axes_at_point(point);
            let ids: Vec<AxisId> = x_axis.into_iter().chain(y_axis).collect();
            self.model.zoom_axes_at(&ids, factor, point)
        };
        if changed {
            trace!(factor, "wheel zoom applied");
            self.emit_plugin_event(PlotEvent::AxesChanged);
        }
        changed
    }

    /// Restores every axis to its automatic range.
    pub fn reset_axes(&mut self) {
        self.model.reset_all_axes();
        self.emit_plugin_event(PlotEvent::AxesChanged);
    }

    /// Registers a plugin with unique identifier.
    pub fn register_plugin(&mut self, plugin: Box<dyn PlotPlugin>) -> PlotResult<()> {
        let plugin_id = plugin.id().to_owned();
        if plugin_id.is_empty() {
            return Err(PlotError::InvalidData(
                "plugin id must not be empty".to_owned(),
            ));
        }
        if self.has_plugin(&plugin_id) {
            return Err(PlotError::InvalidData(format!(
                "plugin with id `{plugin_id}` is already registered"
            )));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Unregisters a plugin by id. Returns `true` when removed.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        if let Some(position) = self.plugins.iter().position(|entry| entry.id() == plugin_id) {
            self.plugins.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.id() == plugin_id)
    }

    fn plugin_context(&self) -> PlotContext {
        let tracker = self.interaction.tracker();
        PlotContext {
            viewport: self.config.viewport,
            series_count: self.model.series_count(),
            axis_count: self.model.axes().len(),
            interaction_mode: self.interaction.mode(),
            tracker_mode: self.interaction.tracker_mode(),
            tracker_visible: tracker.visible,
            tracker_series_index: tracker.hit.as_ref().map(|hit| hit.series_index),
        }
    }

    fn emit_plugin_event(&mut self, event: PlotEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.plugins {
            plugin.on_event(event, context);
        }
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
