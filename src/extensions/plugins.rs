use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::interaction::{InteractionMode, TrackerMode};

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotContext {
    pub viewport: Viewport,
    pub series_count: usize,
    pub axis_count: usize,
    pub interaction_mode: InteractionMode,
    pub tracker_mode: TrackerMode,
    pub tracker_visible: bool,
    /// Series index of the current tracker hit, if any.
    pub tracker_series_index: Option<usize>,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlotEvent {
    PointerMoved { x: f64, y: f64 },
    PointerLeft,
    PanStarted,
    PanEnded,
    /// An axis view range changed through pan, zoom or reset.
    AxesChanged,
    TrackerShown { series_index: usize },
    TrackerHidden,
    Rendered,
}

/// Observer hook registered on the engine.
///
/// Plugins see events and a context snapshot; they cannot mutate the model.
pub trait PlotPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: PlotEvent, context: PlotContext);
}
