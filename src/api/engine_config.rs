use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{PlotError, PlotResult};
use crate::interaction::TrackerMode;

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load plot
/// interaction setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub tracker_mode: TrackerMode,
    /// Hits farther than this many pixels from the pointer are ignored.
    #[serde(default = "default_hit_tolerance_px")]
    pub hit_tolerance_px: f64,
    /// Zoom factor applied per wheel step.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    #[serde(default = "default_enabled")]
    pub pan_enabled: bool,
    #[serde(default = "default_enabled")]
    pub zoom_enabled: bool,
    #[serde(default)]
    pub tracker_show_delay_ms: u64,
    #[serde(default)]
    pub tracker_hide_delay_ms: u64,
}

impl PlotEngineConfig {
    /// Creates a config with default interaction behavior.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            tracker_mode: TrackerMode::default(),
            hit_tolerance_px: default_hit_tolerance_px(),
            zoom_step: default_zoom_step(),
            pan_enabled: true,
            zoom_enabled: true,
            tracker_show_delay_ms: 0,
            tracker_hide_delay_ms: 0,
        }
    }

    #[must_use]
    pub fn with_tracker_mode(mut self, mode: TrackerMode) -> Self {
        self.tracker_mode = mode;
        self
    }

    #[must_use]
    pub fn with_hit_tolerance_px(mut self, tolerance: f64) -> Self {
        self.hit_tolerance_px = tolerance;
        self
    }

    #[must_use]
    pub fn with_zoom_step(mut self, zoom_step: f64) -> Self {
        self.zoom_step = zoom_step;
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, pan_enabled: bool, zoom_enabled: bool) -> Self {
        self.pan_enabled = pan_enabled;
        self.zoom_enabled = zoom_enabled;
        self
    }

    /// Sets tooltip show/hide delays in milliseconds.
    #[must_use]
    pub fn with_tracker_delays(mut self, show_delay_ms: u64, hide_delay_ms: u64) -> Self {
        self.tracker_show_delay_ms = show_delay_ms;
        self.tracker_hide_delay_ms = hide_delay_ms;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.hit_tolerance_px.is_finite() || self.hit_tolerance_px < 0.0 {
            return Err(PlotError::InvalidData(format!(
                "hit tolerance must be finite and >= 0, got {}",
                self.hit_tolerance_px
            )));
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(PlotError::InvalidData(format!(
                "zoom step must be finite and > 1, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> PlotResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| PlotError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| PlotError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_hit_tolerance_px() -> f64 {
    20.0
}

fn default_zoom_step() -> f64 {
    1.2
}

fn default_enabled() -> bool {
    true
}
