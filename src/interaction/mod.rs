mod hover_delay;

pub use hover_delay::{HoverDelay, HoverPhase, HoverTransition};

use serde::{Deserialize, Serialize};

use crate::core::types::ScreenPoint;
use crate::series::TrackerHitResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackerMode {
    /// Tracker snaps to the nearest rendered item.
    #[default]
    Nearest,
    /// Tracker interpolates along line segments and heat map cells.
    Interpolated,
    /// Tracker stays hidden regardless of pointer movement.
    Hidden,
}

impl TrackerMode {
    #[must_use]
    pub fn interpolates(self) -> bool {
        self == Self::Interpolated
    }
}

/// Tracker state exposed to host applications.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerState {
    pub visible: bool,
    pub pointer: ScreenPoint,
    /// Hit under the pointer; kept while a hide delay runs.
    pub hit: Option<TrackerHitResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    tracker_mode: TrackerMode,
    cursor: Option<ScreenPoint>,
    pan_anchor: Option<ScreenPoint>,
    tracker: TrackerState,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            tracker_mode: TrackerMode::Nearest,
            cursor: None,
            pan_anchor: None,
            tracker: TrackerState::default(),
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn tracker_mode(&self) -> TrackerMode {
        self.tracker_mode
    }

    pub fn set_tracker_mode(&mut self, mode: TrackerMode) {
        self.tracker_mode = mode;
        if mode == TrackerMode::Hidden {
            self.hide_tracker();
        }
    }

    /// Last pointer position inside the surface, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<ScreenPoint> {
        self.cursor
    }

    #[must_use]
    pub fn tracker(&self) -> &TrackerState {
        &self.tracker
    }

    pub fn on_pointer_move(&mut self, point: ScreenPoint) {
        self.cursor = Some(point);
        self.tracker.pointer = point;
    }

    pub fn on_pointer_leave(&mut self) {
        self.cursor = None;
    }

    /// Replaces the pending hit; visibility is switched separately so that
    /// show/hide delays can gate it.
    pub fn set_tracker_hit(&mut self, hit: Option<TrackerHitResult>) {
        self.tracker.hit = hit;
    }

    pub fn show_tracker(&mut self) {
        if self.tracker_mode != TrackerMode::Hidden && self.tracker.hit.is_some() {
            self.tracker.visible = true;
        }
    }

    pub fn hide_tracker(&mut self) {
        self.tracker.visible = false;
        self.tracker.hit = None;
    }

    pub fn on_pan_start(&mut self, point: ScreenPoint) {
        self.mode = InteractionMode::Panning;
        self.pan_anchor = Some(point);
        self.hide_tracker();
    }

    /// Moves the pan anchor and returns the `(previous, current)` pointer
    /// pair to pan by, or `None` when no pan is in progress.
    pub fn on_pan_move(&mut self, point: ScreenPoint) -> Option<(ScreenPoint, ScreenPoint)> {
        if self.mode != InteractionMode::Panning {
            return None;
        }
        let previous = self.pan_anchor.replace(point)?;
        Some((previous, point))
    }

    pub fn on_pan_end(&mut self) {
        self.mode = InteractionMode::Idle;
        self.pan_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_move_reports_displacement_since_last_move() {
        let mut state = InteractionState::default();
        assert_eq!(state.on_pan_move(ScreenPoint::new(1.0, 1.0)), None);

        state.on_pan_start(ScreenPoint::new(10.0, 10.0));
        assert_eq!(state.mode(), InteractionMode::Panning);
        let first = state.on_pan_move(ScreenPoint::new(15.0, 10.0));
        assert_eq!(first, Some((ScreenPoint::new(10.0, 10.0), ScreenPoint::new(15.0, 10.0))));
        let second = state.on_pan_move(ScreenPoint::new(20.0, 12.0));
        assert_eq!(second, Some((ScreenPoint::new(15.0, 10.0), ScreenPoint::new(20.0, 12.0))));

        state.on_pan_end();
        assert_eq!(state.mode(), InteractionMode::Idle);
        assert_eq!(state.on_pan_move(ScreenPoint::new(30.0, 12.0)), None);
    }

    #[test]
    fn hidden_mode_never_shows_tracker() {
        let mut state = InteractionState::default();
        state.set_tracker_mode(TrackerMode::Hidden);
        state.set_tracker_hit(Some(TrackerHitResult::default()));
        state.show_tracker();
        assert!(!state.tracker().visible);
    }
}
