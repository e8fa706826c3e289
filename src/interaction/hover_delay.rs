use serde::{Deserialize, Serialize};

/// Where a [`HoverDelay`] is in its show/hide cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoverPhase {
    #[default]
    Hidden,
    PendingShow {
        due_ms: u64,
    },
    Shown,
    PendingHide {
        due_ms: u64,
    },
}

/// Transition reported by [`HoverDelay::poll`] when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverTransition {
    Show,
    Hide,
}

/// Cancellable show/hide timer for tooltips.
///
/// The caller supplies monotonic millisecond timestamps; nothing runs in the
/// background. Arming a timer replaces any pending one of the opposite kind,
/// so a pointer that leaves and re-enters before the hide delay elapses keeps
/// the tooltip shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverDelay {
    show_delay_ms: u64,
    hide_delay_ms: u64,
    phase: HoverPhase,
}

impl HoverDelay {
    #[must_use]
    pub fn new(show_delay_ms: u64, hide_delay_ms: u64) -> Self {
        Self {
            show_delay_ms,
            hide_delay_ms,
            phase: HoverPhase::Hidden,
        }
    }

    #[must_use]
    pub fn phase(self) -> HoverPhase {
        self.phase
    }

    /// Whether the tooltip counts as shown, including while a hide is pending.
    #[must_use]
    pub fn is_shown(self) -> bool {
        matches!(self.phase, HoverPhase::Shown | HoverPhase::PendingHide { .. })
    }

    pub fn arm_show(&mut self, now_ms: u64) {
        self.phase = match self.phase {
            HoverPhase::Shown | HoverPhase::PendingHide { .. } => HoverPhase::Shown,
            HoverPhase::PendingShow { due_ms } => HoverPhase::PendingShow { due_ms },
            HoverPhase::Hidden => HoverPhase::PendingShow {
                due_ms: now_ms.saturating_add(self.show_delay_ms),
            },
        };
    }

    pub fn arm_hide(&mut self, now_ms: u64) {
        self.phase = match self.phase {
            HoverPhase::Hidden | HoverPhase::PendingShow { .. } => HoverPhase::Hidden,
            HoverPhase::PendingHide { due_ms } => HoverPhase::PendingHide { due_ms },
            HoverPhase::Shown => HoverPhase::PendingHide {
                due_ms: now_ms.saturating_add(self.hide_delay_ms),
            },
        };
    }

    /// Drops any pending timer, keeping the current visibility.
    pub fn cancel(&mut self) {
        self.phase = match self.phase {
            HoverPhase::PendingShow { .. } | HoverPhase::Hidden => HoverPhase::Hidden,
            HoverPhase::PendingHide { .. } | HoverPhase::Shown => HoverPhase::Shown,
        };
    }

    /// Immediately hides, dropping any pending timer.
    pub fn reset(&mut self) {
        self.phase = HoverPhase::Hidden;
    }

    /// Fires a due timer and reports the resulting transition.
    pub fn poll(&mut self, now_ms: u64) -> Option<HoverTransition> {
        match self.phase {
            HoverPhase::PendingShow { due_ms } if now_ms >= due_ms => {
                self.phase = HoverPhase::Shown;
                Some(HoverTransition::Show)
            }
            HoverPhase::PendingHide { due_ms } if now_ms >= due_ms => {
                self.phase = HoverPhase::Hidden;
                Some(HoverTransition::Hide)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_fires_after_delay() {
        let mut delay = HoverDelay::new(300, 100);
        delay.arm_show(1_000);
        assert_eq!(delay.poll(1_299), None);
        assert_eq!(delay.poll(1_300), Some(HoverTransition::Show));
        assert!(delay.is_shown());
        assert_eq!(delay.poll(2_000), None);
    }

    #[test]
    fn rearming_show_keeps_original_deadline() {
        let mut delay = HoverDelay::new(300, 100);
        delay.arm_show(1_000);
        delay.arm_show(1_200);
        assert_eq!(delay.poll(1_300), Some(HoverTransition::Show));
    }

    #[test]
    fn hide_before_show_cancels_without_transition() {
        let mut delay = HoverDelay::new(300, 100);
        delay.arm_show(0);
        delay.arm_hide(100);
        assert_eq!(delay.phase(), HoverPhase::Hidden);
        assert_eq!(delay.poll(1_000), None);
    }

    #[test]
    fn reentering_during_hide_delay_keeps_tooltip() {
        let mut delay = HoverDelay::new(0, 200);
        delay.arm_show(0);
        assert_eq!(delay.poll(0), Some(HoverTransition::Show));
        delay.arm_hide(50);
        assert!(delay.is_shown());
        delay.arm_show(100);
        assert_eq!(delay.phase(), HoverPhase::Shown);
        assert_eq!(delay.poll(500), None);
    }

    #[test]
    fn cancel_keeps_visibility() {
        let mut delay = HoverDelay::new(0, 200);
        delay.arm_show(0);
        delay.poll(0);
        delay.arm_hide(10);
        delay.cancel();
        assert_eq!(delay.phase(), HoverPhase::Shown);

        delay.reset();
        delay.arm_show(10);
        delay.cancel();
        assert_eq!(delay.phase(), HoverPhase::Hidden);
    }
}
