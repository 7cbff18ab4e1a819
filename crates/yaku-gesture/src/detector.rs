use yaku_types::TriggerSignal;

/// Two copy presses closer together than this fire the gesture. The boundary
/// itself is exclusive: a gap of exactly this many milliseconds starts a new
/// sequence.
pub const DOUBLE_PRESS_WINDOW_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// The copy key ("C").
    C,
    /// Any other key; ignored by the detector.
    Other,
}

/// One physical key-down, as delivered by the OS hook adapter.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key: KeyCode,
    /// Platform copy modifier held: Command on macOS, Control elsewhere.
    pub modifier_pressed: bool,
    pub timestamp_ms: u64,
}

/// Recognizes the double-copy gesture from a stream of key-downs.
///
/// Emits at most one [`TriggerSignal`] per qualifying pair; the counter
/// resets after firing, so a third rapid press starts a fresh sequence
/// instead of re-firing.
#[derive(Debug)]
pub struct GestureDetector {
    window_ms: u64,
    last_timestamp_ms: u64,
    consecutive_count: u32,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self::with_window(DOUBLE_PRESS_WINDOW_MS)
    }

    pub fn with_window(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_timestamp_ms: 0,
            consecutive_count: 0,
        }
    }

    /// Feed one key-down. Non-matching keys are ignored entirely and do not
    /// reset the timing window.
    pub fn on_key_down(&mut self, event: &KeyEvent) -> Option<TriggerSignal> {
        if event.key != KeyCode::C || !event.modifier_pressed {
            return None;
        }

        let now = event.timestamp_ms;
        if now.saturating_sub(self.last_timestamp_ms) < self.window_ms {
            self.consecutive_count += 1;
        } else {
            self.consecutive_count = 1;
        }
        self.last_timestamp_ms = now;

        if self.consecutive_count == 2 {
            self.consecutive_count = 0;
            return Some(TriggerSignal);
        }
        None
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy(timestamp_ms: u64) -> KeyEvent {
        KeyEvent {
            key: KeyCode::C,
            modifier_pressed: true,
            timestamp_ms,
        }
    }

    #[test]
    fn two_presses_within_window_fire_once() {
        let mut detector = GestureDetector::new();
        assert!(detector.on_key_down(&copy(1_000)).is_none());
        assert!(detector.on_key_down(&copy(1_500)).is_some());
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let mut detector = GestureDetector::new();
        assert!(detector.on_key_down(&copy(1_000)).is_none());
        // Exactly 800ms later counts as a new sequence
        assert!(detector.on_key_down(&copy(1_800)).is_none());
        assert!(detector.on_key_down(&copy(2_000)).is_some());
    }

    #[test]
    fn just_inside_window_fires() {
        let mut detector = GestureDetector::new();
        assert!(detector.on_key_down(&copy(1_000)).is_none());
        assert!(detector.on_key_down(&copy(1_799)).is_some());
    }

    #[test]
    fn third_rapid_press_starts_a_new_count() {
        let mut detector = GestureDetector::new();
        assert!(detector.on_key_down(&copy(1_000)).is_none());
        assert!(detector.on_key_down(&copy(1_200)).is_some());
        // The third press does not immediately re-fire...
        assert!(detector.on_key_down(&copy(1_400)).is_none());
        // ...but pairs with a fourth press
        assert!(detector.on_key_down(&copy(1_600)).is_some());
    }

    #[test]
    fn slow_presses_never_fire() {
        let mut detector = GestureDetector::new();
        for t in [1_000, 2_000, 3_000, 4_000] {
            assert!(detector.on_key_down(&copy(t)).is_none());
        }
    }

    #[test]
    fn unmodified_copy_key_is_ignored() {
        let mut detector = GestureDetector::new();
        let bare = KeyEvent {
            key: KeyCode::C,
            modifier_pressed: false,
            timestamp_ms: 1_000,
        };
        assert!(detector.on_key_down(&bare).is_none());
        assert!(detector.on_key_down(&copy(1_100)).is_none());
        assert!(detector.on_key_down(&copy(1_200)).is_some());
    }

    #[test]
    fn other_keys_do_not_disturb_the_window() {
        let mut detector = GestureDetector::new();
        assert!(detector.on_key_down(&copy(1_000)).is_none());
        let other = KeyEvent {
            key: KeyCode::Other,
            modifier_pressed: true,
            timestamp_ms: 1_100,
        };
        assert!(detector.on_key_down(&other).is_none());
        assert!(detector.on_key_down(&copy(1_200)).is_some());
    }
}
