//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Input events (keyboard codes and touch gestures mapped to intents)

use crate::sim::Intent;

/// Downward travel (CSS px) that turns a touch into a slide
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Intent for a keyboard event, by `KeyboardEvent.code`.
/// Auto-repeated keydowns are ignored so holding a key can't chain jumps.
pub fn key_intent(code: &str, pressed: bool, repeat: bool) -> Option<Intent> {
    if pressed && repeat {
        return None;
    }
    match (code, pressed) {
        ("Space" | "ArrowUp", true) => Some(Intent::Jump),
        ("ArrowDown", true) => Some(Intent::SlideStart),
        ("ArrowDown", false) => Some(Intent::SlideStop),
        ("KeyP" | "Escape", true) => Some(Intent::PauseToggle),
        _ => None,
    }
}

/// Whether the browser's default action for `code` should be suppressed
/// (page scrolling on Space and the arrow keys)
pub fn is_game_key(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp" | "ArrowDown" | "KeyP" | "Escape")
}

/// Turns a single touch into tap-to-jump and swipe-down-to-slide
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    start_y: Option<f32>,
    sliding: bool,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, y: f32) -> Option<Intent> {
        self.start_y = Some(y);
        self.sliding = false;
        Some(Intent::Jump)
    }

    /// Fires SlideStart once per touch, when the finger has moved far enough down
    pub fn moved(&mut self, y: f32) -> Option<Intent> {
        let start = self.start_y?;
        if !self.sliding && y > start + SWIPE_THRESHOLD {
            self.sliding = true;
            Some(Intent::SlideStart)
        } else {
            None
        }
    }

    pub fn end(&mut self) -> Option<Intent> {
        self.start_y.take()?;
        self.sliding = false;
        Some(Intent::SlideStop)
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a new run
pub fn run_seed() -> u64 {
    now_ms() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_mapping() {
        assert_eq!(key_intent("Space", true, false), Some(Intent::Jump));
        assert_eq!(key_intent("ArrowUp", true, false), Some(Intent::Jump));
        assert_eq!(key_intent("ArrowDown", true, false), Some(Intent::SlideStart));
        assert_eq!(key_intent("ArrowDown", false, false), Some(Intent::SlideStop));
        assert_eq!(key_intent("KeyP", true, false), Some(Intent::PauseToggle));
        assert_eq!(key_intent("Escape", true, false), Some(Intent::PauseToggle));
        assert_eq!(key_intent("Space", false, false), None);
        assert_eq!(key_intent("KeyA", true, false), None);
    }

    #[test]
    fn test_repeats_are_ignored() {
        assert_eq!(key_intent("Space", true, true), None);
        assert_eq!(key_intent("KeyP", true, true), None);
    }

    #[test]
    fn test_game_keys() {
        assert!(is_game_key("Space"));
        assert!(!is_game_key("Tab"));
    }

    #[test]
    fn test_tap_jumps_and_release_stops() {
        let mut touch = TouchTracker::new();
        assert_eq!(touch.start(300.0), Some(Intent::Jump));
        assert_eq!(touch.moved(320.0), None);
        assert_eq!(touch.end(), Some(Intent::SlideStop));
        assert_eq!(touch.end(), None);
    }

    #[test]
    fn test_swipe_down_slides_once() {
        let mut touch = TouchTracker::new();
        touch.start(100.0);
        assert_eq!(touch.moved(150.0), None, "threshold is exclusive");
        assert_eq!(touch.moved(151.0), Some(Intent::SlideStart));
        assert_eq!(touch.moved(200.0), None);
    }

    #[test]
    fn test_swipe_up_does_nothing() {
        let mut touch = TouchTracker::new();
        touch.start(300.0);
        assert_eq!(touch.moved(100.0), None);
        assert_eq!(touch.moved(500.0), Some(Intent::SlideStart));
    }

    #[test]
    fn test_move_without_start() {
        let mut touch = TouchTracker::new();
        assert_eq!(touch.moved(999.0), None);
    }

    #[test]
    fn test_clock_is_past_2020() {
        assert!(now_ms() > 1.577e12);
    }
}
