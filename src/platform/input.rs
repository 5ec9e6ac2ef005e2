//! Keyboard state to per-tick input

use crate::SafeZone;
use crate::sim::TickInput;

/// Tracks held keys between frames and turns presses into one-shot commands.
///
/// Keys are DOM `KeyboardEvent.key` strings. Movement is level-triggered
/// (held), fire and pause are edge-triggered: holding the fire key shoots
/// once. Developer keys are ignored unless enabled.
#[derive(Debug, Default)]
pub struct KeyTracker {
    left: bool,
    right: bool,
    fire_held: bool,

    // One-shot commands, cleared by `snapshot`
    fire: bool,
    pause: bool,
    toggle_god_mode: bool,
    jump_to_wave: Option<i32>,
    safe_zone: Option<SafeZone>,

    dev_keys: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable `g` (god mode) and digit (wave jump) keys
    pub fn with_dev_keys(mut self, enabled: bool) -> Self {
        self.dev_keys = enabled;
        self
    }

    /// Returns true when the key is bound (host should prevent default)
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => self.left = true,
            "ArrowRight" | "d" | "D" => self.right = true,
            " " | "ArrowUp" | "w" | "W" => {
                if !repeat && !self.fire_held {
                    self.fire = true;
                }
                self.fire_held = true;
            }
            "p" | "P" | "Escape" => {
                if !repeat {
                    self.pause = true;
                }
            }
            "g" | "G" if self.dev_keys => {
                if !repeat {
                    self.toggle_god_mode = !self.toggle_god_mode;
                }
            }
            digit if self.dev_keys && digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                let n = i32::from(digit.as_bytes()[0] - b'0');
                // "0" means wave 10
                self.jump_to_wave = Some(if n == 0 { 10 } else { n });
            }
            _ => return false,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) {
        match key {
            "ArrowLeft" | "a" | "A" => self.left = false,
            "ArrowRight" | "d" | "D" => self.right = false,
            " " | "ArrowUp" | "w" | "W" => self.fire_held = false,
            _ => {}
        }
    }

    /// Forget held keys (window lost focus, so key-ups will not arrive)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.fire_held = false;
    }

    /// Queue a pause toggle from outside the keyboard (tab hidden, blur)
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Queue a new play area for the next tick
    pub fn resize(&mut self, zone: SafeZone) {
        self.safe_zone = Some(zone);
    }

    /// Input for one tick; one-shot commands are consumed
    pub fn snapshot(&mut self) -> TickInput {
        TickInput {
            moving_left: self.left,
            moving_right: self.right,
            fire: std::mem::take(&mut self.fire),
            pause: std::mem::take(&mut self.pause),
            toggle_god_mode: std::mem::take(&mut self.toggle_god_mode),
            jump_to_wave: self.jump_to_wave.take(),
            safe_zone: self.safe_zone.take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_is_edge_triggered() {
        let mut keys = KeyTracker::new();
        assert!(keys.key_down(" ", false));
        assert!(keys.snapshot().fire);

        // Still held, plus auto-repeat events
        keys.key_down(" ", true);
        keys.key_down(" ", false);
        assert!(!keys.snapshot().fire);

        keys.key_up(" ");
        keys.key_down(" ", false);
        assert!(keys.snapshot().fire);
    }

    #[test]
    fn test_movement_is_held() {
        let mut keys = KeyTracker::new();
        keys.key_down("ArrowLeft", false);
        assert!(keys.snapshot().moving_left);
        assert!(keys.snapshot().moving_left);
        keys.key_up("ArrowLeft");
        assert!(!keys.snapshot().moving_left);

        keys.key_down("d", false);
        keys.release_all();
        assert!(!keys.snapshot().moving_right);
    }

    #[test]
    fn test_pause_consumed_once() {
        let mut keys = KeyTracker::new();
        keys.key_down("Escape", false);
        keys.key_down("Escape", true);
        assert!(keys.snapshot().pause);
        assert!(!keys.snapshot().pause);

        keys.request_pause();
        assert!(keys.snapshot().pause);
    }

    #[test]
    fn test_dev_keys_gated() {
        let mut keys = KeyTracker::new();
        assert!(!keys.key_down("g", false));
        assert!(!keys.key_down("5", false));
        let input = keys.snapshot();
        assert!(!input.toggle_god_mode);
        assert_eq!(input.jump_to_wave, None);

        let mut keys = KeyTracker::new().with_dev_keys(true);
        keys.key_down("g", false);
        keys.key_down("0", false);
        let input = keys.snapshot();
        assert!(input.toggle_god_mode);
        assert_eq!(input.jump_to_wave, Some(10));
        assert_eq!(keys.snapshot().jump_to_wave, None);
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let mut keys = KeyTracker::new();
        assert!(!keys.key_down("Shift", false));
        assert!(!keys.key_down("F5", false));
        assert_eq!(keys.snapshot(), TickInput::default());
    }
}
