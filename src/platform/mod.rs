//! Platform layer
//!
//! Turns host events into engine commands and persists small JSON blobs.
//! `KeyboardState` is portable so the key mapping can be tested natively;
//! the browser bindings in `web` are only built for wasm32.

pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;

use crate::engine::Command;

/// Held direction keys, folded into movement commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    strafe_left: bool,
    strafe_right: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    fn axis(&self) -> Vec2 {
        let x = self.right as i8 - self.left as i8;
        let y = self.down as i8 - self.up as i8;
        Vec2::new(x as f32, y as f32)
    }

    fn strafe(&self) -> f32 {
        (self.strafe_right as i8 - self.strafe_left as i8) as f32
    }

    /// Map a `KeyboardEvent.key` value to a command
    ///
    /// Escape and `p` emit `Pause`; the host decides whether that means
    /// pause or resume. Key repeat is harmless: held keys just re-emit the
    /// same movement.
    pub fn handle(&mut self, key: &str, pressed: bool) -> Option<Command> {
        match key {
            "ArrowLeft" | "a" | "A" => self.left = pressed,
            "ArrowRight" | "d" | "D" => self.right = pressed,
            "ArrowUp" | "w" | "W" => self.up = pressed,
            "ArrowDown" | "s" | "S" => self.down = pressed,
            "q" | "Q" => {
                self.strafe_left = pressed;
                return Some(Command::Strafe(self.strafe()));
            }
            "e" | "E" => {
                self.strafe_right = pressed;
                return Some(Command::Strafe(self.strafe()));
            }
            " " => return Some(Command::Fire(pressed)),
            "Shift" => return pressed.then_some(Command::ToggleShield),
            "Enter" => return pressed.then_some(Command::Start),
            "Escape" | "p" | "P" => return pressed.then_some(Command::Pause),
            _ => return None,
        }
        Some(Command::Move(self.axis()))
    }

    /// Forget every held key (focus loss)
    pub fn release_all(&mut self) -> [Command; 3] {
        *self = Self::default();
        [
            Command::Move(Vec2::ZERO),
            Command::Strafe(0.0),
            Command::Fire(false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_keys_cancel() {
        let mut keys = KeyboardState::new();
        assert_eq!(keys.handle("ArrowLeft", true), Some(Command::Move(Vec2::new(-1.0, 0.0))));
        assert_eq!(keys.handle("d", true), Some(Command::Move(Vec2::ZERO)));
        assert_eq!(keys.handle("ArrowLeft", false), Some(Command::Move(Vec2::new(1.0, 0.0))));
    }

    #[test]
    fn test_thrust_is_up() {
        let mut keys = KeyboardState::new();
        assert_eq!(keys.handle("w", true), Some(Command::Move(Vec2::new(0.0, -1.0))));
    }

    #[test]
    fn test_one_shot_keys_fire_on_press_only() {
        let mut keys = KeyboardState::new();
        assert_eq!(keys.handle("Shift", true), Some(Command::ToggleShield));
        assert_eq!(keys.handle("Shift", false), None);
        assert_eq!(keys.handle("Escape", true), Some(Command::Pause));
        assert_eq!(keys.handle("Enter", false), None);
        assert_eq!(keys.handle(" ", false), Some(Command::Fire(false)));
        assert_eq!(keys.handle("x", true), None);
    }

    #[test]
    fn test_release_all() {
        let mut keys = KeyboardState::new();
        keys.handle("a", true);
        keys.handle("q", true);
        keys.release_all();
        assert_eq!(keys, KeyboardState::default());
    }
}
