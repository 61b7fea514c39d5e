//! Browser bindings
//!
//! The host page owns the canvas and the animation-frame loop. Each frame it
//! calls `frame(now_ms)` and draws from the returned snapshot JSON; key and
//! pointer events are forwarded as they arrive.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::KeyboardState;
use crate::engine::{Command, Engine};
use crate::highscores::HighScores;
use crate::rng::PcgRandom;
use crate::settings::Settings;
use crate::sim::GamePhase;
use crate::tuning::Tuning;

#[wasm_bindgen]
pub struct WasmEngine {
    engine: Engine<HighScores>,
    keys: KeyboardState,
    last_time: f64,
}

#[wasm_bindgen]
impl WasmEngine {
    /// Build an engine; `tuning_json` may be empty or partial
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str, width: f32, height: f32) -> WasmEngine {
        console_error_panic_hook::set_once();
        // A second engine on the same page finds the logger already set
        let _ = console_log::init_with_level(log::Level::Info);

        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).unwrap_or_else(|e| {
                log::warn!("Tuning rejected ({}), using defaults", e);
                Tuning::default()
            })
        };

        let seed = js_sys::Date::now() as u64;
        let mut engine = Engine::new(
            tuning,
            Settings::load(),
            Box::new(PcgRandom::new(seed)),
            HighScores::load(),
        );
        engine.apply(Command::Resize { width, height });
        log::info!("Void Drift ready (seed {})", seed);

        WasmEngine {
            engine,
            keys: KeyboardState::new(),
            last_time: 0.0,
        }
    }

    /// Advance by the time since the previous frame; returns snapshot JSON
    pub fn frame(&mut self, now_ms: f64) -> String {
        let dt = if self.last_time > 0.0 {
            ((now_ms - self.last_time) / 1000.0) as f32
        } else {
            crate::consts::FRAME_DT
        };
        self.last_time = now_ms;
        let snapshot = self.engine.update(dt);
        snapshot.to_json().unwrap_or_default()
    }

    pub fn key(&mut self, key: &str, pressed: bool) {
        match self.keys.handle(key, pressed) {
            Some(Command::Pause) if self.engine.phase() == GamePhase::Paused => {
                self.engine.queue(Command::Resume)
            }
            Some(command) => self.engine.queue(command),
            None => {}
        }
    }

    pub fn pointer(&mut self, x: f32, y: f32) {
        self.engine.queue(Command::Aim(Some(Vec2::new(x, y))));
    }

    pub fn pointer_leave(&mut self) {
        self.engine.queue(Command::Aim(None));
    }

    /// Window blur: drop held keys and pause
    pub fn blur(&mut self) {
        let released = self.keys.release_all();
        self.engine.queue_all(released);
        if self.engine.phase() == GamePhase::Playing {
            self.engine.queue(Command::Pause);
            log::info!("Auto-paused (window blur)");
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.queue(Command::Resize { width, height });
    }

    pub fn set_identity(&mut self, identity: &str) {
        self.engine.set_identity(identity);
    }

    /// Apply and persist settings JSON
    pub fn set_settings(&mut self, settings_json: &str) {
        match serde_json::from_str::<Settings>(settings_json) {
            Ok(settings) => {
                settings.save();
                self.engine.set_settings(settings);
            }
            Err(e) => log::warn!("Settings rejected: {}", e),
        }
    }

    /// High-score table as JSON
    pub fn high_scores(&self) -> String {
        serde_json::to_string(self.engine.sink()).unwrap_or_default()
    }
}
