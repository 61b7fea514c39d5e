//! Engine facade
//!
//! `Engine` exclusively owns the session state. Presentation layers talk to
//! it through `Command`s and read back a `Snapshot`; when a run ends the
//! result is handed to the configured `ScoreSink`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::highscores::{HighScores, ScoreRecord, ScoreSink};
use crate::rng::{PcgRandom, RandomSource};
use crate::settings::Settings;
use crate::sim::effects::Starfield;
use crate::sim::{GamePhase, GameState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Identity reported to the score sink when none is configured
pub const DEFAULT_IDENTITY: &str = "pilot";

/// Named entry points presentation layers use to drive the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Begin a run from the menu or after a game over
    Start,
    Pause,
    Resume,
    /// Held movement axis (x left/right, y up/down)
    Move(Vec2),
    /// Held sideways thrust (free flight)
    Strafe(f32),
    /// Pointer aim target, or None to return to keyboard turning
    Aim(Option<Vec2>),
    /// Fire held or released
    Fire(bool),
    /// Flip the shield on the next step
    ToggleShield,
    /// New playfield dimensions
    Resize { width: f32, height: f32 },
}

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    /// Seconds survived
    pub duration: f32,
    pub wave: u32,
    pub kills: u32,
    pub level: u32,
}

impl RunSummary {
    fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            duration: state.elapsed,
            wave: state.wave,
            kills: state.kills,
            level: state.progression.level,
        }
    }

    pub fn record(&self) -> ScoreRecord {
        ScoreRecord {
            score: self.score,
            duration: self.duration,
        }
    }
}

pub struct Engine<S: ScoreSink = HighScores> {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    rng: Box<dyn RandomSource>,
    /// Held intents carried from step to step
    input: TickInput,
    commands: VecDeque<Command>,
    identity: String,
    sink: S,
    summary: Option<RunSummary>,
}

impl Engine<HighScores> {
    /// Engine with a seeded PCG source and an in-memory high-score table
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::new(
            tuning,
            Settings::default(),
            Box::new(PcgRandom::new(seed)),
            HighScores::new(),
        )
    }
}

impl<S: ScoreSink> Engine<S> {
    pub fn new(tuning: Tuning, settings: Settings, mut rng: Box<dyn RandomSource>, sink: S) -> Self {
        let state = GameState::new(&tuning, rng.as_mut());
        let mut engine = Self {
            state,
            tuning,
            settings,
            rng,
            input: TickInput::default(),
            commands: VecDeque::new(),
            identity: DEFAULT_IDENTITY.to_string(),
            sink,
            summary: None,
        };
        engine.apply_settings();
        engine
    }

    /// Name submitted with finished runs
    pub fn set_identity(&mut self, identity: impl Into<String>) {
        self.identity = identity.into();
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.apply_settings();
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Read-only view of the session
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Queue a command for the next `update`
    pub fn queue(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn queue_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// Apply a command immediately
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Move(axis) => self.input.axis = axis.clamp(Vec2::NEG_ONE, Vec2::ONE),
            Command::Strafe(amount) => self.input.strafe = amount.clamp(-1.0, 1.0),
            Command::Aim(target) => self.input.aim = target,
            Command::Fire(held) => self.input.fire = held,
            Command::ToggleShield => self.input.shield_toggle = true,
            Command::Resize { width, height } => self.state.resize(width, height, &self.tuning),
        }
    }

    /// Enter `Playing` with a fresh run; only from `Menu` or `GameOver`
    pub fn start(&mut self) {
        if !matches!(self.state.phase, GamePhase::Menu | GamePhase::GameOver) {
            return;
        }
        self.state.reset_run(&self.tuning);
        self.apply_settings();
        self.input = TickInput::default();
        self.summary = None;
        self.state.phase = GamePhase::Playing;
        log::info!("Run started ({}x{})", self.state.width, self.state.height);
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            log::info!("Paused at {:.1}s", self.state.elapsed);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
    }

    /// Drain queued commands, advance one step and return the snapshot
    pub fn update(&mut self, dt: f32) -> Snapshot {
        while let Some(command) = self.commands.pop_front() {
            self.apply(command);
        }

        let was_playing = self.state.phase == GamePhase::Playing;
        tick(&mut self.state, &self.input, dt, &self.tuning, self.rng.as_mut());
        if was_playing {
            self.input.shield_toggle = false;
        }
        if was_playing && self.state.phase == GamePhase::GameOver {
            self.finish_run();
        }
        self.snapshot()
    }

    /// Presentation snapshot with cosmetic preferences applied
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.state.snapshot();
        if !self.settings.effective_screen_shake() {
            snapshot.shake = 0.0;
        }
        snapshot
    }

    /// The last finished run, once
    pub fn take_run_summary(&mut self) -> Option<RunSummary> {
        self.summary.take()
    }

    fn finish_run(&mut self) {
        let summary = RunSummary::from_state(&self.state);
        log::info!(
            "Game over: score {} in {:.1}s (wave {}, {} kills, level {})",
            summary.score,
            summary.duration,
            summary.wave,
            summary.kills,
            summary.level
        );
        self.sink.submit(&self.identity, summary.record());
        self.summary = Some(summary);
    }

    /// Bound cosmetic state by the current settings
    fn apply_settings(&mut self) {
        let settings = &self.settings;
        self.state.particles.set_capacity(settings.max_particles());
        self.state
            .player
            .set_trail_length(settings.trail_length(self.tuning.player.trail_length));

        if !settings.quality.starfield_enabled() {
            self.state.starfield = Starfield::default();
        } else if self.state.starfield.layers.is_empty() {
            let fx = &self.tuning.effects;
            self.state.starfield = Starfield::new(
                fx.star_layers,
                fx.stars_per_layer,
                fx.star_speed,
                self.state.width,
                self.state.height,
                self.rng.as_mut(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{Obstacle, SizeClass};

    #[derive(Default)]
    struct Recorder(Vec<(String, ScoreRecord)>);

    impl ScoreSink for Recorder {
        fn submit(&mut self, identity: &str, record: ScoreRecord) {
            self.0.push((identity.to_string(), record));
        }
    }

    fn engine() -> Engine<Recorder> {
        Engine::new(
            Tuning::default(),
            Settings::default(),
            Box::new(PcgRandom::new(5)),
            Recorder::default(),
        )
    }

    /// Drop a heavy rock on the player and weaken it so the next step kills
    fn doom(engine: &mut Engine<Recorder>) {
        let pos = engine.state.player.position();
        let id = engine.state.next_entity_id();
        let rock = Obstacle::new(
            id,
            SizeClass::Huge,
            pos,
            Vec2::ZERO,
            &engine.tuning,
            1.0,
            engine.rng.as_mut(),
        );
        engine.state.obstacles.push(rock);
        engine.state.player.health = 1.0;
    }

    #[test]
    fn test_state_machine() {
        let mut engine = engine();
        assert_eq!(engine.phase(), GamePhase::Menu);
        engine.resume();
        assert_eq!(engine.phase(), GamePhase::Menu);
        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Menu);

        engine.start();
        assert_eq!(engine.phase(), GamePhase::Playing);
        engine.resume();
        assert_eq!(engine.phase(), GamePhase::Playing);
        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Paused);
        engine.start();
        assert_eq!(engine.phase(), GamePhase::Paused);
        engine.resume();
        assert_eq!(engine.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut engine = engine();
        engine.start();
        engine.update(0.016);
        engine.queue(Command::Pause);
        let before = engine.update(0.016);
        let after = engine.update(0.5);
        assert_eq!(before, after);
        assert_eq!(after.phase, GamePhase::Paused);
    }

    #[test]
    fn test_game_over_submits_once() {
        let mut engine = engine();
        engine.set_identity("ace");
        engine.start();
        engine.update(0.016);
        doom(&mut engine);
        let snapshot = engine.update(0.016);
        assert_eq!(snapshot.phase, GamePhase::GameOver);
        assert_eq!(snapshot.health, 0.0);

        engine.update(0.016);
        engine.update(0.016);
        assert_eq!(engine.sink().0.len(), 1);
        assert_eq!(engine.sink().0[0].0, "ace");

        let summary = engine.take_run_summary().unwrap();
        assert!((summary.duration - 0.032).abs() < 1e-6);
        assert!(engine.take_run_summary().is_none());

        // Last snapshot stays readable and a new run can start
        assert_eq!(engine.snapshot().phase, GamePhase::GameOver);
        engine.queue(Command::Start);
        let fresh = engine.update(0.016);
        assert_eq!(fresh.phase, GamePhase::Playing);
        assert_eq!(fresh.health, fresh.max_health);
    }

    #[test]
    fn test_shield_toggle_is_one_shot() {
        let mut engine = engine();
        engine.start();
        engine.queue(Command::ToggleShield);
        let snapshot = engine.update(0.016);
        assert!(snapshot.shield_active);
        let snapshot = engine.update(0.016);
        assert!(snapshot.shield_active);
    }

    #[test]
    fn test_resize_reclamps_player() {
        let mut engine = engine();
        engine.start();
        engine.apply(Command::Resize {
            width: 400.0,
            height: 300.0,
        });
        let player = engine.state().player.position();
        assert!(player.x <= 400.0 - engine.tuning().player.lane_margin);
        assert_eq!(player.y, 300.0 - engine.tuning().player.lane_height);

        engine.apply(Command::Resize {
            width: 0.0,
            height: 300.0,
        });
        assert_eq!(engine.state().width, 400.0);
    }

    #[test]
    fn test_settings_bound_cosmetics() {
        let mut engine = engine();
        engine.set_settings(Settings {
            particles: false,
            trails: false,
            ..Settings::from_preset(QualityPreset::Low)
        });
        assert_eq!(engine.state().particles.capacity(), 0);
        assert!(engine.state().starfield.layers.is_empty());

        engine.start();
        engine.queue(Command::Move(Vec2::new(1.0, 0.0)));
        for _ in 0..10 {
            engine.update(0.016);
        }
        assert!(engine.state().player.trail.is_empty());
        assert!(engine.state().particles.is_empty());

        engine.set_settings(Settings::default());
        assert!(!engine.state().starfield.layers.is_empty());
    }

    #[test]
    fn test_reduced_motion_hides_shake() {
        let mut engine = engine();
        engine.start();
        engine.state.shake.trigger(1.0, 1.0);
        assert!(engine.snapshot().shake > 0.0);
        engine.set_settings(Settings {
            reduced_motion: true,
            ..Settings::default()
        });
        assert_eq!(engine.snapshot().shake, 0.0);
    }

    #[test]
    fn test_high_scores_sink() {
        let mut engine = Engine::with_seed(Tuning::default(), 3);
        engine.start();
        engine.state.score = 1234;
        let pos = engine.state.player.position();
        let rock = Obstacle::new(99, SizeClass::Huge, pos, Vec2::ZERO, &engine.tuning, 1.0, engine.rng.as_mut());
        engine.state.obstacles.push(rock);
        engine.state.player.health = 1.0;
        engine.update(0.016);
        assert_eq!(engine.sink().top_score(), Some(1234));
    }
}
