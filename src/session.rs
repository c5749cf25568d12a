//! Game session
//!
//! Ties one `GameState` to the profile store, the settings and the frame
//! clock. The browser entry point and the headless demo both drive the
//! game through this type.

use crate::persistence::Storage;
use crate::platform;
use crate::profiles::{Profile, ProfileStore};
use crate::settings::Settings;
use crate::sim::{FrameClock, GameEvent, GamePhase, GameState, Intent, PowerUpKind, TickInput, tick};
use crate::tuning::Tuning;

/// Outcome of a finished run, as committed to the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub score: u64,
    pub new_best: bool,
    /// Profile best after the commit
    pub best_score: u64,
}

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub phase: GamePhase,
    pub score: u64,
    /// Higher of the profile best and the running score
    pub best_score: u64,
    /// Current speed over the speed cap (0..=1)
    pub speed_fraction: f32,
    /// Active power-up and the fraction of its time left
    pub power_up: Option<(PowerUpKind, f32)>,
    pub fps: u32,
    pub theme_name: &'static str,
    pub profile_name: Option<String>,
}

pub struct Session<S: Storage> {
    state: GameState,
    profiles: ProfileStore<S>,
    settings: Settings,
    /// Intents collected since the last tick
    input: TickInput,
    clock: FrameClock,
    autopilot: bool,
    last_result: Option<RunResult>,
    events: Vec<GameEvent>,
}

impl<S: Storage> Session<S> {
    /// Load profiles and settings from `storage` and wait at the login screen
    pub fn new(storage: S, seed: u64) -> Self {
        Self::with_tuning(storage, seed, Tuning::default())
    }

    pub fn with_tuning(storage: S, seed: u64, tuning: Tuning) -> Self {
        let settings = Settings::load(&storage);
        let profiles = ProfileStore::load(storage);

        let mut state = GameState::new(seed, tuning);
        state.max_particles = settings.max_particles();

        Self {
            state,
            profiles,
            clock: FrameClock::new(settings.timestep_mode()),
            settings,
            input: TickInput::default(),
            autopilot: false,
            last_result: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access to the simulation, for tools and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn profiles(&self) -> &ProfileStore<S> {
        &self.profiles
    }

    pub fn current_profile(&self) -> Option<&Profile> {
        self.profiles.current()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Result of the most recent finished run, until the next start
    pub fn last_result(&self) -> Option<RunResult> {
        self.last_result
    }

    // === Profiles ===

    /// Sign in from the login screen. False for a blank name or outside Login.
    pub fn login(&mut self, name: &str) -> bool {
        if self.state.phase != GamePhase::Login {
            return false;
        }
        if !self.profiles.login(name, platform::now_ms()) {
            return false;
        }
        self.state.enter_menu();
        true
    }

    /// Sign out and return to the login screen. A run in progress is
    /// abandoned without being recorded.
    pub fn logout(&mut self) {
        self.profiles.logout();
        self.state.logout();
        self.input = TickInput::default();
        self.last_result = None;
        self.events.clear();
    }

    /// Delete a profile; deleting the signed-in one also signs out
    pub fn delete_profile(&mut self, name: &str) -> bool {
        let was_current = self.profiles.current().is_some_and(|p| p.name == name);
        if !self.profiles.delete(name) {
            return false;
        }
        if was_current {
            self.logout();
        }
        true
    }

    // === Run control ===

    /// Start a run, or restart from Paused/GameOver. An unfinished run is
    /// abandoned without being recorded.
    pub fn start(&mut self, seed: u64) -> bool {
        if !self.state.start_run(seed) {
            return false;
        }
        log::info!("Run started with seed {}", seed);
        self.input = TickInput::default();
        self.last_result = None;
        self.clock.reset();
        true
    }

    /// Leave the game-over screen for the menu
    pub fn back_to_menu(&mut self) {
        if self.state.phase == GamePhase::GameOver {
            self.state.enter_menu();
        }
    }

    /// Queue an intent for the next tick
    pub fn push_intent(&mut self, intent: Intent) {
        self.input.push(intent);
    }

    /// Pause immediately (tab hidden, window blur)
    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.toggle_pause();
            self.input.pause = false;
        }
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            log::info!("Autopilot: {}", on);
            self.autopilot = on;
        }
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Run the ticks due for an animation frame at `time_ms`.
    /// Returns the number of ticks run.
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let ticks = self.clock.frame(time_ms);
        for _ in 0..ticks {
            self.step();
        }
        ticks
    }

    /// Run exactly one tick with the queued input
    pub fn step(&mut self) {
        let mut input = std::mem::take(&mut self.input);
        input.autopilot = self.autopilot;

        let before = self.state.phase;
        tick(&mut self.state, &input);
        self.events.extend(self.state.drain_events());

        if before == GamePhase::Playing && self.state.phase == GamePhase::GameOver {
            self.finish_run();
        }
    }

    fn finish_run(&mut self) {
        let score = self.state.score;
        let new_best = self.profiles.commit_run(score, platform::now_ms());
        let best_score = self
            .profiles
            .current()
            .map_or(score, |p| p.best_score);
        log::info!(
            "Game over: score {} ({} ticks){}",
            score,
            self.state.time_ticks,
            if new_best { ", new record" } else { "" }
        );
        self.last_result = Some(RunResult {
            score,
            new_best,
            best_score,
        });
    }

    /// Take the events produced since the last call (for audio)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Settings ===

    /// Replace the settings, apply them and persist them
    pub fn update_settings(&mut self, settings: Settings) {
        self.state.max_particles = settings.max_particles();
        let excess = self
            .state
            .particles
            .len()
            .saturating_sub(self.state.max_particles);
        self.state.particles.drain(..excess);
        self.clock.set_mode(settings.timestep_mode());

        settings.save(self.profiles.storage_mut());
        self.settings = settings;
    }

    // === HUD ===

    pub fn hud(&self) -> Hud {
        let state = &self.state;
        let best = self.profiles.current().map_or(0, |p| p.best_score);
        Hud {
            phase: state.phase,
            score: state.score,
            best_score: best.max(state.score),
            speed_fraction: (state.speed / state.tuning.speed_cap).clamp(0.0, 1.0),
            power_up: state
                .power_up
                .active_kind()
                .map(|kind| (kind, state.power_up.remaining_fraction())),
            fps: self.clock.fps(),
            theme_name: state.theme().name,
            profile_name: self.profiles.current().map(|p| p.name.clone()),
        }
    }
}
