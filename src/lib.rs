//! Nexus Runner - An endless runner for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, spawning, power-ups, collisions)
//! - `session`: Glue between the simulation, the profile store and settings
//! - `profiles`: Named local profiles with best/total scores
//! - `persistence`: Key/value storage backends (LocalStorage on web)
//! - `platform`: Input mapping and clock access
//! - `renderer`: Canvas 2D presentation (reads state only)
//! - `audio`: Procedural sound cues
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod profiles;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use profiles::{Profile, ProfileStore};
pub use session::{Hud, RunResult, Session};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate; one tick per animation frame at 60 Hz displays
    pub const TICK_RATE: f64 = 60.0;
    /// Milliseconds per tick for the fixed-timestep clock
    pub const SIM_DT_MS: f64 = 1000.0 / TICK_RATE;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play field dimensions (16:9)
    pub const FIELD_WIDTH: f32 = 1200.0;
    pub const FIELD_HEIGHT: f32 = 675.0;
    /// Ground line, 100 units above the bottom edge
    pub const GROUND_Y: f32 = FIELD_HEIGHT - 100.0;

    /// Player defaults. `x` never changes during a run.
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_SLIDE_HEIGHT: f32 = 40.0;
    pub const PLAYER_JUMP_POWER: f32 = 18.0;
    pub const PLAYER_GRAVITY: f32 = 0.8;
    /// Second jump is weaker than the first
    pub const DOUBLE_JUMP_FACTOR: f32 = 0.8;

    /// Hit-box margins (hit-boxes are smaller than the sprites)
    pub const PLAYER_HITBOX_INSET: f32 = 10.0;
    pub const OBSTACLE_HITBOX_INSET: f32 = 5.0;
    pub const POWERUP_HITBOX_INSET: f32 = 5.0;

    /// Horizontal scroll per tick at speed multiplier 1.0
    pub const BASE_SCROLL_SPEED: f32 = 4.0;

    /// Power-up pickup box
    pub const POWERUP_SIZE: f32 = 40.0;
    /// Top edge of a power-up; reachable by a running player
    pub const POWERUP_Y: f32 = GROUND_Y - 100.0;

    /// Hard cap on live particles
    pub const MAX_PARTICLES: usize = 256;
    /// Per-tick downward pull on particles
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    pub const PARTICLE_DECAY: f32 = 0.02;
}
