//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod level;
pub mod player;
pub mod powerup;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{FrameClock, TimestepMode};
pub use collision::Rect;
pub use level::{THEMES, Theme};
pub use player::{JumpKind, Player, Pose};
pub use powerup::{Modifiers, PowerUpController};
pub use spawner::Spawner;
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Particle, ParticleTint, PowerUp,
    PowerUpKind,
};
pub use tick::{Intent, TickInput, crashed, tick};
