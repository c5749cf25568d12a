//! Game state and core simulation types
//!
//! Everything the tick mutates lives in `GameState`; presentation reads it
//! and never writes back.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::player::Player;
use super::powerup::{Modifiers, PowerUpController};
use super::spawner::Spawner;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a profile to be chosen
    Login,
    /// Profile chosen, run not started
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Obstacle types. Geometry comes from `dimensions` and `clearance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Crate,
    /// Overhead bar; slide under it
    Barrier,
    Spike,
    Cactus,
    Boulder,
    Log,
    /// Hovering drone; slide under it
    Drone,
    Crystal,
}

impl ObstacleKind {
    /// (width, height)
    pub fn dimensions(self) -> Vec2 {
        match self {
            ObstacleKind::Crate => Vec2::new(40.0, 60.0),
            ObstacleKind::Barrier => Vec2::new(40.0, 80.0),
            ObstacleKind::Spike => Vec2::new(40.0, 40.0),
            ObstacleKind::Cactus => Vec2::new(30.0, 70.0),
            ObstacleKind::Boulder => Vec2::new(60.0, 50.0),
            ObstacleKind::Log => Vec2::new(80.0, 30.0),
            ObstacleKind::Drone => Vec2::new(50.0, 30.0),
            ObstacleKind::Crystal => Vec2::new(35.0, 90.0),
        }
    }

    /// Gap between the ground line and the obstacle's bottom edge.
    /// Taller than a sliding player, shorter than a standing one.
    pub fn clearance(self) -> f32 {
        match self {
            ObstacleKind::Barrier => 50.0,
            ObstacleKind::Drone => 55.0,
            _ => 0.0,
        }
    }

    pub fn is_overhead(self) -> bool {
        self.clearance() > 0.0
    }
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Already scored
    pub passed: bool,
}

impl Obstacle {
    /// Create an obstacle of `kind` with its left edge at `x`
    pub fn new(id: u32, kind: ObstacleKind, x: f32) -> Self {
        let size = kind.dimensions();
        let y = GROUND_Y - kind.clearance() - size.y;
        Self {
            id,
            kind,
            pos: Vec2::new(x, y),
            size,
            passed: false,
        }
    }

    pub fn advance(&mut self, dx: f32) {
        self.pos.x -= dx;
    }

    pub fn trailing_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn is_off_screen(&self) -> bool {
        self.trailing_edge() <= 0.0
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn hitbox(&self) -> Rect {
        self.bounds().inset(OBSTACLE_HITBOX_INSET)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    DoubleJump,
    SlowMotion,
    Invincible,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::DoubleJump,
        PowerUpKind::SlowMotion,
        PowerUpKind::Invincible,
    ];

    /// Display name for the HUD
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::DoubleJump => "Double Jump",
            PowerUpKind::SlowMotion => "Slow Motion",
            PowerUpKind::Invincible => "Invincible",
        }
    }
}

/// A collectible scrolling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Spin angle (radians), cosmetic
    pub spin: f32,
    pub collected: bool,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, x: f32) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::new(x, POWERUP_Y),
            size: Vec2::splat(POWERUP_SIZE),
            spin: 0.0,
            collected: false,
        }
    }

    pub fn advance(&mut self, dx: f32) {
        self.pos.x -= dx;
        self.spin += 0.1;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn hitbox(&self) -> Rect {
        self.bounds().inset(POWERUP_HITBOX_INSET)
    }
}

/// What a particle was emitted for (renderer picks the color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    Jump,
    Crash,
    Pickup(PowerUpKind),
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tint: ParticleTint,
    /// 1.0 at birth, removed at 0
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life -= self.decay;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Things that happened during a tick, drained by presentation (sounds, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    DoubleJump,
    SlideStart,
    ObstaclePassed { score: u64 },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    ThemeChanged { index: usize },
    Collision,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    /// Balance constants
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Run score, never decreases during a run
    pub score: u64,
    /// Current speed multiplier
    pub speed: f32,
    /// Ticks simulated this run
    pub time_ticks: u64,
    /// Field units scrolled this run (drives background parallax)
    pub distance: f32,
    /// Index into `level::THEMES`
    pub theme_index: usize,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Live power-ups in spawn order
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (never affect gameplay)
    pub particles: Vec<Particle>,
    pub power_up: PowerUpController,
    pub spawner: Spawner,
    /// Particle budget (0 disables particles)
    pub max_particles: usize,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Gameplay randomness (spawns)
    pub(crate) rng: Pcg32,
    /// Cosmetic randomness (particles), separate so effects settings
    /// can't change gameplay
    pub(crate) fx_rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh session waiting at the login screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
            score: 0,
            speed: 1.0,
            time_ticks: 0,
            distance: 0.0,
            theme_index: 0,
            phase: GamePhase::Login,
            player: Player::default(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            power_up: PowerUpController::new(tuning.power_up_duration, tuning.slow_motion_speed),
            spawner: Spawner::new(&tuning),
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Modifiers from the active power-up
    pub fn modifiers(&self) -> Modifiers {
        self.power_up.modifiers()
    }

    /// Start `kind`, replacing the active power-up. A DoubleJump pickup
    /// grants one extra jump, usable until the next landing.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> Option<PowerUpKind> {
        if kind == PowerUpKind::DoubleJump {
            self.player.arm_double_jump();
        }
        self.power_up.activate(kind)
    }

    pub fn theme(&self) -> &'static super::level::Theme {
        super::level::theme(self.theme_index)
    }

    /// Clear everything a run touches, keeping phase, tuning and settings
    pub fn reset_run(&mut self, seed: u64) {
        let phase = self.phase;
        let max_particles = self.max_particles;
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(seed, tuning);
        self.phase = phase;
        self.max_particles = max_particles;
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Phase transitions ===

    /// Login -> Menu once a profile is selected
    pub fn enter_menu(&mut self) {
        if matches!(self.phase, GamePhase::Login | GamePhase::GameOver) {
            self.set_phase(GamePhase::Menu);
        }
    }

    /// Start (or restart) a run. Valid from Menu, Paused and GameOver.
    pub fn start_run(&mut self, seed: u64) -> bool {
        if !matches!(
            self.phase,
            GamePhase::Menu | GamePhase::Paused | GamePhase::GameOver
        ) {
            return false;
        }
        self.reset_run(seed);
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Playing <-> Paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.set_phase(GamePhase::Paused),
            GamePhase::Paused => self.set_phase(GamePhase::Playing),
            _ => {}
        }
    }

    /// Back to the login screen (profile signed out)
    pub fn logout(&mut self) {
        self.reset_run(self.seed);
        self.set_phase(GamePhase::Login);
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?} (score {})", self.phase, phase, self.score);
            self.phase = phase;
        }
    }

    // === Particle bursts ===

    /// Emit `count` particles at `origin` with velocities in the given ranges
    pub(crate) fn burst(
        &mut self,
        origin: Vec2,
        count: u32,
        tint: ParticleTint,
        vx: (f32, f32),
        vy: (f32, f32),
    ) {
        use rand::Rng;

        if self.max_particles == 0 {
            return;
        }
        // Drop the oldest to make room, in one pass
        let count = (count as usize).min(self.max_particles);
        let overflow = (self.particles.len() + count).saturating_sub(self.max_particles);
        self.particles.drain(..overflow.min(self.particles.len()));
        for _ in 0..count {
            let vel = Vec2::new(
                self.fx_rng.random_range(vx.0..vx.1),
                self.fx_rng.random_range(vy.0..vy.1),
            );
            let size = self.fx_rng.random_range(2.0..6.0);
            self.particles.push(Particle {
                pos: origin,
                vel,
                tint,
                life: 1.0,
                decay: PARTICLE_DECAY,
                size,
            });
        }
    }
}
