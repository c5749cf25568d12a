//! Per-frame simulation tick
//!
//! `tick` is called once per simulation step in every phase, but only
//! mutates the world while Playing. The pipeline order below is part of the
//! game rules: scoring reads this tick's obstacle positions and the crash
//! test uses the post-update hit-boxes.

use super::autopilot;
use super::level;
use super::player::JumpKind;
use super::spawner::{pick_obstacle, pick_power_up};
use super::state::{GameEvent, GamePhase, GameState, Obstacle, ParticleTint, PowerUp};
use crate::consts::*;

/// Discrete player intents, whatever device produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Jump,
    SlideStart,
    SlideStop,
    PauseToggle,
}

/// Input collected between two ticks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump: bool,
    pub slide_start: bool,
    pub slide_stop: bool,
    /// Pause toggle
    pub pause: bool,
    /// Let the demo pilot play this tick
    pub autopilot: bool,
}

impl TickInput {
    pub fn push(&mut self, intent: Intent) {
        match intent {
            Intent::Jump => self.jump = true,
            Intent::SlideStart => {
                self.slide_start = true;
                self.slide_stop = false;
            }
            Intent::SlideStop => {
                self.slide_stop = true;
                self.slide_start = false;
            }
            Intent::PauseToggle => self.pause = !self.pause,
        }
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.toggle_pause();
    }

    // A released slide key still counts while paused
    if input.slide_stop && state.phase == GamePhase::Paused {
        state.player.stop_slide();
    }

    // Only Playing mutates the world; other phases are render-only
    if state.phase != GamePhase::Playing {
        return;
    }

    if input.autopilot {
        let input = autopilot::steer(state, input);
        apply_input(state, &input);
    } else {
        apply_input(state, input);
    }
    state.time_ticks += 1;

    // 1. Speed: slow motion wins over the score ramp
    state.speed = state
        .modifiers()
        .speed_override
        .unwrap_or_else(|| state.tuning.ramp_speed(state.score));
    let dx = BASE_SCROLL_SPEED * state.speed;
    state.distance += dx;

    // 2. Player physics
    state.player.update();

    // 3. Obstacles move and score once when their trailing edge clears the player
    let player_x = state.player.x;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.advance(dx);
        if !obstacle.passed && obstacle.trailing_edge() < player_x {
            obstacle.passed = true;
            state.score += state.tuning.score_per_obstacle;
            state.events.push(GameEvent::ObstaclePassed { score: state.score });
        }
    }
    update_theme(state);

    // 4. Drop obstacles that left the field
    state.obstacles.retain(|o| !o.is_off_screen());

    // 5. Obstacle spawn
    if state.spawner.obstacle_due(state.speed, &state.tuning) {
        let kind = pick_obstacle(&mut state.rng, level::theme(state.theme_index));
        let id = state.next_entity_id();
        log::debug!("Spawn {:?} #{} at tick {}", kind, id, state.time_ticks);
        state.obstacles.push(Obstacle::new(id, kind, FIELD_WIDTH));
    }

    // 6. Power-ups move and get collected
    let hitbox = state.player.hitbox();
    let mut collected = Vec::new();
    for power_up in state.power_ups.iter_mut() {
        power_up.advance(dx);
        if !power_up.collected && hitbox.intersects(&power_up.hitbox()) {
            power_up.collected = true;
            collected.push((power_up.kind, power_up.bounds().center()));
        }
    }
    state.power_ups.retain(|p| !p.collected && !p.is_off_screen());
    for (kind, at) in collected {
        if let Some(replaced) = state.activate_power_up(kind) {
            log::debug!("{:?} replaces {:?}", kind, replaced);
        } else {
            log::debug!("{:?} activated", kind);
        }
        state.events.push(GameEvent::PowerUpCollected(kind));
        let count = state.tuning.pickup_particles;
        state.burst(at, count, ParticleTint::Pickup(kind), (-3.0, 3.0), (-3.0, 3.0));
    }

    // 7. Power-up spawn
    if state.spawner.power_up_due(&mut state.rng, &state.tuning) {
        let kind = pick_power_up(&mut state.rng);
        let id = state.next_entity_id();
        log::debug!("Spawn power-up {:?} #{}", kind, id);
        state.power_ups.push(PowerUp::new(id, kind, FIELD_WIDTH));
    }

    // 8. Particles
    for particle in state.particles.iter_mut() {
        particle.update();
    }
    state.particles.retain(|p| p.is_alive());

    // 9. Power-up timer
    if let Some(expired) = state.power_up.tick() {
        log::debug!("{:?} expired", expired);
        state.events.push(GameEvent::PowerUpExpired(expired));
    }

    // 10. Crash test
    if !state.modifiers().invincible && crashed(state) {
        state.events.push(GameEvent::Collision);
        let center = state.player.bounds().center();
        let count = state.tuning.collision_particles;
        state.burst(center, count, ParticleTint::Crash, (-4.0, 4.0), (-4.0, 4.0));
        state.set_phase(GamePhase::GameOver);
    }
}

/// Whether the player's hit-box overlaps any obstacle
pub fn crashed(state: &GameState) -> bool {
    let hitbox = state.player.hitbox();
    super::collision::first_overlap(&hitbox, state.obstacles.iter().map(Obstacle::hitbox))
        .is_some()
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if input.slide_stop {
        state.player.stop_slide();
    }
    if input.slide_start && state.player.slide() {
        state.events.push(GameEvent::SlideStart);
    }
    if input.jump {
        let mods = state.modifiers();
        match state.player.jump(&mods) {
            Some(JumpKind::Ground) => {
                state.events.push(GameEvent::Jump);
                jump_dust(state);
            }
            Some(JumpKind::Double) => {
                state.events.push(GameEvent::DoubleJump);
                jump_dust(state);
            }
            None => {}
        }
    }
}

fn jump_dust(state: &mut GameState) {
    let feet = state.player.feet();
    let count = state.tuning.jump_particles;
    state.burst(feet, count, ParticleTint::Jump, (-2.0, 2.0), (-6.0, -2.0));
}

fn update_theme(state: &mut GameState) {
    let index = level::theme_index(state.score, state.tuning.theme_span);
    if index != state.theme_index {
        state.theme_index = index;
        log::info!("Entering {} at score {}", state.theme().name, state.score);
        state.events.push(GameEvent::ThemeChanged { index });
    }
}
