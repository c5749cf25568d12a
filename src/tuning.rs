//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so variants can be
//! compared side by side. `Tuning::default()` is the current balance;
//! `Tuning::classic()` is the gentler first release.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Upper bound of the score-derived speed multiplier
    pub speed_cap: f32,
    /// Score needed for +1.0 speed
    pub speed_divisor: f32,
    /// Speed multiplier while slow motion is active
    pub slow_motion_speed: f32,

    /// Base obstacle interval (ticks at speed 1.0) at run start
    pub obstacle_interval: f32,
    /// Interval shrink after every obstacle spawn
    pub obstacle_interval_decrement: f32,
    /// Interval never drops below this
    pub obstacle_interval_floor: f32,

    /// Ticks between power-up rolls (independent of speed)
    pub power_up_period: u32,
    /// Chance that a roll actually spawns a power-up
    pub power_up_chance: f32,
    /// Lifetime of an activated power-up in ticks
    pub power_up_duration: u32,

    /// Points per obstacle passed
    pub score_per_obstacle: u64,
    /// Score span of one level theme
    pub theme_span: u64,

    /// Particle burst sizes
    pub jump_particles: u32,
    pub collision_particles: u32,
    pub pickup_particles: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed_cap: 3.5,
            speed_divisor: 600.0,
            slow_motion_speed: 0.5,

            obstacle_interval: 90.0,
            obstacle_interval_decrement: 0.5,
            obstacle_interval_floor: 50.0,

            power_up_period: 300,
            power_up_chance: 0.3,
            power_up_duration: 300, // 5 seconds at 60 Hz

            score_per_obstacle: 10,
            theme_span: 500,

            jump_particles: 8,
            collision_particles: 20,
            pickup_particles: 12,
        }
    }
}

impl Tuning {
    /// First-release balance: slower ramp, sparser obstacles
    pub fn classic() -> Self {
        Self {
            speed_cap: 3.0,
            speed_divisor: 1000.0,
            obstacle_interval: 120.0,
            obstacle_interval_floor: 60.0,
            ..Self::default()
        }
    }

    /// Score-derived speed multiplier (no slow-motion override)
    pub fn ramp_speed(&self, score: u64) -> f32 {
        (1.0 + score as f32 / self.speed_divisor).min(self.speed_cap)
    }
}
