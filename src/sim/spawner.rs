//! Obstacle and power-up spawning
//!
//! Obstacles come on a speed-scaled countdown whose base interval shrinks
//! after every spawn (the difficulty ramp). Power-ups come on a fixed period
//! and only when a probability roll succeeds.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::Theme;
use super::state::{ObstacleKind, PowerUpKind};
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Ticks since the last obstacle
    pub obstacle_timer: u32,
    /// Base interval in ticks at speed 1.0
    pub obstacle_interval: f32,
    /// Ticks since the last power-up roll
    pub power_up_timer: u32,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            obstacle_timer: 0,
            obstacle_interval: tuning.obstacle_interval,
            power_up_timer: 0,
        }
    }

    /// Count one tick toward the next obstacle. Returns true when one is due;
    /// the interval then decays toward its floor.
    pub fn obstacle_due(&mut self, speed: f32, tuning: &Tuning) -> bool {
        self.obstacle_timer += 1;
        if self.obstacle_timer as f32 >= self.obstacle_interval / speed {
            self.obstacle_timer = 0;
            self.obstacle_interval = (self.obstacle_interval - tuning.obstacle_interval_decrement)
                .max(tuning.obstacle_interval_floor);
            true
        } else {
            false
        }
    }

    /// Count one tick toward the next power-up roll. Returns true when the
    /// period elapsed and the roll succeeded.
    pub fn power_up_due<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) -> bool {
        self.power_up_timer += 1;
        if self.power_up_timer >= tuning.power_up_period {
            self.power_up_timer = 0;
            rng.random::<f32>() < tuning.power_up_chance
        } else {
            false
        }
    }
}

/// Uniform draw from the theme's weighted list
pub fn pick_obstacle<R: Rng>(rng: &mut R, theme: &Theme) -> ObstacleKind {
    theme.obstacles[rng.random_range(0..theme.obstacles.len())]
}

pub fn pick_power_up<R: Rng>(rng: &mut R) -> PowerUpKind {
    PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::THEMES;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Ticks at which obstacles spawn over `ticks` ticks at a fixed speed
    fn spawn_ticks(spawner: &mut Spawner, speed: f32, ticks: u32, tuning: &Tuning) -> Vec<u32> {
        (1..=ticks)
            .filter(|_| spawner.obstacle_due(speed, tuning))
            .collect()
    }

    #[test]
    fn test_double_speed_halves_the_interval() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(&tuning);
        assert_eq!(spawner.obstacle_interval, 90.0);

        let spawns = spawn_ticks(&mut spawner, 2.0, 180, &tuning);
        // 90 / 2 = 45, and the first decrements (89.5, 89, 88.5) still round up to 45
        assert_eq!(spawns, vec![45, 90, 135, 180]);
        assert_eq!(spawner.obstacle_interval, 88.0);
    }

    #[test]
    fn test_interval_decays_to_floor() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(&tuning);
        for _ in 0..20_000 {
            spawner.obstacle_due(2.0, &tuning);
        }
        assert_eq!(spawner.obstacle_interval, 50.0);

        // At the floor, speed 2 spawns every 25 ticks forever
        spawner.obstacle_timer = 0;
        let spawns = spawn_ticks(&mut spawner, 2.0, 100, &tuning);
        assert_eq!(spawns, vec![25, 50, 75, 100]);
        assert_eq!(spawner.obstacle_interval, 50.0);
    }

    #[test]
    fn test_faster_speed_spawns_sooner() {
        let tuning = Tuning::default();
        let mut slow = Spawner::new(&tuning);
        let mut fast = Spawner::new(&tuning);
        let slow_first = spawn_ticks(&mut slow, 1.0, 200, &tuning)[0];
        let fast_first = spawn_ticks(&mut fast, 3.0, 200, &tuning)[0];
        assert_eq!(slow_first, 90);
        assert_eq!(fast_first, 30);
    }

    #[test]
    fn test_power_up_rolls_once_per_period() {
        let tuning = Tuning {
            power_up_chance: 1.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = Spawner::new(&tuning);
        let due: Vec<u32> = (1..=900)
            .filter(|_| spawner.power_up_due(&mut rng, &tuning))
            .collect();
        assert_eq!(due, vec![300, 600, 900]);
    }

    #[test]
    fn test_power_up_roll_can_fail() {
        let tuning = Tuning {
            power_up_chance: 0.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = Spawner::new(&tuning);
        assert!((0..3_000).all(|_| !spawner.power_up_due(&mut rng, &tuning)));
        // The timer still resets every period
        assert_eq!(spawner.power_up_timer, 0);
    }

    #[test]
    fn test_power_up_rate_is_near_chance() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut spawner = Spawner::new(&tuning);
        let spawned = (0..300 * 2_000)
            .filter(|_| spawner.power_up_due(&mut rng, &tuning))
            .count();
        let rate = spawned as f32 / 2_000.0;
        assert!((0.25..0.35).contains(&rate), "rate {rate}");
    }

    #[test]
    fn test_obstacle_weights_follow_theme() {
        let mut rng = Pcg32::seed_from_u64(3);
        let theme = &THEMES[0];
        let draws = 10_000;
        let crates = (0..draws)
            .filter(|_| pick_obstacle(&mut rng, theme) == ObstacleKind::Crate)
            .count();
        // 3 of 5 slots
        let share = crates as f32 / draws as f32;
        assert!((0.55..0.65).contains(&share), "share {share}");
    }

    #[test]
    fn test_obstacles_come_from_theme() {
        let mut rng = Pcg32::seed_from_u64(9);
        for theme in &THEMES {
            for _ in 0..100 {
                assert!(theme.obstacles.contains(&pick_obstacle(&mut rng, theme)));
            }
        }
    }
}
