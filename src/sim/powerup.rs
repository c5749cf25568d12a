//! Power-up controller
//!
//! At most one power-up is active. Collecting any power-up (including the
//! one already running) replaces the active record and restarts its timer.
//! The controller never touches the player; it exposes `Modifiers` that the
//! jump logic and the speed curve read.

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// Gameplay modifiers implied by the active power-up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Modifiers {
    /// Mid-air jumps are allowed (see `Player::arm_double_jump`)
    pub double_jump: bool,
    /// Obstacle collisions are ignored
    pub invincible: bool,
    /// Replaces the score-derived speed multiplier
    pub speed_override: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub ticks_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpController {
    active: Option<ActivePowerUp>,
    duration: u32,
    slow_motion_speed: f32,
}

impl PowerUpController {
    pub fn new(duration: u32, slow_motion_speed: f32) -> Self {
        Self {
            active: None,
            duration,
            slow_motion_speed,
        }
    }

    /// Activate `kind` for the full duration, replacing whatever was active.
    /// Returns the kind that was cut short, if any.
    pub fn activate(&mut self, kind: PowerUpKind) -> Option<PowerUpKind> {
        let replaced = self.active.map(|a| a.kind);
        self.active = Some(ActivePowerUp {
            kind,
            ticks_remaining: self.duration,
        });
        replaced
    }

    /// Count down one tick. Returns the kind that expired on this tick.
    pub fn tick(&mut self) -> Option<PowerUpKind> {
        let active = self.active.as_mut()?;
        active.ticks_remaining = active.ticks_remaining.saturating_sub(1);
        if active.ticks_remaining == 0 {
            let kind = active.kind;
            self.active = None;
            Some(kind)
        } else {
            None
        }
    }

    pub fn active(&self) -> Option<ActivePowerUp> {
        self.active
    }

    pub fn active_kind(&self) -> Option<PowerUpKind> {
        self.active().map(|a| a.kind)
    }

    /// Remaining time as a fraction of the full duration (0 when idle)
    pub fn remaining_fraction(&self) -> f32 {
        match self.active() {
            Some(a) if self.duration > 0 => a.ticks_remaining as f32 / self.duration as f32,
            _ => 0.0,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self.active_kind() {
            None => Modifiers::default(),
            Some(PowerUpKind::DoubleJump) => Modifiers {
                double_jump: true,
                ..Modifiers::default()
            },
            Some(PowerUpKind::SlowMotion) => Modifiers {
                speed_override: Some(self.slow_motion_speed),
                ..Modifiers::default()
            },
            Some(PowerUpKind::Invincible) => Modifiers {
                invincible: true,
                ..Modifiers::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controller() -> PowerUpController {
        PowerUpController::new(300, 0.5)
    }

    #[test]
    fn test_idle_has_no_modifiers() {
        let c = controller();
        assert_eq!(c.modifiers(), Modifiers::default());
        assert_eq!(c.remaining_fraction(), 0.0);
    }

    #[test]
    fn test_expires_after_duration() {
        let mut c = controller();
        assert_eq!(c.activate(PowerUpKind::Invincible), None);
        for _ in 0..299 {
            assert_eq!(c.tick(), None);
        }
        assert_eq!(c.active().map(|a| a.ticks_remaining), Some(1));
        assert_eq!(c.tick(), Some(PowerUpKind::Invincible));
        assert_eq!(c.active(), None);
        assert!(!c.modifiers().invincible);
        assert_eq!(c.tick(), None);
    }

    #[test]
    fn test_recollect_restarts_timer() {
        let mut c = controller();
        c.activate(PowerUpKind::Invincible);
        for _ in 0..100 {
            c.tick();
        }
        assert_eq!(c.active().map(|a| a.ticks_remaining), Some(200));
        assert_eq!(c.activate(PowerUpKind::Invincible), Some(PowerUpKind::Invincible));
        assert_eq!(c.active().map(|a| a.ticks_remaining), Some(300));
    }

    #[test]
    fn test_new_kind_replaces_old_effect() {
        let mut c = controller();
        c.activate(PowerUpKind::DoubleJump);
        assert!(c.modifiers().double_jump);
        assert_eq!(c.activate(PowerUpKind::SlowMotion), Some(PowerUpKind::DoubleJump));
        let mods = c.modifiers();
        assert!(!mods.double_jump);
        assert_eq!(mods.speed_override, Some(0.5));
    }

    fn kind() -> impl Strategy<Value = PowerUpKind> {
        prop_oneof![
            Just(PowerUpKind::DoubleJump),
            Just(PowerUpKind::SlowMotion),
            Just(PowerUpKind::Invincible),
        ]
    }

    proptest! {
        #[test]
        fn prop_single_effect_and_bounded_timer(
            steps in proptest::collection::vec(proptest::option::of(kind()), 1..800)
        ) {
            let mut c = controller();
            for step in steps {
                match step {
                    Some(k) => {
                        c.activate(k);
                        prop_assert_eq!(c.active().map(|a| a.ticks_remaining), Some(300));
                    }
                    None => { c.tick(); }
                }
                let mods = c.modifiers();
                let effects = [mods.double_jump, mods.invincible, mods.speed_override.is_some()]
                    .iter()
                    .filter(|on| **on)
                    .count();
                prop_assert!(effects <= 1);
                prop_assert_eq!(effects == 1, c.active().is_some());
                if let Some(a) = c.active() {
                    prop_assert!(a.ticks_remaining >= 1 && a.ticks_remaining <= 300);
                }
            }
        }
    }
}
