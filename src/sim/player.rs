//! Player physics
//!
//! The runner stays at a fixed `x`; only the vertical axis is simulated.
//! `y` is the feet baseline, so the player occupies `[y - height, y]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::powerup::Modifiers;
use crate::consts::*;

/// Pose state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pose {
    /// On the ground, full height
    #[default]
    Running,
    /// Airborne (first or second jump)
    Jumping,
    /// On the ground, reduced height
    Sliding,
}

/// Which jump fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Double,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    /// Feet baseline; never below `ground_y`
    pub y: f32,
    pub vel_y: f32,
    pub width: f32,
    pub normal_height: f32,
    pub slide_height: f32,
    pub pose: Pose,
    pub jump_power: f32,
    pub gravity: f32,
    pub ground_y: f32,
    /// Extra jump granted by a DoubleJump pickup; spent mid-air or lost on landing
    pub double_jump_armed: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            y: GROUND_Y,
            vel_y: 0.0,
            width: PLAYER_WIDTH,
            normal_height: PLAYER_HEIGHT,
            slide_height: PLAYER_SLIDE_HEIGHT,
            pose: Pose::Running,
            jump_power: PLAYER_JUMP_POWER,
            gravity: PLAYER_GRAVITY,
            ground_y: GROUND_Y,
            double_jump_armed: false,
        }
    }
}

impl Player {
    /// Grant one extra mid-air jump (DoubleJump pickup)
    pub fn arm_double_jump(&mut self) {
        self.double_jump_armed = true;
    }

    pub fn is_grounded(&self) -> bool {
        self.pose != Pose::Jumping
    }

    pub fn is_sliding(&self) -> bool {
        self.pose == Pose::Sliding
    }

    /// Current height; exactly one of the two pose heights
    pub fn height(&self) -> f32 {
        if self.is_sliding() {
            self.slide_height
        } else {
            self.normal_height
        }
    }

    /// Visual bounds
    pub fn bounds(&self) -> Rect {
        let height = self.height();
        Rect::new(self.x, self.y - height, self.width, height)
    }

    /// Collision box, inset from the visual bounds
    pub fn hitbox(&self) -> Rect {
        self.bounds().inset(PLAYER_HITBOX_INSET)
    }

    /// Point between the feet, where jump dust spawns
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y)
    }

    /// Advance one tick of gravity. Returns true on the tick the player lands.
    pub fn update(&mut self) -> bool {
        if self.pose != Pose::Jumping {
            return false;
        }

        self.vel_y += self.gravity;
        self.y += self.vel_y;

        if self.y >= self.ground_y {
            self.y = self.ground_y;
            self.vel_y = 0.0;
            self.pose = Pose::Running;
            self.double_jump_armed = false;
            return true;
        }
        false
    }

    /// Whether a mid-air jump would fire right now
    pub fn can_double_jump(&self, mods: &Modifiers) -> bool {
        mods.double_jump && self.pose == Pose::Jumping && self.double_jump_armed
    }

    /// Jump from the ground, or spend the armed extra jump while airborne
    pub fn jump(&mut self, mods: &Modifiers) -> Option<JumpKind> {
        if self.is_grounded() {
            // Jumping out of a slide stands the player back up
            self.pose = Pose::Jumping;
            self.vel_y = -self.jump_power;
            Some(JumpKind::Ground)
        } else if self.can_double_jump(mods) {
            self.vel_y = -self.jump_power * DOUBLE_JUMP_FACTOR;
            self.double_jump_armed = false;
            Some(JumpKind::Double)
        } else {
            None
        }
    }

    /// Start sliding. Only possible on the ground; returns true if the pose changed.
    pub fn slide(&mut self) -> bool {
        if self.pose == Pose::Running {
            self.pose = Pose::Sliding;
            true
        } else {
            false
        }
    }

    pub fn stop_slide(&mut self) {
        if self.pose == Pose::Sliding {
            self.pose = Pose::Running;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DOUBLE: Modifiers = Modifiers {
        double_jump: true,
        invincible: false,
        speed_override: None,
    };

    #[test]
    fn test_ground_jump_and_land() {
        let mut player = Player::default();
        assert_eq!(player.jump(&Modifiers::default()), Some(JumpKind::Ground));
        assert_eq!(player.vel_y, -PLAYER_JUMP_POWER);

        let mut ticks = 0;
        while !player.update() {
            ticks += 1;
            assert!(player.y <= player.ground_y);
            assert!(ticks < 1000, "player never landed");
        }
        assert_eq!(player.y, GROUND_Y);
        assert_eq!(player.vel_y, 0.0);
        assert_eq!(player.pose, Pose::Running);
        // 18 / 0.8 up and the same down
        assert!((43..=45).contains(&ticks));
    }

    #[test]
    fn test_no_mid_air_jump_without_power_up() {
        let mut player = Player::default();
        player.jump(&Modifiers::default());
        player.update();
        let vel = player.vel_y;
        assert_eq!(player.jump(&Modifiers::default()), None);
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_double_jump_once_per_pickup() {
        let mut player = Player::default();
        player.arm_double_jump();
        player.jump(&DOUBLE);
        for _ in 0..10 {
            player.update();
        }
        assert!(player.can_double_jump(&DOUBLE));
        assert_eq!(player.jump(&DOUBLE), Some(JumpKind::Double));
        assert_eq!(player.vel_y, -PLAYER_JUMP_POWER * DOUBLE_JUMP_FACTOR);
        assert!(!player.can_double_jump(&DOUBLE));
        assert_eq!(player.jump(&DOUBLE), None);

        // The next flight gets no extra jump, even with the effect still running
        while !player.update() {}
        player.jump(&DOUBLE);
        player.update();
        assert!(!player.can_double_jump(&DOUBLE));
        assert_eq!(player.jump(&DOUBLE), None);
    }

    #[test]
    fn test_landing_drops_unused_double_jump() {
        let mut player = Player::default();
        player.jump(&Modifiers::default());
        player.arm_double_jump();
        while !player.update() {}
        assert!(!player.double_jump_armed);

        player.jump(&DOUBLE);
        player.update();
        assert_eq!(player.jump(&DOUBLE), None);
    }

    #[test]
    fn test_armed_jump_needs_active_effect() {
        let mut player = Player::default();
        player.arm_double_jump();
        player.jump(&Modifiers::default());
        player.update();
        assert_eq!(player.jump(&Modifiers::default()), None);
        assert!(player.double_jump_armed);
    }

    #[test]
    fn test_slide_only_on_ground() {
        let mut player = Player::default();
        assert!(player.slide());
        assert_eq!(player.height(), PLAYER_SLIDE_HEIGHT);
        assert_eq!(player.bounds().bottom(), GROUND_Y);
        player.stop_slide();
        assert_eq!(player.height(), PLAYER_HEIGHT);

        player.jump(&Modifiers::default());
        assert!(!player.slide());
        assert_eq!(player.pose, Pose::Jumping);
    }

    #[test]
    fn test_jump_cancels_slide() {
        let mut player = Player::default();
        player.slide();
        assert_eq!(player.jump(&Modifiers::default()), Some(JumpKind::Ground));
        assert_eq!(player.height(), PLAYER_HEIGHT);
    }

    #[test]
    fn test_hitbox_is_inset() {
        let player = Player::default();
        let hb = player.hitbox();
        assert_eq!(hb.x, PLAYER_X + PLAYER_HITBOX_INSET);
        assert_eq!(hb.width, PLAYER_WIDTH - 2.0 * PLAYER_HITBOX_INSET);
        assert_eq!(hb.bottom(), GROUND_Y - PLAYER_HITBOX_INSET);
    }

    #[derive(Debug, Clone, Copy)]
    enum Action {
        Jump,
        Slide,
        StopSlide,
        Wait,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Jump),
            Just(Action::Slide),
            Just(Action::StopSlide),
            Just(Action::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_player_never_sinks_below_ground(
            actions in proptest::collection::vec(action(), 1..400),
            double_jump in any::<bool>(),
        ) {
            let mods = Modifiers { double_jump, ..Modifiers::default() };
            let mut player = Player::default();
            player.arm_double_jump();
            let mut double_jumps = 0;
            for action in actions {
                match action {
                    Action::Jump => {
                        if player.jump(&mods) == Some(JumpKind::Double) {
                            double_jumps += 1;
                        }
                    }
                    Action::Slide => { player.slide(); }
                    Action::StopSlide => player.stop_slide(),
                    Action::Wait => {}
                }
                player.update();
                prop_assert!(player.y <= player.ground_y);
                if player.is_grounded() {
                    prop_assert_eq!(player.y, player.ground_y);
                }
                // One pickup, at most one extra jump
                prop_assert!(double_jumps <= 1);
                if !double_jump {
                    prop_assert_eq!(double_jumps, 0);
                }
                let h = player.height();
                prop_assert!(h == player.normal_height || h == player.slide_height);
            }
        }
    }
}
