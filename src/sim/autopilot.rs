//! Demo mode: a simple pilot that plays the game
//!
//! Looks at the nearest obstacle still ahead of the player and jumps over
//! ground obstacles or slides under overhead ones once they are close
//! enough. Used for the attract screen and the headless native build.

use super::state::{GamePhase, GameState, Obstacle};
use super::tick::TickInput;
use crate::consts::BASE_SCROLL_SPEED;

/// Ticks of warning before an overhead obstacle reaches the player
const SLIDE_LEAD_TICKS: f32 = 6.0;

/// Add the pilot's intents to `input`
pub fn steer(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    if state.phase != GamePhase::Playing {
        return input;
    }

    let player = &state.player;
    let hitbox = player.hitbox();
    let dx = BASE_SCROLL_SPEED * state.speed;

    // Nearest obstacle whose hit-box hasn't fully passed the player
    let next = state
        .obstacles
        .iter()
        .filter(|o| o.hitbox().right() > hitbox.x)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let gap = |o: &Obstacle| o.hitbox().x - hitbox.right();

    match next {
        Some(obstacle) if obstacle.kind.is_overhead() => {
            if gap(obstacle) <= dx * SLIDE_LEAD_TICKS && !player.is_sliding() {
                input.slide_start = true;
            }
        }
        Some(obstacle) => {
            let gap = gap(obstacle);
            let lead = jump_lead_ticks(state, obstacle, dx);
            if gap > 0.0 && gap <= dx * lead && player.is_grounded() {
                input.jump = true;
            } else if player.is_sliding() {
                input.slide_stop = true;
            }
        }
        None => {
            if player.is_sliding() {
                input.slide_stop = true;
            }
        }
    }
    input
}

/// Ticks before contact to jump so the obstacle passes under the top of the arc
fn jump_lead_ticks(state: &GameState, obstacle: &Obstacle, dx: f32) -> f32 {
    let player = &state.player;
    let airtime = 2.0 * player.jump_power / player.gravity;
    let overlap = (player.hitbox().width + obstacle.hitbox().width) / dx;
    ((airtime - overlap) / 2.0).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;
    use crate::sim::tick::tick;
    use crate::tuning::Tuning;

    fn quiet() -> GameState {
        let tuning = Tuning {
            obstacle_interval: 1.0e9,
            obstacle_interval_floor: 1.0e9,
            power_up_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(5, tuning);
        state.enter_menu();
        state.start_run(5);
        state
    }

    fn pilot() -> TickInput {
        TickInput {
            autopilot: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_clears_each_obstacle_kind() {
        for kind in [
            ObstacleKind::Crate,
            ObstacleKind::Barrier,
            ObstacleKind::Spike,
            ObstacleKind::Cactus,
            ObstacleKind::Boulder,
            ObstacleKind::Log,
            ObstacleKind::Drone,
            ObstacleKind::Crystal,
        ] {
            let mut state = quiet();
            let obstacle = Obstacle::new(100, kind, 600.0);
            state.obstacles.push(obstacle);
            for _ in 0..300 {
                tick(&mut state, &pilot());
            }
            assert_eq!(state.phase, GamePhase::Playing, "{kind:?}");
            assert_eq!(state.score, 10, "{kind:?}");
        }
    }

    #[test]
    fn test_idle_without_obstacles() {
        let state = quiet();
        let input = steer(&state, &TickInput::default());
        assert!(!input.jump);
        assert!(!input.slide_start);
    }

    #[test]
    fn test_does_nothing_outside_playing() {
        let mut state = quiet();
        state.obstacles.push(Obstacle::new(100, ObstacleKind::Crate, 140.0));
        state.toggle_pause();
        let input = steer(&state, &TickInput::default());
        assert!(!input.jump);
    }

    #[test]
    fn test_stands_up_after_overhead() {
        let mut state = quiet();
        state.player.slide();
        let input = steer(&state, &TickInput::default());
        assert!(input.slide_stop);
    }

    #[test]
    fn test_plays_a_real_run() {
        let mut state = GameState::new(8, Tuning::default());
        state.enter_menu();
        state.start_run(8);
        for _ in 0..600 {
            tick(&mut state, &pilot());
        }
        assert!(state.score >= 10, "score {}", state.score);
    }
}
