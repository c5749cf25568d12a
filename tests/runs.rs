//! Whole runs driven through the session, with in-memory storage

use nexus_runner::persistence::MemoryStorage;
use nexus_runner::sim::{GameEvent, GamePhase, Intent, Obstacle, ObstacleKind};
use nexus_runner::{Session, Tuning};

fn signed_in(seed: u64) -> Session<MemoryStorage> {
    let mut s = Session::new(MemoryStorage::new(), seed);
    assert!(s.login("Ada"));
    s
}

/// Step until the run ends or `limit` ticks pass
fn run_out(s: &mut Session<MemoryStorage>, limit: u32) -> u32 {
    let mut ticks = 0;
    while s.phase() == GamePhase::Playing && ticks < limit {
        s.step();
        ticks += 1;
    }
    ticks
}

/// Put a crate right in front of the player
fn doom(s: &mut Session<MemoryStorage>) {
    let state = s.state_mut();
    let mut obstacle = Obstacle::new(999, ObstacleKind::Crate, 0.0);
    obstacle.pos.x = state.player.x + 4.0;
    state.obstacles.push(obstacle);
}

#[test]
fn idle_run_ends_on_first_obstacle() {
    for seed in [1, 11, 12_345] {
        let mut s = signed_in(seed);
        s.start(seed);
        let ticks = run_out(&mut s, 2_000);
        assert_eq!(s.phase(), GamePhase::GameOver, "still alive after {ticks}");
        assert_eq!(s.state().score, 0);
        assert!(s.drain_events().contains(&GameEvent::Collision));

        let profile = s.current_profile().unwrap();
        assert_eq!(profile.total_games, 1);
        assert_eq!(profile.best_score, 0);
    }
}

#[test]
fn same_seed_same_run() {
    let play = || {
        let mut s = signed_in(42);
        s.start(42);
        for t in 0..400u32 {
            if t % 37 == 0 {
                s.push_intent(Intent::Jump);
            }
            s.step();
        }
        s
    };
    let (a, b) = (play(), play());
    assert_eq!(a.phase(), b.phase());
    assert_eq!(a.state().score, b.state().score);
    assert_eq!(a.state().time_ticks, b.state().time_ticks);
    assert_eq!(a.state().obstacles, b.state().obstacles);
    assert_eq!(a.state().power_ups, b.state().power_ups);
    assert_eq!(a.state().player, b.state().player);
}

#[test]
fn restart_after_game_over_is_fresh() {
    let mut s = signed_in(4);
    s.start(4);
    run_out(&mut s, 2_000);
    assert_eq!(s.phase(), GamePhase::GameOver);

    assert!(s.start(5));
    let state = s.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.time_ticks, 0);
    assert_eq!(state.distance, 0.0);
    assert!(state.obstacles.is_empty());
    assert!(state.power_ups.is_empty());
    assert!(state.power_up.active_kind().is_none());
    assert!(s.last_result().is_none());
}

#[test]
fn autopilot_scores() {
    let mut s = signed_in(8);
    s.set_autopilot(true);
    s.start(8);
    run_out(&mut s, 600);
    assert!(s.state().score >= 10, "score {}", s.state().score);
}

#[test]
fn profiles_survive_reload() {
    let mut s = signed_in(2);
    s.start(2);
    s.state_mut().score = 90;
    doom(&mut s);
    s.step();
    assert_eq!(s.phase(), GamePhase::GameOver);

    let storage = s.profiles().storage().clone();
    let mut again = Session::new(storage, 3);
    assert_eq!(again.phase(), GamePhase::Login);
    assert!(again.login("Ada"));
    let profile = again.current_profile().unwrap();
    assert_eq!(profile.best_score, 90);
    assert_eq!(profile.total_games, 1);
}

#[test]
fn classic_tuning_is_slower() {
    let mut s = Session::with_tuning(MemoryStorage::new(), 6, Tuning::classic());
    assert!(s.login("Ada"));
    s.start(6);
    s.state_mut().score = 1_000;
    s.step();
    // 1 + 1000 / 1000
    assert!((s.state().speed - 2.0).abs() < 1e-6, "speed {}", s.state().speed);
}

#[test]
fn corrupt_storage_starts_empty() {
    let storage = MemoryStorage::new().with_entry("nexus_runner_profiles", "{not json");
    let mut s = Session::new(storage, 1);
    assert!(s.profiles().is_empty());
    assert!(s.login("Ada"));
    s.start(1);
    assert_eq!(s.phase(), GamePhase::Playing);
}
