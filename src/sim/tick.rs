//! Fixed timestep simulation tick
//!
//! Core game loop that advances the race deterministically: steer, advance
//! obstacles, spawn, collide, progress.

use super::state::{GameEvent, GamePhase, GameState};

/// Input snapshot for a single tick (deterministic)
///
/// The host reads its key-hold flags once per tick and passes them here;
/// nothing in the sim polls hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move-left is held
    pub left: bool,
    /// Move-right is held
    pub right: bool,
}

/// Advance the game state by one fixed tick
///
/// A won or lost race is frozen; only `GameState::full_reset` resumes play.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Racing {
        return;
    }

    state.time_ticks += 1;

    steer_car(state, input);
    advance_obstacles(state);
    if state.roll_spawn() {
        state.spawn_obstacle();
    }

    if car_hit_obstacle(state) {
        collision_response(state);
        // A crash tick performs no progression, so a soft reset leaves
        // the score at exactly zero
        return;
    }

    update_progression(state);
}

/// Move the car by the held directions, each clamped to the road interior.
/// Holding both applies both clamped moves.
fn steer_car(state: &mut GameState, input: &TickInput) {
    let tuning = state.tuning;
    if input.left {
        state.car.pos.x = (state.car.pos.x - tuning.car_speed).max(tuning.road_left);
    }
    if input.right {
        state.car.pos.x = (state.car.pos.x + tuning.car_speed).min(tuning.car_x_max());
    }
}

/// Cull obstacles past the bottom of the field, then advance the survivors.
/// Cull-before-advance: an obstacle removed this tick never receives this
/// tick's advance.
fn advance_obstacles(state: &mut GameState) {
    let field_height = state.tuning.field_height;
    state.obstacles.retain(|o| o.pos.y <= field_height);

    let speed = state.obstacle_speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += speed;
    }
}

/// First overlapping obstacle wins; at most one collision response per tick
fn car_hit_obstacle(state: &GameState) -> bool {
    let car_bounds = state.car.bounds();
    state
        .obstacles
        .iter()
        .any(|o| o.bounds().intersects(&car_bounds))
}

/// Lose a life; out of lives ends the race, otherwise the run soft-resets
fn collision_response(state: &mut GameState) {
    state.lives -= 1;
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver);
    } else {
        state.soft_reset();
        state.push_event(GameEvent::LifeLost {
            lives_left: state.lives,
        });
    }
}

/// Score, difficulty ramp, and the finish line
fn update_progression(state: &mut GameState) {
    state.score += 1;

    if state.score % state.tuning.speed_up_interval == 0
        && state.obstacle_speed < state.tuning.max_obstacle_speed
    {
        state.obstacle_speed += 1.0;
    }

    if state.score >= state.tuning.win_score {
        state.phase = GamePhase::Won;
        state.push_event(GameEvent::Won);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    /// A state with the spawner silenced and the road cleared, for runs
    /// that must stay collision-free
    fn quiet_state(seed: u64) -> GameState {
        let tuning = Tuning {
            spawn_chance: 0.0,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(tuning, seed);
        state.obstacles.clear();
        state
    }

    /// Park an obstacle directly on the car so the next tick collides
    fn plant_obstacle_on_car(state: &mut GameState) {
        state.obstacles.push(Obstacle {
            pos: state.car.pos,
            size: state.car.size,
        });
    }

    #[test]
    fn test_car_clamps_at_left_boundary() {
        let mut state = quiet_state(1);
        let input = TickInput {
            left: true,
            right: false,
        };
        for _ in 0..100 {
            tick(&mut state, &input);
        }
        assert_eq!(state.car.pos.x, state.tuning.road_left);
    }

    #[test]
    fn test_car_clamps_at_right_boundary() {
        let mut state = quiet_state(1);
        let input = TickInput {
            left: false,
            right: true,
        };
        for _ in 0..100 {
            tick(&mut state, &input);
        }
        assert_eq!(state.car.pos.x, state.tuning.car_x_max());
    }

    #[test]
    fn test_both_directions_held_cancel_out_mid_road() {
        let mut state = quiet_state(1);
        let start_x = state.car.pos.x;
        let input = TickInput {
            left: true,
            right: true,
        };
        for _ in 0..10 {
            tick(&mut state, &input);
        }
        assert_eq!(state.car.pos.x, start_x);
    }

    #[test]
    fn test_obstacle_culled_after_leaving_field() {
        let mut state = quiet_state(3);
        state.obstacles.push(Obstacle {
            pos: Vec2::new(200.0, state.tuning.field_height - 1.0),
            size: Vec2::new(50.0, 50.0),
        });

        // First tick advances it past the field bottom
        tick(&mut state, &TickInput::default());
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.obstacles[0].pos.y > state.tuning.field_height);

        // Next tick culls it before advancing anything
        tick(&mut state, &TickInput::default());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_obstacles_advance_by_current_speed() {
        let mut state = quiet_state(3);
        state.obstacles.push(Obstacle {
            pos: Vec2::new(200.0, 100.0),
            size: Vec2::new(50.0, 50.0),
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(
            state.obstacles[0].pos.y,
            100.0 + state.tuning.base_obstacle_speed
        );
    }

    #[test]
    fn test_speed_ramps_at_score_thresholds() {
        let mut state = quiet_state(5);
        let base = state.tuning.base_obstacle_speed;

        for _ in 0..99 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.obstacle_speed, base);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 100);
        assert_eq!(state.obstacle_speed, base + 1.0);

        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 200);
        assert_eq!(state.obstacle_speed, base + 2.0);
    }

    #[test]
    fn test_speed_never_exceeds_cap() {
        let mut state = quiet_state(5);
        state.obstacle_speed = state.tuning.max_obstacle_speed;
        state.score = 99;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 100);
        assert_eq!(state.obstacle_speed, state.tuning.max_obstacle_speed);
    }

    #[test]
    fn test_crash_with_lives_remaining_soft_resets() {
        let mut state = quiet_state(8);
        state.score = 412;
        state.obstacle_speed = 9.0;
        state.car.pos.x = state.tuning.road_left;
        plant_obstacle_on_car(&mut state);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::Racing);
        assert_eq!(state.lives, state.tuning.initial_lives - 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.car.pos, state.tuning.car_start);
        assert_eq!(state.obstacle_speed, 9.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::LifeLost {
                lives_left: state.tuning.initial_lives - 1
            }]
        );
    }

    #[test]
    fn test_crash_on_last_life_ends_race() {
        let mut state = quiet_state(8);
        state.lives = 1;
        plant_obstacle_on_car(&mut state);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(state.take_events(), vec![GameEvent::GameOver]);

        // Frozen from here on
        let obstacles_before = state.obstacles.len();
        let ticks_before = state.time_ticks;
        for _ in 0..10 {
            tick(&mut state, &TickInput { left: true, right: false });
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.obstacles.len(), obstacles_before);
        assert_eq!(state.time_ticks, ticks_before);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_three_crashes_end_to_end() {
        let mut state = quiet_state(11);
        assert_eq!(state.lives, 3);

        plant_obstacle_on_car(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Racing);

        // Soft reset replaced the road; plant again
        state.obstacles.clear();
        plant_obstacle_on_car(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 1);
        assert_eq!(state.phase, GamePhase::Racing);

        state.obstacles.clear();
        plant_obstacle_on_car(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let score = state.score;
        let obstacles = state.obstacles.len();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, score);
        assert_eq!(state.obstacles.len(), obstacles);
    }

    #[test]
    fn test_win_on_exact_threshold_tick() {
        let mut state = quiet_state(13);

        for _ in 0..999 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 999);
        assert_eq!(state.phase, GamePhase::Racing);
        assert!(state.take_events().is_empty());

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1000);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.take_events(), vec![GameEvent::Won]);

        // Win signal never re-fires and the score is frozen
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 1000);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_full_reset_resumes_after_win() {
        let mut state = quiet_state(13);
        state.score = 999;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Won);

        state.full_reset();
        assert_eq!(state.phase, GamePhase::Racing);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and inputs must stay identical
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        for i in 0..500u32 {
            let input = TickInput {
                left: i % 3 == 0,
                right: i % 5 == 0,
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.car.pos, state2.car.pos);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        for (a, b) in state1.obstacles.iter().zip(state2.obstacles.iter()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.size, b.size);
        }
    }

    proptest! {
        #[test]
        fn prop_car_never_leaves_road(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(any::<(bool, bool)>(), 0..300),
        ) {
            let mut state = GameState::new(seed);
            for (left, right) in inputs {
                tick(&mut state, &TickInput { left, right });
                prop_assert!(state.car.pos.x >= state.tuning.road_left);
                prop_assert!(state.car.pos.x <= state.tuning.car_x_max());
            }
        }

        #[test]
        fn prop_obstacles_bounded_by_field_and_speed(
            seed in any::<u64>(),
            ticks in 0usize..400,
        ) {
            let mut state = GameState::new(seed);
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default());
                // A survivor may overshoot the field by at most one advance
                // before the next tick culls it
                let bound = state.tuning.field_height + state.obstacle_speed;
                prop_assert!(state.obstacles.iter().all(|o| o.pos.y <= bound));
            }
        }

        #[test]
        fn prop_score_monotonic_while_racing(
            seed in any::<u64>(),
            ticks in 0usize..400,
        ) {
            let mut state = GameState::new(seed);
            let mut last_score = state.score;
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default());
                let events = state.take_events();
                if events.is_empty() {
                    prop_assert!(state.score >= last_score);
                }
                last_score = state.score;
            }
        }
    }
}
