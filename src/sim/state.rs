//! Game state and core simulation types
//!
//! All state the tick mutates lives here, including the seeded RNG, so a
//! seed plus an input sequence reproduces a run exactly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active play
    Racing,
    /// Finish score reached; frozen until a full reset
    Won,
    /// Out of lives; frozen until a full reset
    GameOver,
}

/// One-shot events emitted on state transitions
///
/// Each is pushed exactly once, on the tick the transition happens, and
/// drained by the host before the next tick runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Non-fatal crash; the run soft-reset. Hosts clear held input here.
    LifeLost { lives_left: u32 },
    /// The finish score was reached this tick
    Won,
    /// The last life was lost this tick
    GameOver,
}

/// The player's car
#[derive(Debug, Clone, Copy)]
pub struct Car {
    /// Top-left corner
    pub pos: Vec2,
    /// Body size
    pub size: Vec2,
}

impl Car {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.car_start,
            size: Vec2::new(tuning.car_width, tuning.car_height),
        }
    }

    /// Axis-aligned bounding box for collision checks
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// A falling obstacle
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    /// Body size
    pub size: Vec2,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay numbers for this run
    pub tuning: Tuning,
    /// Player car
    pub car: Car,
    /// Live obstacles; membership changes every tick, order carries no meaning
    pub obstacles: Vec<Obstacle>,
    /// Score, monotonic while racing
    pub score: u32,
    /// Remaining lives
    pub lives: u32,
    /// Current obstacle fall speed per tick
    pub obstacle_speed: f32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending one-shot events, oldest first
    events: Vec<GameEvent>,
    /// Seeded RNG; the only source of randomness in the sim
    rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the canonical tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    /// Create a new game state with explicit tuning (tests shrink the road
    /// or silence the spawner this way)
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let mut state = Self {
            seed,
            tuning,
            car: Car::new(&tuning),
            obstacles: Vec::new(),
            score: 0,
            lives: tuning.initial_lives,
            obstacle_speed: tuning.base_obstacle_speed,
            phase: GamePhase::Racing,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };

        // The road is never empty at the start of a run
        state.spawn_obstacle();

        state
    }

    /// Roll the per-tick spawn chance
    pub(crate) fn roll_spawn(&mut self) -> bool {
        self.rng.random::<f64>() < self.tuning.spawn_chance
    }

    /// Spawn one obstacle above the visible field with randomized x and width
    pub fn spawn_obstacle(&mut self) {
        let x = self
            .rng
            .random_range(self.tuning.spawn_x_min..self.tuning.spawn_x_max);
        let width = self
            .rng
            .random_range(self.tuning.obstacle_width_min..self.tuning.obstacle_width_max);
        self.obstacles.push(Obstacle {
            pos: Vec2::new(x, self.tuning.spawn_y),
            size: Vec2::new(width, self.tuning.obstacle_height),
        });
    }

    /// Reset after a non-fatal crash: positions and score only.
    /// Lives and obstacle speed survive; losing a life does not slow the road.
    pub fn soft_reset(&mut self) {
        self.car = Car::new(&self.tuning);
        self.score = 0;
        self.obstacles.clear();
        self.spawn_obstacle();
    }

    /// Reset everything for a fresh run; the only way out of Won/GameOver
    pub fn full_reset(&mut self) {
        self.soft_reset();
        self.obstacle_speed = self.tuning.base_obstacle_speed;
        self.lives = self.tuning.initial_lives;
        self.phase = GamePhase::Racing;
        self.time_ticks = 0;
        self.events.clear();
    }

    /// Queue a one-shot event for the host
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events; each is returned exactly once
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
