//! Data-driven game balance
//!
//! Every gameplay number lives here so tests can shrink the road or silence
//! the spawner without touching the sim. Validated once before the loop
//! starts; a bad value is a startup error, not a runtime condition.

use anyhow::{Result, ensure};
use glam::Vec2;

/// Gameplay tuning values
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    /// Left edge of the road surface
    pub road_left: f32,
    /// Width of the drivable road surface
    pub road_width: f32,
    /// Height of the play field; obstacles past it are culled
    pub field_height: f32,
    /// Car body size
    pub car_width: f32,
    pub car_height: f32,
    /// Car start position (top-left corner)
    pub car_start: Vec2,
    /// Lateral car movement per tick
    pub car_speed: f32,
    /// Obstacle fall speed at the start of a run
    pub base_obstacle_speed: f32,
    /// Hard cap on obstacle fall speed
    pub max_obstacle_speed: f32,
    /// Score interval between speed-ups
    pub speed_up_interval: u32,
    /// Score that ends the race with a win
    pub win_score: u32,
    /// Lives at the start of a run
    pub initial_lives: u32,
    /// Per-tick probability of spawning an obstacle
    pub spawn_chance: f64,
    /// Obstacle spawn x range (uniform)
    pub spawn_x_min: f32,
    pub spawn_x_max: f32,
    /// Obstacle width range (uniform)
    pub obstacle_width_min: f32,
    pub obstacle_width_max: f32,
    /// Obstacle height (constant)
    pub obstacle_height: f32,
    /// Spawn y, above the visible field
    pub spawn_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            road_left: 150.0,
            road_width: 300.0,
            field_height: crate::consts::WINDOW_HEIGHT,
            car_width: 40.0,
            car_height: 60.0,
            car_start: Vec2::new(250.0, 500.0),
            car_speed: 15.0,
            base_obstacle_speed: 5.0,
            max_obstacle_speed: 20.0,
            speed_up_interval: 100,
            win_score: 1000,
            initial_lives: 3,
            spawn_chance: 0.05,
            spawn_x_min: 200.0,
            spawn_x_max: 400.0,
            obstacle_width_min: 50.0,
            obstacle_width_max: 100.0,
            obstacle_height: 50.0,
            spawn_y: -100.0,
        }
    }
}

impl Tuning {
    /// Right edge of the road surface
    #[inline]
    pub fn road_right(&self) -> f32 {
        self.road_left + self.road_width
    }

    /// Rightmost legal car x (top-left corner coordinate)
    #[inline]
    pub fn car_x_max(&self) -> f32 {
        self.road_right() - self.car_width
    }

    /// Check that every value is within reasonable limits.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.road_width > 0.0,
            "road_width is {}, which is not positive!",
            self.road_width
        );
        ensure!(
            self.car_width > 0.0 && self.car_height > 0.0,
            "car size {}x{} is not positive!",
            self.car_width,
            self.car_height
        );
        ensure!(
            self.car_width < self.road_width,
            "car_width {} does not fit on a road of width {}!",
            self.car_width,
            self.road_width
        );
        ensure!(
            self.car_start.x >= self.road_left && self.car_start.x <= self.car_x_max(),
            "car_start.x {} is outside the road interior [{}, {}]!",
            self.car_start.x,
            self.road_left,
            self.car_x_max()
        );
        ensure!(self.car_speed > 0.0, "car_speed must be positive!");
        ensure!(
            self.initial_lives >= 1,
            "initial_lives must be at least one, but is {}!",
            self.initial_lives
        );
        ensure!(
            self.base_obstacle_speed > 0.0
                && self.base_obstacle_speed <= self.max_obstacle_speed,
            "base_obstacle_speed {} is not within (0, {}]!",
            self.base_obstacle_speed,
            self.max_obstacle_speed
        );
        ensure!(
            self.speed_up_interval >= 1,
            "speed_up_interval must be at least one!"
        );
        ensure!(self.win_score >= 1, "win_score must be at least one!");
        ensure!(
            (0.0..=1.0).contains(&self.spawn_chance),
            "spawn_chance {} is not within [0.0, 1.0]!",
            self.spawn_chance
        );
        ensure!(
            self.spawn_x_min < self.spawn_x_max,
            "spawn x range [{}, {}) is empty!",
            self.spawn_x_min,
            self.spawn_x_max
        );
        ensure!(
            self.spawn_x_min >= self.road_left && self.spawn_x_max <= self.road_right(),
            "spawn x range [{}, {}) leaves the road [{}, {}]!",
            self.spawn_x_min,
            self.spawn_x_max,
            self.road_left,
            self.road_right()
        );
        ensure!(
            self.obstacle_width_min > 0.0 && self.obstacle_width_min < self.obstacle_width_max,
            "obstacle width range [{}, {}) is not positive and non-empty!",
            self.obstacle_width_min,
            self.obstacle_width_max
        );
        ensure!(
            self.obstacle_height > 0.0,
            "obstacle_height must be positive!"
        );
        ensure!(
            self.spawn_y < 0.0,
            "spawn_y {} is not above the visible field!",
            self.spawn_y
        );
        ensure!(
            self.field_height > 0.0,
            "field_height must be positive!"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_zero_road_width_rejected() {
        let tuning = Tuning {
            road_width: 0.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_zero_lives_rejected() {
        let tuning = Tuning {
            initial_lives: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_spawn_chance_out_of_range_rejected() {
        let tuning = Tuning {
            spawn_chance: 1.5,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
