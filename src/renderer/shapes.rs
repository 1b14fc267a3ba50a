//! Shape generation for 2D primitives
//!
//! The whole scene is flat axis-aligned quads, assembled on the CPU into a
//! single triangle list each frame.

use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::rect::Rect;
use crate::sim::state::{GamePhase, GameState};

/// Width of the finish-line strip at the road's left edge
const FINISH_LINE_WIDTH: f32 = 10.0;
/// Lane dash geometry: a 10x20 dash every 40 pixels
const LANE_DASH_WIDTH: f32 = 10.0;
const LANE_DASH_HEIGHT: f32 = 20.0;
const LANE_DASH_PERIOD: f32 = 40.0;

/// Two triangles covering a rectangle
pub fn quad(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (l, r) = (rect.left(), rect.right());
    let (t, b) = (rect.top(), rect.bottom());
    [
        Vertex::new(l, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, b, color),
    ]
}

/// Center-lane dashes, scrolled with the road so the car reads as moving
pub fn lane_markings(state: &GameState, scroll: bool) -> Vec<Vertex> {
    let tuning = &state.tuning;
    let center_x = tuning.road_left + tuning.road_width / 2.0 - LANE_DASH_WIDTH / 2.0;

    // Dashes scroll downward at the obstacle speed and wrap every period
    let offset = if scroll {
        (state.time_ticks as f32 * state.obstacle_speed) % LANE_DASH_PERIOD
    } else {
        0.0
    };

    let mut vertices = Vec::new();
    let mut y = offset - LANE_DASH_PERIOD;
    while y < tuning.field_height {
        vertices.extend_from_slice(&quad(
            &Rect::new(center_x, y, LANE_DASH_WIDTH, LANE_DASH_HEIGHT),
            colors::LANE_MARKING,
        ));
        y += LANE_DASH_PERIOD;
    }
    vertices
}

/// Assemble the full frame for a game state
///
/// Order is paint order: road, markings, finish line, obstacles, car.
pub fn scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let tuning = &state.tuning;
    let mut vertices = Vec::with_capacity(64 * 6);

    // Road band
    vertices.extend_from_slice(&quad(
        &Rect::new(
            tuning.road_left,
            0.0,
            tuning.road_width,
            tuning.field_height,
        ),
        colors::ROAD,
    ));

    vertices.extend(lane_markings(state, !settings.reduced_motion));

    // Finish line appears once the win threshold is reached
    if state.phase == GamePhase::Won {
        vertices.extend_from_slice(&quad(
            &Rect::new(tuning.road_left, 0.0, FINISH_LINE_WIDTH, tuning.field_height),
            colors::FINISH_LINE,
        ));
    }

    let (car_color, obstacle_color) = if settings.high_contrast {
        (colors::CAR_HIGH_CONTRAST, colors::OBSTACLE_HIGH_CONTRAST)
    } else {
        (colors::CAR, colors::OBSTACLE)
    };

    for obstacle in &state.obstacles {
        vertices.extend_from_slice(&quad(&obstacle.bounds(), obstacle_color));
    }

    vertices.extend_from_slice(&quad(&state.car.bounds(), car_color));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_covers_rect() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let vertices = quad(&rect, colors::CAR);
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert!(v.position[0] == 10.0 || v.position[0] == 40.0);
            assert!(v.position[1] == 20.0 || v.position[1] == 60.0);
        }
    }

    #[test]
    fn test_scene_scales_with_obstacles() {
        let settings = Settings::default();
        let mut state = GameState::new(42);
        let base = scene(&state, &settings).len();

        state.spawn_obstacle();
        state.spawn_obstacle();
        assert_eq!(scene(&state, &settings).len(), base + 12);
    }

    #[test]
    fn test_finish_line_only_when_won() {
        let settings = Settings::default();
        let mut state = GameState::new(42);
        let racing = scene(&state, &settings).len();

        state.phase = GamePhase::Won;
        assert_eq!(scene(&state, &settings).len(), racing + 6);
    }
}
