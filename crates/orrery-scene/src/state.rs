//! Everything that changes while the viewer runs.

use std::time::Instant;

use orrery_config::SceneConfig;
use orrery_input::CameraState;

use crate::body::{BodyId, BodyTable, Visibility};
use crate::catalog::{DECLUTTER_ZOOM, solar_system};
use crate::clock::AnimationClock;

/// Camera, orbit angles and the animation clock, owned by the window and
/// passed by reference to input handlers and the renderer.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub camera: CameraState,
    pub bodies: BodyTable,
    pub clock: AnimationClock,
    declutter_zoom: f32,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            camera: CameraState::default(),
            bodies: solar_system(),
            clock: AnimationClock::default(),
            declutter_zoom: DECLUTTER_ZOOM,
        }
    }
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            camera: CameraState::with_zoom(config.initial_zoom),
            bodies: solar_system(),
            clock: AnimationClock::new(config.start_paused),
            declutter_zoom: config.declutter_zoom,
        }
    }

    /// Tick the clock and, unless paused, move every orbit forward by the
    /// elapsed time. Returns the elapsed seconds.
    pub fn advance(&mut self, now: Instant) -> f32 {
        let dt = self.clock.tick(now);
        if !self.clock.is_paused() {
            self.bodies
                .iter_mut()
                .filter_map(|body| body.orbit_mut())
                .for_each(|orbit| orbit.advance(dt));
        }
        dt
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.clock.toggle()
    }

    pub fn is_zoomed_out(&self) -> bool {
        self.camera.is_zoomed_out(self.declutter_zoom)
    }

    pub fn is_visible(&self, id: BodyId) -> bool {
        match self.bodies.get(id).visibility {
            Visibility::Always => true,
            Visibility::ZoomedOut => self.is_zoomed_out(),
        }
    }

    pub fn angle(&self, id: BodyId) -> Option<f32> {
        self.bodies.get(id).orbit().map(|orbit| orbit.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_earth_angle_after_one_second() {
        let mut state = SceneState::default();
        let start = Instant::now();
        assert_eq!(state.advance(start), 0.0);
        state.advance(start + Duration::from_secs(1));

        assert!((state.angle(BodyId::Earth).unwrap() - 1.0).abs() < 1e-6);
        assert!((state.angle(BodyId::Moon).unwrap() - 2.5).abs() < 1e-6);
        assert!((state.angle(BodyId::Neptune).unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(state.angle(BodyId::Sun), None);
    }

    #[test]
    fn test_paused_frames_do_not_move() {
        let mut state = SceneState::default();
        let start = Instant::now();
        state.advance(start);
        state.toggle_pause();
        state.advance(start + Duration::from_secs(5));
        assert_eq!(state.angle(BodyId::Earth), Some(0.0));

        // Resuming picks up from the last paused frame, not from before it.
        state.toggle_pause();
        state.advance(start + Duration::from_millis(5500));
        assert!((state.angle(BodyId::Earth).unwrap() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_visibility_follows_zoom() {
        let mut state = SceneState::default();
        assert!(state.is_visible(BodyId::Earth));
        assert!(!state.is_visible(BodyId::Sun));

        state.camera.zoom = -10.0;
        assert!(!state.is_visible(BodyId::Saturn));
        state.camera.zoom = -10.5;
        assert!(state.is_visible(BodyId::Saturn));
        assert!(state.is_visible(BodyId::SaturnRing));
    }

    #[test]
    fn test_new_reads_config() {
        let config = SceneConfig {
            initial_zoom: -40.0,
            start_paused: true,
            declutter_zoom: -50.0,
        };
        let state = SceneState::new(&config);
        assert_eq!(state.camera.zoom, -40.0);
        assert!(state.clock.is_paused());
        assert!(!state.is_zoomed_out());
    }
}
