//! Routes window input events to the camera.

use std::time::Instant;

use glam::Vec2;
use orrery_config::InputConfig;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase};

use crate::camera::CameraState;
use crate::mouse::MouseState;
use crate::touch::TouchTracker;

/// Owns per-device gesture state and applies it to a [`CameraState`].
///
/// Every handler runs synchronously on the event thread and mutates the
/// camera it is given.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: InputConfig,
    mouse: MouseState,
    touch: TouchTracker,
    viewport: Vec2,
}

impl CameraController {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            mouse: MouseState::new(),
            touch: TouchTracker::new(),
            viewport: Vec2::ONE,
        }
    }

    /// Viewport size in physical pixels, used for wheel-toward-cursor panning.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    pub fn on_cursor_moved(&mut self, position: Vec2, camera: &mut CameraState) {
        self.mouse.on_cursor_moved(position, camera, &self.config);
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.mouse.on_button(button, state);
    }

    pub fn on_wheel(&mut self, delta: MouseScrollDelta, camera: &mut CameraState) {
        self.mouse.on_wheel(delta, self.viewport, camera, &self.config);
    }

    pub fn on_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        position: Vec2,
        now: Instant,
        camera: &mut CameraState,
    ) {
        self.touch
            .on_touch(id, phase, position, now, camera, &self.config);
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }
}
