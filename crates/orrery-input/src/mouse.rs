//! Mouse drag and wheel handling.
//!
//! Primary-button drags pan the camera, secondary-button drags orbit it, and
//! the wheel zooms while nudging the view toward the cursor.

use glam::Vec2;
use orrery_config::InputConfig;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

use crate::camera::CameraState;

/// Which buttons are held, mirroring the DOM `buttons` bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldButtons {
    primary: bool,
    secondary: bool,
}

impl HeldButtons {
    fn any(self) -> bool {
        self.primary || self.secondary
    }
}

/// Cursor position and drag anchor between events.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// `None` until the first `CursorMoved`.
    position: Option<Vec2>,
    drag_anchor: Option<Vec2>,
    held: HeldButtons,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `MouseInput` event.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.held.primary = pressed,
            MouseButton::Right => self.held.secondary = pressed,
            _ => return,
        }
        self.drag_anchor = self.position.filter(|_| self.held.any());
    }

    /// Process a `CursorMoved` event, applying any active drag to `camera`.
    pub fn on_cursor_moved(
        &mut self,
        position: Vec2,
        camera: &mut CameraState,
        config: &InputConfig,
    ) {
        if let Some(anchor) = self.drag_anchor {
            let delta = position - anchor;
            match self.held {
                HeldButtons {
                    primary: true,
                    secondary: false,
                } => {
                    camera.pan.x += delta.x * config.pan_rate;
                    camera.pan.y -= delta.y * config.pan_rate;
                }
                HeldButtons {
                    primary: false,
                    secondary: true,
                } => {
                    camera.pitch -= delta.y * config.orbit_rate;
                    camera.yaw += delta.x * config.orbit_rate;
                }
                _ => {}
            }
        }
        if self.held.any() {
            self.drag_anchor = Some(position);
        }
        self.position = Some(position);
    }

    /// Process a `MouseWheel` event over a viewport of `viewport` pixels.
    pub fn on_wheel(
        &mut self,
        delta: MouseScrollDelta,
        viewport: Vec2,
        camera: &mut CameraState,
        config: &InputConfig,
    ) {
        let delta_y = wheel_delta_y(delta, config.wheel_line_pixels);
        if let Some(position) = self.position {
            let toward = cursor_ndc(position, viewport);
            camera.pan.x += toward.x * delta_y * config.wheel_pan_rate;
            camera.pan.y += toward.y * delta_y * config.wheel_pan_rate;
        }
        camera.zoom = config
            .wheel_zoom
            .clamp(camera.zoom - delta_y * config.wheel_zoom_rate);
        tracing::trace!(zoom = camera.zoom, delta_y, "wheel zoom");
    }

    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }
}

/// Convert a winit wheel delta to a DOM-style `deltaY`: positive when
/// scrolling down, measured in pixels.
pub fn wheel_delta_y(delta: MouseScrollDelta, line_pixels: f32) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * line_pixels,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

/// Cursor position in normalized device coordinates, y up.
pub fn cursor_ndc(cursor: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        cursor.x / viewport.x * 2.0 - 1.0,
        -(cursor.y / viewport.y * 2.0 - 1.0),
    )
}
