//! Interactive camera parameters.

use glam::Vec3;

/// Zoom the camera starts at: just outside the earth's orbit center.
pub const DEFAULT_ZOOM: f32 = -3.0;

/// Pan, zoom and orbit angles driven by mouse and touch input.
///
/// `zoom` is a signed distance along the view axis; more negative values
/// are farther away. `pitch` and `yaw` are radians about X and Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub pan: Vec3,
    pub zoom: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::with_zoom(DEFAULT_ZOOM)
    }
}

impl CameraState {
    pub fn with_zoom(zoom: f32) -> Self {
        Self {
            pan: Vec3::ZERO,
            zoom,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// True once the camera is farther out than `threshold`.
    pub fn is_zoomed_out(&self, threshold: f32) -> bool {
        self.zoom < threshold
    }
}
