//! Camera input: mouse drag and wheel, touch gestures, and the pause key.

pub mod camera;
pub mod controller;
pub mod keyboard;
pub mod mouse;
pub mod touch;

pub use camera::{CameraState, DEFAULT_ZOOM};
pub use controller::CameraController;
pub use keyboard::{PAUSE_KEYS, RawKeyEvent, is_pause_toggle};
pub use mouse::{MouseState, cursor_ndc, wheel_delta_y};
pub use touch::TouchTracker;
