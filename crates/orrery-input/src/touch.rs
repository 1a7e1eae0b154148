//! Touch gestures: one finger orbits, two fingers pinch-zoom.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use glam::Vec2;
use orrery_config::InputConfig;
use winit::event::TouchPhase;

use crate::camera::CameraState;

/// Tracks active touch points between winit `Touch` events.
///
/// After a pinch ends, or every finger lifts, single-finger drags are
/// ignored until the debounce window passes so the finger left on the glass
/// does not spin the camera. A fresh single-finger touch lifts the block.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    active: BTreeMap<u64, Vec2>,
    drag_anchor: Option<Vec2>,
    pinch_distance: Option<f32>,
    blocked_until: Option<Instant>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        position: Vec2,
        now: Instant,
        camera: &mut CameraState,
        config: &InputConfig,
    ) {
        match phase {
            TouchPhase::Started => self.on_started(id, position),
            TouchPhase::Moved => self.on_moved(id, position, now, camera, config),
            TouchPhase::Ended | TouchPhase::Cancelled => self.on_ended(id, now, config),
        }
    }

    fn on_started(&mut self, id: u64, position: Vec2) {
        self.active.insert(id, position);
        match self.active.len() {
            1 => {
                self.drag_anchor = Some(position);
                self.blocked_until = None;
            }
            2 => {
                self.drag_anchor = None;
                self.pinch_distance = self.two_finger_distance();
            }
            _ => {
                self.drag_anchor = None;
                self.pinch_distance = None;
            }
        }
    }

    fn on_moved(
        &mut self,
        id: u64,
        position: Vec2,
        now: Instant,
        camera: &mut CameraState,
        config: &InputConfig,
    ) {
        let Some(point) = self.active.get_mut(&id) else {
            return;
        };
        *point = position;

        match self.active.len() {
            1 => {
                let anchor = self.drag_anchor.filter(|_| !self.is_blocked(now));
                if let Some(anchor) = anchor {
                    let delta = position - anchor;
                    camera.pitch += delta.y * config.touch_orbit_rate;
                    camera.yaw += delta.x * config.touch_orbit_rate;
                }
                self.drag_anchor = Some(position);
            }
            2 => {
                let Some(distance) = self.two_finger_distance() else {
                    return;
                };
                if let Some(previous) = self.pinch_distance {
                    camera.zoom = config
                        .pinch_zoom
                        .clamp(camera.zoom - (previous - distance) * config.pinch_zoom_rate);
                    tracing::trace!(zoom = camera.zoom, distance, "pinch zoom");
                }
                self.pinch_distance = Some(distance);
            }
            _ => {}
        }
    }

    fn on_ended(&mut self, id: u64, now: Instant, config: &InputConfig) {
        let before = self.active.len();
        if self.active.remove(&id).is_none() {
            return;
        }
        let after = self.active.len();

        if (before >= 2 && after < 2) || after == 0 {
            self.blocked_until = Some(now + Duration::from_millis(config.touch_debounce_ms));
        }
        // A new finger pair starts a new pinch.
        self.pinch_distance = if after == 2 {
            self.two_finger_distance()
        } else {
            None
        };
        self.drag_anchor = if after == 1 {
            self.active.values().next().copied()
        } else {
            None
        };
    }

    fn two_finger_distance(&self) -> Option<f32> {
        let mut points = self.active.values();
        let a = points.next()?;
        let b = points.next()?;
        Some(a.distance(*b))
    }

    /// Whether single-finger drags are currently ignored.
    pub fn is_blocked(&self, now: Instant) -> bool {
        self.blocked_until.is_some_and(|until| now < until)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
