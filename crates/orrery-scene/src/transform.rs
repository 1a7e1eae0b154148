//! Model-view composition for the camera and every body.

use glam::{Mat4, Vec3};
use orrery_input::CameraState;

use crate::body::Orbit;

/// Mirrors Z. Applied once in the camera frame and again for the starfield.
const FLIP_Z: Vec3 = Vec3::new(1.0, 1.0, -1.0);

/// View matrix for the current pan, zoom and orbit angles.
///
/// Translation comes first so pan and zoom move the whole scene, then a
/// half-turn about X and a Z mirror put the ecliptic right side up, then
/// pitch and yaw spin the scene about its center.
pub fn camera_matrix(camera: &CameraState) -> Mat4 {
    Mat4::from_translation(Vec3::new(
        camera.pan.x,
        camera.pan.y,
        camera.zoom + camera.pan.z,
    )) * Mat4::from_rotation_x(std::f32::consts::PI)
        * Mat4::from_scale(FLIP_Z)
        * Mat4::from_rotation_x(camera.pitch)
        * Mat4::from_rotation_y(camera.yaw)
}

/// The starfield sits inside-out around the camera frame.
pub fn backdrop_matrix(camera: Mat4) -> Mat4 {
    camera * Mat4::from_scale(FLIP_Z)
}

/// A body on `orbit` around the frame `parent`.
pub fn orbit_matrix(parent: Mat4, orbit: &Orbit) -> Mat4 {
    parent * Mat4::from_rotation_y(orbit.angle) * Mat4::from_translation(Vec3::X * orbit.distance)
}

/// Right-handed perspective projection with a `[0, 1]` depth range.
pub fn projection_matrix(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_default_camera_looks_down_z() {
        let camera = camera_matrix(&CameraState::default());
        // Rx(pi) then mirror Z: y flips, z is unchanged, then translate by zoom.
        assert_vec3_near(camera.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -3.0));
        assert_vec3_near(
            camera.transform_point3(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, -2.0, 0.0),
        );
    }

    #[test]
    fn test_pan_offsets_translation() {
        let mut state = CameraState::default();
        state.pan = Vec3::new(1.0, -2.0, 0.5);
        state.zoom = -20.0;
        let camera = camera_matrix(&state);
        assert_eq!(camera.w_axis, Vec4::new(1.0, -2.0, -19.5, 1.0));
    }

    #[test]
    fn test_backdrop_mirrors_z() {
        let camera = camera_matrix(&CameraState::default());
        let stars = backdrop_matrix(camera);
        let p = Vec3::new(0.0, 0.0, 5.0);
        assert_vec3_near(stars.transform_point3(p), camera.transform_point3(-p));
    }

    #[test]
    fn test_orbit_at_zero_angle_is_on_x() {
        let orbit = Orbit::new(9.5, 1.0);
        let m = orbit_matrix(Mat4::IDENTITY, &orbit);
        assert_vec3_near(m.transform_point3(Vec3::ZERO), Vec3::new(9.5, 0.0, 0.0));
    }

    #[test]
    fn test_quarter_orbit_moves_to_negative_z() {
        let mut orbit = Orbit::new(2.0, 1.0);
        orbit.angle = std::f32::consts::FRAC_PI_2;
        let m = orbit_matrix(Mat4::IDENTITY, &orbit);
        assert_vec3_near(m.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_projection_depth_range() {
        let proj = projection_matrix(45.0, 1.0, 0.1, 200.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -200.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
