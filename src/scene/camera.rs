//! Camera rotation and the fixed projection.

use glam::{Mat4, Vec3, Vec4};

/// Scene translation applied before the rotations.
const SCENE_OFFSET: Vec3 = Vec3::new(0.0, -0.5, -5.0);

/// Rotation state, advanced once per rendered frame. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub angle_x: f32,
    pub angle_y: f32,
    pub angle_z: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub speed_z: f32,
    /// Pins the Y angle instead of spinning when set.
    pub fixed_angle_y: Option<f32>,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            angle_x: 20.0,
            angle_y: 45.0,
            angle_z: 0.0,
            speed_x: 0.0,
            speed_y: 1.5,
            speed_z: 0.0,
            fixed_angle_y: None,
        }
    }
}

impl CameraState {
    /// Step every axis by its speed, wrapping into `[0, 360)`.
    pub fn advance(&mut self) {
        self.angle_x = wrap_degrees(self.angle_x + self.speed_x);
        self.angle_y = match self.fixed_angle_y {
            Some(fixed) => fixed,
            None => wrap_degrees(self.angle_y + self.speed_y),
        };
        self.angle_z = wrap_degrees(self.angle_z + self.speed_z);
    }

    /// `translate(0, -0.5, -5) · rotX · rotY · rotZ`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(SCENE_OFFSET)
            * Mat4::from_rotation_x(self.angle_x.to_radians())
            * Mat4::from_rotation_y(self.angle_y.to_radians())
            * Mat4::from_rotation_z(self.angle_z.to_radians())
    }
}

fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Right-handed perspective frustum with a `[0, 1]` depth range.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(2.0 * near / (right - left), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near / (top - bottom), 0.0, 0.0),
        Vec4::new(
            (right + left) / (right - left),
            (top + bottom) / (top - bottom),
            far / (near - far),
            -1.0,
        ),
        Vec4::new(0.0, 0.0, -(far * near) / (far - near), 0.0),
    )
}

/// Projection used for the whole session, computed once on start.
pub fn scene_projection() -> Mat4 {
    frustum(-1.0, 1.0, -1.0, 1.0, 1.5, 10.0)
}
