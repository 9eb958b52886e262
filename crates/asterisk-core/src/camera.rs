//! Camera description and the orbit rig the pointer drives.
//!
//! The rig only rotates around its target; distance is owned by the zoom
//! controller, which repositions the eye along the rig's current direction.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use crate::constants::*;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn looking_at(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            aspect: aspect.max(1e-3),
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// World rotation of the camera: +X right, +Y up, +Z back toward the viewer.
    /// Falls back to world Z as up when looking straight along Y.
    pub fn orientation(&self) -> Quat {
        let forward = self.forward();
        if forward == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        let back = -forward;
        let mut right = self.up.cross(back);
        if right.length_squared() < 1e-8 {
            right = Vec3::Z.cross(back);
        }
        let right = right.normalize();
        let up = back.cross(right).normalize();
        Quat::from_mat3(&glam::Mat3::from_cols(right, up, back))
    }

    /// World-space ray through a point in normalised device coordinates.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let inv = self.view_projection().inverse();
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far: Vec3 = far.truncate() / far.w;
        (self.eye, (far - self.eye).normalize_or_zero())
    }
}

/// Pixel position to NDC for a viewport of `width` x `height`.
#[inline]
pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((2.0 * x / w) - 1.0, 1.0 - (2.0 * y / h))
}

#[derive(Clone, Debug, PartialEq)]
pub struct RigConfig {
    pub damping: f32,
    pub rotate_speed: f32,
    pub polar_epsilon: f32,
    pub home_eye: Vec3,
    pub home_target: Vec3,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            damping: ORBIT_DAMPING,
            rotate_speed: ORBIT_ROTATE_SPEED,
            polar_epsilon: ORBIT_POLAR_EPSILON,
            home_eye: Vec3::from_array(INITIAL_CAMERA_POS),
            home_target: Vec3::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureSignal {
    Start,
    End,
}

/// Damped orbit around a fixed target.
#[derive(Clone, Debug)]
pub struct OrbitRig {
    config: RigConfig,
    eye: Vec3,
    target: Vec3,
    // pending spherical deltas, released a fraction per update
    yaw_delta: f32,
    pitch_delta: f32,
    dragging: bool,
}

impl OrbitRig {
    pub fn new(config: RigConfig) -> Self {
        let eye = config.home_eye;
        let target = config.home_target;
        Self {
            config,
            eye,
            target,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            dragging: false,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    pub fn begin_drag(&mut self) -> GestureSignal {
        self.dragging = true;
        GestureSignal::Start
    }

    /// Pointer travel in CSS pixels; a drag across the full viewport height
    /// turns the camera by one revolution.
    pub fn drag(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.dragging {
            return;
        }
        let h = viewport_height.max(1.0);
        let k = std::f32::consts::TAU * self.config.rotate_speed / h;
        self.yaw_delta -= dx * k;
        self.pitch_delta -= dy * k;
    }

    pub fn end_drag(&mut self) -> Option<GestureSignal> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        Some(GestureSignal::End)
    }

    /// Release part of the pending rotation and decay the rest.
    pub fn update(&mut self) {
        let d = self.config.damping;
        let offset = self.eye - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        theta += self.yaw_delta * d;
        phi += self.pitch_delta * d;
        let eps = self.config.polar_epsilon;
        phi = phi.clamp(eps, std::f32::consts::PI - eps);
        self.eye = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        self.yaw_delta *= 1.0 - d;
        self.pitch_delta *= 1.0 - d;
    }

    /// Put the eye `distance` away from the target along its current direction.
    pub fn place_at_distance(&mut self, distance: f32) {
        let dir = (self.eye - self.target).normalize_or(Vec3::Z);
        self.eye = self.target + dir * distance;
    }

    /// Back to the home pose, dropping any pending spin.
    pub fn reset_home(&mut self) {
        self.eye = self.config.home_eye;
        self.target = self.config.home_target;
        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera::looking_at(self.eye, self.target, aspect)
    }
}
