//! Scroll-to-distance camera mapping with the orbit-gesture zoom override,
//! and the asterisk's turn toward the camera.

use glam::{Vec2, Vec3};

use crate::constants::*;
use crate::easing::lerp_f32;

#[derive(Clone, Debug, PartialEq)]
pub struct ZoomConfig {
    pub min_z: f32,
    pub max_z: f32,
    pub out_factor: f32,
    pub lerp: f32,
    pub epsilon: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_z: MIN_CAMERA_Z,
            max_z: MAX_CAMERA_Z,
            out_factor: ZOOM_OUT_FACTOR,
            lerp: ZOOM_LERP,
            epsilon: ZOOM_EPSILON,
        }
    }
}

/// Camera distance from zoom progress, with a temporary override while the
/// user orbits: the camera pulls back during the drag and returns after it.
#[derive(Clone, Debug)]
pub struct ZoomCameraController {
    config: ZoomConfig,
    rotating: bool,
    disabled: bool,
    pre_rotate: Option<f32>,
    target_zoom: Option<f32>,
    current_zoom: Option<f32>,
}

impl ZoomCameraController {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            rotating: false,
            disabled: false,
            pre_rotate: None,
            target_zoom: None,
            current_zoom: None,
        }
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    #[inline]
    pub fn distance_for(&self, zoom_progress: f32) -> f32 {
        lerp_f32(self.config.min_z, self.config.max_z, zoom_progress.clamp(0.0, 1.0))
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn target_zoom(&self) -> Option<f32> {
        self.target_zoom
    }

    pub fn has_override(&self) -> bool {
        self.target_zoom.is_some()
    }

    fn clear(&mut self) {
        self.rotating = false;
        self.target_zoom = None;
        self.current_zoom = None;
    }

    /// Mobile portrait turns the override off entirely.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.clear();
        }
    }

    /// The debounced gesture start fired.
    pub fn begin_rotation(&mut self, current_distance: f32) {
        if self.disabled {
            self.clear();
            return;
        }
        if self.rotating {
            return;
        }
        self.rotating = true;
        self.pre_rotate = Some(current_distance);
        self.target_zoom = Some(current_distance * self.config.out_factor);
    }

    /// Gesture released. Returns true when the asterisk should reorient.
    pub fn end_rotation(&mut self) -> bool {
        if self.disabled {
            self.clear();
            return false;
        }
        if !self.rotating {
            return false;
        }
        self.rotating = false;
        self.target_zoom = self.pre_rotate;
        true
    }

    /// Distance to place the camera at this frame.
    pub fn step(&mut self, zoom_progress: f32, dt: f32) -> f32 {
        let z = self.distance_for(zoom_progress);
        let Some(target) = self.target_zoom else {
            self.current_zoom = None;
            return z;
        };
        let mut current = self.current_zoom.unwrap_or(z);
        current += (target - current) * self.config.lerp * dt;
        if (current - target).abs() < self.config.epsilon {
            current = target;
            if !self.rotating {
                self.target_zoom = None;
                self.current_zoom = None;
                return current;
            }
        }
        self.current_zoom = Some(current);
        current
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrienterConfig {
    pub progress_limit: f32,
    pub lerp: f32,
    pub epsilon: f32,
    pub spin: Vec2,
}

impl Default for OrienterConfig {
    fn default() -> Self {
        Self {
            progress_limit: ORIENT_PROGRESS,
            lerp: ORIENT_LERP,
            epsilon: ORIENT_EPSILON,
            spin: Vec2::new(ASTERISK_SPIN_X, ASTERISK_SPIN_Y),
        }
    }
}

/// Keeps the asterisk turned toward the camera when the camera is close or
/// a gesture just ended, and lets it spin otherwise.
#[derive(Clone, Debug)]
pub struct AsteriskOrienter {
    config: OrienterConfig,
    /// Euler x, y.
    rotation: Vec2,
    armed: bool,
}

impl AsteriskOrienter {
    pub fn new(config: OrienterConfig) -> Self {
        Self {
            config,
            rotation: Vec2::ZERO,
            armed: false,
        }
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// One-shot reorientation after a gesture.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Angles that point the asterisk's +Z at the camera.
    pub fn facing_angles(asterisk: Vec3, camera: Vec3) -> Vec2 {
        let dir = (camera - asterisk).normalize_or(Vec3::Z);
        Vec2::new((-dir.y).clamp(-1.0, 1.0).asin(), dir.x.atan2(dir.z))
    }

    pub fn step(&mut self, zoom_progress: f32, asterisk: Vec3, camera: Vec3) -> Vec2 {
        let orient = zoom_progress < self.config.progress_limit || self.armed;
        if !orient {
            self.rotation += self.config.spin;
            return self.rotation;
        }
        let target = Self::facing_angles(asterisk, camera);
        self.rotation += (target - self.rotation) * self.config.lerp;
        if self.armed {
            let d = (self.rotation - target).abs();
            if d.x < self.config.epsilon && d.y < self.config.epsilon {
                self.rotation = target;
                self.armed = false;
            }
        }
        self.rotation
    }
}
