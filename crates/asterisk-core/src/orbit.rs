//! Scene geometry: the orbiting video rectangles and the asterisk.
//!
//! Rectangles sit on a jittered Fibonacci sphere inside a group that slowly
//! tumbles. Each frame every rectangle is turned to face the camera plane,
//! so its world normal is the camera's backward axis.

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::camera::Camera;
use crate::constants::*;
use crate::playback::SurfacePose;

/// A preview clip and the case-study page it opens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoEntry {
    pub source: &'static str,
    pub page: u32,
    /// Width over height.
    pub aspect: f32,
}

pub const VIDEO_ENTRIES: [VideoEntry; 8] = [
    VideoEntry { source: "public/videoSmallLoad/ton1.mp4", page: 1, aspect: 1.0 },
    VideoEntry { source: "public/videoSmallLoad/wdtw1.mp4", page: 2, aspect: 16.0 / 9.0 },
    VideoEntry { source: "public/videoSmallLoad/wdtw2.mp4", page: 2, aspect: 16.0 / 9.0 },
    VideoEntry { source: "public/videoSmallLoad/nacht.mp4", page: 4, aspect: 16.0 / 9.0 },
    VideoEntry {
        source: "public/videoSmallLoad/extra%201%20%281240x1536%29.mp4",
        page: 5,
        aspect: 2.0 / 3.0,
    },
    VideoEntry { source: "public/videoSmallLoad/ton2.mp4", page: 1, aspect: 9.0 / 16.0 },
    VideoEntry { source: "public/videoSmallLoad/extra2.mp4", page: 6, aspect: 1.0 },
    VideoEntry {
        source: "public/videoSmallLoad/extra%204%20%281080x1080%29.mp4",
        page: 8,
        aspect: 1.0,
    },
];

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitConfig {
    pub radius: f32,
    pub surface_area: f32,
    pub radial_min: f32,
    pub radial_max: f32,
    pub jitter: f32,
    pub seed: u64,
    pub spin: Vec2,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: ORBIT_RADIUS,
            surface_area: SURFACE_AREA,
            radial_min: RADIAL_MIN,
            radial_max: RADIAL_MAX,
            jitter: RADIAL_JITTER,
            seed: SCENE_SEED,
            spin: Vec2::new(GROUP_SPIN_X, GROUP_SPIN_Y),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitRect {
    pub entry: VideoEntry,
    /// Position inside the rotating group.
    pub local_position: Vec3,
    pub size: Vec2,
}

/// Width and height with constant area for a given aspect.
#[inline]
pub fn rect_size(aspect: f32, area: f32) -> Vec2 {
    let aspect = aspect.max(1e-3);
    Vec2::new((area * aspect).sqrt(), (area / aspect).sqrt())
}

/// Lay the entries out on a Fibonacci sphere; the radius grows with the index
/// and gets a seeded jitter so the shell is not perfectly round.
pub fn layout_rects(entries: &[VideoEntry], config: &OrbitConfig) -> Vec<OrbitRect> {
    let n = entries.len();
    if n == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(config.seed);
    let min_r = config.radius * config.radial_min;
    let max_r = config.radius * config.radial_max;
    let golden = std::f32::consts::PI * (1.0 + 5f32.sqrt());

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let t = i as f32 / n as f32;
            let inclination = (1.0 - 2.0 * t).clamp(-1.0, 1.0).acos();
            let azimuth = golden * i as f32;
            let jitter = (rng.gen::<f32>() - 0.5) * config.jitter;
            let r = min_r + (max_r - min_r) * t + jitter;
            OrbitRect {
                entry: *entry,
                local_position: Vec3::new(
                    r * inclination.sin() * azimuth.cos(),
                    r * inclination.cos(),
                    r * inclination.sin() * azimuth.sin(),
                ),
                size: rect_size(entry.aspect, config.surface_area),
            }
        })
        .collect()
}

/// The tumbling parent of all rectangles.
#[derive(Clone, Debug)]
pub struct OrbitGroup {
    config: OrbitConfig,
    rects: Vec<OrbitRect>,
    /// Euler angles, XYZ order.
    rotation: Vec3,
}

impl OrbitGroup {
    pub fn new(config: OrbitConfig, entries: &[VideoEntry]) -> Self {
        let rects = layout_rects(entries, &config);
        Self {
            config,
            rects,
            rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_8, 0.0),
        }
    }

    pub fn rects(&self) -> &[OrbitRect] {
        &self.rects
    }

    pub fn euler(&self) -> Vec3 {
        self.rotation
    }

    /// One frame of spin; `opposite` runs it backwards.
    pub fn advance(&mut self, opposite: bool) {
        let dir = if opposite { -1.0 } else { 1.0 };
        self.rotation.x += dir * self.config.spin.x;
        self.rotation.y += dir * self.config.spin.y;
    }

    pub fn rotation(&self) -> Quat {
        euler_xyz(self.rotation)
    }

    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        let q = self.rotation();
        self.rects.iter().map(move |r| q * r.local_position)
    }

    /// Poses for the playback scheduler given this frame's billboard.
    pub fn surface_poses(&self, billboard: Quat) -> Vec<SurfacePose> {
        let normal = billboard * Vec3::Z;
        self.world_positions()
            .map(|position| SurfacePose { position, normal })
            .collect()
    }

    /// Model matrix of each rectangle for a unit quad scaled to its size.
    pub fn rect_transforms(&self, billboard: Quat) -> Vec<Mat4> {
        self.world_positions()
            .zip(&self.rects)
            .map(|(p, r)| {
                Mat4::from_scale_rotation_translation(r.size.extend(1.0), billboard, p)
            })
            .collect()
    }

    /// Model matrices of the four red corner squares of every rectangle.
    pub fn corner_transforms(&self, billboard: Quat) -> Vec<Mat4> {
        let mut out = Vec::with_capacity(self.rects.len() * 4);
        for (p, r) in self.world_positions().zip(&self.rects) {
            for offset in corner_offsets(r.size) {
                out.push(Mat4::from_scale_rotation_translation(
                    Vec3::new(CORNER_SQUARE, CORNER_SQUARE, 1.0),
                    billboard,
                    p + billboard * offset,
                ));
            }
        }
        out
    }

    /// Nearest rectangle the ray passes through, by index.
    pub fn pick(&self, origin: Vec3, dir: Vec3, billboard: Quat) -> Option<usize> {
        let normal = billboard * Vec3::Z;
        let right = billboard * Vec3::X;
        let up = billboard * Vec3::Y;
        let denom = dir.dot(normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        let mut best: Option<(usize, f32)> = None;
        for (i, (p, r)) in self.world_positions().zip(&self.rects).enumerate() {
            let t = (p - origin).dot(normal) / denom;
            if t <= 0.0 {
                continue;
            }
            let local = origin + dir * t - p;
            let half = r.size * 0.5;
            if local.dot(right).abs() > half.x || local.dot(up).abs() > half.y {
                continue;
            }
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((i, t));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn page_of(&self, index: usize) -> Option<u32> {
        self.rects.get(index).map(|r| r.entry.page)
    }
}

/// Three.js-style XYZ Euler rotation.
#[inline]
pub fn euler_xyz(e: Vec3) -> Quat {
    Quat::from_rotation_x(e.x) * Quat::from_rotation_y(e.y) * Quat::from_rotation_z(e.z)
}

/// World rotation that lays a quad flat in the camera plane, facing the viewer.
pub fn billboard_rotation(camera: &Camera) -> Quat {
    camera.orientation()
}

/// Corner square centres relative to a rectangle, nudged toward the viewer.
pub fn corner_offsets(size: Vec2) -> [Vec3; 4] {
    let hx = size.x * 0.5;
    let hy = size.y * 0.5;
    [
        Vec3::new(-hx, hy, CORNER_Z),
        Vec3::new(hx, hy, CORNER_Z),
        Vec3::new(-hx, -hy, CORNER_Z),
        Vec3::new(hx, -hy, CORNER_Z),
    ]
}

/// Model matrices of the asterisk's arms for a unit cube, before the
/// asterisk's own rotation.
pub fn asterisk_arms(size: f32, arms: usize) -> Vec<Mat4> {
    let scale = Vec3::new(size * ARM_LENGTH, size * ARM_WIDTH, size * ARM_DEPTH);
    (0..arms)
        .map(|i| {
            let angle = std::f32::consts::PI / 3.0 * i as f32;
            Mat4::from_quat(Quat::from_rotation_z(angle)) * Mat4::from_scale(scale)
        })
        .collect()
}
