// Host tests for the camera, orbit rig and orbiting rectangle layout.

use asterisk_core::constants::*;
use asterisk_core::{
    asterisk_arms, billboard_rotation, layout_rects, pixel_to_ndc, rect_size, Camera, OrbitConfig,
    OrbitGroup, OrbitRig, RigConfig, VIDEO_ENTRIES,
};
use glam::{Vec2, Vec3};

fn camera() -> Camera {
    Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 16.0 / 9.0)
}

#[test]
fn centre_pixel_ray_is_forward() {
    let cam = camera();
    let ndc = pixel_to_ndc(640.0, 360.0, 1280.0, 720.0);
    assert!(ndc.abs_diff_eq(Vec2::ZERO, 1e-6));
    let (origin, dir) = cam.ray_through_ndc(ndc);
    assert_eq!(origin, cam.eye);
    assert!(dir.abs_diff_eq(cam.forward(), 1e-4));
}

#[test]
fn ndc_corners() {
    assert_eq!(pixel_to_ndc(0.0, 0.0, 100.0, 50.0), Vec2::new(-1.0, 1.0));
    assert_eq!(pixel_to_ndc(100.0, 50.0, 100.0, 50.0), Vec2::new(1.0, -1.0));
}

#[test]
fn orientation_back_axis_points_at_viewer() {
    let cam = camera();
    let q = cam.orientation();
    assert!((q * Vec3::Z).abs_diff_eq(Vec3::Z, 1e-5));
    assert!((q * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-5));

    let top = Camera::looking_at(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, 1.0);
    let q = top.orientation();
    assert!(q.is_finite());
    assert!((q * Vec3::Z).abs_diff_eq(Vec3::Y, 1e-5));
}

#[test]
fn rig_drag_orbits_at_constant_radius() {
    let mut rig = OrbitRig::new(RigConfig::default());
    rig.place_at_distance(4.0);
    rig.begin_drag();
    rig.drag(200.0, 50.0, 800.0);
    for _ in 0..60 {
        rig.update();
        assert!((rig.distance() - 4.0).abs() < 1e-3);
    }
    assert!(rig.eye().x.abs() > 0.1);
    assert!(rig.end_drag().is_some());
    assert!(rig.end_drag().is_none());
}

#[test]
fn rig_ignores_moves_without_drag() {
    let mut rig = OrbitRig::new(RigConfig::default());
    let eye = rig.eye();
    rig.drag(500.0, 500.0, 800.0);
    rig.update();
    assert!(rig.eye().abs_diff_eq(eye, 1e-6));
}

#[test]
fn rig_polar_angle_is_clamped() {
    let mut rig = OrbitRig::new(RigConfig::default());
    rig.begin_drag();
    rig.drag(0.0, -1e6, 100.0);
    for _ in 0..100 {
        rig.update();
    }
    let offset = rig.eye() - rig.target();
    assert!(offset.is_finite());
    assert!(offset.x.abs() + offset.z.abs() > 0.0);
    rig.reset_home();
    assert_eq!(rig.eye(), Vec3::from_array(INITIAL_CAMERA_POS));
}

#[test]
fn rects_share_area_and_sit_on_the_shell() {
    let config = OrbitConfig::default();
    let rects = layout_rects(&VIDEO_ENTRIES, &config);
    assert_eq!(rects.len(), VIDEO_ENTRIES.len());
    let lo = config.radius * config.radial_min - config.jitter / 2.0;
    let hi = config.radius * config.radial_max + config.jitter / 2.0;
    for r in &rects {
        assert!((r.size.x * r.size.y - SURFACE_AREA).abs() < 1e-4);
        assert!((r.size.x / r.size.y - r.entry.aspect).abs() < 1e-4);
        let d = r.local_position.length();
        assert!(d >= lo - 1e-4 && d <= hi + 1e-4, "radius {}", d);
    }
    assert_eq!(rects, layout_rects(&VIDEO_ENTRIES, &config));
    assert!(layout_rects(&[], &config).is_empty());
    assert_eq!(rect_size(1.0, 4.0), Vec2::new(2.0, 2.0));
}

#[test]
fn group_spin_reverses() {
    let mut g = OrbitGroup::new(OrbitConfig::default(), &VIDEO_ENTRIES);
    let start = g.euler();
    g.advance(false);
    assert_ne!(g.euler(), start);
    g.advance(true);
    assert!(g.euler().abs_diff_eq(start, 1e-6));
}

#[test]
fn billboarded_surfaces_face_the_camera() {
    let g = OrbitGroup::new(OrbitConfig::default(), &VIDEO_ENTRIES);
    let cam = camera();
    let bb = billboard_rotation(&cam);
    for pose in g.surface_poses(bb) {
        assert!(pose.normal.dot(-cam.forward()) > 0.999);
    }
    assert_eq!(g.rect_transforms(bb).len(), VIDEO_ENTRIES.len());
    assert_eq!(g.corner_transforms(bb).len(), VIDEO_ENTRIES.len() * 4);
}

#[test]
fn pick_hits_a_rect_through_its_centre() {
    let g = OrbitGroup::new(OrbitConfig::default(), &VIDEO_ENTRIES);
    let cam = camera();
    let bb = billboard_rotation(&cam);
    let positions: Vec<Vec3> = g.world_positions().collect();
    for p in &positions {
        let dir = (*p - cam.eye).normalize();
        let hit = g.pick(cam.eye, dir, bb).expect("ray through a centre must hit");
        // anything hit first is at least as close along the view axis
        assert!(positions[hit].z >= p.z - 1e-4);
        assert!(g.page_of(hit).is_some());
    }
    assert_eq!(g.pick(cam.eye, Vec3::Z, bb), None);
    assert_eq!(g.pick(cam.eye, Vec3::X, bb), None);
}

#[test]
fn asterisk_has_evenly_turned_arms() {
    let arms = asterisk_arms(ASTERISK_SIZE, ASTERISK_ARMS);
    assert_eq!(arms.len(), ASTERISK_ARMS);
    let tip = arms[0].transform_point3(Vec3::new(0.5, 0.0, 0.0));
    assert!((tip.x - ASTERISK_SIZE * ARM_LENGTH / 2.0).abs() < 1e-5);
    let turned = arms[3].transform_point3(Vec3::new(0.5, 0.0, 0.0));
    assert!(turned.abs_diff_eq(-tip, 1e-5));
}
