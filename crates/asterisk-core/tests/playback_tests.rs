// Host tests for the orbit video scheduler and texture cadence.

use asterisk_core::{
    OrbitingVideo, PlayRejection, PlaybackAction, PlaybackCommand, PlaybackState, SchedulerConfig,
    SurfacePose, TextureCadence, VideoPlaybackScheduler,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CAMERA: Vec3 = Vec3::new(0.0, 0.0, 10.0);

fn scheduler(n: usize, stride: u32) -> VideoPlaybackScheduler {
    let config = SchedulerConfig {
        max_active: 3,
        frame_stride: stride,
        ..SchedulerConfig::default()
    };
    VideoPlaybackScheduler::new(config, (0..n).map(|i| format!("/videos/{}.mp4", i)))
}

/// Every surface faces the camera; surface `i` sits `distances[i]` away.
fn facing_poses(distances: &[f32]) -> Vec<SurfacePose> {
    distances
        .iter()
        .map(|d| SurfacePose {
            position: CAMERA - Vec3::Z * *d,
            normal: Vec3::Z,
        })
        .collect()
}

fn playing(s: &VideoPlaybackScheduler) -> Vec<usize> {
    s.videos()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.target_state == PlaybackState::Playing)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn nearest_three_of_eight_play() {
    let mut s = scheduler(8, 1);
    let poses = facing_poses(&[9.0, 4.0, 7.0, 2.0, 8.0, 3.0, 6.0, 5.0]);
    let cmds = s.update(&poses, CAMERA, false);
    assert_eq!(playing(&s), vec![1, 3, 5]);
    assert_eq!(cmds.len(), 3);
    assert!(cmds.iter().all(|c| c.action == PlaybackAction::Play));
}

#[test]
fn facing_outranks_distance() {
    let mut s = scheduler(4, 1);
    let mut poses = facing_poses(&[2.0, 3.0, 8.0, 9.0]);
    // the two nearest turn almost edge-on
    poses[0].normal = Vec3::new(1.0, 0.0, 0.2);
    poses[1].normal = Vec3::new(1.0, 0.0, 0.3);
    s.update(&poses, CAMERA, false);
    assert_eq!(playing(&s), vec![1, 2, 3]);
}

#[test]
fn surfaces_turned_away_never_play() {
    let mut s = scheduler(3, 1);
    let mut poses = facing_poses(&[2.0, 3.0, 4.0]);
    for p in &mut poses {
        p.normal = -Vec3::Z;
    }
    assert!(s.update(&poses, CAMERA, false).is_empty());
    assert_eq!(s.playing_count(), 0);
}

#[test]
fn play_all_ignores_ranking() {
    let mut s = scheduler(8, 1);
    let mut poses = facing_poses(&[1.0; 8]);
    poses[0].normal = -Vec3::Z;
    s.update(&poses, CAMERA, true);
    assert_eq!(s.playing_count(), 8);
}

#[test]
fn manual_pause_is_never_overridden() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut s = scheduler(8, 1);
    s.pause_all();
    for _ in 0..100 {
        let d: Vec<f32> = (0..8).map(|_| rng.gen_range(1.0..20.0)).collect();
        let play_all = rng.gen_bool(0.5);
        let cmds = s.update(&facing_poses(&d), CAMERA, play_all);
        assert!(cmds.iter().all(|c| c.action == PlaybackAction::Pause));
        assert_eq!(s.playing_count(), 0);
    }
    s.resume_all();
    s.update(&facing_poses(&[1.0; 8]), CAMERA, true);
    assert_eq!(s.playing_count(), 8);
}

#[test]
fn suppressed_start_stays_silent_until_resumed() {
    let mut s = scheduler(4, 1);
    s.suppress_all();
    let poses = facing_poses(&[1.0, 2.0, 3.0, 4.0]);
    assert!(s.update(&poses, CAMERA, true).is_empty());
    assert_eq!(s.playing_count(), 0);
    s.resume_all();
    let cmds = s.update(&poses, CAMERA, true);
    assert_eq!(cmds.len(), 4);
    assert!(cmds.iter().all(|c| c.action == PlaybackAction::Play));
}

#[test]
fn commands_only_on_change() {
    let mut s = scheduler(8, 1);
    let poses = facing_poses(&[9.0, 4.0, 7.0, 2.0, 8.0, 3.0, 6.0, 5.0]);
    assert_eq!(s.update(&poses, CAMERA, false).len(), 3);
    assert!(s.update(&poses, CAMERA, false).is_empty());
}

#[test]
fn ranking_runs_on_stride() {
    let mut s = scheduler(4, 2);
    let near_first = facing_poses(&[1.0, 2.0, 3.0, 9.0]);
    let near_last = facing_poses(&[9.0, 2.0, 3.0, 1.0]);
    s.update(&near_first, CAMERA, false);
    assert_eq!(playing(&s), vec![0, 1, 2]);
    // skipped frame
    assert!(s.update(&near_last, CAMERA, false).is_empty());
    let cmds = s.update(&near_last, CAMERA, false);
    assert_eq!(playing(&s), vec![1, 2, 3]);
    assert!(cmds.contains(&PlaybackCommand::pause(0)));
    assert!(cmds.contains(&PlaybackCommand::play(3)));
}

#[test]
fn failed_video_is_skipped() {
    let mut s = scheduler(4, 1);
    let poses = facing_poses(&[1.0, 2.0, 3.0, 4.0]);
    s.update(&poses, CAMERA, false);
    assert_eq!(s.mark_failed(0), vec![PlaybackCommand::pause(0)]);
    s.update(&poses, CAMERA, false);
    assert_eq!(playing(&s), vec![1, 2, 3]);
    assert!(!s.should_retry(0));
}

#[test]
fn hidden_document_pauses_and_restores() {
    let mut s = scheduler(4, 1);
    s.update(&facing_poses(&[1.0, 2.0, 3.0, 4.0]), CAMERA, false);
    let paused = s.suspend_hidden();
    assert_eq!(paused.len(), 3);
    assert!(paused.iter().all(|c| c.action == PlaybackAction::Pause));
    let resumed = s.resume_visible();
    assert_eq!(resumed.len(), 3);
    assert!(resumed.iter().all(|c| c.action == PlaybackAction::Play));
    assert!(s.resume_visible().is_empty());
}

#[test]
fn manual_pause_while_hidden_wins() {
    let mut s = scheduler(2, 1);
    s.update(&facing_poses(&[1.0, 2.0]), CAMERA, true);
    s.suspend_hidden();
    s.pause_all();
    assert!(s.resume_visible().is_empty());
}

#[test]
fn rejected_play_retries_once() {
    let mut s = scheduler(2, 1);
    s.update(&facing_poses(&[1.0, 2.0]), CAMERA, true);
    assert!(!s.play_rejected(0, PlayRejection::Abort));
    assert!(s.play_rejected(0, PlayRejection::Other));
    assert!(s.should_retry(0));
    assert!(!s.play_rejected(0, PlayRejection::Other));
    s.play_succeeded(0);
    assert!(s.play_rejected(0, PlayRejection::Other));
}

#[test]
fn rejection_names() {
    assert_eq!(PlayRejection::from_error_name("AbortError"), PlayRejection::Abort);
    assert_eq!(PlayRejection::from_error_name("NotAllowedError"), PlayRejection::Other);
    assert_eq!(PlayRejection::from_error_name(""), PlayRejection::Other);
}

#[test]
fn texture_cadence_uploads_playing_videos_with_frames() {
    let mut videos: Vec<OrbitingVideo> = (0..4).map(|i| OrbitingVideo::new(i.to_string())).collect();
    videos[0].target_state = PlaybackState::Playing;
    videos[1].target_state = PlaybackState::Playing;
    videos[2].target_state = PlaybackState::Playing;
    let mut cadence = TextureCadence::new(2);
    let has_frame = |i: usize| i != 1;
    assert_eq!(cadence.due(&videos, has_frame), vec![0, 2]);
    assert!(cadence.due(&videos, has_frame).is_empty());
    assert_eq!(cadence.due(&videos, has_frame), vec![0, 2]);
}
