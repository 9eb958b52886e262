// Host tests for the director: event routing, deferred work and frame output.

use asterisk_core::constants::*;
use asterisk_core::{
    Command, Director, DirectorConfig, EntryMode, Event, FrameOutput, Key, PlayRejection,
    PlaybackAction, PlaybackCommand, Viewport, VIDEO_ENTRIES,
};
use glam::Vec2;

fn desktop() -> Viewport {
    Viewport::new(1280.0, 800.0, false)
}

fn director(config: DirectorConfig, entry: EntryMode) -> Director {
    Director::new(config, entry, desktop(), 0.0)
}

/// Runs `count` frames at the nominal frame period starting at `from`.
/// Returns every command emitted and the time after the last frame.
fn run_frames(d: &mut Director, from: f64, count: usize) -> (Vec<Command>, f64) {
    let mut commands = Vec::new();
    let mut now = from;
    for _ in 0..count {
        let out = d.frame(now, |_| false);
        commands.extend(out.commands);
        now += FRAME_MS;
    }
    (commands, now)
}

fn key(k: Key) -> Event {
    Event::Key {
        key: k,
        gallery_scroll_top: 0.0,
    }
}

fn wheel(delta_y: f64, gallery_scroll_top: f64) -> Event {
    Event::Wheel {
        delta_y,
        gallery_scroll_top,
    }
}

fn video_actions(commands: &[Command], action: PlaybackAction) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, Command::Video(v) if v.action == action))
        .count()
}

#[test]
fn intro_page_starts_with_overlay_shown() {
    let mut d = director(DirectorConfig::with_intro(), EntryMode::Fresh);
    assert!(d.overlay().is_shown());
    assert_eq!(d.scroll().accumulator(), 0.0);

    let cmds = d.initial_commands();
    assert_eq!(cmds[0], Command::ShowOverlay);
    assert_eq!(cmds[1], Command::PlayIntro { resume: false });
    assert!(cmds.contains(&Command::RotationToggled { enabled: true }));
    assert!(cmds.contains(&Command::SetCtaVisible(false)));
    assert!(cmds.iter().any(|c| matches!(c, Command::GalleryFrame(_))));
}

#[test]
fn page_without_intro_hides_overlay_and_schedules_entry_scroll() {
    let mut d = director(DirectorConfig::default(), EntryMode::Fresh);
    assert!(!d.overlay().is_shown());
    assert_eq!(d.scroll().accumulator(), INITIAL_SCROLL);
    assert_eq!(d.pending_tasks(), 1);

    let cmds = d.initial_commands();
    assert_eq!(cmds[0], Command::HideOverlay);
    assert_eq!(cmds[1], Command::PauseIntro);

    let (_, now) = run_frames(&mut d, 0.0, 10);
    assert!(now > ENTRY_DELAY_MS);
    assert!(d.scroll().tween().is_some());
    assert_eq!(d.pending_tasks(), 0);

    // let the eased auto-scroll finish
    run_frames(&mut d, now, 260);
    let expected = d.scroll().config().position_for_zoom_fraction(ENTRY_FRACTION);
    assert!((d.scroll().accumulator() - expected).abs() < 1e-6);
    assert!(!d.overlay().is_shown());
}

#[test]
fn from_nav_entry_skips_intro_and_starts_zoomed_in() {
    let mut d = director(DirectorConfig::with_intro(), EntryMode::FromNav);
    assert!(!d.overlay().is_shown());
    let expected = d.scroll().config().position_for_zoom_fraction(FROM_NAV_FRACTION);
    assert_eq!(d.scroll().accumulator(), expected);
    assert_eq!(d.pending_tasks(), 0);
    assert!(!d.is_mobile_zoom_locked());

    let mobile = Director::new(
        DirectorConfig::default(),
        EntryMode::FromNav,
        Viewport::new(390.0, 844.0, true),
        0.0,
    );
    assert!(mobile.is_mobile_portrait());
    assert!(mobile.is_mobile_zoom_locked());
}

#[test]
fn wheel_while_intro_plays_skips_it() {
    let mut d = director(DirectorConfig::with_intro(), EntryMode::Fresh);
    d.handle(Event::IntroPlaying, 0.0);

    let out = d.handle(wheel(30.0, 0.0), 10.0);
    assert!(out.prevent_default);
    assert_eq!(out.commands, vec![Command::HideOverlay, Command::PauseIntro]);
    assert!(!d.overlay().is_shown());
    assert_eq!(
        d.scroll().target(),
        MAX_OVERLAY_SCROLL * SKIP_NUDGE_FRACTION
    );
}

#[test]
fn skip_is_a_no_op_once_hidden() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    let out = d.handle(Event::SkipIntro, 0.0);
    assert!(out.commands.is_empty());
}

#[test]
fn intro_end_raises_floor_and_auto_scrolls_without_reshowing() {
    let mut d = director(DirectorConfig::with_intro(), EntryMode::Fresh);
    let out = d.handle(Event::IntroEnded, 0.0);
    assert_eq!(
        out.commands,
        vec![Command::EndIntro, Command::HideOverlay, Command::PauseIntro]
    );
    let floor = OVERLAY_SHOW_THRESHOLD * MAX_OVERLAY_SCROLL + POST_END_EPSILON;
    assert!(d.scroll().accumulator() >= floor);

    let (cmds, _) = run_frames(&mut d, 0.0, 250);
    assert!(!cmds.contains(&Command::ShowOverlay));
    assert!(!d.overlay().is_shown());
    let expected = d.scroll().config().position_for_zoom_fraction(POST_END_FRACTION);
    assert!((d.scroll().accumulator() - expected).abs() < 1e-6);
}

#[test]
fn double_tap_ends_intro_single_tap_does_not() {
    let mut d = director(DirectorConfig::with_intro(), EntryMode::Fresh);
    let pos = Some(Vec2::new(100.0, 100.0));

    let first = d.handle(Event::IntroTap { pos }, 0.0);
    assert!(first.commands.is_empty());
    assert!(!first.prevent_default);
    assert!(d.overlay().is_shown());

    let second = d.handle(Event::IntroTap { pos }, 200.0);
    assert!(second.prevent_default);
    assert_eq!(second.commands.first(), Some(&Command::EndIntro));
    assert!(!d.overlay().is_shown());
}

#[test]
fn backward_input_at_lower_rest_fades_then_navigates_once() {
    let mut d = director(DirectorConfig::default(), EntryMode::Fresh);
    assert!(d.scroll().at_lower_rest());

    let out = d.handle(wheel(-10.0, 0.0), 0.0);
    assert_eq!(out.commands, vec![Command::FadeOut]);
    assert!(d.is_navigating());

    let again = d.handle(wheel(-10.0, 0.0), 5.0);
    assert!(again.commands.is_empty());

    let (cmds, _) = run_frames(&mut d, 0.0, 30);
    let navigations: Vec<_> = cmds
        .iter()
        .filter(|c| matches!(c, Command::Navigate { .. }))
        .collect();
    assert_eq!(
        navigations,
        vec![&Command::Navigate {
            url: NAVIGATE_BACK_URL.to_string()
        }]
    );
}

#[test]
fn forward_input_at_lower_rest_nudges_the_target() {
    let mut d = director(DirectorConfig::default(), EntryMode::Fresh);
    let out = d.handle(wheel(10.0, 0.0), 0.0);
    assert!(out.prevent_default);
    assert!(out.commands.is_empty());
    assert_eq!(d.scroll().target(), INITIAL_SCROLL + SCROLL_NUDGE);
}

#[test]
fn open_gallery_takes_wheel_input_and_pulls_back_at_top() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.handle(Event::OpenGallery, 0.0);
    let (cmds, _) = run_frames(&mut d, 0.0, 120);
    assert!(cmds.contains(&Command::GalleryStateChanged { open: true }));
    assert_eq!(d.reveal().progress(), 1.0);
    assert!(d.is_heavy_paused());

    let down = d.handle(wheel(50.0, 10.0), 0.0);
    assert_eq!(down.commands, vec![Command::ScrollGallery { by: 50.0 }]);

    // list not at its top: the panel stays put
    let up_mid_list = d.handle(wheel(-50.0, 30.0), 0.0);
    assert_eq!(up_mid_list.commands, vec![Command::ScrollGallery { by: -50.0 }]);
    assert_eq!(d.reveal().progress_target(), 1.0);

    let up_at_top = d.handle(wheel(-50.0, 0.0), 0.0);
    assert_eq!(up_at_top.commands, vec![Command::ScrollGallery { by: -50.0 }]);
    assert_eq!(d.reveal().progress_target(), 0.0);
}

#[test]
fn gallery_close_resumes_heavy_media() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.handle(Event::OpenGallery, 0.0);
    let (_, now) = run_frames(&mut d, 0.0, 120);
    assert!(d.is_heavy_paused());

    d.handle(Event::CloseGallery, now);
    let (cmds, _) = run_frames(&mut d, now, 120);
    assert!(cmds.contains(&Command::GalleryStateChanged { open: false }));
    assert!(d.reveal().is_closed());
    assert!(!d.is_heavy_paused());
}

#[test]
fn escape_closes_the_innermost_layer_first() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.handle(Event::OpenGallery, 0.0);
    d.handle(Event::CardExpanded(true), 0.0);
    d.handle(Event::CaseViewer(true), 0.0);

    let out = d.handle(key(Key::Escape), 0.0);
    assert!(out.prevent_default);
    assert_eq!(out.commands, vec![Command::CloseCaseViewer]);

    d.handle(Event::CaseViewer(false), 0.0);
    let out = d.handle(key(Key::Escape), 0.0);
    assert_eq!(out.commands, vec![Command::CollapseExpanded]);

    d.handle(Event::CardExpanded(false), 0.0);
    let out = d.handle(key(Key::Escape), 0.0);
    assert!(out.prevent_default);
    assert!(out.commands.is_empty());
    assert_eq!(d.reveal().progress_target(), 0.0);

    let out = d.handle(key(Key::Escape), 0.0);
    assert!(!out.prevent_default);
}

#[test]
fn case_viewer_swallows_scroll_input() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.handle(Event::CaseViewer(true), 0.0);
    let target = d.scroll().target();

    assert!(!d.handle(wheel(40.0, 0.0), 0.0).prevent_default);
    assert!(!d.handle(key(Key::ArrowDown), 0.0).prevent_default);
    assert_eq!(d.scroll().target(), target);
}

#[test]
fn space_and_toggle_flip_rotation() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    let out = d.handle(key(Key::Space), 0.0);
    assert!(out.prevent_default);
    assert_eq!(
        out.commands,
        vec![Command::RotationToggled { enabled: false }]
    );
    assert!(!d.rotation_enabled());

    let out = d.handle(Event::ToggleRotation, 0.0);
    assert_eq!(out.commands, vec![Command::RotationToggled { enabled: true }]);
    assert!(d.rotation_enabled());
}

#[test]
fn hidden_document_pauses_and_visible_restarts_the_same_videos() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    let (cmds, now) = run_frames(&mut d, 0.0, 1);
    assert_eq!(video_actions(&cmds, PlaybackAction::Play), VIDEO_ENTRIES.len());

    let hidden = d.handle(Event::Visibility { hidden: true }, now);
    assert!(!hidden.prevent_default);
    assert_eq!(
        video_actions(&hidden.commands, PlaybackAction::Pause),
        VIDEO_ENTRIES.len()
    );

    let visible = d.handle(Event::Visibility { hidden: false }, now);
    assert_eq!(
        video_actions(&visible.commands, PlaybackAction::Play),
        VIDEO_ENTRIES.len()
    );
}

#[test]
fn rejected_play_is_retried_once() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    let (_, now) = run_frames(&mut d, 0.0, 1);

    d.handle(
        Event::PlayRejected {
            index: 0,
            rejection: PlayRejection::Other,
        },
        now,
    );
    assert_eq!(d.pending_tasks(), 1);
    let out = d.frame(now + PLAY_RETRY_DELAY_MS, |_| false);
    assert!(out
        .commands
        .contains(&Command::Video(PlaybackCommand::play(0))));

    d.handle(
        Event::PlayRejected {
            index: 0,
            rejection: PlayRejection::Other,
        },
        now + 200.0,
    );
    assert_eq!(d.pending_tasks(), 0);

    d.handle(
        Event::PlayRejected {
            index: 1,
            rejection: PlayRejection::Abort,
        },
        now + 200.0,
    );
    assert_eq!(d.pending_tasks(), 0);
}

#[test]
fn failed_media_is_paused_and_never_replayed() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    let (_, now) = run_frames(&mut d, 0.0, 1);

    let out = d.handle(Event::MediaFailed { index: 2 }, now);
    assert_eq!(out.commands, vec![Command::Video(PlaybackCommand::pause(2))]);
    let (cmds, _) = run_frames(&mut d, now, 5);
    assert!(!cmds.contains(&Command::Video(PlaybackCommand::play(2))));
}

#[test]
fn mobile_portrait_resize_locks_at_zoom_end() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.handle(Event::Resize(Viewport::new(390.0, 844.0, false)), 0.0);
    assert!(d.is_mobile_portrait());
    assert!(d.is_mobile_zoom_locked());
    assert!(d.zoom().is_disabled());
    assert_eq!(d.scroll().accumulator(), d.scroll().upper_bound());

    let target = d.scroll().target();
    let out = d.handle(wheel(-40.0, 0.0), 0.0);
    assert!(out.prevent_default);
    assert!(out.commands.is_empty());
    assert_eq!(d.scroll().target(), target);
}

#[test]
fn scene_is_not_rendered_under_the_overlay() {
    let mut d = director(DirectorConfig::with_intro(), EntryMode::Fresh);
    let out = d.frame(0.0, |_| false);
    assert!(!out.render_scene);
    assert!(out.commands.contains(&Command::SetOverlayOpacity(1.0)));

    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    let out = d.frame(0.0, |_| false);
    assert!(out.render_scene);
    assert_eq!(out.surfaces.len(), VIDEO_ENTRIES.len());
}

fn screen_position(out: &FrameOutput, index: usize) -> Vec2 {
    let vp = desktop();
    let ndc = out
        .camera
        .view_projection()
        .project_point3(out.surfaces[index].position);
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * vp.width as f32,
        (1.0 - ndc.y) * 0.5 * vp.height as f32,
    )
}

#[test]
fn click_on_a_rectangle_opens_its_case_study() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    let out = d.frame(0.0, |_| false);
    let pos = screen_position(&out, 0);

    d.handle(Event::PointerDown { pos }, 10.0);
    let up = d.handle(Event::PointerUp { pos }, 20.0);
    let pages: Vec<u32> = VIDEO_ENTRIES.iter().map(|e| e.page).collect();
    match up.commands.as_slice() {
        [Command::OpenCaseStudy { page }] => assert!(pages.contains(page)),
        other => panic!("expected one OpenCaseStudy, got {:?}", other),
    }
}

#[test]
fn drag_is_not_a_click() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    let out = d.frame(0.0, |_| false);
    let pos = screen_position(&out, 0);

    d.handle(Event::PointerDown { pos }, 10.0);
    d.handle(
        Event::PointerMove {
            pos: pos + Vec2::new(30.0, 0.0),
        },
        15.0,
    );
    let up = d.handle(
        Event::PointerUp {
            pos: pos + Vec2::new(30.0, 0.0),
        },
        20.0,
    );
    assert!(up.commands.is_empty());
}

#[test]
fn cta_appears_at_zoom_end_only() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.initial_commands();
    assert!(!d.cta_visible());

    // drive the target to the end of the zoom range
    for _ in 0..20 {
        d.handle(key(Key::ArrowDown), 0.0);
    }
    let (cmds, _) = run_frames(&mut d, 0.0, 200);
    assert!(d.scroll().at_zoom_end());
    assert!(cmds.contains(&Command::SetCtaVisible(true)));
    assert!(d.cta_visible());
}

#[test]
fn backward_burst_without_intro_never_raises_the_overlay() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.initial_commands();
    while d.scroll().target() > INITIAL_SCROLL + 8.0 {
        d.handle(key(Key::ArrowUp), 0.0);
    }
    let (_, mut now) = run_frames(&mut d, 0.0, 200);
    assert!(!d.scroll().at_lower_rest());

    // several wheel events land before the next frame
    for _ in 0..4 {
        d.handle(wheel(-100.0, 0.0), now);
    }
    assert!(d.scroll().target() < INITIAL_SCROLL);

    let mut commands = Vec::new();
    for _ in 0..60 {
        let out = d.frame(now, |_| false);
        assert!(out.render_scene);
        commands.extend(out.commands);
        now += FRAME_MS;
    }
    assert!(!d.overlay().is_shown());
    assert!(!commands.contains(&Command::ShowOverlay));
    assert!(!commands
        .iter()
        .any(|c| matches!(c, Command::SetOverlayOpacity(_))));
    assert_eq!(video_actions(&commands, PlaybackAction::Pause), 0);
}

#[test]
fn quick_gesture_never_starts_rotation() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.handle(Event::GestureStart, 0.0);
    assert_eq!(d.pending_tasks(), 1);
    d.handle(Event::GestureEnd, 50.0);
    assert_eq!(d.pending_tasks(), 0);

    d.frame(GESTURE_START_DEBOUNCE_MS + FRAME_MS, |_| false);
    assert!(!d.zoom().is_rotating());
}

#[test]
fn held_gesture_starts_rotation_after_the_debounce() {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.handle(Event::GestureStart, 0.0);
    d.frame(GESTURE_START_DEBOUNCE_MS / 2.0, |_| false);
    assert!(!d.zoom().is_rotating());

    d.frame(GESTURE_START_DEBOUNCE_MS + FRAME_MS, |_| false);
    assert!(d.zoom().is_rotating());
    assert_eq!(d.pending_tasks(), 0);

    d.handle(Event::GestureEnd, 400.0);
    assert!(!d.zoom().is_rotating());
}

/// Drives a FromNav director to the end of the zoom range.
fn at_zoom_end() -> (Director, f64) {
    let mut d = director(DirectorConfig::default(), EntryMode::FromNav);
    d.initial_commands();
    for _ in 0..20 {
        d.handle(key(Key::ArrowDown), 0.0);
    }
    let (_, now) = run_frames(&mut d, 0.0, 200);
    assert!(d.scroll().at_zoom_end());
    (d, now)
}

#[test]
fn over_scroll_past_dead_space_opens_the_gallery() {
    let (mut d, now) = at_zoom_end();

    d.handle(wheel(GALLERY_DEAD_SPACE / 2.0, 0.0), now);
    assert_eq!(d.reveal().pull(), GALLERY_DEAD_SPACE / 2.0);
    d.handle(wheel(GALLERY_DEAD_SPACE / 2.0, 0.0), now);
    assert_eq!(d.reveal().progress_target(), 0.0);
    let (cmds, now) = run_frames(&mut d, now, 60);
    assert!(d.reveal().is_closed());
    assert!(!cmds.contains(&Command::GalleryStateChanged { open: true }));

    d.handle(wheel(GALLERY_LIFT * 5.0, 0.0), now);
    assert_eq!(d.reveal().pull(), GALLERY_DEAD_SPACE + GALLERY_LIFT);
    assert_eq!(d.reveal().progress_target(), 1.0);
    let (cmds, _) = run_frames(&mut d, now, 120);
    assert!(cmds.contains(&Command::GalleryStateChanged { open: true }));
    assert!(d.reveal().is_open());
}

#[test]
fn backward_input_at_zoom_end_drops_the_pull() {
    let (mut d, now) = at_zoom_end();
    d.handle(wheel(400.0, 0.0), now);
    assert_eq!(d.reveal().pull(), 400.0);

    let before = d.scroll().target();
    d.handle(wheel(-10.0, 0.0), now);
    assert_eq!(d.reveal().pull(), 0.0);
    assert_eq!(d.reveal().progress_target(), 0.0);
    assert_eq!(d.scroll().target(), before - SCROLL_NUDGE);
}
