// Host tests for the intro overlay hysteresis and its side effects.

use asterisk_core::constants::*;
use asterisk_core::{OverlayConfig, OverlayEffect, OverlayState, OverlayStateMachine};

fn machine(initial: OverlayState) -> OverlayStateMachine {
    OverlayStateMachine::new(OverlayConfig::default(), initial)
}

#[test]
fn shows_before_show_threshold_and_hides_only_past_hide_threshold() {
    let mut m = machine(OverlayState::Hidden);
    let mut out = Vec::new();
    let mut shown_at = None;
    let mut hidden_at = None;
    // ease upward from 0 in small steps
    for step in 0..=1000 {
        let acc = step as f64 * MAX_OVERLAY_SCROLL / 1000.0;
        let p = acc / MAX_OVERLAY_SCROLL;
        match m.evaluate(p, step as f64, &mut out) {
            Some(OverlayState::Shown) => shown_at = Some(acc),
            Some(OverlayState::Hidden) => {
                hidden_at = Some(acc);
                break;
            }
            None => {}
        }
    }
    let shown_at = shown_at.expect("overlay never shown");
    let hidden_at = hidden_at.expect("overlay never hidden");
    assert!(shown_at < OVERLAY_SHOW_THRESHOLD * MAX_OVERLAY_SCROLL);
    assert!(hidden_at > OVERLAY_HIDE_THRESHOLD * MAX_OVERLAY_SCROLL);
}

#[test]
fn no_transition_inside_the_band() {
    for initial in [OverlayState::Shown, OverlayState::Hidden] {
        let mut m = machine(initial);
        let mut out = Vec::new();
        for p in [0.94, 0.95, 0.96, 0.97, 0.98] {
            assert_eq!(m.evaluate(p, 0.0, &mut out), None, "{:?} at {}", initial, p);
        }
        assert!(out.is_empty());
        assert_eq!(m.state(), initial);
    }
}

#[test]
fn effects_run_in_order() {
    let mut m = machine(OverlayState::Shown);
    let mut out = Vec::new();
    m.evaluate(1.0, 0.0, &mut out);
    assert_eq!(
        out,
        vec![
            OverlayEffect::HideOverlay,
            OverlayEffect::PauseIntro,
            OverlayEffect::ResumeBackgroundMedia
        ]
    );
    out.clear();
    m.evaluate(0.5, 100.0, &mut out);
    assert_eq!(
        out,
        vec![
            OverlayEffect::ShowOverlay,
            OverlayEffect::PauseBackgroundMedia,
            OverlayEffect::PlayIntro { resume: true }
        ]
    );
}

#[test]
fn reshow_after_resume_window_restarts_intro() {
    let mut m = machine(OverlayState::Shown);
    let mut out = Vec::new();
    m.evaluate(1.0, 1_000.0, &mut out);
    out.clear();
    m.evaluate(0.0, 1_000.0 + INTRO_RESUME_WINDOW_MS + 1.0, &mut out);
    assert!(out.contains(&OverlayEffect::PlayIntro { resume: false }));
}

#[test]
fn first_show_never_resumes() {
    let mut m = machine(OverlayState::Hidden);
    let mut out = Vec::new();
    m.evaluate(0.0, 0.0, &mut out);
    assert!(out.contains(&OverlayEffect::PlayIntro { resume: false }));
}

#[test]
fn force_hide_is_a_noop_when_hidden() {
    let mut m = machine(OverlayState::Shown);
    let mut out = Vec::new();
    m.set_intro_playing(true);
    assert!(m.intro_playing());
    assert!(m.force_hide(0.0, &mut out));
    assert!(!m.intro_playing());
    out.clear();
    assert!(!m.force_hide(0.0, &mut out));
    assert!(out.is_empty());
}

#[test]
fn intro_playing_requires_overlay_shown() {
    let mut m = machine(OverlayState::Hidden);
    m.set_intro_playing(true);
    assert!(!m.intro_playing());
}

#[test]
fn fade_and_floors() {
    let m = machine(OverlayState::Shown);
    assert_eq!(m.fade_opacity(0.0, MAX_OVERLAY_SCROLL), 1.0);
    assert_eq!(m.fade_opacity(MAX_OVERLAY_SCROLL, MAX_OVERLAY_SCROLL), 0.0);
    let floor = m.post_end_floor(MAX_OVERLAY_SCROLL);
    assert!(floor > OVERLAY_SHOW_THRESHOLD * MAX_OVERLAY_SCROLL);
    assert_eq!(m.skip_nudge(MAX_OVERLAY_SCROLL), MAX_OVERLAY_SCROLL * SKIP_NUDGE_FRACTION);
}
