//! Intro overlay visibility with hysteresis.

use crate::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    Shown,
    Hidden,
}

/// Side effects of an overlay transition, in the order they must run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayEffect {
    ShowOverlay,
    HideOverlay,
    PauseBackgroundMedia,
    ResumeBackgroundMedia,
    /// `resume` continues from the remembered position instead of restarting.
    PlayIntro { resume: bool },
    PauseIntro,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    pub show_threshold: f64,
    pub hide_threshold: f64,
    pub resume_window_ms: f64,
    pub skip_nudge_fraction: f64,
    pub post_end_epsilon: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_threshold: OVERLAY_SHOW_THRESHOLD,
            hide_threshold: OVERLAY_HIDE_THRESHOLD,
            resume_window_ms: INTRO_RESUME_WINDOW_MS,
            skip_nudge_fraction: SKIP_NUDGE_FRACTION,
            post_end_epsilon: POST_END_EPSILON,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OverlayStateMachine {
    config: OverlayConfig,
    state: OverlayState,
    last_hidden_ms: Option<f64>,
    intro_playing: bool,
}

impl OverlayStateMachine {
    pub fn new(config: OverlayConfig, initial: OverlayState) -> Self {
        Self {
            config,
            state: initial,
            last_hidden_ms: None,
            intro_playing: false,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        self.state == OverlayState::Shown
    }

    pub fn intro_playing(&self) -> bool {
        self.intro_playing
    }

    /// Fed from the intro video's `playing` event.
    pub fn set_intro_playing(&mut self, playing: bool) {
        self.intro_playing = playing && self.is_shown();
    }

    /// Apply the threshold rules for this frame's overlay progress.
    pub fn evaluate(
        &mut self,
        overlay_progress: f64,
        now_ms: f64,
        out: &mut Vec<OverlayEffect>,
    ) -> Option<OverlayState> {
        match self.state {
            OverlayState::Hidden if overlay_progress < self.config.show_threshold => {
                self.enter_shown(now_ms, out);
                Some(OverlayState::Shown)
            }
            OverlayState::Shown if overlay_progress > self.config.hide_threshold => {
                self.enter_hidden(now_ms, out);
                Some(OverlayState::Hidden)
            }
            _ => None,
        }
    }

    /// Skip or intro end: hide regardless of progress. No-op when already hidden.
    pub fn force_hide(&mut self, now_ms: f64, out: &mut Vec<OverlayEffect>) -> bool {
        if !self.is_shown() {
            return false;
        }
        self.enter_hidden(now_ms, out);
        true
    }

    /// Silent state override used for the `from=nav` entry.
    pub fn set_hidden_silently(&mut self) {
        self.state = OverlayState::Hidden;
        self.intro_playing = false;
    }

    fn enter_shown(&mut self, now_ms: f64, out: &mut Vec<OverlayEffect>) {
        self.state = OverlayState::Shown;
        let resume = self
            .last_hidden_ms
            .is_some_and(|t| now_ms - t <= self.config.resume_window_ms);
        log::debug!("[overlay] shown resume={}", resume);
        out.push(OverlayEffect::ShowOverlay);
        out.push(OverlayEffect::PauseBackgroundMedia);
        out.push(OverlayEffect::PlayIntro { resume });
    }

    fn enter_hidden(&mut self, now_ms: f64, out: &mut Vec<OverlayEffect>) {
        self.state = OverlayState::Hidden;
        self.last_hidden_ms = Some(now_ms);
        self.intro_playing = false;
        log::debug!("[overlay] hidden");
        out.push(OverlayEffect::HideOverlay);
        out.push(OverlayEffect::PauseIntro);
        out.push(OverlayEffect::ResumeBackgroundMedia);
    }

    /// Overlay opacity while shown: fades out as the accumulator approaches
    /// the hide threshold.
    pub fn fade_opacity(&self, accumulator: f64, max_overlay: f64) -> f64 {
        let span = max_overlay * self.config.hide_threshold;
        if span <= 0.0 {
            return 0.0;
        }
        1.0 - (accumulator / span).min(1.0)
    }

    pub fn skip_nudge(&self, max_overlay: f64) -> f64 {
        max_overlay * self.config.skip_nudge_fraction
    }

    /// Lowest accumulator allowed after the intro ends, so the overlay cannot
    /// immediately re-trigger.
    pub fn post_end_floor(&self, max_overlay: f64) -> f64 {
        self.config.show_threshold * max_overlay + self.config.post_end_epsilon
    }
}
