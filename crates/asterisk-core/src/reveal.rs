//! Full-screen gallery panel progress, driven by a pull gesture.

use crate::constants::*;
use crate::easing::{approach, clamp01};

#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    pub dead_space: f64,
    pub lift: f64,
    pub smoothing: f64,
    pub snap_epsilon: f64,
    pub open_threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            dead_space: GALLERY_DEAD_SPACE,
            lift: GALLERY_LIFT,
            smoothing: REVEAL_SMOOTHING,
            snap_epsilon: REVEAL_SNAP_EPSILON,
            open_threshold: REVEAL_OPEN_THRESHOLD,
        }
    }
}

impl RevealConfig {
    /// Linear pull-to-progress map with a dead zone.
    pub fn progress_for_pull(&self, pull: f64) -> f64 {
        if self.lift <= 0.0 {
            return if pull >= self.dead_space { 1.0 } else { 0.0 };
        }
        clamp01((pull - self.dead_space) / self.lift)
    }

    #[inline]
    pub fn max_pull(&self) -> f64 {
        self.dead_space + self.lift.max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEdge {
    Opened,
    Closed,
}

/// Panel styling derived from the current progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealFrame {
    pub progress: f64,
    pub translate_pct: f64,
    pub opacity: f64,
    pub interactive: bool,
}

#[derive(Clone, Debug)]
pub struct GalleryRevealController {
    config: RevealConfig,
    pull: f64,
    progress: f64,
    progress_target: f64,
    was_open: bool,
}

impl GalleryRevealController {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            pull: 0.0,
            progress: 0.0,
            progress_target: 0.0,
            was_open: false,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn set_pull(&mut self, pull: f64) {
        self.pull = pull.clamp(0.0, self.config.max_pull());
        self.progress_target = self.config.progress_for_pull(self.pull);
    }

    /// Add a signed gesture magnitude to the pull.
    pub fn accumulate(&mut self, delta: f64) {
        self.set_pull(self.pull + delta);
    }

    pub fn open(&mut self) {
        self.set_pull(self.config.max_pull());
    }

    pub fn close(&mut self) {
        self.set_pull(0.0);
    }

    /// Ease toward the target; reports crossings of the open threshold.
    pub fn step(&mut self) -> Option<RevealEdge> {
        self.progress = approach(self.progress, self.progress_target, self.config.smoothing);
        if (self.progress - self.progress_target).abs() < self.config.snap_epsilon {
            self.progress = self.progress_target;
        }
        self.progress = clamp01(self.progress);

        let open = self.is_open();
        let edge = match (self.was_open, open) {
            (false, true) => Some(RevealEdge::Opened),
            (true, false) => Some(RevealEdge::Closed),
            _ => None,
        };
        self.was_open = open;
        edge
    }

    pub fn pull(&self) -> f64 {
        self.pull
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn progress_target(&self) -> f64 {
        self.progress_target
    }

    pub fn is_open(&self) -> bool {
        self.progress >= self.config.open_threshold
    }

    /// Settled all the way shut.
    pub fn is_closed(&self) -> bool {
        self.progress == 0.0
    }

    pub fn frame(&self) -> RevealFrame {
        RevealFrame {
            progress: self.progress,
            translate_pct: 100.0 - self.progress * 100.0,
            opacity: 0.2 + self.progress * 0.8,
            interactive: self.is_open(),
        }
    }
}
