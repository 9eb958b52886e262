//! Scroll accumulator with spring easing and eased auto-scroll tweens.
//!
//! Every input source (wheel, touch, keys, auto-scroll) writes a *target*;
//! [`ScrollKinematics::tick`] chases it with a damped spring once per frame.
//! The accumulator and target are always kept inside
//! `[0, max_overlay + max_zoom]`.

use crate::constants::*;
use crate::easing::{clamp01, ease_in_out_cubic};

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollConfig {
    pub max_overlay: f64,
    pub max_zoom: f64,
    pub spring_k: f64,
    pub damping: f64,
    pub frame_ms: f64,
    pub zoom_end_slack: f64,
    /// Accumulator value at or below which backward input leaves the page.
    pub lower_rest: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            max_overlay: MAX_OVERLAY_SCROLL,
            max_zoom: MAX_ZOOM_SCROLL,
            spring_k: SPRING_K,
            damping: SCROLL_DAMPING,
            frame_ms: FRAME_MS,
            zoom_end_slack: ZOOM_END_SLACK,
            lower_rest: MAX_OVERLAY_SCROLL,
        }
    }
}

impl ScrollConfig {
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        self.max_overlay + self.max_zoom
    }

    /// Accumulator position for a fraction of the zoom range.
    #[inline]
    pub fn position_for_zoom_fraction(&self, fraction: f64) -> f64 {
        self.max_overlay + self.max_zoom * clamp01(fraction)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoScrollTween {
    pub start: f64,
    pub end: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl AutoScrollTween {
    /// Eased value at `now_ms` and whether the tween has run its course.
    pub fn sample(&self, now_ms: f64) -> (f64, bool) {
        let t = if self.duration_ms > 0.0 {
            ((now_ms - self.start_ms) / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        let k = ease_in_out_cubic(t);
        (self.start + (self.end - self.start) * k, t >= 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct ScrollKinematics {
    config: ScrollConfig,
    accumulator: f64,
    target: f64,
    velocity: f64,
    tween: Option<AutoScrollTween>,
    last_tick_ms: Option<f64>,
}

impl ScrollKinematics {
    pub fn new(config: ScrollConfig, initial: f64) -> Self {
        let start = initial.clamp(0.0, config.upper_bound());
        Self {
            config,
            accumulator: start,
            target: start,
            velocity: 0.0,
            tween: None,
            last_tick_ms: None,
        }
    }

    #[inline]
    fn clamp(&self, v: f64) -> f64 {
        v.clamp(0.0, self.config.upper_bound())
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Move the target by a signed amount. An active tween keeps running and
    /// overwrites the target again on the next tick.
    pub fn apply_delta(&mut self, amount: f64) {
        self.target = self.clamp(self.target + amount);
    }

    /// Direct assignment of the target; cancels any tween.
    pub fn set_target(&mut self, value: f64) {
        self.tween = None;
        self.target = self.clamp(value);
    }

    /// Teleport: accumulator and target both land on `value` at rest.
    pub fn jump_to(&mut self, value: f64) {
        let v = self.clamp(value);
        self.tween = None;
        self.accumulator = v;
        self.target = v;
        self.velocity = 0.0;
    }

    /// Keep the accumulator at or above `floor`, killing velocity if it had to move.
    pub fn raise_floor(&mut self, floor: f64) {
        let floor = self.clamp(floor);
        if self.accumulator < floor {
            self.accumulator = floor;
            self.target = self.target.max(floor);
            self.velocity = 0.0;
        }
    }

    /// Start an eased auto-scroll from the current target to a fraction of the
    /// zoom range. Replaces any tween already running.
    pub fn auto_scroll_to_fraction(&mut self, fraction: f64, duration_ms: f64, now_ms: f64) {
        let end = self.config.position_for_zoom_fraction(fraction);
        self.tween = Some(AutoScrollTween {
            start: self.target,
            end,
            start_ms: now_ms,
            duration_ms,
        });
    }

    pub fn cancel_tween(&mut self) {
        self.tween = None;
    }

    /// Advance one frame. Returns the normalised `dt` used for this step.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_tick_ms {
            Some(last) => ((now_ms - last) / self.config.frame_ms).clamp(0.0, 1.0),
            None => 1.0,
        };
        self.last_tick_ms = Some(now_ms);

        if let Some(tween) = self.tween {
            let (value, done) = tween.sample(now_ms);
            self.target = self.clamp(value);
            if done {
                self.tween = None;
                self.target = self.clamp(tween.end);
                self.accumulator = self.target;
                self.velocity = 0.0;
            }
        }

        let diff = self.target - self.accumulator;
        self.velocity += diff * self.config.spring_k * dt;
        self.velocity *= self.config.damping;
        self.accumulator = self.clamp(self.accumulator + self.velocity * dt);
        dt
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn tween(&self) -> Option<&AutoScrollTween> {
        self.tween.as_ref()
    }

    pub fn upper_bound(&self) -> f64 {
        self.config.upper_bound()
    }

    pub fn overlay_progress(&self) -> f64 {
        if self.config.max_overlay <= 0.0 {
            return 1.0;
        }
        (self.accumulator / self.config.max_overlay).min(1.0)
    }

    pub fn zoom_progress(&self) -> f64 {
        if self.config.max_zoom <= 0.0 {
            return 0.0;
        }
        clamp01((self.accumulator - self.config.max_overlay) / self.config.max_zoom)
    }

    /// At or below the lower rest, where backward input navigates away.
    pub fn at_lower_rest(&self) -> bool {
        self.accumulator <= self.config.lower_rest
    }

    pub fn at_zoom_end(&self) -> bool {
        self.accumulator >= self.config.upper_bound() - self.config.zoom_end_slack
    }
}
