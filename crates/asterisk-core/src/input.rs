//! Platform-free input vocabulary: keys, taps, clicks, viewport profile and
//! the page entry mode.

use glam::Vec2;

use crate::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Space,
    Escape,
    Enter,
}

impl Key {
    /// Map a DOM `KeyboardEvent` key/code pair.
    #[inline]
    pub fn from_dom(key: &str, code: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowDown" => Some(Self::ArrowDown),
            "PageUp" => Some(Self::PageUp),
            "PageDown" => Some(Self::PageDown),
            "Escape" | "Esc" => Some(Self::Escape),
            "Enter" => Some(Self::Enter),
            " " | "Spacebar" => Some(Self::Space),
            _ if code == "Space" => Some(Self::Space),
            _ => None,
        }
    }

    pub fn is_backward(self) -> bool {
        matches!(self, Self::ArrowUp | Self::PageUp)
    }

    pub fn is_forward(self) -> bool {
        matches!(self, Self::ArrowDown | Self::PageDown)
    }
}

/// Two taps close in time and space.
#[derive(Clone, Debug)]
pub struct TapDetector {
    window_ms: f64,
    max_dist_sq: f32,
    last: Option<(f64, Option<Vec2>)>,
}

impl Default for TapDetector {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_MS, DOUBLE_TAP_DIST_SQ)
    }
}

impl TapDetector {
    pub fn new(window_ms: f64, max_dist_sq: f32) -> Self {
        Self {
            window_ms,
            max_dist_sq,
            last: None,
        }
    }

    /// Record a tap; true when it completes a double tap. A tap without a
    /// position only checks the time window.
    pub fn tap(&mut self, now_ms: f64, pos: Option<Vec2>) -> bool {
        let double = match self.last {
            Some((t, last_pos)) if now_ms - t < self.window_ms => match (pos, last_pos) {
                (Some(a), Some(b)) => a.distance_squared(b) < self.max_dist_sq,
                _ => true,
            },
            _ => false,
        };
        self.last = Some((now_ms, pos));
        double
    }
}

/// Tells a click from a drag by pointer travel between down and up.
#[derive(Clone, Debug, Default)]
pub struct ClickTracker {
    down: Option<Vec2>,
}

impl ClickTracker {
    pub fn down(&mut self, pos: Vec2) {
        self.down = Some(pos);
    }

    pub fn up(&mut self, pos: Vec2) -> bool {
        self.down
            .take()
            .is_some_and(|d| d.distance(pos) < CLICK_MAX_TRAVEL_PX)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// `(pointer: coarse) and (orientation: portrait)` matched.
    pub coarse_portrait: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            coarse_portrait: false,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, coarse_portrait: bool) -> Self {
        Self {
            width,
            height,
            coarse_portrait,
        }
    }

    pub fn is_mobile_portrait(&self) -> bool {
        self.coarse_portrait || (self.width <= MOBILE_MAX_WIDTH && self.height > self.width)
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height.max(1.0)) as f32
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntryMode {
    #[default]
    Fresh,
    /// Returning from another page: skip the intro, start zoomed in.
    FromNav,
}

impl EntryMode {
    /// Parse a `location.search` string (with or without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let from_nav = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(k, v)| k == "from" && v == "nav");
        if from_nav {
            Self::FromNav
        } else {
            Self::Fresh
        }
    }
}
