//! Prioritised video preloading bookkeeping.
//!
//! The web layer owns the media elements and the promises; this module only
//! decides whether a request is new, already satisfied or joins an in-flight
//! load, and in which order the startup plan fetches things.

use fnv::{FnvHashMap, FnvHashSet};

use crate::constants::*;
use crate::orbit::VIDEO_ENTRIES;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// `HTMLMediaElement.readyState` levels a load can wait for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Readiness {
    Nothing = 0,
    Metadata = 1,
    FirstFrame = 2,
    CanPlay = 3,
    CanPlayThrough = 4,
}

impl Readiness {
    pub fn from_ready_state(state: u16) -> Self {
        match state {
            0 => Self::Nothing,
            1 => Self::Metadata,
            2 => Self::FirstFrame,
            3 => Self::CanPlay,
            _ => Self::CanPlayThrough,
        }
    }

    /// Media event that signals this level was reached.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Nothing | Self::Metadata => "loadedmetadata",
            Self::FirstFrame => "loadeddata",
            Self::CanPlay => "canplay",
            Self::CanPlayThrough => "canplaythrough",
        }
    }
}

impl Priority {
    pub fn required_readiness(self) -> Readiness {
        match self {
            Priority::High => Readiness::CanPlayThrough,
            Priority::Medium => Readiness::CanPlay,
            Priority::Low => Readiness::FirstFrame,
        }
    }

    /// Value for the element's `preload` attribute.
    pub fn preload_hint(self) -> &'static str {
        match self {
            Priority::High | Priority::Medium => "auto",
            Priority::Low => "metadata",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloadRequest {
    AlreadyLoaded,
    /// A load for the same source is running; wait on it instead.
    Joined,
    Started,
}

#[derive(Clone, Debug, Default)]
pub struct PreloadRegistry {
    loaded: FnvHashSet<String>,
    in_flight: FnvHashMap<String, Priority>,
}

impl PreloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, source: &str, priority: Priority) -> PreloadRequest {
        if self.loaded.contains(source) {
            return PreloadRequest::AlreadyLoaded;
        }
        if self.in_flight.contains_key(source) {
            return PreloadRequest::Joined;
        }
        self.in_flight.insert(source.to_string(), priority);
        log::debug!("[preload] start {} ({:?})", source, priority);
        PreloadRequest::Started
    }

    pub fn complete(&mut self, source: &str) {
        self.in_flight.remove(source);
        self.loaded.insert(source.to_string());
    }

    /// Forget a failed load so a later request can try again.
    pub fn fail(&mut self, source: &str) {
        if self.in_flight.remove(source).is_some() {
            log::warn!("[preload] failed to load {}", source);
        }
    }

    /// Record a source the page already buffered on its own.
    pub fn mark_loaded(&mut self, source: &str) {
        self.complete(source);
    }

    pub fn is_loaded(&self, source: &str) -> bool {
        self.loaded.contains(source)
    }

    pub fn in_flight_priority(&self, source: &str) -> Option<Priority> {
        self.in_flight.get(source).copied()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// Full-length case videos fetched after the orbit previews.
pub const PROJECT_DETAIL_VIDEOS: [&str; 5] = [
    "public/vid/übertön main (1920x1080).mp4",
    "public/vid/wdtw v1 (1920x1080).mp4",
    "public/vid/wdtw v2 (1920x1080).mp4",
    "public/vid/nachtInContrast (1920x1080).mp4",
    "public/vid/giftedness (1920x1080).mp4",
];

#[derive(Clone, Debug, PartialEq)]
pub struct PreloadStep {
    pub source: String,
    pub priority: Priority,
    /// Pause after this step before starting the next one.
    pub gap_ms: f64,
}

/// Sequential startup loading order. Each step awaits the previous one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreloadPlan {
    pub steps: Vec<PreloadStep>,
}

impl PreloadPlan {
    pub fn standard<'a>(
        intro: Option<&str>,
        asterisk: impl IntoIterator<Item = &'a str>,
        details: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut steps = Vec::new();
        if let Some(src) = intro {
            steps.push(PreloadStep {
                source: src.to_string(),
                priority: Priority::High,
                gap_ms: 0.0,
            });
        }
        steps.extend(asterisk.into_iter().map(|src| PreloadStep {
            source: src.to_string(),
            priority: Priority::High,
            gap_ms: ASTERISK_PRELOAD_GAP_MS,
        }));
        steps.extend(details.into_iter().map(|src| PreloadStep {
            source: src.to_string(),
            priority: Priority::Medium,
            gap_ms: DETAIL_PRELOAD_GAP_MS,
        }));
        Self { steps }
    }

    /// The plan for this page: intro, then the orbit previews, then the case videos.
    pub fn for_page(intro: Option<&str>) -> Self {
        Self::standard(
            intro,
            VIDEO_ENTRIES.iter().map(|e| e.source),
            PROJECT_DETAIL_VIDEOS.iter().copied(),
        )
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
