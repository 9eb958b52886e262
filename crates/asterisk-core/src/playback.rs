//! Which orbiting videos may decode at any moment.
//!
//! Outside the plain asterisk view only the few rectangles that face the
//! camera most directly keep playing. Commands are emitted only when a video's
//! target state changes, so the web layer never calls `play()` twice in a row.

use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::*;
use crate::schedule::StrideCounter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    #[default]
    Paused,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitingVideo {
    pub source: String,
    pub target_state: PlaybackState,
    pub manual_pause: bool,
    pub failed: bool,
    pub was_playing_before_hidden: bool,
    retries: u8,
}

impl OrbitingVideo {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target_state: PlaybackState::Paused,
            manual_pause: false,
            failed: false,
            was_playing_before_hidden: false,
            retries: 0,
        }
    }

    #[inline]
    pub fn wants_play(&self) -> bool {
        self.target_state == PlaybackState::Playing
    }
}

/// World position and facing direction of one video rectangle this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePose {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackAction {
    Play,
    Pause,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackCommand {
    pub index: usize,
    pub action: PlaybackAction,
}

impl PlaybackCommand {
    pub fn play(index: usize) -> Self {
        Self { index, action: PlaybackAction::Play }
    }

    pub fn pause(index: usize) -> Self {
        Self { index, action: PlaybackAction::Pause }
    }
}

/// How a rejected `play()` promise is classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayRejection {
    /// Superseded by a `pause()`; nothing to do.
    Abort,
    Other,
}

impl PlayRejection {
    pub fn from_error_name(name: &str) -> Self {
        if name == "AbortError" {
            Self::Abort
        } else {
            Self::Other
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    pub max_active: usize,
    pub frame_stride: u32,
    pub facing_threshold: f32,
    pub retry_delay_ms: f64,
    pub retry_limit: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_active: MAX_ACTIVE_VIDEOS,
            frame_stride: PLAYBACK_FRAME_STRIDE,
            facing_threshold: FACING_THRESHOLD,
            retry_delay_ms: PLAY_RETRY_DELAY_MS,
            retry_limit: PLAY_RETRY_LIMIT,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    index: usize,
    facing: f32,
    distance_sq: f32,
}

#[derive(Clone, Debug)]
pub struct VideoPlaybackScheduler {
    config: SchedulerConfig,
    videos: Vec<OrbitingVideo>,
    stride: StrideCounter,
}

impl VideoPlaybackScheduler {
    pub fn new<I, S>(config: SchedulerConfig, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stride = StrideCounter::new(config.frame_stride);
        Self {
            config,
            videos: sources.into_iter().map(OrbitingVideo::new).collect(),
            stride,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn videos(&self) -> &[OrbitingVideo] {
        &self.videos
    }

    pub fn video(&self, index: usize) -> Option<&OrbitingVideo> {
        self.videos.get(index)
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn playing_count(&self) -> usize {
        self.videos.iter().filter(|v| v.wants_play()).count()
    }

    fn set_state(&mut self, index: usize, play: bool, out: &mut Vec<PlaybackCommand>) {
        let Some(video) = self.videos.get_mut(index) else {
            return;
        };
        let next = if play && !video.manual_pause && !video.failed {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        if video.target_state == next {
            return;
        }
        video.target_state = next;
        match next {
            PlaybackState::Playing => {
                video.retries = 0;
                out.push(PlaybackCommand::play(index));
            }
            PlaybackState::Paused => out.push(PlaybackCommand::pause(index)),
        }
    }

    /// One scheduling pass.
    ///
    /// With `play_all` every eligible video plays. Otherwise the pass runs on
    /// every `frame_stride`-th call and keeps the best-facing `max_active`
    /// rectangles playing, breaking ties by distance.
    pub fn update(
        &mut self,
        poses: &[SurfacePose],
        camera_position: Vec3,
        play_all: bool,
    ) -> Vec<PlaybackCommand> {
        let mut out = Vec::new();
        if self.videos.is_empty() || poses.is_empty() {
            return out;
        }

        if play_all {
            for i in 0..self.videos.len() {
                self.set_state(i, true, &mut out);
            }
            return out;
        }

        if !self.stride.tick() {
            return out;
        }

        let mut candidates: SmallVec<[Candidate; 8]> = SmallVec::new();
        for (index, (video, pose)) in self.videos.iter().zip(poses).enumerate() {
            if video.manual_pause || video.failed {
                continue;
            }
            let to_camera = (camera_position - pose.position).normalize_or_zero();
            let facing = pose.normal.normalize_or_zero().dot(to_camera);
            if facing <= self.config.facing_threshold {
                continue;
            }
            candidates.push(Candidate {
                index,
                facing,
                distance_sq: camera_position.distance_squared(pose.position),
            });
        }

        candidates.sort_by(|a, b| {
            b.facing
                .total_cmp(&a.facing)
                .then(a.distance_sq.total_cmp(&b.distance_sq))
        });
        candidates.truncate(self.config.max_active);

        for i in 0..self.videos.len() {
            let active = candidates.iter().any(|c| c.index == i);
            self.set_state(i, active, &mut out);
        }
        out
    }

    /// Heavy pause: everything stops and stays stopped until `resume_all`.
    pub fn pause_all(&mut self) -> Vec<PlaybackCommand> {
        let mut out = Vec::new();
        for i in 0..self.videos.len() {
            self.videos[i].manual_pause = true;
            self.set_state(i, false, &mut out);
        }
        log::debug!("[playback] paused all ({} commands)", out.len());
        out
    }

    /// Sets the manual pause without emitting commands, for a start state
    /// where nothing has been asked to play yet.
    pub fn suppress_all(&mut self) {
        for video in &mut self.videos {
            video.manual_pause = true;
        }
    }

    /// Clears the manual pause; the next `update` decides what plays.
    pub fn resume_all(&mut self) {
        for video in &mut self.videos {
            video.manual_pause = false;
        }
        self.stride.reset();
    }

    pub fn mark_failed(&mut self, index: usize) -> Vec<PlaybackCommand> {
        let mut out = Vec::new();
        if let Some(video) = self.videos.get_mut(index) {
            log::warn!("[playback] {} failed to load; skipping it", video.source);
            video.failed = true;
        }
        self.set_state(index, false, &mut out);
        out
    }

    /// Document went hidden: remember what was playing and stop it.
    pub fn suspend_hidden(&mut self) -> Vec<PlaybackCommand> {
        let mut out = Vec::new();
        for (index, video) in self.videos.iter_mut().enumerate() {
            if video.wants_play() {
                video.was_playing_before_hidden = true;
                out.push(PlaybackCommand::pause(index));
            }
        }
        out
    }

    /// Document visible again: restart what `suspend_hidden` stopped, unless
    /// a manual pause happened in between.
    pub fn resume_visible(&mut self) -> Vec<PlaybackCommand> {
        let mut out = Vec::new();
        for (index, video) in self.videos.iter_mut().enumerate() {
            if !video.was_playing_before_hidden {
                continue;
            }
            video.was_playing_before_hidden = false;
            if !video.manual_pause && video.wants_play() {
                out.push(PlaybackCommand::play(index));
            }
        }
        out
    }

    /// A `play()` promise rejected. Returns true when one delayed retry
    /// should be scheduled.
    pub fn play_rejected(&mut self, index: usize, rejection: PlayRejection) -> bool {
        if rejection == PlayRejection::Abort {
            return false;
        }
        let limit = self.config.retry_limit;
        let Some(video) = self.videos.get_mut(index) else {
            return false;
        };
        if !video.wants_play() || video.manual_pause || video.retries >= limit {
            return false;
        }
        video.retries += 1;
        log::debug!("[playback] retrying {} ({})", video.source, video.retries);
        true
    }

    /// Whether a retry that has come due should still call `play()`.
    pub fn should_retry(&self, index: usize) -> bool {
        self.videos
            .get(index)
            .is_some_and(|v| v.wants_play() && !v.manual_pause && !v.failed)
    }

    pub fn play_succeeded(&mut self, index: usize) {
        if let Some(video) = self.videos.get_mut(index) {
            video.retries = 0;
        }
    }
}

/// Paces video texture uploads to every `stride` frames.
#[derive(Clone, Debug)]
pub struct TextureCadence {
    counter: StrideCounter,
}

impl TextureCadence {
    pub fn new(stride: u32) -> Self {
        Self {
            counter: StrideCounter::new(stride),
        }
    }

    /// Indices whose textures should be refreshed this frame: playing videos
    /// that have at least one decoded frame.
    pub fn due(&mut self, videos: &[OrbitingVideo], has_frame: impl Fn(usize) -> bool) -> Vec<usize> {
        if !self.counter.tick() {
            return Vec::new();
        }
        videos
            .iter()
            .enumerate()
            .filter(|(i, v)| v.wants_play() && has_frame(*i))
            .map(|(i, _)| i)
            .collect()
    }
}

impl Default for TextureCadence {
    fn default() -> Self {
        Self::new(TEXTURE_UPDATE_STRIDE)
    }
}
