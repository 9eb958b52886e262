//! The page's state machine.
//!
//! [`Director::handle`] consumes one input event and returns the commands the
//! page must run; [`Director::frame`] advances every controller in a fixed
//! order once per animation frame. Nothing here touches the DOM, so the whole
//! interaction model runs on the host in tests.

use glam::{Quat, Vec2, Vec3};

use crate::camera::{pixel_to_ndc, Camera, OrbitRig, RigConfig};
use crate::command::{Command, Outcome};
use crate::constants::*;
use crate::input::{ClickTracker, EntryMode, Key, TapDetector, Viewport};
use crate::orbit::{billboard_rotation, euler_xyz, OrbitConfig, OrbitGroup, VIDEO_ENTRIES};
use crate::overlay::{OverlayConfig, OverlayEffect, OverlayState, OverlayStateMachine};
use crate::playback::{
    PlayRejection, PlaybackCommand, SchedulerConfig, SurfacePose, TextureCadence,
    VideoPlaybackScheduler,
};
use crate::reveal::{GalleryRevealController, RevealConfig, RevealEdge, RevealFrame};
use crate::schedule::{DelayQueue, TaskToken};
use crate::scroll::{ScrollConfig, ScrollKinematics};
use crate::zoom::{AsteriskOrienter, OrienterConfig, ZoomCameraController, ZoomConfig};

#[derive(Clone, Debug, PartialEq)]
pub struct DirectorConfig {
    pub scroll: ScrollConfig,
    pub overlay: OverlayConfig,
    pub reveal: RevealConfig,
    pub zoom: ZoomConfig,
    pub orienter: OrienterConfig,
    pub rig: RigConfig,
    pub orbit: OrbitConfig,
    pub scheduler: SchedulerConfig,
    /// The page carries an intro overlay that starts shown at the top.
    pub has_intro: bool,
    pub initial_scroll: f64,
    pub nudge: f64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            overlay: OverlayConfig::default(),
            reveal: RevealConfig::default(),
            zoom: ZoomConfig::default(),
            orienter: OrienterConfig::default(),
            rig: RigConfig::default(),
            orbit: OrbitConfig::default(),
            scheduler: SchedulerConfig::default(),
            has_intro: false,
            initial_scroll: INITIAL_SCROLL,
            nudge: SCROLL_NUDGE,
        }
    }
}

impl DirectorConfig {
    /// Layout for a page with an intro video: the scroll starts at zero under
    /// the overlay and the navigate-back edge moves down to zero with it.
    pub fn with_intro() -> Self {
        let mut config = Self::default();
        config.has_intro = true;
        config.initial_scroll = 0.0;
        config.scroll.lower_rest = 0.0;
        config
    }
}

/// Work that runs a fixed delay after the event that asked for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    BeginRotation,
    Navigate,
    EntryAutoScroll,
    SnapToZoomEnd,
    RetryPlay { index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Wheel { delta_y: f64, gallery_scroll_top: f64 },
    TouchStart { y: f64 },
    TouchMove { y: f64, gallery_scroll_top: f64 },
    Key { key: Key, gallery_scroll_top: f64 },
    PointerDown { pos: Vec2 },
    PointerMove { pos: Vec2 },
    PointerUp { pos: Vec2 },
    GestureStart,
    GestureEnd,
    IntroPlaying,
    IntroEnded,
    IntroTap { pos: Option<Vec2> },
    SkipIntro,
    OpenGallery,
    CloseGallery,
    Resize(Viewport),
    Visibility { hidden: bool },
    ToggleRotation,
    CaseViewer(bool),
    CardExpanded(bool),
    VideoPlaying { index: usize },
    PlayRejected { index: usize, rejection: PlayRejection },
    MediaFailed { index: usize },
}

/// Everything the page needs to draw one frame.
#[derive(Clone, Debug)]
pub struct FrameOutput {
    pub commands: Vec<Command>,
    pub camera: Camera,
    pub asterisk_rotation: Quat,
    pub billboard: Quat,
    pub surfaces: Vec<SurfacePose>,
    /// Orbit videos whose textures should be refreshed this frame.
    pub texture_uploads: Vec<usize>,
    /// False while the overlay or the open gallery covers the canvas.
    pub render_scene: bool,
}

pub struct Director {
    config: DirectorConfig,
    scroll: ScrollKinematics,
    overlay: OverlayStateMachine,
    zoom: ZoomCameraController,
    orienter: AsteriskOrienter,
    rig: OrbitRig,
    reveal: GalleryRevealController,
    orbit: OrbitGroup,
    scheduler: VideoPlaybackScheduler,
    textures: TextureCadence,
    deferred: DelayQueue<Deferred>,
    rotate_start: Option<TaskToken>,
    viewport: Viewport,
    mobile_portrait: bool,
    mobile_zoom_locked: bool,
    rotation_enabled: bool,
    case_viewer_open: bool,
    card_expanded: bool,
    heavy_paused: bool,
    navigating: bool,
    last_touch_y: Option<f64>,
    last_pointer: Option<Vec2>,
    taps: TapDetector,
    clicks: ClickTracker,
    cta_visible: bool,
    last_gallery_frame: Option<RevealFrame>,
    last_camera: Camera,
    last_billboard: Quat,
}

impl Director {
    pub fn new(config: DirectorConfig, entry: EntryMode, viewport: Viewport, now_ms: f64) -> Self {
        let mobile_portrait = viewport.is_mobile_portrait();
        let initial_overlay = if config.has_intro && entry == EntryMode::Fresh {
            OverlayState::Shown
        } else {
            OverlayState::Hidden
        };
        let mut scroll = ScrollKinematics::new(config.scroll.clone(), config.initial_scroll);
        let mut overlay = OverlayStateMachine::new(config.overlay.clone(), initial_overlay);
        let mut zoom = ZoomCameraController::new(config.zoom.clone());
        zoom.set_disabled(mobile_portrait);
        let rig = OrbitRig::new(config.rig.clone());
        let last_camera = rig.camera(viewport.aspect());
        let mut scheduler = VideoPlaybackScheduler::new(
            config.scheduler.clone(),
            VIDEO_ENTRIES.iter().map(|e| e.source),
        );
        if overlay.is_shown() {
            scheduler.suppress_all();
        }

        let mut deferred = DelayQueue::new();
        let mut mobile_zoom_locked = false;
        match entry {
            EntryMode::FromNav => {
                overlay.set_hidden_silently();
                scroll.jump_to(config.scroll.position_for_zoom_fraction(FROM_NAV_FRACTION));
                mobile_zoom_locked = mobile_portrait;
                log::info!("[scroll] entry from nav; starting zoomed in");
            }
            EntryMode::Fresh if !config.has_intro => {
                deferred.schedule(now_ms, ENTRY_DELAY_MS, Deferred::EntryAutoScroll);
            }
            EntryMode::Fresh => {}
        }

        Self {
            orbit: OrbitGroup::new(config.orbit.clone(), &VIDEO_ENTRIES),
            reveal: GalleryRevealController::new(config.reveal.clone()),
            orienter: AsteriskOrienter::new(config.orienter.clone()),
            config,
            scroll,
            overlay,
            zoom,
            rig,
            scheduler,
            textures: TextureCadence::default(),
            deferred,
            rotate_start: None,
            viewport,
            mobile_portrait,
            mobile_zoom_locked,
            rotation_enabled: true,
            case_viewer_open: false,
            card_expanded: false,
            heavy_paused: false,
            navigating: false,
            last_touch_y: None,
            last_pointer: None,
            taps: TapDetector::default(),
            clicks: ClickTracker::default(),
            cta_visible: false,
            last_gallery_frame: None,
            last_camera,
            last_billboard: Quat::IDENTITY,
        }
    }

    /// Commands that bring the page in line with the starting state.
    pub fn initial_commands(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        if self.overlay.is_shown() {
            out.push(Command::ShowOverlay);
            out.push(Command::PlayIntro { resume: false });
        } else {
            out.push(Command::HideOverlay);
            out.push(Command::PauseIntro);
        }
        out.push(Command::RotationToggled {
            enabled: self.rotation_enabled,
        });
        let frame = self.reveal.frame();
        self.last_gallery_frame = Some(frame);
        out.push(Command::GalleryFrame(frame));
        self.cta_visible = self.cta_should_show();
        out.push(Command::SetCtaVisible(self.cta_visible));
        out
    }

    pub fn scroll(&self) -> &ScrollKinematics {
        &self.scroll
    }

    pub fn overlay(&self) -> &OverlayStateMachine {
        &self.overlay
    }

    pub fn reveal(&self) -> &GalleryRevealController {
        &self.reveal
    }

    pub fn zoom(&self) -> &ZoomCameraController {
        &self.zoom
    }

    pub fn orienter(&self) -> &AsteriskOrienter {
        &self.orienter
    }

    pub fn orbit(&self) -> &OrbitGroup {
        &self.orbit
    }

    pub fn scheduler(&self) -> &VideoPlaybackScheduler {
        &self.scheduler
    }

    pub fn rig(&self) -> &OrbitRig {
        &self.rig
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_mobile_portrait(&self) -> bool {
        self.mobile_portrait
    }

    pub fn is_mobile_zoom_locked(&self) -> bool {
        self.mobile_zoom_locked
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotation_enabled
    }

    pub fn is_heavy_paused(&self) -> bool {
        self.heavy_paused
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    pub fn cta_visible(&self) -> bool {
        self.cta_visible
    }

    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    pub fn handle(&mut self, event: Event, now_ms: f64) -> Outcome {
        match event {
            Event::Wheel {
                delta_y,
                gallery_scroll_top,
            } => {
                if self.case_viewer_open {
                    return Outcome::ignored();
                }
                self.route_vertical(delta_y, gallery_scroll_top, now_ms)
            }
            Event::TouchStart { y } => {
                self.last_touch_y = Some(y);
                Outcome::ignored()
            }
            Event::TouchMove {
                y,
                gallery_scroll_top,
            } => {
                let Some(last) = self.last_touch_y.replace(y) else {
                    return Outcome::ignored();
                };
                if self.case_viewer_open {
                    return Outcome::ignored();
                }
                self.route_vertical(last - y, gallery_scroll_top, now_ms)
            }
            Event::Key {
                key,
                gallery_scroll_top,
            } => self.route_key(key, gallery_scroll_top, now_ms),
            Event::PointerDown { pos } => {
                self.clicks.down(pos);
                self.last_pointer = Some(pos);
                self.rig.begin_drag();
                self.gesture_start(now_ms);
                Outcome::ignored()
            }
            Event::PointerMove { pos } => {
                if let Some(last) = self.last_pointer.filter(|_| self.rig.is_dragging()) {
                    let d = pos - last;
                    self.rig.drag(d.x, d.y, self.viewport.height as f32);
                    self.last_pointer = Some(pos);
                }
                Outcome::ignored()
            }
            Event::PointerUp { pos } => {
                self.last_pointer = None;
                if self.rig.end_drag().is_some() {
                    self.gesture_end();
                }
                let mut outcome = Outcome::ignored();
                if self.clicks.up(pos) {
                    if let Some(page) = self.pick_page(pos) {
                        log::info!("[gallery] opening case study {}", page);
                        outcome.push(Command::OpenCaseStudy { page });
                    }
                }
                outcome
            }
            Event::GestureStart => {
                self.gesture_start(now_ms);
                Outcome::ignored()
            }
            Event::GestureEnd => {
                self.gesture_end();
                Outcome::ignored()
            }
            Event::IntroPlaying => {
                self.overlay.set_intro_playing(true);
                Outcome::ignored()
            }
            Event::IntroEnded => {
                let mut outcome = Outcome::ignored();
                self.intro_finished(now_ms, &mut outcome.commands);
                outcome
            }
            Event::IntroTap { pos } => {
                if !self.overlay.is_shown() || !self.taps.tap(now_ms, pos) {
                    return Outcome::ignored();
                }
                let mut outcome = Outcome::consumed();
                self.intro_finished(now_ms, &mut outcome.commands);
                if self.mobile_portrait {
                    self.mobile_zoom_locked = true;
                }
                outcome
            }
            Event::SkipIntro => {
                let mut outcome = Outcome::consumed();
                self.skip_intro(now_ms, &mut outcome.commands);
                outcome
            }
            Event::OpenGallery => {
                self.reveal.open();
                log::debug!("[gallery] open requested");
                Outcome::consumed()
            }
            Event::CloseGallery => {
                self.reveal.close();
                log::debug!("[gallery] close requested");
                Outcome::consumed()
            }
            Event::Resize(viewport) => {
                self.resize(viewport, now_ms);
                Outcome::ignored()
            }
            Event::Visibility { hidden } => {
                let cmds = if hidden {
                    self.scheduler.suspend_hidden()
                } else {
                    self.scheduler.resume_visible()
                };
                let mut outcome = Outcome::ignored();
                outcome.commands.extend(cmds.into_iter().map(Command::Video));
                outcome
            }
            Event::ToggleRotation => {
                let mut outcome = Outcome::consumed();
                outcome.push(self.toggle_rotation());
                outcome
            }
            Event::CaseViewer(open) => {
                self.case_viewer_open = open;
                let mut outcome = Outcome::ignored();
                if open {
                    self.pause_heavy(&mut outcome.commands);
                } else {
                    self.resume_heavy();
                }
                outcome
            }
            Event::CardExpanded(expanded) => {
                self.card_expanded = expanded;
                Outcome::ignored()
            }
            Event::VideoPlaying { index } => {
                self.scheduler.play_succeeded(index);
                Outcome::ignored()
            }
            Event::PlayRejected { index, rejection } => {
                if self.scheduler.play_rejected(index, rejection) {
                    self.deferred.schedule(
                        now_ms,
                        self.scheduler.config().retry_delay_ms,
                        Deferred::RetryPlay { index },
                    );
                }
                Outcome::ignored()
            }
            Event::MediaFailed { index } => {
                let mut outcome = Outcome::ignored();
                let cmds = self.scheduler.mark_failed(index);
                outcome.commands.extend(cmds.into_iter().map(Command::Video));
                outcome
            }
        }
    }

    fn intro_blocking(&self) -> bool {
        self.overlay.is_shown() && self.overlay.intro_playing()
    }

    fn mobile_locked_now(&self) -> bool {
        self.mobile_portrait
            && self.mobile_zoom_locked
            && !self.overlay.is_shown()
            && self.reveal.is_closed()
    }

    fn fully_open(&self) -> bool {
        self.reveal.progress() >= REVEAL_FULLY_OPEN
    }

    /// Shared routing for wheel and touch drags. `dy > 0` moves forward.
    fn route_vertical(&mut self, dy: f64, gallery_scroll_top: f64, now_ms: f64) -> Outcome {
        if self.mobile_locked_now() {
            return Outcome::consumed();
        }
        let mut outcome = Outcome::consumed();
        if self.intro_blocking() {
            if !self.mobile_portrait {
                self.skip_intro(now_ms, &mut outcome.commands);
            }
            return outcome;
        }

        let nudge = self.config.nudge;
        if self.reveal.is_closed() && self.scroll.at_lower_rest() {
            if dy < 0.0 {
                self.navigate_back(now_ms, &mut outcome.commands);
            } else if dy > 0.0 {
                self.scroll.apply_delta(nudge);
            }
            return outcome;
        }

        if self.fully_open() {
            outcome.push(Command::ScrollGallery { by: dy });
            if dy < 0.0 && gallery_scroll_top <= 0.0 {
                self.reveal.accumulate(dy);
            }
            return outcome;
        }

        if self.scroll.at_zoom_end() && self.reveal.is_closed() {
            if dy < 0.0 {
                self.scroll.apply_delta(-nudge);
                self.reveal.close();
            } else if dy > 0.0 {
                self.reveal.accumulate(dy);
            }
            return outcome;
        }

        if dy > 0.0 {
            self.scroll.apply_delta(nudge);
        } else if dy < 0.0 {
            self.scroll.apply_delta(-nudge);
        }
        outcome
    }

    fn route_key(&mut self, key: Key, gallery_scroll_top: f64, now_ms: f64) -> Outcome {
        let mut outcome = Outcome::consumed();
        if self.intro_blocking() {
            if !self.mobile_portrait {
                self.skip_intro(now_ms, &mut outcome.commands);
            }
            return outcome;
        }

        match key {
            Key::Space => {
                outcome.push(self.toggle_rotation());
                return outcome;
            }
            Key::Escape => {
                if self.case_viewer_open {
                    outcome.push(Command::CloseCaseViewer);
                } else if self.card_expanded {
                    outcome.push(Command::CollapseExpanded);
                } else if self.reveal.progress() > 0.0 || self.reveal.progress_target() > 0.0 {
                    self.reveal.close();
                } else {
                    return Outcome::ignored();
                }
                log::debug!("[keys] escape");
                return outcome;
            }
            Key::Enter => return Outcome::ignored(),
            _ => {}
        }
        if self.case_viewer_open {
            return Outcome::ignored();
        }

        let nudge = self.config.nudge;
        if self.reveal.is_closed() && self.scroll.at_lower_rest() {
            if key.is_backward() {
                self.navigate_back(now_ms, &mut outcome.commands);
            } else {
                self.scroll.apply_delta(nudge);
            }
            return outcome;
        }

        if self.fully_open() {
            if key.is_forward() {
                outcome.push(Command::ScrollGallery {
                    by: GALLERY_KEY_SCROLL_PX,
                });
            } else {
                outcome.push(Command::ScrollGallery {
                    by: -GALLERY_KEY_SCROLL_PX,
                });
                if gallery_scroll_top <= 0.0 {
                    self.reveal.accumulate(-GALLERY_KEY_SCROLL_PX);
                }
            }
            return outcome;
        }

        if self.scroll.at_zoom_end() && self.reveal.is_closed() {
            if key.is_backward() {
                self.scroll.apply_delta(-nudge);
                self.reveal.close();
            } else {
                self.reveal.accumulate(GALLERY_KEY_SCROLL_PX);
            }
            return outcome;
        }

        if key.is_forward() {
            self.scroll.apply_delta(nudge);
        } else {
            self.scroll.apply_delta(-nudge);
        }
        outcome
    }

    fn toggle_rotation(&mut self) -> Command {
        self.rotation_enabled = !self.rotation_enabled;
        log::debug!("[keys] rotation {}", self.rotation_enabled);
        Command::RotationToggled {
            enabled: self.rotation_enabled,
        }
    }

    fn navigate_back(&mut self, now_ms: f64, out: &mut Vec<Command>) {
        if self.navigating {
            return;
        }
        self.navigating = true;
        log::info!("[scroll] leaving through the top edge");
        out.push(Command::FadeOut);
        self.deferred
            .schedule(now_ms, NAVIGATE_DELAY_MS, Deferred::Navigate);
    }

    fn gesture_start(&mut self, now_ms: f64) {
        if let Some(token) = self.rotate_start.take() {
            self.deferred.cancel(token);
        }
        self.rotate_start = Some(self.deferred.schedule(
            now_ms,
            GESTURE_START_DEBOUNCE_MS,
            Deferred::BeginRotation,
        ));
    }

    fn gesture_end(&mut self) {
        if let Some(token) = self.rotate_start.take() {
            self.deferred.cancel(token);
        }
        if self.zoom.end_rotation() {
            self.orienter.arm();
        }
    }

    fn pick_page(&self, pos: Vec2) -> Option<u32> {
        if self.overlay.is_shown() || !self.reveal.is_closed() {
            return None;
        }
        let ndc = pixel_to_ndc(
            pos.x,
            pos.y,
            self.viewport.width as f32,
            self.viewport.height as f32,
        );
        let (origin, dir) = self.last_camera.ray_through_ndc(ndc);
        let index = self.orbit.pick(origin, dir, self.last_billboard)?;
        self.orbit.page_of(index)
    }

    fn apply_overlay_effects(&mut self, effects: Vec<OverlayEffect>, out: &mut Vec<Command>) {
        for effect in effects {
            match effect {
                OverlayEffect::ShowOverlay => out.push(Command::ShowOverlay),
                OverlayEffect::HideOverlay => out.push(Command::HideOverlay),
                OverlayEffect::PlayIntro { resume } => out.push(Command::PlayIntro { resume }),
                OverlayEffect::PauseIntro => out.push(Command::PauseIntro),
                OverlayEffect::PauseBackgroundMedia => {
                    let cmds = self.scheduler.pause_all();
                    out.extend(cmds.into_iter().map(Command::Video));
                }
                OverlayEffect::ResumeBackgroundMedia => {
                    if !self.heavy_paused {
                        self.scheduler.resume_all();
                    }
                }
            }
        }
    }

    fn skip_intro(&mut self, now_ms: f64, out: &mut Vec<Command>) {
        let mut effects = Vec::new();
        if !self.overlay.force_hide(now_ms, &mut effects) {
            return;
        }
        log::info!("[overlay] intro skipped");
        self.apply_overlay_effects(effects, out);
        let nudge = self.overlay.skip_nudge(self.config.scroll.max_overlay);
        self.scroll.apply_delta(nudge);
    }

    fn intro_finished(&mut self, now_ms: f64, out: &mut Vec<Command>) {
        let mut effects = Vec::new();
        if !self.overlay.force_hide(now_ms, &mut effects) {
            return;
        }
        log::info!("[overlay] intro finished");
        out.push(Command::EndIntro);
        self.apply_overlay_effects(effects, out);
        let floor = self.overlay.post_end_floor(self.config.scroll.max_overlay);
        self.scroll.raise_floor(floor);
        if self.mobile_portrait {
            self.scroll
                .auto_scroll_to_fraction(1.0, POST_END_DURATION_MS, now_ms);
            self.mobile_zoom_locked = true;
            self.deferred
                .schedule(now_ms, MOBILE_POST_END_SNAP_MS, Deferred::SnapToZoomEnd);
        } else {
            self.scroll
                .auto_scroll_to_fraction(POST_END_FRACTION, POST_END_DURATION_MS, now_ms);
        }
    }

    fn resize(&mut self, viewport: Viewport, now_ms: f64) {
        self.viewport = viewport;
        let was_mobile = self.mobile_portrait;
        self.mobile_portrait = viewport.is_mobile_portrait();
        if self.mobile_portrait == was_mobile {
            return;
        }
        log::info!("[scroll] mobile portrait -> {}", self.mobile_portrait);
        self.zoom.set_disabled(self.mobile_portrait);
        if self.mobile_portrait {
            self.scroll.jump_to(self.scroll.upper_bound());
            self.mobile_zoom_locked = true;
        } else {
            self.mobile_zoom_locked = false;
            self.scroll
                .auto_scroll_to_fraction(ENTRY_FRACTION, ENTRY_DURATION_MS, now_ms);
        }
    }

    fn pause_heavy(&mut self, out: &mut Vec<Command>) {
        if self.heavy_paused {
            return;
        }
        self.heavy_paused = true;
        log::debug!("[playback] heavy pause");
        let cmds = self.scheduler.pause_all();
        out.extend(cmds.into_iter().map(Command::Video));
        out.push(Command::PauseIntro);
    }

    /// Resumes only once neither the gallery nor the case viewer covers the scene.
    fn resume_heavy(&mut self) {
        if !self.heavy_paused || self.case_viewer_open || self.reveal.is_open() {
            return;
        }
        self.heavy_paused = false;
        log::debug!("[playback] heavy resume");
        if !self.overlay.is_shown() {
            self.scheduler.resume_all();
        }
    }

    fn run_deferred(&mut self, task: Deferred, now_ms: f64, out: &mut Vec<Command>) {
        match task {
            Deferred::BeginRotation => {
                self.rotate_start = None;
                self.zoom.begin_rotation(self.rig.distance());
            }
            Deferred::Navigate => out.push(Command::Navigate {
                url: NAVIGATE_BACK_URL.to_string(),
            }),
            Deferred::EntryAutoScroll => {
                if self.mobile_portrait {
                    self.scroll
                        .auto_scroll_to_fraction(1.0, MOBILE_ENTRY_DURATION_MS, now_ms);
                    self.mobile_zoom_locked = true;
                } else {
                    self.scroll
                        .auto_scroll_to_fraction(ENTRY_FRACTION, ENTRY_DURATION_MS, now_ms);
                }
            }
            Deferred::SnapToZoomEnd => self.scroll.jump_to(self.scroll.upper_bound()),
            Deferred::RetryPlay { index } => {
                if self.scheduler.should_retry(index) {
                    out.push(Command::Video(PlaybackCommand::play(index)));
                }
            }
        }
    }

    fn cta_should_show(&self) -> bool {
        !self.overlay.is_shown()
            && self.reveal.progress() <= REVEAL_CTA_EPSILON
            && self.scroll.at_zoom_end()
    }

    /// Advance one animation frame. `has_frame` reports whether an orbit
    /// video has decoded data to upload.
    pub fn frame(&mut self, now_ms: f64, has_frame: impl Fn(usize) -> bool) -> FrameOutput {
        let mut commands = Vec::new();

        for task in self.deferred.drain_due(now_ms) {
            self.run_deferred(task, now_ms, &mut commands);
        }

        let dt = self.scroll.tick(now_ms) as f32;
        if self.scroll.tween().is_none()
            && self.mobile_portrait
            && !self.mobile_zoom_locked
            && !self.overlay.is_shown()
            && self.reveal.is_closed()
            && self.scroll.at_zoom_end()
        {
            self.mobile_zoom_locked = true;
        }

        // without an intro overlay the top of the range is plain scroll space
        if self.config.has_intro {
            if self.overlay.is_shown() {
                let opacity = self
                    .overlay
                    .fade_opacity(self.scroll.accumulator(), self.config.scroll.max_overlay);
                commands.push(Command::SetOverlayOpacity(opacity));
            }
            let mut effects = Vec::new();
            if self
                .overlay
                .evaluate(self.scroll.overlay_progress(), now_ms, &mut effects)
                .is_some()
            {
                self.apply_overlay_effects(effects, &mut commands);
            }
        }

        let zoom_progress = self.scroll.zoom_progress() as f32;
        self.rig.update();
        let distance = self.zoom.step(zoom_progress, dt);
        if zoom_progress < CAMERA_RESET_PROGRESS {
            self.rig.reset_home();
        } else {
            self.rig.place_at_distance(distance);
        }

        let euler = self.orienter.step(zoom_progress, Vec3::ZERO, self.rig.eye());
        let asterisk_rotation = euler_xyz(euler.extend(0.0));

        match self.reveal.step() {
            Some(RevealEdge::Opened) => {
                log::info!("[gallery] open");
                self.pause_heavy(&mut commands);
                commands.push(Command::GalleryStateChanged { open: true });
            }
            Some(RevealEdge::Closed) => {
                log::info!("[gallery] closed");
                self.resume_heavy();
                commands.push(Command::GalleryStateChanged { open: false });
            }
            None => {}
        }
        let gallery_frame = self.reveal.frame();
        if self.last_gallery_frame != Some(gallery_frame) {
            self.last_gallery_frame = Some(gallery_frame);
            commands.push(Command::GalleryFrame(gallery_frame));
        }

        let cta = self.cta_should_show();
        if cta != self.cta_visible {
            self.cta_visible = cta;
            commands.push(Command::SetCtaVisible(cta));
        }

        if self.rotation_enabled {
            self.orbit.advance(true);
        }
        let camera = self.rig.camera(self.viewport.aspect());
        let billboard = billboard_rotation(&camera);
        let surfaces = self.orbit.surface_poses(billboard);

        let play_all = !self.overlay.is_shown() && self.reveal.progress() <= PLAY_ALL_MAX_REVEAL;
        let playback = self.scheduler.update(&surfaces, camera.eye, play_all);
        commands.extend(playback.into_iter().map(Command::Video));
        let texture_uploads = self.textures.due(self.scheduler.videos(), has_frame);

        self.last_camera = camera.clone();
        self.last_billboard = billboard;

        FrameOutput {
            commands,
            camera,
            asterisk_rotation,
            billboard,
            surfaces,
            texture_uploads,
            render_scene: !self.overlay.is_shown() && !self.reveal.is_open(),
        }
    }
}
