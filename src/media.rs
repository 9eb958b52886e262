use asterisk_core::{
    Event, PlayRejection, PlaybackAction, PlaybackCommand, PreloadPlan, PreloadRegistry,
    PreloadRequest, Priority, Readiness, VIDEO_ENTRIES,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::app::App;
use crate::dom;
use crate::timers;

fn create_video(document: &web::Document, src: &str, preload: &str) -> Option<web::HtmlVideoElement> {
    let v = document
        .create_element("video")
        .ok()?
        .dyn_into::<web::HtmlVideoElement>()
        .ok()?;
    v.set_muted(true);
    _ = v.set_attribute("muted", "");
    _ = v.set_attribute("playsinline", "");
    v.set_cross_origin(Some("anonymous"));
    v.set_preload(preload);
    v.set_src(src);
    Some(v)
}

/// Looping, muted videos textured onto the orbit rectangles, in
/// `VIDEO_ENTRIES` order.
pub struct OrbitVideos {
    videos: Vec<web::HtmlVideoElement>,
}

impl OrbitVideos {
    pub fn new(document: &web::Document) -> Self {
        let videos = VIDEO_ENTRIES
            .iter()
            .filter_map(|entry| {
                let v = create_video(document, entry.source, Priority::High.preload_hint())?;
                v.set_loop(true);
                Some(v)
            })
            .collect::<Vec<_>>();
        if videos.len() != VIDEO_ENTRIES.len() {
            log::warn!(
                "[playback] created {} of {} orbit videos",
                videos.len(),
                VIDEO_ENTRIES.len()
            );
        }
        Self { videos }
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn get(&self, index: usize) -> Option<&web::HtmlVideoElement> {
        self.videos.get(index)
    }

    pub fn find(&self, source: &str) -> Option<&web::HtmlVideoElement> {
        VIDEO_ENTRIES
            .iter()
            .position(|e| e.source == source)
            .and_then(|i| self.videos.get(i))
    }

    /// Decoded data is available for upload.
    pub fn has_frame(&self, index: usize) -> bool {
        self.videos
            .get(index)
            .is_some_and(|v| Readiness::from_ready_state(v.ready_state()) >= Readiness::FirstFrame)
    }

    pub fn apply(app: &Rc<App>, cmd: PlaybackCommand) {
        let Some(v) = app.orbit_videos.get(cmd.index).cloned() else {
            return;
        };
        match cmd.action {
            PlaybackAction::Pause => {
                _ = v.pause();
            }
            PlaybackAction::Play => {
                let index = cmd.index;
                let promise = match v.play() {
                    Ok(p) => p,
                    Err(e) => {
                        log::warn!("[playback] play() threw for video {}: {:?}", index, e);
                        app.dispatch(Event::PlayRejected {
                            index,
                            rejection: PlayRejection::Other,
                        });
                        return;
                    }
                };
                let app = app.clone();
                spawn_local(async move {
                    let event = match JsFuture::from(promise).await {
                        Ok(_) => Event::VideoPlaying { index },
                        Err(e) => {
                            let rejection = PlayRejection::from_error_name(&dom::error_name(&e));
                            if rejection != PlayRejection::Abort {
                                log::warn!("[playback] video {} rejected play: {:?}", index, e);
                            }
                            Event::PlayRejected { index, rejection }
                        }
                    };
                    app.dispatch(event);
                });
            }
        }
    }

    /// Report media errors so failed videos stop being scheduled.
    pub fn wire(app: &Rc<App>) {
        for (index, v) in app.orbit_videos.videos.iter().enumerate() {
            let a = app.clone();
            dom::listen(v, "error", move |_: web::Event| {
                log::warn!("[playback] orbit video {} failed to load", index);
                a.dispatch(Event::MediaFailed { index });
            });
        }
    }
}

/// Resolve once `video` reaches `needed`, reject on a media error.
/// Whichever listener fires first detaches the other.
async fn wait_ready(video: &web::HtmlVideoElement, needed: Readiness) -> Result<(), JsValue> {
    if Readiness::from_ready_state(video.ready_state()) >= needed {
        return Ok(());
    }
    let event = needed.event_name();
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let ok_slot: Rc<RefCell<Option<js_sys::Function>>> = Rc::default();
        let fail_slot: Rc<RefCell<Option<js_sys::Function>>> = Rc::default();

        let (v, sibling) = (video.clone(), fail_slot.clone());
        let ok: js_sys::Function = Closure::once_into_js(move || {
            if let Some(f) = sibling.borrow_mut().take() {
                _ = v.remove_event_listener_with_callback("error", &f);
            }
            _ = resolve.call0(&JsValue::NULL);
        })
        .unchecked_into();

        let (v, sibling) = (video.clone(), ok_slot.clone());
        let fail: js_sys::Function = Closure::once_into_js(move |e: web::Event| {
            if let Some(f) = sibling.borrow_mut().take() {
                _ = v.remove_event_listener_with_callback(event, &f);
            }
            _ = reject.call1(&JsValue::NULL, &e);
        })
        .unchecked_into();

        let opts = web::AddEventListenerOptions::new();
        opts.set_once(true);
        _ = video.add_event_listener_with_callback_and_add_event_listener_options(event, &ok, &opts);
        _ = video.add_event_listener_with_callback_and_add_event_listener_options("error", &fail, &opts);
        *ok_slot.borrow_mut() = Some(ok);
        *fail_slot.borrow_mut() = Some(fail);
    });
    JsFuture::from(promise).await.map(|_| ())
}

/// Runs the startup preload plan one step at a time.
pub struct Preloader {
    registry: RefCell<PreloadRegistry>,
    // detached elements kept alive so their buffers are not dropped
    held: RefCell<Vec<web::HtmlVideoElement>>,
}

impl Preloader {
    pub fn new() -> Self {
        Self {
            registry: RefCell::new(PreloadRegistry::new()),
            held: RefCell::new(Vec::new()),
        }
    }

    fn element_for(
        &self,
        app: &App,
        document: &web::Document,
        source: &str,
        priority: Priority,
    ) -> Option<web::HtmlVideoElement> {
        if let Some(v) = app.orbit_videos.find(source) {
            return Some(v.clone());
        }
        let intro = app.intro.as_ref().and_then(|i| {
            let v = i.video()?;
            (i.video_source().as_deref() == Some(source)).then(|| v.clone())
        });
        if intro.is_some() {
            return intro;
        }
        let v = create_video(document, source, priority.preload_hint())?;
        self.held.borrow_mut().push(v.clone());
        Some(v)
    }

    /// Load `source` to the readiness its priority requires. Failures are
    /// logged and reported as `false`; they never stop the caller.
    pub async fn load(&self, app: &App, source: &str, priority: Priority) -> bool {
        let request = self.registry.borrow_mut().request(source, priority);
        if request == PreloadRequest::AlreadyLoaded {
            return true;
        }
        let Some(document) = dom::window_document() else {
            return false;
        };
        let Some(video) = self.element_for(app, &document, source, priority) else {
            self.registry.borrow_mut().fail(source);
            return false;
        };
        if request == PreloadRequest::Started {
            video.set_preload(priority.preload_hint());
            if video.ready_state() == 0 {
                video.load();
            }
        }
        match wait_ready(&video, priority.required_readiness()).await {
            Ok(()) => {
                self.registry.borrow_mut().complete(source);
                true
            }
            Err(e) => {
                log::warn!("[preload] {} failed: {:?}", source, e);
                self.registry.borrow_mut().fail(source);
                false
            }
        }
    }

    pub fn run(app: Rc<App>, plan: PreloadPlan) {
        spawn_local(async move {
            let mut loaded = 0usize;
            for step in &plan.steps {
                if app.preloader.load(&app, &step.source, step.priority).await {
                    loaded += 1;
                }
                timers::sleep(step.gap_ms).await;
            }
            log::info!("[preload] plan finished: {}/{} loaded", loaded, plan.len());
        });
    }
}

impl Default for Preloader {
    fn default() -> Self {
        Self::new()
    }
}
