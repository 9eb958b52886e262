use asterisk_core::{Event, PlayRejection};
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::app::App;
use crate::constants::{
    CLASS_HIDDEN, CLASS_MUTED, INTRO_MUTE_ID, INTRO_OVERLAY_ID, INTRO_SKIP_ID, INTRO_VIDEO_ID,
};
use crate::dom;

/// The intro video overlay at the top of the scroll range.
pub struct IntroOverlay {
    root: web::HtmlElement,
    video: Option<web::HtmlVideoElement>,
    mute_btn: Option<web::HtmlElement>,
    // playback position when the overlay was last hidden
    remembered_time: Cell<f64>,
}

impl IntroOverlay {
    pub fn from_document(document: &web::Document) -> Option<Self> {
        let root = dom::by_id::<web::HtmlElement>(document, INTRO_OVERLAY_ID)?;
        Some(Self {
            root,
            video: dom::by_id(document, INTRO_VIDEO_ID),
            mute_btn: dom::by_id(document, INTRO_MUTE_ID),
            remembered_time: Cell::new(0.0),
        })
    }

    /// Source the preloader should fetch first.
    pub fn video_source(&self) -> Option<String> {
        let v = self.video.as_ref()?;
        let src = v.current_src();
        if !src.is_empty() {
            return Some(src);
        }
        v.get_attribute("src")
    }

    pub fn video(&self) -> Option<&web::HtmlVideoElement> {
        self.video.as_ref()
    }

    pub fn show(&self) {
        dom::set_class(&self.root, CLASS_HIDDEN, false);
        dom::set_style(&self.root, "opacity", "1");
        _ = self.root.set_attribute("aria-hidden", "false");
    }

    pub fn hide(&self) {
        dom::set_class(&self.root, CLASS_HIDDEN, true);
        dom::set_style(&self.root, "opacity", "0");
        _ = self.root.set_attribute("aria-hidden", "true");
    }

    pub fn set_opacity(&self, opacity: f64) {
        dom::set_style(&self.root, "opacity", &format!("{:.3}", opacity.clamp(0.0, 1.0)));
    }

    /// Start muted so autoplay is allowed, then put the user's mute choice
    /// back once playback has actually begun.
    pub fn play(&self, resume: bool) {
        let Some(v) = self.video.clone() else {
            return;
        };
        let was_muted = v.muted();
        v.set_muted(true);
        let remembered = self.remembered_time.get();
        if resume && !v.ended() && remembered > 0.0 {
            v.set_current_time(remembered);
        } else {
            v.set_current_time(0.0);
        }
        match v.play() {
            Ok(promise) => spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => v.set_muted(was_muted),
                    Err(e) => {
                        if PlayRejection::from_error_name(&dom::error_name(&e))
                            != PlayRejection::Abort
                        {
                            log::warn!("[overlay] intro play rejected: {:?}", e);
                        }
                    }
                }
            }),
            Err(e) => log::warn!("[overlay] intro play failed: {:?}", e),
        }
    }

    pub fn pause(&self) {
        if let Some(v) = &self.video {
            if !v.paused() {
                self.remembered_time.set(v.current_time());
            }
            _ = v.pause();
        }
    }

    /// The intro ran to completion; it does not loop on later visits.
    pub fn end(&self) {
        if let Some(v) = &self.video {
            v.set_loop(false);
            _ = v.pause();
        }
        self.remembered_time.set(0.0);
    }

    fn toggle_mute(&self) {
        let (Some(v), Some(btn)) = (&self.video, &self.mute_btn) else {
            return;
        };
        let muted = !v.muted();
        v.set_muted(muted);
        dom::set_class(btn, CLASS_MUTED, muted);
        _ = btn.set_attribute("aria-pressed", if muted { "true" } else { "false" });
    }

    pub fn wire(app: &Rc<App>) {
        let Some(intro) = app.intro.as_ref() else {
            return;
        };
        if let Some(v) = &intro.video {
            let a = app.clone();
            dom::listen(v, "playing", move |_: web::Event| {
                a.dispatch(Event::IntroPlaying);
            });
            let a = app.clone();
            dom::listen(v, "ended", move |_: web::Event| {
                a.dispatch(Event::IntroEnded);
            });
        }
        if let Some(document) = dom::window_document() {
            let a = app.clone();
            dom::add_click_listener(&document, INTRO_SKIP_ID, move |ev| {
                ev.stop_propagation();
                if a.dispatch(Event::SkipIntro) {
                    ev.prevent_default();
                }
            });
            let a = app.clone();
            dom::add_click_listener(&document, INTRO_MUTE_ID, move |ev| {
                ev.stop_propagation();
                if let Some(intro) = a.intro.as_ref() {
                    intro.toggle_mute();
                }
            });
        }

        // double tap anywhere but the buttons ends the intro
        let a = app.clone();
        dom::listen_active(&intro.root, "touchend", move |ev: web::TouchEvent| {
            let on_button = ev
                .target()
                .and_then(|t| t.dyn_into::<web::Element>().ok())
                .and_then(|el| el.closest(&format!("#{}, #{}", INTRO_SKIP_ID, INTRO_MUTE_ID)).ok())
                .flatten()
                .is_some();
            if on_button {
                return;
            }
            let pos = ev
                .changed_touches()
                .get(0)
                .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32));
            if a.dispatch(Event::IntroTap { pos }) {
                ev.prevent_default();
            }
        });
    }
}
