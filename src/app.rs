use asterisk_core::{Command, Director, Event};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

use crate::case_viewer::CaseViewer;
use crate::constants::{CLASS_FADE_OUT, CLASS_ROTATION_ON, ROTATION_TOGGLE_ID};
use crate::dom;
use crate::gallery::Gallery;
use crate::media::{OrbitVideos, Preloader};
use crate::overlay::IntroOverlay;

/// Page handles plus the director that decides what happens to them.
///
/// Every DOM callback goes through [`App::dispatch`]; nothing else mutates
/// the director outside the frame loop.
pub struct App {
    pub director: RefCell<Director>,
    pub canvas: web::HtmlCanvasElement,
    pub intro: Option<IntroOverlay>,
    pub gallery: Option<Gallery>,
    pub case_viewer: Option<CaseViewer>,
    pub orbit_videos: OrbitVideos,
    pub preloader: Preloader,
    rotation_btn: Option<web::HtmlElement>,
}

impl App {
    pub fn new(
        document: &web::Document,
        canvas: web::HtmlCanvasElement,
        director: Director,
    ) -> Rc<Self> {
        let app = Self {
            director: RefCell::new(director),
            canvas,
            intro: IntroOverlay::from_document(document),
            gallery: Gallery::from_document(document),
            case_viewer: CaseViewer::from_document(document),
            orbit_videos: OrbitVideos::new(document),
            preloader: Preloader::new(),
            rotation_btn: dom::by_id(document, ROTATION_TOGGLE_ID),
        };
        log::info!(
            "[app] intro={} gallery={} case_viewer={} videos={}",
            app.intro.is_some(),
            app.gallery.is_some(),
            app.case_viewer.is_some(),
            app.orbit_videos.len()
        );
        Rc::new(app)
    }

    pub fn gallery_scroll_top(&self) -> f64 {
        self.gallery.as_ref().map_or(0.0, Gallery::scroll_top)
    }

    /// Feed one event to the director and carry out what it asks for.
    /// Returns whether the DOM event should have its default prevented.
    pub fn dispatch(self: &Rc<Self>, event: Event) -> bool {
        let outcome = {
            let Ok(mut director) = self.director.try_borrow_mut() else {
                log::warn!("[app] re-entrant dispatch of {:?} dropped", event);
                return false;
            };
            director.handle(event, instant::now())
        };
        self.run(outcome.commands);
        outcome.prevent_default
    }

    pub fn run(self: &Rc<Self>, commands: Vec<Command>) {
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(self: &Rc<Self>, command: Command) {
        log::debug!("[app] {:?}", command);
        match command {
            Command::ShowOverlay => {
                if let Some(intro) = &self.intro {
                    intro.show();
                }
            }
            Command::HideOverlay => {
                if let Some(intro) = &self.intro {
                    intro.hide();
                }
            }
            Command::SetOverlayOpacity(opacity) => {
                if let Some(intro) = &self.intro {
                    intro.set_opacity(opacity);
                }
            }
            Command::PlayIntro { resume } => {
                if let Some(intro) = &self.intro {
                    intro.play(resume);
                }
            }
            Command::PauseIntro => {
                if let Some(intro) = &self.intro {
                    intro.pause();
                }
            }
            Command::EndIntro => {
                if let Some(intro) = &self.intro {
                    intro.end();
                }
            }
            Command::Video(cmd) => OrbitVideos::apply(self, cmd),
            Command::FadeOut => {
                if let Some(body) = dom::window_document().and_then(|d| d.body()) {
                    dom::set_class(&body, CLASS_FADE_OUT, true);
                }
            }
            Command::Navigate { url } => {
                log::info!("[app] navigating to {}", url);
                if let Some(w) = web::window() {
                    if let Err(e) = w.location().set_href(&url) {
                        log::error!("navigation failed: {:?}", e);
                    }
                }
            }
            Command::ScrollGallery { by } => {
                if let Some(g) = &self.gallery {
                    g.scroll_by(by);
                }
            }
            Command::GalleryFrame(frame) => {
                if let Some(g) = &self.gallery {
                    g.apply_frame(frame);
                }
            }
            Command::GalleryStateChanged { open } => {
                if let Some(g) = &self.gallery {
                    g.on_open_changed(open);
                }
            }
            Command::SetCtaVisible(visible) => {
                if let Some(g) = &self.gallery {
                    g.set_cta_visible(visible);
                }
            }
            Command::RotationToggled { enabled } => {
                if let Some(btn) = &self.rotation_btn {
                    dom::set_class(btn, CLASS_ROTATION_ON, enabled);
                    _ = btn.set_attribute("aria-pressed", if enabled { "true" } else { "false" });
                }
            }
            Command::CloseCaseViewer => CaseViewer::close(self),
            Command::CollapseExpanded => {
                Gallery::collapse_all(self);
            }
            Command::OpenCaseStudy { page } => CaseViewer::open_page(self, page),
        }
    }
}
