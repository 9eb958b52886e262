use asterisk_core::Event;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::app::App;
use crate::constants::*;
use crate::dom;
use crate::gallery::{self, Gallery};

/// Full-screen case study built from a clone of a gallery card.
pub struct CaseViewer {
    overlay: web::HtmlElement,
    content: web::HtmlElement,
}

fn hydrate(video: &web::HtmlVideoElement) {
    if video.get_attribute("src").is_none() {
        if let Some(src) = video.get_attribute("data-src") {
            video.set_src(&src);
        }
    }
    video.set_preload("auto");
    video.load();
}

impl CaseViewer {
    pub fn from_document(document: &web::Document) -> Option<Self> {
        let overlay = dom::by_id::<web::HtmlElement>(document, CASE_OVERLAY_ID)?;
        let content = dom::query::<web::HtmlElement>(&overlay, CASE_CONTENT_SELECTOR)?;
        Some(Self { overlay, content })
    }

    pub fn is_open(&self) -> bool {
        self.overlay.class_list().contains(CLASS_IS_OPEN)
    }

    fn set_page_lock(on: bool) {
        let Some(document) = dom::window_document() else {
            return;
        };
        if let Some(html) = document.document_element() {
            dom::set_class(&html, CLASS_CASE_OPEN, on);
        }
        if let Some(body) = document.body() {
            dom::set_class(&body, CLASS_CASE_OPEN, on);
        }
    }

    fn build_card(card: &web::HtmlElement) -> Option<web::HtmlElement> {
        let clone = card
            .clone_node_with_deep(true)
            .ok()?
            .dyn_into::<web::HtmlElement>()
            .ok()?;
        dom::set_class(&clone, CLASS_CASE_CARD, true);
        dom::set_class(&clone, CLASS_EXPANDED, true);
        let style = clone.style();
        for (prop, value) in [
            ("position", "static"),
            ("transform", "none"),
            ("width", "100%"),
            ("height", "auto"),
        ] {
            _ = style.set_property(prop, value);
        }
        _ = style.remove_property("z-index");
        for sel in [CARD_PREVIEW_SELECTOR, CARD_COLLAPSE_SELECTOR] {
            for el in dom::query_all::<web::Element>(&clone, sel) {
                el.remove();
            }
        }
        if let Some(details) = dom::query::<web::HtmlElement>(&clone, CARD_DETAILS_SELECTOR) {
            dom::set_style(&details, "display", "block");
        }
        Some(clone)
    }

    fn wire_controls(app: &Rc<App>, card: &web::HtmlElement) {
        if let Some(btn) = dom::query::<web::Element>(card, CASE_CLOSE_SELECTOR) {
            let a = app.clone();
            dom::listen(&btn, "click", move |ev: web::MouseEvent| {
                ev.stop_propagation();
                CaseViewer::close(&a);
            });
        }
        let video = dom::query::<web::HtmlVideoElement>(
            card,
            &format!("{} {}", CASE_VIDEO_WRAP_SELECTOR, CASE_VIDEO_SELECTOR),
        )
        .or_else(|| dom::query(card, CASE_VIDEO_SELECTOR));
        let Some(video) = video else {
            return;
        };
        if let Some(btn) = dom::query::<web::Element>(card, CASE_FULLSCREEN_SELECTOR) {
            let v = video.clone();
            dom::listen(&btn, "click", move |ev: web::MouseEvent| {
                ev.stop_propagation();
                if let Err(e) = v.request_fullscreen() {
                    log::warn!("[case] fullscreen refused: {:?}", e);
                }
            });
        }
        if let Some(btn) = dom::query::<web::Element>(card, CASE_MUTE_SELECTOR) {
            let v = video.clone();
            let b = btn.clone();
            dom::listen(&btn, "click", move |ev: web::MouseEvent| {
                ev.stop_propagation();
                let muted = !v.muted();
                v.set_muted(muted);
                dom::set_class(&b, CLASS_MUTED, muted);
            });
        }
        video.set_muted(true);
        video.set_current_time(0.0);
        gallery::play_quietly(&video);
    }

    fn open_card(app: &Rc<App>, card: &web::HtmlElement) {
        let Some(viewer) = app.case_viewer.as_ref() else {
            return;
        };
        let Some(clone) = Self::build_card(card) else {
            log::warn!("[case] could not clone card");
            return;
        };
        viewer.content.set_inner_html("");
        _ = viewer.content.append_child(&clone);
        viewer.content.set_tab_index(-1);
        viewer.content.set_scroll_top(0);
        _ = viewer.content.focus();

        dom::set_class(&viewer.overlay, CLASS_IS_OPEN, true);
        _ = viewer.overlay.set_attribute("aria-hidden", "false");
        Self::set_page_lock(true);

        for v in dom::query_all::<web::HtmlVideoElement>(&clone, "video") {
            hydrate(&v);
        }
        Self::wire_controls(app, &clone);
        crate::chrome::wire_detail_video_hovers(&clone, true);
        app.dispatch(Event::CaseViewer(true));
    }

    /// Open the card whose `data-page` is `page`, collapsing the grid first.
    pub fn open_page(app: &Rc<App>, page: u32) {
        let Some(card) = app
            .gallery
            .as_ref()
            .and_then(|g| g.card_for_page(page))
            .cloned()
        else {
            log::warn!("[case] no card for page {}", page);
            return;
        };
        Gallery::collapse_all(app);
        Self::open_card(app, &card);
    }

    pub fn close(app: &Rc<App>) {
        let Some(viewer) = app.case_viewer.as_ref() else {
            return;
        };
        if !viewer.is_open() {
            return;
        }
        dom::set_class(&viewer.overlay, CLASS_IS_OPEN, false);
        _ = viewer.overlay.set_attribute("aria-hidden", "true");
        for v in dom::query_all::<web::HtmlVideoElement>(&viewer.content, "video") {
            _ = v.pause();
            v.set_current_time(0.0);
        }
        viewer.content.set_inner_html("");
        Self::set_page_lock(false);
        app.dispatch(Event::CaseViewer(false));
    }

    pub fn wire(app: &Rc<App>) {
        let Some(viewer) = app.case_viewer.as_ref() else {
            return;
        };
        let a = app.clone();
        dom::listen(&viewer.overlay, "click", move |ev: web::MouseEvent| {
            let on_backdrop = ev
                .target()
                .and_then(|t| t.dyn_into::<web::Element>().ok())
                .is_some_and(|el| el.class_list().contains(CASE_BACKDROP_CLASS));
            if on_backdrop {
                CaseViewer::close(&a);
            }
        });
    }
}
