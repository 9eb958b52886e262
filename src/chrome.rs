use rand::Rng;
use web_sys as web;

use crate::constants::*;
use crate::dom;
use crate::markup;
use crate::timers::Timeout;

/// Page furniture outside the scene: the hamburger menu and the delayed
/// hints.
pub struct Chrome;

impl Chrome {
    pub fn wire(document: &web::Document) {
        Self::wire_menu(document);
        if markup::is_about_page(&dom::location_pathname()) {
            return;
        }
        for id in [INSTRUCTIONS_ID, HAMBURGER_ID] {
            Self::reveal_later(document, id, CHROME_REVEAL_DELAY_MS);
        }
    }

    fn wire_menu(document: &web::Document) {
        let Some(root) = document.document_element() else {
            return;
        };
        let nav = dom::query::<web::Element>(&root, NAVIGATION_SELECTOR);
        let burger = dom::query::<web::Element>(&root, HAMBURGER_SELECTOR);
        if let (Some(nav), Some(burger)) = (nav, burger) {
            let b = burger.clone();
            dom::listen(&burger, "click", move |_: web::MouseEvent| {
                let open = nav.class_list().toggle(CLASS_MENU_ACTIVE).unwrap_or(false);
                dom::set_class(&b, CLASS_MENU_OPENED, open);
                log::debug!("[menu] open={}", open);
            });
        }

        for link in dom::query_all::<web::HtmlElement>(&root, NAV_LINK_SELECTOR) {
            let l = link.clone();
            dom::listen(&link, "mouseenter", move |_: web::MouseEvent| {
                let angle = rand::thread_rng().gen_range(-NAV_TILT_DEG..NAV_TILT_DEG);
                dom::set_style(&l, "--rand-rotate", &markup::rotate_deg(angle));
            });
        }
    }

    /// Hide `id` now and bring it back with the reveal class after `delay_ms`.
    fn reveal_later(document: &web::Document, id: &str, delay_ms: f64) {
        let Some(el) = dom::by_id::<web::HtmlElement>(document, id) else {
            return;
        };
        dom::set_style(&el, "display", "none");
        // fires once for the page lifetime, the handle is not kept
        _ = Timeout::new(delay_ms, move || {
            _ = el.style().remove_property("display");
            dom::set_class(&el, CLASS_REVEALED, true);
        });
    }
}

/// Hover clips inside card details: play from the start on enter or touch,
/// pause and rewind on leave. `force` rebinds clones that carry the bound
/// marker without its listeners.
pub fn wire_detail_video_hovers(scope: &web::Element, force: bool) {
    const BOUND: &str = "data-hover-bound";
    for wrapper in dom::query_all::<web::Element>(scope, DETAIL_HOVER_WRAP_SELECTOR) {
        if force {
            _ = wrapper.remove_attribute(BOUND);
        }
        if wrapper.has_attribute(BOUND) {
            continue;
        }
        let Some(video) = dom::query::<web::HtmlVideoElement>(&wrapper, DETAIL_HOVER_VIDEO_SELECTOR)
        else {
            continue;
        };

        let start = {
            let v = video.clone();
            move || {
                if v.get_attribute("src").is_none() {
                    if let Some(src) = v.get_attribute("data-src") {
                        v.set_src(&src);
                    }
                }
                v.set_preload("auto");
                v.set_current_time(0.0);
                crate::gallery::play_quietly(&v);
            }
        };
        let end = {
            let v = video.clone();
            move || {
                _ = v.pause();
                v.set_current_time(0.0);
            }
        };

        let s = start.clone();
        dom::listen(&wrapper, "mouseenter", move |_: web::Event| s());
        dom::listen_passive(&wrapper, "touchstart", move |_: web::Event| start());
        for event in ["mouseleave", "touchend", "touchcancel"] {
            let e = end.clone();
            dom::listen(&wrapper, event, move |_: web::Event| e());
        }
        _ = wrapper.set_attribute(BOUND, "1");
    }
}
