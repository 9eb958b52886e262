use asterisk_core::constants::{FOCUS_RETRY_MS, PREVIEW_DETACH_MS, RESIZE_DEBOUNCE_MS};
use asterisk_core::{
    default_ratio, focus_scroll_target, AspectRatio, Event, ExpansionSet, GalleryItem,
    LayoutError, MasonryConfig, MasonryEngine, MasonryLayout, RevealFrame, Tier,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::app::App;
use crate::constants::*;
use crate::dom;
use crate::markup;
use crate::timers::{self, Timeout};

struct GalleryState {
    engine: MasonryEngine,
    items: Vec<GalleryItem>,
    expansion: ExpansionSet,
    layout: Option<MasonryLayout>,
    // an expanded card had no height yet; retry on the next frame
    relayout_pending: bool,
    resize_timer: Option<Timeout>,
    focus_timer: Option<Timeout>,
    detach_timers: Vec<Option<Timeout>>,
    observer: Option<web::IntersectionObserver>,
}

/// The project gallery panel: masonry grid, expandable cards and hover
/// previews.
pub struct Gallery {
    overlay: web::HtmlElement,
    scroll: web::HtmlElement,
    list: web::HtmlElement,
    cta: Option<web::HtmlElement>,
    cards: Vec<web::HtmlElement>,
    previews: Vec<Option<web::HtmlVideoElement>>,
    state: RefCell<GalleryState>,
}

fn card_ratio(card: &web::HtmlElement) -> Option<AspectRatio> {
    if let Some(r) = card.get_attribute("data-ratio") {
        return Some(AspectRatio::parse_or_square(&r));
    }
    let preview = dom::query::<web::Element>(card, CARD_PREVIEW_SELECTOR)?;
    let style = web::window()?.get_computed_style(&preview).ok()??;
    let ar = style.get_property_value("--card-ar").ok()?;
    let normalized = markup::normalize_ratio(&ar)?;
    _ = card.set_attribute("data-ratio", &normalized);
    Some(AspectRatio::parse_or_square(&normalized))
}

fn gallery_items(cards: &[web::HtmlElement]) -> Vec<GalleryItem> {
    let any_featured = cards.iter().any(|c| c.has_attribute("data-featured"));
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let ratio = card_ratio(card).unwrap_or_else(|| default_ratio(i, any_featured));
            let tier = Tier::from_attr(card.get_attribute("data-tier").as_deref());
            GalleryItem::new(ratio, tier)
        })
        .collect()
}

/// Park the preview clip behind its poster until the card is hovered.
fn detach_preview(v: &web::HtmlVideoElement) {
    let src = v.get_attribute("src").unwrap_or_else(|| v.current_src());
    if !src.is_empty() {
        let poster = v
            .get_attribute("data-poster")
            .unwrap_or_else(|| markup::poster_for(&src, PREVIEW_VIDEO_DIR, PREVIEW_THUMB_DIR));
        v.set_poster(&poster);
        _ = v.set_attribute("data-src", &src);
        _ = v.remove_attribute("src");
    }
    _ = v.remove_attribute("autoplay");
    v.set_loop(false);
    v.set_preload("none");
    v.load();
}

fn computed_px(el: &web::Element, prop: &str) -> Option<f64> {
    let style = web::window()?.get_computed_style(el).ok()??;
    markup::parse_px(&style.get_property_value(prop).ok()?)
}

impl Gallery {
    pub fn from_document(document: &web::Document) -> Option<Self> {
        let overlay = dom::by_id::<web::HtmlElement>(document, GALLERY_OVERLAY_ID)?;
        let scroll = dom::by_id::<web::HtmlElement>(document, GALLERY_SCROLL_ID)?;
        let list = dom::by_id::<web::HtmlElement>(document, GALLERY_LIST_ID)?;
        let cta = dom::by_id(document, GALLERY_CTA_ID);
        let cards: Vec<web::HtmlElement> = dom::query_all(&list, CARD_SELECTOR);
        let previews: Vec<Option<web::HtmlVideoElement>> = cards
            .iter()
            .map(|c| dom::query(c, PREVIEW_VIDEO_SELECTOR))
            .collect();
        for v in previews.iter().flatten() {
            detach_preview(v);
        }
        let items = gallery_items(&cards);
        log::info!("[gallery] {} cards", cards.len());
        let state = GalleryState {
            engine: MasonryEngine::new(cards.len(), MasonryConfig::default()),
            items,
            expansion: ExpansionSet::default(),
            layout: None,
            relayout_pending: false,
            resize_timer: None,
            focus_timer: None,
            detach_timers: cards.iter().map(|_| None).collect(),
            observer: None,
        };
        Some(Self {
            overlay,
            scroll,
            list,
            cta,
            cards,
            previews,
            state: RefCell::new(state),
        })
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll.scroll_top() as f64
    }

    pub fn scroll_by(&self, dy: f64) {
        self.scroll.scroll_by_with_x_and_y(0.0, dy);
    }

    pub fn apply_frame(&self, frame: RevealFrame) {
        dom::set_style(&self.overlay, "transform", &markup::translate_y_pct(frame.translate_pct));
        dom::set_style(&self.overlay, "opacity", &format!("{:.3}", frame.opacity));
        dom::set_style(
            &self.overlay,
            "pointer-events",
            if frame.interactive { "auto" } else { "none" },
        );
        dom::set_class(&self.overlay, CLASS_IS_OPEN, frame.interactive);
        _ = self
            .overlay
            .set_attribute("aria-hidden", if frame.progress > 0.0 { "false" } else { "true" });
    }

    pub fn set_cta_visible(&self, visible: bool) {
        if let Some(cta) = &self.cta {
            dom::set_class(cta, CLASS_VISIBLE, visible);
            _ = cta.set_attribute("aria-hidden", if visible { "false" } else { "true" });
            cta.set_tab_index(if visible { 0 } else { -1 });
        }
    }

    /// Publish the panel size as CSS variables for the stylesheet and
    /// [`Gallery::focus`].
    pub fn sync_vars(&self) {
        let rect = self.overlay.get_bounding_client_rect();
        let header = dom::query::<web::HtmlElement>(&self.overlay, GALLERY_HEADER_SELECTOR)
            .map(|h| h.offset_height() as f64)
            .unwrap_or(0.0);
        let content = (rect.height() - header - GALLERY_VERTICAL_PADDING).max(0.0);
        let style = self.overlay.style();
        _ = style.set_property("--gallery-w", &markup::px(rect.width()));
        _ = style.set_property("--gallery-h", &markup::px(rect.height()));
        _ = style.set_property("--gallery-content-max-h", &markup::px(content));
    }

    fn available_width(&self) -> f64 {
        let pad = computed_px(&self.scroll, "padding-left").unwrap_or(0.0)
            + computed_px(&self.scroll, "padding-right").unwrap_or(0.0);
        let avail = self.scroll.client_width() as f64 - pad;
        if avail > 0.0 {
            return avail;
        }
        self.overlay.get_bounding_client_rect().width() - pad
    }

    /// Natural height of a card laid out at `width`, restoring its inline
    /// style afterwards.
    fn measure_card(&self, item: usize, width: f64) -> Option<f64> {
        let card = self.cards.get(item)?;
        let style = card.style();
        let saved: Vec<(&str, String)> = ["visibility", "transform", "width", "height", "content-visibility"]
            .into_iter()
            .map(|p| (p, style.get_property_value(p).unwrap_or_default()))
            .collect();
        _ = style.set_property("visibility", "hidden");
        _ = style.set_property("transform", "none");
        _ = style.set_property("width", &markup::px(width));
        _ = style.set_property("height", "auto");
        _ = style.set_property("content-visibility", "visible");
        let measured = card.get_bounding_client_rect().height().ceil();
        for (prop, value) in saved {
            if value.is_empty() {
                _ = style.remove_property(prop);
            } else {
                _ = style.set_property(prop, &value);
            }
        }
        (measured > 0.0).then_some(measured)
    }

    /// One masonry pass. Returns `false` when it has to be retried.
    pub fn relayout(&self) -> bool {
        let viewport_width = dom::viewport().width;
        let avail = self.available_width();
        let mut st = self.state.borrow_mut();
        let grid = st.engine.grid_for_width(avail, viewport_width);
        let mut measure = |i: usize, w: f64| self.measure_card(i, w);
        let result = st.engine.pack(&st.items, &grid, &mut measure);
        match result {
            Ok(layout) => {
                dom::set_class(&self.list, CLASS_MASONRY_ON, true);
                dom::set_style(&self.list, "width", &markup::px(layout.container_width));
                dom::set_style(&self.list, "height", &markup::px(layout.container_height));
                for p in &layout.placements {
                    let Some(card) = self.cards.get(p.item) else {
                        continue;
                    };
                    let style = card.style();
                    _ = style.set_property("position", "absolute");
                    _ = style.set_property("width", &markup::px(p.width));
                    _ = style.set_property("height", &markup::px(p.height));
                    _ = style.set_property("transform", &markup::translate(p.x, p.y));
                    _ = style.set_property("z-index", &p.z_index.to_string());
                    if st.items[p.item].expanded {
                        _ = style.set_property("content-visibility", "visible");
                    }
                }
                log::debug!(
                    "[masonry] {} cols, {:.0}x{:.0}",
                    layout.cols,
                    layout.container_width,
                    layout.container_height
                );
                st.layout = Some(layout);
                st.relayout_pending = false;
                true
            }
            Err(LayoutError::PendingMeasurement { item }) => {
                log::debug!("[masonry] card {} not measurable yet", item);
                st.relayout_pending = true;
                false
            }
            Err(e) => {
                log::warn!("[masonry] {}", e);
                st.relayout_pending = false;
                false
            }
        }
    }

    /// Per-frame hook: finish a layout that was waiting on a measurement.
    pub fn tick(&self) {
        if self.state.borrow().relayout_pending {
            self.relayout();
        }
    }

    pub fn schedule_relayout(app: &Rc<App>) {
        let Some(gallery) = app.gallery.as_ref() else {
            return;
        };
        let a = app.clone();
        let mut st = gallery.state.borrow_mut();
        timers::debounce(&mut st.resize_timer, RESIZE_DEBOUNCE_MS, move || {
            if let Some(g) = a.gallery.as_ref() {
                g.sync_vars();
                g.relayout();
            }
        });
    }

    pub fn on_open_changed(&self, open: bool) {
        self.sync_vars();
        if open {
            self.relayout();
        }
    }

    fn detail_video(&self, item: usize) -> Option<web::HtmlVideoElement> {
        dom::query(self.cards.get(item)?, DETAIL_VIDEO_SELECTOR)
    }

    fn set_expanded_class(&self, item: usize, expanded: bool) {
        let Some(card) = self.cards.get(item) else {
            return;
        };
        dom::set_class(card, CLASS_EXPANDED, expanded);
        if expanded {
            self.copy_preview_ratio(card);
        } else {
            let style = card.style();
            _ = style.remove_property("content-visibility");
            _ = style.remove_property("contain-intrinsic-size");
            if let Some(v) = self.detail_video(item) {
                _ = v.pause();
                v.set_current_time(0.0);
            }
        }
    }

    /// Give the detail panel the preview's aspect until the video reports its own.
    fn copy_preview_ratio(&self, card: &web::HtmlElement) {
        let Some(details) = dom::query::<web::HtmlElement>(card, CARD_DETAILS_SELECTOR) else {
            return;
        };
        let style = details.style();
        if !style.get_property_value("--video-ar").unwrap_or_default().is_empty() {
            return;
        }
        let ar = dom::query::<web::Element>(card, CARD_PREVIEW_SELECTOR)
            .and_then(|p| web::window()?.get_computed_style(&p).ok()?)
            .and_then(|cs| cs.get_property_value("--card-ar").ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(ar) = ar {
            _ = style.set_property("--video-ar", &ar);
        }
    }

    pub fn toggle(app: &Rc<App>, item: usize) {
        let Some(gallery) = app.gallery.as_ref() else {
            return;
        };
        let (change, any) = {
            let mut st = gallery.state.borrow_mut();
            let st = &mut *st;
            let change = st.expansion.toggle(item);
            st.expansion.apply_to(&mut st.items);
            (change, st.expansion.is_any_expanded())
        };
        if let Some(prev) = change.collapsed {
            gallery.set_expanded_class(prev, false);
        }
        if let Some(next) = change.expanded {
            gallery.set_expanded_class(next, true);
        }
        log::debug!("[gallery] card {} -> {:?}", item, change.expanded);
        app.dispatch(Event::CardExpanded(any));

        // two frames so the class change has been styled before measuring
        let a = app.clone();
        timers::next_frame(move || {
            timers::next_frame(move || {
                let Some(g) = a.gallery.as_ref() else {
                    return;
                };
                g.relayout();
                if let Some(next) = change.expanded {
                    if let Some(v) = g.detail_video(next) {
                        v.set_muted(true);
                        play_quietly(&v);
                    }
                    Gallery::focus(&a, next);
                }
            });
        });
    }

    /// Collapse whichever card is open. Returns whether anything changed.
    pub fn collapse_all(app: &Rc<App>) -> bool {
        let Some(gallery) = app.gallery.as_ref() else {
            return false;
        };
        let collapsed = {
            let mut st = gallery.state.borrow_mut();
            let st = &mut *st;
            let collapsed = st.expansion.collapse_all();
            st.expansion.apply_to(&mut st.items);
            collapsed
        };
        let Some(item) = collapsed else {
            return false;
        };
        gallery.set_expanded_class(item, false);
        gallery.relayout();
        app.dispatch(Event::CardExpanded(false));
        true
    }

    /// Scroll so the expanded card's video sits in the middle of the panel,
    /// retrying while its height is still settling.
    pub fn focus(app: &Rc<App>, item: usize) {
        let Some(g) = app.gallery.as_ref() else {
            return;
        };
        let Some(card) = g.cards.get(item) else {
            return;
        };
        if !g.state.borrow().expansion.expanded().is_some_and(|e| e == item) {
            return;
        }
        let viewport_h = computed_px(&g.overlay, "--gallery-content-max-h")
            .filter(|h| *h > 0.0)
            .unwrap_or_else(|| {
                let ch = g.scroll.client_height() as f64;
                if ch > 0.0 {
                    ch
                } else {
                    g.overlay.client_height() as f64 - GALLERY_CHROME_FALLBACK
                }
            });
        let scroller_rect = g.scroll.get_bounding_client_rect();
        let scroll_top = g.scroll_top();
        let (anchor_top, anchor_h) =
            match dom::query::<web::HtmlElement>(card, VIDEO_WRAPPER_SELECTOR) {
                Some(vw) => {
                    let r = vw.get_bounding_client_rect();
                    (scroll_top + r.top() - scroller_rect.top(), r.height())
                }
                None => {
                    let r = card.get_bounding_client_rect();
                    let cached = g
                        .state
                        .borrow()
                        .layout
                        .as_ref()
                        .and_then(|l| l.placement_for(item).map(|p| p.y));
                    let top = cached.unwrap_or(scroll_top + r.top() - scroller_rect.top());
                    (top, r.height())
                }
            };
        match focus_scroll_target(
            anchor_top,
            anchor_h,
            viewport_h,
            g.scroll.scroll_height() as f64,
            g.scroll.client_height() as f64,
        ) {
            Some(target) => g.scroll.set_scroll_top(target.round() as i32),
            None => {
                let a = app.clone();
                let mut st = g.state.borrow_mut();
                timers::debounce(&mut st.focus_timer, FOCUS_RETRY_MS, move || {
                    Gallery::focus(&a, item);
                });
            }
        }
    }

    /// The card whose `data-page` names `page`.
    pub fn card_for_page(&self, page: u32) -> Option<&web::HtmlElement> {
        self.cards
            .iter()
            .find(|c| markup::page_matches(c.get_attribute("data-page").as_deref(), page))
    }

    fn activate_preview(&self, item: usize) {
        let Some(Some(v)) = self.previews.get(item) else {
            return;
        };
        if let Some(mut t) = self.state.borrow_mut().detach_timers[item].take() {
            t.cancel();
        }
        if v.get_attribute("src").is_none() {
            if let Some(src) = v.get_attribute("data-src") {
                v.set_src(&src);
                v.load();
            }
        }
        v.set_preload("auto");
        v.set_muted(true);
        _ = v.set_attribute("playsinline", "");
        play_quietly(v);
    }

    fn deactivate_preview(app: &Rc<App>, item: usize) {
        let Some(g) = app.gallery.as_ref() else {
            return;
        };
        let Some(Some(v)) = g.previews.get(item) else {
            return;
        };
        _ = v.pause();
        v.set_current_time(0.0);
        let v = v.clone();
        let mut st = g.state.borrow_mut();
        timers::debounce(&mut st.detach_timers[item], PREVIEW_DETACH_MS, move || {
            if v.paused() {
                _ = v.remove_attribute("src");
                v.load();
            }
        });
    }

    pub fn wire(app: &Rc<App>) {
        let Some(g) = app.gallery.as_ref() else {
            return;
        };
        if let Some(document) = dom::window_document() {
            let a = app.clone();
            dom::add_click_listener(&document, GALLERY_CLOSE_ID, move |ev| {
                if a.dispatch(Event::CloseGallery) {
                    ev.prevent_default();
                }
            });
        }
        if let Some(cta) = &g.cta {
            let a = app.clone();
            dom::listen(cta, "click", move |_: web::MouseEvent| {
                a.dispatch(Event::OpenGallery);
            });
            let a = app.clone();
            dom::listen(cta, "keydown", move |ev: web::KeyboardEvent| {
                let key = ev.key();
                if key == "Enter" || key == " " {
                    ev.prevent_default();
                    ev.stop_propagation();
                    a.dispatch(Event::OpenGallery);
                }
            });
        }

        for (i, card) in g.cards.iter().enumerate() {
            if let Some(preview) = dom::query::<web::Element>(card, CARD_PREVIEW_SELECTOR) {
                let a = app.clone();
                dom::listen(&preview, "click", move |_: web::MouseEvent| {
                    Gallery::toggle(&a, i);
                });
            }
            if let Some(btn) = dom::query::<web::Element>(card, CARD_COLLAPSE_SELECTOR) {
                let a = app.clone();
                dom::listen(&btn, "click", move |ev: web::MouseEvent| {
                    ev.stop_propagation();
                    let expanded = a
                        .gallery
                        .as_ref()
                        .and_then(|g| g.state.borrow().expansion.expanded());
                    if expanded == Some(i) {
                        Gallery::toggle(&a, i);
                    }
                });
            }
            if let Some(v) = g.detail_video(i) {
                let a = app.clone();
                let card = card.clone();
                let video = v.clone();
                dom::listen(&v, "loadedmetadata", move |_: web::Event| {
                    let (w, h) = (video.video_width(), video.video_height());
                    if w > 0 && h > 0 {
                        if let Some(details) =
                            dom::query::<web::HtmlElement>(&card, CARD_DETAILS_SELECTOR)
                        {
                            dom::set_style(&details, "--video-ar", &format!("{}/{}", w, h));
                        }
                    }
                    Gallery::schedule_relayout(&a);
                });
            }
            if g.previews[i].is_none() {
                continue;
            }
            for ev_name in ["mouseenter", "touchstart"] {
                let a = app.clone();
                dom::listen(card, ev_name, move |_: web::Event| {
                    if let Some(g) = a.gallery.as_ref() {
                        g.activate_preview(i);
                    }
                });
            }
            for ev_name in ["mouseleave", "touchend", "touchcancel"] {
                let a = app.clone();
                dom::listen(card, ev_name, move |_: web::Event| {
                    Gallery::deactivate_preview(&a, i);
                });
            }
        }

        Gallery::observe_previews(app);
    }

    /// Previews that scroll out of the panel are stopped and unloaded.
    fn observe_previews(app: &Rc<App>) {
        let Some(g) = app.gallery.as_ref() else {
            return;
        };
        let a = app.clone();
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _: web::IntersectionObserver| {
                let Some(g) = a.gallery.as_ref() else {
                    return;
                };
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        continue;
                    }
                    let target: web::Node = entry.target().into();
                    let found = g
                        .previews
                        .iter()
                        .position(|p| p.as_ref().is_some_and(|v| v.is_same_node(Some(&target))));
                    if let Some(i) = found {
                        Gallery::deactivate_preview(&a, i);
                    }
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);
        let init = web::IntersectionObserverInit::new();
        _ = js_sys::Reflect::set(&init, &JsValue::from_str("root"), &g.scroll);
        _ = js_sys::Reflect::set(
            &init,
            &JsValue::from_str("threshold"),
            &JsValue::from_f64(PREVIEW_INTERSECTION_THRESHOLD),
        );
        match web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                for v in g.previews.iter().flatten() {
                    observer.observe(v);
                }
                g.state.borrow_mut().observer = Some(observer);
            }
            Err(e) => log::warn!("[gallery] IntersectionObserver unavailable: {:?}", e),
        }
        callback.forget();
    }
}

/// `play()` whose rejection is only worth a warning when it was not an abort.
pub fn play_quietly(v: &web::HtmlMediaElement) {
    let Ok(promise) = v.play() else {
        return;
    };
    spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            if dom::error_name(&e) != "AbortError" {
                log::warn!("[gallery] video play error: {:?}", e);
            }
        }
    });
}
