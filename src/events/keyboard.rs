use asterisk_core::{Event, Key};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::app::App;
use crate::dom;

/// Keys typed into form fields belong to the field.
fn is_editable_target(ev: &web::KeyboardEvent) -> bool {
    let Some(el) = ev.target().and_then(|t| t.dyn_into::<web::HtmlElement>().ok()) else {
        return false;
    };
    el.is_content_editable() || matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
}

pub fn wire(app: &Rc<App>) {
    let Some(window) = web::window() else {
        return;
    };
    let a = app.clone();
    dom::listen_active(&window, "keydown", move |ev: web::KeyboardEvent| {
        if ev.alt_key() || ev.ctrl_key() || ev.meta_key() || is_editable_target(&ev) {
            return;
        }
        let Some(key) = Key::from_dom(&ev.key(), &ev.code()) else {
            return;
        };
        let event = Event::Key {
            key,
            gallery_scroll_top: a.gallery_scroll_top(),
        };
        if a.dispatch(event) {
            ev.prevent_default();
        }
    });
}
