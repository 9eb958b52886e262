use asterisk_core::Event;
use std::rc::Rc;
use web_sys as web;

use crate::app::App;
use crate::dom;

const LINE_HEIGHT_PX: f64 = 16.0;

/// Wheel deltas in CSS pixels whatever `deltaMode` the browser reports.
fn delta_px(ev: &web::WheelEvent) -> f64 {
    match ev.delta_mode() {
        web::WheelEvent::DOM_DELTA_LINE => ev.delta_y() * LINE_HEIGHT_PX,
        web::WheelEvent::DOM_DELTA_PAGE => ev.delta_y() * dom::viewport().height,
        _ => ev.delta_y(),
    }
}

pub fn wire(app: &Rc<App>) {
    let Some(window) = web::window() else {
        return;
    };
    let a = app.clone();
    dom::listen_active(&window, "wheel", move |ev: web::WheelEvent| {
        let event = Event::Wheel {
            delta_y: delta_px(&ev),
            gallery_scroll_top: a.gallery_scroll_top(),
        };
        if a.dispatch(event) {
            ev.prevent_default();
        }
    });
}
