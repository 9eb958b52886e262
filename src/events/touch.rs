use asterisk_core::Event;
use std::rc::Rc;
use web_sys as web;

use crate::app::App;
use crate::dom;

fn first_touch_y(ev: &web::TouchEvent) -> Option<f64> {
    ev.touches().get(0).map(|t| t.client_y() as f64)
}

pub fn wire(app: &Rc<App>) {
    let Some(window) = web::window() else {
        return;
    };
    let a = app.clone();
    dom::listen(&window, "touchstart", move |ev: web::TouchEvent| {
        if let Some(y) = first_touch_y(&ev) {
            a.dispatch(Event::TouchStart { y });
        }
    });
    let a = app.clone();
    dom::listen_active(&window, "touchmove", move |ev: web::TouchEvent| {
        let Some(y) = first_touch_y(&ev) else {
            return;
        };
        let event = Event::TouchMove {
            y,
            gallery_scroll_top: a.gallery_scroll_top(),
        };
        if a.dispatch(event) && ev.cancelable() {
            ev.prevent_default();
        }
    });
}
