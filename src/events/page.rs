use asterisk_core::Event;
use std::rc::Rc;
use web_sys as web;

use crate::app::App;
use crate::constants::ROTATION_TOGGLE_ID;
use crate::dom;
use crate::gallery::Gallery;

fn on_resize(app: &Rc<App>) {
    dom::sync_canvas_backing_size(&app.canvas);
    app.dispatch(Event::Resize(dom::viewport()));
    Gallery::schedule_relayout(app);
}

pub fn wire(app: &Rc<App>) {
    let Some(window) = web::window() else {
        return;
    };
    for name in ["resize", "orientationchange"] {
        let a = app.clone();
        dom::listen(&window, name, move |_: web::Event| on_resize(&a));
    }

    if let Some(document) = window.document() {
        let a = app.clone();
        let d = document.clone();
        dom::listen(&document, "visibilitychange", move |_: web::Event| {
            let hidden = d.visibility_state() == web::VisibilityState::Hidden;
            log::debug!("[page] hidden={}", hidden);
            a.dispatch(Event::Visibility { hidden });
        });

        let a = app.clone();
        dom::add_click_listener(&document, ROTATION_TOGGLE_ID, move |ev| {
            ev.stop_propagation();
            a.dispatch(Event::ToggleRotation);
        });
    }
}
