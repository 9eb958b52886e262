use asterisk_core::Event;
use glam::Vec2;
use std::rc::Rc;
use web_sys as web;

use crate::app::App;
use crate::dom;

/// Pointer position in CSS pixels relative to the canvas.
fn canvas_pos(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        (ev.client_x() as f64 - rect.left()) as f32,
        (ev.client_y() as f64 - rect.top()) as f32,
    )
}

pub fn wire(app: &Rc<App>) {
    let canvas = app.canvas.clone();

    let a = app.clone();
    let c = canvas.clone();
    dom::listen(&canvas, "pointerdown", move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        _ = c.set_pointer_capture(ev.pointer_id());
        a.dispatch(Event::PointerDown {
            pos: canvas_pos(&ev, &c),
        });
    });

    let a = app.clone();
    let c = canvas.clone();
    dom::listen(&canvas, "pointermove", move |ev: web::PointerEvent| {
        if ev.buttons() == 0 {
            return;
        }
        a.dispatch(Event::PointerMove {
            pos: canvas_pos(&ev, &c),
        });
    });

    for name in ["pointerup", "pointercancel"] {
        let a = app.clone();
        let c = canvas.clone();
        dom::listen(&canvas, name, move |ev: web::PointerEvent| {
            _ = c.release_pointer_capture(ev.pointer_id());
            a.dispatch(Event::PointerUp {
                pos: canvas_pos(&ev, &c),
            });
        });
    }
}
