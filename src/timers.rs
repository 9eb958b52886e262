use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// A pending `setTimeout`. `cancel()` clears it; dropping the handle leaves
/// it armed.
pub struct Timeout {
    id: Option<i32>,
}

impl Timeout {
    pub fn new(delay_ms: f64, callback: impl FnOnce() + 'static) -> Self {
        let closure = Closure::once_into_js(callback);
        let id = web::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.unchecked_ref(),
                delay_ms.max(0.0) as i32,
            )
            .ok()
        });
        Self { id }
    }

    pub fn cancel(&mut self) {
        if let (Some(id), Some(w)) = (self.id.take(), web::window()) {
            w.clear_timeout_with_handle(id);
        }
    }
}

/// Replace whatever was pending in `slot` with a fresh timeout.
pub fn debounce(slot: &mut Option<Timeout>, delay_ms: f64, callback: impl FnOnce() + 'static) {
    if let Some(mut prev) = slot.take() {
        prev.cancel();
    }
    *slot = Some(Timeout::new(delay_ms, callback));
}

pub async fn sleep(ms: f64) {
    if ms <= 0.0 {
        return;
    }
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(w) = web::window() {
            _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        } else {
            _ = resolve.call0(&JsValue::NULL);
        }
    });
    _ = JsFuture::from(promise).await;
}

/// Run `f` on the next animation frame.
pub fn next_frame(f: impl FnOnce() + 'static) {
    let closure = Closure::once_into_js(f);
    if let Some(w) = web::window() {
        _ = w.request_animation_frame(closure.unchecked_ref());
    }
}
