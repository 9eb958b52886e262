use asterisk_core::constants::TARGET_FPS;
use asterisk_core::FrameThrottle;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::app::App;
use crate::dom;
use crate::render::{GpuState, SceneDraw};

pub struct FrameContext {
    pub app: Rc<App>,
    pub gpu: Option<GpuState>,
    pub throttle: FrameThrottle,
    // a transparent frame has been presented since the scene was last drawn
    cleared: bool,
}

impl FrameContext {
    pub fn new(app: Rc<App>, gpu: Option<GpuState>) -> Self {
        Self {
            app,
            gpu,
            throttle: FrameThrottle::new(TARGET_FPS),
            cleared: false,
        }
    }

    pub fn frame(&mut self) {
        let now = instant::now();
        if !self.throttle.ready(now) {
            return;
        }

        let (out, scene) = {
            let app = &self.app;
            let Ok(mut director) = app.director.try_borrow_mut() else {
                return;
            };
            let out = director.frame(now, |i| app.orbit_videos.has_frame(i));
            let scene = out
                .render_scene
                .then(|| SceneDraw::from_frame(&out, director.orbit()));
            (out, scene)
        };

        self.app.run(out.commands);
        if let Some(gallery) = &self.app.gallery {
            gallery.tick();
        }

        let Some(g) = &mut self.gpu else {
            return;
        };
        for &index in &out.texture_uploads {
            if let Some(video) = self.app.orbit_videos.get(index) {
                g.upload_video(index, video);
            }
        }

        match scene {
            Some(scene) => {
                let (w, h) = dom::sync_canvas_backing_size(&self.app.canvas);
                g.resize_if_needed(w, h);
                if let Err(e) = g.render(&scene) {
                    log::error!("render error: {:?}", e);
                }
                self.cleared = false;
            }
            None if !self.cleared => {
                if let Err(e) = g.clear() {
                    log::error!("render error: {:?}", e);
                }
                self.cleared = true;
            }
            None => {}
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement, video_count: usize) -> Option<GpuState> {
    match GpuState::new(canvas, video_count).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
