#![cfg(target_arch = "wasm32")]
use asterisk_core::{Director, DirectorConfig, EntryMode, PreloadPlan};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod case_viewer;
mod chrome;
mod constants;
mod dom;
mod events;
mod frame;
mod gallery;
mod markup;
mod media;
mod overlay;
mod render;
mod timers;

use app::App;
use case_viewer::CaseViewer;
use chrome::Chrome;
use gallery::Gallery;
use media::{OrbitVideos, Preloader};
use overlay::IntroOverlay;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("asterisk-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::sync_canvas_backing_size(&canvas);

    let has_intro = document.get_element_by_id(constants::INTRO_OVERLAY_ID).is_some();
    let config = if has_intro {
        DirectorConfig::with_intro()
    } else {
        DirectorConfig::default()
    };
    let entry = EntryMode::from_query(&dom::location_search());
    log::info!("[app] entry={:?} intro={}", entry, has_intro);
    let director = Director::new(config, entry, dom::viewport(), instant::now());

    let app = App::new(&document, canvas.clone(), director);
    IntroOverlay::wire(&app);
    OrbitVideos::wire(&app);
    Gallery::wire(&app);
    CaseViewer::wire(&app);
    Chrome::wire(&document);
    if let Some(root) = document.document_element() {
        chrome::wire_detail_video_hovers(&root, false);
    }
    events::wire_all(&app);

    if let Some(g) = &app.gallery {
        g.sync_vars();
        g.relayout();
    }
    let initial = app.director.borrow_mut().initial_commands();
    app.run(initial);

    let intro_src = app.intro.as_ref().and_then(IntroOverlay::video_source);
    Preloader::run(app.clone(), PreloadPlan::for_page(intro_src.as_deref()));

    let gpu = frame::init_gpu(&canvas, app.orbit_videos.len()).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(app, gpu)));
    frame::start_loop(frame_ctx);
    Ok(())
}
