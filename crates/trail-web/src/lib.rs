//! Browser bridge for the cursor trail.
//!
//! The page calls `trail_init` once; after that the bridge listens for
//! pointer and resize events itself (unless `listen` is off, in which case
//! the page forwards them through `trail_pointer_move` and `trail_resize`).

pub mod config;
pub mod dom;
pub mod platform;
pub mod zones;

use std::cell::RefCell;

use trail_engine::{FetchOutcome, NoZones, TrailEngine};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use config::WebConfig;
use dom::DomHost;
use zones::DomZoneProvider;

thread_local! {
    static ENGINE: RefCell<Option<TrailEngine<DomHost>>> = RefCell::new(None);
}

/// Run `f` against the engine. `None` before init, or if a handler is
/// already running further up the stack.
fn with_engine<R>(f: impl FnOnce(&mut TrailEngine<DomHost>) -> R) -> Option<R> {
    ENGINE.with(|cell| {
        let Ok(mut borrow) = cell.try_borrow_mut() else {
            log::warn!("trail: re-entrant call dropped");
            return None;
        };
        borrow.as_mut().map(f)
    })
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Fill `slot` with `build()` unless it already holds a value. Returns
/// whether a new value was stored; `build` only runs for an empty slot.
fn store_once<T, E>(slot: &RefCell<Option<T>>, build: impl FnOnce() -> Result<T, E>) -> Result<bool, E> {
    if slot.borrow().is_some() {
        return Ok(false);
    }
    let value = build()?;
    *slot.borrow_mut() = Some(value);
    Ok(true)
}

/// Build the engine from a JSON config (empty string for defaults).
/// Later calls are ignored; the page keeps the first engine.
#[wasm_bindgen]
pub fn trail_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut listen = false;
    let stored = ENGINE.with(|cell| {
        store_once(cell, || {
            let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
            let config = WebConfig::from_json(config_json).map_err(to_js)?;
            let capabilities = platform::detect_capabilities(&window);
            listen = config.listen;

            let host = DomHost::new(window.clone(), document.clone(), &config)?;
            let engine = TrailEngine::new(config.trail, capabilities, host).map_err(to_js)?;
            let engine = if config.zones.is_empty() {
                engine.with_zone_provider(NoZones)
            } else {
                engine.with_zone_provider(DomZoneProvider::new(document, config.zones))
            };
            log::info!("trail: initialized ({:?})", capabilities);
            Ok::<_, JsValue>(engine)
        })
    })?;

    if !stored {
        log::warn!("trail: already initialized, ignoring trail_init");
        return Ok(());
    }
    if listen {
        install_listeners(&window)?;
    }
    Ok(())
}

fn install_listeners(window: &web_sys::Window) -> Result<(), JsValue> {
    let on_move = Closure::<dyn FnMut(web_sys::PointerEvent)>::new(|event: web_sys::PointerEvent| {
        trail_pointer_move(event.client_x() as f32, event.client_y() as f32, event.time_stamp());
    });
    window.add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let target = window.clone();
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        let (width, height) = platform::viewport(&target);
        trail_resize(width, height);
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

/// Feed one pointer sample. Returns whether an element was spawned.
#[wasm_bindgen]
pub fn trail_pointer_move(x: f32, y: f32, timestamp_ms: f64) -> bool {
    with_engine(|e| e.on_pointer_move(x, y, timestamp_ms).is_spawned()).unwrap_or(false)
}

/// Viewport changed. Returns how many stranded elements were reclaimed.
#[wasm_bindgen]
pub fn trail_resize(width: f32, height: f32) -> u32 {
    with_engine(|e| {
        let now = e.host().now_ms();
        e.on_resize(width, height, now) as u32
    })
    .unwrap_or(0)
}

#[wasm_bindgen]
pub fn trail_active_count() -> u32 {
    with_engine(|e| e.pool().active_len() as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn trail_parked_count() -> u32 {
    with_engine(|e| e.pool().parked_len() as u32).unwrap_or(0)
}

/// Lifecycle phase as a string, for debugging from the console.
#[wasm_bindgen]
pub fn trail_phase() -> String {
    with_engine(|e| format!("{:?}", e.phase())).unwrap_or_else(|| "Uninitialized".to_string())
}

pub(crate) fn handle_atlas(outcome: FetchOutcome) {
    with_engine(|e| {
        let now = e.host().now_ms();
        e.on_atlas_fetched(outcome, now);
    });
}

pub(crate) fn handle_frame(timestamp_ms: f64) {
    with_engine(|e| e.on_animation_frame(timestamp_ms));
}

/// Timers may fire a hair before their deadline on the page clock.
pub(crate) fn handle_timer(deadline_ms: f64) {
    with_engine(|e| {
        let now = e.host().now_ms().max(deadline_ms);
        e.tick(now);
    });
}
