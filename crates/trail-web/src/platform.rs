//! Browser facts and clocks.

use trail_engine::Capabilities;
use wasm_bindgen::JsValue;
use web_sys::Window;

/// Milliseconds on the page's monotonic clock (same origin as event timestamps).
pub fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Sample touch support and the reduced-motion preference once.
pub fn detect_capabilities(window: &Window) -> Capabilities {
    let has_touch_handler = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    let touch = has_touch_handler || window.navigator().max_touch_points() > 0;
    let reduced_motion = window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());
    Capabilities { touch, reduced_motion }
}

/// Current viewport size in CSS pixels.
pub fn viewport(window: &Window) -> (f32, f32) {
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    (read(window.inner_width()), read(window.inner_height()))
}
