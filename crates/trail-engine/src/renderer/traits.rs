//! Seams between the engine and whatever draws and schedules for it.
//!
//! The browser bridge implements these over the DOM; `HeadlessSurface`
//! implements them in memory with its own interpolation driver.

use crate::api::types::ElementId;
use crate::assets::loader::{FetchRequest, LoadedAtlas};
use crate::components::element::{ElementStyle, Keyframe};
use crate::components::rect::Rect;
use crate::extensions::easing::Easing;

/// How a surface should interpolate between two keyframes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration_ms: f64,
    pub easing: Easing,
}

/// Draws trail elements. Every call names an element the engine created;
/// surfaces never invent ids.
pub trait Surface {
    /// Construct a new element and attach it to the page, hidden.
    fn create(&mut self, id: ElementId);

    /// Show the element with `style`, without any transition.
    fn show(&mut self, id: ElementId, style: &ElementStyle);

    /// Move towards `target` over `transition`, starting at `now_ms`.
    fn animate_to(&mut self, id: ElementId, target: &Keyframe, transition: Transition, now_ms: f64);

    /// Hide the element and keep it for reuse.
    fn hide(&mut self, id: ElementId);

    /// Detach the element permanently.
    fn destroy(&mut self, id: ElementId);

    /// Current on-screen bounds, if the element exists and is visible.
    fn bounds(&self, id: ElementId, now_ms: f64) -> Option<Rect>;
}

/// Platform services the engine asks for: image fetches, frame callbacks
/// and timers. Each request is answered by calling back into the engine
/// (`on_atlas_fetched`, `on_animation_frame`, `tick`).
pub trait Host: Surface {
    /// Begin fetching the atlas image. Returns `false` if the fetch could
    /// not be started at all; the engine then treats it as failed.
    fn fetch_atlas(&mut self, request: &FetchRequest) -> bool;

    /// The atlas finished loading; elements shown from now on use it.
    fn atlas_ready(&mut self, atlas: &LoadedAtlas);

    /// Call `on_animation_frame` on the next frame opportunity.
    fn request_frame(&mut self);

    /// Call `tick` no earlier than `at_ms`.
    fn request_timer(&mut self, at_ms: f64);
}
