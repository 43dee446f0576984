//! In-memory surface for non-browser hosts and tests.
//!
//! Records every call and carries its own interpolation driver: keyframes
//! are evaluated on demand from the transition start time and easing.

use std::collections::BTreeMap;
use crate::api::types::ElementId;
use crate::assets::loader::{FetchRequest, LoadedAtlas};
use crate::components::element::{ElementStyle, Keyframe};
use crate::components::rect::Rect;
use crate::extensions::easing::progress;
use super::traits::{Host, Surface, Transition};

/// One recorded surface call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Created(ElementId),
    Shown(ElementId),
    Animated(ElementId),
    Hidden(ElementId),
    Destroyed(ElementId),
}

#[derive(Debug, Clone)]
struct ActiveTransition {
    from: Keyframe,
    to: Keyframe,
    start_ms: f64,
    transition: Transition,
}

#[derive(Debug, Clone)]
struct HeadlessElement {
    style: ElementStyle,
    visible: bool,
    transition: Option<ActiveTransition>,
}

impl HeadlessElement {
    fn keyframe_at(&self, now_ms: f64) -> Keyframe {
        match &self.transition {
            Some(tr) => {
                let t = progress(tr.start_ms, tr.transition.duration_ms, now_ms);
                tr.from.lerp(&tr.to, tr.transition.easing.apply(t))
            }
            None => self.style.keyframe,
        }
    }
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    elements: BTreeMap<ElementId, HeadlessElement>,
    events: Vec<SurfaceEvent>,
    fetches: Vec<FetchRequest>,
    atlas: Option<LoadedAtlas>,
    frame_requests: usize,
    timers: Vec<f64>,
    refuse_fetches: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpolated keyframe of an element at `now_ms`.
    pub fn keyframe_at(&self, id: ElementId, now_ms: f64) -> Option<Keyframe> {
        self.elements.get(&id).map(|e| e.keyframe_at(now_ms))
    }

    /// Final keyframe of the running transition, if any.
    pub fn target(&self, id: ElementId) -> Option<Keyframe> {
        self.elements.get(&id)?.transition.as_ref().map(|tr| tr.to)
    }

    pub fn style(&self, id: ElementId) -> Option<&ElementStyle> {
        self.elements.get(&id).map(|e| &e.style)
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(|e| e.visible)
    }

    /// Elements constructed and not yet destroyed.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn fetches(&self) -> &[FetchRequest] {
        &self.fetches
    }

    pub fn atlas(&self) -> Option<&LoadedAtlas> {
        self.atlas.as_ref()
    }

    /// Make every later `fetch_atlas` fail to start.
    pub fn refuse_fetches(&mut self, refuse: bool) {
        self.refuse_fetches = refuse;
    }

    pub fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    pub fn timers(&self) -> &[f64] {
        &self.timers
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut HeadlessElement> {
        let element = self.elements.get_mut(&id);
        if element.is_none() {
            log::warn!("headless surface: unknown element {:?}", id);
        }
        element
    }
}

impl Surface for HeadlessSurface {
    fn create(&mut self, id: ElementId) {
        self.elements.insert(
            id,
            HeadlessElement {
                style: ElementStyle {
                    top_left: glam::Vec2::ZERO,
                    size: 0.0,
                    crop_offset: glam::Vec2::ZERO,
                    background_size: glam::Vec2::ZERO,
                    keyframe: Keyframe::HIDDEN,
                },
                visible: false,
                transition: None,
            },
        );
        self.events.push(SurfaceEvent::Created(id));
    }

    fn show(&mut self, id: ElementId, style: &ElementStyle) {
        if let Some(element) = self.element_mut(id) {
            element.style = *style;
            element.visible = true;
            element.transition = None;
            self.events.push(SurfaceEvent::Shown(id));
        }
    }

    fn animate_to(&mut self, id: ElementId, target: &Keyframe, transition: Transition, now_ms: f64) {
        if let Some(element) = self.element_mut(id) {
            let from = element.keyframe_at(now_ms);
            element.transition = Some(ActiveTransition {
                from,
                to: *target,
                start_ms: now_ms,
                transition,
            });
            self.events.push(SurfaceEvent::Animated(id));
        }
    }

    fn hide(&mut self, id: ElementId) {
        if let Some(element) = self.element_mut(id) {
            element.visible = false;
            element.transition = None;
            element.style.keyframe = Keyframe::HIDDEN;
            self.events.push(SurfaceEvent::Hidden(id));
        }
    }

    fn destroy(&mut self, id: ElementId) {
        if self.elements.remove(&id).is_some() {
            self.events.push(SurfaceEvent::Destroyed(id));
        }
    }

    fn bounds(&self, id: ElementId, now_ms: f64) -> Option<Rect> {
        let element = self.elements.get(&id).filter(|e| e.visible)?;
        Some(element.style.transformed_bounds(&element.keyframe_at(now_ms)))
    }
}

impl Host for HeadlessSurface {
    fn fetch_atlas(&mut self, request: &FetchRequest) -> bool {
        self.fetches.push(request.clone());
        !self.refuse_fetches
    }

    fn atlas_ready(&mut self, atlas: &LoadedAtlas) {
        self.atlas = Some(atlas.clone());
    }

    fn request_frame(&mut self) {
        self.frame_requests += 1;
    }

    fn request_timer(&mut self, at_ms: f64) {
        self.timers.push(at_ms);
    }
}
