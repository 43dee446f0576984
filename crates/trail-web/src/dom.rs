//! Trail elements as fixed-position `<div>`s, animated with CSS transitions.

use std::collections::HashMap;

use trail_engine::{ElementId, ElementStyle, FetchOutcome, FetchRequest, Host, Keyframe, LoadedAtlas, Rect, Surface, Transition};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlImageElement, Window};

use crate::config::WebConfig;
use crate::platform;

struct DomElement {
    node: HtmlElement,
    visible: bool,
}

/// `Host` over the live page. Callbacks it registers re-enter the engine
/// through the bridge's thread-local.
pub struct DomHost {
    window: Window,
    document: Document,
    parent: HtmlElement,
    class_name: String,
    z_index: i32,
    atlas_url: Option<String>,
    elements: HashMap<ElementId, DomElement>,
}

impl DomHost {
    pub fn new(window: Window, document: Document, config: &WebConfig) -> Result<Self, JsValue> {
        let parent = document.body().ok_or_else(|| JsValue::from_str("document has no <body>"))?;
        Ok(Self {
            window,
            document,
            parent,
            class_name: config.class_name.clone(),
            z_index: config.z_index,
            atlas_url: None,
            elements: HashMap::new(),
        })
    }

    pub fn now_ms(&self) -> f64 {
        platform::now_ms(&self.window)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn node(&self, id: ElementId) -> Option<&HtmlElement> {
        self.elements.get(&id).map(|e| &e.node)
    }
}

fn set_styles(node: &HtmlElement, properties: &[(&str, &str)]) {
    let style = node.style();
    for (name, value) in properties {
        if let Err(err) = style.set_property(name, value) {
            log::warn!("trail: cannot set {}: {:?}", name, err);
        }
    }
}

fn px(value: f32) -> String {
    format!("{}px", value)
}

impl Surface for DomHost {
    fn create(&mut self, id: ElementId) {
        let node = match self.document.create_element("div").map(|el| el.dyn_into::<HtmlElement>()) {
            Ok(Ok(node)) => node,
            _ => {
                log::warn!("trail: cannot create element {:?}", id);
                return;
            }
        };
        node.set_class_name(&self.class_name);
        set_styles(
            &node,
            &[
                ("position", "fixed"),
                ("pointer-events", "none"),
                ("background-repeat", "no-repeat"),
                ("will-change", "opacity, transform"),
                ("z-index", self.z_index.to_string().as_str()),
                ("display", "none"),
            ],
        );
        if let Err(err) = self.parent.append_child(&node) {
            log::warn!("trail: cannot attach element {:?}: {:?}", id, err);
            return;
        }
        self.elements.insert(id, DomElement { node, visible: false });
    }

    fn show(&mut self, id: ElementId, style: &ElementStyle) {
        let image = self.atlas_url.as_ref().map(|url| format!("url(\"{}\")", url)).unwrap_or_default();
        let Some(element) = self.elements.get_mut(&id) else { return };
        let node = &element.node;
        set_styles(
            node,
            &[
                ("transition", "none"),
                ("display", "block"),
                ("left", px(style.top_left.x).as_str()),
                ("top", px(style.top_left.y).as_str()),
                ("width", px(style.size).as_str()),
                ("height", px(style.size).as_str()),
                ("background-image", image.as_str()),
                ("background-size", format!("{} {}", px(style.background_size.x), px(style.background_size.y)).as_str()),
                ("background-position", format!("{} {}", px(-style.crop_offset.x), px(-style.crop_offset.y)).as_str()),
                ("opacity", style.keyframe.opacity.to_string().as_str()),
                ("transform", style.keyframe.css_transform().as_str()),
            ],
        );
        // Commit the start state so the next transition runs from it.
        let _ = node.offset_width();
        element.visible = true;
    }

    fn animate_to(&mut self, id: ElementId, target: &Keyframe, transition: Transition, _now_ms: f64) {
        let Some(node) = self.node(id) else { return };
        let timing = format!("{}ms {}", transition.duration_ms, transition.easing.css());
        set_styles(
            node,
            &[
                ("transition", format!("opacity {timing}, transform {timing}").as_str()),
                ("opacity", target.opacity.to_string().as_str()),
                ("transform", target.css_transform().as_str()),
            ],
        );
    }

    fn hide(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get_mut(&id) {
            set_styles(&element.node, &[("transition", "none"), ("display", "none")]);
            element.visible = false;
        }
    }

    fn destroy(&mut self, id: ElementId) {
        if let Some(element) = self.elements.remove(&id) {
            element.node.remove();
        }
    }

    fn bounds(&self, id: ElementId, _now_ms: f64) -> Option<Rect> {
        let element = self.elements.get(&id).filter(|e| e.visible)?;
        let r = element.node.get_bounding_client_rect();
        Some(Rect::new(r.x() as f32, r.y() as f32, r.width() as f32, r.height() as f32))
    }
}

impl Host for DomHost {
    fn fetch_atlas(&mut self, request: &FetchRequest) -> bool {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                log::warn!("trail: cannot create image: {:?}", err);
                return false;
            }
        };

        let url = request.url.clone();
        let loaded = image.clone();
        let on_load = Closure::once_into_js(move || {
            crate::handle_atlas(FetchOutcome::Loaded {
                url,
                width: loaded.natural_width(),
                height: loaded.natural_height(),
            });
        });
        let url = request.url.clone();
        let on_error = Closure::once_into_js(move || {
            crate::handle_atlas(FetchOutcome::Failed { url });
        });
        image.set_onload(Some(on_load.unchecked_ref()));
        image.set_onerror(Some(on_error.unchecked_ref()));
        image.set_src(&request.url);
        true
    }

    fn atlas_ready(&mut self, atlas: &LoadedAtlas) {
        self.atlas_url = Some(atlas.url.clone());
    }

    fn request_frame(&mut self) {
        let callback = Closure::once_into_js(move |timestamp: f64| crate::handle_frame(timestamp));
        if let Err(err) = self.window.request_animation_frame(callback.unchecked_ref()) {
            log::warn!("trail: requestAnimationFrame failed: {:?}", err);
        }
    }

    fn request_timer(&mut self, at_ms: f64) {
        let delay = (at_ms - self.now_ms()).ceil().max(0.0) as i32;
        let callback = Closure::once_into_js(move || crate::handle_timer(at_ms));
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            log::warn!("trail: setTimeout failed: {:?}", err);
        }
    }
}
