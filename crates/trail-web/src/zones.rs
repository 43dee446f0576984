use trail_engine::{ExclusionZone, Rect, ZoneKind, ZoneProvider};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::config::ZoneSelector;

/// Reads exclusion zones from the live DOM on every query. Selectors that
/// match nothing contribute no zones.
pub struct DomZoneProvider {
    document: Document,
    selectors: Vec<ZoneSelector>,
}

impl DomZoneProvider {
    pub fn new(document: Document, selectors: Vec<ZoneSelector>) -> Self {
        Self { document, selectors }
    }

    fn matches(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("trail: bad zone selector {:?}: {:?}", selector, err);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

fn client_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.x() as f32, r.y() as f32, r.width() as f32, r.height() as f32)
}

impl ZoneProvider for DomZoneProvider {
    fn zones(&self) -> Vec<ExclusionZone> {
        let mut zones = Vec::new();
        for entry in &self.selectors {
            for element in self.matches(&entry.selector) {
                let rect = client_rect(&element);
                match entry.kind {
                    ZoneKind::ContentRail => zones.extend(ExclusionZone::rails(rect)),
                    ZoneKind::Tooltip => zones.push(ExclusionZone::new(ZoneKind::Tooltip, rect)),
                }
            }
        }
        zones
    }
}
