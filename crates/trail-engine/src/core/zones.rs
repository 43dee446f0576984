use glam::Vec2;
use serde::{Deserialize, Serialize};
use crate::components::rect::Rect;

/// Kind of page region the trail must stay away from. Each kind carries its
/// own extra buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    /// The rails of the main content container.
    ContentRail,
    /// Text carrying a glossary tooltip.
    Tooltip,
}

/// A region in viewport pixels where spawning is suppressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionZone {
    pub kind: ZoneKind,
    pub rect: Rect,
}

impl ExclusionZone {
    pub fn new(kind: ZoneKind, rect: Rect) -> Self {
        Self { kind, rect }
    }

    /// The left and right edges of a content container as zero-width
    /// zones spanning its height.
    pub fn rails(container: Rect) -> [ExclusionZone; 2] {
        let edge = |x: f32| Rect {
            min: Vec2::new(x, container.min.y),
            max: Vec2::new(x, container.max.y),
        };
        [
            ExclusionZone::new(ZoneKind::ContentRail, edge(container.min.x)),
            ExclusionZone::new(ZoneKind::ContentRail, edge(container.max.x)),
        ]
    }
}

/// Extra margin per zone kind, added on top of the element display size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneMargins {
    pub content_rail: f32,
    pub tooltip: f32,
}

impl Default for ZoneMargins {
    fn default() -> Self {
        Self {
            content_rail: 20.0,
            tooltip: 10.0,
        }
    }
}

impl ZoneMargins {
    pub fn extra(&self, kind: ZoneKind) -> f32 {
        match kind {
            ZoneKind::ContentRail => self.content_rail,
            ZoneKind::Tooltip => self.tooltip,
        }
    }

    /// Buffer applied on every side of a zone of `kind`.
    pub fn buffer(&self, kind: ZoneKind, display_size: f32) -> f32 {
        display_size + self.extra(kind)
    }
}

/// Source of the regions to avoid. Queried once per candidate pointer event;
/// implementations must not cache across calls since layout moves.
pub trait ZoneProvider {
    fn zones(&self) -> Vec<ExclusionZone>;
}

/// Provider for pages without any exclusion zones.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoZones;

impl ZoneProvider for NoZones {
    fn zones(&self) -> Vec<ExclusionZone> {
        Vec::new()
    }
}

/// Fixed list of zones, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticZones(pub Vec<ExclusionZone>);

impl ZoneProvider for StaticZones {
    fn zones(&self) -> Vec<ExclusionZone> {
        self.0.clone()
    }
}

/// Whether `point` falls inside any zone grown by its buffer.
pub fn is_excluded(zones: &[ExclusionZone], point: Vec2, display_size: f32, margins: &ZoneMargins) -> bool {
    zones.iter().any(|zone| {
        zone.rect
            .expand(margins.buffer(zone.kind, display_size))
            .contains(point)
    })
}
