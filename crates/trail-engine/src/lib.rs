pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod extensions;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{Capabilities, TrailConfig};
pub use api::engine::TrailEngine;
pub use api::error::TrailError;
pub use api::types::{ElementId, EnginePhase, GateRejection, SpawnOutcome};
pub use assets::loader::{AtlasLoader, AtlasState, FetchAttempt, FetchOutcome, FetchRequest, LoadedAtlas};
pub use assets::manifest::AtlasDescriptor;
pub use components::element::{ElementStyle, Keyframe};
pub use components::rect::Rect;
pub use components::sprite::{SpriteCell, SpriteGrid};
pub use crate::core::pool::{Acquired, ElementPool, Released};
pub use crate::core::zones::{ExclusionZone, NoZones, StaticZones, ZoneKind, ZoneMargins, ZoneProvider};
pub use extensions::Easing;
pub use renderer::{HeadlessSurface, Host, Surface, SurfaceEvent, Transition};
