use serde::{Deserialize, Serialize};
use crate::api::error::TrailError;
use crate::assets::manifest::AtlasDescriptor;
use crate::core::pool::DEFAULT_POOL_CAPACITY;
use crate::core::zones::ZoneMargins;
use crate::extensions::easing::Easing;

/// Tunables for the trail effect. Every field has a default, so a JSON
/// document only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Minimum time between two spawns in milliseconds (default: 70).
    pub spawn_interval_ms: f64,
    /// The pointer must move strictly more than this from the last spawn (default: 15).
    pub movement_threshold_px: f32,
    /// On-screen edge length of a trail element (default: 180).
    pub display_size: f32,
    /// Maximum number of parked elements kept for reuse (default: 50).
    pub pool_capacity: usize,
    /// Time from spawn until the element returns to the pool (default: 2500).
    pub element_lifetime_ms: f64,
    /// Duration of the fade/shrink/rotate transition (default: 2500).
    /// Independent of `element_lifetime_ms`.
    pub fade_duration_ms: f64,
    /// Easing of the fade transition (default: quad_out).
    pub fade_easing: Easing,
    /// Opacity right after spawn (default: 0.9).
    pub initial_opacity: f32,
    /// Scale the element shrinks to (default: 0.3).
    pub end_scale: f32,
    /// End rotation is uniform in [-max, +max] degrees (default: 15).
    pub max_rotation_deg: f32,
    /// Resize cleanup releases elements further than this outside the viewport (default: 200).
    pub offscreen_margin_px: f32,
    /// Extra exclusion-zone margin per zone kind.
    pub zone_margins: ZoneMargins,
    /// Give up on an atlas attempt after this long. None waits forever.
    pub load_timeout_ms: Option<f64>,
    /// Seed for sprite and rotation choices.
    pub seed: u64,
    /// Sprite sheet location and geometry.
    pub atlas: AtlasDescriptor,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 70.0,
            movement_threshold_px: 15.0,
            display_size: 180.0,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            element_lifetime_ms: 2500.0,
            fade_duration_ms: 2500.0,
            fade_easing: Easing::default(),
            initial_opacity: 0.9,
            end_scale: 0.3,
            max_rotation_deg: 15.0,
            offscreen_margin_px: 200.0,
            zone_margins: ZoneMargins::default(),
            load_timeout_ms: None,
            seed: 0x7261_696c,
            atlas: AtlasDescriptor::default(),
        }
    }
}

impl TrailConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TrailError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), TrailError> {
        self.atlas.grid()?;
        let checks = [
            (self.spawn_interval_ms >= 0.0, "spawn_interval_ms must not be negative"),
            (self.movement_threshold_px >= 0.0, "movement_threshold_px must not be negative"),
            (self.display_size > 0.0, "display_size must be positive"),
            (self.element_lifetime_ms >= 0.0, "element_lifetime_ms must not be negative"),
            (self.fade_duration_ms >= 0.0, "fade_duration_ms must not be negative"),
            ((0.0..=1.0).contains(&self.initial_opacity), "initial_opacity must be within [0, 1]"),
            (self.end_scale >= 0.0, "end_scale must not be negative"),
            (self.max_rotation_deg >= 0.0, "max_rotation_deg must not be negative"),
            (self.offscreen_margin_px >= 0.0, "offscreen_margin_px must not be negative"),
            (self.load_timeout_ms.map_or(true, |t| t > 0.0), "load_timeout_ms must be positive"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, message)) => Err(TrailError::InvalidConfig(message.to_string())),
            None => Ok(()),
        }
    }
}

/// Platform facts sampled once when the engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// The device exposes touch input; the trail is pointer-only.
    pub touch: bool,
    /// The user prefers reduced motion.
    pub reduced_motion: bool,
}
