use serde::Deserialize;
use trail_engine::{TrailConfig, TrailError, ZoneKind};

/// A CSS selector whose matches become exclusion zones of `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneSelector {
    pub selector: String,
    pub kind: ZoneKind,
}

/// Page-level configuration: the engine tunables plus DOM wiring.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    #[serde(flatten)]
    pub trail: TrailConfig,
    /// Elements to keep the trail away from.
    pub zones: Vec<ZoneSelector>,
    /// Class set on every trail element, for page styling.
    pub class_name: String,
    /// Stacking order of trail elements.
    pub z_index: i32,
    /// Install pointermove/resize listeners on the window.
    pub listen: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            trail: TrailConfig::default(),
            zones: vec![
                ZoneSelector {
                    selector: ".container".to_string(),
                    kind: ZoneKind::ContentRail,
                },
                ZoneSelector {
                    selector: ".glossary-term".to_string(),
                    kind: ZoneKind::Tooltip,
                },
            ],
            class_name: "trail-sprite".to_string(),
            z_index: -1,
            listen: true,
        }
    }
}

impl WebConfig {
    /// Parse from JSON. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, TrailError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;
        config.trail.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_defaults() {
        let config = WebConfig::from_json("  ").unwrap();
        assert_eq!(config, WebConfig::default());
        assert_eq!(config.zones.len(), 2);
    }

    #[test]
    fn engine_fields_sit_at_top_level() {
        let config = WebConfig::from_json(
            r#"{
                "spawn_interval_ms": 90,
                "class_name": "sprite",
                "zones": [{ "selector": "abbr", "kind": "tooltip" }],
                "atlas": { "url": "trail.webp", "version": "5", "fallback_url": "trail.png" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.trail.spawn_interval_ms, 90.0);
        assert_eq!(config.trail.movement_threshold_px, 15.0);
        assert_eq!(config.class_name, "sprite");
        assert_eq!(config.zones, vec![ZoneSelector { selector: "abbr".to_string(), kind: ZoneKind::Tooltip }]);
        assert_eq!(config.trail.atlas.primary_url(), "trail.webp?v=5");
        assert!(config.listen);
    }

    #[test]
    fn invalid_engine_values_are_reported() {
        assert!(WebConfig::from_json(r#"{ "display_size": -4 }"#).is_err());
    }
}
