use serde::{Deserialize, Serialize};
use crate::api::error::TrailError;
use crate::components::sprite::SpriteGrid;

/// Describes the trail sprite sheet. Written next to the image by the
/// sprite-sheet build step and handed to the engine out-of-band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasDescriptor {
    /// URL of the sheet image (e.g., "images/trail-sprites.webp").
    pub url: String,
    /// Cache-busting tag appended as `?v=` to the primary URL.
    pub version: Option<String>,
    /// Second URL tried once if the primary fetch fails (e.g., a PNG copy).
    pub fallback_url: Option<String>,
    /// Number of columns in the sheet grid.
    pub cols: u32,
    /// Number of rows in the sheet grid.
    pub rows: u32,
    /// Leading cells (row-major) that hold artwork.
    pub total_sprites: u32,
    /// Native edge length of one cell in pixels.
    pub sprite_size: f32,
}

impl Default for AtlasDescriptor {
    fn default() -> Self {
        Self {
            url: "images/trail-sprites.webp".to_string(),
            version: None,
            fallback_url: None,
            cols: 8,
            rows: 7,
            total_sprites: 50,
            sprite_size: 180.0,
        }
    }
}

impl AtlasDescriptor {
    /// Parse a descriptor from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Primary URL with the version tag appended, if any.
    pub fn primary_url(&self) -> String {
        match &self.version {
            Some(version) if !version.is_empty() => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}v={}", self.url, sep, version)
            }
            _ => self.url.clone(),
        }
    }

    pub fn fallback_url(&self) -> Option<&str> {
        self.fallback_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Validated grid geometry.
    pub fn grid(&self) -> Result<SpriteGrid, TrailError> {
        SpriteGrid::new(self.cols, self.rows, self.total_sprites, self.sprite_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_descriptor() {
        let json = r#"{
            "url": "images/trail.webp",
            "version": "20240611",
            "fallback_url": "images/trail.png",
            "cols": 8,
            "rows": 7,
            "total_sprites": 50,
            "sprite_size": 180
        }"#;
        let atlas = AtlasDescriptor::from_json(json).unwrap();
        assert_eq!(atlas.primary_url(), "images/trail.webp?v=20240611");
        assert_eq!(atlas.fallback_url(), Some("images/trail.png"));
        assert_eq!(atlas.grid().unwrap().total_sprites(), 50);
    }

    #[test]
    fn version_appends_to_existing_query() {
        let atlas = AtlasDescriptor {
            url: "sheet.webp?w=2".to_string(),
            version: Some("3".to_string()),
            ..Default::default()
        };
        assert_eq!(atlas.primary_url(), "sheet.webp?w=2&v=3");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let atlas = AtlasDescriptor::from_json(r#"{ "url": "a.png" }"#).unwrap();
        assert_eq!(atlas.primary_url(), "a.png");
        assert_eq!(atlas.fallback_url(), None);
        assert_eq!((atlas.cols, atlas.rows, atlas.total_sprites), (8, 7, 50));
    }

    #[test]
    fn empty_fallback_is_ignored() {
        let atlas = AtlasDescriptor {
            fallback_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(atlas.fallback_url(), None);
    }

    #[test]
    fn oversized_sprite_count_is_rejected() {
        let atlas = AtlasDescriptor { total_sprites: 100, ..Default::default() };
        assert!(matches!(atlas.grid(), Err(TrailError::InvalidGeometry { .. })));
    }
}
