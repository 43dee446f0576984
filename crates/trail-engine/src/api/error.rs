/// Errors surfaced while building an engine. Runtime paths never fail;
/// they degrade silently instead.
#[derive(Debug, thiserror::Error)]
pub enum TrailError {
    #[error("failed to parse trail config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid atlas geometry: {total_sprites} sprites in a {cols}x{rows} grid")]
    InvalidGeometry {
        cols: u32,
        rows: u32,
        total_sprites: u32,
    },
    #[error("invalid trail config: {0}")]
    InvalidConfig(String),
}
