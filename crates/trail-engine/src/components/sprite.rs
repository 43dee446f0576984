use glam::Vec2;
use crate::api::error::TrailError;
use crate::systems::rng::Rng;

/// One cell of the sprite grid, addressed row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteCell {
    pub index: u32,
    pub col: u32,
    pub row: u32,
}

/// Geometry of a sprite sheet: `cols × rows` square cells of `sprite_size`
/// pixels, of which only the first `total_sprites` hold artwork.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteGrid {
    cols: u32,
    rows: u32,
    total_sprites: u32,
    sprite_size: f32,
}

impl SpriteGrid {
    pub fn new(cols: u32, rows: u32, total_sprites: u32, sprite_size: f32) -> Result<Self, TrailError> {
        let capacity = cols as u64 * rows as u64;
        if cols == 0 || rows == 0 || total_sprites == 0 || total_sprites as u64 > capacity {
            return Err(TrailError::InvalidGeometry { cols, rows, total_sprites });
        }
        if !(sprite_size > 0.0) {
            return Err(TrailError::InvalidConfig(format!(
                "sprite_size must be positive, got {sprite_size}"
            )));
        }
        Ok(Self { cols, rows, total_sprites, sprite_size })
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn total_sprites(&self) -> u32 {
        self.total_sprites
    }

    pub fn sprite_size(&self) -> f32 {
        self.sprite_size
    }

    /// Cell holding sprite `index`, or None for padding / out-of-range indices.
    pub fn cell(&self, index: u32) -> Option<SpriteCell> {
        if index >= self.total_sprites {
            return None;
        }
        Some(SpriteCell {
            index,
            col: index % self.cols,
            row: index / self.cols,
        })
    }

    /// Uniformly random cell among the valid sprites.
    pub fn random_cell(&self, rng: &mut Rng) -> SpriteCell {
        let index = rng.next_int(self.total_sprites);
        SpriteCell {
            index,
            col: index % self.cols,
            row: index / self.cols,
        }
    }

    /// Ratio between the on-screen size and the native cell size.
    pub fn scale(&self, display_size: f32) -> f32 {
        display_size / self.sprite_size
    }

    /// Pixel offset of `cell` inside the atlas once the atlas is drawn at
    /// `display_size / sprite_size`. A CSS background-position uses the negation.
    pub fn crop_offset(&self, cell: SpriteCell, display_size: f32) -> Vec2 {
        let step = self.sprite_size * self.scale(display_size);
        Vec2::new(cell.col as f32 * step, cell.row as f32 * step)
    }

    /// Size of the whole atlas when drawn at the display scale.
    pub fn background_size(&self, display_size: f32) -> Vec2 {
        let step = self.sprite_size * self.scale(display_size);
        Vec2::new(self.cols as f32 * step, self.rows as f32 * step)
    }

    /// Native pixel size of the full sheet.
    pub fn sheet_size(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32) * self.sprite_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn grid_mapping_is_row_major_and_distinct() {
        let grid = SpriteGrid::new(8, 7, 50, 180.0).unwrap();
        let mut seen = HashSet::new();
        for index in 0..50 {
            let cell = grid.cell(index).unwrap();
            assert_eq!(cell.col, index % 8);
            assert_eq!(cell.row, index / 8);
            assert!(cell.col <= 7 && cell.row <= 6, "cell {:?} outside grid", cell);
            assert!(seen.insert((cell.col, cell.row)), "duplicate cell for {}", index);
        }
        assert_eq!(grid.cell(49).unwrap(), SpriteCell { index: 49, col: 1, row: 6 });
    }

    #[test]
    fn padding_cells_are_not_addressable() {
        let grid = SpriteGrid::new(8, 7, 50, 180.0).unwrap();
        assert!(grid.cell(50).is_none());
        assert!(grid.cell(55).is_none());
    }

    #[test]
    fn rejects_impossible_geometry() {
        assert!(SpriteGrid::new(8, 7, 57, 180.0).is_err());
        assert!(SpriteGrid::new(0, 7, 1, 180.0).is_err());
        assert!(SpriteGrid::new(8, 7, 0, 180.0).is_err());
        assert!(SpriteGrid::new(8, 7, 50, 0.0).is_err());
    }

    #[test]
    fn crop_offset_scales_with_display_size() {
        let grid = SpriteGrid::new(8, 7, 50, 180.0).unwrap();
        let cell = grid.cell(10).unwrap(); // col 2, row 1
        assert_eq!(grid.crop_offset(cell, 180.0), Vec2::new(360.0, 180.0));
        assert_eq!(grid.crop_offset(cell, 90.0), Vec2::new(180.0, 90.0));
        assert_eq!(grid.background_size(90.0), Vec2::new(720.0, 630.0));
    }

    #[test]
    fn random_cells_stay_in_valid_range() {
        let grid = SpriteGrid::new(8, 7, 50, 180.0).unwrap();
        let mut rng = Rng::new(7);
        for _ in 0..500 {
            let cell = grid.random_cell(&mut rng);
            assert!(cell.index < 50);
            assert_eq!(grid.cell(cell.index), Some(cell));
        }
    }
}
