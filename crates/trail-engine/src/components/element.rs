use glam::Vec2;
use super::rect::Rect;

/// One animation endpoint: opacity plus a scale/rotation transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub opacity: f32,
    pub scale: f32,
    pub rotation_deg: f32,
}

impl Keyframe {
    /// Fully transparent, identity transform.
    pub const HIDDEN: Keyframe = Keyframe { opacity: 0.0, scale: 1.0, rotation_deg: 0.0 };

    /// Identity transform at the given opacity.
    pub fn visible(opacity: f32) -> Self {
        Self { opacity, scale: 1.0, rotation_deg: 0.0 }
    }

    /// Blend towards `to` by `t` (already eased).
    pub fn lerp(&self, to: &Keyframe, t: f32) -> Keyframe {
        Keyframe {
            opacity: self.opacity + (to.opacity - self.opacity) * t,
            scale: self.scale + (to.scale - self.scale) * t,
            rotation_deg: self.rotation_deg + (to.rotation_deg - self.rotation_deg) * t,
        }
    }

    /// CSS `transform` value for this keyframe.
    pub fn css_transform(&self) -> String {
        format!("scale({}) rotate({}deg)", self.scale, self.rotation_deg)
    }
}

/// Everything a surface needs to show one trail element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    /// Top-left corner in viewport pixels.
    pub top_left: Vec2,
    /// Edge length of the square element.
    pub size: f32,
    /// Offset of the sprite cell inside the scaled atlas.
    pub crop_offset: Vec2,
    /// Size the whole atlas is drawn at.
    pub background_size: Vec2,
    pub keyframe: Keyframe,
}

impl ElementStyle {
    pub fn center(&self) -> Vec2 {
        self.top_left + Vec2::splat(self.size * 0.5)
    }

    /// On-screen bounds of the layout box after `keyframe`'s transform,
    /// which is applied around the element's center.
    pub fn transformed_bounds(&self, keyframe: &Keyframe) -> Rect {
        let theta = keyframe.rotation_deg.to_radians();
        let extent = self.size * keyframe.scale * (theta.cos().abs() + theta.sin().abs());
        Rect::from_center(self.center(), Vec2::splat(extent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_both_endpoints() {
        let from = Keyframe::visible(0.9);
        let to = Keyframe { opacity: 0.0, scale: 0.3, rotation_deg: 12.0 };
        assert_eq!(from.lerp(&to, 0.0), from);
        let end = from.lerp(&to, 1.0);
        assert!((end.opacity - 0.0).abs() < 1e-6);
        assert!((end.scale - 0.3).abs() < 1e-6);
        assert!((end.rotation_deg - 12.0).abs() < 1e-6);
    }

    #[test]
    fn transformed_bounds_shrink_around_center() {
        let style = ElementStyle {
            top_left: Vec2::new(10.0, 10.0),
            size: 100.0,
            crop_offset: Vec2::ZERO,
            background_size: Vec2::splat(800.0),
            keyframe: Keyframe::visible(0.9),
        };
        let shrunk = style.transformed_bounds(&Keyframe { opacity: 0.0, scale: 0.5, rotation_deg: 0.0 });
        assert_eq!(shrunk.center(), Vec2::new(60.0, 60.0));
        assert!((shrunk.width() - 50.0).abs() < 1e-4);
        assert_eq!(style.transformed_bounds(&style.keyframe), Rect::new(10.0, 10.0, 100.0, 100.0));
    }
}
