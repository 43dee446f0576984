// extensions/easing.rs
//
// Easing curves for the fade-out transition. Each curve has a CSS
// `transition-timing-function` twin so browser and headless surfaces
// interpolate the same way.

use std::f32::consts::PI;
use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    #[default]
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    /// Stronger slow end.
    CubicOut,
    /// Sine wave easing (smooth).
    SineInOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }

    /// Equivalent CSS timing function.
    pub fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadIn => "cubic-bezier(0.11, 0, 0.5, 0)",
            Easing::QuadOut => "cubic-bezier(0.5, 1, 0.89, 1)",
            Easing::QuadInOut => "cubic-bezier(0.45, 0, 0.55, 1)",
            Easing::CubicOut => "cubic-bezier(0.33, 1, 0.68, 1)",
            Easing::SineInOut => "cubic-bezier(0.37, 0, 0.63, 1)",
        }
    }
}

/// Normalized progress of a transition that started at `start_ms`.
#[inline]
pub fn progress(start_ms: f64, duration_ms: f64, now_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        1.0
    } else {
        ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0) as f32
    }
}
