// extensions/mod.rs
//
// Interpolation helpers used by surfaces that drive their own transitions.

pub mod easing;

pub use easing::{progress, Easing};
