pub mod headless;
pub mod traits;

pub use headless::{HeadlessSurface, SurfaceEvent};
pub use traits::{Host, Surface, Transition};
