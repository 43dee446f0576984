use crate::api::types::ElementId;
use crate::components::rect::Rect;
use crate::renderer::traits::Surface;

/// Collect active elements whose on-screen bounds sit more than `margin`
/// outside `viewport`. Free function so the caller can release them after
/// the scan without holding a borrow on the pool.
pub fn stranded_elements<S: Surface + ?Sized>(
    active: impl Iterator<Item = ElementId>,
    surface: &S,
    viewport: &Rect,
    margin: f32,
    now_ms: f64,
) -> Vec<ElementId> {
    active
        .filter(|id| {
            surface
                .bounds(*id, now_ms)
                .is_some_and(|bounds| bounds.lies_beyond(viewport, margin))
        })
        .collect()
}
