use crate::api::types::ElementId;
use crate::components::element::Keyframe;

/// Pending release deadlines, kept sorted by time.
#[derive(Debug, Default)]
pub struct ReleaseSchedule {
    deadlines: Vec<(f64, ElementId)>,
}

impl ReleaseSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release `id` at `at_ms`. Equal deadlines keep insertion order.
    pub fn schedule(&mut self, id: ElementId, at_ms: f64) {
        let idx = self.deadlines.partition_point(|(t, _)| *t <= at_ms);
        self.deadlines.insert(idx, (at_ms, id));
    }

    /// Drop any pending deadline for `id`. Used when an element is released
    /// early so a stale timer cannot cut short its next activation.
    pub fn cancel(&mut self, id: ElementId) {
        self.deadlines.retain(|(_, pending)| *pending != id);
    }

    /// Remove and return every element due at or before `now_ms`.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<ElementId> {
        let due = self.deadlines.partition_point(|(t, _)| *t <= now_ms);
        self.deadlines.drain(..due).map(|(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

/// Target keyframes waiting for the next animation frame.
#[derive(Debug, Default)]
pub struct PendingFrames {
    targets: Vec<(ElementId, Keyframe)>,
}

impl PendingFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ElementId, target: Keyframe) {
        self.targets.push((id, target));
    }

    pub fn cancel(&mut self, id: ElementId) {
        self.targets.retain(|(pending, _)| *pending != id);
    }

    /// Take everything queued so far, leaving the queue empty.
    pub fn take(&mut self) -> Vec<(ElementId, Keyframe)> {
        std::mem::take(&mut self.targets)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_deadline_order() {
        let mut s = ReleaseSchedule::new();
        s.schedule(ElementId(1), 300.0);
        s.schedule(ElementId(2), 100.0);
        s.schedule(ElementId(3), 200.0);
        assert_eq!(s.drain_due(250.0), vec![ElementId(2), ElementId(3)]);
        assert_eq!(s.len(), 1);
        assert!(s.drain_due(299.9).is_empty());
        assert_eq!(s.drain_due(300.0), vec![ElementId(1)]);
        assert!(s.is_empty());
    }

    #[test]
    fn cancel_removes_pending_release() {
        let mut s = ReleaseSchedule::new();
        s.schedule(ElementId(1), 100.0);
        s.schedule(ElementId(2), 100.0);
        s.cancel(ElementId(1));
        assert_eq!(s.drain_due(1000.0), vec![ElementId(2)]);
    }

    #[test]
    fn pending_frames_take_empties_queue() {
        let mut frames = PendingFrames::new();
        frames.push(ElementId(4), Keyframe::HIDDEN);
        frames.push(ElementId(5), Keyframe::HIDDEN);
        frames.cancel(ElementId(4));
        let taken = frames.take();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].0, ElementId(5));
        assert!(frames.is_empty());
    }
}
