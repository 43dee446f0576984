use glam::Vec2;
use crate::api::config::Capabilities;
use crate::api::types::GateRejection;
use super::zones::{is_excluded, ZoneMargins, ZoneProvider};

/// Decides whether a pointer sample may spawn a trail element.
///
/// Holds the last accepted spawn position and time; nothing else mutates them.
#[derive(Debug, Clone)]
pub struct SpawnGate {
    capabilities: Capabilities,
    spawn_interval_ms: f64,
    movement_threshold_px: f32,
    display_size: f32,
    margins: ZoneMargins,
    last_spawn: Option<(Vec2, f64)>,
}

impl SpawnGate {
    pub fn new(
        capabilities: Capabilities,
        spawn_interval_ms: f64,
        movement_threshold_px: f32,
        display_size: f32,
        margins: ZoneMargins,
    ) -> Self {
        Self {
            capabilities,
            spawn_interval_ms,
            movement_threshold_px,
            display_size,
            margins,
            last_spawn: None,
        }
    }

    /// Rejection that holds for the whole session, independent of the event.
    pub fn session_rejection(&self) -> Option<GateRejection> {
        if self.capabilities.touch {
            Some(GateRejection::TouchDevice)
        } else if self.capabilities.reduced_motion {
            Some(GateRejection::ReducedMotion)
        } else {
            None
        }
    }

    /// Check every rule in order. On success the sample becomes the new
    /// last spawn; on rejection nothing changes. Zones are only queried when
    /// all cheaper rules pass.
    pub fn evaluate(
        &mut self,
        position: Vec2,
        now_ms: f64,
        atlas_ready: bool,
        zones: Option<&dyn ZoneProvider>,
    ) -> Result<(), GateRejection> {
        if !atlas_ready {
            return Err(GateRejection::AtlasNotReady);
        }
        if let Some(rejection) = self.session_rejection() {
            return Err(rejection);
        }
        if let Some((last_pos, last_ms)) = self.last_spawn {
            if now_ms - last_ms < self.spawn_interval_ms {
                return Err(GateRejection::Throttled);
            }
            if position.distance(last_pos) <= self.movement_threshold_px {
                return Err(GateRejection::BelowThreshold);
            }
        }
        if let Some(provider) = zones {
            if is_excluded(&provider.zones(), position, self.display_size, &self.margins) {
                return Err(GateRejection::InExclusionZone);
            }
        }
        self.last_spawn = Some((position, now_ms));
        Ok(())
    }

    pub fn last_spawn(&self) -> Option<(Vec2, f64)> {
        self.last_spawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::rect::Rect;
    use crate::core::zones::{ExclusionZone, StaticZones, ZoneKind};

    fn gate() -> SpawnGate {
        SpawnGate::new(Capabilities::default(), 70.0, 15.0, 180.0, ZoneMargins::default())
    }

    #[test]
    fn throttle_accepts_only_spaced_samples() {
        let mut gate = gate();
        let accepted: Vec<f64> = [0.0, 30.0, 70.0, 75.0, 140.0]
            .iter()
            .enumerate()
            .filter(|(i, t)| {
                let pos = Vec2::new(100.0 + *i as f32 * 50.0, 100.0);
                gate.evaluate(pos, **t, true, None).is_ok()
            })
            .map(|(_, t)| *t)
            .collect();
        assert_eq!(accepted, vec![0.0, 70.0, 140.0]);
    }

    #[test]
    fn stationary_pointer_spawns_once() {
        let mut gate = gate();
        let pos = Vec2::new(300.0, 300.0);
        assert!(gate.evaluate(pos, 0.0, true, None).is_ok());
        assert_eq!(gate.evaluate(pos, 20.0, true, None), Err(GateRejection::Throttled));
        assert_eq!(gate.evaluate(pos, 500.0, true, None), Err(GateRejection::BelowThreshold));
    }

    #[test]
    fn threshold_is_strict() {
        let mut gate = gate();
        assert!(gate.evaluate(Vec2::ZERO, 0.0, true, None).is_ok());
        assert_eq!(
            gate.evaluate(Vec2::new(15.0, 0.0), 100.0, true, None),
            Err(GateRejection::BelowThreshold)
        );
        assert!(gate.evaluate(Vec2::new(15.5, 0.0), 100.0, true, None).is_ok());
    }

    #[test]
    fn atlas_not_ready_always_rejects() {
        let mut gate = gate();
        for t in 0..10 {
            let pos = Vec2::new(t as f32 * 100.0, 0.0);
            assert_eq!(
                gate.evaluate(pos, t as f64 * 1000.0, false, None),
                Err(GateRejection::AtlasNotReady)
            );
        }
        assert!(gate.last_spawn().is_none());
    }

    #[test]
    fn session_capabilities_close_the_gate() {
        let touch = Capabilities { touch: true, reduced_motion: false };
        let mut gate = SpawnGate::new(touch, 70.0, 15.0, 180.0, ZoneMargins::default());
        assert_eq!(gate.evaluate(Vec2::ZERO, 0.0, true, None), Err(GateRejection::TouchDevice));

        let calm = Capabilities { touch: false, reduced_motion: true };
        let mut gate = SpawnGate::new(calm, 70.0, 15.0, 180.0, ZoneMargins::default());
        assert_eq!(gate.evaluate(Vec2::ZERO, 0.0, true, None), Err(GateRejection::ReducedMotion));
    }

    #[test]
    fn exclusion_zone_rejects_without_touching_state() {
        let mut gate = gate();
        let zones = StaticZones(vec![ExclusionZone::new(
            ZoneKind::Tooltip,
            Rect::new(1000.0, 1000.0, 50.0, 20.0),
        )]);
        assert!(gate.evaluate(Vec2::new(10.0, 10.0), 0.0, true, Some(&zones)).is_ok());
        assert_eq!(
            gate.evaluate(Vec2::new(1010.0, 1010.0), 500.0, true, Some(&zones)),
            Err(GateRejection::InExclusionZone)
        );
        assert_eq!(gate.last_spawn(), Some((Vec2::new(10.0, 10.0), 0.0)));
    }

    #[test]
    fn rejection_leaves_state_unchanged() {
        let mut gate = gate();
        gate.evaluate(Vec2::ZERO, 0.0, true, None).unwrap();
        let before = gate.last_spawn();
        let _ = gate.evaluate(Vec2::new(100.0, 0.0), 10.0, true, None);
        assert_eq!(gate.last_spawn(), before);
    }
}
