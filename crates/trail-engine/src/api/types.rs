/// Identifies one pooled visual element. Ids are never reused after destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Coarse lifecycle of the engine as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// No qualifying pointer event has been seen yet.
    Uninitialized,
    /// The atlas fetch is in flight (primary or fallback).
    AtlasLoading,
    /// Steady state: the spawn gate is evaluated on every pointer event.
    AtlasReady,
    /// Steady state: spawning is permanently disabled for this session.
    AtlasFailed,
}

/// Why the spawn gate refused a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// The atlas is not loaded (still loading, failed, or never requested).
    AtlasNotReady,
    /// The device reports touch capability.
    TouchDevice,
    /// The user asked for reduced motion.
    ReducedMotion,
    /// Less than the spawn interval has passed since the last spawn.
    Throttled,
    /// The pointer has not moved far enough from the last spawn.
    BelowThreshold,
    /// The pointer sits inside a buffered exclusion zone.
    InExclusionZone,
}

/// Result of feeding one pointer event to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(ElementId),
    Rejected(GateRejection),
}

impl SpawnOutcome {
    pub fn is_spawned(&self) -> bool {
        matches!(self, SpawnOutcome::Spawned(_))
    }

    pub fn element(&self) -> Option<ElementId> {
        match self {
            SpawnOutcome::Spawned(id) => Some(*id),
            SpawnOutcome::Rejected(_) => None,
        }
    }
}
