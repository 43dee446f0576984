//! Atlas load lifecycle: Unloaded → Loading → Ready | Failed.
//!
//! The loader never fetches anything itself. It hands out `FetchRequest`s
//! for the host to perform and consumes the `FetchOutcome` the host reports
//! back. Primary failure is retried exactly once against the fallback URL;
//! after that, failure is terminal for the session.

use super::manifest::AtlasDescriptor;

/// Which URL an attempt targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAttempt {
    Primary,
    Fallback,
}

/// Ask the host to fetch `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub attempt: FetchAttempt,
}

/// What the host observed for a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { url: String, width: u32, height: u32 },
    Failed { url: String },
}

impl FetchOutcome {
    pub fn url(&self) -> &str {
        match self {
            FetchOutcome::Loaded { url, .. } | FetchOutcome::Failed { url } => url,
        }
    }
}

/// A successfully decoded atlas image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAtlas {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtlasState {
    Unloaded,
    Loading { attempt: FetchAttempt, url: String, started_ms: f64 },
    Ready(LoadedAtlas),
    Failed,
}

/// Result of feeding an outcome or a timeout check into the loader.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStep {
    /// The atlas is now usable.
    Ready(LoadedAtlas),
    /// The primary attempt failed; the host must fetch the fallback.
    Retry(FetchRequest),
    /// Terminal failure. Spawning stays disabled for the session.
    Failed,
    /// The outcome did not match the attempt in flight and was dropped.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct AtlasLoader {
    primary_url: String,
    fallback_url: Option<String>,
    timeout_ms: Option<f64>,
    state: AtlasState,
    fetches: u32,
}

impl AtlasLoader {
    pub fn new(descriptor: &AtlasDescriptor, timeout_ms: Option<f64>) -> Self {
        Self {
            primary_url: descriptor.primary_url(),
            fallback_url: descriptor.fallback_url().map(str::to_string),
            timeout_ms,
            state: AtlasState::Unloaded,
            fetches: 0,
        }
    }

    pub fn state(&self) -> &AtlasState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, AtlasState::Ready(_))
    }

    /// Number of fetches handed out this session.
    pub fn fetch_count(&self) -> u32 {
        self.fetches
    }

    /// Start loading if nothing has been requested yet. Later calls return
    /// None: either a fetch is in flight or the outcome is already known.
    pub fn request(&mut self, now_ms: f64) -> Option<FetchRequest> {
        if self.state != AtlasState::Unloaded {
            return None;
        }
        Some(self.begin(FetchAttempt::Primary, self.primary_url.clone(), now_ms))
    }

    /// Consume the host's report for the attempt in flight.
    pub fn complete(&mut self, outcome: FetchOutcome, now_ms: f64) -> LoadStep {
        let attempt = match &self.state {
            AtlasState::Loading { attempt, url, .. } if url == outcome.url() => *attempt,
            _ => return LoadStep::Ignored,
        };
        match outcome {
            FetchOutcome::Loaded { url, width, height } => {
                let atlas = LoadedAtlas { url, width, height };
                self.state = AtlasState::Ready(atlas.clone());
                LoadStep::Ready(atlas)
            }
            FetchOutcome::Failed { .. } => self.fail_attempt(attempt, now_ms),
        }
    }

    /// Treat an attempt that has been in flight longer than the configured
    /// timeout as failed. Without a timeout this never fires.
    pub fn poll_timeout(&mut self, now_ms: f64) -> Option<LoadStep> {
        let timeout = self.timeout_ms?;
        match &self.state {
            AtlasState::Loading { attempt, started_ms, .. } if now_ms - started_ms >= timeout => {
                let attempt = *attempt;
                Some(self.fail_attempt(attempt, now_ms))
            }
            _ => None,
        }
    }

    fn fail_attempt(&mut self, attempt: FetchAttempt, now_ms: f64) -> LoadStep {
        match (attempt, self.fallback_url.clone()) {
            (FetchAttempt::Primary, Some(fallback)) => {
                LoadStep::Retry(self.begin(FetchAttempt::Fallback, fallback, now_ms))
            }
            _ => {
                self.state = AtlasState::Failed;
                LoadStep::Failed
            }
        }
    }

    fn begin(&mut self, attempt: FetchAttempt, url: String, now_ms: f64) -> FetchRequest {
        self.fetches += 1;
        self.state = AtlasState::Loading {
            attempt,
            url: url.clone(),
            started_ms: now_ms,
        };
        FetchRequest { url, attempt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(fallback: Option<&str>) -> AtlasDescriptor {
        AtlasDescriptor {
            url: "sheet.webp".to_string(),
            version: Some("7".to_string()),
            fallback_url: fallback.map(str::to_string),
            ..Default::default()
        }
    }

    fn loaded(url: &str) -> FetchOutcome {
        FetchOutcome::Loaded { url: url.to_string(), width: 1440, height: 1260 }
    }

    fn failed(url: &str) -> FetchOutcome {
        FetchOutcome::Failed { url: url.to_string() }
    }

    #[test]
    fn request_is_issued_once() {
        let mut loader = AtlasLoader::new(&descriptor(None), None);
        let req = loader.request(0.0).unwrap();
        assert_eq!(req.url, "sheet.webp?v=7");
        assert_eq!(req.attempt, FetchAttempt::Primary);
        assert!(loader.request(10.0).is_none());
        assert!(matches!(loader.complete(loaded("sheet.webp?v=7"), 20.0), LoadStep::Ready(_)));
        assert!(loader.request(30.0).is_none());
        assert_eq!(loader.fetch_count(), 1);
        assert!(loader.is_ready());
    }

    #[test]
    fn primary_failure_retries_fallback_once() {
        let mut loader = AtlasLoader::new(&descriptor(Some("sheet.png")), None);
        loader.request(0.0);
        let step = loader.complete(failed("sheet.webp?v=7"), 5.0);
        assert_eq!(
            step,
            LoadStep::Retry(FetchRequest { url: "sheet.png".to_string(), attempt: FetchAttempt::Fallback })
        );
        assert_eq!(loader.complete(failed("sheet.png"), 9.0), LoadStep::Failed);
        assert_eq!(*loader.state(), AtlasState::Failed);
        assert_eq!(loader.fetch_count(), 2);
        assert!(loader.request(20.0).is_none());
    }

    #[test]
    fn fallback_success_reports_its_url() {
        let mut loader = AtlasLoader::new(&descriptor(Some("sheet.png")), None);
        loader.request(0.0);
        loader.complete(failed("sheet.webp?v=7"), 1.0);
        match loader.complete(loaded("sheet.png"), 2.0) {
            LoadStep::Ready(atlas) => assert_eq!(atlas.url, "sheet.png"),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn failure_without_fallback_is_terminal() {
        let mut loader = AtlasLoader::new(&descriptor(None), None);
        loader.request(0.0);
        assert_eq!(loader.complete(failed("sheet.webp?v=7"), 1.0), LoadStep::Failed);
        assert_eq!(loader.fetch_count(), 1);
    }

    #[test]
    fn stale_outcomes_are_ignored() {
        let mut loader = AtlasLoader::new(&descriptor(None), None);
        assert_eq!(loader.complete(loaded("sheet.webp?v=7"), 0.0), LoadStep::Ignored);
        loader.request(0.0);
        assert_eq!(loader.complete(loaded("other.webp"), 1.0), LoadStep::Ignored);
        loader.complete(failed("sheet.webp?v=7"), 2.0);
        assert_eq!(loader.complete(loaded("sheet.webp?v=7"), 3.0), LoadStep::Ignored);
        assert!(!loader.is_ready());
    }

    #[test]
    fn no_timeout_means_waiting_forever() {
        let mut loader = AtlasLoader::new(&descriptor(Some("sheet.png")), None);
        loader.request(0.0);
        assert!(loader.poll_timeout(1.0e9).is_none());
        assert!(matches!(loader.state(), AtlasState::Loading { .. }));
    }

    #[test]
    fn timeout_walks_fallback_then_fails() {
        let mut loader = AtlasLoader::new(&descriptor(Some("sheet.png")), Some(5000.0));
        loader.request(0.0);
        assert!(loader.poll_timeout(4999.0).is_none());
        assert!(matches!(loader.poll_timeout(5000.0), Some(LoadStep::Retry(_))));
        assert!(loader.poll_timeout(9999.0).is_none());
        assert_eq!(loader.poll_timeout(10_000.0), Some(LoadStep::Failed));
        assert!(loader.poll_timeout(20_000.0).is_none());
    }
}
