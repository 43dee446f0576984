use glam::Vec2;
use crate::api::config::{Capabilities, TrailConfig};
use crate::api::error::TrailError;
use crate::api::types::{ElementId, EnginePhase, SpawnOutcome};
use crate::assets::loader::{AtlasLoader, AtlasState, FetchOutcome, FetchRequest, LoadStep};
use crate::components::element::{ElementStyle, Keyframe};
use crate::components::rect::Rect;
use crate::components::sprite::SpriteGrid;
use crate::core::gate::SpawnGate;
use crate::core::pool::{Acquired, ElementPool, Released};
use crate::core::schedule::{PendingFrames, ReleaseSchedule};
use crate::core::zones::ZoneProvider;
use crate::renderer::traits::{Host, Transition};
use crate::systems::cleanup::stranded_elements;
use crate::systems::rng::Rng;

/// The cursor trail: one instance per page session.
///
/// Every method is a synchronous handler for one external event. The host
/// calls `on_pointer_move` for pointer samples, `on_animation_frame` when a
/// requested frame arrives, `tick` when a requested timer fires,
/// `on_atlas_fetched` when an image fetch settles and `on_resize` when the
/// viewport changes.
pub struct TrailEngine<H: Host> {
    config: TrailConfig,
    grid: SpriteGrid,
    gate: SpawnGate,
    pool: ElementPool,
    loader: AtlasLoader,
    releases: ReleaseSchedule,
    frames: PendingFrames,
    rng: Rng,
    zones: Option<Box<dyn ZoneProvider>>,
    host: H,
}

impl<H: Host> TrailEngine<H> {
    pub fn new(config: TrailConfig, capabilities: Capabilities, host: H) -> Result<Self, TrailError> {
        config.validate()?;
        let grid = config.atlas.grid()?;
        let gate = SpawnGate::new(
            capabilities,
            config.spawn_interval_ms,
            config.movement_threshold_px,
            config.display_size,
            config.zone_margins,
        );
        let loader = AtlasLoader::new(&config.atlas, config.load_timeout_ms);
        log::info!(
            "trail: {}x{} atlas with {} sprites, pool capacity {}",
            grid.cols(),
            grid.rows(),
            grid.total_sprites(),
            config.pool_capacity
        );
        if let Some(rejection) = gate.session_rejection() {
            log::info!("trail: disabled for this session ({:?})", rejection);
        }
        Ok(Self {
            grid,
            gate,
            pool: ElementPool::new(config.pool_capacity),
            loader,
            releases: ReleaseSchedule::new(),
            frames: PendingFrames::new(),
            rng: Rng::new(config.seed),
            zones: None,
            host,
            config,
        })
    }

    pub fn with_zone_provider(mut self, provider: impl ZoneProvider + 'static) -> Self {
        self.zones = Some(Box::new(provider));
        self
    }

    /// Replace the exclusion-zone source. None means no zones.
    pub fn set_zone_provider(&mut self, provider: Option<Box<dyn ZoneProvider>>) {
        self.zones = provider;
    }

    pub fn phase(&self) -> EnginePhase {
        match self.loader.state() {
            AtlasState::Unloaded => EnginePhase::Uninitialized,
            AtlasState::Loading { .. } => EnginePhase::AtlasLoading,
            AtlasState::Ready(_) => EnginePhase::AtlasReady,
            AtlasState::Failed => EnginePhase::AtlasFailed,
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn pool(&self) -> &ElementPool {
        &self.pool
    }

    pub fn loader(&self) -> &AtlasLoader {
        &self.loader
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Number of releases still waiting for their timer.
    pub fn pending_releases(&self) -> usize {
        self.releases.len()
    }

    /// Feed one pointer sample. The first sample on a capable device
    /// starts the atlas fetch; samples before it completes are dropped.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, now_ms: f64) -> SpawnOutcome {
        if let Some(rejection) = self.gate.session_rejection() {
            return SpawnOutcome::Rejected(rejection);
        }
        if let Some(request) = self.loader.request(now_ms) {
            log::info!("trail: loading atlas {}", request.url);
            self.start_fetch(&request, now_ms);
        }
        self.poll_atlas_timeout(now_ms);

        let position = Vec2::new(x, y);
        match self.gate.evaluate(position, now_ms, self.loader.is_ready(), self.zones.as_deref()) {
            Ok(()) => SpawnOutcome::Spawned(self.spawn(position, now_ms)),
            Err(rejection) => {
                log::debug!("trail: rejected ({:.0}, {:.0}): {:?}", x, y, rejection);
                SpawnOutcome::Rejected(rejection)
            }
        }
    }

    /// Report the result of a fetch the engine asked for.
    pub fn on_atlas_fetched(&mut self, outcome: FetchOutcome, now_ms: f64) {
        let url = outcome.url().to_string();
        let step = self.loader.complete(outcome, now_ms);
        if step == LoadStep::Ignored {
            log::debug!("trail: ignoring stale atlas result for {}", url);
            return;
        }
        self.apply_load_step(step, now_ms);
    }

    /// Apply the target keyframes queued by spawns since the last frame.
    pub fn on_animation_frame(&mut self, now_ms: f64) {
        let transition = Transition {
            duration_ms: self.config.fade_duration_ms,
            easing: self.config.fade_easing,
        };
        for (id, target) in self.frames.take() {
            if self.pool.is_active(id) {
                self.host.animate_to(id, &target, transition, now_ms);
            }
        }
    }

    /// Release every element whose lifetime is over and check the atlas
    /// timeout. Returns how many elements were released.
    pub fn tick(&mut self, now_ms: f64) -> usize {
        self.poll_atlas_timeout(now_ms);
        let due = self.releases.drain_due(now_ms);
        due.into_iter()
            .filter(|id| self.release(*id) != Released::NotActive)
            .count()
    }

    /// Force-release active elements stranded far outside the new viewport.
    /// Returns how many were released.
    pub fn on_resize(&mut self, width: f32, height: f32, now_ms: f64) -> usize {
        let viewport = Rect::new(0.0, 0.0, width, height);
        let stranded = stranded_elements(
            self.pool.active_ids(),
            &self.host,
            &viewport,
            self.config.offscreen_margin_px,
            now_ms,
        );
        if !stranded.is_empty() {
            log::debug!("trail: reclaiming {} off-screen elements", stranded.len());
        }
        stranded
            .into_iter()
            .filter(|id| self.release(*id) != Released::NotActive)
            .count()
    }

    /// Return an element to the pool. Safe to call more than once; only the
    /// first call for an activation has any effect.
    pub fn release(&mut self, id: ElementId) -> Released {
        let released = self.pool.release(id);
        match released {
            Released::Parked => self.host.hide(id),
            Released::Destroyed => self.host.destroy(id),
            Released::NotActive => {
                log::debug!("trail: release of inactive element {:?} ignored", id);
                return released;
            }
        }
        self.releases.cancel(id);
        self.frames.cancel(id);
        released
    }

    fn spawn(&mut self, position: Vec2, now_ms: f64) -> ElementId {
        let acquired = self.pool.acquire();
        let id = acquired.id();
        if let Acquired::Fresh(_) = acquired {
            self.host.create(id);
        }

        let size = self.config.display_size;
        let cell = self.grid.random_cell(&mut self.rng);
        let style = ElementStyle {
            top_left: position - Vec2::splat(size * 0.5),
            size,
            crop_offset: self.grid.crop_offset(cell, size),
            background_size: self.grid.background_size(size),
            keyframe: Keyframe::visible(self.config.initial_opacity),
        };
        self.host.show(id, &style);

        let max = self.config.max_rotation_deg;
        let target = Keyframe {
            opacity: 0.0,
            scale: self.config.end_scale,
            rotation_deg: self.rng.range_f32(-max, max),
        };
        self.frames.push(id, target);
        self.host.request_frame();

        let release_at = now_ms + self.config.element_lifetime_ms;
        self.releases.schedule(id, release_at);
        self.host.request_timer(release_at);
        id
    }

    fn poll_atlas_timeout(&mut self, now_ms: f64) {
        if let Some(step) = self.loader.poll_timeout(now_ms) {
            log::warn!("trail: atlas fetch timed out");
            self.apply_load_step(step, now_ms);
        }
    }

    /// Hand a fetch to the host, plus a wake-up for its deadline if one is set.
    fn start_fetch(&mut self, request: &FetchRequest, now_ms: f64) {
        if !self.host.fetch_atlas(request) {
            log::warn!("trail: could not start fetch of {}", request.url);
            let step = self.loader.complete(FetchOutcome::Failed { url: request.url.clone() }, now_ms);
            self.apply_load_step(step, now_ms);
            return;
        }
        if let Some(timeout) = self.config.load_timeout_ms {
            self.host.request_timer(now_ms + timeout);
        }
    }

    fn apply_load_step(&mut self, step: LoadStep, now_ms: f64) {
        match step {
            LoadStep::Ready(atlas) => {
                let expected = self.grid.sheet_size();
                if (atlas.width as f32) < expected.x || (atlas.height as f32) < expected.y {
                    log::warn!(
                        "trail: atlas {} is {}x{}, smaller than the {}x{} grid",
                        atlas.url, atlas.width, atlas.height, expected.x, expected.y
                    );
                }
                log::info!("trail: atlas ready ({})", atlas.url);
                self.host.atlas_ready(&atlas);
            }
            LoadStep::Retry(request) => {
                log::warn!("trail: primary atlas failed, trying {}", request.url);
                self.start_fetch(&request, now_ms);
            }
            LoadStep::Failed => log::warn!("trail: atlas unavailable, trail disabled"),
            LoadStep::Ignored => {}
        }
    }
}
