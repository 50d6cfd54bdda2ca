//! The particle field: a collection of sparkles and the loop that animates it.
//!
//! A [`ParticleField`] moves through three states:
//!
//! ```text
//! Uninitialized --mount--> Running --unmount--> TornDown
//!                           |    ^
//!                           +----+  frame / resize
//! ```
//!
//! Everything environment-specific sits behind [`Host`]: measuring the
//! viewport, handing out a drawing surface, and scheduling the next frame.
//! The winit application is one host; tests supply their own.
//!
//! # Example
//!
//! ```ignore
//! let mut field = ParticleField::new(host, SparklesConfig::default(), pointer.clone())?;
//! field.mount();
//!
//! // On every frame callback from the host:
//! field.frame();
//!
//! // On window resize:
//! field.resize(Viewport::new(1920, 1080));
//!
//! field.unmount();
//! ```

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::PhysicalSize;

use crate::config::{ParticleConfig, SparklesConfig};
use crate::error::{ConfigError, SurfaceError};
use crate::particle::Particle;
use crate::pointer::{PointerSubscription, PointerTracker};
use crate::schedule::FrameTask;
use crate::surface::DrawSurface;

/// Viewport dimensions in logical pixels.
///
/// Sizes and the repel radius are measured in the same units, so a field
/// looks the same on a HiDPI display as on a standard one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert a window's physical size using its scale factor.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical = size.to_logical::<f64>(scale_factor);
        Self::new(logical.width.round() as u32, logical.height.round() as u32)
    }

    /// Dimensions as a float vector, the canvas extent particles wrap at.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// The environment a field runs in.
pub trait Host {
    /// Drawing surface type handed out by this host.
    type Surface: DrawSurface;

    /// Current viewport size. `None` when there is no visual environment.
    fn viewport(&self) -> Option<Viewport>;

    /// Create a drawing surface sized to `viewport`.
    fn acquire_surface(&mut self, viewport: Viewport) -> Result<Self::Surface, SurfaceError>;

    /// Ask for [`ParticleField::frame`] to be called once more.
    fn request_frame(&mut self);
}

/// Lifecycle state of a [`ParticleField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Not mounted yet, or mounting failed.
    Uninitialized,
    /// Producing frames.
    Running,
    /// Unmounted. Terminal.
    TornDown,
}

/// An animated field of particles drawn onto a host surface.
pub struct ParticleField<H: Host> {
    host: H,
    config: SparklesConfig,
    particle_config: ParticleConfig,
    rng: StdRng,
    pointer: PointerTracker,
    state: FieldState,
    viewport: Viewport,
    surface: Option<H::Surface>,
    particles: Vec<Particle>,
    generation: u64,
    subscription: Option<PointerSubscription>,
    task: Option<FrameTask>,
    mount_error: Option<SurfaceError>,
}

impl<H: Host> ParticleField<H> {
    /// Create an unmounted field. Fails if `config` does not validate.
    pub fn new(
        host: H,
        config: SparklesConfig,
        pointer: PointerTracker,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            host,
            particle_config: config.particle_config(),
            viewport: Viewport::new(config.initial_width, config.initial_height),
            config,
            rng,
            pointer,
            state: FieldState::Uninitialized,
            surface: None,
            particles: Vec::new(),
            generation: 0,
            subscription: None,
            task: None,
            mount_error: None,
        })
    }

    /// Allocate the surface, spawn the particles and schedule the first frame.
    ///
    /// Without a visual environment, or when the host cannot provide a
    /// surface, the field stays [`FieldState::Uninitialized`] and nothing is
    /// drawn. Mounting a field that is not uninitialized does nothing.
    pub fn mount(&mut self) -> FieldState {
        if self.state != FieldState::Uninitialized {
            return self.state;
        }

        let Some(viewport) = self.host.viewport() else {
            tracing::debug!(id = %self.config.id, "no visual environment, field not mounted");
            return self.state;
        };

        let surface = match self.host.acquire_surface(viewport) {
            Ok(surface) => surface,
            Err(e) => {
                tracing::warn!(id = %self.config.id, "field not mounted: {}", e);
                self.mount_error = Some(e);
                return self.state;
            }
        };

        self.mount_error = None;
        self.viewport = viewport;
        self.surface = Some(surface);
        self.respawn();
        self.subscription = Some(self.pointer.subscribe());
        self.task = Some(FrameTask::new());
        self.state = FieldState::Running;

        tracing::debug!(
            id = %self.config.id,
            class = %self.config.class_name,
            width = viewport.width,
            height = viewport.height,
            particles = self.particles.len(),
            "field mounted"
        );

        self.host.request_frame();
        self.state
    }

    /// Run one frame: clear, update every particle, draw every particle,
    /// schedule the next frame.
    ///
    /// Returns `false` without touching anything when the field is not
    /// running, including frames that were queued before [`unmount`].
    ///
    /// [`unmount`]: ParticleField::unmount
    pub fn frame(&mut self) -> bool {
        if self.state != FieldState::Running {
            return false;
        }
        let Some(task) = self.task.clone() else {
            return false;
        };

        if !task.run(|| self.render()) {
            return false;
        }
        tracing::trace!(frame = task.iterations(), "frame rendered");

        self.host.request_frame();
        true
    }

    fn render(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let bounds = self.viewport.extent();
        let pointer = self
            .subscription
            .as_ref()
            .map(PointerSubscription::position)
            .unwrap_or_else(|| self.pointer.position());

        surface.clear();
        for particle in &mut self.particles {
            particle.update(bounds, pointer);
        }
        for particle in &self.particles {
            particle.draw(surface, &self.particle_config);
        }
    }

    /// Adopt a new viewport size: resize the surface and replace every
    /// particle with a fresh one spawned inside the new bounds.
    ///
    /// Ignored unless the field is running.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.state != FieldState::Running {
            return;
        }
        self.viewport = viewport;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport.width, viewport.height);
        }
        self.respawn();

        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            generation = self.generation,
            "field resized"
        );
    }

    /// Swap in a new configuration.
    ///
    /// Changes to particle size, color or density remount a running field:
    /// the frame task is cancelled, the surface is re-acquired and a new
    /// particle collection is spawned. Other changes apply in place.
    /// Returns whether the field was remounted.
    ///
    /// An invalid `config` is rejected before anything is released, leaving
    /// the field exactly as it was.
    pub fn reconfigure(&mut self, config: SparklesConfig) -> Result<bool, ConfigError> {
        config.validate()?;
        let rebuild = self.config.needs_rebuild(&config);
        self.particle_config = config.particle_config();
        self.config = config;

        if !rebuild || self.state != FieldState::Running {
            return Ok(false);
        }

        tracing::debug!(id = %self.config.id, "configuration changed, remounting field");
        self.release();
        self.state = FieldState::Uninitialized;
        self.mount();
        Ok(true)
    }

    /// Stop the loop for good: cancel the pending frame and detach from
    /// pointer and resize events.
    pub fn unmount(&mut self) {
        if self.state == FieldState::TornDown {
            return;
        }
        self.release();
        self.state = FieldState::TornDown;
        tracing::debug!(id = %self.config.id, "field torn down");
    }

    fn release(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        self.subscription = None;
        self.surface = None;
        self.particles.clear();
    }

    /// Replace the whole collection with `particle_density` new particles.
    fn respawn(&mut self) {
        let extent = self.viewport.extent();
        self.particles = (0..self.config.particle_density)
            .map(|_| Particle::create(extent.x, extent.y, &self.particle_config, &mut self.rng))
            .collect();
        self.generation += 1;
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    /// Why the last mount attempt was aborted, if it was.
    pub fn mount_error(&self) -> Option<&SurfaceError> {
        self.mount_error.as_ref()
    }

    /// Whether a later resize may succeed where mounting failed: only a
    /// zero-sized viewport is expected to go away on its own.
    pub fn awaits_nonzero_size(&self) -> bool {
        self.state == FieldState::Uninitialized
            && matches!(self.mount_error, Some(SurfaceError::ZeroSized { .. }))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Incremented every time the collection is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Frames rendered since the last mount.
    pub fn frames_rendered(&self) -> u64 {
        self.task.as_ref().map(FrameTask::iterations).unwrap_or(0)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &SparklesConfig {
        &self.config
    }

    pub fn surface(&self) -> Option<&H::Surface> {
        self.surface.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: Host> Drop for ParticleField<H> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CommandLog;

    struct TestHost {
        viewport: Option<Viewport>,
        requests: u32,
    }

    impl Host for TestHost {
        type Surface = CommandLog;

        fn viewport(&self) -> Option<Viewport> {
            self.viewport
        }

        fn acquire_surface(&mut self, viewport: Viewport) -> Result<CommandLog, SurfaceError> {
            Ok(CommandLog::new(viewport.width, viewport.height))
        }

        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn field(density: usize) -> ParticleField<TestHost> {
        let host = TestHost {
            viewport: Some(Viewport::new(100, 100)),
            requests: 0,
        };
        let config = SparklesConfig {
            particle_density: density,
            seed: Some(11),
            ..Default::default()
        };
        ParticleField::new(host, config, PointerTracker::new()).unwrap()
    }

    #[test]
    fn test_initial_viewport_before_mount() {
        let field = field(5);
        assert_eq!(field.viewport(), Viewport::new(1200, 800));
        assert_eq!(field.state(), FieldState::Uninitialized);
        assert!(field.particles().is_empty());
    }

    #[test]
    fn test_mount_spawns_and_schedules() {
        let mut field = field(5);
        assert_eq!(field.mount(), FieldState::Running);
        assert_eq!(field.particles().len(), 5);
        assert_eq!(field.host().requests, 1);
        assert_eq!(field.generation(), 1);

        // Second mount is a no-op.
        field.mount();
        assert_eq!(field.host().requests, 1);
        assert_eq!(field.generation(), 1);
    }

    #[test]
    fn test_frame_clears_then_draws_every_particle() {
        let mut field = field(4);
        field.mount();
        assert!(field.frame());

        let surface = field.surface().unwrap();
        assert!(matches!(
            surface.commands()[0],
            crate::surface::DrawCommand::ClearRect { .. }
        ));
        assert_eq!(surface.filled_circles().len(), 4);
        assert_eq!(field.frames_rendered(), 1);
        assert_eq!(field.host().requests, 2);
    }

    #[test]
    fn test_resize_ignored_when_not_running() {
        let mut field = field(3);
        field.resize(Viewport::new(10, 10));
        assert!(field.particles().is_empty());
        assert_eq!(field.viewport(), Viewport::new(1200, 800));
    }

    #[test]
    fn test_viewport_from_physical_uses_scale_factor() {
        let size = PhysicalSize::new(2400, 1600);
        assert_eq!(Viewport::from_physical(size, 2.0), Viewport::new(1200, 800));
        assert_eq!(Viewport::from_physical(size, 1.0), Viewport::new(2400, 1600));
        assert_eq!(
            Viewport::from_physical(PhysicalSize::new(301, 3), 1.5),
            Viewport::new(201, 2)
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let host = TestHost {
            viewport: Some(Viewport::new(100, 100)),
            requests: 0,
        };
        let config = SparklesConfig {
            min_size: 3.0,
            max_size: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            ParticleField::new(host, config, PointerTracker::new()),
            Err(ConfigError::InvalidSizeRange { .. })
        ));
    }

    #[test]
    fn test_unmount_is_terminal() {
        let mut field = field(3);
        field.mount();
        field.unmount();
        assert_eq!(field.state(), FieldState::TornDown);
        assert_eq!(field.mount(), FieldState::TornDown);
        assert!(!field.frame());
        assert!(field.surface().is_none());
    }
}
