//! Window builder and runner.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::color::Color;
use crate::config::SparklesConfig;
use crate::error::{RunError, SurfaceError};
use crate::field::{Host, ParticleField, Viewport};
use crate::gpu::GpuPresenter;
use crate::pointer::PointerTracker;
use crate::surface::Raster;
use crate::time::FrameClock;

/// A sparkles window builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// Sparkles::new()
///     .with_particle_density(250)
///     .with_particle_color(Color::rgb(0xc4, 0xb5, 0xfd))
///     .run()?;
/// ```
pub struct Sparkles {
    config: SparklesConfig,
}

impl Sparkles {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::from_config(SparklesConfig::default())
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SparklesConfig) -> Self {
        Self { config }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.config.id = id.into();
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.config.background = color;
        self
    }

    pub fn with_min_size(mut self, size: f32) -> Self {
        self.config.min_size = size;
        self
    }

    pub fn with_max_size(mut self, size: f32) -> Self {
        self.config.max_size = size;
        self
    }

    /// Set the number of particles.
    pub fn with_particle_density(mut self, density: usize) -> Self {
        self.config.particle_density = density;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.config.class_name = class_name.into();
        self
    }

    pub fn with_particle_color(mut self, color: Color) -> Self {
        self.config.particle_color = color;
        self
    }

    /// Seed the particle generator for a reproducible field.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &SparklesConfig {
        &self.config
    }

    /// Run the window. Blocks until it is closed.
    ///
    /// Without a display this logs and returns `Ok(())`: there is nothing
    /// to draw on, which is not an error.
    pub fn run(self) -> Result<(), RunError> {
        self.config.validate()?;

        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                tracing::info!("no display available, nothing to draw: {}", e);
                return Ok(());
            }
        };
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

impl Default for Sparkles {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Host`] backed by a winit window.
///
/// Frames are scheduled with `request_redraw`. The surface is a CPU raster
/// in logical pixels that [`GpuPresenter`] scales onto the window, so it is
/// only available when the GPU came up.
pub struct WindowHost {
    window: Arc<Window>,
    gpu_ready: bool,
}

impl Host for WindowHost {
    type Surface = Raster;

    fn viewport(&self) -> Option<Viewport> {
        Some(Viewport::from_physical(
            self.window.inner_size(),
            self.window.scale_factor(),
        ))
    }

    fn acquire_surface(&mut self, viewport: Viewport) -> Result<Raster, SurfaceError> {
        if !self.gpu_ready {
            return Err(SurfaceError::Unavailable);
        }
        if viewport.width == 0 || viewport.height == 0 {
            return Err(SurfaceError::ZeroSized {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Raster::new(viewport.width, viewport.height))
    }

    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

struct App {
    config: SparklesConfig,
    pointer: PointerTracker,
    window: Option<Arc<Window>>,
    presenter: Option<GpuPresenter>,
    field: Option<ParticleField<WindowHost>>,
    clock: FrameClock,
}

impl App {
    fn new(config: SparklesConfig) -> Self {
        Self {
            config,
            pointer: PointerTracker::new(),
            window: None,
            presenter: None,
            field: None,
            clock: FrameClock::new(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(field) = self.field.as_mut() else {
            return;
        };
        if !field.frame() {
            return;
        }

        let refreshed = self.clock.tick();
        tracing::trace!(
            frame = self.clock.frame(),
            delta_ms = self.clock.delta() * 1000.0,
            "frame presented"
        );
        if refreshed {
            if let Some(window) = &self.window {
                window.set_title(&format!("{} - {:.0} FPS", self.config.id, self.clock.fps()));
            }
        }

        let (Some(presenter), Some(raster)) = (self.presenter.as_mut(), field.surface()) else {
            return;
        };
        match presenter.present(raster) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => presenter.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory, closing");
                field.unmount();
                event_loop.exit();
            }
            Err(e) => tracing::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.id.clone())
            .with_transparent(self.config.background.a < 255)
            .with_inner_size(LogicalSize::new(
                self.config.initial_width,
                self.config.initial_height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::warn!("could not create window, nothing to draw: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        self.presenter = match pollster::block_on(GpuPresenter::new(
            window.clone(),
            self.config.background,
        )) {
            Ok(presenter) => Some(presenter),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        };

        let host = WindowHost {
            window,
            gpu_ready: self.presenter.is_some(),
        };
        match ParticleField::new(host, self.config.clone(), self.pointer.clone()) {
            Ok(mut field) => {
                field.mount();
                self.field = Some(field);
            }
            Err(e) => {
                tracing::error!("invalid configuration: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(field) = &mut self.field {
                    field.unmount();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size);
                }
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                if let Some(field) = &mut self.field {
                    // Some platforms report a zero-sized window until the first resize.
                    if field.awaits_nonzero_size() {
                        field.mount();
                    } else {
                        field.resize(Viewport::from_physical(physical_size, scale_factor));
                    }
                }
            }
            WindowEvent::CursorMoved { .. } => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.pointer.handle_event(&event, scale_factor);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
