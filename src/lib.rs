//! # Sparkles
//!
//! A field of drifting, pointer-shy particles drawn onto a 2D surface.
//!
//! Each particle drifts by a small fixed velocity, wraps around the edges
//! of the canvas, and steps away from the pointer when it comes within 100
//! pixels. The field clears and redraws the whole surface every frame and
//! respawns every particle when the viewport is resized.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sparkles::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     Sparkles::new()
//!         .with_particle_density(200)
//!         .with_particle_color(Color::rgb(0xc4, 0xb5, 0xfd))
//!         .with_background(Color::BLACK)
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! A [`Particle`] has a position, a velocity fixed at creation in
//! `[-0.25, 0.25]` per axis, and a radius fixed at creation in
//! `[min_size, max_size]`.
//!
//! ### Fields and hosts
//!
//! A [`ParticleField`] owns the particles and the drawing surface and runs
//! the `Uninitialized -> Running -> TornDown` lifecycle. It talks to its
//! environment through the [`Host`] trait, so the same loop runs inside a
//! winit window ([`Sparkles`]) or under a test harness.
//!
//! ### Pointer
//!
//! A [`PointerTracker`] is shared by every field in the process. Fields
//! subscribe while mounted and read the latest position each frame.
//!
//! ### Units
//!
//! Positions, radii and the repel radius are logical pixels. The window
//! host converts sizes and cursor positions with the window's scale
//! factor, and the raster is scaled up onto HiDPI surfaces.
//!
//! ## Configuration
//!
//! | Field | Default |
//! |-------|---------|
//! | `min_size` | `0.6` |
//! | `max_size` | `1.4` |
//! | `particle_density` | `100` |
//! | `particle_color` | `#FFFFFF` |
//! | `background` | `transparent` |
//! | `id` | `tsparticles` |
//! | `class_name` | `h-full w-full` |

mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
mod gpu;
pub mod particle;
pub mod pointer;
pub mod schedule;
pub mod surface;
pub mod time;

pub use app::{Sparkles, WindowHost};
pub use color::Color;
pub use config::{ParticleConfig, SparklesConfig};
pub use error::{ConfigError, GpuError, RunError, SurfaceError};
pub use field::{FieldState, Host, ParticleField, Viewport};
pub use glam::Vec2;
pub use particle::Particle;
pub use pointer::{PointerSubscription, PointerTracker};
pub use schedule::FrameTask;
pub use surface::{CommandLog, DrawCommand, DrawSurface, Raster};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use sparkles::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::Sparkles;
    pub use crate::color::Color;
    pub use crate::config::SparklesConfig;
    pub use crate::error::RunError;
    pub use crate::field::{FieldState, Host, ParticleField, Viewport};
    pub use crate::pointer::PointerTracker;
    pub use crate::surface::{DrawSurface, Raster};
    pub use crate::Vec2;
}
