//! A single sparkle: position, velocity, radius.
//!
//! Particles never read each other's state. Each frame a particle drifts by
//! its velocity, wraps around the canvas edges, and steps away from the
//! pointer when it is close.

use glam::Vec2;
use rand::Rng;

use crate::config::ParticleConfig;
use crate::surface::DrawSurface;

/// Largest velocity component, in pixels per frame.
pub const MAX_SPEED: f32 = 0.25;

/// Pointer distance below which particles are pushed away.
pub const REPEL_RADIUS: f32 = 100.0;

/// Distance a repelled particle moves per frame.
pub const REPEL_STEP: f32 = 1.0;

/// One animated point in a particle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in canvas pixels.
    pub position: Vec2,
    /// Radius, fixed at creation.
    pub size: f32,
    /// Displacement per frame, fixed at creation.
    pub velocity: Vec2,
}

impl Particle {
    /// Spawn a particle at a uniformly random point of a `width` x `height`
    /// canvas, with a random radius in `[min_size, max_size]` and random
    /// velocity components in `[-0.25, 0.25]`.
    pub fn create<R: Rng + ?Sized>(
        width: f32,
        height: f32,
        config: &ParticleConfig,
        rng: &mut R,
    ) -> Self {
        let position = Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height);
        let size = rng.gen::<f32>() * (config.max_size - config.min_size) + config.min_size;
        let velocity = Vec2::new(
            rng.gen::<f32>() * 2.0 * MAX_SPEED - MAX_SPEED,
            rng.gen::<f32>() * 2.0 * MAX_SPEED - MAX_SPEED,
        );
        Self {
            position,
            size,
            velocity,
        }
    }

    /// Advance one frame on a `bounds.x` x `bounds.y` canvas.
    ///
    /// Drift by velocity, then wrap: past the high edge resets to 0, below 0
    /// resets to the high edge. After wrapping, a particle within
    /// [`REPEL_RADIUS`] of the pointer moves [`REPEL_STEP`] directly away
    /// from it, regardless of how close it is.
    pub fn update(&mut self, bounds: Vec2, pointer: Vec2) {
        self.position += self.velocity;

        if self.position.x > bounds.x {
            self.position.x = 0.0;
        }
        if self.position.x < 0.0 {
            self.position.x = bounds.x;
        }
        if self.position.y > bounds.y {
            self.position.y = 0.0;
        }
        if self.position.y < 0.0 {
            self.position.y = bounds.y;
        }

        let delta = pointer - self.position;
        if delta.length() < REPEL_RADIUS {
            // atan2(0, 0) is 0, so a pointer exactly on the particle pushes it left.
            let angle = delta.y.atan2(delta.x);
            self.position.x -= angle.cos() * REPEL_STEP;
            self.position.y -= angle.sin() * REPEL_STEP;
        }
    }

    /// Fill a circle of radius `size` at the particle's position.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, config: &ParticleConfig) {
        surface.set_fill_style(config.particle_color);
        surface.begin_path();
        surface.arc(
            self.position.x,
            self.position.y,
            self.size,
            0.0,
            std::f32::consts::TAU,
        );
        surface.fill();
    }
}
