//! Error types for sparkles.
//!
//! Configuration errors are reported to the caller. Surface and GPU errors
//! never reach the user: the field logs them and stays empty.

use thiserror::Error;

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML or has wrong field types.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A color string could not be parsed.
    #[error("Invalid color '{0}'. Expected #RGB, #RGBA, #RRGGBB, #RRGGBBAA or a keyword.")]
    InvalidColor(String),
    /// Particle size bounds are negative, non-finite or inverted.
    #[error("Invalid particle size range: min {min}, max {max}")]
    InvalidSizeRange { min: f32, max: f32 },
}

/// Errors that can occur when acquiring a drawing surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The host has no drawing surface to offer.
    #[error("Drawing surface unavailable")]
    Unavailable,
    /// The viewport has a zero dimension.
    #[error("Cannot create a {width}x{height} drawing surface")]
    ZeroSized { width: u32, height: u32 },
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the sparkles window.
#[derive(Debug, Error)]
pub enum RunError {
    /// The event loop failed while running.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// The configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
