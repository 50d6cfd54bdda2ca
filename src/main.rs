//! Sparkles window - a pointer-reactive particle field.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sparkles::{Color, Sparkles, SparklesConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sparkles")]
#[command(about = "Animated particle field that drifts away from the pointer", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Smallest particle radius in pixels
    #[arg(long)]
    min_size: Option<f32>,

    /// Largest particle radius in pixels
    #[arg(long)]
    max_size: Option<f32>,

    /// Number of particles
    #[arg(long)]
    density: Option<usize>,

    /// Particle color (e.g. "#FFFFFF")
    #[arg(long)]
    color: Option<Color>,

    /// Background color (e.g. "transparent", "#000000")
    #[arg(long)]
    background: Option<Color>,

    /// Field identifier, shown as the window title
    #[arg(long)]
    id: Option<String>,

    /// Seed for a reproducible field
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<SparklesConfig> {
        let mut config = match &self.config {
            Some(path) => SparklesConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SparklesConfig::default(),
        };

        if let Some(v) = self.min_size {
            config.min_size = v;
        }
        if let Some(v) = self.max_size {
            config.max_size = v;
        }
        if let Some(v) = self.density {
            config.particle_density = v;
        }
        if let Some(v) = self.color {
            config.particle_color = v;
        }
        if let Some(v) = self.background {
            config.background = v;
        }
        if let Some(v) = self.id {
            config.id = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse().into_config()?;
    Sparkles::from_config(config).run()?;
    Ok(())
}
