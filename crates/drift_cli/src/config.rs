//! Drift configuration file handling

use anyhow::{Context, Result};
use drift_layout::{CarouselConfig, CarouselLayout, CarouselMetrics, ListConfig, ScrollConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "drift.toml";

/// Top-level Drift configuration (drift.toml)
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct DriftConfig {
    /// Scroll physics for the list
    #[serde(default)]
    pub scroll: ScrollConfig,
    /// List grid and row count
    #[serde(default)]
    pub list: ListConfig,
    /// Carousel tuning
    #[serde(default)]
    pub carousel: CarouselConfig,
    /// Carousel measurements
    #[serde(default)]
    pub carousel_layout: CarouselLayout,
}

impl DriftConfig {
    /// Load configuration from a file, or from `drift.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!("No configuration found at {}", config_path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

        tracing::debug!("loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Load an explicit path, else `./drift.toml` when present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.exists() {
                    Self::load(local)
                } else {
                    tracing::debug!("no {} found, using defaults", CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DriftConfig = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.scroll.validate().context("Invalid [scroll] section")?;
        self.list.validate().context("Invalid [list] section")?;
        self.carousel
            .validate()
            .context("Invalid [carousel] section")?;
        self.carousel_layout
            .validate()
            .context("Invalid [carousel_layout] section")?;
        CarouselMetrics::compute(&self.carousel, &self.carousel_layout)
            .validate()
            .context("Invalid [carousel_layout] section")?;
        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
