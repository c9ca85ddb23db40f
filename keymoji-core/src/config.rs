use config::{Config, File};
use keymoji_types::Style;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ladder::{RasterLadder, DEFAULT_RASTER_SIZES};
use crate::registry::StyleRegistry;
use crate::resolver::{
    ResolverOptions, DEFAULT_GROWTH_FACTOR, DEFAULT_PROBE_GLYPH, DEFAULT_SUB_DIR,
};

pub const CONFIG_FILE_NAME: &str = "keymoji.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root of all emoji data, usually `~/.local/share`
    pub base_dir: String,
    pub sub_dir: String,
    pub raster_sizes: Vec<u32>,
    pub growth_factor: f64,
    pub probe_glyph: String,
    /// Registry key of the style used when none is given
    pub default_style: String,
    /// Extra styles, replacing built-ins with the same key
    #[serde(default)]
    pub styles: HashMap<String, Style>,
}

impl Settings {
    /// Load `keymoji.toml` from the current directory (if any) and the environment
    pub fn new() -> Result<Self> {
        Self::load(None)
    }

    /// Load settings from `path`, or from `keymoji.toml` when no path is given
    ///
    /// `KEYMOJI_BASE_DIR`, `KEYMOJI_SUB_DIR` and `KEYMOJI_STYLE` override the
    /// file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut overrides = Vec::new();
        if let Ok(base_dir) = std::env::var("KEYMOJI_BASE_DIR") {
            overrides.push(("base_dir", base_dir));
        }
        if let Ok(sub_dir) = std::env::var("KEYMOJI_SUB_DIR") {
            overrides.push(("sub_dir", sub_dir));
        }
        if let Ok(style) = std::env::var("KEYMOJI_STYLE") {
            overrides.push(("default_style", style));
        }
        Self::load_with_overrides(path, &overrides)
    }

    pub fn load_with_overrides(path: Option<&Path>, overrides: &[(&str, String)]) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_dir", default_base_dir())?
            .set_default("sub_dir", DEFAULT_SUB_DIR)?
            .set_default(
                "raster_sizes",
                DEFAULT_RASTER_SIZES
                    .iter()
                    .map(|&size| i64::from(size))
                    .collect::<Vec<_>>(),
            )?
            .set_default("growth_factor", DEFAULT_GROWTH_FACTOR)?
            .set_default("probe_glyph", DEFAULT_PROBE_GLYPH)?
            .set_default("default_style", "twemoji")?;

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                if local.exists() {
                    builder = builder.add_source(File::from(local).required(false));
                }
            }
        }

        for (key, value) in overrides {
            builder = builder.set_override(*key, value.as_str())?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        tracing::info!(
            "Emoji data at {}/{}, default style {}",
            settings.base_dir,
            settings.sub_dir,
            settings.default_style
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        RasterLadder::new(self.raster_sizes.clone())?;
        if !self.growth_factor.is_finite() || self.growth_factor <= 0.0 {
            return Err(Error::InvalidGrowthFactor(self.growth_factor));
        }
        if self.probe_glyph.trim().is_empty() {
            return Err(Error::InvalidSettings(
                "probe glyph must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolver_options(&self) -> Result<ResolverOptions> {
        Ok(ResolverOptions {
            base_dir: self.base_dir.clone(),
            sub_dir: self.sub_dir.clone(),
            ladder: RasterLadder::new(self.raster_sizes.clone())?,
            growth_factor: self.growth_factor,
            probe_glyph: self.probe_glyph.clone(),
        })
    }

    /// Built-in styles plus the configured ones
    pub fn registry(&self) -> Result<StyleRegistry> {
        let mut registry = StyleRegistry::builtin();
        for (key, style) in &self.styles {
            registry.register(key.as_str(), style.clone())?;
        }
        Ok(registry)
    }
}

/// The user data directory, e.g. `~/.local/share`
pub fn default_base_dir() -> String {
    dirs::data_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}
