//! Configuration loader/writer plus strongly typed settings structures.
//!
//! Settings live in a single `config.toml` under the data directory
//! (`~/.ninebox/` unless `NINEBOX_DIR` points elsewhere). The embedded default is
//! written out on first run so there is always a file to edit.

use crate::core::breakpoint::DEFAULT_BREAKPOINT;
use crate::core::palette::{Palette, DEFAULT_COLORS};
use crate::core::viewport::MediaQuery;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "NINEBOX_DIR";

/// Largest accepted `viewport.cell_width_px`
pub const MAX_CELL_WIDTH_PX: u32 = 1000;

/// Top-level configuration object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breakpoint: BreakpointConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakpointConfig {
    #[serde(default = "default_query")]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_cells_per_rem_x")]
    pub cells_per_rem_x: f32,
    #[serde(default = "default_cells_per_rem_y")]
    pub cells_per_rem_y: f32,
    #[serde(default = "default_show_labels")]
    pub show_labels: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_query() -> String {
    DEFAULT_BREAKPOINT.to_string()
}

fn default_cell_width_px() -> u32 {
    8
}

fn default_colors() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
}

fn default_cells_per_rem_x() -> f32 {
    2.0
}

fn default_cells_per_rem_y() -> f32 {
    0.5
}

fn default_show_labels() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    16
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            cell_width_px: default_cell_width_px(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            seed: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cells_per_rem_x: default_cells_per_rem_x(),
            cells_per_rem_y: default_cells_per_rem_y(),
            show_labels: default_show_labels(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breakpoint: BreakpointConfig::default(),
            viewport: ViewportConfig::default(),
            palette: PaletteConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Config {
    /// Load from the data directory, extracting defaults if nothing is there yet
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::extract_defaults(&path)?;
        Self::load_from_path(&path)
    }

    /// Load from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// The embedded default, parsed
    #[cfg(test)]
    pub fn embedded_default() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG).context("Embedded default config is invalid")
    }

    /// Check everything the layout needs before mounting
    pub fn validate(&self) -> Result<()> {
        MediaQuery::parse(&self.breakpoint.query).context("breakpoint.query")?;
        Palette::from_list(self.palette.colors.as_slice()).context("palette.colors")?;

        if self.viewport.cell_width_px == 0 || self.viewport.cell_width_px > MAX_CELL_WIDTH_PX {
            anyhow::bail!(
                "viewport.cell_width_px must be between 1 and {}",
                MAX_CELL_WIDTH_PX
            );
        }
        if self.render.cells_per_rem_x < 0.0 || self.render.cells_per_rem_y < 0.0 {
            anyhow::bail!("render.cells_per_rem_x/y must not be negative");
        }
        Ok(())
    }

    fn extract_defaults(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context(format!("Failed to create {:?}", dir))?;
        }
        fs::write(path, DEFAULT_CONFIG).context("Failed to write default config.toml")?;
        tracing::info!("Extracted default config to {:?}", path);
        Ok(())
    }

    /// Get the base ninebox directory (~/.ninebox/)
    /// Can be overridden with NINEBOX_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".ninebox"))
    }

    /// Returns: ~/.ninebox/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ninebox-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_embedded_default_is_valid() {
        let config = Config::embedded_default().unwrap();
        config.validate().unwrap();
        assert_eq!(config.breakpoint.query, "(max-width: 600px)");
        assert_eq!(config.palette.colors.len(), 9);
        assert_eq!(config.palette.colors[0], "#0289DF");
        assert_eq!(config.palette.seed, None);
        assert_eq!(config.viewport.cell_width_px, 8);
    }

    #[test]
    fn test_embedded_default_matches_code_default() {
        let embedded = Config::embedded_default().unwrap();
        let code = Config::default();
        assert_eq!(embedded.palette.colors, code.palette.colors);
        assert_eq!(embedded.breakpoint.query, code.breakpoint.query);
        assert_eq!(embedded.render.poll_interval_ms, code.render.poll_interval_ms);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml("[palette]\nseed = 5\n").unwrap();
        assert_eq!(config.palette.seed, Some(5));
        assert_eq!(config.palette.colors.len(), 9);
        assert_eq!(config.breakpoint.query, DEFAULT_BREAKPOINT);
        assert!(config.render.show_labels);
    }

    #[test]
    fn test_validate_rejects_short_palette() {
        let config = Config::from_toml("[palette]\ncolors = [\"#000000\", \"#ffffff\"]\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("exactly 9"));
    }

    #[test]
    fn test_validate_rejects_bad_query() {
        let config = Config::from_toml("[breakpoint]\nquery = \"(max-height: 10px)\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cell_width() {
        let mut config = Config::default();
        config.viewport.cell_width_px = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_cell_width() {
        let mut config = Config::default();
        config.viewport.cell_width_px = MAX_CELL_WIDTH_PX;
        config.validate().unwrap();

        let config = Config::from_toml("[viewport]\ncell_width_px = 100000000\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("cell_width_px"));
    }

    #[test]
    fn test_extract_then_load() {
        let dir = scratch_dir("extract");
        let path = dir.join("config.toml");

        Config::extract_defaults(&path).unwrap();
        assert!(path.exists());
        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.palette.colors, default_colors());

        // Existing file is left alone
        fs::write(&path, "[palette]\nseed = 99\n").unwrap();
        Config::extract_defaults(&path).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap().palette.seed, Some(99));

        let _ = fs::remove_dir_all(&dir);
    }
}
