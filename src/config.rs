//! Run configuration.
//!
//! Every field has a default matching the published dashboard, so the
//! program runs with no configuration at all. A `geodash.toml` in the
//! working directory overrides any subset of fields.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::color::ColorMap;
use crate::data::merge::DEFAULT_MISSING_PLACEHOLDER;
use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "geodash.toml";

/// Source files, in the order they are merged.
pub const DEFAULT_SOURCES: [&str; 4] = [
    "CUERPO_COSTEROS.csv",
    "CUERPO_LENTICOS.csv",
    "CUERPO_LOTICOS.csv",
    "CUERPO_SUBTERRANEO.csv",
];

pub const DEFAULT_CDN_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the source names are resolved against. Empty means the
    /// working directory, so paths stay bare in messages.
    pub data_dir: PathBuf,
    pub sources: Vec<String>,
    /// Where the HTML document is written.
    pub output: PathBuf,
    /// Open the exported document in the system viewer.
    pub open_viewer: bool,
    pub missing_placeholder: String,
    pub cdn_url: String,
    pub chart: ChartConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            output: PathBuf::from("index.html"),
            open_viewer: true,
            missing_placeholder: DEFAULT_MISSING_PLACEHOLDER.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            chart: ChartConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub title: String,
    pub font_family: String,
    pub font_color: String,
    pub marker_size: f64,
    pub zoom: f64,
    /// Slider step duration in milliseconds.
    pub transition_ms: u64,
    /// Quality label → CSS colour name. Empty means the built-in map.
    pub quality_colors: BTreeMap<String, String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Visualización de Datos: Calidad del Agua - QROO".to_string(),
            font_family: "Roboto, monospace".to_string(),
            font_color: "RebeccaPurple".to_string(),
            marker_size: 10.0,
            zoom: 6.3,
            transition_ms: 500,
            quality_colors: BTreeMap::new(),
        }
    }
}

impl ChartConfig {
    pub fn color_map(&self) -> Result<ColorMap, ConfigError> {
        if self.quality_colors.is_empty() {
            Ok(ColorMap::default())
        } else {
            ColorMap::from_names(&self.quality_colors)
        }
    }
}

impl Config {
    /// Load `geodash.toml` from the working directory, or defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            log::debug!("{CONFIG_FILE} not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Source paths resolved against `data_dir`, in merge order.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.sources.iter().map(|s| self.data_dir.join(s)).collect()
    }
}
