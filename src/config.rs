use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/radoi90/housequest-data/master/london_boroughs.geojson";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub boundary: BoundaryConfig,
    pub map: MapConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub places_csv: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            places_csv: PathBuf::from("resources/places.csv"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoundaryConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BOUNDARY_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Presentation constants for the composed map and the host page.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: f64,
    pub popup_max_width: u32,
    pub height_px: u32,
    pub page_title: String,
    pub page_icon: String,
    pub heading: String,
    pub subheading: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 10.5,
            popup_max_width: 300,
            height_px: 600,
            page_title: "Prevista - London".to_string(),
            page_icon: "https://lirp.cdn-website.com/d8120025/dms3rep/multi/opt/social-image-88w.png"
                .to_string(),
            heading: "London Map - UK".to_string(),
            subheading: "Delivery Centres & JCP".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Built-in defaults unless a config file was given.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
