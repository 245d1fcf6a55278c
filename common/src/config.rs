use std::{fmt, fs, path::Path, str::FromStr};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Distance between two consecutive layers, in mesh units.
    pub step: f64,
    /// Number of worker threads used to slice layers. Zero uses one worker
    /// per available core.
    pub workers: usize,
    /// How segments sharing a start point are joined into paths.
    pub join: JoinStrategy,
    /// Group the contours of each layer into polygons with holes before
    /// writing them out.
    pub nest_polygons: bool,
    /// Used when layers are also written out as images.
    pub raster: RasterConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    /// Pixels kept free around the fitted bounds.
    pub padding: f64,
    pub fill_rule: FillRule,
}

/// Which regions enclosed by a layer's paths get filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// Inside wherever the paths wind around a point a non-zero number of
    /// times. Overlapping outer boundaries merge.
    #[default]
    NonZero,
    /// Inside wherever an odd number of paths surround a point.
    EvenOdd,
}

/// Strategy used when more than one segment of a layer starts at the same
/// point, which only happens on non-manifold meshes or where surfaces touch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// Keep a single segment per start point, the last one seen wins. Extra
    /// segments are dropped.
    #[default]
    LastWriter,
    /// Keep every segment and, at a branch, continue along the one turning
    /// furthest towards the solid side.
    Branching,
}

impl SliceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(if path.exists() {
            let file = fs::read(path)?;
            let string = String::from_utf8_lossy(&file);
            let config = toml::from_str(&string)?;
            info!("Loaded slice config from `{}`", path.display());
            config
        } else {
            info!("No slice config at `{}`, using defaults", path.display());
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let string = toml::to_string(self)?;
        fs::write(path, string)?;
        Ok(())
    }
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            workers: 0,
            join: JoinStrategy::default(),
            nest_polygons: false,
            raster: RasterConfig::default(),
        }
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1600,
            padding: 50.0,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl FromStr for JoinStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "last_writer" => Ok(Self::LastWriter),
            "branching" => Ok(Self::Branching),
            _ => Err(format!(
                "unknown join strategy `{s}`, expected `last-writer` or `branching`"
            )),
        }
    }
}

impl fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LastWriter => "last-writer",
            Self::Branching => "branching",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: SliceConfig = toml::from_str("step = 0.25").unwrap();
        assert_eq!(config.step, 0.25);
        assert_eq!(config.workers, 0);
        assert_eq!(config.join, JoinStrategy::LastWriter);
        assert!(!config.nest_polygons);
        assert_eq!(config.raster, RasterConfig::default());
    }

    #[test]
    fn raster_table() {
        let config: SliceConfig =
            toml::from_str("[raster]\nwidth = 800\nfill_rule = \"even_odd\"").unwrap();
        assert_eq!(config.raster.width, 800);
        assert_eq!(config.raster.height, 1600);
        assert_eq!(config.raster.fill_rule, FillRule::EvenOdd);
    }

    #[test]
    fn parses_join_strategy() {
        let config: SliceConfig =
            toml::from_str("join = \"branching\"\nworkers = 4\nnest_polygons = true").unwrap();
        assert_eq!(config.join, JoinStrategy::Branching);
        assert_eq!(config.workers, 4);
        assert!(config.nest_polygons);

        assert_eq!("last-writer".parse::<JoinStrategy>(), Ok(JoinStrategy::LastWriter));
        assert_eq!("Branching".parse::<JoinStrategy>(), Ok(JoinStrategy::Branching));
        assert!("nearest".parse::<JoinStrategy>().is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("slice-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let config = SliceConfig {
            step: 0.05,
            workers: 2,
            join: JoinStrategy::Branching,
            nest_polygons: true,
            raster: RasterConfig {
                fill_rule: FillRule::EvenOdd,
                ..Default::default()
            },
        };
        config.save(&path).unwrap();
        assert_eq!(SliceConfig::load(&path).unwrap(), config);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("this-slice-config-does-not-exist.toml");
        assert_eq!(SliceConfig::load(&path).unwrap(), SliceConfig::default());
    }
}
