use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::ZoneKind;
use crate::evaluator::GraceMargin;

fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    /// Boundary tolerance in meters; defaults to 300 when absent
    #[serde(default, rename = "grace_margin_m")]
    pub grace_margin: Option<GraceMargin>,
    /// JSON settings document holding the zone polygons
    #[serde(default)]
    pub settings: Option<PathBuf>,
    /// Zone checked when the CLI is not told otherwise
    #[serde(default)]
    pub zone: Option<ZoneKind>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl FileConfig {
    /// Load the first config file found in the standard locations
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "using config file");
                        return Some(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file; it must exist and parse
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        use anyhow::{Context, bail};

        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    pub fn grace_margin(&self) -> GraceMargin {
        self.grace_margin.unwrap_or_default()
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("geofence.toml"));
    paths.push(PathBuf::from(".geofence.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("geofence").join("config.toml"));
        paths.push(config_dir.join("geofence.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".geofence.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.grace_margin().meters(), 300.0);
        assert!(config.settings.is_none());
        assert!(config.zone.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_parse_full() {
        let config: FileConfig = toml::from_str(
            r#"
            grace_margin_m = 150.0
            settings = "zones.json"
            zone = "institutional"
            verbose = true
            "#,
        )
        .unwrap();
        assert_eq!(config.grace_margin().meters(), 150.0);
        assert_eq!(config.settings, Some(PathBuf::from("zones.json")));
        assert_eq!(config.zone, Some(ZoneKind::Institutional));
        assert!(config.verbose);
    }

    #[test]
    fn test_rejects_negative_margin() {
        assert!(toml::from_str::<FileConfig>("grace_margin_m = -10.0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "grace_margin_m = 0.0").unwrap();

        let config = FileConfig::load_from(file.path()).unwrap();
        assert_eq!(config.grace_margin(), GraceMargin::NONE);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileConfig::load_from(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_config_paths_start_local() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("geofence.toml"));
    }
}
