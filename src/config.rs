//! Dashboard configuration
//! Optional JSON file next to the binary; built-in defaults otherwise.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Startup configuration: where the export table lives and which countries
/// are selected before the user touches anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub default_countries: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/ExpVinho.csv"),
            default_countries: vec![
                "Estados Unidos".to_string(),
                "China".to_string(),
                "Angola".to_string(),
            ],
        }
    }
}

impl DashboardConfig {
    pub const FILE_NAME: &'static str = "vinexport.json";

    /// Load the config file if present, falling back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "loaded dashboard config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_original_dashboard() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/ExpVinho.csv"));
        assert_eq!(
            config.default_countries,
            vec!["Estados Unidos", "China", "Angola"]
        );
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = DashboardConfig::load_or_default(Path::new("no/such/file.json")).unwrap();
        assert_eq!(config.default_countries.len(), 3);
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{"data_path": "exports/other.csv"}"#).unwrap();
        f.flush().unwrap();

        let config = DashboardConfig::load_or_default(f.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("exports/other.csv"));
        assert_eq!(config.default_countries.len(), 3);
    }
}
