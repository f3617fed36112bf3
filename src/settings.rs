use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VendasError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Last file the dashboard loaded successfully; reopened when
    /// `vendas dashboard` is run with no argument.
    #[serde(default)]
    pub last_file: String,
    #[serde(default = "default_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_stock_threshold() -> i64 {
    crate::metrics::DEFAULT_STOCK_THRESHOLD
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_file: String::new(),
            low_stock_threshold: default_stock_threshold(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("vendas")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| VendasError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            last_file: "/tmp/vendas.csv".to_string(),
            low_stock_threshold: 10,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.last_file, "/tmp/vendas.csv");
        assert_eq!(loaded.low_stock_threshold, 10);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.last_file.is_empty());
        assert_eq!(s.low_stock_threshold, 5);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"last_file": "/tmp/x.csv"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.low_stock_threshold, 5);
        assert_eq!(s.last_file, "/tmp/x.csv");
    }
}
