use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::system::collector::CollectorSettings;
use crate::system::usage::CpuMode;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub sources: SourcesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub top_processes: usize,
    pub cpu_mode: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 1000,
            top_processes: 10,
            cpu_mode: "cumulative".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub proc_root: PathBuf,
    pub mount_path: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            proc_root: PathBuf::from("/proc"),
            mount_path: PathBuf::from("/"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            proc_root: self.sources.proc_root.clone(),
            mount_path: self.sources.mount_path.clone(),
            cpu_mode: CpuMode::from_str_config(&self.general.cpu_mode),
            ticks_per_second: None,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sysgauge").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.refresh_rate_ms, 1000);
        assert_eq!(config.general.top_processes, 10);
        assert_eq!(config.general.cpu_mode, "cumulative");
        assert_eq!(config.sources.proc_root, PathBuf::from("/proc"));
        assert_eq!(config.sources.mount_path, PathBuf::from("/"));
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
refresh_rate_ms = 500
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_rate_ms, 500);
        // Other fields should be defaults
        assert_eq!(config.general.top_processes, 10);
        assert_eq!(config.sources.mount_path, PathBuf::from("/"));
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
refresh_rate_ms = 250
top_processes = 3
cpu_mode = "delta"

[sources]
proc_root = "/tmp/fake-proc"
mount_path = "/home"

[logging]
level = "debug"
json = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_rate_ms, 250);
        assert_eq!(config.general.top_processes, 3);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "debug");

        let settings = config.collector_settings();
        assert_eq!(settings.cpu_mode, CpuMode::Delta);
        assert_eq!(settings.proc_root, PathBuf::from("/tmp/fake-proc"));
        assert_eq!(settings.mount_path, PathBuf::from("/home"));
        assert_eq!(settings.ticks_per_second, None);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.refresh_rate_ms, 1000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("sysgauge_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.refresh_rate_ms, 1000);
        let _ = std::fs::remove_file(&temp);
    }
}
