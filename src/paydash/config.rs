use crate::error::{DashError, Result};
use crate::seed::DEFAULT_SEED_COUNT;
use crate::state::DEFAULT_ROWS_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LATENCY_MS: u64 = 300;

/// Dashboard settings, stored as config.json in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashConfig {
    /// Rows shown per table page when a session starts
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,

    /// Simulated round trip of every data call, in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Number of records generated the first time the store is read
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,
}

fn default_rows_per_page() -> usize {
    DEFAULT_ROWS_PER_PAGE
}

fn default_latency_ms() -> u64 {
    DEFAULT_LATENCY_MS
}

fn default_seed_count() -> usize {
    DEFAULT_SEED_COUNT
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            latency_ms: DEFAULT_LATENCY_MS,
            seed_count: DEFAULT_SEED_COUNT,
        }
    }
}

/// What the `config` command was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

impl ConfigAction {
    pub fn from_args(key: Option<String>, value: Option<String>) -> Self {
        match (key, value) {
            (None, _) => ConfigAction::ShowAll,
            (Some(key), None) => ConfigAction::ShowKey(key),
            (Some(key), Some(value)) => ConfigAction::Set(key, value),
        }
    }
}

impl DashConfig {
    pub const KEYS: [&'static str; 3] = ["rows-per-page", "latency-ms", "seed-count"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: DashConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "rows-per-page" => Some(self.rows_per_page.to_string()),
            "latency-ms" => Some(self.latency_ms.to_string()),
            "seed-count" => Some(self.seed_count.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let invalid = |_| format!("Invalid value for {}: {}", key, value);
        match key {
            "rows-per-page" => {
                let rows: usize = value.trim().parse().map_err(invalid)?;
                if rows == 0 {
                    return Err("rows-per-page must be at least 1".to_string());
                }
                self.rows_per_page = rows;
            }
            "latency-ms" => self.latency_ms = value.trim().parse().map_err(invalid)?,
            "seed-count" => self.seed_count = value.trim().parse().map_err(invalid)?,
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    /// `key = value` lines for every setting, in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// Applies `action` against the config stored in `dir`, saving on `Set`.
    ///
    /// Returns the lines to show the user.
    pub fn apply<P: AsRef<Path>>(dir: P, action: ConfigAction) -> Result<Vec<String>> {
        let dir = dir.as_ref();
        let mut config = Self::load(dir)?;
        match action {
            ConfigAction::ShowAll => Ok(config
                .entries()
                .into_iter()
                .map(|(key, value)| format!("{} = {}", key, value))
                .collect()),
            ConfigAction::ShowKey(key) => config
                .get(&key)
                .map(|value| vec![value])
                .ok_or_else(|| DashError::Api(format!("Unknown config key: {}", key))),
            ConfigAction::Set(key, value) => {
                config.set(&key, &value).map_err(DashError::Api)?;
                config.save(dir)?;
                let shown = config.get(&key).unwrap_or(value);
                Ok(vec![format!("{} set to {}", key, shown)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashConfig::default();
        assert_eq!(config.rows_per_page, 10);
        assert_eq!(config.latency(), Duration::from_millis(300));
        assert_eq!(config.seed_count, 97);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, DashConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"latency_ms": 0}"#).unwrap();

        let config = DashConfig::load(dir.path()).unwrap();
        assert_eq!(config.latency_ms, 0);
        assert_eq!(config.rows_per_page, 10);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashConfig::default();
        config.set("rows-per-page", "25").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = DashConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.rows_per_page, 25);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = DashConfig::default();
        assert!(config.set("rows-per-page", "0").is_err());
        assert!(config.set("latency-ms", "soon").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, DashConfig::default());
    }

    #[test]
    fn test_apply_set_persists() {
        let dir = tempfile::tempdir().unwrap();
        let lines = DashConfig::apply(
            dir.path(),
            ConfigAction::Set("seed-count".into(), "12".into()),
        )
        .unwrap();
        assert_eq!(lines, vec!["seed-count set to 12"]);

        let shown = DashConfig::apply(dir.path(), ConfigAction::ShowKey("seed-count".into()))
            .unwrap();
        assert_eq!(shown, vec!["12"]);
    }

    #[test]
    fn test_apply_show_all_lists_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let lines = DashConfig::apply(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(
            lines,
            vec!["rows-per-page = 10", "latency-ms = 300", "seed-count = 97"]
        );
    }

    #[test]
    fn test_action_from_args() {
        assert_eq!(ConfigAction::from_args(None, None), ConfigAction::ShowAll);
        assert_eq!(
            ConfigAction::from_args(Some("latency-ms".into()), Some("0".into())),
            ConfigAction::Set("latency-ms".into(), "0".into())
        );
    }
}
