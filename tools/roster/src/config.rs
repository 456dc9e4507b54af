use crate::errors::RosterError;
use crate::log_retention::MAX_LOG_GENERATIONS;
use crate::logging::{DEFAULT_DISK_BUDGET_BYTES, DEFAULT_MAX_PAYLOAD_BYTES};
use crate::record_store::MAX_RECORDS;
use crate::runtime::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub capacity: Option<usize>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub path: Option<PathBuf>,
    pub max_payload_bytes: usize,
    pub budget_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                capacity: MAX_RECORDS,
            },
            logging: LoggingConfig {
                path: None,
                max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
                budget_bytes: DEFAULT_DISK_BUDGET_BYTES,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialAppConfig {
    store: Option<PartialStoreConfig>,
    logging: Option<PartialLoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialStoreConfig {
    capacity: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialLoggingConfig {
    path: Option<PathBuf>,
    max_payload_bytes: Option<usize>,
    budget_bytes: Option<u64>,
}

/// Defaults, then the TOML file named by `--config`, then CLI flags.
pub fn load_config(overrides: &CliOverrides, fs: &dyn FileSystem) -> Result<AppConfig, RosterError> {
    let mut cfg = AppConfig::default();

    if let Some(path) = &overrides.config_path {
        let file_contents = fs.read_to_string(path)?;
        let partial: PartialAppConfig = toml::from_str(&file_contents)
            .map_err(|e| RosterError::ConfigParse(e.to_string()))?;
        merge_partial_config(&mut cfg, partial);
    }

    apply_cli_overrides(&mut cfg, overrides);
    validate_config(&cfg)?;
    Ok(cfg)
}

fn merge_partial_config(cfg: &mut AppConfig, partial: PartialAppConfig) {
    if let Some(store) = partial.store {
        if let Some(capacity) = store.capacity {
            cfg.store.capacity = capacity;
        }
    }

    if let Some(logging) = partial.logging {
        if let Some(path) = logging.path {
            cfg.logging.path = Some(path);
        }
        if let Some(value) = logging.max_payload_bytes {
            cfg.logging.max_payload_bytes = value;
        }
        if let Some(value) = logging.budget_bytes {
            cfg.logging.budget_bytes = value;
        }
    }
}

fn apply_cli_overrides(cfg: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(capacity) = overrides.capacity {
        cfg.store.capacity = capacity;
    }
    if let Some(log_file) = &overrides.log_file {
        cfg.logging.path = Some(log_file.clone());
    }
}

fn validate_config(cfg: &AppConfig) -> Result<(), RosterError> {
    if cfg.store.capacity == 0 || cfg.store.capacity > MAX_RECORDS {
        return Err(RosterError::InvalidConfig(format!(
            "store.capacity must be between 1 and {MAX_RECORDS}"
        )));
    }

    if cfg.logging.max_payload_bytes < 16 {
        return Err(RosterError::InvalidConfig(
            "logging.max_payload_bytes must be at least 16".to_string(),
        ));
    }

    // Every log generation must hold at least one full-size payload.
    let min_budget = (cfg.logging.max_payload_bytes as u64).saturating_mul(MAX_LOG_GENERATIONS);
    if cfg.logging.budget_bytes < min_budget {
        return Err(RosterError::InvalidConfig(format!(
            "logging.budget_bytes must be at least {min_budget} (max_payload_bytes x {MAX_LOG_GENERATIONS})"
        )));
    }

    if let Some(path) = &cfg.logging.path {
        if path.as_os_str().is_empty() {
            return Err(RosterError::InvalidConfig(
                "logging.path must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FakeFileSystem;

    fn overrides_for(path: &str) -> CliOverrides {
        CliOverrides {
            config_path: Some(PathBuf::from(path)),
            ..CliOverrides::default()
        }
    }

    #[test]
    fn defaults_apply_without_a_config_file() {
        let cfg = load_config(&CliOverrides::default(), &FakeFileSystem::default())
            .expect("defaults");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.store.capacity, 100);
        assert!(cfg.logging.path.is_none());
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let fs = FakeFileSystem::with_file(
            "/roster.toml",
            "[store]\ncapacity = 5\n\n[logging]\npath = \"/logs/roster.jsonl\"\n",
        );
        let cfg = load_config(&overrides_for("/roster.toml"), &fs).expect("load");
        assert_eq!(cfg.store.capacity, 5);
        assert_eq!(cfg.logging.path, Some(PathBuf::from("/logs/roster.jsonl")));
        assert_eq!(cfg.logging.max_payload_bytes, DEFAULT_MAX_PAYLOAD_BYTES);
    }

    #[test]
    fn cli_flags_win_over_file() {
        let fs = FakeFileSystem::with_file("/roster.toml", "[store]\ncapacity = 5\n");
        let overrides = CliOverrides {
            capacity: Some(9),
            log_file: Some(PathBuf::from("/tmp/cli.jsonl")),
            ..overrides_for("/roster.toml")
        };
        let cfg = load_config(&overrides, &fs).expect("load");
        assert_eq!(cfg.store.capacity, 9);
        assert_eq!(cfg.logging.path, Some(PathBuf::from("/tmp/cli.jsonl")));
    }

    #[test]
    fn capacity_above_store_limit_is_rejected() {
        let fs = FakeFileSystem::with_file("/roster.toml", "[store]\ncapacity = 101\n");
        let err = load_config(&overrides_for("/roster.toml"), &fs).expect_err("too big");
        assert!(matches!(err, RosterError::InvalidConfig(message) if message.contains("store.capacity")));

        let zero = CliOverrides {
            capacity: Some(0),
            ..CliOverrides::default()
        };
        assert!(load_config(&zero, &FakeFileSystem::default()).is_err());
    }

    #[test]
    fn log_budget_below_floor_is_rejected() {
        let fs = FakeFileSystem::with_file(
            "/roster.toml",
            "[logging]\npath = \"/logs/roster.jsonl\"\nbudget_bytes = 0\n",
        );
        let err = load_config(&overrides_for("/roster.toml"), &fs).expect_err("zero budget");
        assert!(matches!(err, RosterError::InvalidConfig(message) if message.contains("logging.budget_bytes")));

        let fs = FakeFileSystem::with_file(
            "/roster.toml",
            "[logging]\nmax_payload_bytes = 100\nbudget_bytes = 399\n",
        );
        assert!(load_config(&overrides_for("/roster.toml"), &fs).is_err());

        let fs = FakeFileSystem::with_file(
            "/roster.toml",
            "[logging]\nmax_payload_bytes = 100\nbudget_bytes = 400\n",
        );
        let cfg = load_config(&overrides_for("/roster.toml"), &fs).expect("at floor");
        assert_eq!(cfg.logging.budget_bytes, 400);
    }

    #[test]
    fn malformed_and_unknown_keys_are_parse_errors() {
        let fs = FakeFileSystem::with_file("/bad.toml", "[store\ncapacity = ");
        assert!(matches!(
            load_config(&overrides_for("/bad.toml"), &fs),
            Err(RosterError::ConfigParse(_))
        ));

        let fs = FakeFileSystem::with_file("/typo.toml", "[store]\ncapacty = 3\n");
        assert!(matches!(
            load_config(&overrides_for("/typo.toml"), &fs),
            Err(RosterError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = load_config(&overrides_for("/nope.toml"), &FakeFileSystem::default())
            .expect_err("missing");
        assert!(matches!(err, RosterError::Io(_)));
    }
}
