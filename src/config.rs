use std::path::PathBuf;

use thiserror::Error;

use crate::models::{EngineConfig, InputNormalization, RequeuePolicy};
use crate::store::remote::DEFAULT_BASE_URL;

pub const ENV_PREFIX: &str = "GREEK_FLASHCARDS_";
pub const DEFAULT_DECKS_DIR: &str = "flashcards";
pub const DEFAULT_LOG_FILE: &str = "quiz_debug.log";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?} (expected {expected})")]
    InvalidValue {
        var: String,
        value: String,
        expected: &'static str,
    },

    #[error("{0} must be set when using the remote store")]
    Missing(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreKind {
    /// `None` means the default location under the user's data directory.
    Sqlite { path: Option<PathBuf> },
    Remote { base_url: String, user_id: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store: StoreKind,
    pub engine: EngineConfig,
    pub decks_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreKind::Sqlite { path: None },
            engine: EngineConfig::default(),
            decks_dir: PathBuf::from(DEFAULT_DECKS_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn invalid(var: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        var: format!("{ENV_PREFIX}{var}"),
        value: value.to_string(),
        expected,
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source. `lookup` receives full
    /// variable names, prefix included.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(&format!("{ENV_PREFIX}{var}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Config::default();

        config.store = match get("STORE").as_deref() {
            None | Some("sqlite") => StoreKind::Sqlite {
                path: get("DB").map(PathBuf::from),
            },
            Some("remote") => StoreKind::Remote {
                base_url: get("API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                user_id: get("USER_ID")
                    .ok_or_else(|| ConfigError::Missing(format!("{ENV_PREFIX}USER_ID")))?,
            },
            Some("memory") => StoreKind::Memory,
            Some(other) => return Err(invalid("STORE", other, "sqlite, remote or memory")),
        };

        config.engine.requeue = match get("REQUEUE").as_deref() {
            None | Some("append") => RequeuePolicy::AppendToEnd,
            Some("shuffle") => RequeuePolicy::ShuffleAll,
            Some(other) => return Err(invalid("REQUEUE", other, "append or shuffle")),
        };

        config.engine.input = match get("FOLD_CASE").as_deref() {
            None | Some("false") | Some("0") => InputNormalization::Verbatim,
            Some("true") | Some("1") => InputNormalization::FoldGreekCase,
            Some(other) => return Err(invalid("FOLD_CASE", other, "true or false")),
        };

        if let Some(dir) = get("DECKS_DIR") {
            config.decks_dir = PathBuf::from(dir);
        }
        if let Some(file) = get("LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        Ok(config)
    }
}
