use std::env;

const DEFAULT_DB_PATH: &str = "db.sqlite";
const DEFAULT_MAX_SOURCE_BYTES: usize = 64 * 1024;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
}

/// Runtime settings. The bot token itself is read by teloxide
/// (`TELOXIDE_TOKEN`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding dialogue state
    pub db_path: String,
    /// Longest source message we try to parse
    pub max_source_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

impl Config {
    /// Loads `.env` if there is one, then reads the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is fine, everything can come from the real environment
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("QUIZ_DB_PATH") {
            config.db_path = path;
        }
        if let Some(value) = lookup("QUIZ_MAX_SOURCE_BYTES") {
            config.max_source_bytes = match value.trim().parse::<usize>() {
                Ok(bytes) if bytes > 0 => bytes,
                _ => {
                    return Err(ConfigError::NotANumber {
                        name: "QUIZ_MAX_SOURCE_BYTES",
                        value,
                    })
                }
            };
        }

        Ok(config)
    }
}
