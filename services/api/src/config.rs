//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// Default hosted completion endpoint: `{ messages }` in, `{ completion }` out.
pub const DEFAULT_COMPLETION_URL: &str = "https://toolkit.rork.com/text/llm/";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where the three persisted entries live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistenceBackend {
    /// One JSON file per entry under `data_dir`.
    File,
    /// Process memory only; state is lost on restart.
    Memory,
}

/// Which text-completion backend answers questions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionProvider {
    /// The plain JSON endpoint at `completion_url`.
    Toolkit,
    /// OpenAI chat completions, using `openai_api_key` and `completion_model`.
    OpenAi,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub persistence: PersistenceBackend,
    pub data_dir: PathBuf,
    pub completion_provider: CompletionProvider,
    pub completion_url: String,
    pub openai_api_key: Option<String>,
    pub completion_model: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Persistence Settings ---
        let persistence = match var("PERSISTENCE").as_deref().unwrap_or("file") {
            "file" => PersistenceBackend::File,
            "memory" => PersistenceBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "PERSISTENCE".to_string(),
                    format!("'{}' is not one of file, memory", other),
                ))
            }
        };
        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        // --- Completion Settings ---
        let completion_provider = match var("COMPLETION_PROVIDER").as_deref().unwrap_or("toolkit") {
            "toolkit" => CompletionProvider::Toolkit,
            "openai" => CompletionProvider::OpenAi,
            other => {
                return Err(ConfigError::InvalidValue(
                    "COMPLETION_PROVIDER".to_string(),
                    format!("'{}' is not one of toolkit, openai", other),
                ))
            }
        };
        let completion_url =
            var("COMPLETION_URL").unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string());
        let openai_api_key = var("OPENAI_API_KEY");
        if completion_provider == CompletionProvider::OpenAi && openai_api_key.is_none() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY".to_string()));
        }
        let completion_model =
            var("COMPLETION_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());

        Ok(Self {
            bind_address,
            log_level,
            persistence,
            data_dir,
            completion_provider,
            completion_url,
            openai_api_key,
            completion_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.persistence, PersistenceBackend::File);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.completion_provider, CompletionProvider::Toolkit);
        assert_eq!(config.completion_url, DEFAULT_COMPLETION_URL);
    }

    #[test]
    fn openai_requires_an_api_key() {
        let err = load(&[("COMPLETION_PROVIDER", "openai")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "OPENAI_API_KEY"));

        let config = load(&[("COMPLETION_PROVIDER", "openai"), ("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.completion_provider, CompletionProvider::OpenAi);
    }

    #[test]
    fn invalid_values_are_reported_by_variable() {
        for (key, value) in [
            ("BIND_ADDRESS", "nowhere"),
            ("RUST_LOG", "loud"),
            ("PERSISTENCE", "s3"),
            ("COMPLETION_PROVIDER", "carrier-pigeon"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == key));
        }
    }
}
