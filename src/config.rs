use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the DocDigest server and CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings for the remote text-generation provider.
    pub generation: GenerationSettings,
    /// Directory used to stage uploads while their text is extracted.
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size for uploads.
    pub max_upload_bytes: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Connection details for the generation provider.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Which backend answers prompts.
    pub provider: GenerationProvider,
    /// Model identifier passed to the provider.
    pub model: String,
    /// API key, required by hosted providers.
    pub api_key: Option<String>,
    /// Base URL of the provider's REST endpoint.
    pub base_url: String,
    /// Upper bound for a single generation request.
    pub timeout: Duration,
}

/// Supported generation backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationProvider {
    /// Hosted Google Gemini API.
    Gemini,
    /// Local Ollama runtime.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup; blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = match get("GENERATION_PROVIDER") {
            Some(value) => value
                .parse()
                .map_err(|()| ConfigError::InvalidValue("GENERATION_PROVIDER".to_string()))?,
            None => GenerationProvider::Gemini,
        };

        let api_key = get("DOCDIGEST_GEMINI_KEY").or_else(|| get("GEMINI_API_KEY"));
        if provider == GenerationProvider::Gemini && api_key.is_none() {
            return Err(ConfigError::MissingVariable(
                "DOCDIGEST_GEMINI_KEY or GEMINI_API_KEY".to_string(),
            ));
        }

        let (default_model, base_url) = match provider {
            GenerationProvider::Gemini => (
                DEFAULT_GEMINI_MODEL,
                get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
            ),
            GenerationProvider::Ollama => (
                DEFAULT_OLLAMA_MODEL,
                get("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            ),
        };

        let timeout_secs = parse_optional(&get, "GENERATION_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "GENERATION_TIMEOUT_SECS".to_string(),
            ));
        }

        Ok(Self {
            generation: GenerationSettings {
                provider,
                model: get("GENERATION_MODEL").unwrap_or_else(|| default_model.to_string()),
                api_key,
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_upload_bytes: parse_optional(&get, "MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            server_port: parse_optional(&get, "SERVER_PORT")?,
        })
    }
}

fn parse_optional<T, G>(get: &G, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for GenerationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Load `.env` (if present) and parse the configuration from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        provider = ?config.generation.provider,
        model = %config.generation.model,
        base_url = %config.generation.base_url,
        upload_dir = %config.upload_dir.display(),
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(config)
}
