//! Runtime configuration from `DEPOSITSCOPE_*` environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `DEPOSITSCOPE_DATASET_PATH` | `bank-additional-full.csv` |
//! | `DEPOSITSCOPE_MODEL_PATH` | `models` |
//! | `DEPOSITSCOPE_MODEL_PUBKEY_B64` | unset |
//! | `DEPOSITSCOPE_MODEL_PUBKEY_B64_FILE` | unset |
//! | `DEPOSITSCOPE_REQUIRE_SIGNED_MODEL` | `false` |
//! | `DEPOSITSCOPE_LOG_MODE` | `auto` |
//! | `DEPOSITSCOPE_LOG_FILE` | `depositscope.log` |

use std::fs;
use std::path::PathBuf;

use base64::Engine;
use ed25519_dalek::VerifyingKey;

use crate::adapters::model::LoadPolicy;

pub const DATASET_PATH_ENV: &str = "DEPOSITSCOPE_DATASET_PATH";
pub const MODEL_PATH_ENV: &str = "DEPOSITSCOPE_MODEL_PATH";
pub const PUBKEY_ENV: &str = "DEPOSITSCOPE_MODEL_PUBKEY_B64";
pub const PUBKEY_FILE_ENV: &str = "DEPOSITSCOPE_MODEL_PUBKEY_B64_FILE";
pub const REQUIRE_SIGNED_ENV: &str = "DEPOSITSCOPE_REQUIRE_SIGNED_MODEL";
pub const LOG_MODE_ENV: &str = "DEPOSITSCOPE_LOG_MODE";
pub const LOG_FILE_ENV: &str = "DEPOSITSCOPE_LOG_FILE";

pub const DEFAULT_DATASET_PATH: &str = "bank-additional-full.csv";
pub const DEFAULT_MODEL_PATH: &str = "models";
pub const DEFAULT_LOG_FILE: &str = "depositscope.log";

/// Error type for configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid model public key: {0}")]
    PublicKey(String),

    #[error("Failed reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Whether logs go to a file given the terminal state.
    #[must_use]
    pub fn uses_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub verifying_key: Option<VerifyingKey>,
    pub require_signed_model: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            verifying_key: None,
            require_signed_model: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

pub(crate) fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_log_mode(raw: &str) -> Result<LogMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(LogMode::Auto),
        "file" => Ok(LogMode::File),
        "stdout" => Ok(LogMode::Stdout),
        _ => Err(ConfigError::InvalidValue {
            name: LOG_MODE_ENV,
            value: raw.to_string(),
        }),
    }
}

/// Decode a base64 Ed25519 public key.
///
/// # Errors
/// Returns `ConfigError::PublicKey` for bad base64, wrong length or an invalid point.
pub fn verifying_key_from_b64(b64: &str) -> Result<VerifyingKey, ConfigError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|_| ConfigError::PublicKey("invalid base64".into()))?;
    let pubkey: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| ConfigError::PublicKey("invalid length (expected 32 bytes)".into()))?;
    VerifyingKey::from_bytes(&pubkey).map_err(|_| ConfigError::PublicKey("invalid key".into()))
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns error if a configured value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset.
    ///
    /// # Errors
    /// Returns error if a configured value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| non_empty(lookup(name));
        let mut config = Self::default();

        if let Some(path) = get(DATASET_PATH_ENV) {
            config.dataset_path = PathBuf::from(path.trim());
        }
        if let Some(path) = get(MODEL_PATH_ENV) {
            config.model_path = PathBuf::from(path.trim());
        }

        // Inline key wins over the key file.
        if let Some(b64) = get(PUBKEY_ENV) {
            config.verifying_key = Some(verifying_key_from_b64(&b64)?);
        } else if let Some(path) = get(PUBKEY_FILE_ENV) {
            let path = path.trim();
            let b64 = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;
            config.verifying_key = Some(verifying_key_from_b64(&b64)?);
        }

        if let Some(raw) = get(REQUIRE_SIGNED_ENV) {
            config.require_signed_model = parse_bool(&raw);
        }
        if let Some(raw) = get(LOG_MODE_ENV) {
            config.log_mode = parse_log_mode(&raw)?;
        }
        if let Some(path) = get(LOG_FILE_ENV) {
            config.log_file = PathBuf::from(path.trim());
        }

        Ok(config)
    }

    #[must_use]
    pub fn load_policy(&self) -> LoadPolicy {
        LoadPolicy {
            verifying_key: self.verifying_key,
            require_signature: self.require_signed_model,
        }
    }
}
