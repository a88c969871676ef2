//! Shared configuration for the bandly CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `bandly_core::BackendConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bandly_core::{BackendConfig, StreamAuth};

/// Keyring service name for stored tokens.
pub const KEYRING_SERVICE: &str = "bandly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    20
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://learn.example.com").
    pub backend: String,

    /// Bearer token (plaintext — prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Override request timeout in seconds.
    pub timeout: Option<u64>,

    /// Override default page size for list commands.
    pub page_size: Option<u32>,

    /// Credential placement on the notification stream:
    /// "header" (default) or "query" (proxy-compatibility fallback;
    /// puts the token in the URL, which logs may capture).
    pub stream_auth: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "bandly", "bandly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bandly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from an explicit path + environment (testable seam).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BANDLY_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the bearer token from the credential chain.
///
/// 1. Profile's `token_env` → env var lookup
/// 2. System keyring (`bandly/<profile>/token`)
/// 3. Plaintext `token` in the config file
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring for a profile.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))?;
    entry.set_password(token)?;
    Ok(())
}

/// Parse a profile's `stream_auth` field.
pub fn resolve_stream_auth(profile: &Profile) -> Result<StreamAuth, ConfigError> {
    match profile.stream_auth.as_deref() {
        None | Some("header") => Ok(StreamAuth::Header),
        Some("query") => Ok(StreamAuth::QueryParam),
        Some(other) => Err(ConfigError::Validation {
            field: "stream_auth".into(),
            reason: format!("expected 'header' or 'query', got '{other}'"),
        }),
    }
}

// ── Profile translation ─────────────────────────────────────────────

/// Build a `BackendConfig` from a profile — no CLI flag overrides.
pub fn profile_to_backend_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<BackendConfig, ConfigError> {
    let base_url: url::Url = profile
        .backend
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {}", profile.backend),
        })?;

    let token = resolve_token(profile, profile_name)?;
    let stream_auth = resolve_stream_auth(profile)?;

    Ok(BackendConfig {
        base_url,
        token,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout())),
        page_size: profile.page_size.unwrap_or(default_page_size()),
        stream_auth,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(backend: &str) -> Profile {
        Profile {
            backend: backend.into(),
            token: Some("plain-token".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles
            .insert("staging".into(), profile("https://staging.example.com"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
        assert_eq!(
            loaded.profiles.get("staging").unwrap().backend,
            "https://staging.example.com"
        );
    }

    #[test]
    fn plaintext_token_is_the_last_resort() {
        let p = profile("https://learn.example.com");
        let token = resolve_token(&p, "nonexistent-profile-for-tests").unwrap();
        use secrecy::ExposeSecret;
        assert_eq!(token.expose_secret(), "plain-token");
    }

    #[test]
    fn missing_token_is_an_error() {
        let p = Profile {
            backend: "https://learn.example.com".into(),
            ..Profile::default()
        };
        let err = resolve_token(&p, "empty-profile-for-tests").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }

    #[test]
    fn stream_auth_parses_and_rejects() {
        let mut p = profile("https://learn.example.com");
        assert_eq!(resolve_stream_auth(&p).unwrap(), StreamAuth::Header);

        p.stream_auth = Some("query".into());
        assert_eq!(resolve_stream_auth(&p).unwrap(), StreamAuth::QueryParam);

        p.stream_auth = Some("cookie".into());
        assert!(resolve_stream_auth(&p).is_err());
    }

    #[test]
    fn profile_translation_validates_the_url() {
        let p = profile("not a url");
        let err = profile_to_backend_config(&p, "default").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn profile_translation_carries_overrides() {
        let mut p = profile("https://learn.example.com");
        p.timeout = Some(5);
        p.page_size = Some(50);

        let backend = profile_to_backend_config(&p, "default").unwrap();
        assert_eq!(backend.timeout, Duration::from_secs(5));
        assert_eq!(backend.page_size, 50);
    }
}
