//! Profile resolution with CLI flag overrides.
//!
//! Precedence, highest first: CLI flags / env mirrors, then the active
//! profile, then built-in defaults. A run with `--backend` and
//! `--token` needs no config file at all.

use std::time::Duration;

use secrecy::SecretString;

use bandly_config::{Config, resolve_stream_auth, resolve_token};
use bandly_core::{BackendConfig, StreamAuth};

use crate::cli::{GlobalOpts, StreamAuthArg};
use crate::error::CliError;

/// Name of the profile this invocation acts on.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

impl From<StreamAuthArg> for StreamAuth {
    fn from(arg: StreamAuthArg) -> Self {
        match arg {
            StreamAuthArg::Header => StreamAuth::Header,
            StreamAuthArg::Query => StreamAuth::QueryParam,
        }
    }
}

/// Build a `BackendConfig` from the config file, profile, and CLI overrides.
pub fn build_backend_config(global: &GlobalOpts) -> Result<BackendConfig, CliError> {
    let cfg = bandly_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let backend = global.backend.as_deref().unwrap_or(&profile.backend);
        let base_url: url::Url = backend.parse().map_err(|_| CliError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {backend}"),
        })?;

        let token = match &global.token {
            Some(flag) => SecretString::from(flag.clone()),
            None => resolve_token(profile, &profile_name)?,
        };

        let stream_auth = match global.stream_auth {
            Some(arg) => arg.into(),
            None => resolve_stream_auth(profile)?,
        };

        return Ok(BackendConfig {
            base_url,
            token,
            timeout: Duration::from_secs(global.timeout.or(profile.timeout).unwrap_or(30)),
            page_size: profile.page_size.unwrap_or(cfg.defaults.page_size),
            stream_auth,
        });
    }

    // No profile found -- try to build from CLI flags / env vars alone.
    let Some(backend) = global.backend.as_deref() else {
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: {
                    let mut names: Vec<&str> =
                        cfg.profiles.keys().map(String::as_str).collect();
                    names.sort_unstable();
                    names.join(", ")
                },
            });
        }
        return Err(CliError::NoConfig {
            path: bandly_config::config_path().display().to_string(),
        });
    };

    let base_url: url::Url = backend.parse().map_err(|_| CliError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {backend}"),
    })?;

    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

    let mut config = BackendConfig::new(base_url, token);
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(30));
    config.page_size = cfg.defaults.page_size;
    if let Some(arg) = global.stream_auth {
        config.stream_auth = arg.into();
    }
    Ok(config)
}
