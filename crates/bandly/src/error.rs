//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use bandly_config::ConfigError;
use bandly_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend")]
    #[diagnostic(
        code(bandly::connection_failed),
        help(
            "Check that the backend is reachable and the URL is right.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(bandly::auth_failed),
        help(
            "Your token was rejected. Sign in again on the platform to get a\n\
             fresh token, then run: bandly config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(bandly::no_credentials),
        help(
            "Store one with: bandly config set-token --profile {profile}\n\
             Or set the BANDLY_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Authorization ────────────────────────────────────────────────
    #[error("Access denied: {route} requires a different role (you are {role})")]
    #[diagnostic(
        code(bandly::access_denied),
        help("On the web app you would be redirected to {fallback}.")
    )]
    AccessDenied {
        route: String,
        role: String,
        fallback: String,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(bandly::not_found),
        help("Run: bandly {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Controllers ──────────────────────────────────────────────────
    #[error("Loading {resource} failed: {message}")]
    #[diagnostic(
        code(bandly::list_failed),
        help("Re-run the same command to retry with identical filters.")
    )]
    ListFailed { resource: String, message: String },

    #[error("{message}")]
    #[diagnostic(code(bandly::mutation_failed))]
    MutationFailed { message: String },

    #[error("Notification stream failed: {message}")]
    #[diagnostic(
        code(bandly::stream_failed),
        help("The stream does not reconnect on its own; run watch again.")
    )]
    StreamFailed { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(bandly::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bandly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(bandly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: bandly config init --backend <url>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(bandly::no_config),
        help(
            "Create one with: bandly config init --backend <url>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(bandly::config))]
    Config(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::StreamFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::AccessDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::MutationFailed { message: _ } => exit_code::CONFLICT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::NotFound { entity, identifier } => CliError::NotFound {
                list_command: format!("{entity}s list"),
                resource_type: entity,
                identifier,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Rejected { message } => CliError::ApiError {
                code: "rejected".into(),
                message,
            },

            CoreError::Api { message, code, .. } => CliError::ApiError {
                code: code.unwrap_or_default(),
                message,
            },

            CoreError::Config { message } => CliError::Config(message),

            CoreError::Stream(message) => CliError::StreamFailed { message },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other.to_string()),
        }
    }
}
