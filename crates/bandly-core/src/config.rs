// ── Backend connection configuration ──

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use bandly_api::stream::StreamAuth;

/// Everything needed to talk to one backend deployment as one actor.
///
/// Built by `bandly-config` from profiles/env/flags; consumed by
/// [`Session::start`](crate::Session::start).
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend base URL (e.g. "https://learn.example.com").
    pub base_url: Url,

    /// Bearer token, issued by the platform's sign-in flow.
    pub token: SecretString,

    /// Request timeout for one-shot calls.
    pub timeout: Duration,

    /// Default page size for list fetches.
    pub page_size: u32,

    /// Credential placement on the notification stream.
    pub stream_auth: StreamAuth,
}

impl BackendConfig {
    pub fn new(base_url: Url, token: SecretString) -> Self {
        Self {
            base_url,
            token,
            timeout: Duration::from_secs(30),
            page_size: 20,
            stream_auth: StreamAuth::Header,
        }
    }
}
