//! Process-scoped session context.
//!
//! One `Session` per authenticated run of the application: started
//! explicitly when the token is available, ended explicitly on
//! sign-out. Controllers receive the session (or its client handle) by
//! injection -- there are no ambient globals.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use bandly_api::resources::Actor;
use bandly_api::stream::EventChannel;
use bandly_api::{ApiClient, TransportConfig};

use crate::config::BackendConfig;
use crate::error::CoreError;

/// An authenticated connection to one backend deployment.
pub struct Session {
    config: BackendConfig,
    client: Arc<ApiClient>,
    actor: Actor,
    channel: Option<EventChannel>,
    cancel: CancellationToken,
}

impl Session {
    /// Build the API client and resolve the actor behind the token.
    ///
    /// Fails with [`CoreError::AuthenticationFailed`] when the backend
    /// rejects the credential -- the caller redirects to sign-in rather
    /// than rendering an error page.
    pub async fn start(config: BackendConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = ApiClient::new(config.base_url.as_str(), &config.token, &transport)?;
        let actor = client.current_actor().await?;

        info!(actor = %actor.id, role = %actor.role, "session started");

        Ok(Self {
            config,
            client: Arc::new(client),
            actor,
            channel: None,
            cancel: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Shared handle to the API facade.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// The resolved actor for this session.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Open the notification stream (one per session).
    ///
    /// Subsequent calls return the already-open channel.
    pub fn open_channel(&mut self) -> Result<&EventChannel, CoreError> {
        if self.channel.is_none() {
            let transport = TransportConfig {
                timeout: self.config.timeout,
                ..TransportConfig::default()
            };
            let channel = EventChannel::connect(
                self.client.stream_url(),
                &self.config.token,
                self.config.stream_auth,
                &transport,
                self.cancel.child_token(),
            )?;
            self.channel = Some(channel);
        }
        Ok(self.channel.as_ref().expect("channel was just set"))
    }

    pub fn channel(&self) -> Option<&EventChannel> {
        self.channel.as_ref()
    }

    /// Tear the session down: cancels the notification stream's
    /// in-flight read and releases its connection.
    pub fn end(&mut self) {
        self.cancel.cancel();
        if let Some(channel) = self.channel.take() {
            channel.shutdown();
        }
        info!("session ended");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
