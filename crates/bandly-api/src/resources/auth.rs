// Identity endpoint.
//
// Token issuance happens outside this client (the platform's sign-in
// flow); all we do here is resolve who the configured token belongs to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::Role;

/// The authenticated identity behind the configured bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl ApiClient {
    /// Resolve the current actor.
    ///
    /// `GET /api/v1/auth/me`
    pub async fn current_actor(&self) -> Result<Actor, Error> {
        self.get("auth/me").await
    }
}
