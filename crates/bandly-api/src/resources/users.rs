// User management endpoints (admin surface).
//
// `GET/POST /api/v1/users`, `GET/PATCH/DELETE /api/v1/users/{id}`
// List filters: `role`, `status`, `search`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListQuery, Page, Role, UserStatus};

/// A platform account: student, instructor, or admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Partial update; `None` fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl ApiClient {
    /// List users with the given filters and cursor.
    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<User>, Error> {
        self.get_page("users", query).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, Error> {
        self.get(&format!("users/{id}")).await
    }

    pub async fn create_user(&self, body: &CreateUser) -> Result<User, Error> {
        self.post("users", body).await
    }

    pub async fn update_user(&self, id: Uuid, body: &UpdateUser) -> Result<User, Error> {
        self.patch(&format!("users/{id}"), body).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), Error> {
        self.delete(&format!("users/{id}")).await
    }
}
