// Study reminder endpoints.
//
// List filters: `enabled`, `userId`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListQuery, Page};

/// Recurrence rule for a reminder.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RepeatRule {
    #[default]
    None,
    Daily,
    Weekly,
}

/// A scheduled nudge to study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub remind_at: DateTime<Utc>,
    #[serde(default)]
    pub repeat: RepeatRule,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminder {
    pub message: String,
    pub remind_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatRule>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl ApiClient {
    pub async fn list_reminders(&self, query: &ListQuery) -> Result<Page<Reminder>, Error> {
        self.get_page("reminders", query).await
    }

    pub async fn get_reminder(&self, id: Uuid) -> Result<Reminder, Error> {
        self.get(&format!("reminders/{id}")).await
    }

    pub async fn create_reminder(&self, body: &CreateReminder) -> Result<Reminder, Error> {
        self.post("reminders", body).await
    }

    pub async fn update_reminder(&self, id: Uuid, body: &UpdateReminder) -> Result<Reminder, Error> {
        self.patch(&format!("reminders/{id}"), body).await
    }

    pub async fn delete_reminder(&self, id: Uuid) -> Result<(), Error> {
        self.delete(&format!("reminders/{id}")).await
    }
}
