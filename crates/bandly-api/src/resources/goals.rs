// Study goal endpoints.
//
// List filters: `skill`, `achieved`, `userId`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListQuery, Page, Skill};

/// A target band score, optionally scoped to one skill.
/// `skill: None` means an overall-band goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub skill: Option<Skill>,
    pub target_band: f32,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub progress_pct: f32,
    #[serde(default)]
    pub achieved: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<Skill>,
    pub target_band: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_band: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved: Option<bool>,
}

impl ApiClient {
    pub async fn list_goals(&self, query: &ListQuery) -> Result<Page<Goal>, Error> {
        self.get_page("goals", query).await
    }

    pub async fn get_goal(&self, id: Uuid) -> Result<Goal, Error> {
        self.get(&format!("goals/{id}")).await
    }

    pub async fn create_goal(&self, body: &CreateGoal) -> Result<Goal, Error> {
        self.post("goals", body).await
    }

    pub async fn update_goal(&self, id: Uuid, body: &UpdateGoal) -> Result<Goal, Error> {
        self.patch(&format!("goals/{id}"), body).await
    }

    pub async fn delete_goal(&self, id: Uuid) -> Result<(), Error> {
        self.delete(&format!("goals/{id}")).await
    }
}
