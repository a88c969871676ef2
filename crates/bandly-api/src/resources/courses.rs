// Course catalog endpoints.
//
// `GET/POST /api/v1/courses`, `GET/PATCH/DELETE /api/v1/courses/{id}`
// List filters: `skill`, `level`, `published`, `search`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListQuery, Page, Skill};

/// A course: an ordered collection of lessons targeting one skill at a
/// band level (`"5.0"` through `"8.5"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub skill: Skill,
    pub level: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub lesson_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub skill: Skill,
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl ApiClient {
    pub async fn list_courses(&self, query: &ListQuery) -> Result<Page<Course>, Error> {
        self.get_page("courses", query).await
    }

    pub async fn get_course(&self, id: Uuid) -> Result<Course, Error> {
        self.get(&format!("courses/{id}")).await
    }

    pub async fn create_course(&self, body: &CreateCourse) -> Result<Course, Error> {
        self.post("courses", body).await
    }

    pub async fn update_course(&self, id: Uuid, body: &UpdateCourse) -> Result<Course, Error> {
        self.patch(&format!("courses/{id}"), body).await
    }

    pub async fn delete_course(&self, id: Uuid) -> Result<(), Error> {
        self.delete(&format!("courses/{id}")).await
    }
}
