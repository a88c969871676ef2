// Exercise bank endpoints (instructor surface).
//
// List filters: `skill`, `status`, `courseId`, `search`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ExerciseStatus, ListQuery, Page, Skill};

/// A practice exercise attached to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub skill: Skill,
    pub level: String,
    #[serde(default)]
    pub question_count: u32,
    #[serde(default)]
    pub status: ExerciseStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExercise {
    pub course_id: Uuid,
    pub title: String,
    pub skill: Skill,
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExercise {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExerciseStatus>,
}

impl ApiClient {
    pub async fn list_exercises(&self, query: &ListQuery) -> Result<Page<Exercise>, Error> {
        self.get_page("exercises", query).await
    }

    pub async fn get_exercise(&self, id: Uuid) -> Result<Exercise, Error> {
        self.get(&format!("exercises/{id}")).await
    }

    pub async fn create_exercise(&self, body: &CreateExercise) -> Result<Exercise, Error> {
        self.post("exercises", body).await
    }

    pub async fn update_exercise(&self, id: Uuid, body: &UpdateExercise) -> Result<Exercise, Error> {
        self.patch(&format!("exercises/{id}"), body).await
    }

    pub async fn delete_exercise(&self, id: Uuid) -> Result<(), Error> {
        self.delete(&format!("exercises/{id}")).await
    }
}
