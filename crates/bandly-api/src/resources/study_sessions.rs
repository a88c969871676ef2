// Study session log endpoints.
//
// Sessions are append-only from the client's perspective: logged once,
// listed for progress views, and deletable; never edited in place.
// List filters: `skill`, `courseId`, `userId`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListQuery, Page, Skill};

/// One logged practice session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub course_id: Option<Uuid>,
    pub skill: Skill,
    pub started_at: DateTime<Utc>,
    pub duration_minutes: u32,
    /// Band score for scored practice, absent for free study.
    #[serde(default)]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudySession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Uuid>,
    pub skill: Skill,
    pub started_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl ApiClient {
    pub async fn list_study_sessions(&self, query: &ListQuery) -> Result<Page<StudySession>, Error> {
        self.get_page("study-sessions", query).await
    }

    pub async fn get_study_session(&self, id: Uuid) -> Result<StudySession, Error> {
        self.get(&format!("study-sessions/{id}")).await
    }

    pub async fn create_study_session(
        &self,
        body: &CreateStudySession,
    ) -> Result<StudySession, Error> {
        self.post("study-sessions", body).await
    }

    pub async fn delete_study_session(&self, id: Uuid) -> Result<(), Error> {
        self.delete(&format!("study-sessions/{id}")).await
    }
}
