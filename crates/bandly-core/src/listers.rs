// ── Resource listers ──
//
// Thin adapters from the stateless API modules onto the controller's
// fetcher seam. One per listable resource; each is just "clone the
// client handle, call the module".

use std::future::Future;
use std::sync::Arc;

use bandly_api::ApiClient;
use bandly_api::Error as ApiError;
use bandly_api::resources::{Course, Exercise, Goal, Reminder, StudySession, User};
use bandly_api::types::{ListQuery, Page};

use crate::list::ResourceLister;

macro_rules! lister {
    ($(#[$doc:meta])* $name:ident, $item:ty, $method:ident) => {
        $(#[$doc])*
        pub struct $name(pub Arc<ApiClient>);

        impl ResourceLister for $name {
            type Item = $item;

            fn fetch(
                &self,
                query: ListQuery,
            ) -> impl Future<Output = Result<Page<$item>, ApiError>> + Send {
                let client = Arc::clone(&self.0);
                async move { client.$method(&query).await }
            }
        }
    };
}

lister!(
    /// Fetches the admin user directory.
    UserLister,
    User,
    list_users
);
lister!(
    /// Fetches the course catalog.
    CourseLister,
    Course,
    list_courses
);
lister!(
    /// Fetches the exercise bank.
    ExerciseLister,
    Exercise,
    list_exercises
);
lister!(
    /// Fetches study goals.
    GoalLister,
    Goal,
    list_goals
);
lister!(
    /// Fetches study reminders.
    ReminderLister,
    Reminder,
    list_reminders
);
lister!(
    /// Fetches the study session log.
    StudySessionLister,
    StudySession,
    list_study_sessions
);
