// Typed resource modules, one per backend entity.
//
// Each module is a stateless set of CRUD operations on [`ApiClient`]:
// one facade call plus reshaping into the module's declared return type.
// Collections are total -- a `data: null` response comes back as an
// empty `Page`, never an Option.

pub mod auth;
pub mod courses;
pub mod exercises;
pub mod goals;
pub mod reminders;
pub mod study_sessions;
pub mod users;

pub use auth::Actor;
pub use courses::{Course, CreateCourse, UpdateCourse};
pub use exercises::{CreateExercise, Exercise, UpdateExercise};
pub use goals::{CreateGoal, Goal, UpdateGoal};
pub use reminders::{CreateReminder, Reminder, RepeatRule, UpdateReminder};
pub use study_sessions::{CreateStudySession, StudySession};
pub use users::{CreateUser, UpdateUser, User};
