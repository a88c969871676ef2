//! Reactive controller layer between `bandly-api` and UI consumers.
//!
//! This crate owns the state machines the application surfaces are
//! built from:
//!
//! - **[`Session`]** — process-scoped context: built at session start
//!   (resolves the actor behind the configured token), torn down at
//!   session end (cancels the notification stream deterministically).
//!   Injected into everything else.
//!
//! - **[`AccessGuard`]** — role gate for routes. Closed [`Role`] and
//!   [`Route`] enums with a static, exhaustively-matched capability
//!   table; redirects fire exactly once per mismatch and content never
//!   renders before authorization is confirmed.
//!
//! - **[`ListController`]** — the generic list/filter/paginate state
//!   machine. Filter + cursor changes form one composite dependency;
//!   each change issues exactly one fetch and only the latest
//!   generation's response may commit (stale results are discarded by
//!   identity, not arrival order).
//!
//! - **[`MutationController`]** — one write operation with transient
//!   outcome feedback and a paired-list refetch on success; destructive
//!   actions sit behind a blocking [`Confirm`] seam.
//!
//! - **[`NotificationFeed`]** — bounded most-recent-first alert feed
//!   merged from the streaming channel, deduplicated by event id.

pub mod config;
pub mod error;
pub mod guard;
pub mod list;
pub mod listers;
pub mod mutation;
pub mod notifications;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::BackendConfig;
pub use error::CoreError;
pub use guard::{AccessGuard, GuardState, Route, RouteRequirement, requirement_for};
pub use list::{ListController, ListState, LoadPhase, ResourceLister};
pub use listers::{
    CourseLister, ExerciseLister, GoalLister, ReminderLister, StudySessionLister, UserLister,
};
pub use mutation::{AlwaysConfirm, Confirm, MutationController, MutationOutcome, OutcomeKind};
pub use notifications::NotificationFeed;
pub use session::Session;

// Re-export the wire vocabulary consumers need alongside the controllers.
pub use bandly_api::resources::{
    Actor, Course, CreateCourse, CreateExercise, CreateGoal, CreateReminder, CreateStudySession,
    CreateUser, Exercise, Goal, Reminder, RepeatRule, StudySession, UpdateCourse, UpdateExercise,
    UpdateGoal, UpdateReminder, UpdateUser, User,
};
pub use bandly_api::stream::{ChannelEvent, Notification, StreamAuth};
pub use bandly_api::types::{
    ExerciseStatus, Filters, ListQuery, Page, PageCursor, Role, Skill, UserStatus,
};
