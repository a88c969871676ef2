//! Async Rust client for the Bandly learning platform REST API.
//!
//! Three layers, smallest first:
//!
//! - **[`ApiClient`]** -- the facade every HTTP call goes through. Injects
//!   the bearer credential, serializes query parameters in stable order,
//!   and normalizes the backend's `{success, data, error}` envelope into
//!   [`Error`] values. Never retries.
//! - **[`resources`]** -- stateless typed CRUD modules, one per backend
//!   entity (users, courses, exercises, goals, reminders, study
//!   sessions). List operations return a total [`types::Page`]: a `data:
//!   null` response becomes an empty collection, never an Option.
//! - **[`stream`]** -- the server-sent-events notification channel, with
//!   deterministic cancellation and no built-in reconnect.

pub mod client;
pub mod error;
pub mod resources;
pub mod stream;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
