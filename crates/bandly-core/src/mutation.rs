//! The mutation-with-refresh controller.
//!
//! Wraps one write operation: surface a transient outcome, and on
//! success re-synchronize the paired list controller with its current
//! filters and cursor unchanged. Destructive actions pass through a
//! blocking confirmation seam first -- a declined confirmation means the
//! operation future is never polled, so no network call is issued.

use std::future::Future;

use bandly_api::Error as ApiError;

use crate::error::CoreError;
use crate::list::{ListController, ResourceLister};

// ── Outcome ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Error,
}

/// Transient user feedback for one mutation. Displayed once and
/// discarded -- never stored in the data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub kind: OutcomeKind,
    pub message: String,
}

impl MutationOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

// ── Confirmation seam ────────────────────────────────────────────────

/// Blocking confirmation prompt for destructive actions.
///
/// The CLI implements this with a dialoguer prompt; tests script it.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool, CoreError>;
}

/// Auto-approval (the `--yes` flag).
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> Result<bool, CoreError> {
        Ok(true)
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Mutation controller paired with the list it re-synchronizes.
pub struct MutationController<L: ResourceLister> {
    list: ListController<L>,
}

impl<L: ResourceLister> MutationController<L> {
    pub fn new(list: ListController<L>) -> Self {
        Self { list }
    }

    pub fn list(&self) -> &ListController<L> {
        &self.list
    }

    /// Run a write operation.
    ///
    /// Success: emit a success outcome, then trigger exactly one refetch
    /// on the paired list (dependencies unchanged). Failure: emit an
    /// error outcome carrying the server's message verbatim when
    /// available; the list is left untouched.
    pub async fn perform<F>(&self, success_message: &str, op: F) -> MutationOutcome
    where
        F: Future<Output = Result<(), ApiError>>,
    {
        match op.await {
            Ok(()) => {
                let outcome = MutationOutcome::success(success_message);
                self.list.refetch();
                outcome
            }
            Err(e) => {
                tracing::warn!(error = %e, "mutation failed");
                MutationOutcome::error(e.user_message())
            }
        }
    }

    /// Run a destructive write operation behind a confirmation prompt.
    ///
    /// Returns `Ok(None)` when the user declines -- the operation future
    /// is dropped unpolled, so nothing reaches the network and the list
    /// stays as it was.
    pub async fn perform_destructive<F, C>(
        &self,
        prompt: &str,
        confirm: &C,
        success_message: &str,
        op: F,
    ) -> Result<Option<MutationOutcome>, CoreError>
    where
        F: Future<Output = Result<(), ApiError>>,
        C: Confirm,
    {
        if !confirm.confirm(prompt)? {
            tracing::debug!("destructive action declined");
            return Ok(None);
        }
        Ok(Some(self.perform(success_message, op).await))
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use bandly_api::types::{ListQuery, Page};
    use crate::list::LoadPhase;

    struct CountingLister {
        fetches: Arc<AtomicUsize>,
    }

    impl ResourceLister for CountingLister {
        type Item = String;

        fn fetch(
            &self,
            query: ListQuery,
        ) -> impl Future<Output = Result<Page<String>, ApiError>> + Send {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(Page {
                    items: vec![format!("page {}", query.cursor.page)],
                    total: 1,
                    page: query.cursor.page,
                    page_size: query.cursor.page_size,
                    total_pages: 5,
                })
            }
        }
    }

    fn setup() -> (MutationController<CountingLister>, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let list = ListController::new(
            CountingLister {
                fetches: Arc::clone(&fetches),
            },
            20,
        );
        (MutationController::new(list), fetches)
    }

    struct Scripted(bool);

    impl Confirm for Scripted {
        fn confirm(&self, _prompt: &str) -> Result<bool, CoreError> {
            Ok(self.0)
        }
    }

    fn conflict() -> ApiError {
        ApiError::Server {
            status: 409,
            code: "IN_USE".into(),
            message: "Course still has enrolled students".into(),
            details: None,
        }
    }

    #[tokio::test]
    async fn success_emits_outcome_then_refetches_once() {
        let (ctrl, fetches) = setup();

        // Pin the list to a non-default dependency state first.
        ctrl.list().set_filter("status", "suspended");
        ctrl.list().set_page(2);
        ctrl.list().settled().await;
        let query_before = ctrl.list().query();
        let fetches_before = fetches.load(Ordering::SeqCst);

        let outcome = ctrl.perform("User updated", async { Ok(()) }).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.message, "User updated");

        ctrl.list().settled().await;
        // Exactly one refetch, same filters and cursor.
        assert_eq!(fetches.load(Ordering::SeqCst), fetches_before + 1);
        assert_eq!(ctrl.list().query(), query_before);
    }

    #[tokio::test]
    async fn failure_surfaces_server_message_and_leaves_list_untouched() {
        let (ctrl, fetches) = setup();

        ctrl.list().refetch();
        let before = ctrl.list().settled().await;
        let fetches_before = fetches.load(Ordering::SeqCst);

        let outcome = ctrl.perform("deleted", async { Err(conflict()) }).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.message, "Course still has enrolled students");
        assert_eq!(fetches.load(Ordering::SeqCst), fetches_before);

        let after = ctrl.list().state();
        assert_eq!(after.phase, LoadPhase::Loaded);
        assert_eq!(
            after.list.unwrap().items,
            before.list.unwrap().items
        );
    }

    #[tokio::test]
    async fn declined_confirmation_issues_no_network_call() {
        let (ctrl, fetches) = setup();
        let touched = Arc::new(AtomicBool::new(false));
        let touched_flag = Arc::clone(&touched);

        let outcome = ctrl
            .perform_destructive(
                "Delete user?",
                &Scripted(false),
                "deleted",
                async move {
                    touched_flag.store(true, Ordering::SeqCst);
                    Ok(())
                },
            )
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert!(!touched.load(Ordering::SeqCst), "op must never be polled");
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn accepted_confirmation_runs_op_then_refetch() {
        let (ctrl, fetches) = setup();
        let touched = Arc::new(AtomicBool::new(false));
        let touched_flag = Arc::clone(&touched);

        let outcome = ctrl
            .perform_destructive(
                "Delete user?",
                &Scripted(true),
                "User deleted",
                async move {
                    touched_flag.store(true, Ordering::SeqCst);
                    Ok(())
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(outcome.is_success());
        assert!(touched.load(Ordering::SeqCst));

        ctrl.list().settled().await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn always_confirm_approves() {
        let (ctrl, _) = setup();
        let outcome = ctrl
            .perform_destructive("sure?", &AlwaysConfirm, "done", async { Ok(()) })
            .await
            .unwrap();
        assert!(outcome.is_some());
    }
}
