//! Shared helpers for command handlers.

use bandly_core::{Confirm, CoreError, ListController, ResourceLister, Session};

use crate::cli::{GlobalOpts, ListOpts};

/// Interactive confirmation for destructive actions.
///
/// `--yes` auto-approves; otherwise a blocking dialoguer prompt that
/// defaults to "no".
pub struct CliConfirm {
    pub yes: bool,
}

impl Confirm for CliConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool, CoreError> {
        if self.yes {
            return Ok(true);
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| CoreError::Internal(format!("confirmation prompt failed: {e}")))
    }
}

/// Effective page size: flag, then profile/config default.
pub fn page_size(opts: &ListOpts, session: &Session) -> u32 {
    opts.page_size.unwrap_or(session.config().page_size).max(1)
}

/// Apply the shared list options onto a controller in one composite
/// change (one fetch), alongside any resource-specific filters.
pub fn apply_list_opts<L: ResourceLister>(
    controller: &ListController<L>,
    opts: &ListOpts,
    extra: impl FnOnce(&mut bandly_core::Filters),
) {
    controller.update(|query| {
        extra(&mut query.filters);
        if let Some(search) = &opts.search {
            query.filters.set_search(search);
        }
        query.cursor.page = opts.page.max(1);
    });
}

/// `--quiet`-aware informational line on stderr.
pub fn note(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

/// Print a success outcome, or turn an error outcome into a `CliError`
/// so it reaches the user exactly once (through the miette report).
pub fn outcome_to_result(
    outcome: bandly_core::MutationOutcome,
    global: &GlobalOpts,
) -> Result<(), crate::error::CliError> {
    if outcome.is_success() {
        crate::output::print_outcome(&outcome, global);
        Ok(())
    } else {
        Err(crate::error::CliError::MutationFailed {
            message: outcome.message,
        })
    }
}
