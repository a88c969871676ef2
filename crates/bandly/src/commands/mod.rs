//! Command handlers, one module per resource surface.

pub mod config_cmd;
pub mod courses;
pub mod exercises;
pub mod goals;
pub mod reminders;
pub mod study_sessions;
pub mod users;
pub mod util;
pub mod watch;

use bandly_core::{AccessGuard, Route, Session};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Route equivalent of each command surface, for the access guard.
/// `None` means "any authenticated actor" (the session itself is the gate).
fn route_for(cmd: &Command) -> Option<Route> {
    match cmd {
        Command::Users(_) => Some(Route::Users),
        Command::Courses(_) => Some(Route::Courses),
        Command::Exercises(_) => Some(Route::Exercises),
        Command::Goals(_) => Some(Route::Goals),
        Command::Reminders(_) => Some(Route::Reminders),
        Command::Sessions(_) => Some(Route::StudySessions),
        Command::Watch => Some(Route::Notifications),
        Command::Whoami | Command::Config(_) | Command::Completions(_) => None,
    }
}

/// Run the access guard for a gated surface.
///
/// Denial maps to an error carrying the guard's fallback route -- the
/// CLI rendering of "redirect, don't show an error page".
fn check_access(route: Route, session: &Session) -> Result<(), CliError> {
    let mut guard = AccessGuard::new(route);
    if let Some(target) = guard.resolve(Some(session.actor())) {
        return Err(CliError::AccessDenied {
            route: route.path().to_owned(),
            role: session.actor().role.to_string(),
            fallback: target.path().to_owned(),
        });
    }
    debug_assert!(guard.renders_children());
    Ok(())
}

/// Dispatch a parsed command against an authenticated session.
pub async fn dispatch(
    cmd: Command,
    session: &mut Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(route) = route_for(&cmd) {
        check_access(route, session)?;
    }

    match cmd {
        Command::Users(args) => users::handle(session, args, global).await,
        Command::Courses(args) => courses::handle(session, args, global).await,
        Command::Exercises(args) => exercises::handle(session, args, global).await,
        Command::Goals(args) => goals::handle(session, args, global).await,
        Command::Reminders(args) => reminders::handle(session, args, global).await,
        Command::Sessions(args) => study_sessions::handle(session, args, global).await,
        Command::Watch => watch::handle(session, global).await,

        Command::Whoami => {
            let actor = session.actor();
            let out = output::render_single(
                &global.output,
                actor,
                |a| format!("{} ({}), id {}", a.name, a.role, a.id),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // Handled before a session exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
