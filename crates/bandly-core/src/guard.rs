//! Role-based access guard for page routes.
//!
//! Capability requirements are a static table over a closed [`Route`]
//! enum, matched exhaustively -- adding a role or a route is a
//! compile-time-checked change. The guard itself is a small state
//! machine: `Loading` while the actor resolves, then `Authorized`
//! (content may render) or `Redirecting` (navigation fired exactly once
//! per mismatch, nothing renders).

use bandly_api::resources::Actor;
use bandly_api::types::Role;

// ── Routes ───────────────────────────────────────────────────────────

/// Every gated surface of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    Dashboard,
    Users,
    Courses,
    Exercises,
    Goals,
    Reminders,
    StudySessions,
    Notifications,
}

impl Route {
    /// Path form, used in redirect messages.
    pub fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/sign-in",
            Self::Dashboard => "/dashboard",
            Self::Users => "/admin/users",
            Self::Courses => "/courses",
            Self::Exercises => "/exercises",
            Self::Goals => "/goals",
            Self::Reminders => "/reminders",
            Self::StudySessions => "/sessions",
            Self::Notifications => "/notifications",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// ── Capability requirements ──────────────────────────────────────────

/// Roles allowed on a route, plus where mismatches are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirement {
    pub allowed: &'static [Role],
    pub fallback: Route,
}

const EVERYONE: &[Role] = &[Role::Student, Role::Instructor, Role::Admin];
const STAFF: &[Role] = &[Role::Instructor, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Static capability table. Defined at build time, immutable.
pub fn requirement_for(route: Route) -> RouteRequirement {
    let (allowed, fallback) = match route {
        Route::SignIn | Route::Dashboard => (EVERYONE, Route::SignIn),
        Route::Users => (ADMIN_ONLY, Route::Dashboard),
        Route::Courses | Route::Exercises => (STAFF, Route::Dashboard),
        Route::Goals | Route::Reminders | Route::StudySessions | Route::Notifications => {
            (EVERYONE, Route::SignIn)
        }
    };
    RouteRequirement { allowed, fallback }
}

// ── Guard state machine ──────────────────────────────────────────────

/// Observable guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Actor identity still resolving; render nothing yet.
    Loading,
    /// Actor may view the route; children render.
    Authorized,
    /// Actor may not view the route; navigate to the carried target.
    Redirecting(Route),
}

/// Access guard for one route instance.
///
/// Re-evaluate with [`resolve`](Self::resolve) whenever the actor
/// identity changes; the returned navigation target is `Some` exactly
/// once per mismatch.
#[derive(Debug)]
pub struct AccessGuard {
    route: Route,
    requirement: RouteRequirement,
    state: GuardState,
}

impl AccessGuard {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            requirement: requirement_for(route),
            state: GuardState::Loading,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Content must never flicker before authorization is confirmed.
    pub fn renders_children(&self) -> bool {
        matches!(self.state, GuardState::Authorized)
    }

    /// Actor identity became unresolved again (e.g. token refresh).
    pub fn begin_loading(&mut self) {
        self.state = GuardState::Loading;
    }

    /// Re-evaluate against the resolved actor.
    ///
    /// Returns the navigation target when a redirect fires; repeated
    /// calls with the same mismatch return `None` (the side effect has
    /// already happened).
    pub fn resolve(&mut self, actor: Option<&Actor>) -> Option<Route> {
        let next = match actor {
            None => GuardState::Redirecting(Route::SignIn),
            Some(actor) if self.requirement.allowed.contains(&actor.role) => {
                GuardState::Authorized
            }
            Some(actor) => {
                tracing::debug!(
                    route = %self.route,
                    role = %actor.role,
                    "actor role not permitted on route"
                );
                GuardState::Redirecting(self.requirement.fallback)
            }
        };

        let fired = match (self.state, next) {
            (GuardState::Redirecting(prev), GuardState::Redirecting(target)) if prev == target => {
                None
            }
            (_, GuardState::Redirecting(target)) => Some(target),
            _ => None,
        };

        self.state = next;
        fired
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            name: "test".into(),
            role,
        }
    }

    #[test]
    fn starts_loading_and_renders_nothing() {
        let guard = AccessGuard::new(Route::Users);
        assert_eq!(guard.state(), GuardState::Loading);
        assert!(!guard.renders_children());
    }

    #[test]
    fn role_matrix_matches_the_capability_table() {
        for (route, role, allowed) in [
            (Route::Users, Role::Admin, true),
            (Route::Users, Role::Instructor, false),
            (Route::Users, Role::Student, false),
            (Route::Courses, Role::Instructor, true),
            (Route::Courses, Role::Student, false),
            (Route::Goals, Role::Student, true),
            (Route::Notifications, Role::Student, true),
        ] {
            let mut guard = AccessGuard::new(route);
            guard.resolve(Some(&actor(role)));
            assert_eq!(
                guard.renders_children(),
                allowed,
                "route {route:?} role {role:?}"
            );
        }
    }

    #[test]
    fn missing_actor_redirects_to_sign_in() {
        let mut guard = AccessGuard::new(Route::Goals);
        let nav = guard.resolve(None);
        assert_eq!(nav, Some(Route::SignIn));
        assert_eq!(guard.state(), GuardState::Redirecting(Route::SignIn));
        assert!(!guard.renders_children());
    }

    #[test]
    fn denied_actor_navigates_exactly_once() {
        let mut guard = AccessGuard::new(Route::Users);
        let student = actor(Role::Student);

        assert_eq!(guard.resolve(Some(&student)), Some(Route::Dashboard));
        // Re-evaluation with the same mismatch: no second navigation.
        assert_eq!(guard.resolve(Some(&student)), None);
        assert_eq!(guard.resolve(Some(&student)), None);
    }

    #[test]
    fn new_mismatch_after_authorization_fires_again() {
        let mut guard = AccessGuard::new(Route::Users);

        assert_eq!(guard.resolve(Some(&actor(Role::Admin))), None);
        assert!(guard.renders_children());

        // Role downgraded mid-session.
        assert_eq!(
            guard.resolve(Some(&actor(Role::Student))),
            Some(Route::Dashboard)
        );
        assert!(!guard.renders_children());
    }

    #[test]
    fn fallback_routes_differ_by_surface() {
        assert_eq!(requirement_for(Route::Users).fallback, Route::Dashboard);
        assert_eq!(requirement_for(Route::Goals).fallback, Route::SignIn);
    }
}
