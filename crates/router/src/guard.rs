//! The pre-navigation authorization guard.

use crate::routes::{find_route, home_for, RouteMeta, LOGIN_PATH, MERCHANT_HOME, PLATFORM_HOME};
use veritag_core::{Role, Session};

/// What the navigation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// Guard verdict. `title` is surfaced for the shell to apply regardless of
/// the decision; it never influences where the navigation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOutcome {
    pub title: Option<&'static str>,
    pub decision: RouteDecision,
}

/// Decide a navigation. Pure and synchronous: route metadata plus a session
/// snapshot in, allow-or-redirect out. Rules are evaluated in order and the
/// first match wins; the authentication check always runs before the role
/// checks.
pub fn authorize(path: &str, meta: &RouteMeta, session: &Session) -> GuardOutcome {
    GuardOutcome {
        title: meta.title,
        decision: decide(path, meta, session),
    }
}

/// Decide a navigation against the console route table. Paths without a
/// route entry carry no requirements.
pub fn authorize_path(path: &str, session: &Session) -> GuardOutcome {
    let meta = find_route(path).map(|route| route.meta).unwrap_or_default();
    authorize(path, &meta, session)
}

fn decide(path: &str, meta: &RouteMeta, session: &Session) -> RouteDecision {
    if meta.requires_auth {
        if !session.is_authenticated() {
            return RouteDecision::Redirect(LOGIN_PATH);
        }
        if meta.requires_platform && session.role() != Some(Role::Platform) {
            return RouteDecision::Redirect(MERCHANT_HOME);
        }
        if meta.requires_merchant && session.role() != Some(Role::Merchant) {
            return RouteDecision::Redirect(PLATFORM_HOME);
        }
    }

    // A live session skips the login page and lands on its role's home.
    if path == LOGIN_PATH {
        if let Some(role) = session.role() {
            return RouteDecision::Redirect(home_for(role));
        }
    }

    RouteDecision::Allow
}
