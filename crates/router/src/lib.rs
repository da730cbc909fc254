//! Route metadata and the pre-navigation authorization guard.

pub mod guard;
pub mod routes;

pub use guard::{authorize, authorize_path, GuardOutcome, RouteDecision};
pub use routes::{
    find_route, home_for, Route, RouteMeta, LOGIN_PATH, MERCHANT_HOME, PLATFORM_HOME,
};
