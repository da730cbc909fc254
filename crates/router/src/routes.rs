//! The console's route declarations and their authorization metadata.

use veritag_core::Role;

/// Login entry point.
pub const LOGIN_PATH: &str = "/login";
/// Platform default landing page.
pub const PLATFORM_HOME: &str = "/platform/dashboard";
/// Merchant default landing page.
pub const MERCHANT_HOME: &str = "/merchant/dashboard";

/// Default landing page for a role.
pub fn home_for(role: Role) -> &'static str {
    match role {
        Role::Platform => PLATFORM_HOME,
        Role::Merchant => MERCHANT_HOME,
    }
}

/// Per-route authorization requirements. All requirements default to off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_platform: bool,
    pub requires_merchant: bool,
    pub title: Option<&'static str>,
}

/// A declared route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub meta: RouteMeta,
}

const PLATFORM_META: RouteMeta = RouteMeta {
    requires_auth: true,
    requires_platform: true,
    requires_merchant: false,
    title: None,
};

const MERCHANT_META: RouteMeta = RouteMeta {
    requires_auth: true,
    requires_platform: false,
    requires_merchant: true,
    title: None,
};

const fn titled(meta: RouteMeta, title: &'static str) -> RouteMeta {
    RouteMeta {
        requires_auth: meta.requires_auth,
        requires_platform: meta.requires_platform,
        requires_merchant: meta.requires_merchant,
        title: Some(title),
    }
}

const PUBLIC: RouteMeta = RouteMeta {
    requires_auth: false,
    requires_platform: false,
    requires_merchant: false,
    title: None,
};

/// The console's route table. Subtree entries (`/platform`, `/merchant`)
/// carry the shared requirements and let unknown children inherit them.
pub const ROUTES: &[Route] = &[
    Route {
        path: LOGIN_PATH,
        meta: titled(PUBLIC, "Sign In - Veritag Console"),
    },
    Route {
        path: "/verify",
        meta: titled(PUBLIC, "Code Verification - Veritag Console"),
    },
    Route {
        path: "/platform",
        meta: PLATFORM_META,
    },
    Route {
        path: PLATFORM_HOME,
        meta: titled(PLATFORM_META, "Console - Platform Administration"),
    },
    Route {
        path: "/platform/merchants",
        meta: titled(PLATFORM_META, "Merchants - Platform Administration"),
    },
    Route {
        path: "/platform/rules",
        meta: titled(PLATFORM_META, "Rules - Platform Administration"),
    },
    Route {
        path: "/platform/statistics",
        meta: titled(PLATFORM_META, "Statistics - Platform Administration"),
    },
    Route {
        path: "/merchant",
        meta: MERCHANT_META,
    },
    Route {
        path: MERCHANT_HOME,
        meta: titled(MERCHANT_META, "Console - Merchant"),
    },
    Route {
        path: "/merchant/codes",
        meta: titled(MERCHANT_META, "Codes - Merchant"),
    },
    Route {
        path: "/merchant/generate",
        meta: titled(MERCHANT_META, "Generate Codes - Merchant"),
    },
    Route {
        path: "/merchant/batches",
        meta: titled(MERCHANT_META, "Batches - Merchant"),
    },
    Route {
        path: "/merchant/verify",
        meta: titled(MERCHANT_META, "Code Verification - Merchant"),
    },
];

/// Look up a route: exact match first, then the longest subtree entry whose
/// path is a segment-boundary prefix of the requested path.
pub fn find_route(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.path == path).or_else(|| {
        ROUTES
            .iter()
            .filter(|route| {
                path.starts_with(route.path)
                    && path.as_bytes().get(route.path.len()) == Some(&b'/')
            })
            .max_by_key(|route| route.path.len())
    })
}
