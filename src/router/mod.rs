//! Client-side routing for the inventory console: the route table, the
//! navigation guard, and a router that follows guard redirects against the
//! stored session.

pub mod guard;
pub mod table;

pub use self::guard::{Decision, Guard, NavigationRequest};
pub use self::table::{
    normalize_path, LandingRoutes, RouteDescriptor, RouteTable, ENTRY_ROUTES, LOGIN_ROUTE,
    REGISTER_ROUTE,
};

use crate::session::{Role, SessionStore};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Upper bound on guard redirects followed for a single navigation.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("navigation to {target} exceeded {max} redirects", max = MAX_REDIRECTS)]
    RedirectLoop { target: String },
    #[error("landing route {path} for {role} is restricted to {required}")]
    LandingRequiresOtherRole {
        role: Role,
        path: String,
        required: Role,
    },
}

/// Anything able to move the user to another page.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// Outcome of one navigation: where the user ended up and every redirect
/// taken on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub location: String,
    pub hops: Vec<String>,
}

#[derive(Debug)]
pub struct Router {
    guard: Guard,
    store: SessionStore,
    location: Mutex<String>,
}

impl Router {
    pub fn new(guard: Guard, store: SessionStore) -> Self {
        Self {
            guard,
            store,
            location: Mutex::new(LOGIN_ROUTE.to_string()),
        }
    }

    #[must_use]
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// The last location a navigation settled on.
    #[must_use]
    pub fn location(&self) -> String {
        self.location
            .lock()
            .map(|location| location.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Resolves aliases and follows guard redirects until a page is allowed.
    ///
    /// # Errors
    /// Returns an error if the redirects do not settle within `MAX_REDIRECTS`.
    #[instrument(skip(self))]
    pub fn navigate(&self, target: &str) -> Result<Navigation, RouterError> {
        let mut current = normalize_path(target);
        let mut hops = Vec::new();

        for _ in 0..=MAX_REDIRECTS {
            if let Some(alias) = self
                .guard
                .routes()
                .get(&current)
                .and_then(RouteDescriptor::redirect_target)
            {
                debug!("route alias {} -> {}", current, alias);
                current = alias.to_string();
                hops.push(current.clone());
                continue;
            }

            let request = NavigationRequest::new(current.clone(), self.store.get());
            match self.guard.decide(&request) {
                Decision::Allow => {
                    if let Some(route) = self.guard.routes().get(&current) {
                        current = route.path().to_string();
                    }
                    self.set_location(&current);
                    return Ok(Navigation {
                        location: current,
                        hops,
                    });
                }
                Decision::RedirectTo(next) => {
                    current = next;
                    hops.push(current.clone());
                }
            }
        }

        Err(RouterError::RedirectLoop {
            target: target.to_string(),
        })
    }

    fn set_location(&self, path: &str) {
        match self.location.lock() {
            Ok(mut location) => *location = path.to_string(),
            Err(poisoned) => *poisoned.into_inner() = path.to_string(),
        }
    }
}

impl Navigator for Router {
    fn navigate_to(&self, path: &str) {
        if let Err(err) = self.navigate(path) {
            error!("Navigation to {} failed: {}", path, err);
        }
    }
}
