//! Navigation guard. Each rule is an independent predicate over the same
//! request; rules run top to bottom and the first one that returns a decision
//! ends evaluation. No rule can skip or swallow a later sibling.

use super::{
    table::{LandingRoutes, RouteDescriptor, RouteTable, ENTRY_ROUTES, LOGIN_ROUTE},
    RouterError,
};
use crate::session::Session;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(String),
}

impl Decision {
    fn to_login() -> Self {
        Decision::RedirectTo(LOGIN_ROUTE.to_string())
    }
}

/// One navigation attempt against a session snapshot.
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    pub target: String,
    pub session: Session,
}

impl NavigationRequest {
    pub fn new(target: impl Into<String>, session: Session) -> Self {
        Self {
            target: target.into(),
            session,
        }
    }
}

struct RuleContext<'a> {
    route: &'a RouteDescriptor,
    session: &'a Session,
    landing: &'a LandingRoutes,
}

type Rule = fn(&RuleContext<'_>) -> Option<Decision>;

const RULES: [(&str, Rule); 4] = [
    ("requires-auth", requires_auth),
    ("entry-route-landing", entry_route_landing),
    ("role-match", role_match),
    ("allow", allow),
];

fn requires_auth(ctx: &RuleContext<'_>) -> Option<Decision> {
    (ctx.route.requires_auth() && !ctx.session.is_authenticated()).then(Decision::to_login)
}

// Complete decision: once an authenticated session opens an entry route,
// this rule answers either way.
fn entry_route_landing(ctx: &RuleContext<'_>) -> Option<Decision> {
    if !ENTRY_ROUTES.contains(&ctx.route.path()) || !ctx.session.is_authenticated() {
        return None;
    }

    let landing = ctx.session.role().and_then(|role| ctx.landing.get(role));
    match landing {
        Some(path) if path != ctx.route.path() => Some(Decision::RedirectTo(path.to_string())),
        _ => Some(Decision::Allow),
    }
}

fn role_match(ctx: &RuleContext<'_>) -> Option<Decision> {
    let required = ctx.route.required_role()?;
    (ctx.session.role() != Some(required)).then(Decision::to_login)
}

fn allow(_: &RuleContext<'_>) -> Option<Decision> {
    Some(Decision::Allow)
}

#[derive(Debug, Clone)]
pub struct Guard {
    routes: RouteTable,
    landing: LandingRoutes,
}

impl Guard {
    /// # Errors
    /// Returns an error if a landing route is restricted to a different role
    /// than the one it lands, which would redirect forever.
    pub fn new(routes: RouteTable, landing: LandingRoutes) -> Result<Self, RouterError> {
        for (role, path) in landing.iter() {
            if let Some(required) = routes.get(path).and_then(RouteDescriptor::required_role) {
                if required != role {
                    return Err(RouterError::LandingRequiresOtherRole {
                        role,
                        path: path.to_string(),
                        required,
                    });
                }
            }
        }

        Ok(Self { routes, landing })
    }

    /// The inventory console's routes and landing pages.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            routes: RouteTable::standard(),
            landing: LandingRoutes::default(),
        }
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Never fails; missing or malformed session data simply reads as
    /// unauthenticated.
    #[must_use]
    pub fn decide(&self, request: &NavigationRequest) -> Decision {
        let route = self.routes.resolve(&request.target);
        let ctx = RuleContext {
            route: &route,
            session: &request.session,
            landing: &self.landing,
        };

        for (name, rule) in RULES {
            if let Some(decision) = rule(&ctx) {
                debug!(target_path = %request.target, rule = name, ?decision, "navigation decided");
                return decision;
            }
        }

        Decision::Allow
    }
}
