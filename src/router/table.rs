use crate::session::Role;
use std::collections::HashMap;

pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";

/// Routes that only make sense without a session.
pub const ENTRY_ROUTES: [&str; 2] = [LOGIN_ROUTE, REGISTER_ROUTE];

/// Static requirements a page declares for itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    path: String,
    requires_auth: bool,
    required_role: Option<Role>,
    redirect: Option<String>,
}

impl RouteDescriptor {
    /// A page anyone may open.
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
            required_role: None,
            redirect: None,
        }
    }

    /// A page that needs a session of any role.
    pub fn authenticated(path: impl Into<String>) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(path)
        }
    }

    /// A page restricted to one role; always requires a session.
    pub fn for_role(path: impl Into<String>, role: Role) -> Self {
        Self {
            requires_auth: true,
            required_role: Some(role),
            ..Self::public(path)
        }
    }

    /// An alias that forwards to another path before any guard runs.
    pub fn redirect(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            redirect: Some(target.into()),
            ..Self::public(path)
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.requires_auth || self.required_role.is_some()
    }

    #[must_use]
    pub fn required_role(&self) -> Option<Role> {
        self.required_role
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref()
    }
}

/// Per-role default page after authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingRoutes {
    routes: HashMap<Role, String>,
}

impl Default for LandingRoutes {
    fn default() -> Self {
        Self::new()
            .with(Role::Manager, "/dashboard-manager")
            .with(Role::Supplier, "/dashboard-supplier")
    }
}

impl LandingRoutes {
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, role: Role, path: impl Into<String>) -> Self {
        self.routes.insert(role, path.into());
        self
    }

    #[must_use]
    pub fn get(&self, role: Role) -> Option<&str> {
        self.routes.get(&role).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        self.routes.iter().map(|(role, path)| (*role, path.as_str()))
    }
}

/// Immutable path → descriptor map built at startup. Lookups ignore case,
/// repeated or trailing slashes, and dot segments.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteDescriptor>,
}

fn route_key(path: &str) -> String {
    normalize_path(path).to_ascii_lowercase()
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: impl IntoIterator<Item = RouteDescriptor>) -> Self {
        Self {
            routes: routes
                .into_iter()
                .map(|route| (route_key(&route.path), route))
                .collect(),
        }
    }

    /// The inventory console's pages.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([
            RouteDescriptor::redirect("/", LOGIN_ROUTE),
            RouteDescriptor::public(LOGIN_ROUTE),
            RouteDescriptor::public(REGISTER_ROUTE),
            RouteDescriptor::public("/forgot-password"),
            RouteDescriptor::public("/reset-password"),
            RouteDescriptor::for_role("/dashboard-manager", Role::Manager),
            RouteDescriptor::for_role("/product-list", Role::Manager),
            RouteDescriptor::for_role("/purchase-order-manager", Role::Manager),
            RouteDescriptor::for_role("/reports-list", Role::Manager),
            RouteDescriptor::for_role("/inventory-analysis", Role::Manager),
            RouteDescriptor::for_role("/suppliers-list", Role::Manager),
            RouteDescriptor::for_role("/dashboard-supplier", Role::Supplier),
            RouteDescriptor::for_role("/manage-account", Role::Supplier),
            RouteDescriptor::for_role("/product-catalog", Role::Supplier),
            RouteDescriptor::for_role("/purchase-order-supplier", Role::Supplier),
        ])
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&RouteDescriptor> {
        self.routes.get(&route_key(path))
    }

    /// Unknown paths carry no requirements.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteDescriptor {
        self.get(path)
            .cloned()
            .unwrap_or_else(|| RouteDescriptor::public(normalize_path(path)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Reduces a navigation target to its canonical path: query and fragment
/// dropped, empty and `.` segments removed, `..` applied, no trailing slash.
#[must_use]
pub fn normalize_path(target: &str) -> String {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let mut segments: Vec<&str> = Vec::new();
    for segment in target[..end].trim().split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}
