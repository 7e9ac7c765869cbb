//! Session-aware routing and API access for the inventory and purchase-order
//! console. Two roles exist, `manager` and `supplier`; the [`router::Guard`]
//! decides which pages a session may open and the
//! [`client::AuthenticatedClient`] keeps API calls authorized, refreshing the
//! access credential once when the API rejects it.

pub mod cli;
pub mod client;
pub mod config;
pub mod router;
pub mod session;

pub use client::{AuthenticatedClient, ClientError, Notifier, OutboundRequest};
pub use config::ClientConfig;
pub use router::{Decision, Guard, NavigationRequest, Navigator, Router};
pub use session::{Role, Session, SessionStore};
