pub mod navigate;
pub mod request;
pub mod session;

use crate::{
    cli::globals::GlobalArgs,
    client::{AuthenticatedClient, Notifier},
    config::ClientConfig,
    router::{Guard, Router},
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use url::Url;

#[derive(Debug)]
pub enum Action {
    Navigate {
        path: String,
    },
    Request {
        method: String,
        path: String,
        body: Option<String>,
    },
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Whoami,
}

/// Prints user notifications on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Router and client sharing one persisted session.
pub struct Console {
    pub router: Arc<Router>,
    pub client: AuthenticatedClient,
}

impl Console {
    /// # Errors
    /// Returns an error if the API URL is invalid or the HTTP client cannot be built.
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let store = globals.session_store();
        let router = Arc::new(Router::new(Guard::standard(), store.clone()));

        let mut config = ClientConfig::from_env()?;
        config.base_url = Url::parse(&globals.api_url)?;

        let client = AuthenticatedClient::new(
            config,
            store,
            Arc::new(ConsoleNotifier),
            router.clone(),
        )?;

        Ok(Self { router, client })
    }
}

/// Handle the action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    let console = Console::new(globals)?;

    match action {
        Action::Navigate { path } => navigate::handle(&console, &path),
        Action::Request { method, path, body } => {
            request::handle(&console, &method, &path, body.as_deref()).await
        }
        Action::Login { email, password } => session::login(&console, &email, &password).await,
        Action::Logout => {
            session::logout(&console);
            Ok(())
        }
        Action::Whoami => {
            session::whoami(&console);
            Ok(())
        }
    }
}
