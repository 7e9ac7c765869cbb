//! HTTP client for the inventory API. Every call carries the stored access
//! credential as a bearer token; an authorization failure triggers at most one
//! credential refresh and one re-dispatch of the same request. When the
//! refresh is impossible or fails, the session is cleared, the user is told,
//! and the app is sent to the login page.

pub mod auth;
pub mod error;
pub mod request;
pub mod token;

pub use self::auth::{LoginResponse, RegisterRequest};
pub use self::error::ClientError;
pub use self::request::{Attempt, OutboundRequest};

use crate::{config::ClientConfig, router::Navigator, session::SessionStore};
use reqwest::{header::AUTHORIZATION, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shown to the user when the session cannot be recovered.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Maximum number of error body characters surfaced to the caller.
const MAX_ERROR_CHARS: usize = 200;

/// Blocking user-facing notification channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
}

pub struct AuthenticatedClient {
    http: Client,
    config: ClientConfig,
    store: SessionStore,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    // Concurrent 401s queue here so only one refresh call is in flight.
    refresh_gate: Mutex<()>,
}

impl AuthenticatedClient {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        store: SessionStore,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            config,
            store,
            notifier,
            navigator,
            refresh_gate: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Sends a request, refreshing the credential once on a 401.
    ///
    /// Non-authorization responses come back unchanged, whatever their status.
    ///
    /// # Errors
    /// Returns `ClientError::AuthExpired` when the credential cannot be
    /// refreshed, or the transport error of either dispatch.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: OutboundRequest) -> Result<Response, ClientError> {
        let attempt = Attempt::First;
        let credential = self.store.get().access_token().map(ToString::to_string);

        let response = self
            .dispatch(&request, credential.as_deref(), attempt)
            .await?;

        if !self.needs_refresh(&request, attempt, &response) {
            return Ok(response);
        }

        let fresh = self.refresh(credential.as_deref()).await?;

        let attempt = attempt.next();
        let response = self.dispatch(&request, Some(&fresh), attempt).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("request still unauthorized after refresh, giving up");
        }

        Ok(response)
    }

    /// Sends a request and decodes a JSON success body.
    ///
    /// # Errors
    /// Returns the `send` errors, `ClientError::Http` for non-success statuses,
    /// or `ClientError::Decode` when the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(OutboundRequest::get(path)).await?;
        handle_json_response(response).await
    }

    /// Posts a JSON body and decodes a JSON success body.
    ///
    /// # Errors
    /// Same as `get_json`, plus serialization failures of `body`.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)
            .map_err(|err| ClientError::InvalidInput(format!("Failed to encode request: {err}")))?;
        let response = self.send(OutboundRequest::post(path, body)).await?;
        handle_json_response(response).await
    }

    fn needs_refresh(&self, request: &OutboundRequest, attempt: Attempt, response: &Response) -> bool {
        if response.status() != StatusCode::UNAUTHORIZED || !attempt.may_refresh() {
            return false;
        }
        if self.config.is_exempt(&request.path) {
            debug!("unauthorized response from exempt endpoint, not refreshing");
            return false;
        }
        true
    }

    async fn dispatch(
        &self,
        request: &OutboundRequest,
        credential: Option<&str>,
        attempt: Attempt,
    ) -> Result<Response, ClientError> {
        let url = self.config.endpoint(&request.path)?;
        let mut builder = self.http.request(request.method.clone(), url);

        for (name, value) in &request.headers {
            // the stored credential is the only Authorization sent
            if credential.is_some() && name.eq_ignore_ascii_case(AUTHORIZATION.as_str()) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credential) = credential {
            builder = builder.bearer_auth(credential);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ClientError::from_transport)?;
        debug!(?attempt, status = %response.status(), "response received");

        Ok(response)
    }

    /// Obtains a new access credential, or expires the session.
    ///
    /// `rejected` is the credential the failed request carried; if another
    /// request already replaced it while this one waited, the replacement is
    /// reused without a second refresh call. If it was removed instead, the
    /// session already expired and the user was already told.
    async fn refresh(&self, rejected: Option<&str>) -> Result<String, ClientError> {
        let _gate = self.refresh_gate.lock().await;

        let session = self.store.get();
        match session.access_token() {
            Some(current) if Some(current) != rejected => {
                debug!("credential already refreshed by a concurrent request");
                return Ok(current.to_string());
            }
            None if rejected.is_some() => {
                debug!("session cleared while waiting for refresh");
                return Err(ClientError::AuthExpired);
            }
            _ => {}
        }

        let Some(refresh_token) = session.refresh_token() else {
            return Err(self.expire("no refresh token stored"));
        };

        match self.request_refresh(refresh_token).await {
            Ok(access_token) => {
                self.store.set_access(&access_token);
                info!("access credential refreshed");
                Ok(access_token)
            }
            Err(err) => Err(self.expire(&err.to_string())),
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<String, ClientError> {
        let url = self.config.endpoint(&self.config.refresh_path)?;

        let response = self
            .http
            .post(url)
            .json(&refresh_token)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let refreshed: RefreshResponse = handle_json_response(response).await?;
        let access_token = refreshed.access_token.trim();
        if access_token.is_empty() {
            return Err(ClientError::Decode(
                "refresh response carried an empty access_token".to_string(),
            ));
        }

        Ok(access_token.to_string())
    }

    /// Clears the session, tells the user, and moves to the login page.
    fn expire(&self, reason: &str) -> ClientError {
        warn!("session expired: {}", reason);
        self.store.clear();
        self.notifier.notify(SESSION_EXPIRED_MESSAGE);
        self.navigator.navigate_to(&self.config.login_route);
        ClientError::AuthExpired
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
pub(crate) async fn handle_json_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, ClientError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    } else {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Http {
            status,
            message: sanitize_body(&body),
        })
    }
}

/// Trims and truncates error bodies for user-facing messages.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Records everything the client asks of the UI.
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub notices: StdMutex<Vec<String>>,
        pub navigations: StdMutex<Vec<String>>,
    }

    impl Recorder {
        pub fn notices(&self) -> Vec<String> {
            self.notices.lock().map(|v| v.clone()).unwrap_or_default()
        }

        pub fn navigations(&self) -> Vec<String> {
            self.navigations.lock().map(|v| v.clone()).unwrap_or_default()
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, message: &str) {
            if let Ok(mut notices) = self.notices.lock() {
                notices.push(message.to_string());
            }
        }
    }

    impl Navigator for Recorder {
        fn navigate_to(&self, path: &str) {
            if let Ok(mut navigations) = self.navigations.lock() {
                navigations.push(path.to_string());
            }
        }
    }

    pub fn client(base_url: &str, store: SessionStore, recorder: Arc<Recorder>) -> AuthenticatedClient {
        let config = ClientConfig::new(base_url).unwrap_or_else(|err| panic!("{err}"));
        AuthenticatedClient::new(config, store, recorder.clone(), recorder)
            .unwrap_or_else(|err| panic!("{err}"))
    }
}
