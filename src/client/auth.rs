//! Account endpoints of the inventory API. These are the calls that create or
//! recover a session, so none of them ever triggers a credential refresh.

use super::{token::role_claim, AuthenticatedClient, ClientError, OutboundRequest};
use crate::{
    config::{FORGOT_PASSWORD_PATH, LOGIN_PATH, REGISTER_PATH, RESET_PASSWORD_PATH},
    session::{Role, Session},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

const MIN_PASSWORD_CHARS: usize = 8;
const MAX_PASSWORD_CHARS: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: String,
    pub role: String,
}

impl RegisterRequest {
    /// Self-registration always creates a supplier account.
    pub fn supplier(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
            phone_number: phone_number.into(),
            role: Role::Supplier.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

pub fn valid_password(password: &str) -> bool {
    (MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&password.chars().count())
}

fn require_email(email: &str) -> Result<(), ClientError> {
    if valid_email(email) {
        Ok(())
    } else {
        Err(ClientError::InvalidInput("invalid email address".to_string()))
    }
}

impl AuthenticatedClient {
    /// Logs in and persists the returned session. The role is taken from the
    /// access token's `role` claim.
    ///
    /// # Errors
    /// Returns `ClientError::Http` with status 401 for wrong credentials, or
    /// the usual transport and decode errors.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        require_email(email)?;

        let body = json!({ "email": email, "password": password });
        let response = self.send(OutboundRequest::post(LOGIN_PATH, body)).await?;
        let login: LoginResponse = super::handle_json_response(response).await?;

        let role = role_claim(&login.access_token);
        let session = Session::new(
            Some(login.access_token.as_str()),
            login.refresh_token.as_deref(),
            role,
        );
        if !session.is_authenticated() {
            return Err(ClientError::Decode(
                "login response carried an empty access_token".to_string(),
            ));
        }

        self.store().set(&session);
        info!(role = ?role, "logged in");

        Ok(session)
    }

    /// Creates a supplier account. Does not log in.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidInput` for a malformed email or password
    /// before any network call.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ClientError> {
        require_email(&request.email)?;
        if !valid_password(&request.password) {
            return Err(ClientError::InvalidInput(format!(
                "password must be {MIN_PASSWORD_CHARS} to {MAX_PASSWORD_CHARS} characters"
            )));
        }

        self.post_json(REGISTER_PATH, request).await
    }

    /// Requests a password reset link by email.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidInput` for a malformed email.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError> {
        require_email(email)?;
        self.post_json(FORGOT_PASSWORD_PATH, &json!({ "email": email }))
            .await
    }

    /// Sets a new password using the token from the reset link.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidInput` for an out-of-range password.
    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        if !valid_password(new_password) {
            return Err(ClientError::InvalidInput(format!(
                "password must be {MIN_PASSWORD_CHARS} to {MAX_PASSWORD_CHARS} characters"
            )));
        }

        let body: Value = json!({ "token": token, "new_password": new_password });
        self.post_json(RESET_PASSWORD_PATH, &body).await
    }

    /// Drops the local session and returns to the login page.
    pub fn logout(&self) {
        self.store().clear();
        self.navigator.navigate_to(&self.config.login_route);
        info!("logged out");
    }
}
