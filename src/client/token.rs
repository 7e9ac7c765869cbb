//! Reads unverified claims out of an access token. The client only uses them
//! to decide which landing page to show; the API remains the authority.

use crate::session::Role;
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    role: Option<String>,
}

/// Returns the `role` claim of a JWT-shaped token, if it names a known role.
#[must_use]
pub fn role_claim(token: &str) -> Option<Role> {
    let payload = token.split('.').nth(1)?;
    let decoded = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&decoded).ok()?;
    claims.role?.parse().ok()
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
    format!("{header}.{payload}.signature")
}
