//! Service-account authentication for Google APIs.
//!
//! A signed RS256 JWT assertion is exchanged at the key's `token_uri` for a
//! short-lived bearer token.

use std::path::Path;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

pub const SHEETS_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The subset of a downloaded service-account JSON key that signing needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[redacted]")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Read a service-account key file.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Credentials`] if the file cannot be read or is
    /// not a service-account key.
    pub async fn from_file(path: &Path) -> Result<Self, ExportError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ExportError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ExportError::Credentials(format!(
                "{} is not a service account key: {e}",
                path.display()
            ))
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Build and sign the JWT assertion for `scopes`, issued at `now` (unix secs).
pub(crate) fn sign_assertion(
    key: &ServiceAccountKey,
    scopes: &[&str],
    now: i64,
) -> Result<String, ExportError> {
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: scopes.join(" "),
        aud: key.token_uri.clone(),
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid.clone_from(&key.private_key_id);

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &encoding_key)?)
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange a signed assertion for an access token.
///
/// # Errors
///
/// - [`ExportError::Jwt`] if the private key cannot sign.
/// - [`ExportError::Http`] on network failure.
/// - [`ExportError::Credentials`] if the token endpoint rejects the assertion.
pub async fn fetch_access_token(
    http: &reqwest::Client,
    key: &ServiceAccountKey,
    scopes: &[&str],
) -> Result<String, ExportError> {
    let assertion = sign_assertion(key, scopes, chrono::Utc::now().timestamp())?;
    let form = [
        ("grant_type", JWT_BEARER_GRANT),
        ("assertion", assertion.as_str()),
    ];
    let response = http.post(&key.token_uri).form(&form).send().await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ExportError::Credentials(format!(
            "token endpoint returned HTTP {}: {body}",
            status.as_u16()
        )));
    }

    let token: TokenResponse = serde_json::from_str(&body).map_err(|e| ExportError::Deserialize {
        context: "token response".to_string(),
        source: e,
    })?;
    tracing::debug!(client_email = %key.client_email, "obtained service account access token");
    Ok(token.access_token)
}
