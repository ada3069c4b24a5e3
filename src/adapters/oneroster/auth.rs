//! Session credentials for the OneRoster API
//!
//! Two modes are supported:
//! - `oauth2`: client-credentials grant against the provider's token
//!   endpoint, client authenticated with HTTP Basic
//! - `bearer`: a pre-issued access token taken from configuration
//!
//! The session is an explicit object owned by the client; nothing is kept in
//! process-wide state.

use super::client::map_send_error;
use crate::config::AuthConfig;
use crate::domain::errors::OneRosterError;
use crate::domain::{Result, RosterError};
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Seconds before expiry at which a token is treated as expired
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Token state, guarded by the session mutex
#[derive(Debug, Default)]
struct TokenState {
    access_token: Option<String>,
    token_expiry: Option<DateTime<Utc>>,
}

impl TokenState {
    fn is_expiring(&self) -> bool {
        self.token_expiry
            .map(|expiry| (expiry - Utc::now()).num_seconds() < EXPIRY_MARGIN_SECONDS)
            .unwrap_or(false)
    }
}

/// OAuth2 token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Authenticated session for one provider
pub struct Session {
    http: Client,
    auth: AuthConfig,
    state: Mutex<TokenState>,
}

impl Session {
    /// Create an unauthenticated session
    ///
    /// A `bearer` session is usable immediately if the configuration carries
    /// a token; an `oauth2` session needs [`Session::authenticate`] first.
    pub fn new(http: Client, auth: AuthConfig) -> Self {
        let access_token = match auth.auth_type.as_str() {
            "bearer" => auth
                .token
                .as_ref()
                .map(|token| token.expose_secret().as_str().to_string())
                .filter(|token| !token.is_empty()),
            _ => None,
        };

        Self {
            http,
            auth,
            state: Mutex::new(TokenState {
                access_token,
                token_expiry: None,
            }),
        }
    }

    /// Authentication mode (`oauth2` or `bearer`)
    pub fn auth_type(&self) -> &str {
        &self.auth.auth_type
    }

    /// Establish the session credential
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the token request is rejected or
    /// no bearer token is configured, and a configuration error for missing
    /// OAuth2 settings.
    pub async fn authenticate(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        match self.auth.auth_type.as_str() {
            "oauth2" => self.acquire_token(&mut state).await,
            "bearer" => {
                if state.access_token.is_none() {
                    return Err(OneRosterError::Authentication(
                        "No bearer token configured".to_string(),
                    )
                    .into());
                }
                tracing::debug!("Using configured bearer token");
                Ok(())
            }
            other => Err(RosterError::Configuration(format!(
                "Unsupported auth_type: {other}. Supported: oauth2, bearer"
            ))),
        }
    }

    /// Current access token, for the `Authorization: Bearer` header
    ///
    /// Fails without touching the network when the session holds no token.
    /// An OAuth2 token about to expire is re-acquired first.
    pub async fn bearer(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if state.access_token.is_none() {
            return Err(OneRosterError::Authentication(
                "Not authenticated. Call authenticate() first.".to_string(),
            )
            .into());
        }

        if self.auth.auth_type == "oauth2" && state.is_expiring() {
            tracing::debug!("Access token expiring, requesting a new one");
            self.acquire_token(&mut state).await?;
        }

        state.access_token.clone().ok_or_else(|| {
            OneRosterError::Authentication("Access token unavailable".to_string()).into()
        })
    }

    /// Whether the session currently holds a token
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.access_token.is_some()
    }

    /// Client-credentials grant; stores the token in `state`
    async fn acquire_token(&self, state: &mut TokenState) -> Result<()> {
        let token_url = self.auth.token_url.as_deref().ok_or_else(|| {
            RosterError::Configuration("token_url is required for oauth2 authentication".to_string())
        })?;

        let client_id = self.auth.client_id.as_deref().ok_or_else(|| {
            RosterError::Configuration("client_id is required for oauth2 authentication".to_string())
        })?;

        let client_secret = self.auth.client_secret.as_ref().ok_or_else(|| {
            RosterError::Configuration(
                "client_secret is required for oauth2 authentication".to_string(),
            )
        })?;

        tracing::debug!(
            token_url = %token_url,
            client_id = %client_id,
            "Requesting access token with client credentials"
        );

        let mut form = vec![("grant_type", "client_credentials")];
        if let Some(scope) = self.auth.scope.as_deref() {
            form.push(("scope", scope));
        }

        let response = self
            .http
            .post(token_url)
            .basic_auth(client_id, Some(client_secret.expose_secret().as_str()))
            .form(&form)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(OneRosterError::Authentication(format!(
                "Token request failed with status {status}: {error_text}"
            ))
            .into());
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            OneRosterError::InvalidResponse(format!("Failed to parse token response: {e}"))
        })?;

        let token_expiry = token_response
            .expires_in
            .map(|seconds| Utc::now() + chrono::Duration::seconds(seconds as i64));

        state.access_token = Some(token_response.access_token);
        state.token_expiry = token_expiry;

        tracing::info!(
            expires_at = ?token_expiry,
            "Acquired OneRoster access token"
        );

        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth_type", &self.auth.auth_type)
            .finish_non_exhaustive()
    }
}
