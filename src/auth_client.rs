//! Authentication client: login, logout and token refresh

use std::sync::Arc;

use async_singleflight::Group;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::request::join_url;
use crate::session::SessionHandler;
use crate::token_store::TokenStore;
use crate::types::{AuthTokens, LoginRequest, RefreshRequest, RefreshResponse};

const LOGIN_PATH: &str = "/auth/token/";
const REFRESH_PATH: &str = "/auth/token/refresh/";

/// All refreshes share one flight: there is a single session per client
const REFRESH_FLIGHT_KEY: &str = "session";

/// Authentication client with token persistence and refresh
///
/// Cheap to clone; clones share the token store and the refresh flight.
#[derive(Clone)]
pub struct AuthClient {
    http_client: Client,
    base_url: String,
    token_store: TokenStore,
    session_handler: Arc<dyn SessionHandler>,
    /// Singleflight group so concurrent 401s await one refresh and share its result
    /// Error type is String because singleflight requires shared error type
    refresh_singleflight: Arc<Group<String, String>>,
}

impl AuthClient {
    pub fn new(
        http_client: Client,
        base_url: impl Into<String>,
        token_store: TokenStore,
        session_handler: Arc<dyn SessionHandler>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            token_store,
            session_handler,
            refresh_singleflight: Arc::new(Group::new()),
        }
    }

    /// Exchange credentials for a token pair and store it
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthTokens> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http_client
            .post(join_url(&self.base_url, LOGIN_PATH))
            .json(&request)
            .send()
            .await?;

        let response = check_response!(response);
        let tokens: AuthTokens = decode_body(response, LOGIN_PATH).await?;

        self.token_store.save(&tokens);
        info!(username = %username, "Logged in");

        Ok(tokens)
    }

    /// Forget the current session
    pub fn logout(&self) {
        self.token_store.clear();
        info!("Logged out");
    }

    /// Obtain a new access token with the stored refresh token and store it.
    ///
    /// Does not tear the session down on failure; see
    /// [`AuthClient::refresh_after_unauthorized`] for the interception path.
    pub async fn refresh_access_token(&self) -> Result<String> {
        let refresh_token = self
            .token_store
            .refresh_token()
            .ok_or_else(|| ClientError::SessionExpired("No refresh token".to_string()))?;

        let request = RefreshRequest {
            refresh: refresh_token,
        };

        let response = self
            .http_client
            .post(join_url(&self.base_url, REFRESH_PATH))
            .json(&request)
            .send()
            .await?;

        let response = check_response!(response);
        let refreshed: RefreshResponse = decode_body(response, REFRESH_PATH).await?;

        self.token_store.set_access_token(&refreshed.access);
        if let Some(rotated) = &refreshed.refresh {
            self.token_store.set_refresh_token(rotated);
            debug!("Refresh token rotated");
        }
        info!("Access token refreshed successfully");

        Ok(refreshed.access)
    }

    /// Recover from a 401 received while presenting `rejected_token`.
    ///
    /// Concurrent callers share a single refresh. If the stored access token
    /// already differs from the rejected one, another request refreshed in the
    /// meantime and the stored token is returned without a network call.
    /// When refreshing fails the token store is cleared and the session
    /// handler is notified, once per failed flight.
    pub async fn refresh_after_unauthorized(&self, rejected_token: Option<&str>) -> Result<String> {
        let (success_opt, error_opt, _shared) = self
            .refresh_singleflight
            .work(REFRESH_FLIGHT_KEY, async {
                if let Some(current) = self.token_store.access_token() {
                    if rejected_token != Some(current.as_str()) {
                        debug!("Access token already replaced, skipping refresh");
                        return Ok(current);
                    }
                }

                match self.refresh_access_token().await {
                    Ok(token) => Ok(token),
                    Err(e) => {
                        let err_msg = e.to_string();
                        warn!(error = %err_msg, "Token refresh failed, ending session");
                        self.tear_down();
                        Err(err_msg)
                    }
                }
            })
            .await;

        match (success_opt, error_opt) {
            (Some(token), None) => Ok(token),
            (None, Some(err_str)) => Err(ClientError::SessionExpired(err_str)),
            _ => Err(ClientError::SessionExpired(
                "Unknown error during token refresh".to_string(),
            )),
        }
    }

    fn tear_down(&self) {
        self.token_store.clear();
        self.session_handler.session_expired();
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }
}

/// A 2xx reply whose body is not the expected JSON is an invalid response,
/// not a transport failure
async fn decode_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    path: &str,
) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::InvalidResponse(format!("POST {path}: {e}")))
}
