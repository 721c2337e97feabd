//! Authenticated HTTP client
//!
//! Every request to a non-auth endpoint carries the stored access token as a
//! bearer credential. A 401 triggers one refresh through the [`AuthClient`],
//! after which the request is rebuilt and sent exactly once more. A 401 on the
//! retried request is final.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth_client::AuthClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::request::{join_url, ApiRequest, RequestBody};
use crate::session::SessionHandler;
use crate::token_store::TokenStore;

#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    auth: AuthClient,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(
        config: &ClientConfig,
        token_store: TokenStore,
        session_handler: Arc<dyn SessionHandler>,
    ) -> Result<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http_client(
            http_client,
            &config.api_base_url,
            token_store,
            session_handler,
        ))
    }

    /// Create a client around an existing `reqwest` client
    pub fn with_http_client(
        http_client: Client,
        base_url: &str,
        token_store: TokenStore,
        session_handler: Arc<dyn SessionHandler>,
    ) -> Self {
        let auth = AuthClient::new(
            http_client.clone(),
            base_url,
            token_store,
            session_handler,
        );

        Self {
            http_client,
            base_url: base_url.to_string(),
            auth,
        }
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn token_store(&self) -> &TokenStore {
        self.auth.token_store()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut request = ApiRequest::new(Method::GET, path);
        for (key, value) in query {
            request = request.query(*key, value);
        }
        self.send(request).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: RequestBody) -> Result<T> {
        self.send(ApiRequest::new(Method::POST, path).body(body)).await
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str, body: RequestBody) -> Result<T> {
        self.send(ApiRequest::new(Method::PATCH, path).body(body)).await
    }

    /// Delete a resource; any response body is discarded
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.execute(&ApiRequest::new(Method::DELETE, path)).await?;
        check_response!(response);
        Ok(())
    }

    /// Execute a request and decode its JSON body
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(&request).await?;
        let response = check_response!(response);

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "{} {}: {e}",
                request.method, request.path
            ))
        })
    }

    /// Execute a request with credential attachment and one-shot refresh.
    ///
    /// Returns the final response whatever its status; only transport failures
    /// and failed refreshes are errors here.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let token = if request.is_auth_endpoint() {
            None
        } else {
            self.token_store().access_token()
        };

        let response = self.dispatch(request, token.as_deref()).await?;

        // Auth endpoints report bad credentials with 401; refreshing cannot fix those
        if response.status() != StatusCode::UNAUTHORIZED || request.is_auth_endpoint() {
            return Ok(response);
        }

        debug!(
            method = %request.method,
            path = %request.path,
            "Received 401, refreshing access token"
        );

        let fresh = self.auth.refresh_after_unauthorized(token.as_deref()).await?;
        self.dispatch(request, Some(&fresh)).await
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), join_url(&self.base_url, &request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        };

        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = token.is_some(),
            "Sending request"
        );

        Ok(builder.send().await?)
    }
}
