//! HTTP client for the Rex backend.
//!
//! One [`RexClient`] is shared by the chat terminal and the admin console so
//! the session cookie set by `/admin-login` is carried on every later admin
//! request.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::admin::backend::{AdminBackend, Mutation};
use crate::api::{ApiError, ChatReply, ChatRequest, LoginRequest, MutationResponse};
use crate::core::exchange::ChatBackend;
use crate::utils::url::construct_api_url;

#[derive(Clone)]
pub struct RexClient {
    http: reqwest::Client,
    base_url: String,
}

impl RexClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        construct_api_url(&self.base_url, endpoint)
    }

    async fn request_json<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!(%method, %url, "backend request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|err| {
            warn!(%method, %url, error = %err, "backend request failed");
        })?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(%method, %url, %status, "backend returned error status");
            return Err(ApiError::Status { status, body: text });
        }

        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request_json::<Value, T>(Method::GET, endpoint, &[], None)
            .await
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.request_json(Method::POST, "chat", &[], Some(request))
            .await
    }

    /// Submit admin credentials. `Ok(false)` means the backend refused them.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: MutationResponse = self
            .request_json(Method::POST, "admin-login", &[], Some(&body))
            .await?;
        debug!(success = response.success, "admin login answered");
        Ok(response.success)
    }

    /// Clear the backend session. The body is ignored; only transport
    /// failures are reported.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.url("logout");
        debug!(%url, "logging out");
        self.http.post(&url).send().await?;
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for RexClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.chat(request).await
    }
}

#[async_trait]
impl AdminBackend for RexClient {
    async fn fetch(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.get_json(endpoint).await
    }

    async fn mutate(&self, mutation: Mutation) -> Result<MutationResponse, ApiError> {
        let query: Vec<(&str, String)> = mutation.query.into_iter().collect();
        self.request_json(
            mutation.method,
            &mutation.endpoint,
            &query,
            mutation.body.as_ref(),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<bool, ApiError> {
        RexClient::login(self, email, password).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        RexClient::logout(self).await
    }
}
