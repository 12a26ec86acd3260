//! The admin console's view of the backend.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::api::{ApiError, MutationResponse};

/// One write against an admin endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub method: Method,
    pub endpoint: String,
    /// Single query parameter, e.g. `?id=3` on reflection deletes.
    pub query: Option<(&'static str, String)>,
    pub body: Option<Value>,
}

impl Mutation {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: None,
            body: None,
        }
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query = Some((key, value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn fetch(&self, endpoint: &str) -> Result<Value, ApiError>;

    async fn mutate(&self, mutation: Mutation) -> Result<MutationResponse, ApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<bool, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;
}
