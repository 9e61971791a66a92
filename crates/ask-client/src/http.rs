use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use ask_types::api::{
    ErrorBody, HealthResponse, HistoryResponse, LoginRequest, QuestionRequest, QuestionResponse,
    RegisterRequest, TokenResponse, UserUpdate,
};
use ask_types::models::UserResponse;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::token_store::TokenStore;

const GENERIC_ERROR: &str = "An error occurred";
const LOGIN_ERROR: &str = "Login failed";

/// [`ApiClient`] over HTTP. Reads the bearer token from the shared
/// [`TokenStore`] on every authenticated request, so a login or logout
/// elsewhere is picked up without rebuilding the client.
pub struct HttpApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Turn a response into `T`, or into [`ApiError::Status`] carrying the
/// server's `detail` text.
async fn decode<T: DeserializeOwned>(resp: Response, fallback: &str) -> Result<T, ApiError> {
    let resp = check(resp, fallback).await?;
    Ok(resp.json::<T>().await?)
}

async fn check(resp: Response, fallback: &str) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.json::<ErrorBody>().await.unwrap_or_default();
    let message = body.message().unwrap_or(fallback).to_string();
    debug!(status = status.as_u16(), %message, "Request rejected");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

impl ApiClient for HttpApiClient {
    async fn register(&self, req: &RegisterRequest) -> Result<UserResponse, ApiError> {
        debug!(email = %req.email, "POST /auth/register");
        let resp = self.http.post(self.url("/auth/register")).json(req).send().await?;
        decode(resp, GENERIC_ERROR).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError> {
        debug!(username = %req.username, "POST /auth/login");
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .form(&[("username", req.username.as_str()), ("password", req.password.as_str())])
            .send()
            .await?;
        decode(resp, LOGIN_ERROR).await
    }

    async fn current_user(&self) -> Result<UserResponse, ApiError> {
        debug!("GET /auth/me");
        let resp = self.authed(self.http.get(self.url("/auth/me"))).send().await?;
        decode(resp, GENERIC_ERROR).await
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<UserResponse, ApiError> {
        debug!("PUT /auth/me");
        let resp = self
            .authed(self.http.put(self.url("/auth/me")))
            .json(update)
            .send()
            .await?;
        decode(resp, GENERIC_ERROR).await
    }

    async fn delete_user(&self) -> Result<(), ApiError> {
        debug!("DELETE /auth/me");
        let resp = self.authed(self.http.delete(self.url("/auth/me"))).send().await?;
        // Body is empty (204) or ignorable.
        check(resp, GENERIC_ERROR).await?;
        Ok(())
    }

    async fn ask(&self, req: &QuestionRequest) -> Result<QuestionResponse, ApiError> {
        debug!(len = req.question.len(), has_context = req.context.is_some(), "POST /ask");
        let resp = self.authed(self.http.post(self.url("/ask"))).json(req).send().await?;
        decode(resp, GENERIC_ERROR).await
    }

    async fn history(&self, limit: u32, skip: u32) -> Result<HistoryResponse, ApiError> {
        debug!(limit, skip, "GET /history");
        let resp = self
            .authed(self.http.get(self.url("/history")))
            .query(&[("limit", limit), ("skip", skip)])
            .send()
            .await?;
        decode(resp, GENERIC_ERROR).await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let resp = self.http.get(self.url("/")).send().await?;
        decode(resp, GENERIC_ERROR).await
    }
}
