use ask_types::api::{
    HealthResponse, HistoryResponse, LoginRequest, QuestionRequest, QuestionResponse,
    RegisterRequest, TokenResponse, UserUpdate,
};
use ask_types::models::UserResponse;

use crate::error::ApiError;

/// Operations the Q&A service offers. Calls marked authenticated carry the
/// stored session token when there is one.
#[allow(async_fn_in_trait)]
pub trait ApiClient {
    /// `POST /auth/register`, unauthenticated.
    async fn register(&self, req: &RegisterRequest) -> Result<UserResponse, ApiError>;

    /// `POST /auth/login`, form-encoded, unauthenticated.
    async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError>;

    /// `GET /auth/me`
    async fn current_user(&self) -> Result<UserResponse, ApiError>;

    /// `PUT /auth/me`
    async fn update_user(&self, update: &UserUpdate) -> Result<UserResponse, ApiError>;

    /// `DELETE /auth/me`
    async fn delete_user(&self) -> Result<(), ApiError>;

    /// `POST /ask`
    async fn ask(&self, req: &QuestionRequest) -> Result<QuestionResponse, ApiError>;

    /// `GET /history?limit&skip`
    async fn history(&self, limit: u32, skip: u32) -> Result<HistoryResponse, ApiError>;

    /// `GET /`
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}
