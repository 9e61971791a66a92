//! Scripted in-memory stand-in for the Q&A service.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use ask_client::{ApiClient, ApiError, MemoryTokenStore, TokenStore};
use ask_core::{ChatSession, RevealTick};
use ask_types::api::{
    HealthResponse, HistoryResponse, LoginRequest, QuestionRequest, QuestionResponse,
    RegisterRequest, TokenResponse, UserUpdate,
};
use ask_types::models::{HistoryItem, UserResponse};
use tokio::sync::mpsc;

pub const TOKEN: &str = "token-abc";

pub fn user(username: &str) -> UserResponse {
    UserResponse {
        id: "u-1".into(),
        email: format!("{}@example.com", username),
        username: username.into(),
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn answer(text: &str) -> QuestionResponse {
    QuestionResponse {
        answer: text.into(),
        success: true,
        request_id: "req-1".into(),
        error: None,
        metadata: None,
    }
}

pub fn history_item(id: &str, question: &str, answer: &str) -> HistoryItem {
    HistoryItem {
        id: id.into(),
        question: question.into(),
        answer: answer.into(),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
    }
}

pub fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Status {
        status,
        message: message.into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Register(RegisterRequest),
    Login(LoginRequest),
    CurrentUser { token: Option<String> },
    UpdateUser(UserUpdate),
    DeleteUser,
    Ask(QuestionRequest),
    History { limit: u32, skip: u32 },
    Health,
}

/// Each operation pops its next scripted result; an empty script fails the
/// call with a 500.
#[derive(Default)]
pub struct FakeApi {
    pub tokens: Option<Arc<dyn TokenStore>>,
    pub calls: Mutex<Vec<Call>>,
    pub register: Mutex<VecDeque<Result<UserResponse, ApiError>>>,
    pub login: Mutex<VecDeque<Result<TokenResponse, ApiError>>>,
    pub me: Mutex<VecDeque<Result<UserResponse, ApiError>>>,
    pub update: Mutex<VecDeque<Result<UserResponse, ApiError>>>,
    pub delete: Mutex<VecDeque<Result<(), ApiError>>>,
    pub ask: Mutex<VecDeque<Result<QuestionResponse, ApiError>>>,
    pub history: Mutex<VecDeque<Result<HistoryResponse, ApiError>>>,
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(rejected(500, "unscripted call")))
}

impl FakeApi {
    pub fn with_tokens(tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            tokens: Some(tokens),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn script_login(&self, result: Result<TokenResponse, ApiError>) {
        self.login.lock().unwrap().push_back(result);
    }

    pub fn script_me(&self, result: Result<UserResponse, ApiError>) {
        self.me.lock().unwrap().push_back(result);
    }

    pub fn script_ask(&self, result: Result<QuestionResponse, ApiError>) {
        self.ask.lock().unwrap().push_back(result);
    }

    pub fn script_history(&self, items: Vec<HistoryItem>) {
        let count = items.len() as u64;
        self.history
            .lock()
            .unwrap()
            .push_back(Ok(HistoryResponse { items, count }));
    }
}

pub fn token_ok() -> Result<TokenResponse, ApiError> {
    Ok(TokenResponse {
        access_token: TOKEN.into(),
        token_type: "bearer".into(),
    })
}

impl ApiClient for FakeApi {
    async fn register(&self, req: &RegisterRequest) -> Result<UserResponse, ApiError> {
        self.record(Call::Register(req.clone()));
        pop(&self.register)
    }

    async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.record(Call::Login(req.clone()));
        pop(&self.login)
    }

    async fn current_user(&self) -> Result<UserResponse, ApiError> {
        let token = self.tokens.as_ref().and_then(|t| t.get());
        self.record(Call::CurrentUser { token });
        pop(&self.me)
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<UserResponse, ApiError> {
        self.record(Call::UpdateUser(update.clone()));
        pop(&self.update)
    }

    async fn delete_user(&self) -> Result<(), ApiError> {
        self.record(Call::DeleteUser);
        pop(&self.delete)
    }

    async fn ask(&self, req: &QuestionRequest) -> Result<QuestionResponse, ApiError> {
        self.record(Call::Ask(req.clone()));
        // Yield so the placeholder is observable as a distinct state.
        tokio::task::yield_now().await;
        pop(&self.ask)
    }

    async fn history(&self, limit: u32, skip: u32) -> Result<HistoryResponse, ApiError> {
        self.record(Call::History { limit, skip });
        pop(&self.history)
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.record(Call::Health);
        Ok(HealthResponse {
            status: "healthy".into(),
            service: "Q&A API".into(),
        })
    }
}

pub fn memory_tokens() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::new())
}

/// Apply ticks until nothing in the conversation is revealing.
pub async fn drain_reveals(chat: &mut ChatSession, ticks: &mut mpsc::UnboundedReceiver<RevealTick>) {
    while chat.is_revealing() {
        let tick = ticks.recv().await.expect("reveal channel closed");
        chat.apply_tick(tick);
    }
}
