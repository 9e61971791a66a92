//! Authenticated identity and its lifecycle.
//!
//! `SessionManager` is the only owner of the signed-in user. Whether the
//! session is authenticated is always derived from that user, never stored
//! next to it, so token presence and identity cannot drift apart in memory.

use std::sync::Arc;

use tracing::{debug, info, warn};

use ask_client::{ApiClient, TokenStore};
use ask_types::api::{LoginRequest, RegisterRequest, UserUpdate};
use ask_types::models::UserResponse;
use ask_types::routes::Route;

use crate::error::SessionError;

pub struct SessionManager<A> {
    api: Arc<A>,
    tokens: Arc<dyn TokenStore>,
    user: Option<UserResponse>,
    loading: bool,
    hydrated: bool,
}

impl<A: ApiClient> SessionManager<A> {
    /// A fresh, not yet hydrated session. It reports loading until
    /// [`hydrate`](Self::hydrate) has run.
    pub fn new(api: Arc<A>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            user: None,
            loading: true,
            hydrated: false,
        }
    }

    pub fn user(&self) -> Option<&UserResponse> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Resolve a stored token into a user. Runs once; later calls return
    /// immediately. A token that no longer resolves is removed.
    pub async fn hydrate(&mut self) {
        if self.hydrated {
            debug!("Session already hydrated");
            return;
        }
        self.hydrated = true;

        if !self.tokens.is_present() {
            self.loading = false;
            return;
        }

        self.loading = true;
        match self.api.current_user().await {
            Ok(user) => {
                info!(username = %user.username, "Session restored");
                self.user = Some(user);
            }
            Err(e) => {
                warn!("Error loading user: {}", e);
                self.tokens.remove();
                self.user = None;
            }
        }
        self.loading = false;
    }

    /// Exchange credentials for a token, then load the user behind it.
    /// Returns the view to navigate to.
    pub async fn login(&mut self, credentials: &LoginRequest) -> Result<Route, SessionError> {
        self.loading = true;
        let result = self.login_inner(credentials).await;
        self.loading = false;
        result
    }

    async fn login_inner(&mut self, credentials: &LoginRequest) -> Result<Route, SessionError> {
        let token = self.api.login(credentials).await?;
        self.tokens.set(&token.access_token)?;

        let user = self.api.current_user().await?;
        info!(username = %user.username, "Logged in");
        self.user = Some(user);
        Ok(Route::Dashboard)
    }

    /// Create the account, then log in with its email and password. Loading
    /// stays set across both requests.
    pub async fn register(&mut self, details: &RegisterRequest) -> Result<Route, SessionError> {
        self.loading = true;
        let result = self.register_inner(details).await;
        self.loading = false;
        result
    }

    async fn register_inner(&mut self, details: &RegisterRequest) -> Result<Route, SessionError> {
        let user = self.api.register(details).await?;
        info!(username = %user.username, "Registered");

        self.login_inner(&LoginRequest {
            username: details.email.clone(),
            password: details.password.clone(),
        })
        .await
    }

    pub fn logout(&mut self) -> Route {
        self.tokens.remove();
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "Logged out");
        }
        Route::Login
    }

    /// Apply a partial profile change. The current user is only replaced once
    /// the server has accepted it.
    pub async fn update_profile(&mut self, update: &UserUpdate) -> Result<&UserResponse, SessionError> {
        if update.is_empty() {
            return Err(SessionError::validation("Nothing to update"));
        }
        let user = self.api.update_user(update).await?;
        debug!(username = %user.username, "Profile updated");
        Ok(self.user.insert(user))
    }

    /// Delete the account server-side, then log out locally.
    pub async fn delete_account(&mut self) -> Result<Route, SessionError> {
        self.api.delete_user().await?;
        info!("Account deleted");
        Ok(self.logout())
    }
}
