//! Authenticated session.
//!
//! [`Session`] owns the current [`User`], persists it under
//! [`config::CURRENT_USER_KEY`], and publishes its token to the shared
//! [`TokenSource`] so every request made through the [`ApiClient`] carries
//! `Authorization: Bearer <token>`.

use tokio::sync::watch;

use crate::config;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::user::PasswordResetConfirmation;
use crate::models::{
    LoginRequest, PasswordChangeRequest, PasswordResetRequest, RegisterRequest, RegisterResponse,
    User,
};
use crate::storage::{self, SharedStorage};
use crate::validation::Validate;

pub struct Session {
    client: ApiClient,
    storage: SharedStorage,
    user: watch::Sender<Option<User>>,
}

impl Session {
    /// Build a session, restoring a previously persisted user if present.
    pub fn new(client: ApiClient, storage: SharedStorage) -> Self {
        let stored: Option<User> = storage::load_json(storage.as_ref(), config::CURRENT_USER_KEY);
        if let Some(user) = &stored {
            tracing::info!(user_id = user.id, "restored session");
        }
        client.token_source().set(stored.as_ref().map(|u| u.token.clone()));
        let (user, _) = watch::channel(stored);
        Self {
            client,
            storage,
            user,
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.borrow().as_ref().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.user.borrow().as_ref().map(|u| u.token.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<User> {
        credentials.validate()?;
        let user: User = self.client.post("auth/login", credentials).await?;
        self.establish(user.clone())?;
        Ok(user)
    }

    /// Create an account and sign in as it.
    ///
    /// Backends that do not return a token on registration get an explicit
    /// login with the same credentials.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        request.validate()?;
        let created: RegisterResponse = self.client.post("users", request).await?;

        match created.token {
            Some(token) => {
                let user = User {
                    id: created.id,
                    username: created.username,
                    email: created.email,
                    token,
                    avatar: created.avatar,
                };
                self.establish(user.clone())?;
                Ok(user)
            }
            None => {
                tracing::debug!(user_id = created.id, "registration returned no token; logging in");
                self.login(&LoginRequest::new(
                    request.username.clone(),
                    request.password.clone(),
                ))
                .await
            }
        }
    }

    /// Forget the current user locally. The backend is not contacted.
    pub fn logout(&self) -> Result<()> {
        self.client.token_source().set(None);
        self.user.send_replace(None);
        tracing::info!("logged out");
        self.storage.remove(config::CURRENT_USER_KEY)
    }

    /// Ask the backend to email a password-reset link.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let request = PasswordResetRequest {
            email: email.trim().to_string(),
        };
        request.validate()?;
        self.client.post_unit("auth/password-reset", &request).await
    }

    /// Set a new password using the token from the reset email.
    pub async fn confirm_password_reset(
        &self,
        token: &str,
        change: &PasswordChangeRequest,
    ) -> Result<()> {
        change.validate()?;
        let body = PasswordResetConfirmation {
            token,
            new_password: &change.new_password,
        };
        self.client
            .post_unit("auth/password-reset/confirm", &body)
            .await
    }

    fn establish(&self, user: User) -> Result<()> {
        tracing::info!(user_id = user.id, username = %user.username, "session established");
        self.client.token_source().set(Some(user.token.clone()));
        let persisted = storage::save_json(self.storage.as_ref(), config::CURRENT_USER_KEY, &user);
        self.user.send_replace(Some(user));
        persisted
    }
}
