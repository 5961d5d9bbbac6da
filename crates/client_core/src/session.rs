//! Bearer-token session and its persistence in the local key-value store.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared::{domain::CurrentUser, protocol::AuthResponse};
use storage::KeyValueStore;
use tracing::warn;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const CURRENT_USER_KEY: &str = "currentUser";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: CurrentUser,
}

impl Session {
    pub fn email(&self) -> &str {
        self.user.email.as_deref().unwrap_or_default()
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        let user = auth.current_user();
        Self {
            token: auth.token,
            user,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the persisted session when a non-empty token is stored. A
    /// missing or unreadable identity entry degrades to an empty user.
    pub async fn load(&self) -> Result<Option<Session>> {
        let token = self
            .store
            .get_item(AUTH_TOKEN_KEY)
            .await
            .context("failed to read stored auth token")?;
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return Ok(None);
        };

        let raw_user = self
            .store
            .get_item(CURRENT_USER_KEY)
            .await
            .context("failed to read stored user")?;
        let user = match raw_user {
            Some(raw) => serde_json::from_str::<CurrentUser>(&raw).unwrap_or_else(|err| {
                warn!("session: ignoring unreadable stored user: {err}");
                CurrentUser::default()
            }),
            None => CurrentUser::default(),
        };

        Ok(Some(Session { token, user }))
    }

    /// The token is written last: `load` only yields a session once it exists.
    pub async fn save(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user)?;
        self.store
            .set_item(CURRENT_USER_KEY, &user)
            .await
            .context("failed to persist user")?;
        self.store
            .set_item(AUTH_TOKEN_KEY, &session.token)
            .await
            .context("failed to persist auth token")?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.store
            .remove_item(AUTH_TOKEN_KEY)
            .await
            .context("failed to remove auth token")?;
        self.store
            .remove_item(CURRENT_USER_KEY)
            .await
            .context("failed to remove user")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
