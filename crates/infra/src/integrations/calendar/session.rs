//! Calendar session store
//!
//! The Rust seam for the auth collaborator: an in-memory token store with
//! an explicit login/logout lifecycle. Full OAuth credential management
//! lives outside this system; whatever owns it deposits the access token
//! here, and every scheduling/reservation operation asks for a session
//! per call.

use std::sync::RwLock;

use async_trait::async_trait;
use semester_core::calendar_ports::CalendarSessions;
use semester_domain::{CalendarSession, Result, SemesterError};
use tracing::info;

/// Token-backed session source
pub struct TokenSessions {
    account: String,
    token: RwLock<Option<String>>,
}

impl TokenSessions {
    /// Create a logged-out store for an account
    pub fn new(account: impl Into<String>) -> Self {
        Self { account: account.into(), token: RwLock::new(None) }
    }

    /// Create a store that is already logged in
    pub fn with_token(account: impl Into<String>, access_token: impl Into<String>) -> Self {
        let store = Self::new(account);
        store.login(access_token);
        store
    }

    /// Deposit an access token, establishing a session
    pub fn login(&self, access_token: impl Into<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(access_token.into());
            info!(account = %self.account, "calendar session established");
        }
    }

    /// Drop the stored token, ending the session
    pub fn logout(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
            info!(account = %self.account, "calendar session cleared");
        }
    }
}

#[async_trait]
impl CalendarSessions for TokenSessions {
    async fn session(&self) -> Result<Option<CalendarSession>> {
        let slot = self
            .token
            .read()
            .map_err(|_| SemesterError::Internal("session store lock poisoned".into()))?;
        Ok(slot.as_ref().map(|token| CalendarSession {
            access_token: token.clone(),
            account: self.account.clone(),
        }))
    }
}
