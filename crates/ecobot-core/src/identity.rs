//! Identity and session capability.
//!
//! The hosted auth service is reached through [`IdentityProvider`], which the
//! shell receives at construction. [`InMemoryIdentityProvider`] is the local
//! stand-in used by the terminal shell and the tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AuthError, EcobotError, Result};
use crate::types::{User, UserRole, UserSession};

/// Minimum password length accepted on sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-in, sign-up, sign-out and current-session queries.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The active session, if any.
    async fn current_session(&self) -> Result<Option<UserSession>>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession>;

    /// Register a new account and open a session for it.
    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<UserSession>;

    async fn sign_out(&self) -> Result<()>;
}

/// Generate a random 32-character hex access token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct IdentityState {
    accounts: HashMap<String, Account>,
    session: Option<UserSession>,
}

/// Process-local identity provider.
///
/// Accounts live only as long as the provider; nothing is written to disk.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    state: Mutex<IdentityState>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, IdentityState>> {
        self.state
            .lock()
            .map_err(|e| EcobotError::Storage(format!("identity lock poisoned: {}", e)))
    }

    fn open_session(state: &mut IdentityState, user: User) -> UserSession {
        let session = UserSession {
            user,
            access_token: generate_token(),
            started_at: Utc::now(),
        };
        state.session = Some(session.clone());
        session
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> std::result::Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn current_session(&self) -> Result<Option<UserSession>> {
        Ok(self.lock()?.session.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession> {
        let key = normalize_email(email);
        let mut state = self.lock()?;
        let user = match state.accounts.get(&key) {
            Some(account) if account.password == password => account.user.clone(),
            _ => {
                debug!(email = %key, "Sign-in rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };
        info!(user_id = %user.id, "User signed in");
        Ok(Self::open_session(&mut state, user))
    }

    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<UserSession> {
        let key = normalize_email(email);
        validate_email(&key)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN).into());
        }

        let mut state = self.lock()?;
        if state.accounts.contains_key(&key) {
            return Err(AuthError::EmailTaken(key).into());
        }

        let user = User {
            id: Uuid::new_v4(),
            display_name: name.trim().to_string(),
            email: key.clone(),
            avatar: None,
            role: UserRole::User,
            created_at: Utc::now(),
        };
        state.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        info!(user_id = %user.id, "User registered");
        Ok(Self::open_session(&mut state, user))
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.lock()?;
        match state.session.take() {
            Some(session) => {
                info!(user_id = %session.user.id, "User signed out");
                Ok(())
            }
            None => Err(AuthError::NotSignedIn.into()),
        }
    }
}
