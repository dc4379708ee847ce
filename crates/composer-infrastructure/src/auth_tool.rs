//! In-memory authentication tool.
//!
//! Holds a fixed credential table and at most one current session. A
//! session expires `session_ttl` after it was created; expiry is only
//! noticed (and the session evicted) on the next call that looks at it.

use chrono::{DateTime, Utc};
use composer_core::config::{AuthSettings, DEFAULT_SESSION_TTL_MINUTES};
use composer_core::{ComposerError, Result, ToolResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::Display;
use tokio::sync::RwLock;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const NO_SESSION: &str = "No active session";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
    Admin,
}

impl Role {
    pub fn allows(&self, permission: Permission) -> bool {
        match self {
            Role::Admin => true,
            Role::User => matches!(permission, Permission::Read | Permission::Write),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

struct Account {
    user: User,
    password: &'static str,
}

fn builtin_accounts() -> HashMap<String, Account> {
    let accounts = [
        ("1", "admin", "admin@composer.local", Role::Admin, "admin123"),
        ("2", "user", "user@composer.local", Role::User, "user123"),
    ];

    accounts
        .into_iter()
        .map(|(id, username, email, role, password)| {
            (
                username.to_string(),
                Account {
                    user: User {
                        id: id.to_string(),
                        username: username.to_string(),
                        email: email.to_string(),
                        role,
                    },
                    password,
                },
            )
        })
        .collect()
}

pub struct AuthTool {
    accounts: HashMap<String, Account>,
    session: RwLock<Option<AuthSession>>,
    session_ttl: chrono::Duration,
}

impl AuthTool {
    /// Builds the tool from config. An unusable TTL falls back to the default
    /// with a warning; `ConfigService` rejects such files before this point.
    pub fn new(settings: &AuthSettings) -> Self {
        let session_ttl = settings.session_ttl().unwrap_or_else(|e| {
            tracing::warn!(target: "composer::tools::auth", error = %e, "Using default session lifetime");
            chrono::Duration::minutes(DEFAULT_SESSION_TTL_MINUTES)
        });
        Self::with_session_ttl(session_ttl)
    }

    pub fn with_session_ttl(session_ttl: chrono::Duration) -> Self {
        Self {
            accounts: builtin_accounts(),
            session: RwLock::new(None),
            session_ttl,
        }
    }

    /// Returns the current session, evicting it first if it has expired.
    async fn live_session(&self) -> Option<AuthSession> {
        let mut slot = self.session.write().await;
        evict_expired(&mut slot);
        slot.clone()
    }

    /// Logs a user in.
    ///
    /// While a session is live, it is returned as-is and the supplied
    /// credentials are not checked. The session slot stays locked from the
    /// liveness check until the new session is stored.
    pub async fn authenticate(&self, credentials: &Credentials) -> ToolResult<AuthSession> {
        let mut slot = self.session.write().await;
        evict_expired(&mut slot);
        if let Some(existing) = slot.as_ref() {
            return ToolResult::ok(existing.clone()).with_message("Already authenticated");
        }

        match self.create_session(credentials) {
            Ok(session) => {
                *slot = Some(session.clone());
                tracing::info!(
                    target: "composer::tools::auth",
                    username = %session.user.username,
                    "User authenticated"
                );
                ToolResult::ok(session).with_message("Authentication successful")
            }
            Err(e) => {
                tracing::warn!(
                    target: "composer::tools::auth",
                    username = %credentials.username,
                    "Authentication failed: {}",
                    e
                );
                ToolResult::fail(e.to_string())
            }
        }
    }

    fn create_session(&self, credentials: &Credentials) -> Result<AuthSession> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(ComposerError::invalid_input("Username and password are required"));
        }

        let account = self
            .accounts
            .get(&credentials.username)
            .filter(|a| a.password == credentials.password)
            .ok_or_else(|| ComposerError::unauthorized(INVALID_CREDENTIALS))?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.session_ttl)
            .ok_or_else(|| ComposerError::invalid_input("Session lifetime is out of range"))?;

        Ok(AuthSession {
            token: Uuid::new_v4().to_string(),
            user: account.user.clone(),
            created_at: now,
            expires_at,
        })
    }

    pub async fn logout(&self) -> ToolResult<()> {
        match self.session.write().await.take() {
            Some(session) => {
                tracing::info!(
                    target: "composer::tools::auth",
                    username = %session.user.username,
                    "User logged out"
                );
                ToolResult::done("Logged out successfully")
            }
            None => ToolResult::fail(NO_SESSION),
        }
    }

    pub async fn current_user(&self) -> ToolResult<User> {
        match self.live_session().await {
            Some(session) => ToolResult::ok(session.user),
            None => ToolResult::fail(NO_SESSION),
        }
    }

    /// Checks that `token` belongs to the live session.
    pub async fn validate_session(&self, token: &str) -> ToolResult<User> {
        match self.live_session().await {
            Some(session) if session.token == token => ToolResult::ok(session.user),
            _ => ToolResult::fail("Invalid or expired session"),
        }
    }

    pub async fn has_permission(&self, permission: Permission) -> ToolResult<bool> {
        match self.live_session().await {
            Some(session) => ToolResult::ok(session.user.role.allows(permission)),
            None => ToolResult::fail(NO_SESSION),
        }
    }
}

fn evict_expired(slot: &mut Option<AuthSession>) {
    if slot.as_ref().is_some_and(|s| s.is_expired(Utc::now())) {
        if let Some(expired) = slot.take() {
            tracing::info!(
                target: "composer::tools::auth",
                username = %expired.user.username,
                "Session expired, evicting"
            );
        }
    }
}

impl Default for AuthTool {
    fn default() -> Self {
        Self::new(&AuthSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let auth = AuthTool::default();
        let result = auth.authenticate(&Credentials::new("admin", "wrong")).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Invalid username or password"));
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let auth = AuthTool::default();
        let result = auth.authenticate(&Credentials::new("mallory", "admin123")).await;
        assert_eq!(result.error.as_deref(), Some("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let auth = AuthTool::default();
        let result = auth.authenticate(&Credentials::new("", "")).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("required"));
    }

    #[tokio::test]
    async fn test_second_authenticate_reuses_session() {
        let auth = AuthTool::default();
        let first = auth
            .authenticate(&Credentials::new("admin", "admin123"))
            .await
            .into_result()
            .unwrap();
        let second = auth
            .authenticate(&Credentials::new("admin", "admin123"))
            .await;

        assert!(second.success);
        assert_eq!(second.message.as_deref(), Some("Already authenticated"));
        let second = second.data.unwrap();
        assert_eq!(second.user, first.user);
        assert_eq!(second.token, first.token);
        assert_eq!(first.expires_at - first.created_at, chrono::Duration::minutes(30));
    }

    #[tokio::test]
    async fn test_live_session_skips_credential_check() {
        let auth = AuthTool::default();
        auth.authenticate(&Credentials::new("user", "user123")).await;
        let result = auth.authenticate(&Credentials::new("admin", "wrong")).await;
        assert!(result.success);
        assert_eq!(result.data.unwrap().user.username, "user");
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted() {
        let auth = AuthTool::with_session_ttl(chrono::Duration::zero());
        let first = auth
            .authenticate(&Credentials::new("admin", "admin123"))
            .await
            .into_result()
            .unwrap();

        let current = auth.current_user().await;
        assert!(!current.success);

        let again = auth.authenticate(&Credentials::new("admin", "wrong")).await;
        assert_eq!(again.error.as_deref(), Some("Invalid username or password"));

        let fresh = auth
            .authenticate(&Credentials::new("admin", "admin123"))
            .await
            .into_result()
            .unwrap();
        assert_ne!(fresh.token, first.token);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let auth = AuthTool::default();
        let session = auth
            .authenticate(&Credentials::new("user", "user123"))
            .await
            .into_result()
            .unwrap();
        assert!(auth.validate_session(&session.token).await.success);

        assert!(auth.logout().await.success);
        assert!(!auth.current_user().await.success);
        assert!(!auth.validate_session(&session.token).await.success);
        assert!(!auth.logout().await.success);
    }

    #[tokio::test]
    async fn test_permissions_follow_role() {
        let auth = AuthTool::default();
        assert!(!auth.has_permission(Permission::Read).await.success);

        auth.authenticate(&Credentials::new("user", "user123")).await;
        assert_eq!(auth.has_permission(Permission::Write).await.data, Some(true));
        assert_eq!(auth.has_permission(Permission::Delete).await.data, Some(false));

        auth.logout().await;
        auth.authenticate(&Credentials::new("admin", "admin123")).await;
        assert_eq!(auth.has_permission(Permission::Admin).await.data, Some(true));
    }

    #[tokio::test]
    async fn test_unusable_config_ttl_falls_back_to_default() {
        let auth = AuthTool::new(&AuthSettings {
            session_ttl_minutes: i64::MAX,
        });
        let session = auth
            .authenticate(&Credentials::new("admin", "admin123"))
            .await
            .into_result()
            .unwrap();
        assert_eq!(session.expires_at - session.created_at, chrono::Duration::minutes(30));
    }

    #[tokio::test]
    async fn test_overflowing_expiry_fails_without_session() {
        let ttl = chrono::Duration::try_minutes(100_000_000_000_000).unwrap();
        let auth = AuthTool::with_session_ttl(ttl);
        let result = auth.authenticate(&Credentials::new("admin", "admin123")).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("out of range"));
        assert!(!auth.current_user().await.success);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_share_one_session() {
        let auth = std::sync::Arc::new(AuthTool::default());
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let auth = std::sync::Arc::clone(&auth);
                let credentials = if i % 2 == 0 {
                    Credentials::new("admin", "admin123")
                } else {
                    Credentials::new("user", "user123")
                };
                tokio::spawn(async move { auth.authenticate(&credentials).await })
            })
            .collect();

        let mut tokens = Vec::new();
        let mut fresh = 0;
        for task in tasks {
            let result = task.await.unwrap();
            if result.message.as_deref() == Some("Authentication successful") {
                fresh += 1;
            }
            tokens.push(result.data.unwrap().token);
        }

        assert_eq!(fresh, 1);
        assert!(tokens.iter().all(|t| t == &tokens[0]));
    }
}
