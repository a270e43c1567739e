//! Login, sign-up, and the bearer-token session
//!
//! Tokens are kept in a small JSON file under the data directory. The refresh
//! rules mirror what the HTTP layer is expected to do: one refresh attempt per
//! request, only after a 401, and only when a refresh token is on hand.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config;
use crate::text;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
}

fn require(value: &str, field: &'static str) -> Result<(), AuthError> {
    if text::is_blank(Some(value)) {
        return Err(AuthError::MissingField { field });
    }
    Ok(())
}

/// Loose shape check: something before and after a single `@`
fn check_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        require(&self.email, "email")?;
        check_email(&self.email)?;
        require(&self.password, "password")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Optional
    pub mobile_number: String,
    pub store_name: String,
    /// Optional
    pub store_address: String,
}

impl SignUpForm {
    /// Reports the first missing required field, in form order
    pub fn validate(&self) -> Result<(), AuthError> {
        require(&self.first_name, "first name")?;
        require(&self.last_name, "last name")?;
        require(&self.email, "email")?;
        check_email(&self.email)?;
        require(&self.password, "password")?;
        require(&self.store_name, "store name")
    }
}

/// Body of a successful login, sign-up, or refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// What to do with a failed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// Ask for a new access token, then replay the request
    Refresh,
    /// Hand the failure back to the caller
    PassThrough,
}

/// What happened after a refresh attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Replay the original request with this header
    Retry { authorization: String },
    /// Tokens were dropped; the user has to log in again
    MustLogin,
}

/// Tokens of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn from_tokens(tokens: TokenPair) -> Self {
        Self {
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// `Bearer <access token>`, when there is one
    pub fn authorization_header(&self) -> Option<String> {
        self.access_token
            .as_ref()
            .map(|token| format!("Bearer {}", token))
    }

    pub fn refresh_decision(&self, status: u16, already_retried: bool) -> RefreshDecision {
        if status == 401 && !already_retried && self.refresh_token.is_some() {
            RefreshDecision::Refresh
        } else {
            RefreshDecision::PassThrough
        }
    }

    /// Store a refreshed access token, or drop both tokens on failure
    pub fn apply_refresh(&mut self, result: Result<String, AuthError>) -> RefreshOutcome {
        match result {
            Ok(access_token) => {
                debug!("access token refreshed");
                let authorization = format!("Bearer {}", access_token);
                self.access_token = Some(access_token);
                RefreshOutcome::Retry { authorization }
            }
            Err(e) => {
                info!(error = %e, "refresh failed, signing out");
                self.clear();
                RefreshOutcome::MustLogin
            }
        }
    }

    pub fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }
}

/// Session persisted as JSON
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store under the standard data directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(config::session_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty session
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session: {}", self.path.display()))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write: {}", self.path.display()))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the file; returns whether one existed
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove: {}", self.path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
        }
    }

    #[test]
    fn test_login_validation() {
        let mut form = LoginForm::default();
        assert_eq!(
            form.validate(),
            Err(AuthError::MissingField { field: "email" })
        );

        form.email = "johndoe".to_string();
        assert!(matches!(form.validate(), Err(AuthError::InvalidEmail(_))));

        form.email = "johndoe@gmail.com".to_string();
        assert_eq!(
            form.validate(),
            Err(AuthError::MissingField { field: "password" })
        );

        form.password = "secret".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_signup_optional_fields() {
        let form = SignUpForm {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            email: "ada@shop.ng".to_string(),
            password: "pw".to_string(),
            store_name: "Ada Stores".to_string(),
            ..SignUpForm::default()
        };
        assert!(form.validate().is_ok());

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["storeAddress"], "");
    }

    #[test]
    fn test_signup_reports_first_missing() {
        let form = SignUpForm {
            first_name: "Ada".to_string(),
            ..SignUpForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "last name is required"
        );
    }

    #[test]
    fn test_token_pair_from_response() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"accessToken": "a", "refreshToken": "r"}"#).unwrap();
        let session = Session::from_tokens(pair);
        assert!(session.is_authenticated());
        assert_eq!(session.authorization_header().as_deref(), Some("Bearer a"));
    }

    #[test]
    fn test_refresh_only_once_on_401() {
        let session = Session::from_tokens(tokens());
        assert_eq!(session.refresh_decision(401, false), RefreshDecision::Refresh);
        assert_eq!(
            session.refresh_decision(401, true),
            RefreshDecision::PassThrough
        );
        assert_eq!(
            session.refresh_decision(403, false),
            RefreshDecision::PassThrough
        );

        let anonymous = Session::default();
        assert_eq!(
            anonymous.refresh_decision(401, false),
            RefreshDecision::PassThrough
        );
    }

    #[test]
    fn test_apply_refresh() {
        let mut session = Session::from_tokens(tokens());
        let outcome = session.apply_refresh(Ok("access-2".to_string()));
        assert_eq!(
            outcome,
            RefreshOutcome::Retry {
                authorization: "Bearer access-2".to_string()
            }
        );
        assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));

        let outcome = session.apply_refresh(Err(AuthError::RefreshFailed("expired".into())));
        assert_eq!(outcome, RefreshOutcome::MustLogin);
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_session_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), Session::default());
        assert!(!store.clear().unwrap());

        let session = Session::from_tokens(tokens());
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), session);

        assert!(store.clear().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_session_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(SessionStore::new(&path).load().is_err());
    }
}
