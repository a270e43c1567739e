//! Session command - Inspect and update the stored login tokens

use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use std::path::Path;

use super::utils;
use stockup::api::Endpoints;
use stockup::auth::{
    AuthError, LoginForm, RefreshDecision, RefreshOutcome, Session, SessionStore, TokenPair,
};
use stockup::notify::Notification;

const PASSWORD_MASK: &str = "***";

/// Show whether a session is stored
pub fn show(store: &SessionStore) -> Result<String> {
    let session = store.load()?;
    let state = if session.is_authenticated() {
        format!("{}", "Signed in".green())
    } else {
        format!("{}", "Not signed in".yellow())
    };
    Ok(format!(
        "{}\nrefresh token: {}\nfile: {}",
        state,
        if session.refresh_token.is_some() { "yes" } else { "no" },
        store.path().display()
    ))
}

/// Validate login details and describe the login request
///
/// The password is masked in the printed body.
pub fn login(form: &LoginForm, endpoints: &Endpoints) -> Result<String> {
    form.validate()?;
    let shown = LoginForm {
        email: form.email.clone(),
        password: PASSWORD_MASK.to_string(),
    };
    Ok(format!(
        "POST {}\n{}",
        endpoints.login()?,
        serde_json::to_string_pretty(&shown)?
    ))
}

/// Store the tokens from a login or sign-up response body
pub fn save(store: &SessionStore, response: &Path) -> Result<String> {
    let tokens: TokenPair = utils::read_json(response)?;
    store.save(&Session::from_tokens(tokens))?;
    Ok(utils::render_notification(&Notification::success(
        "Logged in",
    )))
}

/// Print the `Authorization` header value
pub fn header(store: &SessionStore) -> Result<String> {
    match store.load()?.authorization_header() {
        Some(header) => Ok(header),
        None => bail!("Not signed in"),
    }
}

/// What the client does with a failed response of `status`
pub fn check(store: &SessionStore, status: u16, retried: bool) -> Result<String> {
    let decision = store.load()?.refresh_decision(status, retried);
    Ok(match decision {
        RefreshDecision::Refresh => "refresh, then retry once".to_string(),
        RefreshDecision::PassThrough => "pass the error through".to_string(),
    })
}

/// Record the result of a token refresh
///
/// A new access token is stored; a failed refresh signs the user out.
pub fn refreshed(store: &SessionStore, access_token: Option<String>) -> Result<String> {
    let mut session = store.load()?;
    let result = access_token.ok_or_else(|| AuthError::RefreshFailed("rejected".to_string()));

    match session.apply_refresh(result) {
        RefreshOutcome::Retry { authorization } => {
            store.save(&session)?;
            Ok(authorization)
        }
        RefreshOutcome::MustLogin => {
            store.clear()?;
            Ok(utils::render_notification(&Notification::info(
                "Session expired, please log in again",
            )))
        }
    }
}

/// Forget the stored tokens
pub fn clear(store: &SessionStore) -> Result<String> {
    let notification = if store.clear()? {
        Notification::success("Logged out")
    } else {
        Notification::info("No session stored")
    };
    Ok(utils::render_notification(&notification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    fn signed_in(dir: &TempDir) -> SessionStore {
        let response = dir.path().join("login.json");
        fs::write(&response, r#"{"accessToken": "a1", "refreshToken": "r1"}"#).unwrap();
        let store = store(dir);
        save(&store, &response).unwrap();
        store
    }

    #[test]
    fn test_save_then_header() {
        let dir = TempDir::new().unwrap();
        let store = signed_in(&dir);
        assert_eq!(header(&store).unwrap(), "Bearer a1");
        assert!(show(&store).unwrap().contains("refresh token: yes"));
    }

    #[test]
    fn test_header_without_session() {
        let dir = TempDir::new().unwrap();
        assert!(header(&store(&dir)).is_err());
        assert!(show(&store(&dir)).unwrap().contains("Not signed in"));
    }

    #[test]
    fn test_login_request() {
        let endpoints = Endpoints::new("http://localhost:8080/api").unwrap();
        let form = LoginForm {
            email: "ada@shop.ng".to_string(),
            password: "hunter2".to_string(),
        };
        let output = login(&form, &endpoints).unwrap();
        assert!(output.starts_with("POST http://localhost:8080/api/auth/login"));
        assert!(output.contains("ada@shop.ng"));
        assert!(!output.contains("hunter2"));
        assert!(output.contains(r#""password": "***""#));

        assert!(login(&LoginForm::default(), &endpoints).is_err());
    }

    #[test]
    fn test_check() {
        let dir = TempDir::new().unwrap();
        let store = signed_in(&dir);
        assert_eq!(check(&store, 401, false).unwrap(), "refresh, then retry once");
        assert_eq!(check(&store, 401, true).unwrap(), "pass the error through");
    }

    #[test]
    fn test_refreshed() {
        let dir = TempDir::new().unwrap();
        let store = signed_in(&dir);
        assert_eq!(
            refreshed(&store, Some("a2".to_string())).unwrap(),
            "Bearer a2"
        );
        assert_eq!(header(&store).unwrap(), "Bearer a2");

        refreshed(&store, None).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let store = signed_in(&dir);
        assert!(clear(&store).unwrap().contains("Logged out"));
        assert!(clear(&store).unwrap().contains("No session stored"));
    }
}
