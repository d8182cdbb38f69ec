use serde::{Deserialize, Serialize};
use tauri::State;

use super::chat::Controller;
use crate::services::auth_service;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub username: Option<String>,
}

impl From<auth_service::AuthState> for AuthStatus {
    fn from(state: auth_service::AuthState) -> Self {
        Self {
            is_authenticated: state.access_token.is_some(),
            username: state.username,
        }
    }
}

/// Sign in against the backend and persist the token pair.
#[tauri::command]
pub async fn login(username: String, password: String) -> Result<AuthStatus, String> {
    if username.is_empty() || password.is_empty() {
        return Err("Enter a username and password".to_string());
    }

    let state = auth_service::login(&username, &password).await?;
    Ok(state.into())
}

/// Create an account. The password rule is checked client-side first so the
/// user gets immediate feedback; the backend enforces it too.
#[tauri::command]
pub async fn register(
    username: String,
    password: String,
    preferred_language: String,
) -> Result<AuthStatus, String> {
    if username.is_empty() || password.is_empty() {
        return Err("Fill in all fields".to_string());
    }
    if !auth_service::is_strong_password(&password) {
        return Err(auth_service::WEAK_PASSWORD_MESSAGE.to_string());
    }

    let state = auth_service::register(&username, &password, &preferred_language).await?;
    Ok(state.into())
}

/// Check if user is currently authenticated.
#[tauri::command]
pub fn check_auth_status() -> Result<AuthStatus, String> {
    Ok(auth_service::load_auth_state()?.into())
}

/// Sign out: drop stored credentials and tear the session down.
#[tauri::command]
pub fn logout(controller: State<'_, Controller>) -> Result<(), String> {
    auth_service::sign_out()?;
    controller.teardown();
    Ok(())
}
