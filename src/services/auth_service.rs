use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::config_service::{get_app_data_dir, server_url};

// ============================================================================
// AUTH DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthState {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Response from the backend's /auth/login and /auth/register endpoints.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    preferred_language: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

// ============================================================================
// AUTH STATE PERSISTENCE
// ============================================================================

fn get_auth_path() -> Result<std::path::PathBuf, String> {
    Ok(get_app_data_dir()?.join("auth.json"))
}

pub fn load_auth_state() -> Result<AuthState, String> {
    load_auth_state_from(&get_auth_path()?)
}

fn load_auth_state_from(auth_path: &Path) -> Result<AuthState, String> {
    if !auth_path.exists() {
        return Ok(AuthState::default());
    }

    let content = fs::read_to_string(auth_path)
        .map_err(|e| format!("Failed to read auth state: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse auth state: {}", e))
}

fn save_auth_state_to(state: &AuthState, auth_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(state)
        .map_err(|e| format!("Failed to serialize auth state: {}", e))?;
    fs::write(auth_path, content).map_err(|e| format!("Failed to write auth state: {}", e))?;
    Ok(())
}

pub fn save_auth_state(state: &AuthState) -> Result<(), String> {
    save_auth_state_to(state, &get_auth_path()?)
}

fn clear_auth_state_at(auth_path: &Path) -> Result<(), String> {
    if auth_path.exists() {
        fs::remove_file(auth_path).map_err(|e| format!("Failed to remove auth state: {}", e))?;
    }
    Ok(())
}

pub fn clear_auth_state() -> Result<(), String> {
    clear_auth_state_at(&get_auth_path()?)
}

/// The stored bearer token, if any. The gateway attaches this to every chat
/// request; nothing else reads it.
pub fn access_token() -> Result<Option<String>, String> {
    Ok(load_auth_state()?.access_token)
}

// ============================================================================
// PASSWORD RULES
// ============================================================================

pub const WEAK_PASSWORD_MESSAGE: &str =
    "Password must be at least 8 characters and contain letters and digits";

/// Client-side mirror of the backend's password rule: length, at least one
/// letter, at least one digit.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

// ============================================================================
// LOGIN / REGISTER
// ============================================================================

fn map_auth_failure(status: u16, detail: String, fallback: &str) -> String {
    match status {
        401 => "Invalid username or password".to_string(),
        409 => "User already exists. Log in instead.".to_string(),
        _ if !detail.is_empty() => detail,
        _ => format!("{} ({})", fallback, status),
    }
}

async fn post_credentials<B: Serialize>(path: &str, body: &B, fallback: &str) -> Result<AuthState, String> {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}{}", server_url(), path))
        .json(body)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.detail)
            .unwrap_or_default();
        return Err(map_auth_failure(status, detail, fallback));
    }

    let tokens: TokenResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse auth response: {}", e))?;

    Ok(AuthState {
        access_token: Some(tokens.access_token),
        refresh_token: Some(tokens.refresh_token),
        username: None,
    })
}

/// Sign in and persist the returned token pair.
pub async fn login(username: &str, password: &str) -> Result<AuthState, String> {
    let mut state = post_credentials(
        "/auth/login",
        &LoginRequest { username, password },
        "Login failed",
    )
    .await?;
    state.username = Some(username.to_string());
    save_auth_state(&state)?;
    Ok(state)
}

/// Create an account and persist the returned token pair.
pub async fn register(
    username: &str,
    password: &str,
    preferred_language: &str,
) -> Result<AuthState, String> {
    let mut state = post_credentials(
        "/auth/register",
        &RegisterRequest {
            username,
            password,
            preferred_language,
        },
        "Registration failed",
    )
    .await?;
    state.username = Some(username.to_string());
    save_auth_state(&state)?;
    Ok(state)
}

/// Sign out - clear the stored credentials.
pub fn sign_out() -> Result<(), String> {
    clear_auth_state()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_rule_requires_length_letters_and_digits() {
        assert!(is_strong_password("passw0rd"));
        assert!(is_strong_password("a1b2c3d4e5"));
        assert!(!is_strong_password("short1"));
        assert!(!is_strong_password("lettersonly"));
        assert!(!is_strong_password("12345678"));
        assert!(!is_strong_password(""));
    }

    #[test]
    fn auth_failure_maps_known_statuses() {
        assert_eq!(
            map_auth_failure(401, "Invalid credentials".to_string(), "Login failed"),
            "Invalid username or password"
        );
        assert_eq!(
            map_auth_failure(409, "Username already exists".to_string(), "Registration failed"),
            "User already exists. Log in instead."
        );
        assert_eq!(
            map_auth_failure(400, "Password too weak".to_string(), "Registration failed"),
            "Password too weak"
        );
        assert_eq!(
            map_auth_failure(502, String::new(), "Login failed"),
            "Login failed (502)"
        );
    }

    #[test]
    fn auth_state_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        assert_eq!(load_auth_state_from(&path).unwrap(), AuthState::default());

        let state = AuthState {
            access_token: Some("at".to_string()),
            refresh_token: Some("rt".to_string()),
            username: Some("dev".to_string()),
        };
        save_auth_state_to(&state, &path).unwrap();
        assert_eq!(load_auth_state_from(&path).unwrap(), state);

        clear_auth_state_at(&path).unwrap();
        assert_eq!(load_auth_state_from(&path).unwrap(), AuthState::default());
        // Clearing twice is fine.
        clear_auth_state_at(&path).unwrap();
    }
}
