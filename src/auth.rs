use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tracing::info;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum AuthError {
  #[error("invalid credentials")]
  InvalidCredentials,
  #[error("email already in use")]
  EmailInUse,
  #[error("{0}")]
  Validation(String),
  #[error("identity provider error: {0}")]
  Provider(String),
  #[error(transparent)]
  Transport(#[from] reqwest::Error),
}

impl AuthError {
  pub fn user_message(&self) -> String {
    match self {
      Self::InvalidCredentials => "Invalid credentials".to_string(),
      Self::EmailInUse => "Email already in use".to_string(),
      Self::Validation(message) => message.clone(),
      Self::Provider(_) | Self::Transport(_) => "Something went wrong. Please try again.".to_string(),
    }
  }
}

/// Account identity returned by the provider on sign-in/sign-up.
#[derive(Debug, Clone)]
pub struct AuthUser {
  pub user_id: String,
  pub email: String,
  pub id_token: String,
}

#[derive(Debug, Clone)]
pub struct Registration {
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub password: String,
  pub phone_number: String,
}

/// Thin client for the hosted identity provider's REST endpoints. The
/// provider reports failures as coded message strings inside a JSON error
/// envelope, which get pattern-matched into the error taxonomy here.
#[derive(Debug, Clone)]
pub struct AuthClient {
  client: Client,
  base_url: String,
  api_key: String,
}

impl AuthClient {
  pub fn new(base_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      api_key: api_key.to_string(),
    })
  }

  #[instrument(skip(self, password))]
  pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
    let payload = self
      .post(
        "signInWithPassword",
        json!({ "email": email, "password": password, "returnSecureToken": true }),
      )
      .await?;
    let user = parse_auth_user(&payload)?;
    info!(user_id = %user.user_id, "signed in");
    Ok(user)
  }

  #[instrument(skip(self, password))]
  pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
    let payload = self
      .post(
        "signUp",
        json!({ "email": email, "password": password, "returnSecureToken": true }),
      )
      .await?;
    let user = parse_auth_user(&payload)?;
    info!(user_id = %user.user_id, "registered account");
    Ok(user)
  }

  #[instrument(skip(self))]
  pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
    self
      .post("sendOobCode", json!({ "requestType": "PASSWORD_RESET", "email": email }))
      .await?;
    Ok(())
  }

  async fn post(&self, action: &str, body: Value) -> Result<Value, AuthError> {
    let url = format!("{}/v1/accounts:{}?key={}", self.base_url, action, self.api_key);
    let response = self.client.post(url).json(&body).send().await?;
    let status = response.status();
    let payload: Value = response.json().await?;
    if !status.is_success() {
      return Err(map_provider_error(&payload));
    }
    Ok(payload)
  }
}

fn map_provider_error(payload: &Value) -> AuthError {
  let message = payload["error"]["message"].as_str().unwrap_or("unknown provider error");
  if message.contains("INVALID_LOGIN_CREDENTIALS")
    || message.contains("INVALID_PASSWORD")
    || message.contains("EMAIL_NOT_FOUND")
  {
    AuthError::InvalidCredentials
  } else if message.contains("EMAIL_EXISTS") {
    AuthError::EmailInUse
  } else {
    AuthError::Provider(message.to_string())
  }
}

fn parse_auth_user(payload: &Value) -> Result<AuthUser, AuthError> {
  let user_id = payload["localId"]
    .as_str()
    .ok_or_else(|| AuthError::Provider("response missing localId".to_string()))?;
  let id_token = payload["idToken"]
    .as_str()
    .ok_or_else(|| AuthError::Provider("response missing idToken".to_string()))?;
  let email = payload["email"].as_str().unwrap_or_default();
  Ok(AuthUser {
    user_id: user_id.to_string(),
    email: email.to_string(),
    id_token: id_token.to_string(),
  })
}

/// Sign-up form validation: the first violation wins.
pub fn validate_registration(registration: &Registration) -> Result<(), AuthError> {
  if registration.first_name.trim().is_empty() {
    return Err(AuthError::Validation("First name must not be empty".to_string()));
  }
  if registration.last_name.trim().is_empty() {
    return Err(AuthError::Validation("Last name must not be empty".to_string()));
  }
  if !registration.email.contains('@') {
    return Err(AuthError::Validation("Enter a valid email address".to_string()));
  }
  if registration.password.chars().count() < 6 {
    return Err(AuthError::Validation(
      "Password must be at least 6 characters".to_string(),
    ));
  }
  let phone = registration.phone_number.trim();
  if phone.len() != 8 || !phone.chars().all(|c| c.is_ascii_digit()) {
    return Err(AuthError::Validation("Enter a valid phone number".to_string()));
  }
  Ok(())
}
