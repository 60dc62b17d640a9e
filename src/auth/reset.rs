//! The password reset flow: send a one-time code, verify it, set a new
//! password.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rand::Rng;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    password::PasswordHash,
    user::{
        User, clear_reset_code, get_user_by_email, mark_reset_code_verified, set_reset_code,
        update_password,
    },
};

/// How long a reset code stays valid after being sent.
const RESET_CODE_DURATION: Duration = Duration::minutes(10);

/// Delivers a one-time reset code to a user.
///
/// Delivery is fire-and-forget: implementations report success or failure
/// for the hand-off and nothing more.
pub trait CodeSender: Send + Sync {
    /// Send `code` to `email`.
    ///
    /// # Errors
    /// Returns an error if the code could not be handed off for delivery.
    fn send_code(&self, email: &str, code: &str) -> Result<(), Error>;
}

/// A [CodeSender] that writes the code to the server log.
///
/// Stands in for a real delivery backend during development and testing.
pub struct TracingCodeSender;

impl CodeSender for TracingCodeSender {
    fn send_code(&self, email: &str, code: &str) -> Result<(), Error> {
        tracing::info!("password reset code for {email}: {code}");
        Ok(())
    }
}

/// The state needed for the password reset endpoints.
#[derive(Clone)]
pub struct ResetState {
    /// Delivers the one-time codes.
    pub code_sender: Arc<dyn CodeSender>,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ResetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            code_sender: state.code_sender.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

fn required(field: Option<String>, message: &str) -> Result<String, Error> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_owned()),
        _ => Err(Error::Validation(message.to_owned())),
    }
}

fn find_user(email: &str, connection: &Connection) -> Result<User, Error> {
    get_user_by_email(email, connection)
}

/// The request body for sending a reset code.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    /// The email of the account to reset.
    pub email: Option<String>,
}

/// Handler that generates a reset code and hands it to the [CodeSender].
///
/// If delivery fails, the stored code is cleared again so a stale code can
/// never be verified later.
///
/// # Errors
/// Returns [Error::NotFound] for an unregistered email and
/// [Error::CodeSendFailed] when the sender reports a failure.
pub async fn send_reset_code(
    State(state): State<ResetState>,
    Json(request): Json<SendCodeRequest>,
) -> Result<Json<Value>, Error> {
    let email = required(request.email, "please provide an email")?;

    let code = rand::rng().random_range(1000..=9999).to_string();
    let expires_at = OffsetDateTime::now_utc() + RESET_CODE_DURATION;

    let user = {
        let connection = state.db_connection.lock().unwrap();
        let user = find_user(&email, &connection)?;
        set_reset_code(user.id, &code, expires_at, &connection)?;
        user
    };

    if let Err(error) = state.code_sender.send_code(&email, &code) {
        tracing::error!("could not send reset code: {error}");
        let connection = state.db_connection.lock().unwrap();
        clear_reset_code(user.id, &connection)?;
        return Err(Error::CodeSendFailed);
    }

    Ok(Json(json!({ "message": "code sent" })))
}

/// The request body for verifying a reset code.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    /// The email of the account being reset.
    pub email: Option<String>,
    /// The code the user received.
    pub code: Option<String>,
}

/// Handler that checks a reset code and marks it verified.
///
/// # Errors
/// Returns [Error::Validation] when the code does not match or has expired,
/// and [Error::NotFound] for an unregistered email.
pub async fn verify_reset_code(
    State(state): State<ResetState>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<Json<Value>, Error> {
    let email = required(request.email, "please provide email and code")?;
    let code = required(request.code, "please provide email and code")?;

    let connection = state.db_connection.lock().unwrap();
    let user = find_user(&email, &connection)?;

    if user.reset_code.as_deref() != Some(code.as_str()) {
        return Err(Error::Validation("invalid code".to_owned()));
    }

    let expired = user
        .reset_code_expires_at
        .is_none_or(|expires_at| expires_at < OffsetDateTime::now_utc());
    if expired {
        clear_reset_code(user.id, &connection)?;
        return Err(Error::Validation("code has expired".to_owned()));
    }

    mark_reset_code_verified(user.id, &connection)?;

    Ok(Json(json!({ "message": "code verified" })))
}

/// The request body for setting a new password.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// The email of the account being reset.
    pub email: Option<String>,
    /// The replacement password.
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// Handler that replaces the password after the code has been verified.
///
/// # Errors
/// Returns [Error::Validation] when the code was never verified,
/// [Error::TooWeak] for a weak password, and [Error::NotFound] for an
/// unregistered email.
pub async fn reset_password(
    State(state): State<ResetState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, Error> {
    let email = required(request.email, "please provide email and new password")?;
    let new_password = required(request.new_password, "please provide email and new password")?;

    let password_hash = PasswordHash::from_raw_password(&new_password, PasswordHash::DEFAULT_COST)?;

    let connection = state.db_connection.lock().unwrap();
    let user = find_user(&email, &connection)?;

    if !user.reset_code_verified {
        return Err(Error::Validation(
            "please verify your code first".to_owned(),
        ));
    }

    update_password(user.id, &password_hash, &connection)?;

    Ok(Json(json!({ "message": "password reset" })))
}
