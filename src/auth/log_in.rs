//! The endpoint for exchanging credentials for an auth token.

use std::sync::{Arc, Mutex};

use axum::{Json, extract::{FromRef, State}};
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::token::{TokenResponse, sign_token},
    user::get_user_by_email,
};

/// The state needed to log a user in.
#[derive(Clone)]
pub struct LogInState {
    /// The key used to sign new auth tokens.
    pub jwt_encoding_key: EncodingKey,
    /// How long the issued token stays valid.
    pub token_duration: Duration,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            jwt_encoding_key: state.jwt_encoding_key.clone(),
            token_duration: state.token_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The credentials entered during log-in.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email entered during log-in.
    pub email: Option<String>,
    /// Password entered during log-in.
    pub password: Option<String>,
}

/// Handler for log-in requests.
///
/// Whether the email is unregistered or the password is wrong, the response
/// is the same 401 so the endpoint cannot be used to probe which emails have
/// accounts.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is missing.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn log_in(
    State(state): State<LogInState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, Error> {
    let (email, password) = match (credentials.email, credentials.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.trim().is_empty() => {
            (email.trim().to_owned(), password.trim().to_owned())
        }
        _ => {
            return Err(Error::Validation(
                "please provide email and password".to_owned(),
            ));
        }
    };

    let user = {
        let connection = state.db_connection.lock().unwrap();

        get_user_by_email(&email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            other => other,
        })?
    };

    let password_is_correct = user
        .password_hash
        .verify(&password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = sign_token(user.id, state.token_duration, &state.jwt_encoding_key)?;

    Ok(Json(TokenResponse { token }))
}
