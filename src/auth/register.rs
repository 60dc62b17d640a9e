//! The endpoint for registering a new user.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use email_address::EmailAddress;
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::token::{TokenResponse, sign_token},
    password::PasswordHash,
    user::{NewUser, create_user},
};

/// The state needed for creating a new user.
#[derive(Clone)]
pub struct RegistrationState {
    /// The key used to sign new auth tokens.
    pub jwt_encoding_key: EncodingKey,
    /// How long the issued token stays valid.
    pub token_duration: Duration,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            jwt_encoding_key: state.jwt_encoding_key.clone(),
            token_duration: state.token_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The details a new user registers with.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// The user's given name.
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    /// The user's family name.
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    /// The email address to register.
    pub email: Option<String>,
    /// The user's chosen password.
    pub password: Option<String>,
}

const MIN_NAME_LENGTH: usize = 2;

/// Handler for registering a new user.
///
/// On success the new user is logged in immediately: the response carries an
/// auth token like the log-in endpoint.
///
/// # Errors
///
/// This function will return an error if:
/// - any field is missing or blank,
/// - a name is shorter than two characters,
/// - the email is not a valid email address or is already registered,
/// - the password is too weak.
pub async fn register(
    State(state): State<RegistrationState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), Error> {
    let (first_name, last_name, email, password) = match (
        request.first_name,
        request.last_name,
        request.email,
        request.password,
    ) {
        (Some(first_name), Some(last_name), Some(email), Some(password)) => (
            first_name.trim().to_owned(),
            last_name.trim().to_owned(),
            email.trim().to_owned(),
            password.trim().to_owned(),
        ),
        _ => return Err(Error::Validation("please provide all fields".to_owned())),
    };

    if first_name.is_empty() || last_name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(Error::Validation("please provide all fields".to_owned()));
    }

    if first_name.chars().count() < MIN_NAME_LENGTH || last_name.chars().count() < MIN_NAME_LENGTH {
        return Err(Error::Validation(
            "first name and last name must be at least 2 characters long".to_owned(),
        ));
    }

    if EmailAddress::from_str(&email).is_err() {
        return Err(Error::Validation(
            "please provide a valid email".to_owned(),
        ));
    }

    let password_hash = PasswordHash::from_raw_password(&password, PasswordHash::DEFAULT_COST)?;

    let user = {
        let connection = state.db_connection.lock().unwrap();

        create_user(
            NewUser {
                first_name,
                last_name,
                email,
                password_hash,
            },
            &connection,
        )?
    };

    let token = sign_token(user.id, state.token_duration, &state.jwt_encoding_key)?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
