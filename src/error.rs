//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or a field failed a constraint check.
    ///
    /// The message describes which field and why, and is safe to show to the
    /// client.
    #[error("{0}")]
    Validation(String),

    /// The requested resource was not found.
    ///
    /// Internally this also covers queries that return no rows, and reads
    /// that match a row owned by a different user. Per the source policy,
    /// list and aggregation endpoints that produce zero results report this
    /// error as well.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A uniqueness constraint would be violated.
    ///
    /// Currently unused by the endpoints but reserved so the status mapping
    /// does not need to change when one starts needing it.
    #[error("the request conflicts with existing data")]
    Conflict,

    /// The email or password did not match a registered user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bearer token was missing, malformed, or expired.
    #[error("invalid or expired auth token")]
    InvalidToken,

    /// A new auth token could not be signed.
    ///
    /// The error string should only be logged for debugging on the server,
    /// never sent to the client.
    #[error("could not create auth token: {0}")]
    TokenCreation(String),

    /// The user's email already exists in the database. The client should
    /// try again with a different email address.
    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// never sent to the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The one-time reset code could not be delivered.
    #[error("the reset code could not be sent")]
    CodeSendFailed,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code the transport layer should report for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::DuplicateEmail | Error::TooWeak(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Conflict => StatusCode::CONFLICT,
            Error::InvalidCredentials | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::CodeSendFailed
            | Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match self {
            // Internal errors are logged but replaced with a generic message
            // so details about the server never reach the client.
            Error::HashingError(_) | Error::TokenCreation(_) | Error::SqlError(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                "an internal error occurred".to_owned()
            }
            error => error.to_string(),
        };

        (status_code, Json(json!({ "message": message }))).into_response()
    }
}
