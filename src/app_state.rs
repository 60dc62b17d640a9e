//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;
use time::Duration;

use crate::{
    Error,
    auth::{CodeSender, DEFAULT_TOKEN_DURATION, TracingCodeSender},
    db::initialize,
};

/// What read endpoints should do when a query or aggregation produces zero
/// results.
///
/// The API has always reported an empty result as a 404. Every read handler
/// consults this one value, none hard-code the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyResultPolicy {
    /// Report zero results as [Error::NotFound].
    #[default]
    NotFound,
    /// Return the empty list or summary as a success.
    Allow,
}

impl EmptyResultPolicy {
    /// Apply the policy to a result set of `len` items.
    ///
    /// # Errors
    /// Returns [Error::NotFound] when the policy is [EmptyResultPolicy::NotFound]
    /// and `len` is zero.
    pub fn require_non_empty(self, len: usize) -> Result<(), Error> {
        match self {
            EmptyResultPolicy::NotFound if len == 0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key used to sign new auth tokens.
    pub jwt_encoding_key: EncodingKey,

    /// The key used to verify auth tokens on protected routes.
    pub jwt_decoding_key: DecodingKey,

    /// How long a newly issued auth token stays valid.
    pub token_duration: Duration,

    /// How read endpoints treat zero-result queries.
    pub empty_result_policy: EmptyResultPolicy,

    /// Delivers one-time password reset codes.
    pub code_sender: Arc<dyn CodeSender>,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. `jwt_secret` is the HS256 secret used for signing
    /// and verifying auth tokens.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, jwt_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            jwt_encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            jwt_decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_duration: DEFAULT_TOKEN_DURATION,
            empty_result_policy: EmptyResultPolicy::default(),
            code_sender: Arc::new(TracingCodeSender),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Replace the reset code sender, e.g. with a real email backend.
    pub fn with_code_sender(mut self, code_sender: Arc<dyn CodeSender>) -> Self {
        self.code_sender = code_sender;
        self
    }

    /// Override the zero-results policy.
    pub fn with_empty_result_policy(mut self, policy: EmptyResultPolicy) -> Self {
        self.empty_result_policy = policy;
        self
    }
}
