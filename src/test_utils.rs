//! Shared helpers for endpoint tests.
#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState,
    auth::sign_token,
    build_router,
    password::PasswordHash,
    user::{NewUser, UserID, create_user},
};

/// A running test server with one registered, logged-in user.
pub(crate) struct TestContext {
    pub state: AppState,
    pub server: TestServer,
    pub token: String,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "test-secret").expect("Could not create state.");

        let user_id = insert_test_user(&state, "test@example.com");
        let token = sign_token(user_id, state.token_duration, &state.jwt_encoding_key)
            .expect("Could not sign token.");

        let server =
            TestServer::new(build_router(state.clone()));

        Self {
            state,
            server,
            token,
        }
    }

    /// Register a second user and return a token for them.
    pub(crate) fn token_for_other_user(&self) -> String {
        let user_id = insert_test_user(&self.state, "other@example.com");

        sign_token(user_id, self.state.token_duration, &self.state.jwt_encoding_key)
            .expect("Could not sign token.")
    }
}

pub(crate) fn insert_test_user(state: &AppState, email: &str) -> UserID {
    create_user(
        NewUser {
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            email: email.to_owned(),
            // Low cost keeps the test suite fast.
            password_hash: PasswordHash::new_unchecked("not a real hash"),
        },
        &state.db_connection.lock().unwrap(),
    )
    .expect("Could not create test user.")
    .id
}
