//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, password::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to
/// better compile time errors, and more flexible generics that can have
/// distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's given name.
    pub first_name: String,
    /// The user's family name.
    pub last_name: String,
    /// The email address the user registered and logs in with. Unique.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The one-time code for resetting the password, if one was requested.
    pub reset_code: Option<String>,
    /// When the reset code stops being valid.
    pub reset_code_expires_at: Option<OffsetDateTime>,
    /// Whether the user has proven they received the reset code.
    pub reset_code_verified: bool,
    /// When the user registered.
    pub created_at: OffsetDateTime,
}

/// The details needed to register a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's given name.
    pub first_name: String,
    /// The user's family name.
    pub last_name: String,
    /// The email address to register. Must not already be registered.
    pub email: String,
    /// The hash of the user's chosen password.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                reset_code TEXT,
                reset_code_expires_at TEXT,
                reset_code_verified INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email is already registered, or
/// [Error::SqlError] if another SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO user (first_name, last_name, email, password, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &new_user.first_name,
            &new_user.last_name,
            &new_user.email,
            new_user.password_hash.as_ref(),
            created_at,
        ),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        email: new_user.email,
        password_hash: new_user.password_hash,
        reset_code: None,
        reset_code_expires_at: None,
        reset_code_verified: false,
        created_at,
    })
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password, reset_code, \
    reset_code_expires_at, reset_code_verified, created_at";

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user is registered with `email`, or
/// [Error::SqlError] if another SQL related error occurred.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = :email"))?
        .query_row(&[(":email", &email)], map_user_row)
        .map_err(|error| error.into())
}

/// Store a one-time password reset code for the user.
///
/// Overwrites any previous code and resets the verified flag.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not match a registered user.
pub fn set_reset_code(
    user_id: UserID,
    code: &str,
    expires_at: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_updated = connection.execute(
        "UPDATE user SET reset_code = ?1, reset_code_expires_at = ?2, reset_code_verified = 0
         WHERE id = ?3",
        (code, expires_at, user_id.as_i64()),
    )?;

    if rows_updated == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Remove the user's reset code and verified flag.
///
/// # Errors
///
/// Returns [Error::SqlError] if an SQL related error occurred.
pub fn clear_reset_code(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE user SET reset_code = NULL, reset_code_expires_at = NULL,
         reset_code_verified = 0 WHERE id = ?1",
        (user_id.as_i64(),),
    )?;

    Ok(())
}

/// Record that the user has proven they received the reset code.
///
/// # Errors
///
/// Returns [Error::SqlError] if an SQL related error occurred.
pub fn mark_reset_code_verified(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE user SET reset_code_verified = 1 WHERE id = ?1",
        (user_id.as_i64(),),
    )?;

    Ok(())
}

/// Replace the user's password hash and clear any reset code.
///
/// # Errors
///
/// Returns [Error::SqlError] if an SQL related error occurred.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE user SET password = ?1, reset_code = NULL, reset_code_expires_at = NULL,
         reset_code_verified = 0 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(4)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        reset_code: row.get(5)?,
        reset_code_expires_at: row.get(6)?,
        reset_code_verified: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{Error, password::PasswordHash};

    use super::{
        NewUser, UserID, clear_reset_code, create_user, create_user_table, get_user_by_email,
        get_user_by_id, mark_reset_code_verified, set_reset_code, update_password,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    fn test_user() -> NewUser {
        NewUser {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        }
    }

    #[test]
    fn insert_user_succeeds() {
        let conn = get_db_connection();

        let inserted_user = create_user(test_user(), &conn).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email, "ada@example.com");
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let conn = get_db_connection();
        create_user(test_user(), &conn).unwrap();

        let result = create_user(test_user(), &conn);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let conn = get_db_connection();

        let result = get_user_by_id(UserID::new(42), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_user_by_email_finds_registered_user() {
        let conn = get_db_connection();
        let inserted_user = create_user(test_user(), &conn).unwrap();

        let retrieved_user = get_user_by_email("ada@example.com", &conn).unwrap();

        assert_eq!(retrieved_user, inserted_user);
    }

    #[test]
    fn get_user_by_email_fails_for_unknown_email() {
        let conn = get_db_connection();

        let result = get_user_by_email("nobody@example.com", &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn reset_code_round_trip() {
        let conn = get_db_connection();
        let user = create_user(test_user(), &conn).unwrap();
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(10);

        set_reset_code(user.id, "1234", expires_at, &conn).unwrap();
        let with_code = get_user_by_id(user.id, &conn).unwrap();
        assert_eq!(with_code.reset_code.as_deref(), Some("1234"));
        assert!(!with_code.reset_code_verified);

        mark_reset_code_verified(user.id, &conn).unwrap();
        let verified = get_user_by_id(user.id, &conn).unwrap();
        assert!(verified.reset_code_verified);

        clear_reset_code(user.id, &conn).unwrap();
        let cleared = get_user_by_id(user.id, &conn).unwrap();
        assert_eq!(cleared.reset_code, None);
        assert!(!cleared.reset_code_verified);
    }

    #[test]
    fn set_reset_code_fails_for_unknown_user() {
        let conn = get_db_connection();
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(10);

        let result = set_reset_code(UserID::new(42), "1234", expires_at, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_password_replaces_hash_and_clears_code() {
        let conn = get_db_connection();
        let user = create_user(test_user(), &conn).unwrap();
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(10);
        set_reset_code(user.id, "1234", expires_at, &conn).unwrap();

        let new_hash = PasswordHash::new_unchecked("correcthorsebatterystaple");
        update_password(user.id, &new_hash, &conn).unwrap();

        let updated = get_user_by_id(user.id, &conn).unwrap();
        assert_eq!(updated.password_hash, new_hash);
        assert_eq!(updated.reset_code, None);
    }
}
