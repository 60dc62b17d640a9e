//! Signing and verification of the bearer tokens used for authentication.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, user::UserID};

/// How long a newly issued token stays valid unless configured otherwise.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::days(7);

/// The claims carried by an auth token.
///
/// Only the user ID and the validity interval. Anything else about the user
/// is looked up in the database when needed, so tokens never go stale.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the authenticated user.
    pub sub: i64,
    /// When the token was issued, as a unix timestamp.
    pub iat: i64,
    /// When the token expires, as a unix timestamp.
    pub exp: i64,
}

/// The response body for endpoints that issue a token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub token: String,
}

/// Create a signed token for `user_id` that expires after `duration`.
///
/// # Errors
/// Returns [Error::TokenCreation] if signing fails.
pub fn sign_token(
    user_id: UserID,
    duration: Duration,
    encoding_key: &EncodingKey,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify a token's signature and expiry and extract the user ID.
///
/// # Errors
/// Returns [Error::InvalidToken] if the token is malformed, was signed with
/// a different key, or has expired.
pub fn verify_token(token: &str, decoding_key: &DecodingKey) -> Result<UserID, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|data| UserID::new(data.claims.sub))
        .map_err(|_| Error::InvalidToken)
}

#[cfg(test)]
mod token_tests {
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use time::Duration;

    use crate::{Error, user::UserID};

    use super::{DEFAULT_TOKEN_DURATION, sign_token, verify_token};

    fn test_keys() -> (EncodingKey, DecodingKey) {
        (
            EncodingKey::from_secret(b"foobar"),
            DecodingKey::from_secret(b"foobar"),
        )
    }

    #[test]
    fn round_trip_recovers_user_id() {
        let (encoding_key, decoding_key) = test_keys();
        let user_id = UserID::new(42);

        let token = sign_token(user_id, DEFAULT_TOKEN_DURATION, &encoding_key).unwrap();
        let recovered = verify_token(&token, &decoding_key).unwrap();

        assert_eq!(recovered, user_id);
    }

    #[test]
    fn verify_fails_with_wrong_key() {
        let (encoding_key, _) = test_keys();
        let other_decoding_key = DecodingKey::from_secret(b"not foobar");

        let token = sign_token(UserID::new(1), DEFAULT_TOKEN_DURATION, &encoding_key).unwrap();
        let result = verify_token(&token, &other_decoding_key);

        assert_eq!(result, Err(Error::InvalidToken));
    }

    #[test]
    fn verify_fails_on_expired_token() {
        let (encoding_key, decoding_key) = test_keys();

        // Expired well past the default validation leeway.
        let token = sign_token(UserID::new(1), Duration::minutes(-10), &encoding_key).unwrap();
        let result = verify_token(&token, &decoding_key);

        assert_eq!(result, Err(Error::InvalidToken));
    }

    #[test]
    fn verify_fails_on_garbage() {
        let (_, decoding_key) = test_keys();

        let result = verify_token("not-a-token", &decoding_key);

        assert_eq!(result, Err(Error::InvalidToken));
    }
}
