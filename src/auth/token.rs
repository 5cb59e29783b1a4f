//! Defines the signed, time-limited token that binds a request to an account.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::AccountId};

/// How long an issued token remains valid.
const TOKEN_VALIDITY: Duration = Duration::hours(1);

/// The contents of a signed token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the account the token was issued for.
    pub account_id: AccountId,
    /// The expiry time of the token as a unix timestamp.
    pub exp: i64,
    /// The time the token was issued as a unix timestamp.
    pub iat: i64,
}

/// The process-wide signing configuration, created once at startup from the
/// secret and passed explicitly to the issuer and verifier.
#[derive(Clone)]
pub struct TokenConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl TokenConfig {
    /// Create a token configuration from a `secret` string with the default
    /// one hour validity window.
    pub fn new(secret: &str) -> Self {
        Self::with_validity(secret, TOKEN_VALIDITY)
    }

    /// Create a token configuration with a custom validity window.
    pub fn with_validity(secret: &str, validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validity,
        }
    }

    /// Issue a signed token for `account_id` that expires after the
    /// configured validity window.
    ///
    /// # Errors
    ///
    /// Returns [Error::TokenCreation] if the token could not be signed.
    pub fn issue(&self, account_id: AccountId) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            account_id,
            exp: (now + self.validity).unix_timestamp(),
            iat: now.unix_timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Error signing token: {}", e);
            Error::TokenCreation
        })
    }

    /// Verify the signature and expiry of `token` and return its claims.
    ///
    /// Verification uses zero leeway so that a token is rejected as soon as
    /// its expiry time passes.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidToken] if the token is malformed, was signed
    /// with a different secret, or has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| Error::InvalidToken)
    }
}
