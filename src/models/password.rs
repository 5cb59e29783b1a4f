//! This file defines types that handle password validation and hashing.
//! `ValidatedPassword` wraps a string and ensures it meets the configured length policy.
//! `PasswordHash` converts a `ValidatedPassword` into a salted and hashed password.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The rules applied to new passwords, supplied through server configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PasswordPolicy {
    /// The minimum number of characters a new password must have.
    pub min_length: usize,

    /// The bcrypt cost used when hashing new passwords.
    ///
    /// Higher costs slow down brute-force attempts but also slow down
    /// registration and login.
    pub hash_cost: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// A password that has been validated against a [PasswordPolicy], but not yet hashed.
///
/// This struct can be used to construct a [PasswordHash].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// # Errors
    ///
    /// Returns [Error::PasswordTooShort] if the password has fewer characters
    /// than `policy.min_length`.
    pub fn new(raw_password_string: &str, policy: &PasswordPolicy) -> Result<Self, Error> {
        if raw_password_string.chars().count() < policy.min_length {
            return Err(Error::PasswordTooShort(policy.min_length));
        }

        Ok(Self(raw_password_string.to_string()))
    }

    /// Create a new `ValidatedPassword` without any validation.
    ///
    /// The caller should ensure that `raw_password_string` meets the active password policy.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid password is provided it may cause incorrect behaviour but will not affect memory safety.
    pub fn new_unchecked(raw_password_string: &str) -> Self {
        Self(raw_password_string.to_string())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a validated password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        match hash(&password.0, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{
        Error,
        models::{PasswordPolicy, ValidatedPassword},
    };

    fn test_policy() -> PasswordPolicy {
        PasswordPolicy {
            min_length: 8,
            hash_cost: 4,
        }
    }

    #[test]
    fn new_fails_on_empty() {
        let result = ValidatedPassword::new("", &test_policy());

        assert_eq!(result, Err(Error::PasswordTooShort(8)));
    }

    #[test]
    fn new_fails_on_short_password() {
        let result = ValidatedPassword::new("short", &test_policy());

        assert_eq!(result, Err(Error::PasswordTooShort(8)));
    }

    #[test]
    fn new_succeeds_at_minimum_length() {
        let result = ValidatedPassword::new("eightchr", &test_policy());

        assert!(result.is_ok());
    }

    #[test]
    fn minimum_length_is_configurable() {
        let policy = PasswordPolicy {
            min_length: 1,
            hash_cost: 4,
        };

        assert!(ValidatedPassword::new("x", &policy).is_ok());
    }
}
