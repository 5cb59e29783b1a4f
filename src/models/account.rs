//! This file defines an account holder of the application and its supporting types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::PasswordHash;

/// A newtype wrapper for integer account IDs.
/// This helps disambiguate account IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountId(i64);

impl AccountId {
    /// Create an account ID from a raw database ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered account holder.
///
/// The password hash is never serialized: API responses that include an
/// account must not leak credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    id: AccountId,
    name: String,
    username: String,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Account {
    /// Create an account from its stored fields.
    pub fn new(
        id: AccountId,
        name: String,
        username: String,
        password_hash: PasswordHash,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            name,
            username,
            password_hash,
            created_at,
            updated_at,
        }
    }

    /// The account's ID in the database.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// The display name chosen at registration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unique, case-sensitive username used to log in.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The account's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// When the account was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// When the account was last modified.
    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}
