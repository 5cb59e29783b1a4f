//! This file defines the type `Transaction`, the record shared by the expense
//! and income ledgers, along with its supporting types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::AccountId;

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// The two transaction ledgers exposed by the API.
///
/// Expenses and income share one record shape and one set of CRUD handlers;
/// the ledger decides which collection a store instance reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ledger {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
}

impl Ledger {
    /// The value stored in the ledger discriminator column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ledger::Expense => "expense",
            Ledger::Income => "income",
        }
    }
}

impl Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The caller-editable fields of a transaction.
///
/// These are the only fields that `update` may overwrite: the owner and the
/// creation time never change after the record is created.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionData {
    /// The amount of money spent or earned. Always positive.
    pub amount: f64,
    /// A free-form category, e.g. "food".
    pub category: String,
    /// A free-form type label, serialized as `type` in the API.
    pub kind: String,
    /// A text description of what the transaction was for.
    pub description: String,
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    amount: f64,
    category: String,
    #[serde(rename = "type")]
    kind: String,
    description: String,
    account_id: AccountId,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a transaction from its stored fields.
    pub fn new(
        id: TransactionId,
        data: TransactionData,
        account_id: AccountId,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            amount: data.amount,
            category: data.category,
            kind: data.kind,
            description: data.description,
            account_id,
            created_at,
            updated_at,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// The amount of money spent or earned in this transaction.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// A user-defined category that describes the transaction.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// A user-defined type label, e.g. "expense" or "income".
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The ID of the account that created this transaction.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// When the transaction was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// When the transaction was last modified.
    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}
