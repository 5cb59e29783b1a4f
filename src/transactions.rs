//! The ownership-scoped CRUD endpoints shared by the expense and income
//! ledgers.
//!
//! The handlers are written once and registered per ledger; each registration
//! carries a [LedgerState] with the store bound to that ledger, so there is a
//! single implementation to keep correct instead of two near-identical
//! copies.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    models::{Account, TransactionData, TransactionId},
    state::LedgerState,
    stores::TransactionStore,
};

/// The request body for creating or updating a transaction.
///
/// All fields are optional at the serde level so that a missing field maps to
/// the application's validation error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    amount: Option<f64>,
    category: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
}

impl TransactionPayload {
    /// Check that all four fields are present, non-empty, and that the amount
    /// is positive.
    fn validate(self) -> Result<TransactionData, Error> {
        let amount = match self.amount {
            Some(amount) if amount > 0.0 => amount,
            _ => return Err(Error::MissingFields),
        };

        let require = |field: Option<String>| match field {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::MissingFields),
        };

        Ok(TransactionData {
            amount,
            category: require(self.category)?,
            kind: require(self.kind)?,
            description: require(self.description)?,
        })
    }
}

/// Parse a raw path segment as a transaction ID.
///
/// A malformed ID maps to the same not-found error as an absent one.
fn parse_id(raw_id: &str) -> Result<TransactionId, Error> {
    raw_id.parse().map_err(|_| Error::NotFound)
}

/// Handler for listing the caller's transactions in this ledger.
///
/// Only the caller's own records are returned, in store order.
pub async fn list_transactions<T>(
    State(state): State<LedgerState<T>>,
    Extension(account): Extension<Account>,
) -> Result<Response, Error>
where
    T: TransactionStore + Send + Sync,
{
    let transactions = state.store.get_by_account(account.id())?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "transactions": transactions,
        })),
    )
        .into_response())
}

/// Handler for creating a transaction owned by the caller.
///
/// # Errors
///
/// Returns a validation error if any of the four fields is missing, empty, or
/// the amount is not positive. Nothing is persisted in that case.
pub async fn create_transaction<T>(
    State(mut state): State<LedgerState<T>>,
    Extension(account): Extension<Account>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Response, Error>
where
    T: TransactionStore + Send + Sync,
{
    let data = payload.validate()?;

    let transaction = state.store.create(data, account.id())?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "transaction": transaction,
        })),
    )
        .into_response())
}

/// Handler for overwriting the editable fields of a transaction.
///
/// # Errors
///
/// - A malformed or unknown ID returns a not-found error.
/// - An ID owned by another account returns a forbidden error, which is
///   deliberately distinct from not-found.
pub async fn update_transaction<T>(
    State(mut state): State<LedgerState<T>>,
    Extension(account): Extension<Account>,
    Path(raw_id): Path<String>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Response, Error>
where
    T: TransactionStore + Send + Sync,
{
    let id = parse_id(&raw_id)?;
    let data = payload.validate()?;

    let existing = state.store.get(id)?;
    if existing.account_id() != account.id() {
        return Err(Error::Forbidden);
    }

    let transaction = state.store.update(id, account.id(), data)?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "transaction": transaction,
        })),
    )
        .into_response())
}

/// Handler for permanently deleting a transaction.
///
/// # Errors
///
/// Same ID and ownership rules as [update_transaction].
pub async fn delete_transaction<T>(
    State(mut state): State<LedgerState<T>>,
    Extension(account): Extension<Account>,
    Path(raw_id): Path<String>,
) -> Result<Response, Error>
where
    T: TransactionStore + Send + Sync,
{
    let id = parse_id(&raw_id)?;

    let existing = state.store.get(id)?;
    if existing.account_id() != account.id() {
        return Err(Error::Forbidden);
    }

    state.store.delete(id, account.id())?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Transaction deleted",
        })),
    )
        .into_response())
}
