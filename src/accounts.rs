//! The registration and login endpoints.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    models::{PasswordHash, ValidatedPassword},
    state::AccountState,
    stores::AccountStore,
};

/// The request body for registration.
///
/// All fields are optional at the serde level so that a missing field maps to
/// the application's validation error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    name: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// The request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    username: Option<String>,
    password: Option<String>,
}

fn require(field: Option<String>) -> Result<String, Error> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingFields),
    }
}

/// Handler for registration requests.
///
/// Hashes the password with a random salt and persists the new account. The
/// response never includes the password hash.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - A field is missing or empty.
/// - The password is shorter than the configured minimum length.
/// - The username is already taken.
pub async fn register<A>(
    State(state): State<AccountState<A>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Response, Error>
where
    A: AccountStore + Send + Sync,
{
    let name = require(payload.name)?;
    let username = require(payload.username)?;
    let password = require(payload.password)?;

    let validated = ValidatedPassword::new(&password, &state.password_policy)?;
    let password_hash = PasswordHash::new(validated, state.password_policy.hash_cost)?;

    let mut account_store = state.account_store;
    let account = account_store.create(&name, &username, password_hash)?;

    tracing::info!("Registered account {}", account.id());

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "account": account,
        })),
    )
        .into_response())
}

/// Handler for login requests.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - A field is missing or empty.
/// - The username does not belong to a registered account.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the
///   token.
pub async fn log_in<A>(
    State(state): State<AccountState<A>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Response, Error>
where
    A: AccountStore + Send + Sync,
{
    let username = require(payload.username)?;
    let password = require(payload.password)?;

    let account = state
        .account_store
        .get_by_username(&username)
        .map_err(|e| match e {
            Error::NotFound => Error::AccountNotFound,
            error => error,
        })?;

    let password_is_correct = account
        .password_hash()
        .verify(&password)
        .map_err(|e| Error::HashingError(e.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = state.token_config.issue(account.id())?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "token": token,
            "account": account,
        })),
    )
        .into_response())
}
