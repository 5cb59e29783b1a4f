//! Pocketbook is a personal finance tracker.
//!
//! This library provides a JSON REST API for registering accounts, logging in
//! with bearer tokens, and recording expenses and income scoped to the account
//! that created them.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod accounts;
mod auth;
pub mod db;
mod endpoints;
mod logging;
pub mod models;
mod routing;
mod state;
pub mod stores;
mod transactions;

pub use auth::TokenConfig;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use state::{AppState, SqliteAppState};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or empty in the request body.
    #[error("a required field is missing")]
    MissingFields,

    /// The password did not meet the configured minimum length.
    #[error("password is shorter than the minimum of {0} characters")]
    PasswordTooShort(usize),

    /// The username used for registration is already taken.
    #[error("the username is already in use")]
    DuplicateUsername,

    /// There was no account matching the given username.
    #[error("no account found with the given username")]
    AccountNotFound,

    /// The password did not match the stored password hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bearer token was missing, malformed, expired, or referred to an
    /// account that no longer exists.
    ///
    /// All token failures map to this single variant so the response does not
    /// reveal which check failed.
    #[error("the bearer token could not be verified")]
    InvalidToken,

    /// The authenticated account does not own the requested transaction.
    #[error("the transaction belongs to another account")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A token could not be signed.
    #[error("could not create a signed token")]
    TokenCreation,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::MissingFields => (
                StatusCode::BAD_REQUEST,
                "Please provide all fields!".to_owned(),
            ),
            Error::PasswordTooShort(min_length) => (
                StatusCode::BAD_REQUEST,
                format!("Password must be at least {min_length} characters long!"),
            ),
            Error::DuplicateUsername => {
                (StatusCode::CONFLICT, "Username already exists!".to_owned())
            }
            Error::AccountNotFound => (StatusCode::NOT_FOUND, "Account not found!".to_owned()),
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials!".to_owned())
            }
            Error::InvalidToken => (StatusCode::UNAUTHORIZED, "Token is not valid".to_owned()),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                "You can't modify this transaction!".to_owned(),
            ),
            Error::NotFound => (StatusCode::NOT_FOUND, "Transaction not found!".to_owned()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_owned())
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
