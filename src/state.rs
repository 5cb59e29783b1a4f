//! Implements the structs that hold the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    Error,
    auth::TokenConfig,
    db::initialize,
    models::{Ledger, PasswordPolicy},
    stores::{
        AccountStore, TransactionStore,
        sqlite::{SqliteAccountStore, SqliteTransactionStore},
    },
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState<A, T>
where
    A: AccountStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    /// The process-wide token signing configuration, created once at startup.
    pub token_config: TokenConfig,
    /// The rules applied to new passwords.
    pub password_policy: PasswordPolicy,
    /// The store for account records.
    pub account_store: A,
    /// The store for the expense ledger.
    pub expense_store: T,
    /// The store for the income ledger.
    pub income_store: T,
}

/// The [AppState] backed by SQLite stores over one shared connection.
pub type SqliteAppState = AppState<SqliteAccountStore, SqliteTransactionStore>;

impl SqliteAppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. `secret` is the process-wide token signing secret.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        secret: &str,
        password_policy: PasswordPolicy,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            token_config: TokenConfig::new(secret),
            password_policy,
            account_store: SqliteAccountStore::new(connection.clone()),
            expense_store: SqliteTransactionStore::new(connection.clone(), Ledger::Expense),
            income_store: SqliteTransactionStore::new(connection, Ledger::Income),
        })
    }
}

/// The state needed for the registration and login handlers.
#[derive(Clone)]
pub struct AccountState<A> {
    /// The process-wide token signing configuration.
    pub token_config: TokenConfig,
    /// The rules applied to new passwords.
    pub password_policy: PasswordPolicy,
    /// The store for account records.
    pub account_store: A,
}

impl<A, T> FromRef<AppState<A, T>> for AccountState<A>
where
    A: AccountStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<A, T>) -> Self {
        Self {
            token_config: state.token_config.clone(),
            password_policy: state.password_policy,
            account_store: state.account_store.clone(),
        }
    }
}

/// The state needed for the transaction CRUD handlers of one ledger.
///
/// The same handler set is registered once per ledger, each registration
/// carrying the store bound to that ledger.
#[derive(Debug, Clone)]
pub struct LedgerState<T> {
    /// The transaction store for this ledger.
    pub store: T,
}
