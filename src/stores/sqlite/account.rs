//! Implements a SQLite backed account store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Account, AccountId, PasswordHash},
    stores::AccountStore,
};

/// Handles the creation and retrieval of account records.
#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteAccountStore {
    /// Create a new account store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl AccountStore for SqliteAccountStore {
    /// Create and insert a new account into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateUsername] if the username is taken, or
    /// [Error::SqlError] if an SQL related error occurred. The UNIQUE
    /// constraint aborts the statement, so a failed insert writes nothing.
    fn create(
        &mut self,
        name: &str,
        username: &str,
        password_hash: PasswordHash,
    ) -> Result<Account, Error> {
        let connection = self.connection.lock().unwrap();
        let now = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO account (name, username, password, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)",
            (name, username, password_hash.to_string(), now, now),
        )?;

        let id = connection.last_insert_rowid();

        // Select the row back so the returned timestamps match the stored
        // representation exactly.
        connection
            .prepare(
                "SELECT id, name, username, password, created_at, updated_at
                    FROM account WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], SqliteAccountStore::map_row)
            .map_err(|e| e.into())
    }

    /// Get the account from the database that has the specified `id`, or return [Error::NotFound] if no such account exists.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get(&self, id: AccountId) -> Result<Account, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, name, username, password, created_at, updated_at
                    FROM account WHERE id = :id",
            )?
            .query_row(&[(":id", &id.as_i64())], SqliteAccountStore::map_row)
            .map_err(|e| e.into())
    }

    /// Get the account from the database that has the specified `username`, or return [Error::NotFound] if no such account exists.
    ///
    /// The lookup is case-sensitive.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get_by_username(&self, username: &str) -> Result<Account, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, name, username, password, created_at, updated_at
                    FROM account WHERE username = :username",
            )?
            .query_row(&[(":username", &username)], SqliteAccountStore::map_row)
            .map_err(|e| e.into())
    }
}

impl CreateTable for SqliteAccountStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS account (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    username TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteAccountStore {
    type ReturnType = Account;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let name = row.get(offset + 1)?;
        let username = row.get(offset + 2)?;
        let raw_password_hash: String = row.get(offset + 3)?;
        let created_at = row.get(offset + 4)?;
        let updated_at = row.get(offset + 5)?;

        Ok(Account::new(
            AccountId::new(raw_id),
            name,
            username,
            PasswordHash::new_unchecked(&raw_password_hash),
            created_at,
            updated_at,
        ))
    }
}
