//! Implements a SQLite backed transaction store.
//!
//! One `ledger_entry` table holds both expenses and income; each store
//! instance is bound to one ledger and every query filters on the ledger
//! discriminator column, so the two resources never see each other's rows.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, named_params};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{AccountId, Ledger, Transaction, TransactionData, TransactionId},
    stores::TransactionStore,
};

/// Handles the creation and retrieval of transactions for one ledger.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
    ledger: Ledger,
}

impl SqliteTransactionStore {
    /// Create a new transaction store bound to `ledger`.
    pub fn new(connection: Arc<Mutex<Connection>>, ledger: Ledger) -> Self {
        Self { connection, ledger }
    }

    fn select(&self, connection: &Connection, id: TransactionId) -> Result<Transaction, Error> {
        connection
            .prepare(
                "SELECT id, amount, category, kind, description, account_id, created_at, updated_at
                    FROM ledger_entry WHERE id = :id AND ledger = :ledger",
            )?
            .query_row(
                named_params! { ":id": id, ":ledger": self.ledger.as_str() },
                SqliteTransactionStore::map_row,
            )
            .map_err(|e| e.into())
    }
}

impl TransactionStore for SqliteTransactionStore {
    /// Create and insert a new transaction owned by `account_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn create(
        &mut self,
        data: TransactionData,
        account_id: AccountId,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();
        let now = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO ledger_entry
                (amount, category, kind, description, ledger, account_id, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                data.amount,
                &data.category,
                &data.kind,
                &data.description,
                self.ledger.as_str(),
                account_id.as_i64(),
                now,
                now,
            ),
        )?;

        let id = connection.last_insert_rowid();

        self.select(&connection, id)
    }

    /// Get the transaction in this ledger with the specified `id`, or return
    /// [Error::NotFound] if no such transaction exists.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        self.select(&connection, id)
    }

    /// Get the transactions in this ledger owned by `account_id`.
    ///
    /// An empty vector is returned if the account has no transactions. Rows
    /// come back in store order, no sorting is applied.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, amount, category, kind, description, account_id, created_at, updated_at
                    FROM ledger_entry WHERE account_id = :account_id AND ledger = :ledger",
            )?
            .query_map(
                named_params! {
                    ":account_id": account_id.as_i64(),
                    ":ledger": self.ledger.as_str(),
                },
                SqliteTransactionStore::map_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Overwrite the editable fields of a transaction.
    ///
    /// The statement filters on the owner as well as the ID, so a concurrent
    /// caller with a different account can never overwrite the row between
    /// the handler's ownership check and this write.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn update(
        &mut self,
        id: TransactionId,
        account_id: AccountId,
        data: TransactionData,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();
        let now = OffsetDateTime::now_utc();

        let rows_changed = connection.execute(
            "UPDATE ledger_entry
                SET amount = ?1, category = ?2, kind = ?3, description = ?4, updated_at = ?5
                WHERE id = ?6 AND account_id = ?7 AND ledger = ?8",
            (
                data.amount,
                &data.category,
                &data.kind,
                &data.description,
                now,
                id,
                account_id.as_i64(),
                self.ledger.as_str(),
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        self.select(&connection, id)
    }

    /// Permanently remove a transaction. There is no soft-delete.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn delete(&mut self, id: TransactionId, account_id: AccountId) -> Result<(), Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            "DELETE FROM ledger_entry WHERE id = ?1 AND account_id = ?2 AND ledger = ?3",
            (id, account_id.as_i64(), self.ledger.as_str()),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SqliteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS ledger_entry (
                    id INTEGER PRIMARY KEY,
                    amount REAL NOT NULL,
                    category TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    description TEXT NOT NULL,
                    ledger TEXT NOT NULL,
                    account_id INTEGER NOT NULL REFERENCES account(id),
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let amount = row.get(offset + 1)?;
        let category = row.get(offset + 2)?;
        let kind = row.get(offset + 3)?;
        let description = row.get(offset + 4)?;
        let raw_account_id = row.get(offset + 5)?;
        let created_at = row.get(offset + 6)?;
        let updated_at = row.get(offset + 7)?;

        Ok(Transaction::new(
            id,
            TransactionData {
                amount,
                category,
                kind,
                description,
            },
            AccountId::new(raw_account_id),
            created_at,
            updated_at,
        ))
    }
}
