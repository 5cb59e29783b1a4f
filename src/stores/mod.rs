//! Defines the store traits that the HTTP layer depends on and their SQLite
//! implementations.

pub mod sqlite;

use crate::{
    Error,
    models::{Account, AccountId, PasswordHash, Transaction, TransactionData, TransactionId},
};

/// Handles the creation and retrieval of account records.
pub trait AccountStore {
    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateUsername] if `username` is already taken.
    /// A failed create must leave no partial record behind.
    fn create(
        &mut self,
        name: &str,
        username: &str,
        password_hash: PasswordHash,
    ) -> Result<Account, Error>;

    /// Get an account by its ID.
    ///
    /// Returns [Error::NotFound] if no account with the given ID exists.
    fn get(&self, id: AccountId) -> Result<Account, Error>;

    /// Get an account by its username (case-sensitive).
    ///
    /// Returns [Error::NotFound] if no account with the given username exists.
    fn get_by_username(&self, username: &str) -> Result<Account, Error>;
}

/// Handles the creation and retrieval of transactions for one ledger
/// (expenses or income).
///
/// Ownership is enforced at query time: the mutating operations take the
/// owner's ID and only touch rows that belong to that owner.
pub trait TransactionStore {
    /// Create a new transaction owned by `account_id`.
    fn create(
        &mut self,
        data: TransactionData,
        account_id: AccountId,
    ) -> Result<Transaction, Error>;

    /// Get a transaction in this ledger by its ID, regardless of owner.
    ///
    /// Callers use this to distinguish a missing record from one owned by
    /// another account.
    ///
    /// Returns [Error::NotFound] if no such transaction exists.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Get all transactions in this ledger owned by `account_id`, in store
    /// order.
    fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, Error>;

    /// Overwrite the editable fields of the transaction with `id`, if it is
    /// owned by `account_id`.
    ///
    /// Returns [Error::NotFound] if no row matched both the ID and the owner.
    fn update(
        &mut self,
        id: TransactionId,
        account_id: AccountId,
        data: TransactionData,
    ) -> Result<Transaction, Error>;

    /// Permanently remove the transaction with `id`, if it is owned by
    /// `account_id`.
    ///
    /// Returns [Error::NotFound] if no row matched both the ID and the owner.
    fn delete(&mut self, id: TransactionId, account_id: AccountId) -> Result<(), Error>;
}
