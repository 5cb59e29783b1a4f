//! SQLite backed implementations of the store traits.

mod account;
mod transaction;

pub use account::SqliteAccountStore;
pub use transaction::SqliteTransactionStore;
