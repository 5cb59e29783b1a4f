//! The domain models of the application.

mod account;
mod password;
mod transaction;

pub use account::{Account, AccountId};
pub use password::{PasswordHash, PasswordPolicy, ValidatedPassword};
pub use transaction::{Ledger, Transaction, TransactionData, TransactionId};
