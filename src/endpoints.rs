//! The endpoint paths served by the application router.

/// Liveness check, unauthenticated.
pub const HEALTH: &str = "/api/health";
/// Account registration, unauthenticated.
pub const REGISTER: &str = "/api/accounts/register";
/// Login, unauthenticated. Returns a bearer token.
pub const LOG_IN: &str = "/api/accounts/login";
/// The expense ledger, bearer auth required.
pub const EXPENSES: &str = "/api/expenses";
/// The income ledger, bearer auth required.
pub const INCOME: &str = "/api/income";
