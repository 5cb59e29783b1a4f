/*! This module defines the bearer-token credentials used to authenticate API
requests and the middleware that resolves them to an account. */

mod middleware;
mod token;

pub use middleware::{AuthState, identity_guard};
pub use token::{Claims, TokenConfig};
