//! Middleware that resolves a bearer token to an account before a protected
//! route handler runs.

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    Error,
    auth::TokenConfig,
    state::AppState,
    stores::{AccountStore, TransactionStore},
};

/// The state needed for the identity middleware.
#[derive(Clone)]
pub struct AuthState<A> {
    /// The process-wide token signing configuration.
    pub token_config: TokenConfig,
    /// The store used to resolve token claims to an account.
    pub account_store: A,
}

impl<A, T> FromRef<AppState<A, T>> for AuthState<A>
where
    A: AccountStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<A, T>) -> Self {
        Self {
            token_config: state.token_config.clone(),
            account_store: state.account_store.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the
/// `Authorization` header.
///
/// The resolved account is placed into the request and the request executed
/// normally if the token is valid, otherwise a generic unauthorized response
/// is returned without calling the downstream handler. Every failure branch
/// (missing header, bad signature, expired token, account no longer in the
/// store) produces the identical response so the client cannot tell which
/// check failed.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(account): Extension<Account>` to receive the resolved account.
pub async fn identity_guard<A>(
    State(state): State<AuthState<A>>,
    request: Request,
    next: Next,
) -> Response
where
    A: AccountStore + Send + Sync,
{
    let (mut parts, body) = request.into_parts();

    let bearer = match parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
    {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(_) => return Error::InvalidToken.into_response(),
    };

    let claims = match state.token_config.verify(bearer.token()) {
        Ok(claims) => claims,
        Err(_) => return Error::InvalidToken.into_response(),
    };

    // The account may have been removed after the token was issued.
    let account = match state.account_store.get(claims.account_id) {
        Ok(account) => account,
        Err(_) => return Error::InvalidToken.into_response(),
    };

    parts.extensions.insert(account);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
