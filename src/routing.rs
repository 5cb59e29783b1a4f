//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Json, Router,
    extract::FromRef,
    middleware,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use crate::{
    accounts::{log_in, register},
    auth::{AuthState, identity_guard},
    endpoints,
    state::{AccountState, AppState, LedgerState},
    stores::{AccountStore, TransactionStore},
    transactions::{
        create_transaction, delete_transaction, list_transactions, update_transaction,
    },
};

/// Handler for the liveness check.
async fn get_health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Server is running",
    }))
}

/// Return the CRUD routes for one ledger, guarded by the identity middleware.
fn ledger_routes<A, T>(auth_state: AuthState<A>, store: T) -> Router
where
    A: AccountStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_transactions::<T>))
        .route("/", post(create_transaction::<T>))
        .route("/{id}", put(update_transaction::<T>))
        .route("/{id}", delete(delete_transaction::<T>))
        .layer(middleware::from_fn_with_state(auth_state, identity_guard))
        .with_state(LedgerState { store })
}

/// Return a router with all the app's routes.
pub fn build_router<A, T>(state: AppState<A, T>) -> Router
where
    A: AccountStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    let account_routes = Router::new()
        .route(endpoints::REGISTER, post(register::<A>))
        .route(endpoints::LOG_IN, post(log_in::<A>))
        .with_state(AccountState::from_ref(&state));

    let expense_routes = ledger_routes(
        AuthState::from_ref(&state),
        state.expense_store.clone(),
    );
    let income_routes = ledger_routes(AuthState::from_ref(&state), state.income_store.clone());

    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .merge(account_routes)
        .nest(endpoints::EXPENSES, expense_routes)
        .nest(endpoints::INCOME, income_routes)
}

#[cfg(test)]
mod routing_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{SqliteAppState, models::PasswordPolicy};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = SqliteAppState::new(
            connection,
            "foobar",
            PasswordPolicy {
                min_length: 7,
                hash_cost: 4,
            },
        )
        .expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    async fn register_and_log_in(server: &TestServer, name: &str, username: &str) -> String {
        server
            .post("/api/accounts/register")
            .json(&json!({
                "name": name,
                "username": username,
                "password": "secret12",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server
            .post("/api/accounts/login")
            .json(&json!({
                "username": username,
                "password": "secret12",
            }))
            .await;

        response.assert_status_ok();

        response.json::<Value>()["token"]
            .as_str()
            .expect("login response should include a token")
            .to_owned()
    }

    #[tokio::test]
    async fn health_endpoint_is_unauthenticated() {
        let server = get_test_server();

        let response = server.get("/api/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "status": "OK",
            "message": "Server is running",
        }));
    }

    #[tokio::test]
    async fn transaction_routes_require_a_token() {
        let server = get_test_server();

        server.get("/api/expenses").await.assert_status_unauthorized();
        server.get("/api/income").await.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn add_then_list_round_trip() {
        let server = get_test_server();
        let token = register_and_log_in(&server, "Earl", "earl").await;

        let created = server
            .post("/api/expenses")
            .authorization_bearer(&token)
            .json(&json!({
                "amount": 250,
                "category": "food",
                "type": "expense",
                "description": "Lunch",
            }))
            .await;

        created.assert_status(axum::http::StatusCode::CREATED);

        let listed = server
            .get("/api/expenses")
            .authorization_bearer(&token)
            .await;

        listed.assert_status_ok();

        let body = listed.json::<Value>();
        let transactions = body["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["amount"], 250.0);
        assert_eq!(transactions[0]["category"], "food");
        assert_eq!(transactions[0]["type"], "expense");
        assert_eq!(transactions[0]["description"], "Lunch");
        assert!(transactions[0]["id"].is_i64());
        assert!(transactions[0]["created_at"].is_string());
        assert!(transactions[0]["updated_at"].is_string());
    }

    #[tokio::test]
    async fn add_with_missing_field_persists_nothing() {
        let server = get_test_server();
        let token = register_and_log_in(&server, "Earl", "earl").await;

        let response = server
            .post("/api/expenses")
            .authorization_bearer(&token)
            .json(&json!({
                "amount": 250,
                "category": "food",
                "type": "expense",
            }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "success": false,
            "message": "Please provide all fields!",
        }));

        let listed = server
            .get("/api/expenses")
            .authorization_bearer(&token)
            .await;

        assert!(
            listed.json::<Value>()["transactions"]
                .as_array()
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn transactions_are_invisible_to_other_accounts() {
        let server = get_test_server();
        let token_a = register_and_log_in(&server, "Earl", "earl").await;
        let token_b = register_and_log_in(&server, "Pearl", "pearl").await;

        let created = server
            .post("/api/expenses")
            .authorization_bearer(&token_a)
            .json(&json!({
                "amount": 100,
                "category": "food",
                "type": "expense",
                "description": "x",
            }))
            .await;

        created.assert_status(axum::http::StatusCode::CREATED);
        let id = created.json::<Value>()["transaction"]["id"].as_i64().unwrap();

        let listed_by_b = server
            .get("/api/expenses")
            .authorization_bearer(&token_b)
            .await;

        assert!(
            listed_by_b.json::<Value>()["transactions"]
                .as_array()
                .unwrap()
                .is_empty()
        );

        let update_by_b = server
            .put(&format!("/api/expenses/{id}"))
            .authorization_bearer(&token_b)
            .json(&json!({
                "amount": 1,
                "category": "stolen",
                "type": "expense",
                "description": "Tampered",
            }))
            .await;

        update_by_b.assert_status_forbidden();
        update_by_b.assert_json(&json!({
            "success": false,
            "message": "You can't modify this transaction!",
        }));

        let delete_by_b = server
            .delete(&format!("/api/expenses/{id}"))
            .authorization_bearer(&token_b)
            .await;

        delete_by_b.assert_status_forbidden();

        // The record is untouched for its owner.
        let listed_by_a = server
            .get("/api/expenses")
            .authorization_bearer(&token_a)
            .await;

        let body = listed_by_a.json::<Value>();
        let transactions = body["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["description"], "x");
    }

    #[tokio::test]
    async fn update_distinguishes_absent_from_foreign_ids() {
        let server = get_test_server();
        let token_a = register_and_log_in(&server, "Earl", "earl").await;
        let token_b = register_and_log_in(&server, "Pearl", "pearl").await;

        let payload = json!({
            "amount": 1,
            "category": "misc",
            "type": "expense",
            "description": "y",
        });

        let absent = server
            .put("/api/expenses/999")
            .authorization_bearer(&token_a)
            .json(&payload)
            .await;

        absent.assert_status_not_found();

        let malformed = server
            .put("/api/expenses/not-an-id")
            .authorization_bearer(&token_a)
            .json(&payload)
            .await;

        malformed.assert_status_not_found();

        let created = server
            .post("/api/expenses")
            .authorization_bearer(&token_a)
            .json(&payload)
            .await;
        let id = created.json::<Value>()["transaction"]["id"].as_i64().unwrap();

        let foreign = server
            .put(&format!("/api/expenses/{id}"))
            .authorization_bearer(&token_b)
            .json(&payload)
            .await;

        foreign.assert_status_forbidden();
    }

    #[tokio::test]
    async fn expense_and_income_ledgers_are_separate() {
        let server = get_test_server();
        let token = register_and_log_in(&server, "Earl", "earl").await;

        let created = server
            .post("/api/income")
            .authorization_bearer(&token)
            .json(&json!({
                "amount": 1000,
                "category": "salary",
                "type": "income",
                "description": "Pay",
            }))
            .await;

        created.assert_status(axum::http::StatusCode::CREATED);
        let id = created.json::<Value>()["transaction"]["id"].as_i64().unwrap();

        // The income record is not reachable through the expense routes.
        let listed_expenses = server
            .get("/api/expenses")
            .authorization_bearer(&token)
            .await;

        assert!(
            listed_expenses.json::<Value>()["transactions"]
                .as_array()
                .unwrap()
                .is_empty()
        );

        server
            .delete(&format!("/api/expenses/{id}"))
            .authorization_bearer(&token)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn register_log_in_and_manage_an_expense() {
        let server = get_test_server();

        server
            .post("/api/accounts/register")
            .json(&json!({
                "name": "Earl",
                "username": "earl",
                "password": "secret1",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        server
            .post("/api/accounts/login")
            .json(&json!({
                "username": "earl",
                "password": "wrong",
            }))
            .await
            .assert_status_unauthorized();

        let log_in_response = server
            .post("/api/accounts/login")
            .json(&json!({
                "username": "earl",
                "password": "secret1",
            }))
            .await;

        log_in_response.assert_status_ok();
        let token = log_in_response.json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_owned();

        let created = server
            .post("/api/expenses")
            .authorization_bearer(&token)
            .json(&json!({
                "amount": 100,
                "category": "food",
                "type": "expense",
                "description": "x",
            }))
            .await;

        created.assert_status(axum::http::StatusCode::CREATED);
        let id = created.json::<Value>()["transaction"]["id"].as_i64().unwrap();

        let updated = server
            .put(&format!("/api/expenses/{id}"))
            .authorization_bearer(&token)
            .json(&json!({
                "amount": 100,
                "category": "food",
                "type": "expense",
                "description": "team lunch",
            }))
            .await;

        updated.assert_status_ok();
        assert_eq!(
            updated.json::<Value>()["transaction"]["description"],
            "team lunch"
        );

        server
            .delete(&format!("/api/expenses/{id}"))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let listed = server
            .get("/api/expenses")
            .authorization_bearer(&token)
            .await;

        assert!(
            listed.json::<Value>()["transactions"]
                .as_array()
                .unwrap()
                .is_empty()
        );
    }
}
