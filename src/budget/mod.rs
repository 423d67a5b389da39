//! Budget records owned by a user: credit cards and a balance.

pub mod handlers;
pub mod model;
pub mod service;

use axum::{routing::get, Router};

use crate::state::AppState;

pub use model::{Balance, CreditCard, NewBalance, NewCard};
pub use service::{create_balance, create_card, get_balance, list_cards};

/// Routes mounted under `/api/v1/users`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/cards",
            get(handlers::list_cards).post(handlers::create_card),
        )
        .route(
            "/{id}/balance",
            get(handlers::get_balance).post(handlers::create_balance),
        )
}
