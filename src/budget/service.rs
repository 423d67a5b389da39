//! Card and balance operations, keyed by owner.
//!
//! The owner id is parsed but not checked against the `users` collection.

use futures_util::TryStreamExt;
use mongodb::bson::{doc, from_document, to_document, DateTime};
use tracing::instrument;

use crate::budget::model::{Balance, CreditCard, NewBalance, NewCard};
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::StorageError;
use crate::users::service::parse_id;

pub const CARDS: &str = "cards";
pub const BALANCES: &str = "balances";

#[instrument(name = "models.create_card", skip(state, card), fields(card.alias = %card.alias))]
pub async fn create_card(state: &AppState, owner_id: &str, card: NewCard) -> Result<String, AppError> {
    let owner_id = parse_id(owner_id)?;
    let card = CreditCard {
        id: None,
        owner_id,
        alias: card.alias,
        network: card.network,
        last_digits: card.last_digits,
        created_at: Some(DateTime::now()),
    };
    let document = to_document(&card).map_err(StorageError::from)?;

    let id = state
        .store
        .create_one(&state.database, CARDS, document)
        .await?;

    state.observability.metrics().record_card_created();
    tracing::info!(card.id = %id, "created card");
    Ok(id.to_hex())
}

#[instrument(name = "models.list_cards", skip(state))]
pub async fn list_cards(state: &AppState, owner_id: &str) -> Result<Vec<CreditCard>, AppError> {
    let owner_id = parse_id(owner_id)?;
    let mut cursor = state
        .store
        .find_many(&state.database, CARDS, doc! { "owner_id": owner_id })
        .await?;

    let mut cards = Vec::new();
    while let Some(document) = cursor.try_next().await? {
        cards.push(from_document(document).map_err(StorageError::from)?);
    }
    Ok(cards)
}

/// Insert the owner's balance. A second balance for the same owner is a
/// duplicate key.
#[instrument(name = "models.create_balance", skip(state, balance))]
pub async fn create_balance(
    state: &AppState,
    owner_id: &str,
    balance: NewBalance,
) -> Result<String, AppError> {
    let owner_id = parse_id(owner_id)?;
    let balance = Balance {
        id: None,
        owner_id,
        total_amount: balance.total_amount,
        spend_amount: balance.spend_amount,
        currency: balance.currency,
    };
    let document = to_document(&balance).map_err(StorageError::from)?;

    state
        .store
        .create_index(&state.database, BALANCES, doc! { "owner_id": 1 })
        .await?;
    let id = state
        .store
        .create_one(&state.database, BALANCES, document)
        .await?;

    Ok(id.to_hex())
}

#[instrument(name = "models.get_balance", skip(state))]
pub async fn get_balance(state: &AppState, owner_id: &str) -> Result<Balance, AppError> {
    let owner_id = parse_id(owner_id)?;
    let document = state
        .store
        .find_one(&state.database, BALANCES, doc! { "owner_id": owner_id })
        .await
        .map_err(AppError::not_found_as("balance"))?;
    Ok(from_document(document).map_err(StorageError::from)?)
}
