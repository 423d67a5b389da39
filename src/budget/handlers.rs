//! HTTP handlers for `/api/v1/users/{id}/cards` and `/api/v1/users/{id}/balance`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::budget::model::{BalanceResponse, CardResponse, NewBalance, NewCard};
use crate::budget::service;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_cards(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<CardResponse>>, AppError> {
    let cards = service::list_cards(&state, &owner_id).await?;
    Ok(Json(cards.into_iter().map(CardResponse::from).collect()))
}

pub async fn create_card(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Json(payload): Json<NewCard>,
) -> Result<impl IntoResponse, AppError> {
    let id = service::create_card(&state, &owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    Ok(Json(service::get_balance(&state, &owner_id).await?.into()))
}

pub async fn create_balance(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Json(payload): Json<NewBalance>,
) -> Result<impl IntoResponse, AppError> {
    let id = service::create_balance(&state, &owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
