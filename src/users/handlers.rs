//! HTTP handlers for `/api/v1/users`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::users::model::{NewUser, SanitizedUser, UserResponse};
use crate::users::service;

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<SanitizedUser>>, AppError> {
    Ok(Json(service::get_users(&state).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    let id = service::create_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(service::get_user(&state, &id).await?.into()))
}

pub async fn get_user_by_login(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(service::get_user_by_login(&state, &login).await?.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service::delete_user(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
