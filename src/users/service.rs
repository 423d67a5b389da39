//! User record operations.
//!
//! Each operation opens a `models.*` span, validates its input before any
//! storage call and goes through the shared [`DocumentStore`].
//!
//! [`DocumentStore`]: crate::storage::DocumentStore

use futures_util::TryStreamExt;
use mongodb::bson::{doc, from_document, oid::ObjectId, to_document, DateTime};
use tracing::{field, instrument, Span};

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::StorageError;
use crate::users::model::{NewUser, SanitizedUser, User};
use crate::users::password;

pub const USERS: &str = "users";

pub(crate) fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidId(id.to_string()))
}

/// Hash the password, insert the user and return its hex id.
#[instrument(
    name = "models.create_user",
    skip(state, new_user),
    fields(user.login = %new_user.login, user.id = field::Empty)
)]
pub async fn create_user(state: &AppState, new_user: NewUser) -> Result<String, AppError> {
    if new_user.password.is_empty() {
        return Err(AppError::EmptyPassword);
    }

    let plain = new_user.password;
    let hashed = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| AppError::Hashing(e.to_string()))??;

    let user = User {
        id: None,
        login: new_user.login,
        firstname: new_user.firstname,
        lastname: new_user.lastname,
        email: new_user.email,
        password: Some(hashed),
        created_at: Some(DateTime::now()),
    };
    let document = to_document(&user).map_err(StorageError::from)?;

    state
        .store
        .create_index(&state.database, USERS, doc! { "login": 1 })
        .await?;
    let id = state
        .store
        .create_one(&state.database, USERS, document)
        .await?;

    state.observability.metrics().record_user_created();
    Span::current().record("user.id", field::display(id));
    tracing::info!(login = %user.login, "created user");

    Ok(id.to_hex())
}

#[instrument(name = "models.get_user", skip(state), fields(user.id = %id, user.login = field::Empty))]
pub async fn get_user(state: &AppState, id: &str) -> Result<User, AppError> {
    let oid = parse_id(id)?;
    let document = state
        .store
        .find_one(&state.database, USERS, doc! { "_id": oid })
        .await
        .map_err(AppError::not_found_as("user"))?;
    let user: User = from_document(document).map_err(StorageError::from)?;

    Span::current().record("user.login", field::display(&user.login));
    Ok(user)
}

#[instrument(name = "models.get_user_by_login", skip(state), fields(user.login = %login, user.id = field::Empty))]
pub async fn get_user_by_login(state: &AppState, login: &str) -> Result<User, AppError> {
    let document = state
        .store
        .find_one(&state.database, USERS, doc! { "login": login })
        .await
        .map_err(AppError::not_found_as("user"))?;
    let user: User = from_document(document).map_err(StorageError::from)?;

    if let Some(id) = user.id {
        Span::current().record("user.id", field::display(id));
    }
    Ok(user)
}

/// List every user in insertion order, without identity or password.
#[instrument(name = "models.get_users", skip(state))]
pub async fn get_users(state: &AppState) -> Result<Vec<SanitizedUser>, AppError> {
    let mut cursor = state
        .store
        .find_many(&state.database, USERS, doc! {})
        .await?;

    let mut users = Vec::new();
    while let Some(document) = cursor.try_next().await? {
        users.push(from_document(document).map_err(StorageError::from)?);
    }
    Ok(users)
}

#[instrument(name = "models.delete_user", skip(state), fields(user.id = %id))]
pub async fn delete_user(state: &AppState, id: &str) -> Result<(), AppError> {
    let oid = parse_id(id)?;

    tracing::info!("deleting user");
    let deleted = state
        .store
        .delete_one(&state.database, USERS, doc! { "_id": oid })
        .await?;
    tracing::info!(deleted, "number of users deleted");

    if deleted == 0 {
        return Err(AppError::NotFound("user"));
    }
    Ok(())
}
