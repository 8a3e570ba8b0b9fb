use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::identity::*;
use crate::state::AppState;
use crate::utils::cascade;
use crate::utils::lookup::find_user;

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Identities",
    operation_id = "upsertIdentity",
    summary = "Create or update an identity mirror",
    description = "Mirrors an account owned by the external identity provider. The path ID is the provider's account ID. Returns 201 when the mirror is created and 200 when an existing one is renamed. Usernames are unique across mirrors.",
    params(("id" = i32, Path, description = "Account ID assigned by the identity provider")),
    request_body = UpsertIdentityRequest,
    responses(
        (status = 200, description = "Identity updated", body = IdentityResponse),
        (status = 201, description = "Identity created", body = IdentityResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Username taken by another identity (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id, username = %payload.username))]
pub async fn upsert_identity(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpsertIdentityRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_upsert_identity(&payload)?;
    let username = payload.username.trim().to_string();

    let txn = state.db.begin().await?;

    let taken = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .filter(user::Column::Id.ne(id))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict("Username is already taken".into()));
    }

    let now = chrono::Utc::now();
    let (status, model) = match user::Entity::find_by_id(id).one(&txn).await? {
        Some(existing) => {
            let mut active: user::ActiveModel = existing.into();
            active.username = Set(username);
            active.updated_at = Set(now);
            (StatusCode::OK, active.update(&txn).await?)
        }
        None => {
            let new_user = user::ActiveModel {
                id: Set(id),
                username: Set(username),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            (StatusCode::CREATED, new_user.insert(&txn).await?)
        }
    };

    txn.commit().await?;
    Ok((status, Json(IdentityResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Identities",
    operation_id = "getIdentity",
    summary = "Get an identity mirror",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Identity", body = IdentityResponse),
        (status = 404, description = "Identity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_identity(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<IdentityResponse>, AppError> {
    let model = find_user(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Identities",
    operation_id = "deleteIdentity",
    summary = "Delete an identity mirror",
    description = "Deletes the mirror together with its instructor and learner records and its enrollments (with their submissions). Enrollment counters of the affected courses are decreased.",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Identity deleted"),
        (status = 404, description = "Identity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_identity(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let _user = find_user(&txn, id).await?;
    cascade::delete_identity(&txn, id).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
