use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{DeletedResponse, UserView},
    error::UserError,
    gateway::UpdateMode,
    mapper::{parse_identifier, to_external, to_internal},
};
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Short paths kept for older clients.
pub fn legacy_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(create_user))
        .route("/:id", get(get_user))
}

fn body_of(body: Result<Json<UserView>, JsonRejection>) -> Result<UserView, UserError> {
    match body {
        Ok(Json(view)) => Ok(view),
        Err(rejection) => {
            warn!(error = %rejection, "rejected request body");
            Err(UserError::InvalidBody(rejection.body_text()))
        }
    }
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<UserView>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), UserError> {
    let mut view = body_of(body)?;
    if view.id.trim().is_empty() {
        view.id = Uuid::new_v4().to_string();
    }

    let new = to_internal(view)?;
    let user = state.gateway.create(new).await?;

    info!(user_id = %user.external_id, "user registered");
    Ok((StatusCode::CREATED, Json(to_external(&user))))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, UserError> {
    let id = parse_identifier(&id)?;
    let user = state.gateway.find_by_external_id(id).await?;
    Ok(Json(to_external(&user)))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UserView>, JsonRejection>,
) -> Result<Json<UserView>, UserError> {
    let id = parse_identifier(&id)?;
    let mut view = body_of(body)?;
    if view.id.trim().is_empty() {
        view.id = id.to_string();
    }

    let new = to_internal(view)?;
    let mode = state.config.update_mode;
    if mode == UpdateMode::InPlace && new.external_id != id {
        warn!(path_id = %id, body_id = %new.external_id, "identifier mismatch");
        return Err(UserError::IdentifierMismatch {
            path: id,
            body: new.external_id,
        });
    }

    let user = state.gateway.update(id, new, mode).await?;
    Ok(Json(to_external(&user)))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, UserError> {
    let id = parse_identifier(&id)?;
    state.gateway.delete(id).await?;
    Ok(Json(DeletedResponse::new()))
}
