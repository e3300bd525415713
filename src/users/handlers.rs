use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{CreateUserRequest, UpdateUserRequest, UserResponse},
    validate,
};
use crate::{error::AppError, response::Envelope, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

type UserEnvelope = Json<Envelope<UserResponse>>;

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, UserEnvelope), AppError> {
    let Json(payload) = payload.map_err(malformed)?;
    let payload = payload.normalized();
    validate::create_user(&payload).map_err(invalid)?;

    let user = state.users.create_user(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(
            "User created successfully",
            UserResponse::from(user),
        )),
    ))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<UserResponse>>>, AppError> {
    let users = state.users.list_users().await?;
    let items: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Envelope::new("Users retrieved successfully", items)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<UserEnvelope, AppError> {
    let id = user_id(id)?;
    let user = state.users.get_user(id).await?;
    Ok(Json(Envelope::new(
        "User retrieved successfully",
        UserResponse::from(user),
    )))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<UserEnvelope, AppError> {
    let id = user_id(id)?;
    let Json(payload) = payload.map_err(malformed)?;
    let payload = payload.normalized();
    validate::update_user(&payload).map_err(invalid)?;

    let user = state
        .users
        .update_user(id, payload)
        .await
        .map_err(AppError::UpdateFailed)?;
    Ok(Json(Envelope::new(
        "User updated successfully",
        UserResponse::from(user),
    )))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<()>>, AppError> {
    let id = user_id(id)?;
    state.users.delete_user(id).await?;
    Ok(Json(Envelope::message("User deleted successfully")))
}

fn user_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(e) => {
            warn!(error = %e, "invalid user id");
            Err(AppError::InvalidId)
        }
    }
}

fn malformed(e: JsonRejection) -> AppError {
    warn!(error = %e, "malformed request body");
    AppError::MalformedInput(e.body_text())
}

fn invalid(violations: Vec<validate::FieldViolation>) -> AppError {
    warn!(count = violations.len(), "validation failed");
    AppError::Validation(violations)
}
