use super::types::{
    CreateUserRequest, ErrorResponse, HealthResponse, PredictRequest, PredictResponse,
    UpdateUserRequest, UserResponse,
};
use crate::model::Predictor;
use crate::store::UserStore;
use crate::Error;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
    pub predictor: Arc<Predictor>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "API is running".to_string(),
    })
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HandlerError> {
    request.validate().map_err(error_response)?;

    match state
        .store
        .create(&request.name, &request.email, request.age)
        .await
    {
        Ok(user) => {
            info!("Created user {} ({})", user.id, user.email);
            Ok((StatusCode::CREATED, Json(user.into())))
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(error_response(e))
        }
    }
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, HandlerError> {
    match state.store.get(user_id).await {
        Ok(Some(user)) => Ok(Json(user.into())),
        Ok(None) => Err(error_response(Error::UserNotFound { user_id })),
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            Err(error_response(e))
        }
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, HandlerError> {
    request.validate().map_err(error_response)?;

    match state.store.update(user_id, request.into_patch()).await {
        Ok(Some(user)) => {
            info!("Updated user {}", user.id);
            Ok(Json(user.into()))
        }
        Ok(None) => Err(error_response(Error::UserNotFound { user_id })),
        Err(e) => {
            error!("Failed to update user {}: {}", user_id, e);
            Err(error_response(e))
        }
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    match state.store.delete(user_id).await {
        Ok(true) => {
            info!("Deleted user {}", user_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(error_response(Error::UserNotFound { user_id })),
        Err(e) => {
            error!("Failed to delete user {}: {}", user_id, e);
            Err(error_response(e))
        }
    }
}

pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, HandlerError> {
    request.validate().map_err(error_response)?;

    match state.predictor.predict(&request.into_input()) {
        Ok(cost_prediction) => Ok(Json(PredictResponse { cost_prediction })),
        Err(e) => {
            // Shape mismatches here mean the artifacts disagree with the
            // serving code, not a bad request.
            error!("Prediction failed: {}", e);
            Err(error_response(e))
        }
    }
}

fn error_response(error: Error) -> HandlerError {
    let status = match &error {
        Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::UserNotFound { .. } => StatusCode::NOT_FOUND,
        Error::Database(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}
