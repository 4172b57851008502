use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::event::{EventBus, RoomLifecycle};
use crate::game::GameService;
use crate::room::RoomService;
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_service: Arc<RoomService>,
    pub game_service: Arc<GameService>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub event_bus: Arc<EventBus>,
    pub room_lifecycle: Arc<RoomLifecycle>,
}

impl AppState {
    pub fn new(
        room_service: Arc<RoomService>,
        game_service: Arc<GameService>,
        connection_manager: Arc<dyn ConnectionManager>,
        event_bus: Arc<EventBus>,
        room_lifecycle: Arc<RoomLifecycle>,
    ) -> Self {
        Self {
            room_service,
            game_service,
            connection_manager,
            event_bus,
            room_lifecycle,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
