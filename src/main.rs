use axum::{routing::get, Router};
use liarsgame::event::{EventBus, RoomLifecycle};
use liarsgame::game::{GameService, TurnTimerConfig};
use liarsgame::room::repository::{InMemoryRoomRepository, RoomRepository};
use liarsgame::room::RoomService;
use liarsgame::shared::AppState;
use liarsgame::websockets::{
    websocket_handler, ConnectionManager, InMemoryConnectionManager, WebSocketRoomSubscriber,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liarsgame=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Liar game server");

    // Wire dependencies: one repository, the services on top of it, and the
    // room event pipeline that feeds WebSocket connections.
    let room_repository: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
    let connection_manager: Arc<dyn ConnectionManager> = Arc::new(InMemoryConnectionManager::new());
    let event_bus = Arc::new(EventBus::new());

    let room_service = Arc::new(RoomService::new(Arc::clone(&room_repository)));
    let game_service = Arc::new(GameService::new(
        Arc::clone(&room_repository),
        Arc::clone(&event_bus),
        TurnTimerConfig::default(),
    ));

    let subscriber = Arc::new(WebSocketRoomSubscriber::new(
        Arc::clone(&room_service),
        Arc::clone(&game_service),
        Arc::clone(&connection_manager),
        Arc::clone(&event_bus),
    ));
    let room_lifecycle = Arc::new(RoomLifecycle::new(Arc::clone(&event_bus), subscriber));

    let app_state = AppState::new(
        room_service,
        game_service,
        connection_manager,
        event_bus,
        room_lifecycle,
    );

    let app = Router::new()
        .route("/", get(|| async { "Hello, World!" }))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = std::env::var("LIARSGAME_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}
