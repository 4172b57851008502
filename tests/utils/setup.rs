use std::sync::Arc;
use std::time::Duration;

use liarsgame::{
    event::{EventBus, RoomLifecycle},
    game::{GameService, TurnTimerConfig},
    room::{
        repository::{InMemoryRoomRepository, RoomRepository},
        RoomService,
    },
    websockets::{ConnectionManager, WebSocketRoomSubscriber, WebsocketReceiveHandler},
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Connection id a player's transport would have been assigned.
pub fn conn_id(display_name: &str) -> String {
    format!("conn-{}", display_name)
}

pub struct TestSetup {
    pub room_key: String,
    pub event_bus: Arc<EventBus>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: WebsocketReceiveHandler,
    pub room_service: Arc<RoomService>,
    pub game_service: Arc<GameService>,
    pub players: Vec<String>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    room_key: String,
    timer_config: TurnTimerConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            room_key: "ROOM1".to_string(),
            // Tests drive clock beats by hand; the long real interval keeps
            // the armed clock silent, and countdown 0 makes one beat equal
            // one turn.
            timer_config: TurnTimerConfig {
                countdown_init: 0,
                tick_interval: Duration::from_secs(60),
            },
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "charlie"])
    }

    /// Replaces the hand-driven clock with a real ticking one.
    pub fn with_timer_config(mut self, timer_config: TurnTimerConfig) -> Self {
        self.timer_config = timer_config;
        self
    }

    pub async fn build(self) -> TestSetup {
        let event_bus = Arc::new(EventBus::new());
        let repository: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let connection_manager: Arc<dyn ConnectionManager> = mock_conn_manager.clone();

        let room_service = Arc::new(RoomService::new(Arc::clone(&repository)));
        let game_service = Arc::new(GameService::new(
            Arc::clone(&repository),
            Arc::clone(&event_bus),
            self.timer_config,
        ));

        let output_subscriber = Arc::new(WebSocketRoomSubscriber::new(
            Arc::clone(&room_service),
            Arc::clone(&game_service),
            Arc::clone(&connection_manager),
            Arc::clone(&event_bus),
        ));
        let room_lifecycle = Arc::new(RoomLifecycle::new(
            Arc::clone(&event_bus),
            output_subscriber,
        ));

        let input_handler = WebsocketReceiveHandler::new(
            Arc::clone(&event_bus),
            Arc::clone(&connection_manager),
            room_lifecycle,
        );

        let setup = TestSetup {
            room_key: self.room_key,
            event_bus,
            mock_conn_manager,
            input_handler,
            room_service,
            game_service,
            players: self.players,
        };

        // Connect and join every player through the full command path
        for player in setup.players.clone() {
            setup.connect_and_join(&player).await;
        }

        setup
    }
}
