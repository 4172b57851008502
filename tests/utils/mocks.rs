use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use liarsgame::websockets::ConnectionManager;

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Connection manager that records every frame instead of writing to sockets.
/// Room bindings behave like the real one so broadcasts fan out to the right
/// recordings.
#[derive(Clone)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, Vec<String>>>>,
    // connection id -> room key
    membership: Arc<RwLock<HashMap<String, String>>>,
    // room key -> connection ids in bind order
    rooms: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
            membership: Arc::new(RwLock::new(HashMap::new())),
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get_messages_for(&self, connection_id: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(connection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Pops the oldest recorded frame for the connection, if any.
    pub async fn consume_message_for(&self, connection_id: &str) -> Option<String> {
        let mut messages = self.sent_messages.write().await;
        let queue = messages.get_mut(connection_id)?;
        if queue.is_empty() {
            None
        } else {
            Some(queue.remove(0))
        }
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, connection_id: String, _sender: mpsc::UnboundedSender<String>) {
        self.sent_messages
            .write()
            .await
            .entry(connection_id)
            .or_default();
    }

    async fn remove_connection(&self, connection_id: &str) {
        self.unbind_room(connection_id).await;
    }

    async fn bind_room(&self, connection_id: &str, room_key: &str) -> bool {
        let mut membership = self.membership.write().await;
        match membership.get(connection_id) {
            Some(bound) if bound == room_key => true,
            Some(_) => false,
            None => {
                membership.insert(connection_id.to_string(), room_key.to_string());
                self.rooms
                    .write()
                    .await
                    .entry(room_key.to_string())
                    .or_default()
                    .push(connection_id.to_string());
                true
            }
        }
    }

    async fn unbind_room(&self, connection_id: &str) {
        let mut membership = self.membership.write().await;
        if let Some(room_key) = membership.remove(connection_id) {
            let mut rooms = self.rooms.write().await;
            if let Some(members) = rooms.get_mut(&room_key) {
                members.retain(|id| id != connection_id);
                if members.is_empty() {
                    rooms.remove(&room_key);
                }
            }
        }
    }

    async fn room_of(&self, connection_id: &str) -> Option<String> {
        self.membership.read().await.get(connection_id).cloned()
    }

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(connection_id.to_string())
            .or_default()
            .push(message.to_string());
    }

    async fn broadcast_to_room(&self, room_key: &str, message: &str) {
        let members = self
            .rooms
            .read()
            .await
            .get(room_key)
            .cloned()
            .unwrap_or_default();
        for connection_id in members {
            self.send_to_connection(&connection_id, message).await;
        }
    }
}
