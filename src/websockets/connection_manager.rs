use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use tracing::warn;

/// Transport bookkeeping: outbound queues per connection, plus which room
/// each connection has joined. Fan-out runs off these tables alone and never
/// consults room state.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>);

    /// Drops the connection's outbound queue and its room binding.
    async fn remove_connection(&self, connection_id: &str);

    /// Binds a connection to a room. Idempotent for the same room; refused
    /// when the connection is already bound to a different room.
    async fn bind_room(&self, connection_id: &str, room_key: &str) -> bool;

    async fn unbind_room(&self, connection_id: &str);

    /// Room the connection is currently bound to, if any.
    async fn room_of(&self, connection_id: &str) -> Option<String>;

    async fn send_to_connection(&self, connection_id: &str, message: &str);

    /// Enqueues the frame for every connection bound to the room. A slow
    /// client's queue grows; it never holds the others back.
    async fn broadcast_to_room(&self, room_key: &str, message: &str);
}

#[derive(Default)]
struct ConnectionTable {
    // connection id -> outbound queue
    senders: HashMap<String, mpsc::UnboundedSender<String>>,
    // connection id -> room key
    membership: HashMap<String, String>,
    // room key -> connection ids in bind order
    rooms: HashMap<String, Vec<String>>,
}

pub struct InMemoryConnectionManager {
    table: RwLock<ConnectionTable>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(ConnectionTable::default()),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut table = self.table.write().await;
        table.senders.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &str) {
        let mut table = self.table.write().await;
        table.senders.remove(connection_id);
        if let Some(room_key) = table.membership.remove(connection_id) {
            if let Some(members) = table.rooms.get_mut(&room_key) {
                members.retain(|id| id != connection_id);
                if members.is_empty() {
                    table.rooms.remove(&room_key);
                }
            }
        }
    }

    async fn bind_room(&self, connection_id: &str, room_key: &str) -> bool {
        let mut table = self.table.write().await;
        match table.membership.get(connection_id) {
            Some(bound) if bound == room_key => true,
            Some(bound) => {
                warn!(
                    connection_id = %connection_id,
                    bound_room = %bound,
                    requested_room = %room_key,
                    "Connection is already bound to another room"
                );
                false
            }
            None => {
                table
                    .membership
                    .insert(connection_id.to_string(), room_key.to_string());
                table
                    .rooms
                    .entry(room_key.to_string())
                    .or_default()
                    .push(connection_id.to_string());
                true
            }
        }
    }

    async fn unbind_room(&self, connection_id: &str) {
        let mut table = self.table.write().await;
        if let Some(room_key) = table.membership.remove(connection_id) {
            if let Some(members) = table.rooms.get_mut(&room_key) {
                members.retain(|id| id != connection_id);
                if members.is_empty() {
                    table.rooms.remove(&room_key);
                }
            }
        }
    }

    async fn room_of(&self, connection_id: &str) -> Option<String> {
        let table = self.table.read().await;
        table.membership.get(connection_id).cloned()
    }

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        let table = self.table.read().await;
        if let Some(sender) = table.senders.get(connection_id) {
            let _ = sender.send(message.to_string());
        }
    }

    async fn broadcast_to_room(&self, room_key: &str, message: &str) {
        let table = self.table.read().await;
        if let Some(members) = table.rooms.get(room_key) {
            for connection_id in members {
                if let Some(sender) = table.senders.get(connection_id) {
                    let _ = sender.send(message.to_string());
                }
            }
        }
    }
}
