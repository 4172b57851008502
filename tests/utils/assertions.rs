//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json;

use liarsgame::websockets::{MessageType, WebSocketMessage};

use super::setup::{conn_id, TestSetup};

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    players: Vec<&'a str>, // display names
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for all players in the setup
    pub fn for_all_players(setup: &'a TestSetup) -> Self {
        let players = setup.players.iter().map(|s| s.as_str()).collect();
        Self { setup, players }
    }

    /// Create an assertion for specific players
    pub fn for_players(setup: &'a TestSetup, players: Vec<&'a str>) -> Self {
        Self { setup, players }
    }

    /// Assert that players received a specific message type (consumes the message from queue)
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for player in &self.players {
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(&conn_id(player))
                .await;
            assert!(
                message.is_some(),
                "{} should have received a message",
                player
            );

            let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type",
                player
            );
            messages.push(msg);
        }

        // YOUR_ROLE payloads differ per player, so only the first is inspected.
        // For other message types, verify all players saw the same payload.
        if messages.len() > 1 && expected_type != MessageType::YourRole {
            let first_payload = &messages[0].payload;
            for (i, msg) in messages.iter().enumerate().skip(1) {
                assert_eq!(
                    &msg.payload, first_payload,
                    "Player {} payload differs from player {}",
                    self.players[i], self.players[0]
                );
            }
        }

        MessageContent {
            payload: messages[0].payload.clone(),
        }
    }

    /// Assert that players received no messages
    pub async fn received_no_messages(self) {
        for player in &self.players {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(&conn_id(player))
                .await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                player,
                messages
            );
        }
    }

    /// Count how many messages of a specific type a player received (non-consuming)
    pub async fn count_message_type(&self, player: &str, msg_type: MessageType) -> usize {
        let messages = self
            .setup
            .mock_conn_manager
            .get_messages_for(&conn_id(player))
            .await;
        messages
            .iter()
            .filter_map(|msg_str| serde_json::from_str::<WebSocketMessage>(msg_str).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }

    /// Assert that players received a sequence of message types in order
    pub async fn received_message_sequence(
        self,
        expected_types: Vec<MessageType>,
    ) -> Vec<MessageContent> {
        let mut result_messages = vec![];

        for player in &self.players {
            let player_messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(&conn_id(player))
                .await;
            assert!(
                player_messages.len() >= expected_types.len(),
                "{} should have received {} messages, but only got {}",
                player,
                expected_types.len(),
                player_messages.len()
            );

            // Check each expected message type in order
            for (i, expected_type) in expected_types.iter().enumerate() {
                let msg: WebSocketMessage = serde_json::from_str(&player_messages[i])
                    .unwrap_or_else(|e| {
                        panic!("Failed to parse message {} for {}: {}", i, player, e)
                    });

                assert_eq!(
                    msg.message_type, *expected_type,
                    "{} message {} has wrong type: expected {:?}, got {:?}",
                    player, i, expected_type, msg.message_type
                );

                // Only collect messages from the first player to avoid duplicates
                if player == &self.players[0] {
                    result_messages.push(MessageContent {
                        payload: msg.payload,
                    });
                }
            }
        }

        result_messages
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    payload: serde_json::Value,
}

impl MessageContent {
    /// Assert the announcement text of a MESSAGE
    pub fn with_text(self, expected_text: &str) -> Self {
        assert_eq!(self.payload["text"], expected_text);
        self
    }

    /// Assert the sender of a chat broadcast
    pub fn with_display_name(self, expected_name: &str) -> Self {
        assert_eq!(self.payload["display_name"], expected_name);
        self
    }

    /// Assert the body of a chat broadcast
    pub fn with_message(self, expected_message: &str) -> Self {
        assert_eq!(self.payload["message"], expected_message);
        self
    }

    /// Assert the stage of a STAGE_CHANGE
    pub fn with_stage(self, expected_stage: &str) -> Self {
        assert_eq!(self.payload["stage"], expected_stage);
        self
    }

    /// Assert the target of a VOTE_RESULT
    pub fn with_target(self, expected_target: &str) -> Self {
        assert_eq!(self.payload["target"], expected_target);
        self
    }

    /// Assert the tally of a VOTE_RESULT
    pub fn with_votes(self, expected_votes: u32) -> Self {
        assert_eq!(self.payload["votes"], expected_votes);
        self
    }

    /// Assert the announcement of a FINAL_RESULT
    pub fn with_announcement(self, expected_announcement: &str) -> Self {
        assert_eq!(self.payload["announcement"], expected_announcement);
        self
    }

    /// Assert the turn index of an UPDATE_TURN
    pub fn with_turn_index(self, expected_turn_index: u32) -> Self {
        assert_eq!(self.payload["turn_index"], expected_turn_index);
        self
    }

    /// Assert the countdown of an UPDATE_TURN
    pub fn with_countdown(self, expected_countdown: u32) -> Self {
        assert_eq!(self.payload["countdown"], expected_countdown);
        self
    }

    /// Assert the host of an UPDATE_HOST
    pub fn with_host_id(self, expected_host_id: &str) -> Self {
        assert_eq!(self.payload["host_id"], expected_host_id);
        self
    }

    /// Assert how many members an UPDATE_USERS carries
    pub fn with_users_count(self, expected_count: usize) -> Self {
        let users = self.payload["users"]
            .as_array()
            .expect("users should be an array");
        assert_eq!(users.len(), expected_count);
        self
    }

    /// Assert the member names of an UPDATE_USERS, in join order
    pub fn with_user_names(self, expected_names: Vec<&str>) -> Self {
        let users = self.payload["users"]
            .as_array()
            .expect("users should be an array");
        let actual_names: Vec<&str> = users
            .iter()
            .map(|u| u["display_name"].as_str().unwrap())
            .collect();
        assert_eq!(actual_names, expected_names);
        self
    }
}
