use crate::{
    event::RoomEventError,
    room::{models::RoomModel, RoomService},
};
use std::sync::Arc;

pub struct RoomQueryUtils;

impl RoomQueryUtils {
    /// Fetches the room if it still exists. A missing room is not an error;
    /// handlers treat it as "nothing to notify".
    pub async fn get_room_if_exists(
        room_service: &Arc<RoomService>,
        room_key: &str,
    ) -> Result<Option<RoomModel>, RoomEventError> {
        room_service
            .get_room(room_key)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to get room: {}", e)))
    }
}
