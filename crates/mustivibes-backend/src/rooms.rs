use serde_json::json;

use mustivibes_types::models::Room;

use crate::client::{BackendClient, Service};
use crate::envelope;
use crate::error::BackendError;

/// A room ready to be sent to the backend; `start_date_time` is already in
/// the `DD-MM-YYYY hh:mm AM/PM` display format.
#[derive(Debug, Clone)]
pub struct NewRoom<'a> {
    pub admin_id: &'a str,
    pub kind: &'a str,
    pub tag: &'a str,
    pub duration: i64,
    pub start_date_time: &'a str,
}

impl BackendClient {
    /// `GET /users/create` on the social service lists rooms.
    pub async fn list_rooms(&self, token: &str) -> Result<Vec<Room>, BackendError> {
        let body = self.get(Service::Social, "users/create", token).await?;
        Ok(envelope::list(body, "rooms"))
    }

    /// `POST /users/create`.
    pub async fn create_room(&self, token: &str, room: &NewRoom<'_>) -> Result<Room, BackendError> {
        let body = self
            .post(
                Service::Social,
                "users/create",
                Some(token),
                &json!({
                    "adminId": room.admin_id,
                    "type": room.kind,
                    "tag": room.tag,
                    "duration": room.duration,
                    "startDateTime": room.start_date_time,
                }),
            )
            .await?;
        envelope::object(body, "room")
    }
}
