use chrono::{DateTime, Utc};
use log::info;

use crate::{
    models::{Amenity, RoomAvailability, RoomDetails, RoomType},
    notification::{Notification, NotificationKind},
    storage::{read_json, room_key, write_json, LocalStorage, StorageError},
};

use super::{AdminError, AdminGate};

/// Values from the room edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomUpdate {
    pub price: String,
    pub capacity: String,
    pub status: RoomAvailability,
    pub description: String,
    pub amenities: Vec<Amenity>,
}

/// Each room's metadata lives under its own `room_<name>` key and is
/// replaced wholesale on save.
#[derive(Clone)]
pub struct RoomEditor<S: LocalStorage> {
    storage: S,
    gate: AdminGate<S>,
}

impl<S: LocalStorage> RoomEditor<S> {
    pub fn new(storage: S, gate: AdminGate<S>) -> Self {
        Self { storage, gate }
    }

    /// Stored details, else the built-in defaults for that room name.
    pub async fn room_details(&self, room_name: &str) -> Result<RoomDetails, AdminError> {
        self.gate.require_login().await?;
        match read_json(&self.storage, &room_key(room_name)).await {
            Ok(details) => Ok(details),
            Err(StorageError::NotFound { .. }) => Ok(RoomType::from_name(room_name)
                .map(RoomDetails::defaults_for)
                .unwrap_or_else(RoomDetails::blank)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn save_room_details(
        &self,
        room_name: &str,
        update: RoomUpdate,
        now: DateTime<Utc>,
    ) -> Result<(RoomDetails, Notification), AdminError> {
        self.gate.require_login().await?;

        if update.price.trim().is_empty() || update.description.trim().is_empty() {
            return Err(AdminError::Invalid(
                "Please fill in all required fields".into(),
            ));
        }

        let mut amenities = Vec::with_capacity(update.amenities.len());
        for amenity in update.amenities {
            if !amenities.contains(&amenity) {
                amenities.push(amenity);
            }
        }

        let details = RoomDetails {
            room_type: Some(room_name.to_string()),
            price: update.price,
            capacity: update.capacity,
            status: update.status,
            description: update.description,
            amenities,
            last_updated: Some(now.to_rfc3339()),
        };

        write_json(&self.storage, &room_key(room_name), &details).await?;
        info!("Saved room details for {room_name}");

        let notification = Notification::admin(
            NotificationKind::Success,
            format!("{room_name} details updated successfully!"),
        );
        Ok((details, notification))
    }
}
