//! Per-room metadata edited from the admin dashboard.

use serde::{Deserialize, Serialize};

use super::RoomType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RoomAvailability {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

impl RoomAvailability {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomAvailability::Available => "available",
            RoomAvailability::Occupied => "occupied",
            RoomAvailability::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Amenity {
    #[serde(rename = "AC")]
    #[value(name = "ac")]
    Ac,
    #[serde(rename = "TV")]
    #[value(name = "tv")]
    Tv,
    #[serde(rename = "WiFi")]
    #[value(name = "wifi")]
    WiFi,
    #[serde(rename = "Attached Bathroom")]
    #[value(name = "bathroom")]
    AttachedBathroom,
    #[serde(rename = "Mini Fridge")]
    #[value(name = "fridge")]
    MiniFridge,
    #[serde(rename = "Ceiling Fan")]
    #[value(name = "fan")]
    CeilingFan,
}

impl Amenity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Ac => "AC",
            Amenity::Tv => "TV",
            Amenity::WiFi => "WiFi",
            Amenity::AttachedBathroom => "Attached Bathroom",
            Amenity::MiniFridge => "Mini Fridge",
            Amenity::CeilingFan => "Ceiling Fan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    pub price: String,
    pub capacity: String,
    #[serde(default)]
    pub status: RoomAvailability,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl RoomDetails {
    /// Built-in details shown until the owner saves their own.
    pub fn defaults_for(room: RoomType) -> Self {
        use Amenity::*;

        let (capacity, description, amenities) = match room {
            RoomType::AcDeluxe => (
                "2",
                "Comfortable AC room with modern amenities",
                vec![Ac, Tv, WiFi, AttachedBathroom],
            ),
            RoomType::AcPremium => (
                "2",
                "Premium AC room with luxury features",
                vec![Ac, Tv, WiFi, AttachedBathroom, MiniFridge],
            ),
            RoomType::NonAcStandard => (
                "2",
                "Standard non-AC room with basic amenities",
                vec![CeilingFan, Tv, WiFi, AttachedBathroom],
            ),
            RoomType::NonAcEconomy => (
                "1",
                "Economy room with essential facilities",
                vec![CeilingFan, WiFi, AttachedBathroom],
            ),
        };

        Self {
            room_type: None,
            price: room.price_per_night().to_string(),
            capacity: capacity.to_string(),
            status: RoomAvailability::Available,
            description: description.to_string(),
            amenities,
            last_updated: None,
        }
    }

    /// Details for a room name with no built-in defaults.
    pub fn blank() -> Self {
        Self {
            room_type: None,
            price: String::new(),
            capacity: "2".to_string(),
            status: RoomAvailability::Available,
            description: String::new(),
            amenities: Vec::new(),
            last_updated: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amenities_serialize_with_display_names() {
        let details = RoomDetails::defaults_for(RoomType::AcPremium);
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["price"], "2000");
        assert_eq!(json["status"], "available");
        assert_eq!(json["amenities"][3], "Attached Bathroom");
        assert_eq!(json["amenities"][4], "Mini Fridge");
        assert!(json.get("roomType").is_none());
    }
}
