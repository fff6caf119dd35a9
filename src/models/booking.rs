//! Booking records as the public site stores them under the `bookings` key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a booking request. Stored lowercase; anything else found in
/// storage is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Other(raw) => raw,
        }
    }

    /// Display form used by the dashboard: first letter upper-cased.
    pub fn label(&self) -> String {
        capitalize_first_letter(self.as_str())
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl From<String> for BookingStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => BookingStatus::Pending,
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Other(value),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn capitalize_first_letter(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The four rooms offered on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomType {
    AcDeluxe,
    AcPremium,
    NonAcStandard,
    NonAcEconomy,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [
        RoomType::AcDeluxe,
        RoomType::AcPremium,
        RoomType::NonAcStandard,
        RoomType::NonAcEconomy,
    ];

    /// Value submitted by the form's room select.
    pub fn slug(&self) -> &'static str {
        match self {
            RoomType::AcDeluxe => "ac-deluxe",
            RoomType::AcPremium => "ac-premium",
            RoomType::NonAcStandard => "non-ac-standard",
            RoomType::NonAcEconomy => "non-ac-economy",
        }
    }

    /// Room name without price; also the suffix of the room metadata key.
    pub fn name(&self) -> &'static str {
        match self {
            RoomType::AcDeluxe => "AC Deluxe Room",
            RoomType::AcPremium => "AC Premium Room",
            RoomType::NonAcStandard => "Non-AC Standard Room",
            RoomType::NonAcEconomy => "Non-AC Economy Room",
        }
    }

    pub fn price_per_night(&self) -> u32 {
        match self {
            RoomType::AcDeluxe => 1500,
            RoomType::AcPremium => 2000,
            RoomType::NonAcStandard => 800,
            RoomType::NonAcEconomy => 500,
        }
    }

    /// Name and nightly price as stored in a booking's `roomType`.
    pub fn display_label(&self) -> String {
        format!(
            "{} - ₹{}/night",
            self.name(),
            group_thousands(u64::from(self.price_per_night()))
        )
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|room| room.slug() == slug)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|room| room.name() == name)
    }
}

/// Label for a submitted room value; unknown values are returned as-is.
pub fn room_type_name(value: &str) -> String {
    RoomType::from_slug(value)
        .map(|room| room.display_label())
        .unwrap_or_else(|| value.to_string())
}

/// `1500` -> `1,500`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub room_type: String,
    pub checkin: String,
    pub checkout: String,
    pub guests: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: BookingStatus,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    /// Fields this version does not know about, kept so a rewrite of the list
    /// leaves other records byte-for-byte equivalent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_labels_carry_grouped_price() {
        assert_eq!(
            RoomType::AcDeluxe.display_label(),
            "AC Deluxe Room - ₹1,500/night"
        );
        assert_eq!(
            RoomType::NonAcEconomy.display_label(),
            "Non-AC Economy Room - ₹500/night"
        );
        assert_eq!(room_type_name("suite"), "suite");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn unknown_status_is_preserved() {
        let raw = r#"{"id":"BK1","name":"A","email":"a@b.c","phone":"1","roomType":"x",
            "checkin":"2024-01-01","checkout":"2024-01-02","guests":"1",
            "status":"Checked-In","timestamp":"t","notes":"vip"}"#;
        let record: BookingRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.status, BookingStatus::Other("Checked-In".into()));
        assert_eq!(record.message, "");
        assert_eq!(record.submitted_at, None);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["status"], "Checked-In");
        assert_eq!(back["notes"], "vip");
        assert!(back.get("submittedAt").is_none());
    }

    #[test]
    fn status_label_is_capitalized() {
        assert_eq!(BookingStatus::Pending.label(), "Pending");
        assert_eq!(capitalize_first_letter(""), "");
    }
}
