use serde::Serialize;

use crate::models::{
    booking::{group_thousands, room_type_name},
    RoomType,
};

use super::{format_long_date, nights_between};

/// Price quote shown beside the form while the guest fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub room_type: String,
    pub guests: String,
    pub checkin: String,
    pub checkout: String,
    pub nights: i64,
    pub price_per_night: u32,
    pub total_amount: u64,
}

impl BookingSummary {
    pub fn guests_label(&self) -> String {
        let plural = self.guests.trim().parse::<u32>().map(|n| n > 1).unwrap_or(false);
        format!("{} Guest{}", self.guests, if plural { "s" } else { "" })
    }

    pub fn nights_label(&self) -> String {
        format!("{} Night{}", self.nights, if self.nights > 1 { "s" } else { "" })
    }

    pub fn total_label(&self) -> String {
        format!("₹{}", group_thousands(self.total_amount))
    }
}

/// `None` (summary hidden) until all four inputs are filled and the stay is
/// at least one night. An unknown room prices at zero.
pub fn booking_summary(
    roomtype: &str,
    guests: &str,
    checkin: &str,
    checkout: &str,
) -> Option<BookingSummary> {
    if [roomtype, guests, checkin, checkout]
        .iter()
        .any(|value| value.is_empty())
    {
        return None;
    }

    let nights = nights_between(checkin, checkout).filter(|n| *n > 0)?;
    let price_per_night = RoomType::from_slug(roomtype)
        .map(|room| room.price_per_night())
        .unwrap_or(0);
    let total_amount = u64::from(price_per_night) * nights.unsigned_abs();

    Some(BookingSummary {
        room_type: room_type_name(roomtype),
        guests: guests.to_string(),
        checkin: format_long_date(checkin),
        checkout: format_long_date(checkout),
        nights,
        price_per_night,
        total_amount,
    })
}
