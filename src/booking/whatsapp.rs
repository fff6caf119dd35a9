//! Chat link handed to the guest after a booking is saved.
//!
//! The owner confirms bookings by hand from these messages, so the section
//! order and labels below are part of the contract.

use chrono::{DateTime, TimeZone};

use crate::models::BookingRecord;

use super::{format_local_timestamp, format_long_date, nights_between};

pub const HOTEL_NAME: &str = "Shree Agrawal Yaatri Grah & Lodge";

pub fn whatsapp_message<Tz: TimeZone>(record: &BookingRecord, submitted: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let nights = nights_between(&record.checkin, &record.checkout).unwrap_or(0);
    let mut lines = vec![
        format!("🏨 *NEW BOOKING REQUEST - {HOTEL_NAME}*"),
        String::new(),
        format!("🆔 *Booking ID:* {}", record.id),
        String::new(),
        "👤 *Guest Details:*".to_string(),
        format!("• Name: {}", record.name),
        format!("• Phone: {}", record.phone),
        format!("• Email: {}", record.email),
        String::new(),
        "📅 *Booking Details:*".to_string(),
        format!("• Check-in: {}", format_long_date(&record.checkin)),
        format!("• Check-out: {}", format_long_date(&record.checkout)),
        format!(
            "• Duration: {nights} night{}",
            if nights > 1 { "s" } else { "" }
        ),
        format!("• Room Type: {}", record.room_type),
        format!("• Number of Guests: {}", record.guests),
        String::new(),
    ];

    // The requests slot stays in the text as a blank line when unused.
    if record.message.is_empty() {
        lines.push(String::new());
    } else {
        lines.push(format!("📝 *Special Requests:*\n{}", record.message));
    }
    lines.push(String::new());

    lines.push(format!(
        "⏰ *Submitted:* {}",
        format_local_timestamp(submitted)
    ));
    lines.push(String::new());
    lines.push(
        "Please confirm availability and provide booking confirmation. Thank you!".to_string(),
    );

    lines.join("\n")
}

/// Escapes form encoding applies that a URI component leaves alone. A `+`
/// in form output is always a space; literal pluses come out as `%2B`.
const URI_COMPONENT_LITERALS: [(&str, &str); 6] = [
    ("+", "%20"),
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%7E", "~"),
];

/// Percent-encodes `value` the way a browser's `encodeURIComponent` does.
pub fn encode_uri_component(value: &str) -> String {
    let form = serde_urlencoded::to_string([("", value)]).unwrap_or_default();
    let mut encoded = form.strip_prefix('=').unwrap_or(&form).to_string();
    for (from, to) in URI_COMPONENT_LITERALS {
        encoded = encoded.replace(from, to);
    }
    encoded
}

/// `https://wa.me/<number>?text=<message>`.
pub fn whatsapp_url(number: &str, message: &str) -> String {
    format!("https://wa.me/{number}?text={}", encode_uri_component(message))
}
