use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::{
    models::{BookingRecord, BookingStatus, RoomType},
    notification::{Notification, NotificationKind},
    storage::{read_json_or_default, write_json, LocalStorage, BOOKINGS_KEY},
};

use super::{AdminError, AdminGate};

pub const SAMPLE_BOOKING_ID: &str = "BK1234567890";

const CSV_HEADER: &str =
    "Booking ID,Guest Name,Email,Phone,Room Type,Check-in,Check-out,Guests,Status,Special Requests";

/// Narrowing applied to the bookings table. Dates compare as `YYYY-MM-DD`
/// strings against the check-in date, both ends inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<String>,
    pub checkin_from: Option<String>,
    pub checkin_to: Option<String>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &BookingRecord) -> bool {
        if let Some(status) = self.status.as_deref().filter(|s| !s.eq_ignore_ascii_case("all")) {
            if booking.status.as_str().to_lowercase() != status.to_lowercase() {
                return false;
            }
        }
        if let Some(from) = self.checkin_from.as_deref().filter(|v| !v.is_empty()) {
            if booking.checkin.as_str() < from {
                return false;
            }
        }
        if let Some(to) = self.checkin_to.as_deref().filter(|v| !v.is_empty()) {
            if booking.checkin.as_str() > to {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, bookings: &[BookingRecord]) -> Vec<BookingRecord> {
        bookings
            .iter()
            .filter(|booking| self.matches(booking))
            .cloned()
            .collect()
    }

    /// True when no criterion narrows the list.
    pub fn is_empty(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case("all"))
            && self.checkin_from.as_deref().map_or(true, str::is_empty)
            && self.checkin_to.as_deref().map_or(true, str::is_empty)
    }
}

/// Label/value rows shown in the booking detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingDetails {
    pub rows: Vec<(String, String)>,
}

impl From<&BookingRecord> for BookingDetails {
    fn from(booking: &BookingRecord) -> Self {
        let mut rows = vec![
            ("Booking ID".to_string(), booking.id.clone()),
            ("Guest Name".to_string(), booking.name.clone()),
            ("Email".to_string(), booking.email.clone()),
            ("Phone".to_string(), booking.phone.clone()),
            ("Room Type".to_string(), booking.room_type.clone()),
            ("Check-in".to_string(), booking.checkin.clone()),
            ("Check-out".to_string(), booking.checkout.clone()),
            ("Number of Guests".to_string(), booking.guests.clone()),
            ("Status".to_string(), booking.status.label()),
        ];
        if !booking.message.is_empty() {
            rows.push(("Special Requests".to_string(), booking.message.clone()));
        }
        if let Some(submitted_at) = &booking.submitted_at {
            rows.push(("Submitted".to_string(), submitted_at.clone()));
        }
        Self { rows }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub bookings_count: usize,
    /// Percent of a nominal ten-room house, not capped at 100.
    pub occupancy_rate: u64,
}

impl DashboardStats {
    pub fn from_count(count: usize) -> Self {
        let occupancy_rate = if count == 0 {
            0
        } else {
            (count as f64 / 10.0 * 100.0).round() as u64
        };
        Self {
            bookings_count: count,
            occupancy_rate,
        }
    }
}

/// Reader/deleter side of the booking list. Every call re-reads storage; no
/// copy of the list is kept between calls.
#[derive(Clone)]
pub struct Dashboard<S: LocalStorage> {
    storage: S,
    gate: AdminGate<S>,
}

impl<S: LocalStorage> Dashboard<S> {
    pub fn new(storage: S, gate: AdminGate<S>) -> Self {
        Self { storage, gate }
    }

    async fn load(&self) -> Result<Vec<BookingRecord>, AdminError> {
        self.gate.require_login().await?;
        Ok(read_json_or_default(&self.storage, BOOKINGS_KEY).await?)
    }

    pub async fn list_bookings(&self) -> Result<Vec<BookingRecord>, AdminError> {
        self.load().await
    }

    pub async fn filter_bookings(
        &self,
        filter: &BookingFilter,
    ) -> Result<Vec<BookingRecord>, AdminError> {
        Ok(filter.apply(&self.load().await?))
    }

    pub async fn view_booking(&self, booking_id: &str) -> Result<BookingDetails, AdminError> {
        self.load()
            .await?
            .iter()
            .find(|booking| booking.id == booking_id)
            .map(BookingDetails::from)
            .ok_or_else(|| AdminError::BookingNotFound(booking_id.to_string()))
    }

    /// Removes every record carrying `booking_id` and rewrites the list.
    /// Returns how many records were removed.
    pub async fn delete_booking(&self, booking_id: &str) -> Result<usize, AdminError> {
        let bookings = self.load().await?;
        let before = bookings.len();
        let remaining: Vec<BookingRecord> = bookings
            .into_iter()
            .filter(|booking| booking.id != booking_id)
            .collect();
        let removed = before - remaining.len();

        if removed == 0 {
            return Err(AdminError::BookingNotFound(booking_id.to_string()));
        }

        write_json(&self.storage, BOOKINGS_KEY, &remaining).await?;
        info!("Deleted booking {booking_id}");
        Ok(removed)
    }

    pub async fn stats(&self) -> Result<DashboardStats, AdminError> {
        Ok(DashboardStats::from_count(self.load().await?.len()))
    }

    /// CSV of the whole list plus the suggested download name.
    pub async fn export_csv(&self, today: DateTime<Utc>) -> Result<(String, String), AdminError> {
        let bookings = self.load().await?;
        if bookings.is_empty() {
            return Err(AdminError::Invalid("No bookings to export".into()));
        }

        let file_name = format!("bookings_{}.csv", today.format("%Y-%m-%d"));
        Ok((file_name, bookings_to_csv(&bookings)))
    }

    /// Appends the demo booking unless a record with its id is present.
    /// Runs whenever the dashboard opens, before any login.
    pub async fn seed_sample_booking(&self, now: DateTime<Utc>) -> Result<bool, AdminError> {
        let mut bookings: Vec<BookingRecord> =
            read_json_or_default(&self.storage, BOOKINGS_KEY).await?;
        if bookings.iter().any(|booking| booking.id == SAMPLE_BOOKING_ID) {
            return Ok(false);
        }

        bookings.push(BookingRecord {
            id: SAMPLE_BOOKING_ID.into(),
            name: "John Doe".into(),
            email: "john.doe@example.com".into(),
            phone: "+91 98765 43210".into(),
            room_type: RoomType::AcDeluxe.display_label(),
            checkin: "2024-01-15".into(),
            checkout: "2024-01-17".into(),
            guests: "2".into(),
            message: "Early check-in preferred".into(),
            status: BookingStatus::Pending,
            timestamp: now.to_rfc3339(),
            submitted_at: None,
            extra: Default::default(),
        });
        write_json(&self.storage, BOOKINGS_KEY, &bookings).await?;
        info!("Sample booking added");
        Ok(true)
    }
}

pub fn delete_notification(removed: usize) -> Notification {
    let message = if removed > 1 {
        format!("{removed} bookings deleted successfully!")
    } else {
        "Booking deleted successfully!".to_string()
    };
    Notification::admin(NotificationKind::Success, message)
}

/// Fields are written as stored, comma-joined without quoting.
pub fn bookings_to_csv(bookings: &[BookingRecord]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for booking in bookings {
        let row = [
            booking.id.as_str(),
            &booking.name,
            &booking.email,
            &booking.phone,
            &booking.room_type,
            &booking.checkin,
            &booking.checkout,
            &booking.guests,
            booking.status.as_str(),
            &booking.message,
        ]
        .join(",");
        csv.push_str(&row);
        csv.push('\n');
    }
    csv
}
