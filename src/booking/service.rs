use chrono::{DateTime, Local, Utc};
use log::info;
use thiserror::Error;

use crate::{
    models::{booking::room_type_name, BookingRecord, BookingStatus},
    storage::{read_json_or_default, write_json, LocalStorage, StorageError, BOOKINGS_KEY},
};

use super::{
    canonical_date, format_local_timestamp, generate_booking_id, validate_booking_form,
    whatsapp_message, whatsapp_url, BookingForm, ValidationFailure,
};

pub const DEFAULT_MAX_BOOKINGS: usize = 100;
pub const DEFAULT_WHATSAPP_NUMBER: &str = "919827637611";

#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub whatsapp_number: String,
    pub max_bookings: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.into(),
            max_bookings: DEFAULT_MAX_BOOKINGS,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(ValidationFailure),
    #[error("could not save booking: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub record: BookingRecord,
    pub whatsapp_url: String,
}

/// Writer side of the booking list.
#[derive(Clone)]
pub struct BookingDesk<S: LocalStorage> {
    storage: S,
    config: BookingConfig,
}

impl<S: LocalStorage> BookingDesk<S> {
    pub fn new(storage: S, config: BookingConfig) -> Self {
        Self { storage, config }
    }

    pub async fn submit(&self, form: &BookingForm) -> Result<Submission, SubmitError> {
        self.submit_at(form, Local::now()).await
    }

    /// Validate, record and build the chat link. Nothing is written when
    /// validation fails. Resubmitting the same form stores a second record.
    pub async fn submit_at(
        &self,
        form: &BookingForm,
        now: DateTime<Local>,
    ) -> Result<Submission, SubmitError> {
        validate_booking_form(form, now.date_naive()).map_err(SubmitError::Validation)?;

        let now_utc = now.with_timezone(&Utc);
        let record = BookingRecord {
            id: generate_booking_id(now_utc),
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            room_type: room_type_name(&form.roomtype),
            checkin: canonical_date(&form.checkin),
            checkout: canonical_date(&form.checkout),
            guests: form.guests.clone(),
            message: form.message.clone(),
            status: BookingStatus::Pending,
            timestamp: now_utc.to_rfc3339(),
            submitted_at: Some(format_local_timestamp(&now)),
            extra: Default::default(),
        };

        save_booking(&self.storage, record.clone(), self.config.max_bookings).await?;

        let message = whatsapp_message(&record, &now);
        let url = whatsapp_url(&self.config.whatsapp_number, &message);

        Ok(Submission {
            record,
            whatsapp_url: url,
        })
    }
}

/// Prepend `record` and keep only the newest `max_bookings` entries.
pub async fn save_booking<S: LocalStorage>(
    storage: &S,
    record: BookingRecord,
    max_bookings: usize,
) -> Result<String, StorageError> {
    let mut bookings: Vec<BookingRecord> = read_json_or_default(storage, BOOKINGS_KEY).await?;
    let id = record.id.clone();

    bookings.insert(0, record);
    bookings.truncate(max_bookings);

    write_json(storage, BOOKINGS_KEY, &bookings).await?;
    info!("Booking saved with ID: {id}");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        admin::BookingFilter,
        storage::{read_json, MemoryStorage},
    };
    use chrono::TimeZone;
    use regex::Regex;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()
    }

    fn form() -> BookingForm {
        BookingForm {
            name: "Meera Joshi".into(),
            phone: "9123456780".into(),
            email: "meera@example.com".into(),
            checkin: "2024-03-05".into(),
            checkout: "2024-03-07".into(),
            roomtype: "non-ac-standard".into(),
            guests: "3".into(),
            message: "Late arrival".into(),
        }
    }

    #[tokio::test]
    async fn valid_submission_adds_one_pending_record() {
        let storage = MemoryStorage::new();
        let desk = BookingDesk::new(storage.clone(), BookingConfig::default());

        let submission = desk.submit_at(&form(), now()).await.unwrap();
        let stored: Vec<BookingRecord> = read_json(&storage, BOOKINGS_KEY).await.unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], submission.record);
        assert_eq!(stored[0].status, BookingStatus::Pending);
        assert_eq!(stored[0].room_type, "Non-AC Standard Room - ₹800/night");
        assert!(Regex::new(r"^BK\d+$").unwrap().is_match(&stored[0].id));
        assert!(submission
            .whatsapp_url
            .starts_with("https://wa.me/919827637611?text="));
    }

    #[tokio::test]
    async fn rejected_submission_leaves_list_unchanged() {
        let storage = MemoryStorage::new();
        let desk = BookingDesk::new(storage.clone(), BookingConfig::default());
        desk.submit_at(&form(), now()).await.unwrap();

        let bad = BookingForm {
            checkout: "2024-03-05".into(),
            ..form()
        };
        let err = desk.submit_at(&bad, now()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));

        let stored: Vec<BookingRecord> = read_json(&storage, BOOKINGS_KEY).await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn list_is_capped_and_oldest_evicted() {
        let storage = MemoryStorage::new();
        let desk = BookingDesk::new(storage.clone(), BookingConfig::default());

        for i in 0..101 {
            let form = BookingForm {
                name: format!("Guest {i}"),
                ..form()
            };
            desk.submit_at(&form, now()).await.unwrap();
        }

        let stored: Vec<BookingRecord> = read_json(&storage, BOOKINGS_KEY).await.unwrap();
        assert_eq!(stored.len(), DEFAULT_MAX_BOOKINGS);
        assert_eq!(stored[0].name, "Guest 100");
        assert_eq!(stored[99].name, "Guest 1");
        assert!(stored.iter().all(|b| b.name != "Guest 0"));
    }

    #[tokio::test]
    async fn loose_dates_are_stored_zero_padded() {
        let storage = MemoryStorage::new();
        let desk = BookingDesk::new(storage.clone(), BookingConfig::default());
        let loose = BookingForm {
            checkin: "2024-3-5".into(),
            checkout: " 2024-03-07".into(),
            ..form()
        };
        let submission = desk.submit_at(&loose, now()).await.unwrap();
        assert_eq!(submission.record.checkin, "2024-03-05");
        assert_eq!(submission.record.checkout, "2024-03-07");

        let march = BookingFilter {
            checkin_from: Some("2024-03-01".into()),
            checkin_to: Some("2024-03-31".into()),
            ..Default::default()
        };
        let stored: Vec<BookingRecord> = read_json(&storage, BOOKINGS_KEY).await.unwrap();
        assert_eq!(march.apply(&stored).len(), 1);
    }

    #[tokio::test]
    async fn corrupt_list_aborts_submission() {
        let storage = MemoryStorage::new();
        storage.set_item(BOOKINGS_KEY, "{oops".into()).await.unwrap();
        let desk = BookingDesk::new(storage.clone(), BookingConfig::default());

        let err = desk.submit_at(&form(), now()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Storage(StorageError::Corrupt { .. })));
        assert_eq!(
            storage.get_item(BOOKINGS_KEY).await.unwrap().as_deref(),
            Some("{oops")
        );
    }
}
