pub mod form;
pub mod id;
pub mod service;
pub mod summary;
pub mod validation;
pub mod whatsapp;

pub use form::{BookingForm, FormController, FormField, LinkOpener, PendingActions, SystemOpener};
pub use id::generate_booking_id;
pub use service::{BookingDesk, SubmitError, Submission};
pub use summary::{booking_summary, BookingSummary};
pub use validation::{validate_booking_form, ValidationFailure};
pub use whatsapp::{whatsapp_message, whatsapp_url};

use chrono::{DateTime, NaiveDate, TimeZone};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Dates are stored zero-padded so they order and compare as strings.
pub fn canonical_date(value: &str) -> String {
    parse_form_date(value)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Long date as the site prints it, e.g. `Monday, 15 January 2024`.
/// Unparsable input is returned unchanged.
pub fn format_long_date(value: &str) -> String {
    match parse_form_date(value) {
        Some(date) => date.format("%A, %-d %B %Y").to_string(),
        None => value.to_string(),
    }
}

/// `en-IN` style local timestamp, e.g. `15/1/2024, 3:04:05 pm`.
pub fn format_local_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-d/%-m/%Y, %-I:%M:%S %P").to_string()
}

/// Nights between two form dates; `None` if either is not a date.
pub fn nights_between(checkin: &str, checkout: &str) -> Option<i64> {
    let start = parse_form_date(checkin)?;
    let end = parse_form_date(checkout)?;
    Some((end - start).num_days())
}
