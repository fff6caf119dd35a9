use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::{parse_form_date, BookingForm, FormField};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern"))
}

/// Why a submission was refused: every field to highlight plus the one
/// message the guest sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub invalid_fields: Vec<FormField>,
    pub message: String,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Default)]
struct Report {
    invalid: Vec<FormField>,
    message: Option<String>,
}

impl Report {
    fn flag(&mut self, field: FormField) {
        if !self.invalid.contains(&field) {
            self.invalid.push(field);
        }
    }

    /// Later checks overwrite the message of earlier ones.
    fn fail(&mut self, field: FormField, message: impl Into<String>) {
        self.flag(field);
        self.message = Some(message.into());
    }
}

/// Checks run in a fixed order: required fields (only the first missing one
/// names itself), email, phone, then dates against `today`.
pub fn validate_booking_form(
    form: &BookingForm,
    today: NaiveDate,
) -> Result<(), ValidationFailure> {
    let mut report = Report::default();

    for field in FormField::REQUIRED {
        if form.value(field).trim().is_empty() {
            report.flag(field);
            if report.message.is_none() {
                report.message = Some(format!("Please fill in {}", field.label()));
            }
        }
    }

    if !form.email.is_empty() && !email_regex().is_match(&form.email) {
        report.fail(FormField::Email, "Please enter a valid email address");
    }

    if !form.phone.is_empty() {
        let digits: String = form.phone.chars().filter(|c| !c.is_whitespace()).collect();
        if !phone_regex().is_match(&digits) {
            report.fail(FormField::Phone, "Please enter a valid 10-digit phone number");
        }
    }

    if !form.checkin.is_empty() && !form.checkout.is_empty() {
        match (parse_form_date(&form.checkin), parse_form_date(&form.checkout)) {
            (Some(checkin), Some(checkout)) => {
                if checkin < today {
                    report.fail(FormField::Checkin, "Check-in date cannot be in the past");
                } else if checkout <= checkin {
                    report.fail(
                        FormField::Checkout,
                        "Check-out date must be after check-in date",
                    );
                }
            }
            (None, _) => report.fail(FormField::Checkin, "Please enter a valid check-in date"),
            (_, None) => report.fail(FormField::Checkout, "Please enter a valid check-out date"),
        }
    }

    match report.message {
        None if report.invalid.is_empty() => Ok(()),
        message => Err(ValidationFailure {
            invalid_fields: report.invalid,
            message: message.unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn valid_form() -> BookingForm {
        BookingForm {
            name: "Asha Verma".into(),
            phone: "98765 43210".into(),
            email: "asha@example.com".into(),
            checkin: "2024-03-02".into(),
            checkout: "2024-03-04".into(),
            roomtype: "ac-deluxe".into(),
            guests: "2".into(),
            message: String::new(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(validate_booking_form(&valid_form(), today()), Ok(()));
    }

    #[test]
    fn first_missing_field_names_the_message() {
        let form = BookingForm {
            name: "  ".into(),
            guests: String::new(),
            ..valid_form()
        };
        let err = validate_booking_form(&form, today()).unwrap_err();
        assert_eq!(err.message, "Please fill in full name");
        assert_eq!(err.invalid_fields, vec![FormField::Name, FormField::Guests]);
    }

    #[test]
    fn later_checks_replace_the_message() {
        let form = BookingForm {
            name: String::new(),
            email: "not-an-email".into(),
            phone: "12345".into(),
            ..valid_form()
        };
        let err = validate_booking_form(&form, today()).unwrap_err();
        assert_eq!(err.message, "Please enter a valid 10-digit phone number");
        assert_eq!(
            err.invalid_fields,
            vec![FormField::Name, FormField::Email, FormField::Phone]
        );
    }

    #[test]
    fn phone_accepts_only_ascii_digits() {
        for phone in ["९८७६५४३२१०", "９８７６５４３２１０", "98765-43210"] {
            let form = BookingForm {
                phone: phone.into(),
                ..valid_form()
            };
            let err = validate_booking_form(&form, today()).unwrap_err();
            assert_eq!(err.message, "Please enter a valid 10-digit phone number");
            assert_eq!(err.invalid_fields, vec![FormField::Phone]);
        }
    }

    #[test]
    fn checkout_must_follow_checkin() {
        let same_day = BookingForm {
            checkout: "2024-03-02".into(),
            ..valid_form()
        };
        let err = validate_booking_form(&same_day, today()).unwrap_err();
        assert_eq!(err.message, "Check-out date must be after check-in date");
        assert_eq!(err.invalid_fields, vec![FormField::Checkout]);
    }

    #[test]
    fn checkin_in_the_past_is_rejected_but_today_is_fine() {
        let past = BookingForm {
            checkin: "2024-02-29".into(),
            ..valid_form()
        };
        let err = validate_booking_form(&past, today()).unwrap_err();
        assert_eq!(err.message, "Check-in date cannot be in the past");

        let same_day = BookingForm {
            checkin: "2024-03-01".into(),
            ..valid_form()
        };
        assert!(validate_booking_form(&same_day, today()).is_ok());
    }
}
