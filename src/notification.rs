//! Transient messages shown to the guest or the owner after an action.

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: String,
    /// How long the message stays up before it dismisses itself.
    #[serde(skip)]
    pub visible_for: Duration,
}

impl Notification {
    pub fn booking_submitted(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: Some("Booking Submitted Successfully!".into()),
            message: message.into(),
            visible_for: Duration::from_secs(10),
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: Some("Validation Error".into()),
            message: message.into(),
            visible_for: Duration::from_secs(8),
        }
    }

    /// Untitled dashboard toast.
    pub fn admin(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: None,
            message: message.into(),
            visible_for: Duration::from_secs(3),
        }
    }
}
