use std::{process::Command, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{notification::Notification, storage::LocalStorage};

use super::{BookingDesk, SubmitError, Submission};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// Raw values of the public booking form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub checkin: String,
    pub checkout: String,
    pub roomtype: String,
    pub guests: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Phone,
    Email,
    Checkin,
    Checkout,
    Roomtype,
    Guests,
    Message,
}

impl FormField {
    pub const REQUIRED: [FormField; 7] = [
        FormField::Name,
        FormField::Phone,
        FormField::Email,
        FormField::Checkin,
        FormField::Checkout,
        FormField::Roomtype,
        FormField::Guests,
    ];

    /// Lower-cased label used in "Please fill in ..." messages.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "full name",
            FormField::Phone => "phone number",
            FormField::Email => "email address",
            FormField::Checkin => "check-in date",
            FormField::Checkout => "check-out date",
            FormField::Roomtype => "room type",
            FormField::Guests => "number of guests",
            FormField::Message => "special requests",
        }
    }
}

impl BookingForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::Email => &self.email,
            FormField::Checkin => &self.checkin,
            FormField::Checkout => &self.checkout,
            FormField::Roomtype => &self.roomtype,
            FormField::Guests => &self.guests,
            FormField::Message => &self.message,
        }
    }

    pub fn reset(&mut self) {
        *self = BookingForm::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == BookingForm::default()
    }
}

/// Opens the chat link for the guest.
pub trait LinkOpener: Send + Sync + 'static {
    fn open(&self, url: &str) -> Result<()>;
}

/// Hands the link to the desktop's default handler.
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]);
            cmd
        } else {
            Command::new("xdg-open")
        };

        command
            .arg(url)
            .spawn()
            .with_context(|| "failed to launch the system link handler")?;
        Ok(())
    }
}

/// Follow-up work scheduled by a successful submission.
pub struct PendingActions {
    pub open_link: JoinHandle<()>,
    pub reset_form: JoinHandle<()>,
}

#[derive(Clone)]
pub struct FormController<S: LocalStorage> {
    form: Arc<Mutex<BookingForm>>,
    desk: BookingDesk<S>,
    opener: Arc<dyn LinkOpener>,
    link_delay: Duration,
    reset_delay: Duration,
}

impl<S: LocalStorage> FormController<S> {
    pub fn new(
        desk: BookingDesk<S>,
        opener: Arc<dyn LinkOpener>,
        link_delay: Duration,
        reset_delay: Duration,
    ) -> Self {
        Self {
            form: Arc::new(Mutex::new(BookingForm::default())),
            desk,
            opener,
            link_delay,
            reset_delay,
        }
    }

    pub async fn fill(&self, values: BookingForm) {
        *self.form.lock().await = values;
    }

    pub async fn snapshot(&self) -> BookingForm {
        self.form.lock().await.clone()
    }

    /// Submit the current form. On success the chat link opens after the
    /// link delay and the form clears after the reset delay; on failure the
    /// form is left as typed.
    pub async fn submit(
        &self,
    ) -> Result<(Submission, Notification, PendingActions), SubmitError> {
        let values = self.snapshot().await;
        let submission = self.desk.submit(&values).await?;

        let notification = Notification::booking_submitted(
            "Booking request submitted successfully! Redirecting to WhatsApp for confirmation...",
        );

        let open_link = {
            let opener = Arc::clone(&self.opener);
            let url = submission.whatsapp_url.clone();
            let delay = self.link_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                match opener.open(&url) {
                    Ok(()) => log_info!("Opened WhatsApp link"),
                    Err(err) => log_error!("Could not open WhatsApp link: {err:?}"),
                }
            })
        };

        let reset_form = {
            let form = Arc::clone(&self.form);
            let delay = self.reset_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                form.lock().await.reset();
            })
        };

        Ok((
            submission,
            notification,
            PendingActions {
                open_link,
                reset_form,
            },
        ))
    }
}
