//! Background re-read of the booking list while the dashboard is open.
//!
//! New bookings are detected by comparing list lengths between polls, so a
//! delete plus an add between two polls goes unnoticed.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

use crate::{
    models::BookingRecord,
    notification::{Notification, NotificationKind},
    storage::{read_json_or_default, LocalStorage, BOOKINGS_KEY},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct RefreshEvent {
    pub new_bookings: usize,
    pub bookings: Vec<BookingRecord>,
}

impl RefreshEvent {
    pub fn notification(&self) -> Notification {
        let plural = if self.new_bookings > 1 { "s" } else { "" };
        Notification::admin(
            NotificationKind::Success,
            format!("New booking{plural} received!"),
        )
    }
}

/// How many bookings appeared since the last poll, if any.
pub fn detect_new_bookings(last_count: usize, current_count: usize) -> Option<usize> {
    current_count
        .checked_sub(last_count)
        .filter(|added| *added > 0)
}

pub async fn refresh_loop<S: LocalStorage>(
    storage: S,
    interval: Duration,
    mut last_count: usize,
    events: mpsc::Sender<RefreshEvent>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the baseline is already known.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let bookings: Vec<BookingRecord> =
                    match read_json_or_default(&storage, BOOKINGS_KEY).await {
                        Ok(bookings) => bookings,
                        Err(err) => {
                            log_warn!("booking refresh failed: {err}");
                            continue;
                        }
                    };

                let current_count = bookings.len();
                if let Some(new_bookings) = detect_new_bookings(last_count, current_count) {
                    log_info!("{new_bookings} new booking(s) detected");
                    if events.send(RefreshEvent { new_bookings, bookings }).await.is_err() {
                        log_info!("refresh listener dropped; stopping");
                        break;
                    }
                } else {
                    log_debug!("no new bookings ({current_count} stored)");
                }
                last_count = current_count;
            }
            _ = cancel_token.cancelled() => {
                log_info!("booking refresh shutting down");
                break;
            }
        }
    }
}

/// Owns the refresh task for one dashboard session.
#[derive(Default)]
pub struct BookingWatcher {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl BookingWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start<S: LocalStorage>(
        &mut self,
        storage: S,
        interval: Duration,
        baseline_count: usize,
    ) -> Result<mpsc::Receiver<RefreshEvent>> {
        if self.handle.is_some() {
            bail!("booking refresh already running");
        }

        let cancel_token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(refresh_loop(
            storage,
            interval,
            baseline_count,
            tx,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(rx)
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("booking refresh task failed to join")
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        booking::service::save_booking,
        models::BookingStatus,
        storage::MemoryStorage,
    };

    fn record(id: &str) -> BookingRecord {
        BookingRecord {
            id: id.into(),
            name: "Guest".into(),
            email: "g@example.com".into(),
            phone: "9876543210".into(),
            room_type: "AC Deluxe Room - ₹1,500/night".into(),
            checkin: "2024-05-01".into(),
            checkout: "2024-05-02".into(),
            guests: "1".into(),
            message: String::new(),
            status: BookingStatus::Pending,
            timestamp: "2024-04-01T00:00:00+00:00".into(),
            submitted_at: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn only_growth_counts_as_new() {
        assert_eq!(detect_new_bookings(2, 5), Some(3));
        assert_eq!(detect_new_bookings(5, 5), None);
        assert_eq!(detect_new_bookings(5, 3), None);
    }

    #[test]
    fn notification_pluralizes() {
        let one = RefreshEvent { new_bookings: 1, bookings: vec![] };
        let two = RefreshEvent { new_bookings: 2, bookings: vec![] };
        assert_eq!(one.notification().message, "New booking received!");
        assert_eq!(two.notification().message, "New bookings received!");
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_reports_additions_and_stops() {
        let storage = MemoryStorage::new();
        save_booking(&storage, record("BK1"), 100).await.unwrap();

        let mut watcher = BookingWatcher::new();
        let mut events = watcher
            .start(storage.clone(), DEFAULT_REFRESH_INTERVAL, 1)
            .unwrap();
        assert!(watcher.is_running());
        assert!(watcher
            .start(storage.clone(), DEFAULT_REFRESH_INTERVAL, 1)
            .is_err());

        save_booking(&storage, record("BK2"), 100).await.unwrap();
        save_booking(&storage, record("BK3"), 100).await.unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.new_bookings, 2);
        assert_eq!(event.bookings.len(), 3);
        assert_eq!(event.bookings[0].id, "BK3");

        watcher.stop().await.unwrap();
        assert!(!watcher.is_running());
        assert!(events.recv().await.is_none());
    }
}
