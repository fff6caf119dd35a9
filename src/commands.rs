//! One function per user action. These are what a UI shell binds its events
//! to; errors come back as display strings.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use tokio::sync::mpsc;

use crate::{
    admin::{
        dashboard::delete_notification, AdminGate, BookingDetails, BookingFilter, BookingWatcher,
        Dashboard, DashboardStats, LoginForm, RefreshEvent, RoomEditor, RoomUpdate,
    },
    booking::{
        booking_summary, BookingDesk, BookingForm, BookingSummary, FormController, LinkOpener,
        PendingActions, SubmitError, Submission,
    },
    gallery::{self, GalleryReport},
    models::{BookingRecord, RoomDetails, RoomType},
    notification::{Notification, NotificationKind},
    settings::{AppSettings, SettingsStore},
    storage::{read_json_or_default, LocalStorage, StoredItem, BOOKINGS_KEY},
};

pub struct AppState<S: LocalStorage> {
    pub storage: S,
    pub settings: SettingsStore,
    pub form: FormController<S>,
    pub gate: AdminGate<S>,
    pub dashboard: Dashboard<S>,
    pub rooms: RoomEditor<S>,
}

impl<S: LocalStorage> AppState<S> {
    pub fn new(storage: S, settings: SettingsStore, opener: Arc<dyn LinkOpener>) -> Self {
        let current = settings.current();
        let desk = BookingDesk::new(storage.clone(), current.booking_config());
        let gate = AdminGate::new(storage.clone(), current.credentials());

        Self {
            form: FormController::new(desk, opener, current.link_delay(), current.reset_delay()),
            dashboard: Dashboard::new(storage.clone(), gate.clone()),
            rooms: RoomEditor::new(storage.clone(), gate.clone()),
            gate,
            storage,
            settings,
        }
    }
}

pub struct BookingOutcome {
    pub submission: Submission,
    pub notification: Notification,
    pub pending: PendingActions,
}

/// Resolves a room slug (`ac-deluxe`) to its display name; anything else is
/// taken as a name already.
pub fn room_name(input: &str) -> String {
    RoomType::from_slug(input)
        .map(|room| room.name().to_string())
        .unwrap_or_else(|| input.to_string())
}

pub fn quote_booking(form: &BookingForm) -> Option<BookingSummary> {
    booking_summary(&form.roomtype, &form.guests, &form.checkin, &form.checkout)
}

pub async fn submit_booking<S: LocalStorage>(
    state: &AppState<S>,
    form: BookingForm,
) -> Result<BookingOutcome, Notification> {
    state.form.fill(form).await;
    match state.form.submit().await {
        Ok((submission, notification, pending)) => Ok(BookingOutcome {
            submission,
            notification,
            pending,
        }),
        Err(SubmitError::Validation(failure)) => {
            Err(Notification::validation_error(failure.message))
        }
        Err(err) => Err(Notification::admin(NotificationKind::Error, err.to_string())),
    }
}

pub async fn admin_login<S: LocalStorage>(
    state: &AppState<S>,
    username: String,
    password: String,
) -> Result<Notification, String> {
    let mut form = LoginForm { username, password };
    state.gate.login(&mut form).await.map_err(|e| e.to_string())
}

pub async fn admin_logout<S: LocalStorage>(state: &AppState<S>) -> Result<(), String> {
    state
        .gate
        .logout(&mut LoginForm::default())
        .await
        .map_err(|e| e.to_string())
}

pub async fn is_admin_logged_in<S: LocalStorage>(state: &AppState<S>) -> Result<bool, String> {
    state.gate.is_logged_in().await.map_err(|e| e.to_string())
}

pub async fn list_bookings<S: LocalStorage>(
    state: &AppState<S>,
    filter: BookingFilter,
) -> Result<Vec<BookingRecord>, String> {
    state
        .dashboard
        .filter_bookings(&filter)
        .await
        .map_err(|e| e.to_string())
}

pub async fn view_booking<S: LocalStorage>(
    state: &AppState<S>,
    booking_id: String,
) -> Result<BookingDetails, String> {
    state
        .dashboard
        .view_booking(&booking_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_booking<S: LocalStorage>(
    state: &AppState<S>,
    booking_id: String,
) -> Result<Notification, String> {
    let removed = state
        .dashboard
        .delete_booking(&booking_id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(delete_notification(removed))
}

pub async fn get_stats<S: LocalStorage>(state: &AppState<S>) -> Result<DashboardStats, String> {
    state.dashboard.stats().await.map_err(|e| e.to_string())
}

/// Writes the CSV into `out_dir` and returns the file path.
pub async fn export_bookings<S: LocalStorage>(
    state: &AppState<S>,
    out_dir: &Path,
) -> Result<PathBuf, String> {
    let (file_name, csv) = state
        .dashboard
        .export_csv(Utc::now())
        .await
        .map_err(|e| e.to_string())?;

    fs::create_dir_all(out_dir).map_err(|e| e.to_string())?;
    let path = out_dir.join(file_name);
    fs::write(&path, csv).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(path)
}

pub async fn add_sample_booking<S: LocalStorage>(
    state: &AppState<S>,
) -> Result<Notification, String> {
    let added = state
        .dashboard
        .seed_sample_booking(Utc::now())
        .await
        .map_err(|e| e.to_string())?;

    Ok(if added {
        Notification::admin(NotificationKind::Success, "Sample booking added")
    } else {
        Notification::admin(NotificationKind::Info, "Sample booking already present")
    })
}

/// Starts polling for new bookings. The baseline is the current list
/// length, so only bookings made after this call are reported.
pub async fn watch_bookings<S: LocalStorage>(
    state: &AppState<S>,
) -> Result<(BookingWatcher, mpsc::Receiver<RefreshEvent>), String> {
    let baseline = state
        .dashboard
        .list_bookings()
        .await
        .map_err(|e| e.to_string())?
        .len();

    let mut watcher = BookingWatcher::new();
    let events = watcher
        .start(
            state.storage.clone(),
            state.settings.current().refresh_interval(),
            baseline,
        )
        .map_err(|e| e.to_string())?;
    Ok((watcher, events))
}

pub async fn get_room_details<S: LocalStorage>(
    state: &AppState<S>,
    room: String,
) -> Result<RoomDetails, String> {
    state
        .rooms
        .room_details(&room_name(&room))
        .await
        .map_err(|e| e.to_string())
}

pub async fn save_room_details<S: LocalStorage>(
    state: &AppState<S>,
    room: String,
    update: RoomUpdate,
) -> Result<Notification, String> {
    let (_, notification) = state
        .rooms
        .save_room_details(&room_name(&room), update, Utc::now())
        .await
        .map_err(|e| e.to_string())?;
    Ok(notification)
}

pub async fn list_storage_items<S: LocalStorage>(
    state: &AppState<S>,
) -> Result<Vec<StoredItem>, String> {
    state.storage.items().await.map_err(|e| e.to_string())
}

/// Booking count as the public side sees it; no login required.
pub async fn booking_count<S: LocalStorage>(state: &AppState<S>) -> Result<usize, String> {
    read_json_or_default::<_, Vec<BookingRecord>>(&state.storage, BOOKINGS_KEY)
        .await
        .map(|bookings| bookings.len())
        .map_err(|e| e.to_string())
}

pub fn get_settings<S: LocalStorage>(state: &AppState<S>) -> AppSettings {
    state.settings.current()
}

pub fn update_settings<S: LocalStorage, F>(
    state: &AppState<S>,
    change: F,
) -> Result<AppSettings, String>
where
    F: FnOnce(&mut AppSettings),
{
    state.settings.update(change).map_err(|e| e.to_string())
}

pub fn convert_gallery(images_dir: &Path, out_dir: &Path) -> Result<GalleryReport, String> {
    gallery::convert_gallery(images_dir, out_dir).map_err(|e| format!("{e:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Amenity, RoomAvailability},
        storage::MemoryStorage,
    };
    use chrono::{Duration as ChronoDuration, Local};
    use std::sync::Mutex;

    #[derive(Default)]
    struct NoopOpener {
        opened: Mutex<usize>,
    }

    impl LinkOpener for NoopOpener {
        fn open(&self, _url: &str) -> anyhow::Result<()> {
            *self.opened.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn state(name: &str) -> AppState<MemoryStorage> {
        let dir = std::env::temp_dir().join(format!(
            "shree-lodge-commands-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        let settings = SettingsStore::load_with_env(&dir, |_| None).unwrap();
        AppState::new(MemoryStorage::new(), settings, Arc::new(NoopOpener::default()))
    }

    fn valid_form() -> BookingForm {
        let checkin = Local::now().date_naive() + ChronoDuration::days(3);
        BookingForm {
            name: "Anita Sharma".into(),
            phone: "98765 43210".into(),
            email: "anita@example.com".into(),
            checkin: checkin.format("%Y-%m-%d").to_string(),
            checkout: (checkin + ChronoDuration::days(2)).format("%Y-%m-%d").to_string(),
            roomtype: "ac-deluxe".into(),
            guests: "2".into(),
            message: String::new(),
        }
    }

    #[test]
    fn room_slugs_resolve_to_names() {
        assert_eq!(room_name("non-ac-economy"), "Non-AC Economy Room");
        assert_eq!(room_name("Family Suite"), "Family Suite");
    }

    #[test]
    fn quote_needs_a_positive_stay() {
        let form = valid_form();
        let quote = quote_booking(&form).unwrap();
        assert_eq!(quote.total_amount, 3000);

        let same_day = BookingForm {
            checkout: form.checkin.clone(),
            ..form
        };
        assert!(quote_booking(&same_day).is_none());
    }

    #[tokio::test]
    async fn booking_then_admin_flow() {
        let state = state("flow");

        let outcome = submit_booking(&state, valid_form()).await.unwrap();
        outcome.pending.reset_form.abort();
        assert_eq!(booking_count(&state).await.unwrap(), 1);

        assert!(list_bookings(&state, BookingFilter::default()).await.is_err());
        let note = admin_login(&state, "kartik".into(), "kartik123".into())
            .await
            .unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert!(is_admin_logged_in(&state).await.unwrap());

        let id = outcome.submission.record.id.clone();
        let details = view_booking(&state, id.clone()).await.unwrap();
        assert_eq!(details.rows[0].1, id);

        let pending = BookingFilter {
            status: Some("PENDING".into()),
            ..Default::default()
        };
        assert_eq!(list_bookings(&state, pending).await.unwrap().len(), 1);
        assert_eq!(get_stats(&state).await.unwrap().occupancy_rate, 10);

        let deleted = delete_booking(&state, id.clone()).await.unwrap();
        assert_eq!(deleted.message, "Booking deleted successfully!");
        assert_eq!(
            view_booking(&state, id).await.unwrap_err(),
            "Booking not found"
        );

        admin_logout(&state).await.unwrap();
        assert!(!is_admin_logged_in(&state).await.unwrap());
    }

    #[tokio::test]
    async fn invalid_booking_returns_validation_notice() {
        let state = state("invalid");
        let form = BookingForm {
            phone: "12345".into(),
            ..valid_form()
        };
        let Err(notice) = submit_booking(&state, form).await else {
            panic!("expected a validation error");
        };
        assert_eq!(notice.title.as_deref(), Some("Validation Error"));
        assert_eq!(notice.message, "Please enter a valid 10-digit phone number");
        assert_eq!(booking_count(&state).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rooms_round_trip_through_slugs() {
        let state = state("rooms");
        admin_login(&state, "kartik".into(), "kartik123".into())
            .await
            .unwrap();

        let update = RoomUpdate {
            price: "2200".into(),
            capacity: "2".into(),
            status: RoomAvailability::Occupied,
            description: "Balcony view".into(),
            amenities: vec![Amenity::Ac, Amenity::MiniFridge],
        };
        let note = save_room_details(&state, "ac-premium".into(), update)
            .await
            .unwrap();
        assert_eq!(note.message, "AC Premium Room details updated successfully!");

        let details = get_room_details(&state, "AC Premium Room".into())
            .await
            .unwrap();
        assert_eq!(details.price, "2200");

        let keys: Vec<_> = list_storage_items(&state)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.key)
            .collect();
        assert!(keys.contains(&"room_AC Premium Room".to_string()));
    }

    #[tokio::test]
    async fn sample_booking_is_added_once_and_exported() {
        let state = state("sample");
        admin_login(&state, "kartik".into(), "kartik123".into())
            .await
            .unwrap();

        let out = std::env::temp_dir().join(format!("shree-lodge-export-{}", std::process::id()));
        assert_eq!(
            export_bookings(&state, &out).await.unwrap_err(),
            "No bookings to export"
        );

        assert_eq!(
            add_sample_booking(&state).await.unwrap().kind,
            NotificationKind::Success
        );
        assert_eq!(
            add_sample_booking(&state).await.unwrap().kind,
            NotificationKind::Info
        );

        let path = export_bookings(&state, &out).await.unwrap();
        let csv = fs::read_to_string(&path).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("BK1234567890,John Doe,"));
        fs::remove_dir_all(&out).unwrap();
    }
}
