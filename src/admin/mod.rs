pub mod auth;
pub mod dashboard;
pub mod refresh;
pub mod rooms;

pub use auth::{AdminCredentials, AdminGate, LoginForm};
pub use dashboard::{BookingDetails, BookingFilter, Dashboard, DashboardStats};
pub use refresh::{BookingWatcher, RefreshEvent};
pub use rooms::{RoomEditor, RoomUpdate};

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("admin login required")]
    NotLoggedIn,
    #[error("Booking not found")]
    BookingNotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
