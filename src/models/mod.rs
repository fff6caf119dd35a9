pub mod booking;
pub mod room;

pub use booking::{BookingRecord, BookingStatus, RoomType};
pub use room::{Amenity, RoomAvailability, RoomDetails};
