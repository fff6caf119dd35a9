use chrono::{DateTime, Utc};
use rand::Rng;

/// `BK` + epoch milliseconds + a random number below 1000. Collisions are
/// only improbable, not prevented.
pub fn generate_booking_id(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("BK{}{}", now.timestamp_millis(), suffix)
}
