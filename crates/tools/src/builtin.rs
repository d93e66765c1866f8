//! Built-in tool bodies.  Each is pure or near-pure: no I/O, no shared state.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of ids produced by [`generate_session_id`].
pub const SESSION_ID_LEN: usize = 24;

/// Random id drawn from `[A-Za-z0-9]`.
pub fn generate_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

/// Fixed 4-4-6 breathing guidance.
pub fn breathing_exercise() -> &'static str {
    "لنأخذ لحظة هدوء.\n\
     1. خذ نفساً عميقاً لمدة 4 ثوانٍ.\n\
     2. احبس النفس 4 ثوانٍ.\n\
     3. ازفر ببطء لمدة 6 ثوانٍ.\n\
     كرر ذلك 4 مرات."
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

/// A simulated therapy-session booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub client: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
}

/// Book `name` for `days_from_now` days after `now`.  Nothing is stored.
///
/// Returns `None` when the offset does not fit in a `DateTime<Utc>`.
pub fn schedule_session(name: &str, days_from_now: i64, now: DateTime<Utc>) -> Option<Booking> {
    let scheduled_at = now.checked_add_signed(Duration::try_days(days_from_now)?)?;
    Some(Booking {
        client: name.to_owned(),
        scheduled_at,
        status: BookingStatus::Confirmed,
    })
}
