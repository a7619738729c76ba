pub mod calendar;
pub mod codec;
pub mod countdown;
pub mod remaining;
pub mod selector;

pub use calendar::normalize_month;
pub use countdown::{CountdownScheduler, CountdownState};
pub use selector::PrayerSchedule;
