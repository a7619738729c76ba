use crate::models::RemainingDuration;
use crate::prayer_times::codec::MINUTES_PER_DAY;

// Absorbs float noise from `second / 60.0` so a whole second is never floored away.
const SECOND_EPSILON: f64 = 1e-6;

/// Time left from `current_minutes` (fractional, seconds folded in) until
/// `target_minutes`. A negative difference wraps to the next day.
pub fn remaining(current_minutes: f64, target_minutes: u32) -> RemainingDuration {
    let mut diff = target_minutes as f64 - current_minutes;
    if diff < 0.0 {
        diff += MINUTES_PER_DAY as f64;
    }

    let total_seconds = (diff * 60.0 + SECOND_EPSILON).floor().max(0.0) as u64;
    RemainingDuration {
        hours: (total_seconds / 3600) as u32,
        minutes: ((total_seconds / 60) % 60) as u32,
        seconds: (total_seconds % 60) as u32,
    }
}
