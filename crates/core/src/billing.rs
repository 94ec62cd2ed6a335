//! Billing arithmetic for parking sessions and slot reservations.
//!
//! All monetary values use [`Decimal`] so charges are exact base-10 amounts
//! with no floating-point drift. Durations round up: a session is billed at
//! least one minute, and any started hour is billed in full.

use rust_decimal::Decimal;

use crate::types::Timestamp;

/// Minutes a session is billed for: the elapsed time between entry and exit
/// rounded up to whole minutes, with a floor of one minute.
///
/// A non-positive elapsed time (clock skew, instantaneous exit) also bills
/// one minute rather than zero or a negative value.
pub fn duration_minutes(entry_time: Timestamp, exit_time: Timestamp) -> i64 {
    let secs = (exit_time - entry_time).num_seconds();
    if secs <= 0 {
        return 1;
    }
    let minutes = secs.div_ceil(60);
    minutes.max(1)
}

/// Hours a session is billed for: `duration_minutes` rounded up to whole
/// hours, with a floor of one hour.
pub fn billed_hours(duration_minutes: i64) -> i64 {
    if duration_minutes <= 0 {
        return 1;
    }
    duration_minutes.div_ceil(60).max(1)
}

/// Charge for a completed session: `hourly_rate × billed_hours`.
pub fn parking_charge(hourly_rate: Decimal, billed_hours: i64) -> Decimal {
    hourly_rate * Decimal::from(billed_hours)
}

/// Cost of a slot reservation: `hourly_rate × expected_duration_hours`.
///
/// Computed once when the request is created, using the then-current slot
/// rate, and frozen on the request thereafter.
pub fn reservation_cost(hourly_rate: Decimal, expected_duration_hours: i32) -> Decimal {
    hourly_rate * Decimal::from(expected_duration_hours)
}
